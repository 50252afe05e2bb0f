use clap::Parser;
use reading_log::args::{Args, Command};
use reading_log::cache::NoCache;
use reading_log::commands::{self, resolve_source};
use reading_log::loader::Loader;
use reading_log::{source, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without a real spreadsheet. When
    // READING_LOG_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Live.
    let mode = Mode::from_env();

    // A single command loads the log once, so there is nothing to gain from caching
    let mut loader = Loader::new(NoCache);

    match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.source(), init_args.gid())
                .await?
                .print(false)
        }

        Command::Summary(report_args) => {
            let id = resolve_source(home, report_args.source(), mode).await?;
            let mut input = source::source(id, mode)?;
            commands::summary(&mut loader, input.as_mut(), report_args.filters())
                .await?
                .print(report_args.json())
        }

        Command::Options(options_args) => {
            let id = resolve_source(home, options_args.source(), mode).await?;
            let mut input = source::source(id, mode)?;
            commands::options(&mut loader, input.as_mut())
                .await?
                .print(options_args.json())
        }

        Command::Books(report_args) => {
            let id = resolve_source(home, report_args.source(), mode).await?;
            let mut input = source::source(id, mode)?;
            commands::books(&mut loader, input.as_mut(), report_args.filters())
                .await?
                .print(report_args.json())
        }
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
