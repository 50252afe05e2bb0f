pub mod args;
pub mod cache;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod source;
pub mod stats;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use source::Mode;
