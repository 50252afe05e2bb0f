//! Implements the `Source` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a real spreadsheet.

use crate::source::{Source, SourceId};
use crate::Result;
use anyhow::anyhow;

/// The name of the built-in seed data.
pub(super) const SEED: &str = "seed";

/// An implementation of the `Source` trait that holds its CSV in memory. It can also be
/// made to fail every fetch.
#[derive(Debug, Clone)]
pub struct MemorySource {
    id: SourceId,
    contents: std::result::Result<Vec<u8>, String>,
    fetches: usize,
}

impl MemorySource {
    /// Create a new `MemorySource` named `name` holding `csv`.
    pub fn new(name: impl Into<String>, csv: impl Into<Vec<u8>>) -> Self {
        Self {
            id: SourceId::Memory(name.into()),
            contents: Ok(csv.into()),
            fetches: 0,
        }
    }

    /// Create a `MemorySource` whose fetches always fail with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: SourceId::Memory(name.into()),
            contents: Err(message.into()),
            fetches: 0,
        }
    }

    /// A `MemorySource` holding the seed data from this module.
    pub fn seed() -> Self {
        Self::new(SEED, SEED_DATA)
    }

    /// How many times `fetch` has been called.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

#[async_trait::async_trait]
impl Source for MemorySource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&mut self) -> Result<Vec<u8>> {
        self.fetches += 1;
        self.contents.clone().map_err(|message| anyhow!(message))
    }
}

/// Seed reading-log data.
pub(crate) const SEED_DATA: &str = r##"Título,Autor,Término da Leitura,Tipo,Custo,Valor,Gênero,Formato,Nacionalidade,Raça/Etnia,Obtido em,Idioma,Editora,Páginas
Torto Arado,Itamar Vieira Junior,12/01/2023,5 estrelas,"R$ 54,90","R$ 69,90",Homem,Físico,Brasil,Negra,Compra,Português,Todavia,264
A Hora da Estrela,Clarice Lispector,28/02/2023,"4,5 estrelas","R$ 0,00","R$ 39,90",Mulher,Kindle,Brasil,Branca,Kindle Unlimited,Português,Rocco,88
Americanah,Chimamanda Ngozi Adichie,15/03/2023,ótimo,"R$ 0,00","R$ 59,90",Mulher,Físico,Nigéria,Negra,Presente,Português,Companhia das Letras,512
Kindred,Octavia E. Butler,02/05/2023,4 estrelas,"R$ 29,90","R$ 49,90",Mulher,Físico,Estados Unidos,Negra,Compra,Português,Morro Branco,432
Pedro Páramo,Juan Rulfo,20/07/2023,"3,5",R$ 0,"R$ 44,90",Homem,Físico,México,Latina,Biblioteca,Espanhol,,136
Norwegian Wood,Haruki Murakami,09/09/2023,3 estrelas,"R$ 19,90","R$ 19,90",Homem,Kindle,Japão,Amarela,Compra,Inglês,Vintage,389
Olhos d'água,Conceição Evaristo,30/11/2023,5,"R$ 0,00","R$ 42,00",Mulher,Físico,Brasil,Negra,Presente,Português,Pallas,116
Quarto de Despejo,Carolina Maria de Jesus,18/01/2024,"4,5 estrelas","R$ 25,00","R$ 45,00",Mulher,Físico,Brasil,Negra,Compra,Português,Ática,200
Cem Anos de Solidão,Gabriel García Márquez,05/03/2024,5 estrelas,"R$ 59,90","R$ 89,90",Homem,Físico,Colômbia,Latina,Compra,Português,Record,448
Sula,Toni Morrison,22/04/2024,mediano,"R$ 0,00","R$ 0,00",Mulher,Audiolivro,Estados Unidos,Negra,Assinatura,Inglês,,192
O Avesso da Pele,Jeferson Tenório,14/06/2024,4 estrelas,"R$ 39,90","R$ 64,90",Homem,Kindle,Brasil,Negra,Compra,Português,Companhia das Letras,192
Ensaio sobre a Cegueira,José Saramago,03/08/2024,4.5 estrelas,"R$ 44,90","R$ 44,90",Homem,Físico,Portugal,Branca,Troca,Português,Companhia das Letras,312
Tudo é Rio,Carla Madeira,,,"R$ 49,90","R$ 59,90",Mulher,Físico,Brasil,Branca,Compra,Português,Record,210
Mrs Dalloway,Virginia Woolf,25/10/2024,"3,5 estrelas","R$ 12,00","R$ 35,00",Mulher,Físico,Reino Unido,Branca,Sebo,Inglês,Penguin,
"##;
