// src/db/mod.rs
//! Pasarela hacia el almacén remoto del documento de agenda.
//!
//! El almacén solo ofrece lectura y sobrescritura del documento completo:
//! sin actualizaciones parciales, sin bloqueos y sin transacciones. Gana la
//! última escritura.

pub mod memory;
pub mod mongodb;

pub use memory::InMemoryStore;
pub use self::mongodb::MongoStore;

use thiserror::Error;

use crate::booking::model::{RawDocument, ScheduleDocument};

/// Errores del almacén remoto
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error de base de datos con la operación que lo originó
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: ::mongodb::error::Error,
    },

    /// El documento no pudo convertirse al formato del almacén
    #[error("Error codificando el documento: {0}")]
    Encoding(String),

    /// El almacén no respondió
    #[error("Almacén no disponible: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn database(operation: &str, source: ::mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait::async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Devuelve el documento completo, o `None` si nunca se ha guardado.
    async fn load(&self) -> Result<Option<RawDocument>>;

    /// Sobrescribe el documento completo.
    async fn save(&self, document: &ScheduleDocument) -> Result<()>;
}
