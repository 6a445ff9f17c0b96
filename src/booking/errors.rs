use thiserror::Error;

use super::model::BarberCode;
use crate::db::StoreError;

/// Operación del almacén remoto que falló.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Save,
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreOperation::Load => f.write_str("load"),
            StoreOperation::Save => f.write_str("save"),
        }
    }
}

/// Datos que faltan antes de poder confirmar una reserva.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("El nombre del cliente es requerido")]
    MissingClientName,
    #[error("El teléfono del cliente es requerido")]
    MissingClientPhone,
    #[error("No hay barbero seleccionado")]
    NoBarberSelected,
    #[error("No hay hora seleccionada")]
    NoTimeSelected,
}

impl ValidationFailure {
    /// Campo de entrada al que corresponde el fallo.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingClientName => "client_name",
            Self::MissingClientPhone => "client_phone",
            Self::NoBarberSelected => "barber_code",
            Self::NoTimeSelected => "time",
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    /// El barbero seleccionado no está en el documento cargado
    #[error("Falta el barbero {code} en el estado cargado")]
    MissingBarberState { code: BarberCode },

    /// Lectura o escritura del documento remoto fallida
    #[error("Almacén remoto no disponible durante '{operation}': {source}")]
    RemoteUnavailable {
        operation: StoreOperation,
        #[source]
        source: StoreError,
    },

    #[error("Error de validación: {0}")]
    ValidationFailure(#[from] ValidationFailure),
}

impl BookingError {
    pub fn remote(operation: StoreOperation, source: StoreError) -> Self {
        Self::RemoteUnavailable { operation, source }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
