//! # Manejo de errores de la API
//!
//! Traduce los errores del núcleo de reservas a respuestas HTTP con cuerpo
//! JSON `{error, message}`.

use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

use crate::booking::BookingError;
use crate::db::StoreError;

/// Tipos de error de la aplicación con contexto
#[derive(Error, Debug)]
pub enum AppError {
    /// El almacén remoto no respondió a tiempo o falló
    #[error("Almacén no disponible en operación '{operation}': {source}")]
    Store {
        operation: String,
        #[source]
        source: StoreError,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField {
        field: String,
        message: String,
    },

    /// Error de validación general
    #[error("Error de validación: {0}")]
    Validation(String),

    /// Error de recurso no encontrado
    #[error("No encontrado: {resource_type} con ID '{id}'")]
    NotFoundWithId {
        resource_type: String,
        id: String,
    },
}

// Métodos helper para crear errores con contexto
impl AppError {
    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un error de no encontrado con ID
    pub fn not_found_id(resource_type: &str, id: &str) -> Self {
        Self::NotFoundWithId {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        match error {
            BookingError::MissingBarberState { code } => {
                Self::not_found_id("Barbero", &code.to_string())
            }
            BookingError::RemoteUnavailable { operation, source } => Self::Store {
                operation: operation.to_string(),
                source,
            },
            BookingError::ValidationFailure(failure) => {
                Self::validation_field(failure.field(), &failure.to_string())
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Log detallado del error antes de responder
        match self {
            Self::Store { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Store error occurred"
                );
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: "Almacén no disponible".to_string(),
                    message: "No se pudo guardar ni leer la agenda, inténtelo de nuevo".to_string(),
                })
            }
            Self::ValidationWithField { field, message } => {
                tracing::warn!(
                    field = %field,
                    message = %message,
                    "Validation error"
                );
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: format!("Campo '{}': {}", field, message),
                })
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "Validation error");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Error de validación".to_string(),
                    message: message.clone(),
                })
            }
            Self::NotFoundWithId { resource_type, id } => {
                tracing::info!(
                    resource_type = %resource_type,
                    id = %id,
                    "Resource not found"
                );
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "No encontrado".to_string(),
                    message: format!("{} con ID '{}' no encontrado", resource_type, id),
                })
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{StoreOperation, ValidationFailure};
    use actix_web::http::StatusCode;

    #[test]
    fn booking_errors_map_to_status_codes() {
        let missing: AppError = BookingError::MissingBarberState { code: 4 }.into();
        assert_eq!(missing.error_response().status(), StatusCode::NOT_FOUND);

        let invalid: AppError = BookingError::from(ValidationFailure::MissingClientPhone).into();
        assert!(matches!(
            &invalid,
            AppError::ValidationWithField { field, .. } if field == "client_phone"
        ));
        assert_eq!(invalid.error_response().status(), StatusCode::BAD_REQUEST);

        let remote: AppError = BookingError::remote(
            StoreOperation::Save,
            StoreError::Unavailable("down".to_string()),
        )
        .into();
        assert_eq!(remote.error_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn plain_validation_is_a_bad_request() {
        let error = AppError::Validation("cuerpo JSON inválido".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }
}
