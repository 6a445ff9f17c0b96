//! # Utilidades de logging para errores
//!
//! Recorren la cadena `source()` de un error y la registran con `tracing`,
//! de modo que un fallo del almacén se vea junto a su causa original.

use std::error::Error as StdError;

fn collect_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut error_chain = Vec::new();
    let mut current_error: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    error_chain
}

/// Registra la cadena completa de errores
///
/// # Parámetros
/// - `error`: Error a analizar y registrar
/// - `context`: Contexto opcional para añadir información
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let error_chain = collect_chain(error);

    if let Some(ctx) = context {
        tracing::error!(
            context = %ctx,
            error_chain = ?error_chain,
            "Error with full chain (with context)"
        );
    } else {
        tracing::error!(error_chain = ?error_chain, "Error with full chain");
    }
}

/// Extension trait para Results que añade logging automático de error chains
///
/// # Ejemplo de uso
/// ```ignore
/// store
///     .load()
///     .await
///     .log_error_context("loading schedule document")?;
/// ```
pub trait ErrorLogExt<T, E> {
    /// Loggea la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;

    /// Loggea la cadena de errores con un nivel específico
    fn log_error_level(self, level: tracing::Level) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }

    fn log_error_level(self, level: tracing::Level) -> Result<T, E> {
        if let Err(ref error) = self {
            match level {
                tracing::Level::ERROR => log_error_chain(error, None),
                tracing::Level::WARN => {
                    let error_chain = collect_chain(error);
                    tracing::warn!(error_chain = ?error_chain, "Warning with error chain");
                }
                _ => {
                    tracing::info!("Error occurred: {}", error);
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingError, StoreOperation};
    use crate::db::StoreError;

    #[test]
    fn chain_includes_the_store_cause() {
        let error = BookingError::remote(
            StoreOperation::Load,
            StoreError::Unavailable("timeout".to_string()),
        );

        let chain = collect_chain(&error);

        assert_eq!(chain.len(), 2);
        assert!(chain[1].contains("timeout"));
    }

    #[test]
    fn logging_passes_the_result_through() {
        let ok: Result<u8, StoreError> = Ok(3);
        assert_eq!(ok.log_error_context("noop").unwrap(), 3);

        let err: Result<u8, StoreError> = Err(StoreError::Encoding("bad".to_string()));
        assert!(err.log_error_level(tracing::Level::WARN).is_err());
    }
}
