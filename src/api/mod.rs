//! # Módulo API
//!
//! Adaptador HTTP que hace de capa de presentación sobre el núcleo de
//! reservas. Cada petición abre una sesión nueva (cargando y normalizando la
//! agenda) y la conduce con las selecciones recibidas. Si la agenda no se
//! puede leer la petición falla con `503`; nunca se responde ni se guarda
//! sobre un documento por defecto.
//!
//! ## Módulos principales
//!
//! - [`barber`] - Barberos y turnos abiertos
//! - [`booking`] - Confirmación de reservas
//! - [`health`] - Comprobación de vida
//! - [`errors`] - Manejo de errores de la aplicación

pub mod barber;
pub mod booking;
pub mod errors;
pub mod health;
pub mod middleware;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse};

use actix_web::web;
use std::sync::Arc;

use self::middleware::ErrorLogExt;
use crate::booking::{BookingSession, Clock};
use crate::db::ScheduleStore;

/// Estado compartido por todos los workers de Actix.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScheduleStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn ScheduleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Abre una sesión con la agenda recién cargada.
    ///
    /// # Errores
    /// - `AppError::Store` si la lectura de la agenda falla.
    pub async fn start_session(&self) -> AppResult<BookingSession> {
        let session = BookingSession::open(self.store.clone(), self.clock.clone())
            .await
            .log_error_level(tracing::Level::WARN)?;
        Ok(session)
    }
}

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/barbers/*` - Ver [`barber::routes`]
/// - `/bookings` - Ver [`booking::routes`]
/// - `/health` - Ver [`health::routes`]
///
/// Los errores de extracción (JSON, query, path) se devuelven con el mismo
/// formato que el resto de errores de la API.
///
/// # Ejemplo
///
/// ```no_run
/// use actix_web::{web, App};
/// use salon_booking::api;
///
/// let app = App::new()
///     .configure(api::init_routes);
/// ```
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    );

    barber::routes(cfg);
    booking::routes(cfg);
    health::routes(cfg);
}
