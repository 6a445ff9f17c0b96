//! # Salon Booking Server
//!
//! Servidor web para reservar turnos en la barbería, construido con Rust,
//! Actix Web y MongoDB.
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Base de datos MongoDB
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=salon_booking
//! SCHEDULE_COLLECTION=schedules
//! SCHEDULE_DOCUMENT_ID=reservations
//!
//! # mongodb (por defecto) o memory
//! STORE_BACKEND=mongodb
//!
//! # Zona horaria del salón
//! SCHEDULE_TIMEZONE=Europe/Belgrade
//!
//! # Servidor
//! BIND_ADDRESS=0.0.0.0:8080
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! # 1. Instalar y ejecutar MongoDB
//! # Docker: docker run -d --name mongo -p 27017:27017 mongo:latest
//!
//! # 2. Compilar y ejecutar
//! cargo run
//!
//! # Sin base de datos
//! STORE_BACKEND=memory cargo run
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use salon_booking::api::{self, AppState};
use salon_booking::booking::{BookingSession, ZonedClock};
use salon_booking::config::{Config, StoreBackend};
use salon_booking::db::{InMemoryStore, MongoStore, ScheduleStore};

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Conecta con el almacén de la agenda
/// 4. Normaliza la agenda una vez al arrancar (cambio de día)
/// 5. Inicia el servidor HTTP con las rutas de la API
///
/// # Errores
///
/// Retorna `std::io::Error` si no se puede conectar a MongoDB o no se puede
/// bindear al puerto especificado.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Configurar sistema de logging con tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("salon_booking=debug".parse().unwrap())
                .add_directive("mongodb=info".parse().unwrap()),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        timezone = %config.timezone,
        backend = ?config.backend,
        "Iniciando Salon Booking Server"
    );

    let store: Arc<dyn ScheduleStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
        StoreBackend::MongoDb => match MongoStore::init(&config.mongo).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("Error conectando a MongoDB: {}", e);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Error de MongoDB: {}", e),
                ));
            }
        },
    };
    let state = AppState::new(store, Arc::new(ZonedClock::new(config.timezone)));

    // Aplica el cambio de día pendiente antes de aceptar peticiones
    let session = BookingSession::start(state.store.clone(), state.clock.clone()).await;
    tracing::info!(
        stored_date = %session.document().stored_date,
        reservations = session.document().reservations.len(),
        sync = ?session.sync_state(),
        "Agenda cargada"
    );

    tracing::info!("Servidor iniciando en {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
