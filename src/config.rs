//! Configuración leída del entorno (y de `.env`, cargado en `main`).

use chrono_tz::Tz;
use std::env;
use tracing::{info, warn};

const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Belgrade;

/// Dónde vive el documento de agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    /// Sin persistencia; útil para probar la interfaz sin base de datos.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// `_id` del único documento de agenda.
    pub document_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Zona horaria con la que se calculan "hoy" y "ayer".
    pub timezone: Tz,
    pub backend: StoreBackend,
    pub mongo: MongoSettings,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timezone = match lookup("SCHEDULE_TIMEZONE") {
            None => DEFAULT_TIMEZONE,
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given SCHEDULE_TIMEZONE: {} is not valid, falling back to {}.",
                        name, DEFAULT_TIMEZONE
                    );
                    DEFAULT_TIMEZONE
                }
            },
        };

        let backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("mongodb") => StoreBackend::MongoDb,
            Some("memory") => {
                info!("STORE_BACKEND=memory: los cambios no se persistirán");
                StoreBackend::Memory
            }
            Some(other) => {
                warn!(
                    "The given STORE_BACKEND: {} is not valid, falling back to mongodb.",
                    other
                );
                StoreBackend::MongoDb
            }
        };

        Self {
            bind_address: var("BIND_ADDRESS", "0.0.0.0:8080"),
            timezone,
            backend,
            mongo: MongoSettings {
                uri: var("MONGODB_URI", "mongodb://localhost:27017"),
                database: var("MONGODB_DATABASE", "salon_booking"),
                collection: var("SCHEDULE_COLLECTION", "schedules"),
                document_id: var("SCHEDULE_DOCUMENT_ID", "reservations"),
            },
        }
    }
}
