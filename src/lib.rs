//! # Salon Booking
//!
//! Reservas de turnos de barbería sobre un documento de agenda compartido,
//! guardado en MongoDB y sobrescrito entero en cada cambio.
//!
//! ## Arquitectura
//!
//! ```text
//! Presentación (HTTP/JSON, Actix Web)
//!     ↓ BookingSession
//! Núcleo de reservas (cambio de día, turnos, confirmación)
//!     ↓ ScheduleStore (load / save del documento completo)
//! MongoDB
//! ```

pub mod api;
pub mod booking;
pub mod config;
pub mod db;
