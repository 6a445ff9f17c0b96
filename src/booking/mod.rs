//! # Núcleo de reservas
//!
//! Reconciliación del documento de agenda compartido:
//!
//! - [`model`] - Forma del documento y decodificación tolerante
//! - [`rollover`] - Cambio de día al cargar
//! - [`slots`] - Turnos abiertos por barbero y día
//! - [`commit`] - Confirmación de una reserva
//! - [`session`] - Estado de un cliente y contrato con la presentación
//! - [`errors`] - Errores del núcleo

pub mod commit;
pub mod errors;
pub mod model;
pub mod rollover;
pub mod session;
pub mod slots;

pub use commit::BookingRequest;
pub use errors::{BookingError, BookingResult, StoreOperation, ValidationFailure};
pub use model::{BarberCode, BarberSchedule, Day, Reservation, ScheduleDocument, TimeValue, WORK_HOURS};
pub use rollover::{Clock, FixedClock, Rollover, ZonedClock};
pub use session::{BookingSession, Confirmation, SyncState};
