//! # Cambio de día
//!
//! Al cargar el documento se compara su fecha guardada con "hoy" y "ayer":
//!
//! - misma fecha que hoy: no se toca nada ni se guarda;
//! - fecha de ayer: los turnos de mañana pasan a hoy, mañana vuelve a la
//!   plantilla, las reservas de ayer se descartan y las de mañana pasan a hoy;
//! - cualquier otra fecha (o ninguna): más de un día sin observar, se
//!   reinicia el documento a los valores por defecto.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use super::errors::{BookingError, BookingResult, StoreOperation};
use super::model::{
    Day, RawDocument, Reservation, ScheduleDocument, StoredDocument, UnreadableSlots, WORK_HOURS,
};
use crate::db::ScheduleStore;

/// Fuente de las fechas de calendario usadas para detectar el cambio de día.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn yesterday(&self) -> NaiveDate {
        let today = self.today();
        today.pred_opt().unwrap_or(today)
    }
}

/// Reloj anclado a una zona horaria con nombre (por defecto Europe/Belgrade).
///
/// "Ayer" se deriva del "hoy" de la misma zona.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Reloj fijo, para tests y reproducciones.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Decisión tomada al normalizar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    /// No había documento: se creó uno por defecto.
    Created,
    /// El documento ya era de hoy.
    Current,
    /// El documento era de ayer y se rotó un día.
    Rotated,
    /// El documento era más antiguo o ilegible y se reinició.
    Reset,
}

impl Rollover {
    pub fn requires_save(self) -> bool {
        !matches!(self, Rollover::Current)
    }
}

/// Normaliza un documento recién cargado. Función pura: no persiste nada.
pub fn normalize(
    raw: Option<&RawDocument>,
    today: NaiveDate,
    yesterday: NaiveDate,
) -> (ScheduleDocument, Rollover) {
    let Some(raw) = raw else {
        return (ScheduleDocument::with_defaults(today), Rollover::Created);
    };

    let stored = StoredDocument::decode(raw);
    match stored.stored_date {
        Some(date) if date == today => (
            ScheduleDocument {
                barbers: stored.barbers,
                reservations: stored.reservations,
                stored_date: today,
                retained: stored.retained,
            },
            Rollover::Current,
        ),
        Some(date) if date == yesterday => (rotate(stored, today), Rollover::Rotated),
        _ => (ScheduleDocument::with_defaults(today), Rollover::Reset),
    }
}

/// Avanza el documento exactamente un día.
fn rotate(stored: StoredDocument, today: NaiveDate) -> ScheduleDocument {
    let barbers = stored
        .barbers
        .into_iter()
        .map(|mut barber| {
            barber.today_slots = Some(
                barber
                    .tomorrow_slots
                    .take()
                    .unwrap_or_else(|| WORK_HOURS.to_vec()),
            );
            barber.tomorrow_slots = Some(WORK_HOURS.to_vec());
            barber.unreadable = UnreadableSlots::default();
            barber
        })
        .collect();

    let reservations = stored
        .reservations
        .into_iter()
        .filter(|r| r.day == Day::Tomorrow)
        .map(|r| Reservation {
            day: Day::Today,
            ..r
        })
        .collect();

    ScheduleDocument {
        barbers,
        reservations,
        stored_date: today,
        retained: stored.retained.rotate(),
    }
}

/// Resultado de cargar y normalizar el documento remoto.
#[derive(Debug)]
pub struct Refresh {
    pub document: ScheduleDocument,
    pub rollover: Rollover,
    /// Error al guardar el documento normalizado. El documento en memoria
    /// sigue siendo válido para hoy aunque el remoto no se haya actualizado.
    pub save_error: Option<BookingError>,
}

/// Carga el documento remoto, lo normaliza y lo guarda si cambió.
///
/// # Errores
/// - `RemoteUnavailable` si la lectura falla. Un fallo al guardar no aborta:
///   se devuelve en [`Refresh::save_error`].
pub async fn refresh(store: &dyn ScheduleStore, clock: &dyn Clock) -> BookingResult<Refresh> {
    let today = clock.today();
    let yesterday = clock.yesterday();

    let raw = store
        .load()
        .await
        .map_err(|e| BookingError::remote(StoreOperation::Load, e))?;

    let (document, rollover) = normalize(raw.as_ref(), today, yesterday);
    tracing::info!(
        action = ?rollover,
        today = %today,
        reservations = document.reservations.len(),
        "Documento de agenda normalizado"
    );

    let save_error = if rollover.requires_save() {
        store
            .save(&document)
            .await
            .map_err(|e| BookingError::remote(StoreOperation::Save, e))
            .err()
    } else {
        None
    };

    Ok(Refresh {
        document,
        rollover,
        save_error,
    })
}
