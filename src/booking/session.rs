//! # Sesión de reserva
//!
//! Estado explícito de un cliente: el documento cargado y las selecciones en
//! curso (barbero, día, hora). La capa de presentación solo habla con este
//! objeto; todas las operaciones se ejecutan en secuencia.

use std::sync::Arc;

use serde::Serialize;

use super::commit::{self, BookingRequest};
use super::errors::{BookingError, BookingResult, ValidationFailure};
use super::model::{BarberCode, Day, ScheduleDocument, TimeValue};
use super::rollover::{self, Clock, Rollover};
use super::slots;
use crate::db::ScheduleStore;

/// Estado del documento en memoria respecto al almacén remoto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// El documento en memoria coincide con el último guardado conocido.
    Synced,
    /// Hay cambios en memoria que no llegaron al almacén.
    LocalOnly,
}

/// Reserva confirmada, con lo necesario para mostrarla.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub barber_code: BarberCode,
    pub barber_name: String,
    pub day: Day,
    pub time: TimeValue,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    barber: Option<BarberCode>,
    day: Day,
    time: Option<TimeValue>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            barber: None,
            day: Day::Today,
            time: None,
        }
    }
}

pub struct BookingSession {
    store: Arc<dyn ScheduleStore>,
    clock: Arc<dyn Clock>,
    document: ScheduleDocument,
    selection: Selection,
    sync: SyncState,
}

impl BookingSession {
    /// Carga y normaliza el documento remoto.
    ///
    /// # Errores
    /// - `RemoteUnavailable` si la lectura falla. No se inventa ningún
    ///   documento: guardar uno por defecto sobrescribiría la agenda remota.
    pub async fn open(store: Arc<dyn ScheduleStore>, clock: Arc<dyn Clock>) -> BookingResult<Self> {
        let refreshed = rollover::refresh(store.as_ref(), clock.as_ref()).await?;

        Ok(Self {
            store,
            clock,
            document: refreshed.document,
            selection: Selection::default(),
            sync: sync_after_refresh(refreshed.save_error),
        })
    }

    /// Como [`BookingSession::open`], pero si la carga falla la sesión
    /// arranca con el documento por defecto de hoy y queda en
    /// [`SyncState::LocalOnly`] hasta el próximo guardado.
    ///
    /// Solo para el arranque de un cliente interactivo.
    pub async fn start(store: Arc<dyn ScheduleStore>, clock: Arc<dyn Clock>) -> Self {
        match Self::open(store.clone(), clock.clone()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "No se pudo cargar la agenda, usando valores por defecto");
                let document = ScheduleDocument::with_defaults(clock.today());
                Self {
                    store,
                    clock,
                    document,
                    selection: Selection::default(),
                    sync: SyncState::LocalOnly,
                }
            }
        }
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.document
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    pub fn selected_barber(&self) -> Option<BarberCode> {
        self.selection.barber
    }

    pub fn selected_day(&self) -> Day {
        self.selection.day
    }

    pub fn selected_time(&self) -> Option<TimeValue> {
        self.selection.time
    }

    /// Selecciona barbero; el día vuelve a hoy y se descarta la hora elegida.
    pub fn select_barber(&mut self, code: BarberCode) {
        self.selection = Selection {
            barber: Some(code),
            ..Selection::default()
        };
    }

    /// Cambia el día y devuelve los turnos abiertos para ese día.
    pub fn set_day(&mut self, day: Day) -> Vec<TimeValue> {
        self.selection.day = day;
        self.selection.time = None;
        self.available_slots().to_vec()
    }

    pub fn available_slots(&self) -> &[TimeValue] {
        slots::open_slots(&self.document, self.selection.barber, self.selection.day)
    }

    /// Guarda la hora como pendiente; no modifica el documento.
    pub fn select_time(&mut self, time: TimeValue) {
        self.selection.time = Some(time);
    }

    /// Confirma la reserva con los datos del cliente.
    ///
    /// # Errores
    /// - `ValidationFailure`: nombre o teléfono vacíos, o falta barbero u hora.
    /// - `MissingBarberState`: el barbero no está en el documento.
    /// - `RemoteUnavailable`: el guardado falló; la reserva queda en memoria.
    pub async fn confirm(
        &mut self,
        client_name: &str,
        client_phone: &str,
    ) -> BookingResult<Confirmation> {
        let request = self.booking_request(client_name, client_phone)?;

        match commit::commit(self.store.as_ref(), &mut self.document, &request).await {
            Ok(reservation) => {
                self.sync = SyncState::Synced;
                let barber_name = self
                    .document
                    .barber(reservation.barber_code)
                    .map(|b| b.name.clone())
                    .unwrap_or_default();

                Ok(Confirmation {
                    barber_code: reservation.barber_code,
                    barber_name,
                    day: reservation.day,
                    time: reservation.time_value,
                    label: slots::time_label(reservation.time_value),
                })
            }
            Err(e @ BookingError::RemoteUnavailable { .. }) => {
                self.sync = SyncState::LocalOnly;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn booking_request(&self, client_name: &str, client_phone: &str) -> BookingResult<BookingRequest> {
        let client_name = client_name.trim();
        let client_phone = client_phone.trim();

        if client_name.is_empty() {
            return Err(ValidationFailure::MissingClientName.into());
        }
        if client_phone.is_empty() {
            return Err(ValidationFailure::MissingClientPhone.into());
        }
        let barber_code = self
            .selection
            .barber
            .ok_or(ValidationFailure::NoBarberSelected)?;
        let time = self.selection.time.ok_or(ValidationFailure::NoTimeSelected)?;

        Ok(BookingRequest {
            barber_code,
            day: self.selection.day,
            time,
            client_name: client_name.to_string(),
            client_phone: client_phone.to_string(),
        })
    }

    /// Empieza una reserva nueva: descarta las selecciones y vuelve a cargar
    /// el documento para ver lo que hayan reservado otros clientes.
    ///
    /// Si la recarga falla se conserva el documento anterior.
    pub async fn start_new(&mut self) -> BookingResult<Rollover> {
        self.selection = Selection::default();

        let refreshed = rollover::refresh(self.store.as_ref(), self.clock.as_ref())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "No se pudo recargar la agenda");
                e
            })?;

        self.document = refreshed.document;
        self.sync = sync_after_refresh(refreshed.save_error);
        Ok(refreshed.rollover)
    }
}

fn sync_after_refresh(save_error: Option<BookingError>) -> SyncState {
    match save_error {
        None => SyncState::Synced,
        Some(e) => {
            tracing::warn!(error = %e, "Agenda normalizada solo en memoria");
            SyncState::LocalOnly
        }
    }
}
