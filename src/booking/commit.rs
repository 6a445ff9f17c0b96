//! # Confirmación de reservas
//!
//! Quitar el turno elegido de la lista del barbero y anotar la reserva es una
//! mutación síncrona del documento en memoria. Después se guarda el documento
//! completo. No hay control de concurrencia: si otro cliente guarda entre
//! nuestra carga y nuestra escritura, la última escritura gana y la otra
//! reserva se pierde.

use super::errors::{BookingError, BookingResult, StoreOperation};
use super::model::{BarberCode, Day, Reservation, ScheduleDocument, TimeValue};
use crate::db::ScheduleStore;

/// Datos de una reserva ya validados por quien llama.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub barber_code: BarberCode,
    pub day: Day,
    pub time: TimeValue,
    pub client_name: String,
    pub client_phone: String,
}

/// Aplica la reserva sobre el documento en memoria.
///
/// El turno no tiene que seguir libre: si ya no está en la lista, la reserva
/// se anota igualmente y la lista no cambia.
///
/// # Errores
/// - `MissingBarberState`: el barbero no existe; el documento no se toca.
pub fn reserve(
    document: &mut ScheduleDocument,
    request: &BookingRequest,
) -> BookingResult<Reservation> {
    let barber = document
        .barber_mut(request.barber_code)
        .ok_or(BookingError::MissingBarberState {
            code: request.barber_code,
        })?;
    let barber_code = barber.code;

    if let Some(slots) = barber.slots_mut(request.day) {
        if let Some(index) = slots.iter().position(|&t| t == request.time) {
            slots.remove(index);
        } else {
            tracing::warn!(
                barber_code,
                day = %request.day,
                time = request.time,
                "El turno ya no estaba libre, se anota la reserva igualmente"
            );
        }
    }

    let reservation = Reservation {
        client_name: request.client_name.clone(),
        client_phone: request.client_phone.clone(),
        time_value: request.time,
        barber_code,
        day: request.day,
    };

    insert_ordered(&mut document.reservations, reservation.clone());
    Ok(reservation)
}

/// Inserta manteniendo el orden por hora. Con horas iguales la nueva reserva
/// queda detrás de las existentes.
pub fn insert_ordered(reservations: &mut Vec<Reservation>, reservation: Reservation) {
    let append = reservations
        .last()
        .map_or(true, |last| reservation.time_value >= last.time_value);

    if append {
        reservations.push(reservation);
        return;
    }

    let index = reservations
        .iter()
        .position(|r| r.time_value > reservation.time_value)
        .unwrap_or(reservations.len());
    reservations.insert(index, reservation);
}

/// Aplica la reserva y guarda el documento completo.
///
/// Si el guardado falla la mutación se queda en memoria (no se deshace) y se
/// devuelve `RemoteUnavailable`.
pub async fn commit(
    store: &dyn ScheduleStore,
    document: &mut ScheduleDocument,
    request: &BookingRequest,
) -> BookingResult<Reservation> {
    let reservation = reserve(document, request)?;

    store
        .save(document)
        .await
        .map_err(|e| BookingError::remote(StoreOperation::Save, e))?;

    tracing::info!(
        barber_code = reservation.barber_code,
        day = %reservation.day,
        time = reservation.time_value,
        "Reserva guardada"
    );
    Ok(reservation)
}
