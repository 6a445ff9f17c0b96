//! # API de Reservas
//!
//! Confirma una reserva sobre la agenda compartida. No hay bloqueo entre
//! clientes: dos reservas simultáneas del mismo turno pueden confirmarse y la
//! última escritura del documento gana.

use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::middleware::ErrorLogExt;
use super::{AppResult, AppState};
use crate::booking::{BarberCode, Day, TimeValue};

/// Datos para crear una reserva
///
/// Los campos ausentes llegan al núcleo como selecciones vacías y se
/// rechazan con un error de validación.
#[derive(Deserialize)]
struct MakeBooking {
    barber_code: Option<BarberCode>,
    /// `today` (por defecto) o `tomorrow`
    day: Option<Day>,
    time: Option<TimeValue>,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    client_phone: String,
}

/// Crea una nueva reserva
///
/// # Respuesta
/// ```json
/// {
///   "message": "Reserva creada correctamente",
///   "reservation": {
///     "barber_code": 0,
///     "barber_name": "Жарко",
///     "day": "today",
///     "time": 900,
///     "label": "9:00"
///   }
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Falta nombre, teléfono, barbero u hora
/// - `404 Not Found`: El barbero no existe en la agenda
/// - `503 Service Unavailable`: No se pudo leer o guardar la agenda
#[post("/bookings")]
async fn make_booking(
    state: web::Data<AppState>,
    data: web::Json<MakeBooking>,
) -> AppResult<impl Responder> {
    let data = data.into_inner();

    let mut session = state.start_session().await?;
    if let Some(code) = data.barber_code {
        session.select_barber(code);
    }
    session.set_day(data.day.unwrap_or(Day::Today));
    if let Some(time) = data.time {
        session.select_time(time);
    }

    let confirmation = session
        .confirm(&data.client_name, &data.client_phone)
        .await
        .log_error_level(tracing::Level::WARN)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Reserva creada correctamente",
        "reservation": confirmation
    })))
}

/// Configura las rutas de reservas
///
/// - `POST /bookings` - Crear nueva reserva
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(make_booking);
}
