//! # API de Barberos
//!
//! - Listado de barberos
//! - Turnos abiertos de un barbero para hoy o mañana

use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult, AppState};
use crate::booking::model::BarberSchedule;
use crate::booking::slots::time_label;
use crate::booking::{BarberCode, Day, TimeValue};

#[derive(Serialize)]
struct BarberInfo {
    code: BarberCode,
    name: String,
    rating: f64,
}

impl From<&BarberSchedule> for BarberInfo {
    fn from(barber: &BarberSchedule) -> Self {
        BarberInfo {
            code: barber.code,
            name: barber.name.clone(),
            rating: barber.rating,
        }
    }
}

/// Parámetros de consulta para los turnos
#[derive(Deserialize)]
struct SlotsQuery {
    /// `today` (por defecto) o `tomorrow`
    day: Option<Day>,
}

#[derive(Serialize)]
struct SlotView {
    value: TimeValue,
    label: String,
}

#[derive(Serialize)]
struct SlotsResponse {
    barber_code: BarberCode,
    barber: String,
    day: Day,
    slots: Vec<SlotView>,
}

/// Lista los barberos de la agenda actual
///
/// # Respuesta
/// ```json
/// [{ "code": 0, "name": "Жарко", "rating": 4.5 }]
/// ```
///
/// # Errores
/// - `503 Service Unavailable`: No se pudo leer la agenda
#[get("/barbers")]
async fn list_barbers(state: web::Data<AppState>) -> AppResult<impl Responder> {
    let session = state.start_session().await?;
    let barbers: Vec<BarberInfo> = session
        .document()
        .barbers
        .iter()
        .map(BarberInfo::from)
        .collect();

    Ok(HttpResponse::Ok().json(barbers))
}

/// Turnos abiertos de un barbero
///
/// # Respuesta
/// ```json
/// {
///   "barber_code": 1,
///   "barber": "Паче",
///   "day": "tomorrow",
///   "slots": [{ "value": 900, "label": "9:00" }]
/// }
/// ```
///
/// # Errores
/// - `404 Not Found`: El barbero no existe
/// - `400 Bad Request`: Día o código inválidos
/// - `503 Service Unavailable`: No se pudo leer la agenda
#[get("/barbers/{code}/slots")]
async fn barber_slots(
    state: web::Data<AppState>,
    path: web::Path<BarberCode>,
    query: web::Query<SlotsQuery>,
) -> AppResult<impl Responder> {
    let code = path.into_inner();
    let day = query.day.unwrap_or(Day::Today);

    let mut session = state.start_session().await?;
    let barber = session
        .document()
        .barber(code)
        .map(|b| b.name.clone())
        .ok_or_else(|| AppError::not_found_id("Barbero", &code.to_string()))?;

    session.select_barber(code);
    let slots = session
        .set_day(day)
        .into_iter()
        .map(|value| SlotView {
            value,
            label: time_label(value),
        })
        .collect();

    Ok(HttpResponse::Ok().json(SlotsResponse {
        barber_code: code,
        barber,
        day,
        slots,
    }))
}

/// Configura las rutas de barberos
///
/// - `GET /barbers` - Listar barberos
/// - `GET /barbers/{code}/slots?day=today|tomorrow` - Turnos abiertos
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_barbers);
    cfg.service(barber_slots);
}
