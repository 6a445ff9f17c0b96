//! # Modelo del documento de agenda
//!
//! El estado compartido completo vive en un único documento remoto que se lee
//! y se sobrescribe entero. Las claves persistidas conservan los nombres del
//! cliente web existente (`frizeri`, `musterije`, `datum`) para que los
//! documentos ya guardados sigan siendo legibles.
//!
//! La decodificación es tolerante: un campo con forma incorrecta se sustituye
//! por su valor por defecto en lugar de rechazar el documento entero. Las
//! entradas que no se pueden interpretar (un barbero sin `sifra`, una reserva
//! sin hora, una lista de turnos desordenada) no se pierden: se conservan tal
//! como llegaron y se vuelven a escribir en el siguiente guardado.

use chrono::NaiveDate;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Valor horario de un turno (`900` = 09:00).
pub type TimeValue = u32;

/// Código estable que identifica a un barbero.
pub type BarberCode = u32;

/// Documento tal como llega del almacén remoto, sin validar.
pub type RawDocument = Value;

/// Plantilla diaria fija: doce turnos, uno por hora, de 09:00 a 20:00.
pub const WORK_HOURS: [TimeValue; 12] = [
    900, 1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700, 1800, 1900, 2000,
];

/// Plantilla de barberos usada al crear o reiniciar el documento.
const DEFAULT_ROSTER: [(&str, f64, BarberCode); 4] = [
    ("Жарко", 4.5, 0),
    ("Паче", 4.7, 1),
    ("Петра", 3.9, 2),
    ("Стефан", 4.3, 3),
];

/// Día elegido para una reserva, relativo a la fecha guardada del documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    /// Marca persistida: 0 = hoy, 1 = mañana.
    pub fn flag(self) -> u8 {
        match self {
            Day::Today => 0,
            Day::Tomorrow => 1,
        }
    }

    /// Cualquier marca distinta de cero se considera "mañana".
    fn from_stored(value: &Value) -> Day {
        match as_number(value) {
            Some(flag) if flag == 0 => Day::Today,
            _ => Day::Tomorrow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Today => "today",
            Day::Tomorrow => "tomorrow",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disponibilidad de un barbero para hoy y mañana.
///
/// Una lista en `None` significa que el documento almacenado traía algo que
/// no era una secuencia ordenada de horas; se conserva así hasta la próxima
/// rotación, que la sustituye por la plantilla. El valor original queda en
/// `unreadable` y es lo que se escribe mientras la lista siga en `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarberSchedule {
    pub name: String,
    pub rating: f64,
    pub today_slots: Option<Vec<TimeValue>>,
    pub tomorrow_slots: Option<Vec<TimeValue>>,
    pub code: BarberCode,
    pub unreadable: UnreadableSlots,
}

/// Valores originales de `dani`/`sutra` que no eran listas de turnos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnreadableSlots {
    pub today: Option<Value>,
    pub tomorrow: Option<Value>,
}

impl Serialize for BarberSchedule {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut state = s.serialize_struct("BarberSchedule", 5)?;
        state.serialize_field("ime", &self.name)?;
        state.serialize_field("rejting", &self.rating)?;
        write_slots(&mut state, "dani", &self.today_slots, &self.unreadable.today)?;
        write_slots(&mut state, "sutra", &self.tomorrow_slots, &self.unreadable.tomorrow)?;
        state.serialize_field("sifra", &self.code)?;
        state.end()
    }
}

fn write_slots<S: SerializeStruct>(
    state: &mut S,
    key: &'static str,
    slots: &Option<Vec<TimeValue>>,
    unreadable: &Option<Value>,
) -> Result<(), S::Error> {
    match (slots, unreadable) {
        (Some(slots), _) => state.serialize_field(key, slots),
        (None, Some(raw)) => state.serialize_field(key, raw),
        (None, None) => state.skip_field(key),
    }
}

impl BarberSchedule {
    pub fn with_full_availability(name: &str, rating: f64, code: BarberCode) -> Self {
        Self {
            name: name.to_string(),
            rating,
            today_slots: Some(WORK_HOURS.to_vec()),
            tomorrow_slots: Some(WORK_HOURS.to_vec()),
            code,
            unreadable: UnreadableSlots::default(),
        }
    }

    /// Turnos abiertos del día indicado; vacío si la lista es inválida.
    pub fn slots(&self, day: Day) -> &[TimeValue] {
        let slots = match day {
            Day::Today => &self.today_slots,
            Day::Tomorrow => &self.tomorrow_slots,
        };
        slots.as_deref().unwrap_or(&[])
    }

    pub fn slots_mut(&mut self, day: Day) -> Option<&mut Vec<TimeValue>> {
        match day {
            Day::Today => self.today_slots.as_mut(),
            Day::Tomorrow => self.tomorrow_slots.as_mut(),
        }
    }
}

/// Registro de una reserva confirmada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    #[serde(rename = "ime")]
    pub client_name: String,
    #[serde(rename = "brojt")]
    pub client_phone: String,
    #[serde(rename = "vreme", serialize_with = "serialize_time_as_text")]
    pub time_value: TimeValue,
    #[serde(rename = "fri")]
    pub barber_code: BarberCode,
    #[serde(rename = "dan", serialize_with = "serialize_day_flag")]
    pub day: Day,
}

fn serialize_time_as_text<S: Serializer>(value: &TimeValue, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}

fn serialize_day_flag<S: Serializer>(day: &Day, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(day.flag())
}

/// Estado compartido completo. Se persiste siempre como una unidad.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDocument {
    pub barbers: Vec<BarberSchedule>,
    /// Ordenadas por `time_value` ascendente.
    pub reservations: Vec<Reservation>,
    pub stored_date: NaiveDate,
    /// Se escriben al final de `frizeri` y `musterije`.
    pub retained: RetainedEntries,
}

/// Entradas del documento remoto que no se pudieron interpretar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetainedEntries {
    pub barbers: Vec<Value>,
    pub reservations: Vec<Value>,
}

impl RetainedEntries {
    /// Paso de un día sobre las entradas conservadas, igual que en las
    /// legibles: `sutra` pasa a `dani` y las reservas de hoy desaparecen.
    pub fn rotate(self) -> Self {
        let barbers = self
            .barbers
            .into_iter()
            .map(|mut entry| {
                if let Some(fields) = entry.as_object_mut() {
                    let today = match fields.remove("sutra") {
                        Some(Value::Array(slots)) => Value::Array(slots),
                        _ => template_value(),
                    };
                    fields.insert("dani".to_string(), today);
                    fields.insert("sutra".to_string(), template_value());
                }
                entry
            })
            .collect();

        let reservations = self
            .reservations
            .into_iter()
            .filter_map(|mut entry| {
                let day = entry.get("dan").map_or(Day::Tomorrow, Day::from_stored);
                if day == Day::Today {
                    return None;
                }
                if let Some(fields) = entry.as_object_mut() {
                    fields.insert("dan".to_string(), Value::from(Day::Today.flag()));
                }
                Some(entry)
            })
            .collect();

        Self {
            barbers,
            reservations,
        }
    }
}

fn template_value() -> Value {
    Value::from(WORK_HOURS.to_vec())
}

impl Serialize for ScheduleDocument {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut state = s.serialize_struct("ScheduleDocument", 3)?;
        state.serialize_field("frizeri", &Chained(&self.barbers, &self.retained.barbers))?;
        state.serialize_field(
            "musterije",
            &Chained(&self.reservations, &self.retained.reservations),
        )?;
        // `NaiveDate` se serializa como `%Y-%m-%d`
        state.serialize_field("datum", &self.stored_date)?;
        state.end()
    }
}

/// Lista persistida: las entradas legibles seguidas de las conservadas.
struct Chained<'a, T>(&'a [T], &'a [Value]);

impl<T: Serialize> Serialize for Chained<'_, T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(self.0.len() + self.1.len()))?;
        for entry in self.0 {
            seq.serialize_element(entry)?;
        }
        for raw in self.1 {
            seq.serialize_element(raw)?;
        }
        seq.end()
    }
}

impl ScheduleDocument {
    /// Documento con disponibilidad completa y sin reservas.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            barbers: default_barbers(),
            reservations: Vec::new(),
            stored_date: today,
            retained: RetainedEntries::default(),
        }
    }

    pub fn barber(&self, code: BarberCode) -> Option<&BarberSchedule> {
        self.barbers.iter().find(|b| b.code == code)
    }

    pub fn barber_mut(&mut self, code: BarberCode) -> Option<&mut BarberSchedule> {
        self.barbers.iter_mut().find(|b| b.code == code)
    }
}

pub fn default_barbers() -> Vec<BarberSchedule> {
    DEFAULT_ROSTER
        .iter()
        .map(|(name, rating, code)| BarberSchedule::with_full_availability(name, *rating, *code))
        .collect()
}

/// Contenido de un documento remoto ya decodificado, antes de normalizar.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub barbers: Vec<BarberSchedule>,
    pub reservations: Vec<Reservation>,
    /// `None` si falta o no es una fecha ISO válida.
    pub stored_date: Option<NaiveDate>,
    pub retained: RetainedEntries,
}

#[derive(Deserialize)]
struct StoredBarber {
    #[serde(rename = "ime", default)]
    name: String,
    #[serde(rename = "rejting", default)]
    rating: f64,
    #[serde(rename = "dani", default)]
    today: Value,
    #[serde(rename = "sutra", default)]
    tomorrow: Value,
    #[serde(rename = "sifra")]
    code: BarberCode,
}

#[derive(Deserialize)]
struct StoredReservation {
    #[serde(rename = "ime", default)]
    client_name: String,
    #[serde(rename = "brojt", default)]
    client_phone: String,
    #[serde(rename = "vreme", default)]
    time_value: Value,
    #[serde(rename = "fri")]
    barber_code: BarberCode,
    #[serde(rename = "dan", default)]
    day: Value,
}

impl StoredDocument {
    /// Decodifica un documento remoto aplicando los valores por defecto
    /// campo a campo.
    pub fn decode(raw: &RawDocument) -> Self {
        let mut retained = RetainedEntries::default();

        let barbers = match raw.get("frizeri").and_then(Value::as_array) {
            Some(entries) => entries
                .iter()
                .filter_map(|entry| match decode_barber(entry) {
                    Some(barber) => Some(barber),
                    None => {
                        retained.barbers.push(entry.clone());
                        None
                    }
                })
                .collect(),
            None => {
                tracing::warn!("Documento sin lista de barberos, usando la plantilla");
                default_barbers()
            }
        };

        let reservations = match raw.get("musterije").and_then(Value::as_array) {
            Some(entries) => entries
                .iter()
                .filter_map(|entry| match decode_reservation(entry) {
                    Some(reservation) => Some(reservation),
                    None => {
                        retained.reservations.push(entry.clone());
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let stored_date = raw
            .get("datum")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        Self {
            barbers,
            reservations,
            stored_date,
            retained,
        }
    }
}

fn decode_barber(entry: &Value) -> Option<BarberSchedule> {
    let stored = match serde_json::from_value::<StoredBarber>(entry.clone()) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Barbero ilegible, se conserva sin cambios");
            return None;
        }
    };

    let today_slots = decode_slots(&stored.today);
    let tomorrow_slots = decode_slots(&stored.tomorrow);
    let unreadable = UnreadableSlots {
        today: today_slots.is_none().then_some(stored.today).filter(|v| !v.is_null()),
        tomorrow: tomorrow_slots.is_none().then_some(stored.tomorrow).filter(|v| !v.is_null()),
    };

    Some(BarberSchedule {
        name: stored.name,
        rating: stored.rating,
        today_slots,
        tomorrow_slots,
        code: stored.code,
        unreadable,
    })
}

fn decode_reservation(entry: &Value) -> Option<Reservation> {
    let stored = match serde_json::from_value::<StoredReservation>(entry.clone()) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Reserva ilegible, se conserva sin cambios");
            return None;
        }
    };

    let Some(time_value) = as_time_value(&stored.time_value) else {
        tracing::warn!(vreme = %stored.time_value, "Reserva con hora inválida, se conserva sin cambios");
        return None;
    };

    Some(Reservation {
        client_name: stored.client_name,
        client_phone: stored.client_phone,
        time_value,
        barber_code: stored.barber_code,
        day: Day::from_stored(&stored.day),
    })
}

/// Una lista de turnos válida es una secuencia estrictamente ascendente de
/// horas enteras.
fn decode_slots(value: &Value) -> Option<Vec<TimeValue>> {
    let slots = value
        .as_array()?
        .iter()
        .map(as_time_value)
        .collect::<Option<Vec<_>>>()?;

    if slots.windows(2).all(|w| w[0] < w[1]) {
        Some(slots)
    } else {
        None
    }
}

fn as_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0)
        .map(|f| f as u64)
}

/// Acepta números y también cadenas numéricas (`"900"`).
fn as_time_value(value: &Value) -> Option<TimeValue> {
    let number = match value {
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        other => as_number(other)?,
    };
    TimeValue::try_from(number).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn defaults_have_four_barbers_with_full_template() {
        let doc = ScheduleDocument::with_defaults(date("2026-10-19"));
        assert_eq!(doc.barbers.len(), 4);
        for (i, barber) in doc.barbers.iter().enumerate() {
            assert_eq!(barber.code, i as BarberCode);
            assert_eq!(barber.slots(Day::Today), &WORK_HOURS);
            assert_eq!(barber.slots(Day::Tomorrow), &WORK_HOURS);
        }
        assert!(doc.reservations.is_empty());
    }

    #[test]
    fn serializes_with_legacy_keys() {
        let mut doc = ScheduleDocument::with_defaults(date("2026-10-19"));
        doc.reservations.push(Reservation {
            client_name: "A".into(),
            client_phone: "555".into(),
            time_value: 900,
            barber_code: 0,
            day: Day::Tomorrow,
        });

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["datum"], json!("2026-10-19"));
        assert_eq!(value["frizeri"][1]["sifra"], json!(1));
        assert_eq!(value["frizeri"][1]["dani"][0], json!(900));
        assert_eq!(
            value["musterije"][0],
            json!({"ime": "A", "brojt": "555", "vreme": "900", "fri": 0, "dan": 1})
        );
    }

    #[test]
    fn decode_accepts_string_and_numeric_times() {
        let raw = json!({
            "frizeri": [{"ime": "X", "rejting": 4.0, "dani": [900, 1000], "sutra": [1100], "sifra": 7}],
            "musterije": [
                {"ime": "A", "brojt": "1", "vreme": "900", "fri": 7, "dan": 0},
                {"ime": "B", "brojt": "2", "vreme": 1000, "fri": 7, "dan": 1}
            ],
            "datum": "2026-10-18"
        });

        let stored = StoredDocument::decode(&raw);
        assert_eq!(stored.barbers[0].code, 7);
        assert_eq!(stored.barbers[0].slots(Day::Today), &[900, 1000]);
        assert_eq!(stored.reservations[0].time_value, 900);
        assert_eq!(stored.reservations[0].day, Day::Today);
        assert_eq!(stored.reservations[1].time_value, 1000);
        assert_eq!(stored.reservations[1].day, Day::Tomorrow);
        assert_eq!(stored.stored_date, Some(date("2026-10-18")));
    }

    #[test]
    fn decode_falls_back_on_malformed_fields() {
        let raw = json!({
            "frizeri": "not a list",
            "musterije": {"oops": true},
            "datum": "2026-19-10"
        });

        let stored = StoredDocument::decode(&raw);
        assert_eq!(stored.barbers, default_barbers());
        assert!(stored.reservations.is_empty());
        assert_eq!(stored.stored_date, None);
    }

    #[test]
    fn unordered_or_non_numeric_slots_are_marked_malformed() {
        let raw = json!({
            "frizeri": [
                {"ime": "X", "rejting": 4.0, "dani": [1000, 900], "sutra": "x", "sifra": 0}
            ]
        });

        let stored = StoredDocument::decode(&raw);
        assert_eq!(stored.barbers[0].today_slots, None);
        assert_eq!(stored.barbers[0].tomorrow_slots, None);
        assert!(stored.barbers[0].slots(Day::Today).is_empty());
    }

    #[test]
    fn unreadable_reservations_are_retained_verbatim() {
        let raw = json!({
            "musterije": [
                {"ime": "A", "brojt": "1", "vreme": "nine", "fri": 0, "dan": 0},
                {"ime": "B", "brojt": "2", "vreme": "1000", "fri": 0, "dan": 0},
                {"ime": "C"}
            ]
        });

        let stored = StoredDocument::decode(&raw);
        assert_eq!(stored.reservations.len(), 1);
        assert_eq!(stored.reservations[0].client_name, "B");
        assert_eq!(
            stored.retained.reservations,
            vec![raw["musterije"][0].clone(), raw["musterije"][2].clone()]
        );
    }

    #[test]
    fn one_unreadable_barber_does_not_replace_the_roster() {
        let raw = json!({
            "frizeri": [
                {"ime": "Жарко", "rejting": 4.5, "dani": [1000], "sutra": [900], "sifra": 0},
                {"ime": "Паче", "rejting": 4.7, "dani": [900]}
            ]
        });

        let stored = StoredDocument::decode(&raw);
        assert_eq!(stored.barbers.len(), 1);
        assert_eq!(stored.barbers[0].code, 0);
        assert_eq!(stored.barbers[0].slots(Day::Today), &[1000]);
        assert_eq!(stored.retained.barbers, vec![raw["frizeri"][1].clone()]);
    }

    #[test]
    fn retained_entries_are_written_back_unchanged() {
        let raw = json!({
            "frizeri": [
                {"ime": "X", "rejting": 4.0, "dani": [1000, 900], "sutra": [900], "sifra": 0},
                {"ime": "Y"}
            ],
            "musterije": [
                {"ime": "A", "brojt": "1", "vreme": "nine", "fri": 0, "dan": 1}
            ],
            "datum": "2026-10-19"
        });
        let stored = StoredDocument::decode(&raw);
        let doc = ScheduleDocument {
            barbers: stored.barbers,
            reservations: stored.reservations,
            stored_date: date("2026-10-19"),
            retained: stored.retained,
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["frizeri"][0]["dani"], json!([1000, 900]));
        assert_eq!(value["frizeri"][0]["sutra"], json!([900]));
        assert_eq!(value["frizeri"][1], json!({"ime": "Y"}));
        assert_eq!(value["musterije"], raw["musterije"]);
    }

    #[test]
    fn retained_entries_rotate_like_readable_ones() {
        let retained = RetainedEntries {
            barbers: vec![json!({"ime": "Y", "dani": [900], "sutra": [1100, 1200]})],
            reservations: vec![
                json!({"ime": "A", "vreme": "nine", "fri": 0, "dan": 0}),
                json!({"ime": "B", "vreme": "ten", "fri": 0, "dan": 1}),
            ],
        };

        let rotated = retained.rotate();

        assert_eq!(rotated.barbers[0]["dani"], json!([1100, 1200]));
        assert_eq!(rotated.barbers[0]["sutra"], json!(WORK_HOURS));
        assert_eq!(
            rotated.reservations,
            vec![json!({"ime": "B", "vreme": "ten", "fri": 0, "dan": 0})]
        );
    }
}
