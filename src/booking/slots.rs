use super::model::{BarberCode, Day, ScheduleDocument, TimeValue};

/// Turnos abiertos de un barbero para el día elegido.
///
/// Sin barbero seleccionado, con un código desconocido o con una lista de
/// turnos inválida el resultado es vacío. Siempre refleja el documento en
/// memoria tal como está.
pub fn open_slots(
    document: &ScheduleDocument,
    barber: Option<BarberCode>,
    day: Day,
) -> &[TimeValue] {
    barber
        .and_then(|code| document.barber(code))
        .map(|b| b.slots(day))
        .unwrap_or(&[])
}

/// Etiqueta para mostrar una hora (`900` -> `"9:00"`).
pub fn time_label(time: TimeValue) -> String {
    format!("{}:{:02}", time / 100, time % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::WORK_HOURS;
    use chrono::NaiveDate;

    fn document() -> ScheduleDocument {
        ScheduleDocument::with_defaults(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn no_selection_or_unknown_barber_yields_nothing() {
        let doc = document();
        assert!(open_slots(&doc, None, Day::Today).is_empty());
        assert!(open_slots(&doc, Some(42), Day::Tomorrow).is_empty());
    }

    #[test]
    fn picks_the_list_for_the_chosen_day() {
        let mut doc = document();
        doc.barbers[2].tomorrow_slots = Some(vec![1500, 1600]);

        assert_eq!(open_slots(&doc, Some(2), Day::Today), &WORK_HOURS);
        assert_eq!(open_slots(&doc, Some(2), Day::Tomorrow), &[1500, 1600]);
    }

    #[test]
    fn malformed_list_yields_nothing() {
        let mut doc = document();
        doc.barbers[0].today_slots = None;
        assert!(open_slots(&doc, Some(0), Day::Today).is_empty());
    }

    #[test]
    fn labels_hours() {
        assert_eq!(time_label(900), "9:00");
        assert_eq!(time_label(2000), "20:00");
        assert_eq!(time_label(1330), "13:30");
    }
}
