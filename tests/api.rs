use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use chrono::NaiveDate;
use serde_json::{json, Value};

use salon_booking::api::{self, AppState};
use salon_booking::booking::FixedClock;
use salon_booking::db::InMemoryStore;

fn state(store: Arc<InMemoryStore>) -> AppState {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    AppState::new(store, Arc::new(FixedClock(today)))
}

#[actix_web::test]
async fn lists_barbers_and_their_open_slots() {
    let store = Arc::new(InMemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store)))
            .configure(api::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/barbers").to_request();
    let barbers: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(barbers.as_array().map(Vec::len), Some(4));
    assert_eq!(barbers[1]["code"], 1);

    let req = test::TestRequest::get()
        .uri("/barbers/1/slots?day=tomorrow")
        .to_request();
    let slots: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slots["day"], "tomorrow");
    assert_eq!(slots["slots"][0], json!({"value": 900, "label": "9:00"}));
    assert_eq!(slots["slots"].as_array().map(Vec::len), Some(12));
}

#[actix_web::test]
async fn unknown_barber_and_bad_day_are_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store)))
            .configure(api::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/barbers/9/slots").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/barbers/1/slots?day=yesterday")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn booking_is_persisted_and_slot_disappears() {
    let store = Arc::new(InMemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone())))
            .configure(api::init_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(json!({
            "barber_code": 0,
            "day": "today",
            "time": 900,
            "client_name": "A",
            "client_phone": "555"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["reservation"]["barber_code"], 0);
    assert_eq!(body["reservation"]["label"], "9:00");

    let saved = store.snapshot().unwrap();
    assert_eq!(saved["musterije"][0]["vreme"], "900");

    let req = test::TestRequest::get().uri("/barbers/0/slots").to_request();
    let slots: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slots["slots"][0]["value"], 1000);
}

#[actix_web::test]
async fn booking_errors_use_the_api_error_format() {
    let store = Arc::new(InMemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone())))
            .configure(api::init_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(json!({"barber_code": 0, "time": 900, "client_name": " ", "client_phone": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Error de validación");

    store.set_fail_saves(true);
    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(json!({"barber_code": 0, "time": 900, "client_name": "A", "client_phone": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn health_check_answers_ok() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(Arc::new(InMemoryStore::new()))))
            .configure(api::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_web::test]
async fn load_outage_is_reported_and_leaves_the_remote_document_alone() {
    let seeded = json!({
        "frizeri": [
            {"ime": "Жарко", "rejting": 4.5, "dani": [1000], "sutra": [900], "sifra": 0},
            {"ime": "Стефан", "rejting": 4.3, "dani": [1500], "sutra": [900], "sifra": 3}
        ],
        "musterije": [
            {"ime": "A", "brojt": "1", "vreme": "900", "fri": 0, "dan": 0},
            {"ime": "B", "brojt": "2", "vreme": "1100", "fri": 0, "dan": 0},
            {"ime": "C", "brojt": "3", "vreme": "1200", "fri": 3, "dan": 0}
        ],
        "datum": "2026-10-19"
    });
    let store = Arc::new(InMemoryStore::with_document(seeded.clone()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone())))
            .configure(api::init_routes),
    )
    .await;
    store.set_fail_loads(true);

    for uri in ["/barbers", "/barbers/0/slots"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
    }

    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(json!({"barber_code": 3, "time": 1500, "client_name": "D", "client_phone": "4"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Almacén no disponible");

    assert_eq!(store.save_count(), 0);
    assert_eq!(store.snapshot(), Some(seeded));

    store.set_fail_loads(false);
    let req = test::TestRequest::get().uri("/barbers/0/slots").to_request();
    let slots: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slots["slots"], json!([{"value": 1000, "label": "10:00"}]));
}
