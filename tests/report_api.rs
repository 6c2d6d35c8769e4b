//! End-to-end handler tests driving the full route tree over in-memory
//! providers.

use actix_web::web::Data;
use actix_web::{App, test};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::sync::Arc;

use attendance_server::config::Config;
use attendance_server::model::event::{AttendanceEvent, EventKind, EventStatus};
use attendance_server::model::user::UserRef;
use attendance_server::provider::memory::{
    InMemoryCalendarProvider, InMemoryEventStoreProvider, InMemoryLeaveLedgerProvider,
    InMemoryRosterProvider,
};
use attendance_server::provider::{
    CalendarProvider, EventStoreProvider, LeaveLedgerProvider, RosterProvider,
};
use attendance_server::report::month::MonthKey;
use attendance_server::report::service::{ReportOptions, ReportService};
use attendance_server::routes;

struct TestEnv {
    calendar: Arc<InMemoryCalendarProvider>,
    leaves: Arc<InMemoryLeaveLedgerProvider>,
    events: Arc<InMemoryEventStoreProvider>,
    roster: Arc<InMemoryRosterProvider>,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            calendar: Arc::new(InMemoryCalendarProvider::default()),
            leaves: Arc::new(InMemoryLeaveLedgerProvider::default()),
            events: Arc::new(InMemoryEventStoreProvider::default()),
            roster: Arc::new(InMemoryRosterProvider::default()),
        }
    }
}

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_addr: "127.0.0.1:0".to_string(),
        rate_reports_per_min: 1000,
        rate_ingest_per_min: 1000,
        rate_admin_per_min: 1000,
        report_fetch_batch_size: 4,
        report_fetch_timeout_secs: 5,
        late_check_in_cutoff: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        overtime_check_out_cutoff: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        api_prefix: "/api/v1".to_string(),
    }
}

macro_rules! init_app {
    ($env:expr) => {{
        let config = test_config();
        let service = Data::new(ReportService::new(
            $env.calendar.clone() as Arc<dyn CalendarProvider>,
            $env.leaves.clone() as Arc<dyn LeaveLedgerProvider>,
            $env.events.clone() as Arc<dyn EventStoreProvider>,
            $env.roster.clone() as Arc<dyn RosterProvider>,
            ReportOptions {
                fetch_batch_size: config.report_fetch_batch_size,
                fetch_timeout: config.report_fetch_timeout(),
            },
        ));
        let calendar_data: Data<dyn CalendarProvider> =
            Data::from($env.calendar.clone() as Arc<dyn CalendarProvider>);
        let leaves_data: Data<dyn LeaveLedgerProvider> =
            Data::from($env.leaves.clone() as Arc<dyn LeaveLedgerProvider>);
        let events_data: Data<dyn EventStoreProvider> =
            Data::from($env.events.clone() as Arc<dyn EventStoreProvider>);
        let roster_data: Data<dyn RosterProvider> =
            Data::from($env.roster.clone() as Arc<dyn RosterProvider>);
        let config_for_routes = config.clone();
        test::init_service(
            App::new()
                .app_data(Data::new(config))
                .app_data(service)
                .app_data(calendar_data)
                .app_data(leaves_data)
                .app_data(events_data)
                .app_data(roster_data)
                .configure(move |cfg| routes::configure(cfg, config_for_routes.clone())),
        )
        .await
    }};
}

fn get(uri: &str) -> actix_web::test::TestRequest {
    // Governor keys on the peer IP; test requests need one set.
    test::TestRequest::get()
        .uri(uri)
        .peer_addr("127.0.0.1:9999".parse().unwrap())
}

fn post_json(uri: &str, body: Value) -> actix_web::test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .set_json(body)
}

fn user(id: u64, zone: &str) -> UserRef {
    UserRef {
        id,
        name: format!("User {id}"),
        phone: Some(format!("+88017000000{id:02}")),
        role: "WH".to_string(),
        zone: Some(zone.to_string()),
        outlet: Some("Outlet 1".to_string()),
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

async fn seed_events(
    store: &InMemoryEventStoreProvider,
    user_id: u64,
    kind: EventKind,
    total: u32,
    flagged: u32,
    flag: EventStatus,
) {
    let plain = match kind {
        EventKind::CheckIn => EventStatus::OnTime,
        EventKind::CheckOut => EventStatus::Normal,
    };
    for i in 0..total {
        let event = AttendanceEvent {
            user_id,
            time: at(2025, 2, i + 1, 9, 0),
            kind,
            status: if i < flagged { flag } else { plain },
        };
        store.record(&event).await.unwrap();
    }
}

#[actix_web::test]
async fn summary_report_end_to_end() {
    let env = TestEnv::new();
    let month: MonthKey = "2025-02".parse().unwrap();
    env.calendar.set_working_days(month, 24).await.unwrap();
    env.roster.add_user(user(42, "RL"), Some("WH"));
    seed_events(&env.events, 42, EventKind::CheckIn, 26, 3, EventStatus::Late).await;
    seed_events(&env.events, 42, EventKind::CheckOut, 20, 2, EventStatus::Overtime).await;
    env.leaves.set_leaves(42, month, 1);

    let app = init_app!(env);
    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/reports/summary?month=2025-02&zone=RL").to_request(),
    )
    .await;

    assert_eq!(body["month"], "2025-02");
    assert_eq!(body["days_in_month"], 28);
    assert_eq!(body["working_days"], 24);

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "ready");
    assert_eq!(rows[0]["user"]["id"], 42);

    let summary = &rows[0]["summary"];
    assert_eq!(summary["total_check_ins"], 26);
    assert_eq!(summary["late_check_ins"], 3);
    assert_eq!(summary["late_check_outs"], 2);
    assert_eq!(summary["approved_leaves"], 1);
    assert_eq!(summary["extra_days"], 2);
    assert_eq!(summary["holidays"], 2);
    assert_eq!(summary["absent"], 0);
    assert_eq!(summary["late_adjustment"], 1);
}

#[actix_web::test]
async fn missing_calendar_degrades_derived_fields() {
    let env = TestEnv::new();
    env.roster.add_user(user(1, "RL"), Some("WH"));
    seed_events(&env.events, 1, EventKind::CheckIn, 10, 4, EventStatus::Late).await;

    let app = init_app!(env);
    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/reports/summary?month=2025-02").to_request(),
    )
    .await;

    assert_eq!(body["working_days"], Value::Null);
    let summary = &body["rows"][0]["summary"];
    assert_eq!(summary["total_check_ins"], 10);
    assert_eq!(summary["late_check_ins"], 4);
    assert_eq!(summary["holidays"], Value::Null);
    assert_eq!(summary["absent"], Value::Null);
    assert_eq!(summary["extra_days"], Value::Null);
    assert_eq!(summary["late_adjustment"], 4);
}

#[actix_web::test]
async fn daily_grid_has_one_slot_per_day() {
    let env = TestEnv::new();
    env.roster.add_user(user(1, "RL"), Some("WH"));
    let event = AttendanceEvent {
        user_id: 1,
        time: at(2025, 6, 15, 9, 7),
        kind: EventKind::CheckIn,
        status: EventStatus::OnTime,
    };
    env.events.record(&event).await.unwrap();

    let app = init_app!(env);
    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/reports/daily?month=2025-06").to_request(),
    )
    .await;

    assert_eq!(body["days_in_month"], 30);
    let days = body["rows"][0]["days"].as_object().unwrap();
    assert_eq!(days.len(), 30);
    assert_eq!(days["15"]["in"], "09:07 AM");
    assert_eq!(days["15"]["out"], "");
    assert_eq!(days["16"]["in"], "");
}

#[actix_web::test]
async fn failed_row_keeps_roster_order() {
    let env = TestEnv::new();
    let month: MonthKey = "2025-02".parse().unwrap();
    env.calendar.set_working_days(month, 24).await.unwrap();
    for id in [1, 2, 3] {
        env.roster.add_user(user(id, "RL"), Some("WH"));
    }
    env.events.fail_user(2);

    let app = init_app!(env);
    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/reports/summary?month=2025-02&zone=RL").to_request(),
    )
    .await;

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["user"]["id"], 1);
    assert_eq!(rows[1]["user"]["id"], 2);
    assert_eq!(rows[2]["user"]["id"], 3);
    assert_eq!(rows[0]["status"], "ready");
    assert_eq!(rows[1]["status"], "failed");
    assert_eq!(rows[2]["status"], "ready");
    assert!(
        rows[1]["error"]
            .as_str()
            .unwrap()
            .contains("event store unavailable")
    );
}

#[actix_web::test]
async fn empty_roster_yields_empty_report() {
    let env = TestEnv::new();
    let app = init_app!(env);
    let resp = test::call_service(
        &app,
        get("/api/v1/reports/summary?month=2025-02&zone=Nowhere").to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn malformed_month_is_rejected() {
    let env = TestEnv::new();
    let app = init_app!(env);
    for uri in [
        "/api/v1/reports/summary?month=2025-2",
        "/api/v1/reports/daily?month=February",
        "/api/v1/working-days?month=2025-13",
    ] {
        let resp = test::call_service(&app, get(uri).to_request()).await;
        assert_eq!(resp.status(), 400, "{uri}");
    }
}

#[actix_web::test]
async fn working_days_write_boundary_validates_range() {
    let env = TestEnv::new();
    let app = init_app!(env);

    for bad in [0, 32, 40] {
        let resp = test::call_service(
            &app,
            post_json(
                "/api/v1/working-days",
                serde_json::json!({ "month": "2025-02", "working_days": bad }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400, "working_days={bad}");
    }

    let resp = test::call_service(&app, get("/api/v1/working-days?month=2025-02").to_request()).await;
    assert_eq!(resp.status(), 404);

    let resp = test::call_service(
        &app,
        post_json(
            "/api/v1/working-days",
            serde_json::json!({ "month": "2025-02", "working_days": 24 }),
        )
        .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/working-days?month=2025-02").to_request(),
    )
    .await;
    assert_eq!(body["month"], "2025-02");
    assert_eq!(body["working_days"], 24);

    let entries: Value =
        test::call_and_read_body_json(&app, get("/api/v1/working-days/year/2025").to_request())
            .await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn check_in_is_stamped_late_after_cutoff() {
    let env = TestEnv::new();
    let app = init_app!(env);

    let body: Value = test::call_and_read_body_json(
        &app,
        post_json(
            "/api/v1/attendance/check-in",
            serde_json::json!({ "user_id": 42, "at": "2025-02-03T09:30:00" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["status"], "late");

    let body: Value = test::call_and_read_body_json(
        &app,
        post_json(
            "/api/v1/attendance/check-in",
            serde_json::json!({ "user_id": 42, "at": "2025-02-04T09:00:00" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["status"], "on_time");

    let body: Value = test::call_and_read_body_json(
        &app,
        post_json(
            "/api/v1/attendance/check-out",
            serde_json::json!({ "user_id": 42, "at": "2025-02-03T19:30:00" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["status"], "overtime");

    let events: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/attendance/check-ins/42?month=2025-02").to_request(),
    )
    .await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["status"], "late");
    assert_eq!(events[1]["status"], "on_time");
}

#[actix_web::test]
async fn leave_read_surface() {
    let env = TestEnv::new();
    let month: MonthKey = "2025-02".parse().unwrap();
    env.leaves.set_leaves(42, month, 2);
    env.leaves.set_pending(3);

    let app = init_app!(env);
    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/v1/leave/user/42/monthly?month=2025-02").to_request(),
    )
    .await;
    assert_eq!(body["leave_days"], 2);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/leave/pending-count").to_request()).await;
    assert_eq!(body["pending_count"], 3);
}

#[actix_web::test]
async fn roster_listing_filters_by_zone() {
    let env = TestEnv::new();
    env.roster.add_user(user(1, "RL"), Some("WH"));
    env.roster.add_user(user(2, "Damage"), Some("WH"));

    let app = init_app!(env);
    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/roster?zone=RL").to_request()).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], 1);
}

#[actix_web::test]
async fn summary_export_is_a_spreadsheet_attachment() {
    let env = TestEnv::new();
    let month: MonthKey = "2025-02".parse().unwrap();
    env.calendar.set_working_days(month, 24).await.unwrap();
    env.roster.add_user(user(42, "RL"), Some("WH"));
    seed_events(&env.events, 42, EventKind::CheckIn, 5, 1, EventStatus::Late).await;

    let app = init_app!(env);
    let resp = test::call_service(
        &app,
        get("/api/v1/reports/summary/export?month=2025-02").to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(
        resp.headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Monthly_Report_2025-02.xlsx")
    );
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..2], b"PK");

    let resp = test::call_service(
        &app,
        get("/api/v1/reports/daily/export?month=2025-02").to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..2], b"PK");
}
