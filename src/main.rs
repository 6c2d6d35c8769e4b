use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use chrono::Datelike;
use dotenvy::dotenv;
use std::sync::Arc;

use attendance_server::config::Config;
use attendance_server::db::init_db;
use attendance_server::docs::ApiDoc;
use attendance_server::provider::mysql::{
    MySqlCalendarProvider, MySqlEventStoreProvider, MySqlLeaveLedgerProvider, MySqlRosterProvider,
    warmup_calendar_cache,
};
use attendance_server::provider::{
    CalendarProvider, EventStoreProvider, LeaveLedgerProvider, RosterProvider,
};
use attendance_server::report::service::{ReportOptions, ReportService};
use attendance_server::routes;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance reporting service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let pool_for_cache_warmup = pool.clone();
    actix_web::rt::spawn(async move {
        let year = chrono::Local::now().year();
        if let Err(e) = warmup_calendar_cache(&pool_for_cache_warmup, year).await {
            eprintln!("Failed to warmup calendar cache: {:?}", e);
        }
    });

    let calendar: Arc<dyn CalendarProvider> = Arc::new(MySqlCalendarProvider::new(pool.clone()));
    let leaves: Arc<dyn LeaveLedgerProvider> = Arc::new(MySqlLeaveLedgerProvider::new(pool.clone()));
    let events: Arc<dyn EventStoreProvider> = Arc::new(MySqlEventStoreProvider::new(pool.clone()));
    let roster: Arc<dyn RosterProvider> = Arc::new(MySqlRosterProvider::new(pool.clone()));

    let service = Data::new(ReportService::new(
        calendar.clone(),
        leaves.clone(),
        events.clone(),
        roster.clone(),
        ReportOptions {
            fetch_batch_size: config.report_fetch_batch_size,
            fetch_timeout: config.report_fetch_timeout(),
        },
    ));

    let calendar_data: Data<dyn CalendarProvider> = Data::from(calendar);
    let leaves_data: Data<dyn LeaveLedgerProvider> = Data::from(leaves);
    let events_data: Data<dyn EventStoreProvider> = Data::from(events);
    let roster_data: Data<dyn RosterProvider> = Data::from(roster);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(service.clone())
            .app_data(calendar_data.clone())
            .app_data(leaves_data.clone())
            .app_data(events_data.clone())
            .app_data(roster_data.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
