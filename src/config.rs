use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_reports_per_min: u32,
    pub rate_ingest_per_min: u32,
    pub rate_admin_per_min: u32,

    // Report fan-out
    pub report_fetch_batch_size: usize,
    pub report_fetch_timeout_secs: u64,

    // Event stamping cutoffs
    pub late_check_in_cutoff: NaiveTime,
    pub overtime_check_out_cutoff: NaiveTime,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_reports_per_min: env::var("RATE_REPORTS_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_ingest_per_min: env::var("RATE_INGEST_PER_MIN")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap(),
            rate_admin_per_min: env::var("RATE_ADMIN_PER_MIN")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap(),

            report_fetch_batch_size: env::var("REPORT_FETCH_BATCH_SIZE")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .unwrap(),
            report_fetch_timeout_secs: env::var("REPORT_FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),

            late_check_in_cutoff: parse_cutoff("LATE_CHECK_IN_CUTOFF", "09:15"),
            overtime_check_out_cutoff: parse_cutoff("OVERTIME_CHECK_OUT_CUTOFF", "19:00"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }

    pub fn report_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.report_fetch_timeout_secs)
    }
}

fn parse_cutoff(var: &str, default: &str) -> NaiveTime {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .unwrap_or_else(|_| panic!("{} must be a HH:MM clock time, got '{}'", var, raw))
}
