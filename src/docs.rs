use crate::api::attendance::RecordEventRequest;
use crate::api::working_days::SetWorkingDays;
use crate::model::event::{AttendanceEvent, EventKind, EventStatus};
use crate::model::user::UserRef;
use crate::model::working_days::WorkingDaysEntry;
use crate::report::daily::DaySlot;
use crate::report::service::{DailyGridReport, DailyGridRow, MonthlySummaryReport, SummaryRow};
use crate::report::summary::UserMonthlySummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Reporting API",
        version = "1.0.0",
        description = r#"
## Workforce Attendance Reporting

This API renders check-in/check-out events, a per-month working-days calendar
and approved-leave counts into admin-facing monthly reports for a zoned
outlet/warehouse organization.

### 🔹 Key Features
- **Monthly Summary Reports**
  - Per-user derived counters: holidays, absences, extra days, late adjustment
- **Daily Grid Reports**
  - One In/Out slot per calendar day per user
- **Spreadsheet Export**
  - Both reports downloadable as xlsx workbooks
- **Attendance Ingestion**
  - Check-in/check-out recording with automatic late/overtime stamping
- **Working Days Calendar**
  - Per-month expected working-day configuration

### 📦 Response Format
- JSON-based RESTful responses
- A month without a working-days entry degrades derived fields to null
  instead of failing the report
- A roster member whose data fetch fails yields a per-row `failed` marker;
  the rest of the report still renders

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::reports::monthly_summary,
        crate::api::reports::monthly_summary_export,
        crate::api::reports::daily_grid,
        crate::api::reports::daily_grid_export,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_check_ins,
        crate::api::attendance::list_check_outs,

        crate::api::working_days::get_working_days,
        crate::api::working_days::year_working_days,
        crate::api::working_days::set_working_days,

        crate::api::leave::monthly_leaves,
        crate::api::leave::pending_count,

        crate::api::roster::list_roster
    ),
    components(
        schemas(
            AttendanceEvent,
            EventKind,
            EventStatus,
            RecordEventRequest,
            UserRef,
            WorkingDaysEntry,
            SetWorkingDays,
            UserMonthlySummary,
            DaySlot,
            SummaryRow,
            DailyGridRow,
            MonthlySummaryReport,
            DailyGridReport
        )
    ),
    tags(
        (name = "Reports", description = "Monthly report assembly and export APIs"),
        (name = "Attendance", description = "Attendance event ingestion and raw reads"),
        (name = "Working Days", description = "Working-days calendar APIs"),
        (name = "Leave", description = "Approved-leave ledger read APIs"),
        (name = "Roster", description = "Roster listing APIs"),
    )
)]
pub struct ApiDoc;
