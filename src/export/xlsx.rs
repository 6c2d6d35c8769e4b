//! Spreadsheet serialization of the two report shapes.
//!
//! Format-only: the reports arrive fully computed and are written out cell
//! by cell. The daily grid gets a merged day-number header above each day's
//! In/Out column pair.

use crate::report::service::{DailyGridReport, DailyGridRow, MonthlySummaryReport, SummaryRow};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, XlsxError};

const SHEET_NAME: &str = "Monthly Report";

const SUMMARY_HEADERS: [&str; 13] = [
    "Name",
    "Number",
    "Role",
    "Zone",
    "Total Working Days",
    "Holidays",
    "Approved Leave",
    "Absent",
    "Extra Day",
    "Total Check-Ins",
    "Late Check-Ins (9:15 AM)",
    "Late Check-Outs (7:00 PM)",
    "Late Adjustment",
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
}

fn cell_format() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

/// Renders the summary report as a flat labeled table.
pub fn summary_workbook(report: &MonthlySummaryReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_fmt = header_format();
    let cell_fmt = cell_format();

    for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_fmt)?;
    }

    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        match row {
            SummaryRow::Ready { user, summary } => {
                worksheet.write_with_format(r, 0, user.name.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 1, user.phone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.write_with_format(r, 2, user.role.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 3, user.zone.as_deref().unwrap_or(""), &cell_fmt)?;
                write_opt_u32(worksheet, r, 4, report.working_days, &cell_fmt)?;
                write_opt_i32(worksheet, r, 5, summary.holidays, &cell_fmt)?;
                worksheet.write_with_format(r, 6, summary.approved_leaves, &cell_fmt)?;
                write_opt_u32(worksheet, r, 7, summary.absent, &cell_fmt)?;
                write_opt_u32(worksheet, r, 8, summary.extra_days, &cell_fmt)?;
                worksheet.write_with_format(r, 9, summary.total_check_ins, &cell_fmt)?;
                worksheet.write_with_format(r, 10, summary.late_check_ins, &cell_fmt)?;
                worksheet.write_with_format(r, 11, summary.late_check_outs, &cell_fmt)?;
                worksheet.write_with_format(r, 12, summary.late_adjustment, &cell_fmt)?;
            }
            SummaryRow::Failed { user, error } => {
                worksheet.write_with_format(r, 0, user.name.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 1, user.phone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.write_with_format(r, 2, user.role.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 3, user.zone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.merge_range(r, 4, r, 12, error, &cell_fmt)?;
            }
        }
    }

    workbook.save_to_buffer()
}

/// Renders the daily grid as a wide table: four identity columns, then an
/// In/Out column pair per calendar day under a merged day-number header.
pub fn daily_grid_workbook(report: &DailyGridReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_fmt = header_format();
    let cell_fmt = cell_format();

    for (col, header) in ["Name", "Number", "Outlet", "Zone"].iter().enumerate() {
        worksheet.merge_range(0, col as u16, 1, col as u16, header, &header_fmt)?;
    }

    let last_day_col = 4 + report.days_in_month as u16 * 2 - 1;
    for day in 1..=report.days_in_month {
        let start_col = 4 + (day as u16 - 1) * 2;
        worksheet.merge_range(0, start_col, 0, start_col + 1, &day.to_string(), &header_fmt)?;
        worksheet.write_with_format(1, start_col, "In", &header_fmt)?;
        worksheet.write_with_format(1, start_col + 1, "Out", &header_fmt)?;
    }

    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 2) as u32;
        match row {
            DailyGridRow::Ready { user, days } => {
                worksheet.write_with_format(r, 0, user.name.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 1, user.phone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.write_with_format(r, 2, user.outlet.as_deref().unwrap_or("N/A"), &cell_fmt)?;
                worksheet.write_with_format(r, 3, user.zone.as_deref().unwrap_or(""), &cell_fmt)?;
                for day in 1..=report.days_in_month {
                    let col = 4 + (day as u16 - 1) * 2;
                    let (check_in, check_out) = days
                        .get(&day)
                        .map(|slot| (slot.check_in.as_str(), slot.check_out.as_str()))
                        .unwrap_or(("", ""));
                    worksheet.write_with_format(r, col, check_in, &cell_fmt)?;
                    worksheet.write_with_format(r, col + 1, check_out, &cell_fmt)?;
                }
            }
            DailyGridRow::Failed { user, error } => {
                worksheet.write_with_format(r, 0, user.name.as_str(), &cell_fmt)?;
                worksheet.write_with_format(r, 1, user.phone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.write_with_format(r, 2, user.outlet.as_deref().unwrap_or("N/A"), &cell_fmt)?;
                worksheet.write_with_format(r, 3, user.zone.as_deref().unwrap_or(""), &cell_fmt)?;
                worksheet.merge_range(r, 4, r, last_day_col, error, &cell_fmt)?;
            }
        }
    }

    workbook.save_to_buffer()
}

fn write_opt_u32(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: Option<u32>,
    fmt: &Format,
) -> Result<(), XlsxError> {
    match value {
        Some(v) => worksheet.write_with_format(row, col, v, fmt)?,
        None => worksheet.write_with_format(row, col, "", fmt)?,
    };
    Ok(())
}

fn write_opt_i32(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: Option<i32>,
    fmt: &Format,
) -> Result<(), XlsxError> {
    match value {
        Some(v) => worksheet.write_with_format(row, col, v, fmt)?,
        None => worksheet.write_with_format(row, col, "", fmt)?,
    };
    Ok(())
}
