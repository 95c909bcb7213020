//! Human-readable rendering of the roster.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::employee::Employee;
use crate::error::Result;
use crate::validation::ValidationReport;

/// Format a birthdate for display, e.g. `5 January 1990`.
#[must_use]
pub fn format_birthdate(birthdate: NaiveDate) -> String {
    birthdate.format("%-d %B %Y").to_string()
}

/// Render employees as an aligned text table.
///
/// Columns are id, name, email, sex label, birthdate, age, and photo
/// presence. An empty set renders a single placeholder line.
#[must_use]
pub fn render_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees found.\n".to_string();
    }

    let header = [
        "ID".to_string(),
        "Name".to_string(),
        "Email".to_string(),
        "Sex".to_string(),
        "Birthdate".to_string(),
        "Age".to_string(),
        "Photo".to_string(),
    ];
    let rows: Vec<[String; 7]> = employees
        .iter()
        .map(|e| {
            [
                e.id.clone().unwrap_or_default(),
                e.full_name(),
                e.email.clone(),
                e.sex.label().to_string(),
                format_birthdate(e.birthdate),
                e.age().to_string(),
                if e.has_photo() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let mut widths = [0usize; 7];
    for (i, cell) in header.iter().enumerate() {
        widths[i] = cell.len();
    }
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    render_row(&mut out, &header, &widths);
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        // Trailing padding on the last column just adds noise.
        if i < cells.len() - 1 {
            for _ in cell.len()..widths[i] {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

/// Render employees one per line, `id  name <email>`.
#[must_use]
pub fn render_plain(employees: &[Employee]) -> String {
    let mut out = String::new();
    for e in employees {
        out.push_str(&format!(
            "{}  {} <{}>\n",
            e.id.as_deref().unwrap_or("-"),
            e.full_name(),
            e.email
        ));
    }
    out
}

/// Render employees as pretty-printed JSON with derived fields included.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(employees: &[Employee]) -> Result<String> {
    let now = Utc::now();
    let values: Vec<serde_json::Value> = employees
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "firstName": e.first_name,
                "lastName": e.last_name,
                "email": e.email,
                "sex": e.sex,
                "sexLabel": e.sex.label(),
                "birthdate": e.birthdate,
                "birthdateDisplay": format_birthdate(e.birthdate),
                "age": crate::employee::age_from_birthdate(e.birthdate, now),
                "hasPhoto": e.has_photo(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&values)?)
}

/// Render a failed validation report as one message per line.
#[must_use]
pub fn render_validation_errors(report: &ValidationReport) -> String {
    let mut out = String::new();
    for message in report.messages() {
        out.push_str("  - ");
        out.push_str(&message);
        out.push('\n');
    }
    out
}
