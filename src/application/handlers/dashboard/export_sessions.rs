//! ExportSessionsHandler - session log export as delimited text.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{SessionFilter, SessionReader, SessionSummary};

const HEADER: &str =
    "session_id,phone_number,menu_state,role,language,step_count,is_active,created_at,last_interaction_at,completed_at";

/// Handler for exporting the session log as CSV.
pub struct ExportSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ExportSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, filter: SessionFilter) -> Result<String, DomainError> {
        let rows = self.reader.export(&filter).await?;
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for row in &rows {
            csv.push_str(&csv_row(row));
            csv.push('\n');
        }
        Ok(csv)
    }
}

fn csv_row(row: &SessionSummary) -> String {
    [
        csv_field(&row.session_id),
        csv_field(&row.phone_number),
        csv_field(row.menu_state.as_str()),
        csv_field(row.role.map(|r| r.as_str()).unwrap_or("")),
        csv_field(row.language.code()),
        row.step_count.to_string(),
        row.is_active.to_string(),
        csv_field(&row.created_at.as_datetime().to_rfc3339()),
        csv_field(&row.last_interaction_at.as_datetime().to_rfc3339()),
        csv_field(
            &row.completed_at
                .map(|t| t.as_datetime().to_rfc3339())
                .unwrap_or_default(),
        ),
    ]
    .join(",")
}

/// Quotes a field when it contains delimiter, quote, or newline characters.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
