use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::schema::{AuditLog, Page};
use crate::intent::{DeskError, Outcome, StatusMessage, ValidationError};
use crate::session::Session;

pub const AUDIT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditLogFilter {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl AuditLogFilter {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) if from > to => Err(ValidationError::DateOrder),
            _ => Ok(()),
        }
    }

    /// Query pairs for a page. Date bounds cover whole days.
    pub fn query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.max(1).to_string()),
            ("page_size", AUDIT_PAGE_SIZE.to_string()),
        ];
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        if let Some(action) = text(&self.action) {
            query.push(("action", action));
        }
        if let Some(entity_type) = text(&self.entity_type) {
            query.push(("entity_type", entity_type));
        }
        if let Some(from) = self.date_from {
            query.push(("date_from", format!("{}T00:00:00", from.format("%Y-%m-%d"))));
        }
        if let Some(to) = self.date_to {
            query.push(("date_to", format!("{}T23:59:59", to.format("%Y-%m-%d"))));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub entity_type: String,
    pub entity: String,
    pub description: String,
    pub ip_address: String,
}

impl From<&AuditLog> for AuditRow {
    fn from(log: &AuditLog) -> Self {
        let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
        Self {
            timestamp: log.created_at.clone(),
            user: log.username.clone().unwrap_or_else(|| "SYSTEM".to_string()),
            action: log.action.clone(),
            entity_type: log.entity_type.clone(),
            entity: log
                .entity_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            description: or_dash(log.description.as_deref()),
            ip_address: or_dash(log.ip_address.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub rows: Vec<AuditRow>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl From<Page<AuditLog>> for AuditLogPage {
    fn from(page: Page<AuditLog>) -> Self {
        Self {
            rows: page.items.iter().map(AuditRow::from).collect(),
            total: page.total,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            page: page.page,
            total_pages: page.total_pages.max(1),
        }
    }
}

pub async fn load_audit_logs(
    session: &mut Session,
    filter: &AuditLogFilter,
    page: u32,
) -> Result<Outcome<AuditLogPage>, DeskError> {
    filter.validate()?;
    session.require_admin().await?;
    let query = filter.query(page);
    let result = session.require_authenticated()?.audit_logs(&query).await;
    let logs = session.settle(result)?;
    let status = if logs.items.is_empty() {
        StatusMessage::info("No audit logs found")
    } else {
        StatusMessage::info("Audit logs loaded successfully")
    };
    Ok(Outcome::new(AuditLogPage::from(logs), status))
}
