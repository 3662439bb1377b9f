use chrono::NaiveDate;
use hotel_desk::api::ApiClient;
use hotel_desk::config::AppConfig;
use hotel_desk::housekeeping::HousekeepingDesk;
use hotel_desk::reports::ReportDesk;
use hotel_desk::session::{FileStateStore, Session, StateStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything one signed-in console holds between intents.
#[derive(Debug)]
pub(crate) struct DeskState {
    pub(crate) session: Session,
    pub(crate) reports: ReportDesk,
    pub(crate) housekeeping: HousekeepingDesk,
}

impl DeskState {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            reports: ReportDesk::new(),
            housekeeping: HousekeepingDesk::new(),
        }
    }

    /// Session against the configured API, restoring token and theme from the state file.
    pub(crate) fn open(config: &AppConfig) -> Self {
        let store: Arc<dyn StateStore> =
            Arc::new(FileStateStore::new(config.storage.state_path.clone()));
        let client = ApiClient::new(config.api.base_url.clone());
        Self::new(Session::new(client, store))
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) desk: Arc<Mutex<DeskState>>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Empty strings count as missing so the range check can report them.
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        start_date: Option<NaiveDate>,
    }

    #[test]
    fn blank_dates_are_missing() {
        let window: Window = serde_json::from_str(r#"{"start_date": " "}"#).expect("decodes");
        assert_eq!(window.start_date, None);

        let window: Window =
            serde_json::from_str(r#"{"start_date": "2024-02-29"}"#).expect("decodes");
        assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2024, 2, 29));

        assert!(serde_json::from_str::<Window>(r#"{"start_date": "29/02/2024"}"#).is_err());
    }
}
