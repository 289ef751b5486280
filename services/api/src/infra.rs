use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use showcase::awards::{AwardService, MemoryBlobStore};
use showcase::client::{FileTokenStore, StaticTokenStore, TokenStore};
use showcase::competitions::CompetitionService;
use showcase::config::AdminApiConfig;
use showcase::store::MemoryStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Competition and award services sharing one in-memory store.
#[derive(Clone)]
pub(crate) struct Console {
    pub(crate) competitions: Arc<CompetitionService<MemoryStore>>,
    pub(crate) awards: Arc<AwardService<MemoryStore, MemoryBlobStore>>,
}

impl Console {
    pub(crate) fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        let blobs = Arc::new(MemoryBlobStore::default());
        Self {
            competitions: Arc::new(CompetitionService::new(store.clone(), blobs.clone())),
            awards: Arc::new(AwardService::new(store, blobs)),
        }
    }
}

/// Token source for admin API commands: an explicit token wins, then the configured token file.
pub(crate) fn token_store(token: Option<String>, config: &AdminApiConfig) -> Arc<dyn TokenStore> {
    match (token, config.token_file.as_ref()) {
        (Some(token), _) => Arc::new(StaticTokenStore::new(token)),
        (None, Some(path)) => Arc::new(FileTokenStore::new(path.clone())),
        (None, None) => Arc::new(StaticTokenStore::empty()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins_over_token_file() {
        let config = AdminApiConfig {
            base_url: "http://127.0.0.1:8080".to_string(),
            token_file: Some("/nonexistent/showcase-token".into()),
        };
        let store = token_store(Some("abc".to_string()), &config);
        assert_eq!(store.token().unwrap().as_deref(), Some("abc"));

        let store = token_store(None, &config);
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn parse_date_reports_the_raw_value() {
        assert_eq!(
            parse_date(" 2024-09-02 "),
            Ok(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
        );
        let error = parse_date("02/09/2024").unwrap_err();
        assert!(error.contains("'02/09/2024'"));
    }
}
