// 💍 Wedding Date - the one date everything counts down to

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dates;
use crate::error::Result;
use crate::store::{Document, RecordStore};

/// On-disk shape: `{"wedding_date": "YYYY-MM-DD"}`, or no document at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeddingDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<String>,
}

impl Document for WeddingDate {
    const FILE: &'static str = "wedding_date.json";
}

#[derive(Debug, Clone)]
pub struct WeddingDateService {
    store: RecordStore,
}

impl WeddingDateService {
    pub fn new(store: RecordStore) -> Self {
        WeddingDateService { store }
    }

    /// The date, if one is set and readable.
    pub fn get(&self) -> Option<NaiveDate> {
        let raw = self.store.load_document::<WeddingDate>().wedding_date?;
        match dates::parse_field("wedding_date", &raw) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring stored wedding date: {}", e);
                None
            }
        }
    }

    /// Parse and store the date.
    pub fn set(&self, raw: &str) -> Result<NaiveDate> {
        let date = dates::parse_field("wedding_date", raw.trim())?;
        self.store.save_document(&WeddingDate {
            wedding_date: Some(dates::format_date(date)),
        })?;

        info!(date = %date, "Set wedding date");
        Ok(date)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.save_document(&WeddingDate::default())?;
        info!("Cleared wedding date");
        Ok(())
    }

    /// Days from `today` to the wedding; negative once it has passed.
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        self.get().map(|date| (date - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use std::sync::Arc;

    #[test]
    fn test_unset_by_default() {
        let service = WeddingDateService::new(RecordStore::in_memory());
        assert_eq!(service.get(), None);
        assert_eq!(service.days_until(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()), None);
    }

    #[test]
    fn test_set_get_clear() {
        let service = WeddingDateService::new(RecordStore::in_memory());

        let date = service.set("2026-09-19").unwrap();
        assert_eq!(service.get(), Some(date));

        service.clear().unwrap();
        assert_eq!(service.get(), None);
    }

    #[test]
    fn test_set_rejects_bad_date() {
        let service = WeddingDateService::new(RecordStore::in_memory());
        service.set("2026-09-19").unwrap();

        assert!(service.set("2026-02-30").unwrap_err().is_format());
        assert!(service.set("next june").unwrap_err().is_format());
        // the earlier date is untouched
        assert_eq!(service.get(), NaiveDate::from_ymd_opt(2026, 9, 19));
    }

    #[test]
    fn test_days_until() {
        let service = WeddingDateService::new(RecordStore::in_memory());
        service.set("2026-09-19").unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
        assert_eq!(service.days_until(today), Some(10));

        let after = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        assert_eq!(service.days_until(after), Some(-1));
    }

    #[test]
    fn test_stored_format() {
        let backend = Arc::new(MemoryBackend::new());
        let service = WeddingDateService::new(RecordStore::new(backend.clone()));
        service.set("2026-09-19").unwrap();

        let raw = backend.raw("wedding_date.json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"wedding_date": "2026-09-19"}));
    }

    #[test]
    fn test_garbage_stored_date_reads_as_unset() {
        let backend = MemoryBackend::new().with_document("wedding_date.json", r#"{"wedding_date":"June"}"#);
        let service = WeddingDateService::new(RecordStore::new(Arc::new(backend)));
        assert_eq!(service.get(), None);
    }
}
