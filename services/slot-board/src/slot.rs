//! Slot records as served by the availability endpoint

use serde::{Deserialize, Serialize};

/// A slot record exactly as received; nothing is trusted yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub vacancy: Option<i64>,
}

/// A validated, bookable hour on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub start_time: String,
    pub vacancy: u32,
}

impl Slot {
    /// Normalize a raw record, or `None` when it cannot be displayed.
    ///
    /// Blank or missing date/start-time and missing or negative vacancy
    /// are rejected. Surrounding whitespace is trimmed.
    pub fn from_raw(raw: RawSlot) -> Option<Slot> {
        let date = non_blank(raw.date)?;
        let start_time = non_blank(raw.start_time)?;
        let vacancy = u32::try_from(raw.vacancy?).ok()?;
        Some(Slot {
            date,
            start_time,
            vacancy,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Date window reported by the endpoint, as `YYYYMMDD[HHMM]` strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Response body of one availability request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPayload {
    #[serde(default)]
    pub data: Option<Vec<RawSlot>>,
    #[serde(default)]
    pub range: Option<SlotRange>,
    #[serde(default)]
    pub fetched_at: Option<String>,
}

impl SlotPayload {
    /// Records that survive validation, in response order
    pub fn valid_slots(&self) -> Vec<Slot> {
        let raw = self.data.as_deref().unwrap_or_default();
        let slots: Vec<Slot> = raw.iter().cloned().filter_map(Slot::from_raw).collect();
        if slots.len() < raw.len() {
            tracing::debug!(
                "Dropped {} of {} slot records that failed validation",
                raw.len() - slots.len(),
                raw.len()
            );
        }
        slots
    }

    /// Both ends of the reported range, when present
    pub fn range_bounds(&self) -> Option<(&str, &str)> {
        let range = self.range.as_ref()?;
        match (range.start.as_deref(), range.end.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: Option<&str>, start_time: Option<&str>, vacancy: Option<i64>) -> RawSlot {
        RawSlot {
            date: date.map(str::to_string),
            start_time: start_time.map(str::to_string),
            vacancy,
        }
    }

    #[test]
    fn from_raw_accepts_complete_record() {
        let slot = Slot::from_raw(raw(Some("2026-01-17"), Some("10:00"), Some(4))).unwrap();
        assert_eq!(slot.date, "2026-01-17");
        assert_eq!(slot.start_time, "10:00");
        assert_eq!(slot.vacancy, 4);
    }

    #[test]
    fn from_raw_rejects_missing_or_blank_fields() {
        assert!(Slot::from_raw(raw(None, Some("10:00"), Some(1))).is_none());
        assert!(Slot::from_raw(raw(Some("2026-01-17"), None, Some(1))).is_none());
        assert!(Slot::from_raw(raw(Some(""), Some("10:00"), Some(1))).is_none());
        assert!(Slot::from_raw(raw(Some("2026-01-17"), Some("  "), Some(1))).is_none());
    }

    #[test]
    fn from_raw_rejects_bad_vacancy() {
        assert!(Slot::from_raw(raw(Some("2026-01-17"), Some("10:00"), None)).is_none());
        assert!(Slot::from_raw(raw(Some("2026-01-17"), Some("10:00"), Some(-1))).is_none());
    }

    #[test]
    fn from_raw_trims_whitespace() {
        let slot = Slot::from_raw(raw(Some(" 2026-01-17 "), Some("10:00\n"), Some(0))).unwrap();
        assert_eq!(slot.date, "2026-01-17");
        assert_eq!(slot.start_time, "10:00");
    }

    #[test]
    fn payload_parses_full_shape() {
        let json = r#"{
            "data": [
                {"date": "2026-01-17", "start_time": "10:00", "vacancy": 3},
                {"date": null, "start_time": "11:00", "vacancy": 3},
                {"start_time": "12:00", "vacancy": 1}
            ],
            "range": {"start": "202601170000", "end": "202601312359"},
            "fetched_at": "2026-01-17T09:00:00+0900"
        }"#;
        let payload: SlotPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data.as_ref().unwrap().len(), 3);
        assert_eq!(payload.valid_slots().len(), 1);
        assert_eq!(
            payload.range_bounds(),
            Some(("202601170000", "202601312359"))
        );
        assert_eq!(
            payload.fetched_at.as_deref(),
            Some("2026-01-17T09:00:00+0900")
        );
    }

    #[test]
    fn payload_tolerates_missing_data() {
        let payload: SlotPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.valid_slots().is_empty());
        assert_eq!(payload.range_bounds(), None);
    }

    #[test]
    fn range_bounds_needs_both_ends() {
        let payload: SlotPayload =
            serde_json::from_str(r#"{"range": {"start": "20260117"}}"#).unwrap();
        assert_eq!(payload.range_bounds(), None);
    }
}
