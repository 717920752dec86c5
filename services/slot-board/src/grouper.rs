//! Groups flat slot lists by date and start time

use std::collections::BTreeMap;

use crate::slot::Slot;

/// date → start time → slot; keys iterate in ascending raw-string order
pub type GroupedSlots = BTreeMap<String, BTreeMap<String, Slot>>;

/// Build a fresh mapping. A later duplicate of (date, start time) replaces
/// the earlier one.
pub fn group_slots<I>(slots: I) -> GroupedSlots
where
    I: IntoIterator<Item = Slot>,
{
    let mut grouped = GroupedSlots::new();
    for slot in slots {
        grouped
            .entry(slot.date.clone())
            .or_default()
            .insert(slot.start_time.clone(), slot);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(date: &str, start_time: &str, vacancy: u32) -> Slot {
        Slot {
            date: date.to_string(),
            start_time: start_time.to_string(),
            vacancy,
        }
    }

    #[test]
    fn groups_by_date_then_time() {
        let grouped = group_slots(vec![
            slot("2026-01-18", "10:00", 1),
            slot("2026-01-17", "11:00", 2),
            slot("2026-01-17", "10:00", 3),
        ]);

        let dates: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2026-01-17", "2026-01-18"]);
        let times: Vec<&str> = grouped["2026-01-17"].keys().map(String::as_str).collect();
        assert_eq!(times, vec!["10:00", "11:00"]);
        assert_eq!(grouped["2026-01-17"]["10:00"].vacancy, 3);
    }

    #[test]
    fn last_duplicate_wins() {
        let grouped = group_slots(vec![
            slot("2026-01-17", "10:00", 8),
            slot("2026-01-17", "10:00", 2),
        ]);
        assert_eq!(grouped["2026-01-17"].len(), 1);
        assert_eq!(grouped["2026-01-17"]["10:00"].vacancy, 2);
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        assert!(group_slots(Vec::new()).is_empty());
    }
}
