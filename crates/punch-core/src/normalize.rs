//! Event normalization: per-subject chronological ordering.

use std::collections::BTreeMap;

use crate::event::PunchEvent;
use crate::types::SubjectId;

/// Sorts punches ascending by `occurred_at`, keeping input order on ties.
///
/// Inactive punches are dropped; nothing else is removed or changed.
pub fn normalize(events: &[PunchEvent]) -> Vec<PunchEvent> {
    let mut sorted: Vec<PunchEvent> = events.iter().filter(|e| e.active).cloned().collect();
    // Stable: ties keep input order.
    sorted.sort_by_key(|e| e.occurred_at);
    sorted
}

/// Normalizes only the punches belonging to `subject`.
pub fn normalize_for(subject: &SubjectId, events: &[PunchEvent]) -> Vec<PunchEvent> {
    let mut sorted: Vec<PunchEvent> = events
        .iter()
        .filter(|e| e.active && &e.subject_id == subject)
        .cloned()
        .collect();
    sorted.sort_by_key(|e| e.occurred_at);
    sorted
}

/// Splits a mixed batch into normalized per-subject sequences.
pub fn normalize_by_subject(events: &[PunchEvent]) -> BTreeMap<SubjectId, Vec<PunchEvent>> {
    let mut grouped: BTreeMap<SubjectId, Vec<PunchEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.active) {
        grouped
            .entry(event.subject_id.clone())
            .or_default()
            .push(event.clone());
    }
    for sequence in grouped.values_mut() {
        sequence.sort_by_key(|e| e.occurred_at);
    }
    grouped
}
