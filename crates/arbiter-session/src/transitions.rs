//! TransitionTable — how often one primary `(system, domain)` pair was
//! immediately followed by another within a session.

use std::collections::BTreeMap;

use arbiter_core::models::{SuggestedExpansion, SystemDomain, TransitionRecord};
use chrono::{DateTime, Utc};

use crate::history::SessionHistory;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    records: Vec<TransitionRecord>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, merging duplicate `(from, to)` keys.
    pub fn from_records(records: Vec<TransitionRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            match table.find_mut(&record.from, &record.to) {
                Some(existing) => {
                    existing.count += record.count;
                    existing.last_seen = existing.last_seen.max(record.last_seen);
                }
                None => table.records.push(record),
            }
        }
        table
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_mut(&mut self, from: &SystemDomain, to: &SystemDomain) -> Option<&mut TransitionRecord> {
        self.records.iter_mut().find(|r| &r.from == from && &r.to == to)
    }

    /// Increment (or create) the `(from, to)` record.
    pub fn increment(&mut self, from: SystemDomain, to: SystemDomain, now: DateTime<Utc>) {
        match self.find_mut(&from, &to) {
            Some(record) => {
                record.count += 1;
                record.last_seen = now;
            }
            None => self.records.push(TransitionRecord {
                from,
                to,
                count: 1,
                last_seen: now,
            }),
        }
    }

    /// Look up the entry recorded under `prev_signature` and, if its primary
    /// pair differs from `current`, count the transition. Returns the pair
    /// that was counted.
    pub fn record_transition(
        &mut self,
        history: &SessionHistory,
        prev_signature: &str,
        current: &SystemDomain,
        now: DateTime<Utc>,
    ) -> Option<(SystemDomain, SystemDomain)> {
        let previous = history.find_latest(prev_signature)?.result.primary()?;
        if &previous == current {
            return None;
        }
        self.increment(previous.clone(), current.clone(), now);
        Some((previous, current.clone()))
    }

    /// Sources that led into `(system, domain)`, with
    /// `transition_confidence = count / total transitions out of that source`.
    /// Entries below `min_confidence` are dropped; the rest are sorted by
    /// confidence, highest first.
    pub fn lookup_transitions(
        &self,
        system: &str,
        domain: Option<&str>,
        min_confidence: f64,
    ) -> Vec<SuggestedExpansion> {
        let mut into_target: BTreeMap<&SystemDomain, u64> = BTreeMap::new();
        for record in &self.records {
            if record.to.system == system && record.to.domain.as_deref() == domain {
                *into_target.entry(&record.from).or_default() += record.count;
            }
        }

        let target = match domain {
            Some(d) => format!("{system}/{d}"),
            None => system.to_string(),
        };
        let mut suggestions: Vec<SuggestedExpansion> = into_target
            .into_iter()
            .filter_map(|(from, count)| {
                let total: u64 = self
                    .records
                    .iter()
                    .filter(|r| &r.from == from)
                    .map(|r| r.count)
                    .sum();
                if total == 0 {
                    return None;
                }
                let confidence = count as f64 / total as f64;
                (confidence >= min_confidence).then(|| SuggestedExpansion {
                    system: from.system.clone(),
                    domain: from.domain.clone(),
                    transition_confidence: confidence,
                    count,
                    rationale: format!(
                        "{from} was followed by {target} in {count} of {total} transitions from {from}"
                    ),
                })
            })
            .collect();
        // BTreeMap order already breaks ties by `from`; the sort is stable.
        suggestions.sort_by(|a, b| b.transition_confidence.total_cmp(&a.transition_confidence));
        suggestions
    }
}
