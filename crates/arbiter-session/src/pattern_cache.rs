//! PatternCache — process-wide memo of classifications keyed by request
//! signature.
//!
//! A signature is promoted once the same classification has been produced
//! for it `promotion_threshold` times in a session's history. Hits are served
//! as copies with confidence 1.0; the stored live result never changes on a
//! hit.

use arbiter_core::config::defaults::DEFAULT_PROMOTION_THRESHOLD;
use arbiter_core::models::{ClassificationResult, ClassifierSource, PatternCacheEntry};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;

use crate::history::SessionHistory;

/// What `promote` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// Below the threshold; cache untouched.
    NotEligible,
    Inserted,
    /// Same classification already cached; usage refreshed.
    Refreshed,
    /// A different classification reached the threshold and took over.
    Replaced,
}

impl PromotionOutcome {
    /// True when the cache contents changed in a way worth persisting.
    pub fn changed(self) -> bool {
        !matches!(self, Self::NotEligible)
    }
}

#[derive(Debug)]
pub struct PatternCache {
    entries: DashMap<String, PatternCacheEntry>,
    promotion_threshold: u32,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_PROMOTION_THRESHOLD)
    }
}

impl PatternCache {
    pub fn new(promotion_threshold: u32) -> Self {
        Self {
            entries: DashMap::new(),
            promotion_threshold: promotion_threshold.max(1),
        }
    }

    /// Restore persisted entries. Later duplicates of a signature win.
    pub fn from_entries(entries: Vec<PatternCacheEntry>, promotion_threshold: u32) -> Self {
        let cache = Self::new(promotion_threshold);
        for entry in entries {
            cache.entries.insert(entry.signature.clone(), entry);
        }
        cache
    }

    pub fn promotion_threshold(&self) -> u32 {
        self.promotion_threshold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, signature: &str) -> Option<ClassificationResult> {
        self.lookup_at(signature, Utc::now())
    }

    /// Serve a promoted entry as a cache hit, bumping its usage.
    pub fn lookup_at(&self, signature: &str, now: DateTime<Utc>) -> Option<ClassificationResult> {
        let mut entry = self.entries.get_mut(signature)?;
        if entry.hit_count < self.promotion_threshold {
            return None;
        }
        entry.hit_count = entry.hit_count.saturating_add(1);
        entry.last_used = now;
        Some(entry.result.as_cache_hit())
    }

    /// Cached live result without touching usage counters.
    pub fn peek(&self, signature: &str) -> Option<ClassificationResult> {
        self.entries
            .get(signature)
            .filter(|e| e.hit_count >= self.promotion_threshold)
            .map(|e| e.result.clone())
    }

    pub fn promote(
        &self,
        signature: &str,
        result: &ClassificationResult,
        history: &SessionHistory,
    ) -> PromotionOutcome {
        self.promote_at(signature, result, history, Utc::now())
    }

    /// Promote `signature` if `history` holds at least `promotion_threshold`
    /// entries with the same signature and classification.
    pub fn promote_at(
        &self,
        signature: &str,
        result: &ClassificationResult,
        history: &SessionHistory,
        now: DateTime<Utc>,
    ) -> PromotionOutcome {
        if signature.is_empty() || !result.is_classified() {
            return PromotionOutcome::NotEligible;
        }
        let served_from_cache = result.classifier_source() == ClassifierSource::PatternCache;
        let occurrences = history.count_matching(signature, result);
        let occurrences = u32::try_from(occurrences).unwrap_or(u32::MAX);
        if occurrences < self.promotion_threshold {
            return PromotionOutcome::NotEligible;
        }

        let outcome = match self.entries.get_mut(signature) {
            Some(mut entry) if entry.result.same_classification(result) => {
                entry.hit_count = entry.hit_count.max(occurrences);
                entry.last_used = now;
                PromotionOutcome::Refreshed
            }
            // A hit copy may only refresh; it never becomes the stored result.
            _ if served_from_cache => return PromotionOutcome::NotEligible,
            Some(mut entry) => {
                *entry = PatternCacheEntry {
                    signature: signature.to_string(),
                    result: result.clone(),
                    hit_count: occurrences,
                    last_used: now,
                    promoted_at: now,
                };
                PromotionOutcome::Replaced
            }
            None => {
                self.entries.insert(
                    signature.to_string(),
                    PatternCacheEntry {
                        signature: signature.to_string(),
                        result: result.clone(),
                        hit_count: occurrences,
                        last_used: now,
                        promoted_at: now,
                    },
                );
                PromotionOutcome::Inserted
            }
        };
        if matches!(outcome, PromotionOutcome::Inserted | PromotionOutcome::Replaced) {
            tracing::info!(
                signature,
                systems = ?result.systems(),
                occurrences,
                replaced = outcome == PromotionOutcome::Replaced,
                "promoted classification to pattern cache"
            );
        }
        outcome
    }

    pub fn evict(&self, max_age_days: i64) -> usize {
        self.evict_at(Utc::now(), max_age_days)
    }

    /// Drop entries last used before `now - max_age_days`.
    ///
    /// A negative age, or one too large to represent as a date, evicts
    /// nothing.
    pub fn evict_at(&self, now: DateTime<Utc>, max_age_days: i64) -> usize {
        let cutoff = (max_age_days >= 0)
            .then(|| TimeDelta::try_days(max_age_days))
            .flatten()
            .and_then(|age| now.checked_sub_signed(age));
        let Some(cutoff) = cutoff else {
            tracing::debug!(max_age_days, "no representable eviction cutoff, keeping all entries");
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_used >= cutoff);
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            tracing::info!(evicted, max_age_days, "evicted stale pattern cache entries");
        }
        evicted
    }

    /// Remove everything. Returns the number of entries dropped.
    pub fn clear(&self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        cleared
    }

    /// All entries ordered by signature, for persistence.
    pub fn snapshot(&self) -> Vec<PatternCacheEntry> {
        let mut entries: Vec<PatternCacheEntry> =
            self.entries.iter().map(|r| r.value().clone()).collect();
        entries.sort_by(|a, b| a.signature.cmp(&b.signature));
        entries
    }
}
