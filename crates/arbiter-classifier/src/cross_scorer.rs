//! Pass 2: weighted cross-keyword scoring.
//!
//! Each cross group is tested once against the request; a match adds the
//! group's weight to every system it touches. The resulting scores yield the
//! gap and dominance of the top system over the runner-up.

use arbiter_core::models::SystemScore;

use crate::corpus::KeywordCorpus;

/// Per-system scores for one classification attempt, in corpus order.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossScores {
    scores: Vec<SystemScore>,
    matched_groups: Vec<String>,
}

impl CrossScores {
    pub fn compute(corpus: &KeywordCorpus, request: &str) -> Self {
        let mut scores: Vec<SystemScore> = corpus
            .system_ids()
            .map(|id| SystemScore {
                system_id: id.to_string(),
                score: 0.0,
            })
            .collect();
        let mut matched_groups = Vec::new();
        for group in corpus.cross_groups() {
            if !group.pattern.is_match(request) {
                continue;
            }
            matched_groups.push(group.id.clone());
            for &(index, weight) in &group.weights {
                scores[index].score += weight;
            }
        }
        Self {
            scores,
            matched_groups,
        }
    }

    /// True iff at least one cross group matched.
    pub fn phase2_active(&self) -> bool {
        !self.matched_groups.is_empty()
    }

    pub fn matched_groups(&self) -> &[String] {
        &self.matched_groups
    }

    pub fn scores(&self) -> &[SystemScore] {
        &self.scores
    }

    pub fn score_of(&self, system_id: &str) -> f64 {
        self.scores
            .iter()
            .find(|s| s.system_id == system_id)
            .map_or(0.0, |s| s.score)
    }

    pub fn has_nonzero(&self) -> bool {
        self.scores.iter().any(|s| s.score > 0.0)
    }

    /// Indices of the top and runner-up scores. Ties go to corpus order.
    fn top_two(&self) -> (Option<usize>, Option<usize>) {
        let mut order: Vec<usize> = (0..self.scores.len()).collect();
        order.sort_by(|&a, &b| self.scores[b].score.total_cmp(&self.scores[a].score));
        (order.first().copied(), order.get(1).copied())
    }

    fn top_scores(&self) -> (f64, f64) {
        let (top, second) = self.top_two();
        (
            top.map_or(0.0, |i| self.scores[i].score),
            second.map_or(0.0, |i| self.scores[i].score),
        )
    }

    /// `score[top] - score[second]`.
    pub fn gap(&self) -> f64 {
        let (top, second) = self.top_scores();
        top - second
    }

    /// `score[top] / (score[top] + score[second])`, or 0 when both are 0.
    pub fn dominance(&self) -> f64 {
        let (top, second) = self.top_scores();
        let total = top + second;
        if total > 0.0 {
            top / total
        } else {
            0.0
        }
    }

    /// Multiply every nonzero score by `1 + factor * affinity(system)`.
    /// Returns true when any affinity contributed.
    pub fn reweight(&mut self, factor: f64, affinity: impl Fn(&str) -> f64) -> bool {
        let mut applied = false;
        for entry in &mut self.scores {
            if entry.score <= 0.0 {
                continue;
            }
            let a = affinity(&entry.system_id).clamp(0.0, 1.0);
            if a > 0.0 {
                entry.score *= 1.0 + factor * a;
                applied = true;
            }
        }
        applied
    }

    /// System set for a request the binary pass missed entirely: the top
    /// system alone when the gap is decisive, otherwise every system with a
    /// positive score.
    pub fn reconstruct(&self, gap_threshold: f64) -> Vec<String> {
        if !self.has_nonzero() {
            return Vec::new();
        }
        if self.gap() >= gap_threshold {
            let (top, _) = self.top_two();
            return top
                .map(|i| vec![self.scores[i].system_id.clone()])
                .unwrap_or_default();
        }
        self.scores
            .iter()
            .filter(|s| s.score > 0.0)
            .map(|s| s.system_id.clone())
            .collect()
    }
}
