//! Runs the binary pass, the optional weighted pass, context
//! adjustments and calibration for one request.

use std::sync::Arc;

use arbiter_core::config::defaults::DEFAULT_CONTEXT_REWEIGHT;
use arbiter_core::config::CalibrationConfig;
use arbiter_core::constants::MAX_LIVE_CONFIDENCE;
use arbiter_core::errors::ConfigError;
use arbiter_core::models::{ClassificationResult, ClassifierSource};
use arbiter_core::traits::IContextSignals;

use crate::calibrator::{calibrate, CalibrationInput};
use crate::corpus::KeywordCorpus;
use crate::cross_scorer::CrossScores;
use crate::matcher::BinaryMatcher;

/// Everything one classification computed, for callers that want more than
/// the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTrace {
    pub result: ClassificationResult,
    /// Systems hit by pass 1, corpus order.
    pub binary_matches: Vec<String>,
    /// Pass 2 scores when it ran.
    pub cross_scores: Option<CrossScores>,
    /// Confidence before the session prior boost.
    pub calibrated: f64,
    pub prior_boost: f64,
    /// Zero-match re-weighting changed at least one score.
    pub context_reweighted: bool,
}

/// Two-pass keyword classifier over a shared corpus.
#[derive(Debug, Clone)]
pub struct Classifier {
    corpus: Arc<KeywordCorpus>,
    calibration: CalibrationConfig,
    context_reweight: f64,
}

impl Classifier {
    pub fn new(corpus: Arc<KeywordCorpus>, calibration: CalibrationConfig) -> Self {
        Self {
            corpus,
            calibration,
            context_reweight: DEFAULT_CONTEXT_REWEIGHT,
        }
    }

    /// Built-in corpus with default calibration.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(Self::new(KeywordCorpus::builtin()?, CalibrationConfig::default()))
    }

    pub fn with_context_reweight(mut self, factor: f64) -> Self {
        self.context_reweight = factor;
        self
    }

    pub fn corpus(&self) -> &KeywordCorpus {
        &self.corpus
    }

    /// Classify `request`. `context` supplies session signals; pass
    /// [`arbiter_core::traits::NoContext`] for stateless use.
    pub fn classify(&self, request: &str, context: &dyn IContextSignals) -> ClassificationTrace {
        let request = request.to_lowercase();
        let matcher = BinaryMatcher::new(&self.corpus);

        let binary = matcher.match_systems(&request);
        let mut cross_scores =
            (binary.len() != 1).then(|| CrossScores::compute(&self.corpus, &request));
        let phase2_active = cross_scores.as_ref().is_some_and(CrossScores::phase2_active);

        let mut context_reweighted = false;
        let systems = match cross_scores.as_mut() {
            Some(scores) if binary.is_empty() && scores.has_nonzero() => {
                context_reweighted = scores.reweight(self.context_reweight, |system| {
                    context.system_affinity(system)
                });
                scores.reconstruct(self.calibration.reconstruction_gap)
            }
            _ => binary.clone(),
        };

        let domains = matcher.match_domains(&request, &systems);
        let (gap, dominance) = cross_scores
            .as_ref()
            .map_or((0.0, 0.0), |s| (s.gap(), s.dominance()));
        let calibrated = calibrate(
            &CalibrationInput {
                total_binary_matches: binary.len(),
                final_system_count: systems.len(),
                has_subdomain: !domains.is_empty(),
                phase2_active,
                gap,
                dominance,
            },
            &self.calibration,
        );

        let prior_boost = if binary.is_empty() || systems.is_empty() {
            0.0
        } else {
            context.prior_boost(&systems, binary.len()).max(0.0)
        };
        let ceiling = if systems.len() >= 2 {
            self.calibration.multi_ceiling
        } else {
            MAX_LIVE_CONFIDENCE
        };
        let confidence = if prior_boost > 0.0 {
            (calibrated + prior_boost).min(ceiling)
        } else {
            calibrated
        };

        let source = if !phase2_active {
            ClassifierSource::KeywordFastPath
        } else if context_reweighted || prior_boost > 0.0 {
            ClassifierSource::KeywordWeightedContext
        } else {
            ClassifierSource::KeywordWeighted
        };

        let result = ClassificationResult::new(systems, domains, confidence, source);
        tracing::debug!(
            binary = binary.len(),
            phase2_active,
            pattern = %result.pattern(),
            confidence = result.confidence(),
            prior_boost,
            source = %result.classifier_source(),
            "classified request"
        );

        ClassificationTrace {
            result,
            binary_matches: binary,
            cross_scores,
            calibrated,
            prior_boost,
            context_reweighted,
        }
    }
}
