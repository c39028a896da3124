//! The advisor handle shared by every orchestrator

use crate::response::LearningMetadata;
use chrono::{DateTime, Utc};
use setupkit_camtools::{
    CylindricalDetector, FeatureClassifier, FeedsCalculator, GeometryType, OrientationAnalyzer,
};
use setupkit_core::{Feature, MaterialLibrary};
use setupkit_learning::{
    get_similar_context_feedback, ConfidenceAdjuster, FeedbackStore, InMemoryStore,
    PreferenceStore,
};
use setupkit_settings::EngineConfig;
use std::sync::Arc;

/// Feedback operation type for stock suggestions
pub const STOCK_SETUP_OPERATION: &str = "stock_setup";
/// Feedback operation type for toolpath suggestions
pub const TOOLPATH_STRATEGY_OPERATION: &str = "toolpath_strategy";

/// Suggestion engine bound to a configuration and a store.
///
/// Holds no mutable state of its own; every call reads the stores and
/// computes from scratch, so one advisor can be shared across threads.
#[derive(Clone)]
pub struct SetupAdvisor {
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) preferences: Arc<dyn PreferenceStore>,
    pub(crate) feedback: Arc<dyn FeedbackStore>,
    pub(crate) materials: MaterialLibrary,
    clock: fn() -> DateTime<Utc>,
}

impl std::fmt::Debug for SetupAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupAdvisor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SetupAdvisor {
    /// Advisor over separate preference and feedback stores
    pub fn new(
        config: EngineConfig,
        preferences: Arc<dyn PreferenceStore>,
        feedback: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            preferences,
            feedback,
            materials: MaterialLibrary::default(),
            clock: Utc::now,
        }
    }

    /// Advisor over one store that holds both preferences and feedback
    pub fn with_store<S>(config: EngineConfig, store: Arc<S>) -> Self
    where
        S: PreferenceStore + FeedbackStore + 'static,
    {
        Self::new(config, store.clone(), store)
    }

    /// Advisor over a fresh in-memory store
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Replace the clock used for recency weighting
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub(crate) fn resolve_material(&self, material: Option<&str>) -> String {
        material
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.orchestration.default_material.as_str())
            .to_string()
    }

    pub(crate) fn classifier(&self) -> FeatureClassifier {
        FeatureClassifier::new(
            self.config.classifier.clone(),
            self.config.confidence.clone(),
        )
    }

    pub(crate) fn classify(&self, features: &[Feature]) -> GeometryType {
        self.classifier().classify_geometry_type(features)
    }

    /// Host features re-bucketed and scored by the classifier.
    ///
    /// Error entries pass through unchanged.
    pub(crate) fn refine_features(&self, features: &[Feature]) -> Vec<Feature> {
        let classifier = self.classifier();
        features
            .iter()
            .cloned()
            .map(|f| classifier.refine(f))
            .collect()
    }

    pub(crate) fn orientation_analyzer(&self) -> OrientationAnalyzer {
        OrientationAnalyzer::new(self.config.orientation.clone())
    }

    pub(crate) fn cylindrical_detector(&self) -> CylindricalDetector {
        CylindricalDetector::new(self.config.cylindrical.clone())
    }

    pub(crate) fn feeds_calculator(&self) -> FeedsCalculator {
        FeedsCalculator::new(self.config.effective_toolpath(), self.materials.clone())
    }

    /// Learning metadata from similar past feedback.
    ///
    /// `None` when there is no history or the store cannot be read.
    pub(crate) fn learning_metadata(
        &self,
        operation_type: &str,
        material: &str,
        geometry_type: &str,
    ) -> Option<LearningMetadata> {
        let history = match get_similar_context_feedback(
            self.feedback.as_ref(),
            operation_type,
            material,
            geometry_type,
            Some(self.config.orchestration.matcher_limit),
        ) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to read feedback history: {}", e);
                return None;
            }
        };
        if history.is_empty() {
            return None;
        }

        let adjuster = ConfidenceAdjuster::new(self.config.learning.clone());
        let adjusted = adjuster.adjust(
            self.config.orchestration.base_confidence,
            &history,
            self.now(),
        );
        let notification = adjuster.should_notify(&history).then(|| {
            format!(
                "I noticed patterns in your preferences for {}. Future suggestions will reflect what you've chosen before.",
                material
            )
        });

        Some(LearningMetadata {
            sample_count: history.len(),
            adjusted_confidence: adjusted.confidence,
            source: adjusted.source,
            notification,
        })
    }
}
