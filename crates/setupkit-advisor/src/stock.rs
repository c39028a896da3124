//! Stock setup orchestration
//!
//! Gates, in order:
//! 1. No stored preference and `use_defaults` unset: `preference_needed`
//! 2. Best orientation below the threshold and none selected:
//!    `orientation_choice_needed`
//!
//! Otherwise the full suggestion is returned. Offsets come from custom
//! values, then the stored preference, then the configured defaults.

use crate::advisor::{SetupAdvisor, STOCK_SETUP_OPERATION};
use crate::error::{AdvisorError, AdvisorResult, ErrorBody};
use crate::request::StockSetupRequest;
use crate::response::{
    AppliedOffsets, OrientationAlternative, OrientationOption, OrientationSummary,
    RectangularStock, RoundStock, StockOptions, StockSetupResponse, StockShape, StockSuggestion,
    SuggestedDefaults,
};
use setupkit_camtools::{
    calculate_stock_dimensions, CylindricalAnalysis, OrientationAxis, OrientationCandidate,
    StockOffsets,
};
use setupkit_core::{round_to, Axis, BoundingBox, Quantity};
use setupkit_learning::{StockPreference, StoreError};

impl SetupAdvisor {
    /// Suggest stock dimensions, orientation and setup sequence.
    ///
    /// Never fails: errors become a `status: "error"` response.
    pub fn suggest_stock_setup(&self, request: &StockSetupRequest) -> StockSetupResponse {
        match self.try_suggest_stock_setup(request) {
            Ok(response) => {
                tracing::info!("Stock setup suggestion: {}", response.status());
                response
            }
            Err(e) => {
                tracing::warn!("Stock setup suggestion failed: {}", e);
                StockSetupResponse::Error(ErrorBody::from(&e))
            }
        }
    }

    fn try_suggest_stock_setup(
        &self,
        request: &StockSetupRequest,
    ) -> AdvisorResult<StockSetupResponse> {
        let bbox = request.geometry.require_bounding_box()?;
        let selected = request
            .selected_orientation
            .as_deref()
            .map(str::parse::<OrientationAxis>)
            .transpose()
            .map_err(|e| AdvisorError::InvalidInput(e.to_string()))?;

        let material = self.resolve_material(request.material.as_deref());
        let features = self.refine_features(&request.geometry.features);
        let geometry_type = self.classify(&features).as_str().to_string();
        let gates = &self.config.orchestration;
        let defaults = &self.config.stock;

        let preference = if request.use_defaults {
            None
        } else {
            match self.preferences.get_stock_preference(&material, &geometry_type) {
                Ok(Some(pref)) => Some(pref),
                Ok(None) => {
                    return Ok(StockSetupResponse::PreferenceNeeded {
                        message: format!(
                            "No stored preference for '{}' + '{}'. Please establish a preference for this combination, or use use_defaults=true.",
                            material, geometry_type
                        ),
                        material,
                        geometry_type,
                        suggested_defaults: SuggestedDefaults {
                            offsets_xy: Quantity::length_in(
                                defaults.default_xy_offset_mm,
                                request.unit_system,
                            ),
                            offsets_z: Quantity::length_in(
                                defaults.default_z_offset_mm,
                                request.unit_system,
                            ),
                            stock_shape: StockShape::Rectangular,
                        },
                        how_to_proceed: "Call suggest_stock_setup with use_defaults=true to proceed with defaults, or with save_as_preference=true to save current values as preference.".to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to read stock preference, using defaults: {}", e);
                    None
                }
            }
        };

        let learning = self.learning_metadata(STOCK_SETUP_OPERATION, &material, &geometry_type);

        let candidates = self.orientation_analyzer().suggest_orientations(&bbox, &features)?;
        let Some(best) = candidates.first() else {
            return Err(AdvisorError::InvalidInput(
                "no orientation could be scored".to_string(),
            ));
        };

        if best.score < gates.orientation_threshold && selected.is_none() {
            let alternatives: Vec<OrientationOption> = candidates
                .iter()
                .filter(|c| best.score - c.score < gates.alternative_window)
                .map(orientation_option)
                .collect();
            return Ok(StockSetupResponse::OrientationChoiceNeeded {
                message: format!(
                    "Multiple valid orientations with similar scores. Best score: {:.2} (below {:.2} threshold).",
                    best.score, gates.orientation_threshold
                ),
                best_orientation: orientation_option(best),
                alternatives,
                how_to_proceed: "Call suggest_stock_setup with selected_orientation='X_UP'|'Y_UP'|'Z_UP' to choose an orientation.".to_string(),
            });
        }

        let chosen = selected
            .and_then(|axis| candidates.iter().find(|c| c.axis == axis))
            .unwrap_or(best);
        let close_alternatives: Vec<OrientationAlternative> = if best.score > 0.0 {
            candidates[1..]
                .iter()
                .filter(|c| best.score - c.score < gates.alternative_window)
                .map(|c| OrientationAlternative {
                    axis: c.axis,
                    score: c.score,
                    reasoning: c.reasoning.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let (offsets, offset_source) = match (&request.custom_offsets, &preference) {
            (Some(custom), _) => (
                StockOffsets::from_mm(
                    offset_mm(custom.xy, "custom_offsets.xy", defaults.default_xy_offset_mm)?,
                    offset_mm(custom.z, "custom_offsets.z", defaults.default_z_offset_mm)?,
                ),
                "from: custom",
            ),
            (None, Some(pref)) => (
                StockOffsets::from_mm(pref.offsets_xy_mm, pref.offsets_z_mm),
                "from: user_preference",
            ),
            (None, None) => (defaults.default_offsets(), "from: default"),
        };
        let source = match &learning {
            Some(meta) if request.custom_offsets.is_none() && meta.source.is_learned() => {
                format!("from: {}", meta.source)
            }
            _ => offset_source.to_string(),
        };

        let stock = calculate_stock_dimensions(
            &bbox,
            &offsets,
            request.round_to_standard,
            request.unit_system,
        )?;

        let cylindrical = self.cylindrical_detector().detect(&request.geometry);
        let round = cylindrical
            .is_cylindrical
            .then(|| round_stock(&cylindrical, &bbox, &offsets));
        let shape = if round.is_some() {
            StockShape::Round
        } else {
            StockShape::Rectangular
        };

        if request.save_as_preference {
            let mut pref = StockPreference::new(&material, &geometry_type);
            pref.offsets_xy_mm = offsets.xy_mm();
            pref.offsets_z_mm = offsets.z_mm();
            pref.preferred_orientation = Some(chosen.axis.as_str().to_string());
            pref.stock_shape = shape.as_str().to_string();
            if let Err(e) = self.preferences.save_stock_preference(pref) {
                log_save_failure(&e);
            }
        }

        let machine_warnings = self
            .config
            .machine
            .as_ref()
            .map(|m| m.envelope_warnings(stock.dims_mm()))
            .unwrap_or_default();

        let confidence = learning
            .as_ref()
            .map(|m| m.adjusted_confidence)
            .unwrap_or(gates.base_confidence);

        Ok(StockSetupResponse::Success(Box::new(StockSuggestion {
            stock_dimensions: StockOptions {
                rectangular: RectangularStock {
                    width: stock.width,
                    depth: stock.depth,
                    height: stock.height,
                },
                round,
            },
            recommended_shape: shape,
            shape_trade_offs: cylindrical.trade_offs.clone(),
            orientation: OrientationSummary {
                recommended: chosen.axis,
                score: chosen.score,
                reasoning: chosen.reasoning.clone(),
                alternatives: close_alternatives,
            },
            setup_sequence: chosen.setup_sequence.clone(),
            offsets_applied: AppliedOffsets {
                xy: Quantity::length_in(offsets.xy_mm(), request.unit_system),
                z: Quantity::length_in(offsets.z_mm(), request.unit_system),
            },
            source,
            material,
            geometry_type,
            unit_system: request.unit_system,
            raw_dimensions: stock.raw_dimensions,
            rounded_to_standard: stock.rounded_to_standard,
            learning_metadata: learning,
            confidence,
            machine_warnings,
        })))
    }
}

/// A caller offset in mm; absent sides take the default
fn offset_mm(offset: Option<Quantity>, field: &str, default_mm: f64) -> AdvisorResult<f64> {
    match offset {
        None => Ok(default_mm),
        Some(q) if q.unit.is_length() => Ok(q.to_mm()),
        Some(q) => Err(AdvisorError::InvalidInput(format!(
            "{} must be a length, got {}",
            field, q
        ))),
    }
}

fn orientation_option(candidate: &OrientationCandidate) -> OrientationOption {
    OrientationOption {
        axis: candidate.axis,
        score: candidate.score,
        reasoning: candidate.reasoning.clone(),
        setup_sequence: candidate.setup_sequence.clone(),
    }
}

/// Bar stock: enclosing diameter plus XY offset on both sides, length along
/// the turning axis plus the Z offset
fn round_stock(
    cylindrical: &CylindricalAnalysis,
    bbox: &BoundingBox,
    offsets: &StockOffsets,
) -> RoundStock {
    let axis = cylindrical.cylinder_axis.unwrap_or(Axis::Z);
    let diameter = cylindrical.enclosing_diameter.to_mm() + 2.0 * offsets.xy_mm();
    let length = bbox.extent_mm(axis) + offsets.z_mm();
    RoundStock {
        diameter: Quantity::mm(round_to(diameter, 1)),
        length: Quantity::mm(round_to(length, 1)),
        cylinder_axis: axis,
    }
}

pub(crate) fn log_save_failure(err: &StoreError) {
    tracing::warn!("Failed to save preference: {}", err);
}
