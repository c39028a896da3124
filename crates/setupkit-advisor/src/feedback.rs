//! Recording user choices and managing the feedback history

use crate::advisor::SetupAdvisor;
use crate::error::{AdvisorError, AdvisorResult, ErrorBody};
use crate::request::RecordChoiceRequest;
use crate::response::{ClearResponse, ExportResponse, RecordChoiceResponse};
use serde_json::{json, Value};
use setupkit_learning::{
    clear_feedback_history, export_feedback_history, get_feedback_statistics, ExportFormat,
    FeedbackStatistics, FeedbackType, NewFeedback,
};

const IMPLICIT: &str = "implicit";

impl SetupAdvisor {
    /// Record how the user reacted to a suggestion.
    ///
    /// A store that rejects the write yields `not_recorded`; bad input
    /// yields an `error` response.
    pub fn record_user_choice(&self, request: &RecordChoiceRequest) -> RecordChoiceResponse {
        match self.try_record_user_choice(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Recording user choice failed: {}", e);
                RecordChoiceResponse::Error(ErrorBody::from(&e))
            }
        }
    }

    fn try_record_user_choice(
        &self,
        request: &RecordChoiceRequest,
    ) -> AdvisorResult<RecordChoiceResponse> {
        let operation_type = request.operation_type.trim();
        if operation_type.is_empty() {
            return Err(AdvisorError::MissingInput("operation_type".to_string()));
        }
        let material = request.material.trim();
        if material.is_empty() {
            return Err(AdvisorError::MissingInput("material".to_string()));
        }
        if request.suggestion.is_null() {
            return Err(AdvisorError::MissingInput("suggestion".to_string()));
        }

        let geometry_type = match (&request.geometry_type, &request.geometry) {
            (Some(g), _) if !g.trim().is_empty() => g.trim().to_string(),
            (_, Some(geometry)) => self
                .classify(&self.refine_features(&geometry.features))
                .as_str()
                .to_string(),
            _ => return Err(AdvisorError::MissingInput("geometry_type".to_string())),
        };

        let requested = request.feedback_type.as_deref().unwrap_or(IMPLICIT);
        let feedback_type = FeedbackType::resolve(requested, request.user_choice.as_ref())
            .map_err(AdvisorError::InvalidInput)?;

        let context = json!({
            "operation_type": operation_type,
            "material": material,
            "geometry_type": geometry_type,
        });
        let confidence_before = request
            .suggestion
            .get("confidence_score")
            .or_else(|| request.suggestion.get("confidence"))
            .and_then(Value::as_f64);

        let mut event = NewFeedback::new(operation_type, material, &geometry_type, feedback_type);
        event.context_snapshot = context.clone();
        event.suggestion_payload = request.suggestion.clone();
        event.user_choice = request.user_choice.clone().filter(|c| !c.is_null());
        event.feedback_note = request.note.clone();
        event.confidence_before = confidence_before;

        match self.feedback.append_feedback(event) {
            Ok(stored) => {
                tracing::info!(
                    "Recorded {} feedback #{} for {}",
                    stored.feedback_type,
                    stored.id,
                    stored.operation_type
                );
                Ok(RecordChoiceResponse::Recorded {
                    feedback_id: stored.id,
                    operation_type: stored.operation_type,
                    feedback_type: stored.feedback_type.as_str().to_string(),
                    message: "Feedback recorded successfully".to_string(),
                    context,
                })
            }
            Err(e) => {
                tracing::warn!("Failed to record feedback: {}", e);
                Ok(RecordChoiceResponse::NotRecorded {
                    operation_type: operation_type.to_string(),
                    feedback_type: feedback_type.as_str().to_string(),
                    message: format!("Feedback could not be stored: {}", e),
                })
            }
        }
    }

    /// Acceptance statistics, optionally for one operation type
    pub fn feedback_statistics(&self, operation_type: Option<&str>) -> FeedbackStatistics {
        get_feedback_statistics(self.feedback.as_ref(), operation_type)
    }

    /// Stored feedback as CSV or JSON, oldest first
    pub fn export_feedback_history(
        &self,
        format: ExportFormat,
        operation_type: Option<&str>,
    ) -> ExportResponse {
        match export_feedback_history(self.feedback.as_ref(), format, operation_type) {
            Ok(data) => ExportResponse::Exported {
                format,
                operation_type: operation_type.map(str::to_string),
                data,
            },
            Err(e) => {
                tracing::warn!("Failed to export feedback history: {}", e);
                ExportResponse::Error(ErrorBody::from(&AdvisorError::from(e)))
            }
        }
    }

    /// Delete stored feedback; refused unless `confirm` is set
    pub fn clear_feedback_history(
        &self,
        operation_type: Option<&str>,
        confirm: bool,
    ) -> ClearResponse {
        let scope = operation_type.unwrap_or("all operation types");
        if !confirm {
            return ClearResponse::ConfirmationRequired {
                operation_type: operation_type.map(str::to_string),
                message: format!(
                    "This will delete feedback history for {}. Set confirm=true to proceed.",
                    scope
                ),
            };
        }
        match clear_feedback_history(self.feedback.as_ref(), operation_type) {
            Ok(deleted_count) => ClearResponse::Cleared {
                deleted_count,
                operation_type: operation_type.map(str::to_string),
                message: format!("Cleared {} feedback records ({})", deleted_count, scope),
            },
            Err(e) => {
                tracing::warn!("Failed to clear feedback history: {}", e);
                ClearResponse::Error(ErrorBody::from(&AdvisorError::from(e)))
            }
        }
    }
}
