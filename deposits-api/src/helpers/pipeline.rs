//! Pipeline gating: a lead may only be marked WON or LOST once its
//! estimate has reached a terminal sub-state (COMPLETED or NO_SHOW).
//! Every mutation path that can touch either status field goes through
//! `validate_transition` before any persistence side-effect.

use crate::error::ApiError;
use shared_types::{CloseStatus, EstimateStatus};

/// Compute the resulting status pair for a partial update: supplied fields
/// override, unspecified fields keep the stored value.
pub fn effective_statuses(
    current_estimate: EstimateStatus,
    current_close: CloseStatus,
    patch_estimate: Option<EstimateStatus>,
    patch_close: Option<CloseStatus>,
) -> (EstimateStatus, CloseStatus) {
    (
        patch_estimate.unwrap_or(current_estimate),
        patch_close.unwrap_or(current_close),
    )
}

/// Accepts or rejects the effective status pair. Estimate transitions are
/// unrestricted in either direction, and reopening a WON/LOST lead is
/// allowed; only the close-before-terminal-estimate combination is gated.
pub fn validate_transition(
    current_estimate: EstimateStatus,
    current_close: CloseStatus,
    patch_estimate: Option<EstimateStatus>,
    patch_close: Option<CloseStatus>,
) -> Result<(EstimateStatus, CloseStatus), ApiError> {
    let (estimate, close) =
        effective_statuses(current_estimate, current_close, patch_estimate, patch_close);

    if close.is_closed() && !estimate.is_terminal() {
        return Err(ApiError::Validation(
            "Cannot mark as won/lost until estimate is completed or no-showed".to_string(),
        ));
    }

    Ok((estimate, close))
}
