pub mod auth;
pub mod export;
pub mod leads;
pub mod metrics;
pub mod orgs;
pub mod services;
pub mod sources;

use crate::error::ApiError;
use actix_web::HttpRequest;

/// Caller identity comes from the `x-user-id` header set by the fronting
/// session layer. A missing or empty header is treated the same as a
/// failed ownership check.
pub(crate) fn require_user_id(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)
}
