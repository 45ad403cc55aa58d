use crate::error::ApiError;
use regex::Regex;
use shared_types::{CreateLeadRequest, LeadPatch};
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if !email_regex().is_match(email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

fn validate_estimate_amount(amount: f64) -> Result<(), ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation(
            "Estimate amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_create_lead(req: &CreateLeadRequest) -> Result<(), ApiError> {
    if req.service.trim().is_empty() {
        return Err(ApiError::Validation("Service is required".to_string()));
    }
    if req.source.trim().is_empty() {
        return Err(ApiError::Validation("Source is required".to_string()));
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    if let Some(amount) = req.estimate_amount {
        validate_estimate_amount(amount)?;
    }
    Ok(())
}

pub fn validate_lead_patch(patch: &LeadPatch) -> Result<(), ApiError> {
    if let Some(service) = &patch.service {
        if service.trim().is_empty() {
            return Err(ApiError::Validation("Service cannot be empty".to_string()));
        }
    }
    if let Some(source) = &patch.source {
        if source.trim().is_empty() {
            return Err(ApiError::Validation("Source cannot be empty".to_string()));
        }
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    if let Some(amount) = patch.estimate_amount {
        validate_estimate_amount(amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateLeadRequest {
        CreateLeadRequest {
            org_id: "org".to_string(),
            service: "AC Repair".to_string(),
            source: "Google Ads".to_string(),
            contact_name: None,
            email: None,
            phone: None,
            estimate_amount: None,
            notes: None,
        }
    }

    #[test]
    fn test_empty_service_rejected() {
        let mut req = base_request();
        req.service = "  ".to_string();
        assert!(validate_create_lead(&req).is_err());
    }

    #[test]
    fn test_malformed_email_rejected() {
        let mut req = base_request();
        req.email = Some("not-an-email".to_string());
        assert!(validate_create_lead(&req).is_err());

        req.email = Some("jane@example.com".to_string());
        assert!(validate_create_lead(&req).is_ok());
    }

    #[test]
    fn test_non_positive_estimate_rejected() {
        let mut req = base_request();
        req.estimate_amount = Some(0.0);
        assert!(validate_create_lead(&req).is_err());
        req.estimate_amount = Some(-10.0);
        assert!(validate_create_lead(&req).is_err());
        req.estimate_amount = Some(250.0);
        assert!(validate_create_lead(&req).is_ok());
    }
}
