use actix_web::{web, HttpRequest, HttpResponse};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared_types::{CurrentUserResponse, LoginRequest, SignupRequest, SignupResponse, UserType};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{orgs, services, sources, users, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;
use crate::helpers::{industries, tags, validation};

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Creates the user, their default org (tagged with the normalized company
/// name), and the industry-template service/source vocabulary in one go.
pub async fn signup(
    db: web::Data<Arc<Database>>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();

    validation::validate_email(&req.email)?;
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if req.company_name.trim().is_empty() {
        return Err(ApiError::Validation("Company name is required".to_string()));
    }

    let conn = db.async_connection.clone();
    if users::get_user_by_email(conn.clone(), &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = users::create_user(
        conn.clone(),
        &Uuid::new_v4().to_string(),
        &req.email,
        &password_hash,
        req.name.trim(),
        Some(req.company_name.trim()),
        UserType::BusinessOwner,
        req.industry.as_deref(),
    )
    .await?;

    let company_tag = tags::normalize_company_tag(&req.company_name);
    let org = orgs::create_org(
        conn.clone(),
        &Uuid::new_v4().to_string(),
        req.company_name.trim(),
        &user.id,
        Some(&company_tag),
    )
    .await?;

    let template = industries::get_industry_template(req.industry.as_deref().unwrap_or("general"));
    for name in template.services {
        services::create_service(conn.clone(), &Uuid::new_v4().to_string(), name, &org.id).await?;
    }
    for name in template.sources {
        sources::create_source(conn.clone(), &Uuid::new_v4().to_string(), name, &org.id).await?;
    }

    tracing::info!(user_id = %user.id, org_id = %org.id, "new signup");

    Ok(HttpResponse::Created().json(SignupResponse {
        user,
        org,
        services_count: template.services.len(),
        sources_count: template.sources.len(),
    }))
}

/// Wrong email and wrong password produce the same response.
pub async fn login(
    db: web::Data<Arc<Database>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = request.into_inner();

    let Some((user, stored_hash)) =
        users::get_user_by_email(db.async_connection.clone(), &req.email).await?
    else {
        return Err(ApiError::Unauthorized);
    };

    if !verify_password(&req.password, &stored_hash) {
        return Err(ApiError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(user))
}

/// Who-am-I lookup for the id in the `x-user-id` header, with the orgs the
/// caller owns. A stale id (user deleted since the header was issued) is a
/// NotFound, not an authorization failure.
pub async fn current_user(
    db: web::Data<Arc<Database>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let conn = db.async_connection.clone();

    let user = users::get_user(conn.clone(), &user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let orgs = orgs::list_orgs_for_user(conn, &user_id).await?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse { user, orgs }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::test_db;
    use actix_web::{test as actix_test, App};

    #[actix_web::test]
    async fn test_current_user_returns_user_and_orgs() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();

        let user = users::create_user(
            conn.clone(),
            "user-1",
            "owner@example.com",
            "hash",
            "Owner",
            Some("AC Guys"),
            UserType::BusinessOwner,
            Some("hvac"),
        )
        .await
        .unwrap();
        orgs::create_org(conn, "org-1", "AC Guys", &user.id, Some("ac guys"))
            .await
            .unwrap();

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(db)))
                .route("/api/me", web::get().to(current_user)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("x-user-id", "user-1"))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user"]["email"], "owner@example.com");
        assert_eq!(body["orgs"][0]["id"], "org-1");
    }

    #[actix_web::test]
    async fn test_current_user_requires_identity_header() {
        let (_dir, db) = test_db();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(db)))
                .route("/api/me", web::get().to(current_user)),
        )
        .await;

        let missing = actix_test::TestRequest::get().uri("/api/me").to_request();
        let resp = actix_test::call_service(&app, missing).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);

        let stale = actix_test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("x-user-id", "no-such-user"))
            .to_request();
        let resp = actix_test::call_service(&app, stale).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
