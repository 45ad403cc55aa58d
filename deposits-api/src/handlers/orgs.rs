use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{
    CreateOrgRequest, OrgsResponse, UpdateCompanyTagRequest, UpdateSpreadsheetRequest,
    UpdateWebhookRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{orgs, services, sources, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;
use crate::helpers::tags;

const DEFAULT_SERVICES: &[&str] = &["Service 1", "Service 2"];
const DEFAULT_SOURCES: &[&str] = &["Direct", "Referral"];

/// Creates the org with a usable vocabulary: caller-supplied service and
/// source lists, or a generic default when omitted. Agency sub-accounts go
/// through here rather than signup.
pub async fn create_org(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateOrgRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let body = request.into_inner();

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Organization name is required".to_string(),
        ));
    }

    let company_tag = body
        .company_tag
        .as_deref()
        .map(tags::normalize_company_tag)
        .filter(|t| !t.is_empty());

    let conn = db.async_connection.clone();
    let org = orgs::create_org(
        conn.clone(),
        &Uuid::new_v4().to_string(),
        body.name.trim(),
        &user_id,
        company_tag.as_deref(),
    )
    .await?;

    let service_names: Vec<String> = match body.services {
        Some(list) if !list.is_empty() => list,
        _ => DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
    };
    let source_names: Vec<String> = match body.sources {
        Some(list) if !list.is_empty() => list,
        _ => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
    };

    for name in &service_names {
        if name.trim().is_empty() {
            continue;
        }
        services::create_service(conn.clone(), &Uuid::new_v4().to_string(), name.trim(), &org.id)
            .await?;
    }
    for name in &source_names {
        if name.trim().is_empty() {
            continue;
        }
        sources::create_source(conn.clone(), &Uuid::new_v4().to_string(), name.trim(), &org.id)
            .await?;
    }

    Ok(HttpResponse::Created().json(org))
}

pub async fn list_orgs(
    db: web::Data<Arc<Database>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let orgs = orgs::list_orgs_for_user(db.async_connection.clone(), &user_id).await?;

    Ok(HttpResponse::Ok().json(OrgsResponse { orgs }))
}

pub async fn get_org(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org =
        orgs::require_org_owned(db.async_connection.clone(), &path.into_inner(), &user_id).await?;

    Ok(HttpResponse::Ok().json(org))
}

pub async fn delete_org(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let conn = db.async_connection.clone();

    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    orgs::delete_org(conn, &org_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn update_webhook(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateWebhookRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let body = request.into_inner();

    if let Some(url) = &body.webhook_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::Validation(
                "Webhook URL must start with http:// or https://".to_string(),
            ));
        }
    }

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    orgs::update_webhook_url(conn.clone(), &org_id, body.webhook_url.as_deref()).await?;

    let org = orgs::require_org_owned(conn, &org_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(org))
}

/// The tag is normalized before storage; an empty or whitespace-only tag
/// clears it.
pub async fn update_company_tag(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateCompanyTagRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();

    let company_tag = request
        .into_inner()
        .company_tag
        .as_deref()
        .map(tags::normalize_company_tag)
        .filter(|t| !t.is_empty());

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    orgs::update_company_tag(conn.clone(), &org_id, company_tag.as_deref()).await?;

    let org = orgs::require_org_owned(conn, &org_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(org))
}

pub async fn update_spreadsheet(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    request: web::Json<UpdateSpreadsheetRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let spreadsheet_id = request
        .into_inner()
        .spreadsheet_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    orgs::update_spreadsheet_id(conn.clone(), &org_id, spreadsheet_id.as_deref()).await?;

    let org = orgs::require_org_owned(conn, &org_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(org))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::test_db;
    use crate::database::users;
    use actix_web::{test, App};
    use shared_types::UserType;

    async fn seed_user(conn: crate::database::AsyncDbConnection) -> String {
        users::create_user(
            conn,
            "user-1",
            "owner@example.com",
            "hash",
            "Owner",
            Some("AC Guys"),
            UserType::BusinessOwner,
            None,
        )
        .await
        .unwrap();
        "user-1".to_string()
    }

    #[actix_web::test]
    async fn test_create_org_seeds_supplied_vocabulary() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let user_id = seed_user(conn.clone()).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(db)))
                .route("/api/orgs", web::post().to(create_org)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/orgs")
            .insert_header(("x-user-id", user_id.as_str()))
            .set_json(serde_json::json!({
                "name": "Sub Account",
                "company_tag": "Sub Account",
                "services": ["Duct Cleaning"],
                "sources": ["Billboard", "Radio"]
            }))
            .to_request();
        let org: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let org_id = org["id"].as_str().unwrap();

        let seeded_services = services::list_services(conn.clone(), org_id).await.unwrap();
        assert_eq!(seeded_services.len(), 1);
        assert_eq!(seeded_services[0].name, "Duct Cleaning");

        let seeded_sources = sources::list_sources(conn, org_id).await.unwrap();
        let names: Vec<&str> = seeded_sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Billboard", "Radio"]);
    }

    #[actix_web::test]
    async fn test_create_org_defaults_vocabulary_when_omitted() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let user_id = seed_user(conn.clone()).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(db)))
                .route("/api/orgs", web::post().to(create_org)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/orgs")
            .insert_header(("x-user-id", user_id.as_str()))
            .set_json(serde_json::json!({ "name": "Sub Account" }))
            .to_request();
        let org: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let org_id = org["id"].as_str().unwrap();

        let seeded_services = services::list_services(conn.clone(), org_id).await.unwrap();
        let service_names: Vec<&str> =
            seeded_services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(service_names, vec!["Service 1", "Service 2"]);

        let seeded_sources = sources::list_sources(conn, org_id).await.unwrap();
        let source_names: Vec<&str> = seeded_sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(source_names, vec!["Direct", "Referral"]);
    }
}
