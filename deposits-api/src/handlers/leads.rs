use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use shared_types::{
    CloseStatus, CreateLeadRequest, LeadPatch, LeadsResponse, UpdateLeadStatusRequest,
};
use std::sync::Arc;

use crate::database::{leads, orgs, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;
use crate::helpers::validation;
use crate::jobs::sync_manager::{SyncEvent, SyncManager};

#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    pub status: Option<String>,
}

/// `?status=OPEN|WON|LOST` filters the list; `ALL` or no parameter
/// returns everything.
fn parse_status_filter(query: &ListLeadsQuery) -> Result<Option<CloseStatus>, ApiError> {
    match query.status.as_deref() {
        None => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("ALL") => Ok(None),
        Some(raw) => raw
            .parse::<CloseStatus>()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("Unknown close status: {raw}"))),
    }
}

pub async fn create_lead(
    db: web::Data<Arc<Database>>,
    sync: web::Data<Arc<SyncManager>>,
    request: web::Json<CreateLeadRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let body = request.into_inner();
    validation::validate_create_lead(&body)?;

    let conn = db.async_connection.clone();
    let org = orgs::require_org_owned(conn.clone(), &body.org_id, &user_id).await?;
    let lead = leads::create_lead(conn, &org, &body).await?;

    // The row is committed; sync failures only log.
    sync.dispatch(&org, &lead, SyncEvent::Created).await;

    Ok(HttpResponse::Created().json(lead))
}

pub async fn list_leads(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    query: web::Query<ListLeadsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let filter = parse_status_filter(&query)?;

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    let leads = leads::list_leads(conn, &org_id, filter).await?;

    Ok(HttpResponse::Ok().json(LeadsResponse { leads }))
}

pub async fn get_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let conn = db.async_connection.clone();

    let lead = leads::get_lead(conn.clone(), &path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Lead"))?;
    orgs::require_org_owned(conn, &lead.org_id, &user_id).await?;

    Ok(HttpResponse::Ok().json(lead))
}

async fn apply_patch(
    db: &Database,
    sync: &SyncManager,
    lead_id: &str,
    user_id: &str,
    patch: LeadPatch,
) -> Result<HttpResponse, ApiError> {
    validation::validate_lead_patch(&patch)?;

    let conn = db.async_connection.clone();
    let existing = leads::get_lead(conn.clone(), lead_id)
        .await?
        .ok_or(ApiError::NotFound("Lead"))?;
    let org = orgs::require_org_owned(conn.clone(), &existing.org_id, user_id).await?;

    let touches_status = patch.touches_status();
    let lead = leads::update_lead(conn, lead_id, &patch).await?;

    if touches_status {
        sync.dispatch(&org, &lead, SyncEvent::StatusChanged).await;
    }

    Ok(HttpResponse::Ok().json(lead))
}

pub async fn update_lead(
    db: web::Data<Arc<Database>>,
    sync: web::Data<Arc<SyncManager>>,
    path: web::Path<String>,
    request: web::Json<LeadPatch>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    apply_patch(
        &db,
        &sync,
        &path.into_inner(),
        &user_id,
        request.into_inner(),
    )
    .await
}

/// Status-only endpoint. Funnels through the same patch path as the
/// general update, so the pipeline gating applies identically.
pub async fn update_lead_status(
    db: web::Data<Arc<Database>>,
    sync: web::Data<Arc<SyncManager>>,
    path: web::Path<String>,
    request: web::Json<UpdateLeadStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let body = request.into_inner();

    let patch = LeadPatch {
        estimate_status: body.estimate_status,
        close_status: body.close_status,
        ..LeadPatch::default()
    };

    apply_patch(&db, &sync, &path.into_inner(), &user_id, patch).await
}

pub async fn delete_lead(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let lead_id = path.into_inner();
    let conn = db.async_connection.clone();

    let lead = leads::get_lead(conn.clone(), &lead_id)
        .await?
        .ok_or(ApiError::NotFound("Lead"))?;
    orgs::require_org_owned(conn.clone(), &lead.org_id, &user_id).await?;

    leads::delete_lead(conn, &lead_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Manual GHL re-sync. Unlike the fan-out path this surfaces failures to
/// the caller, since they explicitly asked for the sync.
pub async fn sync_lead_to_ghl(
    db: web::Data<Arc<Database>>,
    sync: web::Data<Arc<SyncManager>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let conn = db.async_connection.clone();

    let lead = leads::get_lead(conn.clone(), &path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Lead"))?;
    orgs::require_org_owned(conn, &lead.org_id, &user_id).await?;

    match sync.sync_lead_to_ghl(&lead).await? {
        Some(action) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "synced": true,
            "action": format!("{action:?}").to_lowercase(),
        }))),
        None => Err(ApiError::Validation(
            "GoHighLevel integration is not configured".to_string(),
        )),
    }
}
