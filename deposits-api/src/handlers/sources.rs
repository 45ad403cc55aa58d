use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{CreateSourceRequest, SourcesResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{orgs, sources, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;

pub async fn create_source(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateSourceRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let body = request.into_inner();

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Source name is required".to_string()));
    }

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &body.org_id, &user_id).await?;

    let source = sources::create_source(
        conn,
        &Uuid::new_v4().to_string(),
        body.name.trim(),
        &body.org_id,
    )
    .await?;

    Ok(HttpResponse::Created().json(source))
}

pub async fn list_sources(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let conn = db.async_connection.clone();

    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    let sources = sources::list_sources(conn, &org_id).await?;

    Ok(HttpResponse::Ok().json(SourcesResponse { sources }))
}

pub async fn delete_source(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let source_id = path.into_inner();
    let conn = db.async_connection.clone();

    let source = sources::get_source(conn.clone(), &source_id)
        .await?
        .ok_or(ApiError::NotFound("Source"))?;
    orgs::require_org_owned(conn.clone(), &source.org_id, &user_id).await?;

    sources::delete_source(conn, &source_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
