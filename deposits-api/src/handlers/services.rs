use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{CreateServiceRequest, ServicesResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{orgs, services, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;

pub async fn create_service(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateServiceRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let body = request.into_inner();

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Service name is required".to_string()));
    }

    let conn = db.async_connection.clone();
    orgs::require_org_owned(conn.clone(), &body.org_id, &user_id).await?;

    let service = services::create_service(
        conn,
        &Uuid::new_v4().to_string(),
        body.name.trim(),
        &body.org_id,
    )
    .await?;

    Ok(HttpResponse::Created().json(service))
}

pub async fn list_services(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let conn = db.async_connection.clone();

    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    let services = services::list_services(conn, &org_id).await?;

    Ok(HttpResponse::Ok().json(ServicesResponse { services }))
}

pub async fn delete_service(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let service_id = path.into_inner();
    let conn = db.async_connection.clone();

    let service = services::get_service(conn.clone(), &service_id)
        .await?
        .ok_or(ApiError::NotFound("Service"))?;
    orgs::require_org_owned(conn.clone(), &service.org_id, &user_id).await?;

    services::delete_service(conn, &service_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
