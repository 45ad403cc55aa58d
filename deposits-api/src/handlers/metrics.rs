use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::database::{leads, orgs, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;
use crate::helpers::metrics;

/// Dashboard metrics are computed on read from the org's full lead list;
/// nothing is pre-aggregated.
pub async fn get_metrics(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let conn = db.async_connection.clone();

    orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    let leads = leads::list_leads(conn, &org_id, None).await?;

    Ok(HttpResponse::Ok().json(metrics::compute_metrics(&leads)))
}
