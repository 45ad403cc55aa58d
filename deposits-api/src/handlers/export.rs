use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::database::{leads, orgs, Database};
use crate::error::ApiError;
use crate::handlers::require_user_id;
use crate::helpers::csv_export;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Drop the Company Tag column when the export leaves the org context.
    pub include_company_tag: Option<bool>,
}

pub async fn export_leads_csv(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    query: web::Query<ExportQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(&req)?;
    let org_id = path.into_inner();
    let conn = db.async_connection.clone();

    let org = orgs::require_org_owned(conn.clone(), &org_id, &user_id).await?;
    let leads = leads::list_leads(conn, &org_id, None).await?;

    let include_company_tag = query.include_company_tag.unwrap_or(true);
    let csv = csv_export::leads_to_csv(&leads, org.company_tag.as_deref(), include_company_tag)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"leads.csv\"",
        ))
        .body(csv))
}
