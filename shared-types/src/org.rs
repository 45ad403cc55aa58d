use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub webhook_url: Option<String>,
    /// Normalized (lowercased, trimmed) label attached to this org's leads.
    pub company_tag: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateOrgRequest {
    pub name: String,
    pub company_tag: Option<String>,
    /// Initial service vocabulary; omitted means seed a generic default.
    pub services: Option<Vec<String>>,
    /// Initial source vocabulary; omitted means seed a generic default.
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateWebhookRequest {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateCompanyTagRequest {
    pub company_tag: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSpreadsheetRequest {
    pub spreadsheet_id: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OrgsResponse {
    pub orgs: Vec<Org>,
}
