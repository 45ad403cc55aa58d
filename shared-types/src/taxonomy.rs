use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A service offered by an org, used as the controlled vocabulary for the
/// lead form. Leads store the name as plain text, so deleting a Service
/// does not touch existing leads.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub org_id: String,
    pub created_at: i64,
}

/// A lead source (Google Ads, Referral, ...), scoped to one org.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub org_id: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateServiceRequest {
    pub org_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateSourceRequest {
    pub org_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ServicesResponse {
    pub services: Vec<Service>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SourcesResponse {
    pub sources: Vec<Source>,
}
