use serde::{Deserialize, Serialize};

pub mod lead;
pub mod metrics;
pub mod org;
pub mod taxonomy;
pub mod user;

pub use lead::{
    CloseStatus, CreateLeadRequest, EstimateStatus, Lead, LeadPatch, LeadsResponse,
    ParseStatusError, UpdateLeadStatusRequest,
};
pub use metrics::{DashboardMetrics, MetricTotals, SourceCloseRate, SourceRevenue};
pub use org::{
    CreateOrgRequest, Org, OrgsResponse, UpdateCompanyTagRequest, UpdateSpreadsheetRequest,
    UpdateWebhookRequest,
};
pub use taxonomy::{
    CreateServiceRequest, CreateSourceRequest, Service, ServicesResponse, Source, SourcesResponse,
};
pub use user::{CurrentUserResponse, LoginRequest, SignupRequest, SignupResponse, User, UserType};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
