use crate::helpers::tags;
use anyhow::{anyhow, Result};
use serde::Serialize;
use shared_types::{Lead, Org};

/// Outbound lead notification. The camelCase keys are the wire contract
/// consumed by per-org webhook receivers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWebhookPayload {
    pub lead_id: String,
    pub org_id: String,
    pub service: String,
    pub source: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub estimate_amount: Option<f64>,
    pub estimate_status: String,
    pub close_status: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: i64,
}

impl LeadWebhookPayload {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            lead_id: lead.id.clone(),
            org_id: lead.org_id.clone(),
            service: lead.service.clone(),
            source: lead.source.clone(),
            contact_name: lead.contact_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            estimate_amount: lead.estimate_amount,
            estimate_status: lead.estimate_status.as_str().to_string(),
            close_status: lead.close_status.as_str().to_string(),
            notes: lead.notes.clone(),
            tags: tags::parse_tags(lead.tags.as_deref()),
            created_at: lead.created_at,
        }
    }
}

/// POST the lead to the org's configured webhook URL. A non-2xx response
/// counts as a failure so the fan-out layer can log it.
pub async fn send_lead(client: &reqwest::Client, org: &Org, lead: &Lead) -> Result<()> {
    let url = org
        .webhook_url
        .as_deref()
        .ok_or_else(|| anyhow!("org has no webhook URL configured"))?;

    let response = client
        .post(url)
        .json(&LeadWebhookPayload::from_lead(lead))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("webhook returned status {}", response.status()));
    }

    Ok(())
}
