//! Fan-out of lead events to the external sync targets. Targets run
//! concurrently and are failure-isolated: a dead webhook or an expired
//! integration token never fails the originating request, it only logs.

use crate::config::ApiConfig;
use crate::integrations::{ghl, sheets, webhook};
use shared_types::{Lead, Org};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Created,
    StatusChanged,
}

pub struct SyncManager {
    http: reqwest::Client,
    ghl: Option<ghl::GhlClient>,
    sheets: Option<sheets::SheetsClient>,
}

impl SyncManager {
    pub fn new(config: &ApiConfig) -> Self {
        let http = reqwest::Client::new();
        let ghl = config
            .ghl
            .clone()
            .map(|c| ghl::GhlClient::new(c, http.clone()));
        let sheets = config
            .google_sheets
            .clone()
            .map(|c| sheets::SheetsClient::new(c, http.clone()));

        Self { http, ghl, sheets }
    }

    /// Push one lead event to every configured target. Runs after the
    /// database write has committed; callers await it but never see its
    /// failures.
    pub async fn dispatch(&self, org: &Org, lead: &Lead, event: SyncEvent) {
        tokio::join!(
            self.send_webhook(org, lead),
            self.sync_ghl(org, lead),
            self.sync_sheets(org, lead, event),
        );
    }

    async fn send_webhook(&self, org: &Org, lead: &Lead) {
        if org.webhook_url.is_none() {
            return;
        }
        if let Err(e) = webhook::send_lead(&self.http, org, lead).await {
            tracing::warn!(
                org_id = %org.id,
                lead_id = %lead.id,
                "webhook sync failed: {e}"
            );
        }
    }

    async fn sync_ghl(&self, org: &Org, lead: &Lead) {
        let Some(client) = &self.ghl else {
            return;
        };
        let contact = client.contact_from_lead(lead);
        if let Err(e) = client.upsert_contact(contact, &lead.id).await {
            tracing::warn!(
                org_id = %org.id,
                lead_id = %lead.id,
                "GHL sync failed: {e}"
            );
        }
    }

    async fn sync_sheets(&self, org: &Org, lead: &Lead, event: SyncEvent) {
        let Some(client) = &self.sheets else {
            return;
        };
        let Some(spreadsheet_id) = client.spreadsheet_for(org) else {
            return;
        };

        let result = match event {
            SyncEvent::Created => client.append_lead(&spreadsheet_id, org, lead).await,
            SyncEvent::StatusChanged => client.update_lead(&spreadsheet_id, org, lead).await,
        };
        if let Err(e) = result {
            tracing::warn!(
                org_id = %org.id,
                lead_id = %lead.id,
                "sheets sync failed: {e}"
            );
        }
    }

    /// Manual GHL re-sync, surfacing the error to the caller. Used by the
    /// explicit sync endpoint rather than the fan-out path.
    pub async fn sync_lead_to_ghl(
        &self,
        lead: &Lead,
    ) -> anyhow::Result<Option<ghl::UpsertAction>> {
        let Some(client) = &self.ghl else {
            return Ok(None);
        };
        let contact = client.contact_from_lead(lead);
        let (_, action) = client.upsert_contact(contact, &lead.id).await?;
        Ok(Some(action))
    }
}
