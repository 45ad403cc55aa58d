//! GoHighLevel contact sync. Contacts are upserted keyed by email; leads
//! without an email get a deterministic placeholder address derived from
//! the lead id so repeat syncs land on the same contact.

use crate::config::GhlConfig;
use crate::helpers::tags;
use anyhow::{anyhow, Result};
use serde::Serialize;
use shared_types::Lead;

pub fn generate_placeholder_email(identifier: &str) -> String {
    format!("{identifier}@noemail.com")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhlContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub custom_fields: Vec<GhlCustomField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GhlCustomField {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContactBody<'a> {
    location_id: &'a str,
    #[serde(flatten)]
    contact: &'a GhlContact,
}

pub struct GhlClient {
    config: GhlConfig,
    http: reqwest::Client,
}

impl GhlClient {
    pub fn new(config: GhlConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Maps the pipeline fields into the deployment's fixed custom-field
    /// ids and carries the lead's tag list over as contact tags.
    pub fn contact_from_lead(&self, lead: &Lead) -> GhlContact {
        let (first_name, last_name) = match &lead.contact_name {
            Some(name) => {
                let mut parts = name.split_whitespace();
                let first = parts.next().map(|s| s.to_string());
                let rest = parts.collect::<Vec<_>>().join(" ");
                (first, (!rest.is_empty()).then_some(rest))
            }
            None => (None, None),
        };

        let fields = &self.config.custom_fields;
        let mut custom_fields = vec![
            GhlCustomField {
                id: fields.service.clone(),
                value: lead.service.clone(),
            },
            GhlCustomField {
                id: fields.source.clone(),
                value: lead.source.clone(),
            },
            GhlCustomField {
                id: fields.estimate_status.clone(),
                value: lead.estimate_status.as_str().to_string(),
            },
            GhlCustomField {
                id: fields.close_status.clone(),
                value: lead.close_status.as_str().to_string(),
            },
        ];
        if let Some(amount) = lead.estimate_amount {
            custom_fields.push(GhlCustomField {
                id: fields.estimate_amount.clone(),
                value: amount.to_string(),
            });
        }

        GhlContact {
            first_name,
            last_name,
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            tags: tags::parse_tags(lead.tags.as_deref()),
            custom_fields,
        }
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.config.private_integration_token)
            .header("Version", &self.config.api_version)
            .header("Accept", "application/json")
    }

    pub async fn find_contact_by_email(&self, email: &str) -> Result<Option<serde_json::Value>> {
        let url = format!("{}/contacts/", self.config.base_url);
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[
                ("locationId", self.config.location_id.as_str()),
                ("query", email),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!("GHL contact search failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        let found = body["contacts"]
            .as_array()
            .and_then(|contacts| contacts.first().cloned());

        Ok(found)
    }

    pub async fn create_contact(&self, contact: &GhlContact) -> Result<serde_json::Value> {
        let url = format!("{}/contacts/", self.config.base_url);
        let body = CreateContactBody {
            location_id: &self.config.location_id,
            contact,
        };

        let response = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("GHL create contact failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    pub async fn update_contact(
        &self,
        contact_id: &str,
        contact: &GhlContact,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/contacts/{}", self.config.base_url, contact_id);

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(contact)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("GHL update contact failed: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    /// Look up by email first; update if found, create if not. Leads with
    /// no email key on the placeholder address derived from `identifier`.
    pub async fn upsert_contact(
        &self,
        mut contact: GhlContact,
        identifier: &str,
    ) -> Result<(serde_json::Value, UpsertAction)> {
        let email = contact
            .email
            .clone()
            .unwrap_or_else(|| generate_placeholder_email(identifier));
        contact.email = Some(email.clone());

        match self.find_contact_by_email(&email).await? {
            Some(existing) => {
                let id = existing["id"]
                    .as_str()
                    .ok_or_else(|| anyhow!("GHL contact record missing id"))?;
                let updated = self.update_contact(id, &contact).await?;
                Ok((updated, UpsertAction::Updated))
            }
            None => {
                let created = self.create_contact(&contact).await?;
                Ok((created, UpsertAction::Created))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GhlCustomFieldIds;
    use shared_types::{CloseStatus, EstimateStatus};

    fn test_config(base_url: String) -> GhlConfig {
        GhlConfig {
            location_id: "loc-1".to_string(),
            private_integration_token: "token".to_string(),
            base_url,
            api_version: "2021-07-28".to_string(),
            custom_fields: GhlCustomFieldIds {
                service: "fld-service".to_string(),
                source: "fld-source".to_string(),
                estimate_amount: "fld-amount".to_string(),
                estimate_status: "fld-est".to_string(),
                close_status: "fld-close".to_string(),
            },
        }
    }

    fn sample_lead(email: Option<&str>) -> Lead {
        Lead {
            id: "lead-1".to_string(),
            org_id: "org-1".to_string(),
            service: "AC Repair".to_string(),
            source: "Google Ads".to_string(),
            contact_name: Some("Jane Q Doe".to_string()),
            email: email.map(|e| e.to_string()),
            phone: Some("+15550001111".to_string()),
            estimate_amount: Some(450.0),
            estimate_status: EstimateStatus::Completed,
            close_status: CloseStatus::Won,
            revenue: None,
            notes: None,
            tags: Some("[\"ac guys\"]".to_string()),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_placeholder_email_is_deterministic() {
        assert_eq!(generate_placeholder_email("lead-1"), "lead-1@noemail.com");
    }

    #[test]
    fn test_contact_mapping_splits_name_and_maps_fields() {
        let client = GhlClient::new(test_config("http://unused".to_string()), reqwest::Client::new());
        let contact = client.contact_from_lead(&sample_lead(Some("jane@example.com")));

        assert_eq!(contact.first_name.as_deref(), Some("Jane"));
        assert_eq!(contact.last_name.as_deref(), Some("Q Doe"));
        assert_eq!(contact.tags, vec!["ac guys".to_string()]);
        assert!(contact
            .custom_fields
            .iter()
            .any(|f| f.id == "fld-est" && f.value == "COMPLETED"));
        assert!(contact
            .custom_fields
            .iter()
            .any(|f| f.id == "fld-amount" && f.value == "450"));
    }

    #[tokio::test]
    async fn test_upsert_creates_when_search_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let search = server
            .mock("GET", "/contacts/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{\"contacts\": []}")
            .create_async()
            .await;
        let create = server
            .mock("POST", "/contacts/")
            .with_status(201)
            .with_body("{\"contact\": {\"id\": \"ghl-1\"}}")
            .create_async()
            .await;

        let client = GhlClient::new(test_config(server.url()), reqwest::Client::new());
        let lead = sample_lead(None);
        let contact = client.contact_from_lead(&lead);
        let (_, action) = client.upsert_contact(contact, &lead.id).await.unwrap();

        assert_eq!(action, UpsertAction::Created);
        search.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_updates_when_contact_exists() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/contacts/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{\"contacts\": [{\"id\": \"ghl-9\"}]}")
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/contacts/ghl-9")
            .with_status(200)
            .with_body("{\"contact\": {\"id\": \"ghl-9\"}}")
            .create_async()
            .await;

        let client = GhlClient::new(test_config(server.url()), reqwest::Client::new());
        let lead = sample_lead(Some("jane@example.com"));
        let contact = client.contact_from_lead(&lead);
        let (_, action) = client.upsert_contact(contact, &lead.id).await.unwrap();

        assert_eq!(action, UpsertAction::Updated);
        update.assert_async().await;
    }
}
