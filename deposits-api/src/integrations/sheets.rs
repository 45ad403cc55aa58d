//! Google Sheets sync over the REST v4 API. Auth is the service-account
//! JWT-bearer flow: sign an RS256 assertion, exchange it at the oauth2
//! token endpoint, and cache the access token until shortly before expiry.
//!
//! Each org gets one tab (named by company tag in legacy mode, otherwise
//! by org id) with a fixed 15-column layout; lead rows are located by the
//! lead id in column A.

use crate::config::GoogleSheetsConfig;
use crate::helpers::tags;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Lead, Org};
use tokio::sync::Mutex;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

pub const SHEET_HEADERS: [&str; 15] = [
    "Id",
    "Contact Name",
    "Email",
    "Phone",
    "Service",
    "Source",
    "Estimate Amount",
    "Estimate Status",
    "Close Status",
    "Revenue",
    "Notes",
    "Tags",
    "Created Date",
    "Updated Date",
    "Company Tag",
];

#[derive(Serialize)]
struct TokenClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct SheetsClient {
    config: GoogleSheetsConfig,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

/// One tab per organization; orgs with a company tag keep the legacy
/// tag-named tab.
pub fn tab_title(org: &Org) -> String {
    org.company_tag.clone().unwrap_or_else(|| org.id.clone())
}

fn quoted_range(tab: &str, cells: &str) -> String {
    format!("'{}'!{}", tab.replace('\'', "''"), cells)
}

fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn lead_row(lead: &Lead, company_tag: &str) -> Vec<String> {
    vec![
        lead.id.clone(),
        lead.contact_name.clone().unwrap_or_default(),
        lead.email.clone().unwrap_or_default(),
        lead.phone.clone().unwrap_or_default(),
        lead.service.clone(),
        lead.source.clone(),
        lead
            .estimate_amount
            .map(|a| a.to_string())
            .unwrap_or_default(),
        lead.estimate_status.as_str().to_string(),
        lead.close_status.as_str().to_string(),
        lead.revenue.map(|r| r.to_string()).unwrap_or_default(),
        lead.notes.clone().unwrap_or_default(),
        tags::parse_tags(lead.tags.as_deref()).join(", "),
        format_date(lead.created_at),
        format_date(lead.updated_at),
        company_tag.to_string(),
    ]
}

impl SheetsClient {
    pub fn new(config: GoogleSheetsConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            token: Mutex::new(None),
        }
    }

    /// The spreadsheet an org syncs into: its own, or the deployment
    /// default. `None` disables the sheets target for that org.
    pub fn spreadsheet_for(&self, org: &Org) -> Option<String> {
        org.spreadsheet_id
            .clone()
            .or_else(|| self.config.default_spreadsheet_id.clone())
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Utc::now() < token.expires_at - Duration::minutes(5) {
                return Ok(token.access_token.clone());
            }
        }

        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: &self.config.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(self.config.private_key.as_bytes())
            .map_err(|e| anyhow!("invalid service account key: {e}"))?;
        let assertion = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &key,
        )?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("token exchange failed: {}", response.status()));
        }

        let token: TokenResponse = response.json().await?;
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        Ok(token.access_token)
    }

    /// Creates the tab with its frozen header row if it does not exist.
    async fn ensure_tab(&self, spreadsheet_id: &str, tab: &str) -> Result<()> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{SHEETS_BASE_URL}/{spreadsheet_id}"))
            .bearer_auth(&token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("spreadsheet lookup failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        let exists = body["sheets"]
            .as_array()
            .map(|sheets| {
                sheets
                    .iter()
                    .any(|s| s["properties"]["title"].as_str() == Some(tab))
            })
            .unwrap_or(false);
        if exists {
            return Ok(());
        }

        let add_sheet = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": tab,
                        "gridProperties": {
                            "rowCount": 1000,
                            "columnCount": SHEET_HEADERS.len(),
                            "frozenRowCount": 1
                        }
                    }
                }
            }]
        });
        let response = self
            .http
            .post(format!("{SHEETS_BASE_URL}/{spreadsheet_id}:batchUpdate"))
            .bearer_auth(&token)
            .json(&add_sheet)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("tab creation failed: {}", response.status()));
        }

        self.write_values(
            spreadsheet_id,
            &quoted_range(tab, "A1:O1"),
            vec![SHEET_HEADERS.iter().map(|h| h.to_string()).collect()],
        )
        .await
    }

    async fn write_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<()> {
        let token = self.access_token().await?;
        let encoded = urlencoding::encode(range);

        let response = self
            .http
            .put(format!(
                "{SHEETS_BASE_URL}/{spreadsheet_id}/values/{encoded}"
            ))
            .bearer_auth(&token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&serde_json::json!({ "values": values }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("values update failed: {}", response.status()));
        }
        Ok(())
    }

    /// Row number (1-based) of the lead in column A, if present.
    async fn find_lead_row(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        lead_id: &str,
    ) -> Result<Option<usize>> {
        let token = self.access_token().await?;
        let encoded = urlencoding::encode(&quoted_range(tab, "A:A")).into_owned();

        let response = self
            .http
            .get(format!(
                "{SHEETS_BASE_URL}/{spreadsheet_id}/values/{encoded}"
            ))
            .bearer_auth(&token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("values lookup failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        let row = body["values"].as_array().and_then(|rows| {
            rows.iter()
                .position(|r| r[0].as_str() == Some(lead_id))
                .map(|idx| idx + 1)
        });

        Ok(row)
    }

    /// Append a new lead row (used on lead creation).
    pub async fn append_lead(&self, spreadsheet_id: &str, org: &Org, lead: &Lead) -> Result<()> {
        let tab = tab_title(org);
        self.ensure_tab(spreadsheet_id, &tab).await?;

        let token = self.access_token().await?;
        let encoded = urlencoding::encode(&quoted_range(&tab, "A:O")).into_owned();
        let row = lead_row(lead, org.company_tag.as_deref().unwrap_or_default());

        let response = self
            .http
            .post(format!(
                "{SHEETS_BASE_URL}/{spreadsheet_id}/values/{encoded}:append"
            ))
            .bearer_auth(&token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("row append failed: {}", response.status()));
        }
        Ok(())
    }

    /// Update the lead's existing row in place (used on status changes),
    /// falling back to an append when the row is not found.
    pub async fn update_lead(&self, spreadsheet_id: &str, org: &Org, lead: &Lead) -> Result<()> {
        let tab = tab_title(org);
        self.ensure_tab(spreadsheet_id, &tab).await?;

        match self.find_lead_row(spreadsheet_id, &tab, &lead.id).await? {
            Some(row_number) => {
                let cells = format!("A{row_number}:O{row_number}");
                let row = lead_row(lead, org.company_tag.as_deref().unwrap_or_default());
                self.write_values(spreadsheet_id, &quoted_range(&tab, &cells), vec![row])
                    .await
            }
            None => self.append_lead(spreadsheet_id, org, lead).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{CloseStatus, EstimateStatus};

    fn sample_org(company_tag: Option<&str>) -> Org {
        Org {
            id: "org-1".to_string(),
            name: "AC Guys".to_string(),
            user_id: "user-1".to_string(),
            webhook_url: None,
            company_tag: company_tag.map(|t| t.to_string()),
            spreadsheet_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn sample_lead() -> Lead {
        Lead {
            id: "lead-1".to_string(),
            org_id: "org-1".to_string(),
            service: "AC Repair".to_string(),
            source: "Google Ads".to_string(),
            contact_name: Some("Jane Doe".to_string()),
            email: None,
            phone: None,
            estimate_amount: Some(450.0),
            estimate_status: EstimateStatus::Pending,
            close_status: CloseStatus::Open,
            revenue: None,
            notes: None,
            tags: Some("[\"ac guys\",\"hvac\"]".to_string()),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_tab_title_prefers_company_tag() {
        assert_eq!(tab_title(&sample_org(Some("ac guys"))), "ac guys");
        assert_eq!(tab_title(&sample_org(None)), "org-1");
    }

    #[test]
    fn test_lead_row_matches_header_layout() {
        let row = lead_row(&sample_lead(), "ac guys");
        assert_eq!(row.len(), SHEET_HEADERS.len());
        assert_eq!(row[0], "lead-1");
        assert_eq!(row[7], "PENDING");
        assert_eq!(row[11], "ac guys, hvac");
        assert_eq!(row[12], "2023-11-14");
        assert_eq!(row[14], "ac guys");
    }

    #[test]
    fn test_quoted_range_escapes_quotes() {
        assert_eq!(quoted_range("Joe's Tab", "A:O"), "'Joe''s Tab'!A:O");
    }
}
