use crate::database::AsyncDbConnection;
use crate::error::ApiError;
use crate::helpers::pipeline;
use crate::helpers::tags;
use rusqlite::{params, Row};
use shared_types::{CloseStatus, CreateLeadRequest, EstimateStatus, Lead, LeadPatch, Org};
use uuid::Uuid;

fn lead_from_row(row: &Row) -> rusqlite::Result<Lead> {
    let estimate_status: String = row.get(8)?;
    let close_status: String = row.get(9)?;

    Ok(Lead {
        id: row.get(0)?,
        org_id: row.get(1)?,
        service: row.get(2)?,
        source: row.get(3)?,
        contact_name: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        estimate_amount: row.get(7)?,
        estimate_status: estimate_status.parse::<EstimateStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?,
        close_status: close_status.parse::<CloseStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?,
        revenue: row.get(10)?,
        notes: row.get(11)?,
        tags: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

const LEAD_COLUMNS: &str = "id, org_id, service, source, contact_name, email, phone, \
     estimate_amount, estimate_status, close_status, revenue, notes, tags, \
     created_at, updated_at";

/// Creates a lead in the default OPEN/PENDING state and attaches the org's
/// company tag (if set) to the new lead's tag list. Input validation
/// happens before this is called; the pipeline validator is not consulted
/// because the default pair trivially satisfies the invariant.
pub async fn create_lead(
    conn: AsyncDbConnection,
    org: &Org,
    req: &CreateLeadRequest,
) -> Result<Lead, ApiError> {
    let conn = conn.lock().await?;
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();

    let lead_tags = match &org.company_tag {
        Some(tag) => tags::serialize_tags(&tags::add_tag(&[], tag)),
        None => None,
    };

    conn.execute(
        "INSERT INTO leads
         (id, org_id, service, source, contact_name, email, phone, estimate_amount,
          estimate_status, close_status, revenue, notes, tags, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'PENDING', 'OPEN', NULL, ?9, ?10, ?11, ?12)",
        params![
            id,
            org.id,
            req.service,
            req.source,
            req.contact_name,
            req.email,
            req.phone,
            req.estimate_amount,
            req.notes,
            lead_tags,
            now,
            now
        ],
    )?;

    let lead = conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
        [&id],
        lead_from_row,
    )?;

    Ok(lead)
}

pub async fn get_lead(conn: AsyncDbConnection, id: &str) -> Result<Option<Lead>, ApiError> {
    let conn = conn.lock().await?;

    let lead = conn
        .query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
            [id],
            lead_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(lead)
}

/// Applies a partial update. The pipeline validator judges the effective
/// status pair (patch fields override, stored values fill the gaps) before
/// anything is written; a rejected patch leaves the row untouched.
pub async fn update_lead(
    conn: AsyncDbConnection,
    lead_id: &str,
    patch: &LeadPatch,
) -> Result<Lead, ApiError> {
    let current = get_lead(conn.clone(), lead_id)
        .await?
        .ok_or(ApiError::NotFound("Lead"))?;

    let (estimate_status, close_status) = pipeline::validate_transition(
        current.estimate_status,
        current.close_status,
        patch.estimate_status,
        patch.close_status,
    )?;

    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE leads SET
            contact_name = ?1, email = ?2, phone = ?3, service = ?4, source = ?5,
            estimate_amount = ?6, estimate_status = ?7, close_status = ?8,
            revenue = ?9, notes = ?10, updated_at = ?11
         WHERE id = ?12",
        params![
            patch.contact_name.clone().or(current.contact_name),
            patch.email.clone().or(current.email),
            patch.phone.clone().or(current.phone),
            patch.service.clone().unwrap_or(current.service),
            patch.source.clone().unwrap_or(current.source),
            patch.estimate_amount.or(current.estimate_amount),
            estimate_status.as_str(),
            close_status.as_str(),
            patch.revenue.or(current.revenue),
            patch.notes.clone().or(current.notes),
            now,
            lead_id
        ],
    )?;

    let lead = conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
        [lead_id],
        lead_from_row,
    )?;

    Ok(lead)
}

/// All leads for an org, newest-created-first, optionally filtered to one
/// close status.
pub async fn list_leads(
    conn: AsyncDbConnection,
    org_id: &str,
    close_status: Option<CloseStatus>,
) -> Result<Vec<Lead>, ApiError> {
    let conn = conn.lock().await?;

    let leads = match close_status {
        Some(status) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads
                 WHERE org_id = ?1 AND close_status = ?2
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map(params![org_id, status.as_str()], lead_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads
                 WHERE org_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([org_id], lead_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };

    Ok(leads)
}

/// A missing lead is an error, not a no-op.
pub async fn delete_lead(conn: AsyncDbConnection, id: &str) -> Result<(), ApiError> {
    let conn = conn.lock().await?;

    let deleted = conn.execute("DELETE FROM leads WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Lead"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::test_db;
    use crate::database::{orgs, users};
    use shared_types::UserType;

    async fn seed_org(
        conn: AsyncDbConnection,
        company_tag: Option<&str>,
    ) -> (shared_types::User, Org) {
        let user = users::create_user(
            conn.clone(),
            &Uuid::new_v4().to_string(),
            &format!("{}@example.com", Uuid::new_v4()),
            "hash",
            "Test Owner",
            Some("AC Guys"),
            UserType::BusinessOwner,
            Some("hvac"),
        )
        .await
        .unwrap();

        let org = orgs::create_org(
            conn,
            &Uuid::new_v4().to_string(),
            "AC Guys",
            &user.id,
            company_tag,
        )
        .await
        .unwrap();

        (user, org)
    }

    fn new_lead_request(org_id: &str) -> CreateLeadRequest {
        CreateLeadRequest {
            org_id: org_id.to_string(),
            service: "AC Repair".to_string(),
            source: "Google Ads".to_string(),
            contact_name: None,
            email: None,
            phone: None,
            estimate_amount: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_lead_starts_open_pending() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;

        let lead = create_lead(conn, &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        assert_eq!(lead.estimate_status, EstimateStatus::Pending);
        assert_eq!(lead.close_status, CloseStatus::Open);
        assert_eq!(lead.estimate_amount, None);
        assert_eq!(lead.tags, None);
    }

    #[tokio::test]
    async fn test_create_lead_attaches_company_tag() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), Some("ac guys")).await;

        let lead = create_lead(conn, &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        assert_eq!(lead.tags.as_deref(), Some("[\"ac guys\"]"));
    }

    #[tokio::test]
    async fn test_cannot_close_before_estimate_terminal() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;
        let lead = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        let patch = LeadPatch {
            close_status: Some(CloseStatus::Won),
            ..Default::default()
        };
        let result = update_lead(conn.clone(), &lead.id, &patch).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        // Stored record is unchanged
        let stored = get_lead(conn, &lead.id).await.unwrap().unwrap();
        assert_eq!(stored.close_status, CloseStatus::Open);
        assert_eq!(stored.updated_at, lead.updated_at);
    }

    #[tokio::test]
    async fn test_close_after_estimate_completed() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;
        let lead = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        let first = LeadPatch {
            estimate_status: Some(EstimateStatus::Completed),
            ..Default::default()
        };
        update_lead(conn.clone(), &lead.id, &first).await.unwrap();

        let second = LeadPatch {
            close_status: Some(CloseStatus::Won),
            ..Default::default()
        };
        let updated = update_lead(conn, &lead.id, &second).await.unwrap();

        assert_eq!(updated.estimate_status, EstimateStatus::Completed);
        assert_eq!(updated.close_status, CloseStatus::Won);
    }

    #[tokio::test]
    async fn test_both_statuses_in_one_patch() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;
        let lead = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        let patch = LeadPatch {
            estimate_status: Some(EstimateStatus::NoShow),
            close_status: Some(CloseStatus::Lost),
            ..Default::default()
        };
        let updated = update_lead(conn, &lead.id, &patch).await.unwrap();
        assert_eq!(updated.close_status, CloseStatus::Lost);
    }

    #[tokio::test]
    async fn test_update_unknown_lead_is_not_found() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();

        let result = update_lead(conn, "no-such-lead", &LeadPatch::default()).await;
        assert!(matches!(result, Err(ApiError::NotFound("Lead"))));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;

        let first = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();
        let second = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        // Force distinct creation times so ordering is deterministic
        {
            let raw = conn.lock().await.unwrap();
            raw.execute(
                "UPDATE leads SET created_at = created_at - 60 WHERE id = ?1",
                [&first.id],
            )
            .unwrap();
        }

        let all = list_leads(conn.clone(), &org.id, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);

        let patch = LeadPatch {
            estimate_status: Some(EstimateStatus::Completed),
            close_status: Some(CloseStatus::Won),
            ..Default::default()
        };
        update_lead(conn.clone(), &second.id, &patch).await.unwrap();

        let open_only = list_leads(conn.clone(), &org.id, Some(CloseStatus::Open))
            .await
            .unwrap();
        assert_eq!(open_only.len(), 1);
        assert_eq!(open_only[0].id, first.id);

        let won_only = list_leads(conn, &org.id, Some(CloseStatus::Won))
            .await
            .unwrap();
        assert_eq!(won_only.len(), 1);
        assert_eq!(won_only[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_missing_lead_is_not_found() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();

        let result = delete_lead(conn, "missing").await;
        assert!(matches!(result, Err(ApiError::NotFound("Lead"))));
    }

    #[tokio::test]
    async fn test_ownership_gate_rejects_foreign_user() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org_a) = seed_org(conn.clone(), None).await;
        let (user_b, _) = seed_org(conn.clone(), None).await;

        let lead = create_lead(conn.clone(), &org_a, &new_lead_request(&org_a.id))
            .await
            .unwrap();

        // User B owns a different org; the gate rejects before any write
        let gate = orgs::require_org_owned(conn.clone(), &org_a.id, &user_b.id).await;
        assert!(matches!(gate, Err(ApiError::Unauthorized)));

        let stored = get_lead(conn, &lead.id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_org_delete_cascades_to_leads() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();
        let (_, org) = seed_org(conn.clone(), None).await;
        let lead = create_lead(conn.clone(), &org, &new_lead_request(&org.id))
            .await
            .unwrap();

        orgs::delete_org(conn.clone(), &org.id).await.unwrap();

        assert!(get_lead(conn, &lead.id).await.unwrap().is_none());
    }
}
