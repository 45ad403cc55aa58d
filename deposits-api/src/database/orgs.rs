use crate::database::AsyncDbConnection;
use crate::error::ApiError;
use rusqlite::{params, Row};
use shared_types::Org;

fn org_from_row(row: &Row) -> rusqlite::Result<Org> {
    Ok(Org {
        id: row.get(0)?,
        name: row.get(1)?,
        user_id: row.get(2)?,
        webhook_url: row.get(3)?,
        company_tag: row.get(4)?,
        spreadsheet_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const ORG_COLUMNS: &str =
    "id, name, user_id, webhook_url, company_tag, spreadsheet_id, created_at, updated_at";

pub async fn create_org(
    conn: AsyncDbConnection,
    id: &str,
    name: &str,
    user_id: &str,
    company_tag: Option<&str>,
) -> Result<Org, ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO orgs (id, name, user_id, company_tag, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, name, user_id, company_tag, now, now],
    )?;

    let org = conn.query_row(
        &format!("SELECT {ORG_COLUMNS} FROM orgs WHERE id = ?1"),
        [id],
        org_from_row,
    )?;

    Ok(org)
}

pub async fn get_org(conn: AsyncDbConnection, id: &str) -> Result<Option<Org>, ApiError> {
    let conn = conn.lock().await?;

    let org = conn
        .query_row(
            &format!("SELECT {ORG_COLUMNS} FROM orgs WHERE id = ?1"),
            [id],
            org_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(org)
}

/// The single ownership gate. A missing org and a foreign org produce the
/// same `Unauthorized` so the caller cannot probe for existence.
pub async fn require_org_owned(
    conn: AsyncDbConnection,
    org_id: &str,
    user_id: &str,
) -> Result<Org, ApiError> {
    match get_org(conn, org_id).await? {
        Some(org) if org.user_id == user_id => Ok(org),
        _ => Err(ApiError::Unauthorized),
    }
}

pub async fn list_orgs_for_user(
    conn: AsyncDbConnection,
    user_id: &str,
) -> Result<Vec<Org>, ApiError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {ORG_COLUMNS} FROM orgs WHERE user_id = ?1 ORDER BY created_at ASC"
    ))?;

    let orgs = stmt
        .query_map([user_id], org_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(orgs)
}

pub async fn update_webhook_url(
    conn: AsyncDbConnection,
    org_id: &str,
    webhook_url: Option<&str>,
) -> Result<(), ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE orgs SET webhook_url = ?1, updated_at = ?2 WHERE id = ?3",
        params![webhook_url, now, org_id],
    )?;

    Ok(())
}

/// Stores an already-normalized company tag; callers must run the tag
/// normalizer first.
pub async fn update_company_tag(
    conn: AsyncDbConnection,
    org_id: &str,
    company_tag: Option<&str>,
) -> Result<(), ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE orgs SET company_tag = ?1, updated_at = ?2 WHERE id = ?3",
        params![company_tag, now, org_id],
    )?;

    Ok(())
}

pub async fn update_spreadsheet_id(
    conn: AsyncDbConnection,
    org_id: &str,
    spreadsheet_id: Option<&str>,
) -> Result<(), ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE orgs SET spreadsheet_id = ?1, updated_at = ?2 WHERE id = ?3",
        params![spreadsheet_id, now, org_id],
    )?;

    Ok(())
}

/// Child services, sources and leads go with the org (ON DELETE CASCADE).
pub async fn delete_org(conn: AsyncDbConnection, org_id: &str) -> Result<(), ApiError> {
    let conn = conn.lock().await?;

    let deleted = conn.execute("DELETE FROM orgs WHERE id = ?1", [org_id])?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Organization"));
    }

    Ok(())
}
