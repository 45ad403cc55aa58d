use crate::database::AsyncDbConnection;
use crate::error::ApiError;
use rusqlite::{params, Row};
use shared_types::Service;

fn service_from_row(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        org_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub async fn create_service(
    conn: AsyncDbConnection,
    id: &str,
    name: &str,
    org_id: &str,
) -> Result<Service, ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO services (id, name, org_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, org_id, now],
    )?;

    let service = conn.query_row(
        "SELECT id, name, org_id, created_at FROM services WHERE id = ?1",
        [id],
        service_from_row,
    )?;

    Ok(service)
}

pub async fn list_services(
    conn: AsyncDbConnection,
    org_id: &str,
) -> Result<Vec<Service>, ApiError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, name, org_id, created_at FROM services
         WHERE org_id = ?1 ORDER BY name ASC",
    )?;

    let services = stmt
        .query_map([org_id], service_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(services)
}

pub async fn get_service(
    conn: AsyncDbConnection,
    id: &str,
) -> Result<Option<Service>, ApiError> {
    let conn = conn.lock().await?;

    let service = conn
        .query_row(
            "SELECT id, name, org_id, created_at FROM services WHERE id = ?1",
            [id],
            service_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(service)
}

/// Existing leads keep their service string; only the vocabulary entry goes.
pub async fn delete_service(conn: AsyncDbConnection, id: &str) -> Result<(), ApiError> {
    let conn = conn.lock().await?;

    let deleted = conn.execute("DELETE FROM services WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Service"));
    }

    Ok(())
}
