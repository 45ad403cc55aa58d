use crate::database::AsyncDbConnection;
use crate::error::ApiError;
use rusqlite::{params, Row};
use shared_types::Source;

fn source_from_row(row: &Row) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        name: row.get(1)?,
        org_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub async fn create_source(
    conn: AsyncDbConnection,
    id: &str,
    name: &str,
    org_id: &str,
) -> Result<Source, ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO sources (id, name, org_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, org_id, now],
    )?;

    let source = conn.query_row(
        "SELECT id, name, org_id, created_at FROM sources WHERE id = ?1",
        [id],
        source_from_row,
    )?;

    Ok(source)
}

pub async fn list_sources(conn: AsyncDbConnection, org_id: &str) -> Result<Vec<Source>, ApiError> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, name, org_id, created_at FROM sources
         WHERE org_id = ?1 ORDER BY name ASC",
    )?;

    let sources = stmt
        .query_map([org_id], source_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sources)
}

pub async fn get_source(conn: AsyncDbConnection, id: &str) -> Result<Option<Source>, ApiError> {
    let conn = conn.lock().await?;

    let source = conn
        .query_row(
            "SELECT id, name, org_id, created_at FROM sources WHERE id = ?1",
            [id],
            source_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(source)
}

pub async fn delete_source(conn: AsyncDbConnection, id: &str) -> Result<(), ApiError> {
    let conn = conn.lock().await?;

    let deleted = conn.execute("DELETE FROM sources WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Source"));
    }

    Ok(())
}
