use crate::database::AsyncDbConnection;
use crate::error::ApiError;
use rusqlite::{params, Row};
use shared_types::{User, UserType};

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let user_type: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        company_name: row.get(3)?,
        user_type: user_type.parse::<UserType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        industry: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const USER_COLUMNS: &str =
    "id, email, name, company_name, user_type, industry, created_at, updated_at";

pub async fn create_user(
    conn: AsyncDbConnection,
    id: &str,
    email: &str,
    password_hash: &str,
    name: &str,
    company_name: Option<&str>,
    user_type: UserType,
    industry: Option<&str>,
) -> Result<User, ApiError> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO users
         (id, email, password_hash, name, company_name, user_type, industry, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            email,
            password_hash,
            name,
            company_name,
            user_type.as_str(),
            industry,
            now,
            now
        ],
    )?;

    let user = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [id],
        user_from_row,
    )?;

    Ok(user)
}

pub async fn get_user(conn: AsyncDbConnection, id: &str) -> Result<Option<User>, ApiError> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [id],
            user_from_row,
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(user)
}

/// Returns the user together with the stored argon2 hash, for login.
pub async fn get_user_by_email(
    conn: AsyncDbConnection,
    email: &str,
) -> Result<Option<(User, String)>, ApiError> {
    let conn = conn.lock().await?;

    let result = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
            [email],
            |row| {
                let user = user_from_row(row)?;
                let hash: String = row.get(8)?;
                Ok((user, hash))
            },
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    Ok(result)
}
