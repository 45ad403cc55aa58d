use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id VARCHAR PRIMARY KEY,
            email VARCHAR NOT NULL UNIQUE,
            password_hash VARCHAR NOT NULL,
            name VARCHAR NOT NULL,
            company_name VARCHAR,
            user_type VARCHAR NOT NULL DEFAULT 'business_owner'
                CHECK (user_type IN ('business_owner', 'agency')),
            industry VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS orgs (
            id VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL,
            user_id VARCHAR NOT NULL,
            webhook_url VARCHAR,
            company_tag VARCHAR,
            spreadsheet_id VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS services (
            id VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL,
            org_id VARCHAR NOT NULL,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (org_id) REFERENCES orgs (id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sources (
            id VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL,
            org_id VARCHAR NOT NULL,
            created_at BIGINT NOT NULL,
            FOREIGN KEY (org_id) REFERENCES orgs (id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS leads (
            id VARCHAR PRIMARY KEY,
            org_id VARCHAR NOT NULL,
            service VARCHAR NOT NULL,
            source VARCHAR NOT NULL,
            contact_name VARCHAR,
            email VARCHAR,
            phone VARCHAR,
            estimate_amount DOUBLE,
            estimate_status VARCHAR NOT NULL DEFAULT 'PENDING'
                CHECK (estimate_status IN ('PENDING', 'SCHEDULED', 'COMPLETED', 'NO_SHOW')),
            close_status VARCHAR NOT NULL DEFAULT 'OPEN'
                CHECK (close_status IN ('OPEN', 'WON', 'LOST')),
            revenue DOUBLE,
            notes VARCHAR,
            tags VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (org_id) REFERENCES orgs (id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Create indexes for performance
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_orgs_user ON orgs(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_org_created
            ON leads(org_id, created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_leads_org_close
            ON leads(org_id, close_status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_services_org ON services(org_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sources_org ON sources(org_id)",
        [],
    )?;

    Ok(())
}
