use anyhow::Result;

use crate::Connection;

const TABLES: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        duration_days INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT '',
        enrollment_date TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        plan_id INTEGER REFERENCES plans(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL REFERENCES members(id),
        amount REAL NOT NULL,
        date TEXT NOT NULL,
        period TEXT NOT NULL,
        method TEXT NOT NULL DEFAULT 'cash',
        notes TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL REFERENCES members(id),
        kind TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,
        priority TEXT NOT NULL DEFAULT 'normal',
        due_date TEXT
    )
    "#,
];

/// Install the database schema.
pub async fn install(db: &Connection) -> Result<()> {
    let mut conn = db.lock().await;
    for table in TABLES {
        sqlx::query(table).execute(&mut *conn).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_install_idempotent() {
        let db = Connection::open_test().await;
        // open_test already installed the schema once
        install(&db).await.unwrap();
    }
}
