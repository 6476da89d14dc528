// ==========================================
// 成员导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为
// - 首次导入时自动建表（幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const MEMBER_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT,
    gender TEXT CHECK (gender IN ('M', 'F')),
    birth_date TEXT,
    baptized INTEGER NOT NULL DEFAULT 0,
    baptized_type TEXT,
    baptism_date TEXT,
    registration_date TEXT,
    dismissal_date TEXT,
    deceased INTEGER NOT NULL DEFAULT 0,
    faith_head TEXT,
    english_name TEXT,
    infant_baptism INTEGER NOT NULL DEFAULT 0,
    email TEXT,
    occupation TEXT,
    work_phone TEXT,
    residence_start_date TEXT,
    previous_address TEXT,
    previous_church TEXT,
    previous_office TEXT,
    baptism_church TEXT,
    baptism_year TEXT,
    baptism_pastor TEXT,
    education TEXT,
    career TEXT,
    faith_life TEXT,
    marriage_anniversary TEXT,
    stay_period TEXT,
    specialty TEXT,
    service_history TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    visit_dates TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_members_name_phone ON members (name, phone);

CREATE TABLE IF NOT EXISTS import_batch (
    batch_id TEXT PRIMARY KEY,
    file_name TEXT,
    file_path TEXT,
    total_rows INTEGER NOT NULL,
    success_rows INTEGER NOT NULL,
    failure_rows INTEGER NOT NULL,
    imported_at TEXT NOT NULL,
    elapsed_ms INTEGER NOT NULL,
    report_json TEXT
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并登记 schema_version
pub fn ensure_member_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(MEMBER_SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
