// ==========================================
// 成员导入 - 成员 Repository 实现
// ==========================================
// 职责: 实现成员落库数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据读写
// ==========================================

use crate::db::{ensure_member_schema, open_sqlite_connection};
use crate::domain::{FieldValue, ImportBatch, MemberRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::MemberRepository;
use async_trait::async_trait;
use rusqlite::types::{ToSql, ToSqlOutput, Value};
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// 日期统一以 ISO 文本落库，布尔以 0/1 落库
impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Text(s) => ToSqlOutput::from(s.as_str()),
            FieldValue::Date(d) => ToSqlOutput::Owned(Value::Text(d.format("%Y-%m-%d").to_string())),
            FieldValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
        })
    }
}

// ==========================================
// MemberRepositoryImpl
// ==========================================
pub struct MemberRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepositoryImpl {
    /// 打开数据库并确保 schema 存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        ensure_member_schema(&conn)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（连接需已完成 schema 初始化）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

/// 按记录已填充字段拼装 INSERT 语句
fn build_insert_sql(record: &MemberRecord) -> Option<String> {
    let columns: Vec<&str> = record
        .populated()
        .map(|(field, _)| field.column_name())
        .collect();
    if columns.is_empty() {
        return None;
    }

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    Some(format!(
        "INSERT INTO members ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    ))
}

#[async_trait]
impl MemberRepository for MemberRepositoryImpl {
    async fn exists_by_name_and_phone(&self, name: &str, phone: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM members WHERE name = ?1 AND phone = ?2",
            params![name, phone],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    async fn insert_member(&self, record: &MemberRecord) -> RepositoryResult<i64> {
        let sql = build_insert_sql(record).ok_or_else(|| {
            RepositoryError::InternalError(format!("行 {} 无可写入字段", record.row_number))
        })?;
        debug!(row_number = record.row_number, sql = %sql, "插入成员");

        let conn = self.lock()?;
        conn.execute(&sql, params_from_iter(record.populated().map(|(_, value)| value)))?;
        Ok(conn.last_insert_rowid())
    }

    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, file_path, total_rows, success_rows,
                failure_rows, imported_at, elapsed_ms, report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.success_rows,
                batch.failure_rows,
                batch.imported_at.to_rfc3339(),
                batch.elapsed_ms,
                batch.report_json,
            ],
        )?;
        Ok(())
    }

    async fn count_members(&self) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberField;
    use chrono::{NaiveDate, Utc};

    fn memory_repo() -> (MemberRepositoryImpl, Arc<Mutex<Connection>>) {
        let conn = Connection::open_in_memory().unwrap();
        ensure_member_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (MemberRepositoryImpl::from_connection(conn.clone()), conn)
    }

    fn record(name: &str, phone: &str) -> MemberRecord {
        let mut record = MemberRecord::new(2);
        record.set(MemberField::Name, FieldValue::Text(name.to_string()));
        record.set(MemberField::Phone, FieldValue::Text(phone.to_string()));
        record
    }

    #[test]
    fn test_build_insert_sql_is_sparse() {
        let mut rec = record("홍길동", "010-1111-2222");
        rec.set(MemberField::Active, FieldValue::Bool(true));
        let sql = build_insert_sql(&rec).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO members (name, phone, active) VALUES (?1, ?2, ?3)"
        );
        assert!(build_insert_sql(&MemberRecord::new(3)).is_none());
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let (repo, conn) = memory_repo();
        let mut rec = record("홍길동", "010-1111-2222");
        rec.set(
            MemberField::BirthDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(1945, 4, 29).unwrap()),
        );
        rec.set(MemberField::Deceased, FieldValue::Bool(true));

        repo.insert_member(&rec).await.unwrap();

        assert!(repo
            .exists_by_name_and_phone("홍길동", "010-1111-2222")
            .await
            .unwrap());
        assert!(!repo
            .exists_by_name_and_phone("홍길동", "010-9999-9999")
            .await
            .unwrap());
        assert_eq!(repo.count_members().await.unwrap(), 1);

        let (birth, deceased, active): (String, i64, i64) = conn
            .lock()
            .unwrap()
            .query_row(
                "SELECT birth_date, deceased, active FROM members WHERE name = '홍길동'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(birth, "1945-04-29");
        assert_eq!(deceased, 1);
        // 未写入字段取表默认值
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_insert_without_phone_is_rejected() {
        let (repo, _conn) = memory_repo();
        let mut rec = MemberRecord::new(4);
        rec.set(MemberField::Name, FieldValue::Text("김철수".to_string()));

        let err = repo.insert_member(&rec).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotNullViolation(_)));
    }

    #[tokio::test]
    async fn test_insert_batch() {
        let (repo, conn) = memory_repo();
        let batch = ImportBatch {
            batch_id: "batch-1".to_string(),
            file_name: Some("members.xlsx".to_string()),
            file_path: Some("/tmp/members.xlsx".to_string()),
            total_rows: 3,
            success_rows: 2,
            failure_rows: 1,
            imported_at: Utc::now(),
            elapsed_ms: 12,
            report_json: Some("{}".to_string()),
        };
        repo.insert_batch(&batch).await.unwrap();

        let success: i64 = conn
            .lock()
            .unwrap()
            .query_row(
                "SELECT success_rows FROM import_batch WHERE batch_id = 'batch-1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(success, 2);
    }
}
