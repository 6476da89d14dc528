// ==========================================
// 成员导入 - 成员导入器实现
// ==========================================
// 职责: 逐行执行 映射 → 派生 → 查重 → 落库，并累积导入报告
// 红线: 行级错误只计数，不越过单行边界
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ImportReport, RowFailure, SourceRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::derivation::DerivationService as DerivationServiceImpl;
use crate::importer::error::RowError;
use crate::importer::field_mapper::{identifying_name, FieldMapper as FieldMapperImpl};
use crate::importer::member_importer_trait::{DerivationService, FieldMapper, MemberImporter};
use crate::repository::MemberRepository;
use tracing::{debug, info, instrument, warn};

// ==========================================
// MemberImporterImpl - 成员导入器实现
// ==========================================
pub struct MemberImporterImpl<R>
where
    R: MemberRepository,
{
    // 数据访问层
    repo: R,

    // 导入组件
    field_mapper: Box<dyn FieldMapper>,
    derivation_service: Box<dyn DerivationService>,

    progress_interval: usize,
    failure_detail_limit: usize,
}

impl<R> MemberImporterImpl<R>
where
    R: MemberRepository,
{
    pub fn new(
        repo: R,
        field_mapper: Box<dyn FieldMapper>,
        derivation_service: Box<dyn DerivationService>,
        progress_interval: usize,
        failure_detail_limit: usize,
    ) -> Self {
        Self {
            repo,
            field_mapper,
            derivation_service,
            progress_interval: progress_interval.max(1),
            failure_detail_limit,
        }
    }

    /// 按配置装配默认组件
    pub fn with_config(repo: R, config: &ImportConfig) -> Self {
        Self::new(
            repo,
            Box::new(FieldMapperImpl::new(Box::new(DataCleaner::default()))),
            Box::new(DerivationServiceImpl::from_config(config)),
            config.progress_interval,
            config.failure_detail_limit,
        )
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

#[async_trait::async_trait]
impl<R> MemberImporter for MemberImporterImpl<R>
where
    R: MemberRepository,
{
    #[instrument(skip(self, rows), fields(total = rows.len()))]
    async fn import_rows(&self, rows: Vec<SourceRow>) -> ImportReport {
        let total = rows.len();
        let mut report = ImportReport::new(self.failure_detail_limit);

        for (idx, row) in rows.iter().enumerate() {
            match self.import_row(row).await {
                Ok(id) => {
                    debug!(row_number = row.row_number, member_id = id, "成员写入成功");
                    report.record_success();
                }
                Err(e) => {
                    let name = identifying_name(row);
                    warn!(
                        row_number = row.row_number,
                        name = name.as_deref().unwrap_or("-"),
                        error = %e,
                        "行导入失败"
                    );
                    report.record_failure(RowFailure {
                        row_number: row.row_number,
                        name,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }

            let processed = idx + 1;
            if processed % self.progress_interval == 0 {
                info!(
                    processed = processed,
                    total = total,
                    success = report.success,
                    failure = report.failure,
                    "导入进度"
                );
            }
        }

        report
    }

    async fn import_row(&self, row: &SourceRow) -> Result<i64, RowError> {
        let mut record = self.field_mapper.map_to_member(row);
        self.derivation_service.derive(&mut record)?;

        let name = record.name().unwrap_or_default().to_string();
        let phone = record.phone().unwrap_or_default().to_string();

        if self.repo.exists_by_name_and_phone(&name, &phone).await? {
            return Err(RowError::Duplicate { name, phone });
        }

        Ok(self.repo.insert_member(&record).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, FailureKind, ImportBatch, MemberField, MemberRecord};
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ==========================================
    // 内存 Repository（测试用）
    // ==========================================
    #[derive(Default)]
    struct MemoryRepo {
        members: Mutex<Vec<MemberRecord>>,
        reject_name: Option<String>,
    }

    #[async_trait]
    impl MemberRepository for MemoryRepo {
        async fn exists_by_name_and_phone(&self, name: &str, phone: &str) -> RepositoryResult<bool> {
            let members = self.members.lock().unwrap();
            Ok(members
                .iter()
                .any(|m| m.name() == Some(name) && m.phone() == Some(phone)))
        }

        async fn insert_member(&self, record: &MemberRecord) -> RepositoryResult<i64> {
            if record.name() == self.reject_name.as_deref() {
                return Err(RepositoryError::DatabaseQueryError("connection reset".to_string()));
            }
            let mut members = self.members.lock().unwrap();
            members.push(record.clone());
            Ok(members.len() as i64)
        }

        async fn insert_batch(&self, _batch: &ImportBatch) -> RepositoryResult<()> {
            Ok(())
        }

        async fn count_members(&self) -> RepositoryResult<i64> {
            Ok(self.members.lock().unwrap().len() as i64)
        }
    }

    fn importer(repo: MemoryRepo, detail_limit: usize) -> MemberImporterImpl<MemoryRepo> {
        let config = ImportConfig {
            db_path: ":memory:".to_string(),
            failure_detail_limit: detail_limit,
            ..ImportConfig::default()
        };
        MemberImporterImpl::with_config(repo, &config)
    }

    fn row(row_number: usize, name: &str, phone: &str) -> SourceRow {
        let mut row = SourceRow::new(row_number);
        row.push("이름", CellValue::Text(name.to_string()));
        row.push("휴대폰", CellValue::Text(phone.to_string()));
        row
    }

    #[tokio::test]
    async fn test_import_rows_counts() {
        let importer = importer(MemoryRepo::default(), 10);
        let rows = vec![
            row(2, "홍길동", "010-1111-1111"),
            row(3, "", "010-2222-2222"),
            row(4, "김영희", ""),
            row(5, "홍길동", "010-1111-1111"),
        ];

        let report = importer.import_rows(rows).await;

        assert_eq!(report.success, 2);
        assert_eq!(report.failure, 2);
        assert_eq!(report.failures[0].row_number, 3);
        assert_eq!(report.failures[0].kind, FailureKind::MissingName);
        assert_eq!(report.failures[1].row_number, 5);
        assert_eq!(report.failures[1].kind, FailureKind::Duplicate);
        assert_eq!(report.failures[1].name.as_deref(), Some("홍길동"));

        let members = importer.repository().members.lock().unwrap();
        assert_eq!(members[1].phone(), Some("010-0000-0000"));
        assert_eq!(
            members[1].get(MemberField::Active),
            Some(&crate::domain::FieldValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_sink_error_does_not_abort() {
        let repo = MemoryRepo {
            reject_name: Some("박민수".to_string()),
            ..MemoryRepo::default()
        };
        let importer = importer(repo, 10);
        let rows = vec![
            row(2, "박민수", "010-1"),
            row(3, "이수진", "010-2"),
        ];

        let report = importer.import_rows(rows).await;

        assert_eq!(report.success, 1);
        assert_eq!(report.failure, 1);
        assert_eq!(report.failures[0].kind, FailureKind::SinkRejected);
        assert!(report.failures[0].message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_failure_details_are_bounded() {
        let importer = importer(MemoryRepo::default(), 3);
        let rows: Vec<SourceRow> = (0..8).map(|i| row(i + 2, " ", "010")).collect();

        let report = importer.import_rows(rows).await;

        assert_eq!(report.failure, 8);
        assert_eq!(report.failures.len(), 3);
    }
}
