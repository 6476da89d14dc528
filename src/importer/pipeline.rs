// ==========================================
// 成员导入 - 导入主流程
// ==========================================
// 流程: 加载文件 → 连接数据库 → 逐行导入 → 记录批次 → 释放连接
// 致命错误: 源文件不存在 / 数据库不可用（不产生报告）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ImportBatch, ImportReport};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::member_importer_impl::MemberImporterImpl;
use crate::importer::member_importer_trait::{FileParser, MemberImporter};
use crate::repository::{MemberRepository, MemberRepositoryImpl};
use chrono::Utc;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 执行一次完整导入
///
/// # 返回
/// - Ok(ImportReport): 导入报告（允许包含行级失败）
/// - Err(ImportError): 致命错误，整个导入中止
#[instrument(skip(config), fields(file = %file_path.display()))]
pub async fn run(file_path: &Path, config: &ImportConfig) -> ImportResult<ImportReport> {
    let start_time = Instant::now();
    info!(db_path = %config.db_path, "开始导入成员数据");

    // === 步骤 1: 解析文件 ===
    let rows = UniversalFileParser.parse_to_source_rows(file_path)?;
    info!(total_rows = rows.len(), "文件解析完成");

    if rows.is_empty() {
        warn!("工作表无数据行，跳过导入");
        return Ok(ImportReport::new(config.failure_detail_limit));
    }

    // === 步骤 2: 连接数据库 ===
    let repo = MemberRepositoryImpl::new(&config.db_path)
        .map_err(|e| ImportError::SinkUnavailable(e.to_string()))?;
    debug!("数据库连接已建立");

    // === 步骤 3: 逐行导入 ===
    let importer = MemberImporterImpl::with_config(repo, config);
    let report = importer.import_rows(rows).await;

    // === 步骤 4: 记录批次 ===
    let elapsed = start_time.elapsed();
    record_batch(importer.repository(), file_path, &report, elapsed).await;

    let members_total = match importer.repository().count_members().await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "统计成员总数失败");
            -1
        }
    };

    info!(
        success = report.success,
        failure = report.failure,
        total = report.total(),
        members_total = members_total,
        elapsed_ms = elapsed.as_millis() as u64,
        "成员数据导入完成"
    );

    // importer 离开作用域时释放数据库连接
    Ok(report)
}

/// 写入批次审计记录；失败只告警，不影响导入结果
async fn record_batch<R: MemberRepository>(
    repo: &R,
    file_path: &Path,
    report: &ImportReport,
    elapsed: Duration,
) {
    let batch = ImportBatch {
        batch_id: Uuid::new_v4().to_string(),
        file_name: file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string),
        file_path: Some(file_path.display().to_string()),
        total_rows: report.total() as i64,
        success_rows: report.success as i64,
        failure_rows: report.failure as i64,
        imported_at: Utc::now(),
        elapsed_ms: elapsed.as_millis() as i64,
        report_json: serde_json::to_string(report).ok(),
    };

    match repo.insert_batch(&batch).await {
        Ok(()) => debug!(batch_id = %batch.batch_id, "批次记录已写入"),
        Err(e) => warn!(batch_id = %batch.batch_id, error = %e, "批次记录写入失败"),
    }
}
