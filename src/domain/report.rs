// ==========================================
// 成员导入 - 导入报告与批次
// ==========================================
// 用途: 导入过程中逐行累积，结束时一次性读取
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// FailureKind - 行级失败类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    MissingName,  // 姓名缺失（不落库）
    Duplicate,    // 与已有记录 (name, phone) 重复
    SinkRejected, // 数据库拒绝（约束/连接中断）
}

// ==========================================
// RowFailure - 行级失败明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row_number: usize,
    pub name: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: usize,
    pub failure: usize,
    /// 前 detail_limit 条失败明细
    pub failures: Vec<RowFailure>,
    #[serde(skip)]
    detail_limit: usize,
}

impl ImportReport {
    pub fn new(detail_limit: usize) -> Self {
        Self {
            success: 0,
            failure: 0,
            failures: Vec::new(),
            detail_limit,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    /// 记录失败；明细超过上限后只计数
    pub fn record_failure(&mut self, failure: RowFailure) {
        self.failure += 1;
        if self.failures.len() < self.detail_limit {
            self.failures.push(failure);
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================================================")?;
        writeln!(f, "导入完成")?;
        writeln!(f, "  成功: {}", self.success)?;
        writeln!(f, "  失败: {}", self.failure)?;
        writeln!(f, "  合计: {}", self.total())?;
        if !self.failures.is_empty() {
            writeln!(f, "失败明细 (前 {} 条):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "  行 {} [{}]: {}",
                    failure.row_number,
                    failure.name.as_deref().unwrap_or("-"),
                    failure.message
                )?;
            }
        }
        write!(f, "==================================================")
    }
}

// ==========================================
// ImportBatch - 导入批次审计记录
// ==========================================
// 对齐: db.rs import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub total_rows: i64,
    pub success_rows: i64,
    pub failure_rows: i64,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub report_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(row_number: usize) -> RowFailure {
        RowFailure {
            row_number,
            name: None,
            kind: FailureKind::MissingName,
            message: "姓名缺失".to_string(),
        }
    }

    #[test]
    fn test_report_bounds_details() {
        let mut report = ImportReport::new(2);
        report.record_success();
        for row in 2..6 {
            report.record_failure(failure(row));
        }

        assert_eq!(report.success, 1);
        assert_eq!(report.failure, 4);
        assert_eq!(report.total(), 5);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].row_number, 2);
    }

    #[test]
    fn test_report_display_lists_failures() {
        let mut report = ImportReport::new(10);
        report.record_failure(failure(7));
        let text = report.to_string();
        assert!(text.contains("失败: 1"));
        assert!(text.contains("行 7 [-]"));
    }
}
