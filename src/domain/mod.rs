// ==========================================
// 成员导入 - 领域模型层
// ==========================================
// 职责: 源数据行、成员记录、导入报告
// 红线: 不含数据访问逻辑
// ==========================================

pub mod member;
pub mod report;
pub mod source;

// 重导出核心类型
pub use member::{DateRule, FieldKind, FieldValue, Gender, MemberField, MemberRecord};
pub use report::{FailureKind, ImportBatch, ImportReport, RowFailure};
pub use source::{CellValue, SourceRow};
