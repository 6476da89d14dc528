// ==========================================
// 成员导入 - 导入管道 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 流程: 解析 → 映射（含规范化）→ 派生 → 查重 → 落库
// ==========================================

use crate::domain::{CellValue, DateRule, FieldKind, FieldValue, Gender, ImportReport, MemberField, MemberRecord, SourceRow};
use crate::importer::error::{ImportResult, RowError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

// ==========================================
// MemberImporter Trait
// ==========================================
// 实现者: MemberImporterImpl
#[async_trait]
pub trait MemberImporter: Send + Sync {
    /// 逐行导入（按源顺序，单行失败不影响后续行）
    ///
    /// # 返回
    /// - ImportReport: 成功/失败计数与失败明细
    async fn import_rows(&self, rows: Vec<SourceRow>) -> ImportReport;

    /// 导入单行：映射 → 派生 → 查重 → 落库
    ///
    /// # 返回
    /// - Ok(i64): 新成员 id
    /// - Err(RowError): 行级失败
    async fn import_row(&self, row: &SourceRow) -> Result<i64, RowError>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件首个工作表为源数据行（首行为表头）
    fn parse_to_source_rows(&self, file_path: &Path) -> ImportResult<Vec<SourceRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 按列映射表将源行转换为规范化成员记录
    ///
    /// 只有表头存在且非空白的字段进入记录
    fn map_to_member(&self, row: &SourceRow) -> MemberRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 文本字段: TRIM，空白 → None
    fn clean_text(&self, value: &CellValue) -> Option<String>;

    /// 日期字段规范化，无法识别 → None
    fn normalize_date(&self, value: &CellValue, rule: DateRule) -> Option<NaiveDate>;

    /// 布尔字段: 命中真值词表 → true，否则 false
    fn normalize_bool(&self, value: &CellValue) -> bool;

    /// 性别: 남/여 等 → M/F，无法识别 → None
    fn normalize_gender(&self, value: &CellValue) -> Option<Gender>;

    /// 심방일 列表: 逗号分隔 → JSON 数组字符串，空列表 → None
    fn normalize_visit_dates(&self, value: &CellValue) -> Option<String>;

    /// 按字段类别分派规范化
    fn normalize(&self, field: MemberField, value: &CellValue) -> FieldValue {
        match field.kind() {
            FieldKind::Date(rule) => self
                .normalize_date(value, rule)
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Null),
            FieldKind::Bool => FieldValue::Bool(self.normalize_bool(value)),
            FieldKind::Gender => self
                .normalize_gender(value)
                .map(|g| FieldValue::Text(g.code().to_string()))
                .unwrap_or(FieldValue::Null),
            FieldKind::VisitDates => self
                .normalize_visit_dates(value)
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Null),
            FieldKind::Text => self
                .clean_text(value)
                .map(FieldValue::Text)
                .unwrap_or(FieldValue::Null),
        }
    }
}

// ==========================================
// DerivationService Trait
// ==========================================
// 实现者: DerivationServiceImpl
pub trait DerivationService: Send + Sync {
    /// 派生字段与必填校验（active / phone 默认值 / work_phone 截断 / baptized）
    ///
    /// # 返回
    /// - Err(RowError::MissingName): 姓名缺失，该行不落库
    fn derive(&self, record: &mut MemberRecord) -> Result<(), RowError>;
}
