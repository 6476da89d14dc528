// ==========================================
// 成员导入 - 导入层
// ==========================================
// 职责: 成员名册文件 → members 表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod derivation;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod member_importer_impl;
pub mod member_importer_trait;
pub mod pipeline;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use derivation::DerivationService as DerivationServiceImpl;
pub use error::{ImportError, ImportResult, RowError};
pub use field_mapper::{ColumnMapping, FieldMapper as FieldMapperImpl, COLUMN_MAPPINGS};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use member_importer_impl::MemberImporterImpl;
pub use pipeline::run;

// 重导出 Trait 接口
pub use member_importer_trait::{
    DataCleaner, DerivationService, FieldMapper, FileParser, MemberImporter,
};
