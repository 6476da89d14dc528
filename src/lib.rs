// ==========================================
// 成员名册导入工具 - 核心库
// ==========================================
// 技术栈: Rust + calamine + SQLite
// 系统定位: 一次性批量导入 (Excel/CSV → members 表)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 源数据行 / 成员记录 / 报告
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析、映射、清洗、派生
pub mod importer;

// 配置层 - 环境变量配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::ImportConfig;
pub use domain::{ImportReport, MemberField, MemberRecord, SourceRow};
pub use importer::{run, ImportError, ImportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "成员名册导入工具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
