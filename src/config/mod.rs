// ==========================================
// 成员导入 - 配置层
// ==========================================
// 职责: 导入配置加载（环境变量 + 默认值）
// ==========================================

pub mod import_config;

pub use import_config::{config_keys, get_default_db_path, ImportConfig};
