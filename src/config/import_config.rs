// ==========================================
// 成员导入 - 导入配置
// ==========================================
// 职责: 导入所需配置的加载（环境变量覆写 + 默认值）
// 红线: 配置以显式值传入导入流程，不读取全局状态
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::path::PathBuf;
use std::str::FromStr;

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    pub const DB_PATH: &str = "MEMBER_IMPORT_DB_PATH";
    pub const SOURCE_FILE: &str = "MEMBER_IMPORT_SOURCE";
    pub const DEFAULT_PHONE: &str = "MEMBER_IMPORT_DEFAULT_PHONE";
    pub const WORK_PHONE_MAX_LEN: &str = "MEMBER_IMPORT_WORK_PHONE_MAX_LEN";
    pub const PROGRESS_INTERVAL: &str = "MEMBER_IMPORT_PROGRESS_INTERVAL";
    pub const FAILURE_DETAIL_LIMIT: &str = "MEMBER_IMPORT_FAILURE_DETAIL_LIMIT";
}

pub const DEFAULT_SOURCE_FILE: &str = "members.xlsx";
pub const DEFAULT_PHONE: &str = "010-0000-0000";
pub const DEFAULT_WORK_PHONE_MAX_LEN: usize = 20;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;
pub const DEFAULT_FAILURE_DETAIL_LIMIT: usize = 10;

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// SQLite 数据库路径
    pub db_path: String,
    /// 未指定源文件时的默认文件名
    pub default_source_file: String,
    /// 电话缺失时的占位值
    pub default_phone: String,
    /// work_phone 最大长度（字符数）
    pub work_phone_max_len: usize,
    /// 进度日志间隔（行）
    pub progress_interval: usize,
    /// 报告中保留的失败明细条数
    pub failure_detail_limit: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            default_source_file: DEFAULT_SOURCE_FILE.to_string(),
            default_phone: DEFAULT_PHONE.to_string(),
            work_phone_max_len: DEFAULT_WORK_PHONE_MAX_LEN,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            failure_detail_limit: DEFAULT_FAILURE_DETAIL_LIMIT,
        }
    }
}

impl ImportConfig {
    /// 从环境变量加载（未设置的键取默认值）
    pub fn from_env() -> ImportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载
    pub fn from_lookup<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(v) = get(config_keys::DB_PATH) {
            config.db_path = v;
        }
        if let Some(v) = get(config_keys::SOURCE_FILE) {
            config.default_source_file = v;
        }
        if let Some(v) = get(config_keys::DEFAULT_PHONE) {
            config.default_phone = v;
        }
        if let Some(v) = get(config_keys::WORK_PHONE_MAX_LEN) {
            config.work_phone_max_len = parse_value(config_keys::WORK_PHONE_MAX_LEN, &v)?;
        }
        if let Some(v) = get(config_keys::PROGRESS_INTERVAL) {
            config.progress_interval = parse_value(config_keys::PROGRESS_INTERVAL, &v)?;
        }
        if let Some(v) = get(config_keys::FAILURE_DETAIL_LIMIT) {
            config.failure_detail_limit = parse_value(config_keys::FAILURE_DETAIL_LIMIT, &v)?;
        }

        if config.progress_interval == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::PROGRESS_INTERVAL.to_string(),
                value: "0".to_string(),
                message: "进度间隔必须大于 0".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &str, value: &str) -> ImportResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ImportError::ConfigValueError {
        key: key.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// 默认数据库路径
///
/// 优先级: 用户数据目录/member-import/members.db → ./members.db
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./members.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("member-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("members.db");
        }
    }

    path.to_string_lossy().to_string()
}
