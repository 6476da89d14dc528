// ==========================================
// 成员导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: ImportError 为致命错误（中止整个导入），RowError 为行级错误（计数后继续）
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块致命错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("源文件不存在: {0}")]
    SourceNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 数据库错误 =====
    #[error("数据库不可用: {0}")]
    SinkUnavailable(String),

    // ===== 配置错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 行级错误：计入失败数，不中止导入
#[derive(Error, Debug)]
pub enum RowError {
    #[error("姓名缺失: 跳过该行")]
    MissingName,

    #[error("重复成员: 已存在 (name={name}, phone={phone})")]
    Duplicate { name: String, phone: String },

    #[error("落库失败: {0}")]
    Sink(#[from] RepositoryError),
}

impl RowError {
    pub fn kind(&self) -> crate::domain::FailureKind {
        use crate::domain::FailureKind;
        match self {
            RowError::MissingName => FailureKind::MissingName,
            RowError::Duplicate { .. } => FailureKind::Duplicate,
            RowError::Sink(_) => FailureKind::SinkRejected,
        }
    }
}
