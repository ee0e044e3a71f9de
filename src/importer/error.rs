// ==========================================
// 燃油价格导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 所有错误均为致命错误，中止本次运行
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum IntakeError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("列布局不匹配 ({file}, 行 {row}): 期望至少 {expected} 列，实际 {actual} 列")]
    ColumnLayoutMismatch {
        file: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("缺少列 (行 {row}): {column}")]
    MissingColumn { row: usize, column: String },

    // ===== 字段解码错误 =====
    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (行 {row}, 字段 {field}): 期望 dd/mm/yyyy HH:MM，实际 '{value}'")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 引用解析错误 =====
    #[error("地点未找到 (行 {row}): '{name}'")]
    LocalityNotFound { row: usize, name: String },

    // ===== ID 分配错误 =====
    #[error("实体种类 {kind} 不携带价格表，无法发放站点 ID")]
    PriceSheetSequenceMissing { kind: String },

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntakeError {
    /// 是否为输入数据问题（而非基础设施问题）
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            IntakeError::ColumnLayoutMismatch { .. }
                | IntakeError::MissingColumn { .. }
                | IntakeError::TypeConversionError { .. }
                | IntakeError::DateFormatError { .. }
                | IntakeError::LocalityNotFound { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        IntakeError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for IntakeError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                IntakeError::ForeignKeyViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                IntakeError::UniqueConstraintViolation(msg)
            }
            _ => IntakeError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        IntakeError::CsvParseError(err.to_string())
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for IntakeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::LockError(msg) => IntakeError::LockError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                IntakeError::UniqueConstraintViolation(msg)
            }
            RepositoryError::ForeignKeyViolation(msg) => IntakeError::ForeignKeyViolation(msg),
            RepositoryError::Other(e) => IntakeError::Other(e),
            other => IntakeError::DatabaseQueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type IntakeResult<T> = Result<T, IntakeError>;
