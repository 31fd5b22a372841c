// ==========================================
// 八字排盘引擎 - API层错误类型
// ==========================================
// 职责: 将引擎、仓储、配置错误转换为展示层可读的错误消息
// ==========================================

use crate::engine::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误（由用户修正）
    // ==========================================
    #[error("日期无效: {0}")]
    InvalidDate(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 计算错误
    // ==========================================
    #[error("排盘失败: {0}")]
    CalculationError(String),

    // ==========================================
    // 数据访问 / 配置错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为用户可修正的输入错误
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidDate(_) | ApiError::InvalidInput(_) | ApiError::NotFound(_)
        )
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::MalformedInput {
                field: "longitude", ..
            } => ApiError::InvalidInput(err.to_string()),
            _ if err.is_invalid_date() => ApiError::InvalidDate(err.to_string()),
            _ => ApiError::CalculationError(err.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::Serialization(e) => {
                ApiError::InternalError(format!("记录序列化失败: {}", e))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
