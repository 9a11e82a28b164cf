// ==========================================
// 技能矩阵管理系统 - API层错误类型
// ==========================================
// 职责: 统一 Repository / Engine / Import 错误,映射为稳定错误码与 HTTP 状态
// 错误码: INVALID_ARGUMENT / NOT_FOUND / CONFLICT / BUSINESS_RULE_VIOLATION /
//         UPSTREAM_FAILURE / TIMEOUT / IMPORT_ERROR / INTERNAL_ERROR
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 请求错误 =====
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源冲突: {0}")]
    Conflict(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ===== 依赖错误 =====
    #[error("存储访问失败: {0}")]
    UpstreamFailure(String),

    #[error("处理超时: {0}")]
    Timeout(String),

    // ===== 导入错误 =====
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// HTTP 状态码
    pub fn status(&self) -> u16 {
        match self {
            ApiError::InvalidArgument(_) | ApiError::ImportError(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::BusinessRuleViolation(_) => 422,
            ApiError::UpstreamFailure(_) => 502,
            ApiError::Timeout(_) => 504,
            ApiError::InternalError(_) | ApiError::Other(_) => 500,
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
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Conflict(msg),
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),

            // 存储不可用或存储数据无法解析
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::UpstreamFailure(msg),
            RepositoryError::LockError(msg) => {
                ApiError::UpstreamFailure(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::UpstreamFailure(format!("字段{}错误: {}", field, message))
            }

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            EngineError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            EngineError::UpstreamFailure(msg) => ApiError::UpstreamFailure(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::DepartmentNotFound(id) => {
                ApiError::NotFound(format!("Department(id={})不存在", id))
            }
            ImportError::Repository(e) => e.into(),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
