// ==========================================
// 技能矩阵管理系统 - 引擎层错误类型
// ==========================================
// 分类: InvalidArgument / Timeout / UpstreamFailure
// NotFound 不在此列: 未命中的部门/设备返回空结果
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("聚合计算超时: stage={stage}, elapsed={elapsed_ms}ms, budget={budget_ms}ms")]
    Timeout {
        stage: String,
        elapsed_ms: u128,
        budget_ms: u128,
    },

    #[error("数据源不可用: {0}")]
    UpstreamFailure(String),
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        EngineError::UpstreamFailure(err.to_string())
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
