// ==========================================
// 技能矩阵管理系统 - 聚合计算时间预算
// ==========================================
// 部门 × 员工 × 技能的扇出在异常数据下无上界,
// 每个聚合请求携带一个截止时间,循环内逐项检查
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use std::time::{Duration, Instant};

/// 单次请求的时间预算
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    started: Instant,
    limit: Option<Duration>,
}

impl Budget {
    /// 创建预算（从当前时刻开始计时）
    pub fn new(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    /// 按毫秒创建; 0 表示不限时
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::unlimited()
        } else {
            Self::new(Duration::from_millis(ms))
        }
    }

    /// 不限时预算
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            limit: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 检查是否超出预算
    ///
    /// # 参数
    /// - stage: 当前阶段名称（写入错误信息）
    pub fn check(&self, stage: &str) -> EngineResult<()> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let elapsed = self.started.elapsed();
        if elapsed > limit {
            return Err(EngineError::Timeout {
                stage: stage.to_string(),
                elapsed_ms: elapsed.as_millis(),
                budget_ms: limit.as_millis(),
            });
        }
        Ok(())
    }
}
