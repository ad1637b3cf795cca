// ==========================================
// 产线产能规划系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换引擎错误为调用方可解释的错误
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================

use crate::engine::error::EngineError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum PlanningError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 引擎错误
    // ==========================================
    #[error(transparent)]
    Engine(#[from] EngineError),

    // ==========================================
    // 并行执行错误
    // ==========================================
    /// 年度计算任务异常退出 (panic / 取消)
    #[error("年度计算任务失败: {0}")]
    TaskJoin(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type PlanningResult<T> = Result<T, PlanningError>;
