// ==========================================
// 产线产能规划系统 - 引擎层错误类型
// ==========================================
// 职责: 引擎内部的配置性错误
// 说明: 校验层在分配前拦截这些情况,此处为纵深防御;
//       一旦出现说明快照绕过了校验层
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 机型缺少机型族,族级换型默认值无法解析
    #[error("机型缺少机型族: model_id={model_id}")]
    MissingFamily { model_id: String },

    /// 换型解析遇到未知机型
    #[error("未知机型: model_id={model_id}")]
    UnknownModel { model_id: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
