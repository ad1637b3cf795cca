// ==========================================
// 产线产能规划系统 - 配置层
// ==========================================
// 职责: 引擎参数 (阈值/迭代上限/估算方法)
// 存储: 由调用方传入,引擎自身无配置持久化
// ==========================================

pub mod engine_config;

// 重导出核心配置
pub use engine_config::EngineConfig;
