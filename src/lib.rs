// ==========================================
// 产线产能规划系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio
// 系统定位: 产能规划计算引擎 (UI/导入/持久化均为外部协作方)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BottleneckReason, CapacityKind, ChangeoverEstimator, ConstraintType, FulfillmentStatus,
};

// 领域实体
pub use domain::{
    ChangeoverSettings, CompatibilityEdge, ProductModel, ProductionLine, VolumeRecord,
};

// 计算结果
pub use domain::result::{
    AreaSummary, ChangeoverBreakdown, ConstrainedLineDetail, LineResult, ModelAssignment,
    SystemConstraint, TransitionAnalysis, UnfulfilledDemand, YearResult, YearSummary,
};

// 引擎
pub use engine::{
    AreaAggregator, ChangeoverRefiner, ChangeoverResolver, ConstraintClassifier, MixAnalyzer,
    PlanOrchestrator, PriorityAllocator,
};

// 配置
pub use config::EngineConfig;

// API
pub use api::{PlanningApi, PlanningError, PlanningResult, PlanningService};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线产能规划系统";

// 结果契约版本 (写入响应 metadata.version)
pub const RESULT_CONTRACT_VERSION: &str = "1.0";

// ==========================================
// 预编译检查
// ==========================================
