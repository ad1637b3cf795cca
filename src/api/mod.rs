// ==========================================
// 产线产能规划系统 - API 层
// ==========================================
// 职责: 快照校验 + 按年并行编排 + 响应组装
// 红线: 引擎无文件/网络表面,API 只做进程内调用
// ==========================================

pub mod dto;
pub mod error;
pub mod planning_api;
pub mod planning_service;
pub mod validator;

// 重导出核心类型
pub use dto::{
    ChangeoverInput, CompatibilityInput, LineInput, ModelInput, OverallSummary,
    PlanningResponse, PlanningSnapshot, ResponseMetadata, VolumeInput, YearFailure,
};
pub use error::{PlanningError, PlanningResult};
pub use planning_api::PlanningApi;
pub use planning_service::PlanningService;
pub use validator::{SnapshotValidator, ValidationIssue, ValidationReport};
