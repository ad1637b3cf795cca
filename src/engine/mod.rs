// ==========================================
// 产线产能规划系统 - 引擎层
// ==========================================
// 职责: 实现分配/换型/分类的业务规则
// 红线: 引擎为纯计算,无 I/O,无跨运行状态;
//       所有剔除/跳过必须输出 reason
// ==========================================

pub mod area_aggregator;
pub mod changeover_refiner;
pub mod changeover_resolver;
pub mod constraint_classifier;
pub mod error;
pub mod mix_analyzer;
pub mod orchestrator;
pub mod priority_allocator;

// 重导出核心引擎
pub use area_aggregator::AreaAggregator;
pub use changeover_refiner::{ChangeoverRefiner, RefineOutcome};
pub use changeover_resolver::ChangeoverResolver;
pub use constraint_classifier::ConstraintClassifier;
pub use error::{EngineError, EngineResult};
pub use mix_analyzer::{MixAnalyzer, MixProfile};
pub use orchestrator::{PlanOrchestrator, PlanningInput};
pub use priority_allocator::{AllocationOutcome, PriorityAllocator};
