// ==========================================
// 产线产能规划系统 - 引擎配置
// ==========================================
// 所有阈值集中于此,序列化时缺省字段取默认值
// ==========================================

use crate::domain::types::ChangeoverEstimator;
use serde::{Deserialize, Serialize};

/// 引擎配置
///
/// 快照可整体省略,逐字段覆盖。默认值即产品口径。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// 换型不动点迭代上限
    pub max_refine_iterations: u32,

    /// 达产阈值 (%) - 受限产线判定与 lines_at_capacity 统计
    pub capacity_threshold_pct: f64,

    /// 均衡下限 (%) - 年度汇总的产线分档
    pub balanced_threshold_pct: f64,

    /// 过载阈值 (%) - 年度汇总的产线分档
    pub overload_threshold_pct: f64,

    /// 受限产线未满足机型 Top N
    pub top_unfulfilled_models: usize,

    /// 换型明细中保留的切换 Top N
    pub top_transitions: usize,

    /// 换型估算方法 (产品描述对该口径存在两种解读,均受支持)
    pub estimator: ChangeoverEstimator,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_refine_iterations: 5,
            capacity_threshold_pct: 95.0,
            balanced_threshold_pct: 70.0,
            overload_threshold_pct: 100.0,
            top_unfulfilled_models: 5,
            top_transitions: 10,
            estimator: ChangeoverEstimator::ExpectedPairwise,
        }
    }
}
