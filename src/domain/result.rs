// ==========================================
// 产线产能规划系统 - 计算结果对象
// ==========================================
// 职责: 承载单次运行的全部输出
// 红线: 结果归属于产出它的 (年份, 区域) 计算,一经产出不可变更;
//       聚合对象为纯派生,全量重算,不做增量修补
// 序列化: camelCase (与桌面端 JSON 契约一致)
// ==========================================

use crate::domain::types::{
    BottleneckReason, CapacityKind, ChangeoverEstimator, ConstraintType, FulfillmentStatus,
};
use serde::{Deserialize, Serialize};

// ==========================================
// ModelAssignment - 机型分配
// ==========================================

/// 单条机型分配记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAssignment {
    /// 机型ID
    pub model_id: String,

    /// 机型名称
    pub model_name: String,

    /// 分配产量 (台/日)
    pub allocated_units_daily: f64,

    /// 分配时点的剩余需求 (台/日)
    pub demand_units_daily: f64,

    /// 消耗时间 (秒)
    pub time_required_seconds: f64,

    /// 节拍时间 (秒/台)
    pub cycle_time: f64,

    /// 效率 (%)
    pub efficiency: f64,

    /// 分配优先级
    pub priority: i32,

    /// 满足率 (allocated / demand * 100)
    pub fulfillment_percent: f64,
}

// ==========================================
// TransitionAnalysis - 切换分析 (SMED 优化依据)
// ==========================================

/// 单个有序机型切换的加权贡献
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionAnalysis {
    pub from_model_id: String,
    pub from_model_name: String,
    pub to_model_id: String,
    pub to_model_name: String,

    /// 解析出的换型时长 (分钟)
    pub changeover_minutes: f64,

    /// 发生概率 P[from] * P[to]
    pub probability: f64,

    /// 加权贡献 probability * changeover_minutes
    pub weighted_contribution: f64,

    /// 占全部贡献的百分比
    pub percent_of_total: f64,
}

// ==========================================
// ChangeoverBreakdown - 换型明细
// ==========================================

/// 单线换型估算明细
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeoverBreakdown {
    /// 使用的估算方法
    pub estimator: ChangeoverEstimator,

    /// 估算换型次数/日
    pub estimated_changeover_count: u32,

    /// 单次换型期望时长 (秒)
    pub expected_changeover_seconds: f64,

    /// 最坏单次换型时长 (秒)
    pub worst_case_changeover_seconds: f64,

    /// 机型混合集中度 (HHI, Σ share²)
    pub hhi: f64,

    /// 有分配量的机型数
    pub distinct_model_count: u32,

    /// 加权贡献最高的切换 (降序, 最多 top_transitions 条)
    pub top_transitions: Vec<TransitionAnalysis>,

    /// 估算过程中的警告
    pub warnings: Vec<String>,
}

// ==========================================
// LineResult - 产线结果
// ==========================================

/// 单线分配结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResult {
    pub line_id: String,
    pub line_name: String,
    pub area: String,
    pub capacity_kind: CapacityKind,

    /// 日可用时间 (秒)
    pub time_available_daily: f64,

    /// 生产耗时 (秒)
    pub time_used_production: f64,

    /// 换型耗时 (秒)
    pub time_used_changeover: f64,

    /// 利用率 - 仅生产 (%)
    pub utilization_production_only: f64,

    /// 利用率 - 含换型 (%)
    pub utilization_with_changeover: f64,

    /// 换型侵蚀 (百分点)
    pub changeover_impact_percent: f64,

    /// 本线换型是否生效 (两级覆写解析后)
    pub changeover_effective_enabled: bool,

    /// 分配明细 (按分配顺序)
    pub assignments: Vec<ModelAssignment>,

    /// 换型明细 (换型生效时产出)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changeover: Option<ChangeoverBreakdown>,
}

impl LineResult {
    /// 总耗时 (生产 + 换型, 秒)
    pub fn total_time_used(&self) -> f64 {
        self.time_used_production + self.time_used_changeover
    }
}

// ==========================================
// UnfulfilledDemand - 未满足需求
// ==========================================

/// 区域内单机型的未满足需求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfulfilledDemand {
    pub area: String,
    pub model_id: String,
    pub model_name: String,

    /// 区域需求 (台/日)
    pub demand_units_daily: f64,

    /// 已分配 (台/日)
    pub allocated_units_daily: f64,

    /// 未满足 (台/日)
    pub unfulfilled_units_daily: f64,

    /// 满足率 (%)
    pub fulfillment_percent: f64,
}

// ==========================================
// AreaSummary - 区域汇总
// ==========================================

/// 区域级汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub area: String,

    /// 区域内产线数
    pub total_lines: u32,

    /// 平均利用率 (含换型, %)
    pub average_utilization: f64,

    /// 达产产线数 (利用率 >= capacity_threshold_pct)
    pub lines_at_capacity: u32,

    /// 区域总需求 (台/日)
    pub total_demand_units_daily: f64,

    /// 区域总分配 (台/日)
    pub total_allocated_units_daily: f64,

    /// 区域总未满足 (台/日)
    pub total_unfulfilled_units_daily: f64,

    /// 满足率 (%), 展示用, 截断到 [0, 100]
    pub fulfillment_percent: f64,

    /// 原始满足率与 100% 的差值 (百分点, 未截断)。
    /// 分配以需求为硬上限,引擎自身不会产出正值;
    /// 正值仅在台账产量与分配输入偏离时出现 (状态 OVER)。
    pub fulfillment_delta_percent: f64,

    /// 满足状态
    pub fulfillment_status: FulfillmentStatus,

    /// 换型不动点迭代次数
    pub refine_iterations: u32,

    /// 不动点是否收敛 (未收敛非错误,结果取最后一轮)
    pub refine_converged: bool,
}

// ==========================================
// SystemConstraint - 系统约束
// ==========================================

/// 受限产线明细
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstrainedLineDetail {
    pub line_id: String,
    pub line_name: String,
    pub capacity_kind: CapacityKind,

    /// 利用率 (含换型, %)
    pub utilization_with_changeover: f64,

    /// 本线承接的未满足需求合计 (台/日)
    pub unfulfilled_units_daily: f64,

    /// 未满足机型 Top N (按未满足量降序)
    pub top_unfulfilled_models: Vec<UnfulfilledModelShare>,
}

/// 受限产线上的未满足机型份额
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfulfilledModelShare {
    pub model_id: String,
    pub model_name: String,

    /// 未满足量 (台/日)
    pub unfulfilled_units_daily: f64,

    /// 占本线未满足合计的百分比
    pub percent_of_line_unfulfilled: f64,
}

/// 系统约束 (年度唯一瓶颈区域)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConstraint {
    /// 瓶颈区域
    pub area: String,

    /// 选择依据
    pub reason: BottleneckReason,

    /// 约束分类 (专用/共享/混合)
    pub constraint_type: ConstraintType,

    /// 区域平均利用率 (%)
    pub average_utilization: f64,

    /// 区域未满足合计 (台/日)
    pub total_unfulfilled_units_daily: f64,

    /// 受限产线明细
    pub constrained_lines: Vec<ConstrainedLineDetail>,
}

// ==========================================
// YearResult - 年度结果
// ==========================================

/// 年度汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub total_lines: u32,
    pub total_areas: u32,

    /// 全部产线平均利用率 (%)
    pub average_utilization: f64,

    /// 过载产线数 (> overload_threshold_pct)
    pub overloaded_lines: u32,

    /// 均衡产线数 (balanced_threshold_pct ..= overload_threshold_pct)
    pub balanced_lines: u32,

    /// 低载产线数 (< balanced_threshold_pct)
    pub underutilized_lines: u32,

    pub total_models: u32,
    pub assigned_models: u32,
    pub unassigned_models: u32,

    /// 全部分配合计 (台/日, 跨区域求和)
    pub total_allocated_units: f64,

    /// 需求满足率 (%, 各区域满足率的均值)
    pub demand_fulfillment_percent: f64,

    /// 年度未满足量 (台, Σ 日未满足 × 作业天数)
    pub yearly_unfulfilled_units: f64,
}

/// 单年完整结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub year: i32,

    /// 产线结果 (按产线名称排序,保证输出稳定)
    pub lines: Vec<LineResult>,

    /// 区域汇总 (按区域名称排序)
    pub areas: Vec<AreaSummary>,

    /// 未满足需求清单 (按区域、机型排序)
    pub unfulfilled: Vec<UnfulfilledDemand>,

    /// 系统约束 (区域非空时必产出)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_constraint: Option<SystemConstraint>,

    /// 年度汇总
    pub summary: YearSummary,
}
