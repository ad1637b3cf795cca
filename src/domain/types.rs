// ==========================================
// 产线产能规划系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与前端契约一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产能类型 (Capacity Kind)
// ==========================================
// DEDICATED: 专用产线,负荷不可外移
// SHARED: 共享产线,负荷可在区域间调剂
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityKind {
    Dedicated, // 专用
    Shared,    // 共享
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityKind::Dedicated => write!(f, "DEDICATED"),
            CapacityKind::Shared => write!(f, "SHARED"),
        }
    }
}

// ==========================================
// 瓶颈原因 (Bottleneck Reason)
// ==========================================
// 选择系统约束区域时的判定依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckReason {
    UnfulfilledDemand,  // 存在未满足需求
    HighestUtilization, // 无未满足需求,取最高利用率
}

impl fmt::Display for BottleneckReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BottleneckReason::UnfulfilledDemand => write!(f, "unfulfilled_demand"),
            BottleneckReason::HighestUtilization => write!(f, "highest_utilization"),
        }
    }
}

// ==========================================
// 约束类型 (Constraint Type)
// ==========================================
// 按受限产线的产能类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    DedicatedLineBottleneck,  // 受限产线全部为专用
    SharedCapacityConstraint, // 受限产线全部为共享
    MixedConstraint,          // 两者混合
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::DedicatedLineBottleneck => write!(f, "dedicated_line_bottleneck"),
            ConstraintType::SharedCapacityConstraint => write!(f, "shared_capacity_constraint"),
            ConstraintType::MixedConstraint => write!(f, "mixed_constraint"),
        }
    }
}

// ==========================================
// 满足状态 (Fulfillment Status)
// ==========================================
// OVER 仅在产量台账与分配输入发生偏离时出现
// (分配本身以需求为硬上限,不会产出 OVER)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Fulfilled, // 需求全部满足
    Under,     // 存在未满足需求
    Over,      // 台账超量 (见 AreaSummary 注释)
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentStatus::Fulfilled => write!(f, "FULFILLED"),
            FulfillmentStatus::Under => write!(f, "UNDER"),
            FulfillmentStatus::Over => write!(f, "OVER"),
        }
    }
}

// ==========================================
// 换型估算方法 (Changeover Estimator)
// ==========================================
// EXPECTED_PAIRWISE: 份额加权的有序对求和,换型次数 = 机型数 - 1
// EXPECTED_PAIRWISE_NORMALIZED: 同上,再按 (1 - HHI) 归一化
// (对"发生了机型切换"取条件期望,产品描述中的概率加权口径)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeoverEstimator {
    ExpectedPairwise,
    ExpectedPairwiseNormalized,
}

impl Default for ChangeoverEstimator {
    fn default() -> Self {
        ChangeoverEstimator::ExpectedPairwise
    }
}

impl fmt::Display for ChangeoverEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeoverEstimator::ExpectedPairwise => write!(f, "EXPECTED_PAIRWISE"),
            ChangeoverEstimator::ExpectedPairwiseNormalized => {
                write!(f, "EXPECTED_PAIRWISE_NORMALIZED")
            }
        }
    }
}
