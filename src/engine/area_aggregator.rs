// ==========================================
// 产线产能规划系统 - 区域汇总引擎
// ==========================================
// 职责: 将单区域产线结果卷积为区域级汇总
// 红线: 满足率展示值截断到 [0,100],原始差值单独保留
// ==========================================

use crate::config::EngineConfig;
use crate::domain::result::{AreaSummary, LineResult, UnfulfilledDemand};
use crate::domain::types::FulfillmentStatus;
use std::collections::HashMap;

// 浮点比较容差 (台/日、百分点)
const EPSILON: f64 = 1e-9;

// ==========================================
// AreaAggregator - 区域汇总引擎
// ==========================================
pub struct AreaAggregator {
    config: EngineConfig,
}

impl AreaAggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 汇总单区域
    ///
    /// # 参数
    /// - `area`: 区域名
    /// - `line_results`: 区域内产线结果
    /// - `demand`: 机型 -> 区域日需求
    /// - `remaining_demand`: 机型 -> 残余需求
    /// - `refine_iterations` / `refine_converged`: 不动点元数据
    pub fn summarize(
        &self,
        area: &str,
        line_results: &[LineResult],
        demand: &HashMap<String, f64>,
        remaining_demand: &HashMap<String, f64>,
        refine_iterations: u32,
        refine_converged: bool,
    ) -> AreaSummary {
        let total_lines = line_results.len() as u32;

        let average_utilization = if line_results.is_empty() {
            0.0
        } else {
            line_results
                .iter()
                .map(|line| line.utilization_with_changeover)
                .sum::<f64>()
                / line_results.len() as f64
        };

        let lines_at_capacity = line_results
            .iter()
            .filter(|line| line.utilization_with_changeover >= self.config.capacity_threshold_pct)
            .count() as u32;

        let total_demand: f64 = demand.values().sum();
        let total_unfulfilled: f64 = remaining_demand
            .values()
            .filter(|residual| **residual > 0.0)
            .sum();
        let total_allocated = (total_demand - total_unfulfilled).max(0.0);

        // 原始满足率; 台账偏离时可能 > 100 (状态 OVER)
        let raw_fulfillment = if total_demand > 0.0 {
            total_allocated / total_demand * 100.0
        } else {
            100.0
        };
        let fulfillment_delta = raw_fulfillment - 100.0;

        let fulfillment_status = if fulfillment_delta > EPSILON {
            FulfillmentStatus::Over
        } else if total_unfulfilled > EPSILON {
            FulfillmentStatus::Under
        } else {
            FulfillmentStatus::Fulfilled
        };

        AreaSummary {
            area: area.to_string(),
            total_lines,
            average_utilization,
            lines_at_capacity,
            total_demand_units_daily: total_demand,
            total_allocated_units_daily: total_allocated,
            total_unfulfilled_units_daily: total_unfulfilled,
            fulfillment_percent: raw_fulfillment.clamp(0.0, 100.0),
            fulfillment_delta_percent: fulfillment_delta,
            fulfillment_status,
            refine_iterations,
            refine_converged,
        }
    }

    /// 生成区域未满足需求清单 (按机型ID排序,输出稳定)
    ///
    /// 在本区域无兼容产线的机型,其需求 100% 计入未满足。
    pub fn collect_unfulfilled(
        &self,
        area: &str,
        demand: &HashMap<String, f64>,
        remaining_demand: &HashMap<String, f64>,
        model_names: &HashMap<String, String>,
    ) -> Vec<UnfulfilledDemand> {
        let mut items: Vec<UnfulfilledDemand> = remaining_demand
            .iter()
            .filter(|(_, residual)| **residual > EPSILON)
            .map(|(model_id, residual)| {
                let model_demand = demand.get(model_id).copied().unwrap_or(0.0);
                let allocated = (model_demand - residual).max(0.0);
                UnfulfilledDemand {
                    area: area.to_string(),
                    model_id: model_id.clone(),
                    model_name: model_names
                        .get(model_id)
                        .cloned()
                        .unwrap_or_else(|| model_id.clone()),
                    demand_units_daily: model_demand,
                    allocated_units_daily: allocated,
                    unfulfilled_units_daily: *residual,
                    fulfillment_percent: if model_demand > 0.0 {
                        allocated / model_demand * 100.0
                    } else {
                        100.0
                    },
                }
            })
            .collect();

        items.sort_by(|a, b| a.model_id.cmp(&b.model_id));
        items
    }
}
