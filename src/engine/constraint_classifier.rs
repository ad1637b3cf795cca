// ==========================================
// 产线产能规划系统 - 系统约束分类引擎
// ==========================================
// 职责: 选出年度唯一瓶颈区域并按产能类型分类
// 红线: 选择与明细输出全程确定 (平手按名称字典序)
// ==========================================
// 选择规则:
//   1) 存在未满足需求的区域中取未满足合计最大者 (unfulfilled_demand);
//   2) 否则取平均利用率最高的区域 (highest_utilization)。
// 受限产线: 利用率 >= 达产阈值,或承接了未满足需求。
// ==========================================

use crate::config::EngineConfig;
use crate::domain::compatibility::CompatibilityEdge;
use crate::domain::result::{
    AreaSummary, ConstrainedLineDetail, LineResult, SystemConstraint, UnfulfilledDemand,
    UnfulfilledModelShare,
};
use crate::domain::types::{BottleneckReason, CapacityKind, ConstraintType};
use std::collections::HashSet;
use tracing::debug;

const EPSILON: f64 = 1e-9;

// ==========================================
// ConstraintClassifier - 系统约束分类引擎
// ==========================================
pub struct ConstraintClassifier {
    config: EngineConfig,
}

impl ConstraintClassifier {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 选择并分类系统约束
    ///
    /// # 参数
    /// - `areas`: 区域汇总
    /// - `line_results`: 全部产线结果
    /// - `unfulfilled`: 全部未满足需求清单
    /// - `edges`: 校验后的兼容性边 (用于把区域残余归集到产线)
    ///
    /// # 返回
    /// 区域为空时返回 None
    pub fn classify(
        &self,
        areas: &[AreaSummary],
        line_results: &[LineResult],
        unfulfilled: &[UnfulfilledDemand],
        edges: &[CompatibilityEdge],
    ) -> Option<SystemConstraint> {
        // 1. 选择瓶颈区域
        let (selected, reason) = self.select_area(areas)?;

        debug!(area = %selected.area, reason = %reason, "选定系统约束区域");

        // 2. 区域内受限产线判定
        let area_lines: Vec<&LineResult> = line_results
            .iter()
            .filter(|line| line.area == selected.area)
            .collect();
        let area_unfulfilled: Vec<&UnfulfilledDemand> = unfulfilled
            .iter()
            .filter(|item| item.area == selected.area)
            .collect();

        let mut constrained: Vec<ConstrainedLineDetail> = area_lines
            .iter()
            .filter_map(|line| {
                let detail = self.line_detail(line, &area_unfulfilled, edges);
                let at_capacity =
                    line.utilization_with_changeover >= self.config.capacity_threshold_pct;
                if at_capacity || detail.unfulfilled_units_daily > EPSILON {
                    Some(detail)
                } else {
                    None
                }
            })
            .collect();

        // highest_utilization 且全线低于阈值时,取利用率最高的一条
        // 作为代表性受限产线,保证下钻明细非空
        if constrained.is_empty() {
            if let Some(top) = area_lines.iter().max_by(|a, b| {
                a.utilization_with_changeover
                    .total_cmp(&b.utilization_with_changeover)
                    .then_with(|| b.line_name.cmp(&a.line_name))
            }) {
                constrained.push(self.line_detail(top, &area_unfulfilled, edges));
            }
        }

        constrained.sort_by(|a, b| a.line_name.cmp(&b.line_name).then_with(|| a.line_id.cmp(&b.line_id)));

        // 3. 按受限产线的产能类型分类
        let constraint_type = Self::classify_kind(&constrained);

        Some(SystemConstraint {
            area: selected.area.clone(),
            reason,
            constraint_type,
            average_utilization: selected.average_utilization,
            total_unfulfilled_units_daily: selected.total_unfulfilled_units_daily,
            constrained_lines: constrained,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 区域选择 (平手按区域名升序)
    fn select_area<'a>(
        &self,
        areas: &'a [AreaSummary],
    ) -> Option<(&'a AreaSummary, BottleneckReason)> {
        if areas.is_empty() {
            return None;
        }

        let with_unfulfilled: Vec<&AreaSummary> = areas
            .iter()
            .filter(|area| area.total_unfulfilled_units_daily > EPSILON)
            .collect();

        if !with_unfulfilled.is_empty() {
            let selected = with_unfulfilled.into_iter().max_by(|a, b| {
                a.total_unfulfilled_units_daily
                    .total_cmp(&b.total_unfulfilled_units_daily)
                    .then_with(|| b.area.cmp(&a.area))
            })?;
            return Some((selected, BottleneckReason::UnfulfilledDemand));
        }

        let selected = areas.iter().max_by(|a, b| {
            a.average_utilization
                .total_cmp(&b.average_utilization)
                .then_with(|| b.area.cmp(&a.area))
        })?;
        Some((selected, BottleneckReason::HighestUtilization))
    }

    /// 构造单线下钻明细
    ///
    /// 归集规则: 产线承接其拥有兼容性边的机型的区域残余;
    /// 同一机型可同时出现在多条受限产线上 (均有能力消化它)。
    fn line_detail(
        &self,
        line: &LineResult,
        area_unfulfilled: &[&UnfulfilledDemand],
        edges: &[CompatibilityEdge],
    ) -> ConstrainedLineDetail {
        let compatible_models: HashSet<&str> = edges
            .iter()
            .filter(|edge| edge.line_id == line.line_id)
            .map(|edge| edge.model_id.as_str())
            .collect();

        let mut attributed: Vec<&&UnfulfilledDemand> = area_unfulfilled
            .iter()
            .filter(|item| compatible_models.contains(item.model_id.as_str()))
            .collect();

        let line_total: f64 = attributed
            .iter()
            .map(|item| item.unfulfilled_units_daily)
            .sum();

        // 未满足量降序,平手按机型ID
        attributed.sort_by(|a, b| {
            b.unfulfilled_units_daily
                .total_cmp(&a.unfulfilled_units_daily)
                .then_with(|| a.model_id.cmp(&b.model_id))
        });

        let top_unfulfilled_models: Vec<UnfulfilledModelShare> = attributed
            .iter()
            .take(self.config.top_unfulfilled_models)
            .map(|item| UnfulfilledModelShare {
                model_id: item.model_id.clone(),
                model_name: item.model_name.clone(),
                unfulfilled_units_daily: item.unfulfilled_units_daily,
                percent_of_line_unfulfilled: if line_total > 0.0 {
                    item.unfulfilled_units_daily / line_total * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        ConstrainedLineDetail {
            line_id: line.line_id.clone(),
            line_name: line.line_name.clone(),
            capacity_kind: line.capacity_kind,
            utilization_with_changeover: line.utilization_with_changeover,
            unfulfilled_units_daily: line_total,
            top_unfulfilled_models,
        }
    }

    /// 受限产线产能类型 -> 约束分类
    fn classify_kind(constrained: &[ConstrainedLineDetail]) -> ConstraintType {
        let all_dedicated = constrained
            .iter()
            .all(|line| line.capacity_kind == CapacityKind::Dedicated);
        let all_shared = constrained
            .iter()
            .all(|line| line.capacity_kind == CapacityKind::Shared);

        if all_dedicated && !constrained.is_empty() {
            ConstraintType::DedicatedLineBottleneck
        } else if all_shared && !constrained.is_empty() {
            ConstraintType::SharedCapacityConstraint
        } else {
            ConstraintType::MixedConstraint
        }
    }
}
