// ==========================================
// 产线产能规划系统 - 引擎编排器
// ==========================================
// 用途: 协调单年的完整计算管线
// 管线: 需求折算 -> (按区域) 换型不动点 -> 区域汇总
//       -> 系统约束分类 -> 年度汇总
// 红线: 年与年之间无共享可变状态,可安全并行
// ==========================================

use crate::config::EngineConfig;
use crate::domain::changeover::ChangeoverSettings;
use crate::domain::compatibility::CompatibilityEdge;
use crate::domain::line::ProductionLine;
use crate::domain::model::{ProductModel, VolumeRecord};
use crate::domain::result::{
    AreaSummary, LineResult, UnfulfilledDemand, YearResult, YearSummary,
};
use crate::engine::area_aggregator::AreaAggregator;
use crate::engine::changeover_refiner::ChangeoverRefiner;
use crate::engine::changeover_resolver::ChangeoverResolver;
use crate::engine::constraint_classifier::ConstraintClassifier;
use crate::engine::error::EngineResult;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, instrument};

// ==========================================
// PlanningInput - 校验后的不可变输入快照
// ==========================================

/// 校验后的规划输入
///
/// 由校验层构建,引擎只读。非法行在构建前已剔除并上报。
#[derive(Debug, Clone)]
pub struct PlanningInput {
    pub lines: Vec<ProductionLine>,
    pub models: Vec<ProductModel>,
    pub volumes: Vec<VolumeRecord>,
    pub edges: Vec<CompatibilityEdge>,
    pub changeover: ChangeoverSettings,
}

impl PlanningInput {
    /// 机型名称映射
    pub fn model_names(&self) -> HashMap<String, String> {
        self.models
            .iter()
            .map(|m| (m.id.clone(), m.name.clone()))
            .collect()
    }
}

// ==========================================
// PlanOrchestrator - 引擎编排器
// ==========================================

pub struct PlanOrchestrator {
    config: EngineConfig,
    refiner: ChangeoverRefiner,
    aggregator: AreaAggregator,
    classifier: ConstraintClassifier,
}

impl PlanOrchestrator {
    /// 创建新的编排器实例
    pub fn new(config: EngineConfig) -> Self {
        Self {
            refiner: ChangeoverRefiner::new(config.clone()),
            aggregator: AreaAggregator::new(config.clone()),
            classifier: ConstraintClassifier::new(config.clone()),
            config,
        }
    }

    /// 计算单年结果
    ///
    /// # 参数
    /// - `input`: 校验后的输入快照
    /// - `year`: 规划年份
    ///
    /// # 返回
    /// - `Ok(None)`: 该年无产量记录,跳过 (非错误)
    /// - `Ok(Some(YearResult))`: 完整年度结果
    #[instrument(skip(self, input))]
    pub fn compute_year(
        &self,
        input: &PlanningInput,
        year: i32,
    ) -> EngineResult<Option<YearResult>> {
        // ==========================================
        // 步骤1: 需求折算 (年产量 -> 台/日)
        // ==========================================
        debug!("步骤1: 需求折算");

        let known_models: HashSet<&str> = input.models.iter().map(|m| m.id.as_str()).collect();

        let mut demand: HashMap<String, f64> = HashMap::new();
        let mut operations_days: HashMap<String, f64> = HashMap::new();
        for volume in input
            .volumes
            .iter()
            .filter(|v| v.year == year && known_models.contains(v.model_id.as_str()))
        {
            // 同 (机型, 年份) 重复行由导入侧负责,这里首行生效
            demand
                .entry(volume.model_id.clone())
                .or_insert_with(|| volume.daily_demand());
            operations_days
                .entry(volume.model_id.clone())
                .or_insert(volume.operations_days);
        }

        if demand.is_empty() {
            info!(year, "该年无产量记录,跳过");
            return Ok(None);
        }

        let model_names = input.model_names();

        // ==========================================
        // 步骤2: 按区域分组 (BTreeMap 保证遍历顺序确定)
        // ==========================================
        let mut lines_by_area: BTreeMap<String, Vec<ProductionLine>> = BTreeMap::new();
        for line in &input.lines {
            lines_by_area
                .entry(line.area.clone())
                .or_default()
                .push(line.clone());
        }

        info!(
            year,
            areas_count = lines_by_area.len(),
            models_count = demand.len(),
            "开始年度计算"
        );

        let resolver = ChangeoverResolver::new(&input.changeover, &input.models);

        // ==========================================
        // 步骤3: 逐区域执行换型不动点 + 汇总
        // ==========================================
        let mut line_results: Vec<LineResult> = Vec::new();
        let mut areas: Vec<AreaSummary> = Vec::new();
        let mut unfulfilled: Vec<UnfulfilledDemand> = Vec::new();
        let mut area_fulfillments: Vec<f64> = Vec::new();
        let mut yearly_unfulfilled_units = 0.0;

        for (area, area_lines) in &lines_by_area {
            debug!(area = %area, lines_count = area_lines.len(), "处理区域");

            let line_ids: HashSet<&str> = area_lines.iter().map(|l| l.id.as_str()).collect();
            let area_edges: Vec<CompatibilityEdge> = input
                .edges
                .iter()
                .filter(|edge| line_ids.contains(edge.line_id.as_str()))
                .cloned()
                .collect();

            // 每个区域处理全量需求 (产品流经所有工序区域)
            let outcome = self.refiner.refine(
                area,
                area_lines,
                &demand,
                &area_edges,
                &resolver,
                &model_names,
                input.changeover.global_enabled,
            )?;

            let summary = self.aggregator.summarize(
                area,
                &outcome.line_results,
                &demand,
                &outcome.remaining_demand,
                outcome.iterations,
                outcome.converged,
            );

            let area_unfulfilled = self.aggregator.collect_unfulfilled(
                area,
                &demand,
                &outcome.remaining_demand,
                &model_names,
            );
            for item in &area_unfulfilled {
                let days = operations_days
                    .get(&item.model_id)
                    .copied()
                    .unwrap_or(0.0);
                yearly_unfulfilled_units += item.unfulfilled_units_daily * days;
            }

            area_fulfillments.push(summary.fulfillment_percent);
            line_results.extend(outcome.line_results);
            unfulfilled.extend(area_unfulfilled);
            areas.push(summary);
        }

        // 输出稳定: 产线按名称排序 (同名回落到ID)
        line_results.sort_by(|a, b| {
            a.line_name
                .cmp(&b.line_name)
                .then_with(|| a.line_id.cmp(&b.line_id))
        });

        // ==========================================
        // 步骤4: 系统约束分类
        // ==========================================
        debug!("步骤4: 系统约束分类");

        let system_constraint =
            self.classifier
                .classify(&areas, &line_results, &unfulfilled, &input.edges);

        // ==========================================
        // 步骤5: 年度汇总
        // ==========================================
        let summary = self.build_year_summary(
            &line_results,
            &areas,
            &demand,
            &area_fulfillments,
            yearly_unfulfilled_units,
        );

        info!(
            year,
            average_utilization = summary.average_utilization,
            unfulfilled_units = summary.yearly_unfulfilled_units,
            "年度计算完成"
        );

        Ok(Some(YearResult {
            year,
            lines: line_results,
            areas,
            unfulfilled,
            system_constraint,
            summary,
        }))
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 组装年度汇总
    fn build_year_summary(
        &self,
        line_results: &[LineResult],
        areas: &[AreaSummary],
        demand: &HashMap<String, f64>,
        area_fulfillments: &[f64],
        yearly_unfulfilled_units: f64,
    ) -> YearSummary {
        let mut overloaded = 0u32;
        let mut balanced = 0u32;
        let mut underutilized = 0u32;
        let mut total_utilization = 0.0;

        for line in line_results {
            let utilization = line.utilization_with_changeover;
            total_utilization += utilization;

            if utilization > self.config.overload_threshold_pct {
                overloaded += 1;
            } else if utilization >= self.config.balanced_threshold_pct {
                balanced += 1;
            } else {
                underutilized += 1;
            }
        }

        let average_utilization = if line_results.is_empty() {
            0.0
        } else {
            total_utilization / line_results.len() as f64
        };

        let assigned: HashSet<&str> = line_results
            .iter()
            .flat_map(|line| line.assignments.iter())
            .filter(|a| a.allocated_units_daily > 0.0)
            .map(|a| a.model_id.as_str())
            .collect();

        let total_allocated_units: f64 = line_results
            .iter()
            .flat_map(|line| line.assignments.iter())
            .map(|a| a.allocated_units_daily)
            .sum();

        let demand_fulfillment_percent = if area_fulfillments.is_empty() {
            100.0
        } else {
            area_fulfillments.iter().sum::<f64>() / area_fulfillments.len() as f64
        };

        let total_models = demand.len() as u32;
        let assigned_models = assigned.len() as u32;

        YearSummary {
            total_lines: line_results.len() as u32,
            total_areas: areas.len() as u32,
            average_utilization,
            overloaded_lines: overloaded,
            balanced_lines: balanced,
            underutilized_lines: underutilized,
            total_models,
            assigned_models,
            unassigned_models: total_models - assigned_models,
            total_allocated_units,
            demand_fulfillment_percent,
            yearly_unfulfilled_units,
        }
    }
}
