// ==========================================
// 产线产能规划系统 - 换型不动点引擎
// ==========================================
// 职责: 交替执行分配与换型估算,直至分配稳定
// 红线: 线级换型开关为两级覆写 (explicit ? own : global),
//       不可折叠;达迭代上限未收敛不是错误,取最后一轮结果
// ==========================================
// 迭代口径:
//   第 1 轮按全量日可用时间分配;
//   之后每轮 available = daily - 换型耗时 (截断到 0);
//   当每条线的已分配机型集合与上一轮一致时提前收敛。
// 显式循环 + 计数器,终止性显然 (不使用递归)。
// ==========================================

use crate::config::EngineConfig;
use crate::domain::compatibility::CompatibilityEdge;
use crate::domain::line::ProductionLine;
use crate::domain::result::{ChangeoverBreakdown, LineResult, ModelAssignment, TransitionAnalysis};
use crate::domain::types::ChangeoverEstimator;
use crate::engine::changeover_resolver::ChangeoverResolver;
use crate::engine::error::EngineResult;
use crate::engine::mix_analyzer::MixAnalyzer;
use crate::engine::priority_allocator::{AllocationOutcome, PriorityAllocator};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// 单区域不动点结果
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// 产线结果 (与输入产线顺序一致)
    pub line_results: Vec<LineResult>,

    /// 机型 -> 残余需求 (台/日)
    pub remaining_demand: HashMap<String, f64>,

    /// 实际执行的分配轮数
    pub iterations: u32,

    /// 是否在迭代上限内收敛
    pub converged: bool,
}

/// 单线换型估算 (中间量)
struct LineChangeoverEstimate {
    time_used_changeover: f64,
    breakdown: ChangeoverBreakdown,
}

// ==========================================
// ChangeoverRefiner - 换型不动点引擎
// ==========================================
pub struct ChangeoverRefiner {
    config: EngineConfig,
    allocator: PriorityAllocator,
    analyzer: MixAnalyzer,
}

impl ChangeoverRefiner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            allocator: PriorityAllocator::new(),
            analyzer: MixAnalyzer::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对单区域执行分配与换型的不动点迭代
    ///
    /// # 参数
    /// - `area`: 区域名 (仅用于日志)
    /// - `lines`: 区域内产线
    /// - `demand`: 机型 -> 区域日需求
    /// - `edges`: 区域内兼容性边
    /// - `resolver`: 换型时间解析器
    /// - `model_names`: 机型名称映射
    /// - `global_enabled`: 全局换型开关
    ///
    /// # 返回
    /// 产线结果 + 残余需求 + 迭代元数据
    #[instrument(skip_all, fields(area = %area, lines_count = lines.len()))]
    pub fn refine(
        &self,
        area: &str,
        lines: &[ProductionLine],
        demand: &HashMap<String, f64>,
        edges: &[CompatibilityEdge],
        resolver: &ChangeoverResolver,
        model_names: &HashMap<String, String>,
        global_enabled: bool,
    ) -> EngineResult<RefineOutcome> {
        // 两级覆写解析 (每线一次)
        let effective_enabled: HashMap<String, bool> = lines
            .iter()
            .map(|line| {
                (
                    line.id.clone(),
                    line.effective_changeover_enabled(global_enabled),
                )
            })
            .collect();
        let any_effective = effective_enabled.values().any(|&enabled| enabled);

        // 第 1 轮: 不扣换型
        let mut available_time: HashMap<String, f64> = lines
            .iter()
            .map(|line| (line.id.clone(), line.time_available_daily.max(0.0)))
            .collect();

        let mut previous_sets: Option<HashMap<String, BTreeSet<String>>> = None;
        let mut iterations: u32 = 0;

        loop {
            iterations += 1;

            // 步骤1: 按当前可用时间分配
            let outcome =
                self.allocator
                    .allocate(edges, demand, &available_time, model_names);

            // 步骤2: 对换型生效的产线估算换型耗时
            let mut estimates: HashMap<String, LineChangeoverEstimate> = HashMap::new();
            for line in lines {
                if !effective_enabled[&line.id] {
                    continue;
                }
                let assignments: &[ModelAssignment] = outcome
                    .assignments_by_line
                    .get(&line.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let estimate = self.estimate_line_changeover(line, assignments, resolver)?;
                estimates.insert(line.id.clone(), estimate);
            }

            // 步骤3: 收敛判定 (每线已分配机型集合与上一轮一致)
            let assigned_sets: HashMap<String, BTreeSet<String>> = lines
                .iter()
                .map(|line| {
                    let set: BTreeSet<String> = outcome
                        .assignments_by_line
                        .get(&line.id)
                        .map(|assignments| {
                            assignments
                                .iter()
                                .filter(|a| a.allocated_units_daily > 0.0)
                                .map(|a| a.model_id.clone())
                                .collect()
                        })
                        .unwrap_or_default();
                    (line.id.clone(), set)
                })
                .collect();

            // 换型全部关闭时分配不可能变化,一轮即稳定
            let converged = !any_effective
                || previous_sets
                    .as_ref()
                    .map(|prev| prev == &assigned_sets)
                    .unwrap_or(false);

            if converged || iterations >= self.config.max_refine_iterations {
                debug!(
                    iterations,
                    converged, "换型不动点迭代结束"
                );
                return Ok(self.finalize(
                    lines,
                    outcome,
                    estimates,
                    &effective_enabled,
                    iterations,
                    converged,
                ));
            }

            previous_sets = Some(assigned_sets);

            // 步骤4: 下一轮可用时间 = 日可用 - 换型耗时 (截断到 0)
            for line in lines {
                let changeover_time = estimates
                    .get(&line.id)
                    .map(|e| e.time_used_changeover)
                    .unwrap_or(0.0);
                available_time.insert(
                    line.id.clone(),
                    (line.time_available_daily - changeover_time).max(0.0),
                );
            }
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 估算单线换型耗时
    ///
    /// 有序对期望: Σ_{i≠j} share(i)·share(j)·resolve(line, i, j);
    /// 换型次数 = max(0, 机型数 - 1)。
    /// EXPECTED_PAIRWISE_NORMALIZED 口径再除以 (1 - HHI),
    /// 即对"确实发生机型切换"取条件期望。
    fn estimate_line_changeover(
        &self,
        line: &ProductionLine,
        assignments: &[ModelAssignment],
        resolver: &ChangeoverResolver,
    ) -> EngineResult<LineChangeoverEstimate> {
        let profile = self.analyzer.analyze(assignments);
        let mut warnings: Vec<String> = Vec::new();

        // 机型排序保证遍历顺序确定
        let mut model_ids: Vec<&String> = profile.shares.keys().collect();
        model_ids.sort();

        let mut transitions: Vec<TransitionAnalysis> = Vec::new();
        let mut weighted_sum_minutes = 0.0;
        let mut worst_case_seconds = 0.0_f64;

        for &from_id in &model_ids {
            for &to_id in &model_ids {
                if from_id == to_id {
                    continue;
                }

                let seconds = resolver.resolve(&line.id, from_id, to_id)?;
                let minutes = seconds / 60.0;
                worst_case_seconds = worst_case_seconds.max(seconds);

                let probability = profile.shares[from_id] * profile.shares[to_id];
                let contribution = probability * minutes;
                weighted_sum_minutes += contribution;

                transitions.push(TransitionAnalysis {
                    from_model_id: from_id.clone(),
                    from_model_name: self.model_name(assignments, from_id),
                    to_model_id: to_id.clone(),
                    to_model_name: self.model_name(assignments, to_id),
                    changeover_minutes: minutes,
                    probability,
                    weighted_contribution: contribution,
                    percent_of_total: 0.0,
                });
            }
        }

        let expected_minutes = match self.config.estimator {
            ChangeoverEstimator::ExpectedPairwise => weighted_sum_minutes,
            ChangeoverEstimator::ExpectedPairwiseNormalized => {
                let normalization = 1.0 - profile.hhi;
                if normalization <= 0.01 {
                    if profile.distinct_model_count >= 2 {
                        warnings
                            .push("HHI >= 0.99: 产量高度集中于单一机型,换型期望按 0 处理".to_string());
                    }
                    0.0
                } else {
                    weighted_sum_minutes / normalization
                }
            }
        };

        // 各切换占比
        let total_contribution: f64 = transitions.iter().map(|t| t.weighted_contribution).sum();
        if total_contribution > 0.0 {
            for transition in &mut transitions {
                transition.percent_of_total =
                    transition.weighted_contribution / total_contribution * 100.0;
            }
        }

        // 加权贡献降序,平手按 (from, to) 字典序保证输出稳定
        transitions.sort_by(|a, b| {
            b.weighted_contribution
                .total_cmp(&a.weighted_contribution)
                .then_with(|| a.from_model_id.cmp(&b.from_model_id))
                .then_with(|| a.to_model_id.cmp(&b.to_model_id))
        });
        transitions.truncate(self.config.top_transitions);

        let estimated_count = profile.distinct_model_count.saturating_sub(1);
        let expected_seconds = expected_minutes * 60.0;
        let time_used_changeover = estimated_count as f64 * expected_seconds;

        Ok(LineChangeoverEstimate {
            time_used_changeover,
            breakdown: ChangeoverBreakdown {
                estimator: self.config.estimator,
                estimated_changeover_count: estimated_count,
                expected_changeover_seconds: expected_seconds,
                worst_case_changeover_seconds: worst_case_seconds,
                hhi: profile.hhi,
                distinct_model_count: profile.distinct_model_count,
                top_transitions: transitions,
                warnings,
            },
        })
    }

    fn model_name(&self, assignments: &[ModelAssignment], model_id: &str) -> String {
        assignments
            .iter()
            .find(|a| a.model_id == model_id)
            .map(|a| a.model_name.clone())
            .unwrap_or_else(|| model_id.to_string())
    }

    /// 组装最终产线结果
    fn finalize(
        &self,
        lines: &[ProductionLine],
        mut outcome: AllocationOutcome,
        mut estimates: HashMap<String, LineChangeoverEstimate>,
        effective_enabled: &HashMap<String, bool>,
        iterations: u32,
        converged: bool,
    ) -> RefineOutcome {
        let mut line_results = Vec::with_capacity(lines.len());

        for line in lines {
            let assignments = outcome
                .assignments_by_line
                .remove(&line.id)
                .unwrap_or_default();
            let time_used_production = outcome
                .time_used_by_line
                .get(&line.id)
                .copied()
                .unwrap_or(0.0);

            let enabled = effective_enabled[&line.id];
            let (time_used_changeover, breakdown) = match estimates.remove(&line.id) {
                Some(mut estimate) if enabled => {
                    // 换型估算超出剩余预算 (未收敛的振荡场景) 仅告警,不粉饰数据
                    if time_used_production + estimate.time_used_changeover
                        > line.time_available_daily + 1e-6
                    {
                        estimate
                            .breakdown
                            .warnings
                            .push("换型耗时超出日剩余可用时间".to_string());
                    }
                    (estimate.time_used_changeover, Some(estimate.breakdown))
                }
                _ => (0.0, None),
            };

            let daily = line.time_available_daily;
            let utilization_production_only = if daily > 0.0 {
                time_used_production / daily * 100.0
            } else {
                0.0
            };
            let utilization_with_changeover = if daily > 0.0 {
                (time_used_production + time_used_changeover) / daily * 100.0
            } else {
                0.0
            };

            line_results.push(LineResult {
                line_id: line.id.clone(),
                line_name: line.name.clone(),
                area: line.area.clone(),
                capacity_kind: line.capacity_kind,
                time_available_daily: daily,
                time_used_production,
                time_used_changeover,
                utilization_production_only,
                utilization_with_changeover,
                changeover_impact_percent: utilization_with_changeover
                    - utilization_production_only,
                changeover_effective_enabled: enabled,
                assignments,
                changeover: breakdown,
            });
        }

        RefineOutcome {
            line_results,
            remaining_demand: outcome.remaining_demand,
            iterations,
            converged,
        }
    }
}
