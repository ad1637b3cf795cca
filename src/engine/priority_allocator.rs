// ==========================================
// 产线产能规划系统 - 优先级分配引擎
// ==========================================
// 红线: 单次贪心,优先级顺序即分配策略,不做迭代再平衡;
//       需求是硬上限,任何机型的跨线分配之和不超过区域需求
// ==========================================
// 职责: 消耗区域需求与产线时间预算,产出分配与残余需求
// 输入: 区域内兼容性边 + 区域日需求 + 产线可用时间
// 输出: 按线分组的分配明细 + 机型残余需求
// ==========================================

use crate::domain::compatibility::CompatibilityEdge;
use crate::domain::result::ModelAssignment;
use std::collections::HashMap;
use tracing::instrument;

/// 单区域分配结果
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// 产线 -> 分配明细 (按分配顺序)
    pub assignments_by_line: HashMap<String, Vec<ModelAssignment>>,

    /// 产线 -> 生产耗时 (秒)
    pub time_used_by_line: HashMap<String, f64>,

    /// 机型 -> 残余需求 (台/日); > 0 即为该区域未满足
    pub remaining_demand: HashMap<String, f64>,
}

// ==========================================
// PriorityAllocator - 优先级分配引擎
// ==========================================
pub struct PriorityAllocator {
    // 无状态引擎,不需要注入依赖
}

impl PriorityAllocator {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行单区域的优先级贪心分配
    ///
    /// 算法:
    /// 1) 边按 (priority, line_id, model_id) 升序排序,保证完全确定;
    /// 2) 逐边取 candidate = min(剩余需求, 剩余时间 / 有效节拍);
    /// 3) candidate > 0 时记录分配并同步扣减需求与时间。
    ///
    /// # 参数
    /// - `edges`: 本区域的兼容性边 (校验层已剔除非法边)
    /// - `demand`: 机型 -> 区域日需求
    /// - `available_time`: 产线 -> 可用时间 (秒)
    /// - `model_names`: 机型名称映射 (输出明细用)
    ///
    /// # 返回
    /// 分配明细与残余需求
    #[instrument(skip_all, fields(edges_count = edges.len(), models_count = demand.len()))]
    pub fn allocate(
        &self,
        edges: &[CompatibilityEdge],
        demand: &HashMap<String, f64>,
        available_time: &HashMap<String, f64>,
        model_names: &HashMap<String, String>,
    ) -> AllocationOutcome {
        // 1. 排序: priority 升序,同优先级按 (line_id, model_id) 字典序
        let mut sorted_edges: Vec<&CompatibilityEdge> = edges
            .iter()
            .filter(|edge| demand.contains_key(&edge.model_id))
            .collect();
        sorted_edges.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.line_id.cmp(&b.line_id))
                .then_with(|| a.model_id.cmp(&b.model_id))
        });

        // 2. 初始化剩余量
        let mut remaining_demand = demand.clone();
        let mut remaining_time: HashMap<String, f64> = available_time.clone();

        let mut assignments_by_line: HashMap<String, Vec<ModelAssignment>> = HashMap::new();
        let mut time_used_by_line: HashMap<String, f64> = HashMap::new();

        // 3. 逐边贪心
        for edge in sorted_edges {
            let model_demand = remaining_demand.get(&edge.model_id).copied().unwrap_or(0.0);
            if model_demand <= 0.0 {
                continue;
            }

            let line_time = remaining_time.get(&edge.line_id).copied().unwrap_or(0.0);
            if line_time <= 0.0 {
                continue;
            }

            let effective_cycle_time = edge.effective_cycle_time();
            let max_units = line_time / effective_cycle_time;
            let allocated_units = max_units.min(model_demand);

            if allocated_units <= 0.0 {
                continue;
            }

            let time_used = allocated_units * effective_cycle_time;
            let fulfillment = if model_demand > 0.0 {
                allocated_units / model_demand * 100.0
            } else {
                100.0
            };

            assignments_by_line
                .entry(edge.line_id.clone())
                .or_default()
                .push(ModelAssignment {
                    model_id: edge.model_id.clone(),
                    model_name: model_names
                        .get(&edge.model_id)
                        .cloned()
                        .unwrap_or_else(|| edge.model_id.clone()),
                    allocated_units_daily: allocated_units,
                    demand_units_daily: model_demand,
                    time_required_seconds: time_used,
                    cycle_time: edge.cycle_time_s,
                    efficiency: edge.efficiency_pct,
                    priority: edge.priority,
                    fulfillment_percent: fulfillment,
                });

            if let Some(model_remaining) = remaining_demand.get_mut(&edge.model_id) {
                *model_remaining -= allocated_units;
            }
            if let Some(line_remaining) = remaining_time.get_mut(&edge.line_id) {
                *line_remaining -= time_used;
            }
            *time_used_by_line.entry(edge.line_id.clone()).or_insert(0.0) += time_used;
        }

        AllocationOutcome {
            assignments_by_line,
            time_used_by_line,
            remaining_demand,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PriorityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn edge(line: &str, model: &str, cycle: f64, eff: f64, priority: i32) -> CompatibilityEdge {
        CompatibilityEdge {
            line_id: line.to_string(),
            model_id: model.to_string(),
            cycle_time_s: cycle,
            efficiency_pct: eff,
            priority,
        }
    }

    fn names(ids: &[&str]) -> HashMap<String, String> {
        ids.iter()
            .map(|id| (id.to_string(), format!("Model {}", id)))
            .collect()
    }

    fn map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    // ==========================================
    // 基础功能测试
    // ==========================================

    #[test]
    fn test_single_edge_full_fulfillment() {
        // 需求 2000 台 @ 10s/100%: 耗时 20000s < 28800s,全部满足
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[edge("L1", "M1", 10.0, 100.0, 1)],
            &map(&[("M1", 2000.0)]),
            &map(&[("L1", 28_800.0)]),
            &names(&["M1"]),
        );

        let assignments = &outcome.assignments_by_line["L1"];
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].allocated_units_daily, 2000.0);
        assert_eq!(assignments[0].time_required_seconds, 20_000.0);
        assert_eq!(assignments[0].fulfillment_percent, 100.0);
        assert_eq!(outcome.remaining_demand["M1"], 0.0);
    }

    #[test]
    fn test_time_capped_allocation() {
        // 需求 3200 台 @ 10s: 仅能产出 2880 台,残余 320
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[edge("L2", "M2", 10.0, 100.0, 1)],
            &map(&[("M2", 3200.0)]),
            &map(&[("L2", 28_800.0)]),
            &names(&["M2"]),
        );

        let assignments = &outcome.assignments_by_line["L2"];
        assert_eq!(assignments[0].allocated_units_daily, 2880.0);
        assert!((outcome.remaining_demand["M2"] - 320.0).abs() < 1e-9);
        assert!((outcome.time_used_by_line["L2"] - 28_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_inflates_cycle_time() {
        // 50% 效率使有效节拍翻倍
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[edge("L1", "M1", 10.0, 50.0, 1)],
            &map(&[("M1", 10_000.0)]),
            &map(&[("L1", 28_800.0)]),
            &names(&["M1"]),
        );

        assert_eq!(
            outcome.assignments_by_line["L1"][0].allocated_units_daily,
            1440.0
        );
    }

    #[test]
    fn test_priority_order_wins_over_lexical() {
        // M2 优先级 1 先占满产线,M1 优先级 2 颗粒无收
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[
                edge("L1", "M1", 10.0, 100.0, 2),
                edge("L1", "M2", 10.0, 100.0, 1),
            ],
            &map(&[("M1", 5000.0), ("M2", 5000.0)]),
            &map(&[("L1", 28_800.0)]),
            &names(&["M1", "M2"]),
        );

        let assignments = &outcome.assignments_by_line["L1"];
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].model_id, "M2");
        assert_eq!(outcome.remaining_demand["M1"], 5000.0);
    }

    #[test]
    fn test_priority_monotonicity() {
        // 低优先级数字的边在高优先级数字的边仍有需求时绝不挨饿:
        // M1 (priority 1) 先吃满需求,剩余时间才轮到 M2 (priority 2)
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[
                edge("L1", "M2", 10.0, 100.0, 2),
                edge("L1", "M1", 10.0, 100.0, 1),
            ],
            &map(&[("M1", 1000.0), ("M2", 5000.0)]),
            &map(&[("L1", 28_800.0)]),
            &names(&["M1", "M2"]),
        );

        let assignments = &outcome.assignments_by_line["L1"];
        assert_eq!(assignments[0].model_id, "M1");
        assert_eq!(assignments[0].allocated_units_daily, 1000.0);
        // M2 分得剩余 18800s => 1880 台
        assert_eq!(assignments[1].model_id, "M2");
        assert!((assignments[1].allocated_units_daily - 1880.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_is_lexical_and_deterministic() {
        // 同优先级: (line_id, model_id) 字典序决定处理顺序
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[
                edge("L2", "M1", 10.0, 100.0, 1),
                edge("L1", "M1", 10.0, 100.0, 1),
            ],
            &map(&[("M1", 2000.0)]),
            &map(&[("L1", 28_800.0), ("L2", 28_800.0)]),
            &names(&["M1"]),
        );

        // L1 在字典序上先处理,2000 台全部落在 L1
        assert_eq!(
            outcome.assignments_by_line["L1"][0].allocated_units_daily,
            2000.0
        );
        assert!(!outcome.assignments_by_line.contains_key("L2"));
    }

    #[test]
    fn test_model_spills_across_lines() {
        // 需求超过单线产能时按序溢出到下一条线
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[
                edge("L1", "M1", 10.0, 100.0, 1),
                edge("L2", "M1", 10.0, 100.0, 2),
            ],
            &map(&[("M1", 4000.0)]),
            &map(&[("L1", 28_800.0), ("L2", 28_800.0)]),
            &names(&["M1"]),
        );

        assert_eq!(
            outcome.assignments_by_line["L1"][0].allocated_units_daily,
            2880.0
        );
        assert!(
            (outcome.assignments_by_line["L2"][0].allocated_units_daily - 1120.0).abs() < 1e-9
        );
        assert!(outcome.remaining_demand["M1"].abs() < 1e-9);
    }

    #[test]
    fn test_demand_cap_invariant() {
        // 跨线分配之和不超过区域需求
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[
                edge("L1", "M1", 1.0, 100.0, 1),
                edge("L2", "M1", 1.0, 100.0, 1),
                edge("L3", "M1", 1.0, 100.0, 2),
            ],
            &map(&[("M1", 1000.0)]),
            &map(&[("L1", 28_800.0), ("L2", 28_800.0), ("L3", 28_800.0)]),
            &names(&["M1"]),
        );

        let total: f64 = outcome
            .assignments_by_line
            .values()
            .flatten()
            .map(|a| a.allocated_units_daily)
            .sum();
        assert!((total - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_model_without_demand_entry_skipped() {
        // 无产量记录的机型不参与分配
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[edge("L1", "M9", 10.0, 100.0, 1)],
            &map(&[]),
            &map(&[("L1", 28_800.0)]),
            &names(&[]),
        );

        assert!(outcome.assignments_by_line.is_empty());
        assert!(outcome.remaining_demand.is_empty());
    }

    #[test]
    fn test_zero_available_time() {
        let allocator = PriorityAllocator::new();
        let outcome = allocator.allocate(
            &[edge("L1", "M1", 10.0, 100.0, 1)],
            &map(&[("M1", 100.0)]),
            &map(&[("L1", 0.0)]),
            &names(&["M1"]),
        );

        assert!(outcome.assignments_by_line.is_empty());
        assert_eq!(outcome.remaining_demand["M1"], 100.0);
    }
}
