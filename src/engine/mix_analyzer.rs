// ==========================================
// 产线产能规划系统 - 机型混合分析引擎
// ==========================================
// 职责: 单线机型份额 / HHI / 机型数统计
// 用途: 换型频次与期望时长估算的输入
// ==========================================
// HHI = Σ share² ; 1 = 单机型 (无换型可能),
// 越低表示混合越分散
// ==========================================

use crate::domain::result::ModelAssignment;
use std::collections::HashMap;

/// 单线机型混合画像
#[derive(Debug, Clone)]
pub struct MixProfile {
    /// 机型 -> 产量份额 (总分配为 0 时为空)
    pub shares: HashMap<String, f64>,

    /// Herfindahl-Hirschman 指数
    pub hhi: f64,

    /// 有分配量的机型数
    pub distinct_model_count: u32,
}

// ==========================================
// MixAnalyzer - 机型混合分析引擎
// ==========================================
pub struct MixAnalyzer {
    // 无状态引擎,不需要注入依赖
}

impl MixAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    /// 分析单线分配的机型混合
    ///
    /// # 参数
    /// - `assignments`: 该线的分配明细
    ///
    /// # 返回
    /// 份额 / HHI / 机型数。总分配为 0 时份额为空、HHI 为 0。
    pub fn analyze(&self, assignments: &[ModelAssignment]) -> MixProfile {
        // 按机型聚合分配量 (正常情况下每 (线,机型) 只有一条记录)
        let mut allocated_by_model: HashMap<String, f64> = HashMap::new();
        for assignment in assignments {
            if assignment.allocated_units_daily > 0.0 {
                *allocated_by_model
                    .entry(assignment.model_id.clone())
                    .or_insert(0.0) += assignment.allocated_units_daily;
            }
        }

        let total: f64 = allocated_by_model.values().sum();
        if total <= 0.0 {
            return MixProfile {
                shares: HashMap::new(),
                hhi: 0.0,
                distinct_model_count: 0,
            };
        }

        let shares: HashMap<String, f64> = allocated_by_model
            .iter()
            .map(|(model_id, units)| (model_id.clone(), units / total))
            .collect();

        let hhi = shares.values().map(|share| share * share).sum();

        MixProfile {
            distinct_model_count: shares.len() as u32,
            shares,
            hhi,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for MixAnalyzer {
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

    fn assignment(model_id: &str, allocated: f64) -> ModelAssignment {
        ModelAssignment {
            model_id: model_id.to_string(),
            model_name: format!("Model {}", model_id),
            allocated_units_daily: allocated,
            demand_units_daily: allocated,
            time_required_seconds: allocated * 10.0,
            cycle_time: 10.0,
            efficiency: 100.0,
            priority: 1,
            fulfillment_percent: 100.0,
        }
    }

    #[test]
    fn test_single_model_hhi_is_one() {
        let analyzer = MixAnalyzer::new();
        let profile = analyzer.analyze(&[assignment("A", 500.0)]);

        assert_eq!(profile.distinct_model_count, 1);
        assert!((profile.hhi - 1.0).abs() < 1e-12);
        assert!((profile.shares["A"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_split_hhi() {
        // 两机型均分: HHI = 0.5² + 0.5² = 0.5
        let analyzer = MixAnalyzer::new();
        let profile = analyzer.analyze(&[assignment("A", 100.0), assignment("B", 100.0)]);

        assert_eq!(profile.distinct_model_count, 2);
        assert!((profile.hhi - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_skewed_mix() {
        // 份额 0.8 / 0.2: HHI = 0.64 + 0.04 = 0.68
        let analyzer = MixAnalyzer::new();
        let profile = analyzer.analyze(&[assignment("A", 800.0), assignment("B", 200.0)]);

        assert!((profile.shares["A"] - 0.8).abs() < 1e-12);
        assert!((profile.hhi - 0.68).abs() < 1e-12);
    }

    #[test]
    fn test_empty_allocation() {
        let analyzer = MixAnalyzer::new();
        let profile = analyzer.analyze(&[]);

        assert_eq!(profile.distinct_model_count, 0);
        assert_eq!(profile.hhi, 0.0);
        assert!(profile.shares.is_empty());
    }

    #[test]
    fn test_zero_allocation_rows_ignored() {
        let analyzer = MixAnalyzer::new();
        let profile = analyzer.analyze(&[assignment("A", 0.0), assignment("B", 100.0)]);

        assert_eq!(profile.distinct_model_count, 1);
        assert!((profile.hhi - 1.0).abs() < 1e-12);
    }
}
