// ==========================================
// 产线产能规划系统 - 产线/机型兼容性
// ==========================================
// 红线: 节拍时间 > 0, 效率 (0, 100] (校验层保证)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CompatibilityEdge - 兼容性边
// ==========================================
// priority 越小越先分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityEdge {
    pub line_id: String,  // 产线ID
    pub model_id: String, // 机型ID

    pub cycle_time_s: f64,   // 节拍时间 (秒/台)
    pub efficiency_pct: f64, // 效率 (0, 100]
    pub priority: i32,       // 优先级 (越小越优先)
}

impl CompatibilityEdge {
    /// 计算有效节拍时间 (考虑效率/OEE)
    ///
    /// # 返回
    /// cycle_time_s / (efficiency_pct / 100)
    pub fn effective_cycle_time(&self) -> f64 {
        self.cycle_time_s / (self.efficiency_pct / 100.0)
    }

    /// 校验参数是否合法
    pub fn is_valid(&self) -> bool {
        self.cycle_time_s > 0.0 && self.efficiency_pct > 0.0 && self.efficiency_pct <= 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(cycle: f64, eff: f64) -> CompatibilityEdge {
        CompatibilityEdge {
            line_id: "L1".to_string(),
            model_id: "M1".to_string(),
            cycle_time_s: cycle,
            efficiency_pct: eff,
            priority: 1,
        }
    }

    #[test]
    fn test_effective_cycle_time() {
        // 300s @ 85% => 352.94s
        let e = edge(300.0, 85.0);
        assert!((e.effective_cycle_time() - 352.941176).abs() < 1e-4);

        // 100% 效率不改变节拍
        let e = edge(10.0, 100.0);
        assert_eq!(e.effective_cycle_time(), 10.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(edge(10.0, 85.0).is_valid());
        assert!(!edge(0.0, 85.0).is_valid());
        assert!(!edge(10.0, 0.0).is_valid());
        assert!(!edge(10.0, 120.0).is_valid());
        assert!(!edge(-5.0, 85.0).is_valid());
    }
}
