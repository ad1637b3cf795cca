// ==========================================
// 产线产能规划系统 - 产线领域模型
// ==========================================
// 红线: 日可用时间 >= 0 (校验层保证)
// ==========================================

use crate::domain::types::CapacityKind;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionLine - 产线
// ==========================================
// 用途: 分配引擎的时间预算载体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLine {
    // ===== 标识 =====
    pub id: String,   // 产线ID
    pub name: String, // 产线名称
    pub area: String, // 所属区域 (如 SMT / Assembly)

    // ===== 产能参数 =====
    pub capacity_kind: CapacityKind, // 专用 / 共享
    pub time_available_daily: f64,   // 日可用时间 (秒)

    // ===== 换型开关 =====
    // 两级覆写: explicit 为 true 时取本线开关,否则跟随全局开关。
    // 这是承载产品行为的状态机,不可折叠为单一布尔值。
    pub changeover_enabled: bool,  // 本线换型开关
    pub changeover_explicit: bool, // 是否由用户显式设置
}

impl ProductionLine {
    /// 计算本线换型是否生效
    ///
    /// # 参数
    /// - `global_enabled`: 全局换型开关
    ///
    /// # 返回
    /// - explicit 时取本线开关（可强制开/强制关）
    /// - 非 explicit 时跟随全局开关
    pub fn effective_changeover_enabled(&self, global_enabled: bool) -> bool {
        if self.changeover_explicit {
            self.changeover_enabled
        } else {
            global_enabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(enabled: bool, explicit: bool) -> ProductionLine {
        ProductionLine {
            id: "L1".to_string(),
            name: "SMT-1".to_string(),
            area: "SMT".to_string(),
            capacity_kind: CapacityKind::Shared,
            time_available_daily: 28_800.0,
            changeover_enabled: enabled,
            changeover_explicit: explicit,
        }
    }

    #[test]
    fn test_effective_enabled_follows_global_when_not_explicit() {
        assert!(line(false, false).effective_changeover_enabled(true));
        assert!(!line(true, false).effective_changeover_enabled(false));
    }

    #[test]
    fn test_explicit_line_overrides_global_off() {
        // 全局关,本线显式开
        assert!(line(true, true).effective_changeover_enabled(false));
    }

    #[test]
    fn test_explicit_line_overrides_global_on() {
        // 全局开,本线显式关
        assert!(!line(false, true).effective_changeover_enabled(true));
    }
}
