// ==========================================
// 产线产能规划系统 - 机型领域模型
// ==========================================
// 红线: 作业天数 > 0 (校验层保证,违规行剔除并上报)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductModel - 机型
// ==========================================
// family 用于换型时间的族级默认值解析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductModel {
    pub id: String,   // 机型ID
    pub name: String, // 机型名称
    pub family: String, // 机型族

    // 透传字段: 引擎不消费,保留给报表侧
    #[serde(default)]
    pub customer: Option<String>, // 客户
    #[serde(default)]
    pub program: Option<String>, // 项目
}

// ==========================================
// VolumeRecord - 年度产量记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub model_id: String,   // 机型ID
    pub year: i32,          // 规划年份
    pub annual_units: f64,  // 年产量 (台)
    pub operations_days: f64, // 年作业天数
}

impl VolumeRecord {
    /// 计算日需求 (台/日)
    ///
    /// # 返回
    /// 年产量 / 作业天数。作业天数 <= 0 的记录在校验层已剔除,
    /// 此处仅作兜底返回 0。
    pub fn daily_demand(&self) -> f64 {
        if self.operations_days > 0.0 {
            self.annual_units / self.operations_days
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_demand() {
        let record = VolumeRecord {
            model_id: "M1".to_string(),
            year: 2024,
            annual_units: 10_000.0,
            operations_days: 250.0,
        };
        assert_eq!(record.daily_demand(), 40.0);
    }

    #[test]
    fn test_daily_demand_guards_zero_days() {
        let record = VolumeRecord {
            model_id: "M1".to_string(),
            year: 2024,
            annual_units: 10_000.0,
            operations_days: 0.0,
        };
        assert_eq!(record.daily_demand(), 0.0);
    }
}
