// ==========================================
// 产线产能规划系统 - 换型配置
// ==========================================
// 三层覆写链: 线级覆写 -> 族级默认 -> 全局默认
// 同机型切换恒为 0,不可覆写
// ==========================================

use serde::{Deserialize, Serialize};

/// 换型配置（随快照传入,缺省表示全局关闭、默认时长 0）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChangeoverSettings {
    /// 全局默认换型时长（分钟）
    #[serde(default)]
    pub global_default_minutes: f64,

    /// 全局换型开关
    #[serde(default)]
    pub global_enabled: bool,

    /// 产线级开关（enabled + explicit 两位,见 ProductionLine 注释）
    #[serde(default)]
    pub line_settings: Vec<LineChangeoverSetting>,

    /// 族级默认值（有序对,(A,B) 与 (B,A) 相互独立）
    #[serde(default)]
    pub family_defaults: Vec<FamilyChangeoverDefault>,

    /// 线级覆写（精确三元组,优先级最高）
    #[serde(default)]
    pub line_overrides: Vec<LineChangeoverOverride>,
}

/// 产线级换型开关
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineChangeoverSetting {
    pub line_id: String,
    pub enabled: bool,
    /// 用户显式设置标志（false 表示跟随全局开关）
    #[serde(default)]
    pub explicit: bool,
}

/// 族级换型默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyChangeoverDefault {
    pub from_family: String,
    pub to_family: String,
    pub minutes: f64,
}

/// 线级换型覆写
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineChangeoverOverride {
    pub line_id: String,
    pub from_model_id: String,
    pub to_model_id: String,
    pub minutes: f64,
}
