// ==========================================
// 产线产能规划系统 - API 层 DTO 定义
// ==========================================
// 职责: 定义输入快照与响应信封
// 序列化: camelCase (与桌面端 JSON 契约一致)
// ==========================================

use crate::domain::result::YearResult;
use crate::domain::types::CapacityKind;
use crate::api::validator::ValidationReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// 输入快照
// ==========================================

/// 规划输入快照 (由桌面端/导入管线产出)
///
/// 原始行级校验 (Excel 解析、重复检测、跨表引用) 由导入子系统负责;
/// 本引擎只做配置性校验 (非法节拍/效率/天数/机型族)。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningSnapshot {
    pub lines: Vec<LineInput>,
    pub models: Vec<ModelInput>,
    pub volumes: Vec<VolumeInput>,
    pub compatibilities: Vec<CompatibilityInput>,

    /// 规划年份 (重复项去重,逐年独立计算)
    pub selected_years: Vec<i32>,

    /// 换型配置 (缺省表示全局关闭)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeover: Option<ChangeoverInput>,
}

/// 产线输入行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInput {
    pub id: String,
    pub name: String,
    pub area: String,

    /// 专用 / 共享
    pub capacity_kind: CapacityKind,

    /// 日可用时间 (秒)
    pub time_available_daily: f64,
}

/// 机型输入行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInput {
    pub id: String,
    pub name: String,

    /// 机型族 (缺失视为配置错误,该机型剔除本次运行)
    #[serde(default)]
    pub family: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

/// 产量输入行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInput {
    pub model_id: String,
    pub year: i32,

    /// 年产量 (台)
    pub volume: f64,

    /// 年作业天数 (> 0,违规行剔除并上报)
    pub operations_days: f64,
}

/// 兼容性输入行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityInput {
    pub line_id: String,
    pub model_id: String,

    /// 节拍时间 (秒/台)
    pub cycle_time: f64,

    /// 效率 (%)
    pub efficiency: f64,

    /// 优先级 (缺省 999,排在所有显式优先级之后)
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    999
}

/// 换型配置输入
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangeoverInput {
    #[serde(default)]
    pub global_default_minutes: f64,

    #[serde(default)]
    pub global_enabled: bool,

    #[serde(default)]
    pub line_settings: Vec<LineSettingInput>,

    #[serde(default)]
    pub family_defaults: Vec<FamilyDefaultInput>,

    #[serde(default)]
    pub line_overrides: Vec<LineOverrideInput>,
}

/// 产线级换型开关输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSettingInput {
    pub line_id: String,
    pub enabled: bool,

    /// 用户显式设置标志; false 表示跟随全局开关
    #[serde(default)]
    pub explicit: bool,
}

/// 族级默认值输入 (有序,不对称)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDefaultInput {
    pub from_family: String,
    pub to_family: String,
    pub minutes: f64,
}

/// 线级覆写输入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOverrideInput {
    pub line_id: String,
    pub from_model_id: String,
    pub to_model_id: String,
    pub minutes: f64,
}

// ==========================================
// 响应信封
// ==========================================

/// 规划响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResponse {
    /// 运行元数据 (含时间戳/运行ID,不参与幂等性对比)
    pub metadata: ResponseMetadata,

    /// 年度结果 (按年份升序; 相同输入下逐字节确定)
    pub year_results: Vec<YearResult>,

    /// 跨年汇总
    pub overall_summary: OverallSummary,
}

/// 响应元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// 结果契约版本
    pub version: String,

    /// 运行ID
    pub run_id: Uuid,

    /// 完成时间戳 (ISO 8601)
    pub timestamp: String,

    /// 请求的年份 (原样回显)
    pub input_years: Vec<i32>,

    /// 无产量记录而跳过的年份
    pub skipped_years: Vec<i32>,

    /// 计算失败的年份 (完整结果或无结果,不存在部分提交)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_years: Vec<YearFailure>,

    /// 执行耗时 (毫秒)
    pub execution_time_ms: u64,

    /// 配置性校验报告
    pub validation: ValidationReport,
}

/// 年度计算失败记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearFailure {
    pub year: i32,
    pub error: String,
}

/// 跨年汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub years_processed: u32,

    /// 各年平均利用率的均值 (%)
    pub average_utilization_all_years: f64,

    pub total_lines_analyzed: u32,
}
