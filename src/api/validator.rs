// ==========================================
// 产线产能规划系统 - 快照校验器
// ==========================================
// 职责: 配置性校验 (分配前拦截),逐行上报并剔除违规行
// 红线: 校验失败不中断整次运行;被剔除的行必须带原因上报
// 说明: 原始行级校验 (Excel 解析/重复/跨表引用) 由导入子系统负责
// ==========================================

use crate::api::dto::{ChangeoverInput, PlanningSnapshot};
use crate::domain::changeover::{
    ChangeoverSettings, FamilyChangeoverDefault, LineChangeoverOverride, LineChangeoverSetting,
};
use crate::domain::compatibility::CompatibilityEdge;
use crate::domain::line::ProductionLine;
use crate::domain::model::{ProductModel, VolumeRecord};
use crate::engine::orchestrator::PlanningInput;
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ==========================================
// 校验问题编码
// ==========================================

/// 稳定的问题编码 (UI 据此本地化/聚合)
pub mod issue_codes {
    pub const INVALID_CYCLE_TIME: &str = "INVALID_CYCLE_TIME";
    pub const INVALID_EFFICIENCY: &str = "INVALID_EFFICIENCY";
    pub const INVALID_OPERATIONS_DAYS: &str = "INVALID_OPERATIONS_DAYS";
    pub const NEGATIVE_LINE_TIME: &str = "NEGATIVE_LINE_TIME";
    pub const MISSING_FAMILY: &str = "MISSING_FAMILY";
    pub const DUPLICATE_LINE_SETTING: &str = "DUPLICATE_LINE_SETTING";
}

// ==========================================
// 校验报告
// ==========================================

/// 单条校验问题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// 问题编码 (稳定,供程序消费)
    pub code: String,

    /// 实体类型 (line / model / volume / compatibility / changeover)
    pub entity: String,

    /// 实体标识
    pub entity_id: String,

    /// 人类可读消息 (按当前 locale 产出)
    pub message: String,
}

/// 校验报告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub excluded_lines: u32,
    pub excluded_models: u32,
    pub excluded_volumes: u32,
    pub excluded_edges: u32,
}

impl ValidationReport {
    /// 是否零问题
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ==========================================
// SnapshotValidator - 快照校验器
// ==========================================

pub struct SnapshotValidator {
    // 无状态,不需要注入依赖
}

impl SnapshotValidator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 校验快照并构建引擎输入
    ///
    /// 违规行剔除并记入报告,其余数据照常参与本次运行。
    ///
    /// # 返回
    /// (校验后的引擎输入, 校验报告)
    pub fn validate(&self, snapshot: &PlanningSnapshot) -> (PlanningInput, ValidationReport) {
        let mut report = ValidationReport::default();

        // ==========================================
        // 1. 产线: 日可用时间 >= 0
        // ==========================================
        let changeover_input = snapshot.changeover.clone().unwrap_or_default();
        let line_flags = self.collect_line_flags(&changeover_input, &mut report);

        let mut lines: Vec<ProductionLine> = Vec::new();
        for line in &snapshot.lines {
            if line.time_available_daily < 0.0 {
                report.issues.push(ValidationIssue {
                    code: issue_codes::NEGATIVE_LINE_TIME.to_string(),
                    entity: "line".to_string(),
                    entity_id: line.id.clone(),
                    message: t_with_args("validation.negative_line_time", &[("line", &line.name)]),
                });
                report.excluded_lines += 1;
                continue;
            }

            let (enabled, explicit) = line_flags.get(&line.id).copied().unwrap_or((false, false));
            lines.push(ProductionLine {
                id: line.id.clone(),
                name: line.name.clone(),
                area: line.area.clone(),
                capacity_kind: line.capacity_kind,
                time_available_daily: line.time_available_daily,
                changeover_enabled: enabled,
                changeover_explicit: explicit,
            });
        }

        // ==========================================
        // 2. 机型: 机型族必填 (换型解析依赖)
        // ==========================================
        let mut models: Vec<ProductModel> = Vec::new();
        for model in &snapshot.models {
            if model.family.trim().is_empty() {
                report.issues.push(ValidationIssue {
                    code: issue_codes::MISSING_FAMILY.to_string(),
                    entity: "model".to_string(),
                    entity_id: model.id.clone(),
                    message: t_with_args("validation.missing_family", &[("model", &model.name)]),
                });
                report.excluded_models += 1;
                continue;
            }

            models.push(ProductModel {
                id: model.id.clone(),
                name: model.name.clone(),
                family: model.family.clone(),
                customer: model.customer.clone(),
                program: model.program.clone(),
            });
        }
        let valid_models: HashSet<&str> = models.iter().map(|m| m.id.as_str()).collect();

        // ==========================================
        // 3. 产量: 作业天数 > 0
        // ==========================================
        let mut volumes: Vec<VolumeRecord> = Vec::new();
        for volume in &snapshot.volumes {
            if volume.operations_days <= 0.0 {
                report.issues.push(ValidationIssue {
                    code: issue_codes::INVALID_OPERATIONS_DAYS.to_string(),
                    entity: "volume".to_string(),
                    entity_id: format!("{}@{}", volume.model_id, volume.year),
                    message: t_with_args(
                        "validation.invalid_operations_days",
                        &[
                            ("model", &volume.model_id),
                            ("year", &volume.year.to_string()),
                        ],
                    ),
                });
                report.excluded_volumes += 1;
                continue;
            }

            volumes.push(VolumeRecord {
                model_id: volume.model_id.clone(),
                year: volume.year,
                annual_units: volume.volume,
                operations_days: volume.operations_days,
            });
        }

        // ==========================================
        // 4. 兼容性: 节拍 > 0, 效率 (0, 100]
        //    非法边绝不进入分配 (不会被当作零成本边处理)
        // ==========================================
        let mut edges: Vec<CompatibilityEdge> = Vec::new();
        for compat in &snapshot.compatibilities {
            let entity_id = format!("{}->{}", compat.line_id, compat.model_id);

            if compat.cycle_time <= 0.0 {
                report.issues.push(ValidationIssue {
                    code: issue_codes::INVALID_CYCLE_TIME.to_string(),
                    entity: "compatibility".to_string(),
                    entity_id,
                    message: t_with_args(
                        "validation.invalid_cycle_time",
                        &[("line", &compat.line_id), ("model", &compat.model_id)],
                    ),
                });
                report.excluded_edges += 1;
                continue;
            }

            if compat.efficiency <= 0.0 || compat.efficiency > 100.0 {
                report.issues.push(ValidationIssue {
                    code: issue_codes::INVALID_EFFICIENCY.to_string(),
                    entity: "compatibility".to_string(),
                    entity_id,
                    message: t_with_args(
                        "validation.invalid_efficiency",
                        &[("line", &compat.line_id), ("model", &compat.model_id)],
                    ),
                });
                report.excluded_edges += 1;
                continue;
            }

            // 指向被剔除机型的边一并失效 (机型级问题已上报,不重复计数)
            if !valid_models.contains(compat.model_id.as_str())
                && snapshot.models.iter().any(|m| m.id == compat.model_id)
            {
                continue;
            }

            edges.push(CompatibilityEdge {
                line_id: compat.line_id.clone(),
                model_id: compat.model_id.clone(),
                cycle_time_s: compat.cycle_time,
                efficiency_pct: compat.efficiency,
                priority: compat.priority,
            });
        }

        if !report.is_clean() {
            warn!(
                issues = report.issues.len(),
                excluded_edges = report.excluded_edges,
                excluded_models = report.excluded_models,
                "快照存在配置性问题,违规行已剔除"
            );
        }

        let input = PlanningInput {
            lines,
            models,
            volumes,
            edges,
            changeover: self.build_changeover_settings(&changeover_input),
        };
        (input, report)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 归集产线级换型开关 (重复定义首条生效并上报)
    fn collect_line_flags(
        &self,
        input: &ChangeoverInput,
        report: &mut ValidationReport,
    ) -> HashMap<String, (bool, bool)> {
        let mut flags: HashMap<String, (bool, bool)> = HashMap::new();
        for setting in &input.line_settings {
            if flags.contains_key(&setting.line_id) {
                report.issues.push(ValidationIssue {
                    code: issue_codes::DUPLICATE_LINE_SETTING.to_string(),
                    entity: "changeover".to_string(),
                    entity_id: setting.line_id.clone(),
                    message: t_with_args(
                        "validation.duplicate_line_setting",
                        &[("line", &setting.line_id)],
                    ),
                });
                continue;
            }
            flags.insert(setting.line_id.clone(), (setting.enabled, setting.explicit));
        }
        flags
    }

    /// DTO -> 领域换型配置
    fn build_changeover_settings(&self, input: &ChangeoverInput) -> ChangeoverSettings {
        ChangeoverSettings {
            global_default_minutes: input.global_default_minutes,
            global_enabled: input.global_enabled,
            line_settings: input
                .line_settings
                .iter()
                .map(|s| LineChangeoverSetting {
                    line_id: s.line_id.clone(),
                    enabled: s.enabled,
                    explicit: s.explicit,
                })
                .collect(),
            family_defaults: input
                .family_defaults
                .iter()
                .map(|d| FamilyChangeoverDefault {
                    from_family: d.from_family.clone(),
                    to_family: d.to_family.clone(),
                    minutes: d.minutes,
                })
                .collect(),
            line_overrides: input
                .line_overrides
                .iter()
                .map(|o| LineChangeoverOverride {
                    line_id: o.line_id.clone(),
                    from_model_id: o.from_model_id.clone(),
                    to_model_id: o.to_model_id.clone(),
                    minutes: o.minutes,
                })
                .collect(),
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for SnapshotValidator {
    fn default() -> Self {
        Self::new()
    }
}
