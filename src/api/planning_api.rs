// ==========================================
// 产线产能规划系统 - 规划 API
// ==========================================
// 职责: 校验 -> 按年扇出计算 -> 收拢 -> 组装响应
// 红线: 年与年之间无共享可变状态;结果写入各自年份槽位后合并
//       (fan-out/fan-in,无内部锁)
// ==========================================

use crate::api::dto::{
    OverallSummary, PlanningResponse, PlanningSnapshot, ResponseMetadata, YearFailure,
};
use crate::api::error::{PlanningError, PlanningResult};
use crate::api::planning_service::PlanningService;
use crate::api::validator::SnapshotValidator;
use crate::config::EngineConfig;
use crate::domain::result::YearResult;
use crate::engine::orchestrator::{PlanOrchestrator, PlanningInput};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// PlanningApi - 规划 API
// ==========================================

pub struct PlanningApi {
    config: EngineConfig,
}

impl PlanningApi {
    /// 以默认配置创建
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// 以指定配置创建
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行完整规划计算
    ///
    /// 流程:
    /// 1) 快照校验 (违规行剔除并上报);
    /// 2) 每个年份一个 spawn_blocking 任务 (年度计算为纯同步);
    /// 3) 收拢结果,按年份升序组装;
    /// 4) 元数据 (运行ID/耗时/跳过年份/校验报告)。
    ///
    /// 幂等性: 相同快照下 year_results / overall_summary 逐字节一致,
    /// 仅 metadata 携带时变字段。
    #[instrument(skip_all, fields(
        lines_count = snapshot.lines.len(),
        models_count = snapshot.models.len(),
        years = ?snapshot.selected_years
    ))]
    pub async fn compute_plan(
        &self,
        snapshot: PlanningSnapshot,
    ) -> PlanningResult<PlanningResponse> {
        let started = Instant::now();

        if snapshot.selected_years.is_empty() {
            return Err(PlanningError::InvalidInput(
                "selectedYears 为空,至少指定一个规划年份".to_string(),
            ));
        }

        // ==========================================
        // 步骤1: 快照校验
        // ==========================================
        let validator = SnapshotValidator::new();
        let (input, validation) = validator.validate(&snapshot);
        let input = Arc::new(input);

        info!(
            lines = input.lines.len(),
            models = input.models.len(),
            edges = input.edges.len(),
            issues = validation.issues.len(),
            "快照校验完成"
        );

        // 年份去重升序; 原始列表原样回显到 metadata
        let mut years: Vec<i32> = snapshot.selected_years.clone();
        years.sort_unstable();
        years.dedup();

        // ==========================================
        // 步骤2: 按年扇出 (年度计算相互独立)
        // ==========================================
        let handles: Vec<(i32, JoinHandle<_>)> = years
            .iter()
            .map(|&year| {
                let input = Arc::clone(&input);
                let config = self.config.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    let orchestrator = PlanOrchestrator::new(config);
                    orchestrator.compute_year(&input, year)
                });
                (year, handle)
            })
            .collect();

        // ==========================================
        // 步骤3: 收拢 (fan-in)
        // ==========================================
        let mut year_results: Vec<YearResult> = Vec::new();
        let mut skipped_years: Vec<i32> = Vec::new();
        let mut failed_years: Vec<YearFailure> = Vec::new();

        for (year, handle) in handles {
            match handle.await {
                Ok(Ok(Some(result))) => year_results.push(result),
                Ok(Ok(None)) => skipped_years.push(year),
                // 单年失败只记录,不拖垮其余年份 (无部分提交)
                Ok(Err(engine_err)) => {
                    warn!(year, error = %engine_err, "年度计算失败");
                    failed_years.push(YearFailure {
                        year,
                        error: engine_err.to_string(),
                    });
                }
                Err(join_err) => {
                    return Err(PlanningError::TaskJoin(join_err.to_string()));
                }
            }
        }

        year_results.sort_by_key(|result| result.year);

        // ==========================================
        // 步骤4: 组装响应
        // ==========================================
        let overall_summary = Self::build_overall_summary(&year_results, input.lines.len());

        let execution_time_ms = started.elapsed().as_millis() as u64;
        info!(
            years_processed = year_results.len(),
            skipped = skipped_years.len(),
            execution_time_ms,
            "规划计算完成"
        );

        Ok(PlanningResponse {
            metadata: ResponseMetadata {
                version: crate::RESULT_CONTRACT_VERSION.to_string(),
                run_id: Uuid::new_v4(),
                timestamp: Utc::now().to_rfc3339(),
                input_years: snapshot.selected_years.clone(),
                skipped_years,
                failed_years,
                execution_time_ms,
                validation,
            },
            year_results,
            overall_summary,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 跨年汇总
    fn build_overall_summary(year_results: &[YearResult], total_lines: usize) -> OverallSummary {
        let average = if year_results.is_empty() {
            0.0
        } else {
            year_results
                .iter()
                .map(|result| result.summary.average_utilization)
                .sum::<f64>()
                / year_results.len() as f64
        };

        OverallSummary {
            years_processed: year_results.len() as u32,
            average_utilization_all_years: average,
            total_lines_analyzed: total_lines as u32,
        }
    }

    /// 引擎输入构建 (供需要自行调度的调用方使用)
    pub fn build_input(
        &self,
        snapshot: &PlanningSnapshot,
    ) -> (PlanningInput, crate::api::validator::ValidationReport) {
        SnapshotValidator::new().validate(snapshot)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PlanningApi {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// PlanningService trait 实现
// ==========================================
#[async_trait]
impl PlanningService for PlanningApi {
    async fn compute_plan(&self, snapshot: PlanningSnapshot) -> PlanningResult<PlanningResponse> {
        PlanningApi::compute_plan(self, snapshot).await
    }
}
