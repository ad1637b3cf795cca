// ==========================================
// PlanningApi 端到端测试
// ==========================================
// 职责: 验证 API 层的校验/扇出/收拢/元数据组装
// 覆盖: 验收场景 / 幂等性 / 校验上报 / 跳过年份 / 估算口径
// ==========================================


use line_capacity_planner::api::validator::issue_codes;
use line_capacity_planner::api::{PlanningApi, PlanningError, PlanningService};
use line_capacity_planner::config::EngineConfig;
use line_capacity_planner::domain::types::{CapacityKind, ChangeoverEstimator};
use test_helpers::{changeover_enabled, line_setting, reference_snapshot, SnapshotBuilder};

// ==========================================
// 测试1: 验收场景贯穿 API
// ==========================================
#[tokio::test]
async fn test_reference_scenario_through_api() {
    let api = PlanningApi::new();
    let response = api.compute_plan(reference_snapshot()).await.unwrap();

    assert_eq!(response.metadata.input_years, vec![2024]);
    assert!(response.metadata.skipped_years.is_empty());
    assert!(response.metadata.failed_years.is_empty());
    assert!(response.metadata.validation.is_clean());

    assert_eq!(response.year_results.len(), 1);
    let year = &response.year_results[0];
    assert_eq!(year.year, 2024);

    let l2 = year.lines.iter().find(|l| l.line_id == "L2").unwrap();
    assert!((l2.utilization_with_changeover - 100.0).abs() < 1e-9);

    assert_eq!(response.overall_summary.years_processed, 1);
    assert_eq!(response.overall_summary.total_lines_analyzed, 2);
}

// ==========================================
// 测试2: 幂等性 (相同快照 => 相同年度结果)
// ==========================================
#[tokio::test]
async fn test_idempotent_year_results() {
    let api = PlanningApi::new();
    let first = api.compute_plan(reference_snapshot()).await.unwrap();
    let second = api.compute_plan(reference_snapshot()).await.unwrap();

    // 年度结果与跨年汇总逐字节一致
    let first_json = serde_json::to_string(&first.year_results).unwrap();
    let second_json = serde_json::to_string(&second.year_results).unwrap();
    assert_eq!(first_json, second_json);

    let first_overall = serde_json::to_string(&first.overall_summary).unwrap();
    let second_overall = serde_json::to_string(&second.overall_summary).unwrap();
    assert_eq!(first_overall, second_overall);

    // 元数据的时变字段不参与幂等性
    assert_ne!(first.metadata.run_id, second.metadata.run_id);
}

// ==========================================
// 测试3: 多年独立计算 + 无产量年份跳过
// ==========================================
#[tokio::test]
async fn test_multi_year_with_skipped_year() {
    let mut snapshot = reference_snapshot();
    snapshot.selected_years = vec![2025, 2024, 2030, 2024]; // 乱序 + 重复 + 无数据年
    snapshot.volumes.push(line_capacity_planner::api::dto::VolumeInput {
        model_id: "M1".to_string(),
        year: 2025,
        volume: 250_000.0,
        operations_days: 250.0,
    });

    let api = PlanningApi::new();
    let response = api.compute_plan(snapshot).await.unwrap();

    // 年度结果按年份升序,重复年份只算一次
    let years: Vec<i32> = response.year_results.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2024, 2025]);

    // 2030 无产量记录 => 跳过并记录
    assert_eq!(response.metadata.skipped_years, vec![2030]);

    // 2025 仅 M1 有量 (1000 台/日)
    let y2025 = &response.year_results[1];
    assert_eq!(y2025.summary.total_models, 1);

    // 原始年份列表原样回显
    assert_eq!(response.metadata.input_years, vec![2025, 2024, 2030, 2024]);
}

// ==========================================
// 测试4: 校验问题上报且不中断运行
// ==========================================
#[tokio::test]
async fn test_validation_issues_reported_not_fatal() {
    let mut snapshot = reference_snapshot();
    // 非法边: 节拍为 0 (绝不允许按零成本边参与分配)
    snapshot
        .compatibilities
        .push(line_capacity_planner::api::dto::CompatibilityInput {
            line_id: "L1".to_string(),
            model_id: "M2".to_string(),
            cycle_time: 0.0,
            efficiency: 100.0,
            priority: 1,
        });

    let api = PlanningApi::new();
    let response = api.compute_plan(snapshot).await.unwrap();

    let validation = &response.metadata.validation;
    assert_eq!(validation.issues.len(), 1);
    assert_eq!(validation.issues[0].code, issue_codes::INVALID_CYCLE_TIME);
    assert_eq!(validation.excluded_edges, 1);

    // 非法边被剔除: M2 仍只能走 L2,残余 320 台/日不变
    let year = &response.year_results[0];
    assert!((year.unfulfilled[0].unfulfilled_units_daily - 320.0).abs() < 1e-9);
    let l1 = year.lines.iter().find(|l| l.line_id == "L1").unwrap();
    assert!(l1.assignments.iter().all(|a| a.model_id != "M2"));
}

// ==========================================
// 测试5: 空年份列表为无效输入
// ==========================================
#[tokio::test]
async fn test_empty_selected_years_is_invalid_input() {
    let mut snapshot = reference_snapshot();
    snapshot.selected_years.clear();

    let api = PlanningApi::new();
    let err = api.compute_plan(snapshot).await.unwrap_err();
    assert!(matches!(err, PlanningError::InvalidInput(_)));
}

// ==========================================
// 测试6: 两级换型开关经 API 贯穿
// ==========================================
#[tokio::test]
async fn test_line_explicit_switch_through_api() {
    // 两条线同型负载;全局开,L2 显式关
    let mut changeover = changeover_enabled(10.0);
    changeover.line_settings = vec![line_setting("L2", false, true)];

    let snapshot = SnapshotBuilder::new()
        .line("L1", "SMT", CapacityKind::Shared, 28_800.0)
        .line("L2", "SMT", CapacityKind::Shared, 28_800.0)
        .model("A", "F1")
        .model("B", "F2")
        .volume("A", 2024, 250_000.0, 250.0) // 1000 台/日
        .volume("B", 2024, 250_000.0, 250.0)
        .compat("L1", "A", 10.0, 100.0, 1)
        .compat("L1", "B", 10.0, 100.0, 1)
        .compat("L2", "A", 10.0, 100.0, 2)
        .compat("L2", "B", 10.0, 100.0, 2)
        .changeover(changeover)
        .build();

    let api = PlanningApi::new();
    let response = api.compute_plan(snapshot).await.unwrap();
    let year = &response.year_results[0];

    let l1 = year.lines.iter().find(|l| l.line_id == "L1").unwrap();
    let l2 = year.lines.iter().find(|l| l.line_id == "L2").unwrap();

    // L1 跟随全局 (开),L2 显式关
    assert!(l1.changeover_effective_enabled);
    assert!(l1.changeover.is_some());
    assert!(!l2.changeover_effective_enabled);
    assert!(l2.changeover.is_none());
    assert_eq!(l2.time_used_changeover, 0.0);
}

// ==========================================
// 测试7: 估算口径可配置 (产品描述的两种解读)
// ==========================================
#[tokio::test]
async fn test_estimator_interpretations_differ() {
    let snapshot = || {
        SnapshotBuilder::new()
            .line("L1", "SMT", CapacityKind::Shared, 28_800.0)
            .model("A", "F1")
            .model("B", "F2")
            .volume("A", 2024, 125_000.0, 250.0) // 500 台/日
            .volume("B", 2024, 125_000.0, 250.0)
            .compat("L1", "A", 10.0, 100.0, 1)
            .compat("L1", "B", 10.0, 100.0, 2)
            .changeover(changeover_enabled(10.0))
            .build()
    };

    let pairwise = PlanningApi::new();
    let normalized = PlanningApi::with_config(EngineConfig {
        estimator: ChangeoverEstimator::ExpectedPairwiseNormalized,
        ..Default::default()
    });

    let base = pairwise.compute_plan(snapshot()).await.unwrap();
    let scaled = normalized.compute_plan(snapshot()).await.unwrap();

    let base_line = &base.year_results[0].lines[0];
    let scaled_line = &scaled.year_results[0].lines[0];

    // 均分双机型: HHI = 0.5,归一化口径期望翻倍 (300s -> 600s)
    assert!((base_line.time_used_changeover - 300.0).abs() < 1e-6);
    assert!((scaled_line.time_used_changeover - 600.0).abs() < 1e-6);

    assert_eq!(
        base_line.changeover.as_ref().unwrap().estimator,
        ChangeoverEstimator::ExpectedPairwise
    );
    assert_eq!(
        scaled_line.changeover.as_ref().unwrap().estimator,
        ChangeoverEstimator::ExpectedPairwiseNormalized
    );
}

// ==========================================
// 测试8: trait 缝可作为对象安全服务消费
// ==========================================
#[tokio::test]
async fn test_planning_service_trait_object() {
    let service: Box<dyn PlanningService> = Box::new(PlanningApi::new());
    let response = service.compute_plan(reference_snapshot()).await.unwrap();
    assert_eq!(response.year_results.len(), 1);
}

// ==========================================
// 测试9: JSON 契约往返 (camelCase 字段)
// ==========================================
#[tokio::test]
async fn test_json_contract_round_trip() {
    let json = r#"{
        "lines": [
            {"id": "L1", "name": "SMT-1", "area": "SMT",
             "capacityKind": "DEDICATED", "timeAvailableDaily": 28800},
            {"id": "L2", "name": "SMT-2", "area": "SMT",
             "capacityKind": "SHARED", "timeAvailableDaily": 28800}
        ],
        "models": [
            {"id": "M1", "name": "Model 1", "family": "F1"},
            {"id": "M2", "name": "Model 2", "family": "F2"}
        ],
        "volumes": [
            {"modelId": "M1", "year": 2024, "volume": 500000, "operationsDays": 250},
            {"modelId": "M2", "year": 2024, "volume": 800000, "operationsDays": 250}
        ],
        "compatibilities": [
            {"lineId": "L1", "modelId": "M1", "cycleTime": 10, "efficiency": 100, "priority": 1},
            {"lineId": "L2", "modelId": "M2", "cycleTime": 10, "efficiency": 100, "priority": 1}
        ],
        "selectedYears": [2024]
    }"#;

    let snapshot: line_capacity_planner::api::dto::PlanningSnapshot =
        serde_json::from_str(json).unwrap();

    let api = PlanningApi::new();
    let response = api.compute_plan(snapshot).await.unwrap();

    let output = serde_json::to_value(&response).unwrap();
    // 响应为 camelCase 契约
    assert!(output.get("yearResults").is_some());
    assert!(output.get("overallSummary").is_some());
    assert!(output["metadata"].get("executionTimeMs").is_some());

    let line = &output["yearResults"][0]["lines"][0];
    assert!(line.get("utilizationWithChangeover").is_some());
    assert!(line.get("timeUsedChangeover").is_some());
    assert_eq!(line["capacityKind"], "DEDICATED");
}
