// ==========================================
// 产线产能规划系统 - 规划服务接口
// ==========================================
// 职责: 供桌面端/进程外调用方消费的 trait 缝
// 说明: 进程内直接调用 PlanningApi;请求/响应式部署时
//       由适配层实现本 trait 并转发
// ==========================================

use crate::api::dto::{PlanningResponse, PlanningSnapshot};
use crate::api::error::PlanningResult;
use async_trait::async_trait;

/// 规划服务接口
#[async_trait]
pub trait PlanningService: Send + Sync {
    /// 对输入快照执行完整规划计算
    ///
    /// # 参数
    /// - `snapshot`: 不可变输入快照
    ///
    /// # 返回
    /// 完整响应 (逐年结果 + 跨年汇总 + 元数据)
    async fn compute_plan(&self, snapshot: PlanningSnapshot) -> PlanningResult<PlanningResponse>;
}
