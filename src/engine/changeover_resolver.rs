// ==========================================
// 产线产能规划系统 - 换型时间解析引擎
// ==========================================
// 红线: 覆写链严格首个命中生效,不做平均/混合;
//       同机型切换恒为 0,不可覆写
// ==========================================
// 解析顺序: 线级覆写 (line, from, to)
//        -> 族级默认 (from_family, to_family, 有序)
//        -> 全局默认
// ==========================================

use crate::domain::changeover::ChangeoverSettings;
use crate::domain::model::ProductModel;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashMap;

// ==========================================
// ChangeoverResolver - 换型时间解析引擎
// ==========================================
// 每次运行从快照构建一次,查询表只读
pub struct ChangeoverResolver {
    /// 全局默认换型时长 (秒)
    global_default_s: f64,

    /// 族级默认值 (有序对 -> 秒)
    family_defaults: HashMap<(String, String), f64>,

    /// 线级覆写 (精确三元组 -> 秒)
    line_overrides: HashMap<(String, String, String), f64>,

    /// 机型 -> 机型族
    families: HashMap<String, String>,
}

impl ChangeoverResolver {
    /// 从换型配置与机型清单构建解析器
    ///
    /// # 参数
    /// - `settings`: 换型配置 (分钟口径,此处统一换算为秒)
    /// - `models`: 机型清单 (提供机型族映射)
    pub fn new(settings: &ChangeoverSettings, models: &[ProductModel]) -> Self {
        let family_defaults = settings
            .family_defaults
            .iter()
            .map(|d| {
                (
                    (d.from_family.clone(), d.to_family.clone()),
                    d.minutes * 60.0,
                )
            })
            .collect();

        let line_overrides = settings
            .line_overrides
            .iter()
            .map(|o| {
                (
                    (
                        o.line_id.clone(),
                        o.from_model_id.clone(),
                        o.to_model_id.clone(),
                    ),
                    o.minutes * 60.0,
                )
            })
            .collect();

        let families = models
            .iter()
            .map(|m| (m.id.clone(), m.family.clone()))
            .collect();

        Self {
            global_default_s: settings.global_default_minutes * 60.0,
            family_defaults,
            line_overrides,
            families,
        }
    }

    /// 解析一次有序切换的换型时间 (秒)
    ///
    /// # 参数
    /// - `line_id`: 产线ID
    /// - `from_model_id`: 切出机型
    /// - `to_model_id`: 切入机型
    ///
    /// # 返回
    /// - 同机型恒为 0
    /// - 否则按 线级覆写 -> 族级默认 -> 全局默认 首个命中返回
    ///
    /// # 错误
    /// 机型族缺失为配置错误 (校验层已剔除此类机型,此处为兜底)
    pub fn resolve(
        &self,
        line_id: &str,
        from_model_id: &str,
        to_model_id: &str,
    ) -> EngineResult<f64> {
        // 同机型切换无换型
        if from_model_id == to_model_id {
            return Ok(0.0);
        }

        // 1. 线级覆写 (精确三元组)
        let key = (
            line_id.to_string(),
            from_model_id.to_string(),
            to_model_id.to_string(),
        );
        if let Some(&seconds) = self.line_overrides.get(&key) {
            return Ok(seconds);
        }

        // 2. 族级默认 (有序对,不对称)
        let from_family = self.family_of(from_model_id)?;
        let to_family = self.family_of(to_model_id)?;
        let key = (from_family.to_string(), to_family.to_string());
        if let Some(&seconds) = self.family_defaults.get(&key) {
            return Ok(seconds);
        }

        // 3. 全局默认
        Ok(self.global_default_s)
    }

    /// 查询机型族
    fn family_of(&self, model_id: &str) -> EngineResult<&str> {
        let family = self
            .families
            .get(model_id)
            .ok_or_else(|| EngineError::UnknownModel {
                model_id: model_id.to_string(),
            })?;

        if family.is_empty() {
            return Err(EngineError::MissingFamily {
                model_id: model_id.to_string(),
            });
        }
        Ok(family)
    }
}
