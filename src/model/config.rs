/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 层配置映射（kernel_size、pool_size、activation 等键值参数）
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 常用配置键
pub mod keys {
    pub const KERNEL_SIZE: &str = "kernel_size";
    pub const POOL_SIZE: &str = "pool_size";
    pub const ACTIVATION: &str = "activation";
    pub const FILTERS: &str = "filters";
    pub const DEPTH_MULTIPLIER: &str = "depth_multiplier";
}

/// 层配置项的值
///
/// 整数（filters、depth_multiplier）、整数对（kernel_size、pool_size）
/// 或文本（activation）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(usize),
    Pair(usize, usize),
    Text(String),
}

/// 层配置映射
///
/// 使用 BTreeMap 保证序列化顺序稳定（同一模型两次渲染/导出结果一致）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerConfig(BTreeMap<String, ConfigValue>);

impl LayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.0.insert(key.to_string(), value);
    }

    /// 链式构建用
    pub fn with(mut self, key: &str, value: ConfigValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get_int(&self, key: &str) -> Option<usize> {
        match self.0.get(key) {
            Some(ConfigValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_pair(&self, key: &str) -> Option<(usize, usize)> {
        match self.0.get(key) {
            Some(ConfigValue::Pair(a, b)) => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ConfigValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}
