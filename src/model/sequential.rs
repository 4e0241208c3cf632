/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 顺序模型：有序的层描述列表 + JSON 存取
 */

use super::layer::LayerDescriptor;
use crate::errors::VizError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 模型描述的格式版本（向后兼容用）
const FORMAT_VERSION: &str = "1.0";

/// 顺序模型：按声明顺序排列的层描述列表
///
/// 层序列是可视化器的唯一输入；模型本身可与 JSON 互转，
/// 便于与其他工具交换网络结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequential {
    /// 格式版本
    pub version: String,
    /// 模型名称
    pub name: String,
    /// 层描述（按声明顺序）
    pub layers: Vec<LayerDescriptor>,
}

impl Sequential {
    pub fn new(name: &str) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            name: name.to_string(),
            layers: Vec::new(),
        }
    }

    /// 追加一层（支持链式调用）
    pub fn add(&mut self, layer: LayerDescriptor) -> &mut Self {
        self.layers.push(layer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    // ========== JSON 存取 ==========

    pub fn to_json(&self) -> Result<String, VizError> {
        serde_json::to_string_pretty(self).map_err(|e| VizError::Serde(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, VizError> {
        serde_json::from_str(json).map_err(|e| VizError::Serde(e.to_string()))
    }

    /// 保存模型描述到 JSON 文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VizError> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| VizError::Io(format!("{}: {e}", path.as_ref().display())))
    }

    /// 从 JSON 文件加载模型描述
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VizError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VizError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json(&json)
    }
}
