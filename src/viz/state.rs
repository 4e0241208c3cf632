/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 单次渲染调用的瞬态状态（分类遍历的结果）
 */

use super::category::{classify, LayerCategory};
use crate::errors::VizError;
use crate::model::{LayerDescriptor, LayerKind};

/// 单个隐藏簇的分类条目
///
/// 一个条目对应一个隐藏簇；单元数、类别与原始层序号捆绑在同一结构里，
/// 三者数量恒等的约束由构造保证。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HiddenCluster {
    /// 单元数（Dense 为输出宽度，其余为 1）
    pub units: usize,
    /// 渲染类别
    pub category: LayerCategory,
    /// 原始层序号（渲染时回查该层配置用）
    pub layer_index: usize,
}

/// 单次渲染调用的瞬态状态
///
/// 每次渲染都重新构建、用后即弃，不存在跨调用的残留状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderState {
    /// 整体输入宽度（首层非 Dense 时为 1，即单个复合输入节点）
    pub input_units: usize,
    /// 隐藏簇条目（按原始层顺序）
    pub clusters: Vec<HiddenCluster>,
    /// 整体输出宽度（仅当末层为 Dense 时有意义）
    pub output_units: usize,
}

impl RenderState {
    /// 分类遍历：对层序列做一次线性扫描，收集渲染所需的全部计数
    ///
    /// - 首层：推导整体输入宽度；非 InputLayer 的首层同时占据第一个隐藏簇槽位；
    /// - 末层（与首层不同层时）：只推导整体输出宽度，不产生隐藏簇条目；
    /// - 中间层：逐一分类并追加隐藏簇条目。
    pub fn from_layers(layers: &[LayerDescriptor]) -> Result<Self, VizError> {
        let mut state = Self {
            input_units: 1,
            clusters: Vec::new(),
            output_units: 0,
        };
        if layers.is_empty() {
            return Err(VizError::EmptyModel);
        }

        let last_index = layers.len() - 1;
        for (index, layer) in layers.iter().enumerate() {
            if index == 0 {
                // 首层（模型只有一层时也走此分支，不会产生输出宽度）
                if matches!(layer.kind, LayerKind::Dense) {
                    state.input_units =
                        layer.input_shape.non_batch_width().ok_or_else(|| {
                            VizError::MissingDimension(format!(
                                "首层输入形状{}缺少非 batch 维度",
                                layer.input_shape
                            ))
                        })?;
                }
                if let Some(classified) = classify(layer)? {
                    state.clusters.push(HiddenCluster {
                        units: classified.units,
                        category: classified.category,
                        layer_index: index,
                    });
                }
            } else if index == last_index {
                // 末层：只推导输出宽度
                if matches!(layer.kind, LayerKind::Dense) {
                    state.output_units =
                        layer.output_shape.non_batch_width().ok_or_else(|| {
                            VizError::MissingDimension(format!(
                                "末层输出形状{}缺少非 batch 维度",
                                layer.output_shape
                            ))
                        })?;
                } else {
                    state.output_units = layer.output_shape.non_batch_width().unwrap_or(0);
                }
            } else if let Some(classified) = classify(layer)? {
                state.clusters.push(HiddenCluster {
                    units: classified.units,
                    category: classified.category,
                    layer_index: index,
                });
            }
        }
        Ok(state)
    }
}
