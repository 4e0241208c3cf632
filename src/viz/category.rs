/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 层分类：LayerKind → 渲染类别 + 单元数
 */

use crate::errors::VizError;
use crate::model::{LayerDescriptor, LayerKind};

/// 渲染类别标签（封闭集合）
///
/// 把层类别收敛为渲染分支可穷举匹配的集合：
/// - Conv2D 与 DepthwiseConv2D 共用 Conv2D 类别；
/// - Multiply / Add / Reshape 一律折叠为 Arithmetic（刻意丢弃运算语义区别）；
/// - 未识别的层归为 Custom。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerCategory {
    Dense,
    Conv2D,
    MaxPooling2D,
    Dropout,
    Flatten,
    Activation,
    BatchNormalization,
    Arithmetic,
    Custom,
}

impl LayerCategory {
    /// 类别名称（通用占位节点的标签用）
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dense => "Dense",
            Self::Conv2D => "Conv2D",
            Self::MaxPooling2D => "MaxPooling2D",
            Self::Dropout => "Dropout",
            Self::Flatten => "Flatten",
            Self::Activation => "Activation",
            Self::BatchNormalization => "BatchNormalization",
            Self::Arithmetic => "Arithmetic",
            Self::Custom => "Custom",
        }
    }
}

/// 分类结果：渲染类别 + 单元数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub category: LayerCategory,
    /// Dense 取输出形状的非 batch 维度；其余类别固定为 1（单个复合节点）
    pub units: usize,
}

/// 对单个层做分类
///
/// - InputLayer 返回 `Ok(None)`：结构性层，不占隐藏簇槽位；
/// - Dense 的单元数取输出形状的非 batch 维度，该维度缺失是错误；
/// - 其余已识别类别单元数固定为 1；
/// - 未识别类别归为 Custom，单元数 1，渲染管线不会因此中止。
pub fn classify(layer: &LayerDescriptor) -> Result<Option<Classified>, VizError> {
    let category = match &layer.kind {
        LayerKind::InputLayer => return Ok(None),
        LayerKind::Dense => {
            let units = layer.output_shape.non_batch_width().ok_or_else(|| {
                VizError::MissingDimension(format!(
                    "Dense 层输出形状{}缺少非 batch 维度",
                    layer.output_shape
                ))
            })?;
            return Ok(Some(Classified {
                category: LayerCategory::Dense,
                units,
            }));
        }
        LayerKind::Conv2D | LayerKind::DepthwiseConv2D => LayerCategory::Conv2D,
        LayerKind::MaxPooling2D => LayerCategory::MaxPooling2D,
        LayerKind::Dropout => LayerCategory::Dropout,
        LayerKind::Flatten => LayerCategory::Flatten,
        LayerKind::Activation => LayerCategory::Activation,
        LayerKind::BatchNormalization => LayerCategory::BatchNormalization,
        LayerKind::Multiply | LayerKind::Add | LayerKind::Reshape => LayerCategory::Arithmetic,
        LayerKind::Custom { .. } => LayerCategory::Custom,
    };
    Ok(Some(Classified { category, units: 1 }))
}
