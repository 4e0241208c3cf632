/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 层类别标签与单层只读描述
 */

use super::config::{keys, ConfigValue, LayerConfig};
use super::shape::Shape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 层类别标签（封闭集合）
///
/// 未在集合内的层用 `Custom { name }` 表示，渲染管线不会因未知层类型而中止。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerKind {
    Dense,
    Conv2D,
    DepthwiseConv2D,
    MaxPooling2D,
    Dropout,
    Flatten,
    Activation,
    BatchNormalization,
    Multiply,
    Add,
    Reshape,
    /// 结构性输入层：只声明输入形状，不做计算
    InputLayer,
    Custom {
        name: String,
    },
}

impl LayerKind {
    /// 类别名称（错误信息与通用节点标签用）
    pub fn name(&self) -> &str {
        match self {
            Self::Dense => "Dense",
            Self::Conv2D => "Conv2D",
            Self::DepthwiseConv2D => "DepthwiseConv2D",
            Self::MaxPooling2D => "MaxPooling2D",
            Self::Dropout => "Dropout",
            Self::Flatten => "Flatten",
            Self::Activation => "Activation",
            Self::BatchNormalization => "BatchNormalization",
            Self::Multiply => "Multiply",
            Self::Add => "Add",
            Self::Reshape => "Reshape",
            Self::InputLayer => "InputLayer",
            Self::Custom { name } => name,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 单个网络层的只读描述
///
/// 渲染器只读取、从不修改：类别标签 + 输入/输出形状 + 配置映射。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub kind: LayerKind,
    pub input_shape: Shape,
    pub output_shape: Shape,
    #[serde(default, skip_serializing_if = "LayerConfig::is_empty")]
    pub config: LayerConfig,
}

impl LayerDescriptor {
    /// Dense（全连接）层：`[?, input_units] -> [?, units]`
    pub fn dense(input_units: usize, units: usize) -> Self {
        Self {
            kind: LayerKind::Dense,
            input_shape: Shape::with_dynamic_batch(&[input_units]),
            output_shape: Shape::with_dynamic_batch(&[units]),
            config: LayerConfig::new(),
        }
    }

    /// Conv2D（2D 卷积）层
    ///
    /// 输入 `[?, H, W, C]`，输出按 valid 卷积、步长 1 记录为
    /// `[?, H-kH+1, W-kW+1, filters]`（可视化只关心 kernel_size 与 filters，
    /// 输出尺寸仅作记录）。卷积核大于输入时该维度记为 0，不会 panic。
    pub fn conv2d(
        input_hwc: (usize, usize, usize),
        kernel_size: (usize, usize),
        filters: usize,
    ) -> Self {
        let (h, w, c) = input_hwc;
        let (kh, kw) = kernel_size;
        Self {
            kind: LayerKind::Conv2D,
            input_shape: Shape::with_dynamic_batch(&[h, w, c]),
            output_shape: Shape::with_dynamic_batch(&[
                valid_conv_extent(h, kh),
                valid_conv_extent(w, kw),
                filters,
            ]),
            config: LayerConfig::new()
                .with(keys::KERNEL_SIZE, ConfigValue::Pair(kh, kw))
                .with(keys::FILTERS, ConfigValue::Int(filters)),
        }
    }

    /// DepthwiseConv2D（逐通道卷积）层
    ///
    /// 不带 filters 配置项；特征图数量由渲染器按
    /// `输入通道数 × depth_multiplier` 推算。
    pub fn depthwise_conv2d(
        input_hwc: (usize, usize, usize),
        kernel_size: (usize, usize),
        depth_multiplier: usize,
    ) -> Self {
        let (h, w, c) = input_hwc;
        let (kh, kw) = kernel_size;
        Self {
            kind: LayerKind::DepthwiseConv2D,
            input_shape: Shape::with_dynamic_batch(&[h, w, c]),
            output_shape: Shape::with_dynamic_batch(&[
                valid_conv_extent(h, kh),
                valid_conv_extent(w, kw),
                c * depth_multiplier,
            ]),
            config: LayerConfig::new()
                .with(keys::KERNEL_SIZE, ConfigValue::Pair(kh, kw))
                .with(keys::DEPTH_MULTIPLIER, ConfigValue::Int(depth_multiplier)),
        }
    }

    /// MaxPooling2D（2D 最大池化）层：`[?, H, W, C] -> [?, H/pH, W/pW, C]`
    pub fn max_pooling2d(input_hwc: (usize, usize, usize), pool_size: (usize, usize)) -> Self {
        let (h, w, c) = input_hwc;
        let (ph, pw) = pool_size;
        Self {
            kind: LayerKind::MaxPooling2D,
            input_shape: Shape::with_dynamic_batch(&[h, w, c]),
            output_shape: Shape::with_dynamic_batch(&[h / ph, w / pw, c]),
            config: LayerConfig::new().with(keys::POOL_SIZE, ConfigValue::Pair(ph, pw)),
        }
    }

    /// Flatten（展平）层：`[?, H, W, C] -> [?, H*W*C]`
    pub fn flatten(input_hwc: (usize, usize, usize)) -> Self {
        let (h, w, c) = input_hwc;
        Self {
            kind: LayerKind::Flatten,
            input_shape: Shape::with_dynamic_batch(&[h, w, c]),
            output_shape: Shape::with_dynamic_batch(&[h * w * c]),
            config: LayerConfig::new(),
        }
    }

    /// Dropout 层：形状直通
    pub fn dropout(units: usize) -> Self {
        Self::passthrough(LayerKind::Dropout, units)
    }

    /// Activation（激活）层：形状直通，记录激活函数名
    pub fn activation(function: &str, units: usize) -> Self {
        let mut layer = Self::passthrough(LayerKind::Activation, units);
        layer
            .config
            .set(keys::ACTIVATION, ConfigValue::Text(function.to_string()));
        layer
    }

    /// BatchNormalization（批归一化）层：形状直通
    pub fn batch_normalization(units: usize) -> Self {
        Self::passthrough(LayerKind::BatchNormalization, units)
    }

    /// Reshape（重排）层
    pub fn reshape(input_shape: Shape, output_shape: Shape) -> Self {
        Self {
            kind: LayerKind::Reshape,
            input_shape,
            output_shape,
            config: LayerConfig::new(),
        }
    }

    /// 结构性输入层：只声明输入形状
    pub fn input_layer(shape: Shape) -> Self {
        Self {
            kind: LayerKind::InputLayer,
            input_shape: shape.clone(),
            output_shape: shape,
            config: LayerConfig::new(),
        }
    }

    /// 未识别的自定义层
    pub fn custom(name: &str, input_shape: Shape, output_shape: Shape) -> Self {
        Self {
            kind: LayerKind::Custom {
                name: name.to_string(),
            },
            input_shape,
            output_shape,
            config: LayerConfig::new(),
        }
    }

    fn passthrough(kind: LayerKind, units: usize) -> Self {
        let shape = Shape::with_dynamic_batch(&[units]);
        Self {
            kind,
            input_shape: shape.clone(),
            output_shape: shape,
            config: LayerConfig::new(),
        }
    }
}

/// valid 卷积、步长 1 的输出尺寸；卷积核大于输入时饱和为 0
fn valid_conv_extent(extent: usize, kernel: usize) -> usize {
    (extent + 1).saturating_sub(kernel)
}
