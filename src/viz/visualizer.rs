/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 渲染管线：输入簇 → 隐藏簇 → 输出簇，写出 DOT 文件
 */

use super::category::LayerCategory;
use super::dot::{GraphDocument, NodeAttrs, NodeId};
use super::state::{HiddenCluster, RenderState};
use crate::errors::VizError;
use crate::model::{keys, LayerDescriptor, LayerKind, Sequential, Shape};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 单个簇最多逐一绘制的单元数（渲染密度上限，非正确性上限）
///
/// 超出部分在簇标签上以 `(+N)` 标注省略数量。输出簇不设上限。
const MAX_UNITS_PER_CLUSTER: usize = 10;

// ========== 簇配色 ==========

/// 输入簇单元（绿）
const INPUT_UNIT_COLOR: &str = "#2ecc71";
/// 隐藏簇 Dense 单元（蓝）
const HIDDEN_UNIT_COLOR: &str = "#3498db";
/// 输出簇单元（红）
const OUTPUT_UNIT_COLOR: &str = "#e74c3c";
/// Conv2D 簇背景
const CONV_CLUSTER_COLOR: &str = "#5faad0";
/// MaxPooling2D 节点
const POOLING_COLOR: &str = "#8e44ad";
/// Flatten 节点
const FLATTEN_COLOR: &str = "#2c3e50";
/// Dropout 节点
const DROPOUT_COLOR: &str = "#f39c12";
/// Activation 节点
const ACTIVATION_COLOR: &str = "#00b894";
/// 通用占位节点（BatchNormalization / Arithmetic / Custom）
const PLACEHOLDER_COLOR: &str = "#95a5a6";

/// 灰度图像输入的渐变填充
const GRAYSCALE_GRADIENT: &str = "black:white";
/// RGB 图像输入的渐变填充（红 → 蓝）
const RGB_GRADIENT: &str = "#e74c3c:#3498db";

/// 可视化输出结果
#[derive(Debug)]
pub struct VisualizationOutput {
    /// DOT 文件路径（始终生成）
    pub dot_path: PathBuf,
    /// 图像文件路径（仅当请求查看且 Graphviz 可用时生成）
    pub image_path: Option<PathBuf>,
    /// Graphviz 是否可用
    pub graphviz_available: bool,
    /// 如果 Graphviz 不可用，提供安装提示
    pub graphviz_hint: Option<String>,
}

/// 网络结构可视化器
///
/// 持有目标文件路径与图标题；每次 `visualize` 调用彼此独立，
/// 渲染状态在调用内部重新构建。
///
/// # 示例
/// ```no_run
/// use only_viz::{ArchVisualizer, LayerDescriptor, Sequential};
///
/// let mut model = Sequential::new("mlp");
/// model
///     .add(LayerDescriptor::dense(784, 128))
///     .add(LayerDescriptor::dense(128, 10));
///
/// let viz = ArchVisualizer::default();
/// let output = viz.visualize(&model, false).unwrap();
/// assert!(output.dot_path.ends_with("network.gv"));
/// ```
#[derive(Debug, Clone)]
pub struct ArchVisualizer {
    filename: PathBuf,
    title: String,
}

impl Default for ArchVisualizer {
    fn default() -> Self {
        Self::new("network.gv", "My Neural Network")
    }
}

impl ArchVisualizer {
    pub fn new(filename: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // ========== 渲染管线 ==========

    /// 渲染模型结构图（纯函数，不做任何 I/O）
    ///
    /// 1. 分类遍历：收集输入宽度、隐藏簇条目与输出宽度；
    /// 2. 输入簇：Dense 首层按输入单元布点，图像输入渲染为单个复合节点；
    /// 3. 隐藏簇：按类别逐簇布点，与上一簇的节点范围连边；
    /// 4. 输出簇：仅当末层为 Dense 时按输出单元布点。
    ///
    /// # 错误
    /// - `EmptyModel`：模型没有任何层；
    /// - `UnsupportedFirstLayer` / `NonImageInput`：首层不可作为输入簇渲染；
    /// - `MissingDimension` / `MissingConfig`：形状或配置缺少渲染所需的项。
    pub fn render(&self, model: &Sequential) -> Result<GraphDocument, VizError> {
        let layers = model.layers.as_slice();
        let state = RenderState::from_layers(layers)?;
        let first = &layers[0];

        let mut doc = GraphDocument::new();

        // 输入簇
        let mut prev_ids = self.emit_input_cluster(&mut doc, first, state.input_units)?;

        // 隐藏簇（按原始层顺序）
        for (index, cluster) in state.clusters.iter().enumerate() {
            let layer = &layers[cluster.layer_index];
            prev_ids = Self::emit_hidden_cluster(&mut doc, index, cluster, layer, &prev_ids)?;
        }

        // 输出簇（仅末层为 Dense 时；模型只有一层时输出宽度为 0，不产生节点）
        if matches!(layers[layers.len() - 1].kind, LayerKind::Dense) {
            Self::emit_output_cluster(&mut doc, state.output_units, &prev_ids);
        }

        Ok(doc)
    }

    /// 渲染并写出 DOT 文件；`view` 为真时尝试用 Graphviz 生成 PNG 并打开查看器
    ///
    /// 致命错误（首层不支持等）发生在写文件之前，不会留下半成品输出。
    /// Graphviz 不可用不是错误：DOT 文件照常生成，返回结果中附带安装提示。
    pub fn visualize(
        &self,
        model: &Sequential,
        view: bool,
    ) -> Result<VisualizationOutput, VizError> {
        let doc = self.render(model)?;
        std::fs::write(&self.filename, doc.to_dot())
            .map_err(|e| VizError::Io(format!("{}: {e}", self.filename.display())))?;

        let mut output = VisualizationOutput {
            dot_path: self.filename.clone(),
            image_path: None,
            graphviz_available: false,
            graphviz_hint: None,
        };

        if view {
            let image_path = self.filename.with_extension("png");
            match Self::render_with_graphviz(&self.filename, &image_path) {
                Ok(()) => {
                    output.graphviz_available = true;
                    output.image_path = Some(image_path.clone());
                    Self::open_viewer(&image_path);
                }
                Err(hint) => output.graphviz_hint = Some(hint),
            }
        }

        Ok(output)
    }

    // ========== 输入簇 ==========

    /// 渲染输入簇，返回本簇可连边的节点范围
    fn emit_input_cluster(
        &self,
        doc: &mut GraphDocument,
        first: &LayerDescriptor,
        input_units: usize,
    ) -> Result<Vec<NodeId>, VizError> {
        let base_label = format!("{}\n\n\n\nInput Layer", self.title);
        match &first.kind {
            LayerKind::Dense => {
                let shown = input_units.min(MAX_UNITS_PER_CLUSTER);
                let label = if input_units > MAX_UNITS_PER_CLUSTER {
                    format!("{} (+{})", base_label, input_units - MAX_UNITS_PER_CLUSTER)
                } else {
                    base_label
                };
                let cluster = doc.add_cluster("input");
                doc.push_cluster_attr(cluster, "color", "white");
                doc.push_cluster_attr(cluster, "rank", "same");
                doc.set_cluster_label(cluster, &label);
                let ids = (0..shown)
                    .map(|_| doc.add_node(cluster, None, NodeAttrs::unit(INPUT_UNIT_COLOR)))
                    .collect();
                Ok(ids)
            }
            LayerKind::Conv2D | LayerKind::DepthwiseConv2D => {
                Self::emit_image_input(doc, &first.input_shape, &base_label)
            }
            LayerKind::InputLayer => {
                if first.input_shape.ndim() != 4 {
                    return Err(VizError::NonImageInput(first.input_shape.ndim()));
                }
                Self::emit_image_input(doc, &first.input_shape, &base_label)
            }
            other => Err(VizError::UnsupportedFirstLayer(other.name().to_string())),
        }
    }

    /// 图像输入：单个复合节点，标签编码宽、高与通道语义
    ///
    /// 通道数 1 → Grayscale（黑白渐变），3 → RGB（红蓝渐变），
    /// 其余通道数省略色彩标注与渐变。
    fn emit_image_input(
        doc: &mut GraphDocument,
        shape: &Shape,
        cluster_label: &str,
    ) -> Result<Vec<NodeId>, VizError> {
        let height = shape
            .dim(1)
            .ok_or_else(|| VizError::MissingDimension(format!("图像输入形状{shape}缺少高度")))?;
        let width = shape
            .dim(2)
            .ok_or_else(|| VizError::MissingDimension(format!("图像输入形状{shape}缺少宽度")))?;
        let channels = shape
            .dim(3)
            .ok_or_else(|| VizError::MissingDimension(format!("图像输入形状{shape}缺少通道数")))?;

        let (colormap, gradient) = match channels {
            1 => ("Grayscale", Some(GRAYSCALE_GRADIENT)),
            3 => ("RGB", Some(RGB_GRADIENT)),
            _ => ("", None),
        };
        let label = format!("Image\n{height} x {width} pixels\n{colormap}");

        let attrs = match gradient {
            Some(fill) => NodeAttrs::block("square", fill),
            None => NodeAttrs {
                shape: Some("square".to_string()),
                ..NodeAttrs::default()
            },
        };

        let cluster = doc.add_cluster("input");
        doc.push_cluster_attr(cluster, "color", "white");
        doc.set_cluster_label(cluster, cluster_label);
        let id = doc.add_node(cluster, Some(label), attrs);
        Ok(vec![id])
    }

    // ========== 隐藏簇 ==========

    /// 渲染单个隐藏簇，返回本簇可连边的节点范围
    fn emit_hidden_cluster(
        doc: &mut GraphDocument,
        index: usize,
        cluster: &HiddenCluster,
        layer: &LayerDescriptor,
        prev_ids: &[NodeId],
    ) -> Result<Vec<NodeId>, VizError> {
        let name = format!("hidden_{}", index + 1);
        match cluster.category {
            LayerCategory::Dense => {
                let shown = cluster.units.min(MAX_UNITS_PER_CLUSTER);
                let ci = doc.add_cluster(&name);
                doc.push_cluster_attr(ci, "color", "white");
                doc.push_cluster_attr(ci, "rank", "same");
                doc.push_cluster_attr(ci, "labeljust", "right");
                doc.push_cluster_attr(ci, "labelloc", "b");
                if cluster.units > MAX_UNITS_PER_CLUSTER {
                    let label = format!(" (+{})", cluster.units - MAX_UNITS_PER_CLUSTER);
                    doc.set_cluster_label(ci, &label);
                }
                let mut ids = Vec::with_capacity(shown);
                for _ in 0..shown {
                    let id = doc.add_node(ci, None, NodeAttrs::unit(HIDDEN_UNIT_COLOR));
                    for &prev in prev_ids {
                        doc.add_edge(prev, id);
                    }
                    ids.push(id);
                }
                Ok(ids)
            }
            LayerCategory::Conv2D => {
                let (kh, kw) = layer
                    .config
                    .get_pair(keys::KERNEL_SIZE)
                    .ok_or_else(|| VizError::MissingConfig(keys::KERNEL_SIZE.to_string()))?;
                let filters = Self::filter_count(layer)?;

                let ci = doc.add_cluster(&name);
                doc.push_cluster_attr(ci, "style", "filled");
                doc.push_cluster_attr(ci, "color", CONV_CLUSTER_COLOR);

                let kernel_label = format!(
                    "Convolutional Layer\nKernel Size: {kh}x{kw}\nFilters: {filters}"
                );
                let kernel = doc.add_node(
                    ci,
                    Some(kernel_label),
                    NodeAttrs {
                        shape: Some("square".to_string()),
                        ..NodeAttrs::default()
                    },
                );
                let feature_map = doc.add_node(
                    ci,
                    Some(format!("{filters}\nFeature Maps")),
                    NodeAttrs {
                        shape: Some("square".to_string()),
                        ..NodeAttrs::default()
                    },
                );
                for &prev in prev_ids {
                    doc.add_edge(prev, kernel);
                }
                doc.add_edge(kernel, feature_map);
                // 后续邻接只连特征图节点：本簇此后计为 1 个单元
                Ok(vec![feature_map])
            }
            LayerCategory::MaxPooling2D => {
                let (ph, pw) = layer
                    .config
                    .get_pair(keys::POOL_SIZE)
                    .ok_or_else(|| VizError::MissingConfig(keys::POOL_SIZE.to_string()))?;
                let label = format!("Max Pooling\nPool Size: {ph}x{pw}");
                Ok(Self::emit_single_block(
                    doc,
                    &name,
                    label,
                    NodeAttrs::filled(POOLING_COLOR),
                    prev_ids,
                ))
            }
            LayerCategory::Flatten => Ok(Self::emit_single_block(
                doc,
                &name,
                "Flattening".to_string(),
                NodeAttrs::block("invtriangle", FLATTEN_COLOR),
                prev_ids,
            )),
            LayerCategory::Dropout => Ok(Self::emit_single_block(
                doc,
                &name,
                "Dropout Layer".to_string(),
                NodeAttrs::filled(DROPOUT_COLOR),
                prev_ids,
            )),
            LayerCategory::Activation => {
                let function = layer
                    .config
                    .get_text(keys::ACTIVATION)
                    .ok_or_else(|| VizError::MissingConfig(keys::ACTIVATION.to_string()))?;
                let label = format!("Activation Layer\nFunction: {function}");
                Ok(Self::emit_single_block(
                    doc,
                    &name,
                    label,
                    NodeAttrs::block("octagon", ACTIVATION_COLOR),
                    prev_ids,
                ))
            }
            // 无专属画法的类别渲染为通用占位节点，保证已分类的簇不会凭空消失
            LayerCategory::BatchNormalization
            | LayerCategory::Arithmetic
            | LayerCategory::Custom => Ok(Self::emit_single_block(
                doc,
                &name,
                format!("{} Layer", cluster.category.name()),
                NodeAttrs::filled(PLACEHOLDER_COLOR),
                prev_ids,
            )),
        }
    }

    /// 单节点隐藏簇的公共画法：一个复合块，与上一簇全部节点连边
    fn emit_single_block(
        doc: &mut GraphDocument,
        name: &str,
        label: String,
        attrs: NodeAttrs,
        prev_ids: &[NodeId],
    ) -> Vec<NodeId> {
        let cluster = doc.add_cluster(name);
        doc.push_cluster_attr(cluster, "color", "white");
        let id = doc.add_node(cluster, Some(label), attrs);
        for &prev in prev_ids {
            doc.add_edge(prev, id);
        }
        vec![id]
    }

    /// 特征图数量：配置里有 filters 则直接取用；
    /// 否则按逐通道卷积推算 `输入通道数 × depth_multiplier`（乘数缺省为 1）
    fn filter_count(layer: &LayerDescriptor) -> Result<usize, VizError> {
        if let Some(filters) = layer.config.get_int(keys::FILTERS) {
            return Ok(filters);
        }
        let channels = layer.input_shape.dim(3).ok_or_else(|| {
            VizError::MissingDimension(format!(
                "逐通道卷积输入形状{}缺少通道数，无法推算特征图数量",
                layer.input_shape
            ))
        })?;
        let multiplier = layer.config.get_int(keys::DEPTH_MULTIPLIER).unwrap_or(1);
        Ok(channels * multiplier)
    }

    // ========== 输出簇 ==========

    /// 输出簇：每个输出单元一个节点（不设密度上限），与上一簇全连接
    fn emit_output_cluster(doc: &mut GraphDocument, output_units: usize, prev_ids: &[NodeId]) {
        let cluster = doc.add_cluster("output");
        doc.push_cluster_attr(cluster, "color", "white");
        doc.push_cluster_attr(cluster, "rank", "same");
        doc.push_cluster_attr(cluster, "labelloc", "b");
        doc.set_cluster_label(cluster, "Output Layer");
        for _ in 0..output_units {
            let id = doc.add_node(cluster, None, NodeAttrs::unit(OUTPUT_UNIT_COLOR));
            for &prev in prev_ids {
                doc.add_edge(prev, id);
            }
        }
    }

    // ========== Graphviz 渲染与查看 ==========

    /// 检测 Graphviz 是否可用
    fn is_graphviz_available() -> bool {
        Command::new("dot")
            .arg("-V")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// 使用 Graphviz 将 DOT 文件渲染为 PNG 图像
    fn render_with_graphviz(dot_path: &Path, image_path: &Path) -> Result<(), String> {
        if !Self::is_graphviz_available() {
            return Err("Graphviz 未安装或不在 PATH 中。\n\
                 安装方式:\n\
                 - Windows: winget install graphviz 或 choco install graphviz\n\
                 - macOS: brew install graphviz\n\
                 - Linux: sudo apt install graphviz\n\
                 安装后可用在线预览: https://dreampuf.github.io/GraphvizOnline/"
                .to_string());
        }

        let output = Command::new("dot")
            .arg("-Tpng")
            .arg(dot_path)
            .arg("-o")
            .arg(image_path)
            .output();

        match output {
            Ok(result) if result.status.success() => Ok(()),
            Ok(result) => {
                let stderr = String::from_utf8_lossy(&result.stderr);
                Err(format!("Graphviz 渲染失败: {stderr}"))
            }
            Err(e) => Err(format!("执行 Graphviz 命令失败: {e}")),
        }
    }

    /// 打开系统图片查看器（fire-and-forget，失败只忽略不报错）
    fn open_viewer(image_path: &Path) {
        let opener = if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        let _ = Command::new(opener).arg(image_path).spawn();
    }
}
