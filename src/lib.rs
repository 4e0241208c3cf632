//! # Only Viz
//!
//! `only_viz`将顺序（Sequential）神经网络模型渲染为 Graphviz DOT 结构图，
//! 是[only_torch](https://github.com/dbsxdbsx/only_torch)的姊妹项目：
//! 对层序列做一次线性扫描，逐层分类，按簇（输入簇 / 隐藏簇 / 输出簇）布点，
//! 并在相邻簇之间连边，最终产出一份静态的网络结构描述文件。
//!
//! 生成的 `.gv` 文件可在线预览：<https://dreampuf.github.io/GraphvizOnline/>

pub mod errors;
pub mod model;
pub mod viz;

pub use errors::VizError;
pub use model::{ConfigValue, Dim, LayerConfig, LayerDescriptor, LayerKind, Sequential, Shape};
pub use viz::{ArchVisualizer, GraphDocument, LayerCategory, NodeId, VisualizationOutput};
