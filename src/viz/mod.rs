/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 可视化管线：分类 → 簇布点 → DOT 产出
 */

mod category;
mod dot;
mod state;
mod visualizer;

pub use category::{classify, Classified, LayerCategory};
pub use dot::{Cluster, DotNode, Edge, GraphAttrs, GraphDocument, NodeAttrs, NodeId};
pub use visualizer::{ArchVisualizer, VisualizationOutput};

#[cfg(test)]
mod tests;
