/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 图文档（渲染产物）与 Graphviz DOT 文本生成
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点 ID：单次渲染内从 1 开始单调递增，全局唯一
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 单个绘制节点的样式属性
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fontcolor: Option<String>,
}

impl NodeAttrs {
    /// 圆形单元节点（输入/隐藏/输出簇的神经元），边框色与字体色同色
    pub fn unit(color: &str) -> Self {
        Self {
            shape: Some("circle".to_string()),
            style: Some("filled".to_string()),
            color: Some(color.to_string()),
            fontcolor: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// 填充的复合操作块（默认椭圆形），白色字体
    pub fn filled(fillcolor: &str) -> Self {
        Self {
            style: Some("filled".to_string()),
            fillcolor: Some(fillcolor.to_string()),
            fontcolor: Some("white".to_string()),
            ..Self::default()
        }
    }

    /// 指定形状的填充复合操作块（Flatten 倒三角、Activation 八边形等）
    pub fn block(shape: &str, fillcolor: &str) -> Self {
        Self {
            shape: Some(shape.to_string()),
            ..Self::filled(fillcolor)
        }
    }
}

/// 单个绘制节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotNode {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub attrs: NodeAttrs,
}

/// 命名簇：输入簇 / hidden-N / 输出簇
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// 簇名（DOT 中带 `cluster_` 前缀输出）
    pub name: String,
    /// 簇标签（可含换行）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 簇级属性（color、rank、labelloc 等）
    pub attrs: Vec<(String, String)>,
    pub nodes: Vec<DotNode>,
}

/// 有向边：只连接相邻簇的节点范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// 全局图样式：关闭曲线边、固定节点/层间距、无箭头的中性灰边
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAttrs {
    pub splines: String,
    pub nodesep: String,
    pub ranksep: String,
    pub edge_arrowhead: String,
    pub edge_color: String,
}

impl Default for GraphAttrs {
    fn default() -> Self {
        Self {
            splines: "false".to_string(),
            nodesep: "1".to_string(),
            ranksep: "2".to_string(),
            edge_arrowhead: "none".to_string(),
            edge_color: "#707070".to_string(),
        }
    }
}

/// 渲染产物：带样式的节点簇、有向边与全局样式
///
/// 节点 ID 由内部计数器从 1 开始单调分配；
/// 边只在相邻簇的节点范围之间建立（严格层邻接，无跳连）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDocument {
    pub attrs: GraphAttrs,
    pub clusters: Vec<Cluster>,
    pub edges: Vec<Edge>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphDocument {
    pub fn new() -> Self {
        Self {
            attrs: GraphAttrs::default(),
            clusters: Vec::new(),
            edges: Vec::new(),
            next_id: 1,
        }
    }

    /// 开启一个新簇，返回簇序号
    pub fn add_cluster(&mut self, name: &str) -> usize {
        self.clusters.push(Cluster {
            name: name.to_string(),
            label: None,
            attrs: Vec::new(),
            nodes: Vec::new(),
        });
        self.clusters.len() - 1
    }

    pub fn set_cluster_label(&mut self, cluster: usize, label: &str) {
        self.clusters[cluster].label = Some(label.to_string());
    }

    pub fn push_cluster_attr(&mut self, cluster: usize, key: &str, value: &str) {
        self.clusters[cluster]
            .attrs
            .push((key.to_string(), value.to_string()));
    }

    /// 在指定簇中分配一个新节点，返回其单调递增的 ID
    pub fn add_node(&mut self, cluster: usize, label: Option<String>, attrs: NodeAttrs) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.clusters[cluster].nodes.push(DotNode { id, label, attrs });
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push(Edge { from, to });
    }

    pub fn node_count(&self) -> usize {
        self.clusters.iter().map(|c| c.nodes.len()).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 按簇名查找（测试与调用方检视用）
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    // ========== Graphviz DOT 文本生成 ==========

    /// 生成 Graphviz DOT 格式的图描述字符串
    ///
    /// 返回的字符串可在线预览：<https://dreampuf.github.io/GraphvizOnline/>
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();

        dot.push_str("digraph g {\n");
        dot.push_str(&format!("    splines={};\n", self.attrs.splines));
        dot.push_str(&format!("    nodesep={};\n", self.attrs.nodesep));
        dot.push_str(&format!("    ranksep={};\n", self.attrs.ranksep));
        dot.push_str(&format!(
            "    edge [arrowhead={} color=\"{}\"];\n",
            self.attrs.edge_arrowhead, self.attrs.edge_color
        ));
        dot.push('\n');

        for cluster in &self.clusters {
            dot.push_str(&format!("    subgraph cluster_{} {{\n", cluster.name));
            for (key, value) in &cluster.attrs {
                dot.push_str(&format!("        {}=\"{}\";\n", key, escape_label(value)));
            }
            if let Some(label) = &cluster.label {
                dot.push_str(&format!("        label=\"{}\";\n", escape_label(label)));
            }
            for node in &cluster.nodes {
                dot.push_str("        ");
                dot.push_str(&Self::node_def(node));
            }
            dot.push_str("    }\n");
        }

        dot.push('\n');
        for edge in &self.edges {
            dot.push_str(&format!("    \"{}\" -> \"{}\";\n", edge.from, edge.to));
        }
        dot.push_str("}\n");

        dot
    }

    /// 生成单个节点的 DOT 定义行
    fn node_def(node: &DotNode) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(label) = &node.label {
            parts.push(format!("label=\"{}\"", escape_label(label)));
        }
        if let Some(shape) = &node.attrs.shape {
            parts.push(format!("shape={shape}"));
        }
        if let Some(style) = &node.attrs.style {
            parts.push(format!("style={style}"));
        }
        if let Some(color) = &node.attrs.color {
            parts.push(format!("color=\"{color}\""));
        }
        if let Some(fillcolor) = &node.attrs.fillcolor {
            parts.push(format!("fillcolor=\"{fillcolor}\""));
        }
        if let Some(fontcolor) = &node.attrs.fontcolor {
            parts.push(format!("fontcolor=\"{fontcolor}\""));
        }
        if parts.is_empty() {
            format!("\"{}\";\n", node.id)
        } else {
            format!("\"{}\" [{}];\n", node.id, parts.join(" "))
        }
    }
}

/// 转义 DOT 双引号字符串中的特殊字符（换行输出为 `\n` 字面量）
fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
