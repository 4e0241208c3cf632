/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 渲染管线单元测试（输入簇 / 隐藏簇 / 输出簇 / 错误分支）
 */

use crate::errors::VizError;
use crate::model::{keys, ConfigValue, LayerConfig, LayerDescriptor, Sequential, Shape};
use crate::viz::ArchVisualizer;
use std::path::Path;

fn visualizer() -> ArchVisualizer {
    ArchVisualizer::new("network.gv", "My Neural Network")
}

/// 输入宽度 ≤ 10：逐一布点，无 "(+N)" 标注
#[test]
fn test_input_cluster_under_cap() {
    let mut model = Sequential::new("small_mlp");
    model
        .add(LayerDescriptor::dense(8, 4))
        .add(LayerDescriptor::dense(4, 2));

    let doc = visualizer().render(&model).expect("渲染失败");
    let input = doc.cluster("input").expect("缺少输入簇");
    assert_eq!(input.nodes.len(), 8);
    assert!(!input.label.as_deref().unwrap_or("").contains("(+"));

    // 首层 Dense 同时占据第一个隐藏簇：4 单元，与输入全连接
    let hidden = doc.cluster("hidden_1").expect("缺少隐藏簇");
    assert_eq!(hidden.nodes.len(), 4);

    // 输出簇：2 单元
    let output = doc.cluster("output").expect("缺少输出簇");
    assert_eq!(output.nodes.len(), 2);

    // 8*4 + 4*2 条边
    assert_eq!(doc.edge_count(), 40);
}

/// 输入宽度 > 10：只画 10 个节点，标注 "(+N)"
#[test]
fn test_input_cluster_over_cap() {
    let mut model = Sequential::new("mnist_mlp");
    model
        .add(LayerDescriptor::dense(784, 128))
        .add(LayerDescriptor::dense(128, 10));

    let doc = visualizer().render(&model).expect("渲染失败");
    let input = doc.cluster("input").expect("缺少输入簇");
    assert_eq!(input.nodes.len(), 10);
    assert!(input.label.as_deref().expect("缺少簇标签").contains("(+774)"));

    // 隐藏 Dense 簇同样截断到 10，标注省略的 118 个单元
    let hidden = doc.cluster("hidden_1").expect("缺少隐藏簇");
    assert_eq!(hidden.nodes.len(), 10);
    assert!(hidden.label.as_deref().expect("缺少簇标签").contains("(+118)"));

    // 输出簇不设上限（此处恰为 10）
    let output = doc.cluster("output").expect("缺少输出簇");
    assert_eq!(output.nodes.len(), 10);
}

/// 隐藏 Dense 簇与上一簇全连接：min(U,10) × 上一簇节点数条边
#[test]
fn test_hidden_dense_full_bipartite() {
    let mut model = Sequential::new("mlp");
    model
        .add(LayerDescriptor::dense(5, 12))
        .add(LayerDescriptor::dense(12, 6))
        .add(LayerDescriptor::dense(6, 2));

    let doc = visualizer().render(&model).expect("渲染失败");
    // 5*10 + 10*6 + 6*2
    assert_eq!(doc.edge_count(), 50 + 60 + 12);
    assert_eq!(doc.cluster("hidden_1").expect("缺少隐藏簇").nodes.len(), 10);
    assert_eq!(doc.cluster("hidden_2").expect("缺少隐藏簇").nodes.len(), 6);

    // 节点 ID 从 1 开始、跨簇严格递增
    let ids: Vec<u64> = doc
        .clusters
        .iter()
        .flat_map(|c| c.nodes.iter().map(|n| n.id.0))
        .collect();
    assert_eq!(ids.first(), Some(&1));
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
}

/// 单通道图像输入：Grayscale 标注 + 黑白渐变
#[test]
fn test_image_input_grayscale() {
    let mut model = Sequential::new("cnn");
    model
        .add(LayerDescriptor::input_layer(Shape::with_dynamic_batch(&[
            28, 28, 1,
        ])))
        .add(LayerDescriptor::flatten((28, 28, 1)))
        .add(LayerDescriptor::dense(784, 10));

    let doc = visualizer().render(&model).expect("渲染失败");
    let input = doc.cluster("input").expect("缺少输入簇");
    assert_eq!(input.nodes.len(), 1);
    let node = &input.nodes[0];
    let label = node.label.as_deref().expect("缺少节点标签");
    assert!(label.contains("28 x 28 pixels"));
    assert!(label.contains("Grayscale"));
    assert_eq!(node.attrs.fillcolor.as_deref(), Some("black:white"));
}

/// 三通道图像输入（Conv2D 首层）：RGB 标注 + 红蓝渐变
#[test]
fn test_image_input_rgb_via_conv_first_layer() {
    let mut model = Sequential::new("cnn");
    model
        .add(LayerDescriptor::conv2d((32, 32, 3), (3, 3), 16))
        .add(LayerDescriptor::flatten((30, 30, 16)))
        .add(LayerDescriptor::dense(14400, 10));

    let doc = visualizer().render(&model).expect("渲染失败");
    let input = doc.cluster("input").expect("缺少输入簇");
    let label = input.nodes[0].label.as_deref().expect("缺少节点标签");
    assert!(label.contains("RGB"));
    assert_eq!(
        input.nodes[0].attrs.fillcolor.as_deref(),
        Some("#e74c3c:#3498db")
    );

    // 首层 Conv2D 占据第一个隐藏簇：卷积核 + 特征图两个节点
    let conv = doc.cluster("hidden_1").expect("缺少卷积簇");
    assert_eq!(conv.nodes.len(), 2);
    let kernel_label = conv.nodes[0].label.as_deref().expect("缺少节点标签");
    assert!(kernel_label.contains("Kernel Size: 3x3"));
    assert!(kernel_label.contains("Filters: 16"));
    assert!(conv.nodes[1]
        .label
        .as_deref()
        .expect("缺少节点标签")
        .contains("Feature Maps"));
}

/// 其他通道数：色彩标注为空，渐变省略
#[test]
fn test_image_input_other_channel_count() {
    let mut model = Sequential::new("cnn");
    model
        .add(LayerDescriptor::conv2d((16, 16, 4), (3, 3), 8))
        .add(LayerDescriptor::flatten((14, 14, 8)))
        .add(LayerDescriptor::dense(1568, 2));

    let doc = visualizer().render(&model).expect("渲染失败");
    let node = &doc.cluster("input").expect("缺少输入簇").nodes[0];
    let label = node.label.as_deref().expect("缺少节点标签");
    assert!(label.ends_with("pixels\n"));
    assert!(!label.contains("Grayscale"));
    assert!(!label.contains("RGB"));
    assert_eq!(node.attrs.fillcolor, None);
}

/// 输出簇不设密度上限：超过 10 个输出单元也逐一布点，无 "(+N)" 标注
#[test]
fn test_output_cluster_has_no_cap() {
    let mut model = Sequential::new("wide_head");
    model
        .add(LayerDescriptor::dense(4, 6))
        .add(LayerDescriptor::dense(6, 16));

    let doc = visualizer().render(&model).expect("渲染失败");
    let output = doc.cluster("output").expect("缺少输出簇");
    assert_eq!(output.nodes.len(), 16);
    assert!(!output.label.as_deref().unwrap_or("").contains("(+"));

    // 4*6 + 6*16 条边：输出簇全量连边，不截断
    assert_eq!(doc.edge_count(), 24 + 96);
}

/// 逐通道卷积：特征图数量 = 输入通道数 × depth_multiplier
#[test]
fn test_depthwise_conv_filter_inference() {
    let mut model = Sequential::new("depthwise_cnn");
    model
        .add(LayerDescriptor::depthwise_conv2d((28, 28, 3), (3, 3), 2))
        .add(LayerDescriptor::flatten((26, 26, 6)))
        .add(LayerDescriptor::dense(4056, 4));

    let doc = visualizer().render(&model).expect("渲染失败");
    let conv = doc.cluster("hidden_1").expect("缺少卷积簇");
    assert!(conv.nodes[0]
        .label
        .as_deref()
        .expect("缺少节点标签")
        .contains("Filters: 6"));
}

/// 逐通道卷积缺省 depth_multiplier：按 1 处理，特征图数量 = 输入通道数
#[test]
fn test_depthwise_conv_default_multiplier() {
    let mut layer = LayerDescriptor::depthwise_conv2d((28, 28, 3), (3, 3), 1);
    layer.config = LayerConfig::new().with(keys::KERNEL_SIZE, ConfigValue::Pair(3, 3));

    let mut model = Sequential::new("depthwise_cnn");
    model
        .add(layer)
        .add(LayerDescriptor::flatten((26, 26, 3)))
        .add(LayerDescriptor::dense(2028, 4));

    let doc = visualizer().render(&model).expect("渲染失败");
    let conv = doc.cluster("hidden_1").expect("缺少卷积簇");
    assert!(conv.nodes[0]
        .label
        .as_deref()
        .expect("缺少节点标签")
        .contains("Filters: 3"));
}

/// 首层为非 4 维的 InputLayer：致命错误，且不写出任何文件
#[test]
fn test_non_image_input_layer_is_fatal() {
    let mut model = Sequential::new("bad");
    model
        .add(LayerDescriptor::input_layer(Shape::with_dynamic_batch(&[
            100,
        ])))
        .add(LayerDescriptor::dense(100, 10));

    let path = "test_non_image_input_layer_is_fatal.gv";
    let viz = ArchVisualizer::new(path, "bad");
    let result = viz.visualize(&model, false);
    assert_eq!(result.unwrap_err(), VizError::NonImageInput(2));
    assert!(!Path::new(path).exists());
}

/// 首层类型不支持：致命错误
#[test]
fn test_unsupported_first_layer_is_fatal() {
    let mut model = Sequential::new("bad");
    model
        .add(LayerDescriptor::flatten((4, 4, 1)))
        .add(LayerDescriptor::dense(16, 2));

    let result = visualizer().render(&model);
    assert_eq!(
        result.unwrap_err(),
        VizError::UnsupportedFirstLayer("Flatten".to_string())
    );
}

/// 空模型：致命错误
#[test]
fn test_empty_model_is_fatal() {
    let model = Sequential::new("empty");
    assert_eq!(
        visualizer().render(&model).unwrap_err(),
        VizError::EmptyModel
    );
}

/// 末层不是 Dense：不产生输出簇节点
#[test]
fn test_non_dense_last_layer_emits_no_output() {
    let mut model = Sequential::new("headless");
    model
        .add(LayerDescriptor::dense(4, 3))
        .add(LayerDescriptor::dropout(3));

    let doc = visualizer().render(&model).expect("渲染失败");
    assert!(doc.cluster("output").is_none());
    // 输入 4 节点 + 隐藏 Dense 3 节点；末层 Dropout 不占隐藏簇
    assert_eq!(doc.node_count(), 7);
    assert_eq!(doc.edge_count(), 12);
}

/// 只有一层的模型：首层分支优先，输出簇存在但为空
#[test]
fn test_single_dense_layer_model() {
    let mut model = Sequential::new("single");
    model.add(LayerDescriptor::dense(6, 3));

    let doc = visualizer().render(&model).expect("渲染失败");
    assert_eq!(doc.cluster("input").expect("缺少输入簇").nodes.len(), 6);
    assert_eq!(doc.cluster("hidden_1").expect("缺少隐藏簇").nodes.len(), 3);
    assert_eq!(doc.cluster("output").expect("缺少输出簇").nodes.len(), 0);
    assert_eq!(doc.edge_count(), 18);
}

/// BatchNormalization / Arithmetic / Custom：渲染为通用占位节点，不会凭空消失
#[test]
fn test_placeholder_categories_render_generic_node() {
    let shape = Shape::with_dynamic_batch(&[4]);
    let mut model = Sequential::new("mixed");
    model
        .add(LayerDescriptor::dense(4, 4))
        .add(LayerDescriptor::batch_normalization(4))
        .add(LayerDescriptor::reshape(shape.clone(), shape.clone()))
        .add(LayerDescriptor::custom("SelfAttention", shape.clone(), shape))
        .add(LayerDescriptor::dense(4, 2));

    let doc = visualizer().render(&model).expect("渲染失败");
    let labels: Vec<&str> = ["hidden_2", "hidden_3", "hidden_4"]
        .iter()
        .map(|name| {
            doc.cluster(name)
                .expect("缺少隐藏簇")
                .nodes[0]
                .label
                .as_deref()
                .expect("缺少节点标签")
        })
        .collect();
    assert_eq!(
        labels,
        [
            "BatchNormalization Layer",
            "Arithmetic Layer",
            "Custom Layer"
        ]
    );
    // 占位节点各计 1 个单元：4*4 + 4*1 + 1*1 + 1*1 + 1*2
    assert_eq!(doc.edge_count(), 16 + 4 + 1 + 1 + 2);
}

/// 同一模型两次渲染产物完全一致（分类遍历确定性）
#[test]
fn test_render_is_deterministic() {
    let mut model = Sequential::new("cnn");
    model
        .add(LayerDescriptor::conv2d((28, 28, 1), (3, 3), 32))
        .add(LayerDescriptor::max_pooling2d((26, 26, 32), (2, 2)))
        .add(LayerDescriptor::flatten((13, 13, 32)))
        .add(LayerDescriptor::dense(5408, 10));

    let viz = visualizer();
    let first = viz.render(&model).expect("第一次渲染失败");
    let second = viz.render(&model).expect("第二次渲染失败");
    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
    assert_eq!(first.to_dot(), second.to_dot());
}

/// 池化 / 展平 / Dropout / 激活各渲染为单个复合节点并向前计 1 个单元
#[test]
fn test_composite_block_labels() {
    let mut model = Sequential::new("cnn");
    model
        .add(LayerDescriptor::conv2d((28, 28, 1), (3, 3), 32))
        .add(LayerDescriptor::max_pooling2d((26, 26, 32), (2, 2)))
        .add(LayerDescriptor::flatten((13, 13, 32)))
        .add(LayerDescriptor::dropout(5408))
        .add(LayerDescriptor::activation("relu", 5408))
        .add(LayerDescriptor::dense(5408, 10));

    let doc = visualizer().render(&model).expect("渲染失败");
    let label_of = |name: &str| -> &str {
        doc.cluster(name)
            .expect("缺少隐藏簇")
            .nodes[0]
            .label
            .as_deref()
            .expect("缺少节点标签")
    };
    assert!(label_of("hidden_2").contains("Pool Size: 2x2"));
    assert_eq!(label_of("hidden_3"), "Flattening");
    assert_eq!(label_of("hidden_4"), "Dropout Layer");
    assert!(label_of("hidden_5").contains("Function: relu"));

    // 图像输入 1 → 卷积核 1 → 特征图 1 → 后续每簇 1 节点，输出 10
    // 边：1 + 1 + 1 + 1 + 1 + 1 + 10
    assert_eq!(doc.edge_count(), 16);
}
