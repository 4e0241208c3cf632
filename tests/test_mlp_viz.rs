/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : MLP 端到端可视化集成测试
 */

use only_viz::{ArchVisualizer, LayerDescriptor, Sequential};
use std::fs;

/// 经典 MNIST 风格 MLP：784 → 128 → 64 → 10
#[test]
fn test_mlp_end_to_end() {
    let dot_file = "test_mlp_end_to_end.gv";

    let mut model = Sequential::new("mnist_mlp");
    model
        .add(LayerDescriptor::dense(784, 128))
        .add(LayerDescriptor::dense(128, 64))
        .add(LayerDescriptor::dense(64, 10));

    let viz = ArchVisualizer::new(dot_file, "MNIST MLP");
    let output = viz.visualize(&model, false).expect("可视化失败");
    assert_eq!(output.dot_path.to_str(), Some(dot_file));
    assert_eq!(output.image_path, None);

    let dot = fs::read_to_string(dot_file).expect("读取 DOT 文件失败");
    assert!(dot.starts_with("digraph g {"));
    // 输入簇：截断到 10 个节点并标注省略的 774 个
    assert!(dot.contains("MNIST MLP\\n\\n\\n\\nInput Layer (+774)"));
    // 隐藏 Dense 簇的截断标注
    assert!(dot.contains("(+118)"));
    assert!(dot.contains("(+54)"));
    assert!(dot.contains("Output Layer"));
    // 全局样式
    assert!(dot.contains("splines=false;"));
    assert!(dot.contains("edge [arrowhead=none color=\"#707070\"];"));

    // 清理
    fs::remove_file(dot_file).ok();
}

/// 同一模型、同一配置渲染两次：文件内容逐字节一致
#[test]
fn test_mlp_visualize_twice_identical() {
    let dot_file = "test_mlp_visualize_twice_identical.gv";

    let mut model = Sequential::new("mlp");
    model
        .add(LayerDescriptor::dense(16, 8))
        .add(LayerDescriptor::dense(8, 4))
        .add(LayerDescriptor::dense(4, 2));

    let viz = ArchVisualizer::new(dot_file, "Tiny MLP");
    viz.visualize(&model, false).expect("第一次可视化失败");
    let first = fs::read_to_string(dot_file).expect("读取 DOT 文件失败");
    viz.visualize(&model, false).expect("第二次可视化失败");
    let second = fs::read_to_string(dot_file).expect("读取 DOT 文件失败");
    assert_eq!(first, second);

    // 清理
    fs::remove_file(dot_file).ok();
}
