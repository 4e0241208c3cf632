/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 可视化器的错误类型
 */

use thiserror::Error;

/// 可视化过程中的错误类型
///
/// 两类致命错误会在写出任何文件之前中止渲染：
/// - `UnsupportedFirstLayer`：首层既不是 Dense、Conv2D，也不是可接受的结构性输入层
/// - `NonImageInput`：首层为 InputLayer 但形状不是 4 维（非图像输入）
///
/// 其余未识别的情况一律降级处理（渲染通用元素），不会中止整个渲染。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VizError {
    #[error("模型为空：没有任何层可渲染")]
    EmptyModel,

    #[error("不支持的首层类型「{0}」：首层仅支持 Dense、Conv2D 或 InputLayer")]
    UnsupportedFirstLayer(String),

    #[error("InputLayer 仅支持图像输入（4 维形状），实际为{0}维")]
    NonImageInput(usize),

    #[error("形状缺少所需维度：{0}")]
    MissingDimension(String),

    #[error("层配置缺少必需项「{0}」")]
    MissingConfig(String),

    #[error("模型（反）序列化失败: {0}")]
    Serde(String),

    #[error("写入 DOT 文件失败: {0}")]
    Io(String),
}
