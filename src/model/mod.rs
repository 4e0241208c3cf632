/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 模型侧的数据类型：形状、层配置、层描述与顺序模型
 */

mod config;
mod layer;
mod sequential;
mod shape;

pub use config::{keys, ConfigValue, LayerConfig};
pub use layer::{LayerDescriptor, LayerKind};
pub use sequential::Sequential;
pub use shape::{Dim, Shape};
