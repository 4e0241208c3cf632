/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 层形状（支持动态维度）
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 维度值：Some(n) 表示固定值 n，None 表示动态（任意值）
pub type Dim = Option<usize>;

/// 层形状：有序的可选维度序列，第 0 维为 batch 维度
///
/// 类似 Keras 的 `(None, 128)` 设计：batch 维度通常为动态（None），
/// 推导宽度时一律忽略。维度按下标直接访问，取代对形状打印文本的字符串切分。
///
/// # 示例
/// ```
/// use only_viz::Shape;
///
/// let shape = Shape::with_dynamic_batch(&[128]);
/// assert_eq!(shape.to_string(), "[?, 128]");
/// assert_eq!(shape.non_batch_width(), Some(128));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Vec<Dim>,
}

impl Shape {
    pub fn new(dims: &[Dim]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// 从固定的非 batch 维度创建，batch 维度为动态
    ///
    /// # 示例
    /// ```
    /// use only_viz::Shape;
    ///
    /// let shape = Shape::with_dynamic_batch(&[28, 28, 1]);
    /// assert_eq!(shape.ndim(), 4);
    /// assert_eq!(shape.dim(0), None);
    /// assert_eq!(shape.dim(3), Some(1));
    /// ```
    pub fn with_dynamic_batch(rest: &[usize]) -> Self {
        let mut dims: Vec<Dim> = Vec::with_capacity(rest.len() + 1);
        dims.push(None);
        dims.extend(rest.iter().map(|&d| Some(d)));
        Self { dims }
    }

    /// 维度个数（含 batch 维度）
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// 取指定维度的固定值；动态维度或越界返回 None
    pub fn dim(&self, index: usize) -> Dim {
        self.dims.get(index).copied().flatten()
    }

    /// 第一个非 batch 维度（宽度推导用）
    pub fn non_batch_width(&self) -> Dim {
        self.dim(1)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .dims
            .iter()
            .map(|dim| match dim {
                Some(n) => n.to_string(),
                None => "?".to_string(),
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
