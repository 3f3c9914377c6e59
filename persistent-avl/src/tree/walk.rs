//! 结构遍历与调试输出

use std::fmt::Display;

use crate::node::Node;
use crate::store::{ReadableNodeStore, Result};

use super::core::AvlTree;
use super::helpers::load_child;

/// 沿左右子节点逐层访问树结构
///
/// 主要用于测试中断言具体形状，例如 `tree.walk().left()?.key()`。
/// 走到不存在的位置后继续走仍然得到空位置。
pub struct Walker<'a, K, V, R: ?Sized> {
    store: &'a R,
    node: Option<Node<K, V>>,
}

impl<'a, K, V, R> Walker<'a, K, V, R>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    /// 从给定节点开始
    pub fn new(store: &'a R, node: Option<Node<K, V>>) -> Self {
        Self { store, node }
    }

    /// 当前节点
    pub fn node(&self) -> Option<&Node<K, V>> {
        self.node.as_ref()
    }

    /// 当前 key
    pub fn key(&self) -> Option<&K> {
        self.node.as_ref().map(|n| &n.key)
    }

    /// 当前子树大小
    pub fn count(&self) -> usize {
        self.node.as_ref().map_or(0, |n| n.count)
    }

    /// 左子节点
    pub fn left(&self) -> Result<Self> {
        let id = self.node.as_ref().and_then(|n| n.left_id);
        Ok(Self::new(self.store, load_child(self.store, id.as_ref())?))
    }

    /// 右子节点
    pub fn right(&self) -> Result<Self> {
        let id = self.node.as_ref().and_then(|n| n.right_id);
        Ok(Self::new(self.store, load_child(self.store, id.as_ref())?))
    }
}

impl<K, V, S, C> AvlTree<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
{
    /// 从根开始的 walker
    pub fn walk(&self) -> Walker<'_, K, V, S> {
        Walker::new(&*self.store, self.root.clone())
    }

    /// 缩进形式的结构输出
    ///
    /// 每行 `key(count)`，左右子节点分别以 `l:` / `r:` 累加前缀：
    ///
    /// ```text
    /// 2(3)
    /// l:1(1)
    /// r:3(1)
    /// ```
    pub fn render(&self) -> Result<String>
    where
        K: Display,
    {
        let mut out = String::new();
        if let Some(root) = &self.root {
            render_node(&*self.store, root, "", &mut out)?;
        }
        Ok(out)
    }
}

fn render_node<K, V, R>(store: &R, node: &Node<K, V>, indent: &str, out: &mut String) -> Result<()>
where
    K: Display,
    R: ReadableNodeStore<K, V> + ?Sized,
{
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("{}{}({})", indent, node.key, node.count));

    if let Some(left) = load_child(store, node.left_id.as_ref())? {
        render_node(store, &left, &format!("{}l:", indent), out)?;
    }
    if let Some(right) = load_child(store, node.right_id.as_ref())? {
        render_node(store, &right, &format!("{}r:", indent), out)?;
    }
    Ok(())
}
