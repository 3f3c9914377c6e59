//! Cursor 核心结构体与移动操作

use std::fmt;

use crate::node::{Node, NodeId};
use crate::store::{ReadableNodeStore, Result};
use crate::tree::helpers::{child_count, load_child};

/// 树中的一个位置
///
/// 用从根到当前节点的路径栈表示位置；空栈是统一的无效位置，
/// 同时代表"第一个之前"和"最后一个之后"。
///
/// Cursor 只读：移动时只从 `store` 读取节点，从不暂存写入。
/// 传入 `Transaction` 作为 `store` 时可以看到事务中未提交的写入。
pub struct Cursor<'a, K, V, R: ?Sized> {
    pub(super) store: &'a R,
    pub(super) stack: Vec<Node<K, V>>,
    /// 整棵树的节点数（空栈时 `index()` 的返回值）
    pub(super) total: usize,
}

impl<'a, K, V, R: ?Sized> Cursor<'a, K, V, R> {
    /// 用已有路径构造 cursor
    pub(super) fn from_stack(store: &'a R, root: Option<&Node<K, V>>, stack: Vec<Node<K, V>>) -> Self {
        Self {
            store,
            stack,
            total: root.map_or(0, |r| r.count),
        }
    }

    /// 无效 cursor
    pub(super) fn invalid(store: &'a R, root: Option<&Node<K, V>>) -> Self {
        Self::from_stack(store, root, Vec::new())
    }

    /// 当前节点
    #[inline]
    pub fn node(&self) -> Option<&Node<K, V>> {
        self.stack.last()
    }

    /// 当前 key
    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.node().map(|n| &n.key)
    }

    /// 当前 value
    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.node().map(|n| &n.value)
    }

    /// 是否指向某个节点
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.stack.is_empty()
    }

    /// 路径深度（根为 1，无效时为 0）
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// 从根到当前节点的路径
    pub fn path(&self) -> &[Node<K, V>] {
        &self.stack
    }

    /// 置为无效
    pub(crate) fn invalidate(&mut self) {
        self.stack.clear();
    }

    /// 是否存在后继
    ///
    /// 当前节点有右子节点，或路径上某个节点是其父节点的左子节点。
    pub fn has_next(&self) -> bool {
        match self.stack.last() {
            Some(top) if top.right_id.is_some() => true,
            Some(_) => self
                .stack
                .windows(2)
                .any(|pair| pair[0].left_id == Some(pair[1].id)),
            None => false,
        }
    }

    /// 是否存在前驱
    pub fn has_prev(&self) -> bool {
        match self.stack.last() {
            Some(top) if top.left_id.is_some() => true,
            Some(_) => self
                .stack
                .windows(2)
                .any(|pair| pair[0].right_id == Some(pair[1].id)),
            None => false,
        }
    }

    fn current_id(&self, op: &str) -> NodeId {
        match self.stack.last() {
            Some(node) => node.id,
            None => panic!("{}() called on an invalid cursor", op),
        }
    }
}

impl<'a, K, V, R> Cursor<'a, K, V, R>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    /// 移动到中序后继
    ///
    /// 有右子节点时下降到右子树的最左节点；否则沿路径回退，
    /// 直到当前子树是某个祖先的左子树。没有后继时变为无效。
    ///
    /// # Panics
    ///
    /// 在无效 cursor 上调用时 panic。
    pub fn next(&mut self) -> Result<()> {
        let current = self.current_id("next");
        let right_id = self.stack.last().and_then(|n| n.right_id);

        match load_child(self.store, right_id.as_ref())? {
            Some(right) => self.descend(right, |n| n.left_id)?,
            None => {
                self.stack.pop();
                let mut child = current;
                while let Some(parent) = self.stack.last() {
                    if parent.right_id != Some(child) {
                        break;
                    }
                    child = parent.id;
                    self.stack.pop();
                }
            }
        }
        Ok(())
    }

    /// 移动到中序前驱
    ///
    /// # Panics
    ///
    /// 在无效 cursor 上调用时 panic。
    pub fn prev(&mut self) -> Result<()> {
        let current = self.current_id("prev");
        let left_id = self.stack.last().and_then(|n| n.left_id);

        match load_child(self.store, left_id.as_ref())? {
            Some(left) => self.descend(left, |n| n.right_id)?,
            None => {
                self.stack.pop();
                let mut child = current;
                while let Some(parent) = self.stack.last() {
                    if parent.left_id != Some(child) {
                        break;
                    }
                    child = parent.id;
                    self.stack.pop();
                }
            }
        }
        Ok(())
    }

    /// 当前节点在有序序列中的位置（从 0 开始）
    ///
    /// 等于当前节点左子树大小，加上路径上每个"从右链接到达"的祖先贡献的
    /// `1 + 祖先左子树大小`。无效 cursor 返回整棵树的大小。
    pub fn index(&self) -> Result<usize> {
        let top = match self.stack.last() {
            Some(top) => top,
            None => return Ok(self.total),
        };

        let mut idx = child_count(self.store, top.left_id.as_ref())?;
        for pair in self.stack.windows(2).rev() {
            let (parent, child) = (&pair[0], &pair[1]);
            if parent.right_id == Some(child.id) {
                idx += 1 + child_count(self.store, parent.left_id.as_ref())?;
            }
        }
        Ok(idx)
    }

    /// 从 `start` 开始沿 `next_id` 一路下降，压入经过的每个节点
    pub(super) fn descend(
        &mut self,
        start: Node<K, V>,
        next_id: impl Fn(&Node<K, V>) -> Option<NodeId>,
    ) -> Result<()> {
        let mut next = Some(start);
        while let Some(node) = next {
            next = load_child(self.store, next_id(&node).as_ref())?;
            self.stack.push(node);
        }
        Ok(())
    }
}

impl<'a, K: Clone, V: Clone, R: ?Sized> Clone for Cursor<'a, K, V, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            stack: self.stack.clone(),
            total: self.total,
        }
    }
}

impl<'a, K: fmt::Debug, V, R: ?Sized> fmt::Debug for Cursor<'a, K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("key", &self.key())
            .field("depth", &self.depth())
            .field("total", &self.total)
            .finish()
    }
}
