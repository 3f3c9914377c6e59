//! 结构校验

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::Node;
use crate::store::{ReadableNodeStore, Result, StoreError};

use super::core::AvlTree;
use super::helpers::load_child;

impl<K, V, S, C> AvlTree<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K>,
{
    /// 遍历整棵树检查不变量
    ///
    /// - BST 顺序：左子树的 key 都小于节点，右子树的 key 都大于节点
    /// - AVL 平衡：左右子树高度差不超过 1
    /// - 记录的 height / count 与子树实际情况一致
    ///
    /// # 返回
    ///
    /// - `Ok(n)`: 树合法，共 n 个 key
    /// - `Err(StoreError::Corrupted(_))`: 发现不变量被破坏
    /// - `Err(_)`: 存储错误
    pub fn validate(&self) -> Result<usize> {
        match &self.root {
            Some(root) => {
                let (_, count) = check_subtree(&*self.store, &*self.cmp, root, None, None)?;
                Ok(count)
            }
            None => Ok(0),
        }
    }
}

/// 递归检查子树，返回 (height, count)
///
/// `lower` / `upper` 是祖先给出的开区间边界。
fn check_subtree<K, V, R, C>(
    store: &R,
    cmp: &C,
    node: &Node<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<(i32, usize)>
where
    R: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    if let Some(lower) = lower {
        if cmp.compare(&node.key, lower) != Ordering::Greater {
            return Err(corrupted(node, "key is not greater than its lower bound"));
        }
    }
    if let Some(upper) = upper {
        if cmp.compare(&node.key, upper) != Ordering::Less {
            return Err(corrupted(node, "key is not less than its upper bound"));
        }
    }

    let (left_height, left_count) = match load_child(store, node.left_id.as_ref())? {
        Some(left) => check_subtree(store, cmp, &left, lower, Some(&node.key))?,
        None => (-1, 0),
    };
    let (right_height, right_count) = match load_child(store, node.right_id.as_ref())? {
        Some(right) => check_subtree(store, cmp, &right, Some(&node.key), upper)?,
        None => (-1, 0),
    };

    if (left_height - right_height).abs() > 1 {
        return Err(corrupted(
            node,
            &format!("unbalanced: left height {}, right height {}", left_height, right_height),
        ));
    }

    let height = left_height.max(right_height) + 1;
    if node.height != height {
        return Err(corrupted(
            node,
            &format!("recorded height {}, actual {}", node.height, height),
        ));
    }

    let count = left_count + right_count + 1;
    if node.count != count {
        return Err(corrupted(
            node,
            &format!("recorded count {}, actual {}", node.count, count),
        ));
    }

    Ok((height, count))
}

fn corrupted<K, V>(node: &Node<K, V>, reason: &str) -> StoreError {
    StoreError::Corrupted(format!("node {}: {}", node.id, reason))
}
