//! 删除操作

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::Node;
use crate::store::{ReadableNodeStore, Result, Transaction};

use super::helpers::{clone_path, load_child, min_node, rebalance_path, relink};
use super::lookup::find_path;
use super::rotate::rebalance_remove;

/// 删除 key，返回新的根（树变空时返回 None）
///
/// key 不存在不是错误：返回原来的根，且不暂存任何写入。
/// 查找路径在复制之前就会确认是否精确匹配，因此批次中之前暂存的节点不会被撤销。
///
/// # 删除点的三种情况
///
/// - 没有子节点：父节点断开指针；若是根则树变空
/// - 一个子节点：父节点直接指向该子节点；若是根则复制子节点作为新根
/// - 两个子节点：用右子树的最小节点（中序后继）的 key/value 填充当前节点，
///   再从右子树中递归删除后继（后继至多一个子节点，递归只有一层）
pub fn remove<K, V, S, C>(
    txn: &mut Transaction<'_, K, V, S>,
    cmp: &C,
    root: Option<&Node<K, V>>,
    key: &K,
) -> Result<Option<Node<K, V>>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    let root = match root {
        Some(root) => root,
        None => return Ok(None),
    };

    let path = find_path(&*txn, cmp, Some(root), key)?;
    let found = matches!(path.last(), Some(last) if cmp.compare(key, &last.key) == Ordering::Equal);
    if !found {
        return Ok(Some(root.clone()));
    }

    let mut stack = clone_path(txn, path);
    let mut last = match stack.pop() {
        Some(last) => last,
        None => unreachable!("matched path is non-empty"),
    };

    let left = load_child(&*txn, last.left_id.as_ref())?;
    let right = load_child(&*txn, last.right_id.as_ref())?;

    match (left, right) {
        (None, None) => match stack.last_mut() {
            Some(parent) => relink(parent, &last.id, None),
            None => return Ok(None),
        },
        (Some(child), None) | (None, Some(child)) => match stack.last_mut() {
            Some(parent) => relink(parent, &last.id, Some(child.id)),
            None => {
                let promoted = txn.clone_node(&child);
                txn.set(promoted.clone());
                stack.push(promoted);
            }
        },
        (Some(_), Some(right)) => {
            let successor = min_node(&*txn, right.clone())?;
            let new_right = remove(txn, cmp, Some(&right), &successor.key)?;
            last.key = successor.key;
            last.value = successor.value;
            last.right_id = new_right.map(|n| n.id);
            txn.set(last.clone());
            stack.push(last);
        }
    }

    rebalance_path(txn, stack, rebalance_remove).map(Some)
}
