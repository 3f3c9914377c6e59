//! 旋转与重新平衡
//!
//! 旋转从不修改已有记录：参与旋转的两个节点都先经过 `Transaction::clone_node`
//! 得到新 id，再暂存副本。

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::{BalanceState, Node};
use crate::store::{ReadableNodeStore, Result, Transaction};

use super::helpers::{balance_state, child_count, child_height, refresh, require_child};

/// 右旋
///
/// ```text
///       b                     a
///      / \                   / \
///     a   e   -> 右旋 ->    c   b
///    / \                       / \
///   c   d                     d   e
/// ```
///
/// # Panics
///
/// `root` 没有左子节点时 panic。
pub(super) fn rotate_right<K, V, S>(
    txn: &mut Transaction<'_, K, V, S>,
    root: Node<K, V>,
) -> Result<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
{
    let left = require_child(&*txn, root.left_id.as_ref(), "cannot rotate right without a left child")?;

    let mut a = txn.clone_node(&left);
    let mut b = txn.clone_node(&root);

    b.left_id = a.right_id;
    a.right_id = Some(b.id);
    refresh(&*txn, &mut b)?;
    a.height = child_height(&*txn, a.left_id.as_ref())?.max(b.height) + 1;
    a.count = child_count(&*txn, a.left_id.as_ref())? + b.count + 1;

    txn.set(b);
    txn.set(a.clone());
    Ok(a)
}

/// 左旋
///
/// ```text
///     a                         b
///    / \                       / \
///   c   b     -> 左旋 ->      a   e
///      / \                   / \
///     d   e                 c   d
/// ```
///
/// # Panics
///
/// `root` 没有右子节点时 panic。
pub(super) fn rotate_left<K, V, S>(
    txn: &mut Transaction<'_, K, V, S>,
    root: Node<K, V>,
) -> Result<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
{
    let right = require_child(&*txn, root.right_id.as_ref(), "cannot rotate left without a right child")?;

    let mut b = txn.clone_node(&right);
    let mut a = txn.clone_node(&root);

    a.right_id = b.left_id;
    b.left_id = Some(a.id);
    refresh(&*txn, &mut a)?;
    b.height = child_height(&*txn, b.right_id.as_ref())?.max(a.height) + 1;
    b.count = child_count(&*txn, b.right_id.as_ref())? + a.count + 1;

    txn.set(a);
    txn.set(b.clone());
    Ok(b)
}

/// 插入后的单节点重新平衡
///
/// 失衡方向由刚插入的 key 决定：在较高子节点的外侧做单旋，内侧做双旋。
/// 返回的节点已暂存。
pub(super) fn rebalance_insert<K, V, S, C>(
    txn: &mut Transaction<'_, K, V, S>,
    cmp: &C,
    key: &K,
    mut node: Node<K, V>,
) -> Result<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    match refresh(&*txn, &mut node)? {
        BalanceState::UnbalancedLeft => {
            let left = require_child(&*txn, node.left_id.as_ref(), "left child must exist")?;
            if cmp.compare(key, &left.key) == Ordering::Less {
                // left-left
                rotate_right(txn, node)
            } else {
                // left-right
                node.left_id = Some(rotate_left(txn, left)?.id);
                rotate_right(txn, node)
            }
        }
        BalanceState::UnbalancedRight => {
            let right = require_child(&*txn, node.right_id.as_ref(), "right child must exist")?;
            if cmp.compare(key, &right.key) == Ordering::Greater {
                // right-right
                rotate_left(txn, node)
            } else {
                // right-left
                node.right_id = Some(rotate_right(txn, right)?.id);
                rotate_left(txn, node)
            }
        }
        _ => {
            txn.set(node.clone());
            Ok(node)
        }
    }
}

/// 删除后的单节点重新平衡
///
/// 被删除的 key 已不在树中，只能根据较高子节点自身的平衡状态选择单旋或双旋。
/// 返回的节点已暂存。
pub(super) fn rebalance_remove<K, V, S>(
    txn: &mut Transaction<'_, K, V, S>,
    mut node: Node<K, V>,
) -> Result<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
{
    match refresh(&*txn, &mut node)? {
        BalanceState::UnbalancedLeft => {
            let left = require_child(&*txn, node.left_id.as_ref(), "left child must exist")?;
            match balance_state(&*txn, &left)? {
                BalanceState::Balanced | BalanceState::SlightlyUnbalancedLeft => {
                    rotate_right(txn, node)
                }
                BalanceState::SlightlyUnbalancedRight => {
                    node.left_id = Some(rotate_left(txn, left)?.id);
                    rotate_right(txn, node)
                }
                state => panic!("left child {} is {:?}", left.id, state),
            }
        }
        BalanceState::UnbalancedRight => {
            let right = require_child(&*txn, node.right_id.as_ref(), "right child must exist")?;
            match balance_state(&*txn, &right)? {
                BalanceState::Balanced | BalanceState::SlightlyUnbalancedRight => {
                    rotate_left(txn, node)
                }
                BalanceState::SlightlyUnbalancedLeft => {
                    node.right_id = Some(rotate_right(txn, right)?.id);
                    rotate_left(txn, node)
                }
                state => panic!("right child {} is {:?}", right.id, state),
            }
        }
        _ => {
            txn.set(node.clone());
            Ok(node)
        }
    }
}
