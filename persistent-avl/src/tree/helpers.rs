//! 辅助函数

use crate::node::{BalanceState, Node, NodeId};
use crate::store::{ReadableNodeStore, Result, StoreError, Transaction};

/// 读取子节点
///
/// `id` 为 None 返回 None；`id` 存在但存储中没有对应记录说明树已损坏，返回 `NotFound`。
pub(crate) fn load_child<K, V, R>(store: &R, id: Option<&NodeId>) -> Result<Option<Node<K, V>>>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    match id {
        Some(id) => {
            let node = store.read_node(id)?.ok_or(StoreError::NotFound)?;
            Ok(Some(node))
        }
        None => Ok(None),
    }
}

/// 读取结构上必须存在的子节点
///
/// # Panics
///
/// `id` 为 None 时 panic：调用方的结构前提被破坏（例如没有左子节点却要右旋）。
pub(super) fn require_child<K, V, R>(store: &R, id: Option<&NodeId>, what: &str) -> Result<Node<K, V>>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    match load_child(store, id)? {
        Some(node) => Ok(node),
        None => panic!("{}", what),
    }
}

/// 子树高度，缺失为 -1
pub(super) fn child_height<K, V, R>(store: &R, id: Option<&NodeId>) -> Result<i32>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    Ok(load_child(store, id)?.map_or(-1, |n| n.height))
}

/// 子树大小，缺失为 0
pub(crate) fn child_count<K, V, R>(store: &R, id: Option<&NodeId>) -> Result<usize>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    Ok(load_child(store, id)?.map_or(0, |n| n.count))
}

/// 计算节点的平衡状态
pub(super) fn balance_state<K, V, R>(store: &R, node: &Node<K, V>) -> Result<BalanceState>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    let left = child_height(store, node.left_id.as_ref())?;
    let right = child_height(store, node.right_id.as_ref())?;
    Ok(BalanceState::from_heights(left, right))
}

/// 根据子节点重新计算 height 和 count，并返回平衡状态
pub(super) fn refresh<K, V, R>(store: &R, node: &mut Node<K, V>) -> Result<BalanceState>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    let left = load_child(store, node.left_id.as_ref())?;
    let right = load_child(store, node.right_id.as_ref())?;

    let (left_height, left_count) = left.map_or((-1, 0), |n| (n.height, n.count));
    let (right_height, right_count) = right.map_or((-1, 0), |n| (n.height, n.count));

    node.height = left_height.max(right_height) + 1;
    node.count = left_count + right_count + 1;
    Ok(BalanceState::from_heights(left_height, right_height))
}

/// 将父节点中指向 `old` 的指针改为 `new`
///
/// # Panics
///
/// `old` 不是 `parent` 的子节点时 panic（路径栈与树结构不一致）。
pub(super) fn relink<K, V>(parent: &mut Node<K, V>, old: &NodeId, new: Option<NodeId>) {
    if !parent.relink_child(old, new) {
        panic!("node {} is not a child of {}", old, parent.id);
    }
}

/// 复制整条路径（copy-on-write spine）
///
/// 先复制根，再依次复制后续节点，并把上一个副本的子指针改到新副本上。
/// 返回的副本都尚未暂存，由调用方在重新平衡时写入事务。
pub(super) fn clone_path<K, V, S>(
    txn: &mut Transaction<'_, K, V, S>,
    path: Vec<Node<K, V>>,
) -> Vec<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ?Sized,
{
    let mut cloned: Vec<Node<K, V>> = Vec::with_capacity(path.len());
    for node in path {
        let copy = txn.clone_node(&node);
        if let Some(parent) = cloned.last_mut() {
            relink(parent, &node.id, Some(copy.id));
        }
        cloned.push(copy);
    }
    cloned
}

/// 自底向上重新平衡路径
///
/// 依次弹出路径上的节点交给 `rebalance`；节点 id 发生变化（发生了旋转）时
/// 修正父节点指针，再处理父节点。返回新的子树根。
///
/// # Panics
///
/// 路径为空时 panic。
pub(super) fn rebalance_path<'a, K, V, S, F>(
    txn: &mut Transaction<'a, K, V, S>,
    mut stack: Vec<Node<K, V>>,
    mut rebalance: F,
) -> Result<Node<K, V>>
where
    S: ?Sized,
    F: FnMut(&mut Transaction<'a, K, V, S>, Node<K, V>) -> Result<Node<K, V>>,
{
    while let Some(node) = stack.pop() {
        let old_id = node.id;
        // 旋转会让栈中剩余部分失效，只能通过 pop 访问
        let balanced = rebalance(txn, node)?;
        match stack.last_mut() {
            Some(parent) => {
                if balanced.id != old_id {
                    relink(parent, &old_id, Some(balanced.id));
                }
            }
            None => return Ok(balanced),
        }
    }
    panic!("rebalance on an empty path");
}

/// 子树中的最小节点
pub fn min_node<K, V, R>(store: &R, root: Node<K, V>) -> Result<Node<K, V>>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    let mut current = root;
    while let Some(left) = load_child(store, current.left_id.as_ref())? {
        current = left;
    }
    Ok(current)
}

/// 子树中的最大节点
pub fn max_node<K, V, R>(store: &R, root: Node<K, V>) -> Result<Node<K, V>>
where
    R: ReadableNodeStore<K, V> + ?Sized,
{
    let mut current = root;
    while let Some(right) = load_child(store, current.right_id.as_ref())? {
        current = right;
    }
    Ok(current)
}
