//! 插入操作

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::Node;
use crate::store::{ReadableNodeStore, Result, Transaction};

use super::helpers::{clone_path, rebalance_path};
use super::lookup::find_path;
use super::rotate::rebalance_insert;

/// 插入 key-value 对，返回新的根
///
/// # 流程
///
/// 1. 空树：新建叶子作为根
/// 2. `find_path` 找到插入点，复制整条路径
/// 3. 精确匹配：覆盖副本上的值，暂存路径，结构不变
/// 4. 否则在路径末端挂上新叶子
/// 5. 自底向上逐个节点重新计算 height/count 并按需旋转
///
/// 所有写入都暂存在 `txn` 中，调用方负责提交。
pub fn insert<K, V, S, C>(
    txn: &mut Transaction<'_, K, V, S>,
    cmp: &C,
    root: Option<&Node<K, V>>,
    key: K,
    value: V,
) -> Result<Node<K, V>>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    let root = match root {
        Some(root) => root,
        None => {
            let leaf = Node::new(key, value);
            txn.set(leaf.clone());
            return Ok(leaf);
        }
    };

    let path = find_path(&*txn, cmp, Some(root), &key)?;
    let mut stack = clone_path(txn, path);

    let last = match stack.last_mut() {
        Some(last) => last,
        None => unreachable!("path of a non-empty tree is non-empty"),
    };
    match cmp.compare(&key, &last.key) {
        Ordering::Equal => {
            // 重复 key：覆盖值，count 不变
            last.value = value;
            for node in &stack {
                txn.set(node.clone());
            }
            return Ok(stack.swap_remove(0));
        }
        Ordering::Less => {
            let leaf = Node::new(key.clone(), value);
            last.left_id = Some(leaf.id);
            stack.push(leaf);
        }
        Ordering::Greater => {
            let leaf = Node::new(key.clone(), value);
            last.right_id = Some(leaf.id);
            stack.push(leaf);
        }
    }

    rebalance_path(txn, stack, |txn, node| {
        rebalance_insert(txn, cmp, &key, node)
    })
}
