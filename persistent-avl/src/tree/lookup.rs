//! 查找操作

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::Node;
use crate::store::{ReadableNodeStore, Result};

use super::helpers::load_child;

/// 查找 key 对应的值
///
/// 迭代式 BST 下降，不产生任何写入。
///
/// # 返回
///
/// - `Ok(Some(value))`: 找到匹配的 key
/// - `Ok(None)`: key 不存在
/// - `Err(_)`: 存储错误
pub fn get<K, V, R, C>(store: &R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Option<V>>
where
    V: Clone,
    R: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    let mut owned: Node<K, V>;
    let mut node = match root {
        Some(root) => root,
        None => return Ok(None),
    };
    loop {
        let child = match cmp.compare(key, &node.key) {
            Ordering::Less => node.left_id.as_ref(),
            Ordering::Greater => node.right_id.as_ref(),
            Ordering::Equal => return Ok(Some(node.value.clone())),
        };
        match load_child(store, child)? {
            Some(next) => {
                owned = next;
                node = &owned;
            }
            None => return Ok(None),
        }
    }
}

/// 查找从根到 key（或最接近 key 的位置）的路径
///
/// 在精确匹配处停止；否则停在掉出树之前访问的最后一个节点，
/// 即插入/删除点。路径为空当且仅当树为空。
pub fn find_path<K, V, R, C>(
    store: &R,
    cmp: &C,
    root: Option<&Node<K, V>>,
    key: &K,
) -> Result<Vec<Node<K, V>>>
where
    K: Clone,
    V: Clone,
    R: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K> + ?Sized,
{
    let mut path = Vec::new();
    let mut next = root.cloned();
    while let Some(node) = next {
        next = match cmp.compare(key, &node.key) {
            Ordering::Less => load_child(store, node.left_id.as_ref())?,
            Ordering::Greater => load_child(store, node.right_id.as_ref())?,
            Ordering::Equal => None,
        };
        path.push(node);
    }
    Ok(path)
}
