//! 定位操作：begin / end / find / at / ge / gt / le / lt

use std::cmp::Ordering;

use crate::compare::KeyComparator;
use crate::node::Node;
use crate::store::{ReadableNodeStore, Result};
use crate::tree::find_path;
use crate::tree::helpers::load_child;

use super::core::Cursor;

/// 方向定位的边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// >=
    Ge,
    /// >
    Gt,
    /// <=
    Le,
    /// <
    Lt,
}

impl Bound {
    /// 节点是否满足关系（`ord` = compare(key, node.key)）
    #[inline]
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            Bound::Ge => ord != Ordering::Greater,
            Bound::Gt => ord == Ordering::Less,
            Bound::Le => ord != Ordering::Less,
            Bound::Lt => ord == Ordering::Greater,
        }
    }

    /// 是否继续向左下降
    #[inline]
    fn descends_left(self, ord: Ordering) -> bool {
        match self {
            Bound::Ge | Bound::Lt => ord != Ordering::Greater,
            Bound::Gt | Bound::Le => ord == Ordering::Less,
        }
    }
}

impl<'a, K, V, R> Cursor<'a, K, V, R>
where
    K: Clone,
    V: Clone,
    R: ReadableNodeStore<K, V> + ?Sized,
{
    /// 最小 key 的位置（最左路径）
    pub fn begin(store: &'a R, root: Option<&Node<K, V>>) -> Result<Self> {
        let mut cursor = Self::invalid(store, root);
        if let Some(root) = root {
            cursor.descend(root.clone(), |n| n.left_id)?;
        }
        Ok(cursor)
    }

    /// 最大 key 的位置（最右路径）
    pub fn end(store: &'a R, root: Option<&Node<K, V>>) -> Result<Self> {
        let mut cursor = Self::invalid(store, root);
        if let Some(root) = root {
            cursor.descend(root.clone(), |n| n.right_id)?;
        }
        Ok(cursor)
    }

    /// 精确定位，key 不存在时返回无效 cursor
    pub fn find<C>(store: &'a R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        let path = find_path(store, cmp, root, key)?;
        match path.last() {
            Some(last) if cmp.compare(key, &last.key) == Ordering::Equal => {
                Ok(Self::from_stack(store, root, path))
            }
            _ => Ok(Self::invalid(store, root)),
        }
    }

    /// 按排名定位（从 0 开始），越界时返回无效 cursor
    ///
    /// 利用子树 count 做顺序统计下降，每层只读取左右子节点。
    pub fn at(store: &'a R, root: Option<&Node<K, V>>, index: usize) -> Result<Self> {
        let mut node = match root {
            Some(root) => root.clone(),
            None => return Ok(Self::invalid(store, root)),
        };

        let mut rank = index;
        let mut stack = Vec::new();
        loop {
            if let Some(left) = load_child(store, node.left_id.as_ref())? {
                if rank < left.count {
                    stack.push(node);
                    node = left;
                    continue;
                }
                rank -= left.count;
            }
            if rank == 0 {
                stack.push(node);
                return Ok(Self::from_stack(store, root, stack));
            }
            rank -= 1;
            match load_child(store, node.right_id.as_ref())? {
                Some(right) if rank < right.count => {
                    stack.push(node);
                    node = right;
                }
                _ => return Ok(Self::invalid(store, root)),
            }
        }
    }

    /// 第一个 >= key 的位置
    pub fn ge<C>(store: &'a R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        Self::seek(store, cmp, root, key, Bound::Ge)
    }

    /// 第一个 > key 的位置
    pub fn gt<C>(store: &'a R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        Self::seek(store, cmp, root, key, Bound::Gt)
    }

    /// 最后一个 <= key 的位置
    pub fn le<C>(store: &'a R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        Self::seek(store, cmp, root, key, Bound::Le)
    }

    /// 最后一个 < key 的位置
    pub fn lt<C>(store: &'a R, cmp: &C, root: Option<&Node<K, V>>, key: &K) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        Self::seek(store, cmp, root, key, Bound::Lt)
    }

    /// 单次下降，记录最深的满足关系的节点，最后把路径截断到该节点
    fn seek<C>(
        store: &'a R,
        cmp: &C,
        root: Option<&Node<K, V>>,
        key: &K,
        bound: Bound,
    ) -> Result<Self>
    where
        C: KeyComparator<K> + ?Sized,
    {
        let mut stack = Vec::new();
        let mut last_match = 0;
        let mut next = root.cloned();
        while let Some(node) = next {
            let ord = cmp.compare(key, &node.key);
            let child = if bound.descends_left(ord) {
                node.left_id
            } else {
                node.right_id
            };
            next = load_child(store, child.as_ref())?;
            stack.push(node);
            if bound.accepts(ord) {
                last_match = stack.len();
            }
        }
        stack.truncate(last_match);
        Ok(Self::from_stack(store, root, stack))
    }
}
