//! Key 比较器抽象层
//!
//! 树对 key 类型只有一个要求：调用方提供的全序比较器。
//! 比较器在树的整个生命周期内必须保持一致，中途更换比较器会破坏 BST 顺序。

use std::cmp::Ordering;

/// Key 比较器 trait
///
/// 所有实现必须满足：
/// 1. 全序：任意两个 key 都可比较
/// 2. 稳定：同一棵树的生命周期内结果不变
pub trait KeyComparator<K: ?Sized>: Send + Sync {
    /// 比较两个 key
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// 基于 `Ord` 的默认比较器
#[derive(Debug, Default, Clone, Copy)]
pub struct OrdComparator;

impl<K: Ord + ?Sized> KeyComparator<K> for OrdComparator {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// 闭包比较器，例如浮点数或逆序比较
impl<K: ?Sized, F> KeyComparator<K> for F
where
    F: Fn(&K, &K) -> Ordering + Send + Sync,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
