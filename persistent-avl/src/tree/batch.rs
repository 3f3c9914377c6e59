//! 批量写入
//!
//! 多个 insert / remove 共享同一个事务和不断更新的根，最后一次性提交。
//! 中间产生的、随后又被复制的节点不会进入最终批次。

use log::debug;

use crate::compare::KeyComparator;
use crate::cursor::Cursor;
use crate::node::Node;
use crate::store::{NodeStore, Result, Transaction, TransactionStats};

use super::core::AvlTree;
use super::insert::insert;
use super::lookup::get;
use super::remove::remove;

/// 批量操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp<K, V> {
    /// 插入或覆盖
    Insert(K, V),
    /// 删除（key 不存在时无操作）
    Remove(K),
}

/// 批量写入器
///
/// # 使用示例
///
/// ```ignore
/// let mut batch = tree.batch();
/// batch.insert(1, "one")?.insert(2, "two")?.remove(&3)?;
/// let tree = batch.commit()?;
/// ```
///
/// 操作立即作用于事务中的根；drop 未提交的批次等于回滚。
pub struct TreeBatch<'t, K, V, S: ?Sized, C> {
    tree: &'t AvlTree<K, V, S, C>,
    txn: Transaction<'t, K, V, S>,
    root: Option<Node<K, V>>,
    ops: usize,
}

impl<K, V, S, C> AvlTree<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: NodeStore<K, V> + ?Sized,
    C: KeyComparator<K>,
{
    /// 以当前根为起点开启批量写入
    pub fn batch(&self) -> TreeBatch<'_, K, V, S, C> {
        TreeBatch {
            tree: self,
            txn: Transaction::new(&*self.store),
            root: self.root.clone(),
            ops: 0,
        }
    }

    /// 在一个批次中应用全部操作，返回新版本的树
    pub fn apply<I>(&self, ops: I) -> Result<Self>
    where
        I: IntoIterator<Item = BatchOp<K, V>>,
    {
        let mut batch = self.batch();
        batch.extend(ops)?;
        batch.commit()
    }
}

impl<'t, K, V, S, C> TreeBatch<'t, K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: NodeStore<K, V> + ?Sized,
    C: KeyComparator<K>,
{
    /// 插入或覆盖
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut Self> {
        let root = insert(&mut self.txn, &*self.tree.cmp, self.root.as_ref(), key, value)?;
        self.root = Some(root);
        self.ops += 1;
        Ok(self)
    }

    /// 删除
    pub fn remove(&mut self, key: &K) -> Result<&mut Self> {
        self.root = remove(&mut self.txn, &*self.tree.cmp, self.root.as_ref(), key)?;
        self.ops += 1;
        Ok(self)
    }

    /// 应用单个操作
    pub fn apply(&mut self, op: BatchOp<K, V>) -> Result<&mut Self> {
        match op {
            BatchOp::Insert(key, value) => self.insert(key, value),
            BatchOp::Remove(key) => self.remove(&key),
        }
    }

    /// 依次应用多个操作
    pub fn extend<I>(&mut self, ops: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = BatchOp<K, V>>,
    {
        for op in ops {
            self.apply(op)?;
        }
        Ok(self)
    }

    /// 在批次当前状态下查找（能看到未提交的写入）
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        get(&self.txn, &*self.tree.cmp, self.root.as_ref(), key)
    }

    /// 在批次当前状态下打开 cursor
    pub fn begin(&self) -> Result<Cursor<'_, K, V, Transaction<'t, K, V, S>>> {
        Cursor::begin(&self.txn, self.root.as_ref())
    }

    /// 批次当前的根
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_ref()
    }

    /// 批次当前的 key 数量
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.count)
    }

    /// 批次当前是否为空树
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 已应用的操作数
    pub fn op_count(&self) -> usize {
        self.ops
    }

    /// 事务统计
    pub fn stats(&self) -> TransactionStats {
        self.txn.stats()
    }

    /// 提交批次，返回新版本的树
    pub fn commit(self) -> Result<AvlTree<K, V, S, C>> {
        let stats = self.txn.commit()?;
        debug!(
            "batch of {} ops committed, {} nodes written",
            self.ops, stats.nodes_flushed
        );
        Ok(self.tree.with_new_root(self.root))
    }
}
