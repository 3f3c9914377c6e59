//! 写缓冲 + 读穿透缓存的事务层
//!
//! - get 操作：先查待写集合，再查读缓存（包括缓存的"不存在"结果），都未命中才读取底层存储
//! - set 操作：写入待写集合，同时更新读缓存，之后的 get 立即可见
//! - clone 操作：为节点分配新 id，同时撤销旧 id 的待写记录，避免提交已被替代的节点
//! - commit 操作：把待写集合作为一个批次写入底层存储

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::error::Result;
use super::traits::{NodeStore, ReadableNodeStore};
use crate::node::{Node, NodeId};

/// 事务统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionStats {
    /// 命中待写集合的读取次数
    pub pending_hits: u64,
    /// 命中读缓存的读取次数
    pub cache_hits: u64,
    /// 读穿透到底层存储的次数
    pub cache_misses: u64,
    /// clone 次数
    pub clones: u64,
    /// 被 clone 撤销的待写记录数
    pub superseded: u64,
    /// commit 时写入的节点数
    pub nodes_flushed: u64,
}

impl TransactionStats {
    /// 缓存命中率（待写命中也算命中）
    pub fn hit_rate(&self) -> f64 {
        let hits = self.pending_hits + self.cache_hits;
        let total = hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// 节点事务
///
/// 一次变更（或一个批次）独占一个事务；事务不能跨线程共享，
/// 多个并发写者必须各自持有独立的事务。
///
/// # 使用示例
///
/// ```ignore
/// let mut txn = Transaction::new(&store);
/// let root = tree::insert(&mut txn, &OrdComparator, None, 1, "one")?;
/// let stats = txn.commit()?;
/// ```
///
/// `commit` 消耗事务本身，提交后无法再次使用；
/// 未提交就被 drop 的事务丢弃全部待写记录（回滚）。
pub struct Transaction<'a, K, V, S: ?Sized> {
    /// 底层存储
    store: &'a S,
    /// 读缓存，`None` 表示底层存储中不存在
    cache: RefCell<HashMap<NodeId, Option<Node<K, V>>>>,
    /// 待写集合
    writes: HashMap<NodeId, Node<K, V>>,
    /// 统计
    stats: RefCell<TransactionStats>,
}

impl<'a, K, V, S: ?Sized> Transaction<'a, K, V, S> {
    /// 在给定存储上开启事务
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cache: RefCell::new(HashMap::new()),
            writes: HashMap::new(),
            stats: RefCell::new(TransactionStats::default()),
        }
    }

    /// 获取底层存储
    pub fn store(&self) -> &'a S {
        self.store
    }

    /// 暂存节点
    ///
    /// 同一个 id 重复 set 时后写覆盖先写。
    pub fn set(&mut self, node: Node<K, V>)
    where
        K: Clone,
        V: Clone,
    {
        self.cache.get_mut().insert(node.id, Some(node.clone()));
        self.writes.insert(node.id, node);
    }

    /// 复制节点并分配新 id
    ///
    /// 旧 id 的待写记录被撤销：旧 id 从未提交过，撤销后也不会再被引用。
    /// 返回的副本尚未暂存，调用方负责 `set` 并修正父节点指针。
    pub fn clone_node(&mut self, node: &Node<K, V>) -> Node<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let stats = self.stats.get_mut();
        stats.clones += 1;
        if self.writes.remove(&node.id).is_some() {
            self.cache.get_mut().remove(&node.id);
            stats.superseded += 1;
        }

        let mut copy = node.clone();
        copy.id = NodeId::random();
        trace!("clone node {} -> {}", node.id, copy.id);
        copy
    }

    /// 待写节点数
    pub fn pending_count(&self) -> usize {
        self.writes.len()
    }

    /// 给定 id 是否有待写记录
    pub fn is_pending(&self, id: &NodeId) -> bool {
        self.writes.contains_key(id)
    }

    /// 待写节点 id（无序）
    pub fn pending_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.writes.keys()
    }

    /// 获取统计的副本
    pub fn stats(&self) -> TransactionStats {
        *self.stats.borrow()
    }

    /// 放弃事务，丢弃全部待写记录
    pub fn rollback(self) {
        trace!("rollback transaction, {} pending writes dropped", self.writes.len());
    }
}

impl<'a, K, V, S> Transaction<'a, K, V, S>
where
    S: NodeStore<K, V> + ?Sized,
{
    /// 提交事务
    ///
    /// 待写集合作为一个批次交给 `batch_write`；没有待写记录时不访问存储。
    /// 写入失败时错误原样返回，待写记录随事务一起丢弃。
    pub fn commit(self) -> Result<TransactionStats> {
        let mut stats = self.stats.into_inner();
        if self.writes.is_empty() {
            trace!("commit empty transaction, store untouched");
            return Ok(stats);
        }

        stats.nodes_flushed = self.writes.len() as u64;
        self.store.batch_write(self.writes, HashSet::new())?;
        debug!(
            "commit transaction: {} nodes flushed, {} clones, {} superseded, hit rate {:.2}",
            stats.nodes_flushed,
            stats.clones,
            stats.superseded,
            stats.hit_rate()
        );
        Ok(stats)
    }
}

impl<'a, K, V, S> ReadableNodeStore<K, V> for Transaction<'a, K, V, S>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
{
    fn read_node(&self, id: &NodeId) -> Result<Option<Node<K, V>>> {
        // 1. 待写记录优先
        if let Some(node) = self.writes.get(id) {
            self.stats.borrow_mut().pending_hits += 1;
            return Ok(Some(node.clone()));
        }

        // 2. 读缓存（包括不存在的结果）
        if let Some(entry) = self.cache.borrow().get(id) {
            self.stats.borrow_mut().cache_hits += 1;
            return Ok(entry.clone());
        }

        // 3. 读穿透
        self.stats.borrow_mut().cache_misses += 1;
        trace!("transaction cache miss for {}", id);
        let node = self.store.read_node(id)?;
        self.cache.borrow_mut().insert(*id, node.clone());
        Ok(node)
    }
}
