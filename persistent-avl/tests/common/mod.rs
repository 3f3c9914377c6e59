//! 集成测试公共辅助
//!
//! 构造测试树、检查不变量、以及可注入故障的存储包装。

#![allow(dead_code)]


use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use persistent_avl::{
    AvlTree, HeadStore, KeyComparator, MemoryNodeStore, Node, NodeId, NodeStore, OrdComparator,
    ReadableNodeStore, StoreError, StoreResult,
};

pub type TestTree = AvlTree<i64, String, MemoryNodeStore>;

/// 初始化测试日志（RUST_LOG 控制级别），重复调用无副作用
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 空树（内存存储）
pub fn empty_tree() -> TestTree {
    AvlTree::new(Arc::new(MemoryNodeStore::new()), OrdComparator)
}

/// 逐个 insert 构造，值为 `v<key>`
pub fn make_tree(keys: &[i64]) -> TestTree {
    keys.iter().fold(empty_tree(), |tree, &k| {
        tree.insert(k, value_of(k)).unwrap()
    })
}

pub fn value_of(key: i64) -> String {
    format!("v{}", key)
}

pub fn keys_of<S, C>(tree: &AvlTree<i64, String, S, C>) -> Vec<i64>
where
    S: ReadableNodeStore<i64, String> + ?Sized,
    C: KeyComparator<i64>,
{
    tree.entries().unwrap().into_iter().map(|(k, _)| k).collect()
}

/// 检查 AVL 不变量，并确认迭代顺序与 key 数量一致
pub fn check_tree<S, C>(tree: &AvlTree<i64, String, S, C>)
where
    S: ReadableNodeStore<i64, String> + ?Sized,
    C: KeyComparator<i64>,
{
    let count = tree.validate().unwrap();
    assert_eq!(count, tree.len());

    let keys = keys_of(tree);
    assert_eq!(keys.len(), count);
    for pair in keys.windows(2) {
        assert_eq!(
            tree.comparator().compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Less,
            "keys out of order: {:?}",
            pair
        );
    }
}

/// 从根可达的全部节点 id
pub fn reachable_ids<S, C>(tree: &AvlTree<i64, String, S, C>) -> HashSet<NodeId>
where
    S: ReadableNodeStore<i64, String> + ?Sized,
    C: KeyComparator<i64>,
{
    tree.nodes().unwrap().into_iter().map(|n| n.id).collect()
}

/// 存储中的节点恰好是给定各版本可达节点的并集
pub fn check_store(store: &MemoryNodeStore, versions: &[&TestTree]) {
    let stored: HashSet<NodeId> = store.node_ids().into_iter().collect();
    let reachable: HashSet<NodeId> = versions
        .iter()
        .flat_map(|tree| reachable_ids(*tree))
        .collect();
    assert_eq!(stored.len(), reachable.len());
    assert_eq!(stored, reachable);
}

// ============================================================================
// 故障注入 / 计数存储
// ============================================================================

/// 可以在运行时切换为写入失败的内存存储
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryNodeStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    fail_heads: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 只让 head 写入失败（节点批次照常写入）
    pub fn fail_heads(&self, fail: bool) {
        self.fail_heads.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryNodeStore {
        &self.inner
    }
}

impl ReadableNodeStore<i64, String> for FailingStore {
    fn read_node(&self, id: &NodeId) -> StoreResult<Option<Node<i64, String>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("injected read failure".to_string()));
        }
        self.inner.read_node(id)
    }
}

impl NodeStore<i64, String> for FailingStore {
    fn batch_write(
        &self,
        writes: HashMap<NodeId, Node<i64, String>>,
        deletes: HashSet<NodeId>,
    ) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("injected write failure".to_string()));
        }
        self.inner.batch_write(writes, deletes)
    }
}

impl HeadStore for FailingStore {
    fn get_head(&self, key: &str) -> StoreResult<Option<NodeId>> {
        self.inner.get_head(key)
    }

    fn set_head(&self, key: &str, root: Option<&NodeId>) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) || self.fail_heads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("injected head failure".to_string()));
        }
        self.inner.set_head(key, root)
    }
}

/// 统计 read / batch_write 调用次数的内存存储
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryNodeStore,
    reads: AtomicUsize,
    batches: AtomicUsize,
    written: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryNodeStore {
        &self.inner
    }
}

impl ReadableNodeStore<i64, String> for CountingStore {
    fn read_node(&self, id: &NodeId) -> StoreResult<Option<Node<i64, String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_node(id)
    }
}

impl NodeStore<i64, String> for CountingStore {
    fn batch_write(
        &self,
        writes: HashMap<NodeId, Node<i64, String>>,
        deletes: HashSet<NodeId>,
    ) -> StoreResult<()> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.written.fetch_add(writes.len(), Ordering::SeqCst);
        self.inner.batch_write(writes, deletes)
    }
}
