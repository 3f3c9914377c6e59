//! 带 head 指针的命名持久化树
//!
//! 写入顺序：先提交节点，再更新 head，最后替换内存中的快照。
//! head 只会指向已经完整写入的子树；任何一步失败时，内存快照和 head
//! 都停留在上一个版本。
//!
//! 节点批次和 head 是两次独立的写入。两次写入之间崩溃（或 head 写入失败）时，
//! 新提交的节点不被任何 head 引用，成为存储中的垃圾节点，由外部 GC 回收；
//! 重新打开得到的仍是上一个版本。

use std::sync::Arc;

use log::{debug, info};
use parking_lot::{Mutex, RwLock};

use crate::compare::{KeyComparator, OrdComparator};
use crate::config::TreeDbConfig;
use crate::store::{HeadStore, NodeStore, Result};
use crate::tree::{AvlTree, BatchOp};

/// 命名持久化树
///
/// 同一个存储中可以并存多棵命名树，每棵树的根 id 保存在各自的 head key 下。
///
/// # 并发
///
/// 写操作之间用互斥锁串行化；读操作只克隆当前快照，不会被写操作阻塞在存储 IO 上。
pub struct TreeDb<K, V, S: ?Sized, C = OrdComparator> {
    config: TreeDbConfig,
    head_key: String,
    current: RwLock<AvlTree<K, V, S, C>>,
    writer: Mutex<()>,
}

impl<K, V, S, C> TreeDb<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: NodeStore<K, V> + HeadStore + ?Sized,
    C: KeyComparator<K>,
{
    /// 打开命名树
    ///
    /// head 不存在时得到空树；head 指向的根不存在时返回 `NotFound`。
    pub fn open(store: Arc<S>, config: TreeDbConfig, cmp: C) -> Result<Self> {
        config.validate()?;
        let head_key = config.head_key();
        let root_id = store.get_head(&head_key)?;
        let tree = AvlTree::open(store, cmp, root_id.as_ref())?;
        info!(
            "opened tree {} at root {:?} with {} keys",
            config.name,
            root_id,
            tree.len()
        );

        Ok(Self {
            config,
            head_key,
            current: RwLock::new(tree),
            writer: Mutex::new(()),
        })
    }

    /// 配置
    pub fn config(&self) -> &TreeDbConfig {
        &self.config
    }

    /// 当前快照
    ///
    /// 返回的句柄不受后续写入影响。
    pub fn snapshot(&self) -> AvlTree<K, V, S, C> {
        self.current.read().clone()
    }

    /// key 数量
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// 查找
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        self.snapshot().get(key)
    }

    /// 插入或覆盖
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        let _writer = self.writer.lock();
        let next = self.snapshot().insert(key, value)?;
        self.publish(next)
    }

    /// 删除
    pub fn remove(&self, key: &K) -> Result<()> {
        let _writer = self.writer.lock();
        let next = self.snapshot().remove(key)?;
        self.publish(next)
    }

    /// 在一个批次中应用多个操作
    pub fn apply<I>(&self, ops: I) -> Result<()>
    where
        I: IntoIterator<Item = BatchOp<K, V>>,
    {
        let _writer = self.writer.lock();
        let next = self.snapshot().apply(ops)?;
        self.publish(next)
    }

    /// 更新 head 并替换快照（调用方持有写锁）
    ///
    /// `next` 的节点此时已经提交。`set_head` 失败时返回错误，快照不变，
    /// `next` 的节点留在存储中但不可达。
    fn publish(&self, next: AvlTree<K, V, S, C>) -> Result<()> {
        next.store().set_head(&self.head_key, next.root_id())?;
        debug!(
            "head {} -> {:?} ({} keys)",
            self.head_key,
            next.root_id(),
            next.len()
        );
        *self.current.write() = next;
        Ok(())
    }
}
