//! AvlTree 核心结构体

use std::sync::Arc;

use log::trace;

use crate::compare::{KeyComparator, OrdComparator};
use crate::cursor::{Cursor, Direction, Iter};
use crate::node::{Node, NodeId};
use crate::store::{NodeStore, ReadableNodeStore, Result, StoreError, Transaction};

use super::helpers::{max_node, min_node};
use super::insert::insert;
use super::lookup::get;
use super::remove::remove;

// ============================================================================
// AVL Tree
// ============================================================================

/// 持久化 AVL 树句柄
///
/// # 类型参数
///
/// - `S`: 底层存储实现，必须实现 `NodeStore` trait
/// - `C`: key 比较器，默认使用 `Ord`
///
/// # 不可变性
///
/// 句柄本身从不修改：`insert` / `remove` 在新事务中复制路径、提交，
/// 然后返回指向新根的句柄。旧句柄引用的节点没有被改动，仍然是一个
/// 完整可读的快照。
///
/// 读操作（`get`、cursor、迭代）直接读取存储，不需要事务。
pub struct AvlTree<K, V, S: ?Sized, C = OrdComparator> {
    pub(super) store: Arc<S>,
    pub(super) cmp: Arc<C>,
    pub(super) root: Option<Node<K, V>>,
}

impl<K, V, S: ?Sized, C> AvlTree<K, V, S, C> {
    /// 创建空树
    pub fn new(store: Arc<S>, cmp: C) -> Self {
        Self {
            store,
            cmp: Arc::new(cmp),
            root: None,
        }
    }

    /// 以已加载的根节点构造句柄
    pub fn with_root(store: Arc<S>, cmp: Arc<C>, root: Option<Node<K, V>>) -> Self {
        Self { store, cmp, root }
    }

    /// 共享存储与比较器，替换根节点
    pub(super) fn with_new_root(&self, root: Option<Node<K, V>>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cmp: Arc::clone(&self.cmp),
            root,
        }
    }

    /// 获取根节点
    #[inline]
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_ref()
    }

    /// 获取根节点 ID
    #[inline]
    pub fn root_id(&self) -> Option<&NodeId> {
        self.root.as_ref().map(|r| &r.id)
    }

    /// key 数量（根节点的 count）
    #[inline]
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.count)
    }

    /// 检查树是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 树高（空树为 -1，单节点为 0）
    #[inline]
    pub fn height(&self) -> i32 {
        self.root.as_ref().map_or(-1, |r| r.height)
    }

    /// 获取存储引用
    #[inline]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// 获取比较器引用
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<K: Clone, V: Clone, S: ?Sized, C> Clone for AvlTree<K, V, S, C> {
    fn clone(&self) -> Self {
        self.with_new_root(self.root.clone())
    }
}

// ========== 读操作 ==========

impl<K, V, S, C> AvlTree<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: ReadableNodeStore<K, V> + ?Sized,
    C: KeyComparator<K>,
{
    /// 打开以 `root_id` 为根的树
    ///
    /// `root_id` 为 None 表示空树；id 在存储中不存在时返回 `NotFound`。
    pub fn open(store: Arc<S>, cmp: C, root_id: Option<&NodeId>) -> Result<Self> {
        let root = match root_id {
            Some(id) => Some(store.read_node(id)?.ok_or(StoreError::NotFound)?),
            None => None,
        };
        Ok(Self {
            store,
            cmp: Arc::new(cmp),
            root,
        })
    }

    /// 查找 key 对应的值
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        get(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }

    /// 检查 key 是否存在
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// 最小的 key-value
    pub fn first(&self) -> Result<Option<(K, V)>> {
        match &self.root {
            Some(root) => {
                let node = min_node(&*self.store, root.clone())?;
                Ok(Some((node.key, node.value)))
            }
            None => Ok(None),
        }
    }

    /// 最大的 key-value
    pub fn last(&self) -> Result<Option<(K, V)>> {
        match &self.root {
            Some(root) => {
                let node = max_node(&*self.store, root.clone())?;
                Ok(Some((node.key, node.value)))
            }
            None => Ok(None),
        }
    }

    /// 按升序收集全部 key-value
    pub fn entries(&self) -> Result<Vec<(K, V)>> {
        self.iter()?.collect()
    }

    /// 按升序收集全部节点记录
    pub fn nodes(&self) -> Result<Vec<Node<K, V>>> {
        let mut nodes = Vec::with_capacity(self.len());
        let mut cursor = self.begin()?;
        while let Some(node) = cursor.node() {
            nodes.push(node.clone());
            cursor.next()?;
        }
        Ok(nodes)
    }

    /// 升序迭代器
    pub fn iter(&self) -> Result<Iter<'_, K, V, S>> {
        Ok(Iter::new(self.begin()?, Direction::Forward))
    }

    /// 降序迭代器
    pub fn iter_rev(&self) -> Result<Iter<'_, K, V, S>> {
        Ok(Iter::new(self.end()?, Direction::Backward))
    }

    // ========== Cursor 定位 ==========

    /// 指向最小 key 的 cursor
    pub fn begin(&self) -> Result<Cursor<'_, K, V, S>> {
        Cursor::begin(&*self.store, self.root.as_ref())
    }

    /// 指向最大 key 的 cursor
    pub fn end(&self) -> Result<Cursor<'_, K, V, S>> {
        Cursor::end(&*self.store, self.root.as_ref())
    }

    /// 精确定位
    pub fn find(&self, key: &K) -> Result<Cursor<'_, K, V, S>> {
        Cursor::find(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }

    /// 按排名定位
    pub fn at(&self, index: usize) -> Result<Cursor<'_, K, V, S>> {
        Cursor::at(&*self.store, self.root.as_ref(), index)
    }

    /// 第一个 >= key 的位置
    pub fn ge(&self, key: &K) -> Result<Cursor<'_, K, V, S>> {
        Cursor::ge(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }

    /// 第一个 > key 的位置
    pub fn gt(&self, key: &K) -> Result<Cursor<'_, K, V, S>> {
        Cursor::gt(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }

    /// 最后一个 <= key 的位置
    pub fn le(&self, key: &K) -> Result<Cursor<'_, K, V, S>> {
        Cursor::le(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }

    /// 最后一个 < key 的位置
    pub fn lt(&self, key: &K) -> Result<Cursor<'_, K, V, S>> {
        Cursor::lt(&*self.store, &*self.cmp, self.root.as_ref(), key)
    }
}

// ========== 写操作 ==========

impl<K, V, S, C> AvlTree<K, V, S, C>
where
    K: Clone,
    V: Clone,
    S: NodeStore<K, V> + ?Sized,
    C: KeyComparator<K>,
{
    /// 插入 key-value 对，返回新版本的树
    ///
    /// key 已存在时覆盖值。存储写入失败时返回错误，`self` 不受影响，
    /// 可以直接在 `self` 上重试。
    pub fn insert(&self, key: K, value: V) -> Result<Self> {
        let mut txn = Transaction::new(&*self.store);
        let root = insert(&mut txn, &*self.cmp, self.root.as_ref(), key, value)?;
        let stats = txn.commit()?;
        trace!("insert committed, new root {}, {:?}", root.id, stats);
        Ok(self.with_new_root(Some(root)))
    }

    /// 删除 key，返回新版本的树
    ///
    /// key 不存在时返回与 `self` 相同根的句柄，不写入任何节点。
    pub fn remove(&self, key: &K) -> Result<Self> {
        let mut txn = Transaction::new(&*self.store);
        let root = remove(&mut txn, &*self.cmp, self.root.as_ref(), key)?;
        txn.commit()?;
        Ok(self.with_new_root(root))
    }
}
