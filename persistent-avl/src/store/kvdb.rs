//! 基于 kvdb 的节点存储实现

#![cfg(feature = "kvdb-backend")]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kvdb::{DBTransaction, KeyValueDB};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{Result, StoreError};
use super::traits::{HeadStore, NodeStore, ReadableNodeStore};
use crate::node::{Node, NodeId};

/// Key 前缀：树节点
const KEY_PREFIX_NODE: u8 = 0x00;

/// Key 前缀：树头指针
const KEY_PREFIX_HEAD: u8 = 0x01;

/// namespace 最大长度（长度字段为 1 字节）
pub const MAX_NAMESPACE_LEN: usize = u8::MAX as usize;

/// 基于 kvdb 的节点存储
///
/// Key 格式：`[prefix: 1B][namespace_len: 1B][namespace][payload]`
/// - prefix 0x00 = 树节点，payload 为 16 字节 NodeId
/// - prefix 0x01 = 树头指针，payload 为 head key 的 UTF-8 字节
///
/// namespace 用于在同一个 kvdb 中划分多个独立的 shard，
/// 不同 shard 的 id 空间互不干扰。
///
/// # 示例
///
/// ```ignore
/// use kvdb_memorydb;
/// use persistent_avl::KvNodeStore;
///
/// let db = Arc::new(kvdb_memorydb::create(1));
/// let store = KvNodeStore::new(db, 0, b"users".to_vec())?;
/// ```
pub struct KvNodeStore {
    db: Arc<dyn KeyValueDB>,
    col: u32,
    namespace: Vec<u8>,
}

impl KvNodeStore {
    /// 创建新的 KvNodeStore
    ///
    /// # 参数
    /// - `db`: kvdb 后端（RocksDB、MDBX、内存等）
    /// - `col`: 使用的 column family
    /// - `namespace`: shard 名称，最长 255 字节
    pub fn new(db: Arc<dyn KeyValueDB>, col: u32, namespace: Vec<u8>) -> Result<Self> {
        if namespace.len() > MAX_NAMESPACE_LEN {
            return Err(StoreError::InvalidConfig(format!(
                "namespace is {} bytes, at most {} allowed",
                namespace.len(),
                MAX_NAMESPACE_LEN
            )));
        }
        Ok(Self { db, col, namespace })
    }

    /// 获取 column
    pub fn col(&self) -> u32 {
        self.col
    }

    /// 获取 namespace
    pub fn namespace(&self) -> &[u8] {
        &self.namespace
    }

    /// 构造带前缀和 namespace 的存储 key
    fn make_key(&self, prefix: u8, payload: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(2 + self.namespace.len() + payload.len());
        key.push(prefix);
        key.push(self.namespace.len() as u8);
        key.extend_from_slice(&self.namespace);
        key.extend_from_slice(payload);
        key
    }

    fn make_node_key(&self, id: &NodeId) -> Vec<u8> {
        self.make_key(KEY_PREFIX_NODE, id.as_bytes())
    }

    fn make_head_key(&self, key: &str) -> Vec<u8> {
        self.make_key(KEY_PREFIX_HEAD, key.as_bytes())
    }
}

impl<K: DeserializeOwned, V: DeserializeOwned> ReadableNodeStore<K, V> for KvNodeStore {
    fn read_node(&self, id: &NodeId) -> Result<Option<Node<K, V>>> {
        let key = self.make_node_key(id);
        match self.db.get(self.col, &key) {
            Ok(Some(bytes)) => {
                let node = Node::from_bytes(&bytes)
                    .map_err(|e| StoreError::Deserialization(e.to_string()))?;
                Ok(Some(node))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }
}

impl<K, V> NodeStore<K, V> for KvNodeStore
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    fn batch_write(
        &self,
        writes: HashMap<NodeId, Node<K, V>>,
        deletes: HashSet<NodeId>,
    ) -> Result<()> {
        let mut tx = DBTransaction::new();
        for (id, node) in &writes {
            let bytes = node
                .to_bytes()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            tx.put(self.col, &self.make_node_key(id), &bytes);
        }
        for id in &deletes {
            tx.delete(self.col, &self.make_node_key(id));
        }

        self.db
            .write(tx)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl HeadStore for KvNodeStore {
    fn get_head(&self, key: &str) -> Result<Option<NodeId>> {
        let head_key = self.make_head_key(key);
        match self.db.get(self.col, &head_key) {
            Ok(Some(bytes)) => NodeId::from_slice(&bytes).map(Some).ok_or_else(|| {
                StoreError::Deserialization(format!(
                    "head {} holds {} bytes, expected a node id",
                    key,
                    bytes.len()
                ))
            }),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn set_head(&self, key: &str, root: Option<&NodeId>) -> Result<()> {
        let head_key = self.make_head_key(key);
        let mut tx = DBTransaction::new();
        match root {
            Some(id) => tx.put(self.col, &head_key, id.as_bytes()),
            None => tx.delete(self.col, &head_key),
        }
        self.db
            .write(tx)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}
