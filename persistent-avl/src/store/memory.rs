//! 内存节点存储实现

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{Result, StoreError};
use super::traits::{HeadStore, NodeStore, ReadableNodeStore};
use crate::node::{Node, NodeId};

/// 内存节点存储
///
/// 使用 `HashMap` 存储序列化后的节点，主要用于测试。
/// 节点以字节形式保存，读出的永远是独立副本，已提交的记录无法被原地修改。
///
/// # 线程安全
///
/// 使用 `Arc<RwLock<HashMap>>` 实现内部可变性；`clone` 得到的是
/// 指向同一份数据的新句柄。
pub struct MemoryNodeStore {
    nodes: Arc<RwLock<HashMap<NodeId, Vec<u8>>>>,
    heads: Arc<RwLock<HashMap<String, NodeId>>>,
}

impl MemoryNodeStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
            heads: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 获取存储的节点数量
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// 获取存储的全部节点 id（无序）
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.read().keys().copied().collect()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty() && self.heads.read().is_empty()
    }

    /// 清空所有数据
    pub fn clear(&self) {
        self.nodes.write().clear();
        self.heads.write().clear();
    }
}

impl Default for MemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryNodeStore {
    fn clone(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            heads: Arc::clone(&self.heads),
        }
    }
}

impl<K: DeserializeOwned, V: DeserializeOwned> ReadableNodeStore<K, V> for MemoryNodeStore {
    fn read_node(&self, id: &NodeId) -> Result<Option<Node<K, V>>> {
        let nodes = self.nodes.read();
        match nodes.get(id) {
            Some(bytes) => {
                let node = Node::from_bytes(bytes)
                    .map_err(|e| StoreError::Deserialization(e.to_string()))?;
                Ok(Some(node))
            }
            None => Ok(None),
        }
    }
}

impl<K, V> NodeStore<K, V> for MemoryNodeStore
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    fn batch_write(
        &self,
        writes: HashMap<NodeId, Node<K, V>>,
        deletes: HashSet<NodeId>,
    ) -> Result<()> {
        // 先全部编码，编码失败时不写入任何数据
        let mut encoded = Vec::with_capacity(writes.len());
        for (id, node) in writes {
            let bytes = node
                .to_bytes()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            encoded.push((id, bytes));
        }

        let mut nodes = self.nodes.write();
        nodes.extend(encoded);
        for id in &deletes {
            nodes.remove(id);
        }
        Ok(())
    }
}

impl HeadStore for MemoryNodeStore {
    fn get_head(&self, key: &str) -> Result<Option<NodeId>> {
        Ok(self.heads.read().get(key).copied())
    }

    fn set_head(&self, key: &str, root: Option<&NodeId>) -> Result<()> {
        let mut heads = self.heads.write();
        match root {
            Some(id) => {
                heads.insert(key.to_string(), *id);
            }
            None => {
                heads.remove(key);
            }
        }
        Ok(())
    }
}
