//! 节点核心类型定义
//!
//! 包含 NodeId、Node（AVL 节点记录）以及确定性 bincode 配置。

use std::fmt;

use bincode::Options;
use serde::{Deserialize, Serialize};

// ============================================================================
// NodeId
// ============================================================================

/// NodeId 裸字节大小：16 字节随机数
pub const NODE_ID_SIZE: usize = 16;

/// 节点标识符
///
/// 节点之间只通过 NodeId 引用，从不持有内存指针；所有引用都要经过
/// store（或 Transaction）查找。
///
/// 每次创建节点以及每次 clone-on-write 都会生成新的 NodeId，
/// 因此已提交的 NodeId 永远对应同一份不可变内容。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId([u8; NODE_ID_SIZE]);

impl NodeId {
    /// 生成一个新的随机 NodeId
    #[inline]
    pub fn random() -> Self {
        NodeId(rand::random())
    }

    /// 从裸字节构造
    #[inline]
    pub const fn from_bytes(bytes: [u8; NODE_ID_SIZE]) -> Self {
        NodeId(bytes)
    }

    /// 获取裸字节引用
    #[inline]
    pub fn as_bytes(&self) -> &[u8; NODE_ID_SIZE] {
        &self.0
    }

    /// 从任意长度的字节切片解析（长度不符返回 None）
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; NODE_ID_SIZE] = bytes.try_into().ok()?;
        Some(NodeId(raw))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

// ============================================================================
// Node
// ============================================================================

/// AVL 节点记录（持久化单元）
///
/// # 字段语义
///
/// - `height`: 叶子为 0，缺失子树按 -1 计算
/// - `count`: 子树大小 = 1 + left.count + right.count（缺失为 0）
///
/// 节点一旦提交就不再修改；任何逻辑修改都通过 `Transaction::clone_node`
/// 产生带新 id 的副本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<K, V> {
    pub id: NodeId,
    pub left_id: Option<NodeId>,
    pub right_id: Option<NodeId>,
    pub key: K,
    pub value: V,
    pub height: i32,
    pub count: usize,
}

impl<K, V> Node<K, V> {
    /// 创建新的叶子节点（新 id，height = 0，count = 1）
    pub fn new(key: K, value: V) -> Self {
        Self {
            id: NodeId::random(),
            left_id: None,
            right_id: None,
            key,
            value,
            height: 0,
            count: 1,
        }
    }

    /// 是否没有任何子节点
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left_id.is_none() && self.right_id.is_none()
    }

    /// 将指向 `old` 的子指针改为 `new`
    ///
    /// 返回 false 表示 `old` 不是该节点的子节点。
    pub fn relink_child(&mut self, old: &NodeId, new: Option<NodeId>) -> bool {
        if self.left_id.as_ref() == Some(old) {
            self.left_id = new;
            true
        } else if self.right_id.as_ref() == Some(old) {
            self.right_id = new;
            true
        } else {
            false
        }
    }
}

impl<K: Serialize, V: Serialize> Node<K, V> {
    /// 序列化为字节（用于存储）
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode_config().serialize(self)
    }
}

impl<K: serde::de::DeserializeOwned, V: serde::de::DeserializeOwned> Node<K, V> {
    /// 从字节反序列化
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode_config().deserialize(bytes)
    }
}

// ============================================================================
// bincode 配置（内部使用）
// ============================================================================

/// 创建确定性 bincode 配置
pub fn bincode_config() -> impl bincode::Options {
    bincode::options()
        .with_little_endian()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}
