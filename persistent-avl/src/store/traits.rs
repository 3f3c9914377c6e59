//! NodeStore / HeadStore trait 定义

use std::collections::{HashMap, HashSet};

use super::error::Result;
use crate::node::{Node, NodeId};

/// 只读节点存储
///
/// 树算法和 cursor 的所有读操作都经过该 trait，
/// 因此既可以直接读底层存储，也可以读 `Transaction`（能看到未提交的写入）。
pub trait ReadableNodeStore<K, V> {
    /// 根据 NodeId 读取节点
    ///
    /// # 返回
    /// - `Ok(Some(node))`: 找到节点
    /// - `Ok(None)`: 节点不存在
    /// - `Err(_)`: 发生错误（如反序列化失败）
    fn read_node(&self, id: &NodeId) -> Result<Option<Node<K, V>>>;

    /// 读取可能缺失的子节点
    ///
    /// `id` 为 None 时直接返回 None，不访问存储。
    #[inline]
    fn get_node(&self, id: Option<&NodeId>) -> Result<Option<Node<K, V>>> {
        match id {
            Some(id) => self.read_node(id),
            None => Ok(None),
        }
    }
}

/// 可写节点存储
///
/// 所有节点存储实现必须满足 `Send + Sync`：已提交的节点不可变，
/// 多个读者可以不加协调地并发读取同一个 store。
///
/// # 批量写入
///
/// `batch_write` 对核心而言是原子的：要么全部写入，要么返回错误。
/// 核心从不重试，错误直接返回给调用方。
/// 树节点从不删除，旧版本只是不再被引用，由外部 GC 负责。
pub trait NodeStore<K, V>: ReadableNodeStore<K, V> + Send + Sync {
    /// 批量写入节点并删除给定 id
    fn batch_write(
        &self,
        writes: HashMap<NodeId, Node<K, V>>,
        deletes: HashSet<NodeId>,
    ) -> Result<()>;
}

/// 树头指针存储
///
/// 一棵命名树的当前根 id 保存在一个约定的 key 下（`<prefix>:<tree-name>`），
/// 重新打开时先读取 head，再以其值作为根 id。
pub trait HeadStore: Send + Sync {
    /// 读取 head 指向的根 id
    fn get_head(&self, key: &str) -> Result<Option<NodeId>>;

    /// 更新 head，None 表示空树
    fn set_head(&self, key: &str, root: Option<&NodeId>) -> Result<()>;
}
