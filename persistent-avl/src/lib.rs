//! PersistentAVL: 基于外部节点存储的持久化（copy-on-write）AVL 树
//!
//! 每次 insert / remove 都产生新版本的树，已有节点从不修改，
//! 因此旧版本的根始终是一个一致的只读快照，多个读者无需加锁。
//! 节点之间只通过随机生成的 `NodeId` 引用，存储在可插拔的 `NodeStore` 中。
//!
//! # 核心数据结构
//!
//! - **NodeId**: 16 字节随机 id，每次创建和每次 clone-on-write 都重新生成
//! - **Node**: 持久化单元，包含左右子节点 id、key、value、height、count
//! - **Transaction**: 写缓冲 + 读缓存，负责 clone / set / get 的簿记
//! - **AvlTree**: 不可变树句柄，写操作返回新句柄
//! - **Cursor**: 路径栈表示的位置，支持双向移动、排名与方向定位
//!
//! # 核心设计决策
//!
//! 1. **路径复制**：每次变更只复制从根到修改点的 O(log n) 个节点
//! 2. **最少写入**：事务中被再次复制的节点撤销其待写记录，只提交最终可达的节点
//! 3. **顺序统计**：节点记录子树大小，`at` / `index` 都是 O(log n)
//! 4. **比较器外置**：key 类型只需要一个全序比较器
//! 5. **head 指针**：命名树的根 id 保存在约定的 key 下，重启后从 head 恢复
//!
//! # 使用示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use persistent_avl::{AvlTree, MemoryNodeStore, OrdComparator};
//!
//! let store = Arc::new(MemoryNodeStore::new());
//! let empty: AvlTree<u64, String, _> = AvlTree::new(store, OrdComparator);
//! let v1 = empty.insert(1, "one".to_string())?;
//! let v2 = v1.insert(2, "two".to_string())?;
//!
//! assert_eq!(v1.len(), 1);
//! assert_eq!(v2.get(&2)?, Some("two".to_string()));
//! ```

pub mod compare;
pub mod config;
pub mod cursor;
pub mod db;
pub mod node;
pub mod store;
pub mod tree;

// compare.rs 导出
pub use compare::{KeyComparator, OrdComparator};

// config.rs 导出
pub use config::TreeDbConfig;

// cursor 导出
pub use cursor::{Cursor, Direction, Iter};

// db.rs 导出
pub use db::TreeDb;

// node 导出
pub use node::{BalanceState, Node, NodeId, NODE_ID_SIZE};

// store 导出
pub use store::{
    HeadStore, MemoryNodeStore, NodeStore, ReadableNodeStore, Result as StoreResult, StoreError,
    Transaction, TransactionStats,
};

// kvdb-backend feature 启用时导出 KvNodeStore
#[cfg(feature = "kvdb-backend")]
pub use store::KvNodeStore;

// tree 导出
pub use tree::{AvlTree, BatchOp, TreeBatch, Walker};
