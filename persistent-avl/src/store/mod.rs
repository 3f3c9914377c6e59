//! 节点存储抽象层
//!
//! 提供 `NodeStore` trait 用于树节点的持久化存储和检索。
//! 实现：
//! - `MemoryNodeStore`: 内存存储，用于测试
//! - `KvNodeStore`: 基于 kvdb trait 的持久化存储（需要 `kvdb-backend` feature）
//! - `Transaction`: 写缓冲 + 读缓存，树算法的所有读写都经过它

mod error;
mod memory;
mod traits;
mod transaction;

#[cfg(feature = "kvdb-backend")]
mod kvdb;


// Re-export 公开 API
pub use error::{Result, StoreError};
pub use memory::MemoryNodeStore;
pub use traits::{HeadStore, NodeStore, ReadableNodeStore};
pub use transaction::{Transaction, TransactionStats};

#[cfg(feature = "kvdb-backend")]
pub use self::kvdb::{KvNodeStore, MAX_NAMESPACE_LEN};
