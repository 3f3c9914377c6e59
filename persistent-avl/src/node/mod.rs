//! AVL 节点模块
//!
//! 包含节点记录 `Node`、节点标识 `NodeId` 以及平衡状态 `BalanceState`。

mod balance;
mod types;


// Re-export 公开 API
pub use balance::BalanceState;
pub use types::{bincode_config, Node, NodeId, NODE_ID_SIZE};
