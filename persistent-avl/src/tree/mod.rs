//! AvlTree 模块
//!
//! 纯算法函数（`get` / `find_path` / `insert` / `remove`）作用于
//! 根节点 + 事务 + 比较器；`AvlTree` 在其上提供不可变句柄。

mod batch;
mod core;
pub(crate) mod helpers;
mod insert;
mod lookup;
mod remove;
mod rotate;
mod validate;
mod walk;


// Re-export 公开 API
pub use self::batch::{BatchOp, TreeBatch};
pub use self::core::AvlTree;
pub use self::helpers::{max_node, min_node};
pub use self::insert::insert;
pub use self::lookup::{find_path, get};
pub use self::remove::remove;
pub use self::walk::Walker;
