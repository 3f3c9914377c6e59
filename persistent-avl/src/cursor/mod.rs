//! Cursor 模块
//!
//! 用从根到当前节点的路径栈表示树中的位置，支持双向移动、
//! 排名计算和方向定位（>=、>、<=、<、精确、按排名）。

mod core;
mod iter;
mod seek;


// Re-export 公开 API
pub use self::core::Cursor;
pub use self::iter::{Direction, Iter};
