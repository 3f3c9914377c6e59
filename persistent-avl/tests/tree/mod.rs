//! 树集成测试
//!
//! 在内存存储和 kvdb 存储上测试完整的 insert / remove / cursor / batch / head 流程。

#[path = "../common/mod.rs"]
mod common;

mod sequential_test;
mod random_test;
mod iterator_test;
mod failure_test;
