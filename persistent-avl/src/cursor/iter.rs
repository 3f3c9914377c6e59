//! 基于 Cursor 的 Rust 迭代器

use crate::store::{ReadableNodeStore, Result, StoreError};

use super::core::Cursor;

/// 遍历方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 升序
    Forward,
    /// 降序
    Backward,
}

/// 有序迭代器
///
/// 产出 `Result<(K, V)>`：移动时读取存储失败，错误在下一次 `next` 时返回，
/// 之后迭代结束。
pub struct Iter<'a, K, V, R: ?Sized> {
    cursor: Cursor<'a, K, V, R>,
    direction: Direction,
    error: Option<StoreError>,
}

impl<'a, K, V, R: ?Sized> Iter<'a, K, V, R> {
    /// 从 cursor 当前位置开始迭代
    pub fn new(cursor: Cursor<'a, K, V, R>, direction: Direction) -> Self {
        Self {
            cursor,
            direction,
            error: None,
        }
    }

    /// 遍历方向
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<'a, K, V, R> Iterator for Iter<'a, K, V, R>
where
    K: Clone,
    V: Clone,
    R: ReadableNodeStore<K, V> + ?Sized,
{
    type Item = Result<(K, V)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.error.take() {
            return Some(Err(err));
        }

        let item = {
            let node = self.cursor.node()?;
            (node.key.clone(), node.value.clone())
        };
        let step = match self.direction {
            Direction::Forward => self.cursor.next(),
            Direction::Backward => self.cursor.prev(),
        };
        if let Err(err) = step {
            self.cursor.invalidate();
            self.error = Some(err);
        }
        Some(Ok(item))
    }
}
