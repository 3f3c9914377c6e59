//! 节点存储错误类型

/// 节点存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// 反序列化错误
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// 底层存储错误
    #[error("Storage error: {0}")]
    Storage(String),
    /// 底层 IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 被引用的节点不存在（树中存在悬空 id）
    #[error("Node not found")]
    NotFound,
    /// 校验发现不变量被破坏
    #[error("Tree corrupted: {0}")]
    Corrupted(String),
    /// 配置不合法
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// 节点存储 Result 类型
pub type Result<T> = std::result::Result<T, StoreError>;
