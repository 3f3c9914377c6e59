//! 命名树配置

use serde::{Deserialize, Serialize};

use crate::store::{Result, StoreError};

/// 默认树名
pub const DEFAULT_TREE_NAME: &str = "default";

/// 默认 head key 前缀
pub const DEFAULT_HEAD_PREFIX: &str = "avltree-head";

/// 命名树配置
///
/// 树的当前根 id 保存在 `<head_prefix>:<name>` 下，重新打开时从这里恢复。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDbConfig {
    /// 树名
    pub name: String,
    /// head key 前缀
    pub head_prefix: String,
}

impl TreeDbConfig {
    /// 使用默认前缀创建指定名称的配置
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// head 指针所在的 key
    pub fn head_key(&self) -> String {
        format!("{}:{}", self.head_prefix, self.name)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(StoreError::InvalidConfig("tree name is empty".to_string()));
        }
        if self.head_prefix.is_empty() {
            return Err(StoreError::InvalidConfig("head prefix is empty".to_string()));
        }
        Ok(())
    }
}

impl Default for TreeDbConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TREE_NAME.to_string(),
            head_prefix: DEFAULT_HEAD_PREFIX.to_string(),
        }
    }
}
