//! 组件生命周期

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// 瞬时模式 - 每次解析都创建新实例
    Transient,
    /// 单例模式 - 在注册的整个生命周期内只创建一个实例
    Singleton,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::Singleton
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => f.write_str("transient"),
            Self::Singleton => f.write_str("singleton"),
        }
    }
}
