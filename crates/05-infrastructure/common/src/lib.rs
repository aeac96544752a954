//! # Infrastructure Common
//!
//! 组合内核的公共基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 服务类型标识（契约类型 / 实现类型）
//! - [`Lifecycle`] - 组件生命周期
//! - [`DependencyError`] / [`CompositionError`] - 错误分类
//!
//! 这里不依赖任何容器实现，容器抽象位于 `di-abstractions`。

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
