//! # 组件组合内核
//!
//! 发现组件声明，把它们去重后注册进可替换的对象容器，
//! 再按确定的顺序初始化需要提前初始化的单例。
//! 在此之上提供拦截管道，为方法调用叠加横切行为。
//!
//! ## 主要功能
//!
//! - **启动协调器**: [`Bootstrapper`] 两阶段启动（注册、初始化）
//! - **声明式扫描**: `#[component]` 宏提交静态类型表，[`ComponentScanner`] 转换为描述符
//! - **拦截管道**: [`interception`] 模块，调用链按操作缓存
//! - **内置组件**: JSON 序列化器、调用链提供者、日志和事务拦截器
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::di::{ObjectContainer, ObjectContainerExt};
//! use infrastructure_composition::{component, Bootstrapper};
//! use std::sync::Arc;
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[component(contract = dyn Greeter, default)]
//! #[derive(Default)]
//! pub struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello".to_string()
//!     }
//! }
//!
//! async fn start(container: Arc<dyn ObjectContainer>) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bootstrapper = Bootstrapper::new();
//!     bootstrapper.complete(Arc::clone(&container)).await?;
//!
//!     let greeter = container.get::<dyn Greeter>()?;
//!     println!("{}", greeter.greet());
//!     Ok(())
//! }
//! ```

extern crate self as infrastructure_composition;

pub mod artifacts;
pub mod bootstrapper;
pub mod component_scanner;
pub mod defaults;
pub mod interception;
pub mod options;
pub mod registry;
pub mod scheduling;
pub mod serialization;

pub use di_abstractions as di;
pub use infrastructure_common as common;

pub use artifacts::{InventoryArtifactLoader, StaticArtifactLoader};
pub use bootstrapper::{ArtifactsLoadedHook, BootstrapReport, BootstrapStatus, Bootstrapper};
pub use component_scanner::ComponentScanner;
pub use defaults::builtin_components;
pub use options::{BootstrapOptions, LoggingConfig};
pub use registry::ComponentRegistry;
pub use scheduling::Worker;
pub use serialization::{
    BinarySerializer, BinarySerializerExt, JsonBinarySerializer, JsonTextSerializer,
    TextSerializer, TextSerializerExt,
};

// 声明宏
pub use component_macros::{component, intercepted, lifecycle, Component};

// 重新导出错误类型
pub use infrastructure_common::{CompositionError, CompositionResult};

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}

#[cfg(test)]
mod tests;
