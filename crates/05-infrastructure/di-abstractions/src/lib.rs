//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组合内核与后端容器之间的边界。
//!
//! ## 核心接口
//!
//! - [`ObjectContainer`] - 容器能力接口（注册、查询、解析）
//! - [`ComponentDescriptor`] - 组件描述符
//! - [`Initializer`] - 启动期初始化能力
//! - [`TypeEntry`] / [`Artifact`] - 静态类型表与代码制品

pub mod component;
pub mod container;
pub mod descriptor;
pub mod discovery;
pub mod initializer;
pub mod instance;
pub mod scanner;

pub use component::*;
pub use container::*;
pub use descriptor::*;
pub use discovery::*;
pub use initializer::*;
pub use instance::*;
pub use scanner::*;
