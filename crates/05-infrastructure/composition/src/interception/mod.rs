//! 拦截管道
//!
//! 为方法调用叠加横切行为：按声明顺序由外到内组成调用链，
//! 链在首次使用时构建并缓存。

pub mod chain;
pub mod invocation;
pub mod logging;
pub mod provider;
pub mod transaction;

pub use chain::*;
pub use invocation::*;
pub use logging::*;
pub use provider::*;
pub use transaction::*;

/// 内置日志拦截器的工厂名称
pub const LOGGING_INTERCEPTOR: &str = "logging";

/// 内置事务拦截器的工厂名称
pub const TRANSACTION_INTERCEPTOR: &str = "transaction";
