//! # Component Macros
//!
//! 组件声明过程宏。生成的代码在编译期向静态类型表提交条目，
//! 由 `infrastructure-composition` 的扫描器在启动时读取。
//!
//! ## 核心宏
//!
//! - [`component`] - 声明组件（契约、名称、生命周期、拦截器）
//! - [`lifecycle`] - 单独声明生命周期
//! - [`intercepted`] - 声明操作级拦截器
//! - [`Component`](derive@Component) - 只实现 `Component` trait
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use infrastructure_composition::{component, lifecycle};
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! #[component(contract = dyn Greeter, name = "fr", default)]
//! #[lifecycle(transient)]
//! #[derive(Default)]
//! pub struct FrenchGreeter;
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod interception;
mod lifecycle;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件声明宏
///
/// 为结构体实现 `Component`，并提交一个带注册标记的类型表条目。
///
/// # 参数
///
/// - `contract = dyn Trait` - 契约类型，同时生成 `Provides<dyn Trait>`；省略时自注册
/// - `name = "fr"` - 契约名称（默认为空，即默认注册）
/// - `singleton` / `transient` - 生命周期（省略时按单例处理）
/// - `default` - 通过 `Default` 实现 `Injectable`
/// - `initializer` - 组件实现了 `Initializer`，启动时提前初始化
/// - `interceptors = ["logging"]` - 组件级拦截器工厂名称，由外到内
///
/// # 示例
///
/// ```rust,ignore
/// #[component(contract = dyn Clock, transient, default)]
/// #[derive(Default)]
/// pub struct SystemClock;
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args, input)
}

/// 生命周期标记宏
///
/// 必须与 `#[component]` 用在同一个结构体上。
///
/// # 示例
///
/// ```rust,ignore
/// #[component(default)]
/// #[lifecycle(transient)]
/// #[derive(Default)]
/// pub struct RequestContext;
/// ```
#[proc_macro_attribute]
pub fn lifecycle(args: TokenStream, input: TokenStream) -> TokenStream {
    lifecycle::lifecycle_impl(args, input)
}

/// 操作级拦截声明宏
///
/// 用在 `impl` 块上，收集方法上的 `#[intercept("..")]`。每个被拦截的方法生成：
///
/// - `<METHOD>_OPERATION` - 操作标识常量，组件名为 `模块路径::类型名`
/// - `<method>_intercepted` - 仅当方法形如
///   `async fn m(&self, invocation: &Invocation) -> InvocationResult` 时生成，
///   从容器解析调用链提供者并经调用链执行
///
/// # 示例
///
/// ```rust,ignore
/// #[intercepted]
/// impl Ledger {
///     #[intercept("transaction")]
///     pub async fn post(&self, invocation: &Invocation) -> InvocationResult {
///         // ...
///     }
/// }
///
/// let value = Arc::clone(&ledger)
///     .post_intercepted(container.as_ref(), vec![json!(42)])
///     .await?;
/// ```
#[proc_macro_attribute]
pub fn intercepted(args: TokenStream, input: TokenStream) -> TokenStream {
    interception::intercepted_impl(args, input)
}

/// 组件派生宏
///
/// 只实现 `Component` trait，不参与声明式扫描。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Component)]
/// #[initializer]
/// pub struct CacheWarmup;
/// ```
#[proc_macro_derive(Component, attributes(initializer))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
}
