//! 组件基础接口定义
//!
//! 具体组件类型需要实现的基础 trait

use crate::container::ObjectContainer;
use crate::initializer::Initializer;
use infrastructure_common::DependencyResult;
use std::sync::Arc;

/// 初始化视图：把具体组件转换为 `Arc<dyn Initializer>`
pub type InitializerView<T> = fn(Arc<T>) -> Arc<dyn Initializer>;

/// 组件基础 trait
///
/// 所有由容器管理的具体类型都实现此 trait。
pub trait Component: Send + Sync + Sized + 'static {
    /// 如果组件实现了 [`Initializer`]，返回它的初始化视图
    ///
    /// 启动协调器据此挑选需要提前初始化的单例。
    fn initializer() -> Option<InitializerView<Self>> {
        None
    }
}

/// 可注入组件 trait
///
/// 容器通过此 trait 构造类型注册的实例
pub trait Injectable: Component {
    /// 使用容器构建组件实例
    fn inject(container: &dyn ObjectContainer) -> DependencyResult<Self>;
}

/// 契约提供 trait
///
/// 声明具体类型可以作为契约 `C` 被解析
pub trait Provides<C: ?Sized + Send + Sync + 'static>: Component {
    /// 转换为契约视图
    fn provide(self: Arc<Self>) -> Arc<C>;
}

/// 通用的初始化视图实现，供 [`Component::initializer`] 直接引用
pub fn as_initializer<T: Initializer + 'static>(component: Arc<T>) -> Arc<dyn Initializer> {
    component
}
