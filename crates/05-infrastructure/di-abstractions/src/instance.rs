//! 类型擦除的组件实例

use crate::component::{Component, Provides};
use crate::initializer::Initializer;
use infrastructure_common::TypeInfo;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 组件实例
///
/// 内部保存 `Arc<C>`（`C` 可以是 `dyn Trait`），同时记录它的服务类型、
/// 共享对象地址，以及构造时捕获的初始化视图。
#[derive(Clone)]
pub struct Instance {
    service: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
    identity: usize,
    initializer: Option<Arc<dyn Initializer>>,
}

impl Instance {
    /// 以 `C` 作为服务类型包装实例
    pub fn new<C>(value: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let identity = Arc::as_ptr(&value) as *const () as usize;
        Self {
            service: TypeInfo::of::<C>(),
            value: Arc::new(value),
            identity,
            initializer: None,
        }
    }

    /// 包装具体组件，自身即服务类型
    pub fn of_component<T: Component>(value: Arc<T>) -> Self {
        let initializer = T::initializer().map(|view| view(Arc::clone(&value)));
        Self {
            initializer,
            ..Self::new(value)
        }
    }

    /// 包装具体组件，以契约 `C` 作为服务类型
    pub fn provided<C, T>(value: Arc<T>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Provides<C>,
    {
        let initializer = T::initializer().map(|view| view(Arc::clone(&value)));
        Self {
            initializer,
            ..Self::new(value.provide())
        }
    }

    /// 附加初始化视图
    pub fn with_initializer(mut self, initializer: Arc<dyn Initializer>) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// 服务类型
    pub fn service_type(&self) -> TypeInfo {
        self.service
    }

    /// 共享对象地址，同一对象的不同契约视图相同
    pub fn identity(&self) -> usize {
        self.identity
    }

    /// 是否为同一个共享对象
    pub fn same_instance(&self, other: &Instance) -> bool {
        self.identity == other.identity
    }

    /// 初始化视图
    pub fn initializer(&self) -> Option<&Arc<dyn Initializer>> {
        self.initializer.as_ref()
    }

    /// 还原为具体的服务类型
    pub fn downcast<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.value.downcast_ref::<Arc<C>>().cloned()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("service", &self.service)
            .field("identity", &format_args!("{:#x}", self.identity))
            .field("initializable", &self.initializer.is_some())
            .finish()
    }
}
