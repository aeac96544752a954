//! 容器能力接口
//!
//! 组合内核对后端容器的全部要求

use crate::component::{Injectable, Provides};
use crate::initializer::Initializer;
use crate::instance::Instance;
use infrastructure_common::{DependencyError, DependencyResult, Lifecycle, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 激活函数：使用容器构造一个实例
pub type Activator = Arc<dyn Fn(&dyn ObjectContainer) -> DependencyResult<Instance> + Send + Sync>;

/// 可构造的组件类型
///
/// 记录实现类型、激活后的服务视图以及激活函数。
/// 自注册时服务视图就是实现类型本身。
#[derive(Clone)]
pub struct ComponentType {
    target: TypeInfo,
    service: TypeInfo,
    initializable: bool,
    activator: Activator,
}

impl ComponentType {
    /// 自注册类型
    pub fn of<T: Injectable>() -> Self {
        Self {
            target: TypeInfo::of::<T>(),
            service: TypeInfo::of::<T>(),
            initializable: T::initializer().is_some(),
            activator: Arc::new(|container: &dyn ObjectContainer| {
                T::inject(container).map(|component| Instance::of_component(Arc::new(component)))
            }),
        }
    }

    /// 以契约 `C` 激活的类型
    pub fn providing<C, T>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<C>,
    {
        Self {
            target: TypeInfo::of::<T>(),
            service: TypeInfo::of::<C>(),
            initializable: T::initializer().is_some(),
            activator: Arc::new(|container: &dyn ObjectContainer| {
                T::inject(container).map(|component| Instance::provided::<C, T>(Arc::new(component)))
            }),
        }
    }

    /// 使用自定义激活函数
    pub fn from_activator(
        target: TypeInfo,
        service: TypeInfo,
        initializable: bool,
        activator: Activator,
    ) -> Self {
        Self {
            target,
            service,
            initializable,
            activator,
        }
    }

    /// 实现类型
    pub fn target_type(&self) -> TypeInfo {
        self.target
    }

    /// 激活后的服务类型
    pub fn service_type(&self) -> TypeInfo {
        self.service
    }

    /// 实现类型是否具备初始化能力
    pub fn is_initializable(&self) -> bool {
        self.initializable
    }

    /// 构造实例
    pub fn activate(&self, container: &dyn ObjectContainer) -> DependencyResult<Instance> {
        (self.activator)(container)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("target", &self.target)
            .field("service", &self.service)
            .field("initializable", &self.initializable)
            .finish()
    }
}

/// 容器能力接口
///
/// 名称 `None` 与 `Some("")` 等价，表示服务类型的默认注册。
/// 一个服务类型最多一个默认注册，可以有任意多个命名注册。
pub trait ObjectContainer: Send + Sync {
    /// 检查是否已注册
    fn is_registered(&self, service: &TypeInfo, name: Option<&str>) -> bool;

    /// 注册固定实例
    fn register_instance(
        &self,
        contract: &TypeInfo,
        instance: Instance,
        name: Option<&str>,
    ) -> DependencyResult<()>;

    /// 自注册类型，契约类型即实现类型
    fn register_type(
        &self,
        target: &ComponentType,
        name: Option<&str>,
        lifecycle: Lifecycle,
    ) -> DependencyResult<()> {
        self.register_contract(&target.target_type(), target, name, lifecycle)
    }

    /// 以契约类型注册实现类型
    fn register_contract(
        &self,
        contract: &TypeInfo,
        target: &ComponentType,
        name: Option<&str>,
        lifecycle: Lifecycle,
    ) -> DependencyResult<()>;

    /// 解析实例，未注册时返回 [`DependencyError::ComponentNotRegistered`]
    fn resolve(&self, service: &TypeInfo, name: Option<&str>) -> DependencyResult<Instance>;

    /// 解析服务类型的全部实例，未注册时返回空列表
    fn resolve_all(&self, service: &TypeInfo) -> DependencyResult<Vec<Instance>>;

    /// 容器自身的初始化钩子
    fn as_initializer(self: Arc<Self>) -> Option<Arc<dyn Initializer>> {
        None
    }
}

/// 规范化注册名称
pub fn normalize_name(name: Option<&str>) -> &str {
    name.unwrap_or_default()
}

/// 带类型参数的容器扩展方法
pub trait ObjectContainerExt: ObjectContainer {
    /// 解析默认注册
    fn get<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_named::<T>(None)
    }

    /// 解析命名注册
    fn get_named<T>(&self, name: Option<&str>) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve(&TypeInfo::of::<T>(), name)?;
        downcast_instance(&instance)
    }

    /// 解析全部注册
    fn get_all<T>(&self) -> DependencyResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all(&TypeInfo::of::<T>())?
            .iter()
            .map(downcast_instance::<T>)
            .collect()
    }

    /// 检查是否已注册
    fn contains<T>(&self, name: Option<&str>) -> bool
    where
        T: ?Sized + 'static,
    {
        self.is_registered(&TypeInfo::of::<T>(), name)
    }
}

impl<C: ObjectContainer + ?Sized> ObjectContainerExt for C {}

fn downcast_instance<T>(instance: &Instance) -> DependencyResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast::<T>()
        .ok_or_else(|| DependencyError::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: instance.service_type().name().to_string(),
        })
}
