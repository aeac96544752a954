//! 组件描述符
//!
//! 描述一次期望的服务注册：契约类型、实现类型、名称、生命周期以及可选的固定实例。
//! 描述符只存在于启动阶段，注册进容器后即被丢弃。

use crate::component::{Component, Injectable, Provides};
use crate::container::{ComponentType, ObjectContainer};
use crate::instance::Instance;
use infrastructure_common::{
    CompositionError, CompositionResult, DependencyError, DependencyResult, Lifecycle, TypeInfo,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 组件标识：有效契约类型 + 契约名称
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    service: TypeInfo,
    name: String,
}

impl ComponentKey {
    /// 创建组件标识
    pub fn new(service: TypeInfo, name: impl Into<String>) -> Self {
        Self {
            service,
            name: name.into(),
        }
    }

    /// 服务类型
    pub fn service_type(&self) -> TypeInfo {
        self.service
    }

    /// 契约名称
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.service)
        } else {
            write!(f, "{}|{}", self.service, self.name)
        }
    }
}

/// 组件描述符
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    contract: Option<TypeInfo>,
    target: Option<ComponentType>,
    name: String,
    lifecycle: Lifecycle,
    instance: Option<Instance>,
}

impl ComponentDescriptor {
    /// 创建描述符
    ///
    /// 提供实例时生命周期强制为 [`Lifecycle::Singleton`]
    pub fn new(
        contract: Option<TypeInfo>,
        target: Option<ComponentType>,
        name: impl Into<String>,
        lifecycle: Lifecycle,
        instance: Option<Instance>,
    ) -> Self {
        let lifecycle = if instance.is_some() {
            Lifecycle::Singleton
        } else {
            lifecycle
        };
        Self {
            contract,
            target,
            name: name.into(),
            lifecycle,
            instance,
        }
    }

    /// 自注册类型
    pub fn of<T: Injectable>() -> Self {
        Self::new(
            None,
            Some(ComponentType::of::<T>()),
            "",
            Lifecycle::Singleton,
            None,
        )
    }

    /// 以契约 `C` 注册类型 `T`
    pub fn contract<C, T>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<C>,
    {
        Self::new(
            Some(TypeInfo::of::<C>()),
            Some(ComponentType::providing::<C, T>()),
            "",
            Lifecycle::Singleton,
            None,
        )
    }

    /// 注册固定实例，服务类型即实例类型
    pub fn instance<T: Component>(value: Arc<T>) -> Self {
        Self::new(
            None,
            None,
            "",
            Lifecycle::Singleton,
            Some(Instance::of_component(value)),
        )
    }

    /// 以契约 `C` 注册固定实例
    pub fn instance_as<C, T>(value: Arc<T>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Provides<C>,
    {
        Self::new(
            Some(TypeInfo::of::<C>()),
            None,
            "",
            Lifecycle::Singleton,
            Some(Instance::provided::<C, T>(value)),
        )
    }

    /// 设置契约名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置生命周期，已有固定实例时保持单例
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        if self.instance.is_none() {
            self.lifecycle = lifecycle;
        }
        self
    }

    /// 声明的契约类型
    pub fn contract_type(&self) -> Option<TypeInfo> {
        self.contract
    }

    /// 实现类型
    pub fn target(&self) -> Option<&ComponentType> {
        self.target.as_ref()
    }

    /// 契约名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 生命周期
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// 固定实例
    pub fn instance_value(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    /// 有效契约类型：声明的契约，否则实现类型，否则实例类型
    pub fn service_type(&self) -> Option<TypeInfo> {
        self.contract
            .or_else(|| self.target.as_ref().map(ComponentType::service_type))
            .or_else(|| self.instance.as_ref().map(Instance::service_type))
    }

    /// 组件标识
    pub fn key(&self) -> Option<ComponentKey> {
        self.service_type()
            .map(|service| ComponentKey::new(service, self.name.clone()))
    }

    /// 校验描述符是否可以注册
    pub fn validate(&self) -> CompositionResult<()> {
        let Some(contract) = self.contract else {
            if self.target.is_none() && self.instance.is_none() {
                return Err(CompositionError::ContractRequired);
            }
            return Ok(());
        };

        let provided = match (&self.instance, &self.target) {
            (Some(instance), _) => instance.service_type(),
            (None, Some(target)) => target.service_type(),
            (None, None) => {
                return Err(CompositionError::ImplementationRequired {
                    contract: contract.name().to_string(),
                })
            }
        };

        if provided != contract {
            return Err(CompositionError::ContractMismatch {
                contract: contract.name().to_string(),
                provided: provided.name().to_string(),
            });
        }
        Ok(())
    }

    /// 是否需要在启动阶段提前初始化
    ///
    /// 只有单例，且实现类型或固定实例具备初始化能力时才需要
    pub fn must_be_initialized(&self) -> bool {
        if self.lifecycle != Lifecycle::Singleton {
            return false;
        }
        match &self.instance {
            Some(instance) => instance.initializer().is_some(),
            None => self
                .target
                .as_ref()
                .is_some_and(ComponentType::is_initializable),
        }
    }

    /// 注册到容器
    ///
    /// 容器中已存在相同标识时静默跳过，返回 `false`
    pub fn register(&self, container: &dyn ObjectContainer) -> DependencyResult<bool> {
        let service = self.require_service_type()?;
        let name = Some(self.name.as_str());

        if container.is_registered(&service, name) {
            debug!("组件已存在于容器中，跳过: {}", self);
            return Ok(false);
        }

        match (&self.instance, &self.target) {
            (Some(instance), _) => container.register_instance(&service, instance.clone(), name)?,
            (None, Some(target)) => match self.contract {
                None => container.register_type(target, name, self.lifecycle)?,
                Some(contract) => {
                    container.register_contract(&contract, target, name, self.lifecycle)?
                }
            },
            (None, None) => {
                return Err(DependencyError::RegistrationError {
                    type_name: service.name().to_string(),
                    message: "缺少实现类型或实例".to_string(),
                })
            }
        }

        debug!("注册组件: {} ({})", self, self.lifecycle);
        Ok(true)
    }

    /// 从容器解析该描述符对应的实例
    pub fn get_instance(&self, container: &dyn ObjectContainer) -> DependencyResult<Instance> {
        let service = self.require_service_type()?;
        container.resolve(&service, Some(self.name.as_str()))
    }

    fn require_service_type(&self) -> DependencyResult<TypeInfo> {
        self.service_type()
            .ok_or_else(|| DependencyError::RegistrationError {
                type_name: "<unknown>".to_string(),
                message: "组件描述缺少契约类型和实现类型".to_string(),
            })
    }
}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{}", key),
            None => write!(f, "<invalid>"),
        }
    }
}
