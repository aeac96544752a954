//! # 依赖注入具体实现
//!
//! 提供一个满足容器能力接口的参考容器实现：
//! 按服务类型保存注册顺序、单例惰性构建一次、检测循环依赖，
//! 并在初始化钩子中封闭容器。

use async_trait::async_trait;
use di_abstractions::{
    normalize_name, Artifact, ComponentKey, ComponentType, Initializer, Instance, ObjectContainer,
};
use infrastructure_common::{BoxError, DependencyError, DependencyResult, Lifecycle, TypeInfo};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// 注册来源
enum Source {
    /// 固定实例
    Instance(Instance),
    /// 通过激活函数构建
    Activator {
        target: ComponentType,
        lifecycle: Lifecycle,
        singleton: OnceCell<Instance>,
    },
}

/// 单条注册信息
struct Registration {
    key: ComponentKey,
    source: Source,
}

#[derive(Default)]
struct Registrations {
    by_service: HashMap<TypeInfo, Vec<Arc<Registration>>>,
    order: Vec<ComponentKey>,
}

thread_local! {
    /// 当前线程正在构建的注册，用于检测循环依赖
    static RESOLVING: RefCell<Vec<(usize, ComponentKey)>> = const { RefCell::new(Vec::new()) };
}

/// 构建栈守卫，离开作用域时出栈
struct ResolutionGuard;

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// 具体的依赖注入容器实现
pub struct DiContainerImpl {
    /// 组件注册信息
    registrations: RwLock<Registrations>,
    /// 初始化钩子执行后不再接受注册
    sealed: AtomicBool,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(Registrations::default()),
            sealed: AtomicBool::new(false),
        }
    }

    /// 创建共享容器
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// 是否已封闭
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// 封闭容器
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::AcqRel) {
            info!("容器已封闭，共 {} 个注册", self.len());
        }
    }

    /// 注册数量
    pub fn len(&self) -> usize {
        self.registrations.read().order.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按注册顺序列出所有组件标识
    pub fn registered_keys(&self) -> Vec<ComponentKey> {
        self.registrations.read().order.clone()
    }

    fn insert(&self, key: ComponentKey, source: Source) -> DependencyResult<()> {
        if self.is_sealed() {
            return Err(DependencyError::ContainerSealed {
                type_name: key.to_string(),
            });
        }

        let mut registrations = self.registrations.write();
        let entries = registrations
            .by_service
            .entry(key.service_type())
            .or_default();
        if entries.iter().any(|entry| entry.key.name() == key.name()) {
            return Err(DependencyError::AlreadyRegistered {
                type_name: key.service_type().name().to_string(),
                name: key.name().to_string(),
            });
        }

        entries.push(Arc::new(Registration {
            key: key.clone(),
            source,
        }));
        registrations.order.push(key);
        Ok(())
    }

    fn find(&self, service: &TypeInfo, name: Option<&str>) -> Option<Arc<Registration>> {
        let name = normalize_name(name);
        self.registrations
            .read()
            .by_service
            .get(service)
            .and_then(|entries| entries.iter().find(|entry| entry.key.name() == name))
            .cloned()
    }

    fn activate(&self, registration: &Registration) -> DependencyResult<Instance> {
        match &registration.source {
            Source::Instance(instance) => Ok(instance.clone()),
            Source::Activator {
                target,
                lifecycle: Lifecycle::Singleton,
                singleton,
            } => {
                if let Some(instance) = singleton.get() {
                    return Ok(instance.clone());
                }
                let _guard = self.enter(&registration.key)?;
                singleton
                    .get_or_try_init(|| self.build(&registration.key, target))
                    .cloned()
            }
            Source::Activator {
                target,
                lifecycle: Lifecycle::Transient,
                ..
            } => {
                let _guard = self.enter(&registration.key)?;
                self.build(&registration.key, target)
            }
        }
    }

    fn build(&self, key: &ComponentKey, target: &ComponentType) -> DependencyResult<Instance> {
        debug!("构建组件: {} <- {}", key, target.target_type());
        target.activate(self)
    }

    fn enter(&self, key: &ComponentKey) -> DependencyResult<ResolutionGuard> {
        let frame = (self as *const Self as usize, key.clone());
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().position(|entry| entry == &frame) {
                let mut chain: Vec<String> = stack[position..]
                    .iter()
                    .map(|(_, key)| key.to_string())
                    .collect();
                chain.push(key.to_string());
                return Err(DependencyError::CircularDependency {
                    dependency_chain: chain.join(" -> "),
                });
            }
            stack.push(frame);
            Ok(ResolutionGuard)
        })
    }
}

impl Default for DiContainerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectContainer for DiContainerImpl {
    fn is_registered(&self, service: &TypeInfo, name: Option<&str>) -> bool {
        self.find(service, name).is_some()
    }

    fn register_instance(
        &self,
        contract: &TypeInfo,
        instance: Instance,
        name: Option<&str>,
    ) -> DependencyResult<()> {
        if instance.service_type() != *contract {
            return Err(DependencyError::RegistrationError {
                type_name: contract.name().to_string(),
                message: format!("实例类型为 {}", instance.service_type()),
            });
        }

        let key = ComponentKey::new(*contract, normalize_name(name));
        debug!("注册实例: {}", key);
        self.insert(key, Source::Instance(instance))
    }

    fn register_contract(
        &self,
        contract: &TypeInfo,
        target: &ComponentType,
        name: Option<&str>,
        lifecycle: Lifecycle,
    ) -> DependencyResult<()> {
        if target.service_type() != *contract {
            return Err(DependencyError::RegistrationError {
                type_name: contract.name().to_string(),
                message: format!("实现类型 {} 不能作为该契约解析", target.target_type()),
            });
        }

        let key = ComponentKey::new(*contract, normalize_name(name));
        debug!("注册组件: {} -> {} ({})", key, target.target_type(), lifecycle);
        self.insert(
            key,
            Source::Activator {
                target: target.clone(),
                lifecycle,
                singleton: OnceCell::new(),
            },
        )
    }

    fn resolve(&self, service: &TypeInfo, name: Option<&str>) -> DependencyResult<Instance> {
        let registration = self
            .find(service, name)
            .ok_or_else(|| DependencyError::not_registered(service.name(), name))?;
        self.activate(&registration)
    }

    fn resolve_all(&self, service: &TypeInfo) -> DependencyResult<Vec<Instance>> {
        let entries = self
            .registrations
            .read()
            .by_service
            .get(service)
            .cloned()
            .unwrap_or_default();
        entries
            .iter()
            .map(|registration| self.activate(registration))
            .collect()
    }

    fn as_initializer(self: Arc<Self>) -> Option<Arc<dyn Initializer>> {
        Some(self)
    }
}

#[async_trait]
impl Initializer for DiContainerImpl {
    async fn initialize(
        &self,
        _container: Arc<dyn ObjectContainer>,
        artifacts: &[Artifact],
    ) -> Result<(), BoxError> {
        debug!("容器初始化，已发现 {} 个制品", artifacts.len());
        self.seal();
        Ok(())
    }
}
