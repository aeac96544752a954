//! 组件描述符与参考容器的集中集成测试

use async_trait::async_trait;
use di_abstractions::{
    as_initializer, Artifact, Component, ComponentDescriptor, Initializer, InitializerView,
    Injectable, ObjectContainer, ObjectContainerExt, Provides,
};
use di_impl::DiContainerImpl;
use infrastructure_common::{BoxError, DependencyError, DependencyResult, Lifecycle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 仓储契约
trait Repository: Send + Sync {
    fn find(&self, id: u32) -> Option<String>;
}

/// 内存仓储，初始化时加载种子数据
#[derive(Default)]
struct MemoryRepository {
    loads: AtomicUsize,
}

impl Repository for MemoryRepository {
    fn find(&self, id: u32) -> Option<String> {
        (id == 1).then(|| "ada".to_string())
    }
}

impl Component for MemoryRepository {
    fn initializer() -> Option<InitializerView<Self>> {
        Some(as_initializer::<Self>)
    }
}

impl Injectable for MemoryRepository {
    fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self::default())
    }
}

impl Provides<dyn Repository> for MemoryRepository {
    fn provide(self: Arc<Self>) -> Arc<dyn Repository> {
        self
    }
}

#[async_trait]
impl Initializer for MemoryRepository {
    async fn initialize(
        &self,
        _container: Arc<dyn ObjectContainer>,
        _artifacts: &[Artifact],
    ) -> Result<(), BoxError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 依赖仓储的服务
struct UserService {
    repository: Arc<dyn Repository>,
}

impl Component for UserService {}

impl Injectable for UserService {
    fn inject(container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self {
            repository: container.get::<dyn Repository>()?,
        })
    }
}

#[test]
fn test_descriptor_registers_into_container() {
    let container = DiContainerImpl::new();
    let repository = ComponentDescriptor::contract::<dyn Repository, MemoryRepository>();
    let service = ComponentDescriptor::of::<UserService>().with_lifecycle(Lifecycle::Transient);

    assert!(repository.register(&container).unwrap());
    assert!(service.register(&container).unwrap());
    // 已存在相同标识时跳过
    assert!(!repository.register(&container).unwrap());
    assert_eq!(container.len(), 2);

    let user = container.get::<UserService>().unwrap();
    assert_eq!(user.repository.find(1).as_deref(), Some("ada"));
    assert_eq!(user.repository.find(2), None);
}

#[test]
fn test_descriptor_instance_shares_identity() {
    let container = DiContainerImpl::new();
    let repository = Arc::new(MemoryRepository::default());
    let descriptor =
        ComponentDescriptor::instance_as::<dyn Repository, _>(Arc::clone(&repository)).named("seed");

    descriptor.register(&container).unwrap();
    let instance = descriptor.get_instance(&container).unwrap();

    assert_eq!(instance.identity(), Arc::as_ptr(&repository) as usize);
    assert!(instance.initializer().is_some());
    assert!(descriptor.must_be_initialized());
}

#[tokio::test]
async fn test_initializer_runs_on_resolved_singleton() {
    let container = DiContainerImpl::shared();
    let descriptor = ComponentDescriptor::contract::<dyn Repository, MemoryRepository>();
    descriptor.register(container.as_ref()).unwrap();

    let instance = descriptor.get_instance(container.as_ref()).unwrap();
    let initializer = instance.initializer().unwrap();
    initializer.initialize(container.clone(), &[]).await.unwrap();

    // 再次解析得到同一个单例
    let again = descriptor.get_instance(container.as_ref()).unwrap();
    assert!(instance.same_instance(&again));
}

#[test]
fn test_missing_dependency_reported() {
    let container = DiContainerImpl::new();
    ComponentDescriptor::of::<UserService>()
        .register(&container)
        .unwrap();

    let result = container.get::<UserService>();
    assert!(matches!(
        result,
        Err(DependencyError::ComponentNotRegistered { .. })
    ));
}

#[tokio::test]
async fn test_sealed_container_rejects_descriptors() {
    let container = DiContainerImpl::shared();
    let as_object: Arc<dyn ObjectContainer> = container.clone();
    as_object
        .clone()
        .as_initializer()
        .unwrap()
        .initialize(as_object, &[])
        .await
        .unwrap();

    let result = ComponentDescriptor::of::<UserService>().register(container.as_ref());
    assert!(matches!(result, Err(DependencyError::ContainerSealed { .. })));
}
