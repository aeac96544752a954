//! 组件宏集成测试
//!
//! 通过声明式扫描完成启动，并经拦截管道调用声明了拦截器的组件

use async_trait::async_trait;
use di_impl::DiContainerImpl;
use infrastructure_composition::common::{BoxError, DependencyResult, TypeInfo};
use infrastructure_composition::di::{
    Artifact, Initializer, Injectable, ObjectContainer, ObjectContainerExt, Provides,
};
use infrastructure_composition::interception::{
    current_unit_of_work, InterceptorProvider, Invocation, InvocationResult, OperationId,
    UnitOfWork, UnitOfWorkFactory,
};
use infrastructure_composition::{
    component, intercepted, lifecycle, BootstrapOptions, BootstrapStatus, Bootstrapper,
    Component, TextSerializer,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

/// 默认问候
#[component(contract = dyn Greeter, default)]
#[derive(Debug, Default)]
pub struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {}", name)
    }
}

/// 命名问候
#[component(contract = dyn Greeter, name = "fr", default)]
#[derive(Debug, Default)]
pub struct FrenchGreeter;

impl Greeter for FrenchGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Bonjour, {}", name)
    }
}

/// 每次解析都新建的接待服务
#[component]
#[lifecycle(transient)]
pub struct Reception {
    greeter: Arc<dyn Greeter>,
}

impl Injectable for Reception {
    fn inject(container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self {
            greeter: container.get::<dyn Greeter>()?,
        })
    }
}

/// 只实现 Component，由宿主显式注册
#[derive(Component, Default)]
#[initializer]
pub struct Warmup {
    done: AtomicBool,
}

#[async_trait]
impl Initializer for Warmup {
    async fn initialize(
        &self,
        container: Arc<dyn ObjectContainer>,
        _artifacts: &[Artifact],
    ) -> Result<(), BoxError> {
        // 注册阶段已经结束，可以解析任何组件
        container.get::<dyn Greeter>()?;
        self.done.store(true, Ordering::SeqCst);
        Ok(())
    }
}

static COMMITS: AtomicUsize = AtomicUsize::new(0);
static RELEASES: AtomicUsize = AtomicUsize::new(0);

struct CountingUnit;

#[async_trait]
impl UnitOfWork for CountingUnit {
    async fn commit(&self) -> Result<(), BoxError> {
        COMMITS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&self) {
        RELEASES.fetch_add(1, Ordering::SeqCst);
    }
}

/// 通过扫描注册的工作单元工厂
#[component(contract = dyn UnitOfWorkFactory, default)]
#[derive(Default)]
pub struct CountingUnits;

impl UnitOfWorkFactory for CountingUnits {
    fn create(&self, _operation: &OperationId) -> Result<Arc<dyn UnitOfWork>, BoxError> {
        Ok(Arc::new(CountingUnit))
    }
}

/// 组件级日志拦截，开户操作另加事务
#[component(default, interceptors = ["logging"])]
#[derive(Default)]
pub struct Accounts;

#[intercepted]
impl Accounts {
    #[intercept("transaction")]
    pub async fn open(&self, invocation: &Invocation) -> InvocationResult {
        if current_unit_of_work(invocation).is_none() {
            return Err("没有工作单元".into());
        }
        let owner = invocation
            .argument(0)
            .and_then(Value::as_str)
            .ok_or("缺少开户人")?;
        Ok(json!({ "owner": owner, "balance": 0 }))
    }
}

async fn bootstrap() -> (Arc<DiContainerImpl>, Arc<Warmup>) {
    let container = DiContainerImpl::shared();
    let warmup = Arc::new(Warmup::default());

    let mut bootstrapper = Bootstrapper::new();
    bootstrapper.register_instance(Arc::clone(&warmup)).unwrap();
    bootstrapper.complete(container.clone()).await.unwrap();
    assert_eq!(bootstrapper.status(), BootstrapStatus::Ready);
    assert_eq!(
        bootstrapper.report().unwrap().registered,
        container.len()
    );

    (container, warmup)
}

#[tokio::test]
async fn test_scanned_components_are_registered() {
    let (container, warmup) = bootstrap().await;

    assert_eq!(container.get::<dyn Greeter>().unwrap().greet("Ada"), "Hello, Ada");
    assert_eq!(
        container
            .get_named::<dyn Greeter>(Some("fr"))
            .unwrap()
            .greet("Ada"),
        "Bonjour, Ada"
    );
    assert_eq!(container.get_all::<dyn Greeter>().unwrap().len(), 2);
    assert!(warmup.done.load(Ordering::SeqCst));

    // 内置组件同样可用
    let serializer = container.get::<dyn TextSerializer>().unwrap();
    assert_eq!(serializer.serialize(&json!([1, 2])).unwrap(), "[1,2]");
}

#[tokio::test]
async fn test_lifecycle_attribute_makes_transient() {
    let (container, _) = bootstrap().await;

    let first = container.get::<Reception>().unwrap();
    let second = container.get::<Reception>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.greeter, &second.greeter));
    assert_eq!(first.greeter.greet("Lin"), "Hello, Lin");
}

#[tokio::test]
async fn test_declared_interceptors_wrap_operation() {
    let (container, _) = bootstrap().await;
    let provider = container.get::<dyn InterceptorProvider>().unwrap();

    let chain = provider
        .chain(container.as_ref(), &Accounts::OPEN_OPERATION)
        .unwrap();
    assert_eq!(chain.names(), vec!["logging", "transaction"]);

    let accounts = container.get::<Accounts>().unwrap();

    // 直接调用不经过调用链，没有工作单元
    let direct = accounts
        .open(&Invocation::new(Accounts::OPEN_OPERATION).with_argument(json!("ada")))
        .await;
    assert!(direct.is_err());

    let value = Arc::clone(&accounts)
        .open_intercepted(container.as_ref(), vec![json!("ada")])
        .await
        .unwrap();

    assert_eq!(value, json!({ "owner": "ada", "balance": 0 }));
    assert_eq!(COMMITS.load(Ordering::SeqCst), 1);
    assert_eq!(RELEASES.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scanning_can_be_disabled() {
    let container = DiContainerImpl::shared();
    let mut bootstrapper = Bootstrapper::with_options(BootstrapOptions {
        scan_default_artifacts: false,
        ..BootstrapOptions::default()
    });
    bootstrapper.complete(container.clone()).await.unwrap();

    assert!(!container.is_registered(&TypeInfo::of::<dyn Greeter>(), None));
    assert!(container.contains::<dyn InterceptorProvider>(None));
}

#[test]
fn test_generated_contract_view() {
    let greeter: Arc<dyn Greeter> = Arc::new(FrenchGreeter).provide();
    assert_eq!(greeter.greet("Ada"), "Bonjour, Ada");
}
