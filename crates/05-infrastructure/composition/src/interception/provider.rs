//! 拦截器声明与调用链提供者

use super::chain::{Interceptor, InterceptorChain, InvocationTarget};
use super::invocation::{Invocation, InvocationResult, OperationId};
use dashmap::DashMap;
use di_abstractions::{Component, Injectable, ObjectContainer, ObjectContainerExt, Provides};
use infrastructure_common::{CompositionError, CompositionResult, DependencyError, DependencyResult};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// 拦截器工厂
///
/// 以名称注册到容器中，作为 `dyn InterceptorFactory` 的命名注册
pub trait InterceptorFactory: Send + Sync {
    /// 使用容器创建拦截器
    fn create(&self, container: &dyn ObjectContainer) -> DependencyResult<Arc<dyn Interceptor>>;
}

/// 拦截点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptionPoint {
    /// 组件的全部操作
    Component(&'static str),
    /// 单个操作
    Operation(OperationId),
}

impl InterceptionPoint {
    /// 是否作用于指定操作
    pub fn applies_to(&self, operation: &OperationId) -> bool {
        match self {
            Self::Component(component) => *component == operation.component,
            Self::Operation(target) => target == operation,
        }
    }
}

/// 拦截器声明：拦截点 + 有序的拦截器工厂名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorDeclaration {
    /// 拦截点
    pub point: InterceptionPoint,
    /// 工厂名称，第一个位于最外层
    pub interceptors: &'static [&'static str],
}

impl InterceptorDeclaration {
    /// 创建声明
    pub const fn new(point: InterceptionPoint, interceptors: &'static [&'static str]) -> Self {
        Self {
            point,
            interceptors,
        }
    }
}

inventory::collect!(InterceptorDeclaration);

/// 枚举编译期提交的拦截器声明
pub fn declared_interceptors() -> impl Iterator<Item = &'static InterceptorDeclaration> {
    inventory::iter::<InterceptorDeclaration>.into_iter()
}

/// 调用链提供者
pub trait InterceptorProvider: Send + Sync {
    /// 运行期追加声明
    fn declare(&self, declaration: InterceptorDeclaration);

    /// 获取操作的调用链
    fn chain(
        &self,
        container: &dyn ObjectContainer,
        operation: &OperationId,
    ) -> CompositionResult<Arc<InterceptorChain>>;
}

/// 声明列表及其版本，每次运行期声明后版本加一
struct Declarations {
    items: Vec<InterceptorDeclaration>,
    generation: u64,
}

/// 默认调用链提供者
///
/// 组件级声明在外，操作级声明在内，各自保持声明顺序。
/// 调用链按操作缓存；并发首次构建时先写入的结果胜出。
/// 构建期间声明发生变化时丢弃结果并重新构建，缓存中不会留下过期的调用链。
pub struct DefaultInterceptorProvider {
    declarations: RwLock<Declarations>,
    chains: DashMap<OperationId, Arc<InterceptorChain>>,
}

impl DefaultInterceptorProvider {
    /// 包含全部编译期声明
    pub fn new() -> Self {
        Self::with_declarations(declared_interceptors().copied())
    }

    /// 不含任何声明
    pub fn empty() -> Self {
        Self::with_declarations(std::iter::empty())
    }

    /// 使用给定声明
    pub fn with_declarations(declarations: impl IntoIterator<Item = InterceptorDeclaration>) -> Self {
        Self {
            declarations: RwLock::new(Declarations {
                items: declarations.into_iter().collect(),
                generation: 0,
            }),
            chains: DashMap::new(),
        }
    }

    /// 已缓存的调用链数量
    pub fn cached_chains(&self) -> usize {
        self.chains.len()
    }

    /// 操作对应的工厂名称，由外到内
    pub fn interceptor_names(&self, operation: &OperationId) -> Vec<&'static str> {
        self.snapshot(operation).0
    }

    /// 读取工厂名称和当前声明版本
    fn snapshot(&self, operation: &OperationId) -> (Vec<&'static str>, u64) {
        let declarations = self.declarations.read();
        (
            resolve_names(&declarations.items, operation),
            declarations.generation,
        )
    }

    fn build(
        &self,
        container: &dyn ObjectContainer,
        operation: &OperationId,
        names: Vec<&'static str>,
    ) -> CompositionResult<InterceptorChain> {
        let mut interceptors = Vec::with_capacity(names.len());

        for name in names {
            let chain_error = |source: DependencyError| {
                CompositionError::InterceptorChain {
                    operation: operation.to_string(),
                    interceptor: name.to_string(),
                    source: Box::new(source),
                }
            };
            let factory = container
                .get_named::<dyn InterceptorFactory>(Some(name))
                .map_err(chain_error)?;
            interceptors.push(factory.create(container).map_err(chain_error)?);
        }

        debug!("构建调用链: {}, {} 个拦截器", operation, interceptors.len());
        Ok(InterceptorChain::new(*operation, interceptors))
    }
}

/// 组件级声明在前，操作级声明在后
fn resolve_names(
    declarations: &[InterceptorDeclaration],
    operation: &OperationId,
) -> Vec<&'static str> {
    let component_level = declarations
        .iter()
        .filter(|declaration| matches!(declaration.point, InterceptionPoint::Component(_)));
    let operation_level = declarations
        .iter()
        .filter(|declaration| matches!(declaration.point, InterceptionPoint::Operation(_)));

    component_level
        .chain(operation_level)
        .filter(|declaration| declaration.point.applies_to(operation))
        .flat_map(|declaration| declaration.interceptors.iter().copied())
        .collect()
}

impl Default for DefaultInterceptorProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorProvider for DefaultInterceptorProvider {
    fn declare(&self, declaration: InterceptorDeclaration) {
        let mut declarations = self.declarations.write();
        declarations.items.push(declaration);
        declarations.generation += 1;
        self.chains.clear();
    }

    fn chain(
        &self,
        container: &dyn ObjectContainer,
        operation: &OperationId,
    ) -> CompositionResult<Arc<InterceptorChain>> {
        if let Some(chain) = self.chains.get(operation) {
            return Ok(Arc::clone(chain.value()));
        }

        loop {
            let (names, generation) = self.snapshot(operation);
            let built = Arc::new(self.build(container, operation, names)?);

            // 持有读锁写入缓存，与 declare 的写锁互斥
            let declarations = self.declarations.read();
            if declarations.generation != generation {
                debug!("构建期间声明已变化，重新构建调用链: {}", operation);
                continue;
            }
            let chain = self.chains.entry(*operation).or_insert(built);
            return Ok(Arc::clone(chain.value()));
        }
    }
}

impl Component for DefaultInterceptorProvider {}

impl Injectable for DefaultInterceptorProvider {
    fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self::new())
    }
}

impl Provides<dyn InterceptorProvider> for DefaultInterceptorProvider {
    fn provide(self: Arc<Self>) -> Arc<dyn InterceptorProvider> {
        self
    }
}

/// 通过提供者获取调用链并执行
pub async fn invoke_intercepted(
    provider: &dyn InterceptorProvider,
    container: &dyn ObjectContainer,
    invocation: Invocation,
    target: &dyn InvocationTarget,
) -> InvocationResult {
    let chain = provider.chain(container, &invocation.operation())?;
    chain.invoke(invocation, target).await
}
