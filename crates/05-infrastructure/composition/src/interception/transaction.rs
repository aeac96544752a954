//! 事务拦截器
//!
//! 每次调用创建一个工作单元并绑定到调用上下文，
//! 成功时提交，无论成功失败都会释放。

use super::chain::{Interceptor, Next};
use super::invocation::{Invocation, InvocationResult, OperationId};
use super::provider::InterceptorFactory;
use super::TRANSACTION_INTERCEPTOR;
use async_trait::async_trait;
use di_abstractions::{Component, Injectable, ObjectContainer, ObjectContainerExt, Provides};
use infrastructure_common::{BoxError, DependencyResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// 工作单元
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 提交
    async fn commit(&self) -> Result<(), BoxError>;

    /// 释放，不论是否提交都会调用
    async fn release(&self);
}

/// 工作单元工厂
pub trait UnitOfWorkFactory: Send + Sync {
    /// 为一次调用创建工作单元
    fn create(&self, operation: &OperationId) -> Result<Arc<dyn UnitOfWork>, BoxError>;
}

/// 读取当前调用绑定的工作单元
pub fn current_unit_of_work(invocation: &Invocation) -> Option<Arc<dyn UnitOfWork>> {
    invocation.context::<dyn UnitOfWork>()
}

/// 事务拦截器
pub struct TransactionInterceptor {
    factory: Arc<dyn UnitOfWorkFactory>,
}

impl TransactionInterceptor {
    /// 使用工作单元工厂创建拦截器
    pub fn new(factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl Interceptor for TransactionInterceptor {
    fn name(&self) -> &str {
        TRANSACTION_INTERCEPTOR
    }

    async fn invoke(&self, mut invocation: Invocation, next: Next<'_>) -> InvocationResult {
        let operation = invocation.operation();
        let unit = self.factory.create(&operation)?;
        invocation.bind::<dyn UnitOfWork>(Arc::clone(&unit));
        debug!("开始工作单元: {} ({})", operation, invocation.id());

        let result = match next.run(invocation).await {
            Ok(value) => unit.commit().await.map(|()| value),
            Err(error) => {
                warn!("调用失败，工作单元未提交: {}, 原因: {}", operation, error);
                Err(error)
            }
        };

        unit.release().await;
        debug!("释放工作单元: {}", operation);
        result
    }
}

/// 事务拦截器工厂
///
/// 构建调用链时从容器解析 `dyn UnitOfWorkFactory`
#[derive(Debug, Default)]
pub struct TransactionInterceptorFactory;

impl InterceptorFactory for TransactionInterceptorFactory {
    fn create(&self, container: &dyn ObjectContainer) -> DependencyResult<Arc<dyn Interceptor>> {
        let factory = container.get::<dyn UnitOfWorkFactory>()?;
        Ok(Arc::new(TransactionInterceptor::new(factory)))
    }
}

impl Component for TransactionInterceptorFactory {}

impl Injectable for TransactionInterceptorFactory {
    fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self)
    }
}

impl Provides<dyn InterceptorFactory> for TransactionInterceptorFactory {
    fn provide(self: Arc<Self>) -> Arc<dyn InterceptorFactory> {
        self
    }
}
