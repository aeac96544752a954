//! 日志拦截器

use super::chain::{Interceptor, Next};
use super::invocation::{Invocation, InvocationResult};
use super::provider::InterceptorFactory;
use super::LOGGING_INTERCEPTOR;
use async_trait::async_trait;
use di_abstractions::{Component, Injectable, ObjectContainer, Provides};
use infrastructure_common::DependencyResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 记录调用开始、结束与耗时
#[derive(Debug, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        LOGGING_INTERCEPTOR
    }

    async fn invoke(&self, invocation: Invocation, next: Next<'_>) -> InvocationResult {
        let operation = invocation.operation();
        let id = invocation.id();
        let started = Instant::now();
        info!(
            "调用开始: {} ({}), 参数 {} 个",
            operation,
            id,
            invocation.arguments().len()
        );

        let result = next.run(invocation).await;
        let elapsed = started.elapsed().as_millis();
        match &result {
            Ok(_) => info!("调用完成: {} ({}), 耗时 {}ms", operation, id, elapsed),
            Err(error) => warn!(
                "调用失败: {} ({}), 耗时 {}ms, 原因: {}",
                operation, id, elapsed, error
            ),
        }
        result
    }
}

/// 日志拦截器工厂
#[derive(Debug, Default)]
pub struct LoggingInterceptorFactory;

impl InterceptorFactory for LoggingInterceptorFactory {
    fn create(&self, _container: &dyn ObjectContainer) -> DependencyResult<Arc<dyn Interceptor>> {
        Ok(Arc::new(LoggingInterceptor))
    }
}

impl Component for LoggingInterceptorFactory {}

impl Injectable for LoggingInterceptorFactory {
    fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self)
    }
}

impl Provides<dyn InterceptorFactory> for LoggingInterceptorFactory {
    fn provide(self: Arc<Self>) -> Arc<dyn InterceptorFactory> {
        self
    }
}
