//! 拦截器与调用链

use super::invocation::{Invocation, InvocationResult, OperationId};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// 拦截器
///
/// 可以在调用 `next` 之前或之后执行逻辑，也可以不调用 `next` 直接返回结果。
/// `next` 被 [`Next::run`] 消费，一次调用最多继续一次。
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// 拦截器名称
    fn name(&self) -> &str;

    /// 包装一次调用
    async fn invoke(&self, invocation: Invocation, next: Next<'_>) -> InvocationResult;
}

/// 调用链的终点：真实的方法调用
#[async_trait]
pub trait InvocationTarget: Send + Sync {
    /// 执行调用
    async fn call(&self, invocation: Invocation) -> InvocationResult;
}

/// 把闭包适配为调用终点
pub struct FnTarget<F>(F);

/// 使用闭包作为调用终点
pub fn target_fn<F, Fut>(f: F) -> FnTarget<F>
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult> + Send + 'static,
{
    FnTarget(f)
}

#[async_trait]
impl<F, Fut> InvocationTarget for FnTarget<F>
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InvocationResult> + Send + 'static,
{
    async fn call(&self, invocation: Invocation) -> InvocationResult {
        (self.0)(invocation).await
    }
}

/// 调用链的剩余部分
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    target: &'a dyn InvocationTarget,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        interceptors: &'a [Arc<dyn Interceptor>],
        target: &'a dyn InvocationTarget,
    ) -> Self {
        Self {
            interceptors,
            target,
        }
    }

    /// 剩余的拦截器数量
    pub fn remaining(&self) -> usize {
        self.interceptors.len()
    }

    /// 调用下一个拦截器，最后一个之后调用真实方法
    pub async fn run(self, invocation: Invocation) -> InvocationResult {
        match self.interceptors.split_first() {
            Some((current, rest)) => {
                current
                    .invoke(invocation, Next::new(rest, self.target))
                    .await
            }
            None => self.target.call(invocation).await,
        }
    }
}

/// 某个操作已构建好的调用链
#[derive(Clone)]
pub struct InterceptorChain {
    operation: OperationId,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    /// 创建调用链，第一个拦截器位于最外层
    pub fn new(operation: OperationId, interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            operation,
            interceptors,
        }
    }

    /// 所属操作
    pub fn operation(&self) -> OperationId {
        self.operation
    }

    /// 拦截器名称，由外到内
    pub fn names(&self) -> Vec<&str> {
        self.interceptors
            .iter()
            .map(|interceptor| interceptor.name())
            .collect()
    }

    /// 拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// 是否没有拦截器
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 沿调用链执行
    pub async fn invoke(
        &self,
        invocation: Invocation,
        target: &dyn InvocationTarget,
    ) -> InvocationResult {
        Next::new(&self.interceptors, target).run(invocation).await
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("operation", &self.operation)
            .field("interceptors", &self.names())
            .finish()
    }
}
