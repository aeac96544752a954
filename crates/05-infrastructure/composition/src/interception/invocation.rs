//! 调用描述

use infrastructure_common::BoxError;
pub use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// 操作标识：组件名 + 方法名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId {
    /// 组件名称
    pub component: &'static str,
    /// 方法名称
    pub method: &'static str,
}

impl OperationId {
    /// 创建操作标识
    pub const fn new(component: &'static str, method: &'static str) -> Self {
        Self { component, method }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.method)
    }
}

/// 调用结果
pub type InvocationResult = Result<Value, BoxError>;

/// 一次调用的描述
///
/// 上下文按类型保存，只在这次调用内可见，替代线程局部的环境上下文。
pub struct Invocation {
    id: Uuid,
    operation: OperationId,
    arguments: Vec<Value>,
    context: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Invocation {
    /// 创建调用描述
    pub fn new(operation: OperationId) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            arguments: Vec::new(),
            context: HashMap::new(),
        }
    }

    /// 追加参数
    pub fn with_argument(mut self, argument: Value) -> Self {
        self.arguments.push(argument);
        self
    }

    /// 设置全部参数
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// 调用ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 被调用的操作
    pub fn operation(&self) -> OperationId {
        self.operation
    }

    /// 参数列表
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// 可修改的参数列表
    pub fn arguments_mut(&mut self) -> &mut Vec<Value> {
        &mut self.arguments
    }

    /// 按位置获取参数
    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// 绑定上下文值，返回之前绑定的同类型值
    pub fn bind<T>(&mut self, value: Arc<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.context
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast::<Arc<T>>().ok())
            .map(|previous| *previous)
    }

    /// 读取上下文值
    pub fn context<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.context
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// 解除绑定
    pub fn unbind<T>(&mut self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.context
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<Arc<T>>().ok())
            .map(|value| *value)
    }

    /// 是否绑定了指定类型的上下文
    pub fn is_bound<T: ?Sized + 'static>(&self) -> bool {
        self.context.contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("arguments", &self.arguments)
            .field("context", &self.context.len())
            .finish()
    }
}
