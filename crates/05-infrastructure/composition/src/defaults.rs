//! 内置默认组件
//!
//! 组合内核自身需要的协作组件。只在工作集中没有相同标识时加入，
//! 宿主的显式声明和扫描到的组件总是优先。

use crate::interception::{
    DefaultInterceptorProvider, InterceptorFactory, InterceptorProvider,
    LoggingInterceptorFactory, TransactionInterceptorFactory, LOGGING_INTERCEPTOR,
    TRANSACTION_INTERCEPTOR,
};
use crate::serialization::{
    BinarySerializer, JsonBinarySerializer, JsonTextSerializer, TextSerializer,
};
use di_abstractions::{Component, ComponentDescriptor, Injectable, ObjectContainer, Provides};
use infrastructure_common::DependencyResult;
use std::sync::Arc;

macro_rules! builtin_component {
    ($target:ty => $contract:ty) => {
        impl Component for $target {}

        impl Injectable for $target {
            fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
                Ok(Self::default())
            }
        }

        impl Provides<$contract> for $target {
            fn provide(self: Arc<Self>) -> Arc<$contract> {
                self
            }
        }
    };
}

builtin_component!(JsonTextSerializer => dyn TextSerializer);
builtin_component!(JsonBinarySerializer => dyn BinarySerializer);

/// 内置默认组件描述符
pub fn builtin_components() -> Vec<ComponentDescriptor> {
    vec![
        ComponentDescriptor::contract::<dyn TextSerializer, JsonTextSerializer>(),
        ComponentDescriptor::contract::<dyn BinarySerializer, JsonBinarySerializer>(),
        ComponentDescriptor::contract::<dyn InterceptorProvider, DefaultInterceptorProvider>(),
        ComponentDescriptor::contract::<dyn InterceptorFactory, LoggingInterceptorFactory>()
            .named(LOGGING_INTERCEPTOR),
        ComponentDescriptor::contract::<dyn InterceptorFactory, TransactionInterceptorFactory>()
            .named(TRANSACTION_INTERCEPTOR),
    ]
}
