//! 声明式扫描器
//!
//! 把静态类型表条目转换为组件描述符，不访问容器，没有副作用

use di_abstractions::{Artifact, ComponentDescriptor, TypeEntry};
use infrastructure_common::Lifecycle;
use tracing::debug;

/// 组件扫描器
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentScanner;

impl ComponentScanner {
    /// 创建扫描器
    pub fn new() -> Self {
        Self
    }

    /// 扫描单个类型
    ///
    /// 未标记注册的类型返回 `None`；未标记生命周期时默认单例
    pub fn scan_type(&self, entry: &TypeEntry) -> Option<ComponentDescriptor> {
        let tag = entry.register?;
        let contract = tag.contract.map(|contract| contract());
        let lifecycle = entry.lifecycle.unwrap_or(Lifecycle::Singleton);

        Some(ComponentDescriptor::new(
            contract,
            Some((entry.activation)()),
            tag.name,
            lifecycle,
            None,
        ))
    }

    /// 扫描全部制品，保持制品与类型的顺序
    pub fn scan(&self, artifacts: &[Artifact]) -> Vec<ComponentDescriptor> {
        let mut descriptors = Vec::new();
        for artifact in artifacts {
            let before = descriptors.len();
            descriptors.extend(
                artifact
                    .types()
                    .iter()
                    .filter_map(|entry| self.scan_type(entry)),
            );
            debug!(
                "扫描制品 {}: {} 个类型, {} 个组件",
                artifact.name(),
                artifact.types().len(),
                descriptors.len() - before
            );
        }
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{
        Component, ComponentKey, ComponentType, Injectable, ObjectContainer, Provides, RegisterTag,
    };
    use infrastructure_common::{DependencyResult, TypeInfo};
    use std::sync::Arc;

    trait Clock: Send + Sync {}

    struct SystemClock;

    impl Clock for SystemClock {}
    impl Component for SystemClock {}

    impl Injectable for SystemClock {
        fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
            Ok(Self)
        }
    }

    impl Provides<dyn Clock> for SystemClock {
        fn provide(self: Arc<Self>) -> Arc<dyn Clock> {
            self
        }
    }

    fn clock_contract() -> TypeInfo {
        TypeInfo::of::<dyn Clock>()
    }

    fn activate_clock() -> ComponentType {
        ComponentType::providing::<dyn Clock, SystemClock>()
    }

    fn activate_own() -> ComponentType {
        ComponentType::of::<SystemClock>()
    }

    static TAGGED: TypeEntry = TypeEntry {
        artifact: "clocks",
        type_name: "clocks::SystemClock",
        register: Some(RegisterTag {
            contract: Some(clock_contract),
            name: "utc",
        }),
        lifecycle: Some(Lifecycle::Transient),
        activation: activate_clock,
    };

    static SELF_TAGGED: TypeEntry = TypeEntry {
        artifact: "clocks",
        type_name: "clocks::SystemClock",
        register: Some(RegisterTag::own()),
        lifecycle: None,
        activation: activate_own,
    };

    static UNTAGGED: TypeEntry = TypeEntry {
        artifact: "clocks",
        type_name: "clocks::SystemClock",
        register: None,
        lifecycle: None,
        activation: activate_own,
    };

    #[test]
    fn test_scan_tagged_type() {
        let descriptor = ComponentScanner::new().scan_type(&TAGGED).unwrap();

        assert_eq!(
            descriptor.key(),
            Some(ComponentKey::new(TypeInfo::of::<dyn Clock>(), "utc"))
        );
        assert_eq!(descriptor.lifecycle(), Lifecycle::Transient);
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_defaults_to_singleton_self_registration() {
        let descriptor = ComponentScanner::new().scan_type(&SELF_TAGGED).unwrap();

        assert_eq!(descriptor.contract_type(), None);
        assert_eq!(descriptor.service_type(), Some(TypeInfo::of::<SystemClock>()));
        assert_eq!(descriptor.lifecycle(), Lifecycle::Singleton);
        assert_eq!(descriptor.name(), "");
    }

    #[test]
    fn test_untagged_type_is_skipped() {
        assert!(ComponentScanner::new().scan_type(&UNTAGGED).is_none());
    }

    #[test]
    fn test_scan_keeps_order() {
        let artifacts = vec![
            Artifact::new("first").with_type(&UNTAGGED).with_type(&TAGGED),
            Artifact::new("second").with_type(&SELF_TAGGED),
        ];

        let keys: Vec<_> = ComponentScanner::new()
            .scan(&artifacts)
            .iter()
            .filter_map(ComponentDescriptor::key)
            .collect();
        assert_eq!(
            keys,
            vec![
                ComponentKey::new(TypeInfo::of::<dyn Clock>(), "utc"),
                ComponentKey::new(TypeInfo::of::<SystemClock>(), ""),
            ]
        );
    }
}
