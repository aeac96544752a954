//! 组合内核测试
//!
//! 共享的测试组件和记录容器


use async_trait::async_trait;
use di_abstractions::{
    as_initializer, Artifact, Component, ComponentType, Initializer, InitializerView, Injectable,
    Instance, ObjectContainer, ObjectContainerExt, Provides,
};
use di_impl::DiContainerImpl;
use infrastructure_common::{BoxError, DependencyResult, Lifecycle, TypeInfo};
use parking_lot::Mutex;
use std::sync::Arc;

/// 按顺序记录事件
#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.entries.lock().iter().filter(|e| *e == entry).count()
    }
}

impl Component for Journal {}

/// 需要提前初始化的组件
pub(crate) trait Warmup: Send + Sync {}

macro_rules! warmup_component {
    ($name:ident, $label:literal, $outcome:expr) => {
        pub(crate) struct $name {
            journal: Arc<Journal>,
        }

        impl $name {
            #[allow(dead_code)]
            pub(crate) fn new(journal: Arc<Journal>) -> Self {
                Self { journal }
            }
        }

        impl Warmup for $name {}

        impl Component for $name {
            fn initializer() -> Option<InitializerView<Self>> {
                Some(as_initializer::<Self>)
            }
        }

        impl Injectable for $name {
            fn inject(container: &dyn ObjectContainer) -> DependencyResult<Self> {
                Ok(Self {
                    journal: container.get::<Journal>()?,
                })
            }
        }

        impl Provides<dyn Warmup> for $name {
            fn provide(self: Arc<Self>) -> Arc<dyn Warmup> {
                self
            }
        }

        #[async_trait]
        impl Initializer for $name {
            async fn initialize(
                &self,
                _container: Arc<dyn ObjectContainer>,
                _artifacts: &[Artifact],
            ) -> Result<(), BoxError> {
                self.journal.record($label);
                $outcome
            }
        }
    };
}

warmup_component!(CacheWarmup, "cache", Ok(()));
warmup_component!(IndexWarmup, "index", Ok(()));
warmup_component!(SharedWarmup, "shared", Ok(()));
warmup_component!(FailingWarmup, "failing", Err("索引文件损坏".into()));

/// 在参考容器之外记录自身初始化的容器
pub(crate) struct RecordingContainer {
    inner: DiContainerImpl,
    journal: Arc<Journal>,
}

impl RecordingContainer {
    pub(crate) fn shared(journal: Arc<Journal>) -> Arc<Self> {
        Arc::new(Self {
            inner: DiContainerImpl::new(),
            journal,
        })
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.inner.is_sealed()
    }
}

impl ObjectContainer for RecordingContainer {
    fn is_registered(&self, service: &TypeInfo, name: Option<&str>) -> bool {
        self.inner.is_registered(service, name)
    }

    fn register_instance(
        &self,
        contract: &TypeInfo,
        instance: Instance,
        name: Option<&str>,
    ) -> DependencyResult<()> {
        self.inner.register_instance(contract, instance, name)
    }

    fn register_contract(
        &self,
        contract: &TypeInfo,
        target: &ComponentType,
        name: Option<&str>,
        lifecycle: Lifecycle,
    ) -> DependencyResult<()> {
        self.inner.register_contract(contract, target, name, lifecycle)
    }

    fn resolve(&self, service: &TypeInfo, name: Option<&str>) -> DependencyResult<Instance> {
        self.inner.resolve(service, name)
    }

    fn resolve_all(&self, service: &TypeInfo) -> DependencyResult<Vec<Instance>> {
        self.inner.resolve_all(service)
    }

    fn as_initializer(self: Arc<Self>) -> Option<Arc<dyn Initializer>> {
        Some(self)
    }
}

#[async_trait]
impl Initializer for RecordingContainer {
    async fn initialize(
        &self,
        container: Arc<dyn ObjectContainer>,
        artifacts: &[Artifact],
    ) -> Result<(), BoxError> {
        self.journal.record("container");
        self.inner.initialize(container, artifacts).await
    }
}
