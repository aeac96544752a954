//! 启动协调器
//!
//! 负责两阶段启动：先把工作集中的全部组件注册进容器，
//! 再按工作集顺序初始化需要提前初始化的单例。

use crate::artifacts::InventoryArtifactLoader;
use crate::component_scanner::ComponentScanner;
use crate::defaults::builtin_components;
use crate::options::BootstrapOptions;
use crate::registry::ComponentRegistry;
use di_abstractions::{
    Artifact, ArtifactLoader, Component, ComponentDescriptor, Injectable, ObjectContainer,
    Provides,
};
use infrastructure_common::{CompositionError, CompositionResult, Lifecycle};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// 启动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStatus {
    /// 接受组件声明
    Pending,
    /// 正在注册和初始化
    Initializing,
    /// 启动完成
    Ready,
    /// 初始化失败
    Failed,
    /// 已停止
    Stopped,
}

impl fmt::Display for BootstrapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Initializing => "Initializing",
            Self::Ready => "Ready",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

/// 制品加载完成后的宿主钩子，可以继续向工作集加入组件
pub type ArtifactsLoadedHook =
    Box<dyn FnMut(&[Artifact], &mut ComponentRegistry) -> CompositionResult<()> + Send + Sync>;

/// 启动报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootstrapReport {
    /// 制品数量
    pub artifacts: usize,
    /// 注册进容器的组件数量（不含容器中已存在而跳过的）
    pub registered: usize,
    /// 提前初始化的实例数量
    pub initialized: usize,
}

/// 启动协调器
///
/// 单线程使用：所有声明必须在 [`Bootstrapper::complete`] 之前完成。
pub struct Bootstrapper {
    status: BootstrapStatus,
    options: BootstrapOptions,
    loader: Box<dyn ArtifactLoader>,
    scanner: ComponentScanner,
    artifacts: Option<Vec<Artifact>>,
    registry: ComponentRegistry,
    hooks: Vec<ArtifactsLoadedHook>,
    report: Option<BootstrapReport>,
}

impl Bootstrapper {
    /// 使用默认选项创建
    pub fn new() -> Self {
        Self::with_options(BootstrapOptions::default())
    }

    /// 使用指定选项创建
    pub fn with_options(options: BootstrapOptions) -> Self {
        Self {
            status: BootstrapStatus::Pending,
            options,
            loader: Box::new(InventoryArtifactLoader::new()),
            scanner: ComponentScanner::new(),
            artifacts: None,
            registry: ComponentRegistry::new(),
            hooks: Vec::new(),
            report: None,
        }
    }

    /// 替换默认制品加载器
    pub fn with_loader(mut self, loader: impl ArtifactLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// 当前状态
    pub fn status(&self) -> BootstrapStatus {
        self.status
    }

    /// 启动选项
    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// 当前工作集
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// 最近一次成功启动的报告
    pub fn report(&self) -> Option<BootstrapReport> {
        self.report
    }

    /// 显式提供制品，替换之前提供的列表
    pub fn load_artifacts(&mut self, artifacts: Vec<Artifact>) -> CompositionResult<&mut Self> {
        self.ensure_pending("load_artifacts")?;
        self.artifacts = Some(artifacts);
        Ok(self)
    }

    /// 加入组件声明
    ///
    /// 与已有声明标识相同时忽略，先声明者优先
    pub fn declare(&mut self, descriptor: ComponentDescriptor) -> CompositionResult<&mut Self> {
        self.ensure_pending("declare")?;
        self.registry.add(descriptor)?;
        Ok(self)
    }

    /// 自注册类型，单例
    pub fn register<T: Injectable>(&mut self) -> CompositionResult<&mut Self> {
        self.declare(ComponentDescriptor::of::<T>())
    }

    /// 自注册类型，指定名称和生命周期
    pub fn register_named<T: Injectable>(
        &mut self,
        name: &str,
        lifecycle: Lifecycle,
    ) -> CompositionResult<&mut Self> {
        self.declare(
            ComponentDescriptor::of::<T>()
                .named(name)
                .with_lifecycle(lifecycle),
        )
    }

    /// 以契约 `C` 注册类型 `T`
    pub fn register_contract<C, T>(
        &mut self,
        name: &str,
        lifecycle: Lifecycle,
    ) -> CompositionResult<&mut Self>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Injectable + Provides<C>,
    {
        self.declare(
            ComponentDescriptor::contract::<C, T>()
                .named(name)
                .with_lifecycle(lifecycle),
        )
    }

    /// 注册固定实例
    pub fn register_instance<T: Component>(&mut self, value: Arc<T>) -> CompositionResult<&mut Self> {
        self.declare(ComponentDescriptor::instance(value))
    }

    /// 以契约 `C` 注册固定实例
    pub fn register_instance_as<C, T>(
        &mut self,
        value: Arc<T>,
        name: &str,
    ) -> CompositionResult<&mut Self>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Provides<C>,
    {
        self.declare(ComponentDescriptor::instance_as::<C, T>(value).named(name))
    }

    /// 制品扫描完成后、内置组件加入之前调用的钩子
    pub fn on_artifacts_loaded<F>(&mut self, hook: F) -> CompositionResult<&mut Self>
    where
        F: FnMut(&[Artifact], &mut ComponentRegistry) -> CompositionResult<()> + Send + Sync + 'static,
    {
        self.ensure_pending("on_artifacts_loaded")?;
        self.hooks.push(Box::new(hook));
        Ok(self)
    }

    /// 完成启动
    ///
    /// 只在 `Pending` 状态下执行，其它状态下直接返回。
    /// 任何失败都会终止剩余步骤，协调器进入 `Failed` 状态。
    pub async fn complete(&mut self, container: Arc<dyn ObjectContainer>) -> CompositionResult<()> {
        if self.status != BootstrapStatus::Pending {
            debug!("启动器状态为 {}，忽略重复的完成请求", self.status);
            return Ok(());
        }

        if let Some(logging) = &self.options.logging {
            logging.init()?;
        }

        self.status = BootstrapStatus::Initializing;
        let started = Instant::now();
        info!("开始组合组件");

        let result = self.run(container).await;
        self.registry.clear();
        self.artifacts = None;
        self.hooks.clear();

        match result {
            Ok(report) => {
                self.status = BootstrapStatus::Ready;
                self.report = Some(report);
                info!(
                    "组件组合完成: {} 个制品, 注册 {} 个组件, 初始化 {} 个实例, 耗时 {}ms",
                    report.artifacts,
                    report.registered,
                    report.initialized,
                    started.elapsed().as_millis()
                );
                Ok(())
            }
            Err(e) => {
                self.status = BootstrapStatus::Failed;
                error!("组件组合失败: {}", e);
                Err(e)
            }
        }
    }

    /// 停止，只能在 `Ready` 状态下调用
    pub fn stop(&mut self) -> CompositionResult<()> {
        if self.status != BootstrapStatus::Ready {
            return Err(CompositionError::invalid_state(self.status, "stop"));
        }
        self.status = BootstrapStatus::Stopped;
        info!("启动器已停止");
        Ok(())
    }

    async fn run(&mut self, container: Arc<dyn ObjectContainer>) -> CompositionResult<BootstrapReport> {
        let artifacts = self.discover_artifacts()?;

        let mut scanned = 0;
        for descriptor in self.scanner.scan(&artifacts) {
            if self.registry.add(descriptor)? {
                scanned += 1;
            }
        }
        debug!("扫描加入 {} 个组件", scanned);

        for hook in &mut self.hooks {
            hook(artifacts.as_slice(), &mut self.registry)?;
        }

        if self.options.register_builtin_defaults {
            for descriptor in builtin_components() {
                self.registry.add(descriptor)?;
            }
        }

        let mut registered = 0;
        for descriptor in self.registry.iter() {
            if descriptor.register(container.as_ref())? {
                registered += 1;
            }
        }
        info!(
            "工作集 {} 个组件, 注册 {} 个",
            self.registry.len(),
            registered
        );

        if let Some(initializer) = Arc::clone(&container).as_initializer() {
            debug!("执行容器初始化");
            initializer
                .initialize(Arc::clone(&container), &artifacts)
                .await
                .map_err(|source| CompositionError::InitializationFailure {
                    component: "container".to_string(),
                    source,
                })?;
        }

        let initialized = self.initialize_singletons(&container, &artifacts).await?;

        Ok(BootstrapReport {
            artifacts: artifacts.len(),
            registered,
            initialized,
        })
    }

    fn discover_artifacts(&mut self) -> CompositionResult<Vec<Artifact>> {
        let artifacts = match self.artifacts.take() {
            Some(artifacts) => artifacts,
            None if self.options.scan_default_artifacts => self.loader.load()?,
            None => Vec::new(),
        };

        let names: Vec<&str> = artifacts.iter().map(Artifact::name).collect();
        info!("发现 {} 个制品: {:?}", artifacts.len(), names);
        Ok(artifacts)
    }

    async fn initialize_singletons(
        &self,
        container: &Arc<dyn ObjectContainer>,
        artifacts: &[Artifact],
    ) -> CompositionResult<usize> {
        let mut seen = HashSet::new();
        let mut initialized = 0;

        for descriptor in self.registry.iter().filter(|d| d.must_be_initialized()) {
            let instance = descriptor.get_instance(container.as_ref())?;
            if !seen.insert(instance.identity()) {
                debug!("实例已初始化，跳过: {}", descriptor);
                continue;
            }

            let Some(initializer) = instance.initializer() else {
                continue;
            };

            debug!("初始化组件: {}", descriptor);
            initializer
                .initialize(Arc::clone(container), artifacts)
                .await
                .map_err(|source| CompositionError::InitializationFailure {
                    component: descriptor.to_string(),
                    source,
                })?;
            initialized += 1;
        }

        Ok(initialized)
    }

    fn ensure_pending(&self, operation: &str) -> CompositionResult<()> {
        if self.status == BootstrapStatus::Pending {
            Ok(())
        } else {
            Err(CompositionError::invalid_state(self.status, operation))
        }
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}
