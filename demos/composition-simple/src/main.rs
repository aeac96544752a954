//! # 组合内核示例
//!
//! 演示声明式组件注册、两阶段启动、拦截管道和后台工作者

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use di_impl::DiContainerImpl;
use infrastructure_composition::common::{BoxError, DependencyResult};
use infrastructure_composition::di::{
    Artifact, Initializer, Injectable, ObjectContainer, ObjectContainerExt,
};
use infrastructure_composition::interception::{
    current_unit_of_work, InterceptorProvider, Invocation, InvocationResult, OperationId,
    UnitOfWork, UnitOfWorkFactory,
};
use infrastructure_composition::{
    component, intercepted, BootstrapOptions, Bootstrapper, LoggingConfig, TextSerializer,
    TextSerializerExt, Worker,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "composition-simple")]
#[command(about = "组合内核示例")]
struct Args {
    /// 启动配置文件，缺省时读取 config/composition 与环境变量
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别（配置文件未设置日志时使用）
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 后台报告的执行次数
    #[arg(long, default_value_t = 3)]
    reports: usize,
}

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// 用户仓储
pub trait UserRepository: Send + Sync {
    fn find(&self, id: u64) -> Option<User>;
    fn save(&self, user: User);
    fn count(&self) -> usize;
}

/// 内存仓储，启动时写入种子数据
#[component(contract = dyn UserRepository, initializer)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<u64, User>>,
}

impl Injectable for MemoryUserRepository {
    fn inject(_container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self {
            users: RwLock::new(HashMap::new()),
        })
    }
}

impl UserRepository for MemoryUserRepository {
    fn find(&self, id: u64) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    fn save(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    fn count(&self) -> usize {
        self.users.read().len()
    }
}

#[async_trait]
impl Initializer for MemoryUserRepository {
    async fn initialize(
        &self,
        _container: Arc<dyn ObjectContainer>,
        artifacts: &[Artifact],
    ) -> Result<(), BoxError> {
        for (id, name) in [(1, "Alice"), (2, "Bob")] {
            self.save(User {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            });
        }
        info!(
            "用户仓储已加载 {} 条种子数据（{} 个制品）",
            self.count(),
            artifacts.len()
        );
        Ok(())
    }
}

/// 只记录日志的工作单元
struct LoggedUnit {
    operation: OperationId,
}

#[async_trait]
impl UnitOfWork for LoggedUnit {
    async fn commit(&self) -> Result<(), BoxError> {
        info!("提交工作单元: {}", self.operation);
        Ok(())
    }

    async fn release(&self) {
        info!("释放工作单元: {}", self.operation);
    }
}

#[component(contract = dyn UnitOfWorkFactory, default)]
#[derive(Default)]
pub struct LoggedUnits;

impl UnitOfWorkFactory for LoggedUnits {
    fn create(&self, operation: &OperationId) -> Result<Arc<dyn UnitOfWork>, BoxError> {
        Ok(Arc::new(LoggedUnit {
            operation: *operation,
        }))
    }
}

/// 用户服务：组件级日志拦截，改名操作另加事务
#[component(interceptors = ["logging"])]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    serializer: Arc<dyn TextSerializer>,
}

impl Injectable for UserService {
    fn inject(container: &dyn ObjectContainer) -> DependencyResult<Self> {
        Ok(Self {
            repository: container.get::<dyn UserRepository>()?,
            serializer: container.get::<dyn TextSerializer>()?,
        })
    }
}

#[intercepted]
impl UserService {
    /// 参数：用户ID、新名称
    #[intercept("transaction")]
    pub async fn rename(&self, invocation: &Invocation) -> InvocationResult {
        if current_unit_of_work(invocation).is_none() {
            return Err("改名必须在工作单元内执行".into());
        }

        let id = invocation
            .argument(0)
            .and_then(Value::as_u64)
            .ok_or("缺少用户ID")?;
        let name = invocation
            .argument(1)
            .and_then(Value::as_str)
            .ok_or("缺少新名称")?;

        let mut user = self
            .repository
            .find(id)
            .ok_or_else(|| format!("用户不存在: {}", id))?;
        user.name = name.to_string();
        self.repository.save(user.clone());
        Ok(serde_json::to_value(user)?)
    }

    pub fn describe(&self, id: u64) -> Option<String> {
        let user = self.repository.find(id)?;
        self.serializer.serialize_as(&user).ok()
    }
}

async fn report_users(container: Arc<DiContainerImpl>) -> Result<(), BoxError> {
    let repository = container.get::<dyn UserRepository>()?;
    info!("当前用户数: {}", repository.count());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => BootstrapOptions::from_file(path)?,
        None => BootstrapOptions::load()?,
    };
    if options.logging.is_none() {
        options.logging = Some(LoggingConfig {
            level: args.log_level.clone(),
            ..LoggingConfig::development()
        });
    }

    let container = DiContainerImpl::shared();
    let mut bootstrapper = Bootstrapper::with_options(options);
    bootstrapper.complete(container.clone()).await?;
    if let Some(report) = bootstrapper.report() {
        info!(
            "启动完成: {} 个制品, {} 个组件, {} 个初始化",
            report.artifacts, report.registered, report.initialized
        );
    }

    demonstrate_resolution(&container)?;
    demonstrate_interception(&container).await?;
    run_reports(&container, args.reports).await;

    bootstrapper.stop()?;
    info!("示例结束");
    Ok(())
}

/// 演示组件解析
fn demonstrate_resolution(container: &DiContainerImpl) -> Result<()> {
    let service = container.get::<UserService>()?;
    for id in [1, 2, 3] {
        match service.describe(id) {
            Some(text) => info!("用户 {}: {}", id, text),
            None => warn!("用户 {} 不存在", id),
        }
    }
    Ok(())
}

/// 演示拦截管道：一次成功、一次失败
async fn demonstrate_interception(container: &DiContainerImpl) -> Result<()> {
    let operation = UserService::RENAME_OPERATION;
    let provider = container.get::<dyn InterceptorProvider>()?;
    let chain = provider.chain(container, &operation)?;
    info!("{} 的调用链: {:?}", operation, chain.names());

    let service = container.get::<UserService>()?;
    for (id, name) in [(1, "Alicia"), (9, "Nobody")] {
        let renamed = Arc::clone(&service)
            .rename_intercepted(container, vec![json!(id), json!(name)])
            .await;
        match renamed {
            Ok(user) => info!("改名成功: {}", user),
            Err(e) => warn!("改名失败: {}", e),
        }
    }
    Ok(())
}

/// 运行后台报告，执行指定次数后停止
async fn run_reports(container: &Arc<DiContainerImpl>, reports: usize) {
    let completed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completed);
    let shared = Arc::clone(container);

    let worker = Worker::new("user-report", move || report_users(Arc::clone(&shared)))
        .with_interval(Duration::from_millis(200))
        .on_success(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(|e| warn!("报告失败: {}", e));

    worker.start();
    while completed.load(Ordering::SeqCst) < reports {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    worker.stop().await;
}
