//! 后台工作循环
//!
//! 在 tokio 上反复执行一个异步处理函数，处理失败不会中断循环。

use futures::future::BoxFuture;
use futures::FutureExt;
use infrastructure_common::BoxError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Processor = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;
type SuccessCallback = Arc<dyn Fn() + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&BoxError) + Send + Sync>;

struct Running {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// 后台工作者
pub struct Worker {
    name: String,
    interval: Option<Duration>,
    processor: Processor,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    running: Mutex<Option<Running>>,
}

impl Worker {
    /// 创建工作者
    pub fn new<F, Fut>(name: impl Into<String>, processor: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            interval: None,
            processor: Arc::new(move || processor().boxed()),
            on_success: None,
            on_error: None,
            running: Mutex::new(None),
        }
    }

    /// 两次处理之间的间隔
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// 处理成功回调
    pub fn on_success(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// 处理失败回调
    pub fn on_error(mut self, callback: impl Fn(&BoxError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否正在运行
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// 启动循环，已经运行时返回 `false`
    ///
    /// 必须在 tokio 运行时内调用
    pub fn start(&self) -> bool {
        let mut running = self.running.lock();
        if running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
        {
            debug!("工作者 {} 已在运行", self.name);
            return false;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.name.clone(),
            self.interval,
            Arc::clone(&self.processor),
            self.on_success.clone(),
            self.on_error.clone(),
            token.clone(),
        ));
        *running = Some(Running { token, handle });
        info!("工作者 {} 已启动", self.name);
        true
    }

    /// 停止循环并等待当前处理结束
    pub async fn stop(&self) {
        let running = self.running.lock().take();
        if let Some(Running { token, handle }) = running {
            token.cancel();
            if let Err(e) = handle.await {
                warn!("工作者 {} 异常退出: {}", self.name, e);
            }
            info!("工作者 {} 已停止", self.name);
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.token.cancel();
        }
    }
}

async fn run_loop(
    name: String,
    interval: Option<Duration>,
    processor: Processor,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    token: CancellationToken,
) {
    // 只在两次处理之间响应取消，正在进行的处理总会执行完
    while !token.is_cancelled() {
        match processor().await {
            Ok(()) => {
                if let Some(callback) = &on_success {
                    callback();
                }
            }
            Err(error) => {
                warn!("工作者 {} 处理失败: {}", name, error);
                if let Some(callback) = &on_error {
                    callback(&error);
                }
            }
        }

        match interval {
            Some(interval) => tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            },
            None => tokio::task::yield_now().await,
        }
    }
    debug!("工作者 {} 循环结束", name);
}
