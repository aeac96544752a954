//! 启动期初始化能力

use crate::container::ObjectContainer;
use crate::discovery::Artifact;
use async_trait::async_trait;
use infrastructure_common::BoxError;
use std::sync::Arc;

/// 初始化 trait
///
/// 单例组件在启动完成前被调用一次；容器本身也可以实现此 trait，
/// 在所有组件初始化之前完成自身的准备工作。
#[async_trait]
pub trait Initializer: Send + Sync {
    /// 使用容器和已发现的代码制品进行初始化
    async fn initialize(
        &self,
        container: Arc<dyn ObjectContainer>,
        artifacts: &[Artifact],
    ) -> Result<(), BoxError>;
}
