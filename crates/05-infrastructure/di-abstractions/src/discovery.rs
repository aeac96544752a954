//! 代码制品与制品加载器
//!
//! 制品是一组静态类型表条目，通常对应一个 crate

use crate::scanner::TypeEntry;
use infrastructure_common::CompositionResult;

/// 代码制品
#[derive(Debug, Clone, Default)]
pub struct Artifact {
    name: String,
    types: Vec<&'static TypeEntry>,
}

impl Artifact {
    /// 创建空制品
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// 追加类型
    pub fn with_type(mut self, entry: &'static TypeEntry) -> Self {
        self.types.push(entry);
        self
    }

    /// 追加类型
    pub fn push(&mut self, entry: &'static TypeEntry) {
        self.types.push(entry);
    }

    /// 制品名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 制品中的类型，保持加入顺序
    pub fn types(&self) -> &[&'static TypeEntry] {
        &self.types
    }
}

/// 制品加载器
///
/// 启动协调器在宿主没有显式提供制品时调用它发现默认制品集合
pub trait ArtifactLoader: Send + Sync {
    /// 加载制品列表
    fn load(&self) -> CompositionResult<Vec<Artifact>>;
}
