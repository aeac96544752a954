//! 制品加载器实现

use di_abstractions::{registered_types, Artifact, ArtifactLoader, TypeEntry};
use infrastructure_common::CompositionResult;
use std::collections::BTreeMap;
use tracing::debug;

/// 从静态类型表加载制品
///
/// 条目按所属 crate 分组，制品按名称排序、类型按类型名排序，保证扫描顺序稳定。
#[derive(Debug, Default, Clone)]
pub struct InventoryArtifactLoader {
    /// 只保留类型名以这些前缀开头的条目，为空时保留全部
    prefixes: Vec<String>,
}

impl InventoryArtifactLoader {
    /// 加载全部已提交的类型
    pub fn new() -> Self {
        Self::default()
    }

    /// 只加载指定模块路径下的类型
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    fn accepts(&self, entry: &TypeEntry) -> bool {
        self.prefixes.is_empty()
            || self
                .prefixes
                .iter()
                .any(|prefix| entry.type_name.starts_with(prefix.as_str()))
    }
}

impl ArtifactLoader for InventoryArtifactLoader {
    fn load(&self) -> CompositionResult<Vec<Artifact>> {
        let mut grouped: BTreeMap<&'static str, Vec<&'static TypeEntry>> = BTreeMap::new();
        for entry in registered_types().filter(|entry| self.accepts(entry)) {
            grouped.entry(entry.artifact).or_default().push(entry);
        }

        let artifacts: Vec<Artifact> = grouped
            .into_iter()
            .map(|(name, mut types)| {
                types.sort_by_key(|entry| entry.type_name);
                types.into_iter().fold(Artifact::new(name), Artifact::with_type)
            })
            .collect();

        debug!("从静态类型表加载了 {} 个制品", artifacts.len());
        Ok(artifacts)
    }
}

/// 返回固定制品列表的加载器
#[derive(Debug, Default, Clone)]
pub struct StaticArtifactLoader {
    artifacts: Vec<Artifact>,
}

impl StaticArtifactLoader {
    /// 使用给定制品创建加载器
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }
}

impl ArtifactLoader for StaticArtifactLoader {
    fn load(&self) -> CompositionResult<Vec<Artifact>> {
        Ok(self.artifacts.clone())
    }
}
