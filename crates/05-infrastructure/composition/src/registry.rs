//! 启动期组件工作集
//!
//! 按组件标识去重，先声明者优先；启动完成后被清空。

use di_abstractions::{ComponentDescriptor, ComponentKey};
use infrastructure_common::{CompositionError, CompositionResult, TypeInfo};
use std::collections::HashSet;
use tracing::debug;

/// 组件工作集
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    /// 按加入顺序保存的描述符
    descriptors: Vec<ComponentDescriptor>,
    /// 已加入的组件标识
    keys: HashSet<ComponentKey>,
}

impl ComponentRegistry {
    /// 创建空工作集
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入描述符
    ///
    /// 校验失败时返回错误；标识已存在时静默忽略并返回 `false`
    pub fn add(&mut self, descriptor: ComponentDescriptor) -> CompositionResult<bool> {
        descriptor.validate()?;
        let key = descriptor.key().ok_or(CompositionError::ContractRequired)?;

        if self.keys.contains(&key) {
            debug!("忽略重复的组件声明: {}", key);
            return Ok(false);
        }

        self.keys.insert(key);
        self.descriptors.push(descriptor);
        Ok(true)
    }

    /// 是否包含指定标识
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.keys.contains(key)
    }

    /// 是否包含指定服务类型的注册
    pub fn contains_service<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.contains(&ComponentKey::new(TypeInfo::of::<T>(), name))
    }

    /// 按加入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.descriptors.iter()
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 释放全部描述符
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.keys.clear();
    }
}
