//! 静态类型表
//!
//! 每个带声明的类型在编译期提交一个 [`TypeEntry`]，
//! 运行期通过 [`registered_types`] 枚举，替代运行时反射。

use crate::container::ComponentType;
use infrastructure_common::{Lifecycle, TypeInfo};

/// 注册标记
#[derive(Debug, Clone, Copy)]
pub struct RegisterTag {
    /// 契约类型，`None` 表示自注册
    pub contract: Option<fn() -> TypeInfo>,
    /// 契约名称，空字符串表示默认注册
    pub name: &'static str,
}

impl RegisterTag {
    /// 自注册标记
    pub const fn own() -> Self {
        Self {
            contract: None,
            name: "",
        }
    }
}

/// 类型表条目
#[derive(Debug)]
pub struct TypeEntry {
    /// 所属制品名称
    pub artifact: &'static str,
    /// 类型全名
    pub type_name: &'static str,
    /// 注册标记，未标记的类型不会被注册
    pub register: Option<RegisterTag>,
    /// 生命周期标记
    pub lifecycle: Option<Lifecycle>,
    /// 构造激活信息
    pub activation: fn() -> ComponentType,
}

inventory::collect!(TypeEntry);

/// 枚举所有已提交的类型表条目
pub fn registered_types() -> impl Iterator<Item = &'static TypeEntry> {
    inventory::iter::<TypeEntry>.into_iter()
}
