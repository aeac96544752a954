//! 宏工具函数

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Generics, Path, Result, Type};

/// 生成代码引用的运行时 crate 路径
pub fn runtime_crate() -> TokenStream {
    quote! { ::infrastructure_composition }
}

/// 路径的最后一段是否为指定名称
pub fn path_ends_with(path: &Path, name: &str) -> bool {
    path.segments
        .last()
        .map(|segment| segment.ident == name)
        .unwrap_or(false)
}

/// 查找属性位置
pub fn find_attribute(attrs: &[Attribute], name: &str) -> Option<usize> {
    attrs
        .iter()
        .position(|attr| path_ends_with(attr.path(), name))
}

/// 移除并返回全部同名属性
pub fn take_attributes(attrs: &mut Vec<Attribute>, name: &str) -> Vec<Attribute> {
    let (taken, kept): (Vec<Attribute>, Vec<Attribute>) = attrs
        .drain(..)
        .partition(|attr| path_ends_with(attr.path(), name));
    *attrs = kept;
    taken
}

/// 组件必须是非泛型类型，静态类型表只能记录具体类型
pub fn reject_generics(generics: &Generics) -> Result<()> {
    if generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(generics, "组件声明不支持泛型类型"))
    }
}

/// 取类型路径的最后一段名称，用作拦截点的组件名
pub fn type_short_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// 拦截点的组件名：`模块路径::类型名`
///
/// 组件声明与 `#[intercepted]` 使用同一规则，不同模块中的同名组件互不影响。
pub fn component_name(ty: &Type) -> Option<TokenStream> {
    let short_name = type_short_name(ty)?;
    Some(quote! {
        ::core::concat!(::core::module_path!(), "::", #short_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_take_attributes() {
        let mut attrs: Vec<Attribute> = vec![
            parse_quote!(#[derive(Default)]),
            parse_quote!(#[lifecycle(transient)]),
            parse_quote!(#[doc = "服务"]),
        ];

        let taken = take_attributes(&mut attrs, "lifecycle");
        assert_eq!(taken.len(), 1);
        assert_eq!(attrs.len(), 2);
        assert_eq!(find_attribute(&attrs, "doc"), Some(1));
    }

    #[test]
    fn test_type_short_name() {
        let ty: Type = parse_quote!(crate::ledger::Ledger);
        assert_eq!(type_short_name(&ty).as_deref(), Some("Ledger"));

        let reference: Type = parse_quote!(&'static str);
        assert_eq!(type_short_name(&reference), None);
    }

    #[test]
    fn test_component_name_is_module_qualified() {
        let ty: Type = parse_quote!(ledger::Ledger);
        let name = component_name(&ty).unwrap().to_string();
        assert!(name.contains("module_path ! ()"));
        assert!(name.contains("\"Ledger\""));

        let slice: Type = parse_quote!([u8]);
        assert!(component_name(&slice).is_none());
    }

    #[test]
    fn test_reject_generics() {
        let plain: syn::ItemStruct = parse_quote!(struct Plain;);
        assert!(reject_generics(&plain.generics).is_ok());

        let generic: syn::ItemStruct = parse_quote!(struct Wrapper<T>(T););
        assert!(reject_generics(&generic.generics).is_err());
    }
}
