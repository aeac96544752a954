//! 生命周期标记宏实现

use crate::component::ComponentLifecycle;
use crate::utils::find_attribute;
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenTree};
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, parse_quote, Ident, ItemStruct, Meta,
    Result,
};

/// 生命周期参数：`singleton` 或 `transient`
#[derive(Debug, Clone, Copy)]
pub struct LifecycleArgs {
    pub lifecycle: ComponentLifecycle,
    pub span: Span,
}

impl Parse for LifecycleArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let ident: Ident = input.parse()?;
        let lifecycle = ComponentLifecycle::from_ident(&ident).ok_or_else(|| {
            syn::Error::new(
                ident.span(),
                format!("未知的生命周期: {}，可选 singleton 或 transient", ident),
            )
        })?;
        if !input.is_empty() {
            return Err(input.error("#[lifecycle] 只接受一个参数"));
        }
        Ok(Self {
            lifecycle,
            span: ident.span(),
        })
    }
}

/// 实现 #[lifecycle] 宏
///
/// 写在 `#[component]` 上方时先展开，把生命周期并入组件参数；
/// 写在下方时由 `#[component]` 自行读取。
pub fn lifecycle_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let lifecycle_args = parse_macro_input!(args as LifecycleArgs);
    let input_struct = parse_macro_input!(input as ItemStruct);

    match merge_into_component(lifecycle_args, input_struct) {
        Ok(item) => quote!(#item).into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn merge_into_component(args: LifecycleArgs, mut item: ItemStruct) -> Result<ItemStruct> {
    let Some(position) = find_attribute(&item.attrs, "component") else {
        return Err(syn::Error::new(
            args.span,
            "#[lifecycle] 需要与 #[component] 一起使用",
        ));
    };

    let flag = Ident::new(
        match args.lifecycle {
            ComponentLifecycle::Singleton => "singleton",
            ComponentLifecycle::Transient => "transient",
        },
        args.span,
    );

    let attr = &item.attrs[position];
    let path = attr.path().clone();
    let merged = match &attr.meta {
        Meta::Path(_) => quote!(#flag),
        Meta::List(list) => {
            let mut tokens: Vec<TokenTree> = list.tokens.clone().into_iter().collect();
            if matches!(tokens.last(), Some(TokenTree::Punct(punct)) if punct.as_char() == ',') {
                tokens.pop();
            }
            if tokens.is_empty() {
                quote!(#flag)
            } else {
                quote!(#(#tokens)*, #flag)
            }
        }
        Meta::NameValue(_) => {
            return Err(syn::Error::new_spanned(attr, "#[component] 参数格式错误"));
        }
    };

    item.attrs[position] = parse_quote!(#[#path(#merged)]);
    Ok(item)
}
