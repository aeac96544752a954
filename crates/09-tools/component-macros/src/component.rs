//! 组件声明宏实现

use crate::lifecycle::LifecycleArgs;
use crate::utils::{reject_generics, runtime_crate, take_attributes};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    bracketed, parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated,
    DeriveInput, Ident, ItemStruct, LitStr, Result, Token, Type,
};

/// 组件生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentLifecycle {
    Singleton,
    Transient,
}

impl ComponentLifecycle {
    /// 从标记名解析
    pub fn from_ident(ident: &Ident) -> Option<Self> {
        if ident == "singleton" {
            Some(Self::Singleton)
        } else if ident == "transient" {
            Some(Self::Transient)
        } else {
            None
        }
    }

    fn to_tokens(self) -> proc_macro2::TokenStream {
        let krate = runtime_crate();
        match self {
            Self::Singleton => quote! { #krate::common::Lifecycle::Singleton },
            Self::Transient => quote! { #krate::common::Lifecycle::Transient },
        }
    }
}

/// 组件声明参数
///
/// ```text
/// #[component(contract = dyn Greeter, name = "fr", transient, default, initializer,
///             interceptors = ["logging", "transaction"])]
/// ```
#[derive(Default)]
pub struct ComponentArgs {
    /// 契约类型，未指定时自注册
    pub contract: Option<Type>,
    /// 契约名称
    pub name: Option<String>,
    /// 生命周期标记，未指定时由扫描器按单例处理
    pub lifecycle: Option<ComponentLifecycle>,
    /// 通过 `Default` 构造
    pub default_inject: bool,
    /// 组件实现了 `Initializer`
    pub initializer: bool,
    /// 组件级拦截器
    pub interceptors: Vec<String>,
}

impl ComponentArgs {
    /// 设置生命周期，重复声明不同的生命周期时报错
    pub fn set_lifecycle(&mut self, lifecycle: ComponentLifecycle, span: Span) -> Result<()> {
        match self.lifecycle {
            Some(existing) if existing != lifecycle => Err(syn::Error::new(
                span,
                "组件的生命周期只能声明一次：singleton 或 transient",
            )),
            _ => {
                self.lifecycle = Some(lifecycle);
                Ok(())
            }
        }
    }
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ComponentArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;

            if let Some(lifecycle) = ComponentLifecycle::from_ident(&key) {
                args.set_lifecycle(lifecycle, key.span())?;
            } else if key == "default" {
                args.default_inject = true;
            } else if key == "initializer" {
                args.initializer = true;
            } else if key == "contract" {
                input.parse::<Token![=]>()?;
                args.contract = Some(input.parse()?);
            } else if key == "name" {
                input.parse::<Token![=]>()?;
                let name: LitStr = input.parse()?;
                args.name = Some(name.value());
            } else if key == "interceptors" {
                input.parse::<Token![=]>()?;
                let content;
                bracketed!(content in input);
                let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                args.interceptors = names.iter().map(LitStr::value).collect();
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    format!("未知的组件参数: {}", key),
                ));
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// 实现 #[component] 宏
pub fn component_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = parse_macro_input!(args as ComponentArgs);
    let input_struct = parse_macro_input!(input as ItemStruct);

    expand_component(component_args, input_struct)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 展开组件声明
///
/// 结构体下方的 `#[lifecycle(..)]` 在这里合并并移除
pub fn expand_component(
    mut args: ComponentArgs,
    mut input_struct: ItemStruct,
) -> Result<proc_macro2::TokenStream> {
    reject_generics(&input_struct.generics)?;

    for attr in take_attributes(&mut input_struct.attrs, "lifecycle") {
        let lifecycle: LifecycleArgs = attr.parse_args()?;
        args.set_lifecycle(lifecycle.lifecycle, lifecycle.span)?;
    }

    let krate = runtime_crate();
    let struct_name = &input_struct.ident;
    let struct_name_string = struct_name.to_string();

    let initializer_fn = if args.initializer {
        quote! {
            fn initializer() -> ::core::option::Option<#krate::di::InitializerView<Self>> {
                ::core::option::Option::Some(#krate::di::as_initializer::<Self>)
            }
        }
    } else {
        quote! {}
    };

    let injectable_impl = if args.default_inject {
        quote! {
            impl #krate::di::Injectable for #struct_name {
                fn inject(
                    _container: &dyn #krate::di::ObjectContainer,
                ) -> #krate::common::DependencyResult<Self> {
                    ::core::result::Result::Ok(<Self as ::core::default::Default>::default())
                }
            }
        }
    } else {
        quote! {}
    };

    let (provides_impl, contract_fn, activation, contract_ref) = match &args.contract {
        Some(contract) => (
            quote! {
                impl #krate::di::Provides<#contract> for #struct_name {
                    fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#contract> {
                        self
                    }
                }
            },
            quote! {
                fn __component_contract() -> #krate::common::TypeInfo {
                    #krate::common::TypeInfo::of::<#contract>()
                }
            },
            quote! { #krate::di::ComponentType::providing::<#contract, #struct_name>() },
            quote! { ::core::option::Option::Some(__component_contract) },
        ),
        None => (
            quote! {},
            quote! {},
            quote! { #krate::di::ComponentType::of::<#struct_name>() },
            quote! { ::core::option::Option::None },
        ),
    };

    let name = args.name.as_deref().unwrap_or("");
    let lifecycle = match args.lifecycle {
        Some(lifecycle) => {
            let tokens = lifecycle.to_tokens();
            quote! { ::core::option::Option::Some(#tokens) }
        }
        None => quote! { ::core::option::Option::None },
    };

    let interceptor_submission = if args.interceptors.is_empty() {
        quote! {}
    } else {
        let interceptors = &args.interceptors;
        quote! {
            #krate::__private::inventory::submit! {
                #krate::interception::InterceptorDeclaration::new(
                    #krate::interception::InterceptionPoint::Component(
                        ::core::concat!(::core::module_path!(), "::", #struct_name_string),
                    ),
                    &[#(#interceptors),*],
                )
            }
        }
    };

    let expanded = quote! {
        #input_struct

        impl #krate::di::Component for #struct_name {
            #initializer_fn
        }

        #injectable_impl

        #provides_impl

        const _: () = {
            #contract_fn

            fn __component_activation() -> #krate::di::ComponentType {
                #activation
            }

            #krate::__private::inventory::submit! {
                #krate::di::TypeEntry {
                    artifact: ::core::env!("CARGO_PKG_NAME"),
                    type_name: ::core::concat!(module_path!(), "::", #struct_name_string),
                    register: ::core::option::Option::Some(#krate::di::RegisterTag {
                        contract: #contract_ref,
                        name: #name,
                    }),
                    lifecycle: #lifecycle,
                    activation: __component_activation,
                }
            }

            #interceptor_submission
        };
    };

    Ok(expanded)
}

/// 实现 #[derive(Component)] 宏
///
/// 只生成 `Component` 实现，不提交类型表条目；
/// 结构体上带 `#[initializer]` 时声明初始化能力。
pub fn derive_component_impl(input: DeriveInput) -> TokenStream {
    if let Err(e) = reject_generics(&input.generics) {
        return e.to_compile_error().into();
    }

    let krate = runtime_crate();
    let struct_name = &input.ident;
    let initializable = input
        .attrs
        .iter()
        .any(|attr| attr.path().is_ident("initializer"));

    let initializer_fn = if initializable {
        quote! {
            fn initializer() -> ::core::option::Option<#krate::di::InitializerView<Self>> {
                ::core::option::Option::Some(#krate::di::as_initializer::<Self>)
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl #krate::di::Component for #struct_name {
            #initializer_fn
        }
    };

    TokenStream::from(expanded)
}
