//! 操作级拦截声明宏实现

use crate::utils::{component_name, path_ends_with, runtime_crate, take_attributes};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, FnArg, Ident,
    ImplItem, ItemImpl, LitStr, Result, ReturnType, Signature, Token, Type,
};

/// `#[intercepted]` 参数
#[derive(Debug, Default)]
pub struct InterceptedArgs {
    /// 拦截点使用的组件名，默认为 `模块路径::类型名`
    pub component: Option<String>,
}

impl Parse for InterceptedArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = InterceptedArgs::default();
        if input.is_empty() {
            return Ok(args);
        }

        let key: Ident = input.parse()?;
        if key != "component" {
            return Err(syn::Error::new(
                key.span(),
                format!("未知的拦截参数: {}", key),
            ));
        }
        input.parse::<Token![=]>()?;
        let component: LitStr = input.parse()?;
        args.component = Some(component.value());
        Ok(args)
    }
}

/// 实现 #[intercepted] 宏
pub fn intercepted_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let intercepted_args = parse_macro_input!(args as InterceptedArgs);
    let item_impl = parse_macro_input!(input as ItemImpl);

    expand_intercepted(intercepted_args, item_impl)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 收集方法上的 `#[intercept("..")]`
///
/// 每个方法生成一个 `<METHOD>_OPERATION` 常量并提交一条操作级声明；
/// 形如 `async fn m(&self, invocation: &Invocation) -> InvocationResult` 的方法
/// 另外生成 `m_intercepted`，经容器中的调用链提供者执行。
pub fn expand_intercepted(
    args: InterceptedArgs,
    mut item_impl: ItemImpl,
) -> Result<proc_macro2::TokenStream> {
    let component = match args.component {
        Some(component) => quote! { #component },
        None => component_name(&item_impl.self_ty).ok_or_else(|| {
            syn::Error::new_spanned(
                &item_impl.self_ty,
                "无法确定组件名称，请使用 #[intercepted(component = \"..\")]",
            )
        })?,
    };

    let krate = runtime_crate();
    let mut submissions = Vec::new();
    let mut generated = Vec::new();

    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let mut interceptors = Vec::new();
        for attr in take_attributes(&mut method.attrs, "intercept") {
            let names = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
            interceptors.extend(names.iter().map(LitStr::value));
        }
        if interceptors.is_empty() {
            continue;
        }

        let method_ident = &method.sig.ident;
        let method_name = method_ident.to_string();
        let vis = &method.vis;
        let operation = format_ident!("{}_OPERATION", method_name.to_uppercase());

        generated.push(quote! {
            #vis const #operation: #krate::interception::OperationId =
                #krate::interception::OperationId::new(#component, #method_name);
        });

        if takes_invocation(&method.sig) {
            let wrapper = format_ident!("{}_intercepted", method_name);
            generated.push(quote! {
                #vis async fn #wrapper(
                    self: ::std::sync::Arc<Self>,
                    container: &dyn #krate::di::ObjectContainer,
                    arguments: ::std::vec::Vec<#krate::interception::Value>,
                ) -> #krate::interception::InvocationResult {
                    let provider = #krate::di::ObjectContainerExt::get::<
                        dyn #krate::interception::InterceptorProvider,
                    >(container)?;
                    let target = #krate::interception::target_fn(
                        move |invocation: #krate::interception::Invocation| {
                            let this = ::std::sync::Arc::clone(&self);
                            async move { this.#method_ident(&invocation).await }
                        },
                    );
                    let invocation = #krate::interception::Invocation::new(Self::#operation)
                        .with_arguments(arguments);
                    #krate::interception::invoke_intercepted(&*provider, container, invocation, &target)
                        .await
                }
            });
        }

        submissions.push(quote! {
            #krate::__private::inventory::submit! {
                #krate::interception::InterceptorDeclaration::new(
                    #krate::interception::InterceptionPoint::Operation(
                        #krate::interception::OperationId::new(#component, #method_name),
                    ),
                    &[#(#interceptors),*],
                )
            }
        });
    }

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    Ok(quote! {
        #item_impl

        #[allow(dead_code)]
        impl #impl_generics #self_ty #where_clause {
            #(#generated)*
        }

        const _: () = {
            #(#submissions)*
        };
    })
}

/// `async fn m(&self, invocation: &Invocation) -> InvocationResult`
fn takes_invocation(sig: &Signature) -> bool {
    if sig.asyncness.is_none() || sig.inputs.len() != 2 {
        return false;
    }

    let mut inputs = sig.inputs.iter();
    let shared_receiver = matches!(
        inputs.next(),
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none()
    );
    let invocation_argument = matches!(
        inputs.next(),
        Some(FnArg::Typed(argument)) if is_type_named(&argument.ty, "Invocation", true)
    );
    let returns_result = matches!(
        &sig.output,
        ReturnType::Type(_, ty) if is_type_named(ty, "InvocationResult", false)
    );

    shared_receiver && invocation_argument && returns_result
}

fn is_type_named(ty: &Type, name: &str, by_reference: bool) -> bool {
    match ty {
        Type::Reference(reference) if by_reference && reference.mutability.is_none() => {
            is_type_named(&reference.elem, name, false)
        }
        Type::Path(type_path) if !by_reference => path_ends_with(&type_path.path, name),
        _ => false,
    }
}
