//! Procedural macros for the `tasklink_hooks` crate.
//!
//! This crate provides the `#[task_hooks]` attribute macro, which turns the
//! `#[pre_task]` / `#[post_task]` methods of an inherent impl block into a
//! `Hooked` implementation.
//!
//! # Example
//!
//! ```ignore
//! use tasklink_hooks::task_hooks;
//!
//! #[task_hooks(inherit = base)]
//! impl Doubler {
//!     #[pre_task]
//!     fn check(&self, input: &i64) -> Result<(), String> {
//!         if *input < 0 { return Err("negative".into()); }
//!         Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{ToTokens, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Member, Path, Token, Type, parse_macro_input,
};
use tasklink_macro_utils::{TasklinkCrate, resolve_crate_path};

/// Declares lifecycle hooks from the tagged methods of an impl block.
///
/// Methods marked `#[pre_task]` run before the task body and methods marked
/// `#[post_task]` after it. Each hook method takes `&self` and a reference to
/// the task input, and returns either `()` or `Result<(), E>` with `E`
/// convertible into a boxed error. The markers are removed; the methods stay
/// callable as ordinary methods.
///
/// # Arguments
///
/// - `input = Type` - the input type hooks receive. Optional when at least
///   one hook method exists (inferred from the first hook's parameter) or
///   when an `inherit` argument names its type.
/// - `inherit = field` or `inherit = field: Type` - inherit every hook of
///   the type stored at `field` (a dotted path such as `inner.base` is
///   accepted). With `: Type` the field's type is checked and a type without
///   hooks of its own takes its input from it. May be repeated.
/// - `mixin = Type` - mix in a `HookMixin`. May be repeated.
///
/// Inherited hooks run before mixins, and mixins before the type's own hooks.
///
/// # Generated Code
///
/// ```ignore
/// #[task_hooks(inherit = base)]
/// impl Derived {
///     #[pre_task]
///     fn validate(&self, input: &str) {}
/// }
/// ```
///
/// expands to the impl block (markers removed) plus:
///
/// ```ignore
/// impl tasklink_hooks::Hooked for Derived {
///     type Input = str;
///
///     fn declare_hooks(hooks: &mut tasklink_hooks::HookDeclarations<'_, Self>) {
///         hooks.inherit(|this: &Self| &this.base);
///         hooks.register::<tasklink_hooks::PreTask, _>("validate", |this: &Self, input: &str| {
///             tasklink_hooks::IntoHookResult::into_hook_result(Self::validate(this, input))
///         });
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn task_hooks(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HookArgs);
    let mut item_impl = parse_macro_input!(item as ItemImpl);

    match expand(args, &mut item_impl) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote! {
                #item_impl
                #err
            }
            .into()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct HookArgs {
    input: Option<Type>,
    inherits: Vec<InheritArg>,
    mixins: Vec<Path>,
}

/// `field.path` with an optional `: Type`.
struct InheritArg {
    path: Punctuated<Member, Token![.]>,
    ty: Option<Type>,
}

impl Parse for InheritArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path = Punctuated::<Member, Token![.]>::parse_separated_nonempty(input)?;
        let ty = if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            Some(input.parse()?)
        } else {
            None
        };
        Ok(Self { path, ty })
    }
}

impl Parse for HookArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = HookArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if key == "input" {
                if args.input.is_some() {
                    return Err(syn::Error::new_spanned(&key, "duplicate `input` argument"));
                }
                args.input = Some(input.parse()?);
            } else if key == "inherit" {
                args.inherits.push(input.parse()?);
            } else if key == "mixin" {
                args.mixins.push(input.parse()?);
            } else {
                return Err(syn::Error::new_spanned(
                    &key,
                    "unknown argument, expected `input`, `inherit` or `mixin`",
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

// ─────────────────────────────────────────────────────────────────────────────
// Expansion
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum HookPhase {
    Pre,
    Post,
}

impl HookPhase {
    fn from_attr(attr: &syn::Attribute) -> Option<Self> {
        if attr.path().is_ident("pre_task") {
            Some(Self::Pre)
        } else if attr.path().is_ident("post_task") {
            Some(Self::Post)
        } else {
            None
        }
    }

    fn marker(self) -> Ident {
        match self {
            Self::Pre => Ident::new("PreTask", Span::call_site()),
            Self::Post => Ident::new("PostTask", Span::call_site()),
        }
    }
}

struct HookMethod {
    ident: Ident,
    phases: Vec<HookPhase>,
    input: Type,
}

fn expand(args: HookArgs, item_impl: &mut ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if let Some((_, trait_path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            trait_path,
            "#[task_hooks] must be placed on an inherent impl block",
        ));
    }

    let mut methods = Vec::new();
    for impl_item in &mut item_impl.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        if let Some(hook) = take_hook_method(method)? {
            methods.push(hook);
        }
    }

    let hooks = resolve_crate_path(TasklinkCrate::Hooks);

    let typed_parent = args.inherits.iter().find_map(|inherit| inherit.ty.as_ref());
    let input_ty = match (&args.input, methods.first(), typed_parent) {
        (Some(ty), _, _) => ty.to_token_stream(),
        (None, Some(first), _) => first.input.to_token_stream(),
        (None, None, Some(parent)) => quote!(<#parent as #hooks::Hooked>::Input),
        (None, None, None) => {
            return Err(syn::Error::new_spanned(
                &item_impl.self_ty,
                "cannot infer the hook input type without hook methods, \
                 add `input = Type` or `inherit = field: Type`",
            ));
        }
    };

    let inherit_stmts = args.inherits.iter().map(|InheritArg { path, ty }| match ty {
        Some(ty) => quote! {
            hooks.inherit::<#ty, _>(|this: &Self| &this.#path);
        },
        None => quote! {
            hooks.inherit(|this: &Self| &this.#path);
        },
    });

    let mixin_stmts = args.mixins.iter().map(|mixin| {
        quote! {
            hooks.mixin::<#mixin>();
        }
    });

    let register_stmts = methods.iter().flat_map(|method| {
        let ident = &method.ident;
        let name = ident.to_string();
        let hooks = &hooks;
        method.phases.iter().map(move |phase| {
            let marker = phase.marker();
            quote! {
                hooks.register::<#hooks::#marker, _>(
                    #name,
                    |this: &Self, input: &<Self as #hooks::Hooked>::Input| {
                        #hooks::IntoHookResult::into_hook_result(Self::#ident(this, input))
                    },
                );
            }
        })
    });

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    Ok(quote! {
        #item_impl

        impl #impl_generics #hooks::Hooked for #self_ty #where_clause {
            type Input = #input_ty;

            fn declare_hooks(hooks: &mut #hooks::HookDeclarations<'_, Self>) {
                #(#inherit_stmts)*
                #(#mixin_stmts)*
                #(#register_stmts)*
            }
        }
    })
}

/// Strips the phase markers from `method` and validates its signature.
///
/// Returns `None` for methods without markers.
fn take_hook_method(method: &mut ImplItemFn) -> syn::Result<Option<HookMethod>> {
    let mut phases = Vec::new();
    let mut marker_attr = None;
    method.attrs.retain(|attr| match HookPhase::from_attr(attr) {
        Some(phase) => {
            phases.push(phase);
            marker_attr.get_or_insert_with(|| attr.clone());
            false
        }
        None => true,
    });

    let Some(marker_attr) = marker_attr else {
        return Ok(None);
    };

    for (i, phase) in phases.iter().enumerate() {
        if phases[..i].contains(phase) {
            return Err(syn::Error::new_spanned(&method.sig.ident, "duplicate hook marker"));
        }
    }
    if let syn::Meta::List(list) = &marker_attr.meta {
        return Err(syn::Error::new_spanned(list, "hook markers take no arguments"));
    }

    let sig = &method.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "hook methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "hook methods cannot be generic",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "hook methods must take `&self` as their first parameter",
            ));
        }
    }

    let input = match (inputs.next(), inputs.next()) {
        (Some(FnArg::Typed(pat_type)), None) => match &*pat_type.ty {
            Type::Reference(reference) if reference.mutability.is_none() => {
                (*reference.elem).clone()
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other.to_token_stream(),
                    "hook input must be a shared reference, e.g. `&MyInput`",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "hook methods take exactly `&self` and the task input",
            ));
        }
    };

    Ok(Some(HookMethod {
        ident: sig.ident.clone(),
        phases,
        input,
    }))
}
