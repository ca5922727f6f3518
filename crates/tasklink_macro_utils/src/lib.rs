//! Shared utilities for tasklink procedural macro crates.
//!
//! Generated code has to name the runtime crates by a path that resolves in
//! the consuming crate, whether it depends on an individual crate (possibly
//! renamed) or only on the `tasklink` umbrella.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// A tasklink crate that macro-generated code may reference.
pub enum TasklinkCrate {
    /// `tasklink_hooks`
    Hooks,
}

impl TasklinkCrate {
    /// Returns the `Cargo.toml` package name for this crate.
    fn as_str(&self) -> &'static str {
        match self {
            Self::Hooks => "tasklink_hooks",
        }
    }
}

/// Returns a [`TokenStream`] path for the given tasklink crate.
///
/// Resolution order:
/// 1. Direct dependency (possibly renamed in `Cargo.toml`).
/// 2. Indirect access via the `tasklink` umbrella crate (`tasklink::<name>`).
/// 3. Fallback to the literal crate name, so the compile error points at the
///    missing dependency.
pub fn resolve_crate_path(krate: TasklinkCrate) -> TokenStream {
    let name = krate.as_str();

    match crate_name(name) {
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", name);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name("tasklink") {
            Ok(FoundCrate::Name(found)) => {
                let umbrella = format_ident!("{}", found);
                let ident = format_ident!("{}", name);
                quote!(#umbrella::#ident)
            }
            // Tests and doctests of the umbrella package see it as an
            // external crate.
            Ok(FoundCrate::Itself) => {
                let ident = format_ident!("{}", name);
                quote!(tasklink::#ident)
            }
            _ => {
                let ident = format_ident!("{}", name);
                quote!(#ident)
            }
        },
    }
}
