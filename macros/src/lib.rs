//! Derive macros for todoflow
//!
//! This crate provides procedural macros to reduce boilerplate around action
//! enums.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Classifies variants as commands or events and
//!   generates their message tags
//!
//! # Example
//!
//! ```ignore
//! use todoflow_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum ListAction {
//!     #[command]
//!     CreateTodolist { title: String },
//!
//!     #[event]
//!     RemoveTodolist { todolist_id: String },
//! }
//!
//! assert!(ListAction::CreateTodolist { title: "x".into() }.is_command());
//! assert_eq!(ListAction::RemoveTodolist { todolist_id: "1".into() }.tag(), "REMOVE-TODOLIST");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `tag()` - Returns the message tag, the variant name in
///   SCREAMING-KEBAB-CASE (`ChangeTodolistTitle` → `CHANGE-TODOLIST-TITLE`)
/// - `EVENT_TAGS` - The tags of every `#[event]` variant, in declaration order
///
/// The tag matches what serde produces for
/// `#[serde(rename_all = "SCREAMING-KEBAB-CASE")]`, so the generated tags and
/// the wire format agree.
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut command_arms = Vec::new();
    let mut event_arms = Vec::new();
    let mut tag_arms = Vec::new();
    let mut event_tags = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let tag = screaming_kebab(&variant.ident.to_string());

        if is_command {
            command_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            event_arms.push(quote! { #pattern => true, });
            event_tags.push(tag.clone());
        }

        tag_arms.push(quote! { #pattern => #tag, });
    }

    let expanded = quote! {
        impl #name {
            /// Tags of every event variant, in declaration order
            pub const EVENT_TAGS: &'static [&'static str] = &[#(#event_tags),*];

            /// Returns true if this action is a command
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#event_arms)*
                    _ => false,
                }
            }

            /// Returns the message tag of this action
            #[must_use]
            pub const fn tag(&self) -> &'static str {
                match self {
                    #(#tag_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds a match pattern that ignores the variant's fields
fn variant_pattern(variant: &Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// `ChangeTodolistTitle` → `CHANGE-TODOLIST-TITLE`
fn screaming_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.char_indices() {
        if i > 0 && ch.is_uppercase() {
            out.push('-');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
