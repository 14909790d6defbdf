//! # Permissions Macro
//!
//! `#[with_permission(...)]` puts a role check in front of a handler body.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Expr,
    ItemFn,
    Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

/// Comma-separated permissions, all of which the caller's role must allow.
struct RequiredPermissions(Vec<Expr>);

impl Parse for RequiredPermissions {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let listed = Punctuated::<Expr, Token![,]>::parse_terminated(input)?;

        if let Some(assign) = listed.iter().find(|expr| matches!(expr, Expr::Assign(_))) {
            return Err(syn::Error::new_spanned(
                assign,
                "list permissions separated by commas; every one of them is required",
            ));
        }
        if listed.is_empty() {
            return Err(input.error("at least one permission is required"));
        }

        Ok(Self(listed.into_iter().collect()))
    }
}

/// Attribute macro for checking permissions on handler functions.
///
/// The handler must have a `user: AuthenticatedUser` binding whose `role`
/// was loaded from the store by the auth middleware, and must return
/// `Result<_, error::AppError>`. A role that lacks any listed permission
/// gets `AppError::forbidden` before the original body runs.
///
/// ```ignore
/// use auth::permissions::{DashboardAction, Permission};
/// use permissions_macro::with_permission;
///
/// #[with_permission(Permission::Dashboard(DashboardAction::Read))]
/// pub async fn dashboard_stats_handler(
///     state: &AppState,
///     user: AuthenticatedUser,
/// ) -> Result<Json<DashboardStats>> {
///     // managers only
/// }
/// ```
#[proc_macro_attribute]
pub fn with_permission(args: TokenStream, input: TokenStream) -> TokenStream {
    let RequiredPermissions(permissions) = parse_macro_input!(args as RequiredPermissions);
    let mut handler = parse_macro_input!(input as ItemFn);

    let check = role_check(&permissions);
    let body = handler.block;
    handler.block = Box::new(syn::parse_quote! {
        {
            #check
            #body
        }
    });

    quote!(#handler).into()
}

fn role_check(permissions: &[Expr]) -> proc_macro2::TokenStream {
    quote! {
        for required in [#(#permissions),*] {
            let required: auth::permissions::Permission = required;
            if !required.allows(&user.role) {
                tracing::debug!(user_id = user.id, role = %user.role, permission = %required, "Permission denied");
                return Err(error::AppError::forbidden(
                    format!("Permission '{}' is required", required)
                ));
            }
        }
    }
}
