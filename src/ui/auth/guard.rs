//! Route guard for pages that need a signed-in user

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::context::use_auth_context;

/// Where anonymous visitors are sent by default
pub const LOGIN_PATH: &str = "/login";

/// Renders its children only for an authenticated session.
///
/// Anonymous visitors, including users whose session just expired, are
/// redirected.
#[component]
pub fn RequireAuth(
    /// Redirect target for anonymous visitors
    #[prop(optional, into)]
    redirect_to: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth_context();
    let navigate = use_navigate();
    let redirect_to = redirect_to.unwrap_or_else(|| LOGIN_PATH.to_string());

    // Redirect if not authenticated
    let guard = auth.clone();
    Effect::new(move |_| {
        if !guard.is_authenticated() {
            navigate(&redirect_to, Default::default());
        }
    });

    view! {
        <Show when=move || auth.is_authenticated()>
            {children()}
        </Show>
    }
}
