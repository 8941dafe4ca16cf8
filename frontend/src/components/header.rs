use crate::auth::{use_auth, use_session};
use crate::components::icons::{LogOut, ShoppingBag};
use crate::web::router::use_navigate;
use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let navigate = use_navigate();

    // 每个链接各拿一份 navigate 的克隆
    let link = move |path: &'static str| {
        let navigate = navigate.clone();
        move |ev: leptos::web_sys::MouseEvent| {
            ev.prevent_default();
            navigate(path);
        }
    };
    // 未登录区块重建时会再次取链接回调，单独克隆一份
    let guest_link = link.clone();

    let on_logout = {
        let session = session.clone();
        move |_| {
            session.0.logout();
        }
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1 gap-1">
                <ShoppingBag attr:class="h-6 w-6 text-primary" />
                <a href="/" class="btn btn-ghost text-xl" on:click=link("/")>"Shop Verse"</a>
            </div>
            <div class="flex-none gap-1">
                <a href="/" class="btn btn-ghost btn-sm" on:click=link("/")>"Home"</a>
                <a href="/products" class="btn btn-ghost btn-sm" on:click=link("/products")>"Products"</a>
                <Show when=move || !auth.state.get().is_authenticated()>
                    <a href="/login" class="btn btn-ghost btn-sm" on:click=guest_link("/login")>"Login"</a>
                    <a href="/signup" class="btn btn-ghost btn-sm" on:click=guest_link("/signup")>"Signup"</a>
                </Show>
                <Show when=move || auth.state.get().is_authenticated()>
                    <span class="text-sm px-2 hidden md:inline">
                        "Welcome, "
                        {move || {
                            auth.state
                                .get()
                                .user()
                                .map(|u| u.email.clone())
                                .unwrap_or_default()
                        }}
                    </span>
                    <button on:click=on_logout.clone() class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Logout"
                    </button>
                </Show>
            </div>
        </div>
    }
}
