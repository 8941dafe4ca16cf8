use crate::auth::use_session;
use crate::components::header::Header;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopverse_shared::Role;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(Role::Customer);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let session = session.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = session
                .0
                .login(
                    &email.get_untracked(),
                    &password.get_untracked(),
                    role.get_untracked(),
                )
                .await;
            match result {
                Ok(established) => {
                    // 超管进审批面板，其余回首页
                    if established.user.role == Role::SuperAdmin {
                        navigate("/admin");
                    } else {
                        navigate("/");
                    }
                }
                Err(e) => set_error_msg.set(Some(e.message.clone())),
            }
            set_is_submitting.set(false);
        });
    };

    let role_radio = move |value: Role, label: &'static str| {
        view! {
            <label class="label cursor-pointer justify-start gap-2">
                <input
                    type="radio"
                    name="role"
                    class="radio radio-sm"
                    prop:checked=move || role.get() == value
                    on:change=move |_| set_role.set(value)
                />
                <span class="label-text">{label}</span>
            </label>
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Header />
            <div class="flex items-center justify-center py-12 px-4">
                <div class="card w-full max-w-md shrink-0 shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="text-2xl font-bold text-center">"Login"</h2>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                class="input input-bordered"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                class="input input-bordered"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                required
                            />
                        </div>
                        <div class="form-control mt-2">
                            <span class="label-text mb-1">"Login as:"</span>
                            {role_radio(Role::Customer, "Customer")}
                            {role_radio(Role::BrandOwner, "Brand Owner")}
                            {role_radio(Role::SuperAdmin, "Super Admin")}
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
