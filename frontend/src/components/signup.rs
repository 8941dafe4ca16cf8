use crate::auth::use_session;
use crate::components::header::Header;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopverse_shared::auth::{BrandInfo, SignupForm};

#[component]
pub fn SignupPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (is_brand, set_is_brand) = signal(false);
    let (brand_name, set_brand_name) = signal(String::new());
    let (brand_description, set_brand_description) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_brand.get() && (brand_name.get().is_empty() || brand_description.get().is_empty()) {
            set_error_msg.set(Some("Please fill in your brand details".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let form = SignupForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            brand: is_brand.get_untracked().then(|| BrandInfo {
                name: brand_name.get_untracked(),
                description: brand_description.get_untracked(),
            }),
        };

        let session = session.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match session.0.signup(form).await {
                // 注册不登录：转去 OTP 验证完成流程
                Ok(()) => navigate("/otp-verification"),
                Err(e) => set_error_msg.set(Some(e.message.clone())),
            }
            set_is_submitting.set(false);
        });
    };

    let text_field = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           value: ReadSignal<String>,
                           setter: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    on:input=move |ev| setter.set(event_target_value(&ev))
                    prop:value=value
                    required
                />
            </div>
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Header />
            <div class="flex items-center justify-center py-12 px-4">
                <div class="card w-full max-w-md shrink-0 shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="text-2xl font-bold text-center">"Signup"</h2>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {text_field("email", "Email", "email", email, set_email)}
                        {text_field("password", "Password", "password", password, set_password)}
                        {text_field("first-name", "First Name", "text", first_name, set_first_name)}
                        {text_field("last-name", "Last Name", "text", last_name, set_last_name)}

                        <div class="form-control mt-2">
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=is_brand
                                    on:change=move |ev| set_is_brand.set(event_target_checked(&ev))
                                />
                                <span class="label-text">"Signup as Brand Owner"</span>
                            </label>
                        </div>

                        <Show when=move || is_brand.get()>
                            <div class="form-control">
                                <label class="label" for="brand-name">
                                    <span class="label-text">"Brand Name"</span>
                                </label>
                                <input
                                    id="brand-name"
                                    type="text"
                                    class="input input-bordered"
                                    on:input=move |ev| set_brand_name.set(event_target_value(&ev))
                                    prop:value=brand_name
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="brand-description">
                                    <span class="label-text">"Brand Description"</span>
                                </label>
                                <textarea
                                    id="brand-description"
                                    class="textarea textarea-bordered"
                                    on:input=move |ev| set_brand_description.set(event_target_value(&ev))
                                    prop:value=brand_description
                                ></textarea>
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-success" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing up..." }.into_any()
                                } else {
                                    "Signup".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
