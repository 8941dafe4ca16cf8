use crate::auth::use_session;
use crate::components::header::Header;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn OtpVerificationPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    // 注册流程存下的待验证邮箱，预填进表单
    let (email, set_email) = signal(session.0.pending_email().unwrap_or_default());
    let (otp, set_otp) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let session = session.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = session
                .0
                .verify_otp(&email.get_untracked(), &otp.get_untracked())
                .await;
            match result {
                Ok(_) => navigate("/"),
                Err(e) => set_error_msg.set(Some(e.message.clone())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <Header />
            <div class="flex items-center justify-center py-12 px-4">
                <div class="card w-full max-w-md shrink-0 shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="text-2xl font-bold text-center">"Verify Your Email"</h2>
                        <p class="text-center text-base-content/70">
                            "Enter the OTP sent to " {move || email.get()}
                        </p>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="otp-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="otp-email"
                                type="email"
                                class="input input-bordered"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="otp-code">
                                <span class="label-text">"OTP Code"</span>
                            </label>
                            <input
                                id="otp-code"
                                type="text"
                                maxlength="6"
                                class="input input-bordered"
                                on:input=move |ev| set_otp.set(event_target_value(&ev))
                                prop:value=otp
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Verifying..." }.into_any()
                                } else {
                                    "Verify OTP".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
