use crate::auth::use_session;
use crate::components::header::Header;
use crate::components::icons::{Check, RefreshCw, ShieldCheck, X};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopverse_shared::{Role, User, UserStatus};

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let session = use_session();

    let (pending_users, set_pending_users) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(true);
    let (action_loading, set_action_loading) = signal(Option::<i64>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_users = {
        let session = session.clone();
        move || {
            let api = session.api();
            set_loading.set(true);
            spawn_local(async move {
                match api.users().await {
                    // 只关心待审批的品牌方
                    Ok(resp) => set_pending_users.set(
                        resp.data
                            .into_iter()
                            .filter(|u| u.role == Role::BrandOwner && u.status == UserStatus::Pending)
                            .collect(),
                    ),
                    Err(e) if e.is_unauthorized() => {}
                    Err(e) => {
                        set_notification
                            .set(Some((format!("Failed to load users: {}", e.message), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    // 初始加载
    Effect::new({
        let load_users = load_users.clone();
        move |_| {
            load_users();
        }
    });

    let handle_status = {
        let session = session.clone();
        move |user_id: i64, status: UserStatus| {
            set_action_loading.set(Some(user_id));
            let api = session.api();
            spawn_local(async move {
                match api.update_user_status(user_id, status).await {
                    // 审批完成，从待审列表移除
                    Ok(_) => set_pending_users.update(|list| list.retain(|u| u.id != user_id)),
                    Err(e) if e.is_unauthorized() => {}
                    Err(e) => {
                        set_notification.set(Some((
                            format!("Failed to update user status: {}", e.message),
                            true,
                        )));
                    }
                }
                set_action_loading.set(None);
            });
        }
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let pending_count = move || pending_users.with(|list| list.len());

    view! {
        <div class="min-h-screen bg-base-200">
            <Header />

            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || {
                        let (_, is_err) = notification.get().unwrap_or_default();
                        if is_err {
                            "alert alert-error shadow-lg"
                        } else {
                            "alert alert-success shadow-lg"
                        }
                    }>
                        <span>{move || notification.get().unwrap_or_default().0}</span>
                    </div>
                </div>
            </Show>

            <div class="container mx-auto px-4 py-8 space-y-6">
                <div class="flex items-center gap-2">
                    <ShieldCheck attr:class="h-8 w-8 text-primary" />
                    <h1 class="text-3xl font-bold">"Admin Dashboard"</h1>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <div>
                                <h3 class="card-title">"Pending Brand Owner Approvals"</h3>
                                <p class="text-base-content/70 text-sm">
                                    "Approve or reject seller accounts awaiting review."
                                </p>
                            </div>
                            <button
                                on:click={
                                    let load_users = load_users.clone();
                                    move |_| load_users()
                                }
                                disabled=move || loading.get()
                                class="btn btn-ghost btn-circle"
                            >
                                <RefreshCw attr:class=move || {
                                    if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                                } />
                            </button>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Email"</th>
                                        <th class="hidden md:table-cell">"Role"</th>
                                        <th class="hidden md:table-cell">"Status"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || pending_count() == 0 && !loading.get()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "No pending approvals"
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading.get() && pending_count() == 0>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span>
                                                " Loading..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || pending_users.get()
                                        key=|u| u.id
                                        children={
                                            let handle_status = handle_status.clone();
                                            move |user| {
                                                let approve = handle_status.clone();
                                                let reject = handle_status.clone();
                                                let id = user.id;
                                                view! {
                                                    <tr>
                                                        <td class="font-medium">{user.email.clone()}</td>
                                                        <td class="hidden md:table-cell">
                                                            <div class="badge badge-accent badge-outline">
                                                                {user.role.as_str()}
                                                            </div>
                                                        </td>
                                                        <td class="hidden md:table-cell">
                                                            <div class="badge badge-warning badge-outline">
                                                                {user.status.as_str()}
                                                            </div>
                                                        </td>
                                                        <td>
                                                            <div class="flex gap-2 justify-end">
                                                                <button
                                                                    class="btn btn-success btn-sm gap-1"
                                                                    disabled=move || action_loading.get() == Some(id)
                                                                    on:click=move |_| approve(id, UserStatus::Approved)
                                                                >
                                                                    <Check attr:class="h-4 w-4" />
                                                                    {move || if action_loading.get() == Some(id) {
                                                                        "Approving..."
                                                                    } else {
                                                                        "Approve"
                                                                    }}
                                                                </button>
                                                                <button
                                                                    class="btn btn-error btn-sm gap-1"
                                                                    disabled=move || action_loading.get() == Some(id)
                                                                    on:click=move |_| reject(id, UserStatus::Rejected)
                                                                >
                                                                    <X attr:class="h-4 w-4" />
                                                                    {move || if action_loading.get() == Some(id) {
                                                                        "Rejecting..."
                                                                    } else {
                                                                        "Reject"
                                                                    }}
                                                                </button>
                                                            </div>
                                                        </td>
                                                    </tr>
                                                }
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
