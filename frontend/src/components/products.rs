use crate::auth::{use_auth, use_session};
use crate::components::header::Header;
use crate::components::icons::{ShoppingBag, ShoppingCart};
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopverse_shared::{Product, ProductQuery};

#[component]
pub fn ProductsPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let navigate = use_navigate();

    let (products, set_products) = signal(Vec::<Product>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 初始加载
    Effect::new({
        let session = session.clone();
        move |_| {
            let api = session.api();
            spawn_local(async move {
                match api.products(&ProductQuery::default()).await {
                    Ok(list) => set_products.set(list.data),
                    Err(e) => {
                        set_notification
                            .set(Some((format!("Failed to load products: {}", e.message), true)));
                    }
                }
                set_loading.set(false);
            });
        }
    });

    let handle_add = {
        let session = session.clone();
        let navigate = navigate.clone();
        move |product_id: i64| {
            // 未登录先去登录页；401 过期则由网关统一拆除
            if !auth.state.get_untracked().is_authenticated() {
                navigate("/login");
                return;
            }
            let api = session.api();
            spawn_local(async move {
                match api.add_to_cart(product_id, 1).await {
                    Ok(_) => set_notification.set(Some(("Added to cart".to_string(), false))),
                    Err(e) if e.is_unauthorized() => {}
                    Err(e) => set_notification.set(Some((e.message.clone(), true))),
                }
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

            <div class="container mx-auto px-4 py-8">
                <h1 class="text-3xl font-bold mb-6">"Products"</h1>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="text-center py-8">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                            " Loading products..."
                        </div>
                    }
                >
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
                        <For
                            each=move || products.get()
                            key=|p| p.id
                            children={
                                let handle_add = handle_add.clone();
                                move |product| {
                                    let handle_add = handle_add.clone();
                                    let id = product.id;
                                    view! {
                                        <div class="card bg-base-100 shadow-md hover:shadow-lg transition-shadow">
                                            <figure class="h-40 bg-base-300 flex items-center justify-center">
                                                <ShoppingBag attr:class="h-12 w-12 text-base-content/30" />
                                            </figure>
                                            <div class="card-body p-4">
                                                <h2 class="card-title text-lg line-clamp-2">{product.name.clone()}</h2>
                                                <p class="text-sm text-base-content/70 line-clamp-2">
                                                    {product.description.clone()}
                                                </p>
                                                <div class="flex items-center justify-between">
                                                    <span class="text-xl font-bold text-primary">
                                                        {format!("${:.2}", product.price)}
                                                    </span>
                                                    <span class="text-sm text-base-content/50">
                                                        {format!("Stock: {}", product.stock_quantity)}
                                                    </span>
                                                </div>
                                                <button
                                                    class="btn btn-primary btn-sm mt-2 gap-2"
                                                    on:click=move |_| handle_add(id)
                                                >
                                                    <ShoppingCart attr:class="h-4 w-4" /> "Add to Cart"
                                                </button>
                                            </div>
                                        </div>
                                    }
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </div>
    }
}
