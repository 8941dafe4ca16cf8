//! Shop Verse 店面前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储与生命周期控制器（进程内唯一状态持有者）
//! - `api`: API 网关客户端（令牌附加 + 401 拆除两条横切策略）
//! - `auth`: 认证上下文（控制器到 Leptos 信号的桥接）
//! - `web::route` / `web::router`: 路由领域模型与核心引擎
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub(crate) use {log_error, log_info};

pub mod api;
pub mod auth;
mod components {
    pub mod admin_dashboard;
    pub mod header;
    pub mod home;
    mod icons;
    pub mod login;
    pub mod otp_verification;
    pub mod products;
    pub mod signup;
}
pub mod request;
pub mod session;

use crate::auth::{AuthContext, provide_session};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::otp_verification::OtpVerificationPage;
use crate::components::products::ProductsPage;
use crate::components::signup::SignupPage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::OtpVerification => view! { <OtpVerificationPage /> }.into_any(),
        AppRoute::Products => view! { <ProductsPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 组装会话控制器并从 LocalStorage 恢复会话
    provide_session(&auth_ctx);

    // 3. 认证信号注入路由服务实现守卫
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
