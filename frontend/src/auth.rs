//! 认证上下文模块
//!
//! 把会话控制器接到 Leptos 信号上：控制器是状态的唯一持有者，
//! 这里只负责把变化同步进 `AuthState` 信号供视图订阅。
//! 路由服务通过注入的认证信号检查认证状态，与本模块解耦。

use crate::api::ShopApi;
use crate::session::{SessionController, SessionStore};
use crate::web::{FetchHttpClient, LocalStorage};
use leptos::prelude::*;
use shopverse_shared::{Session, User};
use std::rc::Rc;

/// 后端 API 基础地址
pub const DEFAULT_API_BASE: &str = "http://localhost:3001/api/v1";

pub type AppApi = ShopApi<FetchHttpClient, LocalStorage>;
pub type AppController = SessionController<FetchHttpClient, LocalStorage>;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前会话（仅在认证成功后存在）
    pub session: Option<Session>,
    /// 是否正在从持久化存储恢复
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            session: None,
            is_loading: true,
        });
        Self { state, set_state }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 会话控制器句柄
#[derive(Clone)]
pub struct SessionHandle(pub Rc<AppController>);

impl SessionHandle {
    pub fn api(&self) -> Rc<AppApi> {
        self.0.api()
    }
}

/// 从 Context 获取会话控制器
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>().expect("SessionHandle should be provided")
}

/// 组装网关与控制器，挂到 Context，并从 LocalStorage 恢复会话
pub fn provide_session(ctx: &AuthContext) -> SessionHandle {
    let store = SessionStore::new(LocalStorage);
    let api = Rc::new(ShopApi::new(DEFAULT_API_BASE, FetchHttpClient, store.clone()));
    let controller = SessionController::new(api, store);

    // 状态变化同步进信号，驱动依赖视图与路由守卫
    let set_state = ctx.set_state;
    controller.set_on_change(Rc::new(move |session, is_loading| {
        set_state.update(|state| {
            state.session = session;
            state.is_loading = is_loading;
        });
    }));

    // 登出与 401 拆除的跳转：整页跳到登录入口
    controller.set_on_navigate(Rc::new(|path: &str| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }));

    controller.hydrate();

    let handle = SessionHandle(controller);
    provide_context(handle.clone());
    handle
}
