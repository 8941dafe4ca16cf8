//! 会话生命周期控制器
//!
//! 进程内唯一的认证状态持有者：内存态 `Option<Session>` 加载载标志。
//! 生命周期 `uninitialized → hydrating → {anonymous, authenticated}`，
//! 其中 `authenticated → anonymous` 由 logout 或 401 拆除触发。
//!
//! 与视图层解耦：状态变化通过 `on_change` 回调通知，跳转意图通过
//! `on_navigate` 回调发出，测试里都可以替换成记录器。
//!
//! 并发的 login/signup/verify_otp 不做互斥，后完成者覆盖先完成者
//! （last write wins）。

use crate::api::ShopApi;
use crate::log_info;
use crate::request::HttpClient;
use crate::session::store::{KeyValueStorage, SessionStore};
use shopverse_shared::auth::{SignupForm, SignupUser};
use shopverse_shared::error::ShopResult;
use shopverse_shared::{Role, Session};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// 状态变化通知：当前会话快照 + 载入标志
pub type ChangeHook = Rc<dyn Fn(Option<Session>, bool)>;
/// 跳转意图通知：目标路径
pub type NavigateHook = Rc<dyn Fn(&str)>;

const LOGIN_PATH: &str = "/login";

pub struct SessionController<C: HttpClient, S: KeyValueStorage> {
    api: Rc<ShopApi<C, S>>,
    store: SessionStore<S>,
    session: RefCell<Option<Session>>,
    loading: Cell<bool>,
    on_change: RefCell<Option<ChangeHook>>,
    on_navigate: RefCell<Option<NavigateHook>>,
}

impl<C: HttpClient + 'static, S: KeyValueStorage + Clone + 'static> SessionController<C, S> {
    /// 构造并把网关的 401 拦截器接回控制器。
    ///
    /// 网关持有的回调用 `Weak` 引用控制器，避免两者互持造成泄漏。
    pub fn new(api: Rc<ShopApi<C, S>>, store: SessionStore<S>) -> Rc<Self> {
        let controller = Rc::new(Self {
            api: api.clone(),
            store,
            session: RefCell::new(None),
            loading: Cell::new(true),
            on_change: RefCell::new(None),
            on_navigate: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&controller);
        api.set_on_unauthorized(Rc::new(move || {
            if let Some(ctrl) = weak.upgrade() {
                ctrl.teardown();
            }
        }));

        controller
    }

    pub fn set_on_change(&self, hook: ChangeHook) {
        *self.on_change.borrow_mut() = Some(hook);
    }

    pub fn set_on_navigate(&self, hook: NavigateHook) {
        *self.on_navigate.borrow_mut() = Some(hook);
    }

    /// 网关句柄，供视图层发起商品/购物车/订单等调用
    pub fn api(&self) -> Rc<ShopApi<C, S>> {
        self.api.clone()
    }

    // --- 状态读取 ---

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn pending_email(&self) -> Option<String> {
        self.store.pending_email()
    }

    // --- 生命周期操作 ---

    /// 启动时执行一次：从持久化存储恢复会话，并恰好清一次载入标志
    pub fn hydrate(&self) {
        if let Some(session) = self.store.load() {
            log_info!("[Session] restored session for {}", session.user.email);
            *self.session.borrow_mut() = Some(session);
        }
        self.loading.set(false);
        self.notify();
    }

    /// 按调用方给定的角色分发到对应登录端点。
    /// 成功时内存态与持久化存储一起写入；失败时两者都不动。
    pub async fn login(&self, email: &str, password: &str, role: Role) -> ShopResult<Session> {
        let session = match role {
            Role::Customer => self.api.customer_login(email, password).await?,
            Role::BrandOwner => self.api.brand_login(email, password).await?,
            Role::SuperAdmin => self.api.super_admin_login(email, password).await?,
        };
        self.establish(session.clone());
        Ok(session)
    }

    /// 注册不建立会话，只记下待验证邮箱等 OTP 流程接力
    pub async fn signup(&self, form: SignupForm) -> ShopResult<()> {
        let SignupForm {
            email,
            password,
            first_name,
            last_name,
            brand,
        } = form;
        let user = SignupUser {
            email: email.clone(),
            password,
            first_name,
            last_name,
        };
        match brand {
            Some(brand) => {
                self.api.brand_signup(user, brand).await?;
            }
            None => {
                self.api.customer_signup(user).await?;
            }
        }
        self.store.set_pending_email(&email);
        Ok(())
    }

    /// OTP 换会话：成功后清掉待验证邮箱，建立会话的方式与 login 相同
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ShopResult<Session> {
        let session = self.api.verify_otp(email, otp).await?;
        self.store.clear_pending_email();
        self.establish(session.clone());
        Ok(session)
    }

    /// 无条件清空内存态与持久化存储并发出跳转；幂等
    pub fn logout(&self) {
        log_info!("[Session] logout");
        self.store.clear();
        self.session.borrow_mut().take();
        self.notify();
        self.navigate(LOGIN_PATH);
    }

    // --- 内部 ---

    /// 401 拆除路径：持久化存储已被网关清空，这里只同步内存态
    fn teardown(&self) {
        self.session.borrow_mut().take();
        self.notify();
        self.navigate(LOGIN_PATH);
    }

    fn establish(&self, session: Session) {
        self.store.save(&session);
        *self.session.borrow_mut() = Some(session);
        self.notify();
    }

    fn notify(&self) {
        let hook = self.on_change.borrow().clone();
        if let Some(hook) = hook {
            let snapshot = self.session.borrow().clone();
            hook(snapshot, self.loading.get());
        }
    }

    fn navigate(&self, path: &str) {
        let hook = self.on_navigate.borrow().clone();
        if let Some(hook) = hook {
            hook(path);
        }
    }
}

#[cfg(test)]
mod tests;
