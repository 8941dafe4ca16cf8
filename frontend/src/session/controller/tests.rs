use super::*;
use crate::request::tests::MockHttpClient;
use crate::session::store::tests::{MemoryStorage, sample_user};
use serde_json::json;
use shopverse_shared::auth::BrandInfo;
use shopverse_shared::{Role, UserStatus};

const BASE: &str = "http://backend.test/api/v1";

// =========================================================
// Shared test harness
// =========================================================

struct TestEnv {
    client: MockHttpClient,
    storage: MemoryStorage,
    controller: Rc<SessionController<MockHttpClient, MemoryStorage>>,
    /// Snapshots pushed through on_change
    changes: Rc<RefCell<Vec<(Option<Session>, bool)>>>,
    /// Paths pushed through on_navigate
    visited: Rc<RefCell<Vec<String>>>,
}

impl TestEnv {
    fn store(&self) -> SessionStore<MemoryStorage> {
        SessionStore::new(self.storage.clone())
    }
}

fn setup() -> TestEnv {
    let client = MockHttpClient::new();
    let storage = MemoryStorage::new();
    let store = SessionStore::new(storage.clone());
    let api = Rc::new(ShopApi::new(BASE, client.clone(), store.clone()));
    let controller = SessionController::new(api, store);

    let changes = Rc::new(RefCell::new(Vec::new()));
    let change_log = changes.clone();
    controller.set_on_change(Rc::new(move |session, loading| {
        change_log.borrow_mut().push((session, loading));
    }));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let nav_log = visited.clone();
    controller.set_on_navigate(Rc::new(move |path| {
        nav_log.borrow_mut().push(path.to_string());
    }));

    TestEnv {
        client,
        storage,
        controller,
        changes,
        visited,
    }
}

fn mock_login(client: &MockHttpClient, path: &str, role_field: &str, role_id: i64, token: &str) {
    let mut user = json!({
        "id": 3,
        "email": "owner@shop.com",
        "status": "approved",
        "token": token
    });
    user[role_field] = json!(role_id);
    client.mock_response(&format!("{}{}", BASE, path), 200, json!({ "user": user }));
}

// =========================================================
// Hydration
// =========================================================

#[tokio::test]
async fn hydrate_restores_saved_session() {
    let env = setup();
    let saved = Session {
        user: sample_user(Role::Customer),
        token: "persisted".to_string(),
    };
    env.store().save(&saved);

    assert!(env.controller.is_loading());
    env.controller.hydrate();

    assert!(!env.controller.is_loading());
    assert_eq!(env.controller.session(), Some(saved));
    // 恰好通知一次，且载入标志已清
    let changes = env.changes.borrow();
    assert_eq!(changes.len(), 1);
    assert!(!changes[0].1);
}

#[tokio::test]
async fn hydrate_with_corrupt_store_is_anonymous() {
    let env = setup();
    env.storage.raw_set(crate::session::store::KEY_TOKEN, "tok");
    env.storage.raw_set(crate::session::store::KEY_USER, "{broken");

    env.controller.hydrate();

    assert!(!env.controller.is_loading());
    assert_eq!(env.controller.session(), None);
}

// =========================================================
// Login
// =========================================================

#[tokio::test]
async fn login_writes_memory_and_store_together() {
    let env = setup();
    env.controller.hydrate();
    mock_login(&env.client, "/auth/brand_login", "role_id", 2, "t-brand");

    let session = env
        .controller
        .login("owner@shop.com", "pw", Role::BrandOwner)
        .await
        .unwrap();

    assert_eq!(session.user.role, Role::BrandOwner);
    assert_eq!(env.controller.session(), Some(session.clone()));
    assert_eq!(env.store().load(), Some(session));
    assert!(env.controller.is_authenticated());
}

#[tokio::test]
async fn login_dispatches_by_caller_supplied_role() {
    let env = setup();
    mock_login(&env.client, "/auth/customer_login", "role_id", 3, "tc");
    mock_login(&env.client, "/auth/brand_login", "role_id", 2, "tb");
    mock_login(&env.client, "/auth/super_admin_login", "user_role_id", 1, "ta");

    env.controller.login("a@b.com", "pw", Role::Customer).await.unwrap();
    env.controller.login("a@b.com", "pw", Role::BrandOwner).await.unwrap();
    let admin = env
        .controller
        .login("a@b.com", "pw", Role::SuperAdmin)
        .await
        .unwrap();

    assert_eq!(admin.user.role, Role::SuperAdmin);
    let urls: Vec<String> = env
        .client
        .requests
        .borrow()
        .iter()
        .map(|r| r.url.clone())
        .collect();
    assert!(urls.contains(&format!("{}/auth/customer_login", BASE)));
    assert!(urls.contains(&format!("{}/auth/brand_login", BASE)));
    assert!(urls.contains(&format!("{}/auth/super_admin_login", BASE)));
}

#[tokio::test]
async fn failed_login_leaves_state_untouched() {
    let env = setup();
    env.controller.hydrate();
    env.client.mock_response(
        &format!("{}/auth/customer_login", BASE),
        422,
        json!({ "error": "Invalid email or password" }),
    );

    let err = env
        .controller
        .login("a@b.com", "wrong", Role::Customer)
        .await
        .unwrap_err();

    assert_eq!(err.message, "Invalid email or password");
    assert_eq!(env.controller.session(), None);
    assert_eq!(env.store().load(), None);
}

// =========================================================
// Signup & OTP
// =========================================================

#[tokio::test]
async fn signup_records_pending_email_without_session() {
    let env = setup();
    env.controller.hydrate();
    env.client.mock_response(
        &format!("{}/auth/customer_signup", BASE),
        201,
        json!({ "message": "otp sent" }),
    );

    env.controller
        .signup(SignupForm {
            email: "new@shop.com".to_string(),
            password: "pw".to_string(),
            first_name: "New".to_string(),
            last_name: "Customer".to_string(),
            brand: None,
        })
        .await
        .unwrap();

    assert_eq!(env.controller.session(), None);
    assert_eq!(env.store().load(), None);
    assert_eq!(env.controller.pending_email(), Some("new@shop.com".to_string()));
}

#[tokio::test]
async fn brand_signup_goes_to_brand_endpoint() {
    let env = setup();
    env.client.mock_response(
        &format!("{}/auth/brand_signup", BASE),
        201,
        json!({ "message": "otp sent" }),
    );

    env.controller
        .signup(SignupForm {
            email: "maker@shop.com".to_string(),
            password: "pw".to_string(),
            first_name: "Mae".to_string(),
            last_name: "Kim".to_string(),
            brand: Some(BrandInfo {
                name: "Mae Makes".to_string(),
                description: "Leather goods".to_string(),
            }),
        })
        .await
        .unwrap();

    assert!(
        env.client
            .last_request_to(&format!("{}/auth/brand_signup", BASE))
            .is_some()
    );
    assert_eq!(env.controller.pending_email(), Some("maker@shop.com".to_string()));
}

#[tokio::test]
async fn verify_otp_establishes_session_and_consumes_pending_email() {
    let env = setup();
    env.controller.hydrate();
    env.store().set_pending_email("a@b.com");
    env.client.mock_response(
        &format!("{}/auth/verify_otp", BASE),
        200,
        json!({
            "user": { "id": 9, "email": "a@b.com", "role_id": 3 },
            "token": "t"
        }),
    );

    let session = env.controller.verify_otp("a@b.com", "123456").await.unwrap();

    assert_eq!(session.token, "t");
    assert_eq!(env.controller.session(), Some(session.clone()));
    assert_eq!(env.store().load(), Some(session));
    assert_eq!(env.controller.pending_email(), None);
}

#[tokio::test]
async fn failed_otp_leaves_pending_email_and_session_untouched() {
    let env = setup();
    env.controller.hydrate();
    env.store().set_pending_email("a@b.com");
    env.client.mock_response(
        &format!("{}/auth/verify_otp", BASE),
        422,
        json!({ "error": "Invalid OTP" }),
    );

    let err = env.controller.verify_otp("a@b.com", "000000").await.unwrap_err();

    assert_eq!(err.message, "Invalid OTP");
    assert_eq!(env.controller.session(), None);
    assert_eq!(env.controller.pending_email(), Some("a@b.com".to_string()));
}

// =========================================================
// Logout & 401 teardown
// =========================================================

#[tokio::test]
async fn logout_is_idempotent() {
    let env = setup();
    env.controller.hydrate();
    mock_login(&env.client, "/auth/customer_login", "role_id", 3, "t");
    env.controller.login("a@b.com", "pw", Role::Customer).await.unwrap();

    env.controller.logout();
    env.controller.logout();

    assert_eq!(env.controller.session(), None);
    assert_eq!(env.store().load(), None);
    // 两次调用都发出跳转，终态一致
    assert_eq!(
        *env.visited.borrow(),
        vec!["/login".to_string(), "/login".to_string()]
    );
}

#[tokio::test]
async fn any_401_tears_down_memory_and_store() {
    let env = setup();
    env.controller.hydrate();
    mock_login(&env.client, "/auth/brand_login", "role_id", 2, "t-brand");
    env.controller
        .login("owner@shop.com", "pw", Role::BrandOwner)
        .await
        .unwrap();
    assert!(env.store().load().is_some());

    // 会话过期后任意一次业务调用收到 401
    env.client.mock_response(
        &format!("{}/orders", BASE),
        401,
        json!({ "error": "Token expired" }),
    );
    let err = env.controller.api().orders().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(env.controller.session(), None);
    assert_eq!(env.store().load(), None);
    assert_eq!(env.store().token(), None);
    assert!(env.visited.borrow().contains(&"/login".to_string()));
    // on_change 把拆除后的匿名态通知到了视图层
    let last_change = env.changes.borrow().last().cloned().unwrap();
    assert_eq!(last_change.0, None);
}

#[tokio::test]
async fn approved_brand_owner_end_to_end() {
    // 登录 → 持久化匹配 → 后续 401 双双清空（完整链路）
    let env = setup();
    env.controller.hydrate();
    mock_login(&env.client, "/auth/brand_login", "role_id", 2, "t");

    let session = env
        .controller
        .login("owner@shop.com", "pw", Role::BrandOwner)
        .await
        .unwrap();
    assert_eq!(session.user.status, UserStatus::Approved);
    assert_eq!(env.store().token(), Some("t".to_string()));
    assert_eq!(env.store().load().unwrap().user.email, "owner@shop.com");

    env.client
        .mock_response(&format!("{}/carts", BASE), 401, json!({ "error": "expired" }));
    let _ = env.controller.api().cart().await;

    assert_eq!(env.controller.session(), None);
    assert_eq!(env.store().load(), None);
}

// =========================================================
// Concurrency characterization
// =========================================================

#[tokio::test]
async fn overlapping_logins_are_last_write_wins() {
    // 未加互斥是已接受的限制：两个并发登录都成功时，后写入者定终态
    let env = setup();
    env.controller.hydrate();
    mock_login(&env.client, "/auth/customer_login", "role_id", 3, "t-customer");
    mock_login(&env.client, "/auth/brand_login", "role_id", 2, "t-brand");

    let (first, second) = tokio::join!(
        env.controller.login("a@b.com", "pw", Role::Customer),
        env.controller.login("a@b.com", "pw", Role::BrandOwner),
    );
    first.unwrap();
    let winner = second.unwrap();

    assert_eq!(env.controller.session(), Some(winner.clone()));
    assert_eq!(env.store().load(), Some(winner));
}
