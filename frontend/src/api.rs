//! API 网关客户端
//!
//! 把类型化的方法调用翻译为对后端 `/api/v1` 的 HTTP 请求。
//! 两条横切策略集中在 [`ShopApi::send`]：
//!
//! - 发出前：持久化存储里有令牌就附加 `Authorization: Bearer`；
//! - 收到 401：无条件清空持久化会话并触发 `on_unauthorized` 回调，
//!   先于调用方看到错误。任何调用点都不必自查。

use crate::log_error;
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::session::{KeyValueStorage, SessionStore};
use serde::de::DeserializeOwned;
use serde_json::json;
use shopverse_shared::auth::{
    BrandInfo, BrandSignupRequest, Credentials, CustomerSignupRequest, LoginRequest,
    LoginResponse, RoleSource, SignupUser, VerifyOtpRequest, VerifyOtpResponse,
};
use shopverse_shared::error::{ShopError, ShopResult, error_message};
use shopverse_shared::{
    Brand, Cart, Category, DeliveryDetails, Envelope, Order, Product, ProductForm, ProductPatch,
    ProductQuery, Session, User, UserStatus,
};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ShopApi<C: HttpClient, S: KeyValueStorage> {
    base_url: String,
    client: C,
    store: SessionStore<S>,
    on_unauthorized: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<C: HttpClient, S: KeyValueStorage> ShopApi<C, S> {
    pub fn new(base_url: &str, client: C, store: SessionStore<S>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            store,
            on_unauthorized: RefCell::new(None),
        }
    }

    /// 注册 401 拆除回调（控制器用它同步内存态并触发跳转）
    pub fn set_on_unauthorized(&self, hook: Rc<dyn Fn()>) {
        *self.on_unauthorized.borrow_mut() = Some(hook);
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 统一发送路径：令牌附加与 401 拆除都在这里
    async fn send(&self, mut req: HttpRequest) -> ShopResult<HttpResponse> {
        if let Some(token) = self.store.token() {
            req = req.with_header("Authorization", &format!("Bearer {}", token));
        }

        let resp = self.client.send(req).await?;

        if resp.status == 401 {
            log_error!("[ShopApi] 401 received, tearing down session");
            self.store.clear();
            let hook = self.on_unauthorized.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
            return Err(ShopError::unauthorized(error_message(
                &resp.body,
                "Session expired",
            )));
        }

        Ok(resp)
    }

    async fn request_json<T: DeserializeOwned>(&self, req: HttpRequest) -> ShopResult<T> {
        let resp = self.send(req).await?;
        if !resp.is_success() {
            return Err(ShopError::api(
                resp.status,
                error_message(&resp.body, "Request failed"),
            ));
        }
        resp.json()
    }

    /// 响应体形状未类型化的端点（注册、清空购物车等）
    async fn request_opaque(&self, req: HttpRequest) -> ShopResult<serde_json::Value> {
        let resp = self.send(req).await?;
        if !resp.is_success() {
            return Err(ShopError::api(
                resp.status,
                error_message(&resp.body, "Request failed"),
            ));
        }
        if resp.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        resp.json()
    }

    // =========================================================
    // 认证 (Auth)
    // =========================================================

    pub async fn customer_signup(&self, user: SignupUser) -> ShopResult<serde_json::Value> {
        let req = HttpRequest::new(&self.url("/auth/customer_signup"), HttpMethod::Post)
            .with_json(&CustomerSignupRequest { user })?;
        self.request_opaque(req).await
    }

    pub async fn brand_signup(
        &self,
        user: SignupUser,
        brand: BrandInfo,
    ) -> ShopResult<serde_json::Value> {
        let req = HttpRequest::new(&self.url("/auth/brand_signup"), HttpMethod::Post)
            .with_json(&BrandSignupRequest { user, brand })?;
        self.request_opaque(req).await
    }

    /// 三个登录端点共用的路径：请求体相同，差别只在角色字段来源
    async fn login_with(
        &self,
        path: &str,
        email: &str,
        password: &str,
        source: RoleSource,
    ) -> ShopResult<Session> {
        let req = HttpRequest::new(&self.url(path), HttpMethod::Post).with_json(&LoginRequest {
            user: Credentials {
                email: email.to_string(),
                password: password.to_string(),
            },
        })?;
        let resp: LoginResponse = self.request_json(req).await?;
        resp.user
            .into_session(source)
            .ok_or_else(|| ShopError::serialization("login response did not include a token"))
    }

    pub async fn customer_login(&self, email: &str, password: &str) -> ShopResult<Session> {
        self.login_with("/auth/customer_login", email, password, RoleSource::RoleId)
            .await
    }

    pub async fn brand_login(&self, email: &str, password: &str) -> ShopResult<Session> {
        self.login_with("/auth/brand_login", email, password, RoleSource::RoleId)
            .await
    }

    pub async fn super_admin_login(&self, email: &str, password: &str) -> ShopResult<Session> {
        self.login_with(
            "/auth/super_admin_login",
            email,
            password,
            RoleSource::UserRoleId,
        )
        .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> ShopResult<Session> {
        let req = HttpRequest::new(&self.url("/auth/verify_otp"), HttpMethod::Post).with_json(
            &VerifyOtpRequest {
                email: email.to_string(),
                otp: otp.to_string(),
            },
        )?;
        let resp: VerifyOtpResponse = self.request_json(req).await?;
        Ok(Session {
            user: resp.user.into_user(RoleSource::RoleId),
            token: resp.token,
        })
    }

    // =========================================================
    // 商品目录 (Catalog)
    // =========================================================

    pub async fn products(&self, query: &ProductQuery) -> ShopResult<Envelope<Vec<Product>>> {
        let url = format!("{}{}", self.url("/products"), query.query_string());
        self.request_json(HttpRequest::new(&url, HttpMethod::Get)).await
    }

    pub async fn product(&self, id: i64) -> ShopResult<Envelope<Product>> {
        let url = self.url(&format!("/products/{}", id));
        self.request_json(HttpRequest::new(&url, HttpMethod::Get)).await
    }

    pub async fn categories(&self) -> ShopResult<Envelope<Vec<Category>>> {
        self.request_json(HttpRequest::new(&self.url("/categories"), HttpMethod::Get))
            .await
    }

    pub async fn brands(&self) -> ShopResult<Envelope<Vec<Brand>>> {
        self.request_json(HttpRequest::new(&self.url("/brands"), HttpMethod::Get))
            .await
    }

    // =========================================================
    // 购物车 (Cart)
    // =========================================================

    pub async fn cart(&self) -> ShopResult<Envelope<Cart>> {
        self.request_json(HttpRequest::new(&self.url("/carts"), HttpMethod::Get))
            .await
    }

    pub async fn add_to_cart(&self, product_id: i64, quantity: i64) -> ShopResult<Envelope<Cart>> {
        let req = HttpRequest::new(&self.url("/carts/add_item"), HttpMethod::Post)
            .with_json(&json!({ "product_id": product_id, "quantity": quantity }))?;
        self.request_json(req).await
    }

    pub async fn update_cart_item(
        &self,
        item_id: i64,
        quantity: i64,
    ) -> ShopResult<Envelope<Cart>> {
        let req = HttpRequest::new(&self.url("/carts/update_item"), HttpMethod::Patch)
            .with_json(&json!({ "id": item_id, "quantity": quantity }))?;
        self.request_json(req).await
    }

    pub async fn remove_from_cart(&self, item_id: i64) -> ShopResult<Envelope<Cart>> {
        let url = self.url(&format!("/carts/remove_item?id={}", item_id));
        self.request_json(HttpRequest::new(&url, HttpMethod::Delete)).await
    }

    pub async fn clear_cart(&self) -> ShopResult<serde_json::Value> {
        self.request_opaque(HttpRequest::new(&self.url("/carts/clear"), HttpMethod::Delete))
            .await
    }

    // =========================================================
    // 订单 (Orders)
    // =========================================================

    pub async fn orders(&self) -> ShopResult<Envelope<Vec<Order>>> {
        self.request_json(HttpRequest::new(&self.url("/orders"), HttpMethod::Get))
            .await
    }

    pub async fn create_order(&self, delivery: DeliveryDetails) -> ShopResult<Envelope<Order>> {
        let req = HttpRequest::new(&self.url("/orders"), HttpMethod::Post)
            .with_json(&json!({ "order": delivery }))?;
        self.request_json(req).await
    }

    // =========================================================
    // 品牌方商品管理 (Brand Owner)
    // =========================================================

    pub async fn brand_products(&self) -> ShopResult<Envelope<Vec<Product>>> {
        self.request_json(HttpRequest::new(
            &self.url("/products/brand_products"),
            HttpMethod::Get,
        ))
        .await
    }

    pub async fn create_product(&self, product: ProductForm) -> ShopResult<Envelope<Product>> {
        let req = HttpRequest::new(&self.url("/products"), HttpMethod::Post)
            .with_json(&json!({ "product": product }))?;
        self.request_json(req).await
    }

    pub async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
    ) -> ShopResult<Envelope<Product>> {
        let url = self.url(&format!("/products/{}", id));
        let req =
            HttpRequest::new(&url, HttpMethod::Patch).with_json(&json!({ "product": patch }))?;
        self.request_json(req).await
    }

    pub async fn delete_product(&self, id: i64) -> ShopResult<serde_json::Value> {
        let url = self.url(&format!("/products/{}", id));
        self.request_opaque(HttpRequest::new(&url, HttpMethod::Delete)).await
    }

    pub async fn update_stock(&self, id: i64, stock: i64) -> ShopResult<Envelope<Product>> {
        let url = self.url(&format!("/products/{}/update_stock", id));
        let req = HttpRequest::new(&url, HttpMethod::Patch)
            .with_json(&json!({ "product": { "stock": stock } }))?;
        self.request_json(req).await
    }

    pub async fn update_product_status(
        &self,
        id: i64,
        status: &str,
    ) -> ShopResult<Envelope<Product>> {
        let url = self.url(&format!("/products/{}/update_status", id));
        let req = HttpRequest::new(&url, HttpMethod::Patch)
            .with_json(&json!({ "product": { "status": status } }))?;
        self.request_json(req).await
    }

    // =========================================================
    // 超管 (Super Admin)
    // =========================================================

    pub async fn users(&self) -> ShopResult<Envelope<Vec<User>>> {
        self.request_json(HttpRequest::new(
            &self.url("/super_admin/users"),
            HttpMethod::Get,
        ))
        .await
    }

    pub async fn update_user_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> ShopResult<Envelope<User>> {
        let url = self.url(&format!("/super_admin/users/{}/update_status", id));
        let req =
            HttpRequest::new(&url, HttpMethod::Patch).with_json(&json!({ "status": status }))?;
        self.request_json(req).await
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::tests::MockHttpClient;
    use crate::session::store::tests::{MemoryStorage, sample_user};
    use shopverse_shared::Role;
    use std::cell::Cell;

    const BASE: &str = "http://backend.test/api/v1";

    fn setup() -> (MockHttpClient, MemoryStorage, ShopApi<MockHttpClient, MemoryStorage>) {
        let client = MockHttpClient::new();
        let storage = MemoryStorage::new();
        let api = ShopApi::new(BASE, client.clone(), SessionStore::new(storage.clone()));
        (client, storage, api)
    }

    fn save_session(storage: &MemoryStorage, token: &str) {
        let store = SessionStore::new(storage.clone());
        store.save(&Session {
            user: sample_user(Role::Customer),
            token: token.to_string(),
        });
    }

    #[tokio::test]
    async fn attaches_bearer_token_when_present() {
        let (client, storage, api) = setup();
        save_session(&storage, "tok-abc");
        client.mock_response(
            &format!("{}/categories", BASE),
            200,
            serde_json::json!({ "data": [] }),
        );

        api.categories().await.unwrap();

        let req = client.last_request_to(&format!("{}/categories", BASE)).unwrap();
        assert_eq!(
            req.headers.get("Authorization"),
            Some(&"Bearer tok-abc".to_string())
        );
    }

    #[tokio::test]
    async fn sends_unauthenticated_without_token() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/categories", BASE),
            200,
            serde_json::json!({ "data": [] }),
        );

        api.categories().await.unwrap();

        let req = client.last_request_to(&format!("{}/categories", BASE)).unwrap();
        assert!(!req.headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn brand_login_normalizes_role_id() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/auth/brand_login", BASE),
            200,
            serde_json::json!({
                "user": { "id": 3, "email": "b@s.com", "role_id": 2, "status": "pending", "token": "t1" }
            }),
        );

        let session = api.brand_login("b@s.com", "pw").await.unwrap();
        assert_eq!(session.user.role, Role::BrandOwner);
        assert_eq!(session.token, "t1");
    }

    #[tokio::test]
    async fn super_admin_login_normalizes_user_role_id() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/auth/super_admin_login", BASE),
            200,
            serde_json::json!({
                "user": { "id": 1, "email": "root@s.com", "user_role_id": 1, "token": "t2" }
            }),
        );

        let session = api.super_admin_login("root@s.com", "pw").await.unwrap();
        assert_eq!(session.user.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn customer_login_defaults_unknown_role_ids() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/auth/customer_login", BASE),
            200,
            serde_json::json!({
                "user": { "id": 5, "email": "c@s.com", "role_id": 9, "token": "t3" }
            }),
        );

        let session = api.customer_login("c@s.com", "pw").await.unwrap();
        assert_eq!(session.user.role, Role::Customer);
    }

    #[tokio::test]
    async fn verify_otp_reads_top_level_token() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/auth/verify_otp", BASE),
            200,
            serde_json::json!({
                "user": { "id": 5, "email": "c@s.com", "role_id": 3 },
                "token": "fresh-token"
            }),
        );

        let session = api.verify_otp("c@s.com", "123456").await.unwrap();
        assert_eq!(session.token, "fresh-token");
        assert_eq!(session.user.role, Role::Customer);
    }

    #[tokio::test]
    async fn non_2xx_surfaces_backend_error_payload() {
        let (client, _storage, api) = setup();
        client.mock_response(
            &format!("{}/auth/verify_otp", BASE),
            422,
            serde_json::json!({ "error": "Invalid OTP" }),
        );

        let err = api.verify_otp("c@s.com", "000000").await.unwrap_err();
        assert_eq!(err.http_status, Some(422));
        assert_eq!(err.message, "Invalid OTP");
    }

    #[tokio::test]
    async fn any_401_clears_store_and_fires_hook() {
        let (client, storage, api) = setup();
        save_session(&storage, "expired");
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        api.set_on_unauthorized(Rc::new(move || flag.set(true)));

        client.mock_response(
            &format!("{}/orders", BASE),
            401,
            serde_json::json!({ "error": "Token expired" }),
        );

        let err = api.orders().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Token expired");
        assert!(fired.get());

        let store = SessionStore::new(storage);
        assert_eq!(store.load(), None);
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn brand_signup_posts_nested_user_and_brand() {
        let (client, _storage, api) = setup();
        let url = format!("{}/auth/brand_signup", BASE);
        client.mock_response(&url, 201, serde_json::json!({ "message": "otp sent" }));

        api.brand_signup(
            SignupUser {
                email: "b@s.com".to_string(),
                password: "pw".to_string(),
                first_name: "Bo".to_string(),
                last_name: "Lee".to_string(),
            },
            BrandInfo {
                name: "Bo Ceramics".to_string(),
                description: "Handmade mugs".to_string(),
            },
        )
        .await
        .unwrap();

        let req = client.last_request_to(&url).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["user"]["email"], "b@s.com");
        assert_eq!(body["brand"]["name"], "Bo Ceramics");
        assert_eq!(
            req.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn product_query_lands_in_url() {
        let (client, _storage, api) = setup();
        let url = format!("{}/products?page=1&search=mug", BASE);
        client.mock_response(&url, 200, serde_json::json!({ "data": [] }));

        let query = ProductQuery {
            page: Some(1),
            search: Some("mug".to_string()),
            ..Default::default()
        };
        let list = api.products(&query).await.unwrap();
        assert!(list.data.is_empty());
    }
}
