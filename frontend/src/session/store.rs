//! 持久化会话存储
//!
//! 封装三个字符串键：令牌、序列化用户、注册待验证邮箱。
//! 损坏或残缺的存储一律按「无会话」处理，绝不向上抛错。

use shopverse_shared::{Session, User};

pub const KEY_TOKEN: &str = "shopverse_token";
pub const KEY_USER: &str = "shopverse_user";
pub const KEY_PENDING_EMAIL: &str = "shopverse_pending_email";

/// 键值存储后端
///
/// 生产实现是 `web::LocalStorage`，测试用内存 HashMap。
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

#[derive(Clone)]
pub struct SessionStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读出完整会话；令牌或用户缺失、用户 JSON 解析失败都返回 `None`
    pub fn load(&self) -> Option<Session> {
        let token = self.storage.get(KEY_TOKEN)?;
        let raw = self.storage.get(KEY_USER)?;
        let user: User = serde_json::from_str(&raw).ok()?;
        Some(Session { user, token })
    }

    /// 整体替换两个键（不做合并）
    pub fn save(&self, session: &Session) -> bool {
        match serde_json::to_string(&session.user) {
            Ok(raw) => {
                let token_ok = self.storage.set(KEY_TOKEN, &session.token);
                let user_ok = self.storage.set(KEY_USER, &raw);
                token_ok && user_ok
            }
            Err(_) => false,
        }
    }

    /// 只删会话两键，不碰待验证邮箱
    pub fn clear(&self) {
        self.storage.remove(KEY_TOKEN);
        self.storage.remove(KEY_USER);
    }

    /// 网关发请求时读取令牌用
    pub fn token(&self) -> Option<String> {
        self.storage.get(KEY_TOKEN)
    }

    pub fn set_pending_email(&self, email: &str) -> bool {
        self.storage.set(KEY_PENDING_EMAIL, email)
    }

    /// 读而不清；OTP 验证成功后由调用方显式清除，恰好消费一次
    pub fn pending_email(&self) -> Option<String> {
        self.storage.get(KEY_PENDING_EMAIL)
    }

    pub fn clear_pending_email(&self) {
        self.storage.remove(KEY_PENDING_EMAIL);
    }
}

// =========================================================
// 测试与共享 Mock
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use shopverse_shared::{Role, UserStatus};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// 内存键值存储；克隆后共享同一份数据
    #[derive(Clone, Default)]
    pub struct MemoryStorage {
        data: Rc<RefCell<HashMap<String, String>>>,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn raw_set(&self, key: &str, value: &str) {
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    impl KeyValueStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.data.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            true
        }

        fn remove(&self, key: &str) -> bool {
            self.data.borrow_mut().remove(key).is_some()
        }
    }

    pub fn sample_user(role: Role) -> User {
        User {
            id: 7,
            email: "a@b.com".to_string(),
            first_name: Some("Amy".to_string()),
            last_name: Some("Chen".to_string()),
            role,
            status: UserStatus::Approved,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_session() -> Session {
        Session {
            user: sample_user(Role::Customer),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = SessionStore::new(MemoryStorage::new());
        let session = sample_session();
        assert!(store.save(&session));
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn load_after_clear_is_absent() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session());
        store.clear();
        assert_eq!(store.load(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn partial_state_is_no_session() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());

        // 只有令牌
        storage.raw_set(KEY_TOKEN, "tok");
        assert_eq!(store.load(), None);

        // 只有用户
        storage.remove(KEY_TOKEN);
        storage.raw_set(KEY_USER, r#"{"id":1,"email":"a@b.com"}"#);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn corrupt_user_blob_is_no_session() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        storage.raw_set(KEY_TOKEN, "tok");
        storage.raw_set(KEY_USER, "{not json");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_keeps_pending_email() {
        let store = SessionStore::new(MemoryStorage::new());
        store.set_pending_email("new@b.com");
        store.save(&sample_session());
        store.clear();
        assert_eq!(store.pending_email(), Some("new@b.com".to_string()));
        store.clear_pending_email();
        assert_eq!(store.pending_email(), None);
    }

    #[test]
    fn save_replaces_previous_session() {
        let store = SessionStore::new(MemoryStorage::new());
        store.save(&sample_session());
        let other = Session {
            user: sample_user(Role::BrandOwner),
            token: "tok-456".to_string(),
        };
        store.save(&other);
        assert_eq!(store.load(), Some(other));
    }
}
