//! 认证载荷与角色归一化
//!
//! 三个登录端点返回的角色字段名不同：品牌方/顾客登录是 `role_id`，
//! 超管登录是 `user_role_id`。`RoleSource` 指明从哪个字段归一化，
//! 归一化规则本身在 [`Role::from_id`]。

use crate::{Role, Session, User, UserStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// 请求体 (Request Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 登录请求体 `{ user: { email, password } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user: Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSignupRequest {
    pub user: SignupUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSignupRequest {
    pub user: SignupUser,
    pub brand: BrandInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// 注册表单
///
/// 品牌信息用 `Option<BrandInfo>` 表达：`Some` 即品牌方注册，
/// 品牌字段缺失的品牌方注册在类型上不可表示。
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub brand: Option<BrandInfo>,
}

// =========================================================
// 响应体 (Response Bodies)
// =========================================================

/// 角色字段来源：该端点用哪个字段携带数字角色 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    RoleId,
    UserRoleId,
}

/// 后端返回的原始用户对象
///
/// 登录端点把 token 放在 user 内；OTP 校验把 token 放在顶层，
/// 此时 `token` 字段缺失。
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub user_role_id: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserPayload {
    pub fn role(&self, source: RoleSource) -> Role {
        match source {
            RoleSource::RoleId => Role::from_id(self.role_id),
            RoleSource::UserRoleId => Role::from_id(self.user_role_id),
        }
    }

    /// 归一化为客户端 [`User`]
    pub fn into_user(self, source: RoleSource) -> User {
        let role = self.role(source);
        User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// token 在 user 对象内的登录端点用这个转换；token 缺失返回 `None`
    pub fn into_session(mut self, source: RoleSource) -> Option<Session> {
        let token = self.token.take()?;
        Some(Session {
            user: self.into_user(source),
            token,
        })
    }
}

/// 登录响应 `{ user: { ..., token } }`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: UserPayload,
}

/// OTP 校验响应 `{ user, token }`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    pub user: UserPayload,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> UserPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn role_from_role_id_field() {
        let p = payload(r#"{"id":1,"email":"a@b.com","role_id":2,"token":"t"}"#);
        assert_eq!(p.role(RoleSource::RoleId), Role::BrandOwner);
        // 同一载荷若按 user_role_id 归一化则落到默认角色
        assert_eq!(p.role(RoleSource::UserRoleId), Role::Customer);
    }

    #[test]
    fn role_from_user_role_id_field() {
        let p = payload(r#"{"id":1,"email":"a@b.com","user_role_id":1,"token":"t"}"#);
        assert_eq!(p.role(RoleSource::UserRoleId), Role::SuperAdmin);
    }

    #[test]
    fn missing_role_fields_default_to_customer() {
        let p = payload(r#"{"id":1,"email":"a@b.com","token":"t"}"#);
        assert_eq!(p.role(RoleSource::RoleId), Role::Customer);
        assert_eq!(p.role(RoleSource::UserRoleId), Role::Customer);
    }

    #[test]
    fn into_session_requires_token() {
        let with_token = payload(r#"{"id":1,"email":"a@b.com","role_id":2,"token":"t"}"#);
        let session = with_token.into_session(RoleSource::RoleId).unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.user.role, Role::BrandOwner);

        let without_token = payload(r#"{"id":1,"email":"a@b.com","role_id":2}"#);
        assert!(without_token.into_session(RoleSource::RoleId).is_none());
    }

    #[test]
    fn login_response_shape() {
        let body = r#"{"user":{"id":9,"email":"shop@example.com","role_id":2,"status":"pending","token":"jwt"}}"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        let session = resp.user.into_session(RoleSource::RoleId).unwrap();
        assert_eq!(session.user.status, UserStatus::Pending);
        assert_eq!(session.token, "jwt");
    }

    #[test]
    fn verify_otp_response_shape() {
        let body = r#"{"user":{"id":9,"email":"shop@example.com","role_id":3},"token":"fresh"}"#;
        let resp: VerifyOtpResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.token, "fresh");
        assert_eq!(resp.user.role(RoleSource::RoleId), Role::Customer);
    }
}
