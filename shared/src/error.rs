//! 客户端错误类型
//!
//! 错误分四类：网络/传输失败、认证失败 (401)、其余非 2xx 业务失败、
//! JSON 解析失败。认证失败由网关全局处理，其余都传播给调用方。

use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopErrorStatus {
    /// 请求未得到响应（连接失败、请求构建失败）
    Network,
    /// 401：会话已被网关拆除
    Unauthorized,
    /// 其余非 2xx，携带后端错误载荷
    Api,
    /// 响应体解析失败
    Serialization,
}

impl ShopErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopErrorStatus::Network => "NETWORK_ERROR",
            ShopErrorStatus::Unauthorized => "UNAUTHORIZED",
            ShopErrorStatus::Api => "API_ERROR",
            ShopErrorStatus::Serialization => "JSON_PARSE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ShopError {
    pub status: ShopErrorStatus,
    pub message: String,
    /// 业务失败时的 HTTP 状态码
    pub http_status: Option<u16>,
}

impl ShopError {
    pub fn new(status: ShopErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ShopErrorStatus::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: ShopErrorStatus::Unauthorized,
            message: message.into(),
            http_status: Some(401),
        }
    }

    pub fn api(http_status: u16, message: impl Into<String>) -> Self {
        Self {
            status: ShopErrorStatus::Api,
            message: message.into(),
            http_status: Some(http_status),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ShopErrorStatus::Serialization, message)
    }

    // --- Accessors ---

    pub fn is_unauthorized(&self) -> bool {
        self.status == ShopErrorStatus::Unauthorized
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.error_code(), self.message)
    }
}

impl std::error::Error for ShopError {}

pub type ShopResult<T> = std::result::Result<T, ShopError>;

// =========================================================
// 后端错误载荷
// =========================================================

/// 后端错误响应体，宽松解析
///
/// 实际后端在不同端点混用 `{"error": ...}`、`{"errors": [...]}` 和
/// `{"message": ...}` 三种形状。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        if let Some(error) = self.error {
            return Some(error);
        }
        if let Some(errors) = self.errors {
            if !errors.is_empty() {
                return Some(errors.join(", "));
            }
        }
        self.message
    }
}

/// 从响应体提取错误消息；解析不出来就用 fallback
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| fallback.to_string())
}
