//! HTTP 传输抽象层
//!
//! 网关只依赖 [`HttpClient`] trait，不关心具体实现：
//! 生产环境是 `web::FetchHttpClient`（浏览器 fetch），
//! 测试环境是 [`tests::MockHttpClient`]（预置响应 + 请求日志）。

use serde::Serialize;
use serde::de::DeserializeOwned;
use shopverse_shared::error::{ShopError, ShopResult};
use std::collections::HashMap;

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 序列化 JSON 请求体并设置 Content-Type
    pub fn with_json<T: Serialize>(mut self, value: &T) -> ShopResult<Self> {
        let body =
            serde_json::to_string(value).map_err(|e| ShopError::serialization(e.to_string()))?;
        self.body = Some(body);
        Ok(self.with_header("Content-Type", "application/json"))
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ShopResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ShopError::serialization(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下
/// 相关类型不是 Send 的。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ShopResult<HttpResponse>;
}

// =========================================================
// 测试用 Mock 客户端
// =========================================================
