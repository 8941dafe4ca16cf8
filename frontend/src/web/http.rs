//! 浏览器 fetch 传输实现
//!
//! 直接封装 `web_sys::fetch`，实现 `request::HttpClient`。
//! 不配置超时与重试：沿用 fetch 的默认行为，过期令牌走 401 路径。

use crate::request::{HttpClient, HttpRequest, HttpResponse};
use shopverse_shared::error::{ShopError, ShopResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

#[derive(Clone, Copy)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ShopResult<HttpResponse> {
        let headers = Headers::new()
            .map_err(|e| ShopError::network(format!("failed to create headers: {:?}", e)))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ShopError::network(format!("failed to set header: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ShopError::network(format!("failed to build request: {:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| ShopError::network("window object unavailable"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ShopError::network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ShopError::network(format!("unexpected fetch result: {:?}", e)))?;

        let status = response.status();
        let text_promise = response
            .text()
            .map_err(|e| ShopError::network(format!("failed to read body: {:?}", e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| ShopError::network(format!("failed to read body: {:?}", e)))?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}
