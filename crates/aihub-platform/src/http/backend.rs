//! Envelope-style REST client.
//!
//! Every endpoint answers `{code, info, data}`; `"0000"` means success.
//! Calls are bounded by `ClientConfig::request_timeout_ms`. HTTP 401 maps to
//! `ChatError::Unauthorized` so the app can drop the session.

use async_trait::async_trait;
use gloo_net::http::{Method, Request, RequestBuilder, Response};
use js_sys::{Array, Uint8Array};
use serde::de::DeserializeOwned;
use serde_json::Value;
use web_sys::{Blob, BlobPropertyBag, FormData};

use aihub_core::ports::{AvatarUpload, BackendPort};
use aihub_types::{
    ChatError, Result,
    api::{Envelope, Order, Product, RoleItem, UserProfile},
    config::ClientConfig,
};
use super::{encode_query, js_error, network_error, with_timeout, AUTH_HEADER};

pub struct HttpBackend {
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn builder(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = RequestBuilder::new(&self.config.endpoint(path)).method(method);
        match token {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    /// Send and unwrap the envelope, all under the request timeout.
    async fn call<T: DeserializeOwned>(&self, request: Request) -> Result<Envelope<T>> {
        let url = request.url();
        let envelope = with_timeout(self.config.request_timeout_ms, async move {
            let response = request.send().await.map_err(network_error)?;
            read_envelope(response).await
        })
        .await;

        if let Err(e) = &envelope {
            log::warn!("{} failed: {}", url, e);
        }
        envelope
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str, token: Option<&str>) -> Result<T> {
        let request = self.builder(method, path, token).build().map_err(network_error)?;
        self.call::<T>(request).await?.into_data()
    }

    /// For endpoints whose `data` is irrelevant
    async fn post_checked(&self, path: &str, token: &str) -> Result<()> {
        let request = self
            .builder(Method::POST, path, Some(token))
            .build()
            .map_err(network_error)?;
        self.call::<Value>(request).await?.check()
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    let status = response.status();
    if status == 401 {
        return Err(ChatError::Unauthorized);
    }
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        // Error bodies are often envelopes too; prefer their `info`
        if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(&body) {
            if !envelope.info.is_empty() {
                return Err(ChatError::Envelope { code: envelope.code, info: envelope.info });
            }
        }
        return Err(ChatError::RequestFailed { status, body });
    }
    response
        .json::<Envelope<T>>()
        .await
        .map_err(|e| ChatError::Serialization(e.to_string()))
}

fn avatar_form(upload: &AvatarUpload) -> Result<FormData> {
    let parts = Array::of1(&Uint8Array::from(upload.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(&upload.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &blob, &upload.file_name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl BackendPort for HttpBackend {
    async fn login(&self, code: &str) -> Result<String> {
        let path = format!("/api/v1/auth/login?code={}", encode_query(code));
        self.fetch(Method::POST, &path, None).await
    }

    async fn fetch_roles(&self, token: Option<&str>) -> Result<Vec<RoleItem>> {
        self.fetch(Method::GET, "/api/v1/role/list", token).await
    }

    async fn like_role(&self, token: &str, prompt_id: i64) -> Result<()> {
        self.post_checked(&format!("/api/v1/role/like?prompt_id={}", prompt_id), token)
            .await
    }

    async fn report_visit(&self, token: &str, prompt_id: i64) -> Result<()> {
        self.post_checked(&format!("/api/v1/role/prompt/count?prompt_id={}", prompt_id), token)
            .await
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        self.fetch(Method::GET, "/api/v1/user/profile", Some(token)).await
    }

    async fn fetch_products(&self, token: &str) -> Result<Vec<Product>> {
        self.fetch(Method::GET, "/api/v1/sale/product_list", Some(token)).await
    }

    async fn create_order(&self, token: &str, product_id: i64) -> Result<String> {
        let path = format!("/api/v1/sale/create_order?productId={}", product_id);
        self.fetch(Method::POST, &path, Some(token)).await
    }

    async fn fetch_orders(&self, token: &str) -> Result<Vec<Order>> {
        self.fetch(Method::GET, "/api/v1/user/order/list", Some(token)).await
    }

    async fn upload_avatar(&self, token: &str, upload: AvatarUpload) -> Result<String> {
        let form = avatar_form(&upload)?;
        let request = self
            .builder(Method::POST, "/api/v1/user/avatar/upload", Some(token))
            .body(form)
            .map_err(network_error)?;
        log::info!("Uploading avatar {} ({} bytes)", upload.file_name, upload.bytes.len());
        self.call::<String>(request).await?.into_data()
    }
}
