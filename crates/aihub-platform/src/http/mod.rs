pub mod backend;
pub mod completion;

pub use backend::HttpBackend;
pub use completion::HttpCompletion;

use std::future::Future;

use futures::future::{self, Either};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;

use aihub_types::{ChatError, Result};

/// Header carrying the raw session token (no scheme prefix)
pub(crate) const AUTH_HEADER: &str = "Authorization";

/// Resolve `fut`, or fail with `Timeout` after `ms` milliseconds.
pub async fn with_timeout<T, F>(ms: u32, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let timer = TimeoutFuture::new(ms);
    futures::pin_mut!(fut, timer);
    match future::select(fut, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ChatError::Timeout(u64::from(ms))),
    }
}

pub(crate) fn network_error(e: gloo_net::Error) -> ChatError {
    ChatError::Network(e.to_string())
}

pub(crate) fn js_error(value: JsValue) -> ChatError {
    ChatError::JsInterop(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

pub(crate) fn encode_query(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}
