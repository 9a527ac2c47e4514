//! Streaming completion adapter.
//!
//! POSTs the conversation to `/api/v1/chat/completions` with browser `fetch()`
//! (gloo-net) and hands the raw response body back as a stream of byte chunks
//! read from its `ReadableStream`. The body is plain text fragments; decoding
//! happens in the core.

use async_trait::async_trait;
use futures::stream;
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use aihub_core::ports::{ByteStream, CompletionPort};
use aihub_types::{config::ClientConfig, message::CompletionRequest, ChatError, Result};
use super::{js_error, network_error, AUTH_HEADER};

pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

pub struct HttpCompletion {
    url: String,
}

impl HttpCompletion {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            url: config.endpoint(COMPLETIONS_PATH),
        }
    }
}

#[async_trait(?Send)]
impl CompletionPort for HttpCompletion {
    async fn stream_completion(&self, req: CompletionRequest, token: &str) -> Result<ByteStream> {
        let response = Request::post(&self.url)
            .header("Content-Type", "application/json")
            .header(AUTH_HEADER, token)
            .json(&req)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::RequestFailed { status, body });
        }

        let body = response
            .body()
            .ok_or_else(|| ChatError::Stream("response has no body".to_string()))?;
        let reader: ReadableStreamDefaultReader = body.get_reader().unchecked_into();

        log::debug!("Completion stream opened ({} messages)", req.messages.len());
        Ok(reader_stream(reader))
    }
}

/// Pull chunks from the reader until it reports `done`. A read error ends
/// the stream after being yielded once.
fn reader_stream(reader: ReadableStreamDefaultReader) -> ByteStream {
    Box::pin(stream::unfold(Some(reader), |reader| async move {
        let reader = reader?;
        match read_chunk(&reader).await {
            Ok(Some(bytes)) => Some((Ok(bytes), Some(reader))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    }))
}

async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| ChatError::Stream(format!("read failed: {:?}", e)))?;

    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(js_error)?
        .as_bool()
        .unwrap_or(false);
    if done {
        return Ok(None);
    }

    let value = Reflect::get(&result, &JsValue::from_str("value")).map_err(js_error)?;
    let chunk: Uint8Array = value
        .dyn_into()
        .map_err(|_| ChatError::Stream("chunk is not a Uint8Array".to_string()))?;
    Ok(Some(chunk.to_vec()))
}
