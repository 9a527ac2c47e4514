//! Browser adapters for the aihub-core ports.
//!
//! - `http::completion` streams chat replies with `fetch` + `ReadableStream`
//! - `http::backend` talks to the envelope-style REST endpoints
//! - `storage` persists key/value state in `localStorage` (memory fallback)

pub mod http;
pub mod storage;
