//! Chat core: reducer, conversation store, streaming session, session
//! context and backend services. No platform dependencies; browser adapters
//! plug in through the traits in `ports`.

pub mod ports;
pub mod event_bus;
pub mod reducer;
pub mod store;
pub mod decoder;
pub mod chat;
pub mod context;
pub mod catalog;
