//! Fulfillment loop between the conversation store and the completion
//! endpoint: consumes the store's intents, performs the round-trips, and
//! feeds results back in against the node ids captured at request time.

pub mod service;

pub use service::ChatService;
