//! Backend search plumbing: the transport abstraction, its HTTP
//! implementation, and the one-shot batched search request handed out by
//! a resolved strategy.

mod http;
mod request;
mod transport;

pub use http::HttpTransport;
pub use request::SearchRequest;
pub use transport::{SearchBody, SearchTransport};
