//! Resource endpoints built on [`HttpClient`](crate::http_client::HttpClient)
//!
//! Each resource builds paths and delegates to the client's verbs; responses are
//! returned as parsed JSON without schema validation.

pub mod nodes;

pub use nodes::{NodeQuery, Nodes};
