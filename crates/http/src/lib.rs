//! HTTP transport facade for Bookshelf: a JSON client over one REST resource.

pub mod client;
pub mod error;

pub use client::ResourceClient;
pub use error::TransportError;
pub use reqwest::StatusCode;
