mod client;

pub use client::{ApiError, ApiTransport};
