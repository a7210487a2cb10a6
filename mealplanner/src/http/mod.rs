mod client;
mod detail;

pub use client::{ApiClient, ApiRequest};
pub use detail::extract_detail;
