//! Wire client for the membridge memory backend.
//!
//! This crate owns everything that touches the documented wire API:
//! payload assembly for the three backend operations
//! (`/product/search`, `/product/add`, `/product/feedback`), the
//! uniform [`ApiResult`] envelope, the [`MemoryService`] trait the
//! hook layer consumes, and the [`HttpService`] implementation over
//! `reqwest` with bounded timeouts and linear-backoff retries.

pub use reqwest::{self, Client};
pub use {
    http::{HttpService, TransportError},
    payload::{
        AddPayload, FeedbackPayload, MessageRecord, SOURCE, SearchPayload, VERSION, add_payload,
        feedback_payload, search_payload,
    },
    result::ApiResult,
    service::{MemoryService, NoopService},
    transform::transform_search_results,
};

mod http;
mod payload;
mod result;
mod service;
mod transform;
