//! The abstract memory backend capability.

use crate::{AddPayload, ApiResult, FeedbackPayload, SearchPayload};
use std::future::Future;

/// The three idempotent-on-failure backend operations.
///
/// Every operation returns an [`ApiResult`]: transport problems are
/// soft failures carried in the envelope, never raised, so a backend
/// outage degrades to a skipped memory operation rather than a failed
/// turn.
pub trait MemoryService: Send + Sync {
    /// Search stored memories.
    fn search(&self, payload: &SearchPayload) -> impl Future<Output = ApiResult> + Send;

    /// Store captured messages.
    fn add(&self, payload: &AddPayload) -> impl Future<Output = ApiResult> + Send;

    /// Submit a correction feedback record.
    fn feedback(&self, payload: &FeedbackPayload) -> impl Future<Output = ApiResult> + Send;
}

/// A no-op service that panics on any call.
///
/// # Panics
///
/// All three operations panic if called. Only use this service in
/// tests that never reach the wire.
#[derive(Clone, Copy)]
pub struct NoopService;

impl MemoryService for NoopService {
    async fn search(&self, _payload: &SearchPayload) -> ApiResult {
        panic!("NoopService::search called — not intended for real backend calls");
    }

    async fn add(&self, _payload: &AddPayload) -> ApiResult {
        panic!("NoopService::add called — not intended for real backend calls");
    }

    async fn feedback(&self, _payload: &FeedbackPayload) -> ApiResult {
        panic!("NoopService::feedback called — not intended for real backend calls");
    }
}
