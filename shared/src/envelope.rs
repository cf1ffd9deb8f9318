//! # Observability Envelope (C1)
//!
//! A single reusable primitive every service method acquires at the top and
//! releases via RAII — never via a deferred closure, per the §9 redesign
//! flag ("replace closures returned by the envelope with a small RAII-style
//! guard struct whose destructor records metrics and ends the span").
//!
//! ## Usage
//!
//! ```rust,ignore
//! async fn find_by_id(&self, id: Uuid) -> ApiResult<CardResponse> {
//!     let mut envelope = Envelope::start("FindById", &[("id", &id.to_string())]);
//!
//!     if let Some(cached) = self.cache.get_card(id).await {
//!         envelope.success("cache hit", &[]);
//!         return Ok(cached);
//!     }
//!
//!     let record = match self.repository.find_by_id(id).await {
//!         Ok(Some(r)) => r,
//!         Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "no such card", card_errors::not_found())),
//!         Err(e) => return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), card_errors::failed_find())),
//!     };
//!
//!     let response = to_card_response(&record);
//!     self.cache.set_card(id, &response).await;
//!     envelope.success("found", &[]);
//!     Ok(response)
//! }
//! ```
//!
//! Metric labels are always exactly `(method, status)`, where `status` is
//! `"success"` or a `<kind>_error_<method>` string.

use std::borrow::Cow;
use std::time::Instant;

use tracing::Span;

use crate::errors::{translate, ErrorKind, ErrorResponse};
use crate::telemetry::metrics::MetricsRegistry;

/// RAII guard acquired at the top of every public service method.
///
/// Dropping the guard (including via an early `return`) records latency and
/// the final status into the shared counter/histogram and closes the span —
/// no code path can bypass metric emission.
pub struct Envelope<'a> {
    method: &'static str,
    status: Cow<'static, str>,
    span: Span,
    started: Instant,
    metrics: &'a MetricsRegistry,
}

impl<'a> Envelope<'a> {
    /// Starts the envelope: opens a span named after `method`, records a
    /// start event with the given attributes, and defaults status to
    /// `"success"`.
    pub fn start(metrics: &'a MetricsRegistry, method: &'static str, attrs: &[(&str, &str)]) -> Self {
        let span = tracing::info_span!("service_method", method = method, error = tracing::field::Empty);
        let _enter = span.enter();
        tracing::debug!(method = method, attrs = ?attrs, "entering service method");
        drop(_enter);

        Self {
            method,
            status: Cow::Borrowed("success"),
            span,
            started: Instant::now(),
            metrics,
        }
    }

    /// Attaches a success event to the span and writes a structured log.
    /// Does not change the status — that remains `"success"` unless `fail`
    /// is called later in the same method (it shouldn't be, by recipe).
    pub fn success(&self, msg: &str, fields: &[(&str, &str)]) {
        let _enter = self.span.enter();
        tracing::info!(method = self.method, fields = ?fields, "{msg}");
    }

    /// Classifies a failure via the error taxonomy, records it on the span,
    /// sets the envelope's terminal status to `<kind>_error_<method>`, and
    /// returns the catalogue `ErrorResponse` the caller should propagate.
    pub fn fail(&mut self, kind: ErrorKind, detail: &str, response: ErrorResponse) -> ErrorResponse {
        let _enter = self.span.enter();
        let (status_label, response) = translate(kind, self.method, detail, response);
        drop(_enter);
        self.status = Cow::Owned(status_label);
        response
    }

    /// The method name this envelope was opened for.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// The current terminal status label (`"success"` until `fail` runs).
    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Drop for Envelope<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        self.metrics.observe(self.method, &self.status, elapsed);
        let _enter = self.span.enter();
        tracing::debug!(method = self.method, status = %self.status, elapsed_ms = elapsed.as_millis() as u64, "service method finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::catalogue;

    #[test]
    fn success_path_keeps_default_status() {
        let metrics = MetricsRegistry::new_for_test();
        let envelope = Envelope::start(&metrics, "FindById", &[("id", "1")]);
        assert_eq!(envelope.status(), "success");
        drop(envelope);
        assert_eq!(metrics.sample_count("FindById", "success"), 1);
    }

    #[test]
    fn fail_path_sets_kind_qualified_status() {
        let metrics = MetricsRegistry::new_for_test();
        let mut envelope = Envelope::start(&metrics, "FindById", &[]);
        let _ = envelope.fail(ErrorKind::NotFound, "missing", catalogue::err_role_not_found());
        assert_eq!(envelope.status(), "not_found_error_FindById");
        drop(envelope);
        assert_eq!(metrics.sample_count("FindById", "not_found_error_FindById"), 1);
    }
}
