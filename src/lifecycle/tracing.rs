//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! The level comes from `RUST_LOG` when set, otherwise from the configured
//! `log_level`. Output hides the crate/module prefix (`with_target(false)`) and is either
//! compact text or one JSON object per line.
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info docstore
//!
//! # Payload sizes, lookups and per-action timings
//! RUST_LOG=debug docstore
//!
//! # Raw document text on upload
//! RUST_LOG=trace docstore
//!
//! # Only the worker
//! RUST_LOG=docstore::framework=debug docstore
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: worker start, shutdown signal, final shutdown
//! - **Requests**: an `http_request` span per request carrying `request_id`, `path`,
//!   `method`, and once finished `status` (plus `error` for failures), with
//!   `start process` / `finish process` events inside it
//! - **Store Operations**: uploads (`Created` with the new size), lookups, searches
//! - **Admission Control**: a warning for every submission rejected by a full mailbox
//!
//! With `RUST_LOG=debug` a sleeping worker shows up like this:
//!
//! ```text
//! INFO http_request{request_id=.. path="/sleep" method=GET}: start process
//! DEBUG sleep{milliseconds=2000}: Sending request
//! WARN http_request{request_id=.. path="/documents" method=POST}: service unavailable action="upload document"
//! DEBUG Action finished state_type="DocumentStore" action="sleep" outcome="success" elapsed_ms=2000
//! INFO http_request{request_id=.. path="/sleep" method=GET}: finish process
//! ```

use tracing_subscriber::EnvFilter;

use super::config::LogFormat;

pub fn setup_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false); // Don't show module paths - spans and fields carry the context

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
