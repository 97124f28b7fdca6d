//! # docstore
//!
//! > **An in-memory JSON document store behind a single-writer mailbox.**
//!
//! Clients upload raw text documents, fetch them back by id, list everything, and
//! search every stored document for a key, getting back the structural paths where the
//! key occurs. All state lives in one actor: exactly one worker thread touches it, and
//! every operation reaches it through a bounded mailbox.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Admission Control instead of Queues
//! The mailbox holds one pending action by default. When it is full a submission fails
//! immediately with `ServiceUnavailable` (HTTP 503) instead of waiting. Under overload
//! the service sheds load rather than piling up latency.
//!
//! ### Parse Failures are Data
//! A malformed document is still stored, together with its diagnostic. Upload only
//! fails when the store itself cannot accept work.
//!
//! ### Health Outside the Mailbox
//! Liveness and readiness are atomics read directly, so health probes answer even while
//! the worker is busy (for instance during `/sleep`).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`MailboxActor`](framework::MailboxActor) and
//! [`MailboxClient`](framework::MailboxClient). Work is a named closure over the state;
//! the worker runs each one to completion and times it.
//!
//! ### 2. The State ([`document_actor`], [`search`], [`model`])
//! [`DocumentStore`](document_actor::DocumentStore) and its operations, the key-path
//! [`search`](search::search), and the wire types.
//!
//! ### 3. The Interface ([`clients`])
//! [`StoreClient`](clients::StoreClient) wraps the mailbox client with typed
//! operations, id and duration validation, and the health flags.
//!
//! ### 4. The Surface ([`http`])
//! A per-route dispatcher enforcing body limits, deadlines and error mapping in front
//! of a [`Responder`](http::Responder).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Configuration, tracing, metrics, and [`DocumentSystem`](lifecycle::DocumentSystem)
//! which starts and stops the worker.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run with info logs
//! RUST_LOG=info cargo run
//!
//! # Override settings through the environment
//! DOCSTORE__PORT=3000 DOCSTORE__LOG_FORMAT=json cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod document_actor;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod search;
