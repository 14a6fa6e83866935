//! wallet-model — wallet view-model primitives for RPC aggregation.
//!
//! A wallet's picture of its own transactions is assembled from several
//! overlapping RPC queries (incoming transfers, outgoing transfers, payment
//! lookups, pool state). Each query yields *partial* records; this crate
//! fuses them:
//! - Payment / Output / Transaction: typed records where every field is
//!   `Option` (absent means "this RPC perspective did not report it")
//! - reconcile: combine two observations of one field, requiring agreement
//!   when both are present
//! - merge: pure fold of one partial record into an accumulator, with
//!   key-image dedup for nested outputs
//!
//! This crate performs no I/O; `wallet-rpc` supplies the partial records.
pub mod error;
pub mod output;
pub mod payment;
pub mod reconcile;
mod render;
pub mod transaction;

pub use error::{Field, MergeError};
pub use output::Output;
pub use payment::Payment;
pub use reconcile::reconcile;
pub use transaction::Transaction;
