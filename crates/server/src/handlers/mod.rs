//! # Request Handlers
//!
//! Inner handlers take `&AppState`, the authenticated caller and the already
//! extracted request. Router wrappers in [`crate::router`] do the extraction.
//!
//! Mutations run as units of work on the write connection through
//! [`execute_with_retry`](crate::durable::execute_with_retry); reads go
//! straight to the read pool.

pub mod account;
pub mod dashboard;
pub mod feedback;
pub mod feedback_requests;
pub mod health;
pub mod tags;
pub mod users;
