//! Periodic maintenance jobs.
//!
//! Each job is a long-running loop meant for `tokio::spawn`, stopped through
//! its [`CancellationToken`](tokio_util::sync::CancellationToken).

pub mod heartbeat;
pub mod notification_retention;
pub mod strike_sweep;
