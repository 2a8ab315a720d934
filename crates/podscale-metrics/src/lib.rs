//! podscale-metrics — where the autoscaler learns how busy it is.
//!
//! The media server exposes room and participant counts at `GET /stats`.
//! A [`SessionSource`] never fails: an unreachable or misbehaving server
//! reads as zero sessions, so an outage biases the scaler toward the
//! cheapest outcome instead of stalling it.

pub mod source;

pub use source::{HttpStatsSource, SessionSource, SessionStats};
