//! Data Transfer Objects for scheduler communication
//!
//! Request and response envelopes for the Nomad HTTP API. The job payload
//! itself lives in [`crate::domain::job`].

pub mod job;
