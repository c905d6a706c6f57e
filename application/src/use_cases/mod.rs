//! Use cases
//!
//! - [`fan_out`] - ask both sages concurrently and join their answers
//! - [`run_council`] - fan-out followed by the streamed synthesis

pub mod fan_out;
pub mod run_council;
