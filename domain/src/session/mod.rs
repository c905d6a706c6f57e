//! Session domain
//!
//! Wire types exchanged with the text-completion services and the events
//! of a streamed completion.

pub mod request;
pub mod stream;
