//! Shared submission pipeline behind the public contact form.
//!
//! Both deployment shapes (the long-running HTTP process and the serverless
//! function) drive [`intake::ContactService`], so sanitization, validation and
//! throttling stay identical between them.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
