//! Inquiry Relay — intake form controller and notification relay for the
//! studio's consultation requests.

pub mod channels;
pub mod config;
pub mod error;
pub mod inquiry;
pub mod intake;
pub mod relay;
