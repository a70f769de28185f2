//! # API Layer
//!
//! Request representation shared by every pipeline stage and the uniform
//! response envelope.

mod request;
mod response;

pub use request::ApiRequest;
pub use response::{Envelope, Status};
