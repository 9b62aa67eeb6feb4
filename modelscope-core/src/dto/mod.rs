//! Data Transfer Objects for the inference API
//!
//! One request/response pair per endpoint. Responses ignore fields they do
//! not know about; a missing required field surfaces as a deserialization
//! error, which the client reports separately from transport failures.

pub mod chat;
pub mod embedding;
pub mod image;
pub mod model;
