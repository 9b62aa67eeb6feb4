//! Core domain types
//!
//! This module contains the domain structures shared by the client, the
//! runner and the CLI. They describe what a caller asks for (an image
//! generation job, a chat conversation, an embedding input) independently
//! of how it travels over the wire.

pub mod chat;
pub mod embedding;
pub mod job;
