//! ModelScope Core
//!
//! Core types and abstractions for the ModelScope inference toolkit.
//!
//! This crate contains:
//! - Domain types: image generation jobs, chat messages, embedding inputs
//! - DTOs: request and response bodies exchanged with the inference API
//! - Catalog: supported models, image sizes and message templates

pub mod catalog;
pub mod domain;
pub mod dto;
pub mod error;

pub use error::CoreError;
