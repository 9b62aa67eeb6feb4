//! Service layer
//!
//! Services contain the business logic of each operation. They validate
//! input, call the client or the job poller, and return serializable result
//! records. The item executor dispatches tagged work items to them.

mod chat;
mod embedding;
mod error;
mod image;
mod items;
mod messages;

pub use chat::{
    ChatParams, ChatResult, ChatService, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_VISION_PROMPT, VisionParams,
};
pub use embedding::{EmbeddingParams, EmbeddingResult, EmbeddingService};
pub use error::{OperationError, ValidationError};
pub use image::{ImageGeneration, ImageService};
pub use items::{ImageParams, ItemError, ItemOutput, Operation, OperationRunner};
pub use messages::{Locale, UnknownLocale, describe_error};
