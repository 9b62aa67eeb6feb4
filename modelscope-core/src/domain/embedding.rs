//! Embedding input types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Text to embed: one string or a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Builds a batch input, dropping blank entries
    pub fn batch<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Batch(
            texts
                .into_iter()
                .map(Into::into)
                .filter(|text: &String| !text.trim().is_empty())
                .collect(),
        )
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, EmbeddingInput::Batch(_))
    }

    /// Returns true when there is nothing to embed
    pub fn is_blank(&self) -> bool {
        match self {
            EmbeddingInput::Single(text) => text.trim().is_empty(),
            EmbeddingInput::Batch(texts) => texts.iter().all(|text| text.trim().is_empty()),
        }
    }
}

/// Encoding of returned vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    #[default]
    Float,
    Base64,
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingFormat::Float => f.write_str("float"),
            EncodingFormat::Base64 => f.write_str("base64"),
        }
    }
}

impl FromStr for EncodingFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float" => Ok(EncodingFormat::Float),
            "base64" => Ok(EncodingFormat::Base64),
            _ => Err(CoreError::InvalidEncodingFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_drops_blank_entries() {
        let input = EmbeddingInput::batch(["hello", "  ", "world", ""]);
        assert_eq!(
            input,
            EmbeddingInput::Batch(vec!["hello".to_string(), "world".to_string()])
        );
        assert!(!input.is_blank());
    }

    #[test]
    fn test_blank_inputs() {
        assert!(EmbeddingInput::Single(" ".to_string()).is_blank());
        assert!(EmbeddingInput::batch(["", " "]).is_blank());
    }

    #[test]
    fn test_encoding_format() {
        assert_eq!("base64".parse::<EncodingFormat>().unwrap(), EncodingFormat::Base64);
        assert_eq!("FLOAT".parse::<EncodingFormat>().unwrap(), EncodingFormat::Float);
        assert!("int8".parse::<EncodingFormat>().is_err());
    }
}
