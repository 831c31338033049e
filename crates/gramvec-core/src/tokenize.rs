#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Token;

/// Splits raw text into tokens. The splitting policy belongs to the caller;
/// anything implementing this trait can feed the extractor.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Split on Unicode whitespace.
    #[default]
    Word,
    /// One token per Unicode scalar value, whitespace included.
    Char,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Char => "char",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "word" | "words" => Some(Self::Word),
            "char" | "chars" => Some(Self::Char),
            _ => None,
        }
    }
}

/// Built-in word/character tokenizer with optional lowercasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextTokenizer {
    pub granularity: Granularity,
    pub lowercase: bool,
}

impl TextTokenizer {
    pub fn words() -> Self {
        Self {
            granularity: Granularity::Word,
            lowercase: false,
        }
    }

    pub fn chars() -> Self {
        Self {
            granularity: Granularity::Char,
            lowercase: false,
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Tokenizer for TextTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let owned;
        let text = if self.lowercase {
            owned = text.to_lowercase();
            owned.as_str()
        } else {
            text
        };
        match self.granularity {
            Granularity::Word => text.split_whitespace().map(str::to_string).collect(),
            Granularity::Char => text.chars().map(String::from).collect(),
        }
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<Token>,
{
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self(text)
    }
}
