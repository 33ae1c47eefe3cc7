//! Structured `Content-Type` header values.

use crate::error::{Error, Result};
use crate::parser::consumer::{ConsumerRegistry, consume_generic};
use crate::parser::cursor::Cursor;
use crate::parser::join_decoded;
use std::collections::HashMap;
use std::fmt;

/// A parsed `type/subtype; param=value` header value.
///
/// Parsing runs through the header value parser, so comments are tolerated
/// anywhere whitespace is, quoted parameter values may contain `;` and
/// escaped quotes, and encoded words in parameter values are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type with no parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Returns a parameter value by name, case-insensitively.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Parses a content type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the `type/subtype` form is missing.
    pub fn parse(s: &str) -> Result<Self> {
        let registry = ConsumerRegistry::new();
        let mut cursor = Cursor::new(s);

        let main_type = join_decoded(&consume_generic(&registry, &mut cursor, &['/', ';']))
            .to_lowercase();
        if main_type.is_empty() || cursor.peek() != Some('/') {
            return Err(Error::InvalidContentType("Missing subtype".to_string()));
        }
        cursor.advance();

        let sub_type =
            join_decoded(&consume_generic(&registry, &mut cursor, &[';'])).to_lowercase();
        if sub_type.is_empty() {
            return Err(Error::InvalidContentType("Missing subtype".to_string()));
        }

        let mut content_type = Self::new(main_type, sub_type);
        while cursor.peek() == Some(';') {
            cursor.advance();
            let key = join_decoded(&consume_generic(&registry, &mut cursor, &['=', ';']))
                .to_lowercase();
            let value = if cursor.peek() == Some('=') {
                cursor.advance();
                join_decoded(&consume_generic(&registry, &mut cursor, &[';']))
            } else {
                String::new()
            };
            if !key.is_empty() {
                content_type.parameters.insert(key, value);
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}
