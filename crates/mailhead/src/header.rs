//! Header collection and typed accessors.

use crate::parser::{Address, parse_addresses, parse_text};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fmt;

/// Collection of email headers.
///
/// Stores raw (undecoded) values case-insensitively; the typed accessors
/// run the header value parser on demand, so re-reading a header re-parses
/// it and returns fresh values.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        self.headers.entry(name).or_default().push(value);
    }

    /// Sets a header value, replacing any existing values.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        self.headers.insert(name, vec![value]);
    }

    /// Gets the first raw value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Gets all raw values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Removes all values for a header.
    pub fn remove(&mut self, name: &str) {
        self.headers.remove(&name.to_lowercase());
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Parses headers from a raw header block.
    ///
    /// Folded continuation lines (leading space or tab) are unfolded into
    /// the preceding value with a single space, so stored values are ready
    /// for the value parser. An empty line ends the block; anything after
    /// it is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut headers = Self::new();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                // Continuation of the previous header
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                }
            } else {
                if let Some(name) = current_name.take() {
                    headers.add(name, current_value.trim().to_string());
                    current_value.clear();
                }

                if let Some((name, value)) = line.split_once(':') {
                    current_name = Some(name.trim().to_string());
                    current_value = value.trim().to_string();
                }
            }
        }

        if let Some(name) = current_name {
            headers.add(name, current_value.trim().to_string());
        }

        headers
    }

    /// Parses every value of an address header (`From`, `To`, `Cc`, ...),
    /// concatenating the results in stored order.
    #[must_use]
    pub fn addresses(&self, name: &str) -> Vec<Address> {
        self.get_all(name)
            .into_iter()
            .flat_map(parse_addresses)
            .collect()
    }

    /// Decoded text of the first value of an unstructured header
    /// (`Subject`, ...): encoded words expanded, comments dropped.
    #[must_use]
    pub fn decoded(&self, name: &str) -> Option<String> {
        self.get(name).map(parse_text)
    }

    /// Parses the first value of a date header as an RFC 2822 date.
    ///
    /// Comments are stripped before parsing; `None` when the header is
    /// missing or its value is not a parseable date.
    #[must_use]
    pub fn date(&self, name: &str) -> Option<DateTime<FixedOffset>> {
        let text = self.decoded(name)?;
        DateTime::parse_from_rfc2822(&text).ok()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted_headers: Vec<_> = self.headers.iter().collect();
        sorted_headers.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (name, values) in sorted_headers {
            // Capitalize header name (e.g., "content-type" -> "Content-Type")
            let capitalized = name
                .split('-')
                .map(|part| {
                    let mut chars = part.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_uppercase().collect::<String>() + chars.as_str()
                    })
                })
                .collect::<Vec<_>>()
                .join("-");

            for value in values {
                writeln!(f, "{capitalized}: {value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Subject", "Test");
        assert_eq!(headers.get("Subject"), Some("Test"));
        assert_eq!(headers.get("subject"), Some("Test")); // Case insensitive
    }

    #[test]
    fn test_headers_set() {
        let mut headers = Headers::new();
        headers.add("To", "alice@example.com");
        headers.add("To", "bob@example.com");
        assert_eq!(headers.get_all("To").len(), 2);

        headers.set("To", "charlie@example.com");
        assert_eq!(headers.get_all("To").len(), 1);
        assert_eq!(headers.get("To"), Some("charlie@example.com"));
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.add("Subject", "Test");
        assert!(headers.get("Subject").is_some());

        headers.remove("Subject");
        assert!(headers.get("Subject").is_none());
    }

    #[test]
    fn test_headers_parse_unfolds_continuations() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: a folded\r\n",
            " subject line\r\n",
            "\r\n",
            "body is ignored\r\n"
        );

        let headers = Headers::parse(text);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("To"), Some("recipient@example.com"));
        assert_eq!(headers.get("Subject"), Some("a folded subject line"));
        assert!(headers.get("body is ignored").is_none());
    }

    #[test]
    fn test_headers_addresses() {
        let mut headers = Headers::new();
        headers.add("To", "Max Payne <Max.Payne@AddressUnknown.com>");
        headers.add("To", "extra@example.com");

        let addresses = headers.addresses("To");
        assert_eq!(addresses.len(), 2);
        match &addresses[0] {
            Address::Mailbox(mailbox) => {
                assert_eq!(mailbox.name(), "Max Payne");
                assert_eq!(mailbox.email(), "Max.Payne@AddressUnknown.com");
            }
            Address::Group(_) => panic!("expected a mailbox"),
        }
    }

    #[test]
    fn test_headers_decoded() {
        let mut headers = Headers::new();
        headers.add("Subject", "=?US-ASCII?Q?Kilgore_Trout?= (author)");
        assert_eq!(headers.decoded("Subject").as_deref(), Some("Kilgore Trout"));
        assert!(headers.decoded("Missing").is_none());
    }

    #[test]
    fn test_headers_date() {
        let mut headers = Headers::new();
        headers.add("Date", "Wed, 18 Jul 2018 13:05:00 +0200 (CEST)");
        let date = headers.date("Date").unwrap();
        assert_eq!(date.to_rfc2822(), "Wed, 18 Jul 2018 13:05:00 +0200");

        headers.set("Date", "not a date");
        assert!(headers.date("Date").is_none());
    }

    #[test]
    fn test_headers_display() {
        let mut headers = Headers::new();
        headers.add("from", "sender@example.com");
        headers.add("to", "recipient@example.com");

        let s = headers.to_string();
        assert!(s.contains("From: sender@example.com"));
        assert!(s.contains("To: recipient@example.com"));
    }

    #[test]
    fn test_headers_iter() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");

        assert_eq!(headers.iter().count(), 2);
    }
}
