//! Permissive header value parser.
//!
//! Header values are untrusted input, so this parser never fails: malformed
//! syntax (an unterminated comment or quote, a broken encoded word, a
//! missing `@`) degrades to best-effort structured output instead of an
//! error.
//!
//! # Architecture
//!
//! The parser is built from three pieces:
//!
//! - **Cursor**: a repositionable character cursor with cheap mark/reset
//!   backtracking
//! - **Consumers**: one recognizer per lexical construct (comment, quoted
//!   string, encoded word, token run, name, email, address, group),
//!   delegating to each other on lookahead
//! - **Parts**: the immutable output values, built through a single factory
//!
//! # Example
//!
//! ```
//! use mailhead::parser::{Address, parse_addresses};
//!
//! let addresses = parse_addresses("Marc Antony <MarcAntony@imawesome.it>");
//! match &addresses[0] {
//!     Address::Mailbox(mailbox) => {
//!         assert_eq!(mailbox.name(), "Marc Antony");
//!         assert_eq!(mailbox.email(), "MarcAntony@imawesome.it");
//!     }
//!     Address::Group(_) => panic!("expected a mailbox"),
//! }
//! ```

mod address;
pub(crate) mod consumer;
pub mod cursor;
pub mod encoded_word;
pub mod part;

pub use consumer::{Consumer, ConsumerKind, ConsumerRegistry};
pub use cursor::Cursor;
pub use part::{Address, AddressGroup, Mailbox, Part, PartFactory, join_decoded};

/// Parses a header value into its top-level addresses and groups.
///
/// Group members are not flattened into the outer sequence; a value that is
/// one group yields a one-element result.
#[must_use]
pub fn parse_addresses(value: &str) -> Vec<Address> {
    let registry = ConsumerRegistry::new();
    registry
        .address_consumer()
        .consume(value)
        .into_iter()
        .filter_map(|part| match part {
            Part::Mailbox(mailbox) => Some(Address::Mailbox(mailbox)),
            Part::Group(group) => Some(Address::Group(group)),
            _ => None,
        })
        .collect()
}

/// Decodes an unstructured header value to plain text: encoded words are
/// expanded, comments dropped, and whitespace runs collapsed.
#[must_use]
pub fn parse_text(value: &str) -> String {
    let registry = ConsumerRegistry::new();
    join_decoded(&registry.generic_consumer().consume(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addresses_mixes_mailboxes_and_groups() {
        let addresses = parse_addresses("a@x.com, g: b@y.com;");
        assert_eq!(addresses.len(), 2);
        assert!(matches!(addresses[0], Address::Mailbox(_)));
        assert!(matches!(addresses[1], Address::Group(_)));
    }

    #[test]
    fn test_parse_text_decodes_and_strips() {
        let text = parse_text("=?US-ASCII?Q?Kilgore_Trout?= (author)");
        assert_eq!(text, "Kilgore Trout");
    }
}
