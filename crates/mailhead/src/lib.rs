//! # mailhead
//!
//! Permissive email header parsing library.
//!
//! ## Features
//!
//! - **Address parsing**: RFC 5322 mailboxes, display names and named
//!   groups, including comments and quoted strings anywhere the grammar
//!   allows them
//! - **Encoded words**: RFC 2047 `=?charset?Q|B?...?=` decoding with
//!   adjacent-word joining and charset conversion
//! - **Header blocks**: raw header block parsing with unfolding, plus typed
//!   accessors for address, text and date headers
//! - **Never fails on header text**: headers are untrusted input, so
//!   malformed syntax degrades to best-effort values instead of errors
//!
//! ## Quick Start
//!
//! ### Parsing address headers
//!
//! ```
//! use mailhead::Address;
//!
//! let addresses = mailhead::parse_addresses(
//!     "=?US-ASCII?Q?Kilgore_Trout?= <Kilgore.Trout@Iliyum.ny>, Senate: Caesar@Dictator.com;",
//! );
//! assert_eq!(addresses.len(), 2);
//!
//! match &addresses[0] {
//!     Address::Mailbox(mailbox) => {
//!         assert_eq!(mailbox.name(), "Kilgore Trout");
//!         assert_eq!(mailbox.email(), "Kilgore.Trout@Iliyum.ny");
//!     }
//!     Address::Group(_) => panic!("expected a mailbox"),
//! }
//! match &addresses[1] {
//!     Address::Group(group) => assert_eq!(group.name(), "Senate"),
//!     Address::Mailbox(_) => panic!("expected a group"),
//! }
//! ```
//!
//! ### Working with header blocks
//!
//! ```
//! let headers = mailhead::Headers::parse(
//!     "From: Max Payne <Max.Payne@AddressUnknown.com>\r\n\
//!      Subject: =?US-ASCII?Q?Kilgore_Trout?=\r\n\
//!      \r\n",
//! );
//! assert_eq!(headers.decoded("Subject").as_deref(), Some("Kilgore Trout"));
//! assert_eq!(headers.addresses("From").len(), 1);
//! ```
//!
//! ### Decoding encoded words directly
//!
//! ```
//! use mailhead::parser::encoded_word;
//!
//! let decoded = encoded_word::decode("utf-8", "B", "SMOpbGxv");
//! assert_eq!(decoded.as_deref(), Some("Héllo"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;

pub mod encoding;
pub mod parser;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use parser::{
    Address, AddressGroup, Consumer, ConsumerKind, ConsumerRegistry, Mailbox, Part,
    parse_addresses, parse_text,
};
