//! Parsed header value parts.

use std::fmt;

/// A single mailbox: an email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    name: String,
    email: String,
}

impl Mailbox {
    /// Creates a mailbox.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Display name, empty when the input carried none.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The address (`local@domain`), with comments stripped.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "\"{}\" <{}>", self.name.replace('"', "\\\""), self.email)
        }
    }
}

/// A named group of mailboxes (`name: a@x.com, b@y.com;`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressGroup {
    name: String,
    members: Vec<Mailbox>,
}

impl AddressGroup {
    /// Creates a group.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<Mailbox>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// The group name, taken from before the colon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member mailboxes, in input order.
    #[must_use]
    pub fn members(&self) -> &[Mailbox] {
        &self.members
    }
}

impl fmt::Display for AddressGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\":", self.name.replace('"', "\\\""))?;
        for (i, member) in self.members.iter().enumerate() {
            if i == 0 {
                write!(f, " ")?;
            } else {
                write!(f, ", ")?;
            }
            member.fmt(f)?;
        }
        write!(f, ";")
    }
}

/// A top-level element of an address header: a mailbox or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Address {
    /// A single mailbox.
    Mailbox(Mailbox),
    /// A named group of mailboxes.
    Group(AddressGroup),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox(mailbox) => mailbox.fmt(f),
            Self::Group(group) => group.fmt(f),
        }
    }
}

/// A lexical part produced by the header consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Raw text run.
    Token {
        /// Text of the run.
        text: String,
        /// True when the run is a whitespace separator.
        separator: bool,
    },
    /// Decoded text, with any encoded words already expanded.
    Literal(String),
    /// Content of a balanced parenthesized comment.
    Comment(String),
    /// Content of a quoted string, escapes removed.
    QuotedString(String),
    /// A parsed mailbox.
    Mailbox(Mailbox),
    /// A parsed group.
    Group(AddressGroup),
}

impl Part {
    /// Returns true for a whitespace separator token.
    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(
            self,
            Self::Token {
                separator: true,
                ..
            }
        )
    }

    /// Returns true for a comment part.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// The textual content of a token, literal or quoted string.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Token { text, .. } | Self::Literal(text) | Self::QuotedString(text) => {
                Some(text)
            }
            Self::Comment(_) | Self::Mailbox(_) | Self::Group(_) => None,
        }
    }
}

/// Joins the decoded text of `parts`, dropping comments and collapsing
/// whitespace separators to single spaces.
#[must_use]
pub fn join_decoded(parts: &[Part]) -> String {
    let mut out = String::new();
    let mut pending_space = false;

    for part in parts {
        if part.is_comment() {
            continue;
        }
        if part.is_separator() {
            pending_space = !out.is_empty();
            continue;
        }
        if let Some(text) = part.text() {
            if text.is_empty() {
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push_str(text);
        }
    }

    out
}

/// Constructs part instances for the consumers.
///
/// All parts flow through one factory, held by the registry, so tests can
/// substitute construction in a single place.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartFactory;

#[allow(clippy::unused_self)]
impl PartFactory {
    /// Creates a raw text token.
    #[must_use]
    pub fn token(&self, text: impl Into<String>, separator: bool) -> Part {
        Part::Token {
            text: text.into(),
            separator,
        }
    }

    /// Creates a decoded literal.
    #[must_use]
    pub fn literal(&self, text: impl Into<String>) -> Part {
        Part::Literal(text.into())
    }

    /// Creates a comment part from the text between the parentheses.
    #[must_use]
    pub fn comment(&self, text: impl Into<String>) -> Part {
        Part::Comment(text.into())
    }

    /// Creates a quoted string part from the text between the quotes.
    #[must_use]
    pub fn quoted_string(&self, text: impl Into<String>) -> Part {
        Part::QuotedString(text.into())
    }

    /// Creates a mailbox part.
    #[must_use]
    pub fn mailbox(&self, name: impl Into<String>, email: impl Into<String>) -> Part {
        Part::Mailbox(Mailbox::new(name, email))
    }

    /// Creates a group part.
    #[must_use]
    pub fn group(&self, name: impl Into<String>, members: Vec<Mailbox>) -> Part {
        Part::Group(AddressGroup::new(name, members))
    }
}
