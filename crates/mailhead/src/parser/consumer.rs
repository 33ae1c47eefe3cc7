//! Header value consumers.
//!
//! A consumer recognizes one lexical construct of the header grammar:
//! comments, quoted strings, encoded words, plain token runs, or the
//! address forms built from them. Composite consumers peek at the next
//! significant character and delegate to the matching sub-consumer, so
//! delimiter meaning stays context-sensitive (a `:` ends a group name at
//! the top level but is plain text inside a quoted string).
//!
//! Malformed input never fails: an unterminated delimiter is reinterpreted
//! as literal text and parsing continues from that point.

use tracing::{debug, trace};

use crate::parser::address;
use crate::parser::cursor::Cursor;
use crate::parser::encoded_word;
use crate::parser::part::{Part, PartFactory};

/// The closed set of grammar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind {
    /// Unstructured run of tokens, comments, quoted strings and encoded
    /// words.
    Generic,
    /// Balanced `(...)` span, nestable.
    Comment,
    /// Balanced `"..."` span with backslash escapes.
    QuotedString,
    /// One or more adjacent `=?charset?enc?data?=` encoded words.
    MimeLiteral,
    /// Display-name parts preceding an address.
    Name,
    /// A `local@domain` span, tolerating embedded comments.
    Email,
    /// A single mailbox or group.
    Address,
    /// A `name: members;` group, falling back to a single address when no
    /// colon is present.
    AddressGroup,
    /// Top-level comma-separated list mixing mailboxes and groups.
    AddressList,
}

/// Wires the fixed set of consumers together and exposes the entry points
/// callers use.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsumerRegistry {
    factory: PartFactory,
}

impl ConsumerRegistry {
    /// Creates a registry with the default part factory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            factory: PartFactory,
        }
    }

    /// Creates a registry constructing parts through `factory`.
    #[must_use]
    pub const fn with_factory(factory: PartFactory) -> Self {
        Self { factory }
    }

    /// The part factory shared by every consumer of this registry.
    pub(crate) const fn factory(&self) -> &PartFactory {
        &self.factory
    }

    /// The address entry point: a comma-separated, semicolon-tolerant list
    /// that may mix bare mailboxes and named groups.
    #[must_use]
    pub const fn address_consumer(&self) -> Consumer<'_> {
        self.consumer(ConsumerKind::AddressList)
    }

    /// The generic entry point for unstructured header values.
    #[must_use]
    pub const fn generic_consumer(&self) -> Consumer<'_> {
        self.consumer(ConsumerKind::Generic)
    }

    /// A consumer for an arbitrary grammar unit.
    #[must_use]
    pub const fn consumer(&self, kind: ConsumerKind) -> Consumer<'_> {
        Consumer {
            registry: self,
            kind,
        }
    }
}

/// A consumer bound to its registry.
#[derive(Debug, Clone, Copy)]
pub struct Consumer<'a> {
    registry: &'a ConsumerRegistry,
    kind: ConsumerKind,
}

impl Consumer<'_> {
    /// Consumes an entire header value, returning the parts recognized.
    #[must_use]
    pub fn consume(&self, value: &str) -> Vec<Part> {
        let mut cursor = Cursor::new(value);
        self.consume_from(&mut cursor)
    }

    /// Consumes from an existing cursor, advancing it past the span this
    /// consumer recognizes.
    pub fn consume_from(&self, cursor: &mut Cursor) -> Vec<Part> {
        let registry = self.registry;
        match self.kind {
            ConsumerKind::Generic => consume_generic(registry, cursor, &[]),
            ConsumerKind::Comment => match cursor.peek() {
                Some('(') => consume_comment(registry, cursor).into_iter().collect(),
                _ => Vec::new(),
            },
            ConsumerKind::QuotedString => match cursor.peek() {
                Some('"') => consume_quoted_string(registry, cursor).into_iter().collect(),
                _ => Vec::new(),
            },
            ConsumerKind::MimeLiteral => {
                consume_mime_literal(registry, cursor).into_iter().collect()
            }
            ConsumerKind::Name => {
                consume_generic(registry, cursor, &['<', '@', ':', ',', ';'])
            }
            ConsumerKind::Email => consume_generic(registry, cursor, &['>', ',', ';']),
            ConsumerKind::Address | ConsumerKind::AddressGroup => {
                address::consume_address(registry, cursor, false)
                    .into_iter()
                    .collect()
            }
            ConsumerKind::AddressList => address::consume_list(registry, cursor, false),
        }
    }
}

/// Consumes parts until end of input or a stop character, appending each
/// recognized part in order.
pub(crate) fn consume_generic(
    registry: &ConsumerRegistry,
    cursor: &mut Cursor,
    stops: &[char],
) -> Vec<Part> {
    let mut parts = Vec::new();
    while let Some(part) = next_part(registry, cursor, stops) {
        parts.push(part);
    }
    parts
}

/// Dispatches to the sub-consumer selected by the next character.
///
/// Returns `None` at end of input or when the next character is in `stops`;
/// the cursor is left on the stop character. Guaranteed to consume at least
/// one character otherwise.
pub(crate) fn next_part(
    registry: &ConsumerRegistry,
    cursor: &mut Cursor,
    stops: &[char],
) -> Option<Part> {
    let c = cursor.peek()?;
    if stops.contains(&c) {
        return None;
    }

    if c.is_whitespace() {
        let mut text = String::new();
        while let Some(w) = cursor.peek() {
            if !w.is_whitespace() {
                break;
            }
            text.push(w);
            cursor.advance();
        }
        return Some(registry.factory().token(text, true));
    }

    match c {
        '(' => {
            if let Some(part) = consume_comment(registry, cursor) {
                return Some(part);
            }
            cursor.advance();
            Some(registry.factory().token("(", false))
        }
        '"' => {
            if let Some(part) = consume_quoted_string(registry, cursor) {
                return Some(part);
            }
            cursor.advance();
            Some(registry.factory().token("\"", false))
        }
        _ => {
            if c == '=' && cursor.peek_at(1) == Some('?') {
                if let Some(part) = consume_mime_literal(registry, cursor) {
                    return Some(part);
                }
            }
            Some(consume_token(registry, cursor, stops))
        }
    }
}

/// Consumes a plain token run. The first character is taken unconditionally
/// so a failed encoded-word attempt cannot loop.
fn consume_token(registry: &ConsumerRegistry, cursor: &mut Cursor, stops: &[char]) -> Part {
    let mut text = String::new();
    if let Some(c) = cursor.advance() {
        text.push(c);
    }
    while let Some(c) = cursor.peek() {
        if stops.contains(&c) || c.is_whitespace() || c == '(' || c == '"' {
            break;
        }
        if c == '=' && cursor.peek_at(1) == Some('?') {
            break;
        }
        text.push(c);
        cursor.advance();
    }
    registry.factory().token(text, false)
}

/// Consumes a balanced, nestable `(...)` comment.
///
/// Returns `None` without advancing when the comment never terminates, so
/// the caller can reinterpret the `(` as literal text.
fn consume_comment(registry: &ConsumerRegistry, cursor: &mut Cursor) -> Option<Part> {
    let start = cursor.mark();
    cursor.advance(); // (

    let mut depth = 1u32;
    let mut text = String::new();
    while let Some(c) = cursor.advance() {
        match c {
            '\\' => {
                if let Some(escaped) = cursor.advance() {
                    text.push(escaped);
                }
            }
            '(' => {
                depth += 1;
                text.push('(');
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(registry.factory().comment(text));
                }
                text.push(')');
            }
            _ => text.push(c),
        }
    }

    trace!("unterminated comment, keeping '(' as literal text");
    cursor.reset(start);
    None
}

/// Consumes a `"..."` quoted string, removing backslash escapes.
///
/// Returns `None` without advancing when the closing quote is missing, so
/// the caller can reinterpret the `"` as literal text.
fn consume_quoted_string(registry: &ConsumerRegistry, cursor: &mut Cursor) -> Option<Part> {
    let start = cursor.mark();
    cursor.advance(); // "

    let mut text = String::new();
    while let Some(c) = cursor.advance() {
        match c {
            '"' => return Some(registry.factory().quoted_string(text)),
            '\\' => {
                if let Some(escaped) = cursor.advance() {
                    text.push(escaped);
                }
            }
            _ => text.push(c),
        }
    }

    trace!("unterminated quoted string, keeping '\"' as literal text");
    cursor.reset(start);
    None
}

/// A syntactically valid encoded word, prior to decoding.
struct RawWord {
    charset: String,
    encoding: String,
    data: String,
    raw: String,
}

/// Consumes one or more adjacent encoded words into a single decoded
/// literal.
///
/// Words separated only by whitespace are joined with the whitespace
/// dropped (RFC 2047 folding rule); same-charset neighbors are joined at
/// the byte level before the charset decode so multibyte sequences split
/// across words survive. Returns `None` without advancing when the span at
/// the cursor is not a well-formed encoded word.
fn consume_mime_literal(registry: &ConsumerRegistry, cursor: &mut Cursor) -> Option<Part> {
    let mut words = vec![scan_encoded_word(cursor)?];
    loop {
        let mark = cursor.mark();
        cursor.skip_whitespace();
        match scan_encoded_word(cursor) {
            Some(word) => words.push(word),
            None => {
                cursor.reset(mark);
                break;
            }
        }
    }
    Some(registry.factory().literal(decode_joined(&words)))
}

/// Scans `=?charset?encoding?data?=` at the cursor, resetting on failure.
fn scan_encoded_word(cursor: &mut Cursor) -> Option<RawWord> {
    let start = cursor.mark();
    let word = scan_encoded_word_inner(cursor);
    if word.is_none() {
        cursor.reset(start);
    }
    word
}

fn scan_encoded_word_inner(cursor: &mut Cursor) -> Option<RawWord> {
    if cursor.peek() != Some('=') || cursor.peek_at(1) != Some('?') {
        return None;
    }
    cursor.skip(2);

    let charset = scan_field(cursor)?;
    cursor.advance(); // ?
    let encoding = scan_field(cursor)?;
    cursor.advance(); // ?
    let data = scan_data(cursor)?;
    if cursor.peek() != Some('?') || cursor.peek_at(1) != Some('=') {
        return None;
    }
    cursor.skip(2);

    let raw = format!("=?{charset}?{encoding}?{data}?=");
    Some(RawWord {
        charset,
        encoding,
        data,
        raw,
    })
}

/// Scans a non-empty charset or encoding field, stopping on `?`.
fn scan_field(cursor: &mut Cursor) -> Option<String> {
    let mut text = String::new();
    while let Some(c) = cursor.peek() {
        if c == '?' {
            break;
        }
        if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
            return None;
        }
        text.push(c);
        cursor.advance();
    }
    if text.is_empty() || cursor.peek() != Some('?') {
        return None;
    }
    Some(text)
}

/// Scans the encoded-text field, stopping on `?`. Whitespace is not valid
/// inside encoded text.
fn scan_data(cursor: &mut Cursor) -> Option<String> {
    let mut text = String::new();
    while let Some(c) = cursor.peek() {
        if c == '?' {
            break;
        }
        if c.is_whitespace() {
            return None;
        }
        text.push(c);
        cursor.advance();
    }
    if cursor.peek() == Some('?') { Some(text) } else { None }
}

/// Decodes a run of adjacent encoded words, joining same-charset neighbors
/// at the byte level and keeping the raw span of anything that fails to
/// decode.
fn decode_joined(words: &[RawWord]) -> String {
    let mut out = String::new();
    let mut index = 0;

    while index < words.len() {
        let word = &words[index];
        let Some(mut bytes) = encoded_word::decode_bytes(&word.encoding, &word.data) else {
            trace!(word = %word.raw, "undecodable encoded word payload, keeping raw text");
            push_raw(&mut out, &word.raw);
            index += 1;
            continue;
        };

        let mut end = index + 1;
        while end < words.len()
            && words[end].charset.eq_ignore_ascii_case(&word.charset)
            && words[end].encoding.eq_ignore_ascii_case(&word.encoding)
        {
            match encoded_word::decode_bytes(&words[end].encoding, &words[end].data) {
                Some(more) => {
                    bytes.extend(more);
                    end += 1;
                }
                None => break,
            }
        }

        match crate::encoding::decode_charset(encoded_word::strip_language(&word.charset), &bytes)
        {
            Some(text) => out.push_str(&text),
            None => {
                debug!(charset = %word.charset, "unknown charset in encoded word, keeping raw text");
                for raw_word in &words[index..end] {
                    push_raw(&mut out, &raw_word.raw);
                }
            }
        }
        index = end;
    }

    out
}

fn push_raw(out: &mut String, raw: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(raw);
}
