//! Address consumers: display names, email spans, mailboxes and groups.
//!
//! Assembly rules are permissive. Comments adjoining an email are stripped
//! from the assembled address but still consumed from the input; a quoted
//! local part keeps parenthesized text verbatim because quoting suppresses
//! comment semantics; whitespace never survives into an assembled email.
//! Input that never produces an `@` still yields a mailbox carrying the
//! best-effort collected text.

use crate::parser::consumer::{ConsumerRegistry, next_part};
use crate::parser::cursor::Cursor;
use crate::parser::part::{Mailbox, Part, join_decoded};

/// Consumes a comma-separated sequence of mailboxes and groups.
///
/// At the top level (`in_group` false) semicolons are tolerated as
/// separators; inside a group an unescaped `;` terminates the member list
/// and is consumed.
pub(crate) fn consume_list(
    registry: &ConsumerRegistry,
    cursor: &mut Cursor,
    in_group: bool,
) -> Vec<Part> {
    let mut parts = Vec::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some(';') if in_group => {
                cursor.advance();
                break;
            }
            Some(',' | ';') => {
                cursor.advance();
                continue;
            }
            Some(_) => {}
        }
        if let Some(part) = consume_address(registry, cursor, in_group) {
            parts.push(part);
        }
    }

    parts
}

/// Consumes a single mailbox, or a group when a top-level `:` appears.
///
/// The cursor is left on the `,`/`;` separator (if any) following the
/// element. Returns `None` when nothing but a separator was found.
pub(crate) fn consume_address(
    registry: &ConsumerRegistry,
    cursor: &mut Cursor,
    in_group: bool,
) -> Option<Part> {
    let stops: &[char] = if in_group {
        &[',', ';', '<']
    } else {
        &[',', ';', '<', ':']
    };

    let mut collected = Vec::new();
    loop {
        match cursor.peek() {
            None | Some(',' | ';') => break,
            Some(':') if !in_group => {
                cursor.advance();
                let name = join_decoded(&collected);
                let members = group_members(registry, cursor);
                return Some(registry.factory().group(name, members));
            }
            Some('<') => {
                let email = consume_angle_email(registry, cursor);
                let name = join_decoded(&collected);
                consume_trailing(registry, cursor);
                return Some(registry.factory().mailbox(name, email));
            }
            Some(_) => {
                let Some(part) = next_part(registry, cursor, stops) else {
                    break;
                };
                collected.push(part);
            }
        }
    }

    if collected.is_empty() {
        return None;
    }
    // No angle bracket: the collected parts are the address itself.
    let email = assemble_email(&collected);
    Some(registry.factory().mailbox(String::new(), email))
}

/// Consumes `<...>` and assembles the email inside it. A missing `>` is
/// not an error; everything to the end of the element is used.
fn consume_angle_email(registry: &ConsumerRegistry, cursor: &mut Cursor) -> String {
    cursor.advance(); // <

    let mut parts = Vec::new();
    while let Some(part) = next_part(registry, cursor, &['>', ',', ';']) {
        parts.push(part);
    }
    if cursor.peek() == Some('>') {
        cursor.advance();
    }

    assemble_email(&parts)
}

/// Consumes the members of a group after its `:` up to the closing `;`.
fn group_members(registry: &ConsumerRegistry, cursor: &mut Cursor) -> Vec<Mailbox> {
    consume_list(registry, cursor, true)
        .into_iter()
        .filter_map(|part| match part {
            Part::Mailbox(mailbox) => Some(mailbox),
            _ => None,
        })
        .collect()
}

/// Discards anything between a closed angle address and the next element
/// separator.
fn consume_trailing(registry: &ConsumerRegistry, cursor: &mut Cursor) {
    while next_part(registry, cursor, &[',', ';']).is_some() {}
}

/// Assembles an email string from collected parts: comments and whitespace
/// are dropped, quoted content is kept verbatim (minus the quotes), and
/// everything else is concatenated in order.
fn assemble_email(parts: &[Part]) -> String {
    let mut out = String::new();
    for part in parts {
        if part.is_comment() || part.is_separator() {
            continue;
        }
        if let Some(text) = part.text() {
            out.extend(text.chars().filter(|c| !c.is_whitespace()));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::part::AddressGroup;

    fn addresses(value: &str) -> Vec<Part> {
        ConsumerRegistry::new().address_consumer().consume(value)
    }

    fn single_mailbox(value: &str) -> Mailbox {
        let mut parts = addresses(value);
        assert_eq!(parts.len(), 1, "expected one address in {value:?}");
        match parts.remove(0) {
            Part::Mailbox(mailbox) => mailbox,
            part => panic!("expected a mailbox, got {part:?}"),
        }
    }

    fn single_group(value: &str) -> AddressGroup {
        let mut parts = addresses(value);
        assert_eq!(parts.len(), 1, "expected one address in {value:?}");
        match parts.remove(0) {
            Part::Group(group) => group,
            part => panic!("expected a group, got {part:?}"),
        }
    }

    #[test]
    fn test_bare_email() {
        let mailbox = single_mailbox("Max.Payne@AddressUnknown.com");
        assert_eq!(mailbox.name(), "");
        assert_eq!(mailbox.email(), "Max.Payne@AddressUnknown.com");
    }

    #[test]
    fn test_name_and_angle_address() {
        let mailbox = single_mailbox("Max Payne <Max.Payne@AddressUnknown.com>");
        assert_eq!(mailbox.name(), "Max Payne");
        assert_eq!(mailbox.email(), "Max.Payne@AddressUnknown.com");
    }

    #[test]
    fn test_mime_encoded_name() {
        let mailbox = single_mailbox("=?US-ASCII?Q?Kilgore_Trout?= <Kilgore.Trout@Iliyum.ny>");
        assert_eq!(mailbox.name(), "Kilgore Trout");
        assert_eq!(mailbox.email(), "Kilgore.Trout@Iliyum.ny");
    }

    #[test]
    fn test_comments_stripped_from_email() {
        let mailbox = single_mailbox("Max(imum).Payne (comment)@AddressUnknown.com");
        assert_eq!(mailbox.email(), "Max.Payne@AddressUnknown.com");
    }

    #[test]
    fn test_quoted_local_part_keeps_parenthesized_text() {
        let mailbox = single_mailbox("Max\"(imum).Payne (comment)\"@AddressUnknown.com");
        assert_eq!(mailbox.email(), "Max(imum).Payne(comment)@AddressUnknown.com");
    }

    #[test]
    fn test_quoted_local_part_escapes_kept_literally() {
        let mailbox = single_mailbox(r#""max\"payne"@AddressUnknown.com"#);
        assert_eq!(mailbox.email(), "max\"payne@AddressUnknown.com");
    }

    #[test]
    fn test_address_group() {
        let group = single_group(
            "Senate: Caesar@Dictator.com,Cicero@Philosophy.com, Marc Antony <MarcAntony@imawesome.it>",
        );
        assert_eq!(group.name(), "Senate");
        assert_eq!(group.members().len(), 3);
        assert_eq!(group.members()[0].email(), "Caesar@Dictator.com");
        assert_eq!(group.members()[1].email(), "Cicero@Philosophy.com");
        assert_eq!(group.members()[2].name(), "Marc Antony");
        assert_eq!(group.members()[2].email(), "MarcAntony@imawesome.it");
    }

    #[test]
    fn test_group_followed_by_mailbox() {
        let parts = addresses("Senate: Caesar@Dictator.com; Max.Payne@AddressUnknown.com");
        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[0], Part::Group(_)));
        assert!(matches!(parts[1], Part::Mailbox(_)));
    }

    #[test]
    fn test_group_members_are_not_flattened() {
        let parts = addresses("Senate: Caesar@Dictator.com, Cicero@Philosophy.com;");
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_colon_inside_group_is_plain_text() {
        let group = single_group("g: odd:token@x.com;");
        assert_eq!(group.members().len(), 1);
        assert_eq!(group.members()[0].email(), "odd:token@x.com");
    }

    #[test]
    fn test_comma_separated_mailboxes() {
        let parts = addresses("a@x.com, B <b@y.com>");
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            Part::Mailbox(Mailbox::new("B", "b@y.com")),
        );
    }

    #[test]
    fn test_empty_list_elements_are_skipped() {
        let parts = addresses("a@x.com,, ,b@y.com");
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(addresses("").is_empty());
        assert!(addresses("  ").is_empty());
    }

    #[test]
    fn test_no_at_sign_still_yields_mailbox() {
        let mailbox = single_mailbox("not-an-address");
        assert_eq!(mailbox.email(), "not-an-address");
    }

    #[test]
    fn test_unterminated_comment_does_not_swallow_list() {
        let parts = addresses("(unterminated, a@x.com");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], Part::Mailbox(Mailbox::new("", "(unterminated")));
        assert_eq!(parts[1], Part::Mailbox(Mailbox::new("", "a@x.com")));
    }

    #[test]
    fn test_comment_after_angle_address_is_dropped() {
        let mailbox = single_mailbox("Max <max@x.com> (work)");
        assert_eq!(mailbox.name(), "Max");
        assert_eq!(mailbox.email(), "max@x.com");
    }

    #[test]
    fn test_missing_closing_angle_is_best_effort() {
        let mailbox = single_mailbox("Max <max@x.com");
        assert_eq!(mailbox.email(), "max@x.com");
    }

    #[test]
    fn test_quoted_display_name() {
        let mailbox = single_mailbox("\"Payne, Max\" <max@x.com>");
        assert_eq!(mailbox.name(), "Payne, Max");
        assert_eq!(mailbox.email(), "max@x.com");
    }

    #[test]
    fn test_consume_is_idempotent() {
        let input = "Senate: a@x.com; Max <max@x.com>, bare@y.com";
        assert_eq!(addresses(input), addresses(input));
    }
}
