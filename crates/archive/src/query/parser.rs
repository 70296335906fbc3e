//! Search box query parser
//!
//! Parses archive searches with operators like:
//! - `is:starred`, `is:unstarred` - starred filter
//! - `status:sent`, `status:received`, `status:draft` - origin mailbox
//! - `type:academic` - message type
//! - `priority:high` - priority
//! - `course:CS201` or `course:"CS 201"` - course code
//! - `sort:priority` - ordering (see [`SortKey`])
//!
//! Everything else is free text, matched against subject, content,
//! counterpart name and tags.

use super::{QuerySpec, SortKey, StarFilter};

const OPERATORS: [&str; 6] = ["is", "status", "type", "priority", "course", "sort"];

/// Parse a search string into a [`QuerySpec`]
///
/// Operators with unknown keys or invalid values are kept as free text, so
/// nothing the user typed is silently dropped. Free-text words are joined
/// with single spaces.
pub fn parse_query(input: &str) -> QuerySpec {
    parse_query_with(QuerySpec::default(), input)
}

/// Parse a search string on top of `base`
///
/// Operators in `input` replace the matching fields of `base`; fields the
/// input does not mention keep their `base` values.
pub fn parse_query_with(base: QuerySpec, input: &str) -> QuerySpec {
    let mut spec = base;
    let mut terms: Vec<String> = Vec::new();

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        // Skip whitespace
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }

        let rest: String = chars[i..].iter().collect();

        if let Some((key, value, consumed)) = parse_operator(&rest)
            && apply_operator(&mut spec, &key, &value)
        {
            i += consumed;
            continue;
        }

        let (word, consumed) = parse_word(&rest);
        if !word.is_empty() {
            terms.push(word);
        }
        i += consumed;
    }

    if !terms.is_empty() {
        spec.search_text = Some(terms.join(" "));
    }
    spec
}

/// Apply a parsed operator; returns false if the value is not recognised
fn apply_operator(spec: &mut QuerySpec, key: &str, value: &str) -> bool {
    match key {
        "is" => match value.to_lowercase().as_str() {
            "starred" => spec.starred = StarFilter::Starred,
            "unstarred" => spec.starred = StarFilter::Unstarred,
            _ => return false,
        },
        "status" => match value.parse() {
            Ok(status) => spec.status = Some(status),
            Err(_) => return false,
        },
        "type" => match value.parse() {
            Ok(message_type) => spec.message_type = Some(message_type),
            Err(_) => return false,
        },
        "priority" => match value.parse() {
            Ok(priority) => spec.priority = Some(priority),
            Err(_) => return false,
        },
        "course" => spec.course = Some(value.to_string()),
        "sort" => match value.parse::<SortKey>() {
            Ok(sort) => spec.sort = sort,
            Err(_) => return false,
        },
        _ => return false,
    }
    true
}

/// Parse an operator like "course:CS201" or "course:\"CS 201\""
///
/// Returns the lowercased key, the value and the number of chars consumed.
fn parse_operator(input: &str) -> Option<(String, String, usize)> {
    let colon_pos = input.find(':')?;
    let key = &input[..colon_pos];

    // Key must not contain whitespace
    if key.chars().any(|c| c.is_whitespace()) {
        return None;
    }

    let key = key.to_lowercase();
    if !OPERATORS.contains(&key.as_str()) {
        return None;
    }

    let after_colon = &input[colon_pos + 1..];
    let (value, value_len) = parse_quoted_or_bare(after_colon);

    // Don't match if value is empty
    if value.is_empty() {
        return None;
    }

    let consumed = input[..colon_pos].chars().count() + 1 + value_len;
    Some((key, value, consumed))
}

/// Parse a word or quoted phrase
fn parse_word(input: &str) -> (String, usize) {
    parse_quoted_or_bare(input)
}

/// Read a quoted phrase or a run of non-whitespace characters
///
/// Returns the text and the number of chars consumed.
fn parse_quoted_or_bare(input: &str) -> (String, usize) {
    let chars: Vec<char> = input.chars().collect();

    if chars.is_empty() {
        return (String::new(), 0);
    }

    if chars[0] == '"' {
        let mut value = String::new();
        let mut i = 1;
        while i < chars.len() && chars[i] != '"' {
            value.push(chars[i]);
            i += 1;
        }
        let consumed = if i < chars.len() { i + 1 } else { i };
        return (value, consumed);
    }

    let mut value = String::new();
    let mut i = 0;
    while i < chars.len() && !chars[i].is_whitespace() {
        value.push(chars[i]);
        i += 1;
    }

    (value, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageStatus, MessageType, Priority};

    #[test]
    fn test_parse_simple_query() {
        let spec = parse_query("midterm review");
        assert_eq!(spec.search_text.as_deref(), Some("midterm review"));
        assert!(spec.status.is_none());
    }

    #[test]
    fn test_parse_quoted_phrase() {
        let spec = parse_query("\"grade   review\"");
        assert_eq!(spec.search_text.as_deref(), Some("grade   review"));
    }

    #[test]
    fn test_parse_is_starred() {
        assert_eq!(parse_query("is:starred").starred, StarFilter::Starred);
        assert_eq!(parse_query("is:unstarred").starred, StarFilter::Unstarred);
    }

    #[test]
    fn test_parse_kind_operators() {
        let spec = parse_query("status:draft type:Administrative priority:HIGH");
        assert_eq!(spec.status, Some(MessageStatus::Draft));
        assert_eq!(spec.message_type, Some(MessageType::Administrative));
        assert_eq!(spec.priority, Some(Priority::High));
        assert!(spec.search_text.is_none());
    }

    #[test]
    fn test_parse_quoted_course() {
        let spec = parse_query("course:\"CS 201\" notes");
        assert_eq!(spec.course.as_deref(), Some("CS 201"));
        assert_eq!(spec.search_text.as_deref(), Some("notes"));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_query("sort:priority").sort, SortKey::PriorityDesc);
        assert_eq!(parse_query("sort:subject-desc").sort, SortKey::SubjectDesc);
        assert_eq!(parse_query("").sort, SortKey::ArchivedDesc);
    }

    #[test]
    fn test_parse_with_keeps_base_sort() {
        let base = QuerySpec::sorted_by(SortKey::PriorityDesc);
        assert_eq!(parse_query_with(base.clone(), "lab").sort, SortKey::PriorityDesc);
        assert_eq!(
            parse_query_with(base, "sort:archived").sort,
            SortKey::ArchivedDesc
        );
    }

    #[test]
    fn test_parse_mixed_query() {
        let spec = parse_query("is:starred lab course:CS301 equipment");
        assert_eq!(spec.starred, StarFilter::Starred);
        assert_eq!(spec.course.as_deref(), Some("CS301"));
        assert_eq!(spec.search_text.as_deref(), Some("lab equipment"));
    }

    #[test]
    fn test_parse_empty_query() {
        assert!(parse_query("").has_no_filters());
        assert!(parse_query("   ").has_no_filters());
    }

    #[test]
    fn test_unknown_operator_is_text() {
        let spec = parse_query("foo:bar");
        assert_eq!(spec.search_text.as_deref(), Some("foo:bar"));
    }

    #[test]
    fn test_invalid_value_is_text() {
        let spec = parse_query("priority:urgent");
        assert!(spec.priority.is_none());
        assert_eq!(spec.search_text.as_deref(), Some("priority:urgent"));
    }

    #[test]
    fn test_operator_with_empty_value() {
        let spec = parse_query("course: CS201");
        assert!(spec.course.is_none());
        assert_eq!(spec.search_text.as_deref(), Some("course: CS201"));
    }

    #[test]
    fn test_non_ascii_before_operator() {
        let spec = parse_query("résumé is:starred");
        assert_eq!(spec.starred, StarFilter::Starred);
        assert_eq!(spec.search_text.as_deref(), Some("résumé"));
    }
}
