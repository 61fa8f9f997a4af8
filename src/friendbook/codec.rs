//! # Record Line Codec
//!
//! Every data file is a list of records, one per line, with fields separated by `|`.
//! Some fields are themselves lists, joined with `,`.
//!
//! Both separators are escaped with a backslash so that user content (post text,
//! messages, even usernames) can contain any character without corrupting the file:
//!
//! ```text
//! field:  a|b\c<newline>d   ->   a\|b\\c\nd
//! list:   ["x,y", "z"]      ->   x\,y,z
//! ```
//!
//! A list is escaped at the list level first and then again as a record field, so
//! decoding is the mirror image: split the record, then split the list.

use chrono::{DateTime, Utc};

pub const FIELD_SEP: char = '|';
pub const LIST_SEP: char = ',';

fn escape_with(value: &str, sep: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == sep => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn split_with(value: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => current.push(other),
                None => current.push('\\'),
            }
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Joins fields into one record line.
pub fn join_record<I, T>(fields: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape_with(f.as_ref(), FIELD_SEP))
        .collect::<Vec<_>>()
        .join("|")
}

/// Splits a record line into its unescaped fields.
pub fn split_record(line: &str) -> Vec<String> {
    split_with(line, FIELD_SEP)
}

/// Joins list items into a single field value. No trailing separator.
pub fn join_list<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    items
        .into_iter()
        .map(|i| escape_with(i.as_ref(), LIST_SEP))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a list field. Empty tokens are dropped, which also absorbs the trailing
/// comma older files carry.
pub fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    split_with(field, LIST_SEP)
        .into_iter()
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn encode_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub fn decode_flag(field: &str) -> Option<bool> {
    match field.trim() {
        "1" | "true" => Some(true),
        "0" | "false" | "" => Some(false),
        _ => None,
    }
}

pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Accepts RFC 3339 as well as bare unix seconds, which is what older data files hold.
pub fn decode_timestamp(field: &str) -> Option<DateTime<Utc>> {
    let field = field.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(field) {
        return Some(ts.with_timezone(&Utc));
    }
    field
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_survives_separators_in_content() {
        let fields = ["alice", "hello | world", "back\\slash", "two\nlines"];
        let line = join_record(fields);
        assert!(!line.contains('\n'));
        assert_eq!(split_record(&line), fields);
    }

    #[test]
    fn list_inside_record() {
        let items = vec!["a,b".to_string(), "c|d".to_string(), "e".to_string()];
        let line = join_record(["x", join_list(&items).as_str()]);
        let fields = split_record(&line);
        assert_eq!(fields.len(), 2);
        assert_eq!(split_list(&fields[1]), items);
    }

    #[test]
    fn trailing_list_separator_is_ignored() {
        assert_eq!(split_list("bob,carol,"), vec!["bob", "carol"]);
        assert!(split_list("").is_empty());
        assert!(split_list(",").is_empty());
    }

    #[test]
    fn empty_fields_are_kept() {
        assert_eq!(split_record("a||b"), vec!["a", "", "b"]);
        assert_eq!(split_record(""), vec![""]);
    }

    #[test]
    fn timestamps_accept_unix_seconds() {
        let ts = decode_timestamp("1700000000").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);

        let now = Utc::now();
        let back = decode_timestamp(&encode_timestamp(&now)).unwrap();
        assert_eq!(back, now);

        assert!(decode_timestamp("yesterday").is_none());
    }

    #[test]
    fn flags() {
        assert_eq!(decode_flag(encode_flag(true)), Some(true));
        assert_eq!(decode_flag("0"), Some(false));
        assert_eq!(decode_flag("maybe"), None);
    }
}
