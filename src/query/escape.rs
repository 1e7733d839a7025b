//! Escaping of user terms embedded in Solr query strings.
//!
//! Both modes insert a backslash before every character of a set. Quotes the
//! caller wraps around the result are never touched.

/// Characters with a meaning in the Solr standard query syntax.
///
/// The backslash is included so a user backslash cannot cancel an inserted
/// escape.
pub const SOLR_SPECIAL_CHARS: &[char] = &[
    '\\', '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':',
    '/',
];

/// Regular expression metacharacters.
pub const REGEX_SPECIAL_CHARS: &[char] = &[
    '.', '\\', '+', '*', '?', '[', '^', ']', '$', '(', ')', '{', '}', '=', '!', '<', '>', '|',
    ':', '-', '#',
];

/// Escape a term for the Solr query syntax.
///
/// ```
/// use solr_querier::query::escape::escape;
///
/// assert_eq!(escape("C++ (2nd ed.)"), r"C\+\+ \(2nd ed.\)");
/// ```
pub fn escape(term: &str) -> String {
    escape_chars(term, |c| SOLR_SPECIAL_CHARS.contains(&c))
}

/// Escape a literal segment of a `/regex/` term.
///
/// Covers the Solr set as well as regex metacharacters, so `/` cannot close
/// the expression early.
///
/// ```
/// use solr_querier::query::escape::escape_pattern;
///
/// assert_eq!(escape_pattern("a.b/c"), r"a\.b\/c");
/// ```
pub fn escape_pattern(term: &str) -> String {
    escape_chars(term, |c| {
        SOLR_SPECIAL_CHARS.contains(&c) || REGEX_SPECIAL_CHARS.contains(&c)
    })
}

/// Quote a facet value, escaping embedded double quotes.
pub fn enclose(value: &str) -> String {
    let mut enclosed = String::with_capacity(value.len() + 2);
    enclosed.push('"');
    enclosed.push_str(&escape_chars(value, |c| c == '"'));
    enclosed.push('"');
    enclosed
}

fn escape_chars(term: &str, special: impl Fn(char) -> bool) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if special(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
