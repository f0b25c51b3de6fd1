//! Value cleaning for SQLite string literals.
//!
//! Sigma values use `*` and `?` as wildcards with `\` as the escape
//! character. [`clean_value`] turns one raw value into text that can sit
//! between single quotes and be used with `LIKE ... ESCAPE '\'`. It must run
//! exactly once per value: the output is not a fixed point.

use once_cell::sync::Lazy;
use regex::Regex;

/// An escaped `*`, `?` or `\`, or any bare wildcard character (SQL or rule style)
static WILDCARD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\\[*?\\])|[*?_%]").unwrap());

/// Clean a raw rule value. Steps run in this order:
///
/// 1. `'` is doubled
/// 2. a lone `\` not in front of `\`, `*` or `?` is doubled
/// 3. `_` becomes `\_`
/// 4. `%` becomes `\%`
/// 5. unescaped `*` becomes `%`
/// 6. unescaped `?` becomes `_`
///
/// A wildcard is unescaped when the run of backslashes directly in front of
/// it has even length.
pub fn clean_value(raw: &str) -> String {
    let value = raw.replace('\'', "''");
    let value = double_lone_backslashes(&value);
    let value = value.replace('_', "\\_");
    let value = value.replace('%', "\\%");
    let value = replace_unescaped(&value, '*', '%');
    replace_unescaped(&value, '?', '_')
}

/// True if cleaned text still carries wildcard or escape syntax.
pub fn has_wildcard(cleaned: &str) -> bool {
    WILDCARD_RE.is_match(cleaned)
}

fn double_lone_backslashes(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    for (i, &c) in chars.iter().enumerate() {
        let after_backslash = i > 0 && chars[i - 1] == '\\';
        let escapes_next = matches!(chars.get(i + 1), Some('\\' | '*' | '?'));
        if c == '\\' && !after_backslash && !escapes_next {
            out.push_str("\\\\");
        } else {
            out.push(c);
        }
    }

    out
}

fn replace_unescaped(value: &str, wildcard: char, replacement: char) -> String {
    let mut out = String::with_capacity(value.len());
    let mut backslashes = 0usize;

    for c in value.chars() {
        if c == wildcard && backslashes % 2 == 0 {
            out.push(replacement);
        } else {
            out.push(c);
        }

        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
    }

    out
}
