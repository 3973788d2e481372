use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Decode a raw line as ISO-8859-1 and trim surrounding whitespace.
///
/// Every byte maps to the code point with the same value, so pages that are
/// not valid UTF-8 still decode.
pub fn decode_line(bytes: &[u8]) -> String {
    let line: String = bytes.iter().map(|&b| char::from(b)).collect();
    line.trim().to_string()
}

/// Compile a line pattern, rejecting it unless it has exactly `groups` capture groups
pub fn compile(pattern: &str, groups: usize) -> Result<Regex> {
    build(&mut RegexBuilder::new(pattern), pattern, groups)
}

/// Like [`compile`], but letters match regardless of case
pub fn compile_ignore_case(pattern: &str, groups: usize) -> Result<Regex> {
    build(
        RegexBuilder::new(pattern).case_insensitive(true),
        pattern,
        groups,
    )
}

fn build(builder: &mut RegexBuilder, pattern: &str, groups: usize) -> Result<Regex> {
    let regex = builder.build()?;
    // captures_len counts the implicit whole-match group
    let found = regex.captures_len() - 1;
    if found != groups {
        return Err(Error::CaptureGroups {
            pattern: pattern.to_string(),
            expected: groups,
            found,
        });
    }
    Ok(regex)
}

/// Extract the first `N` capture groups of `pattern` from `line`.
///
/// The match must begin at the start of the line; it may end anywhere.
/// Returns `None` when the line does not match or when one of the groups did
/// not take part in the match.
pub fn match_line<const N: usize>(line: &str, pattern: &Regex) -> Option<[String; N]> {
    let captures = pattern.captures(line)?;
    // The leftmost match starts at 0 whenever any match does
    if captures.get(0)?.start() != 0 {
        return None;
    }
    let mut groups: [String; N] = std::array::from_fn(|_| String::new());
    for (i, group) in groups.iter_mut().enumerate() {
        *group = captures.get(i + 1)?.as_str().to_string();
    }
    Some(groups)
}
