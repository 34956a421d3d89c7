//! Pattern scanning: turns a pattern string into an ordered list of
//! [`RawSegment`]s plus the accumulated parameter-name list, validating
//! placeholder syntax along the way. Mirrors `determinePlaceholder` in the
//! `rdx-router` Go source this crate's semantics are drawn from, translated
//! into a single-pattern two-pass parse (fully parse, then insert) so a
//! syntactically invalid pattern never touches the trie.

use crate::error::RouteError;

#[derive(Debug)]
pub(crate) enum RawSegment {
    Static(String),
    Wild,
    Regex(regex::Regex),
}

/// Parse `pattern` into segments and the leaf's `param_names` list.
/// Performs no trie mutation — every syntactic failure in spec §7 other
/// than `ParamConflict` is caught here.
pub(crate) fn parse_pattern(pattern: &str) -> Result<(Vec<RawSegment>, Vec<String>), RouteError> {
    let mut segments = Vec::new();
    let mut params: Vec<String> = Vec::new();
    let mut rest = pattern;

    loop {
        match scan_one(pattern, rest)? {
            None => {
                if !rest.is_empty() {
                    segments.push(RawSegment::Static(rest.to_string()));
                }
                break;
            }
            Some(Scanned { leading, placeholder, tail }) => {
                if !leading.is_empty() {
                    segments.push(RawSegment::Static(leading.to_string()));
                }
                match placeholder {
                    Placeholder::Wild(name) => {
                        append_param(&mut params, &name)?;
                        segments.push(RawSegment::Wild);
                    }
                    Placeholder::Regex(name, expr) => {
                        append_param(&mut params, &name)?;
                        let compiled = regex::Regex::new(&expr)
                            .map_err(|e| RouteError::RegexCompile(expr.clone(), e))?;
                        segments.push(RawSegment::Regex(compiled));
                    }
                }
                rest = tail;
            }
        }
    }

    Ok((segments, params))
}

struct Scanned<'a> {
    leading: &'a str,
    placeholder: Placeholder,
    tail: &'a str,
}

enum Placeholder {
    Wild(String),
    Regex(String, String),
}

/// Valid iff `''`, `'*'`, or `[A-Za-z0-9_]+(-[A-Za-z0-9_]+)*`.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name == "*" {
        return true;
    }
    name.split('-')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'))
}

fn append_param(params: &mut Vec<String>, raw_name: &str) -> Result<(), RouteError> {
    if !is_valid_name(raw_name) {
        return Err(RouteError::InvalidName(raw_name.to_string()));
    }
    let normalized = if raw_name.is_empty() || raw_name == "*" { String::new() } else { raw_name.to_string() };
    if !normalized.is_empty() && params.iter().any(|p| p == &normalized) {
        return Err(RouteError::DuplicateName(normalized));
    }
    params.push(normalized);
    Ok(())
}

/// Scan `s` (a suffix of the full `pattern`, used only for error messages)
/// for the next placeholder. `Ok(None)` means `s` contains no placeholder
/// and is pure literal text (including the permissive fallback the original
/// source uses for an unterminated `{`: it silently reverts to static text
/// rather than erroring).
fn scan_one<'a>(pattern: &str, s: &'a str) -> Result<Option<Scanned<'a>>, RouteError> {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    let mut braces_pos: Option<usize> = None;

    // Phase 1: find a legal placeholder start.
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if i == 0 || bytes[i - 1] != b'/' {
                return Err(RouteError::PlaceholderPosition(pattern.to_string()));
            }
            braces_pos = Some(i);
            break;
        }
        i += 1;
    }
    let Some(braces_pos) = braces_pos else {
        return Ok(None);
    };

    // Phase 2: scan the name up to ':' or '}'. Delimiters are ASCII, so the
    // byte positions found here are always valid `str` boundaries and the
    // name/expr text below is taken as verbatim slices of `s` rather than
    // rebuilt byte-by-byte (which would corrupt multi-byte UTF-8 content).
    let name_start = braces_pos + 1;
    let mut j = name_start;
    let mut is_regex = false;
    while j < bytes.len() {
        match bytes[j] {
            b':' => {
                is_regex = true;
                break;
            }
            b'}' => break,
            _ => j += 1,
        }
    }
    let name = &s[name_start..j];

    if !is_regex {
        // Either we hit '}' (wild placeholder) or ran off the end.
        if j >= bytes.len() || bytes[j] != b'}' {
            // Unterminated placeholder: fall back to treating the whole
            // remainder as a literal run, matching the original source.
            return Ok(None);
        }
        let end = j;
        check_closing(pattern, s, end)?;
        let tail = &s[end + 1..];
        let leading = &s[..braces_pos];
        return Ok(Some(Scanned { leading, placeholder: Placeholder::Wild(name.to_string()), tail }));
    }

    // Phase 3: scan the regex body, tracking brace nesting and backslash
    // escapes purely to locate the terminating unescaped '}' — the body
    // text itself is copied verbatim via a slice, nothing is transformed.
    let expr_start = j + 1; // skip ':'
    let mut k = expr_start;
    let mut stack = 0i32;
    let mut backslash_open = false;
    let mut end = None;
    while k < bytes.len() {
        let b = bytes[k];
        if b == b'{' && !backslash_open {
            stack += 1;
        } else if b == b'}' && !backslash_open {
            if stack == 0 {
                end = Some(k);
                break;
            }
            stack -= 1;
        } else if backslash_open {
            backslash_open = false;
        } else if b == b'\\' {
            backslash_open = true;
        }
        k += 1;
    }
    let Some(end) = end else {
        // Unterminated regex body: same permissive fallback as the wild case.
        return Ok(None);
    };
    if end == expr_start {
        return Err(RouteError::EmptyRegex(pattern.to_string()));
    }
    check_closing(pattern, s, end)?;
    let expr = &s[expr_start..end];
    let tail = &s[end + 1..];
    let leading = &s[..braces_pos];
    Ok(Some(Scanned { leading, placeholder: Placeholder::Regex(name.to_string(), expr.to_string()), tail }))
}

/// `}` must be at the end of the pattern or immediately before `/`.
fn check_closing(pattern: &str, s: &str, end: usize) -> Result<(), RouteError> {
    let bytes = s.as_bytes();
    if end + 1 != bytes.len() && bytes[end + 1] != b'/' {
        return Err(RouteError::PlaceholderPosition(pattern.to_string()));
    }
    Ok(())
}

/// Collapse runs of `/` in a literal run to a single `/`. Applied at insert
/// time, not here, so `RawSegment::Static` text is exactly the substring the
/// parser produced — but exposed here since both the parser's tests and
/// `insert` need it.
pub(crate) fn collapse_slashes(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut prev_slash = false;
    for c in literal.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pattern: &str) -> Vec<String> {
        parse_pattern(pattern).unwrap().1
    }

    #[test]
    fn static_only() {
        let (segs, params) = parse_pattern("/abc/def").unwrap();
        assert_eq!(segs.len(), 1);
        assert!(params.is_empty());
        match &segs[0] {
            RawSegment::Static(s) => assert_eq!(s, "/abc/def"),
            _ => panic!(),
        }
    }

    #[test]
    fn wild_segment() {
        let (segs, params) = parse_pattern("/path/{param}").unwrap();
        assert_eq!(params, vec!["param".to_string()]);
        assert!(matches!(segs[1], RawSegment::Wild));
    }

    #[test]
    fn regex_segment() {
        let (segs, params) = parse_pattern("/path/{id:[0-9]+}").unwrap();
        assert_eq!(params, vec!["id".to_string()]);
        match &segs[1] {
            RawSegment::Regex(re) => assert_eq!(re.as_str(), "[0-9]+"),
            _ => panic!(),
        }
    }

    #[test]
    fn star_and_empty_names_dont_bind() {
        assert_eq!(names("/a/{}/b/{*}"), vec!["".to_string(), "".to_string()]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = parse_pattern("/{a}/{a}").unwrap_err();
        assert!(matches!(err, RouteError::DuplicateName(_)));
    }

    #[test]
    fn invalid_name_rejected() {
        let err = parse_pattern("/{a b}").unwrap_err();
        assert!(matches!(err, RouteError::InvalidName(_)));
    }

    #[test]
    fn placeholder_must_follow_slash() {
        let err = parse_pattern("/a{b}").unwrap_err();
        assert!(matches!(err, RouteError::PlaceholderPosition(_)));
    }

    #[test]
    fn placeholder_at_start_is_rejected() {
        // The original source panics when `{` is at position 0 too —
        // preserved here (see SPEC_FULL.md §4.1).
        let err = parse_pattern("{a}/b").unwrap_err();
        assert!(matches!(err, RouteError::PlaceholderPosition(_)));
    }

    #[test]
    fn closing_brace_must_precede_slash() {
        let err = parse_pattern("/{a}b").unwrap_err();
        assert!(matches!(err, RouteError::PlaceholderPosition(_)));
    }

    #[test]
    fn empty_regex_rejected() {
        let err = parse_pattern("/{a:}").unwrap_err();
        assert!(matches!(err, RouteError::EmptyRegex(_)));
    }

    #[test]
    fn nested_braces_and_escapes_in_regex() {
        let (segs, _) = parse_pattern(r"/{a:\{[0-9]{2}\}}").unwrap();
        match &segs[1] {
            RawSegment::Regex(re) => assert_eq!(re.as_str(), r"\{[0-9]{2}\}"),
            _ => panic!(),
        }
    }

    #[test]
    fn collapses_duplicate_slashes() {
        assert_eq!(collapse_slashes("/abc//def///g"), "/abc/def/g");
    }
}
