//! Parsing of Make-style dependency files.
//!
//! GCC-compatible compilers emit, via `-MMD -MF`, a fragment of Makefile
//! syntax naming everything a compilation read:
//!
//! ```make
//! build/obj/main.o: src/main.c include/util.h \
//!  include/log.h
//! ```
//!
//! This module extracts the prerequisite paths from that syntax, handling
//! backslash-newline continuations, escaped spaces in paths, `$$` dollar
//! escapes, and the empty phony rules `-MP` appends for each header.

use std::path::PathBuf;

/// Parses depfile text into the prerequisite paths of its first rule.
///
/// Prerequisites are returned sorted and deduplicated; order in a depfile
/// carries no meaning. Subsequent rules (the phony targets emitted by `-MP`)
/// are ignored. Returns an empty vector if the text contains no rule.
pub fn parse(text: &str) -> Vec<PathBuf> {
    let mut deps: Vec<PathBuf> = Vec::new();
    let mut seen_target = false;

    for token in tokenize(text) {
        if !seen_target {
            if token.ends_with(':') {
                seen_target = true;
            }
            continue;
        }
        if token.ends_with(':') {
            // Start of the next rule; the first rule's prerequisites are done.
            break;
        }
        deps.push(PathBuf::from(token));
    }

    deps.sort();
    deps.dedup();
    deps
}

/// Splits depfile text into whitespace-separated tokens, resolving escapes.
///
/// `\<newline>` is a continuation and acts as whitespace; `\ `, `\\`, `\#`
/// produce the literal character; `$$` produces `$`. Any other backslash is
/// kept as-is (it may be part of a path on some systems).
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some('\n') => {
                    chars.next();
                    flush(&mut current, &mut tokens);
                }
                Some('\r') => {
                    chars.next();
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    flush(&mut current, &mut tokens);
                }
                Some(' ') => {
                    chars.next();
                    current.push(' ');
                }
                Some('\\') => {
                    chars.next();
                    current.push('\\');
                }
                Some('#') => {
                    chars.next();
                    current.push('#');
                }
                _ => current.push('\\'),
            },
            '$' if chars.peek() == Some(&'$') => {
                chars.next();
                current.push('$');
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn single_line_rule() {
        let deps = parse("build/obj/main.o: src/main.c include/util.h\n");
        assert_eq!(deps, paths(&["include/util.h", "src/main.c"]));
    }

    #[test]
    fn continuation_lines() {
        let deps = parse("main.o: main.c util.h \\\n log.h \\\n  net.h\n");
        assert_eq!(deps, paths(&["log.h", "main.c", "net.h", "util.h"]));
    }

    #[test]
    fn space_before_colon() {
        let deps = parse("main.o : main.c\n");
        assert_eq!(deps, paths(&["main.c"]));
    }

    #[test]
    fn escaped_space_in_path() {
        let deps = parse("main.o: my\\ dir/main.c\n");
        assert_eq!(deps, paths(&["my dir/main.c"]));
    }

    #[test]
    fn phony_rules_from_mp_ignored() {
        let text = "main.o: main.c util.h\n\nutil.h:\n";
        assert_eq!(parse(text), paths(&["main.c", "util.h"]));
    }

    #[test]
    fn duplicates_removed() {
        let deps = parse("main.o: main.c util.h util.h main.c\n");
        assert_eq!(deps, paths(&["main.c", "util.h"]));
    }

    #[test]
    fn dollar_escape() {
        let deps = parse("main.o: weird$$name.c\n");
        assert_eq!(deps, paths(&["weird$name.c"]));
    }

    #[test]
    fn crlf_continuations() {
        let deps = parse("main.o: main.c \\\r\n util.h\r\n");
        assert_eq!(deps, paths(&["main.c", "util.h"]));
    }

    #[test]
    fn empty_input_has_no_deps() {
        assert!(parse("").is_empty());
        assert!(parse("   \n").is_empty());
    }

    #[test]
    fn rule_with_no_prerequisites() {
        assert!(parse("main.o:\n").is_empty());
    }
}
