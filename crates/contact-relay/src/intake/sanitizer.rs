//! Regex cascade that strips markup and script constructs from free text.
//!
//! The cascade is not an HTML parser. Crafted inputs can still defeat individual
//! passes, so the whole cascade is re-applied until the text stops changing;
//! that keeps the output stable under re-sanitization even when a removal glues
//! two fragments into a new match (`javajavascript:script:`).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Elements removed together with everything up to their first closing tag.
pub(crate) const BLOCK_ELEMENTS: [&str; 6] = ["script", "iframe", "object", "embed", "link", "style"];

struct Pass {
    pattern: Regex,
    replacement: &'static str,
}

impl Pass {
    fn strip(pattern: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid sanitizer pattern"),
            replacement: "",
        }
    }
}

static CASCADE: LazyLock<Vec<Pass>> = LazyLock::new(|| {
    let mut passes: Vec<Pass> = BLOCK_ELEMENTS
        .iter()
        .map(|element| Pass::strip(&format!(r"(?is)<{element}\b.*?</{element}>")))
        .collect();

    passes.extend(
        [
            // quoted handlers first so the unquoted pass does not leave a dangling value
            r#"(?i)on[a-z0-9_]+\s*=\s*["'][^"']*["']"#,
            r"(?i)on[a-z0-9_]+\s*=\s*[^\s>]*",
            r"(?i)javascript:",
            r"(?i)data:text/html",
            r"(?i)vbscript:",
            r"(?i)&lt;script",
            r"(?i)&lt;iframe",
            r"(?i)eval\s*\(",
            r"(?i)Function\s*\(",
            r"<[^>]+>",
        ]
        .into_iter()
        .map(Pass::strip),
    );

    passes.push(Pass {
        pattern: Regex::new(r"\s+").expect("valid whitespace pattern"),
        replacement: " ",
    });

    passes
});

/// Cleans one free-text field. Never fails; empty input yields an empty string.
pub fn sanitize(input: &str) -> String {
    let mut current = clean_once(input);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(input: &str) -> String {
    let mut text = Cow::Borrowed(input.trim());
    for pass in CASCADE.iter() {
        if let Cow::Owned(replaced) = pass.pattern.replace_all(&text, pass.replacement) {
            text = Cow::Owned(replaced);
        }
    }
    text.trim().to_string()
}
