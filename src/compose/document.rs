//! Document composition.
//!
//! `compose` merges the three source buffers into one standalone
//! renderable page. It is a total pure function over its inputs: any
//! three strings produce a document, identical inputs produce
//! byte-identical output, and no call depends on a previous one.

use super::template::{BODY_CLOSE, HEAD_CLOSE, SCRIPT_PLACEHOLDER, STYLE_PLACEHOLDER};

/// Wrap style content in a style block.
pub fn wrap_style(style: &str) -> String {
    format!("<style>{}</style>", style)
}

/// Wrap script content in a script block.
pub fn wrap_script(script: &str) -> String {
    format!("<script>{}</script>", script)
}

/// Merge the three buffers into one renderable document.
///
/// Insertion precedence, applied independently for the style and the
/// script slot, first match wins:
/// 1. the reserved placeholder comment is replaced with the wrapped
///    content (first occurrence only),
/// 2. otherwise the wrapped content is inserted immediately before the
///    closing-structure anchor (`</head>` for style, `</body>` for
///    script, exact match, first occurrence only),
/// 3. otherwise wrapped style is prepended and wrapped script appended,
///    so the output is always a superset of the markup.
///
/// Style injection runs first; script injection runs on its result.
///
/// # Example
/// ```
/// use triptych::compose::compose;
///
/// let doc = compose(
///     "<html><head></head><body></body></html>",
///     "body{color:red}",
///     "console.log(1)",
/// );
/// assert_eq!(
///     doc,
///     "<html><head><style>body{color:red}</style></head>\
///      <body><script>console.log(1)</script></body></html>",
/// );
/// ```
pub fn compose(markup: &str, style: &str, script: &str) -> String {
    let styled = inject_style(markup, style);
    inject_script(&styled, script)
}

fn inject_style(markup: &str, style: &str) -> String {
    let wrapped = wrap_style(style);
    if markup.contains(STYLE_PLACEHOLDER) {
        markup.replacen(STYLE_PLACEHOLDER, &wrapped, 1)
    } else if markup.contains(HEAD_CLOSE) {
        let insertion = format!("{}{}", wrapped, HEAD_CLOSE);
        markup.replacen(HEAD_CLOSE, &insertion, 1)
    } else {
        format!("{}{}", wrapped, markup)
    }
}

fn inject_script(markup: &str, script: &str) -> String {
    let wrapped = wrap_script(script);
    if markup.contains(SCRIPT_PLACEHOLDER) {
        markup.replacen(SCRIPT_PLACEHOLDER, &wrapped, 1)
    } else if markup.contains(BODY_CLOSE) {
        let insertion = format!("{}{}", wrapped, BODY_CLOSE);
        markup.replacen(BODY_CLOSE, &insertion, 1)
    } else {
        format!("{}{}", markup, wrapped)
    }
}

/// True if the markup already reads as a complete document, meaning it
/// opens with a doctype or an `<html>` root after leading whitespace.
pub fn is_complete_document(markup: &str) -> bool {
    let trimmed = markup.trim_start().to_lowercase();
    trimmed.starts_with("<!doctype") || trimmed.starts_with("<html")
}
