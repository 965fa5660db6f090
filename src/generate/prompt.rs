//! Prompt assembly and response cleanup for code generation.

use crate::generate::provider::{CodeRequest, GenerationTarget};
use crate::session::BufferKind;

/// System prompt for HTML generation.
pub const MARKUP_SYSTEM_PROMPT: &str = "You are an expert HTML developer. \
Generate clean, semantic HTML5 code based on the user's prompt. Include \
proper structure, accessibility attributes, and modern HTML practices. \
Return only the HTML code without explanations or markdown formatting.";

/// System prompt for CSS generation.
pub const STYLE_SYSTEM_PROMPT: &str = "You are an expert CSS developer. \
Generate modern CSS code with proper selectors, flexbox/grid layouts, \
responsive design, and clean styling. Use CSS custom properties when \
appropriate. Return only the CSS code without explanations or markdown \
formatting.";

/// System prompt for JavaScript generation.
pub const SCRIPT_SYSTEM_PROMPT: &str = "You are an expert JavaScript \
developer. Generate clean, modern ES6+ JavaScript code. Use proper error \
handling, modern syntax, and best practices. Return only the JavaScript \
code without explanations or markdown formatting.";

/// Quick prompt suggestions for code generation.
pub const SUGGESTED_CODE_PROMPTS: [&str; 6] = [
    "Create an animated button with a hover effect",
    "Add a responsive contact form",
    "Create a hamburger menu for mobile",
    "Add an image carousel",
    "Create a confirmation modal",
    "Add fade in and fade out effects",
];

/// Quick prompt suggestions for image generation.
pub const SUGGESTED_IMAGE_PROMPTS: [&str; 6] = [
    "Generate a modern logo for a tech company",
    "Create a minimalist icon",
    "Generate a hero section illustration",
    "Create a background pattern",
    "Generate a placeholder avatar",
    "Create an animated loading icon",
];

/// The system prompt appropriate for a pane.
pub fn system_prompt(language: BufferKind) -> &'static str {
    match language {
        BufferKind::Markup => MARKUP_SYSTEM_PROMPT,
        BufferKind::Style => STYLE_SYSTEM_PROMPT,
        BufferKind::Script => SCRIPT_SYSTEM_PROMPT,
    }
}

/// Quick prompt suggestions for a target.
pub fn suggested_prompts(target: GenerationTarget) -> &'static [&'static str] {
    match target {
        GenerationTarget::Image => &SUGGESTED_IMAGE_PROMPTS,
        _ => &SUGGESTED_CODE_PROMPTS,
    }
}

/// Builds the user-facing part of the prompt. When the pane already has
/// code, it is quoted in a fenced block so the model modifies or extends
/// it rather than starting over.
pub fn context_prompt(request: &CodeRequest) -> String {
    if request.current_code.trim().is_empty() {
        return request.prompt.clone();
    }
    let tag = request.language.language_tag();
    format!(
        "Current {} code:\n```{}\n{}\n```\n\nUser request: {}\n\n\
         Please modify or extend the existing code based on the user's \
         request, or create new code if needed.",
        tag.to_uppercase(),
        tag,
        request.current_code,
        request.prompt
    )
}

/// The complete prompt sent to the model: system prompt, blank line,
/// context prompt.
pub fn full_prompt(request: &CodeRequest) -> String {
    format!("{}\n\n{}", system_prompt(request.language), context_prompt(request))
}

/// Strips markdown code fences from a model response.
///
/// Removes every ```` ``` ```` marker together with an optional language
/// tag and the newline that follows it, then trims surrounding whitespace.
/// Fence contents are kept as-is.
pub fn clean_code_fences(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        let tag_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        rest = &rest[tag_len..];
        if let Some(stripped) = rest.strip_prefix('\n') {
            rest = stripped;
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_context_prompt_without_current_code_is_verbatim() {
        let request = CodeRequest::new("make a navbar", BufferKind::Markup);
        assert_eq!(context_prompt(&request), "make a navbar");

        let blank = CodeRequest::new("make a navbar", BufferKind::Markup)
            .with_current_code("   \n  ");
        assert_eq!(context_prompt(&blank), "make a navbar");
    }

    #[test]
    fn test_context_prompt_quotes_existing_code() {
        let request = CodeRequest::new("center the heading", BufferKind::Style)
            .with_current_code("h1 { color: red; }");
        let prompt = context_prompt(&request);

        assert!(prompt.starts_with("Current CSS code:\n```css\nh1 { color: red; }\n```"));
        assert!(prompt.contains("User request: center the heading"));
        assert!(prompt.ends_with("or create new code if needed."));
    }

    #[test]
    fn test_full_prompt_leads_with_system_prompt() {
        let request = CodeRequest::new("validate the form", BufferKind::Script);
        let prompt = full_prompt(&request);
        assert!(prompt.starts_with("You are an expert JavaScript developer."));
        assert!(prompt.ends_with("validate the form"));
    }

    #[test]
    fn test_clean_code_fences_strips_tagged_fence() {
        let raw = "```html\n<p>hi</p>\n```";
        assert_eq!(clean_code_fences(raw), "<p>hi</p>");
    }

    #[test]
    fn test_clean_code_fences_is_case_insensitive_on_tags() {
        let raw = "```CSS\nbody { margin: 0; }\n```";
        assert_eq!(clean_code_fences(raw), "body { margin: 0; }");
    }

    #[test]
    fn test_clean_code_fences_handles_untagged_and_multiple() {
        let raw = "intro\n```\nfirst\n```\nmiddle\n```js\nsecond\n```";
        assert_eq!(clean_code_fences(raw), "intro\nfirst\nmiddle\nsecond");
    }

    #[test]
    fn test_clean_code_fences_leaves_plain_code_alone() {
        assert_eq!(clean_code_fences("  <div></div>  "), "<div></div>");
        assert_eq!(clean_code_fences("a < b"), "a < b");
    }

    #[test]
    fn test_suggestions_differ_by_target() {
        assert_eq!(
            suggested_prompts(GenerationTarget::Style),
            &SUGGESTED_CODE_PROMPTS
        );
        assert_eq!(
            suggested_prompts(GenerationTarget::Image),
            &SUGGESTED_IMAGE_PROMPTS
        );
    }
}
