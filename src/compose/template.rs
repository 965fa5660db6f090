//! Session starter templates and placeholder markers.
//!
//! New editing sessions begin from these three buffers. The markup
//! template carries one reserved placeholder comment per slot; the
//! composer consumes them during injection, so composed output never
//! contains a placeholder and repeated composition cannot duplicate
//! anything.

/// Reserved placeholder for the style slot. Lives in the markup
/// template only, never in composed output.
pub const STYLE_PLACEHOLDER: &str = "<!-- triptych:style -->";

/// Reserved placeholder for the script slot.
pub const SCRIPT_PLACEHOLDER: &str = "<!-- triptych:script -->";

/// Closing-structure anchor used when no style placeholder is present.
/// Matched exactly and case-sensitively.
pub const HEAD_CLOSE: &str = "</head>";

/// Closing-structure anchor used when no script placeholder is present.
pub const BODY_CLOSE: &str = "</body>";

/// Default markup buffer for a fresh session.
pub const DEFAULT_MARKUP: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Project</title>
    <!-- triptych:style -->
</head>
<body>
    <div class="container">
        <h1>Hello World!</h1>
        <p>This is an example HTML page.</p>
        <button onclick="greet()">Click me</button>
    </div>
    <!-- triptych:script -->
</body>
</html>"#;

/// Default style buffer for a fresh session.
pub const DEFAULT_STYLE: &str = r#"/* Stylesheet */
.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
    font-family: Arial, sans-serif;
}

h1 {
    color: #333;
    text-align: center;
}

p {
    color: #666;
    line-height: 1.6;
}

button {
    background: #007bff;
    color: white;
    border: none;
    padding: 10px 20px;
    border-radius: 5px;
    cursor: pointer;
    transition: background 0.3s;
}

button:hover {
    background: #0056b3;
}"#;

/// Default script buffer for a fresh session.
pub const DEFAULT_SCRIPT: &str = r#"// Script
function greet() {
    alert('Button clicked!');
}

document.addEventListener('DOMContentLoaded', function() {
    console.log('Page loaded!');

    const buttons = document.querySelectorAll('button');
    buttons.forEach(button => {
        button.addEventListener('mouseover', function() {
            this.style.transform = 'scale(1.05)';
        });

        button.addEventListener('mouseout', function() {
            this.style.transform = 'scale(1)';
        });
    });
});"#;

/// True if the markup still carries the reserved style placeholder.
pub fn has_style_placeholder(markup: &str) -> bool {
    markup.contains(STYLE_PLACEHOLDER)
}

/// True if the markup still carries the reserved script placeholder.
pub fn has_script_placeholder(markup: &str) -> bool {
    markup.contains(SCRIPT_PLACEHOLDER)
}
