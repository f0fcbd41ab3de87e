// ABOUTME: Operator-facing status lines printed by every command
// ABOUTME: Headers, success/warning/error markers and indented detail lines

/// `=== text ===`
pub fn header(text: &str) {
    println!("=== {} ===", text);
}

pub fn success(text: &str) {
    println!("✓ {}", text);
}

pub fn warning(text: &str) {
    println!("⚠ {}", text);
}

/// Written to stderr
pub fn error(text: &str) {
    eprintln!("✗ {}", text);
}

/// Indented continuation line under a status line
pub fn detail(text: &str) {
    println!("  {}", text);
}
