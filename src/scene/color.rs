//! Hex color helpers

/// Background swatches offered by the toolbar
pub const BACKGROUND_PRESETS: [&str; 6] = [
    "#1e293b", // Slate
    "#0f172a", // Dark blue
    "#1e1b4b", // Indigo
    "#3b0764", // Purple
    "#1a2e05", // Forest
    "#450a0a", // Dark red
];

/// Normalize user input to `#rrggbb`.
///
/// Accepts `#rgb`, `#rrggbb`, with or without the leading `#`, any case,
/// surrounding whitespace ignored. Returns `None` for anything else.
pub fn normalize_hex(input: &str) -> Option<String> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}
