//! Requirements input cleaning

/// Trim raw requirements; blank input yields `None`
pub fn clean_requirements(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
