//! Code-fence stripping for provider output.

/// Strips wrapping markdown code fences from completion text.
///
/// Providers frequently return the completion wrapped in ``` fences with an
/// optional language tag on the opening line. Unfenced text is returned
/// unchanged, including its whitespace.
pub fn strip_code_fences(text: &str) -> String {
	let trimmed = text.trim();
	if !trimmed.starts_with("```") {
		return text.to_string();
	}
	let mut body = &trimmed[3..];
	if let Some(inner) = body.strip_suffix("```") {
		body = inner;
	}
	// The opening fence may carry a language tag up to the first newline.
	if let Some(idx) = body.find('\n') {
		let tag = &body[..idx];
		if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+') {
			body = &body[idx + 1..];
		}
	}
	body.trim_matches('\n').to_string()
}
