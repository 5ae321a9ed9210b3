/// Removes Markdown code fences that models like to wrap JSON in.
///
/// Every "```json" and "```" is dropped, wherever it appears, then the result is trimmed.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
