//! Text hygiene for generated requirement statements.

/// Longest statement written anywhere.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Remove markup and formula-like fragments, trim, and cap the length.
///
/// Strips `<` and `>`, any case of `javascript:`, and `=name(` sequences
/// that a spreadsheet would evaluate as a formula.
pub fn sanitize_text(input: &str) -> String {
    let no_angles: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let no_scheme = remove_ascii_case_insensitive(&no_angles, "javascript:");
    let no_formula = remove_formula_calls(&no_scheme);
    no_formula.trim().chars().take(MAX_TEXT_CHARS).collect()
}

fn remove_ascii_case_insensitive(haystack: &str, needle: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(found) = lower[pos..].find(needle) {
        out.push_str(&haystack[pos..pos + found]);
        pos += found + needle.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

/// Drop every `=` immediately followed by one or more word characters and
/// an opening parenthesis.
fn remove_formula_calls(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '=' {
            let mut j = i + 1;
            while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            if j > i + 1 && j < chars.len() && chars[j] == '(' {
                i = j + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_scripts() {
        assert_eq!(sanitize_text("  <b>Hei</b> "), "bHei/b");
        assert_eq!(sanitize_text("JavaScript:alert(1)"), "alert(1)");
    }

    #[test]
    fn strips_formula_calls_only() {
        assert_eq!(sanitize_text("=IMPORTXML(x) a = b"), "x) a = b");
        assert_eq!(sanitize_text("a == (b)"), "a == (b)");
    }

    #[test]
    fn caps_length() {
        let long = "x".repeat(MAX_TEXT_CHARS + 10);
        assert_eq!(sanitize_text(&long).chars().count(), MAX_TEXT_CHARS);
    }
}
