use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_width` display columns, ending with "...".
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ".".repeat(max_width);
    }

    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let mut result: String = text
        .chars()
        .take_while(|ch| {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                return false;
            }
            used += w;
            true
        })
        .collect();
    result.push_str(ELLIPSIS);
    result
}

/// Collapses newlines and tabs so one value stays on one table row.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shows the first and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
        assert_eq!(truncate_to_width("Hello World!", 8), "Hello...");
        assert_eq!(truncate_to_width("", 5), "");
        assert_eq!(truncate_to_width("Hello", 2), "..");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each CJK character takes two columns.
        let out = truncate_to_width("優惠券折扣活動", 9);
        assert_eq!(out, "優惠券...");
        assert!(out.width() <= 9);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\nb\t c"), "a b c");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("abcd1234efgh5678"), "abcd...5678");
    }
}
