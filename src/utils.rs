/// Shared text helpers for the news pipeline

/// Text processing utilities
pub mod text {
    /// Strip HTML tags and collapse whitespace
    pub fn strip_html(html: &str) -> String {
        html.chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => (text, true),
                '>' => (text, false),
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Truncate to at most `max_chars` characters, respecting UTF-8 boundaries
    pub fn truncate_chars(s: &str, max_chars: usize) -> String {
        if s.chars().count() <= max_chars {
            s.to_string()
        } else {
            s.chars().take(max_chars).collect()
        }
    }

    /// Extract the first N sentences from text
    pub fn extract_sentences(text: &str, count: usize) -> String {
        let mut sentences = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
                if sentences.len() >= count {
                    break;
                }
            }
        }

        if sentences.len() < count {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
        }

        sentences.join(" ")
    }

    /// Turn a snake_case feed name into a display name ("bbc_world" -> "Bbc World")
    pub fn prettify_source(name: &str) -> String {
        name.split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonical form of a query used for cache keying
    pub fn normalize_query(query: &str) -> String {
        query
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::text::*;

    #[test]
    fn strips_tags_and_whitespace() {
        assert_eq!(strip_html("<p>Hello  <b>world</b></p>\n"), "Hello world");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn extracts_leading_sentences() {
        let text = "One. Two! Three? Four.";
        assert_eq!(extract_sentences(text, 3), "One. Two! Three?");
        assert_eq!(extract_sentences("No terminator here", 3), "No terminator here");
    }

    #[test]
    fn prettifies_feed_names() {
        assert_eq!(prettify_source("bbc_world"), "Bbc World");
        assert_eq!(prettify_source("techcrunch"), "Techcrunch");
    }

    #[test]
    fn normalizes_queries() {
        assert_eq!(normalize_query("  Latest   AI News "), "latest ai news");
    }
}
