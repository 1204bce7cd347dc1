//! Display snippets for search hits. Purely cosmetic; never used in ranking.

use regex::Regex;

use crate::config::IMAGE_MARKUP_PATTERN;

/// Placeholder standing in for embedded images.
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Marker appended to truncated snippets.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct SnippetBuilder {
    image: Regex,
    max_chars: usize,
}

impl SnippetBuilder {
    pub fn new(max_chars: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            image: Regex::new(IMAGE_MARKUP_PATTERN)?,
            max_chars,
        })
    }

    /// Front matter stripped, images collapsed, whitespace squeezed, then
    /// truncated to `max_chars` characters plus an ellipsis.
    pub fn build(&self, content: &str) -> String {
        let body = strip_front_matter(content);
        let body = self.image.replace_all(body, IMAGE_PLACEHOLDER);
        let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.chars().count() <= self.max_chars {
            return collapsed;
        }

        let cut: String = collapsed.chars().take(self.max_chars).collect();
        format!("{}{}", cut.trim_end(), ELLIPSIS)
    }
}

/// Drop a leading `---` delimited block. Content without a closing
/// delimiter is returned unchanged.
fn strip_front_matter(content: &str) -> &str {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return content;
    };
    if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
        return content;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if offset > line.len() && line.trim_end() == "---" {
            return &rest[offset..];
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_front_matter() {
        let content = "---\ntitle: x\ntags: [a]\n---\nBody text";
        assert_eq!(strip_front_matter(content), "Body text");
    }

    #[test]
    fn test_unclosed_front_matter_is_kept() {
        let content = "---\nnot closed";
        assert_eq!(strip_front_matter(content), content);
    }

    #[test]
    fn test_horizontal_rule_later_is_not_front_matter() {
        let content = "Intro\n---\nMore";
        assert_eq!(strip_front_matter(content), content);
    }

    #[test]
    fn test_snippet_collapses_images_and_whitespace() {
        let builder = SnippetBuilder::new(200).unwrap();
        let snippet = builder.build("Look   at\n\n![fig](http://x/y.png)  here");
        assert_eq!(snippet, "Look at [image] here");
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let builder = SnippetBuilder::new(5).unwrap();
        assert_eq!(builder.build("héllo wörld"), "héllo...");
        assert_eq!(builder.build("short"), "short");
    }
}
