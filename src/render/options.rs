//! Rendering options and configuration.

/// Options for Markdown output.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Include YAML frontmatter with document metadata
    pub include_frontmatter: bool,

    /// Deepest heading level emitted (1-6)
    pub max_heading_level: u8,

    /// Add the source page under each heading
    pub include_page_numbers: bool,

    /// Escape special Markdown characters in titles and content
    pub escape_special_chars: bool,

    /// List linked files at the end
    pub include_file_links: bool,
}

impl MarkdownOptions {
    /// Create new Markdown options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set frontmatter inclusion.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Set the deepest heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Set page annotations.
    pub fn with_page_numbers(mut self, include: bool) -> Self {
        self.include_page_numbers = include;
        self
    }

    /// Set escaping of special characters.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the file link listing.
    pub fn with_file_links(mut self, include: bool) -> Self {
        self.include_file_links = include;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: true,
            max_heading_level: 6,
            include_page_numbers: true,
            escape_special_chars: true,
            include_file_links: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_options_builder() {
        let options = MarkdownOptions::new()
            .with_frontmatter(false)
            .with_max_heading(9)
            .with_page_numbers(false);

        assert!(!options.include_frontmatter);
        assert_eq!(options.max_heading_level, 6);
        assert!(!options.include_page_numbers);
        assert!(options.escape_special_chars);
    }
}
