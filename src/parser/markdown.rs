// file: src/parser/markdown.rs
// description: heading and plain text extraction with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

pub struct MarkdownParser;

#[derive(Debug, Clone, Default)]
pub struct ParsedMarkdown {
    pub plain_text: String,
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u32,
    pub text: String,
}

impl ParsedMarkdown {
    /// First top-most heading, used as a document title.
    pub fn title(&self) -> Option<&str> {
        let top = self.headings.iter().map(|h| h.level).min()?;
        self.headings
            .iter()
            .find(|h| h.level == top && !h.text.is_empty())
            .map(|h| h.text.as_str())
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> ParsedMarkdown {
        let mut plain_text = String::new();
        let mut headings = Vec::new();
        let mut current_heading: Option<(u32, String)> = None;

        for event in Parser::new(content) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some((level as u32, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = current_heading.take() {
                        headings.push(Heading {
                            level,
                            text: text.trim().to_string(),
                        });
                    }
                    plain_text.push('\n');
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, ref mut heading_text)) = current_heading {
                        heading_text.push_str(&text);
                    }
                    plain_text.push_str(&text);
                }
                Event::SoftBreak => plain_text.push(' '),
                Event::HardBreak | Event::End(TagEnd::Paragraph) => plain_text.push('\n'),
                _ => {}
            }
        }

        ParsedMarkdown {
            plain_text: plain_text.trim().to_string(),
            headings,
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}
