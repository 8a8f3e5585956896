//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

/// Markdown renderer with optional syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default highlighting
    pub fn new() -> Self {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown to HTML
    ///
    /// Raw HTML in the source passes through untouched.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let rendered = self.render_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(rendered)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn render_code(&self, code: &str, lang: Option<&str>) -> String {
        if self.highlight {
            if let Some(highlighted) = self.highlight_code(code, lang) {
                return highlighted;
            }
        }

        match lang {
            Some(lang) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
            None => format!("<pre><code>{}</code></pre>", html_escape(code)),
        }
    }

    /// Highlight a code block, `None` when the theme is unknown or syntect fails
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Option<String> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme_set.themes.get(&self.theme_name) else {
            tracing::warn!("Unknown highlight theme '{}'", self.theme_name);
            return None;
        };

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()?;
        if self.line_numbers {
            Some(add_line_numbers(&highlighted, lang))
        } else {
            Some(format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ))
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap highlighted code in a gutter table
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        lines.join("\n")
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> MarkdownRenderer {
        MarkdownRenderer::with_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = plain().render("# Hello World\n\nThis is a *test* with a [link](/x/).");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<em>test</em>"));
        assert!(html.contains(r#"<a href="/x/">link</a>"#));
    }

    #[test]
    fn test_render_lists() {
        let html = plain().render("- one\n- two\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>two</li>"));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let html = plain().render("<div class=\"note\">kept</div>\n\nafter");
        assert!(html.contains("<div class=\"note\">kept</div>"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_plain_code_block_is_escaped() {
        let html = plain().render("```rust\nlet a = 1 < 2;\n```\n\nafter");
        assert!(html.contains(r#"<pre><code class="language-rust">let a = 1 &lt; 2;"#));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_highlighted_code_block() {
        let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight rust"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_line_numbers() {
        let renderer = MarkdownRenderer::with_config(&HighlightConfig {
            line_number: true,
            ..Default::default()
        });
        let html = renderer.render("```\na\nb\n```");
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }
}
