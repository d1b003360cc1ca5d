//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
    static ref DASHES: Regex = Regex::new(r"--+").unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

struct HeadingBuf<'a> {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
    events: Vec<Event<'a>>,
}

struct CodeBuf {
    lang: Option<String>,
    text: String,
}

struct ImageBuf {
    src: String,
    title: String,
    alt: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.line_number)
    }

    /// Render an article body to HTML.
    ///
    /// Headings get anchor ids, external links open in a new tab and fenced
    /// code is highlighted. Embedded HTML/JSX passes through unchanged.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut out: Vec<Event> = Vec::new();
        let mut heading: Option<HeadingBuf> = None;
        let mut code: Option<CodeBuf> = None;
        let mut image: Option<ImageBuf> = None;
        let mut links: Vec<bool> = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang
                            .split_whitespace()
                            .next()
                            .map(|l| l.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(CodeBuf {
                        lang,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code.take() {
                        let highlighted = self.highlight_code(&block.text, block.lang.as_deref());
                        emit(&mut heading, &mut out, Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some(block) = code.as_mut() {
                        block.text.push_str(&text);
                    }
                }

                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(ImageBuf {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                    });
                }
                Event::End(TagEnd::Image) => {
                    if let Some(img) = image.take() {
                        emit(&mut heading, &mut out, Event::Html(CowStr::from(img.to_html())));
                    }
                }
                Event::Text(text) | Event::Code(text) if image.is_some() => {
                    if let Some(img) = image.as_mut() {
                        img.alt.push_str(&text);
                    }
                }

                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(HeadingBuf {
                        level,
                        id: id.map(|s| s.to_string()),
                        text: String::new(),
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(h) = heading.take() {
                        out.push(Event::Html(CowStr::from(h.finish())));
                    }
                }

                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let external = is_external(&dest_url);
                    links.push(external);
                    let event = if external {
                        let mut tag = format!(
                            r#"<a href="{}" target="_blank" rel="noopener noreferrer""#,
                            html_escape(&dest_url)
                        );
                        if !title.is_empty() {
                            tag.push_str(&format!(r#" title="{}""#, html_escape(&title)));
                        }
                        tag.push('>');
                        Event::InlineHtml(CowStr::from(tag))
                    } else {
                        Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id,
                        })
                    };
                    emit(&mut heading, &mut out, event);
                }
                Event::End(TagEnd::Link) => {
                    let event = if links.pop() == Some(true) {
                        Event::InlineHtml(CowStr::from("</a>"))
                    } else {
                        Event::End(TagEnd::Link)
                    };
                    emit(&mut heading, &mut out, event);
                }

                other => emit(&mut heading, &mut out, other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, out.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        // The fence info string is author input and lands in a class attribute
        let lang = &html_escape(lang);

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(r#"<figure class="highlight {}">{}</figure>"#, lang, highlighted),
            None => {
                tracing::debug!("Falling back to plain code block for {}", lang);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingBuf<'_> {
    fn finish(self) -> String {
        let id = self.id.unwrap_or_else(|| slugify(&self.text));
        let level = self.level as usize;
        let mut inner = String::new();
        html::push_html(&mut inner, self.events.into_iter());
        format!(
            r##"<h{level} id="{id}"><a href="#{id}" class="anchor"></a>{inner}</h{level}>"##,
            level = level,
            id = html_escape(&id),
            inner = inner
        ) + "\n"
    }
}

impl ImageBuf {
    fn to_html(&self) -> String {
        let mut tag = format!(
            r#"<img src="{}" alt="{}" class="rounded-lg""#,
            html_escape(&self.src),
            html_escape(&self.alt)
        );
        if !self.title.is_empty() {
            tag.push_str(&format!(r#" title="{}""#, html_escape(&self.title)));
        }
        tag.push_str(" />");
        tag
    }
}

/// Route an event into the open heading, or to the output
fn emit<'a>(heading: &mut Option<HeadingBuf<'a>>, out: &mut Vec<Event<'a>>, event: Event<'a>) {
    match heading {
        Some(h) => {
            if let Event::Text(t) | Event::Code(t) = &event {
                h.text.push_str(t);
            }
            h.events.push(event);
        }
        None => out.push(event),
    }
}

/// Links that leave the site: anything not site-relative or a fragment
fn is_external(href: &str) -> bool {
    !(href.starts_with('/') || href.starts_with('#'))
}

/// Heading anchor id: lowercase, spaces to `-`, `&` to `-and-`, other
/// non-word characters dropped
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lower, "-");
    let anded = dashed.replace('&', "-and-");
    let cleaned = NON_WORD.replace_all(&anded, "");
    DASHES.replace_all(&cleaned, "-").into_owned()
}
