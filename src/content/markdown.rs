//! Markdown/MDX rendering
//!
//! Bodies go through a fixed pipeline, each stage feeding the next:
//!
//! 1. `@include` expansion (text level, may read partials)
//! 2. anchor links on headings and on list items opening with inline code
//! 3. callout paragraphs (`=>`, `->`, `~>`, `!>`) wrapped in alert blocks
//! 4. typographic substitutions
//!
//! after which fenced code is highlighted and MDX component tags are
//! dispatched through the [`ComponentTable`].

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::path::Path;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::components::{BlockKind, ComponentTable};
use super::include::IncludeResolver;
use crate::config::HighlightConfig;
use crate::error::{Error, Result};
use crate::helpers::html_escape;

/// A heading of the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Serialisable result of rendering one body
#[derive(Debug, Clone, Serialize)]
pub struct RenderTree {
    /// Rendered HTML body
    pub html: String,
    /// Heading outline in document order
    pub headings: Vec<Heading>,
    /// Block components the body uses, for hydration
    pub components: BTreeSet<BlockKind>,
}

impl RenderTree {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Markdown renderer with the content transform pipeline
pub struct MarkdownRenderer {
    includes: IncludeResolver,
    components: ComponentTable,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new<P: AsRef<Path>>(
        partials_dir: P,
        components: ComponentTable,
        highlight: &HighlightConfig,
    ) -> Self {
        Self {
            includes: IncludeResolver::new(partials_dir),
            components,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            highlight: highlight.enable,
            line_numbers: highlight.line_number,
        }
    }

    /// Render a body to a [`RenderTree`].
    ///
    /// Any failing stage aborts the whole render.
    pub async fn render(&self, body: &str) -> Result<RenderTree> {
        let expanded = self.includes.expand(body).await?;

        let parser = Parser::new_ext(&expanded, parser_options()).into_offset_iter();
        let events = literal_single_tildes(&expanded, parser);
        let events: Vec<Event> = TextMergeStream::new(events.into_iter()).collect();

        let (events, headings) = anchor_links(events);
        let events = custom_alerts(events);
        let events = typography(events);
        let events = self.highlight_code_blocks(events);

        let mut components = BTreeSet::new();
        let mut in_comment = false;
        let mut rendered = Vec::with_capacity(events.len());
        for event in events {
            let event = match event {
                Event::Html(raw) => Event::Html(CowStr::from(self.components.render_fragment_in(
                    &raw,
                    &mut in_comment,
                    &mut components,
                )?)),
                Event::InlineHtml(raw) => {
                    Event::InlineHtml(CowStr::from(self.components.render_fragment_in(
                        &raw,
                        &mut in_comment,
                        &mut components,
                    )?))
                }
                other => other,
            };
            rendered.push(event);
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, rendered.into_iter());

        Ok(RenderTree {
            html: html_output,
            headings,
            components,
        })
    }

    /// Replace fenced and indented code blocks with highlighted HTML
    fn highlight_code_blocks<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut output = Vec::with_capacity(events.len());
        let mut code: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, content)) = code.take() {
                        let highlighted = self.highlight_code(&content, lang.as_deref());
                        output.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, content)) = code.as_mut() {
                        content.push_str(&text);
                    }
                }
                other => output.push(other),
            }
        }

        output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return plain(),
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain()
            }
        }
    }
}

fn parser_options() -> Options {
    // Typographic substitution is our own stage, so no smart punctuation here
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Only `~~text~~` strikes through; a single `~` stays literal text so
/// `~>` callouts and paths like `~/.consul` survive.
fn literal_single_tildes<'a>(
    source: &str,
    events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<Event<'a>> {
    let mut open = Vec::new();
    events
        .map(|(event, range)| match event {
            Event::Start(Tag::Strikethrough) => {
                let double = source.get(range).map_or(true, |s| s.starts_with("~~"));
                open.push(double);
                if double {
                    Event::Start(Tag::Strikethrough)
                } else {
                    Event::Text(CowStr::Borrowed("~"))
                }
            }
            Event::End(TagEnd::Strikethrough) => {
                if open.pop().unwrap_or(true) {
                    Event::End(TagEnd::Strikethrough)
                } else {
                    Event::Text(CowStr::Borrowed("~"))
                }
            }
            other => other,
        })
        .collect()
}

/// Add line numbers to highlighted code
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

/// Generates unique anchor ids within one page
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let cleaned: String = text.chars().filter(|c| !matches!(c, '\'' | '’')).collect();
        let mut base = slug::slugify(cleaned);
        if base.is_empty() {
            base = "section".to_string();
        }
        self.claim(base)
    }

    fn claim(&mut self, base: String) -> String {
        match self.seen.get_mut(&base) {
            Some(count) => {
                *count += 1;
                let id = format!("{}-{}", base, count);
                self.seen.insert(id.clone(), 0);
                id
            }
            None => {
                self.seen.insert(base.clone(), 0);
                base
            }
        }
    }
}

/// Stage 2: give headings ids and permalinks, and anchor list items that
/// open with inline code (`- \`name\` - description`).
fn anchor_links(events: Vec<Event<'_>>) -> (Vec<Event<'_>>, Vec<Heading>) {
    let mut slugger = Slugger::default();
    let mut headings = Vec::new();
    let mut output = Vec::with_capacity(events.len());
    let mut current_heading: Option<String> = None;
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let mut inner = Vec::new();
                for event in iter.by_ref() {
                    if matches!(event, Event::End(TagEnd::Heading(_))) {
                        break;
                    }
                    inner.push(event);
                }

                let text = plain_text(&inner);
                let anchor = match id {
                    Some(explicit) => slugger.claim(explicit.to_string()),
                    None => slugger.slug(&text),
                };

                output.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(anchor.clone())),
                    classes,
                    attrs,
                }));
                output.push(Event::InlineHtml(CowStr::from(format!(
                    r##"<a class="__permalink-h" href="#{}" aria-label="{} permalink">»</a>"##,
                    anchor,
                    html_escape(&text)
                ))));
                output.extend(inner);
                output.push(Event::End(TagEnd::Heading(level)));

                headings.push(Heading {
                    level: level as u8,
                    id: anchor.clone(),
                    text,
                });
                current_heading = Some(anchor);
            }
            Event::Start(Tag::Item) => {
                output.push(Event::Start(Tag::Item));

                // Tight lists put the code first; loose lists wrap it in a paragraph
                if matches!(iter.peek(), Some(Event::Start(Tag::Paragraph))) {
                    if let Some(paragraph) = iter.next() {
                        output.push(paragraph);
                    }
                }
                if let Some(Event::Code(code)) = iter.peek() {
                    let code: &str = code;
                    let code_slug = slug::slugify(code);
                    let base = match &current_heading {
                        Some(heading) if !code_slug.is_empty() => {
                            format!("{}-{}", heading, code_slug)
                        }
                        Some(heading) => heading.clone(),
                        None => code_slug,
                    };
                    if !base.is_empty() {
                        let anchor = slugger.claim(base);
                        output.push(Event::InlineHtml(CowStr::from(format!(
                            r##"<a id="{}" class="__target-lic" aria-hidden="true"></a><a href="#{}" class="__permalink-lic" aria-label="{} permalink">»</a>"##,
                            anchor,
                            anchor,
                            html_escape(code)
                        ))));
                    }
                }
            }
            other => output.push(other),
        }
    }

    (output, headings)
}

/// Text content of a run of inline events
fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Callout markers and their alert kinds
const ALERT_MARKERS: [(&str, &str); 4] = [
    ("=>", "success"),
    ("->", "info"),
    ("~>", "warning"),
    ("!>", "danger"),
];

/// Stage 3: wrap marked paragraphs in alert blocks
fn custom_alerts(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut in_alert = false;
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::Paragraph) => {
                let alert = match iter.peek() {
                    Some(Event::Text(text)) => alert_kind(text),
                    _ => None,
                };
                match alert {
                    Some((kind, marker_len)) => {
                        output.push(Event::Html(CowStr::from(format!(
                            "<div class=\"alert alert-{} g-type-body\" role=\"alert\">\n",
                            kind
                        ))));
                        output.push(Event::Start(Tag::Paragraph));
                        if let Some(Event::Text(text)) = iter.next() {
                            let rest = text.get(marker_len..).unwrap_or("").trim_start();
                            if !rest.is_empty() {
                                output.push(Event::Text(CowStr::from(rest.to_string())));
                            }
                        }
                        in_alert = true;
                    }
                    None => output.push(Event::Start(Tag::Paragraph)),
                }
            }
            Event::End(TagEnd::Paragraph) if in_alert => {
                output.push(Event::End(TagEnd::Paragraph));
                output.push(Event::Html(CowStr::from("</div>\n")));
                in_alert = false;
            }
            other => output.push(other),
        }
    }

    output
}

/// Alert kind and marker length if the text opens with a callout marker
fn alert_kind(text: &str) -> Option<(&'static str, usize)> {
    ALERT_MARKERS.iter().find_map(|(marker, kind)| {
        let rest = text.strip_prefix(marker)?;
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some((*kind, marker.len()))
        } else {
            None
        }
    })
}

/// Stage 4: typographic substitutions outside code
fn typography(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut in_code_block = false;
    let mut prev: Option<char> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                output.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                output.push(Event::End(TagEnd::CodeBlock));
            }
            Event::Start(tag) => {
                if matches!(
                    tag,
                    Tag::Paragraph | Tag::Heading { .. } | Tag::Item | Tag::TableCell
                ) {
                    prev = None;
                }
                output.push(Event::Start(tag));
            }
            Event::Text(text) if !in_code_block => {
                let smart = smarten(&text, prev);
                prev = smart.chars().last().or(prev);
                output.push(Event::Text(CowStr::from(smart)));
            }
            Event::Code(code) => {
                prev = code.chars().last().or(prev);
                output.push(Event::Code(code));
            }
            other => output.push(other),
        }
    }

    output
}

/// Curly quotes, dashes and ellipses
fn smarten(text: &str, mut prev: Option<char>) -> String {
    let text = text
        .replace("...", "…")
        .replace("---", "—")
        .replace("--", "–");

    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        let opening = prev.map_or(true, |p| {
            p.is_whitespace() || matches!(p, '(' | '[' | '{' | '—' | '–' | '"' | '“' | '‘')
        });
        let replaced = match c {
            '"' if opening => '“',
            '"' => '”',
            '\'' if opening => '‘',
            '\'' => '’',
            other => other,
        };
        output.push(replaced);
        prev = Some(replaced);
    }
    output
}
