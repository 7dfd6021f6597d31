//! Markdown plan parsing into a small block model the result panel can draw.
//!
//! Raw HTML is dropped and nothing is ever evaluated; images degrade to their
//! alt text.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAlign {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph(Vec<Span>),
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Quote(Vec<Block>),
    Code {
        language: Option<String>,
        code: String,
    },
    Table {
        alignments: Vec<ColumnAlign>,
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDocument {
    pub blocks: Vec<Block>,
}

impl PlanDocument {
    pub fn parse(source: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut builder = Builder::default();
        for event in Parser::new_ext(source, options) {
            builder.handle(event);
        }
        builder.finish()
    }
}

#[cfg(test)]
impl PlanDocument {
    /// Visible text without markup, one line per block.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            block.collect_lines(&mut lines);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
impl Block {
    fn collect_lines(&self, lines: &mut Vec<String>) {
        match self {
            Block::Heading { spans, .. } | Block::Paragraph(spans) => lines.push(spans_text(spans)),
            Block::List { items, .. } => {
                for item in items {
                    for block in &item.blocks {
                        block.collect_lines(lines);
                    }
                }
            }
            Block::Quote(blocks) => {
                for block in blocks {
                    block.collect_lines(lines);
                }
            }
            Block::Code { code, .. } => lines.push(code.trim_end().to_string()),
            Block::Table { header, rows, .. } => {
                lines.push(cells_text(header));
                for row in rows {
                    lines.push(cells_text(row));
                }
            }
            Block::Rule => {}
        }
    }
}

#[cfg(test)]
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

#[cfg(test)]
fn cells_text(cells: &[Vec<Span>]) -> String {
    cells
        .iter()
        .map(|cell| spans_text(cell))
        .collect::<Vec<_>>()
        .join(" | ")
}

enum Frame {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item {
        checked: Option<bool>,
        blocks: Vec<Block>,
    },
    Table {
        alignments: Vec<ColumnAlign>,
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
        row: Vec<Vec<Span>>,
    },
}

/// Open tags, tracked here so end events need no inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading,
    Quote,
    Code,
    List,
    Item,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Html,
    Other,
}

struct Builder {
    frames: Vec<Frame>,
    open: Vec<Open>,
    inline: Vec<Span>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    links: Vec<String>,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
    html_depth: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            frames: vec![Frame::Root(Vec::new())],
            open: Vec::new(),
            inline: Vec::new(),
            strong: 0,
            emphasis: 0,
            strikethrough: 0,
            links: Vec::new(),
            heading: None,
            code: None,
            html_depth: 0,
        }
    }
}

impl Builder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                let open = self.start(tag);
                self.open.push(open);
            }
            Event::End(_) => {
                if let Some(open) = self.open.pop() {
                    self.end(open);
                }
            }
            Event::Text(text) => {
                if self.html_depth > 0 {
                    return;
                }
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush_paragraph();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                if let Some(Frame::Item { checked: slot, .. }) = self.frames.last_mut() {
                    *slot = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.push_text(&format!("[{label}]"), false),
            // Raw HTML and anything newer is skipped.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) -> Open {
        match tag {
            Tag::Paragraph => {
                self.flush_paragraph();
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush_paragraph();
                self.heading = Some(heading_level(level));
                Open::Heading
            }
            Tag::BlockQuote(..) => {
                self.flush_paragraph();
                self.frames.push(Frame::Quote(Vec::new()));
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush_paragraph();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
                Open::Code
            }
            Tag::List(start) => {
                self.flush_paragraph();
                self.frames.push(Frame::List {
                    start,
                    items: Vec::new(),
                });
                Open::List
            }
            Tag::Item => {
                self.frames.push(Frame::Item {
                    checked: None,
                    blocks: Vec::new(),
                });
                Open::Item
            }
            Tag::Table(alignments) => {
                self.flush_paragraph();
                self.frames.push(Frame::Table {
                    alignments: alignments.into_iter().map(column_align).collect(),
                    header: Vec::new(),
                    rows: Vec::new(),
                    row: Vec::new(),
                });
                Open::Table
            }
            Tag::TableHead => {
                self.inline.clear();
                Open::TableHead
            }
            Tag::TableRow => {
                self.inline.clear();
                Open::TableRow
            }
            Tag::TableCell => {
                self.inline.clear();
                Open::TableCell
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Open::Emphasis
            }
            Tag::Strong => {
                self.strong += 1;
                Open::Strong
            }
            Tag::Strikethrough => {
                self.strikethrough += 1;
                Open::Strikethrough
            }
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                Open::Link
            }
            Tag::HtmlBlock => {
                self.html_depth += 1;
                Open::Html
            }
            _ => Open::Other,
        }
    }

    fn end(&mut self, open: Open) {
        match open {
            Open::Paragraph => self.flush_paragraph(),
            Open::Heading => {
                let level = self.heading.take().unwrap_or(1);
                let spans = std::mem::take(&mut self.inline);
                self.push_block(Block::Heading { level, spans });
            }
            Open::Quote => {
                self.flush_paragraph();
                if let Some(Frame::Quote(blocks)) = self.frames.pop() {
                    self.push_block(Block::Quote(blocks));
                }
            }
            Open::Code => {
                if let Some((language, code)) = self.code.take() {
                    self.push_block(Block::Code { language, code });
                }
            }
            Open::List => {
                self.flush_paragraph();
                if let Some(Frame::List { start, items }) = self.frames.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            Open::Item => {
                self.flush_paragraph();
                self.close_item();
            }
            Open::TableCell => {
                let cell = std::mem::take(&mut self.inline);
                if let Some(Frame::Table { row, .. }) = self.frames.last_mut() {
                    row.push(cell);
                }
            }
            Open::TableHead => {
                if let Some(Frame::Table { header, row, .. }) = self.frames.last_mut() {
                    *header = std::mem::take(row);
                }
            }
            Open::TableRow => {
                if let Some(Frame::Table { rows, row, .. }) = self.frames.last_mut() {
                    rows.push(std::mem::take(row));
                }
            }
            Open::Table => {
                if let Some(Frame::Table {
                    alignments,
                    header,
                    rows,
                    ..
                }) = self.frames.pop()
                {
                    self.push_block(Block::Table {
                        alignments,
                        header,
                        rows,
                    });
                }
            }
            Open::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            Open::Strong => self.strong = self.strong.saturating_sub(1),
            Open::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            Open::Link => {
                self.links.pop();
            }
            Open::Html => self.html_depth = self.html_depth.saturating_sub(1),
            Open::Other => {}
        }
    }

    fn close_item(&mut self) {
        if let Some(Frame::Item { checked, blocks }) = self.frames.pop() {
            if let Some(Frame::List { items, .. }) = self.frames.last_mut() {
                items.push(ListItem { checked, blocks });
            }
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        let style = SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
            link: self.links.last().cloned(),
        };
        match self.inline.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.inline.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Loose inline text (tight list items, stray text) becomes a paragraph.
    fn flush_paragraph(&mut self) {
        if self.heading.is_some() || self.inline.is_empty() {
            return;
        }
        if matches!(self.frames.last(), Some(Frame::Table { .. })) {
            return;
        }
        let spans = std::mem::take(&mut self.inline);
        self.push_block(Block::Paragraph(spans));
    }

    fn push_block(&mut self, block: Block) {
        match self.frames.last_mut() {
            Some(Frame::Root(blocks))
            | Some(Frame::Quote(blocks))
            | Some(Frame::Item { blocks, .. }) => blocks.push(block),
            Some(Frame::List { items, .. }) => items.push(ListItem {
                checked: None,
                blocks: vec![block],
            }),
            Some(Frame::Table { .. }) | None => {}
        }
    }

    fn finish(mut self) -> PlanDocument {
        self.flush_paragraph();
        while let Some(open) = self.open.pop() {
            self.end(open);
        }
        match self.frames.into_iter().next() {
            Some(Frame::Root(blocks)) => PlanDocument { blocks },
            _ => PlanDocument::default(),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn column_align(alignment: Alignment) -> ColumnAlign {
    match alignment {
        Alignment::None => ColumnAlign::None,
        Alignment::Left => ColumnAlign::Left,
        Alignment::Center => ColumnAlign::Center,
        Alignment::Right => ColumnAlign::Right,
    }
}

#[cfg(test)]
#[path = "tests/markdown_tests.rs"]
mod tests;
