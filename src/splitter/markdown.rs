use std::ops::Range;
use std::sync::Arc;

use pulldown_cmark::{
    CowStr, Event, LinkType, Options as MdOptions, Parser, Tag, TagEnd,
};

use crate::config::SplitterOptions;
use crate::error::ChunkerError;
use crate::splitter::{RecursiveCharacterSplitter, TextSplitter};

/// Markdown structure-aware splitter.
///
/// Supports H1-H6, bullet lists, ordered lists, tables, paragraphs and
/// blockquotes; other blocks are skipped (code blocks can be kept verbatim
/// with the `code_blocks` option). Chunks carry their nearest enclosing
/// header so each chunk stays meaningful on its own. Paragraphs that still
/// exceed the chunk size are delegated to a secondary splitter.
pub struct MarkdownSplitter {
    options: SplitterOptions,
    second_splitter: Arc<dyn TextSplitter>,
}

impl MarkdownSplitter {
    pub fn new(options: SplitterOptions) -> Self {
        let second_splitter = options.second_splitter.clone().unwrap_or_else(|| {
            Arc::new(RecursiveCharacterSplitter::new(
                SplitterOptions::default()
                    .with_chunk_size(options.chunk_size)
                    .with_chunk_overlap(options.chunk_overlap)
                    .with_separators(vec![
                        "\n\n".to_string(),
                        "\n".to_string(),
                        " ".to_string(),
                    ]),
            ))
        });
        Self {
            options,
            second_splitter,
        }
    }
}

impl Default for MarkdownSplitter {
    fn default() -> Self {
        Self::new(SplitterOptions::default())
    }
}

impl TextSplitter for MarkdownSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkerError> {
        let mut md_options = MdOptions::empty();
        md_options.insert(MdOptions::ENABLE_TABLES);
        md_options.insert(MdOptions::ENABLE_STRIKETHROUGH);

        let events: Vec<(Event, Range<usize>)> =
            Parser::new_ext(text, md_options).into_offset_iter().collect();

        let mut walk = MarkdownWalk {
            source: text,
            events: &events,
            start_at: 0,
            end_at: events.len(),
            h_title: String::new(),
            h_title_prepended: false,
            ordered_list: false,
            bullet_list: false,
            list_order: 0,
            indent_level: 0,
            chunks: Vec::new(),
            cur_snippet: String::new(),
            chunk_size: self.options.chunk_size,
            chunk_overlap: self.options.chunk_overlap,
            len_func: &*self.options.len_func,
            code_blocks: self.options.code_blocks,
            reference_links: self.options.reference_links,
            second_splitter: self.second_splitter.as_ref(),
        };
        Ok(walk.split())
    }
}

/// Per-call traversal state over the flat event array. Recursive sub-splits
/// (blockquotes, lists) walk an index sub-range of the same array with a
/// cloned context, never an owned sub-tree.
struct MarkdownWalk<'a> {
    source: &'a str,
    events: &'a [(Event<'a>, Range<usize>)],
    /// Cursor position in `events`.
    start_at: usize,
    /// Exclusive end of the range this walk owns.
    end_at: usize,

    /// Nearest enclosing header, rendered as `## text`; empty if none.
    h_title: String,
    /// Whether `h_title` has already been emitted into `chunks`.
    h_title_prepended: bool,

    ordered_list: bool,
    bullet_list: bool,
    /// Running counter for ordered list markers.
    list_order: u64,
    /// Nesting depth of the list currently being walked.
    indent_level: usize,

    chunks: Vec<String>,
    /// Snippet accumulated since the last flush.
    cur_snippet: String,

    chunk_size: usize,
    chunk_overlap: usize,
    len_func: &'a (dyn Fn(&str) -> usize + Send + Sync),
    code_blocks: bool,
    reference_links: bool,
    second_splitter: &'a dyn TextSplitter,
}

impl<'a> MarkdownWalk<'a> {
    fn split(&mut self) -> Vec<String> {
        while self.start_at < self.end_at {
            let idx = self.start_at;
            match &self.events[idx].0 {
                Event::Start(Tag::Heading { .. }) => self.on_header(),
                Event::Start(Tag::Table(_)) => self.on_table(),
                Event::Start(Tag::Paragraph) => self.on_paragraph(),
                Event::Start(Tag::BlockQuote(_)) => self.on_blockquote(),
                Event::Start(Tag::List(None)) => self.on_bullet_list(),
                Event::Start(Tag::List(Some(start))) => {
                    let start = *start;
                    self.on_ordered_list(start);
                }
                Event::Start(Tag::Item) => self.on_list_item(),
                Event::Start(Tag::CodeBlock(_)) => self.on_code_block(),
                _ => self.start_at = self.index_of_close(idx) + 1,
            }
        }

        // Flush whatever is left, including a bare header.
        self.apply_to_chunks();
        std::mem::take(&mut self.chunks)
    }

    /// Clones the traversal context over the sub-range `[start_at, end_at)`
    /// with fresh chunk/snippet accumulators.
    fn clone_range(&self, start_at: usize, end_at: usize) -> MarkdownWalk<'a> {
        MarkdownWalk {
            source: self.source,
            events: self.events,
            start_at,
            end_at,
            h_title: self.h_title.clone(),
            h_title_prepended: self.h_title_prepended,
            ordered_list: self.ordered_list,
            bullet_list: self.bullet_list,
            list_order: self.list_order,
            indent_level: self.indent_level,
            chunks: Vec::new(),
            cur_snippet: String::new(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            len_func: self.len_func,
            code_blocks: self.code_blocks,
            reference_links: self.reference_links,
            second_splitter: self.second_splitter,
        }
    }

    /// Returns the index of the close event matching the open event at
    /// `start_at`, tracking nesting depth for same-type tags. Non-open
    /// events are their own close.
    fn index_of_close(&self, start_at: usize) -> usize {
        let close = match &self.events[start_at].0 {
            Event::Start(tag) => tag.to_end(),
            _ => return start_at,
        };

        let mut depth = 0usize;
        let mut idx = start_at + 1;
        while idx < self.end_at {
            match &self.events[idx].0 {
                Event::Start(tag) if tag.to_end() == close => depth += 1,
                Event::End(end) if *end == close => {
                    if depth == 0 {
                        return idx;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            idx += 1;
        }
        idx
    }

    /// A header always starts a fresh context: flush, then remember the
    /// header line for prefixing the chunks that follow.
    fn on_header(&mut self) {
        let end_at = self.index_of_close(self.start_at);
        let level = match &self.events[self.start_at].0 {
            Event::Start(Tag::Heading { level, .. }) => *level as usize,
            _ => {
                self.start_at = end_at + 1;
                return;
            }
        };
        let content = self.render_inline(self.start_at + 1, end_at);
        self.start_at = end_at + 1;

        self.apply_to_chunks();

        self.h_title = format!("{} {}", "#".repeat(level), content);
        self.h_title_prepended = false;
    }

    fn on_paragraph(&mut self) {
        let end_at = self.index_of_close(self.start_at);
        let line = self.render_inline(self.start_at + 1, end_at);
        self.start_at = end_at + 1;
        self.join_snippet(&line);
    }

    /// Blockquote content is split with a header-less sub-context and
    /// re-prefixed line by line.
    fn on_blockquote(&mut self) {
        let end_at = self.index_of_close(self.start_at);

        let mut sub = self.clone_range(self.start_at + 1, end_at);
        sub.h_title = String::new();
        let chunks = sub.split();
        for chunk in chunks {
            let quoted = indent_lines(&chunk, "> ");
            self.join_snippet(&quoted);
        }

        self.start_at = end_at + 1;
        self.apply_to_chunks();
    }

    fn on_bullet_list(&mut self) {
        self.bullet_list = true;
        self.ordered_list = false;
        self.on_list();
    }

    fn on_ordered_list(&mut self, start: u64) {
        self.ordered_list = true;
        self.bullet_list = false;
        self.list_order = start.saturating_sub(1);
        self.on_list();
    }

    /// Walks the list items with a cloned context; chunks coming out of a
    /// nested list are indented two spaces per extra level.
    fn on_list(&mut self) {
        let end_at = self.index_of_close(self.start_at);
        self.indent_level += 1;

        let mut sub = self.clone_range(self.start_at + 1, end_at);
        let sub_chunks = sub.split();
        for chunk in sub_chunks {
            let chunk = if self.indent_level > 1 {
                indent_lines(&chunk, "  ")
            } else {
                chunk
            };
            self.join_snippet(&chunk);
        }

        self.start_at = end_at + 1;
        self.indent_level -= 1;
    }

    /// A list item is leading inline content (tight lists), paragraphs
    /// (loose lists) and possibly nested sub-lists. Every item flushes its
    /// own snippet so one item never straddles two chunks.
    fn on_list_item(&mut self) {
        let end_at = self.index_of_close(self.start_at);

        let mut idx = self.start_at + 1;
        let mut inline_end = idx;
        while inline_end < end_at && !is_block_boundary(&self.events[inline_end].0) {
            inline_end += 1;
        }
        if inline_end > idx {
            let line = self.render_inline(idx, inline_end);
            self.push_list_line(line);
            idx = inline_end;
        }

        self.start_at = idx;
        while self.start_at < end_at {
            match &self.events[self.start_at].0 {
                Event::Start(Tag::Paragraph) => self.on_list_item_paragraph(),
                Event::Start(Tag::List(None)) => self.on_bullet_list(),
                Event::Start(Tag::List(Some(start))) => {
                    let start = *start;
                    self.on_ordered_list(start);
                }
                _ => self.start_at += 1,
            }
        }

        self.start_at = end_at + 1;
        self.apply_to_chunks();
    }

    fn on_list_item_paragraph(&mut self) {
        let end_at = self.index_of_close(self.start_at);
        let line = self.render_inline(self.start_at + 1, end_at);
        self.start_at = end_at + 1;
        if !line.is_empty() {
            self.push_list_line(line);
        }
    }

    /// Prefixes the line with its list marker and joins it. List content is
    /// self-descriptive, so the page header no longer applies.
    fn push_list_line(&mut self, line: String) {
        let line = if self.ordered_list {
            self.list_order += 1;
            format!("{}. {}", self.list_order, line)
        } else if self.bullet_list {
            format!("- {line}")
        } else {
            line
        };
        self.join_snippet(&line);
        self.h_title.clear();
    }

    fn on_table(&mut self) {
        let end_at = self.index_of_close(self.start_at);

        let mut header: Vec<String> = Vec::new();
        let mut bodies: Vec<Vec<String>> = Vec::new();
        let mut idx = self.start_at + 1;
        while idx < end_at {
            match &self.events[idx].0 {
                Event::Start(Tag::TableHead) => {
                    let close = self.index_of_close(idx);
                    header = self.collect_row_cells(idx + 1, close);
                    idx = close + 1;
                }
                Event::Start(Tag::TableRow) => {
                    let close = self.index_of_close(idx);
                    bodies.push(self.collect_row_cells(idx + 1, close));
                    idx = close + 1;
                }
                _ => idx += 1,
            }
        }

        self.start_at = end_at + 1;
        self.split_table_rows(header, bodies);
    }

    fn collect_row_cells(&self, from: usize, to: usize) -> Vec<String> {
        let mut cells = Vec::new();
        let mut idx = from;
        while idx < to {
            if let Event::Start(Tag::TableCell) = &self.events[idx].0 {
                let close = self.index_of_close(idx);
                cells.push(self.render_inline(idx + 1, close));
                idx = close + 1;
            } else {
                idx += 1;
            }
        }
        cells
    }

    /// Emits one chunk per body row, each carrying the markdown header and
    /// separator rows. A row without its header is not independently
    /// meaningful, so rows are never merged across chunks.
    fn split_table_rows(&mut self, mut header: Vec<String>, mut bodies: Vec<Vec<String>>) {
        let has_header = header.iter().any(|h| !h.is_empty());
        if !has_header && !bodies.is_empty() {
            header = bodies.remove(0);
        }

        let header_md = table_header_in_markdown(&header);
        if bodies.is_empty() {
            self.join_snippet(&header_md);
            self.apply_to_chunks();
            return;
        }

        for row in &bodies {
            let line = table_row_in_markdown(row);
            self.join_snippet(&format!("{header_md}\n{line}"));
            self.apply_to_chunks();
        }
    }

    /// Fenced and indented code blocks are skipped unless `code_blocks` is
    /// set, in which case the raw source span is kept verbatim.
    fn on_code_block(&mut self) {
        let end_at = self.index_of_close(self.start_at);
        let range = self.events[self.start_at].1.clone();
        self.start_at = end_at + 1;

        if !self.code_blocks {
            return;
        }
        let raw = self.source[range].trim_end_matches('\n').to_string();
        self.join_snippet(&raw);
    }

    /// Joins a formatted line into the current snippet, flushing first when
    /// the pair would reach the chunk size.
    fn join_snippet(&mut self, snippet: &str) {
        if snippet.is_empty() {
            return;
        }
        if self.cur_snippet.is_empty() {
            self.cur_snippet = snippet.to_string();
            return;
        }

        if (self.len_func)(&self.cur_snippet) + (self.len_func)(snippet) >= self.chunk_size {
            self.apply_to_chunks();
            self.cur_snippet = snippet.to_string();
        } else {
            self.cur_snippet = format!("{}\n{}", self.cur_snippet, snippet);
        }
    }

    /// Flushes the current snippet into the chunk list, prefixed with the
    /// enclosing header on first use. Oversized snippets are delegated to
    /// the secondary splitter. A header with no body text still survives as
    /// its own chunk.
    fn apply_to_chunks(&mut self) {
        let snippet = std::mem::take(&mut self.cur_snippet);

        let mut chunks: Vec<String> = Vec::new();
        if !snippet.is_empty() {
            if (self.len_func)(&snippet) <= self.chunk_size + self.chunk_overlap {
                chunks.push(snippet.clone());
            } else {
                chunks = self
                    .second_splitter
                    .split_text(&snippet)
                    .unwrap_or_else(|_| vec![snippet.clone()]);
            }
        }

        if chunks.is_empty() && !self.h_title.is_empty() && !self.h_title_prepended {
            self.chunks.push(self.h_title.clone());
            self.h_title_prepended = true;
            return;
        }

        for chunk in chunks {
            if chunk.is_empty() {
                continue;
            }
            self.h_title_prepended = true;
            if !self.h_title.is_empty() && !snippet.contains(&self.h_title) {
                self.chunks.push(format!("{}\n{}", self.h_title, chunk));
            } else {
                self.chunks.push(chunk);
            }
        }
    }

    /// Renders the inline events in `[from, to)` back to markdown text:
    /// emphasis markers, inline code backticks, soft and hard breaks.
    /// Links and images fall back to their raw source span; reference
    /// links render resolved when `reference_links` is set.
    fn render_inline(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        let mut idx = from;
        while idx < to {
            let (event, range) = &self.events[idx];
            match event {
                Event::Text(text) => out.push_str(text),
                Event::Code(code) => {
                    out.push('`');
                    out.push_str(code);
                    out.push('`');
                }
                Event::InlineHtml(html) => out.push_str(html),
                Event::SoftBreak => out.push('\n'),
                Event::HardBreak => out.push_str("\\\n"),
                Event::Start(Tag::Emphasis) | Event::End(TagEnd::Emphasis) => out.push('*'),
                Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => out.push_str("**"),
                Event::Start(Tag::Strikethrough) | Event::End(TagEnd::Strikethrough) => {
                    out.push_str("~~")
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) => {
                    let close = self.index_of_close(idx);
                    if self.reference_links && is_reference_link(*link_type) {
                        let text = self.render_inline(idx + 1, close);
                        out.push_str(&format_link(&text, dest_url, title));
                    } else {
                        out.push_str(&self.source[range.clone()]);
                    }
                    idx = close;
                }
                Event::Start(Tag::Image { .. }) => {
                    let close = self.index_of_close(idx);
                    out.push_str(&self.source[range.clone()]);
                    idx = close;
                }
                _ => {}
            }
            idx += 1;
        }
        out
    }
}

/// True for events that end the leading inline run of a tight list item.
fn is_block_boundary(event: &Event) -> bool {
    match event {
        Event::Rule => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Paragraph
                | Tag::Heading { .. }
                | Tag::BlockQuote(_)
                | Tag::CodeBlock(_)
                | Tag::HtmlBlock
                | Tag::List(_)
                | Tag::Item
                | Tag::Table(_)
        ),
        _ => false,
    }
}

fn is_reference_link(link_type: LinkType) -> bool {
    matches!(
        link_type,
        LinkType::Reference
            | LinkType::ReferenceUnknown
            | LinkType::Collapsed
            | LinkType::CollapsedUnknown
            | LinkType::Shortcut
            | LinkType::ShortcutUnknown
    )
}

fn format_link(text: &str, dest: &CowStr, title: &CowStr) -> String {
    if title.is_empty() {
        format!("[{text}]({dest})")
    } else {
        format!("[{text}]({dest} \"{title}\")")
    }
}

/// Prefixes every line of `value` with `mark`.
fn indent_lines(value: &str, mark: &str) -> String {
    value
        .split('\n')
        .map(|line| format!("{mark}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn table_row_in_markdown(row: &[String]) -> String {
    if row.is_empty() {
        return String::new();
    }
    let cells: Vec<String> = row.iter().map(|cell| format!("| {cell} ")).collect();
    format!("{}|", cells.concat())
}

fn table_header_in_markdown(header: &[String]) -> String {
    let separators: Vec<String> = header.iter().map(|_| "---".to_string()).collect();
    format!(
        "{}\n{}",
        table_row_in_markdown(header),
        table_row_in_markdown(&separators)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> MarkdownSplitter {
        MarkdownSplitter::new(
            SplitterOptions::default()
                .with_chunk_size(chunk_size)
                .with_chunk_overlap(chunk_overlap),
        )
    }

    #[test]
    fn test_header_and_bullet_list() {
        let markdown = "\n### This is a header\n\n- This is a list item of bullet type.\n- This is another list item.\n\n *Everything* is going according to **plan**.\n";
        let chunks = splitter(64, 32).split_text(markdown).unwrap();
        assert_eq!(
            chunks,
            vec![
                "### This is a header\n- This is a list item of bullet type.",
                "### This is a header\n- This is another list item.",
                "### This is a header\n*Everything* is going according to **plan**.",
            ]
        );
    }

    #[test]
    fn test_table_one_chunk_per_row() {
        let markdown = "| Syntax      | Description |\n| ----------- | ----------- |\n| Header      | Title       |\n| Paragraph   | Text        |";
        let expected = vec![
            "| Syntax | Description |\n| --- | --- |\n| Header | Title |",
            "| Syntax | Description |\n| --- | --- |\n| Paragraph | Text |",
        ];
        assert_eq!(splitter(64, 32).split_text(markdown).unwrap(), expected);
        // Rows are never merged, regardless of how roomy the chunks are.
        assert_eq!(splitter(512, 64).split_text(markdown).unwrap(), expected);
    }

    #[test]
    fn test_bare_header_survives_as_chunk() {
        let chunks = splitter(512, 64).split_text("### Title").unwrap();
        assert_eq!(chunks, vec!["### Title"]);
    }

    #[test]
    fn test_header_after_header() {
        let markdown = "\n### Your First Code Contribution\n\n#### Make Changes\n\n##### Make changes in the UI\n\nClick **Make a contribution** at the bottom of any docs page to make small changes such as a typo, sentence fix, or a\nbroken link. This takes you to the .md file where you can make your changes and [create a pull request](#pull-request)\nfor a review.\n\n##### Make changes locally\n\n1. Fork the repository.\n\n2. Install or make sure **Golang** is updated.\n\n3. Create a working branch and start with your changes!\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(
            chunks,
            vec![
                "### Your First Code Contribution",
                "#### Make Changes",
                "##### Make changes in the UI\nClick **Make a contribution** at the bottom of any docs page to make small changes such as a typo, sentence fix, or a\nbroken link. This takes you to the .md file where you can make your changes and [create a pull request](#pull-request)\nfor a review.",
                "##### Make changes locally\n1. Fork the repository.\n2. Install or make sure **Golang** is updated.\n3. Create a working branch and start with your changes!",
            ]
        );
    }

    #[test]
    fn test_nested_bullet_list_indentation() {
        let markdown = "\n- [Code of Conduct](#code-of-conduct)\n- [I Have a Question](#i-have-a-question)\n- [I Want To Contribute](#i-want-to-contribute)\n    - [Reporting Bugs](#reporting-bugs)\n        - [Before Submitting a Bug Report](#before-submitting-a-bug-report)\n        - [How Do I Submit a Good Bug Report?](#how-do-i-submit-a-good-bug-report)\n    - [Suggesting Enhancements](#suggesting-enhancements)\n        - [Before Submitting an Enhancement](#before-submitting-an-enhancement)\n        - [How Do I Submit a Good Enhancement Suggestion?](#how-do-i-submit-a-good-enhancement-suggestion)\n    - [Your First Code Contribution](#your-first-code-contribution)\n        - [Make Changes](#make-changes)\n            - [Make changes in the UI](#make-changes-in-the-ui)\n            - [Make changes locally](#make-changes-locally)\n        - [Commit your update](#commit-your-update)\n        - [Pull Request](#pull-request)\n        - [Your PR is merged!](#your-pr-is-merged)\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(
            chunks,
            vec![
                "- [Code of Conduct](#code-of-conduct)\n- [I Have a Question](#i-have-a-question)",
                "- [I Want To Contribute](#i-want-to-contribute)\n  - [Reporting Bugs](#reporting-bugs)\n    - [Before Submitting a Bug Report](#before-submitting-a-bug-report)\n    - [How Do I Submit a Good Bug Report?](#how-do-i-submit-a-good-bug-report)\n  - [Suggesting Enhancements](#suggesting-enhancements)\n    - [Before Submitting an Enhancement](#before-submitting-an-enhancement)\n    - [How Do I Submit a Good Enhancement Suggestion?](#how-do-i-submit-a-good-enhancement-suggestion)",
                "  - [Your First Code Contribution](#your-first-code-contribution)\n    - [Make Changes](#make-changes)\n      - [Make changes in the UI](#make-changes-in-the-ui)\n      - [Make changes locally](#make-changes-locally)\n    - [Commit your update](#commit-your-update)\n    - [Pull Request](#pull-request)\n    - [Your PR is merged!](#your-pr-is-merged)",
            ]
        );
    }

    #[test]
    fn test_code_fence_skipped_by_default() {
        let markdown = "example code:\n```go\nfunc main() {}\n```";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["example code:"]);
    }

    #[test]
    fn test_code_fence_kept_verbatim_when_enabled() {
        let markdown = "example code:\n```go\nfunc main() {}\n```";
        let sp = MarkdownSplitter::new(
            SplitterOptions::default()
                .with_chunk_size(512)
                .with_chunk_overlap(64)
                .with_code_blocks(true),
        );
        let chunks = sp.split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["example code:\n```go\nfunc main() {}\n```"]);
    }

    #[test]
    fn test_horizontal_rule_is_skipped() {
        let markdown = "example code:\n\n---\nmore text\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["example code:\nmore text"]);
    }

    #[test]
    fn test_inline_emphasis_markers_survive() {
        let markdown = "text with *emphasis*, **strong emphasis** and ~~strikethrough~~";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec![markdown]);
    }

    #[test]
    fn test_hard_and_soft_breaks() {
        let markdown = "text with\\\nhard break\nsoft break";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["text with\\\nhard break\nsoft break"]);
    }

    #[test]
    fn test_images_are_kept_verbatim() {
        let markdown = "images:\n![one](/path/to/one.png)\n![two](/path/to/two.png \"two\")\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(
            chunks,
            vec!["images:\n![one](/path/to/one.png)\n![two](/path/to/two.png \"two\")"]
        );
    }

    #[test]
    fn test_reference_links_left_as_written_by_default() {
        let markdown = "links:\n[foo][bar]\n\n[bar]: /url \"title\"\n\n[regular](/url)\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["links:\n[foo][bar]\n[regular](/url)"]);
    }

    #[test]
    fn test_reference_links_resolved_when_enabled() {
        let markdown = "links:\n[foo][bar]\n\n[bar]: /url \"title\"\n\n[regular](/url)\n";
        let sp = MarkdownSplitter::new(
            SplitterOptions::default()
                .with_chunk_size(512)
                .with_chunk_overlap(64)
                .with_reference_links(true),
        );
        let chunks = sp.split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["links:\n[foo](/url \"title\")\n[regular](/url)"]);
    }

    #[test]
    fn test_blockquote_prefix() {
        let markdown = "> quoted line\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["> quoted line"]);
    }

    #[test]
    fn test_long_paragraph_delegates_to_second_splitter() {
        let markdown = "alpha beta gamma delta";
        let chunks = splitter(10, 0).split_text(markdown).unwrap();
        assert_eq!(chunks, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn test_empty_input() {
        let chunks = splitter(512, 64).split_text("").unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_malformed_markdown_degrades_to_text() {
        let markdown = "| not | really\na table ||\n";
        let chunks = splitter(512, 64).split_text(markdown).unwrap();
        assert!(!chunks.is_empty());
    }
}
