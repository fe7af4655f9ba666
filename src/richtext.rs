//! Inline markup inside titles, bodies and table cells.
//!
//! Content strings may use the tag vocabulary of paragraph markup in other PDF toolkits:
//! `<b>bold</b>`, `<i>italic</i>` and `<u>underline</u>` (all nestable), the line break `<br/>` and
//! the character entities `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and `&nbsp;`.  An `&` that
//! does not start one of these entities is kept as a literal character.  The formatters keep the
//! markup verbatim; it is turned into [`Span`]s only when blocks are converted into `genpdf`
//! elements.
//!
//! Source line breaks are whitespace.  A `<br/>` becomes a `'\n'` inside the span text, which the
//! text element renders as a hard line break.

use std::fmt;

use genpdf::style::Style;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Convenience shorthand that marks the span as underlined.
    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Returns the font attributes of the span as a renderer style.
    ///
    /// The block style (font size, column face) is merged in by the element the span is
    /// rendered in.  Underlining is drawn by that element and has no renderer style.
    pub fn style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl StyleState {
    fn to_span(self, text: String) -> Span {
        Span {
            text,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
}

impl Tag {
    fn opening(self) -> &'static str {
        match self {
            Tag::Bold => "<b>",
            Tag::Italic => "<i>",
            Tag::Underline => "<u>",
        }
    }

    fn closing(self) -> &'static str {
        match self {
            Tag::Bold => "</b>",
            Tag::Italic => "</i>",
            Tag::Underline => "</u>",
        }
    }

    fn apply(self, mut state: StyleState) -> StyleState {
        match self {
            Tag::Bold => state.bold = true,
            Tag::Italic => state.italic = true,
            Tag::Underline => state.underline = true,
        }
        state
    }
}

const TAGS: [Tag; 3] = [Tag::Bold, Tag::Italic, Tag::Underline];

const LINE_BREAKS: [&str; 3] = ["<br/>", "<br />", "<br>"];

const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&nbsp;", '\u{a0}'),
];

/// Parses inline markup into a list of [`Span`]s.
///
/// Text without tags or entities yields a single plain span; an empty string yields no spans.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, index) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(index, input.len());
    Ok(spans)
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    open: Option<Tag>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    'outer: while index < input.len() {
        let rest = &input[index..];

        if let Some(tag) = open {
            if rest.starts_with(tag.closing()) {
                flush_buffer(&mut buffer, &mut spans, state);
                return Ok((spans, index + tag.closing().len()));
            }
        }

        if rest.starts_with('<') {
            if let Some(line_break) = LINE_BREAKS.iter().find(|tag| rest.starts_with(**tag)) {
                buffer.push('\n');
                index += line_break.len();
                continue;
            }
            for tag in TAGS {
                if rest.starts_with(tag.opening()) {
                    flush_buffer(&mut buffer, &mut spans, state);
                    let start = index + tag.opening().len();
                    let (nested, next) = parse_inner(input, start, tag.apply(state), Some(tag))?;
                    spans.extend(nested);
                    index = next;
                    continue 'outer;
                }
            }
            let message = if rest.starts_with("</") {
                "closing tag without matching opening tag"
            } else {
                "unsupported tag; use <b>, <i>, <u>, <br/> or &lt; for a literal `<`"
            };
            return Err(ParseError::new(index, message));
        }

        if let Some((name, ch)) = ENTITIES.iter().find(|(name, _)| rest.starts_with(name)) {
            buffer.push(*ch);
            index += name.len();
            continue;
        }

        if let Some(ch) = rest.chars().next() {
            buffer.push(if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch });
            index += ch.len_utf8();
        }
    }

    if let Some(tag) = open {
        Err(ParseError::new(
            index,
            format!("unterminated {} tag", tag.opening()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_span() {
        let spans = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(spans, vec![Span::new("Hello world")]);
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(parse_markup("").unwrap().is_empty());
    }

    #[test]
    fn nested_tags_combine() {
        let spans = parse_markup("Use <b>git <i>rebase</i></b> now").expect("parse succeeds");
        assert_eq!(
            spans,
            vec![
                Span::new("Use "),
                Span::new("git ").bold(),
                Span::new("rebase").bold().italic(),
                Span::new(" now"),
            ]
        );
    }

    #[test]
    fn entities_are_decoded() {
        let spans = parse_markup("a &lt; b &amp;&amp; c").expect("parse succeeds");
        assert_eq!(spans, vec![Span::new("a < b && c")]);
    }

    #[test]
    fn span_to_style_reflects_flags() {
        let span = Span::new("Hello").bold().italic();
        assert_eq!(span.text(), "Hello");
        assert!(span.style().is_bold());
        assert!(span.style().is_italic());
        assert!(!span.is_underlined());
    }

    #[test]
    fn error_on_unterminated_tag() {
        let err = parse_markup("<b>oops").unwrap_err();
        assert!(err.message().contains("unterminated <b>"));
        assert_eq!(err.index(), 7);
    }

    #[test]
    fn error_on_stray_closing_tag() {
        let err = parse_markup("x</i>").unwrap_err();
        assert_eq!(err.index(), 1);
    }

    #[test]
    fn error_on_unknown_tag() {
        assert!(parse_markup("a < b").is_err());
        let err = parse_markup("<font>x</font>").unwrap_err();
        assert_eq!(err.index(), 0);
    }

    #[test]
    fn bare_ampersands_are_literal() {
        let spans = parse_markup("cmd1 && cmd2 &foo; fish & chips").expect("parse succeeds");
        assert_eq!(spans, vec![Span::new("cmd1 && cmd2 &foo; fish & chips")]);
    }

    #[test]
    fn underline_nests_with_other_tags() {
        let spans = parse_markup("<u>under <b>bold</b></u>").expect("parse succeeds");
        assert_eq!(
            spans,
            vec![
                Span::new("under ").underlined(),
                Span::new("bold").underlined().bold(),
            ]
        );
        assert!(!spans[1].style().is_italic());
        assert!(spans[1].style().is_bold());
    }

    #[test]
    fn line_break_tags_become_newlines() {
        let spans = parse_markup("line one<br/>line two<br />three<br>four").expect("parse");
        assert_eq!(spans, vec![Span::new("line one\nline two\nthree\nfour")]);
    }

    #[test]
    fn source_newlines_are_whitespace() {
        let spans = parse_markup("one\ntwo\tthree").expect("parse succeeds");
        assert_eq!(spans, vec![Span::new("one two three")]);
    }
}
