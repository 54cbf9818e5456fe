use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Flattens markdown (as used in detailed solutions) into terminal text.
///
/// Paragraphs and headings become blank-line separated blocks, list items are
/// prefixed with `- `, and inline markup is dropped.
#[must_use]
pub fn solution_plain_text(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut out = String::with_capacity(input.len());
    for event in Parser::new_ext(input, options) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Start(Tag::Item) => out.push_str("- "),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                out.push_str("\n\n");
            }
            Event::End(TagEnd::Item | TagEnd::TableRow | TagEnd::TableHead) => out.push('\n'),
            Event::End(TagEnd::TableCell) => out.push_str("  "),
            Event::Html(html) | Event::InlineHtml(html) => {
                if html.trim_start().to_ascii_lowercase().starts_with("<br") {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }

    collapse_blank_lines(out.trim())
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_markup() {
        assert_eq!(
            solution_plain_text("**Transcription** copies the *template* strand."),
            "Transcription copies the template strand."
        );
    }

    #[test]
    fn keeps_paragraphs_and_lists() {
        let text = solution_plain_text("# Why\n\nBecause:\n\n- one\n- two\n");
        assert_eq!(text, "Why\n\nBecause:\n\n- one\n- two");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(solution_plain_text("  simple  "), "simple");
    }
}
