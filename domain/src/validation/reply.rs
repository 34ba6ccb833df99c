//! Structural validation of model replies
//!
//! A reply passes when it contains at least [`REQUIRED_BULLETS`] bulleted
//! lines. Only the shape is checked: the bullets are not compared with the
//! topics the card asked for.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

/// Minimum number of bulleted lines in a valid reply (every card asks for five)
pub const REQUIRED_BULLETS: usize = 5;

/// `1. `, `12. `, `- ` or `* ` at the start of a line, after optional indentation
static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\S\n]*(?:[0-9]+\.|[-*])[^\S\n]").expect("bullet pattern is valid")
});

/// Elements that start a new line when flattened to text
const LINE_BREAK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "tr", "table", "pre", "blockquote", "section",
    "article", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
];

/// Stateless reply validator
#[derive(Debug, Clone, Copy)]
pub struct ReplyValidator {
    required: usize,
}

impl ReplyValidator {
    pub fn new() -> Self {
        Self {
            required: REQUIRED_BULLETS,
        }
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn is_valid(&self, text: &str) -> bool {
        count_bullets(text) >= self.required
    }
}

impl Default for ReplyValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true when `text` has at least five bulleted lines once markup
/// is stripped.
pub fn is_valid_reply(text: &str) -> bool {
    ReplyValidator::new().is_valid(text)
}

/// Count bulleted lines, taking the better of the raw text and the text
/// with markup stripped and entities decoded.
///
/// A stray `<` in plain prose (`RSRP<threshold`) reads as an unterminated
/// tag to the HTML parser, which then drops the rest of the reply, so the
/// raw count is kept as a floor.
pub fn count_bullets(text: &str) -> usize {
    let raw = count_bullet_lines(text);
    if !text.contains('<') && !text.contains('&') {
        return raw;
    }
    raw.max(count_bullet_lines(&strip_markup(text)))
}

fn count_bullet_lines(text: &str) -> usize {
    text.lines().filter(|line| BULLET_LINE.is_match(line)).count()
}

/// Flatten markup to plain text, decoding HTML entities.
///
/// Block-level elements and `<br>` end the current line so that one bullet
/// per `<p>` or `<li>` still yields one bullet per line.
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    let mut out = String::with_capacity(text.len());
    collect_text(fragment.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef, out: &mut String) {
    let breaks_line = LINE_BREAK_TAGS.contains(&element.value().name());
    if breaks_line {
        end_line(out);
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }

    if breaks_line {
        end_line(out);
    }
}

fn end_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_NUMBERED: &str = "1. Concept\n2. Domain\n3. Spec\n4. Params\n5. Use cases";

    #[test]
    fn test_five_numbered_bullets_pass() {
        assert!(is_valid_reply(FIVE_NUMBERED));
        assert_eq!(count_bullets(FIVE_NUMBERED), 5);
    }

    #[test]
    fn test_four_bullets_fail() {
        let text = "1. Concept\n2. Domain\n3. Spec\n4. Params\nThat's all.";
        assert!(!is_valid_reply(text));
        assert_eq!(count_bullets(text), 4);
    }

    #[test]
    fn test_dash_and_asterisk_bullets() {
        assert!(is_valid_reply("- a\n- b\n- c\n- d\n- e"));
        assert!(is_valid_reply("* a\n* b\n* c\n* d\n* e"));
        assert!(is_valid_reply("1. a\n- b\n* c\n4. d\n- e"));
    }

    #[test]
    fn test_more_than_five_passes() {
        let text = "1. a\n2. b\n3. c\n4. d\n5. e\n6. f";
        assert!(is_valid_reply(text));
    }

    #[test]
    fn test_marker_needs_following_whitespace() {
        let text = "1.a\n2.b\n3.c\n4.d\n5.e";
        assert_eq!(count_bullets(text), 0);
        assert_eq!(count_bullets("**Concept**\n---\n-1"), 0);
    }

    #[test]
    fn test_indented_bullets_count() {
        let text = "Answer:\n  1. a\n  2. b\n\t3. c\n   - d\n   * e";
        assert!(is_valid_reply(text));
    }

    #[test]
    fn test_bullets_mid_line_do_not_count() {
        let text = "see 1. a and 2. b and 3. c and 4. d and 5. e";
        assert_eq!(count_bullets(text), 0);
    }

    #[test]
    fn test_markup_wrapped_bullets_count() {
        let text = "<p>1. Concept</p>\n<p>2. Domain</p>\n<p><b>3.</b> Spec</p>\n<p>4. Params</p>\n<p>5. Use cases</p>";
        assert!(is_valid_reply(text));
    }

    #[test]
    fn test_block_tags_split_lines() {
        let text = "<div>1. a</div><div>2. b</div><div>3. c</div><div>4. d</div><div>5. e</div>";
        assert_eq!(count_bullets(text), 5);
        let text = "1. a<br>2. b<br/>3. c<br>4. d<br>5. e";
        assert_eq!(count_bullets(text), 5);
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(strip_markup("R&amp;D &lt;5&gt;"), "R&D <5>");
        let text = "1.&nbsp;a\n2.&nbsp;b\n3.&nbsp;c\n4.&nbsp;d\n5.&nbsp;e";
        assert!(is_valid_reply(text));
    }

    #[test]
    fn test_bare_angle_bracket_in_prose_keeps_every_line() {
        let text = "1. Handover when RSRP<threshold\n2. b\n3. c\n4. d\n5. e";
        assert_eq!(count_bullets(text), 5);
        assert!(is_valid_reply(text));

        let text = "1. R&D x<y\n2. b\n3. c\n4. d\n5. e";
        assert!(is_valid_reply(text));
    }

    #[test]
    fn test_markup_count_still_wins_when_higher() {
        let text = "<ol><li>1. a</li><li>2. b</li><li>3. c</li><li>4. d</li><li>5. e</li></ol>";
        assert_eq!(count_bullets(text), 5);
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(strip_markup(FIVE_NUMBERED), FIVE_NUMBERED);
    }

    #[test]
    fn test_empty_reply_fails() {
        assert!(!is_valid_reply(""));
        assert!(!ReplyValidator::default().is_valid("   \n  "));
        assert_eq!(ReplyValidator::default().required(), REQUIRED_BULLETS);
    }
}
