//! Whitespace-collapse algorithm (spec.md §4.4.6).

use crate::options::Options;
use crate::tag_tables::{is_form_control, is_inline_element, is_inline_text_element};
use crate::token::TagContext;

fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0C}')
}

/// Whether a tag name (possibly prefixed with `/` for an end tag, or the
/// literal `"comment"`) counts as inline-around for trim-direction purposes.
fn tag_counts_as_inline(tag: &str, options: &Options) -> bool {
    let bare = tag.strip_prefix('/').unwrap_or(tag);
    if bare == "comment" {
        return true;
    }
    is_inline_element(bare)
        || is_inline_text_element(bare)
        || options
            .inline_custom_elements
            .iter()
            .any(|c| c.eq_ignore_ascii_case(bare))
}

fn always_keeps_surrounding_whitespace(tag: Option<&str>) -> bool {
    matches!(
        tag.map(|t| t.trim_start_matches('/')),
        Some("comment") | Some("img") | Some("input") | Some("wbr")
    )
}

fn is_hidden_input(tag: Option<&str>, attrs: &[crate::token::Attribute]) -> bool {
    tag.map(|t| t.trim_start_matches('/')) == Some("input")
        && attrs.iter().any(|a| {
            a.name.eq_ignore_ascii_case("type")
                && a.value.as_deref().unwrap_or("").eq_ignore_ascii_case("hidden")
        })
}

/// Decide left/right trim flags for a text node from its surrounding tag
/// context (spec.md §4.4.6).
pub fn compute_trim_flags(ctx: &TagContext, options: &Options) -> (bool, bool) {
    let prev = ctx.prev_tag.as_deref();
    let next = ctx.next_tag.as_deref();

    if always_keeps_surrounding_whitespace(prev) && !is_hidden_input(prev, &ctx.prev_attrs) {
        return (false, false);
    }
    if always_keeps_surrounding_whitespace(next) && !is_hidden_input(next, &ctx.next_attrs) {
        return (false, false);
    }

    if options.collapse_inline_tag_whitespace {
        let prev_fc = prev.map(|t| is_form_control(t.trim_start_matches('/'))).unwrap_or(false);
        let next_fc = next.map(|t| is_form_control(t.trim_start_matches('/'))).unwrap_or(false);
        if prev_fc && next_fc {
            return (true, true);
        }
    }

    let trim_left = match prev {
        None => true,
        Some(t) => !tag_counts_as_inline(t, options),
    };
    let trim_right = match next {
        None => true,
        Some(t) => !tag_counts_as_inline(t, options),
    };

    (trim_left, trim_right)
}

/// Collapse whitespace in `text` per the computed trim flags.
///
/// - `preserve_line_breaks`: a leading/trailing newline in the *trimmed*
///   region is re-inserted after trimming.
/// - `conservative_collapse`: never trims away the last whitespace entirely,
///   leaving one space (or a tab, if only tabs were present).
/// - U+00A0 (no-break space) is preserved in position relative to other
///   whitespace and survives interior collapsing.
pub fn collapse_whitespace(
    text: &str,
    options: &Options,
    trim_left: bool,
    trim_right: bool,
    collapse_all: bool,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut left = 0;
    let mut right = chars.len();

    while left < right && is_html_whitespace(chars[left]) {
        left += 1;
    }
    while right > left && is_html_whitespace(chars[right - 1]) {
        right -= 1;
    }

    let had_leading_ws = left > 0;
    let had_trailing_ws = right < chars.len();
    let leading_had_newline = chars[..left].iter().any(|&c| c == '\n');
    let trailing_had_newline = chars[right..].iter().any(|&c| c == '\n');
    let leading_all_tabs = left > 0 && chars[..left].iter().all(|&c| c == '\t');
    let trailing_all_tabs = right < chars.len() && chars[right..].iter().all(|&c| c == '\t');

    let mut out = String::new();

    if had_leading_ws && (!trim_left || options.conservative_collapse) {
        if options.preserve_line_breaks && leading_had_newline {
            out.push('\n');
        } else if options.conservative_collapse {
            out.push(if leading_all_tabs { '\t' } else { ' ' });
        } else if !trim_left {
            out.push(' ');
        }
    }

    let body = &chars[left..right];
    if collapse_all {
        let mut i = 0;
        while i < body.len() {
            if is_html_whitespace(body[i]) {
                let run_all_tabs = {
                    let mut j = i;
                    let mut all_tabs = true;
                    while j < body.len() && is_html_whitespace(body[j]) {
                        if body[j] != '\t' {
                            all_tabs = false;
                        }
                        j += 1;
                    }
                    all_tabs
                };
                if run_all_tabs && body[i] == '\t' {
                    out.push('\t');
                } else {
                    out.push(' ');
                }
                while i < body.len() && is_html_whitespace(body[i]) {
                    i += 1;
                }
            } else if body[i] == '\u{A0}' {
                out.push('\u{A0}');
                i += 1;
            } else {
                out.push(body[i]);
                i += 1;
            }
        }
    } else {
        out.extend(body.iter());
    }

    if had_trailing_ws && (!trim_right || options.conservative_collapse) {
        if options.preserve_line_breaks && trailing_had_newline {
            out.push('\n');
        } else if options.conservative_collapse {
            out.push(if trailing_all_tabs { '\t' } else { ' ' });
        } else if !trim_right {
            out.push(' ');
        }
    }

    out
}

/// Convenience wrapper combining [`compute_trim_flags`] and
/// [`collapse_whitespace`] for a text node, per spec.md §4.4.3 step 2.
pub fn collapse_whitespace_smart(text: &str, ctx: &TagContext, options: &Options) -> String {
    let (trim_left, trim_right) = compute_trim_flags(ctx, options);
    collapse_whitespace(text, options, trim_left, trim_right, true)
}
