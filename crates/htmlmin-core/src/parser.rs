//! Streaming, event-driven HTML tokenizer (spec.md §4.1).
//!
//! Grounded on the teacher's `tag_processor.rs`: a single advancing byte
//! cursor (`pos`), `strpos`/`strspn`/`strcspn`-based scanning, and the same
//! "detect, consume, emit" loop shape as `base_class_next_token` /
//! `parse_next_tag`. Reworked from the teacher's lazy-lexical-update /
//! bookmark design into a pull iterator per spec.md §9's own guidance, since
//! this port has no async handler interleaving to preserve.

use crate::error::{CoreError, ErrorContext};
use crate::macros::{strcspn, strspn};
use crate::str_fns::{starts_with_ci, strpos};
use crate::tag_tables::{is_raw_text_element, is_void_element};
use crate::token::{Attribute, EndTag, Quote, StartTag, TagContext, Token};

/// One entry on the parser's tag stack: the parser's source of truth for
/// "what is open" (spec.md §3).
#[derive(Clone, Debug)]
pub struct TagStackEntry {
    pub name: String,
    pub lower_name: String,
    pub attrs: Vec<Attribute>,
}

pub struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    /// Byte offset `line`/`column` were last computed for.
    line_mark: usize,
    stack: Vec<TagStackEntry>,
    partial_markup: bool,
    continue_on_parse_error: bool,
    html5: bool,
    /// Literal assignment operators accepted in place of `=`.
    custom_attr_assign: Vec<String>,
    /// Literal `(before, after)` marker pairs that wrap a whole attribute.
    custom_attr_surround: Vec<(String, String)>,
    /// Buffered tag awaiting emission while the parser looks ahead for the
    /// following tag name (feeds `Chars.ctx.next_tag`).
    pending: std::collections::VecDeque<Token>,
    finished_stack_drain: bool,
    done: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, partial_markup: bool, continue_on_parse_error: bool, html5: bool) -> Self {
        Self::with_custom_attr_grammar(input, partial_markup, continue_on_parse_error, html5, Vec::new(), Vec::new())
    }

    pub fn with_custom_attr_grammar(
        input: &'a str,
        partial_markup: bool,
        continue_on_parse_error: bool,
        html5: bool,
        custom_attr_assign: Vec<String>,
        custom_attr_surround: Vec<(String, String)>,
    ) -> Self {
        Parser {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            line_mark: 0,
            stack: Vec::new(),
            partial_markup,
            continue_on_parse_error,
            html5,
            custom_attr_assign,
            custom_attr_surround,
            pending: std::collections::VecDeque::new(),
            finished_stack_drain: false,
            done: false,
        }
    }

    pub fn open_stack(&self) -> &[TagStackEntry] {
        &self.stack
    }

    fn advance_line_tracking_to(&mut self, pos: usize) {
        for &b in &self.input[self.line_mark..pos.min(self.input.len())] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.line_mark = pos.max(self.line_mark);
    }

    fn parse_error(&mut self, at: usize) -> CoreError {
        self.advance_line_tracking_to(at);
        let start = at.saturating_sub(25);
        let end = (at + 25).min(self.input.len());
        let snippet = String::from_utf8_lossy(&self.input[start..end]).into_owned();
        CoreError::Parse(ErrorContext {
            line: self.line,
            column: self.column,
            snippet,
        })
    }

    /// Pull the next token. Returns `Ok(None)` at end of input (after
    /// synthesising closers for any still-open elements, unless
    /// `partial_markup`). Returns `Err` on malformed markup when
    /// `continue_on_parse_error` is unset.
    pub fn next_token(&mut self) -> Result<Option<Token>, CoreError> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(Some(tok));
            }
            if self.done {
                return Ok(None);
            }
            if self.pos >= self.input.len() {
                self.done = true;
                if !self.partial_markup && !self.finished_stack_drain {
                    self.finished_stack_drain = true;
                    self.synthesize_stack_closers();
                    continue;
                }
                return Ok(None);
            }

            if let Some(top) = self.stack.last() {
                if is_raw_text_element(&top.lower_name) {
                    return self.consume_raw_text(top.name.clone(), top.lower_name.clone());
                }
            }

            if self.input[self.pos] == b'<' {
                match self.try_markup() {
                    Ok(Some(tok)) => return Ok(Some(tok)),
                    Ok(None) => continue,
                    Err(e) => {
                        if self.continue_on_parse_error {
                            self.pos += 1;
                            continue;
                        }
                        return Err(e);
                    }
                }
            }

            return Ok(Some(self.consume_chars()));
        }
    }

    fn synthesize_stack_closers(&mut self) {
        while let Some(entry) = self.stack.pop() {
            self.pending.push_back(Token::End(EndTag {
                name: entry.name,
                attrs: Vec::new(),
                auto_generated: true,
            }));
        }
    }

    /// Dispatch at `<`: comment, downlevel-revealed conditional, doctype,
    /// end tag, start tag, in that order (spec.md §4.1).
    fn try_markup(&mut self) -> Result<Option<Token>, CoreError> {
        let at = self.pos;
        debug_assert_eq!(self.input[at], b'<');

        if starts_with_ci(self.input, at, b"<!--") {
            return self.consume_comment().map(Some);
        }
        if starts_with_ci(self.input, at, b"<![") && !starts_with_ci(self.input, at, b"<![cdata[") {
            return self.consume_downlevel_conditional().map(Some);
        }
        if starts_with_ci(self.input, at, b"<![cdata[") {
            return self.consume_cdata().map(Some);
        }
        if starts_with_ci(self.input, at, b"<!") {
            return self.consume_doctype().map(Some);
        }
        if at + 1 < self.input.len() && self.input[at + 1] == b'/' {
            return self.consume_end_tag().map(Some);
        }
        if at + 1 < self.input.len() && self.input[at + 1].is_ascii_alphabetic() {
            return self.consume_start_tag().map(Some);
        }

        Err(self.parse_error(at))
    }

    fn consume_comment(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let body_start = at + 4;
        let close = strpos(self.input, b"-->", body_start).ok_or_else(|| self.parse_error_here())?;
        let text = String::from_utf8_lossy(&self.input[body_start..close]).into_owned();
        self.pos = close + 3;
        Ok(Token::Comment {
            text,
            non_standard: false,
        })
    }

    fn parse_error_here(&mut self) -> CoreError {
        let at = self.pos;
        self.parse_error(at)
    }

    /// `<![if ...]> ... <![endif]>`: a non-standard "downlevel-revealed"
    /// conditional comment, modelled as a comment with `non_standard: true`.
    fn consume_downlevel_conditional(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let close_tag_open =
            strpos(self.input, b"<![endif]>", at).ok_or_else(|| self.parse_error_here())?;
        let inner_end = close_tag_open;
        let header_close = strpos(self.input, b"]>", at).ok_or_else(|| self.parse_error_here())?;
        let text = String::from_utf8_lossy(&self.input[at + 2..inner_end]).into_owned();
        let _ = header_close;
        self.pos = close_tag_open + "<![endif]>".len();
        Ok(Token::Comment {
            text,
            non_standard: true,
        })
    }

    fn consume_cdata(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let body_start = at + "<![CDATA[".len();
        let close = strpos(self.input, b"]]>", body_start).ok_or_else(|| self.parse_error_here())?;
        let text = String::from_utf8_lossy(&self.input[body_start..close]).into_owned();
        self.pos = close + 3;
        // CDATA outside script/style is unwrapped; the driver decides what
        // to do with the text, so it is surfaced as a Comment-free Chars
        // token carrying the raw body.
        Ok(Token::Chars {
            text,
            ctx: TagContext::default(),
        })
    }

    fn consume_doctype(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let close = strpos(self.input, b">", at).ok_or_else(|| self.parse_error_here())?;
        let text = String::from_utf8_lossy(&self.input[at..=close]).into_owned();
        self.pos = close + 1;
        Ok(Token::Doctype { text })
    }

    fn consume_end_tag(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let name_start = at + 2;
        let name_len = strcspn!(
            self.input,
            b' ' | b'\t' | 0x0c | b'\r' | b'\n' | b'>',
            name_start
        );
        if name_len == 0 {
            return Err(self.parse_error(at));
        }
        let name = String::from_utf8_lossy(&self.input[name_start..name_start + name_len]).into_owned();
        let close = strpos(self.input, b">", name_start + name_len).ok_or_else(|| self.parse_error_here())?;
        self.pos = close + 1;

        let lower = name.to_ascii_lowercase();

        // `</br>` synthesises a unary start tag (spec.md §4.1).
        if lower == "br" {
            return Ok(Token::Start(StartTag {
                name,
                attrs: Vec::new(),
                self_closing: true,
                had_trailing_slash: false,
                auto_generated: true,
            }));
        }

        // Find the nearest matching open element; close everything above
        // it (auto-generated), then the match itself.
        if let Some(idx) = self.stack.iter().rposition(|e| e.lower_name == lower) {
            let mut closers: Vec<Token> = Vec::new();
            while self.stack.len() > idx + 1 {
                let entry = self.stack.pop().unwrap();
                closers.push(Token::End(EndTag {
                    name: entry.name,
                    attrs: Vec::new(),
                    auto_generated: true,
                }));
            }
            let entry = self.stack.pop().unwrap();
            closers.push(Token::End(EndTag {
                name: entry.name,
                attrs: entry.attrs,
                auto_generated: false,
            }));
            let first = closers.remove(0);
            for extra in closers {
                self.pending.push_back(extra);
            }
            return Ok(first);
        }

        // `</p>` without an open `<p>` synthesises `<p></p>` (spec.md §4.1).
        if lower == "p" && !self.partial_markup {
            self.pending.push_back(Token::End(EndTag {
                name: "p".to_string(),
                attrs: Vec::new(),
                auto_generated: true,
            }));
            return Ok(Token::Start(StartTag {
                name: "p".to_string(),
                attrs: Vec::new(),
                self_closing: false,
                had_trailing_slash: false,
                auto_generated: true,
            }));
        }

        if self.partial_markup {
            // Unmatched end tags are emitted verbatim and never synthesise.
            return Ok(Token::End(EndTag {
                name,
                attrs: Vec::new(),
                auto_generated: false,
            }));
        }

        // No matching open element and not partial markup: drop silently,
        // matching permissive HTML parsing of stray end tags.
        self.pos = close + 1;
        Ok(Token::End(EndTag {
            name,
            attrs: Vec::new(),
            auto_generated: false,
        }))
    }

    fn consume_start_tag(&mut self) -> Result<Token, CoreError> {
        let at = self.pos;
        let name_start = at + 1;
        let name_len = strcspn!(
            self.input,
            b' ' | b'\t' | 0x0c | b'\r' | b'\n' | b'/' | b'>',
            name_start
        );
        if name_len == 0 {
            return Err(self.parse_error(at));
        }
        let name = String::from_utf8_lossy(&self.input[name_start..name_start + name_len]).into_owned();
        let lower = name.to_ascii_lowercase();

        let mut cursor = name_start + name_len;
        let mut attrs = Vec::new();
        let mut had_trailing_slash = false;

        loop {
            let ws = strspn!(self.input, b' ' | b'\t' | 0x0c | b'\r' | b'\n', cursor);
            cursor += ws;
            if cursor >= self.input.len() {
                return Err(self.parse_error(at));
            }
            if self.input[cursor] == b'>' {
                cursor += 1;
                break;
            }
            if self.input[cursor] == b'/' && cursor + 1 < self.input.len() && self.input[cursor + 1] == b'>' {
                had_trailing_slash = true;
                cursor += 2;
                break;
            }
            match self.parse_attribute(cursor) {
                Some((attr, next)) => {
                    attrs.push(attr);
                    cursor = next;
                }
                None => return Err(self.parse_error(at)),
            }
        }

        self.pos = cursor;

        let is_void = is_void_element(&lower);
        let self_closing = is_void || had_trailing_slash;

        if !self_closing && self.html5 {
            self.apply_implicit_closing(&lower);
        }

        // `<col>` synthesises a `<colgroup>` start tag if none is open.
        if lower == "col"
            && !self
                .stack
                .iter()
                .rev()
                .take_while(|e| e.lower_name != "table")
                .any(|e| e.lower_name == "colgroup")
        {
            self.pending.push_back(Token::Start(StartTag {
                name: "colgroup".to_string(),
                attrs: Vec::new(),
                self_closing: false,
                had_trailing_slash: false,
                auto_generated: true,
            }));
            self.stack.push(TagStackEntry {
                name: "colgroup".to_string(),
                lower_name: "colgroup".to_string(),
                attrs: Vec::new(),
            });
        }

        if !self_closing {
            self.stack.push(TagStackEntry {
                name: name.clone(),
                lower_name: lower.clone(),
                attrs: attrs.clone(),
            });
        }

        Ok(Token::Start(StartTag {
            name,
            attrs,
            self_closing,
            had_trailing_slash,
            auto_generated: false,
        }))
    }

    /// HTML5-mode implicit closing ahead of a new start tag (spec.md §4.1).
    fn apply_implicit_closing(&mut self, new_lower: &str) {
        // <p> auto-close when the new tag is non-phrasing.
        if let Some(top) = self.stack.last() {
            if top.lower_name == "p" && !crate::tag_tables::is_phrasing_content(new_lower) {
                self.close_current_matching("p");
            }
        }

        let table_scope_has = |stack: &[TagStackEntry], want: &str| -> bool {
            stack
                .iter()
                .rev()
                .take_while(|e| e.lower_name != "table")
                .any(|e| e.lower_name == want)
        };

        match new_lower {
            "tbody" | "tfoot" => {
                if table_scope_has(&self.stack, "thead")
                    || table_scope_has(&self.stack, "tbody")
                    || table_scope_has(&self.stack, "tfoot")
                {
                    if let Some(top) = self.stack.last() {
                        if matches!(top.lower_name.as_str(), "thead" | "tbody" | "tfoot") {
                            let name = top.lower_name.clone();
                            self.close_current_matching(&name);
                        }
                    }
                }
            }
            "thead" => {
                if let Some(top) = self.stack.last() {
                    if matches!(top.lower_name.as_str(), "tbody" | "tfoot") {
                        let name = top.lower_name.clone();
                        self.close_current_matching(&name);
                    }
                }
            }
            "dt" | "dd" => {
                if let Some(top) = self.stack.last() {
                    if matches!(top.lower_name.as_str(), "dt" | "dd") {
                        let name = top.lower_name.clone();
                        self.close_current_matching(&name);
                    }
                }
            }
            _ => {}
        }
    }

    fn close_current_matching(&mut self, lower_name: &str) {
        if let Some(top) = self.stack.last() {
            if top.lower_name == lower_name {
                let entry = self.stack.pop().unwrap();
                self.pending.push_back(Token::End(EndTag {
                    name: entry.name,
                    attrs: entry.attrs,
                    auto_generated: true,
                }));
            }
        }
    }

    /// Attribute grammar: `name (= "…" | = '…' | = unquoted)?`, or a literal
    /// `customAttrAssign` marker in place of `=`, or a whole occurrence
    /// wrapped in a literal `customAttrSurround` marker pair (spec.md
    /// §6.2/§9), e.g. `{{#if x}}checked{{/if}}`. For unresolved attribute
    /// regions beyond 20,000 bytes, falls back to a bounded manual scan for
    /// the closing quote/marker to avoid pathological backtracking (spec.md
    /// §4.1).
    fn parse_attribute(&self, start: usize) -> Option<(Attribute, usize)> {
        if let Some((before, after, inner_start, inner_end, consumed_end)) =
            self.match_custom_attr_surround(start)
        {
            let inner = &self.input[inner_start..inner_end];
            let (name, value, quote, custom_assign, _) =
                scan_name_and_value(inner, &self.custom_attr_assign).unwrap_or_else(|| {
                    (
                        String::from_utf8_lossy(inner).trim().to_string(),
                        None,
                        Quote::None,
                        None,
                        inner.len(),
                    )
                });
            let mut attr = Attribute::new(name, value, quote);
            attr.custom_assign = custom_assign;
            attr.custom_open = Some(before.to_string());
            attr.custom_close = Some(after.to_string());
            return Some((attr, consumed_end));
        }

        let search_region_end = (start + 20_000).min(self.input.len());
        let (name, value, quote, custom_assign, consumed) =
            scan_name_and_value(&self.input[start..search_region_end], &self.custom_attr_assign)?;
        let mut attr = Attribute::new(name, value, quote);
        attr.custom_assign = custom_assign;
        Some((attr, start + consumed))
    }

    /// If `start` begins with a configured `customAttrSurround` "before"
    /// marker, locate its matching "after" marker and return
    /// `(before, after, inner_start, inner_end, position just past "after")`.
    fn match_custom_attr_surround(&self, start: usize) -> Option<(&str, &str, usize, usize, usize)> {
        for (before, after) in &self.custom_attr_surround {
            if before.is_empty() || !self.input[start..].starts_with(before.as_bytes()) {
                continue;
            }
            let inner_start = start + before.len();
            let search_end = (inner_start + 20_000).min(self.input.len());
            if let Some(rel) = memchr::memmem::find(&self.input[inner_start..search_end], after.as_bytes()) {
                let inner_end = inner_start + rel;
                let consumed_end = inner_end + after.len();
                return Some((before.as_str(), after.as_str(), inner_start, inner_end, consumed_end));
            }
        }
        None
    }

    fn consume_raw_text(&mut self, name: String, lower: String) -> Result<Option<Token>, CoreError> {
        let at = self.pos;
        let mut search_at = at;
        let close_name_tag = loop {
            let candidate = match strpos(self.input, b"</", search_at) {
                Some(c) => c,
                None => return Err(self.parse_error_here()),
            };
            if starts_with_ci(self.input, candidate + 2, lower.as_bytes()) {
                let after = candidate + 2 + lower.len();
                let next_non_ws = after + strspn!(self.input, b' ' | b'\t' | b'\r' | b'\n', after);
                if next_non_ws < self.input.len() && self.input[next_non_ws] == b'>' {
                    break candidate;
                }
            }
            search_at = candidate + 2;
        };

        let text = String::from_utf8_lossy(&self.input[at..close_name_tag]).into_owned();
        let close_tag_end = strpos(self.input, b">", close_name_tag).ok_or_else(|| self.parse_error_here())? + 1;
        self.pos = close_tag_end;

        self.stack.pop();
        self.pending.push_back(Token::End(EndTag {
            name,
            attrs: Vec::new(),
            auto_generated: false,
        }));

        if text.is_empty() {
            return Ok(self.pending.pop_front());
        }

        Ok(Some(Token::Chars {
            text,
            ctx: TagContext {
                prev_tag: Some(lower),
                ..Default::default()
            },
        }))
    }

    fn consume_chars(&mut self) -> Token {
        let at = self.pos;
        let len = match strpos(self.input, b"<", at) {
            Some(next_lt) => next_lt - at,
            None => self.input.len() - at,
        };
        self.pos = at + len;
        let text = String::from_utf8_lossy(&self.input[at..at + len]).into_owned();
        Token::Chars {
            text,
            ctx: TagContext {
                prev_tag: self.stack.last().map(|e| e.lower_name.clone()),
                ..Default::default()
            },
        }
    }
}

/// Scans `name (op value)?` from the start of `bytes`, where `op` is a
/// literal `=` or one of `custom_attr_assign`'s markers. Returns
/// `(name, value, quote, matched_custom_assign, bytes_consumed)`.
fn scan_name_and_value(
    bytes: &[u8],
    custom_attr_assign: &[String],
) -> Option<(String, Option<String>, Quote, Option<String>, usize)> {
    let is_stop = |b: u8| matches!(b, b' ' | b'\t' | 0x0c | b'\r' | b'\n' | b'/' | b'>');

    let mut name_len = 0usize;
    let mut matched: Option<&str> = None;
    while name_len < bytes.len() {
        if let Some(m) = custom_attr_assign
            .iter()
            .find(|m| !m.is_empty() && bytes[name_len..].starts_with(m.as_bytes()))
        {
            matched = Some(m.as_str());
            break;
        }
        if bytes[name_len] == b'=' || is_stop(bytes[name_len]) {
            break;
        }
        name_len += 1;
    }
    if name_len == 0 {
        return None;
    }
    let name = String::from_utf8_lossy(&bytes[..name_len]).into_owned();
    let mut cursor = name_len;

    let op_len = if let Some(m) = matched {
        m.len()
    } else if cursor < bytes.len() && bytes[cursor] == b'=' {
        1
    } else {
        let ws = bytes[cursor..]
            .iter()
            .position(|&b| !matches!(b, b' ' | b'\t' | 0x0c | b'\r' | b'\n'))
            .unwrap_or(bytes.len() - cursor);
        let after_ws = cursor + ws;
        if after_ws < bytes.len() && bytes[after_ws] == b'=' {
            cursor = after_ws;
            1
        } else if let Some(m) = custom_attr_assign
            .iter()
            .find(|m| !m.is_empty() && bytes[after_ws..].starts_with(m.as_bytes()))
        {
            cursor = after_ws;
            matched = Some(m.as_str());
            m.len()
        } else {
            0
        }
    };

    if op_len == 0 {
        return Some((name, None, Quote::None, None, cursor));
    }

    cursor += op_len;
    let ws2 = bytes[cursor..]
        .iter()
        .position(|&b| !matches!(b, b' ' | b'\t' | 0x0c | b'\r' | b'\n'))
        .unwrap_or(bytes.len() - cursor);
    cursor += ws2;
    if cursor >= bytes.len() {
        return None;
    }
    let quote_byte = bytes[cursor];
    if quote_byte == b'"' || quote_byte == b'\'' {
        let value_start = cursor + 1;
        let close = memchr::memchr(quote_byte, &bytes[value_start..])?;
        let value = String::from_utf8_lossy(&bytes[value_start..value_start + close]).into_owned();
        let quote = if quote_byte == b'"' { Quote::Double } else { Quote::Single };
        return Some((
            name,
            Some(value),
            quote,
            matched.map(str::to_string),
            value_start + close + 1,
        ));
    }
    let unquoted_len = bytes[cursor..]
        .iter()
        .position(|&b| matches!(b, b' ' | b'\t' | 0x0c | b'\r' | b'\n' | b'>'))
        .unwrap_or(bytes.len() - cursor);
    let value = String::from_utf8_lossy(&bytes[cursor..cursor + unquoted_len]).into_owned();
    Some((
        name,
        Some(value),
        Quote::None,
        matched.map(str::to_string),
        cursor + unquoted_len,
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut p = Parser::new(input, false, false, true);
        let mut out = Vec::new();
        while let Some(tok) = p.next_token().unwrap() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn parses_simple_element() {
        let toks = tokens("<div class=\"a\">hi</div>");
        assert!(matches!(toks[0], Token::Start(_)));
        assert!(matches!(toks[1], Token::Chars { .. }));
        assert!(matches!(toks[2], Token::End(_)));
    }

    #[test]
    fn void_elements_have_no_closer_synthesised_twice() {
        let toks = tokens("<br>");
        assert_eq!(toks.len(), 1);
        assert!(matches!(&toks[0], Token::Start(s) if s.self_closing));
    }

    #[test]
    fn unclosed_elements_are_closed_at_end_of_document() {
        let toks = tokens("<div><p>hi");
        let last_two: Vec<_> = toks.iter().rev().take(2).collect();
        assert!(matches!(last_two[0], Token::End(e) if e.name == "div"));
        assert!(matches!(last_two[1], Token::End(e) if e.name == "p"));
    }

    #[test]
    fn raw_text_is_not_parsed_as_markup() {
        let toks = tokens("<script>if (a<b) {}</script>");
        assert!(matches!(&toks[1], Token::Chars{text, ..} if text == "if (a<b) {}"));
    }

    #[test]
    fn stray_end_p_synthesises_empty_p() {
        let toks = tokens("</p>");
        assert!(matches!(&toks[0], Token::Start(s) if s.name == "p" && s.auto_generated));
        assert!(matches!(&toks[1], Token::End(e) if e.name == "p"));
    }

    #[test]
    fn comment_is_emitted() {
        let toks = tokens("<!-- hi -->");
        assert!(matches!(&toks[0], Token::Comment{text, ..} if text == " hi "));
    }

    #[test]
    fn doctype_is_emitted() {
        let toks = tokens("<!DOCTYPE html>");
        assert!(matches!(&toks[0], Token::Doctype{text} if text == "<!DOCTYPE html>"));
    }

    fn tokens_with_custom_grammar(
        input: &str,
        custom_attr_assign: Vec<String>,
        custom_attr_surround: Vec<(String, String)>,
    ) -> Vec<Token> {
        let mut p = Parser::with_custom_attr_grammar(
            input,
            false,
            false,
            true,
            custom_attr_assign,
            custom_attr_surround,
        );
        let mut out = Vec::new();
        while let Some(tok) = p.next_token().unwrap() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn custom_attr_assign_marker_replaces_equals() {
        let toks = tokens_with_custom_grammar(
            r#"<input foo:="bar">"#,
            vec![":=".to_string()],
            Vec::new(),
        );
        let Token::Start(tag) = &toks[0] else { panic!("expected start tag") };
        assert_eq!(tag.attrs[0].name, "foo");
        assert_eq!(tag.attrs[0].value.as_deref(), Some("bar"));
        assert_eq!(tag.attrs[0].custom_assign.as_deref(), Some(":="));
    }

    #[test]
    fn custom_attr_surround_wraps_a_whole_attribute() {
        let toks = tokens_with_custom_grammar(
            "<input {{#if x}}checked{{/if}}>",
            Vec::new(),
            vec![("{{#if x}}".to_string(), "{{/if}}".to_string())],
        );
        let Token::Start(tag) = &toks[0] else { panic!("expected start tag") };
        assert_eq!(tag.attrs[0].name, "checked");
        assert_eq!(tag.attrs[0].value, None);
        assert_eq!(tag.attrs[0].custom_open.as_deref(), Some("{{#if x}}"));
        assert_eq!(tag.attrs[0].custom_close.as_deref(), Some("{{/if}}"));
    }

    #[test]
    fn ordinary_equals_attributes_unaffected_by_custom_grammar() {
        let toks = tokens_with_custom_grammar(
            r#"<div class="a">"#,
            vec![":=".to_string()],
            vec![("{{#if x}}".to_string(), "{{/if}}".to_string())],
        );
        let Token::Start(tag) = &toks[0] else { panic!("expected start tag") };
        assert_eq!(tag.attrs[0].name, "class");
        assert_eq!(tag.attrs[0].value.as_deref(), Some("a"));
        assert_eq!(tag.attrs[0].custom_assign, None);
    }
}
