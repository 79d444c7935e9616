//! Transformation Driver (spec.md §4.4): consumes the [`Parser`]'s token
//! stream and produces the minified output, owning the output buffer, the
//! open-tag stack, and the `Options` shadowing stack for foreign content.
//!
//! Grounded on the teacher's `tag_processor.rs` consumer loop shape (a
//! `while let Some(token) = ...` dispatch over start/end/text/comment) and
//! `html_processor.rs`'s bookkeeping stack for entering/leaving `<svg>`.

use std::collections::VecDeque;

use crate::attributes;
use crate::entities::{self, HtmlContext};
use crate::error::{CoreError, CoreResult};
use crate::omission;
use crate::options::Options;
use crate::parser::Parser;
use crate::placeholder::PlaceholderTables;
use crate::subminify::{css_result_or_fallback, SubMinifierFacade};
use crate::tag_tables;
use crate::tag_tables::{
    is_executable_js_type, is_json_script_type, is_listing_like, is_no_trim_element,
    is_raw_text_element,
};
use crate::token::{Attribute, EndTag, StartTag, TagContext, Token};
use crate::whitespace::collapse_whitespace_smart;

/// A fixed-capacity lookahead buffer over a [`Parser`], since several driver
/// decisions (optional-tag omission, empty-element detection, whitespace
/// trim direction) need to see past the current token without consuming it.
struct TokenStream<'a, 'p> {
    parser: &'p mut Parser<'a>,
    buf: VecDeque<Token>,
}

impl<'a, 'p> TokenStream<'a, 'p> {
    fn new(parser: &'p mut Parser<'a>) -> Self {
        TokenStream {
            parser,
            buf: VecDeque::new(),
        }
    }

    fn fill(&mut self, want: usize) -> CoreResult<()> {
        while self.buf.len() <= want {
            match self.parser.next_token()? {
                Some(tok) => self.buf.push_back(tok),
                None => break,
            }
        }
        Ok(())
    }

    fn peek(&mut self, at: usize) -> CoreResult<Option<&Token>> {
        self.fill(at)?;
        Ok(self.buf.get(at))
    }

    fn next(&mut self) -> CoreResult<Option<Token>> {
        self.fill(0)?;
        Ok(self.buf.pop_front())
    }
}

struct OpenTagEntry {
    /// The name as it will appear in the closing tag, already normalised.
    name: String,
    lower: String,
    is_foreign_root: bool,
    emitted_start: bool,
    /// `<script type="...">`'s value, captured at the open tag for the
    /// matching raw-text content to dispatch on.
    raw_type: Option<String>,
}

pub struct Driver<'a> {
    subminify: &'a SubMinifierFacade,
    placeholders: &'a PlaceholderTables,
    current: Options,
    options_stack: Vec<Options>,
    open: Vec<OpenTagEntry>,
    /// The tag most recently opened or closed, used as the left-hand
    /// whitespace-trim context for the text node that follows (spec.md
    /// §4.4.6); a bare name means "just opened", `/name` means "just
    /// closed".
    last_boundary: Option<String>,
    last_boundary_attrs: Vec<Attribute>,
    output: String,
}

impl<'a> Driver<'a> {
    fn new(options: &Options, subminify: &'a SubMinifierFacade, placeholders: &'a PlaceholderTables) -> Self {
        Driver {
            subminify,
            placeholders,
            current: options.clone(),
            options_stack: Vec::new(),
            open: Vec::new(),
            last_boundary: None,
            last_boundary_attrs: Vec::new(),
            output: String::new(),
        }
    }

    fn run(&mut self, stream: &mut TokenStream) -> CoreResult<()> {
        while let Some(tok) = stream.next()? {
            match tok {
                Token::Start(start) => self.handle_start(start, stream)?,
                Token::End(end) => self.handle_end(end, stream)?,
                Token::Chars { text, ctx } => self.handle_chars(text, ctx, stream)?,
                Token::Comment { text, non_standard } => self.handle_comment(text, non_standard)?,
                Token::Doctype { text } => self.handle_doctype(text),
            }
        }
        Ok(())
    }

    fn handle_doctype(&mut self, text: String) {
        if self.current.use_short_doctype && text.to_ascii_lowercase().starts_with("<!doctype html") {
            self.output.push_str("<!doctype html>");
        } else {
            self.output.push_str(&text);
        }
    }

    fn handle_start(&mut self, tag: StartTag, stream: &mut TokenStream) -> CoreResult<()> {
        let tag_lower = tag.name.to_ascii_lowercase();

        if !tag.self_closing {
            // Foreign content (svg/math) is exempt in its entirety, not just
            // its root tag: a `<path>` with no children still renders, so
            // descendants must inherit the exemption once inside.
            let eligible_for_removal = self.current.remove_empty_elements
                && self.options_stack.is_empty()
                && !self
                    .current
                    .remove_empty_elements_except
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&tag_lower))
                && !matches!(tag_lower.as_str(), "svg" | "math")
                && tag_tables::can_remove_element(&tag_lower, &tag.attrs);

            if eligible_for_removal && self.next_is_empty_close(stream, &tag_lower)? {
                if let Some(Token::Chars { .. }) = stream.peek(0)? {
                    stream.next()?;
                }
                stream.next()?; // the matching End token
                self.last_boundary = Some(tag_lower.clone());
                self.last_boundary_attrs = tag.attrs;
                return Ok(());
            }
        }

        let is_foreign_root = matches!(tag_lower.as_str(), "svg" | "math");
        if is_foreign_root {
            self.options_stack.push(self.current.clone());
            self.current = self.current.shadow_for_foreign_content();
        }

        let mut attrs = tag.attrs.clone();

        // `<a name="x" id="x">`: the `name` is redundant once `id` carries
        // the same value (driver-level because it needs the sibling list).
        if self.current.remove_redundant_attributes && tag_lower == "a" {
            if let Some(id_val) = attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case("id"))
                .and_then(|a| a.value.clone())
            {
                attrs.retain(|a| !(a.name.eq_ignore_ascii_case("name") && a.value.as_deref() == Some(id_val.as_str())));
            }
        }

        if let Some(sort_fn) = self.current.sort_attributes.clone() {
            sort_fn(&tag_lower, &mut attrs);
        }

        // `rel="canonical"` siblings stop `href` from being URL-minified.
        let canonical_rel = attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case("rel"))
            .and_then(|a| a.value.as_deref())
            .map(|v| v.split_whitespace().any(|t| t.eq_ignore_ascii_case("canonical")))
            .unwrap_or(false);

        let meta_name = if tag_lower == "meta" {
            attrs.iter().find(|a| a.name.eq_ignore_ascii_case("name")).and_then(|a| a.value.clone())
        } else {
            None
        };
        let meta_http_equiv = if tag_lower == "meta" {
            attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case("http-equiv"))
                .and_then(|a| a.value.clone())
        } else {
            None
        };

        let mut raw_type: Option<String> = None;
        let mut normalized = Vec::with_capacity(attrs.len());
        for attr in &attrs {
            let lower_name = attr.name.to_ascii_lowercase();
            if tag_lower == "script" && lower_name == "type" {
                raw_type = attr.value.as_ref().map(|v| v.trim().to_ascii_lowercase());
            }
            let skip_url = canonical_rel && lower_name == "href";
            let Some(mut normalized_attr) = attributes::normalize(
                attr,
                &tag_lower,
                &self.current,
                self.subminify,
                self.placeholders,
                skip_url,
            )?
            else {
                continue;
            };

            if tag_lower == "meta" && lower_name == "content" {
                if meta_name.as_deref().map(|n| n.eq_ignore_ascii_case("viewport")).unwrap_or(false) {
                    normalized_attr.value = normalized_attr.value.map(|v| attributes::canonicalize_viewport_content(&v));
                }
                if meta_http_equiv
                    .as_deref()
                    .map(|h| h.eq_ignore_ascii_case("content-security-policy"))
                    .unwrap_or(false)
                {
                    normalized_attr.value = normalized_attr.value.map(|v| attributes::collapse_csp_content(&v));
                }
            }

            if tag_lower == "iframe" && lower_name == "srcdoc" {
                if let Some(v) = &normalized_attr.value {
                    if let Ok(minified) = minify_fragment(v, &self.current, self.subminify) {
                        normalized_attr.value = Some(minified);
                    }
                }
            }

            normalized.push(normalized_attr);
        }

        let rendered_name = self.current.normalize_name(&tag.name);

        let omit_start = if tag.auto_generated {
            !self.current.include_auto_generated_tags
        } else {
            let next_tag_lower = match stream.peek(0)? {
                Some(Token::Start(s)) => Some(s.name.to_ascii_lowercase()),
                _ => None,
            };
            self.current.remove_optional_tags
                && normalized.is_empty()
                && omission::start_tag_omittable(&tag_lower, next_tag_lower.as_deref(), false)
        };

        let mut buf = String::new();
        if !omit_start {
            buf.push('<');
            buf.push_str(&rendered_name);
            for n in &normalized {
                if !self.current.remove_tag_whitespace {
                    buf.push(' ');
                }
                buf.push_str(&attributes::render(n, &self.current, self.placeholders));
            }
            if tag.self_closing && tag.had_trailing_slash && self.current.keep_closing_slash {
                buf.push_str(" />");
            } else {
                buf.push('>');
            }
        }

        self.last_boundary = Some(tag_lower.clone());
        self.last_boundary_attrs = attrs;

        if tag.self_closing {
            self.output.push_str(&buf);
            return Ok(());
        }

        self.open.push(OpenTagEntry {
            name: rendered_name,
            lower: tag_lower,
            is_foreign_root,
            emitted_start: !omit_start,
            raw_type,
        });
        self.output.push_str(&buf);
        Ok(())
    }

    /// True if, without consuming anything, the next token(s) show this
    /// element has no content: either the matching end tag directly, or a
    /// whitespace-only text node immediately followed by it.
    fn next_is_empty_close(&mut self, stream: &mut TokenStream, tag_lower: &str) -> CoreResult<bool> {
        match stream.peek(0)? {
            Some(Token::End(e)) => Ok(e.name.eq_ignore_ascii_case(tag_lower)),
            Some(Token::Chars { text, .. }) => {
                let collapses_away = text.trim_matches(is_html_whitespace).is_empty();
                if !collapses_away {
                    return Ok(false);
                }
                match stream.peek(1)? {
                    Some(Token::End(e)) => Ok(e.name.eq_ignore_ascii_case(tag_lower)),
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    fn handle_end(&mut self, end: EndTag, stream: &mut TokenStream) -> CoreResult<()> {
        let tag_lower = end.name.to_ascii_lowercase();
        let entry = self.open.pop();

        self.last_boundary = Some(format!("/{tag_lower}"));
        self.last_boundary_attrs = Vec::new();

        let Some(entry) = entry else { return Ok(()) };

        if entry.is_foreign_root {
            if let Some(saved) = self.options_stack.pop() {
                self.current = saved;
            }
        }

        if !entry.emitted_start {
            return Ok(());
        }

        let omit_end = if end.auto_generated {
            !self.current.include_auto_generated_tags
        } else if !self.current.remove_optional_tags {
            false
        } else {
            match stream.peek(0)? {
                Some(Token::Start(s)) => {
                    let next = s.name.to_ascii_lowercase();
                    omission::end_tag_omittable_unconditionally(&tag_lower)
                        || omission::end_tag_omittable_before(&tag_lower, Some(&next))
                }
                Some(Token::End(_)) | None => {
                    omission::end_tag_omittable_unconditionally(&tag_lower)
                        || omission::end_tag_omittable_before(&tag_lower, None)
                }
                _ => omission::end_tag_omittable_unconditionally(&tag_lower),
            }
        };

        if !omit_end {
            self.output.push('<');
            self.output.push('/');
            self.output.push_str(&entry.name);
            self.output.push('>');
        }
        Ok(())
    }

    fn handle_chars(&mut self, text: String, mut ctx: TagContext, stream: &mut TokenStream) -> CoreResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let container_lower = self.open.last().map(|e| e.lower.clone());
        if let Some(lower) = &container_lower {
            if is_raw_text_element(lower) {
                return self.emit_raw_text(lower, &text);
            }
            if is_listing_like(lower) || is_no_trim_element(lower) {
                self.output.push_str(&self.reencode_text(&text));
                return Ok(());
            }
        }

        let mut decoded = text;
        if self.current.decode_entities && decoded.contains('&') {
            decoded = entities::decode(HtmlContext::Text, &decoded);
        }

        if !self.current.collapse_whitespace {
            if self.current.decode_entities {
                decoded = entities::encode_ambiguous_ampersands(&decoded);
            }
            self.output.push_str(&decoded);
            return Ok(());
        }

        ctx.prev_tag = self.last_boundary.clone();
        ctx.prev_attrs = self.last_boundary_attrs.clone();
        if ctx.next_tag.is_none() {
            match stream.peek(0)? {
                Some(Token::Start(s)) => {
                    ctx.next_tag = Some(s.name.to_ascii_lowercase());
                    ctx.next_attrs = s.attrs.clone();
                }
                Some(Token::End(e)) => ctx.next_tag = Some(format!("/{}", e.name.to_ascii_lowercase())),
                Some(Token::Comment { .. }) => ctx.next_tag = Some("comment".to_string()),
                _ => {}
            }
        }

        let collapsed = collapse_whitespace_smart(&decoded, &ctx, &self.current);
        let collapsed = if self.current.decode_entities {
            entities::encode_ambiguous_ampersands(&collapsed)
        } else {
            collapsed
        };
        self.output.push_str(&collapsed);
        Ok(())
    }

    fn reencode_text(&self, text: &str) -> String {
        if self.current.decode_entities && text.contains('&') {
            let decoded = entities::decode(HtmlContext::Text, text);
            entities::encode_ambiguous_ampersands(&decoded)
        } else {
            text.to_string()
        }
    }

    fn emit_raw_text(&mut self, lower: &str, text: &str) -> CoreResult<()> {
        let raw_type = self.open.last().and_then(|e| e.raw_type.clone());

        let rendered = match lower {
            "style" => {
                if self.subminify.has_css() {
                    match self.subminify.css(text, Some("style"), self.placeholders) {
                        Ok(minified) => css_result_or_fallback(text, &minified),
                        Err(e) => self.swallow_minify_error("style", e, text)?,
                    }
                } else {
                    text.to_string()
                }
            }
            "script" => {
                let ty = raw_type.unwrap_or_default();
                if !ty.is_empty() && is_json_script_type(&ty) {
                    minify_json_whitespace(text)
                } else if ty.is_empty() || ty == "module" || is_executable_js_type(&ty) {
                    if self.subminify.has_js() {
                        match self.subminify.js(text, Some("script"), self.placeholders) {
                            Ok(minified) => minified,
                            Err(e) => self.swallow_minify_error("script", e, text)?,
                        }
                    } else {
                        text.to_string()
                    }
                } else if self
                    .current
                    .process_scripts
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(&ty))
                {
                    match minify_fragment(text, &self.current, self.subminify) {
                        Ok(minified) => minified,
                        Err(e) => self.swallow_minify_error("script", e, text)?,
                    }
                } else {
                    text.to_string()
                }
            }
            "noscript" => minify_fragment(text, &self.current, self.subminify).unwrap_or_else(|_| text.to_string()),
            _ => text.to_string(),
        };

        self.output.push_str(&rendered);
        Ok(())
    }

    fn swallow_minify_error(&self, context: &str, cause: CoreError, original: &str) -> CoreResult<String> {
        if !self.current.continue_on_minify_error {
            return Err(cause);
        }
        if let Some(log_fn) = &self.current.log {
            log_fn(&format!("sub-minifier failed for {context}: {cause}"));
        }
        log::warn!("sub-minifier failed for {context}: {cause}");
        Ok(original.to_string())
    }

    fn is_ignore_custom_comment(&self, text: &str) -> bool {
        self.current
            .ignore_custom_comments
            .iter()
            .any(|pattern| matches_ignore_pattern(pattern, text))
    }

    fn handle_comment(&mut self, text: String, non_standard: bool) -> CoreResult<()> {
        if non_standard {
            if let Some(split) = text.find("]>") {
                let cond = &text[..split];
                let body = &text[split + 2..];
                let body_out = if self.current.process_conditional_comments {
                    minify_fragment(body, &self.current, self.subminify).unwrap_or_else(|_| body.to_string())
                } else {
                    body.to_string()
                };
                self.output.push_str(&format!("<![{cond}]>{body_out}<![endif]>"));
            } else {
                self.output.push_str(&format!("<![{text}<![endif]>"));
            }
            return Ok(());
        }

        if self.placeholders.is_ignore_placeholder_comment(&text) {
            self.output.push_str(&format!("<!--{text}-->"));
            return Ok(());
        }

        let looks_conditional = text.trim_start().starts_with("[if") && text.contains("<![endif]");
        if looks_conditional {
            if let (Some(split), Some(endif_at)) = (text.find("]>"), text.rfind("<![endif]")) {
                if endif_at > split {
                    let cond = &text[..split + 2];
                    let body = &text[split + 2..endif_at];
                    let tail = &text[endif_at..];
                    let body_out = if self.current.process_conditional_comments {
                        minify_fragment(body, &self.current, self.subminify).unwrap_or_else(|_| body.to_string())
                    } else {
                        body.to_string()
                    };
                    self.output.push_str(&format!("<!--{cond}{body_out}{tail}-->"));
                    return Ok(());
                }
            }
            self.output.push_str(&format!("<!--{text}-->"));
            return Ok(());
        }

        if self.current.remove_comments && !self.is_ignore_custom_comment(&text) {
            return Ok(());
        }

        self.output.push_str(&format!("<!--{text}-->"));
        Ok(())
    }
}

fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0C}')
}

/// Interprets the small subset of `^...`/`^\s*...` forms the default
/// `ignore_custom_comments` patterns use, rather than depending on a regex
/// engine for two fixed shapes (see DESIGN.md).
fn matches_ignore_pattern(pattern: &str, text: &str) -> bool {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    if let Some(rest) = pattern.strip_prefix(r"\s*") {
        return text.trim_start().starts_with(rest);
    }
    text.starts_with(pattern)
}

/// Strip insignificant whitespace from a JSON-typed `<script>` body, tracking
/// string/escape state so content inside string literals is untouched.
fn minify_json_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
            out.push(c);
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        out.push(c);
    }
    out
}

/// Output Joiner (spec.md §4): wrap `output` so no line exceeds `max_len`.
/// When `no_newlines_before_tag_close` is set, a break is never inserted
/// immediately before a closing tag.
fn wrap_output(output: &str, max_len: usize, no_newlines_before_tag_close: bool) -> String {
    if max_len == 0 {
        return output.to_string();
    }
    let chars: Vec<char> = output.chars().collect();
    let mut result = String::with_capacity(chars.len() + chars.len() / max_len.max(1));
    let mut line_len = 0usize;
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\n' {
            result.push('\n');
            line_len = 0;
            i += 1;
            continue;
        }
        let before_tag_close = no_newlines_before_tag_close
            && chars[i] == '<'
            && chars.get(i + 1) == Some(&'/');
        if line_len >= max_len && !before_tag_close {
            result.push('\n');
            line_len = 0;
        }
        result.push(chars[i]);
        line_len += 1;
        i += 1;
    }
    result
}

/// Run the transformation driver over already placeholder-protected
/// `source`, returning the minified (but not yet placeholder-restored)
/// output.
pub fn transform(
    source: &str,
    options: &Options,
    subminify: &SubMinifierFacade,
    placeholders: &PlaceholderTables,
) -> CoreResult<String> {
    let mut parser = Parser::with_custom_attr_grammar(
        source,
        options.partial_markup,
        options.continue_on_parse_error,
        options.html5,
        options.custom_attr_assign.clone(),
        options.custom_attr_surround.clone(),
    );
    let mut stream = TokenStream::new(&mut parser);
    let mut driver = Driver::new(options, subminify, placeholders);
    driver.run(&mut stream)?;

    Ok(match options.max_line_length {
        Some(max) => wrap_output(&driver.output, max, options.no_newlines_before_tag_close),
        None => driver.output,
    })
}

/// Minify a standalone HTML fragment (an `iframe[srcdoc]` value, a
/// conditional comment body, `noscript` content) through the full
/// protect/transform/restore pipeline, with its own placeholder table.
pub fn minify_fragment(text: &str, options: &Options, subminify: &SubMinifierFacade) -> CoreResult<String> {
    let mut placeholders = PlaceholderTables::new();
    let protected = placeholders.protect(text, options);
    let transformed = transform(&protected, options, subminify, &placeholders)?;
    Ok(placeholders.restore(&transformed, options))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::Options;
    use crate::placeholder::PlaceholderTables;
    use crate::subminify::SubMinifierFacade;

    fn run(source: &str, options: &Options) -> String {
        let facade = SubMinifierFacade::default();
        let placeholders = PlaceholderTables::new();
        transform(source, options, &facade, &placeholders).unwrap()
    }

    #[test]
    fn collapses_whitespace_between_block_elements() {
        let options = Options {
            collapse_whitespace: true,
            ..Options::default()
        };
        assert_eq!(run("<div>a</div>   <div>b</div>", &options), "<div>a</div><div>b</div>");
    }

    #[test]
    fn removes_comments() {
        let options = Options {
            remove_comments: true,
            ..Options::default()
        };
        assert_eq!(run("<p>hi<!-- drop me --></p>", &options), "<p>hi</p>");
    }

    #[test]
    fn keeps_conditional_comments_when_removing_others() {
        let options = Options {
            remove_comments: true,
            ..Options::default()
        };
        let out = run("<!--[if IE]><p>old</p><![endif]-->", &options);
        assert!(out.contains("[if IE]"));
        assert!(out.contains("<![endif]"));
    }

    #[test]
    fn removes_empty_elements() {
        let options = Options {
            remove_empty_elements: true,
            ..Options::default()
        };
        assert_eq!(run("<p>keep</p><span></span>", &options), "<p>keep</p>");
    }

    #[test]
    fn keeps_empty_elements_on_exception_list() {
        let mut options = Options {
            remove_empty_elements: true,
            ..Options::default()
        };
        options.remove_empty_elements_except.push("textarea".to_string());
        assert_eq!(run("<textarea></textarea>", &options), "<textarea></textarea>");
    }

    #[test]
    fn keeps_empty_elements_unconditionally_protected_by_can_remove_element() {
        let options = Options {
            remove_empty_elements: true,
            ..Options::default()
        };
        assert_eq!(
            run(r#"<div id="foo"></div>"#, &options),
            r#"<div id="foo"></div>"#
        );
        assert_eq!(
            run(r#"<iframe src="x"></iframe>"#, &options),
            r#"<iframe src="x"></iframe>"#
        );
        assert_eq!(
            run(r#"<object data="x"></object>"#, &options),
            r#"<object data="x"></object>"#
        );
        assert_eq!(run("<textarea></textarea>", &options), "<textarea></textarea>");
        assert_eq!(run("<span></span>", &options), "");
    }

    #[test]
    fn omits_optional_html_head_body_tags() {
        let options = Options {
            remove_optional_tags: true,
            ..Options::default()
        };
        let out = run("<html><head><title>t</title></head><body><p>hi</p></body></html>", &options);
        assert!(!out.contains("<html>"));
        assert!(!out.contains("<head>"));
        assert!(!out.contains("<body>"));
        assert!(out.contains("<title>t</title>"));
    }

    #[test]
    fn omits_redundant_li_end_tag_before_sibling() {
        let options = Options {
            remove_optional_tags: true,
            ..Options::default()
        };
        let out = run("<ul><li>a</li><li>b</li></ul>", &options);
        assert_eq!(out, "<ul><li>a<li>b</ul>");
    }

    #[test]
    fn uses_short_doctype() {
        let options = Options {
            use_short_doctype: true,
            ..Options::default()
        };
        let out = run(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\">",
            &options,
        );
        assert_eq!(out, "<!doctype html>");
    }

    #[test]
    fn minifies_json_script_whitespace_only() {
        let options = Options::default();
        let out = run(r#"<script type="application/json">{  "a" : 1  }</script>"#, &options);
        assert_eq!(out, r#"<script type="application/json">{"a":1}</script>"#);
    }

    #[test]
    fn removes_tag_whitespace_between_attributes() {
        let options = Options {
            remove_tag_whitespace: true,
            ..Options::default()
        };
        let out = run(r#"<input type="text" name="a" autocomplete="off">"#, &options);
        assert_eq!(out, r#"<input type="text"name="a"autocomplete="off">"#);
    }

    #[test]
    fn process_scripts_recursively_minifies_listed_custom_type() {
        let mut options = Options {
            remove_comments: true,
            ..Options::default()
        };
        options.process_scripts.push("text/x-handlebars-template".to_string());
        let out = run(
            r#"<script type="text/x-handlebars-template"><p><!-- drop me -->hi</p></script>"#,
            &options,
        );
        assert_eq!(
            out,
            r#"<script type="text/x-handlebars-template"><p>hi</p></script>"#
        );
    }

    #[test]
    fn ignores_unlisted_custom_script_type() {
        let options = Options {
            remove_comments: true,
            ..Options::default()
        };
        let out = run(
            r#"<script type="text/x-handlebars-template"><p><!-- keep me -->hi</p></script>"#,
            &options,
        );
        assert_eq!(
            out,
            r#"<script type="text/x-handlebars-template"><p><!-- keep me -->hi</p></script>"#
        );
    }

    #[test]
    fn wraps_output_at_max_line_length_breaking_before_tag_close_by_default() {
        let options = Options {
            max_line_length: Some(10),
            ..Options::default()
        };
        let out = run("<p>aaaaaaa</p>", &options);
        assert!(out.contains("\n</p>"));
    }

    #[test]
    fn no_newlines_before_tag_close_suppresses_break_immediately_before_closing_tag() {
        let options = Options {
            max_line_length: Some(10),
            no_newlines_before_tag_close: true,
            ..Options::default()
        };
        let out = run("<p>aaaaaaa</p>", &options);
        assert!(!out.contains("\n</p>"));
    }
}
