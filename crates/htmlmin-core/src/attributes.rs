//! Attribute normalisation, value cleaning, and rendering (spec.md §4.4.5).
//!
//! Grounded on the teacher's `attributes.rs` dispatch-by-category switch,
//! generalised from namespace-qualification into the minifier's
//! value-cleaning table.

use crate::entities::{self, HtmlContext};
use crate::error::{CoreError, CoreResult};
use crate::options::Options;
use crate::placeholder::PlaceholderTables;
use crate::subminify::{css_result_or_fallback, SubMinifierFacade};
use crate::tag_tables::{
    is_boolean_attribute, is_css_type, is_event_handler_attribute,
    is_executable_js_type, is_numeric_attribute, is_pseudo_boolean_but_excluded,
    is_svg_element, is_svg_numeric_list_attribute, is_svg_path_attribute,
    is_uri_attribute, redundant_attribute_default,
};
use crate::token::Attribute;

/// An attribute after normalisation and value-cleaning, still undecided on
/// quote style (that is a rendering concern, since it can depend on
/// surrounding placeholders and the `quoteCharacter` option but not on tag
/// position).
pub struct NormalizedAttribute {
    pub name: String,
    pub value: Option<String>,
    /// Carried through from the source `Attribute` for `customAttrAssign`/
    /// `customAttrSurround` round-tripping (spec.md §6.2/§9); unaffected by
    /// normalisation.
    pub custom_assign: Option<String>,
    pub custom_open: Option<String>,
    pub custom_close: Option<String>,
}

/// Fall back to `original` on a sub-minifier error per `continueOnMinifyError`
/// (spec.md §4.4.8/§7): logs via both the user's `options.log` callback and
/// the `log` crate, or propagates if the caller asked not to continue.
fn swallow_or_propagate(
    context: &str,
    cause: CoreError,
    original: &str,
    options: &Options,
) -> CoreResult<String> {
    if !options.continue_on_minify_error {
        return Err(cause);
    }
    if let Some(log_fn) = &options.log {
        log_fn(&format!("sub-minifier failed for {context}: {cause}"));
    }
    log::warn!("sub-minifier failed for {context}: {cause}");
    Ok(original.to_string())
}

/// Apply spec.md §4.4.5 steps 1-6 to one attribute. Returns `Ok(None)` if the
/// attribute should be dropped entirely; propagates a sub-minifier error only
/// when `continueOnMinifyError` is unset.
pub fn normalize(
    attr: &Attribute,
    tag_lower: &str,
    options: &Options,
    subminify: &SubMinifierFacade,
    placeholders: &PlaceholderTables,
    skip_url_minify: bool,
) -> CoreResult<Option<NormalizedAttribute>> {
    let name = options.normalize_name(&attr.name);
    let lower_name = name.to_ascii_lowercase();

    let mut value = attr.value.clone();
    if options.decode_entities {
        if let Some(v) = &value {
            if v.contains('&') {
                value = Some(entities::decode(HtmlContext::Attribute, v));
            }
        }
    }

    // Step 3: unconditional drop rules.
    if options.remove_redundant_attributes {
        if let Some(default) = redundant_attribute_default(tag_lower, &lower_name) {
            if value.as_deref() == Some(default) {
                return Ok(None);
            }
        }
        // `<a name>` when `id` is also present is dropped by the driver
        // before it calls `normalize`, since that rule needs the sibling
        // attribute list rather than this one attribute in isolation.
    }
    if options.remove_script_type_attributes
        && tag_lower == "script"
        && lower_name == "type"
        && value.as_deref().map(is_executable_js_type).unwrap_or(false)
    {
        return Ok(None);
    }
    if options.remove_style_link_type_attributes
        && lower_name == "type"
        && matches!(tag_lower, "style" | "link")
        && value.as_deref().map(is_css_type).unwrap_or(false)
    {
        return Ok(None);
    }

    // Step 4: category-specific value cleaning.
    value = clean_value(
        &lower_name,
        tag_lower,
        value,
        options,
        subminify,
        placeholders,
        skip_url_minify,
    )?;

    // Step 5: drop whitespace-only values the predicate accepts.
    if let Some(v) = &value {
        let whitespace_only = !v.is_empty() && v.trim().is_empty();
        if whitespace_only {
            if let Some(predicate) = &options.remove_empty_attributes {
                if predicate(&lower_name, v) {
                    return Ok(None);
                }
            }
        }
    }

    // Step 6: re-escape any ambiguous ampersand left by decoding.
    if options.decode_entities {
        if let Some(v) = &value {
            value = Some(entities::encode_ambiguous_ampersands(v));
        }
    }

    Ok(Some(NormalizedAttribute {
        name,
        value,
        custom_assign: attr.custom_assign.clone(),
        custom_open: attr.custom_open.clone(),
        custom_close: attr.custom_close.clone(),
    }))
}

fn clean_value(
    lower_name: &str,
    tag_lower: &str,
    value: Option<String>,
    options: &Options,
    subminify: &SubMinifierFacade,
    placeholders: &PlaceholderTables,
    skip_url_minify: bool,
) -> CoreResult<Option<String>> {
    let Some(v) = value else { return Ok(None) };

    if is_event_handler_attribute(lower_name) {
        let stripped = v
            .trim()
            .strip_prefix("javascript:")
            .unwrap_or(v.trim())
            .to_string();
        if subminify.has_js() {
            return Ok(Some(match subminify.js(&stripped, Some("event"), placeholders) {
                Ok(minified) => minified,
                Err(e) => swallow_or_propagate("event handler", e, &stripped, options)?,
            }));
        }
        return Ok(Some(stripped));
    }

    if lower_name == "class" {
        if let Some(sort_fn) = &options.sort_class_name {
            return Ok(Some(sort_fn(&v)));
        }
        return Ok(Some(v.split_whitespace().collect::<Vec<_>>().join(" ")));
    }

    if lower_name == "srcset" {
        return Ok(Some(clean_srcset(&v, subminify, placeholders, options)?));
    }

    if is_svg_element(tag_lower) {
        if is_svg_path_attribute(lower_name) {
            return Ok(Some(minify_svg_path(&v)));
        }
        if is_svg_numeric_list_attribute(lower_name) {
            return Ok(Some(minify_svg_numeric_list(&v)));
        }
    }

    if is_uri_attribute(tag_lower, lower_name) {
        if skip_url_minify {
            return Ok(Some(v));
        }
        if subminify.has_url() {
            return Ok(Some(match subminify.url(&v, Some(tag_lower), placeholders) {
                Ok(minified) => minified,
                Err(e) => swallow_or_propagate("url", e, &v, options)?,
            }));
        }
        return Ok(Some(v));
    }

    if is_numeric_attribute(lower_name) {
        return Ok(Some(v.trim().to_string()));
    }

    if lower_name == "style" {
        let mut trimmed = v.trim().to_string();
        if trimmed.ends_with(';') && !trimmed.ends_with("&#59;") {
            trimmed.pop();
        }
        if subminify.has_css() {
            return Ok(Some(match subminify.css(&trimmed, Some("inline"), placeholders) {
                Ok(minified) => css_result_or_fallback(&trimmed, &minified),
                Err(e) => swallow_or_propagate("inline style", e, &trimmed, options)?,
            }));
        }
        return Ok(Some(trimmed));
    }

    if tag_lower == "meta" && lower_name == "content" {
        // Handled contextually by the driver, which knows the sibling
        // `name`/`http-equiv` attribute; nothing to do on the bare value.
        return Ok(Some(v));
    }

    if let Some(pattern) = &options.custom_attr_collapse {
        if lower_name == pattern.as_str() {
            let collapsed: String = v
                .chars()
                .filter(|c| *c != '\n' && *c != '\r')
                .collect::<String>();
            let mut out = String::with_capacity(collapsed.len());
            let mut last_was_space = false;
            for c in collapsed.chars() {
                if c == ' ' {
                    if !last_was_space {
                        out.push(c);
                    }
                    last_was_space = true;
                } else {
                    out.push(c);
                    last_was_space = false;
                }
            }
            return Ok(Some(out));
        }
    }

    Ok(Some(v))
}

/// Rebuild `srcset` with a single space before each descriptor, dropping the
/// redundant `1x` descriptor (spec.md §4.4.5).
fn clean_srcset(
    value: &str,
    subminify: &SubMinifierFacade,
    placeholders: &PlaceholderTables,
    options: &Options,
) -> CoreResult<String> {
    let mut rendered = Vec::new();
    for candidate in value.split(',') {
        let candidate = candidate.trim();
        let mut parts = candidate.splitn(2, char::is_whitespace);
        let url = parts.next().unwrap_or("");
        let descriptor = parts.next().map(str::trim).unwrap_or("");

        let url = if subminify.has_url() {
            match subminify.url(url, Some("srcset"), placeholders) {
                Ok(minified) => minified,
                Err(e) => swallow_or_propagate("srcset", e, url, options)?,
            }
        } else {
            url.to_string()
        };

        rendered.push(if descriptor.is_empty() || descriptor == "1x" {
            url
        } else {
            format!("{url} {descriptor}")
        });
    }
    Ok(rendered.join(", "))
}

/// Canonicalise a `<meta name="viewport" content="...">` value: strip all
/// whitespace and normalise trailing-zero numbers (`0.9000` -> `0.9`).
pub fn canonicalize_viewport_content(value: &str) -> String {
    value
        .split(',')
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let val = parts.next().unwrap_or("").trim();
            if val.is_empty() {
                key.to_string()
            } else {
                format!("{key}={}", canonicalize_number(val))
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn canonicalize_number(value: &str) -> String {
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return value.to_string();
    }
    if let Some(dot) = value.find('.') {
        let trimmed = value[..dot].to_string()
            + "."
            + value[dot + 1..].trim_end_matches('0');
        let trimmed = trimmed.trim_end_matches('.').to_string();
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed
        }
    } else {
        value.to_string()
    }
}

/// Trim decimal noise from a whitespace/comma-separated number list (SVG
/// `cx`/`cy`/`r`/`viewBox`/etc.), rejoining tokens with a single space.
fn minify_svg_numeric_list(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(canonicalize_number)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim decimal noise from SVG path data (`d`) or a `points` list, merging a
/// command letter directly against the number that follows it (`M0 0` not
/// `M 0 0`) while keeping a separating space between successive numbers.
fn minify_svg_path(value: &str) -> String {
    let mut out = String::new();
    let mut rest = value.trim();
    let mut prev_was_command = false;

    while !rest.is_empty() {
        let c = rest.chars().next().unwrap();

        if c.is_ascii_alphabetic() {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            prev_was_command = true;
            continue;
        }

        if c.is_whitespace() || c == ',' {
            rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == ',');
            continue;
        }

        let bytes = rest.as_bytes();
        let mut end = 0;
        if bytes[end] == b'-' {
            end += 1;
        }
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }

        if end == 0 {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let trimmed = canonicalize_number(&rest[..end]);
        if !prev_was_command && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&trimmed);
        prev_was_command = false;
        rest = &rest[end..];
    }

    out
}

/// Collapse all whitespace in a `<meta http-equiv="Content-Security-Policy"
/// content="...">` value to single spaces.
pub fn collapse_csp_content(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Choose the quote character for `value`: `quoteCharacter` wins; otherwise
/// the less-frequent of `'`/`"` in the value is used, and any occurrence of
/// the chosen quote is escaped as a numeric character reference.
fn choose_quote(value: &str, options: &Options) -> (char, String) {
    let chosen = options.quote_character.unwrap_or_else(|| {
        let double = value.matches('"').count();
        let single = value.matches('\'').count();
        if single > double {
            '"'
        } else {
            '\''
        }
    });

    let escaped = if chosen == '"' {
        value.replace('"', "&#34;")
    } else {
        value.replace('\'', "&#39;")
    };

    (chosen, escaped)
}

/// Render one normalised attribute as it will appear in the output, per
/// spec.md §4.4.5 steps 7-8. Separators between attributes are the caller's
/// concern (the driver's join logic). A `customAttrSurround` pair wraps the
/// whole rendered occurrence; a `customAttrAssign` marker replaces the `=`.
pub fn render(
    attr: &NormalizedAttribute,
    options: &Options,
    placeholders: &PlaceholderTables,
) -> String {
    let body = render_body(attr, options, placeholders);
    match (&attr.custom_open, &attr.custom_close) {
        (Some(open), Some(close)) => format!("{open}{body}{close}"),
        _ => body,
    }
}

fn render_body(attr: &NormalizedAttribute, options: &Options, placeholders: &PlaceholderTables) -> String {
    let Some(value) = &attr.value else {
        // Valueless/boolean attribute: always just the name.
        return attr.name.clone();
    };

    if options.collapse_boolean_attributes
        && is_boolean_attribute(&attr.name)
        && !is_pseudo_boolean_but_excluded(&attr.name)
    {
        return attr.name.clone();
    }

    let assign = attr.custom_assign.as_deref().unwrap_or("=");

    let can_unquote = attr.custom_assign.is_none()
        && options.remove_attribute_quotes
        && !value.is_empty()
        && value
            .chars()
            .all(|c| !matches!(c, ' ' | '\t' | '\n' | '\u{0C}' | '\r' | '"' | '\'' | '`' | '=' | '<' | '>'))
        && !placeholders.contains_placeholder(value);

    if can_unquote {
        return format!("{}{}{}", attr.name, assign, value);
    }

    let (quote, escaped) = choose_quote(value, options);
    format!("{}{}{}{}{}", attr.name, assign, quote, escaped, quote)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::Options;
    use crate::placeholder::PlaceholderTables;
    use crate::subminify::SubMinifierFacade;
    use crate::token::Quote;

    #[test]
    fn drops_redundant_defaults() {
        let options = Options {
            remove_redundant_attributes: true,
            ..Options::default()
        };
        let facade = SubMinifierFacade::default();
        let placeholders = PlaceholderTables::new();
        let attr = Attribute::new("method", Some("get".into()), Quote::Double);
        assert!(normalize(&attr, "form", &options, &facade, &placeholders, false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn quote_selection_prefers_less_frequent_quote() {
        let options = Options::default();
        let normalized = NormalizedAttribute {
            name: "title".to_string(),
            value: Some(r#"say "hi""#.to_string()),
            custom_assign: None,
            custom_open: None,
            custom_close: None,
        };
        let placeholders = PlaceholderTables::new();
        let rendered = render(&normalized, &options, &placeholders);
        assert!(rendered.contains('\''));
        assert!(!rendered.contains("&#39;"));
    }

    #[test]
    fn viewport_canonicalises_numbers() {
        assert_eq!(
            canonicalize_viewport_content("width=device-width, initial-scale=0.9000"),
            "width=device-width,initial-scale=0.9"
        );
    }

    #[test]
    fn svg_path_trims_trailing_zeros_and_merges_command() {
        assert_eq!(minify_svg_path("M 0.000 0.000"), "M0 0");
        assert_eq!(minify_svg_path("M 0 0 L 1 1"), "M0 0L1 1");
    }

    #[test]
    fn svg_numeric_list_trims_trailing_zeros() {
        assert_eq!(minify_svg_numeric_list("5.000"), "5");
        assert_eq!(minify_svg_numeric_list("0 0 10 10"), "0 0 10 10");
    }

    #[test]
    fn svg_circle_attrs_cleaned_through_normalize() {
        let options = Options::default();
        let facade = SubMinifierFacade::default();
        let placeholders = PlaceholderTables::new();
        let attr = Attribute::new("cx", Some("5.000".into()), Quote::Double);
        let normalized = normalize(&attr, "circle", &options, &facade, &placeholders, false)
            .unwrap()
            .unwrap();
        assert_eq!(normalized.value.as_deref(), Some("5"));
    }

    #[test]
    fn srcset_drops_1x_descriptor() {
        let options = Options::default();
        let facade = SubMinifierFacade::default();
        let placeholders = PlaceholderTables::new();
        assert_eq!(
            clean_srcset("a.jpg 1x, b.jpg 2x", &facade, &placeholders, &options).unwrap(),
            "a.jpg, b.jpg 2x"
        );
    }

    #[test]
    fn renders_custom_assign_marker_in_place_of_equals() {
        let options = Options::default();
        let placeholders = PlaceholderTables::new();
        let normalized = NormalizedAttribute {
            name: "foo".to_string(),
            value: Some("bar".to_string()),
            custom_assign: Some(":=".to_string()),
            custom_open: None,
            custom_close: None,
        };
        assert_eq!(render(&normalized, &options, &placeholders), r#"foo:="bar""#);
    }

    #[test]
    fn wraps_rendered_attribute_in_custom_surround_markers() {
        let options = Options::default();
        let placeholders = PlaceholderTables::new();
        let normalized = NormalizedAttribute {
            name: "checked".to_string(),
            value: None,
            custom_assign: None,
            custom_open: Some("{{#if x}}".to_string()),
            custom_close: Some("{{/if}}".to_string()),
        };
        assert_eq!(
            render(&normalized, &options, &placeholders),
            "{{#if x}}checked{{/if}}"
        );
    }
}
