//! Streaming HTML tokenizer and transformation-driven minifier core.
//!
//! `minify` wires the pack's components together: the [`placeholder`] module
//! protects `htmlmin:ignore` regions and custom fragments behind UID tokens,
//! [`driver`] runs the parser/attribute/whitespace pipeline over the
//! protected source, and the placeholders are restored verbatim afterwards.

pub mod attributes;
pub mod driver;
pub mod entities;
pub mod error;
mod macros;
pub mod omission;
pub mod options;
pub mod parser;
pub mod placeholder;
pub mod sort;
mod str_fns;
pub mod subminify;
pub mod tag_tables;
pub mod token;
pub mod whitespace;

pub use error::{CoreError, CoreResult, ErrorContext};
pub use options::{get_preset, presets, preset_names, DelimiterPair, Options};
pub use placeholder::PlaceholderTables;
pub use sort::{analyze, SortAnalysis};
pub use subminify::SubMinifierFacade;

/// Minify `source` per `options`. Synchronous: recursive descent into
/// `srcdoc` attributes, conditional-comment bodies, and `noscript` content
/// runs as ordinary function calls rather than awaited futures, since this
/// port carries no async runtime dependency (see DESIGN.md).
pub fn minify(source: &str, options: &Options) -> CoreResult<String> {
    if let Some(limit) = options.max_input_length {
        if source.len() > limit {
            return Err(CoreError::InputTooLarge {
                limit,
                actual: source.len(),
            });
        }
    }

    if let Some(q) = options.quote_character {
        if q != '"' && q != '\'' {
            return Err(CoreError::Config(format!(
                "quote_character must be '\"' or '\\'', got {q:?}"
            )));
        }
    }

    let subminify = SubMinifierFacade::new(
        options.minify_css.clone(),
        options.minify_js.clone(),
        options.minify_urls.clone(),
    );

    let mut placeholders = PlaceholderTables::new();
    let protected = placeholders.protect(source, options);
    let transformed = driver::transform(&protected, options, &subminify, &placeholders)?;
    Ok(placeholders.restore(&transformed, options))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minifies_script_type_json() {
        let options = Options::default();
        let out = minify(r#"<script type="application/json">{ "a": 1 }</script>"#, &options).unwrap();
        assert_eq!(out, r#"<script type="application/json">{"a":1}</script>"#);
    }

    #[test]
    fn minifies_inline_style_with_css_callback() {
        let mut options = Options::default();
        options.minify_css = Some(std::sync::Arc::new(|css: &str, _hint: Option<&str>| {
            Ok(css.split_whitespace().collect::<Vec<_>>().join(""))
        }));
        let out = minify(r#"<div style="color: red; "></div>"#, &options).unwrap();
        assert_eq!(out, r#"<div style="color:red"></div>"#);
    }

    #[test]
    fn minifies_svg_path_and_circle_preserving_case() {
        let options = Options {
            collapse_whitespace: true,
            ..Options::default()
        };
        let out = minify(
            "<svg viewBox=\"0 0 10 10\">   <circle cx=\"5\" cy=\"5\" r=\"4\"/>  <path d=\"M0 0 L1 1\"/></svg>",
            &options,
        )
        .unwrap();
        assert!(out.contains("viewBox"));
        assert!(out.contains("<circle"));
        assert!(!out.contains("ViewBox"));
    }

    #[test]
    fn self_closing_distinction_for_img_svg_br() {
        let mut options = Options::default();
        options.keep_closing_slash = true;
        let out = minify("<img src=\"a.png\"/><br/>", &options).unwrap();
        // `keep_closing_slash` is an ordinary-HTML option: void elements in
        // HTML content never carry the slash regardless (it is only
        // meaningful once foreign-content shadowing turns it on for
        // svg/math descendants).
        assert_eq!(out, r#"<img src="a.png"><br>"#);
    }

    #[test]
    fn removes_empty_elements_with_svg_exception() {
        let options = Options {
            remove_empty_elements: true,
            ..Options::default()
        };
        let out = minify("<span></span><svg></svg>", &options).unwrap();
        assert_eq!(out, "<svg></svg>");
    }

    #[test]
    fn respects_max_input_length() {
        let options = Options {
            max_input_length: Some(4),
            ..Options::default()
        };
        let err = minify("<p>too long</p>", &options).unwrap_err();
        assert!(matches!(err, CoreError::InputTooLarge { .. }));
    }

    #[test]
    fn ignore_region_is_not_minified() {
        let options = Options {
            collapse_whitespace: true,
            remove_comments: true,
            ..Options::default()
        };
        let out = minify(
            "<p>a</p><!-- htmlmin:ignore --><b>   RAW   </b><!-- htmlmin:ignore --><p>b</p>",
            &options,
        )
        .unwrap();
        assert!(out.contains("<b>   RAW   </b>"));
    }

    #[test]
    fn rejects_quote_character_other_than_single_or_double() {
        let options = Options {
            quote_character: Some('x'),
            ..Options::default()
        };
        let err = minify(r#"<div title="a"></div>"#, &options).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn preset_lookup_round_trips_known_names() {
        assert!(get_preset("conservative").is_some());
        assert!(get_preset("comprehensive").is_some());
        assert!(get_preset("nonexistent").is_none());
        assert_eq!(preset_names(), &["conservative", "comprehensive"]);
    }
}
