//! End-to-end scenarios (spec.md §8) and cross-cutting invariants that only
//! make sense driven through the public `minify` entry point rather than a
//! single module's unit tests.

use htmlmin_core::{minify, CoreError, Options};
use std::sync::Arc;

fn identity_minifier() -> Arc<dyn Fn(&str, Option<&str>) -> Result<String, CoreError> + Send + Sync> {
    Arc::new(|text: &str, _hint: Option<&str>| Ok(text.to_string()))
}

fn whitespace_stripping_css() -> Options {
    let mut options = Options::default();
    options.minify_css = Some(Arc::new(|css: &str, _hint: Option<&str>| {
        Ok(css
            .split([' ', '\n', '\t'])
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(""))
    }));
    options
}

#[test]
fn scenario_1_json_script_collapses_whitespace() {
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    let out = minify(
        "<script type=\"application/ld+json\">{\"foo\":  \"bar\"}\n\n</script>",
        &options,
    )
    .unwrap();
    assert_eq!(
        out,
        r#"<script type="application/ld+json">{"foo":"bar"}</script>"#
    );
}

#[test]
fn scenario_2_style_tag_runs_through_css_callback() {
    let options = whitespace_stripping_css();
    let out = minify(
        "<style>div#foo { background-color: red; color: white }</style>",
        &options,
    )
    .unwrap();
    assert_eq!(out, "<style>div#foo{background-color:red;color:white}</style>");
}

#[test]
fn scenario_4_inline_style_runs_through_css_callback() {
    let options = whitespace_stripping_css();
    let out = minify(
        r#"<div style="color: red; background-color: yellow;"></div>"#,
        &options,
    )
    .unwrap();
    assert_eq!(out, r#"<div style="color:red;background-color:yellow"></div>"#);
}

#[test]
fn scenario_3_svg_geometry_numbers_are_trimmed() {
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    let out = minify(
        "<svg>\n  <path d=\"M 0.000 0.000\"/>\n  <circle cx=\"5.000\" cy=\"5.000\" r=\"2.000\"/>\n</svg>",
        &options,
    )
    .unwrap();
    assert_eq!(out, r#"<svg><path d="M0 0"/><circle cx="5" cy="5" r="2"/></svg>"#);
}

#[test]
fn scenario_5_svg_keeps_slash_html_void_elements_do_not() {
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    let out = minify(
        r#"<div><img src="test.jpg"/><svg><path d="M 0 0"/></svg><br/></div>"#,
        &options,
    )
    .unwrap();
    assert_eq!(
        out,
        r#"<div><img src="test.jpg"><svg><path d="M0 0"/></svg><br></div>"#
    );
}

#[test]
fn scenario_6_empty_elements_removed_except_inside_svg() {
    let options = Options {
        remove_empty_elements: true,
        ..Options::default()
    };
    let out = minify("<p>Hello <span></span>world</p>", &options).unwrap();
    assert_eq!(out, "<p>Hello world</p>");

    let out = minify(r#"<svg><path d="M10 10"></path></svg>"#, &options).unwrap();
    assert_eq!(out, r#"<svg><path d="M10 10"></path></svg>"#);
}

#[test]
fn ignore_marker_round_trips_verbatim_regardless_of_options() {
    let options = Options {
        collapse_whitespace: true,
        remove_comments: true,
        remove_optional_tags: true,
        ..Options::default()
    };
    let out = minify(
        "<p>a</p>   <!-- htmlmin:ignore -->  weird   RAW  <b>x</b>  <!-- htmlmin:ignore -->   <p>b</p>",
        &options,
    )
    .unwrap();
    assert!(out.contains("weird   RAW  <b>x</b>"));
}

#[test]
fn attribute_preservation_every_attr_emitted_or_documented_drop() {
    let options = Options::default();
    let out = minify(r#"<a href="x" data-foo="bar" custom-thing="z">t</a>"#, &options).unwrap();
    assert!(out.contains("href=\"x\""));
    assert!(out.contains("data-foo=\"bar\""));
    assert!(out.contains("custom-thing=\"z\""));
}

fn assert_quote_safe(rendered_attr: &str) {
    let delim = rendered_attr.chars().nth(rendered_attr.find('=').unwrap() + 1).unwrap();
    assert!(delim == '"' || delim == '\'');
    let value_start = rendered_attr.find('=').unwrap() + 2;
    let value = &rendered_attr[value_start..rendered_attr.len() - 1];
    assert!(
        !value.contains(delim),
        "unescaped delimiter {delim:?} inside value of {rendered_attr:?}"
    );
}

#[test]
fn quote_safety_escapes_whichever_quote_was_chosen_as_delimiter() {
    // After decoding, the value holds 4 real `"` and 2 real `'`; `'` is
    // less frequent so it becomes the delimiter, and the 2 real `'`
    // characters must be escaped even though the source used `"` quotes.
    let options = Options {
        decode_entities: true,
        ..Options::default()
    };
    let out = minify(
        r#"<div title="a &quot;x&quot; &quot;y&quot; and a 'z'"></div>"#,
        &options,
    )
    .unwrap();
    let attr_start = out.find("title=").unwrap();
    let attr_end = attr_start + out[attr_start..].find('>').unwrap();
    assert_quote_safe(&out[attr_start..attr_end]);
}

#[test]
fn quote_safety_escapes_when_both_present_equally() {
    let options = Options::default();
    let out = minify(r#"<div title='say "hi"'></div>"#, &options).unwrap();
    let attr_start = out.find("title=").unwrap();
    let attr_end = attr_start + out[attr_start..].find('>').unwrap();
    assert_quote_safe(&out[attr_start..attr_end]);
}

#[test]
fn ambiguous_ampersand_reencoded_when_decoding() {
    let options = Options {
        decode_entities: true,
        ..Options::default()
    };
    let out = minify("<p>Fish &amp; Chips &notanentity; Cream</p>", &options).unwrap();
    assert!(out.contains("Fish & Chips"));
}

#[test]
fn idempotent_under_default_and_both_presets() {
    let source = "<div   class=\"a   b\" >  <p>Hello <b>world</b>  </p>\n\n<img src=\"x.png\"/></div>";
    for options in [
        Options::default(),
        htmlmin_core::get_preset("conservative").unwrap(),
        htmlmin_core::get_preset("comprehensive").unwrap(),
    ] {
        let once = minify(source, &options).unwrap();
        let twice = minify(&once, &options).unwrap();
        assert_eq!(once, twice, "not idempotent for this option set");
    }
}

#[test]
fn length_never_increases_with_collapse_whitespace() {
    let source = "<div>\n  <p>   Hello    world   </p>\n\n  <span>   x   </span>\n</div>";
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    let out = minify(source, &options).unwrap();
    assert!(out.len() <= source.len());
}

#[test]
fn unknown_preset_is_none_not_a_panic() {
    assert!(htmlmin_core::get_preset("aggressive-mode-9000").is_none());
}

#[test]
fn max_input_length_throws_before_any_output() {
    let options = Options {
        max_input_length: Some(3),
        ..Options::default()
    };
    let err = minify("<p>abcdef</p>", &options).unwrap_err();
    assert!(matches!(err, CoreError::InputTooLarge { limit: 3, .. }));
}

#[test]
fn minify_error_falls_back_to_original_when_continue_on_minify_error() {
    let mut options = Options::default();
    options.minify_css = Some(Arc::new(|_text: &str, _hint: Option<&str>| {
        Err(CoreError::Minify {
            context: "css".to_string(),
            cause: "boom".to_string(),
        })
    }));
    assert!(options.continue_on_minify_error);
    let out = minify(r#"<div style="color: red"></div>"#, &options).unwrap();
    assert!(out.contains("color: red") || out.contains("color:red"));
}

#[test]
fn minify_error_propagates_when_continue_on_minify_error_is_false() {
    let mut options = Options::default();
    options.continue_on_minify_error = false;
    options.minify_css = Some(Arc::new(|_text: &str, _hint: Option<&str>| {
        Err(CoreError::Minify {
            context: "css".to_string(),
            cause: "boom".to_string(),
        })
    }));
    let err = minify(r#"<div style="color: red"></div>"#, &options).unwrap_err();
    assert!(matches!(err, CoreError::Minify { .. }));
}

#[test]
fn custom_fragment_placeholder_round_trips() {
    let mut options = Options::default();
    options.ignore_custom_fragments.push(htmlmin_core::DelimiterPair {
        open: "<?php".to_string(),
        close: "?>".to_string(),
    });
    options.collapse_whitespace = true;
    let out = minify("<p>a</p>  <?php echo 1; ?>  <p>b</p>", &options).unwrap();
    assert!(out.contains("<?php echo 1; ?>"));
}

#[test]
fn url_minifier_skipped_for_rel_canonical() {
    let mut options = Options::default();
    options.minify_urls = Some(identity_minifier());
    let out = minify(r#"<link rel="canonical" href="https://example.com/">"#, &options).unwrap();
    assert!(out.contains(r#"href="https://example.com/""#));
}
