//! Generative checks for the invariants spec.md §8 calls out: idempotence,
//! length non-increase under whitespace collapsing, and attribute
//! quote-safety. Hand-picked cases live in `scenarios.rs`; these cover the
//! same properties over generated input.

use htmlmin_core::{minify, Options};
use quickcheck_macros::quickcheck;

/// Build a small, always-balanced HTML fragment from a handful of fuzzed
/// words and a whitespace-run length, so generated input is always
/// well-formed enough to reach the tokenizer's happy path.
fn fragment_from(words: &[String], pad: u8) -> String {
    let pad = " ".repeat((pad % 6) as usize);
    let body = words
        .iter()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
        .filter(|w: &String| !w.is_empty())
        .collect::<Vec<_>>()
        .join(&format!("{pad}<br>{pad}"));
    format!("<div class=\"a   b\">{pad}<p>{body}</p>{pad}</div>")
}

#[quickcheck]
fn idempotent_for_arbitrary_fragments(words: Vec<String>, pad: u8) -> bool {
    let source = fragment_from(&words, pad);
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    let Ok(once) = minify(&source, &options) else {
        return true;
    };
    let Ok(twice) = minify(&once, &options) else {
        return false;
    };
    once == twice
}

#[quickcheck]
fn collapsing_whitespace_never_grows_the_input(words: Vec<String>, pad: u8) -> bool {
    let source = fragment_from(&words, pad);
    let options = Options {
        collapse_whitespace: true,
        ..Options::default()
    };
    match minify(&source, &options) {
        Ok(out) => out.len() <= source.len(),
        Err(_) => true,
    }
}

#[quickcheck]
fn rendered_attribute_values_never_contain_their_own_delimiter(raw: String) -> bool {
    // `>` and `<` are excluded from the source value so the rendered tag's
    // closing `>` unambiguously marks the end of the attribute, the same
    // assumption `scenarios.rs`'s `assert_quote_safe` relies on.
    let value: String = raw.chars().filter(|c| *c != '>' && *c != '<').collect();
    let source = format!("<div title=\"{value}\"></div>");
    let options = Options {
        decode_entities: true,
        ..Options::default()
    };
    let Ok(out) = minify(&source, &options) else {
        return true;
    };
    let Some(attr_start) = out.find("title=") else {
        return true;
    };
    let Some(tag_end) = out[attr_start..].find('>') else {
        return false;
    };
    let rendered_attr = &out[attr_start..attr_start + tag_end];
    let Some(delim) = rendered_attr["title=".len()..].chars().next() else {
        return false;
    };
    if delim != '"' && delim != '\'' {
        return false;
    }
    let value_start = "title=".len() + delim.len_utf8();
    let rendered_value = &rendered_attr[value_start..rendered_attr.len() - delim.len_utf8()];
    !rendered_value.contains(delim)
}
