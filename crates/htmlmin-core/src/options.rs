//! Normalised configuration record (spec.md §3 "Options (normalised)") and
//! the two built-in presets (spec.md §6.1/§6.2).

use std::sync::Arc;

/// `Arc<dyn Fn + Send + Sync>` rather than `Rc`: `Options` is a plain data
/// record an embedder may build once and reuse across a thread pool, so its
/// callback fields must not poison that with `!Send`/`!Sync`.
pub type NameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type SortAttributesFn = Arc<dyn Fn(&str, &mut Vec<crate::token::Attribute>) + Send + Sync>;
pub type SortClassNameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type RemoveEmptyAttributesFn = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;
pub type SubMinifyFn =
    Arc<dyn Fn(&str, Option<&str>) -> Result<String, crate::error::CoreError> + Send + Sync>;

/// A compiled custom-fragment matcher: a literal open/close delimiter pair.
/// The teacher's stack has no regex dependency available for this port (see
/// DESIGN.md), so custom fragments and attribute-surround markers are
/// matched as literal delimiter pairs rather than arbitrary regexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelimiterPair {
    pub open: String,
    pub close: String,
}

/// Normalised, fully-resolved options for one `minify` call.
#[derive(Clone)]
pub struct Options {
    pub case_sensitive: bool,
    pub collapse_boolean_attributes: bool,
    pub collapse_inline_tag_whitespace: bool,
    pub collapse_whitespace: bool,
    pub conservative_collapse: bool,
    pub continue_on_minify_error: bool,
    pub continue_on_parse_error: bool,
    /// Literal assignment operators accepted in place of `=` between an
    /// attribute name and its value (e.g. a template engine's `:=`).
    pub custom_attr_assign: Vec<String>,
    pub custom_attr_collapse: Option<String>,
    /// Literal `(before, after)` marker pairs that wrap a whole attribute
    /// occurrence in template syntax (e.g. `{{#if x}}checked{{/if}}`).
    pub custom_attr_surround: Vec<(String, String)>,
    pub custom_event_attributes: Vec<String>,
    pub custom_fragment_quantifier_limit: usize,
    pub decode_entities: bool,
    pub html5: bool,
    pub ignore_custom_comments: Vec<String>,
    pub ignore_custom_fragments: Vec<DelimiterPair>,
    pub include_auto_generated_tags: bool,
    pub inline_custom_elements: Vec<String>,
    pub keep_closing_slash: bool,
    pub max_input_length: Option<usize>,
    pub max_line_length: Option<usize>,
    pub minify_css: Option<SubMinifyFn>,
    pub minify_js: Option<SubMinifyFn>,
    pub minify_urls: Option<SubMinifyFn>,
    pub name: Option<NameFn>,
    pub no_newlines_before_tag_close: bool,
    pub partial_markup: bool,
    pub preserve_line_breaks: bool,
    pub prevent_attributes_escaping: bool,
    pub process_conditional_comments: bool,
    pub process_scripts: Vec<String>,
    pub quote_character: Option<char>,
    pub remove_attribute_quotes: bool,
    pub remove_comments: bool,
    pub remove_empty_attributes: Option<RemoveEmptyAttributesFn>,
    pub remove_empty_elements: bool,
    pub remove_empty_elements_except: Vec<String>,
    pub remove_optional_tags: bool,
    pub remove_redundant_attributes: bool,
    pub remove_script_type_attributes: bool,
    pub remove_style_link_type_attributes: bool,
    pub remove_tag_whitespace: bool,
    pub sort_attributes: Option<SortAttributesFn>,
    pub sort_class_name: Option<SortClassNameFn>,
    pub trim_custom_fragments: bool,
    pub use_short_doctype: bool,
    pub log: Option<LogFn>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            case_sensitive: false,
            collapse_boolean_attributes: false,
            collapse_inline_tag_whitespace: false,
            collapse_whitespace: false,
            conservative_collapse: false,
            continue_on_minify_error: true,
            continue_on_parse_error: false,
            custom_attr_assign: Vec::new(),
            custom_attr_collapse: None,
            custom_attr_surround: Vec::new(),
            custom_event_attributes: Vec::new(),
            custom_fragment_quantifier_limit: 200,
            decode_entities: false,
            html5: true,
            ignore_custom_comments: vec!["^!".to_string(), r"^\s*#".to_string()],
            ignore_custom_fragments: Vec::new(),
            include_auto_generated_tags: true,
            inline_custom_elements: Vec::new(),
            keep_closing_slash: false,
            max_input_length: None,
            max_line_length: None,
            minify_css: None,
            minify_js: None,
            minify_urls: None,
            name: None,
            no_newlines_before_tag_close: false,
            partial_markup: false,
            preserve_line_breaks: false,
            prevent_attributes_escaping: false,
            process_conditional_comments: false,
            process_scripts: Vec::new(),
            quote_character: None,
            remove_attribute_quotes: false,
            remove_comments: false,
            remove_empty_attributes: None,
            remove_empty_elements: false,
            remove_empty_elements_except: Vec::new(),
            remove_optional_tags: false,
            remove_redundant_attributes: false,
            remove_script_type_attributes: false,
            remove_style_link_type_attributes: false,
            remove_tag_whitespace: false,
            sort_attributes: None,
            sort_class_name: None,
            trim_custom_fragments: false,
            use_short_doctype: false,
            log: None,
        }
    }
}

impl Options {
    /// Shadow the options when entering `<svg>`/`<math>`: case becomes
    /// sensitive, the name normaliser becomes identity, and the closing
    /// slash is kept. Restored by simply dropping the returned clone and
    /// reverting to the saved copy (see `driver::OptionsScope`).
    pub fn shadow_for_foreign_content(&self) -> Options {
        let mut shadowed = self.clone();
        shadowed.case_sensitive = true;
        shadowed.name = None;
        shadowed.keep_closing_slash = true;
        shadowed
    }

    pub fn normalize_name(&self, name: &str) -> String {
        match &self.name {
            Some(f) => f(name),
            None if self.case_sensitive => name.to_string(),
            None => name.to_ascii_lowercase(),
        }
    }
}

pub mod presets {
    use super::Options;

    /// Safe for hand-authored markup that must stay close to the source:
    /// decode entities, collapse whitespace conservatively, keep comments
    /// and optional tags.
    pub fn conservative() -> Options {
        Options {
            decode_entities: true,
            collapse_whitespace: true,
            conservative_collapse: true,
            remove_redundant_attributes: false,
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            ..Options::default()
        }
    }

    /// Every size-reducing flag on. CSS/JS/URL minification only fires if
    /// the caller also supplies the relevant `minify_*` callback.
    pub fn comprehensive() -> Options {
        Options {
            collapse_whitespace: true,
            collapse_boolean_attributes: true,
            collapse_inline_tag_whitespace: true,
            decode_entities: true,
            remove_attribute_quotes: true,
            remove_comments: true,
            remove_empty_attributes: Some(std::sync::Arc::new(|name: &str, value: &str| {
                value.trim().is_empty() && crate::tag_tables::is_default_empty_attribute(name)
            })),
            remove_empty_elements: true,
            remove_optional_tags: true,
            remove_redundant_attributes: true,
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            sort_attributes: None,
            sort_class_name: None,
            use_short_doctype: true,
            ..Options::default()
        }
    }
}

const PRESET_NAMES: [&str; 2] = ["conservative", "comprehensive"];

pub fn preset_names() -> &'static [&'static str] {
    &PRESET_NAMES
}

pub fn get_preset(name: &str) -> Option<Options> {
    match name {
        "conservative" => Some(presets::conservative()),
        "comprehensive" => Some(presets::comprehensive()),
        _ => None,
    }
}
