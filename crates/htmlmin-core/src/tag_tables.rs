//! Static element/attribute classification tables.
//!
//! Grounded on the teacher's `attributes.rs` namespace-qualification switch
//! and `compat_mode.rs`: small `match`-based lookups rather than built
//! hash sets, since the tables are fixed and the match compiles to a jump
//! table anyway.

use crate::token::Attribute;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Elements that never have a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
            // legacy/non-standard, carried for parity with browsers' tag sets
            | "basefont"
            | "bgsound"
            | "frame"
            | "keygen"
            | "param"
    )
}

/// `script`, `style`, `noscript`: contents are not parsed as markup.
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "noscript")
}

/// Elements whose leading text-node linefeed is conventionally ignored.
pub fn is_listing_like(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea")
}

/// Elements whose whitespace must never be collapsed.
pub fn is_no_trim_element(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea" | "script" | "style")
}

/// "Phrasing content" categories per the HTML content model; anything not in
/// this set closes an open `<p>` when encountered as a start tag.
pub fn is_phrasing_content(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "area"
            | "audio"
            | "b"
            | "bdi"
            | "bdo"
            | "br"
            | "button"
            | "canvas"
            | "cite"
            | "code"
            | "data"
            | "datalist"
            | "del"
            | "dfn"
            | "em"
            | "embed"
            | "i"
            | "iframe"
            | "img"
            | "input"
            | "ins"
            | "kbd"
            | "keygen"
            | "label"
            | "map"
            | "mark"
            | "math"
            | "meter"
            | "noscript"
            | "object"
            | "output"
            | "picture"
            | "progress"
            | "q"
            | "ruby"
            | "s"
            | "samp"
            | "script"
            | "select"
            | "slot"
            | "small"
            | "span"
            | "strong"
            | "sub"
            | "sup"
            | "svg"
            | "template"
            | "textarea"
            | "time"
            | "u"
            | "var"
            | "video"
            | "wbr"
            | "text"
    )
}

/// Inline elements whose surrounding whitespace is semantically meaningful
/// (default inline-around set for `collapseWhitespaceSmart`).
pub fn is_inline_element(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "acronym"
            | "b"
            | "bdo"
            | "big"
            | "br"
            | "button"
            | "cite"
            | "code"
            | "dfn"
            | "em"
            | "font"
            | "i"
            | "img"
            | "input"
            | "kbd"
            | "label"
            | "mark"
            | "math"
            | "nobr"
            | "object"
            | "output"
            | "q"
            | "samp"
            | "select"
            | "small"
            | "span"
            | "strong"
            | "sub"
            | "sup"
            | "svg"
            | "textarea"
            | "time"
            | "tt"
            | "u"
            | "var"
    )
}

/// Elements whose text content is itself inline (used asymmetrically from
/// `is_inline_element` for end-tag trim decisions).
pub fn is_inline_text_element(tag: &str) -> bool {
    is_inline_element(tag) || matches!(tag, "li" | "td" | "th")
}

/// Form-control elements; adjacent whitespace between two of these collapses
/// even in non-aggressive mode (aggressive `collapseInlineTagWhitespace`).
pub fn is_form_control(tag: &str) -> bool {
    matches!(
        tag,
        "button" | "input" | "select" | "textarea" | "label" | "option" | "optgroup"
    )
}

pub fn is_boolean_attribute(name: &str) -> bool {
    matches!(
        name,
        "allowfullscreen"
            | "async"
            | "autofocus"
            | "autoplay"
            | "checked"
            | "compact"
            | "controls"
            | "declare"
            | "default"
            | "defaultchecked"
            | "defaultmuted"
            | "defaultselected"
            | "defer"
            | "disabled"
            | "enabled"
            | "formnovalidate"
            | "hidden"
            | "indeterminate"
            | "inert"
            | "ismap"
            | "itemscope"
            | "loop"
            | "multiple"
            | "muted"
            | "nohref"
            | "noresize"
            | "noshade"
            | "novalidate"
            | "nowrap"
            | "open"
            | "pauseonexit"
            | "readonly"
            | "required"
            | "reversed"
            | "scoped"
            | "seamless"
            | "selected"
            | "sortable"
            | "truespeed"
            | "typemustmatch"
            | "visible"
    )
}

/// `draggable` is explicitly *not* boolean: `true`/`false` are meaningful
/// string values, so it is special-cased out of `collapseBooleanAttributes`.
pub fn is_pseudo_boolean_but_excluded(name: &str) -> bool {
    name == "draggable"
}

pub fn is_uri_attribute(tag: &str, name: &str) -> bool {
    matches!(
        (tag, name),
        (_, "href")
            | (_, "src")
            | (_, "action")
            | (_, "formaction")
            | (_, "cite")
            | (_, "longdesc")
            | (_, "poster")
            | (_, "background")
            | (_, "profile")
            | (_, "manifest")
            | (_, "usemap")
            | (_, "icon")
            | (_, "codebase")
            | (_, "data")
            | (_, "archive")
            | (_, "classid")
    )
}

pub fn is_numeric_attribute(name: &str) -> bool {
    matches!(
        name,
        "maxlength"
            | "tabindex"
            | "cols"
            | "rows"
            | "colspan"
            | "rowspan"
            | "size"
            | "width"
            | "height"
            | "start"
    )
}

pub fn is_event_handler_attribute(name: &str) -> bool {
    name.len() > 2 && name.as_bytes()[0..2].eq_ignore_ascii_case(b"on")
}

/// SVG elements whose geometry attributes are safe to renumber (spec.md §8
/// scenarios 3/5: `minifySVG` trims decimal noise from path/shape data).
/// HTML has no element names colliding with these, so the attribute clean-up
/// path can key off the tag name alone without tracking foreign-content
/// ancestry separately.
pub fn is_svg_element(tag_lower: &str) -> bool {
    matches!(
        tag_lower,
        "svg" | "path" | "circle" | "ellipse" | "rect" | "line" | "polyline" | "polygon" | "g"
            | "use" | "defs" | "symbol" | "clippath" | "mask" | "pattern" | "marker"
            | "lineargradient" | "radialgradient" | "stop" | "text" | "tspan" | "image"
            | "foreignobject"
    )
}

/// Path-data-shaped attributes: a mix of command letters and number runs.
pub fn is_svg_path_attribute(name: &str) -> bool {
    matches!(name, "d" | "points")
}

/// Attributes that are a bare number or whitespace/comma-separated number
/// list, with no command letters.
pub fn is_svg_numeric_list_attribute(name: &str) -> bool {
    matches!(
        name,
        "cx" | "cy" | "r" | "rx" | "ry" | "x" | "y" | "x1" | "y1" | "x2" | "y2" | "width"
            | "height" | "viewbox" | "stroke-width" | "stroke-dasharray" | "font-size"
            | "opacity" | "fill-opacity" | "stroke-opacity" | "offset"
    )
}

/// Default elements eligible for `removeEmptyAttributes` on a whitespace-only
/// value.
pub fn is_default_empty_attribute(name: &str) -> bool {
    matches!(name, "class" | "id" | "style" | "title" | "lang" | "dir")
        || is_event_handler_attribute(name)
}

fn js_mime_types() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "text/javascript",
            "application/javascript",
            "application/x-javascript",
            "text/ecmascript",
            "application/ecmascript",
            "text/jscript",
        ]
        .into_iter()
        .collect()
    })
}

/// True for a `<script>` type that is executable JS (the absent-type default
/// also counts, handled by the caller), excluding `module`.
pub fn is_executable_js_type(type_value: &str) -> bool {
    let lower = type_value.trim().to_ascii_lowercase();
    lower != "module" && js_mime_types().contains(lower.as_str())
}

fn css_mime_types() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ["text/css"].into_iter().collect())
}

pub fn is_css_type(type_value: &str) -> bool {
    css_mime_types().contains(type_value.trim().to_ascii_lowercase().as_str())
}

/// JSON-flavoured `<script>` types that get a JSON round-trip rather than a
/// JS minify pass.
pub fn is_json_script_type(type_value: &str) -> bool {
    matches!(
        type_value.trim().to_ascii_lowercase().as_str(),
        "application/json"
            | "application/ld+json"
            | "application/manifest+json"
            | "application/vnd.geo+json"
            | "application/problem+json"
            | "application/merge-patch+json"
            | "application/json-patch+json"
            | "importmap"
            | "speculationrules"
    )
}

/// Redundant-attribute defaults: `(tag, attr, default_value)` triples that
/// `removeRedundantAttributes` drops when the value matches exactly.
pub fn redundant_attribute_default(tag: &str, name: &str) -> Option<&'static str> {
    match (tag, name) {
        ("form", "method") => Some("get"),
        ("input", "type") => Some("text"),
        ("button", "type") => Some("submit"),
        ("script", "language") => Some("javascript"),
        ("script", "charset") => None, // handled contextually, never unconditionally
        ("area", "shape") => Some("rect"),
        ("meta", "content") => None,
        _ => None,
    }
}

/// `removeEmptyElements` refuses to drop an element that carries an `id`, a
/// tag-dependent resource attribute (`src`/`srcdoc`/`data`/`code`), or is a
/// `textarea` — independent of any caller-supplied exception list.
pub fn can_remove_element(tag_lower: &str, attrs: &[Attribute]) -> bool {
    if attrs.iter().any(|a| a.name.eq_ignore_ascii_case("id")) {
        return false;
    }
    if tag_lower == "textarea" {
        return false;
    }
    if tag_lower == "iframe" && attrs.iter().any(|a| a.name.eq_ignore_ascii_case("srcdoc")) {
        return false;
    }
    let guarded = match tag_lower {
        "img" | "iframe" | "script" | "audio" | "video" | "source" | "embed" | "frame" => {
            Some("src")
        }
        "object" => Some("data"),
        "applet" => Some("code"),
        _ => None,
    };
    if let Some(name) = guarded {
        if attrs.iter().any(|a| a.name.eq_ignore_ascii_case(name)) {
            return false;
        }
    }
    true
}
