//! Tag-omission rules (spec.md §4.4.7), consulted only when
//! `removeOptionalTags` is set. Pure predicates over tag names so the driver
//! can buffer a candidate start/end tag and decide once it knows what
//! follows.

/// Block-level elements that make a preceding `<p>`'s end tag omittable.
fn is_p_block_level(tag: &str) -> bool {
    matches!(
        tag,
        "address" | "article" | "aside" | "blockquote" | "details" | "div" | "dl" | "fieldset"
            | "figcaption" | "figure" | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5"
            | "h6" | "header" | "hr" | "main" | "menu" | "nav" | "ol" | "p" | "pre" | "section"
            | "table" | "ul"
    )
}

/// Elements generally inline; `</p>` must never be omitted before one of
/// these even though they can follow a `<p>` (the pInline carve-out).
fn is_p_inline(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr" | "b" | "bdi" | "bdo" | "br" | "cite" | "code" | "data" | "dfn" | "em"
            | "i" | "kbd" | "mark" | "q" | "s" | "samp" | "small" | "span" | "strong" | "sub"
            | "sup" | "time" | "u" | "var" | "wbr"
    )
}

fn is_metadata_content(tag: &str) -> bool {
    matches!(
        tag,
        "base" | "link" | "meta" | "noscript" | "script" | "style" | "template" | "title"
    )
}

/// Whether `tag`'s start tag may be dropped given what is known about the
/// element's context. `html`/`head` are unconditional; `body` only if its
/// first child is not metadata content; `colgroup` only directly before
/// `<col>`; `tbody` only directly before `<tr>`.
pub fn start_tag_omittable(tag: &str, next_tag: Option<&str>, is_empty_element: bool) -> bool {
    match tag {
        "html" | "head" => true,
        "body" => next_tag.map(|t| !is_metadata_content(t)).unwrap_or(true),
        "colgroup" => next_tag == Some("col"),
        "tbody" => next_tag == Some("tr"),
        _ if is_empty_element => matches!(tag, "html" | "head" | "body"),
        _ => false,
    }
}

/// Whether `tag`'s end tag may be dropped unconditionally (no lookahead
/// needed): it is always safe because nothing can legally follow inside the
/// same parent that would be misparsed.
pub fn end_tag_omittable_unconditionally(tag: &str) -> bool {
    matches!(tag, "html" | "head" | "body" | "colgroup" | "caption")
}

/// Whether `tag`'s end tag may be dropped because `next_tag` (a sibling
/// start tag, or `None` at the parent's end) makes the boundary
/// unambiguous.
pub fn end_tag_omittable_before(tag: &str, next_tag: Option<&str>) -> bool {
    match tag {
        "li" => matches!(next_tag, Some("li") | None),
        "optgroup" => matches!(next_tag, Some("optgroup") | None),
        "tr" => matches!(next_tag, Some("tr") | None),
        "dt" | "dd" => matches!(next_tag, Some("dt") | Some("dd") | None),
        "option" => matches!(next_tag, Some("option") | Some("optgroup") | None),
        "thead" => matches!(next_tag, Some("tbody") | Some("tfoot")),
        "tbody" => matches!(next_tag, Some("tbody") | Some("tfoot") | None),
        "tfoot" => matches!(next_tag, Some("tbody") | None),
        "td" | "th" => matches!(next_tag, Some("td") | Some("th") | None),
        "rt" | "rp" => matches!(next_tag, Some("rt") | Some("rp") | None),
        "p" => match next_tag {
            None => true,
            Some(next) => is_p_block_level(next) && !is_p_inline(next),
        },
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn colgroup_only_omittable_before_col() {
        assert!(start_tag_omittable("colgroup", Some("col"), false));
        assert!(!start_tag_omittable("colgroup", Some("tr"), false));
    }

    #[test]
    fn p_end_tag_respects_inline_carveout() {
        assert!(end_tag_omittable_before("p", Some("div")));
        assert!(!end_tag_omittable_before("p", Some("span")));
    }

    #[test]
    fn li_omittable_before_sibling_or_eof() {
        assert!(end_tag_omittable_before("li", Some("li")));
        assert!(end_tag_omittable_before("li", None));
        assert!(!end_tag_omittable_before("li", Some("div")));
    }
}
