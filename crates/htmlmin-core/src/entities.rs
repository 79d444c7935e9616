//! HTML character-reference decode/encode.
//!
//! Grounded on the teacher's in-tree `entities` crate
//! (`crates/entities/src/lib.rs`): a context-sensitive `decode` that treats
//! attribute-context references specially for the "ambiguous ampersand"
//! rule, plus numeric character reference handling with the HTML5 CP1252
//! remap table for the C1 control range. The named-reference table covers
//! the Latin-1 Supplement block in full, the Greek alphabet, and the
//! punctuation/math/arrow references in common authoring use; numeric
//! references (decimal and hex) are handled in full regardless of the named
//! table's coverage, matching spec.md's invariant that numeric refs always
//! round-trip exactly.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HtmlContext {
    Attribute,
    Text,
}

/// HTML5 replaces C1 control codepoints 0x80..=0x9F with these when decoding
/// a numeric character reference, for legacy CP1252 compatibility.
const CP1252_REPLACEMENTS: [u32; 32] = [
    0x20AC, 0x81, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0x8D, 0x017D, 0x8F, 0x90, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x9D, 0x017E, 0x0178,
];

fn named_entities() -> &'static FxHashMap<&'static str, &'static str> {
    static MAP: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        [
            ("amp", "&"), ("lt", "<"), ("gt", ">"), ("quot", "\""), ("apos", "'"),
            // Latin-1 Supplement (full block, matching the WHATWG HTML5 table).
            ("nbsp", "\u{A0}"), ("iexcl", "\u{A1}"), ("cent", "\u{A2}"), ("pound", "\u{A3}"),
            ("curren", "\u{A4}"), ("yen", "\u{A5}"), ("brvbar", "\u{A6}"), ("sect", "\u{A7}"),
            ("uml", "\u{A8}"), ("copy", "\u{A9}"), ("ordf", "\u{AA}"), ("laquo", "\u{AB}"),
            ("not", "\u{AC}"), ("shy", "\u{AD}"), ("reg", "\u{AE}"), ("macr", "\u{AF}"),
            ("deg", "\u{B0}"), ("plusmn", "\u{B1}"), ("sup2", "\u{B2}"), ("sup3", "\u{B3}"),
            ("acute", "\u{B4}"), ("micro", "\u{B5}"), ("para", "\u{B6}"), ("middot", "\u{B7}"),
            ("cedil", "\u{B8}"), ("sup1", "\u{B9}"), ("ordm", "\u{BA}"), ("raquo", "\u{BB}"),
            ("frac14", "\u{BC}"), ("frac12", "\u{BD}"), ("frac34", "\u{BE}"), ("iquest", "\u{BF}"),
            ("Agrave", "\u{C0}"), ("Aacute", "\u{C1}"), ("Acirc", "\u{C2}"), ("Atilde", "\u{C3}"),
            ("Auml", "\u{C4}"), ("Aring", "\u{C5}"), ("AElig", "\u{C6}"), ("Ccedil", "\u{C7}"),
            ("Egrave", "\u{C8}"), ("Eacute", "\u{C9}"), ("Ecirc", "\u{CA}"), ("Euml", "\u{CB}"),
            ("Igrave", "\u{CC}"), ("Iacute", "\u{CD}"), ("Icirc", "\u{CE}"), ("Iuml", "\u{CF}"),
            ("ETH", "\u{D0}"), ("Ntilde", "\u{D1}"), ("Ograve", "\u{D2}"), ("Oacute", "\u{D3}"),
            ("Ocirc", "\u{D4}"), ("Otilde", "\u{D5}"), ("Ouml", "\u{D6}"), ("times", "\u{D7}"),
            ("Oslash", "\u{D8}"), ("Ugrave", "\u{D9}"), ("Uacute", "\u{DA}"), ("Ucirc", "\u{DB}"),
            ("Uuml", "\u{DC}"), ("Yacute", "\u{DD}"), ("THORN", "\u{DE}"), ("szlig", "\u{DF}"),
            ("agrave", "\u{E0}"), ("aacute", "\u{E1}"), ("acirc", "\u{E2}"), ("atilde", "\u{E3}"),
            ("auml", "\u{E4}"), ("aring", "\u{E5}"), ("aelig", "\u{E6}"), ("ccedil", "\u{E7}"),
            ("egrave", "\u{E8}"), ("eacute", "\u{E9}"), ("ecirc", "\u{EA}"), ("euml", "\u{EB}"),
            ("igrave", "\u{EC}"), ("iacute", "\u{ED}"), ("icirc", "\u{EE}"), ("iuml", "\u{EF}"),
            ("eth", "\u{F0}"), ("ntilde", "\u{F1}"), ("ograve", "\u{F2}"), ("oacute", "\u{F3}"),
            ("ocirc", "\u{F4}"), ("otilde", "\u{F5}"), ("ouml", "\u{F6}"), ("divide", "\u{F7}"),
            ("oslash", "\u{F8}"), ("ugrave", "\u{F9}"), ("uacute", "\u{FA}"), ("ucirc", "\u{FB}"),
            ("uuml", "\u{FC}"), ("yacute", "\u{FD}"), ("thorn", "\u{FE}"), ("yuml", "\u{FF}"),
            // Latin Extended-A subset in common authoring use.
            ("OElig", "\u{152}"), ("oelig", "\u{153}"), ("Scaron", "\u{160}"),
            ("scaron", "\u{161}"), ("Yuml", "\u{178}"), ("fnof", "\u{192}"),
            ("circ", "\u{2C6}"), ("tilde", "\u{2DC}"),
            // Greek alphabet, upper and lower case.
            ("Alpha", "\u{391}"), ("Beta", "\u{392}"), ("Gamma", "\u{393}"), ("Delta", "\u{394}"),
            ("Epsilon", "\u{395}"), ("Zeta", "\u{396}"), ("Eta", "\u{397}"), ("Theta", "\u{398}"),
            ("Iota", "\u{399}"), ("Kappa", "\u{39A}"), ("Lambda", "\u{39B}"), ("Mu", "\u{39C}"),
            ("Nu", "\u{39D}"), ("Xi", "\u{39E}"), ("Omicron", "\u{39F}"), ("Pi", "\u{3A0}"),
            ("Rho", "\u{3A1}"), ("Sigma", "\u{3A3}"), ("Tau", "\u{3A4}"), ("Upsilon", "\u{3A5}"),
            ("Phi", "\u{3A6}"), ("Chi", "\u{3A7}"), ("Psi", "\u{3A8}"), ("Omega", "\u{3A9}"),
            ("alpha", "\u{3B1}"), ("beta", "\u{3B2}"), ("gamma", "\u{3B3}"), ("delta", "\u{3B4}"),
            ("epsilon", "\u{3B5}"), ("zeta", "\u{3B6}"), ("eta", "\u{3B7}"), ("theta", "\u{3B8}"),
            ("iota", "\u{3B9}"), ("kappa", "\u{3BA}"), ("lambda", "\u{3BB}"), ("mu", "\u{3BC}"),
            ("nu", "\u{3BD}"), ("xi", "\u{3BE}"), ("omicron", "\u{3BF}"), ("pi", "\u{3C0}"),
            ("rho", "\u{3C1}"), ("sigmaf", "\u{3C2}"), ("sigma", "\u{3C3}"), ("tau", "\u{3C4}"),
            ("upsilon", "\u{3C5}"), ("phi", "\u{3C6}"), ("chi", "\u{3C7}"), ("psi", "\u{3C8}"),
            ("omega", "\u{3C9}"), ("thetasym", "\u{3D1}"), ("piv", "\u{3D6}"),
            // General punctuation.
            ("ensp", "\u{2002}"), ("emsp", "\u{2003}"), ("thinsp", "\u{2009}"),
            ("zwnj", "\u{200C}"), ("zwj", "\u{200D}"), ("lrm", "\u{200E}"), ("rlm", "\u{200F}"),
            ("ndash", "\u{2013}"), ("mdash", "\u{2014}"), ("lsquo", "\u{2018}"),
            ("rsquo", "\u{2019}"), ("sbquo", "\u{201A}"), ("ldquo", "\u{201C}"),
            ("rdquo", "\u{201D}"), ("bdquo", "\u{201E}"), ("dagger", "\u{2020}"),
            ("Dagger", "\u{2021}"), ("bull", "\u{2022}"), ("hellip", "\u{2026}"),
            ("permil", "\u{2030}"), ("prime", "\u{2032}"), ("Prime", "\u{2033}"),
            ("lsaquo", "\u{2039}"), ("rsaquo", "\u{203A}"), ("oline", "\u{203E}"),
            ("frasl", "\u{2044}"), ("euro", "\u{20AC}"),
            // Letterlike, arrows, math/set-theory operators.
            ("image", "\u{2111}"), ("weierp", "\u{2118}"), ("real", "\u{211C}"),
            ("trade", "\u{2122}"), ("alefsym", "\u{2135}"),
            ("larr", "\u{2190}"), ("uarr", "\u{2191}"), ("rarr", "\u{2192}"), ("darr", "\u{2193}"),
            ("harr", "\u{2194}"), ("crarr", "\u{21B5}"), ("lArr", "\u{21D0}"), ("uArr", "\u{21D1}"),
            ("rArr", "\u{21D2}"), ("dArr", "\u{21D3}"), ("hArr", "\u{21D4}"),
            ("forall", "\u{2200}"), ("part", "\u{2202}"), ("exist", "\u{2203}"),
            ("empty", "\u{2205}"), ("nabla", "\u{2207}"), ("isin", "\u{2208}"),
            ("notin", "\u{2209}"), ("ni", "\u{220B}"), ("prod", "\u{220F}"), ("sum", "\u{2211}"),
            ("minus", "\u{2212}"), ("lowast", "\u{2217}"), ("radic", "\u{221A}"),
            ("prop", "\u{221D}"), ("infin", "\u{221E}"), ("ang", "\u{2220}"), ("and", "\u{2227}"),
            ("or", "\u{2228}"), ("cap", "\u{2229}"), ("cup", "\u{222A}"), ("int", "\u{222B}"),
            ("there4", "\u{2234}"), ("sim", "\u{223C}"), ("cong", "\u{2245}"), ("asymp", "\u{2248}"),
            ("ne", "\u{2260}"), ("equiv", "\u{2261}"), ("le", "\u{2264}"), ("ge", "\u{2265}"),
            ("sub", "\u{2282}"), ("sup", "\u{2283}"), ("nsub", "\u{2284}"), ("sube", "\u{2286}"),
            ("supe", "\u{2287}"), ("oplus", "\u{2295}"), ("otimes", "\u{2297}"), ("perp", "\u{22A5}"),
            ("sdot", "\u{22C5}"),
            // Misc technical, box drawing, geometric shapes.
            ("lceil", "\u{2308}"), ("rceil", "\u{2309}"), ("lfloor", "\u{230A}"),
            ("rfloor", "\u{230B}"), ("lang", "\u{27E8}"), ("rang", "\u{27E9}"),
            ("loz", "\u{25CA}"), ("spades", "\u{2660}"), ("clubs", "\u{2663}"),
            ("hearts", "\u{2665}"), ("diams", "\u{2666}"),
            // WHATWG fraction extensions beyond Latin-1's 1/4, 1/2, 3/4.
            ("frac13", "\u{2153}"), ("frac23", "\u{2154}"), ("frac15", "\u{2155}"),
            ("frac25", "\u{2156}"), ("frac35", "\u{2157}"), ("frac45", "\u{2158}"),
            ("frac16", "\u{2159}"), ("frac56", "\u{215A}"), ("frac18", "\u{215B}"),
            ("frac38", "\u{215C}"), ("frac58", "\u{215D}"), ("frac78", "\u{215E}"),
        ]
        .into_iter()
        .collect()
    })
}

fn decode_numeric(bytes: &[u8], offset: usize) -> Option<(char, usize)> {
    if bytes.get(offset) != Some(&b'&') || bytes.get(offset + 1) != Some(&b'#') {
        return None;
    }
    let mut at = offset + 2;
    let hex = matches!(bytes.get(at), Some(b'x') | Some(b'X'));
    if hex {
        at += 1;
    }
    let digits_start = at;
    let is_digit: fn(u8) -> bool = if hex {
        |b| b.is_ascii_hexdigit()
    } else {
        |b| b.is_ascii_digit()
    };
    while bytes.get(at).copied().is_some_and(is_digit) {
        at += 1;
    }
    if at == digits_start {
        return None;
    }
    let digits = std::str::from_utf8(&bytes[digits_start..at]).ok()?;
    let mut code = u32::from_str_radix(digits, if hex { 16 } else { 10 }).ok()?;
    let mut len = at - offset;
    if bytes.get(at) == Some(&b';') {
        len += 1;
    }
    if (0x80..=0x9F).contains(&code) {
        code = CP1252_REPLACEMENTS[(code - 0x80) as usize];
    }
    if code == 0 || code > 0x10FFFF {
        code = 0xFFFD;
    }
    let ch = char::from_u32(code).unwrap_or('\u{FFFD}');
    Some((ch, len))
}

/// Decode named and numeric character references in `input`.
///
/// In [`HtmlContext::Attribute`], a reference that is not terminated by `;`
/// and is immediately followed by an alphanumeric character or `=` is left
/// untouched (the "ambiguous ampersand" carve-out: `&amp=1` must not become
/// `&=1`, per the WHATWG ambiguous-ampersand state).
pub fn decode(ctx: HtmlContext, input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut at = 0usize;

    while at < bytes.len() {
        let Some(amp_rel) = memchr::memchr(b'&', &bytes[at..]) else {
            out.push_str(&input[at..]);
            break;
        };
        let amp_at = at + amp_rel;
        out.push_str(&input[at..amp_at]);

        if let Some((ch, len)) = decode_numeric(bytes, amp_at) {
            out.push(ch);
            at = amp_at + len;
            continue;
        }

        if let Some((replacement, total_len, terminated)) = match_named(bytes, amp_at) {
            if ctx == HtmlContext::Attribute
                && !terminated
                && bytes
                    .get(amp_at + total_len)
                    .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'=')
            {
                out.push('&');
                at = amp_at + 1;
                continue;
            }
            out.push_str(replacement);
            at = amp_at + total_len;
            continue;
        }

        out.push('&');
        at = amp_at + 1;
    }

    out
}

fn match_named(bytes: &[u8], amp_at: usize) -> Option<(&'static str, usize, bool)> {
    let map = named_entities();
    // Longest-match: try progressively shorter alpha runs after '&'.
    let mut end = amp_at + 1;
    while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
    }
    let mut try_end = end;
    while try_end > amp_at + 1 {
        let name = std::str::from_utf8(&bytes[amp_at + 1..try_end]).ok()?;
        if let Some(&replacement) = map.get(name) {
            let terminated = bytes.get(try_end) == Some(&b';');
            let total_len = (try_end - amp_at) + if terminated { 1 } else { 0 };
            return Some((replacement, total_len, terminated));
        }
        try_end -= 1;
    }
    None
}

/// True if `text` contains a `&` that starts a legacy named reference
/// without a trailing semicolon (the ambiguous-ampersand invariant from
/// spec.md §8).
pub fn has_ambiguous_ampersand(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut at = 0;
    while let Some(rel) = memchr::memchr(b'&', &bytes[at..]) {
        let amp_at = at + rel;
        if decode_numeric(bytes, amp_at).is_none() {
            if let Some((_, _, terminated)) = match_named(bytes, amp_at) {
                if !terminated {
                    return true;
                }
            }
        }
        at = amp_at + 1;
    }
    false
}

/// Re-escape a bare `&` that begins a legacy named reference sequence (with
/// or without a trailing `;`) or a numeric character reference, to `&amp;`,
/// so previously-decoded text can be safely re-serialised (spec.md §4.4.3
/// step 5 / §4.4.5 step 6).
pub fn encode_ambiguous_ampersands(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut at = 0usize;
    while at < bytes.len() {
        if bytes[at] != b'&' {
            let next = memchr::memchr(b'&', &bytes[at..])
                .map(|p| at + p)
                .unwrap_or(bytes.len());
            out.push_str(&text[at..next]);
            at = next;
            continue;
        }
        if decode_numeric(bytes, at).is_some() || match_named(bytes, at).is_some() {
            out.push_str("&amp;");
            at += 1;
            continue;
        }
        out.push('&');
        at += 1;
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_refs() {
        assert_eq!(decode(HtmlContext::Text, "a &amp; b"), "a & b");
        assert_eq!(decode(HtmlContext::Text, "&#65;"), "A");
        assert_eq!(decode(HtmlContext::Text, "&#x41;"), "A");
    }

    #[test]
    fn attribute_context_respects_ambiguous_ampersand() {
        // &amp without ';' followed by '=' must not be decoded.
        assert_eq!(decode(HtmlContext::Attribute, "a&amp=1"), "a&amp=1");
        assert_eq!(decode(HtmlContext::Text, "a&amp=1"), "a&=1");
    }

    #[test]
    fn detects_ambiguous_ampersand() {
        assert!(has_ambiguous_ampersand("foo&amp=1"));
        assert!(!has_ambiguous_ampersand("foo&amp;bar"));
    }

    #[test]
    fn encodes_ambiguous_ampersands() {
        assert_eq!(encode_ambiguous_ampersands("a&ampb"), "a&amp;b");
        assert_eq!(encode_ambiguous_ampersands("plain"), "plain");
    }
}
