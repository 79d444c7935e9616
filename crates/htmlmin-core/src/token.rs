//! Token and attribute records produced by the [`crate::parser::Parser`].
//!
//! Tokens are not retained; they flow straight from the parser into the
//! transformation driver, mirroring spec.md §3's "Tokens are not stored;
//! they flow through callbacks" invariant via a pull iterator instead.

/// Original quote delimiter an attribute value used in the source, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    None,
}

/// One attribute as encountered in a start tag, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Absent for boolean/valueless attributes (e.g. `<input disabled>`).
    pub value: Option<String>,
    pub quote: Quote,
    /// Non-standard syntax captured by a user `customAttrAssign` regex pair,
    /// e.g. `{{value}}` template assignment forms.
    pub custom_assign: Option<String>,
    pub custom_open: Option<String>,
    pub custom_close: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>, quote: Quote) -> Self {
        Attribute {
            name: name.into(),
            value,
            quote,
            custom_assign: None,
            custom_open: None,
            custom_close: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub self_closing: bool,
    pub had_trailing_slash: bool,
    pub auto_generated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub auto_generated: bool,
}

/// Neighbouring-tag context carried alongside a text node, used by the
/// whitespace collapse algorithm (spec.md §4.4.6). `None` means a document
/// boundary; `Some("/tag")` denotes an end tag; the literal `"comment"`
/// denotes an adjacent comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagContext {
    pub prev_tag: Option<String>,
    pub next_tag: Option<String>,
    pub prev_attrs: Vec<Attribute>,
    pub next_attrs: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Start(StartTag),
    End(EndTag),
    Chars { text: String, ctx: TagContext },
    Comment { text: String, non_standard: bool },
    Doctype { text: String },
}
