//! Sort Analyser (spec.md §4.3): a two-pass frequency counter that produces
//! attribute-order and class-order comparators from how tokens actually
//! co-occur in the document, rather than a fixed alphabetical order.

use crate::options::Options;
use crate::parser::Parser;
use crate::token::{Attribute, Token};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// A total order derived from a token chain: tokens that more frequently
/// precede other tokens sort first; ties break by first appearance in the
/// document (spec.md §4.3/§9).
#[derive(Clone, Debug, Default)]
pub struct TokenOrder {
    /// net precedence score, higher sorts first
    score: FxHashMap<String, i64>,
    first_seen: FxHashMap<String, usize>,
}

impl TokenOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let sa = self.score.get(a).copied().unwrap_or(0);
        let sb = self.score.get(b).copied().unwrap_or(0);
        sb.cmp(&sa).then_with(|| {
            let fa = self.first_seen.get(a).copied().unwrap_or(usize::MAX);
            let fb = self.first_seen.get(b).copied().unwrap_or(usize::MAX);
            fa.cmp(&fb)
        })
    }
}

/// Increment the precedence edge count for every ordered pair within a bag,
/// then derive a net score for each token.
fn build_order(bags: &[Vec<String>]) -> TokenOrder {
    let mut edges: FxHashMap<(String, String), i64> = FxHashMap::default();
    let mut first_seen: FxHashMap<String, usize> = FxHashMap::default();
    let mut seq = 0usize;

    for bag in bags {
        for tok in bag {
            first_seen.entry(tok.clone()).or_insert_with(|| {
                seq += 1;
                seq
            });
        }
        for i in 0..bag.len() {
            for j in (i + 1)..bag.len() {
                if bag[i] == bag[j] {
                    continue;
                }
                *edges.entry((bag[i].clone(), bag[j].clone())).or_insert(0) += 1;
            }
        }
    }

    let mut score: FxHashMap<String, i64> = FxHashMap::default();
    for ((a, b), count) in &edges {
        *score.entry(a.clone()).or_insert(0) += count;
        *score.entry(b.clone()).or_insert(0) -= count;
    }

    TokenOrder { score, first_seen }
}

/// Result of one preliminary analysis pass, installed as the comparators
/// for the real minification pass.
pub struct SortAnalysis {
    per_tag_attr_order: FxHashMap<String, TokenOrder>,
    class_order: TokenOrder,
}

impl SortAnalysis {
    /// Mutates `attrs` in place into the learned order for `tag`. Attributes
    /// not seen during analysis keep their relative order at the end.
    pub fn sort_attributes(&self, tag: &str, attrs: &mut [Attribute]) {
        let Some(order) = self.per_tag_attr_order.get(tag) else {
            return;
        };
        attrs.sort_by(|a, b| order.compare(&a.name, &b.name));
    }

    pub fn sort_class_name(&self, value: &str) -> String {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let mut tokens: Vec<&str> = tokens;
        tokens.sort_by(|a, b| self.class_order.compare(a, b));
        tokens.join(" ")
    }
}

fn is_uid_like(name: &str) -> bool {
    name.len() > 16 && name.chars().all(|c| c.is_ascii_hexdigit())
}

/// Run a preliminary parse-only pass (no transformation) over `source` and
/// collect attribute-name bags per tag and class-token bags, per spec.md
/// §4.3. Aggressive options are deliberately not consulted here: the pass
/// only needs tag/attribute structure, not the minified text.
pub fn analyze(source: &str, options: &Options) -> SortAnalysis {
    let mut parser = Parser::new(source, options.partial_markup, true, options.html5);
    let mut attr_bags: FxHashMap<String, Vec<Vec<String>>> = FxHashMap::default();
    let mut class_bags: Vec<Vec<String>> = Vec::new();

    while let Ok(Some(tok)) = parser.next_token() {
        if let Token::Start(start) = tok {
            let lower = start.name.to_ascii_lowercase();
            let names: Vec<String> = start
                .attrs
                .iter()
                .map(|a| a.name.to_ascii_lowercase())
                .filter(|n| !is_uid_like(n))
                .collect();
            attr_bags.entry(lower).or_default().push(names);

            if let Some(class_attr) = start.attrs.iter().find(|a| a.name.eq_ignore_ascii_case("class")) {
                if let Some(value) = &class_attr.value {
                    let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                    class_bags.push(classes);
                }
            }
        }
    }

    let per_tag_attr_order = attr_bags
        .into_iter()
        .map(|(tag, bags)| (tag, build_order(&bags)))
        .collect();

    SortAnalysis {
        per_tag_attr_order,
        class_order: build_order(&class_bags),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frequently_leading_attribute_sorts_first() {
        let source = r#"<a id="1" class="x"></a><a id="2" class="y"></a><a class="z" id="3"></a>"#;
        let options = Options::default();
        let analysis = analyze(source, &options);
        let mut attrs = vec![
            Attribute::new("class", Some("foo".into()), crate::token::Quote::Double),
            Attribute::new("id", Some("bar".into()), crate::token::Quote::Double),
        ];
        analysis.sort_attributes("a", &mut attrs);
        assert_eq!(attrs[0].name, "id");
    }

    #[test]
    fn class_order_learned_from_document() {
        let source = r#"<div class="b a"></div><div class="b a"></div>"#;
        let options = Options::default();
        let analysis = analyze(source, &options);
        assert_eq!(analysis.sort_class_name("a b"), "b a");
    }
}
