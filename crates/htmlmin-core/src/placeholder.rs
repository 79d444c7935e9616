//! Fragment Preserver (spec.md §4.2/§6.5): protects `htmlmin:ignore` regions
//! and user-defined custom fragments behind unique placeholders before
//! parsing, and restores them verbatim after emission.

use crate::options::Options;
use rand::Rng;

const IGNORE_MARKER: &str = "<!-- htmlmin:ignore -->";

fn random_uid() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 10] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[derive(Clone, Debug)]
struct CapturedFragment {
    /// Leading/trailing whitespace captured so it can be reinstated with
    /// correct semantics even though the placeholder itself sits on a
    /// tab-delimited boundary.
    leading_ws: String,
    trailing_ws: String,
    body: String,
}

/// Two ordered lists of placeholder captures, alive for one `minify` call.
pub struct PlaceholderTables {
    uid: String,
    ignored_markup_chunks: Vec<String>,
    ignored_custom_markup_chunks: Vec<CapturedFragment>,
}

impl PlaceholderTables {
    pub fn new() -> Self {
        PlaceholderTables {
            uid: random_uid(),
            ignored_markup_chunks: Vec::new(),
            ignored_custom_markup_chunks: Vec::new(),
        }
    }

    fn ignore_placeholder(&self, index: usize) -> String {
        format!("<!--{}{}-->", self.uid, index)
    }

    fn custom_placeholder(&self, index: usize) -> String {
        format!("\t{}{}{}\t", self.uid, index, self.uid)
    }

    /// Replace every `htmlmin:ignore` region and every custom-fragment match
    /// with a unique placeholder. Returns the rewritten source.
    pub fn protect(&mut self, source: &str, options: &Options) -> String {
        let after_ignore = self.protect_ignore_regions(source);
        self.protect_custom_fragments(&after_ignore, options)
    }

    fn protect_ignore_regions(&mut self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut rest = source;
        loop {
            let Some(open_at) = rest.find(IGNORE_MARKER) else {
                out.push_str(rest);
                break;
            };
            let after_open = &rest[open_at + IGNORE_MARKER.len()..];
            let Some(close_at) = after_open.find(IGNORE_MARKER) else {
                // Unterminated marker: leave the rest untouched.
                out.push_str(rest);
                break;
            };
            out.push_str(&rest[..open_at]);
            let body = &after_open[..close_at];
            let index = self.ignored_markup_chunks.len();
            self.ignored_markup_chunks.push(body.to_string());
            out.push_str(&self.ignore_placeholder(index));
            rest = &after_open[close_at + IGNORE_MARKER.len()..];
        }
        out
    }

    fn protect_custom_fragments(&mut self, source: &str, options: &Options) -> String {
        if options.ignore_custom_fragments.is_empty() {
            return source.to_string();
        }

        let mut out = String::with_capacity(source.len());
        let mut rest = source;
        let mut consumed = 0usize;
        'outer: while consumed < source.len() {
            for pair in &options.ignore_custom_fragments {
                if let Some(open_at) = rest.find(pair.open.as_str()) {
                    if let Some(close_rel) = rest[open_at + pair.open.len()..].find(pair.close.as_str()) {
                        let match_start = open_at;
                        let match_end = open_at + pair.open.len() + close_rel + pair.close.len();

                        let before = &rest[..match_start];
                        let leading_ws_len = before.len()
                            - before.trim_end_matches(|c: char| c.is_whitespace()).len();
                        let leading_ws = before[before.len() - leading_ws_len..].to_string();
                        let kept_before = &before[..before.len() - leading_ws_len];

                        let after = &rest[match_end..];
                        let trailing_ws_len =
                            after.len() - after.trim_start_matches(|c: char| c.is_whitespace()).len();
                        let trailing_ws = after[..trailing_ws_len].to_string();

                        out.push_str(kept_before);
                        let index = self.ignored_custom_markup_chunks.len();
                        self.ignored_custom_markup_chunks.push(CapturedFragment {
                            leading_ws,
                            trailing_ws,
                            body: rest[match_start..match_end].to_string(),
                        });
                        out.push_str(&self.custom_placeholder(index));
                        consumed += match_end;
                        rest = &after[trailing_ws_len..];
                        consumed += trailing_ws_len;
                        continue 'outer;
                    }
                }
            }
            out.push_str(rest);
            break;
        }
        out
    }

    /// Restore custom-fragment placeholders, then ignore placeholders.
    pub fn restore(&self, output: &str, options: &Options) -> String {
        let after_custom = self.restore_custom_fragments(output, options);
        self.restore_ignore_regions(&after_custom)
    }

    fn restore_custom_fragments(&self, output: &str, options: &Options) -> String {
        let mut result = output.to_string();
        for (index, fragment) in self.ignored_custom_markup_chunks.iter().enumerate() {
            let placeholder = self.custom_placeholder(index);
            let replacement = if options.trim_custom_fragments {
                fragment.body.clone()
            } else {
                format!("{}{}{}", fragment.leading_ws, fragment.body, fragment.trailing_ws)
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }

    fn restore_ignore_regions(&self, output: &str) -> String {
        let mut result = output.to_string();
        for (index, body) in self.ignored_markup_chunks.iter().enumerate() {
            let placeholder = self.ignore_placeholder(index);
            result = result.replace(&placeholder, body);
        }
        result
    }

    /// Re-expand any placeholder inside `text` back to its captured original
    /// (including surrounding whitespace), for handing to a sub-minifier
    /// that must not see raw UID tokens embedded in otherwise-real content.
    pub fn expand_for_subminify(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (index, fragment) in self.ignored_custom_markup_chunks.iter().enumerate() {
            let placeholder = self.custom_placeholder(index);
            result = result.replace(
                &placeholder,
                &format!("{}{}{}", fragment.leading_ws, fragment.body, fragment.trailing_ws),
            );
        }
        for (index, body) in self.ignored_markup_chunks.iter().enumerate() {
            let placeholder = self.ignore_placeholder(index);
            result = result.replace(&placeholder, body);
        }
        result
    }

    /// Whether `text` contains one of this call's UID placeholders; used to
    /// forbid unquoting an attribute value that still carries a placeholder
    /// (spec.md §4.4.5 step 8).
    pub fn contains_placeholder(&self, text: &str) -> bool {
        text.contains(&self.uid)
    }

    pub fn ignored_comment_placeholder_count(&self) -> usize {
        self.ignored_markup_chunks.len()
    }

    pub fn is_ignore_placeholder_comment(&self, comment_text: &str) -> bool {
        comment_text.starts_with(&self.uid)
    }
}

impl Default for PlaceholderTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ignore_region_round_trips_verbatim() {
        let options = Options::default();
        let mut tables = PlaceholderTables::new();
        let source = "<p>keep</p><!-- htmlmin:ignore --><b>RAW</b><!-- htmlmin:ignore --><p>keep2</p>";
        let protected = tables.protect(source, &options);
        assert!(!protected.contains("RAW"));
        let restored = tables.restore(&protected, &options);
        assert!(restored.contains("<b>RAW</b>"));
    }

    #[test]
    fn custom_fragment_captures_surrounding_whitespace() {
        use crate::options::DelimiterPair;
        let mut options = Options::default();
        options.ignore_custom_fragments.push(DelimiterPair {
            open: "<?php".to_string(),
            close: "?>".to_string(),
        });
        let mut tables = PlaceholderTables::new();
        let source = "a  <?php echo 1; ?>  b";
        let protected = tables.protect(source, &options);
        assert!(!protected.contains("<?php"));
        let restored = tables.restore(&protected, &options);
        assert_eq!(restored, source);
    }
}
