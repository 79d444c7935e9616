//! Sub-minifier facade (spec.md §4/§5/§6.3): wraps the caller-supplied
//! CSS/JS/URL callbacks with an LRU cache and placeholder-safe rewriting.
//!
//! Grounded on the teacher's external-boundary style (the PHP extension and
//! wasm crates wrap `TagProcessor`/`HtmlProcessor` behind a narrow surface
//! without inspecting internals); the cache itself has no teacher
//! counterpart and is an ambient addition per spec.md §5.

use lru::LruCache;
use rustc_hash::FxHasher;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::rc::Rc;

use crate::error::CoreError;
use crate::options::SubMinifyFn;
use crate::placeholder::PlaceholderTables;

const DEFAULT_CACHE_CAPACITY: usize = 500;

fn fingerprint(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.len().hash(&mut hasher);
    if text.len() > 100 {
        text.as_bytes()[..50].hash(&mut hasher);
        text.as_bytes()[text.len() - 50..].hash(&mut hasher);
    } else {
        text.hash(&mut hasher);
    }
    hasher.finish()
}

/// Which sub-minifier a cache entry belongs to, folded into the key so one
/// cache can serve CSS, JS, and URL calls without collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Kind {
    Css,
    Js,
    Url,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: Kind,
    fingerprint: u64,
    context_hint: Option<String>,
}

/// Process-lifetime, bounded-size, content-addressed cache plus the caller's
/// callbacks. Constructed once per embedding application and threaded
/// through recursive `minify` calls, per spec.md §9's "parameterise the
/// core to accept caches rather than hard-wiring them".
pub struct SubMinifierFacade {
    css: Option<SubMinifyFn>,
    js: Option<SubMinifyFn>,
    url: Option<SubMinifyFn>,
    cache: RefCell<LruCache<CacheKey, Result<Rc<str>, String>>>,
}

impl SubMinifierFacade {
    pub fn new(css: Option<SubMinifyFn>, js: Option<SubMinifyFn>, url: Option<SubMinifyFn>) -> Self {
        SubMinifierFacade {
            css,
            js,
            url,
            cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap(),
            )),
        }
    }

    pub fn has_css(&self) -> bool {
        self.css.is_some()
    }
    pub fn has_js(&self) -> bool {
        self.js.is_some()
    }
    pub fn has_url(&self) -> bool {
        self.url.is_some()
    }

    pub fn css(&self, text: &str, hint: Option<&str>, placeholders: &PlaceholderTables) -> Result<String, CoreError> {
        self.call(Kind::Css, self.css.clone(), text, hint, placeholders)
    }
    pub fn js(&self, text: &str, hint: Option<&str>, placeholders: &PlaceholderTables) -> Result<String, CoreError> {
        self.call(Kind::Js, self.js.clone(), text, hint, placeholders)
    }
    pub fn url(&self, text: &str, hint: Option<&str>, placeholders: &PlaceholderTables) -> Result<String, CoreError> {
        self.call(Kind::Url, self.url.clone(), text, hint, placeholders)
    }

    fn call(
        &self,
        kind: Kind,
        f: Option<SubMinifyFn>,
        text: &str,
        hint: Option<&str>,
        placeholders: &PlaceholderTables,
    ) -> Result<String, CoreError> {
        let Some(f) = f else {
            return Ok(text.to_string());
        };

        let key = CacheKey {
            kind,
            fingerprint: fingerprint(text),
            context_hint: hint.map(str::to_string),
        };

        if let Some(cached) = self.cache.borrow_mut().get(&key) {
            return match cached {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(CoreError::Minify {
                    context: format!("{kind:?}"),
                    cause: e.clone(),
                }),
            };
        }

        // Placeholder-safe rewriting: expand any UID token back to its
        // captured original before handing text to the external minifier.
        let expanded = placeholders.expand_for_subminify(text);

        let result = f(&expanded, hint);
        let stored = match &result {
            Ok(s) => Ok(Rc::from(s.as_str())),
            Err(e) => Err(e.to_string()),
        };
        self.cache.borrow_mut().put(key, stored);
        result
    }
}

impl Default for SubMinifierFacade {
    fn default() -> Self {
        SubMinifierFacade::new(None, None, None)
    }
}

/// CSS fallback heuristic (spec.md §4.6/§9): if the input looked
/// template-ish (`{{`, `{%`, or `<%`) and the minified output collapsed to
/// something suspiciously shorter than that, prefer the original text. This
/// is a string-based heuristic inherited from the original tool and is
/// deliberately not "fixed" here.
pub fn css_result_or_fallback(original: &str, minified: &str) -> String {
    let looks_templated = ["{{", "{%", "<%"].iter().any(|m| original.contains(m));
    if looks_templated && minified.len() * 2 < original.len() {
        original.to_string()
    } else {
        minified.to_string()
    }
}
