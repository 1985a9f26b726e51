//! Retail domain allow-list and product-page patterns.
//!
//! One declarative table maps each allowed retailer to the path regex that
//! distinguishes an item detail page from a home or category page. Everything
//! else in the crate asks this module; nothing else hardcodes a domain.
//!
//! Patterns are matched against the path plus query string. They track each
//! retailer's current URL scheme and need updating when a scheme changes.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::error::{FinderError, Result};

/// One allow-listed retailer.
#[derive(Debug, Clone, Copy)]
pub struct DomainPattern {
    /// Registrable domain; subdomains match too
    pub domain: &'static str,
    /// Product-page regex over `path?query`
    pub pattern: &'static str,
    /// Storefront used as a last-resort placeholder
    pub homepage: &'static str,
    /// Placeholder display name
    pub label: &'static str,
}

/// Built-in retailer table.
pub const RETAIL_PATTERNS: &[DomainPattern] = &[
    DomainPattern {
        domain: "zara.com",
        pattern: r"(?i)^/[a-z]{2}/[a-z]{2}/[^/]+-p\d{5,}\.html",
        homepage: "https://www.zara.com/",
        label: "Zara",
    },
    DomainPattern {
        domain: "hm.com",
        pattern: r"(?i)/productpage\.\d{7,}\.html",
        homepage: "https://www2.hm.com/",
        label: "H&M",
    },
    DomainPattern {
        domain: "asos.com",
        pattern: r"(?i)/prd/\d{5,}",
        homepage: "https://www.asos.com/",
        label: "ASOS",
    },
    DomainPattern {
        domain: "uniqlo.com",
        pattern: r"(?i)/products/e?\d{6}(?:-\d{3})?",
        homepage: "https://www.uniqlo.com/",
        label: "Uniqlo",
    },
    DomainPattern {
        domain: "mango.com",
        pattern: r"(?i)(?:/p/.+_\d{8}|_\d{8}\.html)",
        homepage: "https://shop.mango.com/",
        label: "Mango",
    },
    DomainPattern {
        domain: "nike.com",
        pattern: r"^/(?:[a-z]{2}/)?t/[^/]+/[A-Z0-9]{6}-\d{3}",
        homepage: "https://www.nike.com/",
        label: "Nike",
    },
    DomainPattern {
        domain: "adidas.com",
        pattern: r"/[^/]+/[A-Z]{1,2}\d{4,5}\.html",
        homepage: "https://www.adidas.com/",
        label: "adidas",
    },
    DomainPattern {
        domain: "pullandbear.com",
        pattern: r"(?i)-l\d{8}",
        homepage: "https://www.pullandbear.com/",
        label: "Pull&Bear",
    },
    DomainPattern {
        domain: "bershka.com",
        pattern: r"(?i)-c\d+p\d+\.html",
        homepage: "https://www.bershka.com/",
        label: "Bershka",
    },
    DomainPattern {
        domain: "massimodutti.com",
        pattern: r"(?i)-l\d{8}",
        homepage: "https://www.massimodutti.com/",
        label: "Massimo Dutti",
    },
    DomainPattern {
        domain: "cos.com",
        pattern: r"(?i)/product\.[^/]+\.\d{7,}\.html",
        homepage: "https://www.cos.com/",
        label: "COS",
    },
    DomainPattern {
        domain: "answear.ua",
        pattern: r"(?i)^/p/[^/]+-\d{5,}",
        homepage: "https://answear.ua/",
        label: "Answear",
    },
    DomainPattern {
        domain: "rozetka.com.ua",
        pattern: r"(?i)/p\d{6,}/?",
        homepage: "https://rozetka.com.ua/",
        label: "Rozetka",
    },
];

/// Generic hints used by the loose policy.
const PRODUCT_KEYWORDS: &[&str] = &["product", "item", "/p/", "/prd/", "id="];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".avif"];

/// How strictly product-likeness is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Allow-listed host and the domain's own product regex
    Strict,
    /// Allow-listed host and the regex, a product keyword, or ≥ 2 path segments
    Loose,
}

/// A compiled table entry.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub domain: String,
    pub homepage: String,
    pub label: String,
    regex: Regex,
}

impl CompiledPattern {
    fn host_matches(&self, host: &str) -> bool {
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// Compiled allow-list with product-page matching.
#[derive(Debug, Clone)]
pub struct ProductPatterns {
    entries: Vec<CompiledPattern>,
}

lazy_static! {
    static ref BUILTIN: ProductPatterns = ProductPatterns::from_table(RETAIL_PATTERNS).unwrap();
}

impl ProductPatterns {
    /// Compile a table. Fails on the first bad regex.
    pub fn from_table(table: &[DomainPattern]) -> Result<Self> {
        let entries = table
            .iter()
            .map(|p| {
                Regex::new(p.pattern)
                    .map(|regex| CompiledPattern {
                        domain: p.domain.to_lowercase(),
                        homepage: p.homepage.to_string(),
                        label: p.label.to_string(),
                        regex,
                    })
                    .map_err(|source| FinderError::Pattern {
                        domain: p.domain.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// The built-in retailer table.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Keep only the given domains (unknown names are ignored).
    pub fn restricted_to(mut self, domains: &[String]) -> Self {
        let wanted: Vec<String> = domains
            .iter()
            .map(|d| d.trim().trim_start_matches("www.").to_lowercase())
            .collect();
        self.entries.retain(|e| wanted.contains(&e.domain));
        self
    }

    /// Allow-listed domains in table order.
    pub fn domains(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.domain.clone()).collect()
    }

    pub fn entries(&self) -> &[CompiledPattern] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table entry owning this URL's host.
    pub fn entry_for(&self, url: &Url) -> Option<&CompiledPattern> {
        let host = url.host_str()?.to_lowercase();
        self.entries.iter().find(|e| e.host_matches(&host))
    }

    pub fn is_allowed(&self, url: &Url) -> bool {
        self.entry_for(url).is_some()
    }

    /// Whether `url` looks like an item detail page under `policy`.
    pub fn is_product(&self, url: &Url, policy: MatchPolicy) -> bool {
        if !matches!(url.scheme(), "http" | "https") || is_image_path(url.path()) {
            return false;
        }

        let Some(entry) = self.entry_for(url) else {
            return false;
        };

        let target = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };

        if entry.regex.is_match(&target) {
            return true;
        }

        match policy {
            MatchPolicy::Strict => false,
            MatchPolicy::Loose => looks_like_product(&target),
        }
    }
}

impl Default for ProductPatterns {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Generic "is this a detail page" heuristic used by the loose policy.
fn looks_like_product(path_and_query: &str) -> bool {
    let lower = path_and_query.to_lowercase();
    if PRODUCT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }

    let path = lower.split('?').next().unwrap_or("");
    path.split('/').filter(|s| !s.is_empty()).count() >= 2
}

/// Whether a path names an image file.
pub fn is_image_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_builtin_table_compiles() {
        let patterns = ProductPatterns::builtin();
        assert_eq!(patterns.entries().len(), RETAIL_PATTERNS.len());
    }

    #[test]
    fn test_zara_home_rejected_item_accepted() {
        let patterns = ProductPatterns::builtin();
        assert!(!patterns.is_product(&url("https://www.zara.com/"), MatchPolicy::Strict));
        assert!(patterns.is_product(
            &url("https://www.zara.com/us/en/item-p012345.html"),
            MatchPolicy::Strict
        ));
    }

    #[test]
    fn test_category_pages_rejected() {
        let patterns = ProductPatterns::builtin();
        for u in [
            "https://www.zara.com/us/en/man-shirts-l737.html",
            "https://www2.hm.com/en_us/men/products/shirts.html",
            "https://www.asos.com/men/",
            "https://www.uniqlo.com/us/en/men/tops",
        ] {
            assert!(!patterns.is_product(&url(u), MatchPolicy::Strict), "{}", u);
        }
    }

    #[test]
    fn test_known_product_urls_accepted() {
        let patterns = ProductPatterns::builtin();
        for u in [
            "https://www2.hm.com/en_us/productpage.1227367001.html",
            "https://www.asos.com/asos-design/asos-design-linen-shirt/prd/204567890",
            "https://www.uniqlo.com/us/en/products/E465185-000/00",
            "https://www.nike.com/t/air-force-1-07-mens-shoes-jBrhbr/CW2288-111",
            "https://www.adidas.com/us/samba-og-shoes/B75806.html",
            "https://rozetka.com.ua/ua/some-shirt/p123456789/",
        ] {
            assert!(patterns.is_product(&url(u), MatchPolicy::Strict), "{}", u);
        }
    }

    #[test]
    fn test_unlisted_domain_rejected_under_both_policies() {
        let patterns = ProductPatterns::builtin();
        let u = url("https://shop.example.com/product/123");
        assert!(!patterns.is_product(&u, MatchPolicy::Strict));
        assert!(!patterns.is_product(&u, MatchPolicy::Loose));
    }

    #[test]
    fn test_lookalike_host_is_not_subdomain() {
        let patterns = ProductPatterns::builtin();
        assert!(!patterns.is_allowed(&url("https://notzara.com/us/en/item-p012345.html")));
        assert!(patterns.is_allowed(&url("https://static.zara.com/x")));
    }

    #[test]
    fn test_loose_policy_accepts_generic_shapes() {
        let patterns = ProductPatterns::builtin();
        let keyword = url("https://www.zara.com/product?id=42");
        let segments = url("https://www.asos.com/women/dresses");
        let home = url("https://www.asos.com/");

        assert!(!patterns.is_product(&keyword, MatchPolicy::Strict));
        assert!(patterns.is_product(&keyword, MatchPolicy::Loose));
        assert!(patterns.is_product(&segments, MatchPolicy::Loose));
        assert!(!patterns.is_product(&home, MatchPolicy::Loose));
    }

    #[test]
    fn test_images_never_products() {
        let patterns = ProductPatterns::builtin();
        let img = url("https://static.zara.com/photos/us/en/item-p012345.jpg");
        assert!(!patterns.is_product(&img, MatchPolicy::Loose));
        assert!(is_image_path("/a/B.JPEG"));
        assert!(!is_image_path("/a/b.html"));
    }

    #[test]
    fn test_restricted_to() {
        let patterns =
            ProductPatterns::builtin().restricted_to(&["www.Zara.com".to_string(), "nope.io".to_string()]);
        assert_eq!(patterns.domains(), vec!["zara.com".to_string()]);
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let table = [DomainPattern {
            domain: "bad.com",
            pattern: "(",
            homepage: "https://bad.com/",
            label: "Bad",
        }];
        assert!(matches!(
            ProductPatterns::from_table(&table),
            Err(FinderError::Pattern { .. })
        ));
    }
}
