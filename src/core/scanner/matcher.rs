// src/core/scanner/matcher.rs

//! The signature matching engine.
//!
//! A fetched page is turned into a `Document` once, then evaluated against a
//! static, ordered registry. A signature matches as soon as any one of its
//! checks does; later checks of that signature are not evaluated. The same
//! document feeds both registries: technologies and social platforms.

use crate::core::fetch::FetchedPage;
use crate::core::knowledge_base::{
    PlatformRule, Pattern, SOCIAL_PLATFORMS, TECHNOLOGY_RULES, TechnologyRule,
};
use crate::core::models::{DetectedTechnology, SocialProfile};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, SET_COOKIE};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

static RE_PLAIN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}/[^\s<>"']+"#).unwrap());

/// Attributes serialised first, in this order, so meta patterns can rely on
/// `name` appearing before `content`.
const META_ATTR_ORDER: &[&str] = &["name", "property", "http-equiv", "itemprop", "charset", "content"];

/// A `<meta>` element, kept both serialised and as name/content.
#[derive(Debug, Clone)]
pub struct MetaTag {
    pub html: String,
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Everything the signatures look at, extracted from one page.
#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub body: String,
    pub headers: HeaderMap,
    /// `set-cookie` values, lower-cased.
    pub cookies: Vec<String>,
    pub script_sources: Vec<String>,
    pub meta_tags: Vec<MetaTag>,
    /// Absolute URLs from `href`s, plain text and meta `content`, deduplicated
    /// in order of first appearance.
    pub linked_urls: Vec<String>,
}

impl Document {
    pub fn from_page(page: &FetchedPage) -> Self {
        Self::parse(&page.url, page.headers.clone(), &page.body)
    }

    pub fn parse(url: &str, headers: HeaderMap, body: &str) -> Self {
        let html = Html::parse_document(body);

        let mut script_sources = Vec::new();
        if let Ok(selector) = Selector::parse("script[src]") {
            script_sources = html
                .select(&selector)
                .filter_map(|el| el.value().attr("src"))
                .map(str::to_string)
                .collect();
        }

        let mut meta_tags = Vec::new();
        if let Ok(selector) = Selector::parse("meta") {
            meta_tags = html
                .select(&selector)
                .map(|el| {
                    let attrs: Vec<(&str, &str)> = el.value().attrs().collect();
                    MetaTag {
                        html: serialise_meta(&attrs),
                        name: el
                            .value()
                            .attr("name")
                            .or_else(|| el.value().attr("property"))
                            .map(str::to_string),
                        content: el.value().attr("content").map(str::to_string),
                    }
                })
                .collect();
        }

        let mut hrefs = Vec::new();
        if let Ok(selector) = Selector::parse("[href]") {
            hrefs = html
                .select(&selector)
                .filter_map(|el| el.value().attr("href"))
                .map(str::to_string)
                .collect();
        }

        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .collect();

        let mut seen = HashSet::new();
        let mut linked_urls = Vec::new();
        let plain = RE_PLAIN_URL.find_iter(body).map(|m| m.as_str());
        let contents = meta_tags.iter().filter_map(|m: &MetaTag| m.content.as_deref());
        for candidate in hrefs.iter().map(String::as_str).chain(plain).chain(contents) {
            let candidate = candidate.trim();
            if is_absolute_http(candidate) && seen.insert(candidate.to_string()) {
                linked_urls.push(candidate.to_string());
            }
        }

        Self {
            url: url.to_string(),
            body: body.to_string(),
            headers,
            cookies,
            script_sources,
            meta_tags,
            linked_urls,
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// `<meta a="x" b="y">` with a stable attribute order.
fn serialise_meta(attrs: &[(&str, &str)]) -> String {
    let mut ordered: Vec<&(&str, &str)> = attrs.iter().collect();
    ordered.sort_by_key(|(name, _)| {
        let rank = META_ATTR_ORDER.iter().position(|a| a == name).unwrap_or(META_ATTR_ORDER.len());
        (rank, *name)
    });

    let mut out = String::from("<meta");
    for (name, value) in ordered {
        out.push_str(&format!(" {name}=\"{value}\""));
    }
    out.push('>');
    out
}

fn is_absolute_http(value: &str) -> bool {
    let lower = value.get(..8).map(str::to_ascii_lowercase).unwrap_or_default();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// --- Technology signatures ---

/// A compiled `Pattern`.
#[derive(Debug)]
pub enum Check {
    Body(Regex),
    Script(Regex),
    Meta(Regex),
    Header(&'static str),
    HeaderValue(&'static str, Regex),
    Cookie(String),
}

impl Check {
    fn compile(pattern: &Pattern) -> Result<Self, regex::Error> {
        Ok(match *pattern {
            Pattern::Body(re) => Check::Body(Regex::new(re)?),
            Pattern::Script(re) => Check::Script(Regex::new(re)?),
            Pattern::Meta(re) => Check::Meta(Regex::new(re)?),
            Pattern::Header(name) => Check::Header(name),
            Pattern::HeaderValue(name, re) => Check::HeaderValue(name, Regex::new(re)?),
            Pattern::Cookie(needle) => Check::Cookie(needle.to_ascii_lowercase()),
        })
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Check::Body(re) => re.is_match(&doc.body),
            Check::Script(re) => doc.script_sources.iter().any(|src| re.is_match(src)),
            Check::Meta(re) => doc.meta_tags.iter().any(|meta| re.is_match(&meta.html)),
            Check::Header(name) => doc.headers.contains_key(*name),
            Check::HeaderValue(name, re) => doc.header(name).is_some_and(|v| re.is_match(v)),
            Check::Cookie(needle) => doc.cookies.iter().any(|c| c.contains(needle.as_str())),
        }
    }
}

#[derive(Debug)]
pub struct VersionExtractor {
    header: Option<&'static str>,
    html: Option<Regex>,
    meta: Option<&'static str>,
}

impl VersionExtractor {
    /// First version found, trying header, then HTML, then meta.
    pub fn extract(&self, name: &str, doc: &Document) -> Option<String> {
        let from_header = || {
            let value = doc.header(self.header?)?;
            let (product, rest) = value.split_once('/')?;
            // `server: cloudflare` or a proxy's banner must not pass as a version.
            if !product.trim().eq_ignore_ascii_case(name) {
                return None;
            }
            rest.split_whitespace().next().map(str::to_string)
        };
        let from_html = || {
            let caps = self.html.as_ref()?.captures(&doc.body)?;
            caps.get(1).map(|m| m.as_str().to_string())
        };
        let from_meta = || {
            let wanted = self.meta?;
            doc.meta_tags
                .iter()
                .find(|m| m.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(wanted)))
                .and_then(|m| m.content.clone())
        };

        from_header()
            .or_else(from_html)
            .or_else(from_meta)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// A compiled `TechnologyRule`.
#[derive(Debug)]
pub struct TechnologySignature {
    pub name: &'static str,
    pub category: &'static str,
    pub checks: Vec<Check>,
    pub version: VersionExtractor,
}

impl TechnologySignature {
    pub fn compile(rule: &TechnologyRule) -> Result<Self, regex::Error> {
        Ok(Self {
            name: rule.name,
            category: rule.category,
            checks: rule.patterns.iter().map(Check::compile).collect::<Result<_, _>>()?,
            version: VersionExtractor {
                header: rule.version.header,
                html: rule.version.html.map(Regex::new).transpose()?,
                meta: rule.version.meta,
            },
        })
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.checks.iter().any(|check| check.matches(doc))
    }
}

/// The technology registry, compiled on first use and shared by every scan.
pub static TECHNOLOGY_SIGNATURES: Lazy<Vec<TechnologySignature>> = Lazy::new(|| {
    TECHNOLOGY_RULES
        .iter()
        .map(|rule| TechnologySignature::compile(rule).expect("built-in technology pattern must compile"))
        .collect()
});

/// Evaluates `signatures` in order. A name is reported once: the first
/// signature with that name to match wins.
pub fn detect_technologies(signatures: &[TechnologySignature], doc: &Document) -> Vec<DetectedTechnology> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for signature in signatures {
        if seen.contains(signature.name) || !signature.matches(doc) {
            continue;
        }
        let version = signature.version.extract(signature.name, doc);
        debug!(tech = signature.name, version = ?version, url = %doc.url, "Signature matched.");
        seen.insert(signature.name);
        found.push(DetectedTechnology {
            name: signature.name.to_string(),
            category: signature.category.to_string(),
            version,
        });
    }

    found
}

// --- Social platform signatures ---

/// The username that follows `prefix` in `path`, or `"profile"`.
fn username_after(path: &str, prefix: &str) -> String {
    path.strip_prefix(prefix)
        .and_then(|rest| rest.split('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("profile")
        .to_string()
}

/// Checks one URL against one platform; first matching pattern wins.
fn match_platform(rule: &PlatformRule, url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let path = url.path().to_ascii_lowercase();

    rule.patterns.iter().find_map(|(pattern_host, prefix)| {
        let host_matches = host == *pattern_host || host.ends_with(&format!(".{pattern_host}"));
        (host_matches && path.starts_with(prefix)).then(|| username_after(&path, prefix))
    })
}

/// Social profiles linked from `doc`, deduplicated by (platform, url, username).
pub fn extract_social_profiles(platforms: &[PlatformRule], doc: &Document) -> Vec<SocialProfile> {
    let mut seen = HashSet::new();
    let mut profiles = Vec::new();

    for raw in &doc.linked_urls {
        let clean = raw.trim().to_ascii_lowercase();
        let Ok(url) = Url::parse(&clean) else {
            continue;
        };
        for rule in platforms {
            if let Some(username) = match_platform(rule, &url) {
                let profile = SocialProfile {
                    platform: rule.platform.to_string(),
                    url: clean.clone(),
                    username,
                };
                if seen.insert(profile.clone()) {
                    profiles.push(profile);
                }
            }
        }
    }

    profiles
}

/// `extract_social_profiles` over the built-in platform list.
pub fn social_profiles(doc: &Document) -> Vec<SocialProfile> {
    extract_social_profiles(SOCIAL_PLATFORMS, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::VersionHint;
    use reqwest::header::HeaderValue;

    fn doc(body: &str, headers: &[(&'static str, &str)]) -> Document {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        Document::parse("https://example.com", map, body)
    }

    fn names(found: &[DetectedTechnology]) -> Vec<&str> {
        found.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn built_in_registry_compiles() {
        assert_eq!(TECHNOLOGY_SIGNATURES.len(), TECHNOLOGY_RULES.len());
    }

    #[test]
    fn wordpress_and_nginx_with_version() {
        let d = doc(
            r#"<html><head><link rel="stylesheet" href="/wp-content/themes/x/style.css"></head></html>"#,
            &[("server", "nginx/1.18.0")],
        );
        let found = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);

        let wordpress = found.iter().find(|t| t.name == "WordPress").unwrap();
        assert_eq!(wordpress.category, "CMS");
        let nginx = found.iter().find(|t| t.name == "nginx").unwrap();
        assert_eq!(nginx.version.as_deref(), Some("1.18.0"));
        assert!(!names(&found).contains(&"Apache"));
    }

    #[test]
    fn duplicate_names_are_reported_once_first_match_wins() {
        const FIRST: &[Pattern] = &[Pattern::Body("alpha")];
        const SECOND: &[Pattern] = &[Pattern::Body("beta")];
        let rules = [
            TechnologyRule { name: "Dup", category: "First", patterns: FIRST, version: VersionHint::default() },
            TechnologyRule { name: "Dup", category: "Second", patterns: SECOND, version: VersionHint::default() },
        ];
        let signatures: Vec<_> = rules.iter().map(|r| TechnologySignature::compile(r).unwrap()).collect();

        let found = detect_technologies(&signatures, &doc("alpha beta", &[]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "First");
    }

    #[test]
    fn header_cookie_script_and_meta_checks() {
        let d = doc(
            r#"<html><head>
                <meta name="generator" content="Joomla! - Open Source Content Management">
                <script src="https://js.stripe.com/v3/"></script>
            </head></html>"#,
            &[("cf-ray", "8a1b2c3d4e5f-AMS"), ("set-cookie", "PHPSESSID=abc; path=/")],
        );
        let found = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);
        let found = names(&found);

        for expected in ["Joomla", "Stripe", "Cloudflare", "PHP"] {
            assert!(found.contains(&expected), "{expected} missing from {found:?}");
        }
    }

    #[test]
    fn version_sources_follow_priority() {
        let d = doc(
            r#"<meta name="generator" content="WordPress 6.4.2"><p>wp-content</p>"#,
            &[("x-powered-by", "PHP/8.1.2 (cli)")],
        );
        let found = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);

        let php = found.iter().find(|t| t.name == "PHP").unwrap();
        assert_eq!(php.version.as_deref(), Some("8.1.2"));
        let wp = found.iter().find(|t| t.name == "WordPress").unwrap();
        assert_eq!(wp.version.as_deref(), Some("6.4.2"));
    }

    #[test]
    fn header_version_requires_matching_product() {
        let d = doc("", &[("server", "cloudflare"), ("x-nginx-cache", "HIT")]);
        let found = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);

        let nginx = found.iter().find(|t| t.name == "nginx").unwrap();
        assert_eq!(nginx.version, None);
        let cf = found.iter().find(|t| t.name == "Cloudflare").unwrap();
        assert_eq!(cf.version, None);
    }

    #[test]
    fn detection_is_idempotent() {
        let d = doc(r#"<script src="/_next/static/chunks/main.js"></script>"#, &[("server", "Apache/2.4.57")]);
        let first = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);
        let second = detect_technologies(&TECHNOLOGY_SIGNATURES, &d);
        assert_eq!(first, second);
        assert!(names(&first).contains(&"Next.js"));
    }

    #[test]
    fn social_links_from_hrefs_text_and_meta() {
        let d = doc(
            r#"<html><head>
                <meta property="og:see_also" content="https://www.instagram.com/Acme/">
            </head><body>
                <a href="https://www.linkedin.com/company/acme-corp/about">LinkedIn</a>
                <a href="https://twitter.com/">Twitter</a>
                <a href="/relative/path">skip</a>
                <p>Watch us at https://www.youtube.com/@acmevideos today</p>
                <a href="https://www.netflix.com/title/1">not twitter</a>
            </body></html>"#,
            &[],
        );
        let profiles = social_profiles(&d);

        let find = |platform: &str| profiles.iter().find(|p| p.platform == platform).unwrap();
        assert_eq!(find("LinkedIn").username, "acme-corp");
        assert_eq!(find("LinkedIn").url, "https://www.linkedin.com/company/acme-corp/about");
        assert_eq!(find("Twitter").username, "profile");
        assert_eq!(find("Instagram").username, "acme");
        assert_eq!(find("YouTube").username, "acmevideos");
        assert_eq!(profiles.len(), 4);
    }

    #[test]
    fn repeated_links_are_deduplicated() {
        let d = doc(
            r#"<a href="https://facebook.com/acme">a</a> <a href="https://FACEBOOK.com/acme">b</a>
               https://facebook.com/acme"#,
            &[],
        );
        let profiles = social_profiles(&d);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].username, "acme");
    }
}
