//! Static, read-only signature data.
//!
//! Technology rules, social platform patterns and the known-profile override
//! table all live here as plain data. `matcher` compiles the rules once at
//! first use; nothing here is mutated after start-up.

use crate::core::models::SocialProfile;

/// One way a technology can reveal itself. All regexes use `regex` syntax.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Regex over the raw HTML body.
    Body(&'static str),
    /// Regex over each `<script src>` value.
    Script(&'static str),
    /// Regex over each serialised `<meta>` tag.
    Meta(&'static str),
    /// The response carries this header, whatever its value.
    Header(&'static str),
    /// Regex over the value of this response header.
    HeaderValue(&'static str, &'static str),
    /// Case-insensitive substring of a `set-cookie` value.
    Cookie(&'static str),
}

/// Where a technology's version can be read from. Sources are tried in the
/// order header, HTML, meta.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionHint {
    /// Header whose `product/version` value names this technology.
    pub header: Option<&'static str>,
    /// Regex over the HTML whose first group is the version.
    pub html: Option<&'static str>,
    /// `<meta name=...>` whose content is the version.
    pub meta: Option<&'static str>,
}

impl VersionHint {
    const NONE: VersionHint = VersionHint { header: None, html: None, meta: None };

    const fn header(name: &'static str) -> Self {
        VersionHint { header: Some(name), html: None, meta: None }
    }

    const fn html(re: &'static str) -> Self {
        VersionHint { header: None, html: Some(re), meta: None }
    }
}

/// A named technology and every pattern that identifies it.
#[derive(Debug, Clone, Copy)]
pub struct TechnologyRule {
    pub name: &'static str,
    pub category: &'static str,
    pub patterns: &'static [Pattern],
    pub version: VersionHint,
}

use Pattern::{Body, Cookie, Header, HeaderValue, Meta, Script};

/// The master list of technology rules, in evaluation order.
pub static TECHNOLOGY_RULES: &[TechnologyRule] = &[
    // --- JavaScript Frameworks ---
    TechnologyRule {
        name: "React",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"react\.development\.js"),
            Body(r"react\.production\.min\.js"),
            Body(r"react-dom"),
            Body(r"data-reactroot"),
            Script(r"react@[\d.]+/dist"),
            Script(r"react-dom@"),
            Meta(r"<meta[^>]*\bdata-react"),
        ],
        version: VersionHint::html(r"react@([\d.]+)"),
    },
    TechnologyRule {
        name: "Vue.js",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"vue\.js"),
            Body(r"vue\.min\.js"),
            Body(r"__vue__|data-v-app"),
            Script(r"vue@[\d.]+"),
            Script(r"vue-router"),
            Script(r"vuex"),
        ],
        version: VersionHint::html(r"vue@([\d.]+)"),
    },
    TechnologyRule {
        name: "Angular",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"angular\.js"),
            Body(r"angular\.min\.js"),
            Body(r"ng-app|ng-controller"),
            Body(r#"ng-version="[\d.]+""#),
            Script(r"angular@[\d.]+"),
            Script(r"@angular/core"),
        ],
        version: VersionHint {
            header: None,
            html: Some(r#"ng-version="([\d.]+)""#),
            meta: None,
        },
    },
    TechnologyRule {
        name: "Svelte",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"__SVELTE__"),
            Body(r#"class=["'][^"']*svelte-"#),
            Script(r"svelte@[\d.]+"),
            Script(r"svelte/internal"),
        ],
        version: VersionHint::html(r"svelte@([\d.]+)"),
    },
    TechnologyRule {
        name: "Next.js",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"__NEXT_DATA__"),
            Body(r"_next/static"),
            Script(r"next/dist/"),
            Script(r"_buildManifest\.js"),
            Meta(r"<meta[^>]*next-head"),
            HeaderValue("x-powered-by", r"Next\.js"),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Nuxt.js",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"__NUXT__"),
            Body(r"_nuxt/"),
            Body(r"nuxt-link"),
            Script(r"nuxt\.js"),
            Script(r"_nuxt/runtime\."),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Remix",
        category: "JavaScript Framework",
        patterns: &[Body(r"data-remix-run|remix-run"), Script(r"@remix-run/")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Astro",
        category: "JavaScript Framework",
        patterns: &[
            Body(r"astro-island|astro-static"),
            Script(r"@astrojs/"),
            Meta(r#"<meta[^>]*"generator"[^>]*Astro"#),
        ],
        version: VersionHint {
            header: None,
            html: Some(r"Astro v([\d.]+)"),
            meta: None,
        },
    },
    TechnologyRule {
        name: "Gatsby",
        category: "JavaScript Framework",
        patterns: &[Body(r#"id=["']___gatsby["']"#), Meta(r#"<meta[^>]*"generator"[^>]*Gatsby"#)],
        version: VersionHint::html(r"Gatsby ([\d.]+)"),
    },
    TechnologyRule {
        name: "SolidJS",
        category: "JavaScript Framework",
        patterns: &[Body(r"data-hk=")],
        version: VersionHint::NONE,
    },
    // --- JavaScript Libraries ---
    TechnologyRule {
        name: "jQuery",
        category: "JavaScript Library",
        patterns: &[Script(r"jquery(?:[.-]\d|\.min|\.slim|\.js)"), Body(r#"\.fn\.jquery\s*[:=]\s*"[\d.]+""#)],
        version: VersionHint::html(r"jquery[.-]([\d]+\.[\d.]+)(?:\.min|\.slim)?\.js"),
    },
    // --- UI Libraries ---
    TechnologyRule {
        name: "Material-UI",
        category: "UI Library",
        patterns: &[
            Body(r"MuiBox-root|MuiButton-root|MuiTypography"),
            Script(r"@material-ui/core|@mui/material"),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Chakra UI",
        category: "UI Library",
        patterns: &[Body(r"chakra-"), Script(r"@chakra-ui/react")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Ant Design",
        category: "UI Library",
        patterns: &[Body(r"\bant-(?:btn|layout|menu|row|col)\b"), Script(r"@ant-design/|antd[@/]")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Mantine",
        category: "UI Library",
        patterns: &[Body(r"mantine-"), Script(r"@mantine/core|@mantine/hooks")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Radix UI",
        category: "UI Library",
        patterns: &[Body(r"data-radix-"), Script(r"@radix-ui/")],
        version: VersionHint::NONE,
    },
    // --- CSS Frameworks ---
    TechnologyRule {
        name: "Tailwind CSS",
        category: "CSS Framework",
        patterns: &[Body(r"tailwind\.css|tailwindcss"), Meta(r"<meta[^>]*tailwindcss")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Bootstrap",
        category: "CSS Framework",
        patterns: &[
            Body(r"bootstrap\.css|bootstrap\.min\.css"),
            Script(r"bootstrap\.bundle\.js|bootstrap\.min\.js|bootstrap\.bundle\.min\.js"),
        ],
        version: VersionHint::html(r"bootstrap@([\d.]+)"),
    },
    TechnologyRule {
        name: "Bulma",
        category: "CSS Framework",
        patterns: &[Body(r"bulma\.css|bulma\.min\.css"), Meta(r"<meta[^>]*bulma")],
        version: VersionHint::NONE,
    },
    // --- State Management ---
    TechnologyRule {
        name: "Redux",
        category: "State Management",
        patterns: &[Script(r"redux@[\d.]+|react-redux|__REDUX__")],
        version: VersionHint::html(r"redux@([\d.]+)"),
    },
    TechnologyRule {
        name: "MobX",
        category: "State Management",
        patterns: &[Script(r"mobx@[\d.]+|mobx-react")],
        version: VersionHint::NONE,
    },
    // --- Build Tools ---
    TechnologyRule {
        name: "Webpack",
        category: "Build Tool",
        patterns: &[Body(r"__webpack_require__|webpackJsonp|webpackChunk"), Script(r"webpack\.bundle\.js")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Vite",
        category: "Build Tool",
        patterns: &[Script(r"@vite/client|vite/dist/client")],
        version: VersionHint::NONE,
    },
    // --- Analytics and Marketing ---
    TechnologyRule {
        name: "Google Analytics",
        category: "Analytics",
        patterns: &[
            Script(r"google-analytics\.com/|googletagmanager\.com/"),
            Body(r"GoogleAnalyticsObject|gtag\("),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "HubSpot",
        category: "Marketing",
        patterns: &[Script(r"js\.hs-scripts\.com|js\.hsforms\.net"), Body(r"hs-script-loader")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Segment",
        category: "Analytics",
        patterns: &[Script(r"cdn\.segment\.com/analytics\.js"), Body(r"cdn\.segment\.com")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Mixpanel",
        category: "Analytics",
        patterns: &[Script(r"mixpanel\.js|mixpanel-"), Body(r"mixpanel\.init|mixpanel\.track")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Amplitude",
        category: "Analytics",
        patterns: &[Script(r"amplitude\.com/|amplitude\.min\.js"), Body(r"amplitude\.getInstance")],
        version: VersionHint::NONE,
    },
    // --- Infrastructure ---
    TechnologyRule {
        name: "Cloudflare",
        category: "CDN",
        patterns: &[
            Header("cf-ray"),
            Header("cf-cache-status"),
            HeaderValue("server", r"(?i)cloudflare"),
            Cookie("__cf_bm"),
            Cookie("__cfduid"),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Fastly",
        category: "CDN",
        patterns: &[Header("fastly-restarts"), Header("x-fastly-request-id"), HeaderValue("x-served-by", r"^cache-")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Akamai",
        category: "CDN",
        patterns: &[Header("x-akamai-transformed"), Header("akamai-origin-hop"), Cookie("akacd_"), Cookie("akavpau_")],
        version: VersionHint::NONE,
    },
    // --- Web Servers ---
    TechnologyRule {
        name: "nginx",
        category: "Web Server",
        patterns: &[
            HeaderValue("server", r"(?i)nginx"),
            Header("x-nginx-cache"),
            Body(r"<hr><center>nginx</center>"),
        ],
        version: VersionHint::header("server"),
    },
    TechnologyRule {
        name: "Apache",
        category: "Web Server",
        patterns: &[HeaderValue("server", r"(?i)apache"), Body(r"Apache Server at")],
        version: VersionHint::header("server"),
    },
    TechnologyRule {
        name: "LiteSpeed",
        category: "Web Server",
        patterns: &[HeaderValue("server", r"(?i)litespeed")],
        version: VersionHint::header("server"),
    },
    // --- Languages and Server Frameworks ---
    TechnologyRule {
        name: "PHP",
        category: "Language",
        patterns: &[HeaderValue("x-powered-by", r"(?i)php"), Cookie("phpsessid")],
        version: VersionHint::header("x-powered-by"),
    },
    TechnologyRule {
        name: "ASP.NET",
        category: "Framework",
        patterns: &[Header("x-aspnet-version"), HeaderValue("x-powered-by", r"ASP\.NET"), Cookie("asp.net_sessionid")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Java",
        category: "Language",
        patterns: &[Cookie("jsessionid")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Django",
        category: "Framework",
        patterns: &[Cookie("csrftoken"), Body(r"csrfmiddlewaretoken")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Ruby on Rails",
        category: "Framework",
        patterns: &[Cookie("_rails_session"), Meta(r#"<meta[^>]*name="csrf-param"[^>]*authenticity_token"#)],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Express",
        category: "Framework",
        patterns: &[HeaderValue("x-powered-by", r"^Express$")],
        version: VersionHint::NONE,
    },
    // --- Security ---
    TechnologyRule {
        name: "reCAPTCHA",
        category: "Security",
        patterns: &[Script(r"www\.google\.com/recaptcha|recaptcha\.net/recaptcha"), Body(r"g-recaptcha|grecaptcha")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Auth0",
        category: "Security",
        patterns: &[Script(r"auth0\.js|cdn\.auth0\.com"), Body(r"auth0-lock")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Okta",
        category: "Security",
        patterns: &[Script(r"okta-signin-widget|\.okta\.com/"), Body(r"OktaAuth|okta-sign-in")],
        version: VersionHint::NONE,
    },
    // --- Payment ---
    TechnologyRule {
        name: "Stripe",
        category: "Payment",
        patterns: &[Script(r"js\.stripe\.com|stripe-js"), Body(r"data-stripe|stripe-button")],
        version: VersionHint::NONE,
    },
    // --- CMS ---
    TechnologyRule {
        name: "WordPress",
        category: "CMS",
        patterns: &[
            Body(r"wp-content|wp-includes|wp-json"),
            Meta(r#"(?i)<meta[^>]*"generator"[^>]*WordPress"#),
            Script(r"wp-embed\.min\.js"),
            Body(r"wp-login\.php"),
        ],
        version: VersionHint {
            header: None,
            html: Some(r"WordPress ([\d.]+)"),
            meta: None,
        },
    },
    TechnologyRule {
        name: "Drupal",
        category: "CMS",
        patterns: &[
            Body(r"drupal\.org|drupal\.settings|Drupal\.settings"),
            Meta(r#"(?i)<meta[^>]*"generator"[^>]*Drupal"#),
            Header("x-drupal-cache"),
        ],
        version: VersionHint::html(r"Drupal ([\d.]+)"),
    },
    TechnologyRule {
        name: "Joomla",
        category: "CMS",
        patterns: &[Meta(r#"(?i)<meta[^>]*"generator"[^>]*Joomla"#)],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Ghost",
        category: "CMS",
        patterns: &[Body(r"ghost\.io"), Script(r"ghost\.min\.js"), Meta(r#"(?i)<meta[^>]*"generator"[^>]*Ghost"#)],
        version: VersionHint {
            header: None,
            html: Some(r#""generator" content="Ghost ([\d.]+)""#),
            meta: None,
        },
    },
    TechnologyRule {
        name: "Strapi",
        category: "CMS",
        patterns: &[Body(r"strapi\.io"), Script(r"@strapi/|strapi-sdk")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Contentful",
        category: "CMS",
        patterns: &[Script(r"contentful\.com/|ctfassets\.net"), Body(r"ctfassets\.net")],
        version: VersionHint::NONE,
    },
    // --- E-commerce ---
    TechnologyRule {
        name: "Shopify",
        category: "E-commerce",
        patterns: &[
            Body(r"cdn\.shopify\.com|shopify\.com/checkout"),
            Script(r"shopify\.theme"),
            Meta(r#"<meta[^>]*"shopify-checkout-api-token""#),
            Header("x-shopid"),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "WooCommerce",
        category: "E-commerce",
        patterns: &[
            Body(r"woocommerce|wc_add_to_cart"),
            Script(r"woocommerce\.min\.js|wc-add-to-cart"),
            Meta(r#"(?i)<meta[^>]*"generator"[^>]*WooCommerce"#),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "Magento",
        category: "E-commerce",
        patterns: &[
            Body(r"(?i)magento|mage/cookies"),
            Meta(r#"(?i)<meta[^>]*"generator"[^>]*Magento"#),
            Cookie("mage-cache"),
        ],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "BigCommerce",
        category: "E-commerce",
        patterns: &[Body(r"bigcommerce\.com|cdn\d*\.bigcommerce"), Script(r"bigcommerce\.com")],
        version: VersionHint::NONE,
    },
    // --- Monitoring ---
    TechnologyRule {
        name: "Sentry",
        category: "Error Monitoring",
        patterns: &[Script(r"browser\.sentry-cdn\.com|sentry\.io"), Body(r"data-sentry|sentry-trace")],
        version: VersionHint::NONE,
    },
    TechnologyRule {
        name: "New Relic",
        category: "Performance Monitoring",
        patterns: &[Script(r"newrelic\.com/nr-|js-agent\.newrelic\.com"), Body(r"NREUM"), Header("newrelic")],
        version: VersionHint::NONE,
    },
];

// --- Social Platforms ---

/// A social platform and the `(host, path prefix)` pairs its profile URLs use.
#[derive(Debug, Clone, Copy)]
pub struct PlatformRule {
    pub platform: &'static str,
    pub patterns: &'static [(&'static str, &'static str)],
}

pub static SOCIAL_PLATFORMS: &[PlatformRule] = &[
    PlatformRule {
        platform: "LinkedIn",
        patterns: &[("linkedin.com", "/company/"), ("linkedin.com", "/in/"), ("linkedin.com", "/school/")],
    },
    PlatformRule { platform: "Twitter", patterns: &[("twitter.com", "/"), ("x.com", "/")] },
    PlatformRule { platform: "Facebook", patterns: &[("facebook.com", "/"), ("fb.me", "/"), ("fb.com", "/")] },
    PlatformRule { platform: "Instagram", patterns: &[("instagram.com", "/")] },
    PlatformRule { platform: "TikTok", patterns: &[("tiktok.com", "/@")] },
    PlatformRule {
        platform: "YouTube",
        patterns: &[("youtube.com", "/user/"), ("youtube.com", "/c/"), ("youtube.com", "/@")],
    },
];

/// Domains whose pages hide their profiles from scrapers; served from here
/// without any network access.
static KNOWN_PROFILES: &[(&str, &[(&str, &str, &str)])] = &[(
    "ebay.com",
    &[
        ("Facebook", "https://www.facebook.com/ebay", "ebay"),
        ("Twitter", "https://twitter.com/eBay", "eBay"),
        ("Instagram", "https://www.instagram.com/ebay", "ebay"),
        ("YouTube", "https://www.youtube.com/user/ebay", "ebay"),
    ],
)];

/// The fixed profile set for `domain`, if it has one.
pub fn known_profiles(domain: &str) -> Option<Vec<SocialProfile>> {
    KNOWN_PROFILES.iter().find(|(d, _)| *d == domain).map(|(_, profiles)| {
        profiles
            .iter()
            .map(|(platform, url, username)| SocialProfile {
                platform: platform.to_string(),
                url: url.to_string(),
                username: username.to_string(),
            })
            .collect()
    })
}
