//! Static registry of takeover fingerprints.
//!
//! Each entry pairs the CNAME substrings that route a subdomain to a hosting
//! service with the error-page substrings that service returns when the
//! referenced resource is unclaimed. The registry is declarative data consumed
//! by one generic matching algorithm; adding a service means appending a row.

/// A single service signature. CNAME patterns are stored lowercase; HTTP
/// patterns are matched case-insensitively against the response body.
#[derive(Debug)]
pub struct FingerprintEntry {
    pub service: &'static str,
    pub cname: &'static [&'static str],
    pub http: &'static [&'static str],
    pub vulnerable: bool,
}

/// Result of a successful fingerprint lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintMatch {
    pub service: &'static str,
    /// The candidate CNAME (original casing) that matched the entry.
    pub matched_cname: String,
}

/// Known vulnerable CNAME patterns and error signatures, in declaration
/// order. Ties between entries resolve to the first declared.
pub static FINGERPRINTS: &[FingerprintEntry] = &[
    FingerprintEntry {
        service: "AWS/S3",
        cname: &["s3.amazonaws.com", "s3-website"],
        http: &["NoSuchBucket", "The specified bucket does not exist"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "GitHub Pages",
        cname: &["github.io"],
        http: &["There isn't a GitHub Pages site here", "For root URLs"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Heroku",
        cname: &["herokuapp.com", "herokussl.com"],
        http: &["No such app", "There's nothing here", "herokucdn.com/error-pages"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Shopify",
        cname: &["myshopify.com"],
        http: &["Sorry, this shop is currently unavailable", "Only one step left"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Tumblr",
        cname: &["tumblr.com"],
        http: &["Whatever you were looking for doesn't currently exist", "There's nothing here"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "WordPress",
        cname: &["wordpress.com"],
        http: &["Do you want to register"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Ghost",
        cname: &["ghost.io"],
        http: &["The thing you were looking for is no longer here"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Zendesk",
        cname: &["zendesk.com"],
        http: &["Help Center Closed", "this help center no longer exists"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Fastly",
        cname: &["fastly.net"],
        http: &["Fastly error: unknown domain"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Pantheon",
        cname: &["pantheonsite.io"],
        http: &["404 error unknown site"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Azure",
        cname: &["azurewebsites.net", "cloudapp.net", "cloudapp.azure.com"],
        http: &["404 Web Site not found", "Error 404 - Web app not found"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Unbounce",
        cname: &["unbouncepages.com"],
        http: &["The requested URL was not found on this server"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Surge.sh",
        cname: &["surge.sh"],
        http: &["project not found"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Bitbucket",
        cname: &["bitbucket.io"],
        http: &["Repository not found"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Netlify",
        cname: &["netlify.com", "netlify.app"],
        http: &["Not Found - Request ID"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Cargo",
        cname: &["cargocollective.com"],
        http: &["404 Not Found"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Statuspage",
        cname: &["statuspage.io"],
        http: &["You are being", "redirected"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Uservoice",
        cname: &["uservoice.com"],
        http: &["This UserVoice subdomain is currently unavailable"],
        vulnerable: true,
    },
    FingerprintEntry {
        service: "Cloudfront",
        cname: &["cloudfront.net"],
        http: &["ERROR: The request could not be satisfied", "Bad request"],
        vulnerable: true,
    },
];

/// Match a candidate's CNAME chain and HTTP body against the registry.
///
/// A service matches only when both hold: some candidate CNAME, case-folded,
/// contains one of the entry's CNAME patterns as a substring, and the entry
/// is flagged vulnerable, a body is present, and the case-folded body
/// contains one of the entry's HTTP patterns. A CNAME match alone only proves
/// routing to a third-party service; the error text is the evidence that the
/// owning resource is gone. First full match wins.
pub fn lookup(cnames: &[String], body: Option<&str>) -> Option<FingerprintMatch> {
    let body_lower = body.map(str::to_lowercase);

    for entry in FINGERPRINTS {
        let mut matched_cname: Option<&String> = None;
        'cnames: for cname in cnames {
            let folded = cname.to_lowercase();
            for pattern in entry.cname {
                if folded.contains(pattern) {
                    matched_cname = Some(cname);
                    break 'cnames;
                }
            }
        }
        let Some(matched_cname) = matched_cname else {
            continue;
        };

        if !entry.vulnerable {
            continue;
        }
        let Some(body_lower) = body_lower.as_deref() else {
            continue;
        };
        if entry
            .http
            .iter()
            .any(|pattern| body_lower.contains(&pattern.to_lowercase()))
        {
            return Some(FingerprintMatch {
                service: entry.service,
                matched_cname: matched_cname.clone(),
            });
        }
    }

    None
}
