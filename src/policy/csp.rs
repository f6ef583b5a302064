//! Content-Security-Policy directives.

use std::fmt;

/// A single CSP directive, e.g. `script-src 'self' https://cdn.jsdelivr.net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: &'static str,
    pub sources: Vec<&'static str>,
}

impl Directive {
    pub fn new(name: &'static str, sources: &[&'static str]) -> Self {
        Self {
            name,
            sources: sources.to_vec(),
        }
    }
}

/// Ordered list of CSP directives.
///
/// Rendered as `name source source; name source;` with every directive
/// terminated by a semicolon, which is the form browsers and the deployed
/// frontends expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: Vec<Directive>,
}

impl ContentSecurityPolicy {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    /// The policy served by WSS13 Framework applications.
    ///
    /// Allows the CDNs used by the dashboards (jsDelivr, cdnjs, Google Fonts)
    /// and the API/WebSocket endpoints under `wss13.com.br`.
    pub fn standard() -> Self {
        Self::new(vec![
            Directive::new("default-src", &["'self'"]),
            Directive::new(
                "script-src",
                &[
                    "'self'",
                    "'unsafe-inline'",
                    "'unsafe-eval'",
                    "https://cdn.jsdelivr.net",
                    "https://cdnjs.cloudflare.com",
                ],
            ),
            Directive::new(
                "style-src",
                &[
                    "'self'",
                    "'unsafe-inline'",
                    "https://fonts.googleapis.com",
                    "https://cdn.jsdelivr.net",
                ],
            ),
            Directive::new("font-src", &["'self'", "https://fonts.gstatic.com"]),
            Directive::new("img-src", &["'self'", "data:", "https:", "blob:"]),
            Directive::new(
                "connect-src",
                &["'self'", "https://api.wss13.com.br", "wss://wss13.com.br"],
            ),
            Directive::new("frame-ancestors", &["'none'"]),
            Directive::new("base-uri", &["'self'"]),
            Directive::new("form-action", &["'self'"]),
        ])
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl fmt::Display for ContentSecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(directive.name)?;
            for source in &directive.sources {
                write!(f, " {source}")?;
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}
