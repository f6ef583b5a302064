//! Trusted host patterns.
//!
//! # Pattern Syntax
//!
//! - `*` - any host
//! - `*.example.com` - any subdomain of `example.com` (not `example.com` itself)
//! - `example.com` - exact match
//!
//! Matching is case-insensitive and ignores the port.

use crate::error::SetupError;
use std::str::FromStr;

/// A single allowed host pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    Any,
    /// Stores the suffix including the leading dot (`.example.com`).
    WildcardSubdomain(String),
    Exact(String),
}

impl HostPattern {
    pub fn matches(&self, host: &str) -> bool {
        match self {
            HostPattern::Any => true,
            HostPattern::WildcardSubdomain(suffix) => {
                host.len() > suffix.len() && host.to_ascii_lowercase().ends_with(suffix.as_str())
            }
            HostPattern::Exact(exact) => host.eq_ignore_ascii_case(exact),
        }
    }
}

impl FromStr for HostPattern {
    type Err = SetupError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| SetupError::InvalidHostPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        if pattern.chars().any(|c| c.is_whitespace()) {
            return Err(invalid("pattern contains whitespace"));
        }

        if pattern == "*" {
            return Ok(HostPattern::Any);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(invalid("wildcard must be written as '*.domain'"));
            }
            if suffix.contains('*') {
                return Err(invalid("only a single leading wildcard is allowed"));
            }
            return Ok(HostPattern::WildcardSubdomain(suffix.to_ascii_lowercase()));
        }

        if pattern.contains('*') {
            return Err(invalid("wildcard is only allowed as a leading '*.'"));
        }

        Ok(HostPattern::Exact(pattern.to_ascii_lowercase()))
    }
}

/// Ordered allow-list of host patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHosts {
    patterns: Vec<HostPattern>,
    www_redirect: bool,
}

impl TrustedHosts {
    /// Parses every pattern, failing on the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::EmptyHostList`] when `patterns` is empty and
    /// [`SetupError::InvalidHostPattern`] for a malformed entry.
    pub fn parse<I, S>(patterns: I, www_redirect: bool) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().parse())
            .collect::<Result<Vec<HostPattern>, _>>()?;

        if patterns.is_empty() {
            return Err(SetupError::EmptyHostList);
        }

        Ok(Self {
            patterns,
            www_redirect,
        })
    }

    pub fn patterns(&self) -> &[HostPattern] {
        &self.patterns
    }

    pub fn allows_any(&self) -> bool {
        self.patterns.contains(&HostPattern::Any)
    }

    /// Returns `true` if `host` (without port) matches at least one pattern.
    pub fn is_allowed(&self, host: &str) -> bool {
        !host.is_empty() && self.patterns.iter().any(|p| p.matches(host))
    }

    /// Returns `true` when a rejected `host` should be redirected to `www.<host>`.
    ///
    /// Only applies when `www.<host>` is listed verbatim as an exact pattern.
    pub fn should_redirect_to_www(&self, host: &str) -> bool {
        if !self.www_redirect || host.is_empty() {
            return false;
        }

        let www_host = format!("www.{}", host.to_ascii_lowercase());
        self.patterns
            .iter()
            .any(|p| matches!(p, HostPattern::Exact(exact) if *exact == www_host))
    }
}

/// Strips the port from a `Host` header value.
///
/// Handles bracketed IPv6 literals (`[::1]:8080` → `[::1]`).
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    host.split(':').next().unwrap_or(host)
}
