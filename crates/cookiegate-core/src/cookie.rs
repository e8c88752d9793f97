//! Cookie helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use httpdate::fmt_http_date;

use crate::{Error, Result};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "authorization";

/// Attributes applied to the session cookie at sign-in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie path.
    pub path: String,

    /// Max-Age in seconds.
    pub max_age_seconds: u64,

    /// Not accessible to JS.
    pub http_only: bool,

    /// Send on HTTPS only.
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age_seconds: 86_400,
            http_only: true,
            secure: true,
        }
    }
}

impl CookieOptions {
    /// Apply per-field overrides on top of these options. Unset fields keep
    /// their current value.
    pub fn merged(&self, overrides: &CookieOverrides) -> CookieOptions {
        CookieOptions {
            path: overrides.path.clone().unwrap_or_else(|| self.path.clone()),
            max_age_seconds: overrides.max_age_seconds.unwrap_or(self.max_age_seconds),
            http_only: overrides.http_only.unwrap_or(self.http_only),
            secure: overrides.secure.unwrap_or(self.secure),
        }
    }
}

/// Per-field overrides for a single sign-in call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOverrides {
    /// Override the cookie path.
    pub path: Option<String>,

    /// Override Max-Age in seconds.
    pub max_age_seconds: Option<u64>,

    /// Override the HttpOnly flag.
    pub http_only: Option<bool>,

    /// Override the Secure flag.
    pub secure: Option<bool>,
}

/// Check that `name` is a valid cookie name (RFC 6265 token).
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("cookie name must not be empty".to_string()));
    }
    let ok = name.bytes().all(|b| {
        b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
    });
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid cookie name: {name}")))
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() || path.contains(';') {
        return Err(Error::Validation(format!("invalid cookie path: {path}")));
    }
    Ok(())
}

/// Build a `Set-Cookie` header value for the session cookie.
pub fn build_set_cookie(name: &str, value: &str, opts: &CookieOptions) -> Result<String> {
    validate_name(name)?;
    validate_path(&opts.path)?;

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("{name}={value}"));
    parts.push(format!("Path={}", opts.path));

    if opts.secure {
        parts.push("Secure".to_string());
    }
    if opts.http_only {
        parts.push("HttpOnly".to_string());
    }

    parts.push(format!("Max-Age={}", opts.max_age_seconds));
    // Expires for older clients.
    let expires = SystemTime::now() + Duration::from_secs(opts.max_age_seconds);
    parts.push(format!("Expires={}", fmt_http_date(expires)));

    Ok(parts.join("; "))
}

/// Build a `Set-Cookie` header value that clears the session cookie.
///
/// Uses the same name and path the writer used so the browser drops the
/// right cookie.
pub fn build_clear_cookie(name: &str, opts: &CookieOptions) -> Result<String> {
    validate_name(name)?;
    validate_path(&opts.path)?;

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("{name}="));
    parts.push(format!("Path={}", opts.path));

    if opts.secure {
        parts.push("Secure".to_string());
    }
    if opts.http_only {
        parts.push("HttpOnly".to_string());
    }

    parts.push("Max-Age=0".to_string());
    parts.push(format!("Expires={}", fmt_http_date(UNIX_EPOCH)));

    Ok(parts.join("; "))
}

/// Find a named pair in a `Cookie` request header.
///
/// Returns the raw value as sent by the client, or `None` when the header
/// carries no pair with that name.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for pair in header.split(';') {
        let pair = pair.trim();
        if let Some((k, v)) = pair.split_once('=') {
            if k.trim() == name {
                return Some(v.trim());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cookie_with_defaults() {
        let sc = build_set_cookie(SESSION_COOKIE, "abc", &CookieOptions::default()).unwrap();
        assert!(sc.starts_with("authorization=abc"));
        assert!(sc.contains("Path=/"));
        assert!(sc.contains("Max-Age=86400"));
        assert!(sc.contains("Secure"));
        assert!(sc.contains("HttpOnly"));
        assert!(sc.contains("Expires="));
    }

    #[test]
    fn set_cookie_honors_flags() {
        let opts = CookieOptions {
            http_only: false,
            secure: false,
            ..CookieOptions::default()
        };
        let sc = build_set_cookie(SESSION_COOKIE, "abc", &opts).unwrap();
        assert!(!sc.contains("Secure"));
        assert!(!sc.contains("HttpOnly"));
    }

    #[test]
    fn clear_cookie_has_max_age_zero() {
        let sc = build_clear_cookie(SESSION_COOKIE, &CookieOptions::default()).unwrap();
        assert!(sc.starts_with("authorization=;"));
        assert!(sc.contains("Max-Age=0"));
        assert!(sc.contains("Expires=Thu, 01 Jan 1970"));
    }

    #[test]
    fn merge_is_per_field() {
        let merged = CookieOptions::default().merged(&CookieOverrides {
            max_age_seconds: Some(3_600),
            ..CookieOverrides::default()
        });
        assert_eq!(merged.max_age_seconds, 3_600);
        assert_eq!(merged.path, "/");
        assert!(merged.http_only);
        assert!(merged.secure);
    }

    #[test]
    fn bad_names_and_paths_rejected() {
        assert!(build_set_cookie("", "v", &CookieOptions::default()).is_err());
        assert!(build_set_cookie("a;b", "v", &CookieOptions::default()).is_err());
        let opts = CookieOptions {
            path: String::new(),
            ..CookieOptions::default()
        };
        assert!(build_set_cookie(SESSION_COOKIE, "v", &opts).is_err());
    }

    #[test]
    fn read_cookie_finds_named_pair() {
        let header = "theme=dark; authorization=tok.en-1; lang=en";
        assert_eq!(read_cookie(header, "authorization"), Some("tok.en-1"));
        assert_eq!(read_cookie(header, "theme"), Some("dark"));
        assert_eq!(read_cookie(header, "missing"), None);
    }

    #[test]
    fn read_cookie_requires_exact_name() {
        let header = "xauthorization=nope";
        assert_eq!(read_cookie(header, "authorization"), None);
        assert_eq!(read_cookie("", "authorization"), None);
    }
}
