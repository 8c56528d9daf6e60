//! Session credential handling for the booking site
//!
//! The site issues a classic ASP session cookie on first contact and
//! expects it back verbatim on every later request, alongside a fixed
//! locale marker. There is no cookie jar involved; the header is attached
//! by hand so the exchange stays byte-for-byte predictable.

/// Locale marker the site expects next to the session cookie
const LANGUAGE_COOKIE: &str = "language=en-US";

/// Session cookie issued by the booking site
///
/// Holds the name/value pair of the first cookie from the session
/// endpoint. All authenticated requests replay it through
/// [`cookie_header`](SessionCredential::cookie_header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    name: String,
    value: String,
}

impl SessionCredential {
    /// Create a credential from a cookie name/value pair
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Cookie name, safe to log
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full `Cookie` header value for authenticated requests
    ///
    /// # Examples
    ///
    /// ```
    /// use slotwatch::bbdc::SessionCredential;
    ///
    /// let cred = SessionCredential::new("ASPSESSIONID", "abc123");
    /// assert_eq!(cred.cookie_header(), "ASPSESSIONID=abc123; language=en-US");
    /// ```
    pub fn cookie_header(&self) -> String {
        format!("{}={}; {}", self.name, self.value, LANGUAGE_COOKIE)
    }
}
