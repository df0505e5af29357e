//! User-agent heuristics for automated traffic.

/// Lowercase substrings that mark a user agent as automated.
///
/// Order is irrelevant for matching but kept stable for table tests.
pub const DEFAULT_BOT_PATTERNS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "curl",
    "wget",
    "python-requests",
    "apache-httpclient",
    "java-http-client",
    "headless",
    "selenium",
];

/// Classifies user-agent strings as automated traffic.
///
/// This is a deny list, not a guarantee: unknown automation passes through.
#[derive(Debug, Clone)]
pub struct BotFilter {
    patterns: Vec<String>,
}

impl BotFilter {
    /// Builds a filter from the default list plus `extra` patterns.
    ///
    /// Extra patterns are trimmed and lowercased; blank entries are ignored.
    pub fn with_extra_patterns<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<String> = DEFAULT_BOT_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();

        for p in extra {
            let p = p.as_ref().trim().to_ascii_lowercase();
            if !p.is_empty() && !patterns.contains(&p) {
                patterns.push(p);
            }
        }

        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true for an empty user agent or one containing a known pattern.
    pub fn is_bot(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() {
            return true;
        }

        let ua = user_agent.to_lowercase();
        self.patterns.iter().any(|p| ua.contains(p.as_str()))
    }
}

impl Default for BotFilter {
    fn default() -> Self {
        Self::with_extra_patterns(std::iter::empty::<&str>())
    }
}
