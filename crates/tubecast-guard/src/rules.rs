//! Message guard rules — link detection, forbidden terms, caps ratio.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tubecast_core::config::GuardConfig;
use tubecast_core::types::{BlockReason, ValidationVerdict};

/// Built-in forbidden terms. Always active.
pub const FORBIDDEN_TERMS: &[&str] = &[
    "inscreva-se no meu canal",
    "sub4sub",
    "troco inscritos",
    "ganhe dinheiro",
    "clique aqui",
    "acesse meu site",
    "xxx",
    "porn",
];

/// Scheme links, `www.` hosts, or a `.tld/` path fragment.
const LINK_PATTERN: &str = r"(?i)(https?://|www\.|\.[a-z]{2,}/)";

/// Texts up to this many characters never get a caps warning.
const CAPS_MIN_LEN: usize = 10;
const CAPS_MAX_RATIO: f64 = 0.7;

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern compiles"))
}

/// Extra terms loaded from a TOML rules file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardRules {
    #[serde(default)]
    pub extra_terms: Vec<String>,
}

impl GuardRules {
    /// Load rules from a TOML file.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("Read guard rules: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Parse guard rules: {e}"))
    }
}

/// Validator over a fixed term list.
#[derive(Debug, Clone)]
pub struct MessageGuard {
    /// Lowercased, deduplicated, seed terms first.
    terms: Vec<String>,
}

impl MessageGuard {
    /// Guard with the built-in term list only.
    pub fn new() -> Self {
        Self::with_extra_terms(std::iter::empty::<&str>())
    }

    /// Built-in terms plus `extra`. Blank entries are ignored.
    pub fn with_extra_terms<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = FORBIDDEN_TERMS.iter().map(|t| t.to_string()).collect();
        for term in extra {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        if terms.len() > FORBIDDEN_TERMS.len() {
            tracing::debug!(
                "🛡️ Message guard: {} extra forbidden terms",
                terms.len() - FORBIDDEN_TERMS.len()
            );
        }
        Self { terms }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::with_extra_terms(&config.extra_terms)
    }

    pub fn from_rules(rules: &GuardRules) -> Self {
        Self::with_extra_terms(&rules.extra_terms)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Compute the verdict for the current text. Total over all inputs.
    pub fn validate(&self, text: &str) -> ValidationVerdict {
        let caps_warning = shouting(text);

        if contains_link(text) {
            return ValidationVerdict::blocked(BlockReason::ContainsLink, caps_warning, None);
        }

        if let Some(term) = self.forbidden_term(text) {
            return ValidationVerdict::blocked(
                BlockReason::ContainsForbiddenTerm,
                caps_warning,
                Some(term.to_string()),
            );
        }

        ValidationVerdict::allowed(caps_warning)
    }

    fn forbidden_term(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.terms
            .iter()
            .find(|t| lower.contains(t.as_str()))
            .map(String::as_str)
    }
}

impl Default for MessageGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the built-in term list.
pub fn validate(text: &str) -> ValidationVerdict {
    static DEFAULT: OnceLock<MessageGuard> = OnceLock::new();
    DEFAULT.get_or_init(MessageGuard::new).validate(text)
}

fn contains_link(text: &str) -> bool {
    link_regex().is_match(text)
}

/// More than 10 chars and over 70% ASCII capitals.
fn shouting(text: &str) -> bool {
    let len = text.chars().count();
    if len <= CAPS_MIN_LEN {
        return false;
    }
    let upper = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    upper as f64 > len as f64 * CAPS_MAX_RATIO
}
