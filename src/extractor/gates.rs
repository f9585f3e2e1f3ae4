//! Safety gates that run before structural parsing.
//!
//! The gates convert potentially slow or malicious inputs into fast
//! rejections: an oversized file skips parsing entirely, and content matching
//! the suspicious-pattern list is routed to the lightweight fallback
//! extractor instead of the full tree builder. The pattern list is explicit
//! configuration data so tests (and callers) can substitute a stricter or
//! looser rule set.

use regex::RegexSet;

/// Structural-parse size ceiling in bytes. Files larger than this produce an
/// empty record rather than being parsed.
pub const MAX_FILE_BYTES: usize = 1_048_576;

/// Heuristic patterns associated with code that dynamically executes or
/// obfuscates itself.
const SUSPICIOUS_PATTERNS: [&str; 8] = [
    // Runtime evaluation
    r"\beval\s*\(",
    r"new\s+Function\s*\(",
    // Child-process spawning
    r#"require\s*\(\s*['"]child_process['"]\s*\)"#,
    r#"from\s+['"]child_process['"]"#,
    // DOM / string-based code construction
    r"document\.write\s*\(",
    r"\.innerHTML\s*=",
    // Escape floods typical of obfuscated payloads
    r"(\\x[0-9a-fA-F]{2}){8,}",
    r"(\\u[0-9a-fA-F]{4}){8,}",
];

/// Which extraction strategy to run for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Full tree-sitter extraction.
    Structural,
    /// Line-oriented import-only extraction.
    Fallback,
    /// No parsing at all; return an empty record.
    Skip,
}

/// Injectable gate policy: size ceiling plus compiled suspicious patterns.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    max_bytes: usize,
    patterns: RegexSet,
}

impl SafetyPolicy {
    /// Build a policy with a custom ceiling and extra patterns on top of the
    /// built-in list. Invalid extra patterns are dropped with a warning.
    pub fn new(max_bytes: usize, extra_patterns: &[String]) -> Self {
        let mut sources: Vec<String> = SUSPICIOUS_PATTERNS.iter().map(|p| p.to_string()).collect();
        for pattern in extra_patterns {
            if regex::Regex::new(pattern).is_ok() {
                sources.push(pattern.clone());
            } else {
                tracing::warn!(pattern = %pattern, "ignoring invalid suspicious-content pattern");
            }
        }
        let patterns = RegexSet::new(&sources).unwrap_or_else(|_| {
            // The built-in list is known-good; reachable only if an extra
            // pattern combination breaks the set, so fall back to built-ins.
            RegexSet::new(SUSPICIOUS_PATTERNS).expect("built-in patterns compile")
        });
        Self {
            max_bytes,
            patterns,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Whether any suspicious pattern matches the raw text.
    pub fn is_suspicious(&self, content: &str) -> bool {
        self.patterns.is_match(content)
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new(MAX_FILE_BYTES, &[])
    }
}

/// Pick the extraction strategy for a file's content. Gate order matters:
/// the size gate runs first so pattern scanning never touches oversized
/// input either.
pub fn choose_strategy(content: &str, policy: &SafetyPolicy) -> Strategy {
    if content.len() > policy.max_bytes() {
        return Strategy::Skip;
    }
    if policy.is_suspicious(content) {
        return Strategy::Fallback;
    }
    Strategy::Structural
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_content_gets_structural_parse() {
        let policy = SafetyPolicy::default();
        assert_eq!(
            choose_strategy("export const x = 1;\n", &policy),
            Strategy::Structural
        );
    }

    #[test]
    fn oversized_content_is_skipped() {
        let policy = SafetyPolicy::new(16, &[]);
        let content = "a".repeat(17);
        assert_eq!(choose_strategy(&content, &policy), Strategy::Skip);
    }

    #[test]
    fn size_gate_runs_before_pattern_gate() {
        let policy = SafetyPolicy::new(4, &[]);
        // Would match eval, but the size gate wins.
        assert_eq!(choose_strategy("eval(x)", &policy), Strategy::Skip);
    }

    #[test]
    fn eval_routes_to_fallback() {
        let policy = SafetyPolicy::default();
        assert_eq!(
            choose_strategy("const y = eval('2 + 2');", &policy),
            Strategy::Fallback
        );
    }

    #[test]
    fn function_constructor_routes_to_fallback() {
        let policy = SafetyPolicy::default();
        assert_eq!(
            choose_strategy("const f = new Function('return 1');", &policy),
            Strategy::Fallback
        );
    }

    #[test]
    fn child_process_require_routes_to_fallback() {
        let policy = SafetyPolicy::default();
        let content = "const cp = require('child_process');\ncp.exec('ls');";
        assert_eq!(choose_strategy(content, &policy), Strategy::Fallback);
    }

    #[test]
    fn hex_escape_flood_routes_to_fallback() {
        let policy = SafetyPolicy::default();
        let content = r#"const s = "\x41\x42\x43\x44\x45\x46\x47\x48\x49";"#;
        assert_eq!(choose_strategy(content, &policy), Strategy::Fallback);
    }

    #[test]
    fn extra_patterns_extend_the_policy() {
        let policy = SafetyPolicy::new(MAX_FILE_BYTES, &[r"forbidden_token".to_string()]);
        assert_eq!(
            choose_strategy("const forbidden_token = 1;", &policy),
            Strategy::Fallback
        );
        // Built-ins still apply.
        assert_eq!(choose_strategy("eval(x)", &policy), Strategy::Fallback);
    }

    #[test]
    fn invalid_extra_pattern_is_ignored() {
        let policy = SafetyPolicy::new(MAX_FILE_BYTES, &["([unclosed".to_string()]);
        assert_eq!(
            choose_strategy("const a = 1;", &policy),
            Strategy::Structural
        );
    }
}
