//! Hostname syntax validation.
//!
//! Target hosts arrive inside the request path, so anything a client can
//! type shows up here: traversal attempts, embedded slashes, empty labels.
//! Validation is purely syntactic and happens before the candidate is used
//! to build an outbound URL; whether a host is allowed is the whitelist's
//! concern.

/// Checks `candidate` against DNS label grammar.
///
/// The candidate must be a non-empty, dot-separated sequence of labels.
/// Each label is one or more alphanumeric characters or hyphens, with no
/// leading or trailing hyphen. Unicode letters and digits are accepted so
/// internationalized hostnames validate before IDNA encoding happens in the
/// URL layer.
///
/// # Example
///
/// ```
/// use hostgate_core::is_valid_hostname;
///
/// assert!(is_valid_hostname("api.openai.com"));
/// assert!(is_valid_hostname("bücher.example"));
/// assert!(!is_valid_hostname("invalid..hostname"));
/// assert!(!is_valid_hostname("a/b"));
/// ```
pub fn is_valid_hostname(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.split('.').all(is_valid_label)
}

/// One label: non-empty, alphanumeric or hyphen, no edge hyphens.
fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_hostnames() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("api.openai.com"));
        assert!(is_valid_hostname("localhost"));
        assert!(is_valid_hostname("sub-domain.example.co.uk"));
    }

    #[test]
    fn test_accepts_digits_and_mixed_case() {
        assert!(is_valid_hostname("s3.us-east-1.amazonaws.com"));
        assert!(is_valid_hostname("API.GitHub.COM"));
        assert!(is_valid_hostname("127.0.0.1"));
    }

    #[test]
    fn test_accepts_unicode_labels() {
        assert!(is_valid_hostname("bücher.example"));
        assert!(is_valid_hostname("München.de"));
        assert!(is_valid_hostname("日本語.jp"));
    }

    #[test]
    fn test_rejects_empty_and_dot_only() {
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("."));
        assert!(!is_valid_hostname(".."));
    }

    #[test]
    fn test_rejects_empty_labels() {
        assert!(!is_valid_hostname("invalid..hostname"));
        assert!(!is_valid_hostname(".leading.dot"));
        assert!(!is_valid_hostname("trailing.dot."));
    }

    #[test]
    fn test_rejects_edge_hyphens() {
        assert!(!is_valid_hostname("-leadinghyphen.com"));
        assert!(!is_valid_hostname("trailing-.com"));
        assert!(!is_valid_hostname("ok.-bad.com"));
    }

    #[test]
    fn test_accepts_inner_hyphens() {
        assert!(is_valid_hostname("my-api.example.com"));
        assert!(is_valid_hostname("a-b-c.example"));
    }

    #[test]
    fn test_rejects_path_characters() {
        assert!(!is_valid_hostname("a/b"));
        assert!(!is_valid_hostname("../etc"));
        assert!(!is_valid_hostname("host/../other"));
    }

    #[test]
    fn test_rejects_url_metacharacters() {
        assert!(!is_valid_hostname("host:8080"));
        assert!(!is_valid_hostname("user@host.com"));
        assert!(!is_valid_hostname("host?query"));
        assert!(!is_valid_hostname("host%2ecom"));
        assert!(!is_valid_hostname("under_score.com"));
        assert!(!is_valid_hostname("host with space.com"));
    }
}
