//! # Sandbox Naming
//!
//! Sandbox name generation and hostname suffix derivation.
//!
//! A sandbox name is `sb-<username>-<suffix>` where the suffix is drawn from
//! a 32-character alphabet excluding visually ambiguous characters. At length
//! 5 this gives roughly 2^25 combinations; collisions are not checked for at
//! creation time, which is a documented gap rather than a guarantee.

use crate::config::DomainConfig;
use crate::constants::{SANDBOX_NAME_PREFIX, SUFFIX_ALPHABET, SUFFIX_LENGTH};
use rand::Rng;

/// Generate a random sandbox name suffix.
pub fn random_suffix() -> String {
    let alphabet: Vec<char> = SUFFIX_ALPHABET.chars().collect();
    let mut rng = rand::rng();
    (0..SUFFIX_LENGTH)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

/// Generate a sandbox name for a user.
pub fn sandbox_name(username: &str) -> String {
    format!("{SANDBOX_NAME_PREFIX}-{username}-{}", random_suffix())
}

/// Derive a username fragment from a raw identity header value.
///
/// Takes the local part of an email address (the value itself when it is not
/// an email), lowercased and filtered to ASCII letters. Returns an empty
/// string when nothing survives filtering.
pub fn sanitize_username(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    let local = lowered.split('@').next().unwrap_or("");
    local.chars().filter(char::is_ascii_lowercase).collect()
}

/// Derive the hostname suffix for a sandbox.
///
/// With `subdomain` set the sandbox gets a dedicated subdomain under the
/// subdomain base; otherwise hostnames are hyphen-joined under the path base.
pub fn hostname_suffix(username: &str, subdomain: bool, domains: &DomainConfig) -> String {
    if subdomain {
        format!(".{username}.{}", domains.subdomain_base)
    } else {
        format!("-{username}.{}", domains.path_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn suffix_has_expected_shape() {
        for _ in 0..100 {
            let suffix = random_suffix();
            assert_eq!(suffix.len(), SUFFIX_LENGTH);
            assert!(suffix.chars().all(|c| SUFFIX_ALPHABET.contains(c)));
        }
    }

    #[test]
    fn suffixes_are_distinct_in_a_small_sample() {
        // Uniqueness is probabilistic only (32^5 combinations, no collision
        // check at creation time). A small sample keeps the flake probability
        // negligible while documenting the expectation.
        let sample: HashSet<String> = (0..50).map(|_| random_suffix()).collect();
        assert_eq!(sample.len(), 50);
    }

    #[test]
    fn sandbox_name_shape() {
        let name = sandbox_name("alice");
        assert!(name.starts_with("sb-alice-"));
        assert_eq!(name.len(), "sb-alice-".len() + SUFFIX_LENGTH);
    }

    #[test]
    fn sanitize_takes_email_local_part() {
        assert_eq!(sanitize_username("Alice.Smith@example.com"), "alicesmith");
        assert_eq!(sanitize_username("bob"), "bob");
        assert_eq!(sanitize_username("  Carol7@example.com "), "carol");
    }

    #[test]
    fn sanitize_can_produce_empty_fragment() {
        assert_eq!(sanitize_username("12345@example.com"), "");
        assert_eq!(sanitize_username(""), "");
    }

    #[test]
    fn subdomain_suffix_is_dotted() {
        let domains = DomainConfig::default();
        assert_eq!(
            hostname_suffix("alice", true, &domains),
            ".alice.codemowers.cloud"
        );
    }

    #[test]
    fn path_suffix_is_hyphenated() {
        let domains = DomainConfig::default();
        assert_eq!(
            hostname_suffix("alice", false, &domains),
            "-alice.codemowers.ee"
        );
    }
}
