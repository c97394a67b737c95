//! Utility functions for domain processing and validation.
//!
//! This module contains helpers for normalizing user input into a domain
//! name, deriving query names from it, and reading domain lists from files.

use crate::error::DomainCheckError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Longest textual domain name (without the root dot)
const MAX_DOMAIN_LENGTH: usize = 253;

lazy_static! {
    static ref LABEL: Regex =
        Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9_-]{0,61}[A-Za-z0-9_])?$").unwrap();
    static ref NUMERIC_LABEL: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// Normalize and validate user input as a domain name.
///
/// Surrounding whitespace and trailing dots are removed. The result must be a
/// syntactically legal DNS name with at least one label separator.
///
/// # Examples
///
/// ```
/// use domwatch_lib::normalize_domain;
///
/// assert_eq!(normalize_domain(" example.com. ").unwrap(), "example.com");
/// assert!(normalize_domain("localhost").is_err());
/// ```
pub fn normalize_domain(input: &str) -> Result<String, DomainCheckError> {
    let domain = input.trim().trim_end_matches('.').trim();

    if domain.is_empty() {
        return Err(DomainCheckError::invalid_domain(
            input.trim(),
            "Domain name cannot be empty",
        ));
    }

    if !is_dns_name(domain) {
        return Err(DomainCheckError::invalid_domain(domain, "not a domain name"));
    }

    match domain.find('.') {
        Some(index) if index > 0 => Ok(domain.to_string()),
        _ => Err(DomainCheckError::invalid_domain(
            domain,
            "a domain needs at least two labels",
        )),
    }
}

/// Check whether `name` is a syntactically legal DNS host name.
///
/// Labels are 1-63 characters of letters, digits, hyphens and underscores,
/// and do not start or end with a hyphen. IPv4 literals are rejected.
pub fn is_dns_name(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > MAX_DOMAIN_LENGTH {
        return false;
    }

    let labels: Vec<&str> = name.split('.').collect();
    if !labels.iter().all(|label| LABEL.is_match(label)) {
        return false;
    }

    // A numeric final label means an address literal, not a name.
    !(labels.len() > 1 && labels.last().is_some_and(|l| NUMERIC_LABEL.is_match(l)))
}

/// Append the root dot used in wire queries ("example.com" -> "example.com.").
pub fn fully_qualified(domain: &str) -> String {
    format!("{}.", domain.trim_end_matches('.'))
}

/// Final dot-separated label of a domain ("example.com" -> "com").
///
/// Returns `None` when the domain has no dot or the final label is empty.
pub fn top_level_label(domain: &str) -> Option<&str> {
    let (_, tld) = domain.rsplit_once('.')?;
    let tld = tld.trim();
    if tld.is_empty() {
        None
    } else {
        Some(tld)
    }
}

/// Read domain names from a file, one per line.
///
/// Empty lines and lines starting with '#' are skipped; trailing `# comments`
/// are stripped. Names are returned as written (not yet normalized).
pub fn load_domains_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainCheckError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        DomainCheckError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
    })?;

    let domains: Vec<String> = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if domains.is_empty() {
        return Err(DomainCheckError::file_error(
            path.to_string_lossy(),
            "No domains found in file",
        ));
    }

    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
        assert_eq!(normalize_domain("  example.com.. ").unwrap(), "example.com");
        assert_eq!(normalize_domain("sub.example.co.uk").unwrap(), "sub.example.co.uk");
        assert_eq!(normalize_domain("_dmarc.example.com").unwrap(), "_dmarc.example.com");
    }

    #[test]
    fn test_normalize_domain_rejects_invalid() {
        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("   ").is_err());
        assert!(normalize_domain("localhost").is_err());
        assert!(normalize_domain(".com").is_err());
        assert!(normalize_domain("-example.com").is_err());
        assert!(normalize_domain("exa mple.com").is_err());
        assert!(normalize_domain("example..com").is_err());
        assert!(normalize_domain("192.168.1.1").is_err());
    }

    #[test]
    fn test_is_dns_name() {
        assert!(is_dns_name("example.com"));
        assert!(is_dns_name("example.com."));
        assert!(is_dns_name("localhost"));
        assert!(is_dns_name("xn--bcher-kva.example"));
        assert!(!is_dns_name("example-.com"));
        assert!(!is_dns_name(&format!("{}.com", "a".repeat(64))));
        assert!(!is_dns_name(&format!("{}.com", "a".repeat(250))));
    }

    #[test]
    fn test_fully_qualified() {
        assert_eq!(fully_qualified("example.com"), "example.com.");
        assert_eq!(fully_qualified("example.com."), "example.com.");
    }

    #[test]
    fn test_top_level_label() {
        assert_eq!(top_level_label("example.com"), Some("com"));
        assert_eq!(top_level_label("a.b.co.uk"), Some("uk"));
        assert_eq!(top_level_label("localhost"), None);
        assert_eq!(top_level_label("example."), None);
    }

    #[test]
    fn test_load_domains_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# watchlist").unwrap();
        writeln!(file, "example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  example.org   # second").unwrap();
        file.flush().unwrap();

        let domains = load_domains_from_file(file.path()).unwrap();
        assert_eq!(domains, vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_load_domains_from_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = load_domains_from_file(file.path()).unwrap_err();
        assert!(matches!(err, DomainCheckError::FileError { .. }));
    }

    #[test]
    fn test_load_domains_missing_file() {
        let err = load_domains_from_file("/nonexistent/domains.txt").unwrap_err();
        assert!(matches!(err, DomainCheckError::FileError { .. }));
    }
}
