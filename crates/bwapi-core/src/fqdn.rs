//! Splitting a challenge FQDN into registrable domain and subdomain
//!
//! The registrable domain is taken to be the last two labels. Multi-label
//! public suffixes (`co.uk`) are not recognised.

use crate::error::{Error, Result};

/// A challenge FQDN split for the provider's record API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeName {
    /// Registrable domain, e.g. "example.com"
    pub domain: String,
    /// Record name relative to `domain`, e.g. "_acme-challenge.foo"
    pub subdomain: String,
}

/// Return the last two labels before the trailing dot
///
/// Returns `""` when `fqdn` has no trailing dot, or fewer than two
/// non-empty labels preceded by a dot.
///
/// ```
/// use bwapi_core::fqdn::extract_domain;
///
/// assert_eq!(extract_domain("_acme-challenge.sub.example.com."), "example.com");
/// assert_eq!(extract_domain("example.com."), "");
/// ```
pub fn extract_domain(fqdn: &str) -> &str {
    let Some(name) = fqdn.strip_suffix('.') else {
        return "";
    };

    let mut labels = name.rsplitn(3, '.');
    let (Some(tld), Some(sld), Some(_)) = (labels.next(), labels.next(), labels.next()) else {
        return "";
    };

    if tld.is_empty() || sld.is_empty() {
        return "";
    }

    &name[name.len() - tld.len() - sld.len() - 1..]
}

/// Strip `".<domain>."` from the end of `fqdn`
///
/// Returns `fqdn` unchanged when the suffix does not match.
pub fn extract_subdomain<'a>(fqdn: &'a str, domain: &str) -> &'a str {
    fqdn.strip_suffix(&format!(".{}.", domain)).unwrap_or(fqdn)
}

/// Split a resolved FQDN, rejecting input the provider API cannot address
///
/// Both [`Present`](crate::Solver::present) and
/// [`CleanUp`](crate::Solver::clean_up) derive the record from this, so the
/// same FQDN always targets the same record.
pub fn decompose(fqdn: &str) -> Result<ChallengeName> {
    let domain = extract_domain(fqdn);
    if domain.is_empty() {
        return Err(Error::invalid_input(format!(
            "'{}' must end with '.' and contain at least three labels",
            fqdn
        )));
    }

    // A non-empty domain is always preceded by '.', so the suffix strips.
    let subdomain = extract_subdomain(fqdn, domain);
    if subdomain.is_empty() {
        return Err(Error::invalid_input(format!(
            "'{}' has no subdomain below '{}'",
            fqdn, domain
        )));
    }

    Ok(ChallengeName {
        domain: domain.to_string(),
        subdomain: subdomain.to_string(),
    })
}
