use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::{IntelError, IntelResult};

/// Four groups of one to three digits. Octet range is not checked.
const IPV4_PATTERN: &str = r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$";

/// Eight groups of one to four hex digits. `::` compression is not accepted.
const IPV6_PATTERN: &str = r"^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$";

/// An IP literal that passed [`validate`], kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddress(String);

impl IpAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn ipv4() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV4_PATTERN).expect("IPv4 pattern is valid"))
}

fn ipv6() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV6_PATTERN).expect("IPv6 pattern is valid"))
}

/// Syntactic check for a dotted-quad IPv4 or full-form IPv6 literal
///
/// The check is purely lexical: `999.999.999.999` is accepted, while
/// compressed (`2001:db8::1`) and IPv4-mapped IPv6 forms are rejected.
/// Case and zero padding are preserved in the returned value.
pub fn validate(raw: &str) -> IntelResult<IpAddress> {
    if ipv4().is_match(raw) || ipv6().is_match(raw) {
        Ok(IpAddress(raw.to_string()))
    } else {
        Err(IntelError::InvalidFormat(raw.to_string()))
    }
}
