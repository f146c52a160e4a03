use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Represents a parsed Go release identifier, `go<major>.<minor>[.<patch>][(rc|beta)<n>]`.
///
/// Zero means "absent" for `patch`, `rc` and `beta`. The derived `Ord` compares the fields in
/// declaration order, so an rc always sorts above a beta of the same major/minor/patch
/// whatever their ordinals are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub rc: u64,
    pub beta: u64,
}

/// Error returned when a string is not a Go release identifier.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseGoVersionError(SmolStr);

impl ParseGoVersionError {
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParseGoVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version string: {}", self.0)
    }
}

impl std::error::Error for ParseGoVersionError {}

/// Splits a leading run of ASCII digits off `s` and parses it.
/// Returns `None` if there is no digit or the number does not fit in `u64`.
fn take_number(s: &str) -> Option<(u64, &str)> {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let (digits, rest) = s.split_at(end);
    Some((digits.parse().ok()?, rest))
}

impl FromStr for GoVersion {
    type Err = ParseGoVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseGoVersionError(s.into());

        let rest = s.strip_prefix("go").ok_or_else(invalid)?;
        let (major, rest) = take_number(rest).ok_or_else(invalid)?;
        let rest = rest.strip_prefix('.').ok_or_else(invalid)?;
        let (minor, mut rest) = take_number(rest).ok_or_else(invalid)?;

        let mut version = GoVersion {
            major,
            minor,
            ..Default::default()
        };

        if let Some(after_dot) = rest.strip_prefix('.') {
            (version.patch, rest) = take_number(after_dot).ok_or_else(invalid)?;
        }

        if let Some(after_rc) = rest.strip_prefix("rc") {
            (version.rc, rest) = take_number(after_rc).ok_or_else(invalid)?;
        } else if let Some(after_beta) = rest.strip_prefix("beta") {
            (version.beta, rest) = take_number(after_beta).ok_or_else(invalid)?;
        }

        if !rest.is_empty() {
            return Err(invalid());
        }

        Ok(version)
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go{}.{}", self.major, self.minor)?;
        if self.patch > 0 {
            write!(f, ".{}", self.patch)?;
        }
        if self.rc > 0 {
            write!(f, "rc{}", self.rc)?;
        }
        if self.beta > 0 {
            write!(f, "beta{}", self.beta)?;
        }
        Ok(())
    }
}
