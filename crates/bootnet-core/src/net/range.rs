// ── Inclusive address ranges ──

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::{AddressError, AddressFamily};

/// An inclusive, ordered span of same-family addresses.
///
/// `start <= end` is enforced at construction: a reversed pair is an
/// error, not an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: IpAddr,
    end: IpAddr,
}

impl AddressRange {
    pub fn new(start: IpAddr, end: IpAddr) -> Result<Self, AddressError> {
        if AddressFamily::of(start) != AddressFamily::of(end) {
            return Err(AddressError::MalformedRange {
                value: format!("{start}-{end}"),
                reason: "start and end belong to different address families".into(),
            });
        }
        if start > end {
            return Err(AddressError::MalformedRange {
                value: format!("{start}-{end}"),
                reason: format!("start address {start} is greater than end address {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one address.
    pub fn single(addr: IpAddr) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    pub fn start(&self) -> IpAddr {
        self.start
    }

    pub fn end(&self) -> IpAddr {
        self.end
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(self.start)
    }

    /// Whether `addr` falls within the range. Cross-family is always false.
    pub fn contains(&self, addr: IpAddr) -> bool {
        AddressFamily::of(addr) == self.family() && self.start <= addr && addr <= self.end
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for AddressRange {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

impl Serialize for AddressRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a single `<start>-<end>` range.
///
/// IPv6 addresses never contain `-`, so splitting on the first one is
/// unambiguous for both families.
pub fn parse_range(s: &str) -> Result<AddressRange, AddressError> {
    let malformed = |reason: &str| AddressError::MalformedRange {
        value: s.into(),
        reason: reason.into(),
    };

    let (start, end) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| malformed("expected <start>-<end>"))?;

    let start = start
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| malformed(&format!("invalid start address '{}'", start.trim())))?;
    let end = end
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| malformed(&format!("invalid end address '{}'", end.trim())))?;

    AddressRange::new(start, end).map_err(|err| match err {
        AddressError::MalformedRange { reason, .. } => malformed(&reason),
        other => other,
    })
}

/// Parse a comma-separated list of ranges, as stored in `ipv4.ovn.ranges`.
pub fn parse_ranges(s: &str) -> Result<Vec<AddressRange>, AddressError> {
    s.split(',')
        .map(|part| {
            if part.trim().is_empty() {
                Err(AddressError::MalformedRange {
                    value: s.into(),
                    reason: "empty entry in range list".into(),
                })
            } else {
                parse_range(part)
            }
        })
        .collect()
}

// ── Overlap ─────────────────────────────────────────────────────────

/// Whether two inclusive ranges share at least one address.
///
/// Ranges of different families never overlap.
pub fn ranges_overlap(a: &AddressRange, b: &AddressRange) -> bool {
    a.family() == b.family() && a.start <= b.end && b.start <= a.end
}
