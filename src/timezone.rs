//! Timezone resolution and local time conversion.
//!
//! Subscribers store an IANA zone identifier as free text. An absent or
//! unresolvable identifier degrades to [`DEFAULT_ZONE`] instead of failing
//! the caller, and the fallback is reported explicitly so callers and tests
//! can distinguish it from a clean resolution.

use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;

/// Zone used when a subscriber has no usable timezone identifier.
pub const DEFAULT_ZONE: Tz = chrono_tz::Europe::Moscow;

/// Outcome of resolving a stored timezone identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneResolution {
    Resolved(Tz),
    DefaultZone { reason: ZoneFallback },
}

/// Why resolution fell back to [`DEFAULT_ZONE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneFallback {
    /// No identifier stored for the subscriber.
    Missing,
    /// Identifier stored but not a known IANA zone.
    Unknown { id: String },
}

impl ZoneResolution {
    pub fn zone(&self) -> Tz {
        match self {
            Self::Resolved(tz) => *tz,
            Self::DefaultZone { .. } => DEFAULT_ZONE,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::DefaultZone { .. })
    }
}

/// Resolves a stored timezone identifier, falling back to [`DEFAULT_ZONE`].
pub fn resolve_zone(id: Option<&str>) -> ZoneResolution {
    match id {
        None => ZoneResolution::DefaultZone {
            reason: ZoneFallback::Missing,
        },
        Some(raw) => match raw.parse::<Tz>() {
            Ok(tz) => ZoneResolution::Resolved(tz),
            Err(_) => ZoneResolution::DefaultZone {
                reason: ZoneFallback::Unknown {
                    id: raw.to_string(),
                },
            },
        },
    }
}

/// Converts a UTC instant to the subscriber's local wall-clock time.
pub fn local_time(id: Option<&str>, utc: DateTime<Utc>) -> DateTime<Tz> {
    utc.with_timezone(&resolve_zone(id).zone())
}
