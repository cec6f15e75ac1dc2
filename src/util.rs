use chrono::{DateTime, Utc};

/// Generate an opaque unique id for a new entity.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse an ISO datetime string and return whole days elapsed before `now`.
///
/// Accepts RFC 3339 with an offset or a bare `Z` suffix. Returns `None` for
/// unparseable input.
pub fn days_between_iso(iso: &str, now: DateTime<Utc>) -> Option<i64> {
    parse_iso(iso).map(|dt| (now - dt).num_days())
}

/// Days elapsed since an ISO datetime, measured from the current wall clock.
pub fn days_since_iso(iso: &str) -> Option<i64> {
    days_between_iso(iso, Utc::now())
}

/// Parse an ISO datetime string into UTC.
pub fn parse_iso(iso: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso)
        .or_else(|_| {
            DateTime::parse_from_rfc3339(&format!("{}+00:00", iso.trim_end_matches('Z')))
        })
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First name of a full name ("Sophie Dubois" → "Sophie").
pub fn first_name(full: &str) -> &str {
    full.split_whitespace().next().unwrap_or(full)
}
