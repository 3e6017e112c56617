// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::{Serializer, ser::Error as _};
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds (`...T11:09:00.000Z`).
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Serialize a UNIX timestamp (seconds) in the same RFC 3339 form as [`to_rfc3339_ms`].
pub fn unix_secs_to_rfc3339_ms<S>(secs: &u64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let secs = i64::try_from(*secs).map_err(S::Error::custom)?;
    let dt = DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| S::Error::custom("timestamp out of range"))?;
    to_rfc3339_ms(&dt, s)
}
