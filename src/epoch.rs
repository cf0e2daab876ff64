//! Conversions between QuickTime (1904-based) and Unix (1970-based) seconds.

use crate::error::{Error, Result};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Seconds between 1904-01-01T00:00:00Z and 1970-01-01T00:00:00Z.
pub const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// Mac-epoch seconds to Unix seconds. Negative for anything before 1970.
pub fn to_unix(mac: u32) -> i64 {
    mac as i64 - MAC_EPOCH_OFFSET
}

/// Unix seconds to Mac-epoch seconds, if the result fits in 32 bits.
pub fn to_mac_epoch(unix: i64) -> Result<u32> {
    unix.checked_add(MAC_EPOCH_OFFSET)
        .and_then(|mac| u32::try_from(mac).ok())
        .ok_or(Error::TimestampOutOfRange { unix })
}

pub fn mac_to_datetime(mac: u32) -> Result<OffsetDateTime> {
    let unix = to_unix(mac);
    OffsetDateTime::from_unix_timestamp(unix).map_err(|_| Error::TimestampOutOfRange { unix })
}

/// Sub-second precision is dropped.
pub fn datetime_to_mac(dt: OffsetDateTime) -> Result<u32> {
    to_mac_epoch(dt.unix_timestamp())
}

/// Parse RFC 3339 (`2020-01-02T03:04:05Z`) or `YYYY-MM-DD HH:MM:SS`, the
/// latter taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime> {
    let s = s.trim();
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }
    let plain = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(s, &plain)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| Error::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn mac_zero_is_1904() {
        assert_eq!(to_unix(0), -2_082_844_800);
        assert_eq!(mac_to_datetime(0).unwrap(), datetime!(1904-01-01 0:00 UTC));
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(
            to_mac_epoch(-MAC_EPOCH_OFFSET - 1),
            Err(Error::TimestampOutOfRange { .. })
        ));
        assert!(to_mac_epoch(u32::MAX as i64 - MAC_EPOCH_OFFSET).is_ok());
        assert!(to_mac_epoch(u32::MAX as i64 - MAC_EPOCH_OFFSET + 1).is_err());
        assert!(to_mac_epoch(i64::MAX).is_err());
    }

    #[test]
    fn parses_both_formats() {
        assert_eq!(
            parse_timestamp("2020-01-02T03:04:05Z").unwrap(),
            datetime!(2020-01-02 3:04:05 UTC)
        );
        assert_eq!(
            parse_timestamp("2020-01-02 03:04:05").unwrap(),
            datetime!(2020-01-02 3:04:05 UTC)
        );
        assert!(matches!(parse_timestamp("yesterday"), Err(Error::InvalidTimestamp(_))));
    }
}
