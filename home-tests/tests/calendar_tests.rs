//! Integration Tests für Kalender und Zeitbasis
//!
//! Die Umrechnung wird gegen chrono geprüft.

use chrono::{Datelike, Timelike};
use home_core::DateTime;
use home_core::calendar::days_in_month;
use home_core::sntp::{NTP_UNIX_OFFSET, TimeBase, build_request, parse_response};

fn chrono_parts(secs: u64) -> (u16, u8, u8, u8, u8, u8) {
    let dt = chrono::DateTime::from_timestamp(secs as i64, 0).unwrap();
    (
        dt.year() as u16,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
    )
}

fn parts(dt: DateTime) -> (u16, u8, u8, u8, u8, u8) {
    (dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second)
}

// ============================================================================
// Tests: Kalender
// ============================================================================

#[test]
fn test_every_day_matches_chrono() {
    // 1970-01-01 bis 2106-02-07, Uhrzeit wandert über den Tag
    let last_day = u32::MAX as u64 / 86_400;
    for day in 0..last_day {
        let secs = day * 86_400 + (day * 7_919) % 86_400;
        assert_eq!(
            parts(DateTime::from_unix(secs)),
            chrono_parts(secs),
            "unix {}",
            secs
        );
    }
}

#[test]
fn test_days_in_month_matches_chrono() {
    for year in 1970u16..2110 {
        for month in 1u8..=12 {
            let first = chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, 1).unwrap();
            let next = if month == 12 {
                chrono::NaiveDate::from_ymd_opt(year as i32 + 1, 1, 1).unwrap()
            } else {
                chrono::NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1).unwrap()
            };
            let expected = (next - first).num_days() as u8;
            assert_eq!(days_in_month(year, month), expected, "{}-{}", year, month);
        }
    }
}

#[test]
fn test_offset_matches_chrono() {
    // 2024-10-27 00:30:00 UTC
    let secs = 1_729_989_000u64;
    for offset in [-43_200i32, -3_600, 0, 3_600, 7_200, 50_400] {
        let expected = chrono_parts((secs as i64 + offset as i64) as u64);
        assert_eq!(
            parts(DateTime::from_unix_with_offset(secs, offset)),
            expected,
            "offset {}",
            offset
        );
    }
}

#[test]
fn test_display_format() {
    let dt = DateTime::from_unix(1_709_210_096);
    assert_eq!(dt.to_string(), "29.02.2024 12:34:56");
}

// ============================================================================
// Tests: SNTP und Zeitbasis
// ============================================================================

#[test]
fn test_sntp_exchange_into_local_time() {
    let request = build_request();
    assert_eq!(request.len(), 48);

    // Antwort: 2024-06-30 21:59:30 UTC
    let unix = 1_719_784_770u64;
    let mut reply = [0u8; 48];
    reply[0] = 0x24;
    reply[1] = 1;
    reply[40..44].copy_from_slice(&((unix + NTP_UNIX_OFFSET) as u32).to_be_bytes());
    assert_eq!(parse_response(&reply), Ok(unix));

    // Synchronisiert bei Laufzeit 12 s; 45 s später, Sommerzeit +2h
    let base = TimeBase::new(unix, 12_000);
    let local = base.local_now(57_000, 7_200);
    assert_eq!(parts(local), chrono_parts(unix + 45 + 7_200));
    assert_eq!((local.month, local.day, local.hour), (7, 1, 0));
}
