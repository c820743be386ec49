//! ⏱️ Date normalization — the source feed speaks second-precision naive,
//! the index speaks millisecond-precision Zulu. Someone has to translate.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

// 🔧 The feed's timestamps carry no zone and no sub-second digits.
// We take them at their word, stamp them UTC, and render what the
// `publication_date` date field in the mapping expects.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 🔄 Converts `"yyyy-MM-ddTHH:mm:ss"` → `"yyyy-MM-ddTHH:mm:ss.SSSZ"`.
///
/// Input is zone-naive and interpreted literally, then labelled UTC.
/// Anything that doesn't match the input pattern is an error — including
/// timestamps that show up wearing an explicit offset. No lenient mode.
pub(crate) fn normalize_publication_date(input: &str) -> Result<String> {
    let parsed = NaiveDateTime::parse_from_str(input, INPUT_FORMAT).with_context(|| {
        format!(
            "💀 '{input}' is not a timestamp this feed is supposed to contain. \
             Expected second-precision, zone-naive, ISO-shaped. Got... that."
        )
    })?;
    Ok(parsed.and_utc().format(OUTPUT_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_a_naive_timestamp_gets_its_zulu_badge() {
        // 🧪 The canonical happy path: seconds in, milliseconds-and-Z out.
        let normalized = normalize_publication_date("2024-01-15T10:30:00")
            .expect("a well-formed feed timestamp should normalize");
        assert_eq!(normalized, "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn the_one_where_midnight_on_a_leap_day_is_still_a_date() {
        // 🧪 Leap day, all zeros. chrono doesn't blink. Neither do we.
        let normalized = normalize_publication_date("2024-02-29T00:00:00").unwrap();
        assert_eq!(normalized, "2024-02-29T00:00:00.000Z");
    }

    #[test]
    fn the_one_where_not_a_date_is_in_fact_not_a_date() {
        assert!(normalize_publication_date("not-a-date").is_err());
    }

    #[test]
    fn the_one_where_an_explicit_offset_gets_bounced_at_the_door() {
        // 🧪 The contract says zone-naive. A "+02:00" tail is trailing input,
        // and trailing input is a parse error, not a negotiation.
        assert!(normalize_publication_date("2024-01-15T10:30:00+02:00").is_err());
    }

    #[test]
    fn the_one_where_a_date_without_a_time_is_only_half_a_timestamp() {
        assert!(normalize_publication_date("2024-01-15").is_err());
    }
}
