//! GET /api/delay/:seconds - hold the response for a number of seconds.

use crate::types::{json_response, HttpResponse, Message};
use hyper::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Suspend for the requested delay, then answer.
///
/// If the client disconnects first, hyper drops this future and nothing is
/// written.
pub async fn handle_delay(seconds: &str) -> HttpResponse {
    let delay = delay_for(seconds);
    debug!("Delaying response by {:?}", delay);
    tokio::time::sleep(delay).await;

    json_response(
        StatusCode::OK,
        &Message::new(format!("Response delayed by {seconds} seconds")),
    )
}

/// Delay for a raw `:seconds` segment. Unparseable or negative values wait zero.
pub fn delay_for(seconds: &str) -> Duration {
    match parse_leading_int(seconds) {
        Some(n) if n > 0 => Duration::from_secs(n.unsigned_abs()),
        _ => Duration::ZERO,
    }
}

/// Parse the leading integer of a string.
///
/// Accepts leading whitespace, an optional sign and an optional `0x` prefix,
/// then reads digits until the first non-digit (`"2abc"` is 2, `"1.9"` is 1).
/// Returns `None` when no digit is found. Saturates instead of overflowing.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: Option<i64> = None;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(i64::from(radix))
                .saturating_add(i64::from(digit)),
        );
    }

    value.map(|v| if negative { -v } else { v })
}
