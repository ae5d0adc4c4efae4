//! The portal's core state: adaptive polling, snapshot reconciliation and
//! the focus timer, kept free of browser types so it unit-tests on the host.

pub mod controller;
pub mod focus;
pub mod merge;
pub mod poller;

use chrono::DateTime;

/// Millisecond wall-clock timestamps (what `js_sys::Date::now` hands out)
/// rendered as RFC 3339 for the ledger.
pub(crate) fn rfc3339_from_ms(ms: f64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
