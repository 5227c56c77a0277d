/// Current UTC timestamp in milliseconds.
///
/// All persisted timestamps (creation times, order dates, price-history
/// entries, ban dates) use epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
