//! Time formatting and allocation math

/// Format seconds as `MM:SS`.
///
/// Negative inputs are shown by magnitude and minutes are not wrapped into
/// hours, so an hour reads `60:00`.
pub fn format_time(seconds: i64) -> String {
    let abs_seconds = seconds.unsigned_abs();
    format!("{:02}:{:02}", abs_seconds / 60, abs_seconds % 60)
}

/// Seconds allotted to each participant: `floor(total_minutes * 60 / count)`.
///
/// Remainder seconds are dropped from the budget. Returns 0 for an empty
/// roster or a non-positive total.
pub fn time_per_participant(total_minutes: f64, participant_count: usize) -> u64 {
    if participant_count == 0 || !(total_minutes > 0.0) {
        return 0;
    }
    (total_minutes * 60.0 / participant_count as f64).floor() as u64
}
