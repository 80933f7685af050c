use spacetimedb::{ScheduleAt, Timestamp};

/// Seconds elapsed between two reducer timestamps, if `now` is not before `last`.
pub fn get_variable_delta_time(now: Timestamp, last: Timestamp) -> Option<f32> {
    now.time_duration_since(last)
        .map(|dur| dur.to_micros() as f32 / 1_000_000.0)
}

/// Interval of a repeating schedule in seconds. One-shot schedules have no fixed delta.
pub fn get_fixed_delta_time(scheduled_at: ScheduleAt) -> Option<f32> {
    match scheduled_at {
        ScheduleAt::Interval(dt) => Some(dt.to_micros() as f32 / 1_000_000.0),
        _ => None,
    }
}
