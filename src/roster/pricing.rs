//! Cost splitting

/// Per-person share of `hourly_rate * duration_hours`, rounded up.
///
/// Attendees beyond `capacity` are waitlisted and do not pay, so the divisor is
/// `min(attendee_count, capacity)`. An empty roster costs nobody anything.
pub fn per_person_cost(hourly_rate: u32, duration_hours: u32, attendee_count: usize, capacity: u32) -> u64 {
    let total = u64::from(hourly_rate) * u64::from(duration_hours);
    let billable = (attendee_count as u64).min(u64::from(capacity));

    if billable == 0 {
        return 0;
    }

    total.div_ceil(billable)
}
