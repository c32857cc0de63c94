use metrics::{describe_counter, Unit};

/// Registers help text for the moderation counters so `/metrics` is readable
/// before the first increment.
pub fn describe_metrics() {
    describe_counter!("moderation_reports_created_total", Unit::Count, "Reports submitted, by type");
    describe_counter!("moderation_reports_resolved_total", Unit::Count, "Reports resolved, by final status");
    describe_counter!(
        "moderation_resolution_conflicts_total",
        Unit::Count,
        "Resolutions rolled back because another moderator got there first"
    );
    describe_counter!("moderation_strikes_issued_total", Unit::Count, "Strikes issued, by source");
    describe_counter!("moderation_strikes_swept_total", Unit::Count, "Expired strikes deactivated");
    describe_counter!(
        "notifications_dispatch_failed_total",
        Unit::Count,
        "Post-commit notices or audit entries that could not be written"
    );
}
