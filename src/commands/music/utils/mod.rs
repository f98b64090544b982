// Export music utilities
pub mod embedded_messages;
pub mod event_handlers;
pub mod guild_context;
pub mod guild_registry;
pub mod music_manager;
pub mod notifier;
pub mod queue_manager;
pub mod voice;

/// Format a duration in seconds into a human-readable string
/// (e.g. "1 hours, 2 minutes, 5 seconds"). Zero-valued components are left out,
/// so a zero duration renders as an empty string.
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    [(days, "days"), (hours, "hours"), (minutes, "minutes"), (seconds, "seconds")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{} {}", value, unit))
        .collect::<Vec<_>>()
        .join(", ")
}
