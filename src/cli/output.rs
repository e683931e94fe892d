//! CLI output formatting

use crate::publish::PublishEvent;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Visual separator printed before each service
pub fn separator() -> String {
    style("─".repeat(60)).dim().to_string()
}

/// Format a publish event for the console.
///
/// Returns `None` for events that are only interesting at debug level;
/// those are covered by tracing instead.
pub fn format_publish_event(event: &PublishEvent) -> Option<String> {
    match event {
        PublishEvent::RunStarted { total, .. } => Some(format!(
            "{} Publishing {} service image(s)",
            ROCKET,
            style(total).bold()
        )),
        PublishEvent::ServiceStarted { service } => Some(format!(
            "{}\n{} Building and pushing {}",
            separator(),
            INFO,
            style(service).bold()
        )),
        PublishEvent::ServiceSkipped { service } => Some(format!(
            "{} Skipping {}: directory not found\n",
            WARN,
            style(service).yellow()
        )),
        PublishEvent::BuildFailed { service, error, .. } => Some(format!(
            "{} Build failed for {}: {}",
            CROSS,
            style(service).red(),
            style(error).dim()
        )),
        PublishEvent::PushFailed { service, error, .. } => Some(format!(
            "{} Push failed for {}: {}",
            CROSS,
            style(service).red(),
            style(error).dim()
        )),
        PublishEvent::ServicePublished { tag, .. } => Some(format!(
            "{} Successfully pushed {}\n",
            CHECK,
            style(tag).green()
        )),
        PublishEvent::RunCompleted {
            published,
            skipped,
            failed,
            halted,
            ..
        } => {
            if *halted {
                Some(format!(
                    "{} Run halted after a failure ({} pushed, {} skipped, {} failed)",
                    CROSS,
                    style(published).green(),
                    style(skipped).yellow(),
                    style(failed).red()
                ))
            } else {
                Some(format!(
                    "{} All services processed ({} pushed, {} skipped, {} failed)",
                    CHECK,
                    style(published).green(),
                    style(skipped).yellow(),
                    style(failed).red()
                ))
            }
        }
        // Intermediate build/push progress is visible via the docker CLI
        // itself and via --verbose tracing
        PublishEvent::ImageBuilt { .. } | PublishEvent::ImagePushed { .. } => None,
    }
}
