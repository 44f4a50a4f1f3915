//! Structured log collected while a file is evaluated.
//!
//! The decision engine never writes to a logger directly. Each component
//! appends [`LogEvent`]s to an [`EventLog`] which the caller may render into
//! the pipeline info log or replay into `tracing`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Diagnostics about how streams were read.
    Debug,
    /// Decision lines that belong in the pipeline info log.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<LogEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug<T: Into<String>>(&mut self, message: T) {
        self.push(LogLevel::Debug, message);
    }

    pub fn info<T: Into<String>>(&mut self, message: T) {
        self.push(LogLevel::Info, message);
    }

    fn push<T: Into<String>>(&mut self, level: LogLevel, message: T) {
        self.events.push(LogEvent {
            level,
            message: message.into(),
        });
    }

    /// Moves every event of `other` to the end of this log.
    pub fn append(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Renders the info-level lines, one per line, each newline-terminated.
    pub fn info_log(&self) -> String {
        self.events
            .iter()
            .filter(|e| e.level == LogLevel::Info)
            .map(|e| format!("{}\n", e.message))
            .collect()
    }

    /// Forwards every event to the active `tracing` subscriber.
    pub fn replay(&self) {
        for event in &self.events {
            match event.level {
                LogLevel::Debug => tracing::debug!("{}", event.message),
                LogLevel::Info => tracing::info!("{}", event.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_log_skips_diagnostics() {
        let mut log = EventLog::new();
        log.debug("Found 2 audio streams");
        log.info("☒ Audio track is 2 channel but is not AAC. Converting.");
        log.debug("ignored");
        log.info("second");

        assert_eq!(
            log.info_log(),
            "☒ Audio track is 2 channel but is not AAC. Converting.\nsecond\n"
        );
        assert_eq!(log.events().len(), 4);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut first = EventLog::new();
        first.debug("a");
        let mut second = EventLog::new();
        second.info("b");
        second.debug("c");

        first.append(second);
        let messages: Vec<_> = first.events().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_log_renders_empty_string() {
        assert_eq!(EventLog::new().info_log(), "");
        assert!(EventLog::new().is_empty());
    }
}
