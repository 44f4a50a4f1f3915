use chrono::Local;
use console::style;
use std::fmt::{self as std_fmt, Debug};
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    /// A file is starting.
    Root,
    /// Remediation needed ("☒").
    Action,
    /// Nothing to do ("☑").
    Satisfied,
    Plain,
}

fn classify_message(message: &str) -> MessageKind {
    if message.starts_with("Processing file") {
        MessageKind::Root
    } else if message.starts_with('☒') {
        MessageKind::Action
    } else if message.starts_with('☑') {
        MessageKind::Satisfied
    } else {
        MessageKind::Plain
    }
}

pub struct CleanFormatter {
    show_timestamps: bool,
    use_color: bool,
}

impl CleanFormatter {
    pub fn new(show_timestamps: bool, use_color: bool) -> Self {
        Self {
            show_timestamps,
            use_color,
        }
    }

    fn format_level(&self, level: &Level) -> String {
        let label = match *level {
            Level::ERROR => "ERROR",
            Level::WARN => "WARN ",
            Level::INFO => return String::new(),
            Level::DEBUG => "DEBUG",
            Level::TRACE => "TRACE",
        };

        if !self.use_color {
            return label.to_string();
        }

        match *level {
            Level::ERROR => style(label).red().bold().to_string(),
            Level::WARN => style(label).yellow().to_string(),
            Level::DEBUG => style(label).blue().to_string(),
            _ => style(label).magenta().to_string(),
        }
    }

    fn format_message(&self, message: &str) -> String {
        let kind = classify_message(message);
        let prefix = match kind {
            MessageKind::Root => "▶",
            _ => " ",
        };

        let body = if self.use_color {
            match kind {
                MessageKind::Root => style(message).bold().cyan().to_string(),
                MessageKind::Action => style(message).yellow().to_string(),
                MessageKind::Satisfied => style(message).green().to_string(),
                MessageKind::Plain => message.to_string(),
            }
        } else {
            message.to_string()
        };

        format!("{} {}", prefix, body)
    }
}

impl<S, N> FormatEvent<S, N> for CleanFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std_fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut output = String::new();

        if self.show_timestamps {
            let now = Local::now().format("%H:%M:%S").to_string();
            let timestamp = if self.use_color {
                style(now).dim().to_string()
            } else {
                now
            };
            output.push_str(&format!("[{}] ", timestamp));
        }

        let level = self.format_level(event.metadata().level());
        if !level.is_empty() {
            output.push_str(&level);
            output.push(' ');
        }

        output.push_str(&self.format_message(&visitor.message));

        writeln!(writer, "{}", output)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value).trim_matches('"').to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message() {
        assert_eq!(
            classify_message("Processing file 1/3: movie.mkv"),
            MessageKind::Root
        );
        assert_eq!(
            classify_message("☒ File is not video."),
            MessageKind::Action
        );
        assert_eq!(
            classify_message("☑ File contains all required audio formats."),
            MessageKind::Satisfied
        );
        assert_eq!(classify_message("Found 2 audio streams"), MessageKind::Plain);
    }

    #[test]
    fn test_plain_formatting_without_color() {
        let formatter = CleanFormatter::new(false, false);
        assert_eq!(formatter.format_level(&Level::INFO), "");
        assert_eq!(formatter.format_level(&Level::WARN), "WARN ");
        assert_eq!(
            formatter.format_message("Processing file 1/1: a.mkv"),
            "▶ Processing file 1/1: a.mkv"
        );
        assert_eq!(formatter.format_message("☒ File is not video."), "  ☒ File is not video.");
    }
}
