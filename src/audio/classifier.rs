use super::events::EventLog;
use crate::probe::ProbedStream;

const COMMENTARY_TOKENS: [&str; 3] = ["commentary", "comment", "director"];

fn has_commentary_token(value: &str) -> bool {
    let value = value.to_lowercase();
    COMMENTARY_TOKENS.iter().any(|token| value.contains(token))
}

/// Whether an audio stream looks like a commentary track, judged from its
/// `title` and `handler_name` tags. Non-audio streams are never commentary.
pub fn is_commentary(stream: &ProbedStream, log: &mut EventLog) -> bool {
    if !stream.is_audio() {
        return false;
    }

    let title = stream.title();
    let handler_name = stream.handler_name();

    let commentary = title.is_some_and(has_commentary_token)
        || handler_name.is_some_and(has_commentary_token);

    if commentary {
        log.debug(format!(
            "☒ Skipping commentary audio stream \"{}\"",
            title.or(handler_name).unwrap_or_default()
        ));
    }

    commentary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::events::LogLevel;

    #[test]
    fn test_title_match_is_case_insensitive() {
        let mut log = EventLog::new();
        let stream = ProbedStream::audio(1, "ac3", 2).with_title("DIRECTOR'S Cut Track");
        assert!(is_commentary(&stream, &mut log));

        let stream = ProbedStream::audio(1, "ac3", 2).with_title("Audio Commentary");
        assert!(is_commentary(&stream, &mut log));
    }

    #[test]
    fn test_handler_name_alone_is_enough() {
        let mut log = EventLog::new();
        let stream = ProbedStream::audio(2, "aac", 2)
            .with_title("English")
            .with_handler_name("Comments by cast");
        assert!(is_commentary(&stream, &mut log));
        assert_eq!(log.events()[0].level, LogLevel::Debug);
        assert!(log.events()[0].message.contains("English"));
    }

    #[test]
    fn test_non_audio_streams_are_never_commentary() {
        let mut log = EventLog::new();
        let stream = ProbedStream::subtitle(3, "subrip").with_title("Commentary subtitles");
        assert!(!is_commentary(&stream, &mut log));

        let stream = ProbedStream::video(0, "h264").with_handler_name("director");
        assert!(!is_commentary(&stream, &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_tags_are_not_commentary() {
        let mut log = EventLog::new();
        assert!(!is_commentary(&ProbedStream::audio(1, "dts", 6), &mut log));

        let stream = ProbedStream::audio(1, "dts", 6).with_language("eng");
        assert!(!is_commentary(&stream, &mut log));

        let stream = ProbedStream::audio(1, "dts", 6).with_title("Surround 5.1");
        assert!(!is_commentary(&stream, &mut log));
        assert!(log.is_empty());
    }
}
