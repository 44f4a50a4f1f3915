use super::events::EventLog;
use super::planner::{Action, Plan, SkipReason};
use crate::probe::ProbedFile;
use serde::Serialize;

/// Stereo fold-down used for every synthesized 2.0 track, followed by 4:1 compression.
pub const STEREO_DOWNMIX_FILTER: &str = "pan=stereo|FL=1.414*FC+0.707*FL+0.5*FLC+0.5*BL+0.5*SL+0.5*LFE|FR=1.414*FC+0.707*FR+0.5*FRC+0.5*BR+0.5*SR+0.5*LFE,acompressor=ratio=4";
pub const STEREO_BITRATE: &str = "320k";
pub const SURROUND_6_CODEC: &str = "ac3";
pub const MAX_MUXING_QUEUE_SIZE: u32 = 9999;

const PRESET_HEAD: [&str; 6] = ["-map", "0", "-c:v", "copy", "-c:a", "copy"];
const PRESET_TAIL: [&str; 6] = ["-c:s", "copy", "-c:d", "copy", "-c:t", "copy"];

impl Action {
    /// Transcoder arguments for this action, unquoted.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::DownmixTo6From8 {
                source_index,
                slot,
                title,
                ..
            } => vec![
                "-map".to_string(),
                format!("0:{}", source_index),
                format!("-c:a:{}", slot),
                SURROUND_6_CODEC.to_string(),
                format!("-ac:a:{}", slot),
                "6".to_string(),
                format!("-metadata:s:a:{}", slot),
                format!("title={}", title),
            ],
            Self::DownmixTo2From6 {
                source_index,
                slot,
                title,
                ..
            } => vec![
                "-map".to_string(),
                format!("0:{}", source_index),
                format!("-metadata:s:a:{}", slot),
                format!("title={}", title),
                format!("-c:a:{}", slot),
                "aac".to_string(),
                format!("-b:a:{}", slot),
                STEREO_BITRATE.to_string(),
                format!("-filter:a:{}", slot),
                STEREO_DOWNMIX_FILTER.to_string(),
            ],
            Self::ConvertToAac { audio_index, .. } => {
                vec![format!("-c:a:{}", audio_index), "aac".to_string()]
            }
            Self::RenameTitle {
                stream_index,
                title,
                ..
            } => vec![
                format!("-metadata:s:{}", stream_index),
                format!("title={}", title),
            ],
        }
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quotes a single argument the way the pipeline's preset strings expect.
fn render_arg(arg: &str) -> String {
    if let Some(title) = arg.strip_prefix("title=") {
        return format!("title=\"{}\"", escape_quoted(title));
    }

    if arg.contains(|c: char| c.is_whitespace() || c == '|' || c == '"' || c == '\\') {
        format!("\"{}\"", escape_quoted(arg))
    } else {
        arg.to_string()
    }
}

/// Arguments for every action, in plan order.
pub fn fragment_args(actions: &[Action]) -> Vec<String> {
    actions.iter().flat_map(Action::args).collect()
}

/// Renders the actions into a single argument string.
pub fn render_fragment(actions: &[Action]) -> String {
    fragment_args(actions)
        .iter()
        .map(|arg| render_arg(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn wrap_preset(fragment: Vec<String>) -> Vec<String> {
    PRESET_HEAD
        .iter()
        .map(|s| s.to_string())
        .chain(fragment)
        .chain(PRESET_TAIL.iter().map(|s| s.to_string()))
        .chain([
            "-max_muxing_queue_size".to_string(),
            MAX_MUXING_QUEUE_SIZE.to_string(),
        ])
        .collect()
}

/// The per-file outcome handed back to the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationDecision {
    pub process_file: bool,
    /// Output container with a leading dot, passed through from the input.
    pub container: String,
    /// Transcoder arguments, present only when the file should be processed.
    pub preset: Option<String>,
    pub actions: Vec<Action>,
    pub skip_reason: Option<SkipReason>,
    pub info_log: String,
    pub events: EventLog,
}

impl RemediationDecision {
    /// The preset as separate arguments, for hosts that spawn the transcoder directly.
    pub fn args(&self) -> Option<Vec<String>> {
        if self.process_file {
            Some(wrap_preset(fragment_args(&self.actions)))
        } else {
            None
        }
    }
}

/// Turns a finished plan into the decision for `file`.
pub fn emit(file: &ProbedFile, plan: Plan) -> RemediationDecision {
    let Plan {
        actions,
        skip_reason,
        mut log,
    } = plan;

    if skip_reason == Some(SkipReason::NothingToDo) {
        log.info("☑ File contains all required audio formats.");
    }

    let process_file = !actions.is_empty();
    let preset = process_file.then(|| {
        wrap_preset(fragment_args(&actions))
            .iter()
            .map(|arg| render_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    });

    RemediationDecision {
        process_file,
        container: format!(".{}", file.container),
        preset,
        actions,
        skip_reason,
        info_log: log.info_log(),
        events: log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbedStream;
    use pretty_assertions::assert_eq;

    fn downmix_8_to_6() -> Action {
        Action::DownmixTo6From8 {
            source_index: 1,
            source_audio_index: 0,
            slot: 1,
            title: "Surround 5.1".to_string(),
        }
    }

    fn downmix_6_to_2() -> Action {
        Action::DownmixTo2From6 {
            source_index: 1,
            source_audio_index: 0,
            slot: 2,
            title: "Stereo".to_string(),
        }
    }

    fn video_file() -> ProbedFile {
        ProbedFile::new(
            "mkv",
            vec![ProbedStream::video(0, "hevc"), ProbedStream::audio(1, "truehd", 8)],
        )
    }

    #[test]
    fn test_render_downmix_to_surround() {
        assert_eq!(
            render_fragment(&[downmix_8_to_6()]),
            "-map 0:1 -c:a:1 ac3 -ac:a:1 6 -metadata:s:a:1 title=\"Surround 5.1\""
        );
    }

    #[test]
    fn test_render_downmix_to_stereo() {
        assert_eq!(
            render_fragment(&[downmix_6_to_2()]),
            format!(
                "-map 0:1 -metadata:s:a:2 title=\"Stereo\" -c:a:2 aac -b:a:2 320k -filter:a:2 \"{}\"",
                STEREO_DOWNMIX_FILTER
            )
        );
    }

    #[test]
    fn test_render_in_place_actions() {
        let actions = [
            Action::ConvertToAac {
                stream_index: 3,
                audio_index: 1,
            },
            Action::RenameTitle {
                stream_index: 3,
                audio_index: 1,
                channels: 2,
                title: "My \"Stereo\"".to_string(),
            },
        ];
        assert_eq!(
            render_fragment(&actions),
            "-c:a:1 aac -metadata:s:3 title=\"My \\\"Stereo\\\"\""
        );
    }

    #[test]
    fn test_render_title_with_trailing_backslash() {
        let rename = Action::RenameTitle {
            stream_index: 1,
            audio_index: 0,
            channels: 2,
            title: "2.0\\".to_string(),
        };
        assert_eq!(render_fragment(&[rename]), r#"-metadata:s:1 title="2.0\\""#);
    }

    #[test]
    fn test_emit_wraps_fragment_in_copy_preset() {
        let plan = Plan {
            actions: vec![downmix_8_to_6()],
            skip_reason: None,
            log: EventLog::new(),
        };
        let decision = emit(&video_file(), plan);

        assert!(decision.process_file);
        assert_eq!(decision.container, ".mkv");
        assert_eq!(
            decision.preset.as_deref(),
            Some(
                "-map 0 -c:v copy -c:a copy -map 0:1 -c:a:1 ac3 -ac:a:1 6 -metadata:s:a:1 title=\"Surround 5.1\" -c:s copy -c:d copy -c:t copy -max_muxing_queue_size 9999"
            )
        );

        let args = decision.args().unwrap();
        assert_eq!(args[..6].join(" "), "-map 0 -c:v copy -c:a copy");
        assert!(args.contains(&"title=Surround 5.1".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("9999"));
    }

    #[test]
    fn test_emit_without_actions() {
        let plan = Plan {
            actions: Vec::new(),
            skip_reason: Some(SkipReason::NothingToDo),
            log: EventLog::new(),
        };
        let decision = emit(&video_file(), plan);

        assert!(!decision.process_file);
        assert!(decision.preset.is_none());
        assert!(decision.args().is_none());
        assert_eq!(
            decision.info_log,
            "☑ File contains all required audio formats.\n"
        );
    }

    #[test]
    fn test_emit_skipped_plan_keeps_its_reason() {
        let mut log = EventLog::new();
        log.info("☒ File is not video.");
        let plan = Plan {
            actions: Vec::new(),
            skip_reason: Some(SkipReason::NotVideo),
            log,
        };
        let decision = emit(&video_file(), plan);

        assert_eq!(decision.skip_reason, Some(SkipReason::NotVideo));
        assert_eq!(decision.info_log, "☒ File is not video.\n");
    }
}
