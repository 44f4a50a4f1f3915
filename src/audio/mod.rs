//! Audio stream remediation.
//!
//! Given a probed file and a set of options, decides which audio tracks must
//! be downmixed, converted or retitled, and renders the transcoder arguments
//! that do it. Every call works on fresh state; nothing is shared between
//! files.

pub mod classifier;
pub mod emitter;
pub mod events;
pub mod inventory;
pub mod language;
pub mod options;
pub mod planner;
pub mod selector;

pub use classifier::is_commentary;
pub use emitter::{emit, render_fragment, RemediationDecision};
pub use events::{EventLog, LogEvent, LogLevel};
pub use inventory::ChannelInventory;
pub use language::{resolve_language, ResolvedLanguage};
pub use options::{Capabilities, RemediationOptions, Toggle};
pub use planner::{plan, Action, Plan, SkipReason, SlotAllocator};
pub use selector::{select_candidates, CandidateStream};

use crate::probe::ProbedFile;

/// Runs the whole decision pipeline for one file at a time.
#[derive(Debug, Clone)]
pub struct RemediationEngine {
    options: RemediationOptions,
}

impl RemediationEngine {
    pub fn new(options: RemediationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RemediationOptions {
        &self.options
    }

    pub fn evaluate(&self, file: &ProbedFile) -> RemediationDecision {
        let mut log = EventLog::new();

        let language = resolve_language(file, &self.options.language, &mut log);
        let candidates = select_candidates(file, Some(&language.code), &mut log);
        let inventory = ChannelInventory::from_candidates(&candidates);

        let mut plan = plan(file, &inventory, &candidates, &self.options);
        plan.prepend_log(log);

        emit(file, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbedStream;
    use pretty_assertions::assert_eq;

    fn engine(aac_stereo: Toggle, downmix: Toggle, rename: Toggle) -> RemediationEngine {
        RemediationEngine::new(RemediationOptions {
            aac_stereo,
            downmix,
            rename,
            ..RemediationOptions::default()
        })
    }

    #[test]
    fn test_engine_exposes_its_options() {
        let defaults = RemediationEngine::new(RemediationOptions::default());
        assert!(defaults.options().is_unconfigured());
        assert!(!engine(Toggle::Unset, Toggle::Disabled, Toggle::Unset)
            .options()
            .is_unconfigured());
    }

    #[test]
    fn test_language_fallback_drives_the_inventory() {
        // No English track: the 8 channel Spanish track decides the language,
        // and the Spanish selection already has every layout.
        let file = ProbedFile::new(
            "mkv",
            vec![
                ProbedStream::video(0, "hevc"),
                ProbedStream::audio(1, "truehd", 8).with_language("spa"),
                ProbedStream::audio(2, "ac3", 6).with_language("spa"),
                ProbedStream::audio(3, "aac", 2).with_language("spa"),
                ProbedStream::audio(4, "ac3", 6).with_language("fre"),
            ],
        );
        let decision = engine(Toggle::Enabled, Toggle::Enabled, Toggle::Unset).evaluate(&file);

        assert!(!decision.process_file);
        assert_eq!(decision.skip_reason, Some(SkipReason::NothingToDo));
    }

    #[test]
    fn test_preferred_language_is_downmixed_despite_other_layouts() {
        let file = ProbedFile::new(
            "mkv",
            vec![
                ProbedStream::video(0, "hevc"),
                ProbedStream::audio(1, "ac3", 2).with_language("spa"),
                ProbedStream::audio(2, "ac3", 6).with_language("spa"),
                ProbedStream::audio(3, "truehd", 8).with_language("eng"),
            ],
        );
        let decision = engine(Toggle::Disabled, Toggle::Enabled, Toggle::Unset).evaluate(&file);

        assert_eq!(
            decision.actions,
            vec![
                Action::DownmixTo6From8 {
                    source_index: 3,
                    source_audio_index: 2,
                    slot: 3,
                    title: "Surround 5.1".to_string(),
                },
                Action::DownmixTo2From6 {
                    source_index: 3,
                    source_audio_index: 2,
                    slot: 4,
                    title: "Stereo".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_log_keeps_diagnostics_out_of_info_log() {
        let file = ProbedFile::new(
            "mkv",
            vec![
                ProbedStream::video(0, "h264"),
                ProbedStream::audio(1, "ac3", 2).with_language("eng"),
            ],
        );
        let decision = engine(Toggle::Enabled, Toggle::Unset, Toggle::Unset).evaluate(&file);

        assert_eq!(
            decision.info_log,
            "☒ Audio track is 2 channel but is not AAC. Converting.\n"
        );
        assert!(decision.events.events().len() > 1);
        assert_eq!(
            decision.events.events()[0].message,
            "Found 1 audio streams"
        );
    }
}
