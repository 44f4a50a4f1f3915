//! The remediation rule set.
//!
//! Rules are evaluated per candidate, in stream order:
//! 1. 8 channels with no 5.1 present: synthesize a 5.1 track.
//! 2. No 2.0 present: synthesize a 2.0 AAC track from the 5.1 track, or
//!    from the 7.1 track when no 5.1 exists either.
//! 3. 2 channels that are not AAC: convert in place.
//! 4. 2/6/8 channels with the wrong title: retitle in place.
//!
//! Downmix rules read the inventory taken before planning started. Sources
//! are always streams of the input file: a 5.1 track created by rule 1 is
//! never the source of rule 2 in the same pass.

use super::events::EventLog;
use super::inventory::ChannelInventory;
use super::options::RemediationOptions;
use super::selector::CandidateStream;
use crate::probe::{FileMedium, ProbedFile};
use serde::Serialize;

/// Hands out audio-stream slots for tracks the plan creates.
///
/// Numbering starts right after the file's existing audio streams and is
/// never reused within one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAllocator {
    next: usize,
}

impl SlotAllocator {
    pub fn after_existing(audio_stream_count: usize) -> Self {
        Self {
            next: audio_stream_count,
        }
    }

    pub fn allocate(&mut self) -> usize {
        let slot = self.next;
        self.next += 1;
        slot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Create a 5.1 track from an 8 channel source.
    #[serde(rename = "downmix_8_to_6")]
    DownmixTo6From8 {
        source_index: usize,
        source_audio_index: usize,
        slot: usize,
        title: String,
    },
    /// Create a stereo AAC track from a 5.1 source (7.1 when no 5.1 exists).
    #[serde(rename = "downmix_6_to_2")]
    DownmixTo2From6 {
        source_index: usize,
        source_audio_index: usize,
        slot: usize,
        title: String,
    },
    /// Re-encode an existing stereo track to AAC.
    ConvertToAac {
        stream_index: usize,
        audio_index: usize,
    },
    /// Replace the title of an existing track.
    RenameTitle {
        stream_index: usize,
        audio_index: usize,
        channels: u32,
        title: String,
    },
}

impl Action {
    /// Whether this action adds a new stream to the output.
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Self::DownmixTo6From8 { .. } | Self::DownmixTo2From6 { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No capability flag was configured.
    Unconfigured,
    /// The file is not a video.
    NotVideo,
    /// Every rule was satisfied already.
    NothingToDo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub skip_reason: Option<SkipReason>,
    pub log: EventLog,
}

impl Plan {
    fn skipped(reason: SkipReason, log: EventLog) -> Self {
        Self {
            actions: Vec::new(),
            skip_reason: Some(reason),
            log,
        }
    }

    pub fn should_process(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Puts `earlier` in front of the events already recorded by the plan.
    pub fn prepend_log(&mut self, mut earlier: EventLog) {
        earlier.append(std::mem::take(&mut self.log));
        self.log = earlier;
    }
}

fn is_stereo_source(inventory: &ChannelInventory, channels: u32) -> bool {
    match channels {
        6 => inventory.has_6ch,
        8 => inventory.has_8ch && !inventory.has_6ch,
        _ => false,
    }
}

/// Decides which actions `file` needs.
///
/// `inventory` must describe `candidates`; it is read once and not updated as
/// actions are planned.
pub fn plan(
    file: &ProbedFile,
    inventory: &ChannelInventory,
    candidates: &[CandidateStream<'_>],
    options: &RemediationOptions,
) -> Plan {
    let mut log = EventLog::new();

    if options.is_unconfigured() {
        log.info("☒ No remediation option has been configured, please configure required options. Skipping this file.");
        return Plan::skipped(SkipReason::Unconfigured, log);
    }

    if file.file_medium != FileMedium::Video {
        log.debug("File is not video");
        log.info("☒ File is not video.");
        return Plan::skipped(SkipReason::NotVideo, log);
    }

    let capabilities = options.capabilities();
    let mut slots = SlotAllocator::after_existing(file.audio_stream_count());
    let mut actions = Vec::new();

    for candidate in candidates {
        let channels = candidate.channels();

        if capabilities.downmix {
            if inventory.has_8ch && !inventory.has_6ch && channels == 8 {
                actions.push(Action::DownmixTo6From8 {
                    source_index: candidate.absolute_index,
                    source_audio_index: candidate.relative_audio_index,
                    slot: slots.allocate(),
                    title: options.surround_6_title.clone(),
                });
                log.info("☒ Audio track is 8 channel, no 6 channel exists. Creating 6 channel from 8 channel.");
            }

            if !inventory.has_2ch && is_stereo_source(inventory, channels) {
                actions.push(Action::DownmixTo2From6 {
                    source_index: candidate.absolute_index,
                    source_audio_index: candidate.relative_audio_index,
                    slot: slots.allocate(),
                    title: options.stereo_title.clone(),
                });
                log.info(format!(
                    "☒ Audio track is {} channel, no 2 channel exists. Creating 2 channel from {} channel.",
                    channels, channels
                ));
            }
        }

        if capabilities.convert_to_aac
            && channels == 2
            && !candidate.stream.codec_name.eq_ignore_ascii_case("aac")
        {
            actions.push(Action::ConvertToAac {
                stream_index: candidate.absolute_index,
                audio_index: candidate.relative_audio_index,
            });
            log.info("☒ Audio track is 2 channel but is not AAC. Converting.");
        }

        if capabilities.rename {
            if let Some(title) = options.title_for_channels(channels) {
                if candidate.stream.title() != Some(title) {
                    actions.push(Action::RenameTitle {
                        stream_index: candidate.absolute_index,
                        audio_index: candidate.relative_audio_index,
                        channels,
                        title: title.to_string(),
                    });
                    log.info(format!(
                        "☒ Renaming {} channel audio track to \"{}\".",
                        channels, title
                    ));
                }
            }
        }
    }

    let skip_reason = if actions.is_empty() {
        Some(SkipReason::NothingToDo)
    } else {
        None
    };

    Plan {
        actions,
        skip_reason,
        log,
    }
}
