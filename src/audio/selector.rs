use super::classifier::is_commentary;
use super::events::EventLog;
use crate::probe::{ProbedFile, ProbedStream};

/// An audio stream the planner may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateStream<'a> {
    /// Position among all streams of the file.
    pub absolute_index: usize,
    /// Position among all audio streams, commentary tracks included.
    pub relative_audio_index: usize,
    pub stream: &'a ProbedStream,
}

impl CandidateStream<'_> {
    pub fn channels(&self) -> u32 {
        self.stream.channels
    }
}

/// Collects the non-commentary audio streams of `file`, in stream order.
///
/// When `language` is given only streams tagged with that language (compared
/// case-insensitively) are kept; untagged streams never match a filter.
pub fn select_candidates<'a>(
    file: &'a ProbedFile,
    language: Option<&str>,
    log: &mut EventLog,
) -> Vec<CandidateStream<'a>> {
    let mut candidates = Vec::new();

    for (relative_audio_index, stream) in file.audio_streams().enumerate() {
        if is_commentary(stream, log) {
            continue;
        }

        if let Some(language) = language {
            let matches = stream
                .language()
                .is_some_and(|l| l.eq_ignore_ascii_case(language));
            if !matches {
                continue;
            }
        }

        candidates.push(CandidateStream {
            absolute_index: stream.index,
            relative_audio_index,
            stream,
        });
    }

    match language {
        Some(language) => log.debug(format!(
            "Found {} audio streams for language \"{}\"",
            candidates.len(),
            language
        )),
        None => log.debug(format!("Found {} audio streams", candidates.len())),
    }

    candidates
}
