use super::events::EventLog;
use super::selector::select_candidates;
use crate::probe::ProbedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    pub code: String,
    /// Channel count of the stream that decided the language, zero when none did.
    pub channels: u32,
}

/// Picks the language the planner works in.
///
/// The first non-commentary stream tagged with `preferred` wins outright.
/// Otherwise the language of the stream with the most channels is used,
/// earlier streams winning ties. With no language tags at all, `preferred`
/// is returned unchanged.
pub fn resolve_language(file: &ProbedFile, preferred: &str, log: &mut EventLog) -> ResolvedLanguage {
    let mut resolved = ResolvedLanguage {
        code: preferred.to_string(),
        channels: 0,
    };

    for candidate in select_candidates(file, None, log) {
        let Some(language) = candidate.stream.language() else {
            continue;
        };

        if language.eq_ignore_ascii_case(preferred) {
            resolved = ResolvedLanguage {
                code: preferred.to_string(),
                channels: candidate.channels(),
            };
            break;
        }

        if candidate.channels() > resolved.channels {
            resolved = ResolvedLanguage {
                code: language.to_lowercase(),
                channels: candidate.channels(),
            };
        }
    }

    log.debug(format!(
        "Audio stream language will be set to \"{}\" (channels: {})",
        resolved.code, resolved.channels
    ));

    resolved
}
