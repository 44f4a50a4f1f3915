use super::selector::CandidateStream;
use serde::Serialize;

/// Which of the stereo, 5.1 and 7.1 layouts exist among the candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelInventory {
    pub has_2ch: bool,
    pub has_6ch: bool,
    pub has_8ch: bool,
}

impl ChannelInventory {
    pub fn from_candidates(candidates: &[CandidateStream<'_>]) -> Self {
        candidates
            .iter()
            .fold(Self::default(), |mut inventory, candidate| {
                match candidate.channels() {
                    2 => inventory.has_2ch = true,
                    6 => inventory.has_6ch = true,
                    8 => inventory.has_8ch = true,
                    _ => {}
                }
                inventory
            })
    }
}
