//! Probed media description and ffprobe ingestion.

pub mod ffprobe;
pub mod model;

pub use ffprobe::{parse_probe_output, Prober};
pub use model::{CodecType, FileMedium, ProbedFile, ProbedStream, StreamTags};
