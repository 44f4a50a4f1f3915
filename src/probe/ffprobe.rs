use super::model::{CodecType, ProbedFile, ProbedStream, StreamTags};
use crate::utils::{Error, Result};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tokio::process::Command as TokioCommand;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
    #[serde(default)]
    format: Option<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    index: Option<usize>,
    codec_type: Option<String>,
    codec_name: Option<String>,
    channels: Option<u32>,
    tags: Option<RawTags>,
    disposition: Option<RawDisposition>,
}

/// Tag object in document order. Anything that is not an object is ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTags {
    Pairs(TagPairs),
    Other(IgnoredAny),
}

impl RawTags {
    fn into_tags(self) -> Option<StreamTags> {
        match self {
            Self::Pairs(TagPairs(pairs)) => Some(StreamTags::from_pairs(pairs)),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug)]
struct TagPairs(Vec<(String, String)>);

impl<'de> Deserialize<'de> for TagPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TagVisitor;

        impl<'de> Visitor<'de> for TagVisitor {
            type Value = TagPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of stream tags")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<TagPairs, A::Error> {
                let mut pairs = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    let value = match value {
                        Value::String(text) => text,
                        Value::Null => continue,
                        other => other.to_string(),
                    };
                    pairs.push((key, value));
                }
                Ok(TagPairs(pairs))
            }
        }

        deserializer.deserialize_map(TagVisitor)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDisposition {
    #[serde(default)]
    attached_pic: u8,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    filename: Option<String>,
    format_name: Option<String>,
}

impl RawStream {
    fn validate(self, position: usize) -> Result<ProbedStream> {
        if let Some(index) = self.index {
            if index != position {
                return Err(Error::validation(format!(
                    "stream at position {} reports index {}",
                    position, index
                )));
            }
        }

        let codec_type = self.codec_type.map(CodecType::from).ok_or_else(|| {
            Error::validation(format!("stream {} is missing codec_type", position))
        })?;

        let channels = match (&codec_type, self.channels) {
            (CodecType::Audio, Some(channels)) => channels,
            (CodecType::Audio, None) => {
                return Err(Error::validation(format!(
                    "audio stream {} is missing its channel count",
                    position
                )))
            }
            (_, channels) => channels.unwrap_or(0),
        };

        Ok(ProbedStream {
            index: position,
            codec_type,
            codec_name: self.codec_name.unwrap_or_default(),
            channels,
            tags: self.tags.and_then(RawTags::into_tags),
            attached_pic: self.disposition.unwrap_or_default().attached_pic == 1,
        })
    }
}

impl RawFormat {
    fn container(&self) -> Option<String> {
        let from_filename = self
            .filename
            .as_deref()
            .and_then(|f| Path::new(f).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        from_filename.or_else(|| {
            self.format_name
                .as_deref()
                .and_then(|n| n.split(',').next())
                .filter(|n| !n.is_empty())
                .map(|n| n.to_string())
        })
    }
}

/// Builds a [`ProbedFile`] from `ffprobe -print_format json -show_streams -show_format` output.
///
/// `container` overrides whatever the format section says. Records missing a
/// field the planner reads fail with [`Error::Validation`].
pub fn parse_probe_output(json: &str, container: Option<&str>) -> Result<ProbedFile> {
    let raw: RawProbe = serde_json::from_str(json)?;

    let container = container
        .map(|c| c.trim_start_matches('.').to_lowercase())
        .or_else(|| raw.format.as_ref().and_then(RawFormat::container))
        .unwrap_or_default();

    let streams = raw
        .streams
        .into_iter()
        .enumerate()
        .map(|(position, stream)| stream.validate(position))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProbedFile::new(container, streams))
}

/// Thin adapter around the external `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct Prober {
    ffprobe_path: String,
}

impl Prober {
    pub fn new(ffprobe_path: String) -> Self {
        Self { ffprobe_path }
    }

    pub async fn check_availability(&self) -> Result<()> {
        let output = TokioCommand::new(&self.ffprobe_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| Error::probe(format!("Failed to run {}: {}", self.ffprobe_path, e)))?;

        if !output.status.success() {
            return Err(Error::probe(format!(
                "{} -version exited with {}",
                self.ffprobe_path, output.status
            )));
        }

        Ok(())
    }

    pub async fn probe<P: AsRef<Path>>(&self, input_path: P) -> Result<ProbedFile> {
        let input_path = input_path.as_ref();
        debug!("Probing streams: {}", input_path.display());

        let output = TokioCommand::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(input_path)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(Error::probe(format!(
                "ffprobe failed for {}: {}",
                input_path.display(),
                error_msg.trim()
            )));
        }

        let container = input_path.extension().and_then(|e| e.to_str());
        parse_probe_output(&String::from_utf8_lossy(&output.stdout), container)
    }
}
