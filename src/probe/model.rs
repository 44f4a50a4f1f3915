use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stream kind as reported by the prober's `codec_type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Other(String),
}

impl CodecType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
            Self::Attachment => "attachment",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for CodecType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "video" => Self::Video,
            "audio" => Self::Audio,
            "subtitle" => Self::Subtitle,
            "data" => Self::Data,
            "attachment" => Self::Attachment,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for CodecType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CodecType> for String {
    fn from(value: CodecType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMedium {
    Video,
    Audio,
    Other,
}

impl FileMedium {
    /// Any non-cover-art video stream makes the file a video; otherwise any
    /// audio stream makes it audio.
    pub fn infer(streams: &[ProbedStream]) -> Self {
        if streams
            .iter()
            .any(|s| s.codec_type == CodecType::Video && !s.attached_pic)
        {
            Self::Video
        } else if streams.iter().any(ProbedStream::is_audio) {
            Self::Audio
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Other => "other",
        }
    }
}

impl FromStr for FileMedium {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Self::Video, Self::Audio, Self::Other]
            .into_iter()
            .find(|medium| s.trim().eq_ignore_ascii_case(medium.as_str()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid file medium: '{}' (expected video, audio or other)",
                    s
                ))
            })
    }
}

impl fmt::Display for FileMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stream tags the planner reads. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl StreamTags {
    /// Collects the known tags from raw key/value pairs. Keys match regardless
    /// of case and the first value seen for a key wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut tags = Self::default();
        for (key, value) in pairs {
            let slot = match key.to_lowercase().as_str() {
                "title" => &mut tags.title,
                "handler_name" => &mut tags.handler_name,
                "language" => &mut tags.language,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbedStream {
    /// Position among all streams of the file.
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: String,
    /// Channel count; zero for non-audio streams.
    pub channels: u32,
    pub tags: Option<StreamTags>,
    pub attached_pic: bool,
}

impl ProbedStream {
    pub fn audio(index: usize, codec_name: &str, channels: u32) -> Self {
        Self {
            index,
            codec_type: CodecType::Audio,
            codec_name: codec_name.to_string(),
            channels,
            tags: None,
            attached_pic: false,
        }
    }

    pub fn video(index: usize, codec_name: &str) -> Self {
        Self {
            index,
            codec_type: CodecType::Video,
            codec_name: codec_name.to_string(),
            channels: 0,
            tags: None,
            attached_pic: false,
        }
    }

    pub fn subtitle(index: usize, codec_name: &str) -> Self {
        Self {
            index,
            codec_type: CodecType::Subtitle,
            codec_name: codec_name.to_string(),
            channels: 0,
            tags: None,
            attached_pic: false,
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.tags.get_or_insert_with(StreamTags::default).language = Some(language.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.tags.get_or_insert_with(StreamTags::default).title = Some(title.to_string());
        self
    }

    pub fn with_handler_name(mut self, handler_name: &str) -> Self {
        self.tags.get_or_insert_with(StreamTags::default).handler_name =
            Some(handler_name.to_string());
        self
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type == CodecType::Audio
    }

    pub fn title(&self) -> Option<&str> {
        self.tags.as_ref().and_then(|t| t.title.as_deref())
    }

    pub fn handler_name(&self) -> Option<&str> {
        self.tags.as_ref().and_then(|t| t.handler_name.as_deref())
    }

    pub fn language(&self) -> Option<&str> {
        self.tags.as_ref().and_then(|t| t.language.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbedFile {
    /// Format extension without the leading dot, e.g. `mkv`.
    pub container: String,
    pub file_medium: FileMedium,
    pub streams: Vec<ProbedStream>,
}

impl ProbedFile {
    pub fn new<S: Into<String>>(container: S, streams: Vec<ProbedStream>) -> Self {
        Self {
            container: container.into(),
            file_medium: FileMedium::infer(&streams),
            streams,
        }
    }

    pub fn with_medium(mut self, file_medium: FileMedium) -> Self {
        self.file_medium = file_medium;
        self
    }

    /// Number of audio streams, commentary included. Synthetic slots start here.
    pub fn audio_stream_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_audio()).count()
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &ProbedStream> {
        self.streams.iter().filter(|s| s.is_audio())
    }
}
