use crate::utils::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A capability flag that remembers whether it was configured at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Toggle {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl Toggle {
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }

    pub fn is_set(self) -> bool {
        self != Self::Unset
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Enabled => "true",
            Self::Disabled => "false",
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl FromStr for Toggle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(Self::Unset),
            "true" => Ok(Self::Enabled),
            "false" => Ok(Self::Disabled),
            other => Err(Error::validation(format!(
                "Invalid flag value: '{}' (expected true, false or empty)",
                other
            ))),
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Toggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Enabled => serializer.serialize_bool(true),
            Self::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Toggle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawToggle {
            Flag(bool),
            Text(String),
        }

        match Option::<RawToggle>::deserialize(deserializer)? {
            None => Ok(Self::Unset),
            Some(RawToggle::Flag(flag)) => Ok(flag.into()),
            Some(RawToggle::Text(text)) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// The rule families the planner may apply to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub downmix: bool,
    pub convert_to_aac: bool,
    pub rename: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationOptions {
    /// Convert 2.0 tracks that are not AAC.
    pub aac_stereo: Toggle,
    /// Create missing 5.1/2.0 tracks from higher channel counts.
    pub downmix: Toggle,
    /// Retitle 2.0/5.1/7.1 tracks.
    pub rename: Toggle,
    /// Preferred ISO-639 language to work in.
    pub language: String,
    pub stereo_title: String,
    pub surround_6_title: String,
    pub surround_8_title: String,
}

impl Default for RemediationOptions {
    fn default() -> Self {
        Self {
            aac_stereo: Toggle::Unset,
            downmix: Toggle::Unset,
            rename: Toggle::Unset,
            language: "eng".to_string(),
            stereo_title: "Stereo".to_string(),
            surround_6_title: "Surround 5.1".to_string(),
            surround_8_title: "Surround 7.1".to_string(),
        }
    }
}

impl RemediationOptions {
    /// True when no capability flag was configured, as opposed to configured off.
    pub fn is_unconfigured(&self) -> bool {
        !self.aac_stereo.is_set() && !self.downmix.is_set() && !self.rename.is_set()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            downmix: self.downmix.is_enabled(),
            convert_to_aac: self.aac_stereo.is_enabled(),
            rename: self.rename.is_enabled(),
        }
    }

    /// Configured title for a 2, 6 or 8 channel track.
    pub fn title_for_channels(&self, channels: u32) -> Option<&str> {
        match channels {
            2 => Some(self.stereo_title.as_str()),
            6 => Some(self.surround_6_title.as_str()),
            8 => Some(self.surround_8_title.as_str()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let language_ok = (2..=3).contains(&self.language.len())
            && self.language.chars().all(|c| c.is_ascii_alphabetic());
        if !language_ok {
            return Err(Error::validation(format!(
                "Invalid language code: '{}' (expected a 2 or 3 letter ISO-639 code)",
                self.language
            )));
        }

        for (name, title) in [
            ("stereo_title", &self.stereo_title),
            ("surround_6_title", &self.surround_6_title),
            ("surround_8_title", &self.surround_8_title),
        ] {
            if title.trim().is_empty() {
                return Err(Error::validation(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}
