use crate::audio::{RemediationOptions, Toggle};
use crate::probe::FileMedium;
use crate::utils::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(name = "audio-remediate")]
#[command(
    about = "Plans FFmpeg arguments that bring a media library's audio tracks to a consistent layout"
)]
#[command(long_about = "
Inspects the audio streams of each input file and prints the FFmpeg arguments
needed to add missing 5.1/2.0 downmixes, convert stereo tracks to AAC and
retitle tracks. Nothing is transcoded; run the printed arguments yourself.

EXAMPLES:
  # Downmix and AAC conversion for a single file
  audio-remediate -i movie.mkv --downmix true --aac-stereo true

  # Retitle tracks across a library, JSON output
  audio-remediate -i ~/Videos/ --rename true --format json

  # Plan from saved ffprobe output
  audio-remediate --probe-json movie.json --downmix true
")]
pub struct CliArgs {
    /// Media file or directory to inspect (can be specified multiple times)
    #[arg(short, long, value_name = "PATH", action = clap::ArgAction::Append)]
    pub input: Vec<PathBuf>,

    /// Saved `ffprobe -print_format json -show_streams -show_format` output
    #[arg(long, value_name = "FILE", action = clap::ArgAction::Append)]
    pub probe_json: Vec<PathBuf>,

    /// Configuration file path
    #[arg(long, default_value = "config.yaml", value_name = "FILE")]
    pub config: PathBuf,

    /// Convert 2.0 tracks that are not AAC (true/false)
    #[arg(long, value_name = "BOOL")]
    pub aac_stereo: Option<Toggle>,

    /// Create missing 5.1 and 2.0 tracks (true/false)
    #[arg(long, value_name = "BOOL")]
    pub downmix: Option<Toggle>,

    /// Retitle 2.0, 5.1 and 7.1 tracks (true/false)
    #[arg(long, value_name = "BOOL")]
    pub rename: Option<Toggle>,

    /// Preferred ISO-639 language
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Title for stereo tracks
    #[arg(long, value_name = "TITLE")]
    pub stereo_title: Option<String>,

    /// Title for 6 channel tracks
    #[arg(long = "surround-6-title", value_name = "TITLE")]
    pub surround_6_title: Option<String>,

    /// Title for 8 channel tracks
    #[arg(long = "surround-8-title", value_name = "TITLE")]
    pub surround_8_title: Option<String>,

    /// Treat every input as this medium (video/audio/other) instead of inferring it
    #[arg(long, value_name = "MEDIUM")]
    pub medium: Option<FileMedium>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate_config: bool,

    /// Print the effective configuration
    #[arg(long)]
    pub show_config: bool,
}

impl CliArgs {
    pub fn get_log_level<'a>(&self, config_level: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else {
            config_level
        }
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_info_command(&self) -> bool {
        self.validate_config || self.show_config
    }

    pub fn has_inputs(&self) -> bool {
        !self.input.is_empty() || !self.probe_json.is_empty()
    }

    /// Applies command line overrides on top of the configured options.
    pub fn apply_overrides(&self, options: &mut RemediationOptions) {
        if let Some(toggle) = self.aac_stereo {
            options.aac_stereo = toggle;
        }
        if let Some(toggle) = self.downmix {
            options.downmix = toggle;
        }
        if let Some(toggle) = self.rename {
            options.rename = toggle;
        }
        if let Some(language) = &self.language {
            options.language = language.clone();
        }
        if let Some(title) = &self.stereo_title {
            options.stereo_title = title.clone();
        }
        if let Some(title) = &self.surround_6_title {
            options.surround_6_title = title.clone();
        }
        if let Some(title) = &self.surround_8_title {
            options.surround_8_title = title.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        for path in self.input.iter().chain(&self.probe_json) {
            if !path.exists() {
                return Err(Error::validation(format!(
                    "Input path does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "audio-remediate",
            "--downmix",
            "true",
            "--aac-stereo",
            "false",
            "--language",
            "jpn",
            "--surround-6-title",
            "5.1",
        ]);

        let mut options = RemediationOptions {
            rename: Toggle::Enabled,
            ..RemediationOptions::default()
        };
        args.apply_overrides(&mut options);

        assert_eq!(options.downmix, Toggle::Enabled);
        assert_eq!(options.aac_stereo, Toggle::Disabled);
        assert_eq!(options.rename, Toggle::Enabled);
        assert_eq!(options.language, "jpn");
        assert_eq!(options.surround_6_title, "5.1");
        assert_eq!(options.stereo_title, "Stereo");
    }

    #[test]
    fn test_invalid_toggle_is_rejected_by_the_parser() {
        assert!(CliArgs::try_parse_from(["audio-remediate", "--downmix", "maybe"]).is_err());
    }

    #[test]
    fn test_info_commands() {
        let args = CliArgs::parse_from(["audio-remediate", "--show-config"]);
        assert!(args.is_info_command());
        assert!(!args.has_inputs());
        assert_eq!(args.format, OutputFormat::Text);

        let args = CliArgs::parse_from(["audio-remediate", "-i", "a.mkv", "--format", "json"]);
        assert!(!args.is_info_command());
        assert!(args.has_inputs());
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_medium_override_parses() {
        let args = CliArgs::parse_from(["audio-remediate", "--medium", "audio"]);
        assert_eq!(args.medium, Some(FileMedium::Audio));
        assert!(CliArgs::try_parse_from(["audio-remediate", "--medium", "film"]).is_err());
    }

    #[test]
    fn test_missing_input_fails_validation() {
        let args = CliArgs::parse_from(["audio-remediate", "-i", "/definitely/not/here.mkv"]);
        assert!(args.validate().is_err());
    }
}
