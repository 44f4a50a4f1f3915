use crate::{cli::CliArgs, config::Config, utils::Result};

pub async fn handle_commands(args: &CliArgs, config: &Config) -> Result<bool> {
    if args.validate_config {
        validate_config(args).await?;
        return Ok(true);
    }

    if args.show_config {
        show_config(config)?;
        return Ok(true);
    }

    Ok(false)
}

async fn validate_config(args: &CliArgs) -> Result<()> {
    if !args.config.exists() {
        println!(
            "No configuration file at {}; built-in defaults apply.",
            args.config.display()
        );
        return Ok(());
    }

    match Config::load(&args.config) {
        Ok(config) => {
            println!("✓ Configuration is valid: {}", args.config.display());
            let options = &config.remediation;
            println!("  aac_stereo: {}", options.aac_stereo);
            println!("  downmix:    {}", options.downmix);
            println!("  rename:     {}", options.rename);
            println!("  language:   {}", options.language);
            if options.is_unconfigured() {
                println!("  note: no remediation option is set; every file will be skipped");
            }
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid: {}", e);
            Err(e)
        }
    }
}

fn show_config(config: &Config) -> Result<()> {
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
