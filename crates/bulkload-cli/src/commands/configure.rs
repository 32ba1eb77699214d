//! configure command - manage configuration profiles

use super::CommandContext;
use crate::config::Config;
use crate::ConfigureAction;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

pub fn execute(ctx: &CommandContext, action: Option<ConfigureAction>) -> Result<bool> {
    let profile = ctx.profile.as_deref();

    match action {
        Some(ConfigureAction::Set { key, value }) => set_config(ctx, profile, &key, &value)?,
        Some(ConfigureAction::Get { key }) => get_config(ctx, &key),
        Some(ConfigureAction::List) => list_config(ctx)?,
        Some(ConfigureAction::AddProfile { name }) => add_profile(&name)?,
        Some(ConfigureAction::RemoveProfile { name }) => remove_profile(&name)?,
        None => interactive_configure(ctx, profile)?,
    }

    Ok(true)
}

fn set_config(ctx: &CommandContext, profile: Option<&str>, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    config.set_value(key, value)?;
    config.save(profile)?;
    println!("Set {} = {}", key.cyan(), value);
    Ok(())
}

fn get_config(ctx: &CommandContext, key: &str) {
    match ctx.config.get_value(key) {
        Some(value) => println!("{}", value),
        None => println!("(not set)"),
    }
}

fn list_config(ctx: &CommandContext) -> Result<()> {
    let profile = ctx.profile.as_deref().unwrap_or("default");
    println!("{} [{}]", "Current configuration".bold(), profile.green());
    println!();

    for key in Config::keys() {
        let value = ctx
            .config
            .get_value(key)
            .unwrap_or_else(|| "(not set)".to_string());
        println!("  {}: {}", key.cyan(), value);
    }
    println!(
        "  {}: {}",
        "effective endpoint".cyan(),
        ctx.client_config.endpoint.dimmed()
    );

    println!();
    println!("{}", "Available profiles:".bold());

    let profiles = Config::list_profiles()?;
    if profiles.is_empty() {
        println!("  (none)");
    } else {
        for profile in profiles {
            println!("  - {}", profile);
        }
    }

    println!();
    println!(
        "Config file: {}",
        Config::config_path()?.display().to_string().dimmed()
    );

    Ok(())
}

fn add_profile(name: &str) -> Result<()> {
    Config::default().save(Some(name))?;
    println!("Created profile: {}", name.green());
    println!(
        "Use 'bulkload configure set <key> <value> --profile {}' to configure it.",
        name
    );
    Ok(())
}

fn remove_profile(name: &str) -> Result<()> {
    Config::delete_profile(name)?;
    println!("Removed profile: {}", name.red());
    Ok(())
}

fn prompt(label: &str, current: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", label, current);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok((!input.is_empty()).then(|| input.to_string()))
}

fn interactive_configure(ctx: &CommandContext, profile: Option<&str>) -> Result<()> {
    println!("{}", "Bulkload Configuration".bold());
    println!("Press Enter to keep current value.\n");

    let mut config = ctx.config.clone();

    let current_endpoint = config
        .endpoint
        .clone()
        .unwrap_or_else(|| bulkload_core::DEFAULT_ENDPOINT.to_string());
    if let Some(endpoint) = prompt("Import service URL", &current_endpoint)? {
        config.set_value("endpoint", &endpoint)?;
    }

    if let Some(timeout) = prompt("Request timeout (seconds)", &config.timeout.to_string())? {
        config.set_value("timeout", &timeout)?;
    }

    let current_dir = config
        .output_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    if let Some(dir) = prompt("Result file directory", &current_dir)? {
        config.output_dir = Some(PathBuf::from(dir));
    }

    config.save(profile)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        "✓".green(),
        Config::config_path()?.display()
    );

    Ok(())
}
