//! Command handlers.
//!
//! Each handler takes the already-built [`CliConfigManager`] and a writer, so
//! the binary passes `stdout` and the tests pass a `Vec<u8>`.  Handlers return
//! `anyhow::Result`; library errors are wrapped with the context a user needs
//! to act on them.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use lean_config::CliConfigManager;
use serde::Serialize;
use tracing::info;

/// Which container image a command is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageKind {
    Engine,
    Research,
}

/// One row of `list` output.
#[derive(Debug, Serialize)]
struct OptionRow<'a> {
    key: &'a str,
    location: String,
    value: Option<String>,
    description: &'a str,
}

/// Prints every registered option with its (masked) value.
pub fn list(manager: &CliConfigManager, json: bool, out: &mut impl Write) -> Result<()> {
    let mut rows = Vec::with_capacity(manager.options().len());
    for option in manager.options() {
        let value = manager
            .get_value(option.key())
            .with_context(|| format!("failed to read option '{}'", option.key()))?
            .map(|v| option.display_value(&v));
        rows.push(OptionRow {
            key: option.key(),
            location: option.location().to_string(),
            value,
            description: option.description(),
        });
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &rows).context("failed to encode options")?;
        writeln!(out)?;
        return Ok(());
    }

    let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    for row in &rows {
        let value = row.value.as_deref().unwrap_or("<not set>");
        writeln!(out, "{:<width$}  {:<7}  {}", row.key, row.location, value)?;
        writeln!(out, "{:<width$}  {}", "", row.description)?;
    }
    Ok(())
}

/// Prints the value of option `key`.  Sensitive options are never printed.
pub fn get(manager: &CliConfigManager, key: &str, out: &mut impl Write) -> Result<()> {
    let option = manager.get_option_by_key(key)?;
    if option.is_sensitive() {
        bail!(
            "sensitive options like '{key}' cannot be retrieved with `get`, \
             use `list` to see a masked value"
        );
    }

    match manager.get_value(key)? {
        Some(value) => writeln!(out, "{value}")?,
        None => bail!("the option with key '{key}' doesn't have a value set"),
    }
    Ok(())
}

/// Validates and stores `value` for option `key`.
pub fn set(
    manager: &mut CliConfigManager,
    key: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    manager
        .set_value(key, value)
        .with_context(|| format!("failed to set option '{key}'"))?;

    let option = manager.get_option_by_key(key)?;
    info!(key, location = %option.location(), "option updated");
    writeln!(
        out,
        "Successfully updated the value of '{key}' to '{}'",
        option.display_value(value)
    )?;
    Ok(())
}

/// Removes the stored value of option `key`.
pub fn unset(manager: &mut CliConfigManager, key: &str, out: &mut impl Write) -> Result<()> {
    manager
        .unset(key)
        .with_context(|| format!("failed to unset option '{key}'"))?;
    writeln!(out, "Successfully unset '{key}'")?;
    Ok(())
}

/// Prints the image reference to use.
///
/// With `version`, prints the version-pinned name built from the base name.
/// Otherwise resolves `image_override`, then the stored option, then the
/// default.
pub fn image(
    manager: &CliConfigManager,
    kind: ImageKind,
    image_override: Option<&str>,
    version: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    if version.is_some() {
        if image_override.is_some() {
            bail!("--image and --version cannot be used together");
        }
        let name = match kind {
            ImageKind::Engine => manager.get_engine_image_name_from_version(version),
            ImageKind::Research => manager.get_research_image_name_from_version(version),
        };
        writeln!(out, "{name}")?;
        return Ok(());
    }

    let image = match kind {
        ImageKind::Engine => manager.get_configured_engine_image(image_override),
        ImageKind::Research => manager.get_configured_research_image(image_override),
    }
    .context("failed to resolve image")?;
    writeln!(out, "{image}")?;
    Ok(())
}
