//! Storyteller resolution for Townsquare commands.
//!
//! Commands that create games or ask for privileged views need to know
//! who the storyteller is. Rather than requiring `--as` on every
//! invocation, the name is resolved through a chain:
//!
//! 1. `--as <name>` — explicit per-command override
//! 2. `TOWNSQUARE_STORYTELLER` env var — session level
//! 3. `~/.townsquare/config.toml` — global default

use std::{env, fs};

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Config {
    default_storyteller: Option<String>,
}

/// Error message shown when the storyteller cannot be resolved.
pub const STORYTELLER_REQUIRED: &str = "storyteller required: pass --as <name>, \
    set TOWNSQUARE_STORYTELLER, or add `default-storyteller = \"...\"` \
    to ~/.townsquare/config.toml";

/// Resolve the acting storyteller from the tiered resolution chain.
///
/// Checks in order: explicit `--as` value, `TOWNSQUARE_STORYTELLER`
/// env var, `~/.townsquare/config.toml`. Returns an error with
/// [`STORYTELLER_REQUIRED`] when none of the sources yield a value.
pub fn resolve_storyteller(explicit: Option<&str>) -> Result<String, String> {
    // 1. Explicit --as flag.
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    // 2. TOWNSQUARE_STORYTELLER environment variable.
    if let Ok(name) = env::var("TOWNSQUARE_STORYTELLER")
        && !name.is_empty()
    {
        return Ok(name);
    }

    // 3. ~/.townsquare/config.toml.
    if let Some(name) = read_config_storyteller()? {
        return Ok(name);
    }

    Err(STORYTELLER_REQUIRED.to_string())
}

/// Read the `default-storyteller` field from `~/.townsquare/config.toml`,
/// if it exists.
fn read_config_storyteller() -> Result<Option<String>, String> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };

    let path = home.join(".townsquare").join("config.toml");

    let contents = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
    };

    let config: Config = toml::from_str(&contents)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;

    Ok(config.default_storyteller.filter(|s| !s.is_empty()))
}
