//! Subcommand handlers for config actions.

use std::path::Path;

use super::args::ConfigAction;
use ascii_snap::config::{default_path, Config, DEFAULT_BIND, DEFAULT_CONFIG};
use ascii_snap::client::DEFAULT_SERVICE_URL;
use ascii_snap::screenshot::{DEFAULT_DEVICE_SCALE_FACTOR, MAX_CAPTURE_DIMENSION};

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) -> Result<(), String> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&path)).map_err(|e| e.to_string())?;
            let ascii = config.ascii.to_options().map_err(|e| e.to_string())?;
            let export = config.export.to_options().map_err(|e| e.to_string())?;
            let shot = &config.screenshot;

            println!("Current configuration:");
            println!("  Width: {}", ascii.target_width);
            println!("  Stretch: {}", ascii.stretch);
            println!("  Ramp: \"{}\" ({} levels)", ascii.ramp.as_string(), ascii.ramp.len());
            println!("  Colour: {}", if ascii.colorize { "yes" } else { "no" });
            println!("  Luminance: {}", ascii.luminance);
            println!("  Font: {}px", export.font_px);
            println!(
                "  Theme: {} on {}",
                export.foreground.to_hex(),
                export.background.to_hex()
            );
            println!("  Bind: {}", shot.bind.as_deref().unwrap_or(DEFAULT_BIND));
            println!(
                "  Service: {}",
                shot.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
            );
            println!(
                "  Max capture: {}px at {}x",
                shot.max_dimension.unwrap_or(MAX_CAPTURE_DIMENSION),
                shot.device_scale_factor.unwrap_or(DEFAULT_DEVICE_SCALE_FACTOR)
            );
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'ascii-snap config show' to view current settings.",
                    path.display()
                ));
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&path, DEFAULT_CONFIG)
                .map_err(|e| format!("Error writing config file: {}", e))?;

            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}
