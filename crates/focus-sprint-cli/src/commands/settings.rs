use clap::Subcommand;
use focus_sprint_core::settings::parse_flag;
use focus_sprint_core::SettingKey;

use crate::host::Host;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting value
    Get {
        /// Setting key (focus, break, longBreak, interval, autoStartBreaks,
        /// autoStartFocus, sound, popup)
        key: SettingKey,
    },
    /// Set a setting value
    Set {
        /// Setting key
        key: SettingKey,
        /// New value (minutes, a count, or true/false)
        value: String,
    },
    /// List all settings as JSON
    List,
}

pub async fn run(host: &Host, action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = host.controller()?;
    match action {
        SettingsAction::Get { key } => {
            println!("{}", controller.settings().get(key));
        }
        SettingsAction::Set { key, value } => {
            let stored = controller.set_setting(key, &value).await?;
            if key == SettingKey::Popup && stored == "false" && parse_flag(key, &value) == Ok(true) {
                eprintln!("desktop notifications are not permitted; popup stays off");
            }
            println!("{key} = {stored}");
        }
        SettingsAction::List => {
            let json = serde_json::to_string_pretty(controller.settings())?;
            println!("{json}");
        }
    }
    Ok(())
}
