use crate::app::command_support::{load_cli_settings, map_config_err, state_paths};
use crate::config::init_settings;

pub fn cmd_config(args: &[String]) -> Result<String, String> {
    let paths = state_paths()?;
    match args.first().map(String::as_str) {
        None | Some("show") => {
            let settings = load_cli_settings(&paths)?;
            let mut lines = vec![format!("config={}", paths.settings_file().display())];
            lines.extend(settings.summary_lines());
            Ok(lines.join("\n"))
        }
        Some("init") => {
            let created = init_settings(&paths).map_err(map_config_err)?;
            Ok(format!(
                "config={}\ncreated={created}",
                paths.settings_file().display()
            ))
        }
        Some(other) => Err(format!("unknown config subcommand `{other}` (expected show|init)")),
    }
}
