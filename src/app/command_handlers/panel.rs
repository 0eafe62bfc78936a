use crate::app::command_support::{load_cli_settings, state_paths};
use crate::panel::PanelContext;
use crate::tui::run_panel_tui;

pub fn cmd_panel() -> Result<String, String> {
    let paths = state_paths()?;
    let settings = load_cli_settings(&paths)?;
    run_panel_tui(PanelContext::from_settings(&paths, &settings))?;
    Ok("panel closed".to_string())
}
