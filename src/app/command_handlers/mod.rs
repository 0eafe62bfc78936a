use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod clients;
pub mod config;
pub mod groups;
pub mod panel;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Panel => panel::cmd_panel(),
        CliVerb::Clients => clients::cmd_clients(),
        CliVerb::Groups => groups::cmd_groups(),
        CliVerb::Refresh => groups::cmd_refresh(),
        CliVerb::AddClient => clients::cmd_add_client(&args[1..]),
        CliVerb::EditClient => clients::cmd_edit_client(&args[1..]),
        CliVerb::DeleteClient => clients::cmd_delete_client(&args[1..]),
        CliVerb::Config => config::cmd_config(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
