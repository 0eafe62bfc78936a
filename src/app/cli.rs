#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Panel,
    Clients,
    Groups,
    Refresh,
    AddClient,
    EditClient,
    DeleteClient,
    Config,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "panel" => CliVerb::Panel,
        "clients" => CliVerb::Clients,
        "groups" => CliVerb::Groups,
        "refresh" => CliVerb::Refresh,
        "add-client" => CliVerb::AddClient,
        "edit-client" => CliVerb::EditClient,
        "delete-client" => CliVerb::DeleteClient,
        "config" => CliVerb::Config,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  panel                                Open the interactive account panel".to_string(),
        "  clients                              List clients with session status".to_string(),
        "  groups                               List groups and where they were loaded from"
            .to_string(),
        "  refresh                              Reload clients and groups, print counts"
            .to_string(),
        "  add-client --userid U --password P --mpin M [--name N] [--capital C]".to_string(),
        "                                       Add a client and log it in".to_string(),
        "  edit-client <userid> --password P --mpin M [--new-userid U2] [--name N] [--capital C]"
            .to_string(),
        "                                       Update a client and log it in again".to_string(),
        "  delete-client <userid>... --yes      Delete clients".to_string(),
        "  config show|init                     Show effective settings or write defaults"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
