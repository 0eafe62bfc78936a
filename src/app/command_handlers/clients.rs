use crate::app::command_support::{CliArgs, CliSession};
use crate::domain::ClientKey;
use crate::panel::{ClientField, NoticeLevel, PanelMessage};

pub fn cmd_clients() -> Result<String, String> {
    let mut session = CliSession::open()?;
    session.mount();
    Ok(client_listing(&session))
}

fn client_listing(session: &CliSession) -> String {
    let state = &session.state;
    let mut lines = vec![format!("count={}", state.clients().len())];
    for client in state.clients() {
        lines.push(format!(
            "client={} name={} capital={} status={}",
            state.client_key(client),
            client.display_name(),
            client.capital_display(),
            state.client_status(client).as_str()
        ));
    }
    lines.join("\n")
}

fn fill_client_form(session: &mut CliSession, args: &CliArgs) -> Result<(), String> {
    let mut fields = vec![
        (ClientField::Password, args.required("password")?.to_string()),
        (ClientField::Mpin, args.required("mpin")?.to_string()),
    ];
    if let Some(name) = args.flag("name") {
        fields.push((ClientField::Name, name.to_string()));
    }
    if let Some(capital) = args.flag("capital") {
        fields.push((ClientField::Capital, capital.to_string()));
    }
    for (field, value) in fields {
        session.send(PanelMessage::SetClientField(field, value));
    }
    Ok(())
}

/// Submits the open client modal and reports the outcome the way the panel
/// would: a closed modal means the save went through.
fn submit_client(session: &mut CliSession) -> Result<String, String> {
    session.send(PanelMessage::SubmitClient);
    if let Some(failure) = session.state.client_workflow().failure() {
        return Err(failure.message.clone());
    }
    if session.state.client_workflow().is_open() {
        return Err("client save did not complete".to_string());
    }
    Ok(client_listing(session))
}

pub fn cmd_add_client(args: &[String]) -> Result<String, String> {
    let args = CliArgs::parse(args, &[])?;
    let mut session = CliSession::open()?;
    session.send(PanelMessage::OpenAddClient);
    let userid = args.required("userid")?.to_string();
    session.send(PanelMessage::SetClientField(ClientField::Userid, userid));
    fill_client_form(&mut session, &args)?;
    submit_client(&mut session)
}

pub fn cmd_edit_client(args: &[String]) -> Result<String, String> {
    let args = CliArgs::parse(args, &[])?;
    let Some(original) = args.positional.first() else {
        return Err("usage: edit-client <userid> --password P --mpin M".to_string());
    };
    let mut session = CliSession::open()?;
    session.mount();
    let key = ClientKey::new(session.state.broker(), original);
    session.send(PanelMessage::ToggleClient(key.clone(), true));
    if !session.state.client_selection().contains(&key) {
        return Err(format!("client `{key}` not found"));
    }
    session.send(PanelMessage::OpenEditClient);
    fill_client_form(&mut session, &args)?;
    if let Some(new_userid) = args.flag("new-userid") {
        session.send(PanelMessage::RemapClientUserid(new_userid.to_string()));
    }
    submit_client(&mut session)
}

pub fn cmd_delete_client(args: &[String]) -> Result<String, String> {
    let args = CliArgs::parse(args, &["yes"])?;
    if args.positional.is_empty() {
        return Err("usage: delete-client <userid>... --yes".to_string());
    }
    if !args.has_switch("yes") {
        return Err(format!(
            "refusing to delete {} client(s) without --yes",
            args.positional.len()
        ));
    }
    let mut session = CliSession::open()?;
    session.mount();
    for userid in &args.positional {
        let key = ClientKey::new(session.state.broker(), userid);
        session.send(PanelMessage::ToggleClient(key.clone(), true));
        if !session.state.client_selection().contains(&key) {
            return Err(format!("client `{key}` not found"));
        }
    }
    let count = session.state.client_selection().len();
    session.send(PanelMessage::RequestDeleteClients);
    session.send(PanelMessage::AcceptPrompt);
    if let Some(notice) = session.state.notice() {
        if notice.level == NoticeLevel::Error {
            return Err(notice.text.clone());
        }
    }
    Ok(format!("deleted={count}\n{}", client_listing(&session)))
}
