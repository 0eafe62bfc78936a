use crate::app::command_support::CliSession;
use crate::domain::group_key;
use crate::panel::GroupSource;

fn source_label(source: Option<GroupSource>) -> &'static str {
    source.map(GroupSource::as_str).unwrap_or("none")
}

pub fn cmd_groups() -> Result<String, String> {
    let mut session = CliSession::open()?;
    session.mount();
    let state = &session.state;
    let mut lines = vec![
        format!("source={}", source_label(state.group_source())),
        format!("count={}", state.groups().len()),
    ];
    for group in state.groups() {
        lines.push(format!(
            "group={} name={} multiplier={} members={}",
            group_key(group),
            group.name,
            group.multiplier_display(),
            group.member_count()
        ));
    }
    Ok(lines.join("\n"))
}

pub fn cmd_refresh() -> Result<String, String> {
    let mut session = CliSession::open()?;
    session.mount();
    let state = &session.state;
    Ok(format!(
        "clients={}\ngroups={}\ngroups_source={}",
        state.clients().len(),
        state.groups().len(),
        source_label(state.group_source())
    ))
}
