use super::keymap::{map_key, KeyIntent, RowCursor};
use crate::domain::group_key;
use crate::panel::{
    dispatch, ClientWorkflow, EffectRunner, FocusMove, GroupField, GroupSource, GroupWorkflow,
    NoticeLevel, PanelContext, PanelMessage, PanelState, Subtab, CLIENT_FIELDS,
};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);

pub fn run_panel_tui(ctx: PanelContext) -> Result<(), String> {
    let mut state = PanelState::new(ctx.broker.clone());
    let mut runner = EffectRunner::new(ctx);
    let mut cursor = RowCursor::default();
    dispatch(&mut state, &mut runner, PanelMessage::Mount);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut state, &mut runner, &mut cursor);
    runner.shutdown();
    teardown_terminal(&mut terminal)?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut PanelState,
    runner: &mut EffectRunner,
    cursor: &mut RowCursor,
) -> Result<(), String> {
    loop {
        while let Some(message) = runner.try_next() {
            dispatch(state, runner, message);
        }
        cursor.clamp(state.clients().len(), state.groups().len());
        terminal
            .draw(|frame| draw_panel(frame, state, cursor))
            .map_err(|e| format!("failed to render panel: {e}"))?;

        if !event::poll(UI_POLL_INTERVAL).map_err(|e| format!("failed to poll events: {e}"))? {
            continue;
        }
        let Event::Key(key) = event::read().map_err(|e| format!("failed to read event: {e}"))?
        else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let subtab = state.subtab();
        let len = match subtab {
            Subtab::Clients => state.clients().len(),
            Subtab::Groups => state.groups().len(),
        };
        match map_key(state, cursor, key) {
            Some(KeyIntent::Quit) => break,
            Some(KeyIntent::CursorUp) => cursor.step(subtab, FocusMove::Prev, len),
            Some(KeyIntent::CursorDown) => cursor.step(subtab, FocusMove::Next, len),
            Some(KeyIntent::Dispatch(message)) => dispatch(state, runner, message),
            None => {}
        }
    }
    Ok(())
}

fn draw_panel(frame: &mut Frame, state: &PanelState, cursor: &RowCursor) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let tabs = [Subtab::Clients, Subtab::Groups]
        .iter()
        .map(|tab| {
            if *tab == state.subtab() {
                format!("[{}]", tab.as_str())
            } else {
                format!(" {} ", tab.as_str())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let header = Paragraph::new(Line::raw(tabs)).block(
        Block::default()
            .title(format!("Accounts ({})", state.broker()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, sections[0]);

    match state.subtab() {
        Subtab::Clients => draw_clients_table(frame, sections[1], state, cursor.clients),
        Subtab::Groups => draw_groups_table(frame, sections[1], state, cursor.groups),
    }

    frame.render_widget(footer(state), sections[2]);

    if state.client_workflow().is_open() {
        draw_client_modal(frame, state.client_workflow(), state.broker());
    } else if state.group_workflow().is_open() {
        draw_group_modal(frame, state);
    }
    if let Some(prompt) = state.confirm() {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::raw(prompt.text()),
                Line::raw(""),
                Line::raw("y confirm  n cancel"),
            ])
            .block(Block::default().title("Confirm").borders(Borders::ALL)),
            area,
        );
    }
}

fn row_style(highlighted: bool) -> Style {
    if highlighted {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn draw_clients_table(frame: &mut Frame, area: Rect, state: &PanelState, highlighted: usize) {
    let header = Row::new(vec![
        Cell::from(checkbox(state.client_affordances().all_checked)),
        Cell::from("Name"),
        Cell::from("Client ID"),
        Cell::from("Capital"),
        Cell::from("Status"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = state.clients().iter().enumerate().map(|(idx, client)| {
        let key = state.client_key(client);
        Row::new(vec![
            Cell::from(checkbox(state.client_selection().contains(&key))),
            Cell::from(client.display_name().to_string()),
            Cell::from(client.identifier().to_string()),
            Cell::from(client.capital_display()),
            Cell::from(state.client_status(client).as_str()),
        ])
        .style(row_style(idx == highlighted))
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(Block::default().title("Clients").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn draw_groups_table(frame: &mut Frame, area: Rect, state: &PanelState, highlighted: usize) {
    let header = Row::new(vec![
        Cell::from(checkbox(state.group_affordances().all_checked)),
        Cell::from("Name"),
        Cell::from("Multiplier"),
        Cell::from("Members"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = state.groups().iter().enumerate().map(|(idx, group)| {
        Row::new(vec![
            Cell::from(checkbox(state.group_selection().contains(&group_key(group)))),
            Cell::from(group.name.clone()),
            Cell::from(group.multiplier_display()),
            Cell::from(group.member_count().to_string()),
        ])
        .style(row_style(idx == highlighted))
    });
    let title = match state.group_source() {
        Some(GroupSource::Cache) => "Groups (cached)",
        _ => "Groups",
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn footer(state: &PanelState) -> Paragraph<'static> {
    let hint = if state.confirm().is_some() {
        "y confirm | n cancel"
    } else if state.client_workflow().is_open() || state.group_workflow().is_open() {
        "Tab next field | Enter save | Esc close"
    } else {
        "Space select | t all | a add | e edit | d delete | r refresh | Tab switch | q quit"
    };
    let mut status = match state.notice() {
        Some(notice) => notice.text.clone(),
        None => "ready".to_string(),
    };
    if state.is_loading() {
        status.push_str(" (loading)");
    }
    let style = match state.notice().map(|n| n.level) {
        Some(NoticeLevel::Error) => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    Paragraph::new(vec![
        Line::raw(hint),
        Line::styled(format!("Status: {status}"), style),
    ])
    .block(Block::default().borders(Borders::ALL))
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn modal_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::new(2, 2, 1, 1))
}

fn failure_lines(failure: Option<String>, pending: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw("")];
    if pending {
        lines.push(Line::styled(
            "saving…",
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(prompt) = failure {
        lines.push(Line::styled(prompt, Style::default().fg(Color::Red)));
    }
    lines
}

fn draw_client_modal(frame: &mut Frame, workflow: &ClientWorkflow, broker: &str) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let mut lines = CLIENT_FIELDS
        .iter()
        .map(|field| {
            let raw = workflow.form().value(*field);
            let value = if field.is_secret() {
                masked(raw)
            } else {
                raw.to_string()
            };
            let marker = if *field == workflow.focus() { ">" } else { " " };
            Line::styled(
                format!("{marker} {:<12} {value}", field.label()),
                row_style(*field == workflow.focus()),
            )
        })
        .collect::<Vec<_>>();
    lines.extend(failure_lines(
        workflow.failure().map(|f| f.prompt()),
        workflow.is_pending(),
    ));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(modal_block(workflow.title(broker))),
        area,
    );
}

fn draw_group_modal(frame: &mut Frame, state: &PanelState) {
    let workflow: &GroupWorkflow = state.group_workflow();
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    let focus = workflow.focus();
    let field_line = |field: GroupField, value: &str| {
        let marker = if field == focus { ">" } else { " " };
        Line::styled(
            format!("{marker} {:<12} {value}", field.label()),
            row_style(field == focus),
        )
    };
    let mut lines = vec![
        field_line(GroupField::Name, &workflow.form().name),
        field_line(GroupField::Multiplier, &workflow.form().multiplier),
        field_line(GroupField::Members, ""),
    ];
    for (idx, member) in state.member_candidates().iter().enumerate() {
        let highlighted = focus == GroupField::Members && idx == workflow.member_cursor();
        lines.push(Line::styled(
            format!(
                "    {} {member}",
                checkbox(workflow.form().is_member(member))
            ),
            row_style(highlighted),
        ));
    }
    lines.extend(failure_lines(
        workflow.failure().map(|f| f.prompt()),
        workflow.is_pending(),
    ));
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(modal_block(workflow.title().to_string())),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, String> {
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)
        .map_err(|e| format!("failed to enter alternate screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| format!("failed to initialize terminal: {e}"))
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), String> {
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
        .map_err(|e| format!("failed to leave alternate screen: {e}"))?;
    terminal
        .show_cursor()
        .map_err(|e| format!("failed to restore cursor: {e}"))?;
    Ok(())
}
