// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use eventdesk_app::listing::{FilterField, Filterable, Keyed, ListCommand, ListView};
use eventdesk_app::validation::{format_date, format_xof};
use eventdesk_app::{
    AppCommand, AppEvent, AppMode, AppState, CONTACT_FIELD_LABELS, ConfirmFlow,
    DEFAULT_NOTIFICATION_TTL, DirectorySnapshot, FormKind, NotificationKind, OperationError,
    OperationOutcome, PendingOperation, RowRef, SurveySummary, TabKind,
};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const BAR_WIDTH: usize = 30;

/// Side effects the console needs from the outside world.
pub trait AppRuntime {
    fn load_directory(&mut self) -> Result<DirectorySnapshot>;
    fn run_operation(&mut self, operation: PendingOperation) -> Result<OperationOutcome>;
    fn write_export(&mut self, file_name: &str, contents: &str) -> Result<PathBuf>;

    /// Starts `operation` and reports through `tx`. The default runs it
    /// inline, so the result is queued before this returns.
    fn spawn_operation(
        &mut self,
        request_id: u64,
        operation: PendingOperation,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self
            .run_operation(operation)
            .map_err(|error| OperationError::Failed(error.to_string()));
        tx.send(InternalEvent::OperationFinished { request_id, result })
            .map_err(|_| anyhow::anyhow!("operation event channel closed"))?;
        Ok(())
    }

    fn cancel_operation(&mut self, _request_id: u64) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearNotification {
        token: u64,
    },
    OperationFinished {
        request_id: u64,
        result: std::result::Result<OperationOutcome, OperationError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub notification_ttl: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

/// Shared plumbing for one console session.
struct Session<'a, R: AppRuntime> {
    state: &'a mut AppState,
    runtime: &'a mut R,
    tx: &'a Sender<InternalEvent>,
    options: UiOptions,
}

impl<R: AppRuntime> Session<'_, R> {
    /// Dispatches `command` and performs the side effects its events ask for.
    fn dispatch(&mut self, command: AppCommand) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            for event in self.state.dispatch(command) {
                if let Some(follow_up) = self.perform(event) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    fn perform(&mut self, event: AppEvent) -> Option<AppCommand> {
        match event {
            AppEvent::Notified(notification) => {
                schedule_notification_clear(
                    self.tx,
                    notification.token,
                    self.options.notification_ttl,
                );
                None
            }
            AppEvent::OperationRequested {
                request_id,
                operation,
            } => match self
                .runtime
                .spawn_operation(request_id, operation, self.tx.clone())
            {
                Ok(()) => None,
                Err(error) => {
                    warn!("request {request_id}: could not start: {error}");
                    Some(AppCommand::OperationFinished {
                        request_id,
                        result: Err(OperationError::Failed(error.to_string())),
                    })
                }
            },
            AppEvent::OperationAborted { request_id } => {
                self.runtime.cancel_operation(request_id).err().map(|error| {
                    AppCommand::Notify(
                        NotificationKind::Error,
                        format!("cancel request {request_id}: {error}"),
                    )
                })
            }
            AppEvent::ExportReady {
                file_name,
                contents,
            } => Some(match self.runtime.write_export(&file_name, &contents) {
                Ok(path) => AppCommand::Notify(
                    NotificationKind::Success,
                    format!("exported to {}", path.display()),
                ),
                Err(error) => {
                    warn!("export {file_name} failed: {error}");
                    AppCommand::Notify(NotificationKind::Error, format!("export failed: {error}"))
                }
            }),
            _ => None,
        }
    }

    fn reload(&mut self) {
        match self.runtime.load_directory() {
            Ok(snapshot) => self.dispatch(AppCommand::Load(snapshot)),
            Err(error) => self.dispatch(AppCommand::Notify(
                NotificationKind::Error,
                format!("load failed: {error}"),
            )),
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (internal_tx, internal_rx) = mpsc::channel();
    let mut session = Session {
        state,
        runtime,
        tx: &internal_tx,
        options,
    };
    session.reload();

    let mut result = Ok(());
    loop {
        process_internal_events(&mut session, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, session.state)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(&mut session, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    if let Some(request_id) = session.state.in_flight {
        debug!("quitting with request {request_id} in flight");
        session.dispatch(AppCommand::AbortOperation);
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    session: &mut Session<'_, R>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotification { token } => {
                session.dispatch(AppCommand::ClearNotification(token));
            }
            InternalEvent::OperationFinished { request_id, result } => {
                session.dispatch(AppCommand::OperationFinished { request_id, result });
            }
        }
    }
}

fn schedule_notification_clear(internal_tx: &Sender<InternalEvent>, token: u64, ttl: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(ttl);
        let _ = sender.send(InternalEvent::ClearNotification { token });
    });
}

/// Returns true when the console should quit.
fn handle_key_event<R: AppRuntime>(session: &mut Session<'_, R>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        if session.state.in_flight.is_some() {
            session.dispatch(AppCommand::AbortOperation);
            return false;
        }
        return true;
    }

    if matches!(session.state.confirm, ConfirmFlow::Confirming(_)) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => session.dispatch(AppCommand::Confirm),
            KeyCode::Char('n') | KeyCode::Esc => session.dispatch(AppCommand::Cancel),
            _ => {}
        }
        return false;
    }

    match session.state.mode {
        AppMode::Help => {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                session.dispatch(AppCommand::ToggleHelp);
            }
            false
        }
        AppMode::Form(_) => {
            handle_form_key(session, key);
            false
        }
        AppMode::Search => {
            handle_search_key(session, key);
            false
        }
        AppMode::Nav => handle_nav_key(session, key),
    }
}

fn handle_form_key<R: AppRuntime>(session: &mut Session<'_, R>, key: KeyEvent) {
    let command = match key.code {
        KeyCode::Tab | KeyCode::Down => AppCommand::FormNextField,
        KeyCode::BackTab | KeyCode::Up => AppCommand::FormPrevField,
        KeyCode::Enter => AppCommand::SubmitForm,
        KeyCode::Esc => AppCommand::CancelForm,
        KeyCode::Backspace => AppCommand::FormBackspace,
        KeyCode::Char(ch) => AppCommand::FormInput(ch),
        _ => return,
    };
    session.dispatch(command);
}

fn handle_search_key<R: AppRuntime>(session: &mut Session<'_, R>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => session.dispatch(AppCommand::ExitToNav),
        KeyCode::Esc => {
            session.dispatch(AppCommand::List(ListCommand::SetTerm(String::new())));
            session.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Backspace => session.dispatch(AppCommand::List(ListCommand::PopTermChar)),
        KeyCode::Char(ch) => session.dispatch(AppCommand::List(ListCommand::PushTermChar(ch))),
        _ => {}
    }
}

fn handle_nav_key<R: AppRuntime>(session: &mut Session<'_, R>, key: KeyEvent) -> bool {
    if session.state.detail.is_open() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                session.dispatch(AppCommand::CloseDetail);
            }
            _ => {}
        }
        return false;
    }

    let tab = session.state.active_tab;
    let command = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab | KeyCode::Right => AppCommand::NextTab,
        KeyCode::BackTab | KeyCode::Left => AppCommand::PrevTab,
        KeyCode::Char('j') | KeyCode::Down => AppCommand::MoveCursor(1),
        KeyCode::Char('k') | KeyCode::Up => AppCommand::MoveCursor(-1),
        KeyCode::Char('n') | KeyCode::PageDown => AppCommand::List(ListCommand::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => AppCommand::List(ListCommand::PrevPage),
        KeyCode::Char('z') => AppCommand::List(ListCommand::CyclePageSize),
        KeyCode::Char('x') => AppCommand::List(ListCommand::ClearFilters),
        KeyCode::Char('/') => AppCommand::EnterSearch,
        KeyCode::Char(' ') if tab == TabKind::Activities => AppCommand::ToggleActivity,
        KeyCode::Char(' ') => AppCommand::List(ListCommand::ToggleCursorRow),
        KeyCode::Char('A') => AppCommand::List(ListCommand::ToggleAllOnPage),
        KeyCode::Esc => AppCommand::List(ListCommand::ClearSelection),
        KeyCode::Enter => AppCommand::OpenDetail,
        KeyCode::Char('d') => AppCommand::RequestDelete,
        KeyCode::Char('m') => AppCommand::RequestCheckIn,
        KeyCode::Char('e') if tab == TabKind::Profile => AppCommand::OpenForm(FormKind::Profile),
        KeyCode::Char('e') => AppCommand::OpenForm(FormKind::Participant),
        KeyCode::Char('v') => AppCommand::CycleStanding,
        KeyCode::Char('w') => AppCommand::CyclePaymentMethod,
        KeyCode::Char('P') => AppCommand::RequestPayment,
        KeyCode::Char('E') => AppCommand::Export,
        KeyCode::Char('o') => AppCommand::CycleExportScope,
        KeyCode::Char('f') => AppCommand::ToggleExportFormat,
        KeyCode::Char('?') => AppCommand::ToggleHelp,
        KeyCode::Char('R') => {
            session.reload();
            return false;
        }
        KeyCode::Char(ch) => match selector_field(tab, ch) {
            Some(field) => AppCommand::List(ListCommand::CycleSelection(field)),
            None => return false,
        },
        _ => return false,
    };
    session.dispatch(command);
    false
}

fn selector_field(tab: TabKind, key: char) -> Option<FilterField> {
    match (tab, key) {
        (TabKind::Participants, 'a') => Some(FilterField::Activity),
        (TabKind::Participants, 's') => Some(FilterField::Standing),
        (TabKind::Participants, 'c') => Some(FilterField::Connection),
        (TabKind::Participants, 'i') => Some(FilterField::Signature),
        (TabKind::Participants, 't') => Some(FilterField::Checking),
        (TabKind::Invites, 'c') => Some(FilterField::InviteKind),
        (TabKind::Invites, 's') => Some(FilterField::InviteStatus),
        _ => None,
    }
}

fn selector_fields(tab: TabKind) -> &'static [(char, FilterField)] {
    match tab {
        TabKind::Participants => &[
            ('a', FilterField::Activity),
            ('s', FilterField::Standing),
            ('c', FilterField::Connection),
            ('i', FilterField::Signature),
            ('t', FilterField::Checking),
        ],
        TabKind::Invites => &[('c', FilterField::InviteKind), ('s', FilterField::InviteStatus)],
        TabKind::Activities | TabKind::Surveys | TabKind::Profile => &[],
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let tabs = state.tabs();
    let titles: Vec<&str> = tabs.iter().map(|tab| tab.label()).collect();
    let selected = tabs
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tabs_widget = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("eventdesk | {}", state.role.as_str())),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs_widget, layout[0]);

    match state.active_tab {
        TabKind::Participants => render_participants(frame, layout[1], state),
        TabKind::Invites => render_invites(frame, layout[1], state),
        TabKind::Activities => render_activities(frame, layout[1], state),
        TabKind::Surveys => {
            let body = Paragraph::new(survey_text(state))
                .block(Block::default().borders(Borders::ALL).title("surveys"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Profile => {
            let body = Paragraph::new(profile_text(state))
                .block(Block::default().borders(Borders::ALL).title("profile"));
            frame.render_widget(body, layout[1]);
        }
    }

    let status = Paragraph::new(status_text(state)).style(status_style(state));
    frame.render_widget(status, layout[2]);

    if let Some(row) = state.detail.target() {
        render_overlay(frame, "detail", &detail_text(state, *row), 60, 60);
    }
    if state.form.is_some() {
        render_overlay(frame, "edit", &form_text(state), 60, 50);
    }
    if let Some(text) = confirm_text(&state.confirm, state.abort_requested) {
        render_overlay(frame, "confirm", &text, 50, 25);
    }
    if state.mode == AppMode::Help {
        render_overlay(frame, "help", help_overlay_text(), 70, 80);
    }
}

fn render_overlay(
    frame: &mut ratatui::Frame<'_>,
    title: &str,
    text: &str,
    percent_x: u16,
    percent_y: u16,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);
    let overlay = Paragraph::new(text.to_owned()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_owned()),
    );
    frame.render_widget(overlay, area);
}

fn render_participants(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let view = &state.participants;
    let rows: Vec<Row<'_>> = view
        .page_rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = vec![
                Cell::from(checkbox(view.selection().contains(row.id))),
                Cell::from(row.id.to_string()),
                Cell::from(row.full_name()),
                Cell::from(row.email.clone()),
                Cell::from(row.organization.clone()),
                Cell::from(row.activity.clone().unwrap_or_default()),
                Cell::from(row.standing.map(|s| s.label()).unwrap_or("")),
                Cell::from(row.connection_label()),
                Cell::from(row.signature_label()),
                Cell::from(row.checking_label()),
            ];
            Row::new(cells).style(row_style(index == view.cursor()))
        })
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Percentage(16),
        Constraint::Percentage(22),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
    ];
    let header = [
        "id", "name", "email", "org", "activity", "standing", "connection", "signature",
        "checking",
    ];
    render_list(frame, area, state, view, rows, &widths, &header);
}

fn render_invites(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let view = &state.invites;
    let rows: Vec<Row<'_>> = view
        .page_rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = vec![
                Cell::from(checkbox(view.selection().contains(row.id))),
                Cell::from(row.id.to_string()),
                Cell::from(row.full_name()),
                Cell::from(row.email.clone()),
                Cell::from(row.kind.as_str()),
                Cell::from(row.status.as_str()),
                Cell::from(row.sent_on.map(format_date).unwrap_or_default()),
            ];
            Row::new(cells).style(row_style(index == view.cursor()))
        })
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Percentage(22),
        Constraint::Percentage(30),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    let header = ["id", "name", "email", "kind", "status", "sent"];
    render_list(frame, area, state, view, rows, &widths, &header);
}

fn render_list<T>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &ListView<T>,
    rows: Vec<Row<'_>>,
    widths: &[Constraint],
    header: &[&'static str],
) where
    T: Keyed + Filterable,
{
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(filter_bar_text(state.active_tab, view, state.mode)),
        layout[0],
    );

    let empty = rows.is_empty();
    let page_selected = view.selection().covers(view.page_keys());
    let titles = std::iter::once(checkbox(page_selected)).chain(header.iter().copied());
    let table = Table::new(rows, widths.to_vec())
        .header(
            Row::new(titles.map(Cell::from)).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.active_tab.label()),
        );
    frame.render_widget(table, layout[1]);
    if empty {
        let inner = Rect {
            x: layout[1].x.saturating_add(2),
            y: layout[1].y.saturating_add(2),
            width: layout[1].width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(Paragraph::new("no rows match"), inner);
    }

    frame.render_widget(
        Paragraph::new(page_footer_text(view, state)),
        layout[2],
    );
}

fn render_activities(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let rows: Vec<Row<'_>> = state
        .activities
        .iter()
        .enumerate()
        .map(|(index, activity)| {
            let picked = state.checkout.standing_for(activity.id);
            let prices = activity
                .options
                .iter()
                .map(|option| format!("{} {}", option.standing.label(), format_xof(option.amount)))
                .collect::<Vec<_>>()
                .join(" / ");
            let cells = vec![
                Cell::from(checkbox(picked.is_some())),
                Cell::from(activity.name.clone()),
                Cell::from(activity.venue.clone()),
                Cell::from(format_date(activity.starts_on)),
                Cell::from(prices),
                Cell::from(picked.map(|s| s.label()).unwrap_or("")),
            ];
            Row::new(cells).style(row_style(index == state.activity_cursor))
        })
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Length(11),
        Constraint::Percentage(40),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(["", "activity", "venue", "date", "prices", "picked"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("activities"));
    frame.render_widget(table, layout[0]);
    frame.render_widget(Paragraph::new(checkout_text(state)), layout[1]);
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn row_style(is_cursor: bool) -> Style {
    if is_cursor {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn status_style(state: &AppState) -> Style {
    match state.notification.as_ref().map(|n| n.kind) {
        Some(NotificationKind::Error) => Style::default().fg(Color::Red),
        Some(NotificationKind::Success) => Style::default().fg(Color::Green),
        Some(NotificationKind::Info) | None => Style::default().fg(Color::Yellow),
    }
}

fn filter_bar_text<T>(tab: TabKind, view: &ListView<T>, mode: AppMode) -> String
where
    T: Keyed + Filterable,
{
    let filter = view.filter();
    let cursor = if mode == AppMode::Search { "_" } else { "" };
    let mut parts = vec![format!("/ {}{cursor}", filter.term)];
    for (key, field) in selector_fields(tab) {
        let value = filter.selection(*field).unwrap_or("any");
        parts.push(format!("{key}:{} {value}", field.label()));
    }
    parts.join("  ")
}

fn page_footer_text<T>(view: &ListView<T>, state: &AppState) -> String
where
    T: Keyed + Filterable,
{
    let pagination = view.pagination();
    let mut text = format!(
        "page {}/{} | {} per page | {} of {} rows | {} selected | export {} .{}",
        pagination.page(),
        view.total_pages(),
        pagination.page_size().get(),
        view.filtered_count(),
        view.items().len(),
        view.selection().len(),
        state.export_scope.label(),
        state.export_format.extension(),
    );
    if pagination.is_past_end(view.filtered_count()) {
        text.push_str(" | past last page, p to go back");
    }
    text
}

fn checkout_text(state: &AppState) -> String {
    format!(
        "{} picked | total {} | method {} | space pick, v standing, w method, P pay",
        state.checkout.len(),
        format_xof(state.checkout.total(&state.activities)),
        state.checkout.method.label(),
    )
}

fn survey_text(state: &AppState) -> String {
    if state.surveys.is_empty() {
        return "no surveys".to_owned();
    }
    let mut lines = Vec::new();
    for (index, survey) in state.surveys.iter().enumerate() {
        let marker = if index == state.survey_cursor { ">" } else { " " };
        let summary = SurveySummary::from_survey(survey);
        lines.push(format!(
            "{marker} {} ({} invited, {}% responded)",
            summary.title,
            summary.invited,
            summary.response_rate()
        ));
        if index != state.survey_cursor {
            continue;
        }
        for tally in &survey.questions {
            lines.push(format!("  {} ({} answers)", tally.question, tally.total()));
            for (label, percent) in tally.percentages() {
                let filled = BAR_WIDTH * percent as usize / 100;
                lines.push(format!(
                    "    {label:<12} {:<width$} {percent:>3}%",
                    "#".repeat(filled),
                    width = BAR_WIDTH
                ));
            }
            if let Some((label, count)) = tally.most_popular() {
                lines.push(format!("    most popular: {label} ({count})"));
            }
        }
    }
    lines.join("\n")
}

fn profile_text(state: &AppState) -> String {
    let Some(profile) = &state.profile else {
        return "no profile loaded".to_owned();
    };
    [
        format!("name          {}", profile.full_name()),
        format!("email         {}", profile.email),
        format!("phone         {}", profile.phone),
        format!("organization  {}", profile.organization),
        format!("role          {}", profile.role.as_str()),
        String::new(),
        "e edit".to_owned(),
    ]
    .join("\n")
}

fn detail_text(state: &AppState, row: RowRef) -> String {
    match row {
        RowRef::Participant(id) => match state.participants.get(id) {
            Some(p) => [
                format!("participant #{}", p.id),
                format!("name          {}", p.full_name()),
                format!("email         {}", p.email),
                format!("phone         {}", p.phone),
                format!("organization  {}", p.organization),
                format!("activity      {}", p.activity.as_deref().unwrap_or("-")),
                format!("standing      {}", p.standing.map(|s| s.label()).unwrap_or("-")),
                format!("connection    {}", p.connection_label()),
                format!("signature     {}", p.signature_label()),
                format!("checking      {}", p.checking_label()),
                format!("registered    {}", format_date(p.registered_on)),
            ]
            .join("\n"),
            None => format!("participant #{id} is gone"),
        },
        RowRef::Invite(id) => match state.invites.get(id) {
            Some(invite) => [
                format!("invite #{}", invite.id),
                format!("name    {}", invite.full_name()),
                format!("email   {}", invite.email),
                format!("kind    {}", invite.kind.as_str()),
                format!("status  {}", invite.status.as_str()),
                format!(
                    "sent    {}",
                    invite.sent_on.map(format_date).unwrap_or_else(|| "-".to_owned())
                ),
            ]
            .join("\n"),
            None => format!("invite #{id} is gone"),
        },
        RowRef::Activity(id) => match state.activities.iter().find(|a| a.id == id) {
            Some(activity) => {
                let mut lines = vec![
                    activity.name.clone(),
                    format!("venue  {}", activity.venue),
                    format!("date   {}", format_date(activity.starts_on)),
                ];
                lines.extend(activity.options.iter().map(|option| {
                    format!("  {:<9} {}", option.standing.label(), format_xof(option.amount))
                }));
                lines.join("\n")
            }
            None => format!("activity #{id} is gone"),
        },
    }
}

fn form_text(state: &AppState) -> String {
    let Some(form) = &state.form else {
        return String::new();
    };
    let contact = form.payload.contact();
    let mut lines = vec![format!("edit {}", form.payload.kind().label()), String::new()];
    for (index, label) in CONTACT_FIELD_LABELS.iter().enumerate() {
        let marker = if index == form.field { ">" } else { " " };
        let value = contact.field(index).unwrap_or_default();
        lines.push(format!("{marker} {label:<13} {value}"));
    }
    lines.push(String::new());
    if let Some(error) = &form.error {
        lines.push(format!("error: {error}"));
    }
    lines.push("tab next | shift+tab prev | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn confirm_text(confirm: &ConfirmFlow<PendingOperation>, aborting: bool) -> Option<String> {
    match confirm {
        ConfirmFlow::Idle => None,
        ConfirmFlow::Confirming(operation) => {
            Some(format!("{}?\n\ny confirm | n cancel", operation.describe()))
        }
        ConfirmFlow::Processing(operation) if aborting => Some(format!(
            "{}...\n\ncancelling, waiting for the backend",
            operation.describe()
        )),
        ConfirmFlow::Processing(operation) => Some(format!(
            "{}...\n\nctrl+c to abort",
            operation.describe()
        )),
    }
}

fn help_overlay_text() -> &'static str {
    "\
tab / shift+tab   switch tab
j / k             move cursor
n / p             next / previous page
z                 cycle page size
/                 search (enter keep, esc clear)
a s c i t         cycle filter selectors
x                 clear filters
space / A         toggle row / toggle page
esc               clear selection
enter             open detail
d                 delete selection or cursor row
e                 edit participant or profile
m                 check in participant
space v w P       pick activity, standing, method, pay
E o f             export, scope, format
R                 reload
ctrl+c            abort running action
?                 close help
q                 quit"
}

fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Nav => "NAV",
        AppMode::Search => "SEARCH",
        AppMode::Form(_) => "FORM",
        AppMode::Help => "HELP",
    }
}

fn status_text(state: &AppState) -> String {
    let hints = match state.mode {
        AppMode::Nav if state.in_flight.is_some() => "ctrl+c abort",
        AppMode::Nav => "tab switch | j/k move | / search | enter detail | ? help | q quit",
        AppMode::Search => "type to filter | enter keep | esc clear",
        AppMode::Form(_) => "tab next | enter save | esc cancel",
        AppMode::Help => "? close",
    };
    let mode = mode_label(state.mode);
    match &state.notification {
        Some(notification) => format!(
            "{mode} | {}: {} | {hints}",
            notification.kind.label(),
            notification.message
        ),
        None => format!("{mode} | {hints}"),
    }
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

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InternalEvent, Session, UiOptions, centered_rect, confirm_text,
        handle_key_event, help_overlay_text, page_footer_text, process_internal_events, render,
        status_text, survey_text,
    };
    use anyhow::{Result, anyhow};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use eventdesk_app::listing::{ListCommand, PageSize};
    use eventdesk_app::{
        AppMode, AppState, ConfirmFlow, DirectorySnapshot, NotificationKind, OperationError,
        OperationOutcome, ParticipantId, PendingOperation, Role, TabKind,
    };
    use eventdesk_data::{Backend, seed};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::time::Duration;

    #[derive(Debug)]
    struct TestRuntime {
        backend: Backend,
        defer: bool,
        deferred: Vec<(u64, PendingOperation)>,
        cancelled: Vec<u64>,
        exports: Vec<(String, String)>,
        fail_export: bool,
    }

    impl TestRuntime {
        fn new() -> Self {
            Self {
                backend: Backend::seeded(Duration::ZERO),
                defer: false,
                deferred: Vec::new(),
                cancelled: Vec::new(),
                exports: Vec::new(),
                fail_export: false,
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_directory(&mut self) -> Result<DirectorySnapshot> {
            Ok(self.backend.snapshot())
        }

        fn run_operation(&mut self, operation: PendingOperation) -> Result<OperationOutcome> {
            self.backend
                .execute(operation)
                .map_err(|error| anyhow!(error))
        }

        fn write_export(&mut self, file_name: &str, contents: &str) -> Result<PathBuf> {
            if self.fail_export {
                return Err(anyhow!("disk full"));
            }
            self.exports.push((file_name.to_owned(), contents.to_owned()));
            Ok(PathBuf::from("/tmp/exports").join(file_name))
        }

        fn spawn_operation(
            &mut self,
            request_id: u64,
            operation: PendingOperation,
            tx: Sender<InternalEvent>,
        ) -> Result<()> {
            if self.defer {
                self.deferred.push((request_id, operation));
                return Ok(());
            }
            let result = self
                .run_operation(operation)
                .map_err(|error| OperationError::Failed(error.to_string()));
            tx.send(InternalEvent::OperationFinished { request_id, result })
                .map_err(|_| anyhow!("closed"))
        }

        fn cancel_operation(&mut self, request_id: u64) -> Result<()> {
            self.cancelled.push(request_id);
            Ok(())
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
        options: UiOptions,
    }

    impl Harness {
        fn new(role: Role) -> Self {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: AppState::new(role, PageSize::Ten),
                runtime: TestRuntime::new(),
                tx,
                rx,
                options: UiOptions {
                    notification_ttl: Duration::from_secs(60),
                },
            };
            harness.session().reload();
            harness
        }

        fn session(&mut self) -> Session<'_, TestRuntime> {
            Session {
                state: &mut self.state,
                runtime: &mut self.runtime,
                tx: &self.tx,
                options: self.options,
            }
        }

        fn key(&mut self, code: KeyCode) -> bool {
            self.key_with(code, KeyModifiers::NONE)
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            let quit = handle_key_event(&mut self.session(), KeyEvent::new(code, modifiers));
            self.pump_internal();
            quit
        }

        fn keys(&mut self, script: &str) {
            for ch in script.chars() {
                self.key(KeyCode::Char(ch));
            }
        }

        fn pump_internal(&mut self) {
            let mut session = Session {
                state: &mut self.state,
                runtime: &mut self.runtime,
                tx: &self.tx,
                options: self.options,
            };
            process_internal_events(&mut session, &self.rx);
        }
    }

    #[test]
    fn tab_keys_rotate_through_role_tabs() {
        let mut harness = Harness::new(Role::Operator);
        assert_eq!(harness.state.active_tab, TabKind::Participants);
        harness.key(KeyCode::Tab);
        assert_eq!(harness.state.active_tab, TabKind::Profile);
        harness.key(KeyCode::Tab);
        assert_eq!(harness.state.active_tab, TabKind::Participants);
        harness.key(KeyCode::BackTab);
        assert_eq!(harness.state.active_tab, TabKind::Profile);
    }

    #[test]
    fn search_mode_filters_and_escape_clears() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('/'));
        assert_eq!(harness.state.mode, AppMode::Search);
        harness.keys("koffi");
        assert_eq!(harness.state.participants.filtered_count(), 1);

        harness.key(KeyCode::Enter);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.state.participants.filter().term, "koffi");

        harness.key(KeyCode::Char('/'));
        harness.key(KeyCode::Esc);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert_eq!(harness.state.participants.filtered_count(), 7);
    }

    #[test]
    fn delete_flow_runs_operation_and_notifies() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Char(' '));
        harness.key(KeyCode::Char('d'));
        assert!(matches!(harness.state.confirm, ConfirmFlow::Confirming(_)));

        harness.key(KeyCode::Char('y'));
        assert!(harness.state.confirm.is_idle());
        let items = harness.state.participants.items();
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|row| row.id != ParticipantId::new(3)));
        let notification = harness.state.notification.clone().expect("notification");
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(harness.runtime.backend.snapshot().participants.len(), 6);
    }

    #[test]
    fn confirm_prompt_swallows_other_keys_and_n_cancels() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('d'));
        assert!(!harness.key(KeyCode::Char('q')));
        assert!(matches!(harness.state.confirm, ConfirmFlow::Confirming(_)));
        harness.key(KeyCode::Char('n'));
        assert!(harness.state.confirm.is_idle());
        assert_eq!(harness.state.participants.items().len(), 7);
    }

    #[test]
    fn ctrl_c_requests_cancel_and_waits_for_the_result() {
        let mut harness = Harness::new(Role::Organizer);
        harness.runtime.defer = true;
        harness.key(KeyCode::Char('d'));
        harness.key(KeyCode::Enter);
        let request_id = harness.state.in_flight.expect("in flight");

        let quit = harness.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!quit);
        assert_eq!(harness.runtime.cancelled, vec![request_id]);
        assert_eq!(harness.state.in_flight, Some(request_id));
        assert!(harness.state.confirm.is_locked());
        let text = confirm_text(&harness.state.confirm, harness.state.abort_requested)
            .expect("processing prompt");
        assert!(text.contains("cancelling"));

        harness.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(harness.runtime.cancelled, vec![request_id]);

        harness
            .tx
            .send(InternalEvent::OperationFinished {
                request_id,
                result: Err(OperationError::Cancelled),
            })
            .expect("send");
        harness.pump_internal();
        assert!(harness.state.in_flight.is_none());
        assert!(harness.state.confirm.is_idle());
        assert_eq!(harness.state.participants.items().len(), 7);
        let notification = harness.state.notification.clone().expect("notice");
        assert_eq!(notification.kind, NotificationKind::Info);
        assert!(notification.message.ends_with("cancelled"));
    }

    #[test]
    fn ctrl_c_after_commit_shows_the_committed_change() {
        let mut harness = Harness::new(Role::Organizer);
        harness.runtime.defer = true;
        harness.key(KeyCode::Char('d'));
        harness.key(KeyCode::Enter);
        let (id, operation) = harness.runtime.deferred.pop().expect("deferred");
        let result = harness
            .runtime
            .run_operation(operation)
            .map_err(|error| OperationError::Failed(error.to_string()));
        assert_eq!(harness.runtime.backend.snapshot().participants.len(), 6);

        harness.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        harness
            .tx
            .send(InternalEvent::OperationFinished {
                request_id: id,
                result,
            })
            .expect("send");
        harness.pump_internal();
        assert_eq!(
            harness.state.participants.items(),
            harness.runtime.backend.snapshot().participants.as_slice()
        );
        assert!(harness.state.confirm.is_idle());
    }

    #[test]
    fn esc_during_processing_does_not_abort() {
        let mut harness = Harness::new(Role::Organizer);
        harness.runtime.defer = true;
        harness.key(KeyCode::Char('d'));
        harness.key(KeyCode::Enter);
        harness.key(KeyCode::Esc);
        assert!(harness.runtime.cancelled.is_empty());
        assert!(!harness.state.abort_requested);
        assert!(harness.state.confirm.is_locked());
    }

    #[test]
    fn ctrl_c_quits_when_idle() {
        let mut harness = Harness::new(Role::Organizer);
        assert!(harness.key_with(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(harness.key(KeyCode::Char('q')));
    }

    #[test]
    fn profile_form_edits_and_saves() {
        let mut harness = Harness::new(Role::Participant);
        harness.key(KeyCode::Tab);
        assert_eq!(harness.state.active_tab, TabKind::Profile);
        harness.key(KeyCode::Char('e'));
        assert!(matches!(harness.state.mode, AppMode::Form(_)));

        harness.key(KeyCode::Tab);
        for _ in 0..20 {
            harness.key(KeyCode::Backspace);
        }
        harness.keys("Kone");
        harness.key(KeyCode::Enter);
        assert_eq!(harness.state.mode, AppMode::Nav);
        let profile = harness.state.profile.clone().expect("profile");
        assert_eq!(profile.last_name, "Kone");
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('e'));
        harness.key(KeyCode::Tab);
        harness.key(KeyCode::Tab);
        for _ in 0..40 {
            harness.key(KeyCode::Backspace);
        }
        harness.keys("not-an-email");
        harness.key(KeyCode::Enter);
        assert!(matches!(harness.state.mode, AppMode::Form(_)));
        let form = harness.state.form.clone().expect("form");
        assert!(form.error.expect("error").contains("email"));
        harness.key(KeyCode::Esc);
        assert!(harness.state.form.is_none());
    }

    #[test]
    fn export_writes_through_runtime() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('o'));
        harness.key(KeyCode::Char('o'));
        harness.key(KeyCode::Char('o'));
        harness.key(KeyCode::Char('E'));
        let (file_name, contents) = harness.runtime.exports.pop().expect("export");
        assert_eq!(file_name, "participants-tous.csv");
        assert_eq!(contents.lines().count(), 8);
        let notification = harness.state.notification.clone().expect("notification");
        assert!(notification.message.contains("participants-tous.csv"));
    }

    #[test]
    fn failed_export_surfaces_error() {
        let mut harness = Harness::new(Role::Organizer);
        harness.runtime.fail_export = true;
        harness.key(KeyCode::Char('A'));
        harness.key(KeyCode::Char('E'));
        let notification = harness.state.notification.clone().expect("notification");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.contains("disk full"));
    }

    #[test]
    fn checkout_keys_pick_and_pay() {
        let mut harness = Harness::new(Role::Participant);
        assert_eq!(harness.state.active_tab, TabKind::Activities);
        harness.key(KeyCode::Char(' '));
        harness.key(KeyCode::Char('v'));
        assert_eq!(harness.state.checkout.total(&harness.state.activities), 50_000);

        harness.key(KeyCode::Char('P'));
        harness.key(KeyCode::Char('y'));
        assert!(harness.state.checkout.is_empty());
        let notification = harness.state.notification.clone().expect("notification");
        assert!(notification.message.contains("50"));
    }

    #[test]
    fn help_toggles_and_blocks_nav_keys() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('?'));
        assert_eq!(harness.state.mode, AppMode::Help);
        assert!(!harness.key(KeyCode::Char('q')));
        harness.key(KeyCode::Esc);
        assert_eq!(harness.state.mode, AppMode::Nav);
        assert!(help_overlay_text().contains("ctrl+c"));
    }

    #[test]
    fn stale_notification_clear_keeps_newer_message() {
        let mut harness = Harness::new(Role::Organizer);
        harness.key(KeyCode::Char('o'));
        let first = harness.state.notification.clone().expect("first").token;
        harness.key(KeyCode::Char('f'));
        let second = harness.state.notification.clone().expect("second").token;

        harness
            .tx
            .send(InternalEvent::ClearNotification { token: first })
            .expect("send");
        harness.pump_internal();
        assert!(harness.state.notification.is_some());

        harness
            .tx
            .send(InternalEvent::ClearNotification { token: second })
            .expect("send");
        harness.pump_internal();
        assert!(harness.state.notification.is_none());
    }

    #[test]
    fn status_text_shows_mode_and_notification() {
        let mut harness = Harness::new(Role::Organizer);
        assert!(status_text(&harness.state).starts_with("NAV | "));
        harness.key(KeyCode::Char('f'));
        let text = status_text(&harness.state);
        assert!(text.contains("info: export format: json"), "{text}");
    }

    #[test]
    fn survey_text_renders_reference_tallies() {
        let mut harness = Harness::new(Role::Organizer);
        harness.state.surveys = seed::surveys();
        let text = survey_text(&harness.state);
        assert!(text.contains("212 answers"), "{text}");
        assert!(text.contains("74%"), "{text}");
        assert!(text.contains("most popular: Oui (156)"), "{text}");
    }

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).expect("terminal");
        terminal.draw(|frame| render(frame, state)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn render_draws_participant_rows() {
        let harness = Harness::new(Role::Organizer);
        let screen = screen(&harness.state);
        assert!(screen.contains("Koffi Yao"));
        assert!(screen.contains("page 1/1"));
    }

    #[test]
    fn header_checkbox_follows_whole_page_selection() {
        let mut harness = Harness::new(Role::Organizer);
        assert_eq!(screen(&harness.state).matches("[x]").count(), 0);

        harness.key(KeyCode::Char('A'));
        assert_eq!(harness.state.participants.selection().len(), 7);
        assert_eq!(screen(&harness.state).matches("[x]").count(), 8);

        harness.key(KeyCode::Char(' '));
        assert_eq!(screen(&harness.state).matches("[x]").count(), 6);
    }

    #[test]
    fn footer_flags_a_page_past_the_filtered_end() {
        let mut harness = Harness::new(Role::Organizer);
        harness
            .state
            .participants
            .apply(ListCommand::SetPageSize(PageSize::Five));
        harness.state.participants.apply(ListCommand::NextPage);
        let text = page_footer_text(&harness.state.participants, &harness.state);
        assert!(text.starts_with("page 2/2"), "{text}");
        assert!(!text.contains("past last page"), "{text}");

        harness
            .state
            .participants
            .apply(ListCommand::SetTerm("koffi".to_owned()));
        assert_eq!(harness.state.participants.pagination().page(), 2);
        let text = page_footer_text(&harness.state.participants, &harness.state);
        assert!(text.contains("page 2/1"), "{text}");
        assert!(text.contains("past last page"), "{text}");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
