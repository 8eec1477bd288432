// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use log::{debug, info, warn};

use crate::checkout::{Checkout, PaymentRequest};
use crate::confirm::{ConfirmFlow, Notification, NotificationKind};
use crate::export::{ExportFormat, ExportScope, export_rows};
use crate::forms::{FormKind, FormPayload, ParticipantFormInput, ProfileFormInput};
use crate::listing::{ListCommand, ListEvent, ListView, Modal, PageSize};
use crate::validation::format_xof;
use crate::{
    Activity, ActivityId, DirectorySnapshot, Invite, InviteId, Participant, ParticipantId,
    Profile, Role, Survey, TabKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    Form(FormKind),
    Help,
}

/// Row identity across the console's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowRef {
    Participant(ParticipantId),
    Invite(InviteId),
    Activity(ActivityId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOperation {
    DeleteParticipants(Vec<ParticipantId>),
    DeleteInvites(Vec<InviteId>),
    UpdateParticipant(Participant),
    UpdateProfile(Profile),
    CheckIn(ParticipantId),
    SubmitPayment(PaymentRequest),
}

impl PendingOperation {
    pub fn describe(&self) -> String {
        match self {
            Self::DeleteParticipants(ids) => {
                format!("delete {}", plural(ids.len(), "participant"))
            }
            Self::DeleteInvites(ids) => format!("delete {}", plural(ids.len(), "invite")),
            Self::UpdateParticipant(participant) => {
                format!("save participant {}", participant.full_name())
            }
            Self::UpdateProfile(_) => "save profile".to_owned(),
            Self::CheckIn(id) => format!("check in participant #{id}"),
            Self::SubmitPayment(request) => format!(
                "pay {} by {}",
                format_xof(request.total),
                request.method.label()
            ),
        }
    }

    fn success_message(&self) -> String {
        match self {
            Self::DeleteParticipants(ids) => {
                format!("deleted {}", plural(ids.len(), "participant"))
            }
            Self::DeleteInvites(ids) => format!("deleted {}", plural(ids.len(), "invite")),
            Self::UpdateParticipant(participant) => {
                format!("saved participant {}", participant.full_name())
            }
            Self::UpdateProfile(_) => "profile saved".to_owned(),
            Self::CheckIn(id) => format!("participant #{id} checked in"),
            Self::SubmitPayment(request) => {
                format!("payment of {} recorded", format_xof(request.total))
            }
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// What a finished operation hands back. Collections are replaced whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Participants(Vec<Participant>),
    Invites(Vec<Invite>),
    Profile(Profile),
    PaymentRecorded { total: i64 },
}

/// Why an operation handed back no outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("cancelled before it ran")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub payload: FormPayload,
    pub field: usize,
    pub error: Option<String>,
}

impl FormState {
    fn new(payload: FormPayload) -> Self {
        Self {
            payload,
            field: 0,
            error: None,
        }
    }

    pub fn current_value(&self) -> &str {
        self.payload.contact().field(self.field).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub role: Role,
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub participants: ListView<Participant>,
    pub invites: ListView<Invite>,
    pub activities: Vec<Activity>,
    pub activity_cursor: usize,
    pub checkout: Checkout,
    pub surveys: Vec<Survey>,
    pub survey_cursor: usize,
    pub profile: Option<Profile>,
    pub detail: Modal<RowRef>,
    pub form: Option<FormState>,
    pub confirm: ConfirmFlow<PendingOperation>,
    pub in_flight: Option<u64>,
    /// Set once an abort was requested for `in_flight`; the result still decides.
    pub abort_requested: bool,
    pub export_scope: ExportScope,
    pub export_format: ExportFormat,
    pub notification: Option<Notification>,
    next_request_id: u64,
    next_token: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Role::Organizer, PageSize::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Load(DirectorySnapshot),
    NextTab,
    PrevTab,
    EnterSearch,
    ExitToNav,
    ToggleHelp,
    List(ListCommand<RowRef>),
    MoveCursor(isize),
    OpenDetail,
    CloseDetail,
    RequestDelete,
    RequestCheckIn,
    OpenForm(FormKind),
    FormNextField,
    FormPrevField,
    FormInput(char),
    FormBackspace,
    SubmitForm,
    CancelForm,
    ToggleActivity,
    CycleStanding,
    CyclePaymentMethod,
    RequestPayment,
    Confirm,
    Cancel,
    AbortOperation,
    OperationFinished {
        request_id: u64,
        result: Result<OperationOutcome, OperationError>,
    },
    CycleExportScope,
    ToggleExportFormat,
    Export,
    Notify(NotificationKind, String),
    ClearNotification(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Loaded,
    ModeChanged(AppMode),
    TabChanged(TabKind),
    List(ListEvent),
    CursorMoved(usize),
    DetailOpened(RowRef),
    DetailClosed,
    FormOpened(FormKind),
    FormInvalid(String),
    FormClosed,
    CheckoutChanged { total: i64 },
    ConfirmRequested { summary: String },
    ConfirmDismissed,
    OperationRequested {
        request_id: u64,
        operation: PendingOperation,
    },
    OperationAborted { request_id: u64 },
    OperationApplied { request_id: u64 },
    ExportReady { file_name: String, contents: String },
    Notified(Notification),
    NotificationCleared,
    Unchanged,
}

impl AppState {
    pub fn new(role: Role, page_size: PageSize) -> Self {
        Self {
            role,
            mode: AppMode::Nav,
            active_tab: role.tabs()[0],
            participants: ListView::new(Vec::new(), page_size),
            invites: ListView::new(Vec::new(), page_size),
            activities: Vec::new(),
            activity_cursor: 0,
            checkout: Checkout::default(),
            surveys: Vec::new(),
            survey_cursor: 0,
            profile: None,
            detail: Modal::default(),
            form: None,
            confirm: ConfirmFlow::default(),
            in_flight: None,
            abort_requested: false,
            export_scope: ExportScope::Selection,
            export_format: ExportFormat::Csv,
            notification: None,
            next_request_id: 1,
            next_token: 1,
        }
    }

    pub fn tabs(&self) -> &'static [TabKind] {
        self.role.tabs()
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Load(snapshot) => self.load(snapshot),
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::EnterSearch => {
                if !self.active_tab.has_list() {
                    return vec![AppEvent::Unchanged];
                }
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleHelp => {
                self.mode = if self.mode == AppMode::Help {
                    AppMode::Nav
                } else {
                    AppMode::Help
                };
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::List(list_command) => self.route_list(list_command),
            AppCommand::MoveCursor(delta) => self.move_cursor(delta),
            AppCommand::OpenDetail => self.open_detail(),
            AppCommand::CloseDetail => match self.detail.close() {
                Some(_) => vec![AppEvent::DetailClosed],
                None => vec![AppEvent::Unchanged],
            },
            AppCommand::RequestDelete => self.request_delete(),
            AppCommand::RequestCheckIn => self.request_check_in(),
            AppCommand::OpenForm(kind) => self.open_form(kind),
            AppCommand::FormNextField => self.step_form_field(1),
            AppCommand::FormPrevField => self.step_form_field(-1),
            AppCommand::FormInput(ch) => self.edit_form_field(|value| value.push(ch)),
            AppCommand::FormBackspace => self.edit_form_field(|value| {
                value.pop();
            }),
            AppCommand::SubmitForm => self.submit_form(),
            AppCommand::CancelForm => {
                if self.form.take().is_none() {
                    return vec![AppEvent::Unchanged];
                }
                self.mode = AppMode::Nav;
                vec![AppEvent::FormClosed, AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleActivity => self.toggle_activity(),
            AppCommand::CycleStanding => {
                let Some(activity) = self.activities.get(self.activity_cursor) else {
                    return vec![AppEvent::Unchanged];
                };
                if self.checkout.cycle_standing(activity).is_none() {
                    return vec![AppEvent::Unchanged];
                }
                vec![self.checkout_changed()]
            }
            AppCommand::CyclePaymentMethod => {
                self.checkout.method = self.checkout.method.next();
                vec![self.checkout_changed()]
            }
            AppCommand::RequestPayment => {
                match PaymentRequest::build(&self.checkout, &self.activities) {
                    Ok(request) => self.request(PendingOperation::SubmitPayment(request)),
                    Err(error) => vec![self.notify(NotificationKind::Error, error.to_string())],
                }
            }
            AppCommand::Confirm => self.confirm_pending(),
            AppCommand::Cancel => match self.confirm.cancel() {
                Ok(operation) => {
                    debug!("dismissed: {}", operation.describe());
                    vec![AppEvent::ConfirmDismissed]
                }
                Err(_) => vec![AppEvent::Unchanged],
            },
            AppCommand::AbortOperation => self.abort_operation(),
            AppCommand::OperationFinished { request_id, result } => {
                self.finish_operation(request_id, result)
            }
            AppCommand::CycleExportScope => {
                self.export_scope = self.export_scope.next();
                let message = format!("export scope: {}", self.export_scope.label());
                vec![self.notify(NotificationKind::Info, message)]
            }
            AppCommand::ToggleExportFormat => {
                self.export_format = self.export_format.toggle();
                let message = format!("export format: {}", self.export_format.extension());
                vec![self.notify(NotificationKind::Info, message)]
            }
            AppCommand::Export => self.export(),
            AppCommand::Notify(kind, message) => vec![self.notify(kind, message)],
            AppCommand::ClearNotification(token) => {
                match &self.notification {
                    Some(current) if current.token == token => {
                        self.notification = None;
                        vec![AppEvent::NotificationCleared]
                    }
                    _ => vec![AppEvent::Unchanged],
                }
            }
        }
    }

    fn load(&mut self, snapshot: DirectorySnapshot) -> Vec<AppEvent> {
        info!(
            "loaded {} participants, {} invites, {} activities, {} surveys",
            snapshot.participants.len(),
            snapshot.invites.len(),
            snapshot.activities.len(),
            snapshot.surveys.len()
        );
        self.participants.replace_items(snapshot.participants);
        self.invites.replace_items(snapshot.invites);
        self.activities = snapshot.activities;
        self.surveys = snapshot.surveys;
        self.profile = snapshot.profile;
        self.activity_cursor = 0;
        self.survey_cursor = 0;
        self.checkout.clear();
        self.detail.close();
        vec![AppEvent::Loaded]
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = self.tabs();
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = tabs[(current + delta).rem_euclid(len) as usize];
        if next == self.active_tab {
            return vec![AppEvent::Unchanged];
        }
        match self.active_tab {
            TabKind::Participants => self.participants.reset_filters(),
            TabKind::Invites => self.invites.reset_filters(),
            TabKind::Activities | TabKind::Surveys | TabKind::Profile => {}
        }
        self.detail.close();
        self.active_tab = next;
        let mut events = vec![AppEvent::TabChanged(next)];
        if self.mode == AppMode::Search {
            self.mode = AppMode::Nav;
            events.push(AppEvent::ModeChanged(self.mode));
        }
        events
    }

    fn route_list(&mut self, command: ListCommand<RowRef>) -> Vec<AppEvent> {
        let events = match self.active_tab {
            TabKind::Participants => command
                .map_key(|key| match key {
                    RowRef::Participant(id) => Some(id),
                    _ => None,
                })
                .map(|command| self.participants.apply(command)),
            TabKind::Invites => command
                .map_key(|key| match key {
                    RowRef::Invite(id) => Some(id),
                    _ => None,
                })
                .map(|command| self.invites.apply(command)),
            TabKind::Activities | TabKind::Surveys | TabKind::Profile => None,
        };
        match events {
            Some(events) => events.into_iter().map(AppEvent::List).collect(),
            None => vec![AppEvent::Unchanged],
        }
    }

    fn move_cursor(&mut self, delta: isize) -> Vec<AppEvent> {
        let (cursor, len) = match self.active_tab {
            TabKind::Participants | TabKind::Invites => {
                return self.route_list(ListCommand::MoveCursor(delta));
            }
            TabKind::Activities => (&mut self.activity_cursor, self.activities.len()),
            TabKind::Surveys => (&mut self.survey_cursor, self.surveys.len()),
            TabKind::Profile => return vec![AppEvent::Unchanged],
        };
        if len == 0 {
            return vec![AppEvent::Unchanged];
        }
        *cursor = (*cursor as isize + delta).clamp(0, len as isize - 1) as usize;
        vec![AppEvent::CursorMoved(*cursor)]
    }

    /// Row under the cursor on the active tab.
    pub fn cursor_row(&self) -> Option<RowRef> {
        match self.active_tab {
            TabKind::Participants => self
                .participants
                .cursor_row()
                .map(|row| RowRef::Participant(row.id)),
            TabKind::Invites => self.invites.cursor_row().map(|row| RowRef::Invite(row.id)),
            TabKind::Activities => self
                .activities
                .get(self.activity_cursor)
                .map(|activity| RowRef::Activity(activity.id)),
            TabKind::Surveys | TabKind::Profile => None,
        }
    }

    fn open_detail(&mut self) -> Vec<AppEvent> {
        match self.cursor_row() {
            Some(row) => {
                self.detail.open(row);
                vec![AppEvent::DetailOpened(row)]
            }
            None => vec![AppEvent::Unchanged],
        }
    }

    fn request_delete(&mut self) -> Vec<AppEvent> {
        let operation = match self.active_tab {
            TabKind::Participants => {
                let mut ids: Vec<ParticipantId> = self.participants.selection().ids().collect();
                if ids.is_empty() {
                    ids.extend(self.participants.cursor_row().map(|row| row.id));
                }
                (!ids.is_empty()).then_some(PendingOperation::DeleteParticipants(ids))
            }
            TabKind::Invites => {
                let mut ids: Vec<InviteId> = self.invites.selection().ids().collect();
                if ids.is_empty() {
                    ids.extend(self.invites.cursor_row().map(|row| row.id));
                }
                (!ids.is_empty()).then_some(PendingOperation::DeleteInvites(ids))
            }
            TabKind::Activities | TabKind::Surveys | TabKind::Profile => {
                return vec![AppEvent::Unchanged];
            }
        };
        match operation {
            Some(operation) => self.request(operation),
            None => vec![self.notify(NotificationKind::Info, "no row to delete".to_owned())],
        }
    }

    fn request_check_in(&mut self) -> Vec<AppEvent> {
        if self.active_tab != TabKind::Participants {
            return vec![AppEvent::Unchanged];
        }
        let Some(row) = self.participants.cursor_row() else {
            return vec![self.notify(NotificationKind::Info, "no row to check in".to_owned())];
        };
        if row.checked {
            let message = format!("{} is already checked in", row.full_name());
            return vec![self.notify(NotificationKind::Info, message)];
        }
        let id = row.id;
        self.request(PendingOperation::CheckIn(id))
    }

    fn open_form(&mut self, kind: FormKind) -> Vec<AppEvent> {
        let payload = match kind {
            FormKind::Profile => self
                .profile
                .as_ref()
                .map(|profile| FormPayload::Profile(ProfileFormInput::from_profile(profile))),
            FormKind::Participant => {
                if self.active_tab != TabKind::Participants {
                    return vec![AppEvent::Unchanged];
                }
                self.participants.cursor_row().map(|row| {
                    FormPayload::Participant(ParticipantFormInput::from_participant(row))
                })
            }
        };
        let Some(payload) = payload else {
            let message = format!("no {} to edit", kind.label());
            return vec![self.notify(NotificationKind::Info, message)];
        };
        self.form = Some(FormState::new(payload));
        self.mode = AppMode::Form(kind);
        vec![AppEvent::FormOpened(kind), AppEvent::ModeChanged(self.mode)]
    }

    fn step_form_field(&mut self, delta: isize) -> Vec<AppEvent> {
        let Some(form) = self.form.as_mut() else {
            return vec![AppEvent::Unchanged];
        };
        let len = crate::forms::CONTACT_FIELD_LABELS.len() as isize;
        form.field = (form.field as isize + delta).rem_euclid(len) as usize;
        vec![AppEvent::CursorMoved(form.field)]
    }

    fn edit_form_field(&mut self, edit: impl FnOnce(&mut String)) -> Vec<AppEvent> {
        let Some(form) = self.form.as_mut() else {
            return vec![AppEvent::Unchanged];
        };
        match form.payload.contact_mut().field_mut(form.field) {
            Some(value) => {
                edit(value);
                form.error = None;
                vec![AppEvent::Unchanged]
            }
            None => vec![AppEvent::Unchanged],
        }
    }

    fn submit_form(&mut self) -> Vec<AppEvent> {
        let Some(form) = self.form.as_ref() else {
            return vec![AppEvent::Unchanged];
        };
        let built = match form.payload.clone() {
            FormPayload::Profile(input) => input.into_profile().map(PendingOperation::UpdateProfile),
            FormPayload::Participant(input) => match self.participants.get(input.id) {
                Some(base) => input
                    .apply_to(base)
                    .map(PendingOperation::UpdateParticipant),
                None => Err(anyhow::anyhow!(
                    "participant #{} no longer exists -- close the form",
                    input.id
                )),
            },
        };
        let operation = match built {
            Ok(operation) => operation,
            Err(error) => {
                let message = error.to_string();
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(message.clone());
                }
                return vec![AppEvent::FormInvalid(message)];
            }
        };
        if let Err(error) = self.confirm.request(operation) {
            return vec![self.notify(NotificationKind::Error, error.to_string())];
        }
        self.form = None;
        self.mode = AppMode::Nav;
        let mut events = vec![AppEvent::FormClosed, AppEvent::ModeChanged(self.mode)];
        events.extend(self.confirm_pending());
        events
    }

    fn toggle_activity(&mut self) -> Vec<AppEvent> {
        let Some(activity) = self.activities.get(self.activity_cursor) else {
            return vec![AppEvent::Unchanged];
        };
        self.checkout.toggle(activity);
        vec![self.checkout_changed()]
    }

    fn checkout_changed(&self) -> AppEvent {
        AppEvent::CheckoutChanged {
            total: self.checkout.total(&self.activities),
        }
    }

    fn request(&mut self, operation: PendingOperation) -> Vec<AppEvent> {
        let summary = operation.describe();
        match self.confirm.request(operation) {
            Ok(()) => {
                debug!("confirm requested: {summary}");
                vec![AppEvent::ConfirmRequested { summary }]
            }
            Err(error) => vec![self.notify(NotificationKind::Error, error.to_string())],
        }
    }

    fn confirm_pending(&mut self) -> Vec<AppEvent> {
        let Ok(operation) = self.confirm.confirm() else {
            return vec![AppEvent::Unchanged];
        };
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(request_id);
        info!("request {request_id}: {}", operation.describe());
        vec![AppEvent::OperationRequested {
            request_id,
            operation,
        }]
    }

    /// Asks the runtime to cancel. The flow stays locked until the result
    /// arrives, since the backend may already have committed.
    fn abort_operation(&mut self) -> Vec<AppEvent> {
        let Some(request_id) = self.in_flight else {
            return vec![AppEvent::Unchanged];
        };
        if self.abort_requested {
            return vec![AppEvent::Unchanged];
        }
        self.abort_requested = true;
        let summary = self
            .confirm
            .target()
            .map(PendingOperation::describe)
            .unwrap_or_else(|| "operation".to_owned());
        info!("request {request_id}: abort requested");
        vec![
            AppEvent::OperationAborted { request_id },
            self.notify(NotificationKind::Info, format!("cancelling {summary}")),
        ]
    }

    fn finish_operation(
        &mut self,
        request_id: u64,
        result: Result<OperationOutcome, OperationError>,
    ) -> Vec<AppEvent> {
        if self.in_flight != Some(request_id) {
            debug!("ignoring stale result for request {request_id}");
            return vec![AppEvent::Unchanged];
        }
        self.in_flight = None;
        let aborted = std::mem::take(&mut self.abort_requested);
        let Ok(operation) = self.confirm.complete() else {
            warn!("request {request_id} finished without a processing operation");
            return vec![AppEvent::Unchanged];
        };
        match result {
            Ok(outcome) => {
                self.apply_outcome(outcome);
                if aborted {
                    info!("request {request_id} committed before the abort reached it");
                } else {
                    info!("request {request_id} applied");
                }
                vec![
                    AppEvent::OperationApplied { request_id },
                    self.notify(NotificationKind::Success, operation.success_message()),
                ]
            }
            Err(OperationError::Cancelled) => {
                info!("request {request_id} cancelled");
                let message = format!("{} cancelled", operation.describe());
                vec![self.notify(NotificationKind::Info, message)]
            }
            Err(OperationError::Failed(error)) => {
                warn!("request {request_id} failed: {error}");
                let message = format!("{} failed: {error}", operation.describe());
                vec![self.notify(NotificationKind::Error, message)]
            }
        }
    }

    fn apply_outcome(&mut self, outcome: OperationOutcome) {
        match outcome {
            OperationOutcome::Participants(items) => self.participants.replace_items(items),
            OperationOutcome::Invites(items) => self.invites.replace_items(items),
            OperationOutcome::Profile(profile) => self.profile = Some(profile),
            OperationOutcome::PaymentRecorded { .. } => self.checkout.clear(),
        }
        let stale = match self.detail.target() {
            Some(RowRef::Participant(id)) => self.participants.get(*id).is_none(),
            Some(RowRef::Invite(id)) => self.invites.get(*id).is_none(),
            Some(RowRef::Activity(_)) | None => false,
        };
        if stale {
            self.detail.close();
        }
    }

    fn export(&mut self) -> Vec<AppEvent> {
        let encoded = match self.active_tab {
            TabKind::Participants => {
                export_rows(&self.participants, self.export_scope, self.export_format)
            }
            TabKind::Invites => export_rows(&self.invites, self.export_scope, self.export_format),
            TabKind::Activities | TabKind::Surveys | TabKind::Profile => {
                return vec![AppEvent::Unchanged];
            }
        };
        match encoded {
            Ok(contents) => {
                let file_name = format!(
                    "{}-{}.{}",
                    self.active_tab.label(),
                    self.export_scope.label().replace(' ', "-"),
                    self.export_format.extension()
                );
                vec![AppEvent::ExportReady {
                    file_name,
                    contents,
                }]
            }
            Err(error) => vec![self.notify(NotificationKind::Error, error.to_string())],
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: String) -> AppEvent {
        let notification = Notification {
            kind,
            message,
            token: self.next_token,
        };
        self.next_token += 1;
        self.notification = Some(notification.clone());
        AppEvent::Notified(notification)
    }
}
