// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use eventdesk_app::listing::{FilterState, ListCommand, ListView, PageSize, apply_filter};
use eventdesk_app::{
    AppCommand, AppEvent, AppState, NotificationKind, OperationError, OperationOutcome,
    ParticipantId, PendingOperation, Role, RowRef,
};
use eventdesk_data::{Backend, DataError, Directory, seed};
use eventdesk_testkit::EventFaker;
use std::sync::mpsc;
use std::time::Duration;

fn requested(events: &[AppEvent]) -> Option<(u64, PendingOperation)> {
    events.iter().find_map(|event| match event {
        AppEvent::OperationRequested {
            request_id,
            operation,
        } => Some((*request_id, operation.clone())),
        _ => None,
    })
}

#[test]
fn search_koffi_matches_only_the_first_seed_participant() {
    let items = seed::participants();
    assert_eq!(items.len(), 7);

    for term in ["Koffi", "koffi", "KOFFI", "  Koffi "] {
        let matched = apply_filter(&items, &FilterState::with_term(term));
        assert_eq!(matched.len(), 1, "term {term:?}");
        assert_eq!(matched[0].id, ParticipantId::new(1));
    }
}

#[test]
fn search_by_full_name_finds_koffi_yao() {
    let items = seed::participants();
    for term in ["Koffi Yao", "koffi yao", "i Ya"] {
        let matched = apply_filter(&items, &FilterState::with_term(term));
        assert_eq!(matched.len(), 1, "term {term:?}");
        assert_eq!(matched[0].id, ParticipantId::new(1));
    }
    assert!(apply_filter(&items, &FilterState::with_term("Yao Koffi")).is_empty());
}

#[test]
fn page_size_ten_shows_whole_seed_on_one_page() {
    let view = ListView::new(seed::participants(), PageSize::Ten);
    assert_eq!(view.pagination().page(), 1);
    assert_eq!(view.page_rows().len(), 7);
    assert_eq!(view.total_pages(), 1);
}

#[test]
fn delete_id_three_through_confirm_flow() -> Result<()> {
    let backend = Backend::seeded(Duration::from_millis(5));
    let mut state = AppState::new(Role::Organizer, PageSize::Ten);
    state.dispatch(AppCommand::Load(backend.snapshot()));

    state.dispatch(AppCommand::List(ListCommand::ToggleRow(RowRef::Participant(
        ParticipantId::new(3),
    ))));
    let events = state.dispatch(AppCommand::RequestDelete);
    assert!(matches!(
        events.as_slice(),
        [AppEvent::ConfirmRequested { .. }]
    ));

    let (request_id, operation) =
        requested(&state.dispatch(AppCommand::Confirm)).ok_or_else(|| anyhow!("no request"))?;
    assert_eq!(
        operation,
        PendingOperation::DeleteParticipants(vec![ParticipantId::new(3)])
    );

    let (tx, rx) = mpsc::channel();
    let handle = backend.spawn(request_id, operation, move |id, result| {
        let _ = tx.send((id, result));
    });
    let (finished_id, result) = rx.recv_timeout(Duration::from_secs(5))?;
    handle.join();
    assert_eq!(finished_id, request_id);

    let events = state.dispatch(AppCommand::OperationFinished {
        request_id,
        result: result.map_err(OperationError::from),
    });
    assert!(events.contains(&AppEvent::OperationApplied { request_id }));

    let items = state.participants.items();
    assert_eq!(items.len(), 6);
    assert!(items.iter().all(|row| row.id != ParticipantId::new(3)));
    let notification = state
        .notification
        .clone()
        .ok_or_else(|| anyhow!("no notification"))?;
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(backend.snapshot().participants.len(), 6);
    Ok(())
}

#[test]
fn seeded_survey_reports_reference_tallies() {
    let surveys = seed::surveys();
    let question = &surveys[0].questions[0];
    assert_eq!(question.total(), 212);
    assert_eq!(question.percentage("Oui"), Some(74));
    assert_eq!(question.most_popular(), Some(("Oui", 156)));
}

#[test]
fn cancelled_operation_is_not_applied() -> Result<()> {
    let backend = Backend::seeded(Duration::from_millis(500));
    let (tx, rx) = mpsc::channel();
    let handle = backend.spawn(
        7,
        PendingOperation::DeleteParticipants(vec![ParticipantId::new(1)]),
        move |id, result| {
            let _ = tx.send((id, result));
        },
    );
    handle.cancel();
    assert!(handle.is_cancelled());

    let (id, result) = rx.recv_timeout(Duration::from_secs(5))?;
    handle.join();
    assert_eq!(id, 7);
    assert_eq!(result, Err(DataError::Cancelled));
    assert_eq!(backend.snapshot().participants.len(), 7);
    Ok(())
}

#[test]
fn abort_after_commit_keeps_console_and_backend_in_sync() -> Result<()> {
    let backend = Backend::seeded(Duration::ZERO);
    let mut state = AppState::new(Role::Organizer, PageSize::Ten);
    state.dispatch(AppCommand::Load(backend.snapshot()));
    state.dispatch(AppCommand::RequestDelete);
    let (request_id, operation) =
        requested(&state.dispatch(AppCommand::Confirm)).ok_or_else(|| anyhow!("no request"))?;

    let (tx, rx) = mpsc::channel();
    let handle = backend.spawn(request_id, operation, move |id, result| {
        let _ = tx.send((id, result));
    });
    let (_, result) = rx.recv_timeout(Duration::from_secs(5))?;
    handle.join();
    assert_eq!(backend.snapshot().participants.len(), 6);

    // The abort lands after the worker already committed.
    handle_abort_then_finish(&mut state, request_id, result.map_err(OperationError::from));
    assert_eq!(
        state.participants.items(),
        backend.snapshot().participants.as_slice()
    );
    assert!(state.confirm.is_idle());
    assert!(state.in_flight.is_none());
    Ok(())
}

fn handle_abort_then_finish(
    state: &mut AppState,
    request_id: u64,
    result: std::result::Result<OperationOutcome, OperationError>,
) {
    let events = state.dispatch(AppCommand::AbortOperation);
    assert_eq!(events[0], AppEvent::OperationAborted { request_id });
    assert!(state.confirm.is_locked());
    state.dispatch(AppCommand::OperationFinished { request_id, result });
}

#[test]
fn injected_failure_leaves_directory_untouched_once() -> Result<()> {
    let backend = Backend::seeded(Duration::ZERO);
    backend.fail_next();

    let operation = PendingOperation::DeleteInvites(vec![eventdesk_app::InviteId::new(1)]);
    let error = backend
        .execute(operation.clone())
        .expect_err("injected failure");
    assert!(matches!(error, DataError::SimulatedFailure(_)));
    assert_eq!(backend.snapshot().invites.len(), 5);

    let outcome = backend.execute(operation)?;
    let OperationOutcome::Invites(invites) = outcome else {
        return Err(anyhow!("expected invites outcome"));
    };
    assert_eq!(invites.len(), 4);
    Ok(())
}

#[test]
fn failed_operation_surfaces_as_error_notification() -> Result<()> {
    let backend = Backend::seeded(Duration::ZERO);
    let mut state = AppState::default();
    state.dispatch(AppCommand::Load(backend.snapshot()));
    backend.fail_next();

    state.dispatch(AppCommand::RequestDelete);
    let (request_id, operation) =
        requested(&state.dispatch(AppCommand::Confirm)).ok_or_else(|| anyhow!("no request"))?;
    let result = backend.execute(operation).map_err(OperationError::from);
    state.dispatch(AppCommand::OperationFinished { request_id, result });

    let notification = state
        .notification
        .clone()
        .ok_or_else(|| anyhow!("no notification"))?;
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.message.contains("simulated failure"));
    assert_eq!(state.participants.items().len(), 7);
    Ok(())
}

#[test]
fn generated_directories_round_trip_deletes() -> Result<()> {
    for faker_seed in 1_u64..15 {
        let mut faker = EventFaker::new(faker_seed);
        let mut snapshot = seed::snapshot();
        snapshot.participants = faker.participants(40);
        let mut directory = Directory::from_snapshot(snapshot);

        let doomed: Vec<ParticipantId> = directory
            .participants()
            .iter()
            .filter(|participant| participant.id.get() % 3 == 0)
            .map(|participant| participant.id)
            .collect();
        let remaining = directory.delete_participants(&doomed)?;
        assert_eq!(remaining.len(), 40 - doomed.len(), "seed {faker_seed}");
        assert!(remaining.iter().all(|row| !doomed.contains(&row.id)));
    }
    Ok(())
}
