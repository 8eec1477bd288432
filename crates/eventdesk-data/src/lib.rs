// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod backend;
mod error;
pub mod seed;

pub use backend::{Backend, OperationHandle};
pub use error::{DataError, DataResult};

use eventdesk_app::validation::{validate_email, validate_phone};
use eventdesk_app::{
    Activity, DirectorySnapshot, Invite, InviteId, OperationOutcome, Participant, ParticipantId,
    PaymentRequest, PendingOperation, Profile, Survey,
};
use log::{debug, info};

/// In-memory event directory. Every write replaces the touched collection
/// whole and hands the new collection back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    participants: Vec<Participant>,
    invites: Vec<Invite>,
    activities: Vec<Activity>,
    surveys: Vec<Survey>,
    profile: Option<Profile>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Directory {
    pub fn seeded() -> Self {
        Self::from_snapshot(seed::snapshot())
    }

    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Self {
        Self {
            participants: snapshot.participants,
            invites: snapshot.invites,
            activities: snapshot.activities,
            surveys: snapshot.surveys,
            profile: snapshot.profile,
        }
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot {
            participants: self.participants.clone(),
            invites: self.invites.clone(),
            activities: self.activities.clone(),
            surveys: self.surveys.clone(),
            profile: self.profile.clone(),
        }
    }

    /// Drops every change and restores the seed.
    pub fn reset(&mut self) {
        info!("directory reset to seed");
        *self = Self::seeded();
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn invites(&self) -> &[Invite] {
        &self.invites
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn participant(&self, id: ParticipantId) -> DataResult<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.id == id)
            .ok_or(DataError::NotFound {
                kind: "participant",
                id: id.get(),
            })
    }

    pub fn invite(&self, id: InviteId) -> DataResult<&Invite> {
        self.invites
            .iter()
            .find(|invite| invite.id == id)
            .ok_or(DataError::NotFound {
                kind: "invite",
                id: id.get(),
            })
    }

    /// Removes every listed participant; nothing changes if one is missing.
    pub fn delete_participants(&mut self, ids: &[ParticipantId]) -> DataResult<Vec<Participant>> {
        for id in ids {
            self.participant(*id)?;
        }
        self.participants = self
            .participants
            .iter()
            .filter(|participant| !ids.contains(&participant.id))
            .cloned()
            .collect();
        debug!("deleted {} participants", ids.len());
        Ok(self.participants.clone())
    }

    pub fn delete_invites(&mut self, ids: &[InviteId]) -> DataResult<Vec<Invite>> {
        for id in ids {
            self.invite(*id)?;
        }
        self.invites = self
            .invites
            .iter()
            .filter(|invite| !ids.contains(&invite.id))
            .cloned()
            .collect();
        debug!("deleted {} invites", ids.len());
        Ok(self.invites.clone())
    }

    pub fn update_participant(&mut self, updated: Participant) -> DataResult<Vec<Participant>> {
        self.participant(updated.id)?;
        check_contact(&updated.email, &updated.phone)?;
        self.participants = self
            .participants
            .iter()
            .map(|participant| {
                if participant.id == updated.id {
                    updated.clone()
                } else {
                    participant.clone()
                }
            })
            .collect();
        Ok(self.participants.clone())
    }

    /// Marks presence; the émargement is captured at the same desk.
    pub fn check_in(&mut self, id: ParticipantId) -> DataResult<Vec<Participant>> {
        let participant = self.participant(id)?;
        if participant.checked {
            return Err(DataError::Validation(format!(
                "{} is already checked in",
                participant.full_name()
            )));
        }
        let updated = Participant {
            checked: true,
            signed: true,
            ..participant.clone()
        };
        self.update_participant(updated)
    }

    pub fn update_profile(&mut self, profile: Profile) -> DataResult<Profile> {
        if profile.first_name.trim().is_empty() || profile.last_name.trim().is_empty() {
            return Err(DataError::Validation("profile name is required".to_owned()));
        }
        check_contact(&profile.email, &profile.phone)?;
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Re-prices every line against the catalogue and returns the total.
    pub fn submit_payment(&self, request: PaymentRequest) -> DataResult<i64> {
        if request.lines.is_empty() {
            return Err(DataError::Validation("payment has no lines".to_owned()));
        }
        for line in &request.lines {
            let activity = self
                .activities
                .iter()
                .find(|activity| activity.id == line.activity)
                .ok_or(DataError::NotFound {
                    kind: "activity",
                    id: line.activity.get(),
                })?;
            if activity.price(line.standing) != Some(line.amount) {
                return Err(DataError::Validation(format!(
                    "price of {} {} changed",
                    activity.name,
                    line.standing.label()
                )));
            }
        }
        let total: i64 = request.lines.iter().map(|line| line.amount).sum();
        if total != request.total {
            return Err(DataError::Validation("payment total mismatch".to_owned()));
        }
        info!("payment of {total} accepted");
        Ok(total)
    }

    pub fn execute(&mut self, operation: PendingOperation) -> DataResult<OperationOutcome> {
        match operation {
            PendingOperation::DeleteParticipants(ids) => self
                .delete_participants(&ids)
                .map(OperationOutcome::Participants),
            PendingOperation::DeleteInvites(ids) => {
                self.delete_invites(&ids).map(OperationOutcome::Invites)
            }
            PendingOperation::UpdateParticipant(participant) => self
                .update_participant(participant)
                .map(OperationOutcome::Participants),
            PendingOperation::UpdateProfile(profile) => {
                self.update_profile(profile).map(OperationOutcome::Profile)
            }
            PendingOperation::CheckIn(id) => self.check_in(id).map(OperationOutcome::Participants),
            PendingOperation::SubmitPayment(request) => self
                .submit_payment(request)
                .map(|total| OperationOutcome::PaymentRecorded { total }),
        }
    }
}

fn check_contact(email: &str, phone: &str) -> DataResult<()> {
    validate_email(email).map_err(|error| DataError::Validation(format!("email: {error}")))?;
    if !phone.trim().is_empty() {
        validate_phone(phone).map_err(|error| DataError::Validation(format!("phone: {error}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DataError, Directory};
    use eventdesk_app::{ParticipantId, PendingOperation};

    #[test]
    fn delete_with_unknown_id_changes_nothing() {
        let mut directory = Directory::seeded();
        let error = directory
            .delete_participants(&[ParticipantId::new(2), ParticipantId::new(99)])
            .expect_err("unknown id");
        assert_eq!(
            error,
            DataError::NotFound {
                kind: "participant",
                id: 99
            }
        );
        assert_eq!(directory.participants().len(), 7);
    }

    #[test]
    fn check_in_sets_presence_and_signature() {
        let mut directory = Directory::seeded();
        let id = ParticipantId::new(3);
        directory.check_in(id).expect("check in");
        let participant = directory.participant(id).expect("participant");
        assert!(participant.checked);
        assert!(participant.signed);
        assert!(matches!(
            directory.check_in(id),
            Err(DataError::Validation(_))
        ));
    }

    #[test]
    fn update_rejects_bad_email() {
        let mut directory = Directory::seeded();
        let mut participant = directory
            .participant(ParticipantId::new(1))
            .expect("participant")
            .clone();
        participant.email = "nope".to_owned();
        let error = directory
            .execute(PendingOperation::UpdateParticipant(participant))
            .expect_err("bad email");
        assert!(error.to_string().contains("email"));
    }

    #[test]
    fn reset_restores_seed() {
        let mut directory = Directory::seeded();
        directory
            .delete_participants(&[ParticipantId::new(1)])
            .expect("delete");
        directory.reset();
        assert_eq!(directory, Directory::seeded());
    }
}
