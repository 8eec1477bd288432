// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::validation::{validate_email, validate_phone};
use crate::{Participant, ParticipantId, Profile, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Profile,
    Participant,
}

impl FormKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Participant => "participant",
        }
    }
}

pub const CONTACT_FIELD_LABELS: [&str; 5] =
    ["first name", "last name", "email", "phone", "organization"];

/// Contact fields shared by the profile and participant forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
}

impl ContactFields {
    pub fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.first_name),
            1 => Some(&self.last_name),
            2 => Some(&self.email),
            3 => Some(&self.phone),
            4 => Some(&self.organization),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.email),
            3 => Some(&mut self.phone),
            4 => Some(&mut self.organization),
            _ => None,
        }
    }

    fn validate(&self, subject: &str) -> Result<()> {
        if self.first_name.trim().is_empty() {
            bail!("{subject} first name is required -- enter a first name and retry");
        }
        if self.last_name.trim().is_empty() {
            bail!("{subject} last name is required -- enter a last name and retry");
        }
        if let Err(error) = validate_email(&self.email) {
            bail!("{subject} email: {error} -- use the form name@domain.tld");
        }
        if !self.phone.trim().is_empty()
            && let Err(error) = validate_phone(&self.phone)
        {
            bail!("{subject} phone: {error} -- use 8 to 15 digits, optional leading +");
        }
        Ok(())
    }

    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            organization: self.organization.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFormInput {
    pub contact: ContactFields,
    pub role: Role,
}

impl ProfileFormInput {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            contact: ContactFields {
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                email: profile.email.clone(),
                phone: profile.phone.clone(),
                organization: profile.organization.clone(),
            },
            role: profile.role,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.contact.validate("profile")
    }

    pub fn into_profile(self) -> Result<Profile> {
        self.validate()?;
        let contact = self.contact.trimmed();
        Ok(Profile {
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            organization: contact.organization,
            role: self.role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFormInput {
    pub id: ParticipantId,
    pub contact: ContactFields,
}

impl ParticipantFormInput {
    pub fn from_participant(participant: &Participant) -> Self {
        Self {
            id: participant.id,
            contact: ContactFields {
                first_name: participant.first_name.clone(),
                last_name: participant.last_name.clone(),
                email: participant.email.clone(),
                phone: participant.phone.clone(),
                organization: participant.organization.clone(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.contact.validate("participant")
    }

    /// Applies the edited contact fields onto `base`, keeping its flags.
    pub fn apply_to(self, base: &Participant) -> Result<Participant> {
        self.validate()?;
        if base.id != self.id {
            bail!(
                "participant form targets #{} but row #{} was given",
                self.id,
                base.id
            );
        }
        let contact = self.contact.trimmed();
        Ok(Participant {
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            organization: contact.organization,
            ..base.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Profile(ProfileFormInput),
    Participant(ParticipantFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Profile(_) => FormKind::Profile,
            Self::Participant(_) => FormKind::Participant,
        }
    }

    pub fn contact(&self) -> &ContactFields {
        match self {
            Self::Profile(form) => &form.contact,
            Self::Participant(form) => &form.contact,
        }
    }

    pub fn contact_mut(&mut self) -> &mut ContactFields {
        match self {
            Self::Profile(form) => &mut form.contact,
            Self::Participant(form) => &mut form.contact,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Profile(form) => form.validate(),
            Self::Participant(form) => form.validate(),
        }
    }
}
