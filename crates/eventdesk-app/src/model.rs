// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use time::Date;

use crate::ids::*;
use crate::listing::{FilterField, Filterable, Keyed};
use crate::survey::QuestionTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Organizer,
    Supervisor,
    Operator,
    Participant,
}

impl Role {
    pub const ALL: [Self; 4] = [
        Self::Organizer,
        Self::Supervisor,
        Self::Operator,
        Self::Participant,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizer => "organizer",
            Self::Supervisor => "supervisor",
            Self::Operator => "operator",
            Self::Participant => "participant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "organizer" => Some(Self::Organizer),
            "supervisor" => Some(Self::Supervisor),
            "operator" => Some(Self::Operator),
            "participant" => Some(Self::Participant),
            _ => None,
        }
    }

    /// Tabs shown to this role, in display order. Never empty.
    pub const fn tabs(self) -> &'static [TabKind] {
        match self {
            Self::Organizer => &[
                TabKind::Participants,
                TabKind::Invites,
                TabKind::Activities,
                TabKind::Surveys,
                TabKind::Profile,
            ],
            Self::Supervisor => &[
                TabKind::Participants,
                TabKind::Invites,
                TabKind::Surveys,
                TabKind::Profile,
            ],
            Self::Operator => &[TabKind::Participants, TabKind::Profile],
            Self::Participant => &[TabKind::Activities, TabKind::Profile],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Participants,
    Invites,
    Activities,
    Surveys,
    Profile,
}

impl TabKind {
    pub const ALL: [Self; 5] = [
        Self::Participants,
        Self::Invites,
        Self::Activities,
        Self::Surveys,
        Self::Profile,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Participants => "participants",
            Self::Invites => "invites",
            Self::Activities => "activities",
            Self::Surveys => "surveys",
            Self::Profile => "profile",
        }
    }

    pub const fn has_list(self) -> bool {
        matches!(self, Self::Participants | Self::Invites)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Standing {
    Standard,
    Vip,
    Vvip,
}

impl Standing {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Vip, Self::Vvip];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Vip => "vip",
            Self::Vvip => "vvip",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Vip => "VIP",
            Self::Vvip => "VVIP",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(Self::Standard),
            "vip" => Some(Self::Vip),
            "vvip" => Some(Self::Vvip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InviteKind {
    Standard,
    Vip,
    Press,
}

impl InviteKind {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Vip, Self::Press];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Vip => "vip",
            Self::Press => "press",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(Self::Standard),
            "vip" => Some(Self::Vip),
            "press" => Some(Self::Press),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InviteStatus {
    Pending,
    Sent,
    Accepted,
    Declined,
}

impl InviteStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Sent, Self::Accepted, Self::Declined];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "sent" => Some(Self::Sent),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

pub const CONNECTION_VALUES: [&str; 2] = ["connected", "offline"];
pub const SIGNATURE_VALUES: [&str; 2] = ["signed", "unsigned"];
pub const CHECKING_VALUES: [&str; 2] = ["checked", "unchecked"];

const fn flag_value(flag: bool, values: [&'static str; 2]) -> &'static str {
    if flag { values[0] } else { values[1] }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub activity: Option<String>,
    pub standing: Option<Standing>,
    pub connected: bool,
    /// Émargement captured on site.
    pub signed: bool,
    pub checked: bool,
    pub registered_on: Date,
}

impl Participant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub const fn connection_label(&self) -> &'static str {
        flag_value(self.connected, CONNECTION_VALUES)
    }

    pub const fn signature_label(&self) -> &'static str {
        flag_value(self.signed, SIGNATURE_VALUES)
    }

    pub const fn checking_label(&self) -> &'static str {
        flag_value(self.checked, CHECKING_VALUES)
    }
}

impl Keyed for Participant {
    type Key = ParticipantId;

    fn key(&self) -> ParticipantId {
        self.id
    }
}

impl Filterable for Participant {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
            Cow::Borrowed(self.organization.as_str()),
        ]
    }

    fn category(&self, field: FilterField) -> Option<Cow<'_, str>> {
        match field {
            FilterField::Activity => self.activity.as_deref().map(Cow::Borrowed),
            FilterField::Standing => self.standing.map(|s| Cow::Borrowed(s.as_str())),
            FilterField::Connection => Some(Cow::Borrowed(self.connection_label())),
            FilterField::Signature => Some(Cow::Borrowed(self.signature_label())),
            FilterField::Checking => Some(Cow::Borrowed(self.checking_label())),
            FilterField::InviteKind | FilterField::InviteStatus => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub kind: InviteKind,
    pub status: InviteStatus,
    pub sent_on: Option<Date>,
}

impl Invite {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Keyed for Invite {
    type Key = InviteId;

    fn key(&self) -> InviteId {
        self.id
    }
}

impl Filterable for Invite {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
        ]
    }

    fn category(&self, field: FilterField) -> Option<Cow<'_, str>> {
        match field {
            FilterField::InviteKind => Some(Cow::Borrowed(self.kind.as_str())),
            FilterField::InviteStatus => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOption {
    pub standing: Standing,
    /// Whole XOF units.
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub venue: String,
    pub starts_on: Date,
    pub options: Vec<PriceOption>,
}

impl Activity {
    pub fn price(&self, standing: Standing) -> Option<i64> {
        self.options
            .iter()
            .find(|option| option.standing == standing)
            .map(|option| option.amount)
    }

    pub fn cheapest_standing(&self) -> Option<Standing> {
        self.options
            .iter()
            .min_by_key(|option| option.amount)
            .map(|option| option.standing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    /// Number of people the survey was sent to.
    pub invited: u32,
    pub questions: Vec<QuestionTally>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub role: Role,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Snapshot of everything the console lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorySnapshot {
    pub participants: Vec<Participant>,
    pub invites: Vec<Invite>,
    pub activities: Vec<Activity>,
    pub surveys: Vec<Survey>,
    pub profile: Option<Profile>,
}
