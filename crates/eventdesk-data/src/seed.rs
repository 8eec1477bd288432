// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use eventdesk_app::{
    Activity, ActivityId, DirectorySnapshot, Invite, InviteId, InviteKind, InviteStatus,
    Participant, ParticipantId, PriceOption, Profile, QuestionId, QuestionTally, Role, Standing,
    Survey, SurveyId,
};
use time::Date;
use time::macros::date;

struct ParticipantSeed {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    phone: &'static str,
    organization: &'static str,
    activity: Option<&'static str>,
    standing: Option<Standing>,
    connected: bool,
    signed: bool,
    checked: bool,
    registered_on: Date,
}

const PARTICIPANTS: [ParticipantSeed; 7] = [
    ParticipantSeed {
        first_name: "Koffi",
        last_name: "Yao",
        email: "k.yao@orange.ci",
        phone: "+225 07 07 12 34 56",
        organization: "Orange CI",
        activity: Some("Gala"),
        standing: Some(Standing::Vip),
        connected: true,
        signed: true,
        checked: true,
        registered_on: date!(2026 - 02 - 03),
    },
    ParticipantSeed {
        first_name: "Aya",
        last_name: "Kouassi",
        email: "aya.kouassi@mtn.ci",
        phone: "+225 05 44 21 09 87",
        organization: "MTN",
        activity: Some("Keynote"),
        standing: Some(Standing::Standard),
        connected: true,
        signed: true,
        checked: false,
        registered_on: date!(2026 - 02 - 05),
    },
    ParticipantSeed {
        first_name: "Mariam",
        last_name: "Traore",
        email: "mariam.traore@sib.ci",
        phone: "+225 01 23 45 67 89",
        organization: "SIB",
        activity: Some("Gala"),
        standing: Some(Standing::Vvip),
        connected: false,
        signed: false,
        checked: false,
        registered_on: date!(2026 - 02 - 11),
    },
    ParticipantSeed {
        first_name: "Ibrahim",
        last_name: "Coulibaly",
        email: "ibrahim.coulibaly@ecobank.com",
        phone: "+225 07 58 11 22 33",
        organization: "Ecobank",
        activity: Some("Atelier fintech"),
        standing: Some(Standing::Standard),
        connected: true,
        signed: false,
        checked: false,
        registered_on: date!(2026 - 02 - 14),
    },
    ParticipantSeed {
        first_name: "Adjoua",
        last_name: "NGuessan",
        email: "adjoua.nguessan@cie.ci",
        phone: "",
        organization: "CIE",
        activity: None,
        standing: None,
        connected: false,
        signed: false,
        checked: false,
        registered_on: date!(2026 - 02 - 20),
    },
    ParticipantSeed {
        first_name: "Didier",
        last_name: "Bamba",
        email: "didier.bamba@moov-africa.ci",
        phone: "+225 01 02 03 04 05",
        organization: "Moov Africa",
        activity: Some("Keynote"),
        standing: Some(Standing::Vip),
        connected: true,
        signed: true,
        checked: true,
        registered_on: date!(2026 - 03 - 01),
    },
    ParticipantSeed {
        first_name: "Fatou",
        last_name: "Diallo",
        email: "fatou.diallo@gmail.com",
        phone: "+225 05 66 77 88 99",
        organization: "Independent",
        activity: Some("Gala"),
        standing: Some(Standing::Standard),
        connected: false,
        signed: true,
        checked: false,
        registered_on: date!(2026 - 03 - 04),
    },
];

pub const SEED_PARTICIPANT_COUNT: usize = PARTICIPANTS.len();

pub fn participants() -> Vec<Participant> {
    PARTICIPANTS
        .iter()
        .zip(1_i64..)
        .map(|(seed, id)| Participant {
            id: ParticipantId::new(id),
            first_name: seed.first_name.to_owned(),
            last_name: seed.last_name.to_owned(),
            email: seed.email.to_owned(),
            phone: seed.phone.to_owned(),
            organization: seed.organization.to_owned(),
            activity: seed.activity.map(str::to_owned),
            standing: seed.standing,
            connected: seed.connected,
            signed: seed.signed,
            checked: seed.checked,
            registered_on: seed.registered_on,
        })
        .collect()
}

pub fn invites() -> Vec<Invite> {
    let rows = [
        (
            "Serge",
            "Kouame",
            "serge.kouame@rti.ci",
            InviteKind::Press,
            InviteStatus::Sent,
            Some(date!(2026 - 01 - 20)),
        ),
        (
            "Nadia",
            "Soro",
            "nadia.soro@pnud.org",
            InviteKind::Vip,
            InviteStatus::Accepted,
            Some(date!(2026 - 01 - 22)),
        ),
        (
            "Moussa",
            "Toure",
            "moussa.toure@gmail.com",
            InviteKind::Standard,
            InviteStatus::Pending,
            None,
        ),
        (
            "Bintou",
            "Kone",
            "bintou.kone@fratmat.info",
            InviteKind::Press,
            InviteStatus::Declined,
            Some(date!(2026 - 01 - 25)),
        ),
        (
            "Yannick",
            "Kouadio",
            "y.kouadio@bicici.com",
            InviteKind::Vip,
            InviteStatus::Sent,
            Some(date!(2026 - 02 - 01)),
        ),
    ];
    rows.into_iter()
        .zip(1_i64..)
        .map(|((first, last, email, kind, status, sent_on), id)| Invite {
            id: InviteId::new(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: email.to_owned(),
            phone: String::new(),
            kind,
            status,
            sent_on,
        })
        .collect()
}

pub fn activities() -> Vec<Activity> {
    let tiers = |prices: &[(Standing, i64)]| {
        prices
            .iter()
            .map(|(standing, amount)| PriceOption {
                standing: *standing,
                amount: *amount,
            })
            .collect::<Vec<_>>()
    };
    vec![
        Activity {
            id: ActivityId::new(1),
            name: "Gala".to_owned(),
            venue: "Sofitel Ivoire".to_owned(),
            starts_on: date!(2026 - 06 - 12),
            options: tiers(&[
                (Standing::Standard, 25_000),
                (Standing::Vip, 50_000),
                (Standing::Vvip, 100_000),
            ]),
        },
        Activity {
            id: ActivityId::new(2),
            name: "Keynote".to_owned(),
            venue: "Palais de la Culture".to_owned(),
            starts_on: date!(2026 - 06 - 11),
            options: tiers(&[(Standing::Standard, 10_000), (Standing::Vip, 20_000)]),
        },
        Activity {
            id: ActivityId::new(3),
            name: "Atelier fintech".to_owned(),
            venue: "Pullman Plateau".to_owned(),
            starts_on: date!(2026 - 06 - 13),
            options: tiers(&[(Standing::Standard, 15_000)]),
        },
    ]
}

pub fn surveys() -> Vec<Survey> {
    vec![
        Survey {
            id: SurveyId::new(1),
            title: "Satisfaction generale".to_owned(),
            invited: 400,
            questions: vec![
                QuestionTally::new(
                    QuestionId::new(1),
                    "Recommanderiez-vous l'evenement ?",
                    [("Oui", 156), ("Non", 31), ("Sans avis", 25)],
                ),
                QuestionTally::new(
                    QuestionId::new(2),
                    "Qualite de l'organisation",
                    [("Excellent", 98), ("Bien", 74), ("Moyen", 28), ("Mauvais", 7)],
                ),
            ],
        },
        Survey {
            id: SurveyId::new(2),
            title: "Choix des ateliers".to_owned(),
            invited: 250,
            questions: vec![QuestionTally::new(
                QuestionId::new(3),
                "Creneau prefere",
                [("Matin", 61), ("Apres-midi", 88), ("Soir", 23)],
            )],
        },
    ]
}

pub fn profile() -> Profile {
    Profile {
        first_name: "Nadia".to_owned(),
        last_name: "Ouattara".to_owned(),
        email: "nadia.ouattara@eventdesk.ci".to_owned(),
        phone: "+225 07 00 11 22 33".to_owned(),
        organization: "EventDesk".to_owned(),
        role: Role::Organizer,
    }
}

pub fn snapshot() -> DirectorySnapshot {
    DirectorySnapshot {
        participants: participants(),
        invites: invites(),
        activities: activities(),
        surveys: surveys(),
        profile: Some(profile()),
    }
}
