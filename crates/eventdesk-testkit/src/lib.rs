// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use eventdesk_app::{
    Activity, ActivityId, Invite, InviteId, InviteKind, InviteStatus, Participant, ParticipantId,
    PriceOption, QuestionId, QuestionTally, Standing,
};
use time::{Date, Duration, Month};

const FIRST_NAMES: [&str; 16] = [
    "Aya", "Adjoua", "Akissi", "Amani", "Awa", "Bintou", "Didier", "Fatou", "Ibrahim", "Kader",
    "Mariam", "Moussa", "Nadia", "Serge", "Yannick", "Zana",
];
const LAST_NAMES: [&str; 14] = [
    "Bamba", "Coulibaly", "Diabate", "Diallo", "Kone", "Kouadio", "Kouame", "Kouassi", "NGuessan",
    "Ouattara", "Soro", "Toure", "Traore", "Yao",
];
const ORGANIZATIONS: [&str; 10] = [
    "Orange CI",
    "MTN",
    "Moov Africa",
    "SIB",
    "Ecobank",
    "Nestle CI",
    "CIE",
    "Port Autonome",
    "Air Cote d'Ivoire",
    "Independent",
];
const ACTIVITIES: [&str; 6] = [
    "Gala",
    "Keynote",
    "Atelier fintech",
    "Panel energie",
    "Cocktail",
    "Visite du port",
];
const VENUES: [&str; 5] = [
    "Sofitel Ivoire",
    "Palais de la Culture",
    "Radisson Blu",
    "Pullman Plateau",
    "Azalai Marcory",
];
const DOMAINS: [&str; 4] = ["events.ci", "mail.ci", "example.org", "contact.africa"];
const RESPONSE_SETS: [&[&str]; 3] = [
    &["Oui", "Non", "Sans avis"],
    &["Excellent", "Bien", "Moyen", "Mauvais"],
    &["Matin", "Apres-midi", "Soir"],
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible event records. Equal seeds give equal data.
#[derive(Debug, Clone)]
pub struct EventFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl EventFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn bool(&mut self) -> bool {
        self.rng.bool()
    }

    /// Participant with the next sequential id.
    pub fn participant(&mut self) -> Participant {
        let id = self.take_id();
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let activity = if self.int_n(5) == 0 {
            None
        } else {
            Some(self.pick(&ACTIVITIES).to_owned())
        };
        let standing = if self.int_n(4) == 0 {
            None
        } else {
            Some(Standing::ALL[self.int_n(Standing::ALL.len())])
        };
        let signed = self.bool();
        Participant {
            id: ParticipantId::new(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: self.email(first, last, id),
            phone: self.phone(),
            organization: self.pick(&ORGANIZATIONS).to_owned(),
            activity,
            standing,
            connected: self.bool(),
            signed,
            checked: signed && self.bool(),
            registered_on: self.date_in_year(2026),
        }
    }

    pub fn participants(&mut self, count: usize) -> Vec<Participant> {
        (0..count).map(|_| self.participant()).collect()
    }

    pub fn invite(&mut self) -> Invite {
        let id = self.take_id();
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let status = InviteStatus::ALL[self.int_n(InviteStatus::ALL.len())];
        let sent_on = match status {
            InviteStatus::Pending => None,
            InviteStatus::Sent | InviteStatus::Accepted | InviteStatus::Declined => {
                Some(self.date_in_year(2026))
            }
        };
        Invite {
            id: InviteId::new(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: self.email(first, last, id),
            phone: self.phone(),
            kind: InviteKind::ALL[self.int_n(InviteKind::ALL.len())],
            status,
            sent_on,
        }
    }

    pub fn invites(&mut self, count: usize) -> Vec<Invite> {
        (0..count).map(|_| self.invite()).collect()
    }

    /// Activity offering Standard plus a random subset of the upper tiers.
    pub fn activity(&mut self) -> Activity {
        let id = self.take_id();
        let base = self.int_range(5, 40) * 1_000;
        let mut options = vec![PriceOption {
            standing: Standing::Standard,
            amount: base,
        }];
        if self.bool() {
            options.push(PriceOption {
                standing: Standing::Vip,
                amount: base * 2,
            });
        }
        if self.bool() {
            options.push(PriceOption {
                standing: Standing::Vvip,
                amount: base * 4,
            });
        }
        Activity {
            id: ActivityId::new(id),
            name: self.pick(&ACTIVITIES).to_owned(),
            venue: self.pick(&VENUES).to_owned(),
            starts_on: self.date_in_year(2026),
            options,
        }
    }

    pub fn question(&mut self) -> QuestionTally {
        let id = self.take_id();
        let labels = RESPONSE_SETS[self.int_n(RESPONSE_SETS.len())];
        let responses: Vec<(&str, u32)> = labels
            .iter()
            .map(|label| (*label, self.int_range(0, 300) as u32))
            .collect();
        QuestionTally::new(QuestionId::new(id), "Question", responses)
    }

    pub fn date_in_year(&mut self, year: i32) -> Date {
        let start = Date::from_calendar_date(year, Month::January, 1).unwrap_or(Date::MIN);
        let offset = self.int_n(365) as i64;
        start.saturating_add(Duration::days(offset))
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn email(&mut self, first: &str, last: &str, id: i64) -> String {
        let domain = self.pick(&DOMAINS);
        format!(
            "{}.{}{id}@{domain}",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        )
    }

    fn phone(&mut self) -> String {
        format!(
            "+225 0{} {:02} {:02} {:02} {:02}",
            self.int_range(1, 7),
            self.int_range(0, 99),
            self.int_range(0, 99),
            self.int_range(0, 99),
            self.int_range(0, 99),
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn temp_dir() -> Result<tempfile::TempDir> {
    tempfile::tempdir().context("create temp dir")
}

pub fn activity_names() -> &'static [&'static str] {
    &ACTIVITIES
}
