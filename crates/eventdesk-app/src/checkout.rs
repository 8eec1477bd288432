// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Activity, ActivityId, Standing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    MobileMoney,
    Card,
    CashAtDesk,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [Self::MobileMoney, Self::Card, Self::CashAtDesk];

    pub const fn label(self) -> &'static str {
        match self {
            Self::MobileMoney => "mobile money",
            Self::Card => "card",
            Self::CashAtDesk => "cash at desk",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|method| *method == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Activities picked for payment, one standing per activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    picks: BTreeMap<ActivityId, Standing>,
    pub method: PaymentMethod,
}

impl Default for Checkout {
    fn default() -> Self {
        Self {
            picks: BTreeMap::new(),
            method: PaymentMethod::MobileMoney,
        }
    }
}

impl Checkout {
    /// Adds `activity` at its cheapest standing, or removes it when picked.
    pub fn toggle(&mut self, activity: &Activity) -> bool {
        if self.picks.remove(&activity.id).is_some() {
            return false;
        }
        match activity.cheapest_standing() {
            Some(standing) => {
                self.picks.insert(activity.id, standing);
                true
            }
            None => false,
        }
    }

    /// Moves a picked activity to its next offered standing.
    pub fn cycle_standing(&mut self, activity: &Activity) -> Option<Standing> {
        let current = *self.picks.get(&activity.id)?;
        let offered: Vec<Standing> = Standing::ALL
            .into_iter()
            .filter(|standing| activity.price(*standing).is_some())
            .collect();
        let index = offered.iter().position(|s| *s == current).unwrap_or(0);
        let next = offered.get((index + 1) % offered.len().max(1)).copied()?;
        self.picks.insert(activity.id, next);
        Some(next)
    }

    pub fn standing_for(&self, activity: ActivityId) -> Option<Standing> {
        self.picks.get(&activity).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    /// Sum over picks priced against `activities`; unknown picks count zero.
    pub fn total(&self, activities: &[Activity]) -> i64 {
        self.picks
            .iter()
            .filter_map(|(id, standing)| {
                activities
                    .iter()
                    .find(|activity| activity.id == *id)
                    .and_then(|activity| activity.price(*standing))
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub activity: ActivityId,
    pub activity_name: String,
    pub standing: Standing,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub lines: Vec<PaymentLine>,
    pub method: PaymentMethod,
    pub total: i64,
}

impl PaymentRequest {
    pub fn build(checkout: &Checkout, activities: &[Activity]) -> Result<Self> {
        if checkout.is_empty() {
            bail!("no activity selected -- pick at least one activity and retry");
        }
        let mut lines = Vec::with_capacity(checkout.len());
        for (id, standing) in &checkout.picks {
            let activity = activities
                .iter()
                .find(|activity| activity.id == *id)
                .ok_or_else(|| anyhow!("activity #{id} is no longer offered"))?;
            let amount = activity.price(*standing).ok_or_else(|| {
                anyhow!(
                    "{} has no {} option",
                    activity.name,
                    standing.label()
                )
            })?;
            lines.push(PaymentLine {
                activity: *id,
                activity_name: activity.name.clone(),
                standing: *standing,
                amount,
            });
        }
        let total = lines.iter().map(|line| line.amount).sum();
        Ok(Self {
            lines,
            method: checkout.method,
            total,
        })
    }
}
