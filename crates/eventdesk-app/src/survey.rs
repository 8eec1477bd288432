// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{QuestionId, Survey};

/// Response counts for one question, in option display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTally {
    pub id: QuestionId,
    pub question: String,
    pub responses: Vec<(String, u32)>,
}

impl QuestionTally {
    pub fn new<L, I>(id: QuestionId, question: impl Into<String>, responses: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, u32)>,
    {
        Self {
            id,
            question: question.into(),
            responses: responses
                .into_iter()
                .map(|(label, count)| (label.into(), count))
                .collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.responses
            .iter()
            .map(|(_, count)| u64::from(*count))
            .sum()
    }

    pub fn count(&self, label: &str) -> Option<u32> {
        self.responses
            .iter()
            .find(|(option, _)| option == label)
            .map(|(_, count)| *count)
    }

    /// Rounded share of `label`, `None` for an unknown option.
    pub fn percentage(&self, label: &str) -> Option<u32> {
        self.count(label)
            .map(|count| rounded_percent(count, self.total()))
    }

    pub fn percentages(&self) -> Vec<(&str, u32)> {
        let total = self.total();
        self.responses
            .iter()
            .map(|(label, count)| (label.as_str(), rounded_percent(*count, total)))
            .collect()
    }

    /// Option with the highest count; the earliest option wins ties.
    pub fn most_popular(&self) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (label, count) in &self.responses {
            match best {
                Some((_, best_count)) if *count <= best_count => {}
                _ => best = Some((label.as_str(), *count)),
            }
        }
        best
    }
}

fn rounded_percent(count: u32, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(count) / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSummary {
    pub question: String,
    pub total: u64,
    pub most_popular: Option<(String, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySummary {
    pub title: String,
    pub invited: u32,
    pub questions: Vec<QuestionSummary>,
}

impl SurveySummary {
    pub fn from_survey(survey: &Survey) -> Self {
        Self {
            title: survey.title.clone(),
            invited: survey.invited,
            questions: survey
                .questions
                .iter()
                .map(|tally| QuestionSummary {
                    question: tally.question.clone(),
                    total: tally.total(),
                    most_popular: tally
                        .most_popular()
                        .map(|(label, count)| (label.to_owned(), count)),
                })
                .collect(),
        }
    }

    /// Highest per-question response count against the invited count.
    pub fn response_rate(&self) -> u32 {
        let answered = self
            .questions
            .iter()
            .map(|question| question.total)
            .max()
            .unwrap_or(0);
        let capped = answered.min(u64::from(self.invited));
        rounded_percent(capped as u32, u64::from(self.invited))
    }
}
