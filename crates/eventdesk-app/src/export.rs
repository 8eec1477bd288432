// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::listing::{Filterable, Keyed, ListView};
use crate::validation::format_date;
use crate::{Invite, Participant};

/// Which rows of a list go into an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Selection,
    CurrentPage,
    Filtered,
    All,
}

impl ExportScope {
    pub const ALL: [Self; 4] = [Self::Selection, Self::CurrentPage, Self::Filtered, Self::All];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::CurrentPage => "current page",
            Self::Filtered => "filtered",
            Self::All => "tous",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Csv => Self::Json,
            Self::Json => Self::Csv,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no rows selected -- select rows with space or pick another scope")]
    EmptySelection,
    #[error("nothing to export for scope `{0}`")]
    NoRows(&'static str),
    #[error("encode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("encode json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat tabular shape of a row for CSV output.
pub trait ExportRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl ExportRow for Participant {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "organization",
        "activity",
        "standing",
        "connected",
        "signed",
        "checked",
        "registered_on",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.organization.clone(),
            self.activity.clone().unwrap_or_default(),
            self.standing
                .map(|standing| standing.label().to_owned())
                .unwrap_or_default(),
            self.connected.to_string(),
            self.signed.to_string(),
            self.checked.to_string(),
            format_date(self.registered_on),
        ]
    }
}

impl ExportRow for Invite {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "kind",
        "status",
        "sent_on",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.kind.as_str().to_owned(),
            self.status.as_str().to_owned(),
            self.sent_on.map(format_date).unwrap_or_default(),
        ]
    }
}

pub fn rows_in_scope<T>(view: &ListView<T>, scope: ExportScope) -> Vec<&T>
where
    T: Keyed + Filterable,
{
    match scope {
        ExportScope::Selection => view.selected_rows(),
        ExportScope::CurrentPage => view.page_rows(),
        ExportScope::Filtered => view.filtered(),
        ExportScope::All => view.items().iter().collect(),
    }
}

pub fn export_rows<T>(
    view: &ListView<T>,
    scope: ExportScope,
    format: ExportFormat,
) -> Result<String, ExportError>
where
    T: Keyed + Filterable + ExportRow,
{
    let rows = rows_in_scope(view, scope);
    if rows.is_empty() {
        return Err(match scope {
            ExportScope::Selection => ExportError::EmptySelection,
            other => ExportError::NoRows(other.label()),
        });
    }
    match format {
        ExportFormat::Csv => encode_csv(&rows),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
    }
}

/// RFC 4180 records with CRLF line ends, quoted only where needed.
fn encode_csv<T: ExportRow>(rows: &[&T]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
