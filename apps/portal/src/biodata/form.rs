//! Repeated-Section Form State: the in-memory model behind the biodata screens.
//!
//! A parent `Biodata` record plus three ordered lists of sub-records (education,
//! job history, training). List position is the only client-side identity of an
//! entry. Every edit builds a new list: the replaced entry is fresh, all other
//! entries are the same `Arc` as before.
//!
//! Raw input is coerced through a fixed per-field type table and validated before
//! any state changes, so an invalid number never reaches the gateway.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::admin::AdminUserDetail;
use crate::models::biodata::{Biodata, EducationEntry, JobHistoryEntry, TrainingEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Entry {index} does not exist (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("'{value}' is not a valid number for {field}")]
    InvalidNumber { field: String, value: String },

    #[error("'{value}' is not a valid yes/no value for {field}")]
    InvalidFlag { field: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Education,
    Job,
    Training,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Education, ListKind::Job, ListKind::Training];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Checkbox,
}

/// A raw input value after coercion. Always matches the `FieldKind` it was coerced for.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
}

/// Coerces raw input for one field.
///
/// Empty numeric input is a cleared number box and becomes `0`.
/// Anything else that does not parse as a finite number is rejected.
pub fn coerce(field: &str, kind: FieldKind, raw: &str) -> Result<FieldValue, FormError> {
    let invalid_number = || FormError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let trimmed = raw.trim();

    match kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => {
            if trimmed.is_empty() {
                return Ok(FieldValue::Integer(0));
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(FieldValue::Integer(n));
            }
            // "2020.0" is still a whole number
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(FieldValue::Integer(f as i64))
                }
                _ => Err(invalid_number()),
            }
        }
        FieldKind::Decimal => {
            if trimmed.is_empty() {
                return Ok(FieldValue::Decimal(0.0));
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(FieldValue::Decimal(f)),
                _ => Err(invalid_number()),
            }
        }
        FieldKind::Checkbox => match trimmed.to_lowercase().as_str() {
            "true" | "on" | "1" | "yes" | "checked" => Ok(FieldValue::Flag(true)),
            "false" | "off" | "0" | "no" | "" => Ok(FieldValue::Flag(false)),
            _ => Err(FormError::InvalidFlag {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}

fn narrow(field: &str, value: i64) -> Result<i32, FormError> {
    i32::try_from(value).map_err(|_| FormError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// A record editable field-by-field from raw input.
pub trait FormRecord: Clone + Default {
    /// Wire field names and how their raw input is coerced.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Writes an already-coerced value into the named field.
    fn apply(&mut self, field: &str, value: FieldValue) -> Result<(), FormError>;

    fn field_kind(field: &str) -> Option<FieldKind> {
        Self::FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }

    /// Returns a copy with `field` set from `raw`; `self` is left untouched on error.
    fn with_field(&self, field: &str, raw: &str) -> Result<Self, FormError> {
        let kind =
            Self::field_kind(field).ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        let value = coerce(field, kind, raw)?;
        let mut next = self.clone();
        next.apply(field, value)?;
        Ok(next)
    }
}

impl FormRecord for Biodata {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("position", FieldKind::Text),
        ("fullName", FieldKind::Text),
        ("ktpNumber", FieldKind::Text),
        ("birthPlace", FieldKind::Text),
        ("birthDate", FieldKind::Text),
        ("gender", FieldKind::Text),
        ("religion", FieldKind::Text),
        ("bloodType", FieldKind::Text),
        ("maritalStatus", FieldKind::Text),
        ("ktpAddress", FieldKind::Text),
        ("livingAddress", FieldKind::Text),
        ("email", FieldKind::Text),
        ("phone", FieldKind::Text),
        ("emergencyContact", FieldKind::Text),
        ("skills", FieldKind::Text),
        ("placementWillingness", FieldKind::Checkbox),
        ("expectedSalary", FieldKind::Integer),
    ];

    fn apply(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match (field, value) {
            ("position", FieldValue::Text(v)) => self.position = v,
            ("fullName", FieldValue::Text(v)) => self.full_name = v,
            ("ktpNumber", FieldValue::Text(v)) => self.ktp_number = v,
            ("birthPlace", FieldValue::Text(v)) => self.birth_place = v,
            ("birthDate", FieldValue::Text(v)) => self.birth_date = v,
            ("gender", FieldValue::Text(v)) => self.gender = v,
            ("religion", FieldValue::Text(v)) => self.religion = v,
            ("bloodType", FieldValue::Text(v)) => self.blood_type = v,
            ("maritalStatus", FieldValue::Text(v)) => self.marital_status = v,
            ("ktpAddress", FieldValue::Text(v)) => self.ktp_address = v,
            ("livingAddress", FieldValue::Text(v)) => self.living_address = v,
            ("email", FieldValue::Text(v)) => self.email = v,
            ("phone", FieldValue::Text(v)) => self.phone = v,
            ("emergencyContact", FieldValue::Text(v)) => self.emergency_contact = v,
            ("skills", FieldValue::Text(v)) => self.skills = v,
            ("placementWillingness", FieldValue::Flag(v)) => self.placement_willingness = v,
            ("expectedSalary", FieldValue::Integer(v)) => self.expected_salary = v,
            (other, _) => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl FormRecord for EducationEntry {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("educationLevel", FieldKind::Text),
        ("institutionName", FieldKind::Text),
        ("major", FieldKind::Text),
        ("graduationYear", FieldKind::Integer),
        ("gpa", FieldKind::Decimal),
    ];

    fn apply(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match (field, value) {
            ("educationLevel", FieldValue::Text(v)) => self.education_level = v,
            ("institutionName", FieldValue::Text(v)) => self.institution_name = v,
            ("major", FieldValue::Text(v)) => self.major = v,
            ("graduationYear", FieldValue::Integer(v)) => self.graduation_year = narrow(field, v)?,
            ("gpa", FieldValue::Decimal(v)) => self.gpa = v,
            (other, _) => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl FormRecord for JobHistoryEntry {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("companyName", FieldKind::Text),
        ("lastPosition", FieldKind::Text),
        ("lastSalary", FieldKind::Integer),
        ("year", FieldKind::Integer),
    ];

    fn apply(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match (field, value) {
            ("companyName", FieldValue::Text(v)) => self.company_name = v,
            ("lastPosition", FieldValue::Text(v)) => self.last_position = v,
            ("lastSalary", FieldValue::Integer(v)) => self.last_salary = v,
            ("year", FieldValue::Integer(v)) => self.year = narrow(field, v)?,
            (other, _) => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl FormRecord for TrainingEntry {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("courseName", FieldKind::Text),
        ("hasCertificate", FieldKind::Checkbox),
        ("year", FieldKind::Integer),
    ];

    fn apply(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match (field, value) {
            ("courseName", FieldValue::Text(v)) => self.course_name = v,
            ("hasCertificate", FieldValue::Flag(v)) => self.has_certificate = v,
            ("year", FieldValue::Integer(v)) => self.year = narrow(field, v)?,
            (other, _) => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

fn replace_at<R: FormRecord>(
    list: &[Arc<R>],
    index: usize,
    field: &str,
    raw: &str,
) -> Result<Vec<Arc<R>>, FormError> {
    let current = list.get(index).ok_or(FormError::IndexOutOfRange {
        index,
        len: list.len(),
    })?;
    let updated = Arc::new(current.with_field(field, raw)?);
    Ok(list
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i == index {
                Arc::clone(&updated)
            } else {
                Arc::clone(entry)
            }
        })
        .collect())
}

fn without<R>(list: &[Arc<R>], index: usize) -> Result<Vec<Arc<R>>, FormError> {
    if index >= list.len() {
        return Err(FormError::IndexOutOfRange {
            index,
            len: list.len(),
        });
    }
    Ok(list
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, entry)| Arc::clone(entry))
        .collect())
}

/// The three independent history lists under one parent form.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedSections {
    education: Vec<Arc<EducationEntry>>,
    jobs: Vec<Arc<JobHistoryEntry>>,
    trainings: Vec<Arc<TrainingEntry>>,
}

impl Default for RepeatedSections {
    /// A blank form: one zero-valued placeholder per list.
    fn default() -> Self {
        Self {
            education: vec![Arc::default()],
            jobs: vec![Arc::default()],
            trainings: vec![Arc::default()],
        }
    }
}

impl RepeatedSections {
    /// Lists loaded from the backend, kept exactly as received.
    pub fn from_lists(
        education: Vec<EducationEntry>,
        jobs: Vec<JobHistoryEntry>,
        trainings: Vec<TrainingEntry>,
    ) -> Self {
        Self {
            education: education.into_iter().map(Arc::new).collect(),
            jobs: jobs.into_iter().map(Arc::new).collect(),
            trainings: trainings.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn education(&self) -> &[Arc<EducationEntry>] {
        &self.education
    }

    pub fn jobs(&self) -> &[Arc<JobHistoryEntry>] {
        &self.jobs
    }

    pub fn trainings(&self) -> &[Arc<TrainingEntry>] {
        &self.trainings
    }

    pub fn len(&self, kind: ListKind) -> usize {
        match kind {
            ListKind::Education => self.education.len(),
            ListKind::Job => self.jobs.len(),
            ListKind::Training => self.trainings.len(),
        }
    }

    pub fn total_entries(&self) -> usize {
        ListKind::ALL.iter().map(|kind| self.len(*kind)).sum()
    }

    /// Appends a zero-valued entry. No upper bound.
    pub fn add_entry(&mut self, kind: ListKind) {
        match kind {
            ListKind::Education => self.education.push(Arc::default()),
            ListKind::Job => self.jobs.push(Arc::default()),
            ListKind::Training => self.trainings.push(Arc::default()),
        }
    }

    pub fn update_field(
        &mut self,
        kind: ListKind,
        index: usize,
        field: &str,
        raw: &str,
    ) -> Result<(), FormError> {
        match kind {
            ListKind::Education => self.education = replace_at(&self.education, index, field, raw)?,
            ListKind::Job => self.jobs = replace_at(&self.jobs, index, field, raw)?,
            ListKind::Training => self.trainings = replace_at(&self.trainings, index, field, raw)?,
        }
        Ok(())
    }

    /// Drops the entry at `index`; later entries shift down by one.
    pub fn remove_entry(&mut self, kind: ListKind, index: usize) -> Result<(), FormError> {
        match kind {
            ListKind::Education => self.education = without(&self.education, index)?,
            ListKind::Job => self.jobs = without(&self.jobs, index)?,
            ListKind::Training => self.trainings = without(&self.trainings, index)?,
        }
        Ok(())
    }

    pub fn education_snapshot(&self) -> Vec<EducationEntry> {
        self.education.iter().map(|e| e.as_ref().clone()).collect()
    }

    pub fn jobs_snapshot(&self) -> Vec<JobHistoryEntry> {
        self.jobs.iter().map(|e| e.as_ref().clone()).collect()
    }

    pub fn trainings_snapshot(&self) -> Vec<TrainingEntry> {
        self.trainings.iter().map(|e| e.as_ref().clone()).collect()
    }

    /// Makes `kind` hold exactly `entries.len()` entries with the given raw fields.
    fn fill(&mut self, kind: ListKind, entries: &[RawFields]) -> Result<(), FormError> {
        while self.len(kind) < entries.len() {
            self.add_entry(kind);
        }
        while self.len(kind) > entries.len() {
            self.remove_entry(kind, self.len(kind) - 1)?;
        }
        for (index, fields) in entries.iter().enumerate() {
            for (field, value) in fields {
                self.update_field(kind, index, field, &raw_text(value))?;
            }
        }
        Ok(())
    }
}

type RawFields = BTreeMap<String, Value>;

/// Raw user input for a whole biodata form, as typed into the fields.
///
/// Values may be strings, numbers or booleans; each is turned into the text an
/// input box would hold and then coerced like keyboard input. A list that is
/// absent leaves the form's list as it is; a present list replaces it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawForm {
    pub biodata: RawFields,
    pub education: Option<Vec<RawFields>>,
    #[serde(alias = "jobs")]
    pub job: Option<Vec<RawFields>>,
    #[serde(alias = "trainings")]
    pub training: Option<Vec<RawFields>>,
}

impl RawForm {
    fn apply_lists(&self, sections: &mut RepeatedSections) -> Result<(), FormError> {
        let lists = [
            (ListKind::Education, &self.education),
            (ListKind::Job, &self.job),
            (ListKind::Training, &self.training),
        ];
        for (kind, entries) in lists {
            if let Some(entries) = entries {
                sections.fill(kind, entries)?;
            }
        }
        Ok(())
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Create screen state: a new biodata record plus its history lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiodataForm {
    pub biodata: Biodata,
    pub sections: RepeatedSections,
}

impl BiodataForm {
    pub fn update_biodata(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        self.biodata = self.biodata.with_field(field, raw)?;
        Ok(())
    }

    /// Applies a raw form on top of the current state.
    pub fn apply_raw(&mut self, raw: &RawForm) -> Result<(), FormError> {
        for (field, value) in &raw.biodata {
            self.update_biodata(field, &raw_text(value))?;
        }
        raw.apply_lists(&mut self.sections)
    }
}

/// Admin edit screen state for one existing user.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub id: i64,
    pub biodata: Biodata,
    pub sections: RepeatedSections,
}

impl EditForm {
    pub fn from_detail(detail: AdminUserDetail) -> Self {
        Self {
            id: detail.id,
            biodata: detail.biodata,
            sections: RepeatedSections::from_lists(detail.education, detail.jobs, detail.trainings),
        }
    }

    pub fn to_detail(&self) -> AdminUserDetail {
        AdminUserDetail {
            id: self.id,
            biodata: self.biodata.clone(),
            education: self.sections.education_snapshot(),
            jobs: self.sections.jobs_snapshot(),
            trainings: self.sections.trainings_snapshot(),
        }
    }

    pub fn update_biodata(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        self.biodata = self.biodata.with_field(field, raw)?;
        Ok(())
    }

    /// Applies raw edits: biodata fields are patched, lists present in `raw` are replaced.
    /// An empty list in `raw` empties the record's list.
    pub fn apply_raw(&mut self, raw: &RawForm) -> Result<(), FormError> {
        for (field, value) in &raw.biodata {
            self.update_biodata(field, &raw_text(value))?;
        }
        raw.apply_lists(&mut self.sections)?;
        Ok(())
    }
}
