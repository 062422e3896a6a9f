use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlantError, Result};
use crate::schedule::{check_frequency, classify_urgency, next_watering_in, parse_frequency, parse_timestamp, Urgency};

/// Instant plus the UTC offset it was recorded with. Due dates are counted
/// in an evaluation zone (the local one in the CLI), not in this offset.
pub type Timestamp = DateTime<FixedOffset>;

/// A tracked plant as it is stored.
///
/// `next_watering` is derived from `last_watered` and `water_frequency_days`
/// and can only be read; every constructor and transition takes the zone
/// whose calendar the days are counted in and re-derives it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub id: String,
    pub name: String,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(alias = "waterFrequency", deserialize_with = "deserialize_frequency")]
    pub water_frequency_days: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_watered: Timestamp,
    #[serde(deserialize_with = "deserialize_timestamp")]
    next_watering: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

/// Input for a new plant. `last_watered` defaults to the creation time.
#[derive(Debug, Clone, Default)]
pub struct PlantDraft {
    pub name: String,
    pub species: String,
    pub scientific_name: Option<String>,
    pub water_frequency_days: u32,
    pub last_watered: Option<Timestamp>,
    pub notes: Option<String>,
    pub image_reference: Option<String>,
}

/// Changes for an existing plant. `None` keeps the stored value; an empty
/// string clears an optional text field.
#[derive(Debug, Clone, Default)]
pub struct PlantEdit {
    pub name: Option<String>,
    pub species: Option<String>,
    pub scientific_name: Option<String>,
    pub water_frequency_days: Option<u32>,
    pub last_watered: Option<Timestamp>,
    pub notes: Option<String>,
    pub image_reference: Option<String>,
}

impl PlantRecord {
    pub fn from_draft<Tz: TimeZone>(id: impl Into<String>, draft: PlantDraft, now: Timestamp, zone: &Tz) -> Result<Self> {
        let last_watered = draft.last_watered.unwrap_or(now);
        let record = Self {
            id: id.into(),
            name: draft.name,
            species: draft.species,
            scientific_name: draft.scientific_name,
            water_frequency_days: draft.water_frequency_days,
            last_watered,
            next_watering: last_watered,
            notes: draft.notes,
            image_reference: draft.image_reference,
        };
        record.rescheduled(zone)
    }

    pub fn next_watering(&self) -> Timestamp {
        self.next_watering
    }

    pub fn urgency<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Urgency {
        classify_urgency(&self.next_watering, now)
    }

    /// Validates the record and re-derives `next_watering`.
    pub fn rescheduled<Tz: TimeZone>(mut self, zone: &Tz) -> Result<Self> {
        self.name = required("name", self.name)?;
        self.species = required("species", self.species)?;
        self.scientific_name = optional(self.scientific_name);
        self.notes = optional(self.notes);
        self.image_reference = optional(self.image_reference);
        self.next_watering = next_watering_in(&self.last_watered, i64::from(self.water_frequency_days), zone)?;
        Ok(self)
    }

    pub fn watered_at<Tz: TimeZone>(mut self, now: Timestamp, zone: &Tz) -> Result<Self> {
        self.last_watered = now;
        self.rescheduled(zone)
    }

    /// Builds the replacement record for an edit. The id never changes.
    pub fn edited<Tz: TimeZone>(self, edit: PlantEdit, zone: &Tz) -> Result<Self> {
        let record = Self {
            id: self.id,
            name: edit.name.unwrap_or(self.name),
            species: edit.species.unwrap_or(self.species),
            scientific_name: edit.scientific_name.or(self.scientific_name),
            water_frequency_days: edit.water_frequency_days.unwrap_or(self.water_frequency_days),
            last_watered: edit.last_watered.unwrap_or(self.last_watered),
            next_watering: self.next_watering,
            notes: edit.notes.or(self.notes),
            image_reference: edit.image_reference.or(self.image_reference),
        };
        record.rescheduled(zone)
    }
}

fn required(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlantError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Older exports stored the frequency as a form string ("7").
fn deserialize_frequency<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFrequency {
        Number(i64),
        Text(String),
    }

    let days = match RawFrequency::deserialize(deserializer)? {
        RawFrequency::Number(n) => check_frequency(n),
        RawFrequency::Text(s) => parse_frequency(&s),
    };
    days.map_err(serde::de::Error::custom)
}

// The browser form saved bare dates ("2024-01-01"), read as UTC midnight.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(ts);
    }
    parse_timestamp(&raw, &Utc)
        .map(|ts| ts.fixed_offset())
        .map_err(serde::de::Error::custom)
}
