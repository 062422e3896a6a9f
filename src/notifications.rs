use chrono::{DateTime, TimeZone};

use crate::models::PlantRecord;
use crate::schedule::{compare_names, Urgency};

/// Plants in one urgency class at the moment of observation. Built fresh on
/// every call, nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct WateringReminders {
    plants: Vec<PlantRecord>,
}

impl WateringReminders {
    pub fn count(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn plants(&self) -> &[PlantRecord] {
        &self.plants
    }
}

/// Plants whose next watering falls on today's calendar date.
pub fn due_today<Tz: TimeZone>(records: &[PlantRecord], now: &DateTime<Tz>) -> WateringReminders {
    collect(records, now, Urgency::DueToday)
}

pub fn overdue<Tz: TimeZone>(records: &[PlantRecord], now: &DateTime<Tz>) -> WateringReminders {
    collect(records, now, Urgency::Overdue)
}

fn collect<Tz: TimeZone>(records: &[PlantRecord], now: &DateTime<Tz>, urgency: Urgency) -> WateringReminders {
    let mut plants: Vec<PlantRecord> = records
        .iter()
        .filter(|r| r.urgency(now) == urgency)
        .cloned()
        .collect();
    plants.sort_by(|a, b| compare_names(&a.name, &b.name));
    WateringReminders { plants }
}
