use chrono::{Local, TimeZone};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::PlantRepository;
use crate::error::{PlantError, Result};
use crate::models::{PlantDraft, PlantEdit, PlantRecord, Timestamp};

/// The plant collection. Every mutation re-derives the affected record,
/// writes the whole collection through the repository, and only then
/// replaces the in-memory copy.
///
/// Watering days are counted on the calendar of `zone`, so a due date keeps
/// its wall-clock time across DST changes.
pub struct PlantStore<R, Tz: TimeZone = Local> {
    repository: R,
    zone: Tz,
    plants: Vec<PlantRecord>,
}

impl<R: PlantRepository> PlantStore<R, Local> {
    /// Opens the store on the machine's local calendar.
    pub async fn open(repository: R) -> Result<Self> {
        Self::open_in(repository, Local).await
    }
}

impl<R: PlantRepository, Tz: TimeZone> PlantStore<R, Tz> {
    /// Loads the collection once. Stored due dates that do not match their
    /// record are recomputed; the correction is written on the next save.
    pub async fn open_in(repository: R, zone: Tz) -> Result<Self> {
        let stored = repository.load_all().await?;
        let mut plants = Vec::with_capacity(stored.len());
        for record in stored {
            let stored_next = record.next_watering();
            let id = record.id.clone();
            let record = record.rescheduled(&zone)?;
            if record.next_watering() != stored_next {
                warn!(id = %id, stored = %stored_next, derived = %record.next_watering(), "corrected next watering");
            }
            plants.push(record);
        }
        info!(backend = repository.backend_name(), count = plants.len(), "plant store opened");
        Ok(Self { repository, zone, plants })
    }

    pub fn list_all(&self) -> &[PlantRecord] {
        &self.plants
    }

    pub fn get(&self, id: &str) -> Result<&PlantRecord> {
        self.plants
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PlantError::NotFound(id.to_string()))
    }

    pub async fn add(&mut self, draft: PlantDraft, now: Timestamp) -> Result<PlantRecord> {
        let record = PlantRecord::from_draft(Uuid::new_v4().to_string(), draft, now, &self.zone)?;
        let mut next = self.plants.clone();
        next.push(record.clone());
        self.commit(next).await?;
        info!(id = %record.id, name = %record.name, next_watering = %record.next_watering(), "plant added");
        Ok(record)
    }

    /// Inserts or replaces by id. The due date is always re-derived.
    pub async fn upsert(&mut self, record: PlantRecord) -> Result<PlantRecord> {
        let record = record.rescheduled(&self.zone)?;
        let mut next = self.plants.clone();
        match next.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => next.push(record.clone()),
        }
        self.commit(next).await?;
        info!(id = %record.id, "plant saved");
        Ok(record)
    }

    pub async fn update(&mut self, id: &str, edit: PlantEdit) -> Result<PlantRecord> {
        let record = self.get(id)?.clone().edited(edit, &self.zone)?;
        self.replace(record).await
    }

    pub async fn water_now(&mut self, id: &str, now: Timestamp) -> Result<PlantRecord> {
        let record = self.get(id)?.clone().watered_at(now, &self.zone)?;
        let record = self.replace(record).await?;
        info!(id = %record.id, next_watering = %record.next_watering(), "plant watered");
        Ok(record)
    }

    pub async fn remove(&mut self, id: &str) -> Result<PlantRecord> {
        let position = self
            .plants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PlantError::NotFound(id.to_string()))?;
        let mut next = self.plants.clone();
        let removed = next.remove(position);
        self.commit(next).await?;
        info!(id = %removed.id, name = %removed.name, "plant removed");
        Ok(removed)
    }

    async fn replace(&mut self, record: PlantRecord) -> Result<PlantRecord> {
        let mut next = self.plants.clone();
        let slot = next
            .iter_mut()
            .find(|p| p.id == record.id)
            .ok_or_else(|| PlantError::NotFound(record.id.clone()))?;
        *slot = record.clone();
        self.commit(next).await?;
        Ok(record)
    }

    async fn commit(&mut self, next: Vec<PlantRecord>) -> Result<()> {
        self.repository.save_all(&next).await?;
        self.plants = next;
        Ok(())
    }
}
