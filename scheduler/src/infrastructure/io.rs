use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{Availability, DomainError, DomainResult, Eligibility, Inclusion, Workplace};

use crate::domain::entities::{PrescheduleEntry, Worker, WorkerSpec};

/// One pre-joined worker record, as produced by the external readers.
#[derive(Debug, Deserialize)]
pub struct WorkerRecord {
    pub name: String,
    pub included: Inclusion,
    pub status: String,
    #[serde(default)]
    pub specialty_wishes: Option<String>,
    #[serde(default)]
    pub specialty_master: Option<String>,
    /// Eligibility per standard workplace label; absent labels default to NO.
    #[serde(default)]
    pub workplaces: HashMap<String, Eligibility>,
    /// One availability token per horizon day; null means indifferent. An
    /// empty list stands for a worker with no submitted wishes.
    #[serde(default)]
    pub availability: Vec<Option<String>>,
    #[serde(default)]
    pub quota_abd_duty: u32,
    #[serde(default)]
    pub quota_abd_oncall: u32,
    #[serde(default)]
    pub quota_trauma_oncall: u32,
    #[serde(default)]
    pub max_day_shifts: Option<u32>,
    #[serde(default)]
    pub reduce_nights: u32,
    #[serde(default)]
    pub pinned_day_shifts: Option<u32>,
    #[serde(default)]
    pub pinned_night_shifts: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PrescheduleRecord {
    pub name: String,
    pub date: NaiveDate,
    pub workplace: Workplace,
}

/// Loads the pre-joined worker records, resolving them into model-ready
/// workers. Excluded workers are dropped here, before any modeling.
pub fn load_workers(path: &Path, num_days: usize) -> DomainResult<Vec<Worker>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Io(format!("reading {}: {e}", path.display())))?;
    let records: Vec<WorkerRecord> = serde_json::from_str(&raw)
        .map_err(|e| DomainError::InvalidInput(format!("parsing {}: {e}", path.display())))?;

    let mut workers = Vec::new();
    for record in records {
        if record.included == Inclusion::Excluded {
            tracing::debug!(name = %record.name, "skipping excluded worker");
            continue;
        }
        workers.push(resolve_record(record, num_days)?);
    }
    Ok(workers)
}

pub fn load_preschedule(path: &Path) -> DomainResult<Vec<PrescheduleEntry>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Io(format!("reading {}: {e}", path.display())))?;
    let records: Vec<PrescheduleRecord> = serde_json::from_str(&raw)
        .map_err(|e| DomainError::InvalidInput(format!("parsing {}: {e}", path.display())))?;

    Ok(records
        .into_iter()
        .map(|record| PrescheduleEntry {
            name: record.name,
            date: record.date,
            workplace: record.workplace,
        })
        .collect())
}

fn resolve_record(record: WorkerRecord, num_days: usize) -> DomainResult<Worker> {
    let availability = if record.availability.is_empty() {
        // In the wishes file the worker is absent; they work without
        // preferences.
        vec![Availability::INDIFFERENT; num_days]
    } else if record.availability.len() == num_days {
        record
            .availability
            .iter()
            .map(|token| match token {
                Some(token) => Availability::from_token(token),
                None => Ok(Availability::INDIFFERENT),
            })
            .collect::<DomainResult<Vec<_>>>()?
    } else {
        return Err(DomainError::InvalidInput(format!(
            "worker {} lists {} availability entries for a {num_days}-day horizon",
            record.name,
            record.availability.len()
        )));
    };

    let mut standard_eligibility = [Eligibility::No; 8];
    for (slot, wp) in Workplace::STANDARD.iter().enumerate() {
        if let Some(tag) = record.workplaces.get(wp.label()) {
            standard_eligibility[slot] = *tag;
        }
    }

    WorkerSpec {
        name: record.name,
        included: record.included,
        specialty_wishes: record.specialty_wishes,
        specialty_master: record.specialty_master,
        status: record.status,
        standard_eligibility,
        availability,
        quota_abd_duty: record.quota_abd_duty,
        quota_abd_oncall: record.quota_abd_oncall,
        quota_trauma_oncall: record.quota_trauma_oncall,
        max_day_shifts: record.max_day_shifts,
        reduce_nights: record.reduce_nights,
        pinned_day_shifts: record.pinned_day_shifts,
        pinned_night_shifts: record.pinned_night_shifts,
    }
    .into_worker()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use shared::SlotPreference;

    use super::*;

    #[test]
    fn loads_and_resolves_worker_records() {
        let json = r#"[
            {
                "name": "novak janez",
                "included": "FULL",
                "status": "2nd year",
                "workplaces": {"KRG 1": "YES", "KRG N - MOP": "MAYBE"},
                "availability": ["yes/want", null, "annual-leave"],
                "quota_trauma_oncall": 1
            },
            {
                "name": "kovac peter",
                "included": "EXCLUDED",
                "status": "Specialist"
            }
        ]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let workers = load_workers(file.path(), 3).unwrap();
        assert_eq!(workers.len(), 1, "excluded workers are filtered out");

        let worker = &workers[0];
        assert_eq!(worker.name, "NOVAK JANEZ");
        assert_eq!(worker.eligibility(Workplace::Krg1), Eligibility::Yes);
        assert_eq!(worker.eligibility(Workplace::NightMop), Eligibility::Maybe);
        assert_eq!(worker.eligibility(Workplace::Krg2), Eligibility::No);
        assert_eq!(worker.eligibility(Workplace::TraumaOnCall), Eligibility::Yes);
        assert_eq!(worker.availability[0].day, SlotPreference::Prefer);
        assert_eq!(worker.availability[1].day, SlotPreference::Neutral);
        assert!(!worker.availability[2].day.allows());
    }

    #[test]
    fn availability_length_must_match_horizon() {
        let json = r#"[{
            "name": "A",
            "included": "FULL",
            "status": "Specialist",
            "availability": ["indifferent"]
        }]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let err = load_workers(file.path(), 3).unwrap_err();
        assert!(err.to_string().contains("3-day horizon"));
    }

    #[test]
    fn loads_preschedule_records_by_label() {
        let json = r#"[
            {"name": "VISITING FELLOW", "date": "2025-03-04", "workplace": "ABD prip."}
        ]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let entries = load_preschedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].workplace, Workplace::AbdOnCall);
    }
}
