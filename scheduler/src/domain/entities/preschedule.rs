use std::collections::HashSet;

use chrono::NaiveDate;
use shared::{DomainError, DomainResult, Workplace};

use super::day::Day;
use super::worker::Worker;

/// One pre-assigned (worker, day, workplace) triple.
#[derive(Debug, Clone)]
pub struct PrescheduleEntry {
    pub name: String,
    pub date: NaiveDate,
    pub workplace: Workplace,
}

/// Preschedule entries resolved against the roster and the horizon.
///
/// Entries naming a roster member become pins; entries naming anyone else
/// block the slot for the whole roster. Every entry is echoed verbatim into
/// the output table.
#[derive(Debug, Default)]
pub struct PrescheduleBinding {
    /// (worker index, day index, workplace index) pins.
    pub pins: Vec<(usize, usize, usize)>,
    /// (day index, workplace index) slots held by off-roster people.
    pub blocked: HashSet<(usize, usize)>,
    /// (name, day index, workplace index) of every entry, for the output.
    pub echoes: Vec<(String, usize, usize)>,
}

impl PrescheduleBinding {
    pub fn resolve(
        entries: &[PrescheduleEntry],
        workers: &[Worker],
        days: &[Day],
    ) -> DomainResult<PrescheduleBinding> {
        let mut binding = PrescheduleBinding::default();

        for entry in entries {
            let day_index = days
                .iter()
                .position(|day| day.date == entry.date)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "preschedule entry for {} on {} lies outside the horizon",
                        entry.name, entry.date
                    ))
                })?;
            let workplace_index = entry.workplace.index();
            let name = entry.name.trim().to_uppercase();

            match workers.iter().position(|worker| worker.name == name) {
                Some(worker_index) => {
                    binding.pins.push((worker_index, day_index, workplace_index));
                }
                None => {
                    binding.blocked.insert((day_index, workplace_index));
                }
            }
            binding.echoes.push((name, day_index, workplace_index));
        }

        Ok(binding)
    }

    pub fn is_blocked(&self, day_index: usize, workplace_index: usize) -> bool {
        self.blocked.contains(&(day_index, workplace_index))
    }

    pub fn is_pinned(&self, day_index: usize, workplace_index: usize) -> bool {
        self.pins
            .iter()
            .any(|(_, day, wp)| *day == day_index && *wp == workplace_index)
    }
}
