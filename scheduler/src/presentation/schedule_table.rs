use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use shared::{DomainError, DomainResult, Workplace};

use crate::domain::entities::{Day, PrescheduleBinding, Roster, Worker};
use crate::solver::SolveOutcome;

/// Header row shared by both tables: a label column plus the workplaces in
/// registry order.
fn header(label_column: &str) -> Vec<String> {
    let mut row = vec![label_column.to_string()];
    row.extend(Workplace::ALL.iter().map(|wp| wp.label().to_string()));
    row
}

/// The dense (days + 1) × (workplaces + 1) schedule table.
///
/// Cells hold worker names, or stay empty for legitimately empty slots.
/// Preschedule entries are echoed verbatim, including names outside the
/// roster.
pub fn schedule_table(
    days: &[Day],
    workers: &[Worker],
    binding: &PrescheduleBinding,
    roster: &Roster,
) -> Vec<Vec<String>> {
    let mut table = vec![header("DATUM")];
    for (day_index, day) in days.iter().enumerate() {
        let mut row = vec![day.to_string()];
        for wp in Workplace::ALL {
            let cell = roster
                .worker_at(day_index, wp)
                .map(|worker_index| workers[worker_index].name.clone())
                .unwrap_or_default();
            row.push(cell);
        }
        table.push(row);
    }

    for (name, day_index, workplace_index) in &binding.echoes {
        table[day_index + 1][workplace_index + 1] = name.clone();
    }
    table
}

/// Per-worker counts by workplace, sorted by master-sheet specialty.
pub fn stats_table(workers: &[Worker], roster: &Roster) -> Vec<Vec<String>> {
    let mut order: Vec<usize> = (0..workers.len()).collect();
    order.sort_by_key(|index| workers[*index].specialty_master.clone().unwrap_or_default());

    let mut table = vec![header("NAME")];
    for worker_index in order {
        let mut row = vec![workers[worker_index].name.clone()];
        row.extend(
            roster
                .counts_by_workplace(worker_index)
                .iter()
                .map(|count| count.to_string()),
        );
        table.push(row);
    }
    table
}

/// Writes one table as fully quoted CSV.
pub fn write_table(path: &Path, table: &[Vec<String>]) -> DomainResult<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .map_err(|e| DomainError::Io(format!("writing {}: {e}", path.display())))?;
    for row in table {
        writer
            .write_record(row)
            .map_err(|e| DomainError::Io(format!("writing {}: {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| DomainError::Io(format!("writing {}: {e}", path.display())))
}

/// Per-run console summary: the extremes of shift counts and workloads plus
/// the solver verdict.
pub fn log_summary(workers: &[Worker], outcome: &SolveOutcome) {
    let mut shift_totals: Vec<(usize, usize)> = (0..workers.len())
        .map(|worker_index| (worker_index, outcome.roster.shift_total(worker_index)))
        .collect();
    shift_totals.sort_by_key(|(_, total)| std::cmp::Reverse(*total));

    if let (Some((most, most_total)), Some((fewest, fewest_total))) =
        (shift_totals.first(), shift_totals.last())
    {
        tracing::info!(
            worker = %workers[*most].name,
            shifts = *most_total,
            "largest number of shifts"
        );
        tracing::info!(
            worker = %workers[*fewest].name,
            shifts = *fewest_total,
            "smallest number of shifts"
        );
    }

    let mut workloads = outcome.workloads.clone();
    workloads.sort_by_key(|(_, load)| std::cmp::Reverse(*load));
    if let (Some((most, most_load)), Some((fewest, fewest_load))) =
        (workloads.first(), workloads.last())
    {
        tracing::info!(worker = %workers[*most].name, workload = *most_load, "largest workload");
        tracing::info!(worker = %workers[*fewest].name, workload = *fewest_load, "smallest workload");
    }

    tracing::info!(
        status = %outcome.status,
        objective = outcome.objective,
        solve_time_ms = outcome.solve_time.as_millis() as u64,
        "run complete"
    );
}
