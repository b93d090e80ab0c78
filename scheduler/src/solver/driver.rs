use std::time::{Duration, Instant};

use shared::{DomainError, DomainResult, Workplace};

use crate::domain::entities::{Roster, SolveStatus};
use crate::solver::model::{ModelInput, RosterModel};

/// Slack granted to the wall clock when deciding whether the search ran into
/// the time limit rather than exhausting the tree.
const TIMEOUT_SLACK: Duration = Duration::from_millis(50);

/// A solved roster with its solver-side metadata.
#[derive(Debug)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub roster: Roster,
    /// (worker index, weighted workload); rotating workers excluded.
    pub workloads: Vec<(usize, i64)>,
    pub objective: i64,
    pub solve_time: Duration,
    pub solutions: usize,
}

/// Runs the solver under the configured time limit and extracts the result.
///
/// Improving incumbents are consumed one by one, so a run that hits the time
/// limit still returns the best schedule found so far (as FEASIBLE). Any
/// status without a usable schedule is fatal.
pub fn solve(roster_model: RosterModel, input: &ModelInput) -> DomainResult<SolveOutcome> {
    let RosterModel {
        model,
        shifts,
        objective,
        workloads,
    } = roster_model;

    if let Err(message) = model.validate() {
        return Err(DomainError::Solver(format!(
            "the schedule was not produced; solver status {}: {message}",
            SolveStatus::ModelInvalid
        )));
    }

    let time_limit = Duration::from_secs_f64(input.settings.time_limit);
    let print_logs = input.settings.print_logs;
    tracing::info!(
        time_limit_s = input.settings.time_limit,
        "solving the roster model"
    );

    let started = Instant::now();
    let mut best = None;
    let mut solutions = 0usize;
    for solution in model.minimize_and_iterate(objective) {
        solutions += 1;
        if print_logs {
            tracing::info!(
                incumbent = solutions,
                objective = solution.get_int(objective),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "improved schedule found"
            );
        }
        best = Some(solution);
    }
    let solve_time = started.elapsed();
    let timed_out = solve_time + TIMEOUT_SLACK >= time_limit;

    let status = match (best.is_some(), timed_out) {
        (true, false) => SolveStatus::Optimal,
        (true, true) => SolveStatus::Feasible,
        (false, false) => SolveStatus::Infeasible,
        (false, true) => SolveStatus::Unknown,
    };
    tracing::info!(status = %status, solve_time_ms = solve_time.as_millis() as u64, solutions, "solver finished");

    let Some(solution) = best.filter(|_| status.is_accepted()) else {
        return Err(DomainError::Solver(format!(
            "the schedule was not produced; solver status {status}; \
             re-check the feasibility warnings above"
        )));
    };

    let mut roster = Roster::new(input.days.len());
    for (worker_index, per_day) in shifts.iter().enumerate() {
        for (day_index, per_workplace) in per_day.iter().enumerate() {
            for (workplace_index, var) in per_workplace.iter().enumerate() {
                if solution.get_int(*var) == 1 {
                    let workplace = Workplace::from_index(workplace_index).ok_or_else(|| {
                        DomainError::InternalError(format!(
                            "workplace index {workplace_index} out of range"
                        ))
                    })?;
                    roster.assign(day_index, workplace, worker_index);
                }
            }
        }
    }

    let workload_values = workloads
        .iter()
        .map(|(worker_index, var)| (*worker_index, solution.get_int(*var) as i64))
        .collect();

    Ok(SolveOutcome {
        status,
        roster,
        workloads: workload_values,
        objective: solution.get_int(objective) as i64,
        solve_time,
        solutions,
    })
}
