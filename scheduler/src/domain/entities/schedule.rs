use shared::Workplace;

/// Outcome classification of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Search exhausted within the time limit; the incumbent is optimal.
    Optimal,
    /// Time limit hit with an incumbent in hand.
    Feasible,
    /// Search exhausted without any solution.
    Infeasible,
    /// Time limit hit before any solution was found.
    Unknown,
    /// The model failed validation before search.
    ModelInvalid,
}

impl SolveStatus {
    /// Whether this status yields a usable schedule.
    pub fn is_accepted(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
        };
        f.write_str(name)
    }
}

/// Dense solved assignment grid: day × workplace → worker index.
#[derive(Debug, Clone)]
pub struct Roster {
    cells: Vec<[Option<usize>; 11]>,
}

impl Roster {
    pub fn new(num_days: usize) -> Roster {
        Roster {
            cells: vec![[None; 11]; num_days],
        }
    }

    pub fn num_days(&self) -> usize {
        self.cells.len()
    }

    pub fn assign(&mut self, day_index: usize, workplace: Workplace, worker_index: usize) {
        self.cells[day_index][workplace.index()] = Some(worker_index);
    }

    pub fn worker_at(&self, day_index: usize, workplace: Workplace) -> Option<usize> {
        self.cells[day_index][workplace.index()]
    }

    /// All of one worker's assignments on one day.
    pub fn workplaces_of(&self, day_index: usize, worker_index: usize) -> Vec<Workplace> {
        Workplace::ALL
            .into_iter()
            .filter(|wp| self.worker_at(day_index, *wp) == Some(worker_index))
            .collect()
    }

    /// Total number of shifts assigned to one worker over the horizon.
    pub fn shift_total(&self, worker_index: usize) -> usize {
        (0..self.num_days())
            .map(|day| self.workplaces_of(day, worker_index).len())
            .sum()
    }

    /// Per-workplace assignment counts for one worker, in registry order.
    pub fn counts_by_workplace(&self, worker_index: usize) -> [usize; 11] {
        let mut counts = [0; 11];
        for day in 0..self.num_days() {
            for wp in Workplace::ALL {
                if self.worker_at(day, wp) == Some(worker_index) {
                    counts[wp.index()] += 1;
                }
            }
        }
        counts
    }
}
