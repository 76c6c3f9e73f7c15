use crate::data::{CourseSections, CourseSolution, Preference};
use crate::exhaustive::ExhaustiveSolver;
use crate::heuristic::HeuristicSolver;
use log::info;
use std::fmt;
use std::time::Duration;

/// Effort limits for the exact search. Everything is checked cooperatively
/// inside the search loop, so a request never runs unbounded.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Cap on the pre-pruning state space: the product of per-meeting-group
    /// choice counts. Larger instances are not attempted exactly.
    pub state_space_cap: u64,
    /// Cap on explored branches before the exact search gives up.
    pub node_budget: u64,
    /// Keep at most this many ranked solutions; `None` keeps all of them.
    pub max_solutions: Option<usize>,
    /// Optional wall-clock limit on the exact search.
    pub deadline: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            state_space_cap: 2_000_000,
            node_budget: 5_000_000,
            max_solutions: None,
            deadline: None,
        }
    }
}

/// The only error a solver surfaces: the exact search was judged or measured
/// too expensive to complete. Always recoverable via the greedy fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    SearchSpaceTooLarge(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::SearchSpaceTooLarge(reason) => {
                write!(f, "search space too large: {}", reason)
            }
        }
    }
}

/// What a solver run produced.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// Every conflict-free complete assignment, best score first. May be
    /// empty: zero results is a valid success, not an error.
    Ranked(Vec<CourseSolution>),
    /// A single best-effort timetable that may be missing courses.
    BestEffort(CourseSolution),
}

/// A timetable-solving strategy over merged section groups.
pub trait Solver {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        term: &str,
        sections: &[CourseSections],
        preferences: &[Preference],
    ) -> Result<SolveOutcome, SolveError>;
}

/// Exhaustive-first solve strategy. Falls back to the greedy solver when the
/// exact search aborts for size, and also when it completes with zero
/// results, so the caller always gets something to show. The flag in the
/// return value is true when the greedy path produced the result.
pub fn solve_timetables(
    term: &str,
    sections: &[CourseSections],
    preferences: &[Preference],
    config: &SolverConfig,
) -> (Vec<CourseSolution>, bool) {
    if sections.is_empty() {
        return (Vec::new(), false);
    }

    let exact = ExhaustiveSolver::new(config.clone());
    match exact.solve(term, sections, preferences) {
        Ok(SolveOutcome::Ranked(solutions)) if !solutions.is_empty() => (solutions, false),
        Ok(_) => {
            info!("no complete conflict-free timetable exists; trying greedy placement");
            let fallback = HeuristicSolver.best_effort(term, sections, preferences);
            (vec![fallback], true)
        }
        Err(e) => {
            info!("exact search gave up ({}); trying greedy placement", e);
            let fallback = HeuristicSolver.best_effort(term, sections, preferences);
            (vec![fallback], true)
        }
    }
}
