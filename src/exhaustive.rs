use crate::data::{ChosenSection, CourseSections, CourseSolution, MeetingKind, MergedSection, Preference, TimeSlot};
use crate::score::chosen_score;
use crate::solver::{SolveError, SolveOutcome, Solver, SolverConfig};
use log::{info, trace};
use std::cmp::Ordering;
use std::time::Instant;

/// Exact solver: depth-first backtracking over one choice per
/// (course, meeting kind), pruning any candidate that collides with an
/// already-committed slot. Aborts with `SearchSpaceTooLarge` when the
/// instance exceeds the configured effort budget; otherwise returns every
/// conflict-free complete assignment, best score first.
pub struct ExhaustiveSolver {
    config: SolverConfig,
}

impl ExhaustiveSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

// One branching point of the search: the choice set of a single meeting kind
// of a single course. `course_idx` remembers the input position so solutions
// can be emitted in request order.
struct ChoicePoint<'a> {
    course_idx: usize,
    course_code: &'a str,
    kind: MeetingKind,
    choices: &'a [MergedSection],
}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(
        &self,
        term: &str,
        sections: &[CourseSections],
        preferences: &[Preference],
    ) -> Result<SolveOutcome, SolveError> {
        let start_time = Instant::now();

        let mut points: Vec<ChoicePoint> = sections
            .iter()
            .enumerate()
            .flat_map(|(course_idx, course)| {
                course.groups.iter().map(move |group| ChoicePoint {
                    course_idx,
                    course_code: &course.course_code,
                    kind: group.kind,
                    choices: &group.choices,
                })
            })
            .collect();
        if points.is_empty() {
            return Ok(SolveOutcome::Ranked(Vec::new()));
        }

        // fewest choices first keeps the branching factor low near the root
        points.sort_by_key(|p| p.choices.len());

        // the pre-pruning product of choice counts decides tractability
        let space = points
            .iter()
            .try_fold(1u64, |acc, p| acc.checked_mul(p.choices.len() as u64));
        match space {
            Some(size) if size <= self.config.state_space_cap => {
                info!(
                    "exact search over {} meeting groups, {} candidate assignments",
                    points.len(),
                    size
                );
            }
            Some(size) => {
                return Err(SolveError::SearchSpaceTooLarge(format!(
                    "{} candidate assignments exceed the cap of {}",
                    size, self.config.state_space_cap
                )));
            }
            None => {
                return Err(SolveError::SearchSpaceTooLarge(
                    "candidate assignment count overflows u64".to_string(),
                ));
            }
        }

        let complete = self.search(&points)?;
        trace!("{} complete assignments survived pruning", complete.len());

        // emit selections in request order, not branch order
        let mut emit_order: Vec<usize> = (0..points.len()).collect();
        emit_order.sort_by_key(|&i| points[i].course_idx);

        let mut solutions: Vec<CourseSolution> = complete
            .into_iter()
            .map(|picked| {
                let chosen: Vec<ChosenSection> = emit_order
                    .iter()
                    .map(|&i| ChosenSection {
                        course_code: points[i].course_code.to_string(),
                        kind: points[i].kind,
                        section: points[i].choices[picked[i]].clone(),
                    })
                    .collect();
                let score = chosen_score(&chosen, preferences);
                CourseSolution {
                    term: term.to_string(),
                    chosen,
                    score,
                    complete: true,
                    missing_courses: Vec::new(),
                }
            })
            .collect();

        // stable sort: equal scores keep discovery order
        solutions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        if let Some(cap) = self.config.max_solutions {
            solutions.truncate(cap);
        }

        info!(
            "exact search finished in {:.2?} with {} conflict-free timetables",
            start_time.elapsed(),
            solutions.len()
        );
        Ok(SolveOutcome::Ranked(solutions))
    }
}

impl ExhaustiveSolver {
    // Iterative depth-first search over an explicit frame stack. Depth d
    // branches over points[d]; next[d] is the next untried choice there,
    // slot_marks[d] the committed-slot watermark to truncate back to on
    // backtrack. The budget is checked at every expansion so an abort is
    // observed promptly no matter how deep the search is.
    fn search(&self, points: &[ChoicePoint<'_>]) -> Result<Vec<Vec<usize>>, SolveError> {
        let num = points.len();
        let start_time = Instant::now();
        let mut next = vec![0usize; num + 1];
        let mut picked = vec![0usize; num];
        let mut slot_marks = vec![0usize; num];
        let mut committed: Vec<TimeSlot> = Vec::new();
        let mut explored: u64 = 0;
        let mut complete: Vec<Vec<usize>> = Vec::new();
        let mut depth = 0usize;

        loop {
            if depth == num {
                complete.push(picked.clone());
                depth -= 1;
                committed.truncate(slot_marks[depth]);
                continue;
            }

            let point = &points[depth];
            let mut descended = false;
            while next[depth] < point.choices.len() {
                let idx = next[depth];
                next[depth] += 1;

                explored += 1;
                if explored > self.config.node_budget {
                    return Err(SolveError::SearchSpaceTooLarge(format!(
                        "node budget of {} exhausted",
                        self.config.node_budget
                    )));
                }
                if let Some(limit) = self.config.deadline {
                    if start_time.elapsed() > limit {
                        return Err(SolveError::SearchSpaceTooLarge(format!(
                            "deadline of {:.2?} exceeded after {} branches",
                            limit, explored
                        )));
                    }
                }

                let candidate = &point.choices[idx];
                let collides = candidate
                    .times
                    .iter()
                    .any(|t| committed.iter().any(|c| c.overlaps(t)));
                if collides {
                    continue;
                }

                slot_marks[depth] = committed.len();
                committed.extend_from_slice(&candidate.times);
                picked[depth] = idx;
                depth += 1;
                next[depth] = 0;
                descended = true;
                break;
            }

            if !descended {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                committed.truncate(slot_marks[depth]);
            }
        }

        trace!("search explored {} branches", explored);
        Ok(complete)
    }
}
