use crate::data::{
    ChosenSection, CourseCode, CourseSections, CourseSolution, MergedSection, Preference,
    TimeSlot, slots_conflict,
};
use crate::score::{chosen_score, section_score};
use crate::solver::{SolveError, SolveOutcome, Solver};
use log::{debug, info};
use std::cmp::Ordering;

/// Greedy fallback: places courses one by one, tightest choice sets first,
/// taking for each meeting kind the best-scoring section that fits the grid
/// so far. Never backtracks across courses and never aborts for size; runs
/// in time linear in the number of (course, kind, choice) triples.
pub struct HeuristicSolver;

impl HeuristicSolver {
    /// Always produces exactly one solution. A course whose meeting kinds
    /// cannot all be placed without conflict is dropped entirely (its
    /// already-placed kinds are rolled back) and reported in
    /// `missing_courses`, so `complete` is false iff some requested course
    /// contributed nothing.
    pub fn best_effort(
        &self,
        term: &str,
        sections: &[CourseSections],
        preferences: &[Preference],
    ) -> CourseSolution {
        // tightest courses first, while the grid is emptiest
        let mut order: Vec<&CourseSections> = sections.iter().collect();
        order.sort_by_key(|c| c.choice_product());

        let mut committed: Vec<TimeSlot> = Vec::new();
        let mut chosen: Vec<ChosenSection> = Vec::new();
        let mut missing: Vec<CourseCode> = Vec::new();

        for course in order {
            let slots_mark = committed.len();
            let chosen_mark = chosen.len();
            let mut placed_all = true;

            for group in &course.groups {
                let mut ranked: Vec<(f64, &MergedSection)> = group
                    .choices
                    .iter()
                    .map(|m| (section_score(m, preferences), m))
                    .collect();
                ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

                match ranked
                    .iter()
                    .find(|(_, m)| !slots_conflict(&m.times, &committed))
                {
                    Some((_, pick)) => {
                        committed.extend_from_slice(&pick.times);
                        chosen.push(ChosenSection {
                            course_code: course.course_code.clone(),
                            kind: group.kind,
                            section: (*pick).clone(),
                        });
                    }
                    None => {
                        placed_all = false;
                        break;
                    }
                }
            }

            if !placed_all {
                // drop the whole course, not just the unplaceable kind
                committed.truncate(slots_mark);
                chosen.truncate(chosen_mark);
                debug!(
                    "no conflict-free placement for {}; skipping course",
                    course.course_code
                );
                missing.push(course.course_code.clone());
            }
        }

        let score = chosen_score(&chosen, preferences);
        info!(
            "greedy placement scheduled {} of {} courses (score {})",
            sections.len() - missing.len(),
            sections.len(),
            score
        );
        CourseSolution {
            term: term.to_string(),
            chosen,
            score,
            complete: missing.is_empty(),
            missing_courses: missing,
        }
    }
}

impl Solver for HeuristicSolver {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn solve(
        &self,
        term: &str,
        sections: &[CourseSections],
        preferences: &[Preference],
    ) -> Result<SolveOutcome, SolveError> {
        Ok(SolveOutcome::BestEffort(
            self.best_effort(term, sections, preferences),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CourseSections, Day, MeetingGroup, MeetingKind};

    const TERM: &str = "2018 Winter";

    fn slot(day: Day, start: u16, end: u16) -> TimeSlot {
        TimeSlot { day, start, end }
    }

    fn section(course: &str, code: &str, times: Vec<TimeSlot>) -> MergedSection {
        MergedSection {
            course_code: course.to_string(),
            term: TERM.to_string(),
            kind: MeetingKind::from_code(code),
            codes: vec![code.to_string()],
            times,
        }
    }

    fn course(code: &str, groups: Vec<(MeetingKind, Vec<MergedSection>)>) -> CourseSections {
        CourseSections {
            course_code: code.to_string(),
            term: TERM.to_string(),
            groups: groups
                .into_iter()
                .map(|(kind, choices)| MeetingGroup { kind, choices })
                .collect(),
        }
    }

    fn lectures(code: &str, times: Vec<Vec<TimeSlot>>) -> CourseSections {
        let choices = times
            .into_iter()
            .enumerate()
            .map(|(i, t)| section(code, &format!("L{:02}01", i + 1), t))
            .collect();
        course(code, vec![(MeetingKind::Lecture, choices)])
    }

    #[test]
    fn conflicting_courses_drop_exactly_one() {
        let mon9 = slot(Day::Monday, 540, 600);
        let sections = vec![
            lectures("CSC108", vec![vec![mon9]]),
            lectures("MAT137", vec![vec![mon9]]),
        ];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &[]);
        assert!(!solution.complete);
        assert_eq!(solution.chosen.len(), 1);
        assert_eq!(solution.missing_courses.len(), 1);
        let placed = &solution.chosen[0].course_code;
        let missing = &solution.missing_courses[0];
        assert_ne!(placed, missing);
    }

    #[test]
    fn missing_courses_is_truthful() {
        let sections = vec![
            lectures("CSC108", vec![vec![slot(Day::Monday, 540, 600)]]),
            lectures("MAT137", vec![vec![slot(Day::Tuesday, 540, 600)]]),
        ];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &[]);
        assert!(solution.complete);
        assert!(solution.missing_courses.is_empty());
        assert_eq!(solution.chosen.len(), 2);
    }

    #[test]
    fn prefers_higher_scoring_choice() {
        let sections = vec![lectures(
            "CSC108",
            vec![
                vec![slot(Day::Monday, 1020, 1080)],
                vec![slot(Day::Friday, 540, 600)],
            ],
        )];
        let preferences = vec![Preference {
            day: Some(Day::Friday),
            bucket: None,
            weight: 2.0,
        }];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &preferences);
        assert_eq!(solution.chosen[0].section.codes, vec!["L0201"]);
        assert_eq!(solution.score, 2.0);
    }

    #[test]
    fn unplaceable_kind_rolls_back_the_whole_course() {
        let mon9 = slot(Day::Monday, 540, 600);
        let tue9 = slot(Day::Tuesday, 540, 600);
        // MAT137 has one lecture choice and one tutorial choice; the tutorial
        // collides with CSC108's only lecture, which is placed first
        let sections = vec![
            lectures("CSC108", vec![vec![mon9]]),
            course(
                "MAT137",
                vec![
                    (
                        MeetingKind::Lecture,
                        vec![section("MAT137", "L0101", vec![tue9])],
                    ),
                    (
                        MeetingKind::Tutorial,
                        vec![section("MAT137", "T0101", vec![mon9])],
                    ),
                ],
            ),
        ];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &[]);
        assert_eq!(solution.missing_courses, vec!["MAT137"]);
        assert_eq!(solution.chosen.len(), 1);
        assert_eq!(solution.chosen[0].course_code, "CSC108");
        // the rolled-back lecture must not block the grid
        let all: Vec<TimeSlot> = solution
            .chosen
            .iter()
            .flat_map(|c| c.section.times.iter().copied())
            .collect();
        assert_eq!(all, vec![mon9]);
    }

    #[test]
    fn tightest_course_is_placed_first() {
        let mon9 = slot(Day::Monday, 540, 600);
        // CSC108 could use either slot, MAT137 only Monday; placing MAT137
        // first leaves both schedulable
        let sections = vec![
            lectures("CSC108", vec![vec![mon9], vec![slot(Day::Tuesday, 540, 600)]]),
            lectures("MAT137", vec![vec![mon9]]),
        ];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &[]);
        assert!(solution.complete);
        assert_eq!(solution.chosen.len(), 2);
    }

    #[test]
    fn result_is_conflict_free() {
        let sections = vec![
            lectures(
                "CSC108",
                vec![vec![slot(Day::Monday, 540, 600)], vec![slot(Day::Monday, 570, 630)]],
            ),
            lectures("MAT137", vec![vec![slot(Day::Monday, 540, 660)]]),
            lectures("PHL100", vec![vec![slot(Day::Monday, 600, 660)]]),
        ];
        let solution = HeuristicSolver.best_effort(TERM, &sections, &[]);
        let all: Vec<TimeSlot> = solution
            .chosen
            .iter()
            .flat_map(|c| c.section.times.iter().copied())
            .collect();
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_complete_solution() {
        let solution = HeuristicSolver.best_effort(TERM, &[], &[]);
        assert!(solution.complete);
        assert!(solution.chosen.is_empty());
        assert_eq!(solution.score, 0.0);
    }
}
