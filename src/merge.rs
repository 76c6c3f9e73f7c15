use crate::data::{
    CourseCode, CourseInput, CourseSections, MeetingGroup, MeetingKind, MergedSection, Minutes,
    Session,
};
use itertools::Itertools;
use log::debug;
use std::fmt;

/// Recoverable per-course input problems, raised at the merge stage. The
/// caller is expected to exclude the offending course and continue.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// A session slot has start >= end.
    InvalidSlot {
        course_code: CourseCode,
        code: String,
        start: Minutes,
        end: Minutes,
    },
    /// The course offers no session with any timing data for the term.
    NoScheduledMeetings { course_code: CourseCode },
}

impl InputError {
    pub fn course_code(&self) -> &str {
        match self {
            InputError::InvalidSlot { course_code, .. } => course_code,
            InputError::NoScheduledMeetings { course_code } => course_code,
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidSlot {
                course_code,
                code,
                start,
                end,
            } => write!(
                f,
                "section {} of {} has an invalid slot ({}..{})",
                code, course_code, start, end
            ),
            InputError::NoScheduledMeetings { course_code } => {
                write!(f, "{} has no scheduled meetings in this term", course_code)
            }
        }
    }
}

// Groups are emitted in this fixed order so the output is deterministic
// regardless of how the raw sections were interleaved.
const KIND_ORDER: [MeetingKind; 3] = [
    MeetingKind::Lecture,
    MeetingKind::Tutorial,
    MeetingKind::Practical,
];

/// Collapses a course's raw sessions into the smallest set of mutually
/// distinguishable choices per meeting kind.
///
/// Sessions from other terms are ignored; sessions without slots carry no
/// timing constraint and are dropped. Within a meeting kind, sessions are
/// clustered by pairwise timing-equivalence, first-encountered first: the
/// relation is checked pairwise and not assumed transitive, so the encounter
/// order is the defined tie-break. The pass is pure and idempotent.
pub fn merge_course(course: &CourseInput, term: &str) -> Result<CourseSections, InputError> {
    let in_term: Vec<&Session> = course
        .sessions
        .iter()
        .filter(|s| s.term == term)
        .collect();

    for session in &in_term {
        for slot in &session.times {
            if slot.start >= slot.end {
                return Err(InputError::InvalidSlot {
                    course_code: course.course_code.clone(),
                    code: session.code.clone(),
                    start: slot.start,
                    end: slot.end,
                });
            }
        }
    }

    let schedulable: Vec<&Session> = in_term.into_iter().filter(|s| !s.times.is_empty()).collect();
    if schedulable.is_empty() {
        return Err(InputError::NoScheduledMeetings {
            course_code: course.course_code.clone(),
        });
    }

    // per-key value order of into_group_map follows input encounter order
    let by_kind = schedulable
        .iter()
        .map(|s| (s.kind(), *s))
        .into_group_map();

    let mut groups = Vec::new();
    for kind in KIND_ORDER {
        let Some(sessions) = by_kind.get(&kind) else {
            continue;
        };
        let choices = cluster_equivalent(sessions, &course.course_code, term, kind);
        debug!(
            "{} {}: merged {} raw sections into {} choices",
            course.course_code,
            kind,
            sessions.len(),
            choices.len()
        );
        groups.push(MeetingGroup { kind, choices });
    }

    Ok(CourseSections {
        course_code: course.course_code.clone(),
        term: term.to_string(),
        groups,
    })
}

// Greedy absorb-and-remove scan: take the first unclustered session, pull in
// every remaining session timing-equivalent to it, repeat. Slots are taken
// from the cluster seed.
fn cluster_equivalent(
    sessions: &[&Session],
    course_code: &str,
    term: &str,
    kind: MeetingKind,
) -> Vec<MergedSection> {
    let mut remaining: Vec<&Session> = sessions.to_vec();
    let mut merged = Vec::new();
    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut codes = vec![seed.code.clone()];
        remaining.retain(|s| {
            if s.timing_equivalent(seed) {
                codes.push(s.code.clone());
                false
            } else {
                true
            }
        });
        merged.push(MergedSection {
            course_code: course_code.to_string(),
            term: term.to_string(),
            kind,
            codes,
            times: seed.times.clone(),
        });
    }
    merged
}
