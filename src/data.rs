use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type CourseCode = String;
pub type SectionCode = String;
pub type Minutes = u16;

/// Minute-of-day boundaries for the time-of-day buckets.
pub const MORNING_END: Minutes = 12 * 60;
pub const AFTERNOON_END: Minutes = 17 * 60;

/// Weekday of a meeting. Serialized in full uppercase ("MONDAY"); the short
/// lowercase forms used by older clients are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    #[serde(alias = "mon")]
    Monday,
    #[serde(alias = "tue")]
    Tuesday,
    #[serde(alias = "wed")]
    Wednesday,
    #[serde(alias = "thu")]
    Thursday,
    #[serde(alias = "fri")]
    Friday,
}

/// Coarse time-of-day bucket a preference can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
}

/// One weekly occurrence: a day plus a [start, end) range in minutes from
/// midnight (540 = 09:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TimeSlot {
    pub day: Day,
    pub start: Minutes,
    pub end: Minutes,
}

impl TimeSlot {
    /// True if both slots share a day and their [start, end) ranges overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// Bucket a slot by its start minute.
    pub fn bucket(&self) -> TimeBucket {
        if self.start < MORNING_END {
            TimeBucket::Morning
        } else if self.start < AFTERNOON_END {
            TimeBucket::Afternoon
        } else {
            TimeBucket::Evening
        }
    }
}

/// True if any slot in `a` overlaps any slot in `b`.
pub fn slots_conflict(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
}

/// Category of a scheduled occurrence, derived from the first character of
/// the raw section code: 'L' is a lecture, 'T' a tutorial, anything else a
/// practical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    Lecture,
    Tutorial,
    Practical,
}

impl MeetingKind {
    pub fn from_code(code: &str) -> MeetingKind {
        match code.chars().next() {
            Some('L') => MeetingKind::Lecture,
            Some('T') => MeetingKind::Tutorial,
            _ => MeetingKind::Practical,
        }
    }
}

impl fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingKind::Lecture => write!(f, "lecture"),
            MeetingKind::Tutorial => write!(f, "tutorial"),
            MeetingKind::Practical => write!(f, "practical"),
        }
    }
}

/// One raw scraped meeting-group instance ("L0101") with its weekly slots,
/// before deduplication.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub course_code: CourseCode,
    pub term: String,
    pub code: SectionCode,
    pub times: Vec<TimeSlot>,
}

impl Session {
    pub fn kind(&self) -> MeetingKind {
        MeetingKind::from_code(&self.code)
    }

    /// Two sessions are interchangeable iff they are of the same meeting kind
    /// and their slot sequences match exactly in day, start and end, in order.
    pub fn timing_equivalent(&self, other: &Session) -> bool {
        self.kind() == other.kind() && self.times == other.times
    }
}

/// A canonical, schedulable choice: one or more timing-equivalent raw
/// sections collapsed into a single unit. `codes` keeps first-encountered
/// order and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSection {
    pub course_code: CourseCode,
    pub term: String,
    pub kind: MeetingKind,
    pub codes: Vec<SectionCode>,
    pub times: Vec<TimeSlot>,
}

/// The choice set for one meeting kind of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingGroup {
    pub kind: MeetingKind,
    pub choices: Vec<MergedSection>,
}

/// All merged choices of one course for one term, groups and choices in
/// first-encountered order.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSections {
    pub course_code: CourseCode,
    pub term: String,
    pub groups: Vec<MeetingGroup>,
}

impl CourseSections {
    /// Product of per-group choice counts: this course's contribution to the
    /// pre-pruning state space.
    pub fn choice_product(&self) -> u64 {
        self.groups
            .iter()
            .fold(1u64, |acc, g| acc.saturating_mul(g.choices.len() as u64))
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A user scheduling preference. An unset day matches any day; an unset
/// bucket matches any time of day.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    #[serde(default)]
    pub day: Option<Day>,
    #[serde(default)]
    pub bucket: Option<TimeBucket>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// One selected section in a solution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChosenSection {
    pub course_code: CourseCode,
    pub kind: MeetingKind,
    pub section: MergedSection,
}

/// A conflict-free timetable produced by a solver run. Read-only output:
/// `complete` is false iff `missing_courses` is non-empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSolution {
    pub term: String,
    pub chosen: Vec<ChosenSection>,
    pub score: f64,
    pub complete: bool,
    pub missing_courses: Vec<CourseCode>,
}

/// Raw section data for one requested course.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub course_code: CourseCode,
    pub sessions: Vec<Session>,
}

/// The complete input for one solve request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub term: String,
    pub courses: Vec<CourseInput>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

/// A course whose data was rejected at the merge stage, with the reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCourse {
    pub course_code: CourseCode,
    pub reason: String,
}

impl fmt::Display for RejectedCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.course_code, self.reason)
    }
}

/// The final output of a solve request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub solutions: Vec<CourseSolution>,
    pub best_effort: bool,
    pub rejected_courses: Vec<RejectedCourse>,
}
