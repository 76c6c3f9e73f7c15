//! Assembles conflict-free weekly timetables from a student's chosen courses:
//! raw scraped sections are merged into interchangeable choices, an exact
//! backtracking search ranks every feasible timetable by the user's
//! preferences, and a greedy pass takes over when the search space is too
//! large to enumerate.

pub mod data;
pub mod exhaustive;
pub mod heuristic;
pub mod merge;
pub mod score;
pub mod server;
pub mod solver;
