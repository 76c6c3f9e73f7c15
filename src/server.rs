use crate::data::{RejectedCourse, SolveRequest, SolveResponse};
use crate::merge;
use crate::solver::{self, SolverConfig};
use axum::{Json, Router, routing::post};
use log::info;

async fn solve_handler(Json(request): Json<SolveRequest>) -> Json<SolveResponse> {
    let mut sections = Vec::new();
    let mut rejected = Vec::new();
    for course in &request.courses {
        match merge::merge_course(course, &request.term) {
            Ok(merged) => sections.push(merged),
            Err(e) => {
                info!("excluding course from solve: {}", e);
                rejected.push(RejectedCourse {
                    course_code: e.course_code().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let (solutions, best_effort) = solver::solve_timetables(
        &request.term,
        &sections,
        &request.preferences,
        &SolverConfig::default(),
    );

    Json(SolveResponse {
        solutions,
        best_effort,
        rejected_courses: rejected,
    })
}

pub fn router() -> Router {
    Router::new().route("/v1/timetable/solve", post(solve_handler))
}

pub async fn run_server() {
    let app = router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
