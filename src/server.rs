use crate::data::{CellRef, ClassId, Grid};
use crate::engine::{self, GenerationInput, GenerationOutcome};
use crate::moves;
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(flatten)]
    input: GenerationInput,
    #[serde(default)]
    seed: Option<u64>,
}

async fn generate_handler(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerationOutcome>, (axum::http::StatusCode, String)> {
    match engine::generate(&request.input, request.seed) {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => Err((axum::http::StatusCode::BAD_REQUEST, e.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    grids: BTreeMap<ClassId, Grid>,
    source: CellRef,
    target: CellRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveResponse {
    grids: BTreeMap<ClassId, Grid>,
    clashes: BTreeSet<CellRef>,
}

async fn move_handler(
    Json(mut request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, (axum::http::StatusCode, String)> {
    match moves::apply_move(&mut request.grids, &request.source, &request.target) {
        Ok(clashes) => Ok(Json(MoveResponse {
            grids: request.grids,
            clashes,
        })),
        Err(e) => Err((axum::http::StatusCode::CONFLICT, e.to_string())),
    }
}

pub async fn run_server() {
    let app = Router::new()
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/move", post(move_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_request_parses_with_config_defaults_and_seed() {
        let body = json!({
            "faculties": [
                {"id": 1, "name": "Prof A", "code": "PA", "isDept": true}
            ],
            "classes": [
                {"id": 2, "program": "UG", "year": 1, "section": "A", "maxDeptSubjects": 3}
            ],
            "subjects": [
                {"id": 3, "classId": 2, "name": "Maths", "hours": 60,
                 "kind": "theory", "facultyId": 1},
                {"id": 4, "classId": 2, "name": "Physics Lab", "hours": 4,
                 "kind": "lab", "facultyId": 1, "labBlock": 2}
            ],
            "seed": 9
        });
        let request: GenerateRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.seed, Some(9));
        // unset config falls back to 6 days, 5 periods, cap 3
        assert_eq!(request.input.config.days, 6);
        assert_eq!(request.input.config.periods, 5);
        assert_eq!(request.input.config.max_dept_per_day, 3);
        // absent labBlock means auto, a number means a fixed size
        assert_eq!(
            request.input.subjects[0].lab_block,
            crate::data::LabBlockRequest::Auto
        );
        assert_eq!(
            request.input.subjects[1].lab_block,
            crate::data::LabBlockRequest::Periods(2)
        );
    }

    #[test]
    fn outcome_serialises_camel_case_cells_without_theory_parts() {
        let body = json!({
            "faculties": [
                {"id": 1, "name": "Prof A", "code": "PA", "isDept": false}
            ],
            "classes": [
                {"id": 2, "program": "PG", "year": 1, "section": "A", "maxDeptSubjects": 99}
            ],
            "subjects": [
                {"id": 3, "classId": 2, "name": "Maths", "hours": 1,
                 "kind": "theory", "facultyId": 1}
            ]
        });
        let request: GenerateRequest = serde_json::from_value(body).unwrap();
        let outcome = engine::generate(&request.input, Some(1)).unwrap();

        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value["failures"].as_array().unwrap().is_empty());
        assert!(value["clashes"].as_array().unwrap().is_empty());

        let rows = value["grids"]["2"].as_array().unwrap();
        let cell = rows
            .iter()
            .flat_map(|row| row.as_array().unwrap())
            .find(|cell| !cell.is_null())
            .unwrap();
        assert_eq!(cell["subjectId"], 3);
        assert_eq!(cell["facultyId"], 1);
        // theory cells carry no block part
        assert!(cell.get("part").is_none());
    }
}
