//! HTTP controller - axum routes over the application services

use std::sync::Arc;

use astra_usecase::dto::{
    AddProtocolRequest, CreateAstronautRequest, CreateMissionRequest, CreateStaffRequest,
    CrewMemberRequest, EmergencyRequest, FinishRequest, PauseRequest, RecordBiometricRequest,
    SimulationRequest, UpdateAstronautRequest, UpdateEmployeeRequest, UpdateMissionRequest,
};
use astra_usecase::{AstronautService, EmployeeService, MissionService};
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub missions: Arc<MissionService>,
    pub astronauts: Arc<AstronautService>,
    pub employees: Arc<EmployeeService>,
}

impl AppState {
    pub fn new(
        missions: MissionService,
        astronauts: AstronautService,
        employees: EmployeeService,
    ) -> Self {
        Self {
            missions: Arc::new(missions),
            astronauts: Arc::new(astronauts),
            employees: Arc::new(employees),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Missions
        .route("/missions", get(list_missions).post(create_mission))
        .route(
            "/missions/:id",
            get(get_mission).put(update_mission).delete(delete_mission),
        )
        .route("/missions/:id/crew", get(list_crew).post(add_crew_member))
        .route("/missions/:id/crew/:astronaut_id", delete(remove_crew_member))
        .route("/missions/:id/commander", put(set_commander))
        .route("/missions/:id/ready", post(mark_ready))
        .route("/missions/:id/start", post(start_mission))
        .route("/missions/:id/pause", post(pause_mission))
        .route("/missions/:id/resume", post(resume_mission))
        .route("/missions/:id/finish", post(finish_mission))
        .route("/missions/:id/emergency", post(declare_emergency))
        .route("/missions/:id/events", get(list_events))
        .route("/missions/:id/protocols", post(add_protocol))
        .route("/missions/:id/protocols/:name", delete(disarm_protocol))
        .route("/missions/:id/simulate", post(simulate))
        // Astronauts
        .route("/astronauts", get(list_astronauts).post(create_astronaut))
        .route(
            "/astronauts/:id",
            get(get_astronaut)
                .put(update_astronaut)
                .delete(delete_astronaut),
        )
        .route("/astronauts/:id/biometrics", post(record_biometric))
        .route("/astronauts/:id/biometrics/critical", get(critical_readings))
        // Personnel
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .with_state(state)
}

/// Unwrap a JSON body, turning extractor failures into our error shape
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(value) = payload?;
    Ok(value)
}

/// Unwrap path parameters the same way
fn path<T>(params: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    let Path(value) = params?;
    Ok(value)
}

/// Body that may be omitted entirely
fn optional_body<T: DeserializeOwned + Default>(bytes: &Bytes) -> ApiResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::invalid_json(e.to_string()))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

// ========== Missions ==========

#[derive(Debug, Deserialize)]
struct MissionFilter {
    status: Option<String>,
}

async fn list_missions(
    State(state): State<AppState>,
    Query(filter): Query<MissionFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.missions.list(filter.status.as_deref())?))
}

async fn create_mission(
    State(state): State<AppState>,
    payload: Result<Json<CreateMissionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let mission = state.missions.create(body(payload)?)?;
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn get_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.get(id)?))
}

async fn update_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateMissionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.update(id, body(payload)?)?))
}

async fn delete_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path(id)?;
    state.missions.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_crew(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.crew(id)?))
}

async fn add_crew_member(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CrewMemberRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let request = body(payload)?;
    let mission = state.missions.add_crew_member(id, request.astronaut_id)?;
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn remove_crew_member(
    State(state): State<AppState>,
    ids: Result<Path<(u64, u64)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let (id, astronaut_id) = path(ids)?;
    state.missions.remove_crew_member(id, astronaut_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_commander(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CrewMemberRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let request = body(payload)?;
    Ok(Json(state.missions.set_commander(id, request.astronaut_id)?))
}

async fn mark_ready(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.mark_ready(id)?))
}

async fn start_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.start(id)?))
}

async fn pause_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    bytes: Bytes,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let request: PauseRequest = optional_body(&bytes)?;
    Ok(Json(state.missions.pause(id, request.reason)?))
}

async fn resume_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.resume(id)?))
}

async fn finish_mission(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<FinishRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let request = body(payload)?;
    Ok(Json(state.missions.finish(id, request.success)?))
}

async fn declare_emergency(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<EmergencyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.declare_emergency(id, body(payload)?)?))
}

async fn list_events(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.missions.events(id)?))
}

async fn add_protocol(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AddProtocolRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let mission = state.missions.add_protocol(id, body(payload)?)?;
    Ok((StatusCode::CREATED, Json(mission)))
}

async fn disarm_protocol(
    State(state): State<AppState>,
    params: Result<Path<(u64, String)>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let (id, name) = path(params)?;
    Ok(Json(state.missions.disarm_protocol(id, &name)?))
}

async fn simulate(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    bytes: Bytes,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let request: SimulationRequest = optional_body(&bytes)?;
    Ok(Json(state.missions.simulate(id, request)?))
}

// ========== Astronauts ==========

async fn list_astronauts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.astronauts.list()?))
}

async fn create_astronaut(
    State(state): State<AppState>,
    payload: Result<Json<CreateAstronautRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let astronaut = state.astronauts.create(body(payload)?)?;
    Ok((StatusCode::CREATED, Json(astronaut)))
}

async fn get_astronaut(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.astronauts.get(id)?))
}

async fn update_astronaut(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateAstronautRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.astronauts.update(id, body(payload)?)?))
}

async fn delete_astronaut(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path(id)?;
    state.astronauts.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_biometric(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<RecordBiometricRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    let reading = state.astronauts.record_biometric(id, body(payload)?)?;
    Ok((StatusCode::CREATED, Json(reading)))
}

async fn critical_readings(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.astronauts.critical_readings(id)?))
}

// ========== Personnel ==========

async fn list_employees(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.employees.list()?))
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateStaffRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let employee = state.employees.create_staff(body(payload)?)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.employees.get(id)?))
}

async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path(id)?;
    Ok(Json(state.employees.update(id, body(payload)?)?))
}

async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path(id)?;
    state.employees.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryMissionRepository, InMemoryPersonnelRepository};
    use astra_domain::{BiometricBand, BiometricLimits};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let missions = Arc::new(InMemoryMissionRepository::new());
        let personnel = Arc::new(InMemoryPersonnelRepository::new());
        let limits =
            BiometricLimits::new().with_band("heart_rate", BiometricBand::new(40.0, 180.0));

        router(AppState::new(
            MissionService::new(missions.clone(), personnel.clone()),
            AstronautService::new(personnel.clone(), missions.clone(), limits),
            EmployeeService::new(personnel, missions),
        ))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_astronaut(app: &Router, name: &str) -> u64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/astronauts",
            Some(json!({ "name": name, "medical_fitness": "HIGH", "age": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    async fn create_mission(app: &Router) -> u64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/missions",
            Some(json!({
                "name": "Artemis",
                "mission_type": "EXPLORATION",
                "code": "ART-2026-001"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "UP" }));
    }

    #[tokio::test]
    async fn test_malformed_path_ids() {
        let app = create_test_app();

        for (method, uri) in [
            (Method::GET, "/missions/abc"),
            (Method::GET, "/missions/99999999999999999999999"),
            (Method::DELETE, "/missions/1/crew/xyz"),
            (Method::GET, "/astronauts/-1"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                response.headers()["content-type"],
                "application/json",
                "{uri}"
            );
        }

        let (status, body) = send(&app, Method::DELETE, "/missions/abc/protocols/SEAL", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_PATH");
        assert!(body["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_mission_crud() {
        let app = create_test_app();
        let id = create_mission(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/missions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "ART-2026-001");
        assert_eq!(body["status"], "PLANEJAMENTO");

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/missions/{id}"),
            Some(json!({ "priority": "ALTA" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["priority"], "ALTA");
        assert_eq!(body["name"], "Artemis");

        let (status, _) = send(&app, Method::DELETE, &format!("/missions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/missions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let app = create_test_app();
        create_mission(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/missions",
            Some(json!({ "name": "Again", "mission_type": "RESEARCH", "code": "art-2026-001" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_lifecycle_over_http() {
        let app = create_test_app();
        let id = create_mission(&app).await;

        let finish = format!("/missions/{id}/finish");
        let success = json!({ "success": true });
        let (status, body) = send(&app, Method::POST, &finish, Some(success)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_STATE_TRANSITION");

        for step in ["ready", "start"] {
            let uri = format!("/missions/{id}/{step}");
            let (status, _) = send(&app, Method::POST, &uri, None).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&app, Method::POST, &format!("/missions/{id}/pause"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PAUSADA");

        let (_, body) = send(&app, Method::POST, &format!("/missions/{id}/resume"), None).await;
        assert_eq!(body["status"], "EM_ANDAMENTO");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/missions/{id}/emergency"),
            Some(json!({ "description": "hull breach" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mission"]["status"], "EMERGENCIA");

        let failure = json!({ "success": false });
        let (_, body) = send(&app, Method::POST, &finish, Some(failure)).await;
        assert_eq!(body["status"], "ABORTADA");

        let (_, events) = send(&app, Method::GET, &format!("/missions/{id}/events"), None).await;
        let kinds: Vec<&str> = events
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "MISSAO_PRONTA",
                "MISSAO_INICIADA",
                "MISSAO_PAUSADA",
                "MISSAO_RETOMADA",
                "EMERGENCIA_ATIVADA",
                "MISSAO_ABORTADA"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_missions_by_status() {
        let app = create_test_app();
        let id = create_mission(&app).await;
        send(&app, Method::POST, &format!("/missions/{id}/ready"), None).await;

        let (_, body) = send(&app, Method::GET, "/missions?status=PRONTA", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/missions?status=PLANEJAMENTO", None).await;
        assert!(body.as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::GET, "/missions?status=FLYING", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_crew_routes() {
        let app = create_test_app();
        let mission = create_mission(&app).await;
        let alice = create_astronaut(&app, "Alice").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/missions/{mission}/crew"),
            Some(json!({ "astronaut_id": alice })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["crew"], json!([alice]));

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/missions/{mission}/commander"),
            Some(json!({ "astronaut_id": alice })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["commander_id"], alice);

        let (_, crew) = send(&app, Method::GET, &format!("/missions/{mission}/crew"), None).await;
        assert_eq!(crew[0]["name"], "Alice");

        // Still on a crew, so the record cannot go
        let (status, _) = send(&app, Method::DELETE, &format!("/astronauts/{alice}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/missions/{mission}/crew/{alice}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, &format!("/missions/{mission}"), None).await;
        assert_eq!(body["crew"], json!([]));
        assert_eq!(body["commander_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_protocols_and_simulation() {
        let app = create_test_app();
        let id = create_mission(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/missions/{id}/protocols"),
            Some(json!({ "name": "SEAL", "keyword": "breach" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["protocols"][0]["state"], "ARMED");

        let seal = format!("/missions/{id}/protocols/SEAL");
        let (status, body) = send(&app, Method::DELETE, &seal, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["protocols"][0]["state"], "DISARMED");

        let simulate = format!("/missions/{id}/simulate");
        let (status, body) = send(&app, Method::POST, &simulate, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Simulação executada com sucesso");
        assert_eq!(body["outcome"], "SUCESSO");
        assert_eq!(body["mission_id"], id);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/missions/{id}/simulate"),
            Some(json!({ "thrust_n": -5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "thrust_n");
    }

    #[tokio::test]
    async fn test_astronaut_biometrics() {
        let app = create_test_app();
        let id = create_astronaut(&app, "Valentina").await;

        for value in [72.0, 195.0] {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/astronauts/{id}/biometrics"),
                Some(json!({ "kind": "heart_rate", "value": value, "unit": "bpm" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let critical = format!("/astronauts/{id}/biometrics/critical");
        let (status, body) = send(&app, Method::GET, &critical, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["value"], 195.0);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/astronauts/{id}"),
            Some(json!({ "biometrics": { "kind": "heart_rate", "value": 80.0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["biometrics"][1]["value"], 80.0);
        assert_eq!(body["biometrics"][1]["unit"], "bpm");
    }

    #[tokio::test]
    async fn test_validation_and_malformed_json() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/astronauts",
            Some(json!({ "name": "", "medical_fitness": "HIGH" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_FAILED");
        assert_eq!(body["fields"][0]["field"], "name");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/missions")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let incomplete = json!({ "name": "No type" });
        let (status, body) = send(&app, Method::POST, "/missions", Some(incomplete)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_employee_routes() {
        let app = create_test_app();
        create_astronaut(&app, "Sally").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/employees",
            Some(json!({ "name": "Gene Kranz", "title": "Flight Director" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "STAFF");
        let staff = body["id"].as_u64().unwrap();

        let (_, body) = send(&app, Method::GET, "/employees", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        // Staff records are not astronauts
        let (status, _) = send(&app, Method::GET, &format!("/astronauts/{staff}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/employees/{staff}"),
            Some(json!({ "title": "Chief" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Chief");

        let (status, _) = send(&app, Method::DELETE, &format!("/employees/{staff}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
