use actix_web::{web, App, HttpServer, HttpResponse, Result, HttpRequest, middleware};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use crate::parser::parse_problem;
use crate::schedule::{calculate_slot_popularity, find_best_schedule, timeslots, Schedule, ScheduleProblem, Timeslot};

// In-memory storage for the last uploaded event
pub struct AppState {
    pub problem: Mutex<Option<ScheduleProblem>>,
    pub schedule: Mutex<Option<Schedule>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(admin_password: String) -> Self {
        AppState {
            problem: Mutex::new(None),
            schedule: Mutex::new(None),
            admin_password,
        }
    }

    fn is_admin(&self, password: &str) -> bool {
        !password.is_empty() && password == self.admin_password
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    matches: usize,
    hosts: usize,
    contestants: usize,
    timeslots: Vec<TimeSlotStats>,
}

#[derive(Serialize)]
pub struct TimeSlotStats {
    day: String,
    session: String,
    hosts_available: u32,
    hosts_preferred: u32,
    contestants_available: u32,
    contestants_preferred: u32,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    generated_at: DateTime<Utc>,
    schedule: Schedule,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

/// Password check; on success reports what is already loaded so the client
/// can decide whether to upload
async fn admin_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.is_admin(&req.password) {
        log::warn!("Rejected admin login");
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})));
    }

    let matches = lock(&state.problem)?.as_ref().map(|problem| problem.matches.len());
    let has_schedule = lock(&state.schedule)?.is_some();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "has_schedule": has_schedule,
        "matches": matches,
    })))
}

// Admin upload endpoint: JSON problem in, best schedule stored
async fn admin_upload(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !state.is_admin(password) {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    let problem = match std::str::from_utf8(&body).map_err(|e| e.to_string()).and_then(|text| {
        parse_problem(text).map_err(|e| e.to_string())
    }) {
        Ok(problem) => problem,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to parse problem: {}", e)
            })))
        }
    };

    // The search runs many flow computations, keep it off the async workers
    let solver_input = problem.clone();
    let solved = web::block(move || find_best_schedule(&solver_input)).await?;

    match solved {
        Ok(schedule) => {
            log::info!(
                "Uploaded problem solved: {} scheduled, {} unscheduled",
                schedule.scheduled_count(),
                schedule.unscheduled.len()
            );
            let response = serde_json::json!({
                "success": true,
                "message": "Schedule generated successfully",
                "scheduled": schedule.scheduled_count(),
                "unscheduled": schedule.unscheduled.len(),
                "preferred_count": schedule.preferred_count,
            });

            *lock(&state.problem)? = Some(problem);
            *lock(&state.schedule)? = Some(schedule);

            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("Rejected uploaded problem: {}", e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to schedule: {}", e)
            })))
        }
    }
}

// Stats endpoint
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let problem = lock(&state.problem)?;

    if let Some(ref problem) = *problem {
        let hosts_available = calculate_slot_popularity(problem.host_availability.values());
        let hosts_preferred = calculate_slot_popularity(problem.host_preference.values());
        let contestants_available = calculate_slot_popularity(problem.contestant_availability.values());
        let contestants_preferred = calculate_slot_popularity(problem.contestant_preference.values());

        let count = |map: &HashMap<Timeslot, u32>, slot: &Timeslot| map.get(slot).copied().unwrap_or(0);
        let slots = timeslots(&problem.days, &problem.sessions)
            .into_iter()
            .map(|slot| TimeSlotStats {
                hosts_available: count(&hosts_available, &slot),
                hosts_preferred: count(&hosts_preferred, &slot),
                contestants_available: count(&contestants_available, &slot),
                contestants_preferred: count(&contestants_preferred, &slot),
                day: slot.day,
                session: slot.session,
            })
            .collect();

        Ok(HttpResponse::Ok().json(StatsResponse {
            matches: problem.matches.len(),
            hosts: problem.hosts.len(),
            contestants: problem.contestants.len(),
            timeslots: slots,
        }))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No data available"})))
    }
}

// Schedule endpoint
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = lock(&state.schedule)?;

    if let Some(ref schedule) = *schedule {
        Ok(HttpResponse::Ok().json(ScheduleResponse {
            generated_at: Utc::now(),
            schedule: schedule.clone(),
        }))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"})))
    }
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/upload", web::post().to(admin_upload))
        .route("/api/stats", web::get().to(get_stats))
        .route("/api/schedule", web::get().to(get_schedule));
}

pub async fn start_server(port: u16, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(admin_password));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
