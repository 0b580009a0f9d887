// crates/server/src/routes/solve.rs
//! Solve job endpoints.
//!
//! - POST /api/v1/solve: validate, create a job, start the search, 202
//! - GET /api/v1/solve/{job_id}: current view of a job

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use nqueens_core::{Algorithm, SolveMode, SolveParams};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::jobs::{spawn_solve, JobView};
use crate::state::AppState;

/// Raw request fields. Values stay untyped so each gets its own message.
#[derive(Debug, Default)]
pub struct SolveRequest {
    pub n: Option<Value>,
    pub algorithm: Option<Value>,
    pub mode: Option<Value>,
}

impl From<Value> for SolveRequest {
    /// Only a JSON object carries fields; arrays and scalars yield none.
    fn from(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self::default();
        };
        Self {
            n: fields.remove("n"),
            algorithm: fields.remove("algorithm"),
            mode: fields.remove("mode"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CreateJobResponse {
    pub job_id: String,
}

impl SolveRequest {
    /// Check fields in order `n`, `algorithm`, `mode`; the first problem wins.
    ///
    /// The error is the message without the `Validation Error: ` prefix.
    pub fn validate(&self, max_n: usize) -> Result<SolveParams, String> {
        let n = match &self.n {
            None | Some(Value::Null) => return Err("'n' is required.".into()),
            Some(value) => as_integer(value).ok_or("'n' must be an integer.")?,
        };
        if n < 1 || n > max_n as i64 {
            return Err(format!("'n' must be an integer between 1 and {max_n}."));
        }

        let algorithm = parse_choice::<Algorithm>(
            self.algorithm.as_ref(),
            "algorithm",
            &Algorithm::ALL.map(|a| a.as_str()),
        )?;
        let mode = parse_choice::<SolveMode>(
            self.mode.as_ref(),
            "mode",
            &SolveMode::ALL.map(|m| m.as_str()),
        )?;

        Ok(SolveParams::new(n as usize, algorithm, mode))
    }
}

/// Integral JSON numbers, including `8.0`.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(num) = value else {
        return None;
    };
    num.as_i64().or_else(|| {
        num.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Empty-ish values count as missing: `null`, `false`, `0`, `""`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(num) => num.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_choice<T: std::str::FromStr>(
    value: Option<&Value>,
    field: &str,
    allowed: &[&str],
) -> Result<T, String> {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ => return Err(format!("'{field}' is required.")),
    };
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("'{field}' must be one of: {}.", allowed.join(", ")))
}

/// POST /api/v1/solve - Start a solve job.
pub async fn create_solve_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateJobResponse>)> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let params = SolveRequest::from(body)
        .validate(state.config.max_n)
        .map_err(ApiError::Validation)?;

    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .create_job(job_id.clone(), params)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    spawn_solve(state.jobs.clone(), job_id.clone(), params);

    Ok((StatusCode::ACCEPTED, Json(CreateJobResponse { job_id })))
}

/// GET /api/v1/solve/{job_id} - Job status plus progress, result or error.
pub async fn get_solve_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    state
        .jobs
        .get_job(&job_id)
        .map(|job| Json(JobView::from(job)))
        .ok_or(ApiError::JobNotFound(job_id))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/solve", post(create_solve_job))
        .route("/v1/solve/{job_id}", get(get_solve_job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validate(body: Value) -> Result<SolveParams, String> {
        SolveRequest::from(body).validate(15)
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(
            validate(json!({"n": 8, "algorithm": "bitmask", "mode": "countAll"})),
            Ok(SolveParams::new(8, Algorithm::Bitmask, SolveMode::CountAll))
        );
        assert_eq!(
            validate(json!({"n": 8.0, "algorithm": "backtracking", "mode": "findFirst"})),
            Ok(SolveParams::new(8, Algorithm::Backtracking, SolveMode::FindFirst))
        );
    }

    #[test]
    fn test_n_messages() {
        let rest = |n: Value| json!({"n": n, "algorithm": "bitmask", "mode": "findAll"});

        assert_eq!(
            validate(json!({"algorithm": "bitmask", "mode": "findAll"})),
            Err("'n' is required.".into())
        );
        assert_eq!(validate(rest(Value::Null)), Err("'n' is required.".into()));
        assert_eq!(validate(rest(json!("8"))), Err("'n' must be an integer.".into()));
        assert_eq!(validate(rest(json!(8.5))), Err("'n' must be an integer.".into()));
        for n in [json!(0), json!(-3), json!(16)] {
            assert_eq!(
                validate(rest(n)),
                Err("'n' must be an integer between 1 and 15.".into())
            );
        }
    }

    #[test]
    fn test_algorithm_and_mode_messages() {
        assert_eq!(
            validate(json!({"n": 4, "mode": "findAll"})),
            Err("'algorithm' is required.".into())
        );
        assert_eq!(
            validate(json!({"n": 4, "algorithm": "", "mode": "findAll"})),
            Err("'algorithm' is required.".into())
        );
        assert_eq!(
            validate(json!({"n": 4, "algorithm": "dancing-links", "mode": "findAll"})),
            Err("'algorithm' must be one of: backtracking, bitmask.".into())
        );
        assert_eq!(
            validate(json!({"n": 4, "algorithm": "bitmask"})),
            Err("'mode' is required.".into())
        );
        assert_eq!(
            validate(json!({"n": 4, "algorithm": "bitmask", "mode": 3})),
            Err("'mode' must be one of: findFirst, findAll, countAll.".into())
        );
    }

    #[test]
    fn test_non_object_bodies_have_no_fields() {
        for body in [
            json!([4, "bitmask", "countAll"]),
            json!(8),
            json!("n=8"),
            Value::Null,
        ] {
            assert_eq!(validate(body.clone()), Err("'n' is required.".into()), "{body}");
        }
    }

    #[test]
    fn test_first_problem_wins() {
        assert_eq!(validate(json!({})), Err("'n' is required.".into()));
        assert_eq!(
            validate(json!({"n": 99, "algorithm": "nope"})),
            Err("'n' must be an integer between 1 and 15.".into())
        );
    }
}
