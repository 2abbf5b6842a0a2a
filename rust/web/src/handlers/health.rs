use serde::Serialize;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe. Always 200 while the process serves requests.
pub fn health() -> Response {
    reply::json(&HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_ok() {
        let response = health();
        assert_eq!(response.status(), warp::http::StatusCode::OK);
    }
}
