use std::{collections::HashMap, sync::Arc};

use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mystops::prelude::*;
use tracing::{error, info, warn};

/// `GET /arrivals?q=<stop ids>[&routes=<route ids>]`
pub async fn arrivals(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match find(&params, &state).await {
        Ok(arrivals) => Json(arrivals).into_response(),
        Err(err) => problem_response(&err, state.config.debug),
    }
}

async fn find(params: &HashMap<String, String>, state: &AppState) -> Result<Arrivals, QueryError> {
    let stops = match params.get("q") {
        Some(q) => StopQuery::parse(q)?,
        None => StopQuery::default(),
    };
    if stops.is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    let routes = match params.get("routes") {
        Some(routes) => Some(RouteFilter::parse(routes)?).filter(|routes| !routes.is_empty()),
        None => None,
    };

    let arrivals = get_arrivals(&state.client, &stops, routes.as_ref(), &state.config.timezone).await?;
    if arrivals.is_empty() {
        return Err(QueryError::NoMatch {
            stops: stops.to_vec(),
        });
    }
    info!("Found {} arrivals for stops {stops}", arrivals.count);
    Ok(arrivals)
}

fn status_for(err: &QueryError) -> StatusCode {
    match err {
        QueryError::InvalidIdentifier { .. } | QueryError::EmptyQuery => StatusCode::BAD_REQUEST,
        QueryError::Upstream { .. } if err.missing_stop_id().is_some() => StatusCode::NOT_FOUND,
        QueryError::NoMatch { .. } => StatusCode::NOT_FOUND,
        QueryError::Transport { .. } | QueryError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn problem_response(err: &QueryError, debug: bool) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        error!("Failed to get arrivals: {err}");
    } else {
        warn!("Rejected arrivals request: {err}");
    }
    (status, Json(err.problem(debug))).into_response()
}
