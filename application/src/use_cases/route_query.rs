//! Routing stage: classify the query into a routing label.

use crate::ports::collaborators::{RouteRequest, RouterPort};
use crate::ports::progress::Stage;
use crate::use_cases::run_deliberation::RunDeliberationError;
use crate::use_cases::shared::{StageEnv, call_collaborator, fatal_error};
use deliberate_domain::RoutingLabel;
use tracing::{debug, warn};

/// Ask the router for a label; a failed or unparseable answer falls back to
/// the label the session mode implies.
pub(crate) async fn route_query(
    env: &StageEnv<'_>,
    router: &dyn RouterPort,
    request: &RouteRequest,
) -> Result<RoutingLabel, RunDeliberationError> {
    env.progress.on_stage_start(Stage::Route, 1);

    let label = match call_collaborator(env.timeout, env.token, router.route(request)).await {
        Ok(label) => {
            debug!("Router chose '{}'", label);
            env.progress.on_task_complete(Stage::Route, "router", true);
            label
        }
        Err(e) => {
            if let Some(fatal) = fatal_error(&e) {
                return Err(fatal);
            }
            let fallback = request.mode.default_routing_label();
            warn!("Router failed ({}), using '{}' for mode {}", e, fallback, request.mode);
            env.progress.on_task_complete(Stage::Route, "router", false);
            fallback
        }
    };

    env.progress.on_stage_complete(Stage::Route);
    Ok(label)
}
