use parley_session::{Route, RouteDecision};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RouteArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RouteResponse {
    path: String,
    #[serde(flatten)]
    route: Route,
    protected: bool,
    #[serde(flatten)]
    decision: RouteDecision,
}

/// Handle `parley route <path>`.
pub async fn handle(args: &RouteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.sign_in_if_requested(&args.credentials).await?;

    let route = Route::parse(&args.path);
    let response = RouteResponse {
        path: args.path.clone(),
        protected: route.is_protected(),
        decision: ctx.gate.navigate(&args.path, &ctx.controller.state()),
        route,
    };
    output(&response, flags.format)
}
