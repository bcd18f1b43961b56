//! `route` and `dashboard` commands.

use pizzeria_client::ApiClient;
use pizzeria_client::dashboard;
use pizzeria_client::guard;
use pizzeria_client::navigation::{RecordingNavigator, Route};

use super::{CliError, print_json};

/// Resolve `path` and report where the current session would end up.
#[allow(clippy::print_stdout)]
pub fn route(api: &ApiClient, path: &str) {
    let requested = Route::from_path(path);
    let navigator = RecordingNavigator::new();
    let allowed = guard::navigate(requested, api.session(), &navigator);
    let landed = navigator.last().unwrap_or(requested);

    if allowed {
        println!("{requested}: allowed ({:?})", requested.guard());
    } else {
        println!("{requested}: redirected to {landed}");
    }
}

/// Print the admin dashboard counts.
pub async fn dashboard(api: &ApiClient) -> Result<(), CliError> {
    if !guard::navigate(Route::AdminDashboard, api.session(), &RecordingNavigator::new()) {
        tracing::warn!("The dashboard is meant for administrators; counts may be incomplete");
    }
    let stats = dashboard::load(api).await;
    print_json(&stats)
}
