use tracing::{info, warn};

use trial_grid::config::GridConfig;
use trial_grid::server::create_router;
use trial_grid::session::Session;
use trial_grid::sync::message::LatestAnnotations;
use trial_grid::sync::{FileHost, InboundMessage};

#[tokio::main]
async fn main() {
    trial_grid::env_config::init_tracing();
    let _base = trial_grid::env_config::init_base_path();
    let port = trial_grid::env_config::server_port();
    let config_path = trial_grid::env_config::config_path();

    let config = match GridConfig::load_from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} ({})", e, config_path.display());
            std::process::exit(1);
        }
    };
    info!(mode = %config.mode, config = %config_path.display(), "configuration loaded");

    let host = FileHost::new(trial_grid::env_config::data_dir());
    let saved = host.load_student_data();
    let latest_comment = host
        .latest_comment()
        .and_then(|annotation| serde_json::to_value(annotation).ok());
    info!(dir = %host.dir().display(), "session data directory");

    let mut session = Session::new(config, Box::new(host));
    if let Some(data) = saved {
        session.restore(data);
        info!(
            completed = session.store().completed().len(),
            flagged = session.store().flagged().len(),
            "restored saved state"
        );
    }
    let annotations = InboundMessage::LatestAnnotations(LatestAnnotations {
        latest_score_annotation: None,
        latest_comment_annotation: latest_comment,
    });
    if let Err(e) = session.handle_message(annotations) {
        warn!(error = %e, "could not apply saved annotations");
    }

    let app = create_router(session);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    info!(port, "server is running, press Ctrl+C to stop");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("stopping server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install CTRL+C signal handler");
    }
}
