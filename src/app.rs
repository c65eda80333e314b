use crate::infrastructure::config::ServerSettings;
use crate::interfaces::http::{start_server, HttpState};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    info!(
        "Survey intake listening on http://{}:{} (csv_path={})",
        settings.host, settings.port, settings.csv_path
    );

    let state = HttpState::from_settings(&settings);
    start_server(&settings, state)?.await
}
