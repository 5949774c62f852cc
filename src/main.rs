mod analysis;
mod cache;
mod config;
mod reddit;
mod session;
mod web;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use anyhow::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "readit=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;

    // Reddit client; bad credentials stop the process here
    let forum = Arc::new(reddit::RedditClient::connect(&config.reddit).await?);

    // Sentiment model
    let classifier = Arc::new(analysis::HostedClassifier::new(&config.classifier));
    info!("Using sentiment model {}", config.classifier.model);
    let analyzer = Arc::new(analysis::Analyzer::new(classifier));

    let flow = session::Orchestrator::new(forum, analyzer);
    let sessions = session::SessionStore::new(&config.web, &config.cache);
    let app_state = web::state::AppState::new(sessions, flow);

    // Web server
    let router = web::create_router(app_state);
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    info!("Web server ended");
    Ok(())
}
