pub mod auth;
mod config;
mod extract;
mod handlers;
pub mod response;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Extension,
};
use tracing::Instrument;

use crate::app::AmanahApp;

pub use config::*;

pub async fn run(config: ServerConfig, auth: AuthConfig, app: AmanahApp) -> anyhow::Result<()> {
    let router = handlers::api_routes()
        .layer(middleware::from_fn(trace_request))
        .layer(Extension(auth::JwtVerifier::new(&auth)))
        .layer(Extension(app.clone()));

    println!("Starting server on port {}", config.port);
    let listener =
        tokio::net::TcpListener::bind(&std::net::SocketAddr::from(([0, 0, 0, 0], config.port)))
            .await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, closing ledger");
    app.ledger().close().await;
    Ok(())
}

async fn trace_request(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "amanah_server.request",
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
    );
    let response = async {
        amanah_tracing::http::extract_tracing(request.headers());
        next.run(request).await
    }
    .instrument(span.clone())
    .await;
    span.record("status", response.status().as_u16());
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
