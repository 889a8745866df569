use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use propdesk::modules::role_permissions::service::RolePermissionService;
use propdesk::router::init_router;
use propdesk::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    propdesk_db::run_migrations(&state.db).await;

    // Seed read-only defaults for any (role, resource) pair not yet present
    if let Err(e) = RolePermissionService::seed_defaults(&state.db).await {
        tracing::error!(error = %e.error, "Failed to initialize default permissions");
    }

    let app = init_router(state);

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    println!("🚀 Server running on http://{}", bind_addr);
    println!("📚 Swagger UI available at http://{}/swagger-ui", bind_addr);
    println!("📖 Scalar UI available at http://{}/scalar", bind_addr);
    axum::serve(listener, app).await.unwrap();
}
