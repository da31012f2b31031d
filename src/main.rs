use pdf_reader_ai::api::{create_router, AppState};
use pdf_reader_ai::application::{Session, SessionServices};
use pdf_reader_ai::infrastructure::{
    embedding, llm, AppConfig, InMemoryStoreFactory, PdfTextExtractor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "api=debug,pdf_reader_ai=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    info!(
        model = %config.config.llm.model,
        embedding = %config.config.embedding.model,
        "configuration loaded"
    );

    let llm = llm::from_config(&config.config.llm)?;
    let embedding = embedding::from_config(&config.config.embedding)?;
    let services = SessionServices {
        extractor: Arc::new(PdfTextExtractor::new()),
        splitter: config.splitter()?,
        embedding,
        vector_stores: Arc::new(InMemoryStoreFactory),
        llm,
        settings: config.conversation_settings(),
        summary: config.summary_settings(),
    };

    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );
    let state = AppState::new(Session::new(services), config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
