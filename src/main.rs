use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use vehicle_registry::config::environment::EnvironmentConfig;
use vehicle_registry::database::{connection, init};
use vehicle_registry::routes::create_router;
use vehicle_registry::services::image_storage::{ImageStore, LocalImageStore, R2ImageStore};
use vehicle_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Registry - registro de vehículos y conductores");
    info!("=========================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match connection::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    init::init_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Error inicializando schema: {}", e))?;
    init::init_default_admin(&pool, &config)
        .await
        .map_err(|e| anyhow::anyhow!("Error provisionando admin: {}", e))?;
    info!("✅ Base de datos inicializada");

    // Seleccionar almacenamiento de imágenes
    let store: Arc<dyn ImageStore> = match &config.r2 {
        Some(r2) => {
            info!("✅ Almacenamiento de imágenes: Cloudflare R2 (bucket '{}')", r2.bucket);
            Arc::new(R2ImageStore::new(r2).await)
        }
        None => {
            warn!(
                "⚠️ Credenciales de R2 no configuradas. Usando almacenamiento local en '{}' (solo desarrollo)",
                config.upload_dir
            );
            Arc::new(LocalImageStore::new(config.upload_dir.clone()))
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let app_state = AppState::new(pool, config, store);
    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST   /auth - Login de administrador");
    info!("   DELETE /auth - Logout");
    info!("📋 Registros públicos:");
    info!("   GET  /records - Listado paginado");
    info!("   GET  /records/search - Búsqueda por matrícula o conductor");
    info!("   POST /records/search-by-image - Búsqueda por imagen (IA)");
    info!("🔧 Registros admin (requieren sesión):");
    info!("   POST   /admin/records - Crear registro");
    info!("   PUT    /admin/records/:id - Actualizar registro");
    info!("   DELETE /admin/records/:id - Eliminar registro");
    info!("🖼️ Imágenes:");
    info!("   GET  /images/:key - Servir imagen almacenada");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
