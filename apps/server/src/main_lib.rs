use std::sync::Arc;

use crate::config::Config;
use itinero_core::{
    fx::{FxService, FxServiceTrait},
    points::{PointsQuoter, PointsService, PointsServiceTrait},
    utils::SystemClock,
};
use itinero_storage_sqlite::{
    db::{self, write_actor},
    fx::FxSnapshotRepository,
    points::PointsRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub fx_service: Arc<dyn FxServiceTrait + Send + Sync>,
    pub points_service: Arc<dyn PointsServiceTrait + Send + Sync>,
    /// Base currency for FX lookups that do not name one.
    pub fx_base_currency: String,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("ITINERO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also installs the `log` bridge, so core and storage records land here
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let fx_repo = Arc::new(FxSnapshotRepository::new(pool.clone(), writer.clone()));
    let fx_service = Arc::new(FxService::new(fx_repo));

    let points_repo = Arc::new(PointsRepository::new(pool.clone(), writer.clone()));
    let quoter = PointsQuoter::new(config.points.clone(), Arc::new(SystemClock))?;
    tracing::info!(
        "Points priced at {} {} with {} minute quotes",
        config.points.unit_price_major,
        config.points.settlement_currency,
        config.points.quote_ttl_minutes
    );
    let points_service = Arc::new(PointsService::new(points_repo, quoter));

    Ok(Arc::new(AppState {
        fx_service,
        points_service,
        fx_base_currency: config.fx_base_currency.clone(),
        db_path,
    }))
}
