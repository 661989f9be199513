//! Casino backend entrypoint: loads configuration, wires C1-C7 together,
//! and serves the HTTP surface (spec.md §6).

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use casino_aml::AmlService;
use casino_api::{AccessControl, AppState, JwtCodec};
use casino_cache::Cache;
use casino_events::EventBus;
use casino_store::StorePool;
use casino_wallet::WalletService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env()?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(environment = %cfg.environment, "starting casino backend");

    // The PII key is validated here, inside `StorePool::connect`, so a
    // malformed key fails fast at boot rather than on the first player
    // read/write (spec.md §9 "at-rest PII").
    let store = StorePool::connect(&cfg.database_url, &cfg.pii_encryption_key).await?;
    let cache = Arc::new(Cache::connect(&cfg.cache_url, cfg.cache_hmac_key.as_bytes().to_vec(), cfg.l1_cache_capacity).await?);
    let events = Arc::new(EventBus::connect(&cfg.cache_url).await?);

    let wallet = Arc::new(WalletService::new(store.clone(), cache, events));
    let aml = Arc::new(AmlService::new(store.clone()));
    let jwt = JwtCodec::new(cfg.jwt_signing_key.as_bytes(), cfg.jwt_algorithm(), cfg.jwt_ttl_seconds);
    let access = Arc::new(AccessControl::parse(&cfg.allowed_hosts, &cfg.ip_allow_list));

    let state = AppState { wallet, aml, store, jwt, access };
    let app = casino_api::build(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
