//! Service wiring shared across every handler (spec.md §4.6).

use std::sync::Arc;

use axum::extract::FromRef;
use casino_aml::AmlService;
use casino_store::StorePool;
use casino_wallet::WalletService;

use crate::access::AccessControl;
use crate::auth::JwtCodec;

#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletService>,
    pub aml: Arc<AmlService>,
    pub store: StorePool,
    pub jwt: JwtCodec,
    pub access: Arc<AccessControl>,
}

impl FromRef<AppState> for JwtCodec {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
