use std::sync::Arc;

use tourbook_core::identity::{AdminPolicy, IdentityVerifier};
use tourbook_core::payment::PaymentGateway;
use tourbook_store::Repositories;

#[derive(Clone)]
pub struct PaymentSettings {
    pub currency: String,
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub admin_policy: Arc<AdminPolicy>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub payments: PaymentSettings,
}
