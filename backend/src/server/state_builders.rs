//! Builders that turn repositories and adapters into services.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::Clock;

use medcycle::domain::ports::{
    CommunityRepository, CredentialHasher, MedicineRepository, UserRepository,
};
use medcycle::domain::{
    AccountService, CommunityService, ExpiryScanner, ExpiryScannerConfig, ExpiryScannerPorts,
    LeaderboardService, MedicineService, NotificationDispatcher, SosService,
};
use medcycle::inbound::http::state::{HttpState, HttpStatePorts};
use medcycle::outbound::persistence::{
    DbPool, DieselCommunityRepository, DieselMedicineRepository, DieselUserRepository,
};

/// Driven adapters shared by every service.
#[derive(Clone)]
pub struct ServiceDependencies {
    pub users: Arc<dyn UserRepository>,
    pub medicines: Arc<dyn MedicineRepository>,
    pub community: Arc<dyn CommunityRepository>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceDependencies {
    /// Back every repository with the same Diesel pool.
    pub fn with_diesel(
        pool: &DbPool,
        hasher: Arc<dyn CredentialHasher>,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            medicines: Arc::new(DieselMedicineRepository::new(pool.clone())),
            community: Arc::new(DieselCommunityRepository::new(pool.clone())),
            hasher,
            dispatcher,
            clock,
        }
    }
}

/// Build the HTTP handler state from the shared dependencies.
pub fn build_http_state(deps: &ServiceDependencies) -> web::Data<HttpState> {
    let medicines = Arc::new(MedicineService::new(
        deps.medicines.clone(),
        deps.users.clone(),
        deps.dispatcher.clone(),
        deps.clock.clone(),
    ));
    let community = Arc::new(CommunityService::new(
        deps.community.clone(),
        deps.medicines.clone(),
        deps.users.clone(),
        deps.clock.clone(),
    ));

    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountService::new(deps.users.clone(), deps.hasher.clone())),
        medicines: medicines.clone(),
        medicines_query: medicines,
        community: community.clone(),
        community_query: community,
        sos: Arc::new(SosService::new(deps.users.clone(), deps.dispatcher.clone())),
        leaderboard: Arc::new(LeaderboardService::new(
            deps.community.clone(),
            deps.users.clone(),
        )),
    }))
}

/// Build the expiry scanner over the same stores the HTTP services use.
pub fn build_expiry_scanner(deps: &ServiceDependencies, interval: Duration) -> Arc<ExpiryScanner> {
    Arc::new(ExpiryScanner::new(
        ExpiryScannerPorts::new(deps.medicines.clone(), deps.users.clone()),
        deps.dispatcher.clone(),
        deps.clock.clone(),
        ExpiryScannerConfig {
            interval,
            ..ExpiryScannerConfig::default()
        },
    ))
}
