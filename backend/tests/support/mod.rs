//! Shared wiring for integration tests: real services over in-memory stores.

#![allow(
    dead_code,
    reason = "each test binary uses a different subset of the helpers"
)]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};

use medcycle::Trace;
use medcycle::domain::{
    AccountService, CommunityService, LeaderboardService, MedicineService,
    NotificationDispatcher, SosService,
};
use medcycle::inbound::http::configure_api;
use medcycle::inbound::http::state::{HttpState, HttpStatePorts};
use medcycle::test_support::{
    InMemoryCommunityRepository, InMemoryMedicineRepository, InMemoryUserRepository,
    MutableClock, PlainHasher, RecordingSender,
};

/// Fixed "now" shared by the integration suites.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Stores, sender and clock behind every service in a test.
pub struct World {
    pub users: Arc<InMemoryUserRepository>,
    pub medicines: Arc<InMemoryMedicineRepository>,
    pub community: Arc<InMemoryCommunityRepository>,
    pub sender: Arc<RecordingSender>,
    pub clock: Arc<MutableClock>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl World {
    pub fn new(users: InMemoryUserRepository, sender: RecordingSender) -> Self {
        let sender = Arc::new(sender);
        Self {
            users: Arc::new(users),
            medicines: Arc::new(InMemoryMedicineRepository::default()),
            community: Arc::new(InMemoryCommunityRepository::default()),
            dispatcher: Arc::new(NotificationDispatcher::new(sender.clone())),
            sender,
            clock: Arc::new(MutableClock::new(now())),
        }
    }

    /// Same stores, but messaging is not configured.
    pub fn without_messaging(users: InMemoryUserRepository) -> Self {
        let mut world = Self::new(users, RecordingSender::default());
        world.dispatcher = Arc::new(NotificationDispatcher::disabled());
        world
    }

    pub fn medicine_service(&self) -> MedicineService {
        MedicineService::new(
            self.medicines.clone(),
            self.users.clone(),
            self.dispatcher.clone(),
            self.clock.clone(),
        )
    }

    pub fn community_service(&self) -> CommunityService {
        CommunityService::new(
            self.community.clone(),
            self.medicines.clone(),
            self.users.clone(),
            self.clock.clone(),
        )
    }

    pub fn sos_service(&self) -> SosService {
        SosService::new(self.users.clone(), self.dispatcher.clone())
    }

    pub fn leaderboard_service(&self) -> LeaderboardService {
        LeaderboardService::new(self.community.clone(), self.users.clone())
    }

    pub fn http_state(&self) -> HttpState {
        let medicines = Arc::new(self.medicine_service());
        let community = Arc::new(self.community_service());
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(AccountService::new(self.users.clone(), Arc::new(PlainHasher))),
            medicines: medicines.clone(),
            medicines_query: medicines,
            community: community.clone(),
            community_query: community,
            sos: Arc::new(self.sos_service()),
            leaderboard: Arc::new(self.leaderboard_service()),
        })
    }

    /// Initialise the versioned API over this world's services.
    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(web::Data::new(self.http_state()))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure_api)),
        )
        .await
    }
}
