//! Test helpers for inbound HTTP handlers.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::ports::{
    MockAccountsCommand, MockCommunityCommand, MockCommunityQuery, MockLeaderboardQuery,
    MockMedicinesCommand, MockMedicinesQuery, MockSosCommand,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mocked driving ports; unset mocks fail the test when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub accounts: MockAccountsCommand,
    pub medicines: MockMedicinesCommand,
    pub medicines_query: MockMedicinesQuery,
    pub community: MockCommunityCommand,
    pub community_query: MockCommunityQuery,
    pub sos: MockSosCommand,
    pub leaderboard: MockLeaderboardQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            medicines: Arc::new(self.medicines),
            medicines_query: Arc::new(self.medicines_query),
            community: Arc::new(self.community),
            community_query: Arc::new(self.community_query),
            sos: Arc::new(self.sos),
            leaderboard: Arc::new(self.leaderboard),
        })
    }
}

/// Build the `/api/v1` app over mocked ports.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Read `details.<key>` from an error payload.
pub(crate) fn detail<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get("details")
        .and_then(|details| details.get(key))
        .and_then(Value::as_str)
}
