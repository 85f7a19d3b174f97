//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, CommunityCommand, CommunityQuery, LeaderboardQuery, MedicinesCommand,
    MedicinesQuery, SosCommand,
};

/// Parameter object bundling the driving ports for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsCommand>,
    pub medicines: Arc<dyn MedicinesCommand>,
    pub medicines_query: Arc<dyn MedicinesQuery>,
    pub community: Arc<dyn CommunityCommand>,
    pub community_query: Arc<dyn CommunityQuery>,
    pub sos: Arc<dyn SosCommand>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub medicines: Arc<dyn MedicinesCommand>,
    pub medicines_query: Arc<dyn MedicinesQuery>,
    pub community: Arc<dyn CommunityCommand>,
    pub community_query: Arc<dyn CommunityQuery>,
    pub sos: Arc<dyn SosCommand>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            medicines,
            medicines_query,
            community,
            community_query,
            sos,
            leaderboard,
        } = ports;
        Self {
            accounts,
            medicines,
            medicines_query,
            community,
            community_query,
            sos,
            leaderboard,
        }
    }
}
