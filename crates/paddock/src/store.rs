//! Read access to league data.
//!
//! [`LeagueStore`] is the seam between the dashboard loader and whatever
//! holds the documents. [`Storage`] is the production implementation.

use async_trait::async_trait;
use paddock_core::{Championship, Event, Team, Track};

use crate::error::Result;
use crate::storage::Storage;

/// Read-only access to the collections of a league.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    /// Name of this store (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Fetch a championship, `None` if it does not exist.
    async fn championship(&self, id: &str) -> Result<Option<Championship>>;

    /// Fetch every championship.
    async fn championships(&self) -> Result<Vec<Championship>>;

    /// Fetch the teams of a championship.
    async fn teams(&self, championship_id: &str) -> Result<Vec<Team>>;

    /// Fetch the tracks of a championship.
    async fn tracks(&self, championship_id: &str) -> Result<Vec<Track>>;

    /// Fetch the events of a championship.
    async fn events(&self, championship_id: &str) -> Result<Vec<Event>>;
}

#[async_trait]
impl LeagueStore for Storage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn championship(&self, id: &str) -> Result<Option<Championship>> {
        self.get(id)
    }

    async fn championships(&self) -> Result<Vec<Championship>> {
        self.list()
    }

    async fn teams(&self, championship_id: &str) -> Result<Vec<Team>> {
        self.list_for(championship_id)
    }

    async fn tracks(&self, championship_id: &str) -> Result<Vec<Track>> {
        self.list_for(championship_id)
    }

    async fn events(&self, championship_id: &str) -> Result<Vec<Event>> {
        self.list_for(championship_id)
    }
}
