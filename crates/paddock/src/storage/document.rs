//! Mapping between model types and stored collections.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use paddock_core::{Championship, Event, Team, Track};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Length of generated document ids.
pub const ID_LEN: usize = 20;

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Championship documents.
    Championships,
    /// Team documents.
    Teams,
    /// Track documents.
    Tracks,
    /// Event documents.
    Events,
}

impl Collection {
    /// Every collection, in dependency order.
    pub const ALL: [Self; 4] = [Self::Championships, Self::Teams, Self::Tracks, Self::Events];

    /// Table holding the collection.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Championships => "championships",
            Self::Teams => "teams",
            Self::Tracks => "tracks",
            Self::Events => "events",
        }
    }

    /// Singular noun used in messages.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Championships => "championship",
            Self::Teams => "team",
            Self::Tracks => "track",
            Self::Events => "event",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// A model type stored as a JSON document.
pub trait Document: Serialize + DeserializeOwned {
    /// Collection the type lives in.
    const COLLECTION: Collection;

    /// Document id, empty when unsaved.
    fn id(&self) -> &str;

    /// Set the document id.
    fn set_id(&mut self, id: String);

    /// Owning championship, if the document belongs to one.
    fn championship_id(&self) -> Option<&str>;
}

impl Document for Championship {
    const COLLECTION: Collection = Collection::Championships;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn championship_id(&self) -> Option<&str> {
        None
    }
}

macro_rules! owned_document {
    ($ty:ty, $collection:expr) => {
        impl Document for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn championship_id(&self) -> Option<&str> {
                Some(&self.championship_id)
            }
        }
    };
}

owned_document!(Team, Collection::Teams);
owned_document!(Track, Collection::Tracks);
owned_document!(Event, Collection::Events);

/// Generate a new document id for a collection.
///
/// Ids are the first [`ID_LEN`] hex characters of a BLAKE3 digest over the
/// collection, the wall clock, the process id and a process-wide sequence.
#[must_use]
pub fn generate_id(collection: Collection) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut hasher = blake3::Hasher::new();
    hasher.update(collection.table().as_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(&sequence.to_le_bytes());

    let mut id = hasher.finalize().to_hex().to_string();
    id.truncate(ID_LEN);
    id
}
