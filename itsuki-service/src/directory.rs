//! Owner identity lookup, the boundary to the authentication collaborator.

use std::collections::HashMap;

use itsuki_core::OwnerId;

/// Contact details for a plan owner, as the identity collaborator knows
/// them. The engine trusts these without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerProfile {
    /// The owner's identifier.
    pub id: OwnerId,
    /// Account email, when known.
    pub email: Option<String>,
    /// Display name, when known.
    pub name: Option<String>,
}

impl OwnerProfile {
    /// A profile carrying only the identifier.
    #[must_use]
    pub fn bare(id: OwnerId) -> Self {
        Self {
            id,
            email: None,
            name: None,
        }
    }
}

/// Resolve owner ids to contact details for admin exports.
pub trait OwnerDirectory {
    /// Look up `owner`, returning `None` when the identity collaborator
    /// does not know them.
    fn lookup(&self, owner: &OwnerId) -> Option<OwnerProfile>;
}

/// A directory that knows nobody; exports fall back to bare owner ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDirectory;

impl OwnerDirectory for NullDirectory {
    fn lookup(&self, _owner: &OwnerId) -> Option<OwnerProfile> {
        None
    }
}

/// A fixed in-memory directory, used by tests and offline tooling.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    profiles: HashMap<OwnerId, OwnerProfile>,
}

impl StaticDirectory {
    /// Build a directory from known profiles.
    #[must_use]
    pub fn new<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = OwnerProfile>,
    {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }
}

impl OwnerDirectory for StaticDirectory {
    fn lookup(&self, owner: &OwnerId) -> Option<OwnerProfile> {
        self.profiles.get(owner).cloned()
    }
}
