use crate::model::Id;
use crate::model::group::GroupMarker;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

/// A user as the feed engine sees one.
///
/// The stored `NULL` forms of the set-valued columns decode to empty
/// vecs; an empty `blocked` list means the user blocks nobody.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub username: String,
    pub joined_groups: Vec<Id<GroupMarker>>,
    pub interests: Vec<String>,
    pub blocked: Vec<Id<UserMarker>>,
}

impl User {
    /// Whether this user has blocked `other`. Blocking is asymmetric;
    /// callers that need mutual non-blocking check both directions.
    #[must_use]
    pub fn blocks(&self, other: Id<UserMarker>) -> bool {
        self.blocked.contains(&other)
    }

    #[must_use]
    pub fn is_member_of(&self, group: Id<GroupMarker>) -> bool {
        self.joined_groups.contains(&group)
    }
}
