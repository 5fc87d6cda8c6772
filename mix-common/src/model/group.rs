use crate::model::Id;
use crate::model::user::UserMarker;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct GroupMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Group {
    pub id: Id<GroupMarker>,
    pub name: String,
    pub private: bool,
    pub interests: Vec<String>,
    pub banned: Vec<BanEntry>,
}

/// One entry of a group's banned-user set. Presence by id match means
/// banned; the metadata is carried but never inspected by the engine.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct BanEntry {
    #[serde(rename = "userID")]
    pub user_id: Id<UserMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Group {
    #[must_use]
    pub fn has_banned(&self, user: Id<UserMarker>) -> bool {
        self.banned.iter().any(|entry| entry.user_id == user)
    }

    #[must_use]
    pub fn has_interest(&self, tag: &str) -> bool {
        self.interests.iter().any(|interest| interest == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_bans(banned: &[u64]) -> Group {
        Group {
            id: Id::new(1),
            name: "gardening".to_owned(),
            private: false,
            interests: vec!["plants".to_owned()],
            banned: banned
                .iter()
                .map(|&id| BanEntry {
                    user_id: Id::new(id),
                    reason: None,
                })
                .collect(),
        }
    }

    #[test]
    fn ban_matches_by_id() {
        let group = group_with_bans(&[7, 9]);
        assert!(group.has_banned(Id::new(7)));
        assert!(group.has_banned(Id::new(9)));
        assert!(!group.has_banned(Id::new(8)));
    }

    #[test]
    fn empty_ban_set_bans_nobody() {
        let group = group_with_bans(&[]);
        assert!(!group.has_banned(Id::new(7)));
    }

    #[test]
    fn interest_matches_exact_tag() {
        let group = group_with_bans(&[]);
        assert!(group.has_interest("plants"));
        assert!(!group.has_interest("plant"));
    }
}
