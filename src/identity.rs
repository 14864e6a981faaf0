use uuid::Uuid;

/// Offline player identity. The id is a name-based (v5) UUID in the OID
/// namespace, so a username always maps to the same player id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchIdentity {
    pub username: String,
    pub player_id: Uuid,
}

impl LaunchIdentity {
    pub fn offline(username: &str) -> Self {
        Self {
            username: username.to_string(),
            player_id: offline_player_id(username),
        }
    }
}

pub fn offline_player_id(username: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, username.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_username_yields_same_id() {
        assert_eq!(offline_player_id("Steve"), offline_player_id("Steve"));
        assert_eq!(LaunchIdentity::offline("Alex"), LaunchIdentity::offline("Alex"));
    }

    #[test]
    fn different_usernames_yield_different_ids() {
        assert_ne!(offline_player_id("Steve"), offline_player_id("steve"));
        assert_ne!(offline_player_id("Player"), offline_player_id("Player2"));
    }

    #[test]
    fn matches_known_name_based_values() {
        assert_eq!(
            offline_player_id("Player").to_string(),
            "35add142-58c3-50c0-8457-3d103c06209c"
        );
        assert_eq!(
            offline_player_id("Steve").to_string(),
            "0fa7e921-3edc-5733-b4ea-e26a9468b910"
        );
        assert_eq!(offline_player_id("").get_version_num(), 5);
    }
}
