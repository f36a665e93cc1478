//! Free-tier entitlement check, the sole monetization gate in the system.

/// Maximum number of todos a non-subscribed user may own.
pub const FREE_TIER_TODO_LIMIT: i64 = 3;

/// Whether a user may create another todo given their subscription state
/// and the number of todos they currently own.
pub fn may_create_todo(is_subscribed: bool, owned_count: i64) -> bool {
    is_subscribed || owned_count < FREE_TIER_TODO_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_allows_up_to_the_cap() {
        assert!(may_create_todo(false, 0));
        assert!(may_create_todo(false, 2));
    }

    #[test]
    fn free_tier_denies_the_fourth_todo() {
        assert!(!may_create_todo(false, 3));
        assert!(!may_create_todo(false, 4));
    }

    #[test]
    fn subscribers_are_uncapped() {
        assert!(may_create_todo(true, 3));
        assert!(may_create_todo(true, 10_000));
    }
}
