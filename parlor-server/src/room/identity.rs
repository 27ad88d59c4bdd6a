//! Identity resolution
//!
//! Picks a free display name for a new session: the requested name if it is
//! free, otherwise the name followed by the smallest `(N)` suffix (N >= 2)
//! that does not collide.

/// Resolve `requested` against a roster snapshot
///
/// Pure string computation; the registry still has the final word when the
/// result is admitted. Comparison is exact (case-sensitive).
pub fn resolve_identity(requested: &str, roster: &[String]) -> String {
    let taken = |name: &str| roster.iter().any(|present| present == name);

    if !taken(requested) {
        return requested.to_string();
    }

    let mut suffix: u64 = 2;
    loop {
        let candidate = format!("{requested}({suffix})");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_free_name_is_kept() {
        assert_eq!(resolve_identity("Alice", &roster(&[])), "Alice");
        assert_eq!(resolve_identity("Alice", &roster(&["Bob"])), "Alice");
    }

    #[test]
    fn test_first_collision_gets_suffix_two() {
        assert_eq!(resolve_identity("Alice", &roster(&["Alice"])), "Alice(2)");
    }

    #[test]
    fn test_second_collision_gets_suffix_three() {
        assert_eq!(
            resolve_identity("Alice", &roster(&["Alice", "Alice(2)"])),
            "Alice(3)"
        );
    }

    #[test]
    fn test_smallest_free_suffix_is_chosen() {
        // Alice(2) left, Alice(3) is still here
        assert_eq!(
            resolve_identity("Alice", &roster(&["Alice", "Alice(3)"])),
            "Alice(2)"
        );
    }

    #[test]
    fn test_base_name_tried_first() {
        // Only suffixed names present, the base name is free
        assert_eq!(
            resolve_identity("Alice", &roster(&["Alice(2)", "Alice(3)"])),
            "Alice"
        );
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert_eq!(resolve_identity("alice", &roster(&["Alice"])), "alice");
    }

    #[test]
    fn test_requested_name_that_looks_suffixed() {
        assert_eq!(resolve_identity("Bob(2)", &roster(&["Bob(2)"])), "Bob(2)(2)");
    }
}
