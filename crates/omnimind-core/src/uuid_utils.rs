//! UUID helpers.

use uuid::Uuid;

/// Generate a time-ordered UUIDv7.
///
/// V7 embeds a Unix timestamp, so primary keys sort chronologically —
/// index-friendly inserts and natural created-order scans.
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_version() {
        let id = new_v7();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_new_v7_monotonic_ordering() {
        let a = new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = new_v7();
        assert!(a < b);
    }
}
