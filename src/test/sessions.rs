#[cfg(test)]
mod tests {
    use crate::auth::SessionStore;
    use crate::test::utils::temp_session_store;
    use std::fs;

    #[test]
    fn test_defaults_before_any_write() {
        let (_dir, store) = temp_session_store();

        assert!(!store.is_logged_in());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_save_and_read() {
        let (_dir, store) = temp_session_store();

        store
            .save_session("123456789012")
            .expect("Failed to save session");

        assert!(store.is_logged_in());
        assert_eq!(store.current_user().as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_clear_wins_regardless_of_repeated_saves() {
        let (_dir, store) = temp_session_store();

        store.save_session("123456789012").expect("Failed to save");
        store.save_session("123456789012").expect("Failed to save");
        store.save_session("210987654321").expect("Failed to save");

        store.clear_session().expect("Failed to clear session");

        assert!(!store.is_logged_in());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_clear_when_already_cleared() {
        let (_dir, store) = temp_session_store();

        store
            .clear_session()
            .expect("Clearing an empty store should not fail");
        store
            .clear_session()
            .expect("Clearing twice should not fail either");

        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("session.json");

        SessionStore::open(&path)
            .save_session("123456789012")
            .expect("Failed to save session");

        // A cold read through a fresh handle sees the persisted state.
        let reopened = SessionStore::open(&path);
        assert!(reopened.is_logged_in());
        assert_eq!(reopened.current_user().as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("session.json");

        fs::write(&path, b"not json at all {{{").expect("Failed to write garbage");

        let store = SessionStore::open(&path);
        assert!(!store.is_logged_in());
        assert!(store.current_user().is_none());

        // And the store recovers on the next save.
        store.save_session("123456789012").expect("Failed to save");
        assert!(store.is_logged_in());
    }
}
