use crate::error::{DatasetError, Result};
use std::future::Future;

/// Upper bound on collision-resolution probes. The reference behavior loops
/// forever; a broken existence check would turn that into a hang, so we cap
/// it and report a typed failure instead.
pub const MAX_UNIQUE_ATTEMPTS: usize = 10_000;

/// Convert a name to be alphanumeric plus underscores. One replacement per
/// character, length preserved, never fails.
pub fn to_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Resolve a collision-free name by probing `exists`. The candidate itself
/// is tried first, then `<candidate>_1`, `<candidate>_2`, and so on. An
/// existence check that fails (as opposed to answering "absent") aborts the
/// resolution.
pub async fn ensure_unique<F, Fut>(mut exists: F, candidate: &str) -> Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let mut unique = candidate.to_string();
    for counter in 1..=MAX_UNIQUE_ATTEMPTS {
        if !exists(unique.clone()).await? {
            return Ok(unique);
        }
        unique = format!("{candidate}_{counter}");
    }
    Err(DatasetError::Other(format!(
        "no free name for {candidate} after {MAX_UNIQUE_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn to_file_name_replaces_non_alphanumerics() {
        let tests = [
            ("test", "test"),
            ("test@", "test_"),
            ("test@123", "test_123"),
            ("TEST_TEST-TEST", "TEST_TEST_TEST"),
            ("123", "123"),
            ("_", "_"),
            ("!!!!!!!!!!!!!!!!!!!", "___________________"),
        ];

        for (name, output) in tests {
            assert_eq!(to_file_name(name), output, "to_file_name({name})");
        }
    }

    #[tokio::test]
    async fn ensure_unique_suffixes_on_collision() {
        let mut taken = HashSet::new();

        for expected in ["file_", "file__1", "file__2"] {
            let name = ensure_unique(
                |candidate| {
                    let present = taken.contains(&candidate);
                    async move { Ok(present) }
                },
                "file_",
            )
            .await
            .expect("resolve");
            assert_eq!(name, expected);
            taken.insert(name);
        }
    }

    #[tokio::test]
    async fn ensure_unique_gives_up_after_the_attempt_cap() {
        // An existence check that never answers "absent" must end in a
        // typed failure, not an endless probe loop.
        let err = ensure_unique(|_| async { Ok(true) }, "file")
            .await
            .unwrap_err();
        assert!(matches!(err, DatasetError::Other(_)), "got: {err}");
        assert!(err.to_string().contains("10000 attempts"), "got: {err}");
    }

    #[tokio::test]
    async fn ensure_unique_propagates_check_failures() {
        let err = ensure_unique(
            |_| async { Err(DatasetError::Other("backend down".into())) },
            "file",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DatasetError::Other(_)));
    }
}
