//! Shared test utilities.
//!
//! - `TestDatabase`: migrated PostgreSQL container (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data
//! - `assertions`: assertion helpers
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let email = builder.email("primary");
//!     let name = builder.name("user", "primary");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data keyed by a seed.
///
/// Tests sharing a database stay apart by seeding from their own name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// assert!(builder.email("a").ends_with("@example.com"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A unique, syntactically valid email address.
    pub fn email(&self, tag: &str) -> String {
        format!("{}.{}@example.com", tag, self.seed)
    }

    /// A phone number in E.164 shape derived from the seed.
    pub fn phone(&self) -> String {
        format!("+1555{:07}", self.seed % 10_000_000)
    }
}

pub mod assertions {
    use std::fmt::Debug;

    /// Assert that an optional value is Some and return it.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `items` projected through `key` are in descending order.
    pub fn assert_sorted_desc<T, K: PartialOrd + Debug>(items: &[T], key: impl Fn(&T) -> K) {
        let keys: Vec<K> = items.iter().map(key).collect();
        for pair in keys.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "expected descending order, got {:?}",
                keys
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.email("a"), builder2.email("a"));
        assert_eq!(builder1.phone(), builder2.phone());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("a"), builder2.email("a"));
    }

    #[test]
    fn test_phone_shape() {
        let phone = TestDataBuilder::new(42).phone();
        assert_eq!(phone, "+15550000042");
    }

    #[test]
    fn test_assert_sorted_desc() {
        assertions::assert_sorted_desc(&[3, 2, 2, 1], |v| *v);
    }

    #[test]
    #[should_panic(expected = "descending")]
    fn test_assert_sorted_desc_panics_on_ascending() {
        assertions::assert_sorted_desc(&[1, 2], |v| *v);
    }
}
