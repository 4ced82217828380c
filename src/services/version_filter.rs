use crate::models::RegistryVersion;

/// Filters versions to those built for `target_game_version` and `target_loader`,
/// newest first.
///
/// The loader comparison is case-insensitive; the game version must match one of
/// the version's `game_versions` exactly. Ordering compares `published_at` as a
/// plain string, which is chronological for ISO-8601 timestamps. The sort is stable,
/// so versions with equal timestamps keep their response order.
pub fn filter_and_sort(
    versions: Vec<RegistryVersion>,
    target_game_version: &str,
    target_loader: &str,
) -> Vec<RegistryVersion> {
    let loader = target_loader.to_lowercase();

    let mut compatible: Vec<RegistryVersion> = versions
        .into_iter()
        .filter(|v| {
            v.loaders.iter().any(|l| l.to_lowercase() == loader)
                && v.game_versions.iter().any(|g| g == target_game_version)
        })
        .collect();

    compatible.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    tracing::debug!(
        "{} compatible version(s) for {} ({})",
        compatible.len(),
        target_game_version,
        loader
    );

    compatible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VersionType;
    use proptest::prelude::*;

    fn version(id: &str, game: &[&str], loaders: &[&str], published: &str) -> RegistryVersion {
        RegistryVersion {
            id: id.to_string(),
            version_number: id.to_string(),
            version_type: VersionType::Release,
            game_versions: game.iter().map(|s| s.to_string()).collect(),
            loaders: loaders.iter().map(|s| s.to_string()).collect(),
            published_at: published.to_string(),
            changelog: String::new(),
        }
    }

    #[test]
    fn test_filters_by_game_version_and_loader() {
        let versions = vec![
            version("a", &["1.20.1"], &["fabric"], "2024-01-01T00:00:00Z"),
            version("b", &["1.20.2"], &["fabric"], "2024-02-01T00:00:00Z"),
            version("c", &["1.20.1"], &["forge"], "2024-03-01T00:00:00Z"),
            version("d", &["1.20.1"], &["Quilt", "FABRIC"], "2024-04-01T00:00:00Z"),
        ];

        let result = filter_and_sort(versions, "1.20.1", "Fabric");
        let ids: Vec<&str> = result.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);
    }

    #[test]
    fn test_game_version_is_exact_match() {
        let versions = vec![version("a", &["1.20"], &["fabric"], "2024-01-01")];
        assert!(filter_and_sort(versions, "1.20.1", "fabric").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_and_sort(Vec::new(), "1.20.1", "fabric").is_empty());
    }

    #[test]
    fn test_equal_timestamps_keep_response_order() {
        let versions = vec![
            version("first", &["1.20.1"], &["fabric"], "2024-01-01"),
            version("newest", &["1.20.1"], &["fabric"], "2024-05-01"),
            version("second", &["1.20.1"], &["fabric"], "2024-01-01"),
        ];

        let result = filter_and_sort(versions, "1.20.1", "fabric");
        let ids: Vec<&str> = result.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "first", "second"]);
    }

    fn arb_version() -> impl Strategy<Value = RegistryVersion> {
        (
            "[a-z]{4}",
            prop::sample::select(vec!["1.19.4", "1.20.1", "1.21"]),
            prop::sample::select(vec!["fabric", "Fabric", "forge", "quilt"]),
            prop::sample::select(vec!["2023-01-01", "2024-01-01", "2024-06-15", "2025-03-09"]),
        )
            .prop_map(|(id, game, loader, published)| {
                version(&id, &[game], &[loader], published)
            })
    }

    proptest! {
        #[test]
        fn prop_output_is_matching_sorted_subset(
            versions in prop::collection::vec(arb_version(), 0..24)
        ) {
            let result = filter_and_sort(versions.clone(), "1.20.1", "fabric");

            for v in &result {
                prop_assert!(versions.contains(v));
                prop_assert!(v.game_versions.iter().any(|g| g == "1.20.1"));
                prop_assert!(v.loaders.iter().any(|l| l.eq_ignore_ascii_case("fabric")));
            }

            let expected = versions
                .iter()
                .filter(|v| {
                    v.game_versions.iter().any(|g| g == "1.20.1")
                        && v.loaders.iter().any(|l| l.eq_ignore_ascii_case("fabric"))
                })
                .count();
            prop_assert_eq!(result.len(), expected);

            for pair in result.windows(2) {
                prop_assert!(pair[0].published_at >= pair[1].published_at);
            }
        }

        #[test]
        fn prop_ties_preserve_input_order(
            versions in prop::collection::vec(arb_version(), 0..24)
        ) {
            let versions: Vec<RegistryVersion> = versions
                .into_iter()
                .enumerate()
                .map(|(i, mut v)| {
                    v.id = format!("{i:03}");
                    v
                })
                .collect();

            let result = filter_and_sort(versions, "1.20.1", "fabric");

            for pair in result.windows(2) {
                if pair[0].published_at == pair[1].published_at {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }
}
