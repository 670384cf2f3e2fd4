//! Property-based tests for enum merging.
//!
//! Whatever the sources look like, a merge must:
//! - produce pairwise distinct entry names,
//! - keep every (name, value) pair of every source reachable, either under its own name or under a
//!   renamed one,
//! - pick the widest source width (at least one byte),
//! - be deterministic and leave its inputs alone.

use std::collections::HashSet;

use enumkit_types::{compute_width, merge, EnumDef, CONFLICT_NOTE};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// Names are drawn from a small alphabet so that sources collide often.
fn entry_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-C]{1,2}_?").unwrap()
}

fn value_strategy() -> impl Strategy<Value = i64> {
    -4i64..4
}

fn width_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(1), Just(2), Just(4), Just(8)]
}

fn enum_strategy() -> impl Strategy<Value = EnumDef> {
    (
        width_strategy(),
        prop::collection::vec((entry_name_strategy(), value_strategy()), 0..8),
    )
        .prop_map(|(width, entries)| {
            let mut def = EnumDef::new("Source", width);
            for (name, value) in entries {
                // Generated names may repeat within one source; keep the first.
                let _ = def.add(name, value, "");
            }
            def
        })
}

fn sources_strategy() -> impl Strategy<Value = Vec<EnumDef>> {
    prop::collection::vec(enum_strategy(), 1..5)
}

fn disjoint_pair_strategy() -> impl Strategy<Value = (EnumDef, EnumDef)> {
    (enum_strategy(), enum_strategy()).prop_map(|(a, b)| {
        let mut left = EnumDef::new("Left", a.width());
        for entry in a.entries() {
            left.add(format!("L{}", entry.name), entry.value, "").unwrap();
        }
        let mut right = EnumDef::new("Right", b.width());
        for entry in b.entries() {
            right.add(format!("R{}", entry.name), entry.value, "").unwrap();
        }
        (left, right)
    })
}

// =============================================================================
// MERGE PROPERTY TESTS
// =============================================================================

mod merge_properties {
    use super::*;

    proptest! {
        /// No two entries of the result share a name.
        #[test]
        fn names_are_distinct(sources in sources_strategy()) {
            let merged = merge("Merged", &sources).unwrap();
            let names: HashSet<_> = merged.names().collect();
            prop_assert_eq!(names.len(), merged.len());
        }

        /// Width is the maximum source width, but never zero.
        #[test]
        fn width_is_max_of_sources(sources in sources_strategy()) {
            let merged = merge("Merged", &sources).unwrap();
            let expected = sources.iter().map(|s| s.width()).max().unwrap().max(1);
            prop_assert_eq!(merged.width(), expected);
            prop_assert_eq!(compute_width(&sources).unwrap(), expected);
        }

        /// Every source value survives, either under its own name or a suffixed one.
        #[test]
        fn every_value_survives(sources in sources_strategy()) {
            let merged = merge("Merged", &sources).unwrap();
            for source in &sources {
                for entry in source.entries() {
                    let found = merged.entries().iter().any(|merged_entry| {
                        merged_entry.value == entry.value
                            && merged_entry.name.starts_with(&entry.name)
                            && merged_entry.name[entry.name.len()..].chars().all(|c| c == '_')
                    });
                    prop_assert!(found, "{} = {} is missing", entry.name, entry.value);
                }
            }
        }

        /// Only renamed entries carry the conflict note, and the first source is copied verbatim.
        #[test]
        fn first_source_is_never_renamed(sources in sources_strategy()) {
            let merged = merge("Merged", &sources).unwrap();
            let first = &sources[0];
            prop_assert_eq!(
                merged.entries()[..first.len()].iter().map(|e| (&e.name, e.value)).collect::<Vec<_>>(),
                first.entries().iter().map(|e| (&e.name, e.value)).collect::<Vec<_>>()
            );
            for entry in merged.entries() {
                if entry.comment == CONFLICT_NOTE {
                    prop_assert!(entry.name.ends_with('_'));
                } else {
                    prop_assert!(entry.comment.is_empty());
                }
            }
        }

        /// Same input, same output; inputs are not touched.
        #[test]
        fn merge_is_deterministic(sources in sources_strategy()) {
            let snapshot = sources.clone();
            let once = merge("Merged", &sources).unwrap();
            let twice = merge("Merged", &sources).unwrap();
            prop_assert_eq!(once, twice);
            prop_assert_eq!(sources, snapshot);
        }

        /// Merging an enum with itself changes nothing but the name and the minimum width.
        #[test]
        fn merge_with_self_is_identity(source in enum_strategy()) {
            let merged = merge("Merged", &[source.clone(), source.clone()]).unwrap();
            prop_assert_eq!(
                merged.entries().iter().map(|e| (&e.name, e.value)).collect::<Vec<_>>(),
                source.entries().iter().map(|e| (&e.name, e.value)).collect::<Vec<_>>()
            );
        }

        /// Disjoint sources merge into their concatenation.
        #[test]
        fn disjoint_sources_union((left, right) in disjoint_pair_strategy()) {
            let merged = merge("Merged", &[left.clone(), right.clone()]).unwrap();
            let expected: Vec<_> = left.entries().iter().chain(right.entries()).cloned().collect();
            prop_assert_eq!(merged.entries(), &expected[..]);
            prop_assert_eq!(merged.width(), left.width().max(right.width()).max(1));
        }
    }
}
