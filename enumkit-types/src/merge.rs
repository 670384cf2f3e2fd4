//! Merging several enums into one.
//!
//! Sources are folded into the result one entry at a time, in the order they are given. Each entry
//! is compared against what has been merged *so far*, not against the other sources, so the
//! outcome depends on source order whenever names clash.

use tracing::debug;

use crate::{EnumDef, Error};

/// Comment attached to entries that had to be renamed during a merge.
pub const CONFLICT_NOTE: &str = "NOTE: Duplicate name with different value";

/// How many underscores [`deconflicted_name`] will append before giving up.
pub const MAX_DECONFLICT_SUFFIXES: usize = 1024;

/// Width of the merged enum: the widest of the sources, and at least one byte.
pub fn compute_width(sources: &[EnumDef]) -> Result<u32, Error> {
    if sources.is_empty() {
        return Err(Error::InvalidArgument("no enums to compute a width from"));
    }
    Ok(sources
        .iter()
        .map(|source| source.width())
        .fold(1, u32::max))
}

/// The entry is already present in `merged` with the same value.
pub fn is_duplicate_entry(merged: &EnumDef, name: &str, value: i64) -> bool {
    merged.value(name) == Some(value)
}

/// The entry's name is taken in `merged` by a different value.
pub fn is_conflicting_entry(merged: &EnumDef, name: &str, value: i64) -> bool {
    matches!(merged.value(name), Some(existing) if existing != value)
}

/// Appends underscores to `name` until it no longer names an entry in `merged`.
pub fn deconflicted_name(merged: &EnumDef, name: &str) -> Result<String, Error> {
    let mut candidate = name.to_owned();
    for _ in 0..MAX_DECONFLICT_SUFFIXES {
        if !merged.contains(&candidate) {
            return Ok(candidate);
        }
        candidate.push('_');
    }
    if !merged.contains(&candidate) {
        return Ok(candidate);
    }
    Err(Error::DeconflictionExhausted {
        enum_name: merged.name().to_owned(),
        entry_name: name.to_owned(),
    })
}

/// Merges `sources` into a new enum called `name`.
///
/// - Entries whose name and value are both already present are skipped.
/// - Entries whose name is present with a different value are renamed with
///   [`deconflicted_name`] and get [`CONFLICT_NOTE`] as their comment.
/// - Everything else is copied over with an empty comment.
///
/// The sources are not modified, and the result is not attached to any archive.
pub fn merge(name: &str, sources: &[EnumDef]) -> Result<EnumDef, Error> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("merged enum name must not be empty"));
    }
    let width = compute_width(sources)?;

    let mut merged = EnumDef::new(name, width);
    for source in sources {
        merge_into(&mut merged, source)?;
    }

    debug!(
        enum_name = name,
        width,
        sources = sources.len(),
        entries = merged.len(),
        "Merged enums"
    );
    Ok(merged)
}

fn merge_into(merged: &mut EnumDef, source: &EnumDef) -> Result<(), Error> {
    for entry in source.entries() {
        if is_duplicate_entry(merged, &entry.name, entry.value) {
            continue;
        }

        if is_conflicting_entry(merged, &entry.name, entry.value) {
            let renamed = deconflicted_name(merged, &entry.name)?;
            debug!(
                "Merged enum {} has a duplicate entry {:?} with a different value (from {}); adding it as {:?}",
                merged.name(),
                entry.name,
                source.name(),
                renamed,
            );
            merged.add(renamed, entry.value, CONFLICT_NOTE)?;
        } else {
            merged.add(entry.name.as_str(), entry.value, "")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumEntry;

    fn def(name: &str, width: u32, entries: &[(&str, i64)]) -> EnumDef {
        let mut def = EnumDef::new(name, width);
        for &(entry, value) in entries {
            def.add(entry, value, "").unwrap();
        }
        def
    }

    fn entries(def: &EnumDef) -> Vec<(&str, i64, &str)> {
        def.entries()
            .iter()
            .map(|EnumEntry { name, value, comment }| (name.as_str(), *value, comment.as_str()))
            .collect()
    }

    #[test]
    fn width_is_max_of_sources() {
        let sources = [def("A", 1, &[]), def("B", 4, &[]), def("C", 2, &[])];
        assert_eq!(compute_width(&sources), Ok(4));
    }

    #[test]
    fn width_is_at_least_one() {
        let sources = [def("A", 0, &[]), def("B", 0, &[])];
        assert_eq!(compute_width(&sources), Ok(1));
    }

    #[test]
    fn width_of_nothing_is_an_error() {
        assert!(matches!(compute_width(&[]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn duplicates_are_coalesced() {
        let a = def("A", 1, &[("RED", 1), ("BLUE", 2)]);
        let b = def("B", 2, &[("RED", 1), ("GREEN", 3)]);
        let merged = merge("Colors", &[a, b]).unwrap();
        assert_eq!(merged.name(), "Colors");
        assert_eq!(merged.width(), 2);
        assert_eq!(
            entries(&merged),
            [("RED", 1, ""), ("BLUE", 2, ""), ("GREEN", 3, "")]
        );
    }

    #[test]
    fn conflicts_are_renamed() {
        let a = def("A", 1, &[("FLAG", 1)]);
        let b = def("B", 1, &[("FLAG", 2)]);
        let merged = merge("Flags", &[a, b]).unwrap();
        assert_eq!(
            entries(&merged),
            [("FLAG", 1, ""), ("FLAG_", 2, CONFLICT_NOTE)]
        );
    }

    #[test]
    fn renames_skip_taken_names() {
        let a = def("A", 1, &[("X", 1), ("X_", 5)]);
        let b = def("B", 1, &[("X", 2)]);
        let c = def("C", 1, &[("X", 3)]);
        let merged = merge("M", &[a, b, c]).unwrap();
        assert_eq!(
            entries(&merged),
            [
                ("X", 1, ""),
                ("X_", 5, ""),
                ("X__", 2, CONFLICT_NOTE),
                ("X___", 3, CONFLICT_NOTE),
            ]
        );
    }

    #[test]
    fn repeated_conflicting_value_is_not_coalesced_with_its_rename() {
        let a = def("A", 1, &[("X", 1)]);
        let b = def("B", 1, &[("X", 2)]);
        let c = def("C", 1, &[("X", 2)]);
        let merged = merge("M", &[a, b, c]).unwrap();
        assert_eq!(
            entries(&merged),
            [("X", 1, ""), ("X_", 2, CONFLICT_NOTE), ("X__", 2, CONFLICT_NOTE)]
        );
    }

    #[test]
    fn outcome_depends_on_source_order() {
        let a = def("A", 1, &[("X", 1)]);
        let b = def("B", 1, &[("X", 2)]);
        let c = def("C", 1, &[("X_", 3)]);

        let abc = merge("M", &[a.clone(), b.clone(), c.clone()]).unwrap();
        assert_eq!(
            entries(&abc),
            [("X", 1, ""), ("X_", 2, CONFLICT_NOTE), ("X__", 3, CONFLICT_NOTE)]
        );

        let acb = merge("M", &[a, c, b]).unwrap();
        assert_eq!(
            entries(&acb),
            [("X", 1, ""), ("X_", 3, ""), ("X__", 2, CONFLICT_NOTE)]
        );
    }

    #[test]
    fn aliased_values_are_kept() {
        let a = def("A", 1, &[("ON", 1), ("ENABLED", 1)]);
        let b = def("B", 1, &[("TRUE", 1)]);
        let merged = merge("M", &[a, b]).unwrap();
        assert_eq!(
            entries(&merged),
            [("ON", 1, ""), ("ENABLED", 1, ""), ("TRUE", 1, "")]
        );
    }

    #[test]
    fn source_comments_are_dropped() {
        let mut a = EnumDef::new("A", 1);
        a.add("X", 1, "from a").unwrap();
        let merged = merge("M", &[a.clone(), def("B", 1, &[])]).unwrap();
        assert_eq!(entries(&merged), [("X", 1, "")]);
        assert_eq!(a.get("X").unwrap().comment, "from a");
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(merge("M", &[]), Err(Error::InvalidArgument(_))));
        let sources = [def("A", 1, &[]), def("B", 1, &[])];
        assert!(matches!(merge("", &sources), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn deconfliction_is_bounded() {
        let mut merged = EnumDef::new("M", 1);
        let mut name = String::from("X");
        for value in 0..=MAX_DECONFLICT_SUFFIXES as i64 {
            merged.add(name.clone(), value, "").unwrap();
            name.push('_');
        }
        assert!(matches!(
            deconflicted_name(&merged, "X"),
            Err(Error::DeconflictionExhausted { .. })
        ));

        merged.add("Y", 0, "").unwrap();
        assert_eq!(deconflicted_name(&merged, "Y").as_deref(), Ok("Y_"));
    }

    #[test]
    fn predicates() {
        let merged = def("M", 1, &[("A", 1)]);
        assert!(is_duplicate_entry(&merged, "A", 1));
        assert!(!is_duplicate_entry(&merged, "A", 2));
        assert!(!is_duplicate_entry(&merged, "B", 1));
        assert!(is_conflicting_entry(&merged, "A", 2));
        assert!(!is_conflicting_entry(&merged, "A", 1));
        assert!(!is_conflicting_entry(&merged, "B", 1));
    }
}
