use delta_core::{ChangedFile, ClassifiedEntry, DESCRIPTOR_SUFFIX, EntryKind};

const TEST_SUFFIXES: [&str; 2] = ["test", "tc"];

/// Classifies every changed file, keeping input order.
#[must_use]
pub fn classify(changed: &[ChangedFile]) -> Vec<ClassifiedEntry> {
    changed
        .iter()
        .map(|file| ClassifiedEntry {
            source_path: file.path().to_string(),
            status: file.status(),
            kind: classify_path(file.path()),
        })
        .collect()
}

/// Decides what a repository path is from its name alone.
///
/// Any file whose base name ends in `test` or `tc` (ignoring case) counts as
/// a test class, whatever its extension.
#[must_use]
pub fn classify_path(path: &str) -> EntryKind {
    if path.ends_with(DESCRIPTOR_SUFFIX) {
        return EntryKind::Descriptor;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let base = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _ext)| stem);
    let lowered = base.to_ascii_lowercase();

    if !base.is_empty() && TEST_SUFFIXES.iter().any(|s| lowered.ends_with(s)) {
        EntryKind::TestClass {
            name: base.to_string(),
        }
    } else {
        EntryKind::Component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delta_core::FileStatus;

    fn changed(path: &str) -> ChangedFile {
        ChangedFile::new(path, FileStatus::Modified).expect("valid path")
    }

    #[test]
    fn descriptor_wins_over_test_suffix() {
        assert_eq!(
            classify_path("force-app/classes/FooTest.cls-meta.xml"),
            EntryKind::Descriptor
        );
    }

    #[test]
    fn test_suffix_is_case_insensitive_and_keeps_casing() {
        assert_eq!(
            classify_path("force-app/classes/FooTest.cls"),
            EntryKind::TestClass {
                name: "FooTest".to_string()
            }
        );
        assert_eq!(
            classify_path("force-app/classes/BarTC.cls"),
            EntryKind::TestClass {
                name: "BarTC".to_string()
            }
        );
        assert_eq!(
            classify_path("classes/lowertest.cls"),
            EntryKind::TestClass {
                name: "lowertest".to_string()
            }
        );
    }

    #[test]
    fn tc_suffix_matches_any_extension() {
        assert_eq!(
            classify_path("force-app/pages/AccountTc.page"),
            EntryKind::TestClass {
                name: "AccountTc".to_string()
            }
        );
    }

    #[test]
    fn ordinary_files_are_components() {
        assert_eq!(classify_path("force-app/classes/Foo.cls"), EntryKind::Component);
        assert_eq!(
            classify_path("force-app/triggers/Testing.trigger"),
            EntryKind::Component
        );
        assert_eq!(classify_path("README"), EntryKind::Component);
    }

    #[test]
    fn only_the_last_segment_counts() {
        assert_eq!(
            classify_path("test/classes/Foo.cls"),
            EntryKind::Component
        );
    }

    #[test]
    fn classify_keeps_order_and_status() {
        let input = vec![
            changed("force-app/classes/Foo.cls"),
            changed("force-app/classes/Foo.cls-meta.xml"),
            changed("force-app/classes/FooTest.cls"),
        ];

        let entries = classify(&input);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].source_path, "force-app/classes/Foo.cls");
        assert!(entries[1].is_descriptor());
        assert!(!entries[1].is_test_class());
        assert_eq!(entries[2].derived_test_name(), Some("FooTest"));
        assert!(entries.iter().all(|e| e.status == FileStatus::Modified));
    }
}
