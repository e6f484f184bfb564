use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Every workspace crate declares the entry points it ships: a library needs
/// `src/lib.rs`, a binary needs `src/main.rs`.
#[cfg(test)]
mod crate_entry_point_tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct CrateInfo {
        has_lib: bool,
        has_bin: bool,
        has_lib_rs: bool,
        has_main_rs: bool,
    }

    fn crate_dir(crate_dir: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(crate_dir)
    }

    fn parse_crate_info(dir: &str) -> Result<CrateInfo, String> {
        let root = crate_dir(dir);
        let cargo_toml = fs::read_to_string(root.join("Cargo.toml"))
            .map_err(|e| format!("Failed to read Cargo.toml for {}: {}", dir, e))?;

        let has_lib_rs = root.join("src/lib.rs").exists();
        let has_main_rs = root.join("src/main.rs").exists();

        // Without explicit targets, cargo infers them from the files present
        let has_lib = cargo_toml.contains("[lib]") || has_lib_rs;
        let has_bin = cargo_toml.contains("[[bin]]") || has_main_rs;

        Ok(CrateInfo {
            has_lib,
            has_bin,
            has_lib_rs,
            has_main_rs,
        })
    }

    proptest! {
        #[test]
        fn test_crate_entry_point_consistency(
            dir in prop::sample::select(vec!["processor-core", "processor", "test-server"])
        ) {
            let info = parse_crate_info(dir).map_err(|e| TestCaseError::fail(e))?;

            if info.has_lib {
                prop_assert!(info.has_lib_rs, "Crate '{}' is a library but has no lib.rs", dir);
            }
            if info.has_bin {
                prop_assert!(info.has_main_rs, "Crate '{}' is a binary but has no main.rs", dir);
            }
            prop_assert!(info.has_lib_rs || info.has_main_rs, "Crate '{}' has no entry point", dir);
        }
    }

    #[test]
    fn test_specific_crate_entry_points() {
        let core = parse_crate_info("processor-core").unwrap();
        assert!(core.has_lib_rs, "processor-core should be a library crate");
        assert!(!core.has_main_rs, "processor-core should not ship a binary");

        let processor = parse_crate_info("processor").unwrap();
        assert!(processor.has_lib_rs && processor.has_main_rs);

        let target = parse_crate_info("test-server").unwrap();
        assert!(target.has_lib_rs && target.has_main_rs);
    }

    #[test]
    fn test_generated_service_is_built_by_core() {
        let build_rs = fs::read_to_string(crate_dir("processor-core").join("build.rs")).unwrap();
        assert!(build_rs.contains("envoy.service.ext_proc.v3"));
        assert!(build_rs.contains("ExternalProcessor"));
    }
}
