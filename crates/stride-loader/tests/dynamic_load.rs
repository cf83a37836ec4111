//! Integration test: the full dynamic-load contract, end to end.
//!
//! Builds the `pulse_plugin` fixture as a real cdylib, loads it
//! through the loader, verifies the capability surface, and drives a
//! short lockstep run through hooks living in foreign code.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use stride_core::PluginError;
use stride_engine::{RunConfig, Scheduler};
use stride_loader::{default_extension, LoadError, PluginLoader};

static FIXTURE: OnceLock<PathBuf> = OnceLock::new();

fn fixture_library() -> &'static Path {
    FIXTURE.get_or_init(|| {
        build_fixture_library("tests/fixtures/pulse_plugin/Cargo.toml", "pulse_plugin")
    })
}

fn build_fixture_library(manifest_rel: &str, crate_name: &str) -> PathBuf {
    let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let manifest_path = crate_root.join(manifest_rel);
    let manifest_dir = manifest_path
        .parent()
        .expect("fixture manifest must have parent dir");

    let status = Command::new(cargo_bin())
        .arg("build")
        .arg("--manifest-path")
        .arg(&manifest_path)
        .env("CARGO_TARGET_DIR", manifest_dir.join("target"))
        .current_dir(manifest_dir)
        .status()
        .expect("spawn cargo build for fixture plugin");
    assert!(
        status.success(),
        "fixture build failed: {}",
        manifest_path.display()
    );

    let expected = manifest_dir
        .join("target")
        .join("debug")
        .join(dylib_filename(crate_name));
    if expected.exists() {
        return expected;
    }

    let file_name = dylib_filename(crate_name);
    find_file_recursive(&manifest_dir.join("target").join("debug"), &file_name)
        .unwrap_or_else(|| panic!("cannot locate fixture dylib {file_name}"))
}

fn cargo_bin() -> String {
    std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string())
}

fn dylib_filename(crate_name: &str) -> String {
    let base = crate_name.replace('-', "_");
    match std::env::consts::OS {
        "windows" => format!("{base}.dll"),
        "macos" => format!("lib{base}.dylib"),
        _ => format!("lib{base}.so"),
    }
}

fn find_file_recursive(root: &Path, file_name: &str) -> Option<PathBuf> {
    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name {
            return Some(entry.path().to_path_buf());
        }
    }
    None
}

fn run_config() -> RunConfig {
    RunConfig {
        threads: 2,
        steps: 3,
        substeps: 2,
        seed: 7,
    }
}

#[test]
fn loads_module_and_drives_a_run_through_its_hooks() {
    let artifact = fixture_library();

    let temp = tempfile::tempdir().expect("create temp dir");
    let plugins_dir = temp.path().join("plugins");
    std::fs::create_dir_all(&plugins_dir).expect("create plugins dir");
    let module_path = plugins_dir.join(artifact.file_name().unwrap());
    std::fs::copy(artifact, &module_path).expect("stage fixture module");

    let config = run_config();
    let ctx = config.context();
    let mut loader = PluginLoader::new();
    let mut registry = loader
        .load_dirs(&[plugins_dir], default_extension(), &ctx)
        .expect("load fixture module");

    assert_eq!(registry.len(), 1);
    assert_eq!(loader.loaded_modules(), 1);

    let plugin = registry.get(0).unwrap();
    assert_eq!(plugin.name(), "pulse");
    assert_eq!(plugin.version().to_string(), "1.0.0");
    assert!(plugin.description().contains("pulse"));
    assert_eq!(plugin.filename(), Some(module_path.as_path()));
    assert_eq!(plugin.hooks().len(), 2);

    // The loader already initialized the instance; a second init must
    // be rejected and must not change the recorded filename.
    let plugin = registry.get_mut(0).unwrap();
    match plugin.init(&ctx, Path::new("elsewhere.so")) {
        Err(PluginError::AlreadyInitialized { name }) => assert_eq!(name, "pulse"),
        other => panic!("expected AlreadyInitialized, got {other:?}"),
    }
    assert_eq!(registry.get(0).unwrap().filename(), Some(module_path.as_path()));

    // Hooks compiled into the module drive a real lockstep grid.
    let scheduler = Scheduler::new(config, &registry).expect("build scheduler");
    assert_eq!(scheduler.hook_table().core_hook_count(), 1);
    assert_eq!(scheduler.hook_table().thread_hook_count(), 1);
    let report = scheduler.run().expect("run with dynamic hooks");
    assert_eq!(report.completed_steps(), 3);
}

#[test]
fn load_file_yields_an_initialized_plugin() {
    let artifact = fixture_library();

    let config = run_config();
    let ctx = config.context();
    let mut loader = PluginLoader::new();
    let plugin = loader.load_file(artifact, &ctx).expect("load fixture");

    assert_eq!(plugin.name(), "pulse");
    assert_eq!(plugin.filename(), Some(artifact));
}

#[test]
fn discovery_misses_mean_empty_registry_not_errors() {
    // A directory with no modules at all is a valid (empty) load;
    // only a missing directory is a configuration error.
    let temp = tempfile::tempdir().expect("create temp dir");
    let config = run_config();
    let ctx = config.context();
    let mut loader = PluginLoader::new();

    let registry = loader
        .load_dirs(&[temp.path().to_path_buf()], default_extension(), &ctx)
        .expect("empty load");
    assert!(registry.is_empty());

    match loader.load_dirs(
        &[temp.path().join("nope")],
        default_extension(),
        &ctx,
    ) {
        Err(LoadError::DirectoryMissing { .. }) => {}
        other => panic!("expected DirectoryMissing, got {other:?}"),
    }
}
