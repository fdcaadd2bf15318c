use orthoctl::config::Settings;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Settings::load reads process-global ORTHOCTL_* variables, so every test in
// this file serializes on one lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn temp_settings_file(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("orthoctl-{}-{}.toml", name, std::process::id()));
    fs::write(&path, contents).expect("Settings file should be writable");
    path
}

#[test]
fn test_load_without_sources_matches_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    env::remove_var("ORTHOCTL_APPS");
    env::remove_var("ORTHOCTL_LATCH_TOLERANCE");

    let settings = Settings::load(None).expect("Defaults alone should load");
    assert_eq!(
        settings,
        Settings::default(),
        "Builder defaults and Default must describe the same settings"
    );
}

#[test]
fn test_file_layer_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    env::remove_var("ORTHOCTL_APPS");
    env::remove_var("ORTHOCTL_LATCH_TOLERANCE");

    let path = temp_settings_file(
        "file-layer",
        "latch_tolerance = 5\nsync_interval_ms = 100\napps = [\"Music\"]\n",
    );
    let loaded = Settings::load(Some(&path));
    let _ = fs::remove_file(&path);

    let settings = loaded.expect("File layer should load");
    assert_eq!(settings.latch_tolerance, 5);
    assert_eq!(settings.sync_interval_ms, 100);
    assert_eq!(settings.apps, vec!["Music"]);
    assert_eq!(
        settings.rate_limit_backoff_ms, 10_000,
        "Keys the file does not mention keep their defaults"
    );
}

#[test]
fn test_env_layer_wins_over_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    env::remove_var("ORTHOCTL_APPS");

    let path = temp_settings_file("precedence", "latch_tolerance = 5\n");
    env::set_var("ORTHOCTL_LATCH_TOLERANCE", "7");
    let loaded = Settings::load(Some(&path));
    env::remove_var("ORTHOCTL_LATCH_TOLERANCE");
    let _ = fs::remove_file(&path);

    let settings = loaded.expect("Env layer should load");
    assert_eq!(
        settings.latch_tolerance, 7,
        "Environment overrides must beat the settings file"
    );
}

#[test]
fn test_env_app_list_splits_on_commas() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    env::set_var("ORTHOCTL_APPS", "VLC,Spotify");
    let loaded = Settings::load(None);
    env::remove_var("ORTHOCTL_APPS");

    let settings = loaded.expect("A comma-separated app list should deserialize");
    assert_eq!(settings.apps, vec!["VLC", "Spotify"]);
}

#[test]
fn test_env_app_list_with_single_entry() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    env::set_var("ORTHOCTL_APPS", "Music");
    let loaded = Settings::load(None);
    env::remove_var("ORTHOCTL_APPS");

    let settings = loaded.expect("A single-app list should deserialize");
    assert_eq!(settings.apps, vec!["Music"]);
}
