//! Config-file loading and system wiring end to end.

use std::io::Write;
use switchboard::{RouterConfig, RoutingSystem};

#[test]
fn toml_config_wires_a_full_system() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
request_timeout_secs = 15

[anthropic]
api_key = "sk-test"
model = "claude-sonnet-4"

[gemini]
endpoint = "https://gemini.internal.example/v1beta/models"
"#
    )
    .unwrap();

    let config = RouterConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-test"));
    assert_eq!(
        config.gemini.endpoint.as_deref(),
        Some("https://gemini.internal.example/v1beta/models")
    );

    // All four providers are registered even when only some carry keys;
    // missing credentials surface at dispatch time, not here.
    let system = RoutingSystem::new(&config).unwrap();
    assert_eq!(system.providers().len(), 4);
}

#[test]
fn unparseable_config_is_a_load_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not toml [[[").unwrap();
    assert!(RouterConfig::from_toml_file(file.path()).is_err());
}
