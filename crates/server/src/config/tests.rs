use std::collections::HashMap;

use nodal_media::StorageStrategy;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_file_gives_defaults() {
    let config = NodalConfig::from_toml("").unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.server.shutdown_timeout_seconds, 10);
    assert_eq!(config.server.public_dir, "public");
    assert!(!config.server.production);
    assert_eq!(config.database.backend, "memory");
    assert!(config.database.url.is_none());
    assert_eq!(config.database.table_prefix, "nodal_");
    assert!(config.cors.frontend_url.is_none());
    assert_eq!(
        config.cors.allowed_origins,
        ["http://localhost:5173", "http://localhost:3000"]
    );
    assert!(config.admin.passcode().is_none());
    assert!(config.uploads.strategy.is_none());
    assert_eq!(config.uploads.resolved_strategy(), StorageStrategy::Disk);
    assert!(!config.telemetry.enabled);
    assert_eq!(config.telemetry.service_name, "nodal");
}

#[test]
fn full_file_is_parsed() {
    let toml = r#"
        [server]
        host = "127.0.0.1"
        port = 8080
        shutdown_timeout_seconds = 3
        public_dir = "/srv/nodal/public"
        production = true

        [database]
        backend = "postgres"
        url = "postgres://localhost/nodal"
        pool_size = 12
        schema = "blog"

        [cors]
        frontend_url = "https://nodal.example.com"
        allowed_origins = []

        [admin]
        passcode = "letmein"

        [uploads]
        strategy = "inline"
        temp_dir = "/var/tmp/nodal"

        [uploads.cloudinary]
        cloud_name = "demo"
        folder = "blog"
    "#;

    let config = NodalConfig::from_toml(toml).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.shutdown_timeout_seconds, 3);
    assert!(config.server.production);
    assert_eq!(config.database.backend, "postgres");
    assert_eq!(config.database.pool_size, 12);
    assert_eq!(config.database.schema, "blog");
    assert_eq!(config.database.table_prefix, "nodal_");
    assert_eq!(config.cors.origins(), ["https://nodal.example.com"]);
    assert_eq!(config.admin.passcode(), Some("letmein"));
    assert_eq!(config.uploads.resolved_strategy(), StorageStrategy::Inline);
    assert_eq!(
        config.uploads.temp_dir(),
        std::path::PathBuf::from("/var/tmp/nodal")
    );
    assert!(!config.uploads.cloudinary.is_complete());
}

#[test]
fn unknown_strategy_is_a_parse_error() {
    let err = NodalConfig::from_toml("[uploads]\nstrategy = \"s3\"").unwrap_err();
    assert!(matches!(err, crate::error::ServerError::Config(_)));
}

#[test]
fn empty_passcode_disables_the_check() {
    let config = NodalConfig::from_toml("[admin]\npasscode = \"\"").unwrap();
    assert!(config.admin.passcode().is_none());
}

#[test]
fn passcode_is_redacted_in_debug_output() {
    let config = NodalConfig::from_toml("[admin]\npasscode = \"hunter2\"").unwrap();
    assert!(!format!("{config:?}").contains("hunter2"));
}

#[test]
fn env_overrides_file_values() {
    let mut config = NodalConfig::from_toml("[server]\nport = 9000").unwrap();
    config
        .apply_env(env(&[
            ("PORT", "4000"),
            ("HOST", "localhost"),
            ("DATABASE_URL", "postgres://db/nodal"),
            ("FRONTEND_URL", "https://nodal.example.com"),
            ("NODAL_ENV", "production"),
            ("ADMIN_PASSCODE", "s3cret"),
        ]))
        .unwrap();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.server.host, "localhost");
    assert!(config.server.production);
    assert_eq!(config.database.backend, "postgres");
    assert_eq!(config.database.url.as_deref(), Some("postgres://db/nodal"));
    assert_eq!(
        config.cors.frontend_url.as_deref(),
        Some("https://nodal.example.com")
    );
    assert_eq!(config.admin.passcode(), Some("s3cret"));
}

#[test]
fn empty_env_values_are_ignored() {
    let mut config = NodalConfig::from_toml("").unwrap();
    config
        .apply_env(env(&[("PORT", ""), ("DATABASE_URL", "  "), ("ADMIN_PASSCODE", "")]))
        .unwrap();

    assert_eq!(config.server.port, 3001);
    assert_eq!(config.database.backend, "memory");
    assert!(config.admin.passcode().is_none());
}

#[test]
fn invalid_port_is_rejected() {
    let mut config = NodalConfig::from_toml("").unwrap();
    let err = config.apply_env(env(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("invalid PORT"));
}

#[test]
fn cloudinary_credentials_from_env_select_cloudinary() {
    let mut config = NodalConfig::from_toml("").unwrap();
    config
        .apply_env(env(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "123"),
            ("CLOUDINARY_API_SECRET", "abc"),
            ("CLOUDINARY_FOLDER", "blog"),
        ]))
        .unwrap();

    assert!(config.uploads.cloudinary.is_complete());
    assert_eq!(config.uploads.cloudinary.folder.as_deref(), Some("blog"));
    assert_eq!(config.uploads.resolved_strategy(), StorageStrategy::Cloudinary);
}

#[test]
fn explicit_strategy_from_env_wins() {
    let mut config = NodalConfig::from_toml("").unwrap();
    config
        .apply_env(env(&[
            ("UPLOAD_STRATEGY", "inline"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "123"),
            ("CLOUDINARY_API_SECRET", "abc"),
        ]))
        .unwrap();
    assert_eq!(config.uploads.resolved_strategy(), StorageStrategy::Inline);

    let err = config
        .apply_env(env(&[("UPLOAD_STRATEGY", "ftp")]))
        .unwrap_err();
    assert!(err.to_string().contains("unknown upload strategy"));
}

#[test]
fn non_production_env_value_clears_flag() {
    let mut config = NodalConfig::from_toml("[server]\nproduction = true").unwrap();
    config.apply_env(env(&[("NODAL_ENV", "development")])).unwrap();
    assert!(!config.server.production);
}

#[test]
fn example_file_parses() {
    let config = NodalConfig::from_toml(include_str!("../../../../nodal.example.toml")).unwrap();
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.uploads.cloudinary.timeout_seconds, 60);
    assert!(config.admin.passcode().is_none());
}

#[test]
fn telemetry_section_is_parsed() {
    let toml = r#"
        [telemetry]
        enabled = true
        endpoint = "http://collector:4318"
        protocol = "http"
        sample_ratio = 0.5
        timeout_seconds = 3
    "#;
    let config = NodalConfig::from_toml(toml).unwrap();
    assert!(config.telemetry.enabled);
    assert_eq!(config.telemetry.protocol, OtlpProtocol::Http);
    assert_eq!(config.telemetry.service_name, "nodal");
    assert_eq!(config.telemetry.timeout(), std::time::Duration::from_secs(3));
}

#[test]
fn unknown_telemetry_protocol_is_rejected() {
    let err = NodalConfig::from_toml("[telemetry]\nprotocol = \"udp\"").unwrap_err();
    assert!(matches!(err, crate::error::ServerError::Config(_)));
}
