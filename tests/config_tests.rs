use assert_fs::prelude::*;
use server_runner::config::{Config, ServerConfig, ServerRegistry, validate_config};
use server_runner::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[test]
fn test_parse_config() -> Result<()> {
    let config_str = r#"{
        "servers": {
            "survival": {
                "command": "java",
                "args": ["-Xmx4G", "-jar", "server.jar", "nogui"],
                "workingDir": "/srv/survival",
                "stopTimeoutSecs": 30
            },
            "creative": {
                "command": "./start.sh",
                "env": {
                    "MEMORY": "2G"
                }
            }
        }
    }"#;

    let config = Config::parse_from_str(config_str)?;

    assert_eq!(config.server_names(), vec!["survival", "creative"]);

    let survival = config.resolve_config("survival")?;
    assert_eq!(survival.command, "java");
    assert_eq!(survival.args, vec!["-Xmx4G", "-jar", "server.jar", "nogui"]);
    assert_eq!(survival.working_dir.as_deref(), Some(Path::new("/srv/survival")));
    assert_eq!(survival.stop_timeout(), Duration::from_secs(30));
    assert!(survival.env.is_empty());

    let creative = config.resolve_config("creative")?;
    assert!(creative.args.is_empty());
    assert_eq!(creative.env.get("MEMORY"), Some(&"2G".to_string()));
    assert_eq!(creative.working_dir, None);
    assert_eq!(creative.stop_timeout(), Duration::from_secs(10));

    Ok(())
}

#[test]
fn test_from_file_json_and_yaml() -> Result<()> {
    let temp = assert_fs::TempDir::new().unwrap();

    let json = temp.child("servers.json");
    json.write_str(r#"{ "servers": { "lobby": { "command": "./lobby.sh" } } }"#)
        .unwrap();
    let config = Config::from_file(json.path())?;
    assert_eq!(config.server_names(), vec!["lobby"]);

    let yaml = temp.child("servers.yml");
    yaml.write_str("servers:\n  lobby:\n    command: ./lobby.sh\n  hub:\n    command: ./hub.sh\n")
        .unwrap();
    let config = Config::from_file(yaml.path())?;
    assert_eq!(config.server_names(), vec!["lobby", "hub"]);

    Ok(())
}

#[test]
fn test_from_file_errors() {
    let temp = assert_fs::TempDir::new().unwrap();

    let missing = Config::from_file(temp.child("absent.json").path()).unwrap_err();
    assert!(matches!(missing, Error::ConfigParse(_)));

    let broken = temp.child("broken.json");
    broken.write_str("{ \"servers\": ").unwrap();
    let err = Config::from_file(broken.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
}

#[test]
fn test_validate_config() -> Result<()> {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut config = Config::default();
    config.servers.insert(
        "survival".to_string(),
        ServerConfig {
            command: "java".to_string(),
            args: vec!["-jar".to_string(), "server.jar".to_string()],
            env: HashMap::new(),
            working_dir: Some(temp.path().to_path_buf()),
            stop_timeout_secs: Some(30),
        },
    );
    validate_config(&config)?;

    // Empty registries are invalid
    assert!(validate_config(&Config::default()).is_err());

    // Empty commands are invalid
    let mut invalid = config.clone();
    invalid.servers.insert(
        "blank".to_string(),
        ServerConfig {
            command: " ".to_string(),
            ..Default::default()
        },
    );
    assert!(matches!(validate_config(&invalid), Err(Error::ConfigInvalid(_))));

    // Zero stop timeouts are invalid
    let mut invalid = config.clone();
    invalid.servers["survival"].stop_timeout_secs = Some(0);
    assert!(validate_config(&invalid).is_err());

    // Working directories must exist
    let mut invalid = config;
    invalid.servers["survival"].working_dir = Some(temp.child("missing").path().to_path_buf());
    assert!(validate_config(&invalid).is_err());

    Ok(())
}
