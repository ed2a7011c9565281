//! Integration tests for registries configuration lookups

use std::fs;

use camino::Utf8PathBuf;
use registries::{
    ConfigPathResolver, REGISTRIES_CONFIG_PATH_ENV, Registries, RegistriesError,
    StaticEnvironment, SystemRegistries, USER_REGISTRIES_FILE,
};

const USER_CONF: &str = r#"
[registries.search]
registries = ["registry.user.example", "docker.io"]

[registries.insecure]
registries = ["localhost:5000"]
"#;

const SYSTEM_CONF: &str = r#"
[registries.search]
registries = ["registry.system.example"]
"#;

/// A fake home directory holding a per-user configuration, plus a system
/// configuration file outside it.
struct Fixture {
    _dir: tempfile::TempDir,
    home: Utf8PathBuf,
    system: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();

        let home = root.join("home");
        let user = home.join(USER_REGISTRIES_FILE);
        fs::create_dir_all(user.parent().unwrap()).unwrap();
        fs::write(&user, USER_CONF).unwrap();

        let system = root.join("registries.conf");
        fs::write(&system, SYSTEM_CONF).unwrap();

        Self {
            _dir: dir,
            home,
            system,
        }
    }

    fn registries(
        &self,
        env: StaticEnvironment,
        rootless: bool,
    ) -> Registries<StaticEnvironment, bool, SystemRegistries> {
        Registries::new(
            ConfigPathResolver::new(env.with("HOME", self.home.as_str()), rootless),
            SystemRegistries::with_default_path(&self.system),
        )
    }
}

#[test]
fn rootless_reads_user_configuration() {
    let fixture = Fixture::new();
    let registries = fixture.registries(StaticEnvironment::new(), true);

    assert_eq!(
        registries.search_registries().unwrap(),
        vec!["registry.user.example", "docker.io"]
    );
    assert_eq!(
        registries.insecure_registries().unwrap(),
        vec!["localhost:5000"]
    );
}

#[test]
fn privileged_reads_system_configuration() {
    let fixture = Fixture::new();
    let registries = fixture.registries(StaticEnvironment::new(), false);

    assert_eq!(registries.conf_path(), "");
    assert_eq!(
        registries.search_registries().unwrap(),
        vec!["registry.system.example"]
    );
    assert!(registries.insecure_registries().unwrap().is_empty());
}

#[test]
fn environment_override_wins() {
    let fixture = Fixture::new();
    let env = StaticEnvironment::new().with(REGISTRIES_CONFIG_PATH_ENV, fixture.system.as_str());
    let registries = fixture.registries(env, true);

    assert_eq!(registries.conf_path(), fixture.system.as_str());
    assert_eq!(
        registries.search_registries().unwrap(),
        vec!["registry.system.example"]
    );
}

#[test]
fn missing_override_file_is_a_parse_error() {
    let fixture = Fixture::new();
    let missing = fixture.home.join("nowhere.conf");
    let env = StaticEnvironment::new().with(REGISTRIES_CONFIG_PATH_ENV, missing.as_str());
    let registries = fixture.registries(env, false);

    let err = registries.search_registries().unwrap_err();
    assert!(matches!(err, RegistriesError::ConfigParse(_)));

    let err = registries.insecure_registries().unwrap_err();
    assert!(matches!(err, RegistriesError::ConfigParse(_)));
}

#[test]
fn removing_user_file_falls_back_to_system() {
    let fixture = Fixture::new();
    let registries = fixture.registries(StaticEnvironment::new(), true);

    assert_eq!(
        registries.conf_path(),
        fixture.home.join(USER_REGISTRIES_FILE).as_str()
    );

    fs::remove_file(fixture.home.join(USER_REGISTRIES_FILE)).unwrap();
    assert_eq!(registries.conf_path(), "");
    assert_eq!(
        registries.search_registries().unwrap(),
        vec!["registry.system.example"]
    );
}

#[test]
fn registry_domains() {
    assert_eq!(registries::get_registry("myregistry/").unwrap(), "myregistry");
    assert_eq!(
        registries::get_registry("example.com/foo/bar:latest").unwrap(),
        "example.com"
    );
    assert!(matches!(
        registries::get_registry("!!!not a ref!!!"),
        Err(RegistriesError::InvalidReference(_))
    ));
}
