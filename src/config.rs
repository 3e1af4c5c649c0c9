use crate::error::{Result, ScoreError};
use crate::types::config::ScoringConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "popmydata.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".popmydata/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/popmydata/config.toml";

pub fn load_config(root: &Path) -> Result<ScoringConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Merges global, project and local files over the built-in defaults.
pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<ScoringConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: ScoringConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| ScoreError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config file");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_uses_defaults_when_no_file_exists() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.index.favorable_threshold, 70);
        assert_eq!(cfg.cities.len(), 3);
    }

    #[test]
    fn load_config_merges_global_project_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[index]
favorable_threshold = 65

[radius]
transit_m = 500
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[radius]
commerce_m = 250

[index.badges]
district = 8.0
"#,
        )
        .expect("project config should write");

        fs::create_dir_all(root.path().join(".popmydata")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[index]
favorable_threshold = 75
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.index.favorable_threshold, 75);
        assert_eq!(cfg.radius.transit_m, 500.0);
        assert_eq!(cfg.radius.commerce_m, 250.0);
        assert_eq!(cfg.radius.parking_m, 400.0);
        assert_eq!(cfg.index.badges.district, 8.0);
    }

    #[test]
    fn project_city_list_replaces_global_one() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[[cities]]
name = "Paris"
department = 75

[[cities]]
name = "Lille"
department = 59
"#,
        )
        .expect("global config should write");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[[cities]]
name = "Bordeaux"
department = 33

[cities.radius]
commerce_m = 300
"#,
        )
        .expect("project config should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");

        let names: Vec<&str> = cfg.cities.iter().map(|city| city.name.as_str()).collect();
        assert_eq!(names, vec!["Bordeaux"]);
        let bordeaux = cfg.profile_for_department(33);
        assert_eq!(cfg.radius(&bordeaux).commerce_m, 300.0);
        assert!(cfg.profile_by_name("Paris").is_none());
    }

    #[test]
    fn load_config_rejects_invalid_merged_values() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[radius]
amenity_m = -1
"#,
        )
        .expect("project config should write");

        let err = load_config_with_global(root.path(), None).expect_err("radius is invalid");
        assert!(matches!(err, ScoreError::ConfigParse(_)));
    }

    #[test]
    fn load_config_reports_path_on_syntax_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[index\n").expect("config should write");

        let err = load_config_with_global(root.path(), None).expect_err("syntax error");
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }
}
