//! The merged settings record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::merge::deep_merge_all;

/// The top-level key of the engine config.
pub const KEY_SERVER: &str = "server";
/// The top-level key of the JVM/process tuning config.
pub const KEY_SERVICE: &str = "service";
/// The seed provider class used when the merged config does not declare one.
pub const DEFAULT_SEED_PROVIDER: &str = "org.apache.cassandra.locator.SimpleSeedProvider";

/// The merged configuration of one member.
///
/// `server` is serialized verbatim as `cassandra.yaml`, `service` drives the JVM environment
/// of the service.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: Mapping,
    #[serde(default)]
    pub service: Mapping,
}

impl Settings {
    /// Render the engine config as YAML.
    pub fn server_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.server).context("error serializing server settings to YAML")
    }

    /// Look up a top-level engine config value.
    pub fn server_value(&self, key: &str) -> Option<&Value> {
        self.server.get(&Value::String(key.into()))
    }

    /// Look up a top-level service config value.
    pub fn service_value(&self, key: &str) -> Option<&Value> {
        self.service.get(&Value::String(key.into()))
    }

    /// The seeds of the first seed provider, if any.
    pub fn seeds(&self) -> Option<&str> {
        self.server_value("seed_provider")?
            .as_sequence()?
            .first()?
            .get("parameters")?
            .as_sequence()?
            .first()?
            .get("seeds")?
            .as_str()
    }
}

/// Build a YAML mapping from the given string-keyed entries.
pub(crate) fn yaml_mapping<'a, I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    Value::Mapping(entries.into_iter().map(|(key, val)| (yaml_string(key), val)).collect::<Mapping>())
}

/// Build a YAML string value.
pub(crate) fn yaml_string(val: &str) -> Value {
    Value::String(val.into())
}

/// Merge the given documents into a settings record.
///
/// Each document is a mapping with optional `server` & `service` keys. Precedence, lowest first:
/// `computed`, `version_defaults`, `user_overrides`. The seed list is cluster derived and is
/// always injected into the first seed provider after merging.
pub fn merge_settings(user_overrides: &Value, version_defaults: &Value, computed: &Value, seeds: &str) -> Result<Settings> {
    let merged = deep_merge_all(vec![computed.clone(), version_defaults.clone(), user_overrides.clone()]);
    let mut settings: Settings = serde_yaml::from_value(merged).context("error building settings from merged config")?;
    inject_seeds(&mut settings.server, seeds);
    Ok(settings)
}

/// Set the seeds parameter of the first seed provider, creating the provider as needed.
fn inject_seeds(server: &mut Mapping, seeds: &str) {
    let key_provider = Value::String("seed_provider".into());
    let key_class = Value::String("class_name".into());
    let key_params = Value::String("parameters".into());
    let key_seeds = Value::String("seeds".into());

    let providers_ok = server
        .get(&key_provider)
        .and_then(|val| val.as_sequence())
        .and_then(|seq| seq.first())
        .map(|first| first.is_mapping())
        .unwrap_or(false);
    if !providers_ok {
        let mut provider = Mapping::new();
        provider.insert(key_class, Value::String(DEFAULT_SEED_PROVIDER.into()));
        server.insert(key_provider.clone(), Value::Sequence(vec![Value::Mapping(provider)]));
    }
    let provider = match server
        .get_mut(&key_provider)
        .and_then(|val| val.as_sequence_mut())
        .and_then(|seq| seq.first_mut())
        .and_then(|val| val.as_mapping_mut())
    {
        Some(provider) => provider,
        None => return,
    };

    let params_ok = provider
        .get(&key_params)
        .and_then(|val| val.as_sequence())
        .and_then(|seq| seq.first())
        .map(|first| first.is_mapping())
        .unwrap_or(false);
    if !params_ok {
        provider.insert(key_params.clone(), Value::Sequence(vec![Value::Mapping(Mapping::new())]));
    }
    if let Some(params) = provider
        .get_mut(&key_params)
        .and_then(|val| val.as_sequence_mut())
        .and_then(|seq| seq.first_mut())
        .and_then(|val| val.as_mapping_mut())
    {
        params.insert(key_seeds, Value::String(seeds.into()));
    }
}
