// Provider tree expansion
//
// Flattens resolved provider blocks into the credential and model lists the
// reconciler upserts. Providers without an api_key contribute nothing.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{CredentialSpec, ModelRegistration, Provider};

/// One credential per (provider, interface) pair with an api_key present;
/// independent of whether any models reference it.
pub fn resolve_credentials(providers: &BTreeMap<String, Provider>) -> Vec<CredentialSpec> {
    let mut credentials = Vec::new();

    for (service_name, provider) in providers {
        let Some(api_key) = present_api_key(provider) else {
            continue;
        };
        for interface in provider.interfaces.keys() {
            credentials.push(CredentialSpec {
                service_name: service_name.clone(),
                interface: interface.clone(),
                api_key: api_key.to_string(),
                api_base: provider.api_base.clone(),
            });
        }
    }

    credentials
}

/// One registration per (interface, model-id) pair under each provider with
/// an api_key. Override fragments carry through; the derived fields are:
/// model_name (override or raw id), model_info.base_model (defaults to the
/// resolved model_name), model_info.access_groups (model-level wins over
/// provider-level, empty suppresses), litellm_params.model
/// (`"{interface}/{model-id}"`), and litellm_params.litellm_credential_name.
pub fn resolve_models(providers: &BTreeMap<String, Provider>) -> Vec<ModelRegistration> {
    let mut models = Vec::new();

    for (service_name, provider) in providers {
        if present_api_key(provider).is_none() {
            continue;
        }

        for (interface, interface_config) in &provider.interfaces {
            let Some(interface_config) = interface_config else {
                continue;
            };
            let credential_name = format!("{service_name}-{interface}");

            for (model_id, override_config) in &interface_config.models {
                let override_config = override_config.clone().unwrap_or_default();

                let model_name = override_config
                    .model_name
                    .unwrap_or_else(|| model_id.clone());

                let mut model_info = override_config.model_info;
                let base_model = model_info
                    .get("base_model")
                    .and_then(Value::as_str)
                    .filter(|base| !base.is_empty())
                    .unwrap_or(&model_name)
                    .to_string();
                model_info.insert("base_model".to_string(), Value::String(base_model));

                let access_groups = override_config
                    .access_groups
                    .as_ref()
                    .or(provider.access_groups.as_ref());
                if let Some(groups) = access_groups.filter(|groups| !groups.is_empty()) {
                    model_info.insert("access_groups".to_string(), serde_json::json!(groups));
                }

                let mut litellm_params = override_config.litellm_params;
                litellm_params.insert(
                    "model".to_string(),
                    Value::String(format!("{interface}/{model_id}")),
                );
                litellm_params.insert(
                    "litellm_credential_name".to_string(),
                    Value::String(credential_name.clone()),
                );

                models.push(ModelRegistration {
                    model_name,
                    litellm_params,
                    model_info,
                });
            }
        }
    }

    models
}

fn present_api_key(provider: &Provider) -> Option<&str> {
    provider.api_key.as_deref().filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn providers_from(value: Value) -> BTreeMap<String, Provider> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_model_resolves_with_derived_fields() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "api_base": "http://acme",
                "interfaces": {"gemini": {"models": {"foo": null}}}
            }
        }));

        let models = resolve_models(&providers);
        assert_eq!(models.len(), 1);

        let model = &models[0];
        assert_eq!(model.model_name, "foo");
        assert_eq!(model.litellm_params["model"], "gemini/foo");
        assert_eq!(model.litellm_params["litellm_credential_name"], "acme-gemini");
        assert_eq!(model.model_info["base_model"], "foo");
        assert!(model.model_info.get("access_groups").is_none());
        assert_eq!(model.credential_name(), "acme-gemini");
    }

    #[test]
    fn provider_without_api_key_contributes_nothing() {
        let providers = providers_from(json!({
            "keyless": {
                "api_base": "http://keyless",
                "interfaces": {"openai": {"models": {"foo": null, "bar": null}}}
            },
            "empty-key": {
                "api_key": "",
                "interfaces": {"openai": {"models": {"baz": null}}}
            }
        }));

        assert!(resolve_credentials(&providers).is_empty());
        assert!(resolve_models(&providers).is_empty());
    }

    #[test]
    fn model_name_override_also_defaults_base_model() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "interfaces": {"openai": {"models": {
                    "raw-id": {"model_name": "public-name"}
                }}}
            }
        }));

        let models = resolve_models(&providers);
        let model = &models[0];
        assert_eq!(model.model_name, "public-name");
        assert_eq!(model.model_info["base_model"], "public-name");
        // litellm route still uses the raw id
        assert_eq!(model.litellm_params["model"], "openai/raw-id");
    }

    #[test]
    fn explicit_base_model_is_kept() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "interfaces": {"openai": {"models": {
                    "foo": {"model_info": {"base_model": "upstream-foo"}}
                }}}
            }
        }));

        let models = resolve_models(&providers);
        assert_eq!(models[0].model_info["base_model"], "upstream-foo");
    }

    #[test]
    fn access_groups_model_level_wins_and_empty_suppresses() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "access_groups": ["default"],
                "interfaces": {"openai": {"models": {
                    "inherits": null,
                    "overrides": {"access_groups": ["special"]},
                    "suppressed": {"access_groups": []}
                }}}
            }
        }));

        let models = resolve_models(&providers);
        let by_name = |name: &str| {
            models
                .iter()
                .find(|model| model.model_name == name)
                .unwrap()
        };

        assert_eq!(by_name("inherits").model_info["access_groups"], json!(["default"]));
        assert_eq!(by_name("overrides").model_info["access_groups"], json!(["special"]));
        assert!(by_name("suppressed").model_info.get("access_groups").is_none());
    }

    #[test]
    fn litellm_params_fragment_carries_through() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "interfaces": {"anthropic": {"models": {
                    "foo": {"litellm_params": {"max_tokens": 4096}}
                }}}
            }
        }));

        let models = resolve_models(&providers);
        assert_eq!(models[0].litellm_params["max_tokens"], 4096);
        assert_eq!(models[0].litellm_params["model"], "anthropic/foo");
    }

    #[test]
    fn credentials_cover_interfaces_without_models() {
        let providers = providers_from(json!({
            "acme": {
                "api_key": "sk-1",
                "api_base": "http://acme",
                "interfaces": {"openai": null, "gemini": {"models": {"foo": null}}}
            }
        }));

        let credentials = resolve_credentials(&providers);
        assert_eq!(credentials.len(), 2);

        let names: Vec<String> = credentials
            .iter()
            .map(CredentialSpec::credential_name)
            .collect();
        assert!(names.contains(&"acme-openai".to_string()));
        assert!(names.contains(&"acme-gemini".to_string()));

        // the null interface still yields no models
        assert_eq!(resolve_models(&providers).len(), 1);
    }
}
