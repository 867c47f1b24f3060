// Remote state caches
//
// Each cache is a point-in-time snapshot fetched once at phase start. A
// fetch failure degrades to an empty snapshot with a warning: the phase
// then behaves as if nothing exists remotely, which biases toward
// re-creation. Accepted, and safe, because creates are idempotent under a
// later forced run.

use std::collections::{BTreeSet, HashMap, HashSet};

use modelgate_admin::AdminApi;

/// Remote model registrations indexed by (model_name, credential_name).
/// A key can map to several ids when prior non-forced partial runs left
/// duplicates behind; callers treat the list length as the duplicate count.
#[derive(Debug, Default)]
pub struct RemoteModels {
    index: HashMap<(String, String), Vec<String>>,
}

impl RemoteModels {
    pub async fn fetch(api: &dyn AdminApi) -> Self {
        let models = match api.list_models().await {
            Ok(models) => models,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch remote models; assuming none exist");
                Vec::new()
            }
        };

        let mut index: HashMap<(String, String), Vec<String>> = HashMap::new();
        for model in models {
            let Some(name) = model.model_name.clone() else {
                continue;
            };
            let Some(id) = model.id().map(str::to_string) else {
                continue;
            };
            let credential = model.credential_name().unwrap_or_default().to_string();
            index.entry((name, credential)).or_default().push(id);
        }

        let total: usize = index.values().map(Vec::len).sum();
        let duplicate_groups = index.values().filter(|ids| ids.len() > 1).count();
        if duplicate_groups > 0 {
            tracing::warn!(
                duplicate_groups,
                "remote has duplicate model registrations (cleaned up on force)"
            );
        }
        tracing::info!(total, unique = index.len(), "fetched remote models");

        Self { index }
    }

    pub fn ids(&self, key: &(String, String)) -> &[String] {
        self.index.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &Vec<String>)> {
        self.index.iter()
    }

    /// Distinct model names, for alias/fallback target validation.
    pub fn names(&self) -> BTreeSet<String> {
        self.index.keys().map(|(name, _)| name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Remote credential names; name-only is enough for existence checks.
#[derive(Debug, Default)]
pub struct RemoteCredentials {
    names: HashSet<String>,
}

impl RemoteCredentials {
    pub async fn fetch(api: &dyn AdminApi) -> Self {
        let names = match api.list_credentials().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch remote credentials; assuming none exist");
                Vec::new()
            }
        };
        tracing::info!(total = names.len(), "fetched remote credentials");
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }
}
