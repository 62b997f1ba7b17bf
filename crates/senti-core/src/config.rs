use crate::app_config::{AppConfig, Environment, IndexingPolicy, SearchRoute, StoreBackend};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        match or_default(var, default).parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(n) => Ok(n),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let env = parse_environment(&or_default("SENTI_ENV", "development"));
    let log_level = or_default("SENTI_LOG_LEVEL", "info");

    let api_bind_addr = parse_addr("SENTI_API_BIND_ADDR", "0.0.0.0:8080")?;
    let ui_bind_addr = parse_addr("SENTI_UI_BIND_ADDR", "0.0.0.0:7860")?;
    let api_url = or_default("SENTI_API_URL", "http://localhost:8080/predict");
    let ui_api_timeout_secs = parse_u64("SENTI_UI_API_TIMEOUT_SECS", "10")?;
    let ui_search_route = match or_default("SENTI_UI_SEARCH_ROUTE", "direct").as_str() {
        "direct" => SearchRoute::Direct,
        "api" => SearchRoute::Api,
        other => {
            return Err(invalid(
                "SENTI_UI_SEARCH_ROUTE",
                format!("expected `direct` or `api`, got `{other}`"),
            ))
        }
    };

    let store_backend = match or_default("SENTI_STORE_BACKEND", "qdrant").as_str() {
        "qdrant" => StoreBackend::Qdrant,
        "memory" => StoreBackend::Memory,
        other => {
            return Err(invalid(
                "SENTI_STORE_BACKEND",
                format!("expected `qdrant` or `memory`, got `{other}`"),
            ))
        }
    };
    let store_host = or_default("SENTI_STORE_HOST", "localhost");
    let store_port = parse_u16("SENTI_STORE_PORT", "6333")?;
    let store_collection = or_default("SENTI_STORE_COLLECTION", "sentiment_analysis");
    let embedding_dim = parse_positive("SENTI_EMBEDDING_DIM", "384")?;

    let classifier_url = or_default("SENTI_CLASSIFIER_URL", "http://localhost:8081");
    let embedder_url = or_default("SENTI_EMBEDDER_URL", "http://localhost:8082");
    let classifier_model = or_default(
        "SENTI_CLASSIFIER_MODEL",
        "distilbert-base-uncased-finetuned-sst-2-english",
    );
    let max_input_tokens = parse_positive("SENTI_MAX_INPUT_TOKENS", "256")?;

    let indexing_policy = match or_default("SENTI_INDEXING_POLICY", "required").as_str() {
        "required" => IndexingPolicy::Required,
        "best_effort" => IndexingPolicy::BestEffort,
        other => {
            return Err(invalid(
                "SENTI_INDEXING_POLICY",
                format!("expected `required` or `best_effort`, got `{other}`"),
            ))
        }
    };

    // Either flag switched off re-enables hub downloads; otherwise stay offline.
    let hf_offline = parse_flag(&or_default("HF_HUB_OFFLINE", "1"))
        && parse_flag(&or_default("TRANSFORMERS_OFFLINE", "1"));

    let model_cache_dir = lookup("SENTI_MODEL_CACHE_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            lookup("HF_HOME")
                .ok()
                .map(|home| PathBuf::from(home).join("hub"))
        });

    Ok(AppConfig {
        env,
        log_level,
        api_bind_addr,
        ui_bind_addr,
        api_url,
        ui_api_timeout_secs,
        ui_search_route,
        store_backend,
        store_host,
        store_port,
        store_collection,
        embedding_dim,
        classifier_url,
        embedder_url,
        classifier_model,
        max_input_tokens,
        indexing_policy,
        hf_offline,
        model_cache_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_flag(s: &str) -> bool {
    !matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off" | ""
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::path::PathBuf;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.ui_bind_addr.to_string(), "0.0.0.0:7860");
        assert_eq!(cfg.api_url, "http://localhost:8080/predict");
        assert_eq!(cfg.ui_api_timeout_secs, 10);
        assert_eq!(cfg.ui_search_route, SearchRoute::Direct);
        assert_eq!(cfg.store_backend, StoreBackend::Qdrant);
        assert_eq!(cfg.store_url(), "http://localhost:6333");
        assert_eq!(cfg.store_collection, "sentiment_analysis");
        assert_eq!(cfg.embedding_dim, 384);
        assert_eq!(
            cfg.classifier_model,
            "distilbert-base-uncased-finetuned-sst-2-english"
        );
        assert_eq!(cfg.max_input_tokens, 256);
        assert_eq!(cfg.indexing_policy, IndexingPolicy::Required);
        assert!(cfg.hf_offline);
        assert!(cfg.model_cache_dir.is_none());
    }

    #[test]
    fn store_host_and_port_compose_store_url() {
        let mut map = HashMap::new();
        map.insert("SENTI_STORE_HOST", "qdrant");
        map.insert("SENTI_STORE_PORT", "7000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.store_url(), "http://qdrant:7000");
    }

    #[test]
    fn invalid_store_port_is_reported() {
        let mut map = HashMap::new();
        map.insert("SENTI_STORE_PORT", "not-a-port");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTI_STORE_PORT"),
            "expected InvalidEnvVar(SENTI_STORE_PORT), got: {result:?}"
        );
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let mut map = HashMap::new();
        map.insert("SENTI_API_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTI_API_BIND_ADDR"),
            "expected InvalidEnvVar(SENTI_API_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn zero_embedding_dim_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SENTI_EMBEDDING_DIM", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTI_EMBEDDING_DIM"),
            "expected InvalidEnvVar(SENTI_EMBEDDING_DIM), got: {result:?}"
        );
    }

    #[test]
    fn indexing_policy_best_effort_is_parsed() {
        let mut map = HashMap::new();
        map.insert("SENTI_INDEXING_POLICY", "best_effort");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.indexing_policy, IndexingPolicy::BestEffort);
    }

    #[test]
    fn unknown_indexing_policy_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SENTI_INDEXING_POLICY", "sometimes");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTI_INDEXING_POLICY"),
            "expected InvalidEnvVar(SENTI_INDEXING_POLICY), got: {result:?}"
        );
    }

    #[test]
    fn memory_backend_and_api_search_route_are_parsed() {
        let mut map = HashMap::new();
        map.insert("SENTI_STORE_BACKEND", "memory");
        map.insert("SENTI_UI_SEARCH_ROUTE", "api");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.ui_search_route, SearchRoute::Api);
    }

    #[test]
    fn unknown_store_backend_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SENTI_STORE_BACKEND", "chroma");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTI_STORE_BACKEND"),
            "expected InvalidEnvVar(SENTI_STORE_BACKEND), got: {result:?}"
        );
    }

    #[test]
    fn either_offline_flag_off_enables_downloads() {
        let mut map = HashMap::new();
        map.insert("HF_HUB_OFFLINE", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.hf_offline);

        let mut map = HashMap::new();
        map.insert("TRANSFORMERS_OFFLINE", "false");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.hf_offline);
    }

    #[test]
    fn hf_home_resolves_hub_cache_dir() {
        let mut map = HashMap::new();
        map.insert("HF_HOME", "/hf");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.model_cache_dir, Some(PathBuf::from("/hf/hub")));
    }

    #[test]
    fn explicit_cache_dir_overrides_hf_home() {
        let mut map = HashMap::new();
        map.insert("HF_HOME", "/hf");
        map.insert("SENTI_MODEL_CACHE_DIR", "/models");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.model_cache_dir, Some(PathBuf::from("/models")));
    }

    #[test]
    fn api_base_url_strips_predict_segment() {
        let mut map = HashMap::new();
        map.insert("SENTI_API_URL", "http://sentiment-api:7860/predict");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_base_url(), "http://sentiment-api:7860");
    }
}
