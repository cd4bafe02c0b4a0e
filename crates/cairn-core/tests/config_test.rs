use std::collections::HashMap;

use cairn_core::config::*;
use cairn_core::models::RoutingPath;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = CairnConfig::from_toml("").unwrap();

    // Search defaults
    assert_eq!(config.search.default_max_results, 20);
    assert_eq!(config.search.outer_deadline_ms, 8_000);
    assert_eq!(config.search.classifier_timeout_ms, 2_000);
    assert_eq!(config.search.rerank_timeout_ms, 1_000);

    // Retrieval defaults
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.retrieval.rerank_max_candidates, 50);

    // Graph defaults
    assert_eq!(config.graph.max_traversal_depth, 10);
    assert_eq!(config.graph.visit_budget, 10_000);

    // Learning defaults
    assert_eq!(config.learning.batch_trigger_count, 100);
    assert_eq!(config.learning.update_interval_secs, 86_400);
    assert_eq!(config.learning.queue_full_policy, QueueFullPolicy::DropOldest);

    // Cache defaults
    assert_eq!(config.cache.response_ttl_secs, 60);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn per_path_timeouts_match_defaults() {
    let search = SearchConfig::default();
    assert_eq!(search.path_timeout(RoutingPath::Keyword).as_millis(), 2_000);
    assert_eq!(search.path_timeout(RoutingPath::Metadata).as_millis(), 2_000);
    assert_eq!(search.path_timeout(RoutingPath::Relationship).as_millis(), 3_000);
    assert_eq!(search.path_timeout(RoutingPath::Semantic).as_millis(), 5_000);
    assert_eq!(search.path_timeout(RoutingPath::Agentic).as_millis(), 5_000);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[search]
semantic_timeout_ms = 250

[learning]
queue_full_policy = "drop_newest"
queue_capacity = 16
"#;
    let config = CairnConfig::from_toml(toml).unwrap();
    assert_eq!(config.search.semantic_timeout_ms, 250);
    // Non-overridden fields keep defaults
    assert_eq!(config.search.keyword_timeout_ms, 2_000);
    assert_eq!(config.learning.queue_full_policy, QueueFullPolicy::DropNewest);
    assert_eq!(config.learning.queue_capacity, 16);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(CairnConfig::from_toml("[graph]\nmax_traversal_depth = 11").is_err());
    assert!(CairnConfig::from_toml("[retrieval]\nrrf_k = 0").is_err());
    assert!(CairnConfig::from_toml("[search]\ndefault_max_results = 0").is_err());
    assert!(CairnConfig::from_toml("[learning]\nqueue_full_policy = \"block\"").is_err());
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = CairnConfig::from_toml("[search").unwrap_err();
    assert!(err.to_string().contains("configuration error"));
}

#[test]
fn env_overrides_apply_through_lookup() {
    let vars: HashMap<&str, &str> = [("CAIRN_LOG", "debug"), ("CAIRN_OUTER_DEADLINE_MS", "1500")]
        .into_iter()
        .collect();
    let mut config = CairnConfig::default();
    config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(config.observability.log_level, "debug");
    assert_eq!(config.search.outer_deadline_ms, 1_500);
    // Unparseable values are ignored
    config.apply_env_overrides(|key| (key == "CAIRN_CACHE_TTL_SECS").then(|| "soon".to_string()));
    assert_eq!(config.cache.response_ttl_secs, 60);
}

#[test]
fn load_reads_file() {
    let dir = std::env::temp_dir().join(format!("cairn-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cairn.toml");
    std::fs::write(&path, "[cache]\nresponse_ttl_secs = 5\n").unwrap();
    let config = CairnConfig::load(&path).unwrap();
    assert_eq!(config.cache.response_ttl_secs, 5);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_missing_file_is_a_config_error() {
    let err = CairnConfig::load(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, cairn_core::CairnError::ConfigError(_)));
}
