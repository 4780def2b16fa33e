use spotify_tools::{error::CacheError, management::TokenCache, types::TokenRecord};
use tempfile::TempDir;

fn sample_record() -> TokenRecord {
    TokenRecord {
        access_token: "BQD-access".to_string(),
        refresh_token: "AQC-refresh".to_string(),
        expires_at: 1_760_000_000,
    }
}

#[tokio::test]
async fn test_load_missing_cache_is_none() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::new(dir.path().join("token-cache.json"));

    assert_eq!(cache.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::new(dir.path().join("nested/dir/token-cache.json"));
    let record = sample_record();

    cache.save(&record).await.unwrap();
    assert_eq!(cache.load().await.unwrap(), Some(record));
}

#[tokio::test]
async fn test_file_holds_only_the_record_fields() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::new(dir.path().join("token-cache.json"));
    cache.save(&sample_record()).await.unwrap();

    let content = std::fs::read_to_string(cache.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();

    assert_eq!(keys, vec!["access_token", "expires_at", "refresh_token"]);
    assert_eq!(json["expires_at"], 1_760_000_000);
}

#[tokio::test]
async fn test_save_overwrites_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::new(dir.path().join("token-cache.json"));

    cache.save(&sample_record()).await.unwrap();
    let newer = TokenRecord {
        access_token: "BQD-newer".to_string(),
        ..sample_record()
    };
    cache.save(&newer).await.unwrap();

    assert_eq!(cache.load().await.unwrap(), Some(newer));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("token-cache.json")]);
}

#[tokio::test]
async fn test_corrupt_cache_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token-cache.json");
    std::fs::write(&path, "{\"access_token\": ").unwrap();

    let cache = TokenCache::new(path);
    assert!(matches!(cache.load().await, Err(CacheError::Serde(_))));
}

#[tokio::test]
async fn test_clear() {
    let dir = TempDir::new().unwrap();
    let cache = TokenCache::new(dir.path().join("token-cache.json"));

    // clearing an absent cache is fine
    cache.clear().await.unwrap();

    cache.save(&sample_record()).await.unwrap();
    cache.clear().await.unwrap();
    assert_eq!(cache.load().await.unwrap(), None);
}
