//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract serialization snapshots
//! - Config file -> fixture source -> hunter runs (no database needed)
//! - Flow control across page boundaries

#[cfg(test)]
mod contract_tests {
    use contracts::{HuntConfig, Predicate, RecordId};

    #[test]
    fn test_record_id_display_is_stable() {
        assert_eq!(RecordId::new("UserProfile", 42).to_string(), "userprofile_42");
        assert_eq!(RecordId::new("Tag", "rust").to_string(), "tag_rust");
    }

    #[test]
    fn test_config_json_shape() {
        let config: HuntConfig = serde_json::from_value(serde_json::json!({
            "target": "User",
            "predicate": { "column": "age", "operator": "<", "value": 18 }
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({
                "target": "User",
                "chunk_size": 250,
                "predicate": { "column": "age", "operator": "<", "value": 18 },
                "logging": { "enabled": true, "context": "hunter" }
            })
        );
        assert_eq!(config.predicate, Predicate::new("age", "<".parse().unwrap(), 18));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{json, Record, RecordId};
    use hunter::Hunter;
    use record_source::MemorySource;

    const HUNT_TOML: &str = r#"
target = "User"
chunk_size = 3

[predicate]
column = "active"
value = false

[logging]
context = "deactivate-users"
"#;

    fn fixtures(n: i64) -> String {
        let users: Vec<_> = (1..=n)
            .map(|id| {
                json!({
                    "id": id,
                    "active": id != 5,
                    "email": format!("user{}@example.com", id % 4),
                })
            })
            .collect();
        json!({ "User": users, "Post": [] }).to_string()
    }

    fn uid(id: i64) -> RecordId {
        RecordId::new("User", id)
    }

    /// Config file -> fixture file -> hunter with paging
    #[tokio::test]
    async fn test_e2e_config_and_fixtures_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("hunt.toml");
        let data_path = dir.path().join("users.json");
        std::fs::write(&config_path, HUNT_TOML).unwrap();
        std::fs::write(
            &data_path,
            json!({
                "User": (1..=10).map(|id| json!({ "id": id, "active": false })).collect::<Vec<_>>()
            })
            .to_string(),
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&config_path).unwrap();
        let source = MemorySource::from_json_path(&data_path).unwrap();

        let result = Hunter::from_config(&source, &config)
            .unwrap()
            .then(|_| Ok(()))
            .hunt()
            .await
            .unwrap();

        assert_eq!(result.total(), 10);
        assert_eq!(result.successful(), 10);
        assert_eq!(result.failed(), 0);
        assert_eq!(result.skipped(), 0);
        assert_eq!(source.metrics().snapshot().page_sizes, vec![3, 3, 3, 1]);
    }

    /// Duplicate detection across pages with skip reasons
    #[tokio::test]
    async fn test_e2e_skip_duplicates() {
        let source = MemorySource::from_json_str("users", &fixtures(9)).unwrap();
        let config = ConfigLoader::load_from_str(
            &HUNT_TOML.replace("value = false", "value = true"),
            ConfigFormat::Toml,
        )
        .unwrap();

        let seen = Mutex::new(HashSet::new());
        let result = Hunter::from_config(&source, &config)
            .unwrap()
            .then(|ctx| {
                let email = ctx.field("email").cloned().unwrap_or_default().to_string();
                if !seen.lock().unwrap().insert(email) {
                    ctx.skip("duplicate");
                }
                Ok(())
            })
            .hunt()
            .await
            .unwrap();

        // ids 1..=9 without 5; emails cycle over id % 4
        assert_eq!(result.total(), 8);
        assert_eq!(result.successful(), 4);
        assert_eq!(result.skipped(), 4);
        assert_eq!(
            result.skipped_records(),
            &[uid(6), uid(7), uid(8), uid(9)]
        );
        assert!(result
            .skip_reasons()
            .values()
            .all(|reason| reason == "duplicate"));
        assert_eq!(result.success_rate(), 50.0);
    }

    /// Callbacks mutate the source through the same shared reference
    #[tokio::test]
    async fn test_e2e_deactivate_and_report() {
        let source = MemorySource::from_json_str("users", &fixtures(6)).unwrap();
        let notified = Mutex::new(Vec::new());

        let result = Hunter::new(&source, "User")
            .unwrap()
            .find("active", true)
            .on_before_then(|ctx| {
                if ctx.record_id() == &uid(2) {
                    let id = ctx.record_id().clone();
                    ctx.fail(&id, "mailbox unreachable");
                }
                Ok(())
            })
            .then(|ctx| {
                source.update(ctx.record_id(), "notified", true)?;
                Ok(())
            })
            .on_success(|ctx| {
                notified.lock().unwrap().push(ctx.record_id().clone());
                Ok(())
            })
            .chunk(2)
            .unwrap()
            .hunt()
            .await
            .unwrap();

        assert_eq!(result.total(), 5);
        assert_eq!(result.successful(), 4);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.error(&uid(2)), Some("mailbox unreachable"));
        assert_eq!(*notified.lock().unwrap(), vec![uid(1), uid(3), uid(4), uid(6)]);

        let flagged: Vec<Record> = (1..=6)
            .filter_map(|id| source.get(&uid(id)).unwrap())
            .filter(|r| r.get("notified") == Some(&json!(true)))
            .collect();
        assert_eq!(flagged.len(), 4);
        assert!(flagged.iter().all(|r| r.id() != &uid(2)));
    }

    /// Stop requested on a page boundary leaves later pages skipped
    #[tokio::test]
    async fn test_e2e_stop_across_pages() {
        let source = MemorySource::from_json_str("users", &fixtures(9)).unwrap();
        let result = Hunter::new(&source, "User")
            .unwrap()
            .find_with("id", "<=", 9)
            .unwrap()
            .then(|ctx| {
                if ctx.result().successful() == 2 {
                    ctx.stop("batch budget");
                }
                Ok(())
            })
            .chunk(3)
            .unwrap()
            .hunt()
            .await
            .unwrap();

        assert_eq!(result.successful(), 3);
        assert_eq!(result.skipped(), 6);
        assert_eq!(result.skip_reason(&uid(9)), Some("Stopped: batch budget"));
        assert_eq!(
            result.summary(),
            "Total: 9, Successful: 3, Failed: 0, Skipped: 6 (Stopped: batch budget)"
        );
        // Paging continues until the source is exhausted
        assert_eq!(source.metrics().snapshot().page_sizes, vec![3, 3, 3, 0]);
    }

    /// Pre-emptive skip of a record that appears later in the run
    #[tokio::test]
    async fn test_e2e_skip_other_record() {
        let source = MemorySource::from_json_str("users", &fixtures(4)).unwrap();
        let result = Hunter::new(&source, "User")
            .unwrap()
            .find("active", true)
            .then(|ctx| {
                if ctx.record_id() == &uid(1) {
                    ctx.skip_record(&uid(3), "merged into user_1");
                }
                Ok(())
            })
            .hunt()
            .await
            .unwrap();

        // user_1 is halted by the skip call, user_3 is counted once up front
        assert_eq!(result.total(), 4);
        assert_eq!(result.successful(), 2);
        assert_eq!(result.skipped(), 2);
        assert_eq!(result.skipped_records(), &[uid(3), uid(1)]);
        assert_eq!(result.skip_reason(&uid(3)), Some("merged into user_1"));
    }

    /// Detailed summary is serializable for reporting
    #[tokio::test]
    async fn test_e2e_detailed_summary_json() {
        let source = MemorySource::from_json_str("users", &fixtures(3)).unwrap();
        let result = Hunter::new(&source, "User")
            .unwrap()
            .find("active", true)
            .then(|ctx| {
                if ctx.record_id() == &uid(3) {
                    anyhow::bail!("smtp timeout");
                }
                Ok(())
            })
            .without_logging()
            .hunt()
            .await
            .unwrap();

        let json = serde_json::to_value(result.detailed_summary()).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["errors"]["User#3"], "smtp timeout");
        assert!(json["execution_time"].as_f64().unwrap() >= 0.0);
    }
}
