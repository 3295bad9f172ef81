//! Resolver behavior over an in-memory database.

use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

use checkpoint_engine::db::models::{CheckpointState, PipelinePosition, TaskMode};
use checkpoint_engine::db::repositories::{
    CheckpointDefinitionRepository, DefinitionPatch, NewDefinition, TaskRepository,
};
use checkpoint_engine::db::{DatabasePool, MIGRATOR};
use checkpoint_engine::engine::{lifecycle, seeder, CheckpointGate, EngineError};

async fn setup_pool() -> DatabasePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

async fn create_task(pool: &DatabasePool, mode: TaskMode) -> String {
    TaskRepository::create(pool, mode, "AAPL", "What changed in segment reporting?")
        .await
        .unwrap()
        .id
}

fn definition(slug: &str, modes: &[&str], sort_order: i64) -> NewDefinition {
    NewDefinition {
        control_type: slug.to_string(),
        label: slug.to_string(),
        description: String::new(),
        field_schema: r#"[{"key":"notes","type":"text","label":"Notes","required":false}]"#
            .to_string(),
        pipeline_position: PipelinePosition::AfterRetrieval,
        sort_order,
        applicable_modes: modes.iter().map(|m| m.to_string()).collect(),
        required: false,
        timeout_seconds: None,
        max_retries: 2,
        circuit_breaker_threshold: 5,
        circuit_breaker_window_minutes: 60,
    }
}

#[tokio::test]
async fn test_non_applicable_mode_resolves_empty() {
    let pool = setup_pool().await;
    seeder::ensure_seeded(&pool).await.unwrap();
    let gate = CheckpointGate::new(pool.clone());

    // chunk_selector applies to hitl_r/hitl_full only
    let task_id = create_task(&pool, TaskMode::Baseline).await;
    let resolved = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert!(resolved.is_empty());
    assert!(!gate
        .has_pending(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_wildcard_matches_every_mode() {
    let pool = setup_pool().await;
    CheckpointDefinitionRepository::create(&pool, definition("always_on", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());

    for mode in [TaskMode::Baseline, TaskMode::HitlFull] {
        let task_id = create_task(&pool, mode).await;
        let resolved = gate
            .resolve(&task_id, PipelinePosition::AfterRetrieval)
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
    }
}

#[tokio::test]
async fn test_empty_mode_set_matches_nothing() {
    let pool = setup_pool().await;
    CheckpointDefinitionRepository::create(&pool, definition("never_on", &[], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());

    let task_id = create_task(&pool, TaskMode::HitlFull).await;
    let resolved = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert!(resolved.is_empty());
}

#[tokio::test]
async fn test_repeated_resolve_is_stable() {
    let pool = setup_pool().await;
    CheckpointDefinitionRepository::create(&pool, definition("second", &["*"], 20))
        .await
        .unwrap();
    CheckpointDefinitionRepository::create(&pool, definition("first", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());
    let task_id = create_task(&pool, TaskMode::HitlFull).await;

    let first_pass = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    let second_pass = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();

    let slugs: Vec<_> = first_pass
        .iter()
        .map(|r| r.definition.control_type.clone())
        .collect();
    assert_eq!(slugs, vec!["first", "second"]);

    let first_ids: Vec<_> = first_pass.iter().map(|r| r.instance.id.clone()).collect();
    let second_ids: Vec<_> = second_pass.iter().map(|r| r.instance.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn test_sort_order_ties_break_on_created_at() {
    let pool = setup_pool().await;
    CheckpointDefinitionRepository::create(&pool, definition("older", &["*"], 10))
        .await
        .unwrap();
    CheckpointDefinitionRepository::create(&pool, definition("newer", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());
    let task_id = create_task(&pool, TaskMode::HitlFull).await;

    let resolved = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    let slugs: Vec<_> = resolved
        .iter()
        .map(|r| r.definition.control_type.as_str())
        .collect();
    assert_eq!(slugs, vec!["older", "newer"]);
}

#[tokio::test]
async fn test_instance_keeps_frozen_schema_after_admin_edit() {
    let pool = setup_pool().await;
    let created = CheckpointDefinitionRepository::create(&pool, definition("editable", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());

    let live_task = create_task(&pool, TaskMode::HitlFull).await;
    let resolved = gate
        .resolve(&live_task, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    let frozen = resolved[0].instance.field_schema.clone();

    // Admin replaces the schema
    let new_schema =
        r#"[{"key":"rating","type":"number","label":"Rating","required":true,"min":1.0,"max":5.0}]"#;
    CheckpointDefinitionRepository::update(
        &pool,
        &created.id,
        DefinitionPatch {
            field_schema: Some(new_schema.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    // The live instance still carries the schema it started with
    let resolved = gate
        .resolve(&live_task, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert_eq!(resolved[0].instance.field_schema, frozen);

    // A fresh task freezes the new schema
    let new_task = create_task(&pool, TaskMode::HitlFull).await;
    let resolved = gate
        .resolve(&new_task, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert_eq!(resolved[0].instance.field_schema, new_schema);
}

#[tokio::test]
async fn test_disabled_definition_stops_new_instances_but_existing_stay_operable() {
    let pool = setup_pool().await;
    let created = CheckpointDefinitionRepository::create(&pool, definition("fading", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());

    let live_task = create_task(&pool, TaskMode::HitlFull).await;
    let resolved = gate
        .resolve(&live_task, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    let instance_id = resolved[0].instance.id.clone();

    CheckpointDefinitionRepository::set_enabled(&pool, &created.id, false)
        .await
        .unwrap();

    // New tasks see nothing
    let new_task = create_task(&pool, TaskMode::HitlFull).await;
    let resolved = gate
        .resolve(&new_task, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert!(resolved.is_empty());

    // The existing instance still accepts its submission
    let submitted = lifecycle::submit(
        &pool,
        &live_task,
        &instance_id,
        json!({"notes": "still works"}).as_object().unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(
        submitted.instance.lifecycle_state().unwrap(),
        CheckpointState::Submitted
    );
}

#[tokio::test]
async fn test_terminal_instances_are_returned_as_is() {
    let pool = setup_pool().await;
    CheckpointDefinitionRepository::create(&pool, definition("summary_gate", &["*"], 10))
        .await
        .unwrap();
    let gate = CheckpointGate::new(pool.clone());
    let task_id = create_task(&pool, TaskMode::HitlFull).await;

    let resolved = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    let instance_id = resolved[0].instance.id.clone();
    lifecycle::skip(&pool, &task_id, &instance_id).await.unwrap();

    // The finalized instance is still included so the UI can show it
    let resolved = gate
        .resolve(&task_id, PipelinePosition::AfterRetrieval)
        .await
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(
        resolved[0].instance.lifecycle_state().unwrap(),
        CheckpointState::Skipped
    );
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let pool = setup_pool().await;
    let gate = CheckpointGate::new(pool.clone());
    let err = gate
        .resolve("missing", PipelinePosition::AfterRetrieval)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::TaskNotFound(_)));
}
