//! Built-in checkpoint definitions
//!
//! On startup the engine installs the three built-in controls if they are
//! absent. Seeding is idempotent and never overwrites an existing row, so
//! admin edits survive restarts.

use tracing::info;

use crate::db::connection::DatabasePool;
use crate::db::models::PipelinePosition;
use crate::db::repositories::{CheckpointDefinitionRepository, NewDefinition};
use crate::engine::error::EngineResult;
use crate::engine::schema::{fields_to_json, FieldDefinition, FieldOption, FieldType};

fn scale_options(max: u32) -> Vec<FieldOption> {
    (1..=max)
        .map(|n| FieldOption {
            value: n.to_string(),
            label: n.to_string(),
        })
        .collect()
}

fn builtin_definitions() -> EngineResult<Vec<NewDefinition>> {
    let chunk_selector_schema = vec![FieldDefinition {
        key: "selected_node_ids".to_string(),
        field_type: FieldType::Chips,
        label: "Selected node IDs".to_string(),
        required: true,
        placeholder: None,
        options: None,
        min: None,
        max: None,
        default: None,
    }];

    let summary_editor_schema = vec![FieldDefinition {
        key: "edited_text".to_string(),
        field_type: FieldType::Textarea,
        label: "Edited summary".to_string(),
        required: true,
        placeholder: Some("Review and edit the generated summary...".to_string()),
        options: None,
        min: None,
        max: None,
        default: None,
    }];

    let questionnaire_schema = vec![
        FieldDefinition {
            key: "confidence".to_string(),
            field_type: FieldType::Select,
            label: "How confident are you in the final summary?".to_string(),
            required: true,
            placeholder: None,
            options: Some(scale_options(5)),
            min: None,
            max: None,
            default: None,
        },
        FieldDefinition {
            key: "citation_helpfulness".to_string(),
            field_type: FieldType::Radio,
            label: "Were the citations helpful?".to_string(),
            required: true,
            placeholder: None,
            options: Some(vec![
                FieldOption {
                    value: "yes".to_string(),
                    label: "Yes".to_string(),
                },
                FieldOption {
                    value: "no".to_string(),
                    label: "No".to_string(),
                },
            ]),
            min: None,
            max: None,
            default: None,
        },
    ];

    Ok(vec![
        NewDefinition {
            control_type: "chunk_selector".to_string(),
            label: "Chunk Selector".to_string(),
            description: "Select which retrieved chunks should be used for generation."
                .to_string(),
            field_schema: fields_to_json(&chunk_selector_schema)?,
            pipeline_position: PipelinePosition::AfterRetrieval,
            sort_order: 10,
            applicable_modes: vec!["hitl_r".to_string(), "hitl_full".to_string()],
            required: true,
            timeout_seconds: None,
            max_retries: 2,
            circuit_breaker_threshold: 5,
            circuit_breaker_window_minutes: 60,
        },
        NewDefinition {
            control_type: "summary_editor".to_string(),
            label: "Summary Editor".to_string(),
            description: "Edit the generated summary before finalization.".to_string(),
            field_schema: fields_to_json(&summary_editor_schema)?,
            pipeline_position: PipelinePosition::AfterGeneration,
            sort_order: 20,
            applicable_modes: vec!["hitl_g".to_string(), "hitl_full".to_string()],
            required: true,
            timeout_seconds: None,
            max_retries: 2,
            circuit_breaker_threshold: 5,
            circuit_breaker_window_minutes: 60,
        },
        NewDefinition {
            control_type: "questionnaire".to_string(),
            label: "Post-Task Questionnaire".to_string(),
            description: "Capture post-task confidence and citation feedback.".to_string(),
            field_schema: fields_to_json(&questionnaire_schema)?,
            pipeline_position: PipelinePosition::PostGeneration,
            sort_order: 30,
            applicable_modes: vec![
                "hitl_r".to_string(),
                "hitl_g".to_string(),
                "hitl_full".to_string(),
            ],
            required: false,
            timeout_seconds: None,
            max_retries: 2,
            circuit_breaker_threshold: 5,
            circuit_breaker_window_minutes: 60,
        },
    ])
}

/// Install missing built-in definitions; returns how many were created
pub async fn ensure_seeded(pool: &DatabasePool) -> EngineResult<usize> {
    let mut created = 0;
    for definition in builtin_definitions()? {
        let existing =
            CheckpointDefinitionRepository::get_by_control_type(pool, &definition.control_type)
                .await?;
        if existing.is_some() {
            continue;
        }
        let slug = definition.control_type.clone();
        CheckpointDefinitionRepository::create(pool, definition).await?;
        info!(control_type = %slug, "Seeded built-in checkpoint definition");
        created += 1;
    }
    Ok(created)
}
