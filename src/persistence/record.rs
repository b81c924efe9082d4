use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{FormConfig, FormLayout, FormSpacing, FormStep, ValueMap};

/// Whether a persisted form is being edited or only viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMode {
    #[default]
    Edit,
    View,
}

/// Lifecycle state of a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Draft,
    Completed,
}

/// Computed counters the store returns alongside a fetched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecordStats {
    pub step_count: u32,
    pub field_count: u32,
    pub api_step_count: u32,
    pub submission_count: u32,
}

/// The persisted shape of a form, as exchanged with the primary store.
///
/// The builder only edits the subset mirrored in [`FormConfig`]; everything
/// else (publication state, button labels, ownership, timestamps) rides
/// along unchanged and the store stays authoritative for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: FormMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_button_text: Option<String>,
    #[serde(default = "default_true")]
    pub validate_on_submit: bool,
    #[serde(default)]
    pub validate_on_blur: bool,
    #[serde(default)]
    pub validate_on_change: bool,
    #[serde(default)]
    pub layout: FormLayout,
    #[serde(default)]
    pub spacing: FormSpacing,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// The full step → field tree, stored as structured data.
    #[serde(default)]
    pub steps: Vec<FormStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<FormRecordStats>,
}

fn default_true() -> bool {
    true
}

impl FormRecord {
    /// A brand-new record wrapping `config`, owned by `user_id`.
    pub fn from_config(config: &FormConfig, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            description: config.description.clone(),
            mode: FormMode::default(),
            submit_button_text: None,
            cancel_button_text: None,
            reset_button_text: None,
            validate_on_submit: true,
            validate_on_blur: false,
            validate_on_change: false,
            layout: config.layout,
            spacing: config.spacing,
            is_published: false,
            is_template: false,
            template_id: None,
            steps: config.steps.clone(),
            created_at: now,
            updated_at: now,
            published_at: None,
            user_id: user_id.into(),
            stats: None,
        }
    }

    /// Overwrites the builder-editable subset from `config`, leaving the
    /// store-owned fields alone.
    pub fn merge_config(&mut self, config: &FormConfig) {
        self.title = config.title.clone();
        self.description = config.description.clone();
        self.layout = config.layout;
        self.spacing = config.spacing;
        self.steps = config.steps.clone();
    }

    /// Extracts the editable configuration, re-sorting steps and fields by
    /// their stored order.
    pub fn to_config(&self) -> FormConfig {
        let mut steps = self.steps.clone();
        steps.sort_by_key(|s| s.order);
        for step in &mut steps {
            step.fields.sort_by_key(|f| f.order);
        }
        FormConfig {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            layout: self.layout,
            spacing: self.spacing,
            steps,
        }
    }
}

/// One stored response to a published form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub form_id: String,
    pub user_id: String,
    /// Submitted values keyed by field name (the data-binding key).
    pub data: ValueMap,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// A partially-filled submission paused on `current_step`.
    pub fn draft(
        form_id: impl Into<String>,
        user_id: impl Into<String>,
        data: ValueMap,
        current_step: u32,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            user_id: user_id.into(),
            data,
            status: SubmissionStatus::Draft,
            current_step: Some(current_step),
            submitted_at: Utc::now(),
        }
    }

    /// A finished submission.
    pub fn completed(
        form_id: impl Into<String>,
        user_id: impl Into<String>,
        data: ValueMap,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            user_id: user_id.into(),
            data,
            status: SubmissionStatus::Completed,
            current_step: None,
            submitted_at: Utc::now(),
        }
    }
}
