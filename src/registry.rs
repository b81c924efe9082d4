//! Static catalog of field templates: per-type UI metadata and defaults.

use serde::Serialize;

use crate::model::{
    FieldDraft, FieldOption, FieldType, FieldValidation, TypeAttributes,
};

/// Palette group a template belongs to in the builder UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Input,
    Select,
    Date,
    File,
    Control,
}

/// UI metadata and default properties for one field type.
#[derive(Debug, Clone)]
pub struct FieldTemplate {
    pub field_type: FieldType,
    pub label: &'static str,
    pub icon: &'static str,
    pub category: FieldCategory,
    pub has_options: bool,
    pub placeholder: Option<&'static str>,
    pub default_validation: Option<FieldValidation>,
    pub default_options: Vec<FieldOption>,
    pub default_attributes: TypeAttributes,
}

impl FieldTemplate {
    fn new(
        field_type: FieldType,
        label: &'static str,
        icon: &'static str,
        category: FieldCategory,
    ) -> Self {
        Self {
            field_type,
            label,
            icon,
            category,
            has_options: field_type.has_options(),
            placeholder: None,
            default_validation: None,
            default_options: Vec::new(),
            default_attributes: TypeAttributes::None,
        }
    }

    fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    fn validation(mut self, validation: FieldValidation) -> Self {
        self.default_validation = Some(validation);
        self
    }

    fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.default_options = options;
        self
    }

    fn attributes(mut self, attributes: TypeAttributes) -> Self {
        self.default_attributes = attributes;
        self
    }

    /// Seeds a draft from this template's defaults.
    pub fn draft(&self, name: impl Into<String>) -> FieldDraft {
        let mut draft = FieldDraft::new(self.field_type, name, self.label);
        draft.placeholder = self.placeholder.map(str::to_string);
        draft.validation = self.default_validation.clone();
        draft.options = self.default_options.clone();
        draft.attributes = self.default_attributes.clone();
        draft
    }
}

/// The catalog of built-in field templates, one per [`FieldType`].
pub struct TemplateRegistry {
    templates: Vec<FieldTemplate>,
}

impl TemplateRegistry {
    pub fn template(&self, field_type: FieldType) -> Option<&FieldTemplate> {
        self.templates.iter().find(|t| t.field_type == field_type)
    }

    pub fn by_category(&self, category: FieldCategory) -> Vec<&FieldTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    pub fn all(&self) -> &[FieldTemplate] {
        &self.templates
    }

    pub fn categories() -> [FieldCategory; 5] {
        [
            FieldCategory::Input,
            FieldCategory::Select,
            FieldCategory::Date,
            FieldCategory::File,
            FieldCategory::Control,
        ]
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        use FieldType::*;

        let templates = vec![
            FieldTemplate::new(Text, "Text", "i-heroicons-pencil-square", FieldCategory::Input)
                .placeholder("Enter your text..."),
            FieldTemplate::new(Email, "Email", "i-heroicons-at-symbol", FieldCategory::Input)
                .placeholder("example@domain.com")
                .validation(FieldValidation::email()),
            FieldTemplate::new(Password, "Password", "i-heroicons-lock-closed", FieldCategory::Input)
                .placeholder("••••••••"),
            FieldTemplate::new(Number, "Number", "i-heroicons-hashtag", FieldCategory::Input)
                .placeholder("0"),
            FieldTemplate::new(Tel, "Phone", "i-heroicons-phone", FieldCategory::Input)
                .placeholder("+1 555 123 4567"),
            FieldTemplate::new(Url, "URL", "i-heroicons-link", FieldCategory::Input)
                .placeholder("https://example.com"),
            FieldTemplate::new(Textarea, "Text area", "i-heroicons-document-text", FieldCategory::Input)
                .placeholder("Your message...")
                .attributes(TypeAttributes::Textarea { rows: Some(4) }),
            FieldTemplate::new(Select, "Dropdown", "i-heroicons-chevron-down", FieldCategory::Select)
                .placeholder("Choose an option")
                .options(vec![
                    FieldOption::new("Option 1", "option1"),
                    FieldOption::new("Option 2", "option2"),
                ]),
            FieldTemplate::new(
                Multiselect,
                "Multi-select",
                "i-heroicons-list-bullet",
                FieldCategory::Select,
            )
            .options(vec![
                FieldOption::new("Option 1", "option1"),
                FieldOption::new("Option 2", "option2"),
            ])
            .attributes(TypeAttributes::Select { multiple: true }),
            FieldTemplate::new(Radio, "Radio buttons", "i-heroicons-radio", FieldCategory::Select)
                .options(vec![
                    FieldOption::new("Choice 1", "choice1"),
                    FieldOption::new("Choice 2", "choice2"),
                ]),
            FieldTemplate::new(
                Checkbox,
                "Checkboxes",
                "i-heroicons-check-circle",
                FieldCategory::Select,
            )
            .options(vec![
                FieldOption::new("Option 1", "opt1"),
                FieldOption::new("Option 2", "opt2"),
            ]),
            FieldTemplate::new(Date, "Date", "i-heroicons-calendar-days", FieldCategory::Date),
            FieldTemplate::new(
                DatetimeLocal,
                "Date and time",
                "i-heroicons-clock",
                FieldCategory::Date,
            ),
            FieldTemplate::new(File, "File", "i-heroicons-document-arrow-up", FieldCategory::File)
                .attributes(TypeAttributes::File {
                    accept: Some("*".to_string()),
                    multiple: false,
                }),
            FieldTemplate::new(Switch, "Switch", "i-heroicons-power", FieldCategory::Control),
            FieldTemplate::new(
                Range,
                "Slider",
                "i-heroicons-adjustments-horizontal",
                FieldCategory::Control,
            )
            .attributes(TypeAttributes::Numeric {
                min: Some(0.0),
                max: Some(100.0),
                step: None,
            }),
        ];

        Self { templates }
    }
}
