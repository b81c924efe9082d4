//! Tests for the structural mutation engine and its ordering invariants.
mod common;
use common::*;
use yoshiki::error::BuilderError;
use yoshiki::model::MAX_STEPS;
use yoshiki::prelude::*;

#[test]
fn new_builder_starts_with_one_empty_step() {
    let builder = FormBuilder::new();
    assert_eq!(builder.config().steps.len(), 1);
    assert!(builder.config().steps[0].fields.is_empty());
    assert_eq!(builder.config().steps[0].order, 0);
    assert_eq!(builder.active_step_index(), 0);
}

#[test]
fn add_step_appends_and_activates() {
    let mut builder = FormBuilder::new();
    builder.add_step().unwrap();
    builder.add_step().unwrap();

    let orders: Vec<u32> = builder.config().steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(builder.active_step_index(), 2);
    assert_eq!(builder.active_step().title, "Step 3");
}

#[test]
fn add_step_refuses_past_the_limit() {
    let mut builder = FormBuilder::new();
    for _ in 1..MAX_STEPS {
        builder.add_step().unwrap();
    }
    assert_eq!(builder.config().steps.len(), MAX_STEPS);

    let result = builder.add_step();
    assert_eq!(result.unwrap_err(), BuilderError::StepLimitReached(MAX_STEPS));
    assert_eq!(builder.config().steps.len(), MAX_STEPS);
}

#[test]
fn delete_step_renumbers_and_clamps_active() {
    let mut builder = FormBuilder::new();
    builder.add_step().unwrap();
    let last = builder.add_step().unwrap().id.clone();
    assert_eq!(builder.active_step_index(), 2);

    builder.delete_step(&last).unwrap();
    let orders: Vec<u32> = builder.config().steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1]);
    assert_eq!(builder.active_step_index(), 1);
}

#[test]
fn delete_step_refuses_last_step_and_unknown_ids() {
    let mut builder = FormBuilder::new();
    let only = builder.config().steps[0].id.clone();
    assert_eq!(builder.delete_step(&only).unwrap_err(), BuilderError::LastStep);
    assert_eq!(
        builder.delete_step("step_missing").unwrap_err(),
        BuilderError::StepNotFound("step_missing".to_string())
    );
}

#[test]
fn update_step_title_edits_in_place() {
    let mut builder = FormBuilder::new();
    let id = builder.config().steps[0].id.clone();

    builder
        .update_step_title(&id, "Identity", Some("Who you are".to_string()))
        .unwrap();
    let step = builder.config().find_step(&id).unwrap();
    assert_eq!(step.title, "Identity");
    assert_eq!(step.description.as_deref(), Some("Who you are"));

    assert!(matches!(
        builder.update_step_title("step_missing", "X", None),
        Err(BuilderError::StepNotFound(_))
    ));
}

#[test]
fn duplicate_step_clones_fields_with_fresh_ids() {
    let mut builder = sample_builder();
    let source = builder.config().steps[0].clone();

    let clone_id = builder.duplicate_step(&source.id).unwrap();
    assert_eq!(builder.config().steps.len(), 2);

    let clone = builder.config().find_step(&clone_id).unwrap();
    assert_eq!(clone.title, format!("{} (copy)", source.title));
    assert_eq!(clone.fields.len(), source.fields.len());
    for (original, copied) in source.fields.iter().zip(&clone.fields) {
        assert_ne!(original.id, copied.id);
        assert_eq!(copied.step_id, clone_id);
        assert_eq!(original.name, copied.name);
    }
    let orders: Vec<u32> = builder.config().steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn add_field_appends_defaults_and_selects() {
    let mut builder = FormBuilder::new();
    let id = builder
        .add_field(text_draft("nickname"), None)
        .unwrap()
        .id
        .clone();

    let field = builder.config().find_field(&id).unwrap();
    assert_eq!(field.width, FieldWidth::Full);
    assert_eq!(field.order, 0);
    assert_eq!(field.step_id, builder.config().steps[0].id);
    assert_eq!(builder.selected_field(), Some(id.as_str()));
}

#[test]
fn add_field_at_position_shifts_followers() {
    let mut builder = sample_builder();
    builder.add_field(text_draft("inserted"), Some(1)).unwrap();

    let names: Vec<&str> = builder.config().steps[0]
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["first_name", "inserted", "age"]);
    assert_eq!(orders(&builder, 0), vec![0, 1, 2]);
}

#[test]
fn add_field_rejects_mismatched_attributes() {
    let mut builder = FormBuilder::new();
    let draft = text_draft("oops").with_attributes(TypeAttributes::Numeric {
        min: Some(0.0),
        max: None,
        step: None,
    });
    assert!(matches!(
        builder.add_field(draft, None),
        Err(BuilderError::Model(_))
    ));
    assert!(builder.config().steps[0].fields.is_empty());
}

#[test]
fn update_field_merges_patch() {
    let mut builder = sample_builder();
    let id = field_id(&builder, 0, 0);

    builder
        .update_field(
            &id,
            FieldPatch {
                label: Some("Given name".to_string()),
                width: Some(FieldWidth::Half),
                placeholder: Some(Some("Jane".to_string())),
                ..FieldPatch::default()
            },
        )
        .unwrap();

    let field = builder.config().find_field(&id).unwrap();
    assert_eq!(field.label, "Given name");
    assert_eq!(field.width, FieldWidth::Half);
    assert_eq!(field.placeholder.as_deref(), Some("Jane"));
    // Untouched attributes survive the patch.
    assert_eq!(field.name, "first_name");
}

#[test]
fn update_field_order_change_resorts_step() {
    let mut builder = sample_builder();
    let first = field_id(&builder, 0, 0);

    builder
        .update_field(
            &first,
            FieldPatch {
                order: Some(5),
                ..FieldPatch::default()
            },
        )
        .unwrap();

    let names: Vec<&str> = builder.config().steps[0]
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["age", "first_name"]);
    assert_eq!(orders(&builder, 0), vec![0, 1]);
}

#[test]
fn update_field_unknown_id_reports_not_found() {
    let mut builder = sample_builder();
    assert_eq!(
        builder
            .update_field("field_missing", FieldPatch::default())
            .unwrap_err(),
        BuilderError::FieldNotFound("field_missing".to_string())
    );
}

#[test]
fn delete_field_renumbers_and_clears_selection() {
    let mut builder = sample_builder();
    let first = field_id(&builder, 0, 0);
    builder.select_field(Some(first.clone()));

    builder.delete_field(&first).unwrap();
    assert_eq!(builder.config().steps[0].fields.len(), 1);
    assert_eq!(orders(&builder, 0), vec![0]);
    assert_eq!(builder.selected_field(), None);
}

#[test]
fn duplicate_field_lands_after_source() {
    // Fields A, B; duplicating A gives A=0, copy=1, B=2.
    let mut builder = FormBuilder::new();
    let a = builder.add_field(text_draft("a"), None).unwrap().id.clone();
    builder.add_field(text_draft("b"), None).unwrap();

    let copy = builder.duplicate_field(&a).unwrap();

    let step = &builder.config().steps[0];
    assert_eq!(step.fields[0].id, a);
    assert_eq!(step.fields[1].id, copy);
    assert_eq!(step.fields[1].label, "a (copy)");
    assert_eq!(step.fields[2].name, "b");
    assert_eq!(orders(&builder, 0), vec![0, 1, 2]);
}

#[test]
fn duplicate_field_disambiguates_names() {
    let mut builder = FormBuilder::new();
    let a = builder.add_field(text_draft("email"), None).unwrap().id.clone();

    let first_copy = builder.duplicate_field(&a).unwrap();
    let second_copy = builder.duplicate_field(&a).unwrap();

    let name_of = |id: &str| builder.config().find_field(id).unwrap().name.clone();
    assert_eq!(name_of(&first_copy), "email_copy");
    assert_eq!(name_of(&second_copy), "email_copy2");
}

#[test]
fn field_orders_stay_contiguous_under_churn() {
    let mut builder = FormBuilder::new();
    let a = builder.add_field(text_draft("a"), None).unwrap().id.clone();
    let b = builder.add_field(text_draft("b"), None).unwrap().id.clone();
    builder.add_field(text_draft("c"), Some(0)).unwrap();
    builder.duplicate_field(&b).unwrap();
    builder.delete_field(&a).unwrap();
    builder.add_field(text_draft("d"), Some(2)).unwrap();

    assert_eq!(
        orders(&builder, 0),
        (0..builder.config().steps[0].fields.len() as u32).collect::<Vec<_>>()
    );
}

#[test]
fn reorder_fields_is_idempotent() {
    let mut builder = sample_builder();
    let step_id = builder.config().steps[0].id.clone();

    builder.reorder_fields(&step_id).unwrap();
    let once: Vec<String> = builder.config().steps[0]
        .fields
        .iter()
        .map(|f| f.id.clone())
        .collect();

    builder.reorder_fields(&step_id).unwrap();
    let twice: Vec<String> = builder.config().steps[0]
        .fields
        .iter()
        .map(|f| f.id.clone())
        .collect();

    assert_eq!(once, twice);
    assert_eq!(orders(&builder, 0), vec![0, 1]);
}

#[test]
fn organize_fields_by_width_packs_rows() {
    let mut builder = FormBuilder::new();
    let step_id = builder.config().steps[0].id.clone();
    builder
        .add_field(text_draft("a").with_width(FieldWidth::Half), None)
        .unwrap();
    builder
        .add_field(text_draft("b").with_width(FieldWidth::Half), None)
        .unwrap();
    builder
        .add_field(text_draft("c").with_width(FieldWidth::Third), None)
        .unwrap();
    builder
        .add_field(text_draft("d").with_width(FieldWidth::Full), None)
        .unwrap();

    let rows = builder.organize_fields_by_width(&step_id).unwrap();
    let sizes: Vec<usize> = rows.iter().map(|r| r.field_ids.len()).collect();
    // half+half fill a row; third starts one; full cannot join it.
    assert_eq!(sizes, vec![2, 1, 1]);
}

#[test]
fn organize_quarters_fill_a_single_row() {
    let mut builder = FormBuilder::new();
    let step_id = builder.config().steps[0].id.clone();
    for name in ["a", "b", "c", "d"] {
        builder
            .add_field(text_draft(name).with_width(FieldWidth::Quarter), None)
            .unwrap();
    }

    let rows = builder.organize_fields_by_width(&step_id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field_ids.len(), 4);
}
