use crate::model::FormField;

/// One visual row of the packed layout: the ids of the fields it holds and
/// the fraction of the row they fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub field_ids: Vec<String>,
    pub fill: f64,
}

/// Packs fields into rows by accumulated fractional width.
///
/// Fields are taken in order; a field joins the current row unless it would
/// push the row past a full width, in which case it opens a new row. An
/// empty row always accepts the next field, so an oversized sequence still
/// places every field.
pub fn pack_rows(fields: &[FormField]) -> Vec<FieldRow> {
    let mut rows: Vec<FieldRow> = Vec::new();
    let mut current = FieldRow {
        field_ids: Vec::new(),
        fill: 0.0,
    };

    for field in fields {
        let width = field.width.fraction();
        if !current.field_ids.is_empty() && current.fill + width > 1.0 {
            rows.push(std::mem::replace(
                &mut current,
                FieldRow {
                    field_ids: Vec::new(),
                    fill: 0.0,
                },
            ));
        }
        current.field_ids.push(field.id.clone());
        current.fill += width;
    }

    if !current.field_ids.is_empty() {
        rows.push(current);
    }
    rows
}
