use cursive::{
    View,
    align::HAlign,
    traits::{Nameable, Resizable, Scrollable},
    views::{Button, Checkbox, DummyView, EditView, LinearLayout, Panel, SelectView, TextView},
};

use crate::{
    data::{AppData, Edit, Field, FieldId, FieldKind, FieldUpdate, FieldValue},
    ui::{apply_edit, handle_submit, preview::preview_view},
};

const KEY_WIDTH: usize = 18;
const KIND_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 18;
const HELP: &str = "Tab/arrows move • Enter activates • Ctrl-S submit • q/Esc quit • ~ log";

/// Name of the key editor in the row of field `id`.
pub fn key_view_name(id: FieldId) -> String {
    format!("key-{id}")
}

/// Full-screen editor: field rows on the left, live output on the right.
pub fn editor_view(app: &AppData) -> impl View + use<> {
    let mut rows = LinearLayout::vertical();
    append_rows(&mut rows, app.tree.fields(), None, 0);
    rows.add_child(DummyView);
    rows.add_child(Button::new("Add Item", |s| {
        apply_edit(s, Edit::Add { parent: None })
    }));
    rows.add_child(Button::new("Submit", handle_submit));

    let fields = Panel::new(rows.scrollable()).title("Fields");
    let output = Panel::new(preview_view(app)).title("Output");

    LinearLayout::vertical()
        .child(TextView::new(app.config.title.as_str()).h_align(HAlign::Center))
        .child(
            LinearLayout::horizontal()
                .child(fields.full_width())
                .child(output.full_width())
                .full_height(),
        )
        .child(TextView::new(HELP))
}

fn append_rows(
    layout: &mut LinearLayout,
    fields: &[Field],
    parent: Option<FieldId>,
    depth: usize,
) {
    for field in fields {
        layout.add_child(field_row(field, parent, depth));
        if let Some(children) = field.children() {
            let id = field.id();
            append_rows(layout, children, Some(id), depth + 1);
            layout.add_child(
                LinearLayout::horizontal()
                    .child(TextView::new(indent(depth + 1)))
                    .child(Button::new("+ Add Item", move |s| {
                        apply_edit(s, Edit::Add { parent: Some(id) })
                    })),
            );
        }
    }
}

fn indent(depth: usize) -> String {
    "│ ".repeat(depth)
}

fn field_row(field: &Field, parent: Option<FieldId>, depth: usize) -> LinearLayout {
    let id = field.id();

    let key_name = EditView::new()
        .content(field.key_name())
        .on_edit(move |s, text, _| {
            apply_edit(
                s,
                Edit::update(id, parent, FieldUpdate::KeyName(text.to_string())),
            )
        })
        .with_name(key_view_name(id))
        .fixed_width(KEY_WIDTH);

    let enabled = Checkbox::new()
        .with_checked(field.enabled())
        .on_change(move |s, checked| {
            apply_edit(s, Edit::update(id, parent, FieldUpdate::Enabled(checked)))
        });

    let add_child = Button::new("+", move |s| apply_edit(s, Edit::Add { parent: Some(id) }))
        .with_enabled(field.is_nested());

    let delete = Button::new("-", move |s| apply_edit(s, Edit::Delete { id, parent }));

    LinearLayout::horizontal()
        .child(TextView::new(indent(depth)))
        .child(key_name)
        .child(DummyView)
        .child(kind_select(field.kind(), id, parent))
        .child(DummyView)
        .child(value_editor(field, parent))
        .child(DummyView)
        .child(enabled)
        .child(TextView::new(" on "))
        .child(add_child)
        .child(delete)
}

fn kind_select(kind: FieldKind, id: FieldId, parent: Option<FieldId>) -> impl View {
    let selected = FieldKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
    SelectView::new()
        .popup()
        .with_all(FieldKind::ALL.iter().map(|k| (k.label(), *k)))
        .selected(selected)
        .on_submit(move |s, kind: &FieldKind| {
            apply_edit(s, Edit::update(id, parent, FieldUpdate::Kind(*kind)))
        })
        .fixed_width(KIND_WIDTH)
}

fn value_editor(field: &Field, parent: Option<FieldId>) -> Box<dyn View> {
    let id = field.id();
    match field.value() {
        FieldValue::Bool(checked) => Box::new(
            Checkbox::new()
                .with_checked(*checked)
                .on_change(move |s, checked| {
                    apply_edit(
                        s,
                        Edit::update(id, parent, FieldUpdate::Value(FieldValue::Bool(checked))),
                    )
                })
                .fixed_width(VALUE_WIDTH),
        ),
        FieldValue::Children(children) => Box::new(
            TextView::new(format!("{{ {} items }}", children.len())).fixed_width(VALUE_WIDTH),
        ),
        value => Box::new(
            EditView::new()
                .content(value.display_text().unwrap_or_default())
                .on_edit(move |s, text, _| {
                    apply_edit(
                        s,
                        Edit::update(id, parent, FieldUpdate::Input(text.to_string())),
                    )
                })
                .fixed_width(VALUE_WIDTH),
        ),
    }
}
