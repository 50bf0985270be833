use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::EditorConfig,
    data::{
        id::{FieldId, IdSource},
        output::duplicate_keys,
        tree::{FieldTree, FieldUpdate},
    },
};

/// Callback receiving a freshly built output object.
pub type OutputCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// A user edit dispatched from the editor view.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Add a default field to the root or to a nested parent.
    Add { parent: Option<FieldId> },
    /// Change one attribute of a field.
    Update {
        id: FieldId,
        parent: Option<FieldId>,
        update: FieldUpdate,
    },
    /// Delete a field and its subtree.
    Delete {
        id: FieldId,
        parent: Option<FieldId>,
    },
}

impl Edit {
    pub fn update(id: FieldId, parent: Option<FieldId>, update: FieldUpdate) -> Self {
        Edit::Update { id, parent, update }
    }

    /// Whether the rows on screen no longer match the tree after this edit.
    ///
    /// Text and toggle edits are already reflected by the widget that
    /// produced them; structural and kind changes are not.
    pub fn reshapes(&self) -> bool {
        matches!(
            self,
            Edit::Add { .. }
                | Edit::Delete { .. }
                | Edit::Update {
                    update: FieldUpdate::Kind(_),
                    ..
                }
        )
    }
}

/// Editor state: the field tree plus the hooks notified about it.
pub struct AppData {
    /// The field tree being edited.
    pub tree: FieldTree,
    /// Session settings.
    pub config: EditorConfig,
    /// Last object handed to the submit callback.
    pub submitted: Option<Value>,
    /// Field whose row takes the focus when the rows are rebuilt.
    pub focus: Option<FieldId>,
    on_change: Option<OutputCallback>,
    on_submit: Option<OutputCallback>,
}

impl AppData {
    /// Build editor state from settings and an id source.
    pub fn new(config: EditorConfig, ids: Box<dyn IdSource>) -> Self {
        let tree = if config.seed_field {
            FieldTree::seeded(ids, config.key_prefix.clone())
        } else {
            FieldTree::new(ids, config.key_prefix.clone())
        };
        AppData {
            tree,
            config,
            submitted: None,
            focus: None,
            on_change: None,
            on_submit: None,
        }
    }

    /// Register the callback fired after every accepted edit.
    pub fn with_on_change(mut self, callback: OutputCallback) -> Self {
        self.on_change = Some(callback);
        self
    }

    /// Register the callback fired on explicit submission.
    pub fn with_on_submit(mut self, callback: OutputCallback) -> Self {
        self.on_submit = Some(callback);
        self
    }

    /// Apply an edit to the tree.
    ///
    /// Edits the tree rejects, and edits that leave the field as it was,
    /// are dropped without touching anything. Returns whether the tree
    /// changed; only changes notify the change callback.
    pub fn apply(&mut self, edit: Edit) -> bool {
        let result = match edit {
            Edit::Add { parent } => self.tree.add_field(parent).map(|id| (true, Some(id))),
            Edit::Update { id, parent, update } => self
                .tree
                .update_field(id, update, parent)
                .map(|changed| (changed, Some(id))),
            Edit::Delete { id, parent } => {
                let owner = self.tree.parent_of(id);
                self.tree.delete_field(id, parent).map(|_| (true, owner))
            }
        };
        match result {
            Ok((true, focus)) => {
                self.focus = focus;
                self.notify_change();
                true
            }
            Ok((false, _)) => {
                trace!("edit left the tree unchanged");
                false
            }
            Err(e) => {
                debug!("edit ignored: {e}");
                false
            }
        }
    }

    /// Hand the current output to the change callback.
    pub fn notify_change(&self) {
        let output = self.output();
        trace!("output changed: {output}");
        if let Some(callback) = &self.on_change {
            callback(&output);
        }
    }

    /// Output object for the current tree.
    pub fn output(&self) -> Value {
        self.tree.output()
    }

    /// Output rendered for the preview panel.
    pub fn preview(&self) -> String {
        let output = self.output();
        if self.config.pretty {
            format!("{output:#}")
        } else {
            output.to_string()
        }
    }

    /// Messages about keys whose values get overwritten in the output.
    pub fn warnings(&self) -> Vec<String> {
        duplicate_keys(self.tree.fields())
            .into_iter()
            .map(|path| format!("duplicate key `{path}`: the last one wins"))
            .collect()
    }

    /// Build the output, record it and pass it to the submit callback.
    pub fn submit(&mut self) -> Value {
        let output = self.output();
        info!("Submitted schema: {output}");
        if let Some(callback) = &self.on_submit {
            callback(&output);
        }
        self.submitted = Some(output.clone());
        output
    }
}
