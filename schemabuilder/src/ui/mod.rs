//! Cursive views for the field tree editor and their event handlers.
//!
//! Every handler reads and writes the [`AppData`] stored as Cursive user
//! data; the views themselves keep nothing but widget focus and input.

use cursive::{Cursive, views::Dialog};

use crate::data::{AppData, Edit};

/// Rows of the field tree and the surrounding layout.
pub mod editor_view;

/// Live output preview panel.
pub mod preview;

pub use editor_view::editor_view;

/// Dispatch an edit into the tree and bring the screen up to date.
pub fn apply_edit(siv: &mut Cursive, edit: Edit) {
    let reshapes = edit.reshapes();
    let Some(applied) = siv.with_user_data(|app: &mut AppData| app.apply(edit)) else {
        return;
    };
    if !applied {
        return;
    }
    if reshapes {
        schedule_rebuild(siv);
    } else {
        preview::refresh_preview(siv);
    }
}

/// Rebuild the editor layer once the current event has been handled.
///
/// Popups (such as the kind selector) may still sit above the editor while
/// their callbacks run, so the layer swap is deferred.
pub fn schedule_rebuild(siv: &mut Cursive) {
    if siv.cb_sink().send(Box::new(rebuild)).is_err() {
        warn!("event loop gone, editor not rebuilt");
    }
}

fn rebuild(siv: &mut Cursive) {
    let Some((view, focus)) =
        siv.with_user_data(|app: &mut AppData| (editor_view(app), app.focus))
    else {
        return;
    };
    siv.pop_layer();
    siv.add_fullscreen_layer(view);

    // The new layer starts on its first row; move back to the edited one.
    if let Some(id) = focus {
        match siv.focus_name(&editor_view::key_view_name(id)) {
            Ok(result) => result.process(siv),
            Err(_) => debug!("no row to focus for field {id}"),
        }
    }
}

/// Submit the current output.
pub fn handle_submit(siv: &mut Cursive) {
    let Some((output, confirm)) =
        siv.with_user_data(|app: &mut AppData| (app.submit(), app.config.confirm_submit))
    else {
        return;
    };
    if confirm {
        siv.add_layer(
            Dialog::info(format!("Schema submitted!\n\n{output:#}")).title("Submitted"),
        );
    }
}

/// Leave the editor.
pub fn handle_quit(siv: &mut Cursive) {
    siv.quit();
}

/// Close the top dialog, or leave when only the editor is left.
pub fn handle_back(siv: &mut Cursive) {
    if siv.screen().len() > 1 {
        siv.pop_layer();
    } else {
        siv.quit();
    }
}
