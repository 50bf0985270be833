use anyhow::anyhow;
use cursive::{
    Cursive, CursiveExt,
    event::{Event, Key},
};

use crate::{
    data::AppData,
    ui::{editor_view, handle_back, handle_quit, handle_submit},
};

/// Run the editor until the user quits.
///
/// The change callback fires once with the initial output before the first
/// frame is drawn. Returns the final state, including the last submitted
/// object, if any.
///
/// # Errors
///
/// Returns an error when the editor state cannot be recovered from the UI.
pub fn run(app: AppData) -> anyhow::Result<AppData> {
    app.notify_change();
    let layer = editor_view(&app);

    let mut siv = Cursive::default();
    siv.set_user_data(app);

    siv.add_global_callback('q', handle_quit);
    siv.add_global_callback('Q', handle_quit);
    siv.add_global_callback(Event::CtrlChar('s'), handle_submit);
    siv.add_global_callback(Key::Esc, handle_back);
    siv.add_global_callback('~', Cursive::toggle_debug_console);
    siv.add_fullscreen_layer(layer);

    siv.run();

    siv.take_user_data::<AppData>()
        .ok_or_else(|| anyhow!("editor state lost"))
}
