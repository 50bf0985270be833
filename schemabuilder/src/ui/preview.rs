use cursive::{
    Cursive, View,
    traits::{Nameable, Scrollable},
    views::{LinearLayout, TextView},
};

use crate::data::AppData;

pub(crate) const PREVIEW: &str = "output_preview";
pub(crate) const WARNINGS: &str = "output_warnings";

/// Preview text plus duplicate-key warnings.
pub fn preview_view(app: &AppData) -> impl View + use<> {
    LinearLayout::vertical()
        .child(TextView::new(app.warnings().join("\n")).with_name(WARNINGS))
        .child(TextView::new(app.preview()).with_name(PREVIEW).scrollable())
}

/// Redraw the preview from the current tree.
pub fn refresh_preview(siv: &mut Cursive) {
    let Some((preview, warnings)) =
        siv.with_user_data(|app: &mut AppData| (app.preview(), app.warnings().join("\n")))
    else {
        return;
    };
    siv.call_on_name(PREVIEW, |v: &mut TextView| v.set_content(preview));
    siv.call_on_name(WARNINGS, |v: &mut TextView| v.set_content(warnings));
}
