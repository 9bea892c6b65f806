use egui::{Color32, FontFamily, FontId, Stroke, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(5, 5, 7);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(168, 168, 171);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 107, 112);
pub const ACCENT_PURPLE: Color32 = Color32::from_rgb(131, 23, 213);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_PURPLE);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.text_styles.insert(
            TextStyle::Monospace,
            FontId::new(11.0, FontFamily::Monospace),
        );
    });
}
