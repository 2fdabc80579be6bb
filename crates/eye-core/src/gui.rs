use egui;

use crate::{AnimatorConfig, Eye, EyeMode};

/// Something the panel wants the host to do after this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// Animation constants changed; push them to the eyes.
    ParamsChanged,
    Save,
    Load,
    Reset,
}

pub fn eye_control_panel(
    ctx: &egui::Context,
    config: &mut AnimatorConfig,
    eyes: &[Eye],
) -> Option<PanelAction> {
    let mut action = None;

    egui::SidePanel::right("eye_controls")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Eye Controls");
            ui.separator();

            for (i, eye) in eyes.iter().enumerate() {
                let mode = match eye.mode() {
                    EyeMode::Idle => "idle",
                    EyeMode::Tracking => "tracking",
                    EyeMode::Cooldown => "cooldown",
                };
                ui.label(format!("Eye {i}: {mode} (cooldown {})", eye.cooldown()));
            }

            ui.separator();

            egui::CollapsingHeader::new("Motion")
                .default_open(true)
                .show(ui, |ui| {
                    let params = &mut config.eye;
                    let mut changed = false;
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut params.spring_divisor, 1.0..=100.0)
                                .text("Spring Divisor"),
                        )
                        .changed();
                    changed |= ui
                        .add(egui::Slider::new(&mut params.gaze_scale, 0.0..=4.0).text("Gaze Scale"))
                        .changed();
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut params.max_cooldown, 1..=200)
                                .text("Cooldown Frames"),
                        )
                        .changed();
                    if changed {
                        action = Some(PanelAction::ParamsChanged);
                    }
                });

            egui::CollapsingHeader::new("Appearance")
                .default_open(false)
                .show(ui, |ui| {
                    let mut changed = false;
                    ui.horizontal(|ui| {
                        ui.label("BG Color");
                        changed |= color_edit_rgb(ui, &mut config.background_color);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Sclera Color");
                        changed |= color_edit_rgb(ui, &mut config.eye.sclera_color);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Idle Pupil");
                        changed |= color_edit_rgb(ui, &mut config.eye.idle_color);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Alert Pupil");
                        changed |= color_edit_rgb(ui, &mut config.eye.alert_color);
                    });
                    if changed {
                        action = Some(PanelAction::ParamsChanged);
                    }
                });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    action = Some(PanelAction::Save);
                }
                if ui.button("Load").clicked() {
                    action = Some(PanelAction::Load);
                }
                if ui.button("Reset").clicked() {
                    *config = AnimatorConfig::default();
                    action = Some(PanelAction::Reset);
                }
            });
        });

    action
}

fn color_edit_rgb(ui: &mut egui::Ui, color: &mut [f32; 3]) -> bool {
    let mut rgba = egui::Color32::from_rgb(
        to_byte(color[0]),
        to_byte(color[1]),
        to_byte(color[2]),
    );
    if ui.color_edit_button_srgba(&mut rgba).changed() {
        color[0] = rgba.r() as f32 / 255.0;
        color[1] = rgba.g() as f32 / 255.0;
        color[2] = rgba.b() as f32 / 255.0;
        return true;
    }
    false
}

fn to_byte(channel: f32) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
