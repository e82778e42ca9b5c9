use std::path::{Path, PathBuf};

use crop_engine::aspect::initial_crop;
use crop_engine::projector::project;
use crop_engine::rotation::{self, RotationBarConfig};
use crop_engine::{
    AspectRatioMode, Bounds, CropRectangle, CropperConfig, DragTarget, ProjectedState,
    RenderedImageState, Resizer, Size, Vector, fit_to_ratio, hit_test, move_crop, raster,
};
use eframe::egui;
use image::DynamicImage;
use log::{error, info, warn};

/// Crop rectangle for the whole rotated image in unit coordinates.
pub const FULL_CROP: CropRectangle = CropRectangle::new(Vector::ZERO, Size::new(1.0, 1.0));

/// A drag in progress, with the state it started from.
#[derive(Clone, Copy, Debug)]
struct ActiveDrag {
    target: DragTarget,
    start: Vector,
    crop: CropRectangle,
    rotation: f64,
}

pub struct ImageCropper {
    config: CropperConfig,
    resizer: Resizer,
    image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    /// Crop rectangle relative to the rotated image's bounding box (0.0-1.0)
    crop: Option<CropRectangle>,
    rotation: f64,
    drag: Option<ActiveDrag>,
    aspect_ratio_mode: AspectRatioMode,
    custom_w: u32,
    custom_h: u32,
    is_portrait: bool,
    status: Option<String>,
}

impl ImageCropper {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: CropperConfig,
        file: Option<PathBuf>,
        rotation: f64,
    ) -> Self {
        let mut app = Self {
            resizer: config.resize.resizer(),
            config,
            image: None,
            texture: None,
            crop: None,
            rotation,
            drag: None,
            aspect_ratio_mode: AspectRatioMode::Free,
            custom_w: 4,
            custom_h: 3,
            is_portrait: false,
            status: None,
        };
        if let Some(path) = file {
            app.open(&cc.egui_ctx, &path);
        }
        app
    }

    fn natural_size(&self) -> Option<Size> {
        self.image
            .as_ref()
            .map(|img| Size::new(img.width() as f64, img.height() as f64))
    }

    fn open(&mut self, ctx: &egui::Context, path: &Path) {
        match image::open(path) {
            Ok(img) => {
                info!(
                    "Loaded {} ({}x{})",
                    path.display(),
                    img.width(),
                    img.height()
                );
                self.image = Some(img);
                self.load_texture(ctx);
                self.drag = None;
                self.status = None;
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                self.status = Some(format!("Failed to open image: {e}"));
            }
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = &self.image {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
            self.crop = Some(FULL_CROP);
            self.apply_aspect_ratio();
        }
    }

    fn target_ratio(&self) -> Option<f64> {
        let natural = self.natural_size()?;
        self.aspect_ratio_mode
            .ratio(natural, (self.custom_w, self.custom_h))
    }

    /// Reshapes the crop to the selected aspect ratio. The crop is stored in
    /// unit coordinates, so the ratio is first mapped into that space.
    fn apply_aspect_ratio(&mut self) {
        let (Some(natural), Some(ratio)) = (self.natural_size(), self.target_ratio()) else {
            return;
        };
        let bounds = RenderedImageState {
            position: Vector::ZERO,
            size: natural,
            rotation: self.rotation,
        }
        .bounds();
        let norm_ratio = ratio * bounds.height() / bounds.width();
        if let Some(crop) = &mut self.crop {
            *crop = fit_to_ratio(crop, &FULL_CROP, norm_ratio);
        }
    }

    fn set_rotation(&mut self, rotation: f64) {
        if rotation != self.rotation {
            self.rotation = rotation;
            self.apply_aspect_ratio();
        }
    }

    fn save(&mut self) {
        let (Some(image), Some(natural), Some(crop)) = (&self.image, self.natural_size(), self.crop)
        else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
            .save_file()
        else {
            return;
        };

        let state = projected_state(natural, self.rotation, &crop);
        let result = raster::extract(image, &state).and_then(|out| raster::save(&out, &path));
        match result {
            Ok(()) => self.status = Some(format!("Saved {}", path.display())),
            Err(e) => {
                error!("Failed to save image: {}", e);
                self.status = Some(format!("Failed to save image: {e}"));
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Aspect Ratio:");
            let mut changed = false;
            egui::ComboBox::from_id_salt("params_aspect_ratio")
                .selected_text(self.aspect_ratio_mode.to_string())
                .show_ui(ui, |ui| {
                    for mode in [
                        AspectRatioMode::Free,
                        AspectRatioMode::Original,
                        AspectRatioMode::Square,
                    ] {
                        changed |= ui
                            .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                            .changed();
                    }

                    ui.separator();
                    let presets = if self.is_portrait {
                        AspectRatioMode::PORTRAIT
                    } else {
                        AspectRatioMode::LANDSCAPE
                    };
                    for mode in presets {
                        changed |= ui
                            .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                            .changed();
                    }

                    ui.separator();
                    changed |= ui
                        .selectable_value(
                            &mut self.aspect_ratio_mode,
                            AspectRatioMode::Custom,
                            "Custom",
                        )
                        .changed();
                });

            if ui.button("🔄").clicked() {
                self.is_portrait = !self.is_portrait;
                if self.aspect_ratio_mode == AspectRatioMode::Custom {
                    std::mem::swap(&mut self.custom_w, &mut self.custom_h);
                } else {
                    self.aspect_ratio_mode = self.aspect_ratio_mode.counterpart();
                }
                changed = true;
            }

            if self.aspect_ratio_mode == AspectRatioMode::Custom {
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.custom_w)
                            .speed(0.1)
                            .range(1..=100),
                    )
                    .changed();
                ui.label(":");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.custom_h)
                            .speed(0.1)
                            .range(1..=100),
                    )
                    .changed();
            }

            if changed {
                self.apply_aspect_ratio();
            }

            ui.separator();
            ui.label(format!("Rotation: {:.1}°", self.rotation.to_degrees()));
            if ui.button("Reset").clicked() {
                self.set_rotation(0.0);
            }

            ui.separator();
            if ui.button("Reset Crop").clicked() {
                self.crop = Some(initial_crop(&FULL_CROP, None));
                self.apply_aspect_ratio();
            }

            if ui.button("Save Cropped Image").clicked() {
                self.save();
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (Some(texture), Some(natural), Some(norm_crop)) =
            (self.texture.clone(), self.natural_size(), self.crop)
        else {
            return;
        };

        let layout = self.config.layout.clone();
        let bar = self.config.rotation_bar.clone();
        let padding = layout.padding as f64;

        let available = ui.available_size();
        let max_w = available.x as f64 - padding * 2.0;
        let max_h = available.y as f64 - padding * 2.0 - bar.height;

        // Fit the rotated image's bounding box into the available space
        let natural_bounds = RenderedImageState {
            position: Vector::ZERO,
            size: natural,
            rotation: self.rotation,
        }
        .bounds();
        let scale = (max_w / natural_bounds.width())
            .min(max_h / natural_bounds.height())
            .max(f64::EPSILON);
        let display = natural_bounds.size().mult(scale);
        let total = egui::vec2(
            (display.width + padding * 2.0) as f32,
            (display.height + padding * 2.0) as f32,
        );

        // Manual centering
        let x_offset = (available.x - total.x) / 2.0;
        let y_offset = (available.y - total.y - bar.height as f32) / 2.0;
        let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));
        let target_rect = egui::Rect::from_min_size(start_pos, total);

        let response = ui.allocate_rect(target_rect, egui::Sense::drag());
        let painter = ui.painter_at(target_rect);

        let bounds_min = to_vector(target_rect.min) + Vector::new(padding, padding);
        let center = bounds_min + display.to_vector() * 0.5;
        let size = natural.mult(scale);
        let rendered = RenderedImageState {
            position: center - size.to_vector() * 0.5,
            size,
            rotation: self.rotation,
        };
        let bounds = rendered.bounds();
        let area = CropRectangle::from_bounds(&bounds);

        // Draw the rotated image
        let image_rect = egui::Rect::from_min_size(
            to_pos(rendered.position),
            egui::vec2(size.width as f32, size.height as f32),
        );
        let mut mesh = egui::Mesh::with_texture(texture.id());
        mesh.add_rect_with_uv(
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
        mesh.rotate(
            egui::emath::Rot2::from_angle(self.rotation as f32),
            image_rect.center(),
        );
        painter.add(egui::Shape::mesh(mesh));

        let mut crop = denormalize(&norm_crop, &bounds);

        // Handle Input
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let start = to_vector(pos);
                self.drag = hit_test(start, &crop, layout.hit_tolerance as f64).map(|target| {
                    ActiveDrag {
                        target,
                        start,
                        crop,
                        rotation: self.rotation,
                    }
                });
            }
        }

        if response.dragged() {
            if let (Some(drag), Some(pos)) = (self.drag, response.interact_pointer_pos()) {
                let mouse = to_vector(pos);
                crop = match drag.target {
                    DragTarget::Handle(handle) => self.resizer.resize(
                        handle,
                        area.size,
                        area.position,
                        drag.crop,
                        drag.start,
                        mouse,
                    ),
                    DragTarget::Body => {
                        move_crop(area.size, area.position, drag.crop, drag.start, mouse)
                    }
                    DragTarget::Rotation => crop,
                };
                if crop.size.is_degenerate() {
                    warn!("Ignoring degenerate crop {:?}", crop);
                    crop = drag.crop;
                }
                self.crop = Some(normalize(&crop, &bounds));
            }
        }

        if response.drag_stopped() {
            self.drag = None;
        }

        self.draw_overlay(&painter, &bounds, &crop);

        let state = project(natural, &rendered, &crop);
        if state.actual_crop_region().is_some() {
            let (out_w, out_h) = state.output_size();
            painter.text(
                to_pos(bounds.top_left()) + egui::vec2(0.0, -4.0),
                egui::Align2::LEFT_BOTTOM,
                format!("{out_w} × {out_h} px"),
                egui::FontId::proportional(12.0),
                egui::Color32::GRAY,
            );
        }

        let bar_rect = egui::Rect::from_min_size(
            egui::pos2(target_rect.min.x, target_rect.max.y),
            egui::vec2(target_rect.width(), bar.height as f32),
        );
        self.rotation_bar(ui, bar_rect, &bar);
    }

    fn draw_overlay(&self, painter: &egui::Painter, bounds: &Bounds, crop: &CropRectangle) {
        let layout = &self.config.layout;
        let overlay_color = egui::Color32::from_black_alpha(layout.overlay_alpha);
        let outer = egui::Rect::from_min_max(
            egui::pos2(bounds.min_x as f32, bounds.min_y as f32),
            egui::pos2(bounds.max_x as f32, bounds.max_y as f32),
        );
        let inner = egui::Rect::from_min_size(
            to_pos(crop.position),
            egui::vec2(crop.size.width as f32, crop.size.height as f32),
        );

        // Top, bottom, left, right
        for rect in [
            egui::Rect::from_min_max(outer.min, egui::pos2(outer.max.x, inner.min.y)),
            egui::Rect::from_min_max(egui::pos2(outer.min.x, inner.max.y), outer.max),
            egui::Rect::from_min_max(
                egui::pos2(outer.min.x, inner.min.y),
                egui::pos2(inner.min.x, inner.max.y),
            ),
            egui::Rect::from_min_max(
                egui::pos2(inner.max.x, inner.min.y),
                egui::pos2(outer.max.x, inner.max.y),
            ),
        ] {
            painter.rect_filled(rect, 0.0, overlay_color);
        }

        // Draw crop border
        painter.rect_stroke(inner, 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

        // Draw handles
        let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
        for handle in crop_engine::ResizeHandle::ALL {
            painter.circle(
                to_pos(handle.point_on(crop)),
                layout.handle_radius,
                egui::Color32::WHITE,
                handle_stroke,
            );
        }
    }

    fn rotation_bar(&mut self, ui: &mut egui::Ui, rect: egui::Rect, bar: &RotationBarConfig) {
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let mid = egui::pos2(rect.center().x, rect.min.y + 4.0);

        let tick_stroke = egui::Stroke::new(1.0, egui::Color32::GRAY);
        for tick in rotation::ticks(bar) {
            let x = mid.x + tick.offset as f32;
            let len = if tick.labelled { 10.0 } else { 5.0 };
            painter.line_segment(
                [egui::pos2(x, mid.y), egui::pos2(x, mid.y + len)],
                tick_stroke,
            );
            if tick.labelled {
                painter.text(
                    egui::pos2(x, mid.y + len + 2.0),
                    egui::Align2::CENTER_TOP,
                    format!("{}", tick.degrees),
                    egui::FontId::proportional(9.0),
                    egui::Color32::GRAY,
                );
            }
        }

        let marker_x = mid.x + rotation::indicator_offset(self.rotation, bar) as f32;
        painter.line_segment(
            [egui::pos2(marker_x, mid.y - 2.0), egui::pos2(marker_x, mid.y + 14.0)],
            egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE),
        );

        if response.double_clicked() {
            self.set_rotation(0.0);
            return;
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.drag = Some(ActiveDrag {
                    target: DragTarget::Rotation,
                    start: to_vector(pos),
                    crop: self.crop.unwrap_or(FULL_CROP),
                    rotation: self.rotation,
                });
            }
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.set_rotation(rotation::angle_at_offset((pos.x - mid.x) as f64, bar));
            }
        }

        if response.dragged() {
            if let (Some(drag), Some(pos)) = (self.drag, response.interact_pointer_pos()) {
                if drag.target == DragTarget::Rotation {
                    let dx = pos.x as f64 - drag.start.x;
                    self.set_rotation(rotation::angle_for_drag(drag.rotation, dx, bar));
                }
            }
        }

        if response.drag_stopped() {
            self.drag = None;
        }
    }
}

impl eframe::App for ImageCropper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.open(ctx, &path);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Image").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
                        .pick_file()
                    {
                        self.open(ctx, &path);
                    }
                }
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });

            if self.texture.is_some() {
                self.toolbar(ui);
                ui.separator();
            }

            self.canvas(ui);
        });
    }
}

/// Projects a unit-space crop onto the natural image at `rotation`.
///
/// The image is laid out at natural scale with its bounding box at the
/// origin, so the rendered and actual spaces coincide.
pub fn projected_state(natural: Size, rotation: f64, norm_crop: &CropRectangle) -> ProjectedState {
    let rendered = RenderedImageState {
        position: Vector::ZERO,
        size: natural,
        rotation,
    };
    let crop = denormalize(norm_crop, &rendered.bounds());
    project(natural, &rendered, &crop)
}

fn denormalize(norm: &CropRectangle, bounds: &Bounds) -> CropRectangle {
    let size = bounds.size();
    CropRectangle::new(
        bounds.top_left()
            + Vector::new(norm.position.x * size.width, norm.position.y * size.height),
        Size::new(norm.size.width * size.width, norm.size.height * size.height),
    )
}

fn normalize(crop: &CropRectangle, bounds: &Bounds) -> CropRectangle {
    let size = bounds.size();
    let offset = crop.position - bounds.top_left();
    CropRectangle::new(
        Vector::new(offset.x / size.width, offset.y / size.height),
        Size::new(crop.size.width / size.width, crop.size.height / size.height),
    )
}

fn to_vector(p: egui::Pos2) -> Vector {
    Vector::new(p.x as f64, p.y as f64)
}

fn to_pos(v: Vector) -> egui::Pos2 {
    egui::pos2(v.x as f32, v.y as f32)
}
