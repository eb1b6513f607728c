use crate::{
    input::{Command, InputRouter},
    tex_loader::{LoadEvent, TexLoader},
};
use canvas_image::{GestureEngine, GestureState, Point, ResizePolicy, Size, ViewportConfig};
use eframe::egui::{self, Color32, Rect, RichText, UiBuilder, pos2, vec2};
use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico",
];

pub struct App {
    state: State,
    engine: GestureEngine,
    router: InputRouter,
    tex_loader: TexLoader,
    status: Status,
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    config: ViewportConfig,
    last_image: Option<String>,
    show_info: bool,

    #[serde(skip)]
    settings_open: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            config: ViewportConfig::default(),
            last_image: None,
            show_info: true,
            settings_open: false,
        }
    }
}

#[derive(PartialEq)]
enum Status {
    Empty,
    Loading,
    Ready,
    Failed,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, image_arg: Option<String>) -> Self {
        let mut state: State = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            State::default()
        };
        state.config = state.config.clone().sanitized();

        let image_path = image_arg.or_else(|| state.last_image.clone());
        let mut app = Self {
            engine: GestureEngine::new(state.config.clone()),
            router: InputRouter::default(),
            tex_loader: TexLoader::new(&cc.egui_ctx),
            status: Status::Empty,
            state,
        };

        if let Some(image_path) = image_path {
            app.open(image_path);
        }
        app
    }

    fn open(&mut self, image_path: String) {
        log::info!("opening '{image_path}'");
        self.tex_loader.load(&image_path);
        self.state.last_image = Some(image_path);
        self.status = Status::Loading;
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open(path.to_string_lossy().into_owned());
        }
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        match self.tex_loader.update(ctx) {
            Some(LoadEvent::Loaded { width, height }) => {
                self.engine
                    .set_source(Some(Size::new(width as f64, height as f64)));
                self.status = Status::Ready;
            }
            Some(LoadEvent::Failed) => {
                self.engine.set_source(None);
                self.status = Status::Failed;
            }
            None => (),
        }
    }

    fn ui_contents(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        self.engine
            .resize(Size::new(rect.width() as f64, rect.height() as f64));

        // keeps egui from treating drags on the image as window interactions
        ui.allocate_rect(rect, egui::Sense::click_and_drag());

        self.process_inputs(ui, rect);
        self.ui_show_cur_image(ui, rect);

        if self.state.show_info {
            self.ui_info(ui, rect);
        }
    }

    fn process_inputs(&mut self, ui: &mut egui::Ui, rect: Rect) {
        let events = ui.input(|i| i.events.clone());
        let (ctx, layer) = (ui.ctx().clone(), ui.layer_id());
        let reachable = |pos| ctx.layer_id_at(pos).is_none_or(|top| top == layer);
        for command in self.router.translate(&events, rect, reachable) {
            match command {
                Command::Input(event) => {
                    self.engine.handle(event);
                }
                Command::Zoom { ratio, anchor } => {
                    self.engine.zoom_by(ratio, anchor);
                }
            }
        }

        if ui.memory(|mem| mem.focused().is_none()) {
            let center = Point::new(rect.width() as f64 / 2.0, rect.height() as f64 / 2.0);

            if ui.input(|i| i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals)) {
                self.engine
                    .zoom_by(self.state.config.wheel_zoom_in, center);
            }

            if ui.input(|i| i.key_pressed(egui::Key::Minus)) {
                self.engine
                    .zoom_by(self.state.config.wheel_zoom_out, center);
            }

            if ui.input(|i| i.key_pressed(egui::Key::Num0)) {
                self.engine.reset_view();
            }

            if ui.input(|i| i.key_pressed(egui::Key::I)) {
                self.state.show_info = !self.state.show_info;
            }

            if ui.input(|i| i.key_pressed(egui::Key::S)) {
                self.state.settings_open = !self.state.settings_open;
            }

            if ui.input(|i| i.key_pressed(egui::Key::O)) {
                self.open_dialog();
            }
        }

        let dropped = ui.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            if path.is_file() {
                self.open(path.to_string_lossy().into_owned());
            } else {
                log::warn!("dropped '{}' is not a file", path.display());
            }
        }
    }

    fn ui_show_cur_image(&mut self, ui: &mut egui::Ui, rect: Rect) {
        let frame = self.engine.current_frame();
        let texture = self.tex_loader.texture();

        let (Some(frame), Some(texture)) = (frame, texture) else {
            let text = match self.status {
                Status::Empty => "drop an image here, or press O",
                Status::Loading => "Maiden in Prayer...",
                Status::Failed => "failed to load image",
                Status::Ready => "",
            };
            eapp_utils::center_text(ui, rect, text);
            return;
        };

        let dest = Rect::from_min_size(
            rect.min + vec2(frame.dest.min.x as f32, frame.dest.min.y as f32),
            vec2(frame.dest.size.width as f32, frame.dest.size.height as f32),
        );

        let [tex_w, tex_h] = texture.size().map(|v| v as f32);
        let source_max = frame.source.max();
        let uv = Rect::from_min_max(
            pos2(
                frame.source.min.x as f32 / tex_w,
                frame.source.min.y as f32 / tex_h,
            ),
            pos2(source_max.x as f32 / tex_w, source_max.y as f32 / tex_h),
        );

        ui.painter_at(rect)
            .image(texture.id(), dest, uv, Color32::WHITE);
    }

    fn ui_info(&mut self, ui: &mut egui::Ui, rect: Rect) {
        let info_rect = {
            let mut r = rect.shrink2(vec2(16.0, 8.0));
            r.set_top(r.bottom() - 72.0);
            r
        };

        ui.painter()
            .rect_filled(info_rect.expand(4.0), 6.0, Color32::from_black_alpha(160));

        let text = |str: String| RichText::new(str).color(Color32::WHITE);

        let name = self
            .tex_loader
            .requested()
            .and_then(|path| std::path::Path::new(path).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("None"));
        let size = self
            .engine
            .source()
            .map(|size| format!("{} x {}", size.width, size.height))
            .unwrap_or_else(|| String::from("? x ?"));
        let zoom = if self.engine.has_source() {
            format!("{:.0}%", self.engine.viewport().zoom() * 100.0)
        } else {
            String::from("-")
        };
        let gesture = match self.engine.gesture_state() {
            GestureState::Idle => "idle",
            GestureState::Panning => "panning",
            GestureState::Pinching => "pinching",
        };

        ui.scope_builder(UiBuilder::new().max_rect(info_rect), |ui| {
            egui::Grid::new("info_grid")
                .num_columns(2)
                .spacing([16.0, 2.0])
                .show(ui, |ui| {
                    ui.label(text(String::from("Name")));
                    ui.label(text(name));
                    ui.end_row();
                    ui.label(text(String::from("Size")));
                    ui.label(text(size));
                    ui.end_row();
                    ui.label(text(String::from("Zoom")));
                    ui.label(text(format!(
                        "{zoom} ({gesture}, {} contacts)",
                        self.router.active_contacts()
                    )));
                    ui.end_row();
                });
        });
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let mut config = self.state.config.clone();

        egui::Window::new("Viewport")
            .open(&mut self.state.settings_open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.add(egui::Slider::new(&mut config.margin, 0.0..=200.0).text("Margin"));
                ui.add(egui::Slider::new(&mut config.fit_slack, 0.5..=1.0).text("Fit slack"));
                ui.add(
                    egui::Slider::new(&mut config.max_zoom, 1.0..=50.0)
                        .logarithmic(true)
                        .text("Max zoom"),
                );
                ui.checkbox(
                    &mut config.divide_pan_by_contacts,
                    "Divide pan by contact count",
                );
                ui.horizontal(|ui| {
                    ui.label("On resize");
                    ui.radio_value(&mut config.resize_policy, ResizePolicy::Reclamp, "Keep view");
                    ui.radio_value(&mut config.resize_policy, ResizePolicy::Recenter, "Recenter");
                });
            });

        if config != self.state.config {
            self.engine.set_config(config.clone());
            self.state.config = config;
        }
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| self.ui_contents(ui));

        self.ui_settings(ctx);
    }
}
