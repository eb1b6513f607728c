#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod app;
pub mod input;
pub mod lifo;
pub mod tex_loader;

fn main() {
    eapp_utils::capture_error!(
        err => eprintln!("setup loggers fails: {err:#}"),
        eapp_utils::setup_loggers("image-viewer.log")?
    );

    let image_path = std::env::args().nth(1);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("image-viewer")
            .with_inner_size([640.0, 480.0])
            .with_min_inner_size([240.0, 240.0]),
        ..Default::default()
    };

    if let Err(err) = eframe::run_native(
        "image-viewer",
        options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc, image_path)))),
    ) {
        log::error!("run native fails: {err}");
    }
}
