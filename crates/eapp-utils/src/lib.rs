use anyhow::Context;
use eframe::egui;
use std::path::PathBuf;

#[macro_export]
macro_rules! capture_error {
    ($i:ident => $handler:expr, $block_to_capture:expr) => {
        if let Err($i) = || -> ::anyhow::Result<()> {
            $block_to_capture;
            Ok(())
        }() {
            $handler;
        }
    };
}

/// Directory holding the running executable, where log files go.
pub fn exe_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    exe.parent()
        .map(|dir| dir.to_path_buf())
        .with_context(|| format!("executable '{}' has no parent directory", exe.display()))
}

/// Debug builds log `Info` to the terminal and `Warn` to `log_filename`,
/// release builds only log `Warn` to the file.
pub fn setup_loggers(log_filename: &str) -> anyhow::Result<()> {
    use simplelog::{Config, LevelFilter, WriteLogger};
    use std::fs::File;

    let log_path = exe_dir()?.join(log_filename);
    let log_file = File::create(&log_path)
        .with_context(|| format!("create log file '{}'", log_path.display()))?;

    #[cfg(debug_assertions)]
    {
        use simplelog::{CombinedLogger, SimpleLogger};
        CombinedLogger::init(vec![
            SimpleLogger::new(LevelFilter::Info, Config::default()),
            WriteLogger::new(LevelFilter::Warn, Config::default(), log_file),
        ])?;
    }

    #[cfg(not(debug_assertions))]
    WriteLogger::init(LevelFilter::Warn, Config::default(), log_file)?;

    Ok(())
}

pub fn center_text(ui: &egui::Ui, rect: egui::Rect, text: impl ToString) {
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(16.0),
        ui.visuals().text_color(),
    );
}
