use anyhow::Context;
use eframe::egui;
use std::{path::Path, sync::mpsc};

use crate::lifo;

struct LoadCommand {
    image_path: String,
}

struct Decoded {
    image_path: String,
    image: anyhow::Result<egui::ColorImage>,
}

/// Outcome of a finished load, reported once by [`TexLoader::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadEvent {
    Loaded { width: usize, height: usize },
    Failed,
}

/// Decodes one image at a time on a background thread and keeps the texture
/// of the most recently requested one.
pub struct TexLoader {
    requested: Option<String>,
    texture: Option<egui::TextureHandle>,
    sender: lifo::Sender<LoadCommand>,
    receiver: mpsc::Receiver<Decoded>,
}

pub fn decode(image_path: &Path) -> anyhow::Result<egui::ColorImage> {
    let content = std::fs::read(image_path)
        .with_context(|| format!("read '{}'", image_path.display()))?;
    let img = image::load_from_memory(&content)
        .with_context(|| format!("decode '{}'", image_path.display()))?;

    let size = [img.width() as _, img.height() as _];
    let image_buffer = img.to_rgba8();
    let pixels = image_buffer.as_flat_samples();

    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        pixels.as_slice(),
    ))
}

impl TexLoader {
    pub fn new(ctx: &egui::Context) -> Self {
        let (sender, cmd_receiver) = lifo::channel::<LoadCommand>();
        let (image_sender, receiver) = mpsc::channel();

        let ctx = ctx.clone();
        std::thread::spawn(move || {
            while let Ok(LoadCommand { image_path }) = cmd_receiver.recv() {
                let image = decode(Path::new(&image_path));
                if image_sender.send(Decoded { image_path, image }).is_err() {
                    return;
                }
                ctx.request_repaint();
            }
        });

        Self {
            requested: None,
            texture: None,
            sender,
            receiver,
        }
    }

    /// Starts loading `image_path`. The current texture stays until the new
    /// one arrives; a request still waiting in the queue is superseded.
    pub fn load(&mut self, image_path: &str) {
        self.requested = Some(image_path.to_owned());
        match self.sender.send(LoadCommand {
            image_path: image_path.to_owned(),
        }) {
            Ok(Some(superseded)) => log::info!("load of '{}' superseded", superseded.image_path),
            Ok(None) => (),
            Err(_) => log::error!("image loader thread is gone, cannot load '{image_path}'"),
        }
    }

    /// Uploads finished decodes. Results for anything but the latest request are dropped.
    pub fn update(&mut self, ctx: &egui::Context) -> Option<LoadEvent> {
        let mut event = None;

        while let Ok(Decoded { image_path, image }) = self.receiver.try_recv() {
            if self.requested.as_deref() != Some(image_path.as_str()) {
                log::debug!("dropping stale decode of '{image_path}'");
                continue;
            }

            match image {
                Ok(image) => {
                    let [width, height] = image.size;
                    self.texture =
                        Some(ctx.load_texture(&image_path, image, egui::TextureOptions::NEAREST));
                    event = Some(LoadEvent::Loaded { width, height });
                }
                Err(err) => {
                    log::warn!("error when load image '{image_path}': {err:#}");
                    self.texture = None;
                    event = Some(LoadEvent::Failed);
                }
            }
        }

        event
    }

    pub fn requested(&self) -> Option<&String> {
        self.requested.as_ref()
    }

    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }
}
