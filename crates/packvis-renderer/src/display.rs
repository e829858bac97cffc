//! Interactive display of a rendered canvas in a native window.

use packvis_core::{Result, VisError};

/// Decide whether a window can be opened, given a way to read environment variables.
///
/// On Linux and other X11/Wayland systems a display server must be advertised
/// through `DISPLAY` or `WAYLAND_DISPLAY`. Windows and macOS always have one.
pub fn probe_display<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return Ok(());
    }
    let advertised = ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|name| lookup(name).is_some_and(|value| !value.is_empty()));
    if advertised {
        Ok(())
    } else {
        Err(VisError::NoDisplay(
            "neither DISPLAY nor WAYLAND_DISPLAY is set".to_string(),
        ))
    }
}

/// Probe using the process environment.
pub fn probe_environment() -> Result<()> {
    probe_display(|name| std::env::var(name).ok())
}

/// Show an SVG canvas in a window and block until the window is closed.
///
/// Callers run [`probe_environment`] first, before any drawing.
#[cfg(feature = "display")]
pub fn show_svg(svg: &str, title: &str) -> Result<()> {
    use eframe::egui;

    let pixmap = crate::raster::rasterize(svg).map_err(|e| VisError::NoDisplay(e.to_string()))?;
    let size = [pixmap.width() as usize, pixmap.height() as usize];

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([size[0] as f32, size[1] as f32]),
        ..Default::default()
    };

    log::info!("Opening window '{}' ({}x{})", title, size[0], size[1]);
    eframe::run_native(
        title,
        options,
        Box::new(move |cc| {
            let image = egui::ColorImage::from_rgba_premultiplied(size, pixmap.data());
            let texture =
                cc.egui_ctx
                    .load_texture("packvis-canvas", image, egui::TextureOptions::LINEAR);
            let app: Box<dyn eframe::App> = Box::new(CanvasApp { texture });
            Ok(app)
        }),
    )
    .map_err(|e| VisError::NoDisplay(e.to_string()))
}

#[cfg(not(feature = "display"))]
pub fn show_svg(_svg: &str, _title: &str) -> Result<()> {
    Err(VisError::NoDisplay(
        "built without display support".to_string(),
    ))
}

#[cfg(feature = "display")]
struct CanvasApp {
    texture: eframe::egui::TextureHandle,
}

#[cfg(feature = "display")]
impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        use eframe::egui;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(egui::Image::new(&self.texture).shrink_to_fit());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn test_headless_environment() {
        let err = probe_display(|_| None).unwrap_err();
        assert_eq!(err.kind(), "NoDisplayError");

        let empty = probe_display(|_| Some(String::new()));
        assert!(empty.is_err());
    }

    #[test]
    fn test_display_advertised() {
        assert!(probe_display(|name| (name == "DISPLAY").then(|| ":0".to_string())).is_ok());
        assert!(probe_display(|name| (name == "WAYLAND_DISPLAY").then(|| "wayland-0".to_string()))
            .is_ok());
    }
}
