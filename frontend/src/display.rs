use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::WindowCanvas;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::FrameBuffer;

use crate::error::{Error, Result};

const BYTES_PER_PIXEL: usize = 3;

/// How the frame buffer is presented.
///
/// Colours are RGBA8888, e.g. `0xFFFFFFFF` for opaque white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub scale: u32,
    pub foreground: u32,
    pub background: u32,
    pub pixel_outlines: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            scale: 20,
            foreground: 0xFFFF_FFFF,
            background: 0x0000_00FF,
            pixel_outlines: true,
        }
    }
}

fn rgba(color: u32) -> Color {
    let [r, g, b, a] = color.to_be_bytes();
    Color::RGBA(r, g, b, a)
}

/// # Display
/// The Chip-8 display is composed of 64x32 on/off pixels.
/// Each of these is drawn as a `scale` sized square in the foreground or background colour.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: WindowCanvas,
    settings: DisplaySettings,
}

impl Display {
    /// Creates a new window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `settings` the scale and colours to draw with
    pub fn new(sdl: &sdl2::Sdl, settings: DisplaySettings) -> Result<Self> {
        let video_subsystem = sdl.video().map_err(Error::sdl)?;
        let window = video_subsystem
            .window(
                "Chip-8",
                DISPLAY_WIDTH as u32 * settings.scale,
                DISPLAY_HEIGHT as u32 * settings.scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(Error::sdl)?;
        let mut canvas = window.into_canvas().build().map_err(Error::sdl)?;

        canvas.set_draw_color(rgba(settings.background));
        canvas.clear();
        canvas.present();

        Ok(Display { canvas, settings })
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it, stretched over
    /// the whole window.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<()> {
        let pixels = frame_to_rgb24(frame, self.settings.foreground, self.settings.background);
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(Error::sdl)?;

        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                let row_len = DISPLAY_WIDTH * BYTES_PER_PIXEL;
                for (row, line) in pixels.chunks(row_len).enumerate() {
                    buffer[row * pitch..row * pitch + row_len].copy_from_slice(line);
                }
            })
            .map_err(Error::sdl)?;

        self.canvas.copy(&texture, None, None).map_err(Error::sdl)?;
        if self.settings.pixel_outlines {
            self.outline(frame)?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Traces a background coloured border around every lit cell.
    fn outline(&mut self, frame: &FrameBuffer) -> Result<()> {
        let scale = self.settings.scale;
        self.canvas.set_draw_color(rgba(self.settings.background));
        for (index, _) in frame.iter().enumerate().filter(|&(_, &on)| on) {
            let x = (index % DISPLAY_WIDTH) as u32 * scale;
            let y = (index / DISPLAY_WIDTH) as u32 * scale;
            self.canvas
                .draw_rect(Rect::new(x as i32, y as i32, scale, scale))
                .map_err(Error::sdl)?;
        }
        Ok(())
    }
}

/// Formats a Chip-8 FrameBuffer as concatenated rows of RGB pixels.
///
/// Lit cells take the foreground colour and unlit cells the background; alpha is dropped.
///
/// # Arguments
/// * `frame` a Chip-8 FrameBuffer
/// * `foreground` RGBA8888 colour of lit cells
/// * `background` RGBA8888 colour of unlit cells
pub fn frame_to_rgb24(frame: &FrameBuffer, foreground: u32, background: u32) -> Vec<u8> {
    let [fr, fg, fb, _] = foreground.to_be_bytes();
    let [br, bg, bb, _] = background.to_be_bytes();
    frame
        .iter()
        .flat_map(|&on| if on { [fr, fg, fb] } else { [br, bg, bb] })
        .collect()
}
