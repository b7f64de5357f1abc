//! SDL2 presentation host.
//!
//! Owns the OS window and a streaming texture matching the color buffer,
//! translates SDL input into camera commands, and blits finished or
//! partial frames. No rendering logic lives here.

use std::time::Duration;

use sdl2::event::{Event, WindowEvent as SdlWindowEvent};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::WindowContext;

use crate::camera::{DollyDirection, PanDirection, PanModifiers};
use crate::error::RenderError;
use crate::render::{ChannelOrder, PixelBuffer};

/// How long an idle host blocks waiting for input before polling again.
const IDLE_WAIT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Quit,
    Resize(i32, i32),
    /// The window contents were lost and need to be presented again.
    Expose,
    Pan(PanDirection, PanModifiers),
    /// Mouse delta as previous position minus current position.
    Orbit(i32, i32),
    Dolly(DollyDirection),
}

pub struct Window {
    // Declared before `texture_creator` so it is dropped first.
    texture: Option<Texture<'static>>,
    texture_size: (u32, u32),
    texture_creator: Box<TextureCreator<WindowContext>>,
    canvas: Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, RenderError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        Ok(Self {
            texture: None,
            texture_size: (0, 0),
            texture_creator,
            canvas,
            event_pump,
        })
    }

    /// Current client-area size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), RenderError> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| RenderError::Window(e.to_string()))
    }

    /// Drains pending input. When `idle` is set, blocks briefly for the first
    /// event so a host with nothing to render does not spin.
    pub fn poll_events(&mut self, idle: bool) -> Vec<WindowEvent> {
        let mut events = Vec::new();

        if idle {
            if let Some(event) = self.event_pump.wait_event_timeout(IDLE_WAIT.as_millis() as u32) {
                events.extend(translate(event));
            }
        }
        events.extend(self.event_pump.poll_iter().filter_map(translate));

        events
    }

    /// Blits the color buffer, flipping it so row 0 lands at the bottom.
    pub fn present(&mut self, buffer: &PixelBuffer<'_>) -> Result<(), RenderError> {
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();

        if !buffer.is_empty() {
            self.ensure_texture(buffer.width(), buffer.height(), buffer.channel_order())?;
            if let Some(texture) = self.texture.as_mut() {
                texture
                    .update(None, buffer.bytes(), buffer.stride_bytes())
                    .map_err(|e| e.to_string())?;
                let target = Rect::new(0, 0, buffer.width(), buffer.height());
                self.canvas
                    .copy_ex(texture, None, Some(target), 0.0, None, false, true)?;
            }
        }

        self.canvas.present();
        Ok(())
    }

    fn ensure_texture(
        &mut self,
        width: u32,
        height: u32,
        channel_order: ChannelOrder,
    ) -> Result<(), RenderError> {
        if self.texture.is_some() && self.texture_size == (width, height) {
            return Ok(());
        }

        let format = match channel_order {
            ChannelOrder::Bgr => PixelFormatEnum::BGR24,
            ChannelOrder::Rgb => PixelFormatEnum::RGB24,
        };

        // Drop the old texture before its replacement is created.
        self.texture = None;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped before texture_creator.
        let texture_creator_ref: &'static TextureCreator<WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(format, width, height)
            .map_err(|e| e.to_string())?;

        log::debug!("streaming texture recreated at {width}x{height} ({format:?})");
        self.texture = Some(texture);
        self.texture_size = (width, height);
        Ok(())
    }
}

/// Maps an SDL event onto a host command.
///
/// - W/S forward/back, A/D left/right, R/F up/down
/// - Ctrl halves the pan step, Shift doubles it
/// - Right mouse drag orbits, wheel dollies
fn translate(event: Event) -> Option<WindowEvent> {
    match event {
        Event::Quit { .. }
        | Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => Some(WindowEvent::Quit),
        Event::Window {
            win_event: SdlWindowEvent::Resized(w, h),
            ..
        } => Some(WindowEvent::Resize(w, h)),
        Event::Window {
            win_event: SdlWindowEvent::Exposed,
            ..
        } => Some(WindowEvent::Expose),
        Event::KeyDown {
            keycode: Some(keycode),
            keymod,
            ..
        } => {
            let direction = match keycode {
                Keycode::W => PanDirection::Forward,
                Keycode::S => PanDirection::Back,
                Keycode::A => PanDirection::Left,
                Keycode::D => PanDirection::Right,
                Keycode::R => PanDirection::Up,
                Keycode::F => PanDirection::Down,
                _ => return None,
            };
            let modifiers = PanModifiers {
                precise: keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD),
                fast: keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD),
            };
            Some(WindowEvent::Pan(direction, modifiers))
        }
        Event::MouseMotion {
            mousestate,
            xrel,
            yrel,
            ..
        } if mousestate.right() => Some(WindowEvent::Orbit(-xrel, -yrel)),
        Event::MouseWheel { y, .. } if y > 0 => Some(WindowEvent::Dolly(DollyDirection::In)),
        Event::MouseWheel { y, .. } if y < 0 => Some(WindowEvent::Dolly(DollyDirection::Out)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::mouse::{MouseState, MouseWheelDirection};

    const RIGHT_BUTTON: u32 = 1 << 2;

    fn key(keycode: Keycode, keymod: Mod) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(keycode),
            scancode: None,
            keymod,
            repeat: false,
        }
    }

    fn drag(buttons: u32, xrel: i32, yrel: i32) -> Event {
        Event::MouseMotion {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mousestate: MouseState::from_sdl_state(buttons),
            x: 0,
            y: 0,
            xrel,
            yrel,
        }
    }

    fn wheel(y: i32) -> Event {
        Event::MouseWheel {
            timestamp: 0,
            window_id: 0,
            which: 0,
            x: 0,
            y,
            direction: MouseWheelDirection::Normal,
            precise_x: 0.0,
            precise_y: y as f32,
            mouse_x: 0,
            mouse_y: 0,
        }
    }

    #[test]
    fn pan_keys_map_to_directions() {
        let plain = PanModifiers::default();
        let cases = [
            (Keycode::W, PanDirection::Forward),
            (Keycode::S, PanDirection::Back),
            (Keycode::A, PanDirection::Left),
            (Keycode::D, PanDirection::Right),
            (Keycode::R, PanDirection::Up),
            (Keycode::F, PanDirection::Down),
        ];
        for (keycode, direction) in cases {
            assert_eq!(
                translate(key(keycode, Mod::NOMOD)),
                Some(WindowEvent::Pan(direction, plain)),
                "{keycode:?}"
            );
        }
        assert_eq!(translate(key(Keycode::Q, Mod::NOMOD)), None);
    }

    #[test]
    fn ctrl_and_shift_set_pan_modifiers() {
        let cases = [
            (Mod::LCTRLMOD, true, false),
            (Mod::RCTRLMOD, true, false),
            (Mod::LSHIFTMOD, false, true),
            (Mod::RSHIFTMOD, false, true),
            (Mod::LCTRLMOD | Mod::LSHIFTMOD, true, true),
            (Mod::CAPSMOD, false, false),
        ];
        for (keymod, precise, fast) in cases {
            assert_eq!(
                translate(key(Keycode::W, keymod)),
                Some(WindowEvent::Pan(
                    PanDirection::Forward,
                    PanModifiers { precise, fast }
                )),
                "{keymod:?}"
            );
        }
    }

    #[test]
    fn right_drag_orbits_with_negated_delta() {
        assert_eq!(
            translate(drag(RIGHT_BUTTON, 3, -7)),
            Some(WindowEvent::Orbit(-3, 7))
        );
        // Left button only, or no button: plain motion is ignored.
        assert_eq!(translate(drag(1, 3, -7)), None);
        assert_eq!(translate(drag(0, 3, -7)), None);
    }

    #[test]
    fn wheel_sign_selects_dolly_direction() {
        assert_eq!(
            translate(wheel(1)),
            Some(WindowEvent::Dolly(DollyDirection::In))
        );
        assert_eq!(
            translate(wheel(-2)),
            Some(WindowEvent::Dolly(DollyDirection::Out))
        );
        assert_eq!(translate(wheel(0)), None);
    }

    #[test]
    fn escape_and_close_quit() {
        assert_eq!(
            translate(key(Keycode::Escape, Mod::NOMOD)),
            Some(WindowEvent::Quit)
        );
        assert_eq!(
            translate(Event::Quit { timestamp: 0 }),
            Some(WindowEvent::Quit)
        );
    }
}
