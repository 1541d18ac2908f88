//! Window + event-loop runner.
//!
//! Owns the winit event loop and the `pixels` framebuffer; the game supplies
//! an [`App`] and only ever sees key presses, `update(dt)` ticks and a
//! [`Frame`](crate::graphics::Frame) to draw into. The framebuffer keeps the
//! configured logical resolution; `pixels` scales it to the window.

use std::error::Error;
use std::time::Instant;

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::graphics::Frame;

pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// What the app wants the loop to do after an update tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Exit,
}

pub trait App {
    fn key_pressed(&mut self, key: VirtualKeyCode);
    fn update(&mut self, dt: std::time::Duration) -> AppFlow;
    fn draw(&mut self, frame: &mut Frame);
}

pub fn run_app<A: App + 'static>(config: AppConfig, mut app: A) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels: Pixels =
        PixelsBuilder::new(config.width, config.height, surface_texture).build()?;

    let (buf_width, buf_height) = (config.width, config.height);
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if size.width > 0 && size.height > 0 {
                        if let Err(err) = pixels.resize_surface(size.width, size.height) {
                            eprintln!("resize failed: {err}");
                        }
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    app.key_pressed(*key);
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                if app.update(dt) == AppFlow::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                {
                    let mut frame = Frame::new(pixels.frame_mut(), buf_width, buf_height);
                    app.draw(&mut frame);
                }
                if let Err(err) = pixels.render() {
                    eprintln!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
