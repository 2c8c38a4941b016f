//! # shaderkeys
//!
//! A small interactive shader sketch: nine fragment shaders, picked with the digit keys
//! `1`..`9`, all fed the same four uniforms every frame:
//!
//! - `u_time`: seconds since start
//! - `onset`: a manual accumulator that grows by 0.1 for every frame the space bar is held
//! - `cent`: the value of the on-screen slider (a fake spectral centroid, 100..4000)
//! - `flux`: a constant 0.5
//!
//! Any key press switches the window to fullscreen; Escape leaves it again.
//!
//! ## Layout
//! - `shaderkeys-engine` decides *what* to draw: selection, parameters, config, slider.
//! - this binary owns the window, the GL context and the event loop, and implements the
//!   engine's `FrameTarget` with glow (`renderer`), plus the slider overlay (`overlay`).
//!
//! ## Files that matter
//! - `assets/sketch.json`: optional; shader list, slider range/placement, canvas size
//! - `assets/shaders/main.vert`: vertex shader shared by all nine programs
//! - `assets/shaders/*.frag`: the nine fragment shaders, in key order
//!
//! Logging tags: [INIT] [CONFIG] [RENDER] [INPUT] [WINDOW] [ERROR]. Nothing is logged per
//! frame; key-driven state changes are.

mod logging;
mod overlay;
mod renderer;
mod validate;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Instant;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, NotCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, WindowBuilder};

use shaderkeys_engine::assets::AssetsRoot;
use shaderkeys_engine::config::{load_sketch_config, ConfigMode, SketchConfig};
use shaderkeys_engine::events::EngineEvent;
use shaderkeys_engine::input::{HeldKeys, KEY_SPACE};
use shaderkeys_engine::RenderState;

use overlay::Overlay;
use renderer::GlRenderer;

const LOG_FILE_ENV: &str = "SHADERKEYS_LOG_FILE";

const USAGE: &str = "usage: shaderkeys [--assets <dir>] [--log-file <path>] [--strict]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    assets: Option<PathBuf>,
    log_file: Option<PathBuf>,
    strict: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut out = CliArgs::default();
    let mut it = args.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--assets" => {
                let p = it.next().ok_or("--assets needs a directory")?;
                out.assets = Some(PathBuf::from(p));
            }
            "--log-file" => {
                let p = it.next().ok_or("--log-file needs a path")?;
                out.log_file = Some(PathBuf::from(p));
            }
            "--strict" => out.strict = true,
            "-h" | "--help" => out.help = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(out)
}

/// Translate a physical key into the ASCII-style code the engine polls.
/// Keys without one (arrows, modifiers, ...) still count as a key press for fullscreen.
fn ascii_key_code(code: KeyCode) -> Option<u32> {
    let c = match code {
        KeyCode::Space => KEY_SPACE,
        KeyCode::Digit0 => 48,
        KeyCode::Digit1 => 49,
        KeyCode::Digit2 => 50,
        KeyCode::Digit3 => 51,
        KeyCode::Digit4 => 52,
        KeyCode::Digit5 => 53,
        KeyCode::Digit6 => 54,
        KeyCode::Digit7 => 55,
        KeyCode::Digit8 => 56,
        KeyCode::Digit9 => 57,
        KeyCode::Enter => 13,
        KeyCode::Escape => 27,
        KeyCode::Tab => 9,
        KeyCode::Backspace => 8,
        _ => return None,
    };
    Some(c)
}

/// Code to track in `HeldKeys`, if any. Unidentified keys are never tracked.
fn held_key_code(key: PhysicalKey) -> Option<u32> {
    match key {
        PhysicalKey::Code(code) => ascii_key_code(code),
        PhysicalKey::Unidentified(_) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressAction {
    LeaveFullscreen,
    KeyPressed,
}

/// What a fresh (non-repeat) press does. Escape leaves fullscreen; every other key,
/// unidentified ones included, counts as a key press.
fn press_action(key: PhysicalKey, fullscreen: bool) -> PressAction {
    if fullscreen && key == PhysicalKey::Code(KeyCode::Escape) {
        PressAction::LeaveFullscreen
    } else {
        PressAction::KeyPressed
    }
}

fn log_engine_events(events: Vec<EngineEvent>, cfg: &SketchConfig) {
    for ev in events {
        match ev {
            EngineEvent::ShaderSelected { from, to } => {
                let path = cfg.shader_paths.get(to.index()).map(|p| p.display().to_string());
                logi!("INPUT", "{from} -> {to} ({})", path.unwrap_or_default());
            }
            EngineEvent::SurfaceResized { width, height } => {
                logi!("WINDOW", "canvas resized -> {width}x{height}");
            }
            EngineEvent::FullscreenRequested => {
                logi!("WINDOW", "fullscreen requested (because key pressed)");
            }
            EngineEvent::SliderReleased { value } => {
                logi!("INPUT", "centroid slider -> {value}");
            }
        }
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<SketchConfig> {
    let assets = AssetsRoot::discover(args.assets.as_deref(), Path::new(env!("CARGO_MANIFEST_DIR")))?;
    logi!("INIT", "assets base: {}", assets.path().display());

    let mode = if args.strict { ConfigMode::Strict } else { ConfigMode::Lenient };
    let cfg = load_sketch_config(&assets, mode)?;
    if cfg.from_file {
        logi!("CONFIG", "loaded {} ({:?})", cfg.path.display(), mode);
    } else {
        logi!("CONFIG", "{} not found, using built-in defaults", cfg.path.display());
    }

    let issues = validate::validate_sketch(&cfg);
    validate::emit_issues("CONFIG", &issues);
    validate::emit_summary("CONFIG", "sketch.json", &issues);
    if validate::has_errors(&issues) {
        anyhow::bail!("sketch.json has errors; see above");
    }
    Ok(cfg)
}

fn run(cfg: SketchConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().map_err(|e| anyhow::anyhow!("EventLoop::new failed: {e}"))?;
    let window_builder = WindowBuilder::new()
        .with_title(cfg.title.clone())
        .with_inner_size(LogicalSize::new(cfg.canvas.width as f64, cfg.canvas.height as f64));

    let template = ConfigTemplateBuilder::new().with_alpha_size(8).with_depth_size(0);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            configs
                .reduce(|a, b| if a.num_samples() > b.num_samples() { a } else { b })
                .expect("display offered no GL configs")
        })
        .map_err(|e| anyhow::anyhow!("Failed to build display: {e}"))?;

    let window = window.ok_or_else(|| anyhow::anyhow!("No window created"))?;

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));

    let not_current_gl_context: NotCurrentContext = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .map_err(|e| anyhow::anyhow!("create_context failed: {e}"))?
    };

    let size = window.inner_size();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        window.raw_window_handle(),
        NonZeroU32::new(size.width.max(1)).unwrap_or(NonZeroU32::MIN),
        NonZeroU32::new(size.height.max(1)).unwrap_or(NonZeroU32::MIN),
    );

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &attrs)
            .map_err(|e| anyhow::anyhow!("create_window_surface failed: {e}"))?
    };

    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .map_err(|e| anyhow::anyhow!("make_current failed: {e}"))?;

    if cfg.vsync {
        gl_surface
            .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            .ok();
    }

    let gl = unsafe {
        glow::Context::from_loader_function(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(&name) as *const _,
            Err(_) => std::ptr::null(),
        })
    };

    let bank = unsafe { renderer::load_shader_bank(&gl, &cfg)? };
    let overlay = Overlay::new(&gl, cfg.slider.visible)?;
    let mut renderer = GlRenderer::new(gl)?;

    let mut state = RenderState::from_config(bank, &cfg);
    state.resize(size.width, size.height);
    state.drain_events();
    logi!(
        "INIT",
        "canvas {}x{} | slider [{}, {}] starts at {} | onset {} (+{} per frame held)",
        size.width,
        size.height,
        cfg.slider.min,
        cfg.slider.max,
        state.centroid(),
        state.onset(),
        cfg.onset.step
    );
    logi!("RENDER", "active {} (press 1-9 to switch, hold space for onset)", state.current());

    let mut keys = HeldKeys::new();
    let mut cursor = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    let mut scale = window.scale_factor() as f32;
    let start = Instant::now();

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => target.exit(),

                    WindowEvent::Focused(false) => {
                        keys.clear();
                        state.slider_pointer_up();
                    }

                    WindowEvent::KeyboardInput { event, .. } => {
                        let ascii = held_key_code(event.physical_key);

                        match event.state {
                            ElementState::Pressed => {
                                if let Some(c) = ascii {
                                    keys.press(c);
                                }
                                if event.repeat {
                                    return;
                                }
                                match press_action(event.physical_key, window.fullscreen().is_some()) {
                                    PressAction::LeaveFullscreen => {
                                        window.set_fullscreen(None);
                                        state.on_fullscreen_left();
                                        logi!("WINDOW", "fullscreen -> off (because Escape pressed)");
                                    }
                                    PressAction::KeyPressed => {
                                        if state.on_key_pressed() {
                                            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                                        }
                                    }
                                }
                            }
                            ElementState::Released => {
                                if let Some(c) = ascii {
                                    keys.release(c);
                                }
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        let p = position.to_logical::<f32>(scale as f64);
                        cursor = (p.x, p.y);
                        state.slider_pointer_moved(cursor.0);
                    }

                    WindowEvent::MouseInput { state: btn, button: MouseButton::Left, .. } => match btn {
                        ElementState::Pressed => {
                            state.slider_pointer_down(cursor.0, cursor.1);
                        }
                        ElementState::Released => state.slider_pointer_up(),
                    },

                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        scale = scale_factor as f32;
                    }

                    WindowEvent::Resized(new_size) => {
                        if let (Some(w), Some(h)) = (NonZeroU32::new(new_size.width), NonZeroU32::new(new_size.height)) {
                            gl_surface.resize(&gl_context, w, h);
                        }
                        state.resize(new_size.width, new_size.height);
                        if state.is_fullscreen() && window.fullscreen().is_none() {
                            state.on_fullscreen_left();
                        }
                    }

                    WindowEvent::RedrawRequested => {
                        let (w, h) = state.canvas_size();
                        renderer.begin_frame(w, h);
                        state.frame(&keys, start.elapsed(), &mut renderer);
                        renderer.end_frame();

                        overlay.draw(renderer.gl(), renderer.vao(), state.slider(), (w, h), scale);

                        if let Err(e) = gl_surface.swap_buffers(&gl_context) {
                            loge!("ERROR", "swap_buffers failed: {e}");
                            target.exit();
                        }
                    }

                    _ => {}
                },

                Event::AboutToWait => {
                    log_engine_events(state.drain_events(), &cfg);
                    window.request_redraw();
                }

                _ => {}
            }
        })
        .map_err(|e| anyhow::anyhow!("Event loop failed: {e}"))?;

    Ok(())
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return;
    }

    let log_file = args.log_file.clone().or_else(|| {
        std::env::var(LOG_FILE_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    });
    if let Err(e) = logging::init(log_file.as_deref()) {
        logw!("INIT", "failed to open log file sink: {e}");
    }

    let result = load_config(&args).and_then(run);
    if let Err(e) = result {
        loge!("ERROR", "{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    fn args(list: &[&str]) -> Result<CliArgs, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags() {
        let a = args(&["--assets", "/tmp/a", "--strict", "--log-file", "run.log"]).unwrap();
        assert_eq!(a.assets, Some(PathBuf::from("/tmp/a")));
        assert_eq!(a.log_file, Some(PathBuf::from("run.log")));
        assert!(a.strict);
        assert!(!a.help);
        assert_eq!(args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn rejects_unknown_or_incomplete_flags() {
        assert!(args(&["--assets"]).is_err());
        assert!(args(&["--fps", "60"]).is_err());
    }

    #[test]
    fn digits_and_space_use_ascii_codes() {
        assert_eq!(ascii_key_code(KeyCode::Digit1), Some(49));
        assert_eq!(ascii_key_code(KeyCode::Digit9), Some(57));
        assert_eq!(ascii_key_code(KeyCode::Space), Some(32));
        assert_eq!(ascii_key_code(KeyCode::Numpad1), None);
        assert_eq!(ascii_key_code(KeyCode::ArrowUp), None);
    }

    #[test]
    fn unidentified_keys_still_count_as_a_press() {
        let key = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(held_key_code(key), None);
        assert_eq!(press_action(key, false), PressAction::KeyPressed);
        assert_eq!(press_action(key, true), PressAction::KeyPressed);
    }

    #[test]
    fn escape_only_leaves_fullscreen_when_in_it() {
        let esc = PhysicalKey::Code(KeyCode::Escape);
        assert_eq!(press_action(esc, true), PressAction::LeaveFullscreen);
        assert_eq!(press_action(esc, false), PressAction::KeyPressed);
        assert_eq!(press_action(PhysicalKey::Code(KeyCode::Digit3), true), PressAction::KeyPressed);
        assert_eq!(held_key_code(PhysicalKey::Code(KeyCode::Digit3)), Some(51));
    }
}
