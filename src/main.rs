mod audio;
mod core;
mod playback;
mod resources;
mod store;
mod ui;

use anyhow::{anyhow, Context as _, Result};
use imgui::{Context, FontConfig, FontSource, StyleColor};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::ModifiersState;
use winit::window::{Fullscreen, Window, WindowBuilder};

use glow::HasContext;
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

use crate::audio::{detect_engine, AudioSettings, LogToneSink};
use crate::core::{Course, Engagement};
use crate::playback::Player;
use crate::store::{JsonFileStore, MemoryStore, NoteStore};
use crate::ui::{
    render_chapters, render_toasts, AboutDialog, ContactForm, PlayerAction, PlayerWindow,
    ResourcesWindow, SearchWindow, ShortcutAction, ShortcutManager, SystemClipboard, SEEK_STEP,
};

const APP_DIR: &str = "lesson-player";
const WELCOME_TOAST: &str = "Welcome! Press Ctrl+K to search tutorial content.";

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AppSettings {
    show_chapters: bool,
    show_resources: bool,
    show_contact: bool,
    show_shortcuts: bool,
    volume: f32,
    muted: bool,
    rate: f32,
    liked: bool,
    saved: bool,
    speech_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let audio = AudioSettings::default();
        Self {
            show_chapters: true,
            show_resources: true,
            show_contact: false,
            show_shortcuts: false,
            volume: audio.volume,
            muted: audio.muted,
            rate: 1.0,
            liked: false,
            saved: false,
            speech_enabled: true,
        }
    }
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("settings.json"))
    }

    fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    fn parse(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {}", e);
            Self::default()
        })
    }

    fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    warn!("Failed to save settings to {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize settings: {}", e),
        }
    }
}

struct AppState {
    player: Player,
    player_window: PlayerWindow,
    search: SearchWindow,
    contact: ContactForm,
    resources: ResourcesWindow,
    about_dialog: AboutDialog,
    shortcut_manager: ShortcutManager,
    modifiers: ModifiersState,
    speech_enabled: bool,
    show_chapters: bool,
    show_resources: bool,
    show_contact: bool,
    show_shortcuts: bool,
}

impl AppState {
    fn new(course: Course, runtime: Handle) -> Self {
        let settings = AppSettings::load();

        let engine = detect_engine(settings.speech_enabled, &runtime);
        match &engine {
            Some(engine) => info!("Narration voice: {}", engine.name()),
            None => info!("Narration disabled; subtitles only"),
        }

        let mut player = Player::new(&course, engine, Some(Box::new(LogToneSink)));
        player.restore(
            AudioSettings {
                volume: settings.volume,
                muted: settings.muted,
            },
            settings.rate,
            Engagement {
                liked: settings.liked,
                saved: settings.saved,
            },
        );
        player.notifier_mut().info(WELCOME_TOAST);

        let store: Arc<dyn NoteStore> = match JsonFileStore::default_path() {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => {
                warn!("No data directory; contact messages are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Self {
            search: SearchWindow::new(&course),
            player,
            player_window: PlayerWindow::new(),
            contact: ContactForm::new(store, runtime),
            resources: ResourcesWindow::new(),
            about_dialog: AboutDialog::new(),
            shortcut_manager: ShortcutManager::new(),
            modifiers: ModifiersState::empty(),
            speech_enabled: settings.speech_enabled,
            show_chapters: settings.show_chapters,
            show_resources: settings.show_resources,
            show_contact: settings.show_contact,
            show_shortcuts: settings.show_shortcuts,
        }
    }

    fn save_settings(&self) {
        let audio = self.player.audio();
        let engagement = self.player.engagement();
        let settings = AppSettings {
            show_chapters: self.show_chapters,
            show_resources: self.show_resources,
            show_contact: self.show_contact,
            show_shortcuts: self.show_shortcuts,
            volume: audio.volume,
            muted: audio.muted,
            rate: self.player.rate(),
            liked: engagement.liked,
            saved: engagement.saved,
            speech_enabled: self.speech_enabled,
        };
        settings.save();
    }

    fn toggle_fullscreen(&mut self, window: &Window) {
        if self.player.toggle_fullscreen() {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window.set_fullscreen(None);
        }
    }

    /// Returns true when the app should quit
    fn handle_shortcut(&mut self, action: ShortcutAction, window: &Window) -> bool {
        match action {
            ShortcutAction::TogglePlay => self.player.toggle_play(),
            ShortcutAction::ToggleMute => self.player.toggle_mute(),
            ShortcutAction::SeekForward => self.player.skip(SEEK_STEP),
            ShortcutAction::SeekBackward => self.player.skip(-SEEK_STEP),
            ShortcutAction::CycleRate => {
                self.player.cycle_rate();
            }
            ShortcutAction::OpenSearch => self.search.open(),
            ShortcutAction::CloseSearch => self.search.close(),
            ShortcutAction::ToggleFullscreen => self.toggle_fullscreen(window),
            ShortcutAction::Quit => return true,
        }
        false
    }
}

/// Menu item that shows green text while its window is open
fn toggle_item(ui: &imgui::Ui, label: &str, open: &mut bool) {
    let _tok = if *open {
        Some(ui.push_style_color(StyleColor::Text, [0.0, 1.0, 0.0, 1.0]))
    } else {
        None
    };
    if ui.menu_item(label) {
        *open = !*open;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Runtime for speech timers and note storage
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let _guard = rt.enter();

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    let course_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir.join("course.json"));
    let course = Course::load_or_builtin(Some(&course_path));

    let event_loop = EventLoop::new().map_err(|e| anyhow!("Failed to create event loop: {}", e))?;

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title(format!("{} - Lesson Player", course.title))
                .with_inner_size(winit::dpi::LogicalSize::new(1320.0, 860.0)),
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut iter| {
            iter.next().expect("display offered no GL configs")
        })
        .map_err(|e| anyhow!("Failed to create window and display: {}", e))?;

    let window = window.context("Failed to create window")?;
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new().build(Some(window.raw_window_handle())),
        )
    }
    .context("Failed to create GL context")?;

    let attrs = window.build_surface_attributes(
        glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new(),
    );
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .context("Failed to create surface")?;
    let context = context
        .make_current(&surface)
        .context("Failed to make context current")?;

    let load_gl = || unsafe {
        glow::Context::from_loader_function(|name| match CString::new(name) {
            Ok(name) => gl_display.get_proc_address(&name) as *const _,
            Err(_) => std::ptr::null(),
        })
    };
    let gl = load_gl();
    let gl_clear = load_gl();

    let mut imgui = Context::create();
    imgui.set_log_filename(None::<PathBuf>);

    let ini_path = config_dir.join("layout.ini");
    let _ = fs::create_dir_all(&config_dir);
    imgui.set_ini_filename(Some(ini_path));
    imgui.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;
    // Without a backend imgui keeps copied text to itself
    if let Some(clipboard) = SystemClipboard::init() {
        imgui.set_clipboard_backend(clipboard);
    }

    let hidpi_factor = window.scale_factor();
    let font_size = (14.0 * hidpi_factor) as f32;
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: font_size,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|e| anyhow!("Failed to initialize renderer: {:?}", e))?;

    let mut state = AppState::new(course, rt.handle().clone());
    let mut last_frame_time = Instant::now();
    let mut last_update = Instant::now();
    let mut last_settings_save = Instant::now();

    event_loop
        .run(move |event, window_target| {
            match &event {
                Event::NewEvents(_) => {
                    let now = Instant::now();
                    imgui.io_mut().update_delta_time(now - last_frame_time);
                    last_frame_time = now;
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    state.player.update(now - last_update);
                    last_update = now;
                    state.contact.poll(state.player.notifier_mut());

                    if last_settings_save.elapsed().as_secs() >= 30 {
                        state.save_settings();
                        last_settings_save = Instant::now();
                    }

                    if let Err(e) = platform.prepare_frame(imgui.io_mut(), &window) {
                        error!("Failed to prepare frame: {}", e);
                    }
                    window.request_redraw();
                }
                Event::WindowEvent { event: WindowEvent::ModifiersChanged(modifiers), .. } => {
                    state.modifiers = modifiers.state();
                }
                Event::WindowEvent { event: WindowEvent::KeyboardInput { event: key_event, .. }, .. } => {
                    let mods = state.modifiers;
                    let action = state.shortcut_manager.process_event(
                        key_event,
                        mods.control_key(),
                        mods.shift_key(),
                        mods.alt_key(),
                        imgui.io().want_text_input,
                    );
                    if let Some(action) = action {
                        if state.handle_shortcut(action, &window) {
                            state.save_settings();
                            window_target.exit();
                        }
                    }
                }
                Event::WindowEvent { event: WindowEvent::RedrawRequested, .. } => {
                    let ui: &imgui::Ui = imgui.new_frame();
                    let mut quit = false;
                    let mut fullscreen = false;

                    ui.main_menu_bar(|| {
                        ui.menu("File", || {
                            if ui.menu_item_config("Search...").shortcut("Ctrl+K").build() {
                                state.search.open();
                            }
                            ui.separator();
                            if ui.menu_item_config("Exit").shortcut("Ctrl+Q").build() {
                                quit = true;
                            }
                        });

                        ui.menu("Playback", || {
                            let label = if state.player.is_playing() { "Pause" } else { "Play" };
                            if ui.menu_item_config(label).shortcut("Space").build() {
                                state.player.toggle_play();
                            }
                            if ui.menu_item_config("Back 10s").shortcut("←").build() {
                                state.player.skip(-SEEK_STEP);
                            }
                            if ui.menu_item_config("Forward 10s").shortcut("→").build() {
                                state.player.skip(SEEK_STEP);
                            }
                            ui.separator();
                            let mute = if state.player.audio().muted { "Unmute" } else { "Mute" };
                            if ui.menu_item_config(mute).shortcut("M").build() {
                                state.player.toggle_mute();
                            }
                            if ui.menu_item_config("Change Speed").shortcut("+").build() {
                                state.player.cycle_rate();
                            }
                            ui.text(format!("Speed: {}x", state.player.rate()));
                        });

                        ui.menu("View", || {
                            toggle_item(ui, "Chapters", &mut state.show_chapters);
                            toggle_item(ui, "Resources", &mut state.show_resources);
                            toggle_item(ui, "Contact", &mut state.show_contact);
                            ui.separator();
                            if ui.menu_item_config("Fullscreen").shortcut("F11").build() {
                                fullscreen = true;
                            }
                        });

                        ui.menu("Help", || {
                            toggle_item(ui, "Keyboard Shortcuts", &mut state.show_shortcuts);
                            if ui.menu_item("About") {
                                state.about_dialog.show();
                            }
                        });
                    });

                    ui.dockspace_over_main_viewport();

                    if let Some(PlayerAction::ToggleFullscreen) = state.player_window.render(ui, &mut state.player) {
                        fullscreen = true;
                    }

                    if state.show_chapters {
                        render_chapters(ui, &mut state.player, &mut state.show_chapters);
                    }
                    if state.show_resources {
                        state.resources.render(ui, state.player.notifier_mut(), &mut state.show_resources);
                    }
                    if state.show_contact {
                        state.contact.render(ui, state.player.notifier_mut(), &mut state.show_contact);
                    }
                    state.search.render(ui, &mut state.player);

                    if state.show_shortcuts {
                        state.shortcut_manager.render_help(ui, &mut state.show_shortcuts);
                    }
                    state.about_dialog.render(ui, state.player.voice_name());

                    // Toasts sit above every window
                    render_toasts(ui, state.player.notifier());

                    if fullscreen {
                        state.toggle_fullscreen(&window);
                    }

                    platform.prepare_render(ui, &window);
                    let draw_data = imgui.render();

                    unsafe {
                        gl_clear.clear_color(0.06, 0.06, 0.1, 1.0);
                        gl_clear.clear(glow::COLOR_BUFFER_BIT);
                    }

                    if let Err(e) = renderer.render(draw_data) {
                        error!("Rendering failed: {:?}", e);
                    }
                    if let Err(e) = surface.swap_buffers(&context) {
                        error!("Failed to swap buffers: {}", e);
                    }

                    if quit {
                        state.save_settings();
                        window_target.exit();
                    }
                }
                Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                    state.save_settings();
                    window_target.exit();
                }
                _ => {}
            }

            platform.handle_event(imgui.io_mut(), &window, &event);
        })
        .map_err(|e| anyhow!("Event loop error: {}", e))
}
