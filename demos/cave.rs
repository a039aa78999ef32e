//! Cave walk in a native window.
//!
//! Arrows or `hjkl` move, `+`/`-` change the tile size, Enter carves a new
//! cave, Escape quits.

use std::cell::RefCell;
use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key as WKey, NamedKey},
    window::{Window, WindowId},
};

use transience_demos::{Action, CaveGame, DemoConfig};
use transience_view::{FontCache, Logical, PixelCanvas, Resolution};

const WINDOW_WIDTH: u32 = 960;
const WINDOW_HEIGHT: u32 = 640;

fn main() -> Result<(), Box<dyn Error>> {
    let fonts = Rc::new(RefCell::new(FontCache::bundled()?));
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = CaveApp::new(DemoConfig::default(), fonts);
    event_loop.run_app(&mut app)?;
    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn translate_key(event: &KeyEvent) -> Option<Action> {
    if event.state != ElementState::Pressed {
        return None;
    }
    let action = match &event.logical_key {
        WKey::Named(named) => match named {
            NamedKey::ArrowUp => Action::Move(0, -1),
            NamedKey::ArrowDown => Action::Move(0, 1),
            NamedKey::ArrowLeft => Action::Move(-1, 0),
            NamedKey::ArrowRight => Action::Move(1, 0),
            NamedKey::Enter => Action::Regenerate,
            NamedKey::Escape => Action::Quit,
            _ => return None,
        },
        WKey::Character(s) => match s.as_str() {
            "k" => Action::Move(0, -1),
            "j" => Action::Move(0, 1),
            "h" => Action::Move(-1, 0),
            "l" => Action::Move(1, 0),
            "+" | "=" => Action::ZoomIn,
            "-" => Action::ZoomOut,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

// ---------------------------------------------------------------------------
// CaveApp
// ---------------------------------------------------------------------------

struct CaveApp {
    config: DemoConfig,
    fonts: Rc<RefCell<FontCache>>,
    state: Option<CaveState>,
    failure: Option<Box<dyn Error>>,
}

struct CaveState {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    canvas: PixelCanvas,
    game: CaveGame,
    last_frame: Instant,
}

impl CaveApp {
    fn new(config: DemoConfig, fonts: Rc<RefCell<FontCache>>) -> Self {
        Self {
            config,
            fonts,
            state: None,
            failure: None,
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<CaveState, Box<dyn Error>> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let context = softbuffer::Context::new(window.clone())?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())?;

        let PhysicalSize { width, height } = window.inner_size();
        surface.resize(non_zero(width), non_zero(height))?;

        let screen = Resolution::new(width, height);
        let game = CaveGame::new(self.config.clone(), self.fonts.clone(), screen)?;
        log::info!("cave ready: {}x{} window", width, height);

        Ok(CaveState {
            window,
            surface,
            canvas: PixelCanvas::new(width, height),
            game,
            last_frame: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: Box<dyn Error>) {
        log::error!("cave: {e}");
        self.failure = Some(e);
        event_loop.exit();
    }
}

impl CaveState {
    fn frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_millis().min(u32::MAX as u128) as u32;
        self.last_frame = now;
        self.game.update(elapsed);

        self.game.render(&mut self.canvas);

        let PhysicalSize { width, height } = self.window.inner_size();
        if width == 0 || height == 0 {
            return;
        }
        let mut buf = match self.surface.buffer_mut() {
            Ok(b) => b,
            Err(e) => {
                log::warn!("no frame buffer: {e}");
                return;
            }
        };
        self.canvas
            .blit_to_buffer(&mut buf, width as usize, height as usize);
        if let Err(e) = buf.present() {
            log::warn!("present failed: {e}");
        }
    }
}

impl ApplicationHandler for CaveApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Err(e) = state.surface.resize(non_zero(width), non_zero(height)) {
                    log::warn!("surface resize failed: {e}");
                }
                state.canvas.resize(width, height);
                state.game.resize(Resolution::new(width, height));
            }

            WindowEvent::RedrawRequested => state.frame(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(action) = translate_key(&event) {
                    if !state.game.handle(action) {
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}
