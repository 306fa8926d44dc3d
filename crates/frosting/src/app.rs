use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use frosting_config::Config;
use frosting_core::MagicalVariant;
use frosting_effects::{Animator, EffectConfig, PointerEvent, QueuedHost, RasterSurface, Surface};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph},
};

use crate::render::{self, Canvas};

const ACCENT: Color = Color::Rgb(0xff, 0xb6, 0xc1);
const CARD_BG: Color = Color::Rgb(0x2a, 0x20, 0x2e);
const CARD_WIDTH: u16 = 38;
const CARD_HEIGHT: u16 = 10;

/// One effect instance with its own frame queue and pixel buffer.
#[derive(Debug)]
struct Layer {
    animator: Animator,
    host: QueuedHost,
    surface: RasterSurface,
    area: Rect,
}

impl Layer {
    fn new(config: EffectConfig, seed: u64) -> Self {
        Self {
            animator: Animator::new(config, seed),
            host: QueuedHost::new(),
            surface: render::surface_for(Rect::default()),
            area: Rect::default(),
        }
    }

    /// Run `config`, or stop when the effect is disabled.
    fn apply(&mut self, config: Option<EffectConfig>) {
        match config {
            Some(config) => {
                self.animator.reconfigure(config, &mut self.host, &self.surface);
                self.animator.activate(&mut self.host, &self.surface);
            }
            None => {
                self.animator.deactivate(&mut self.host);
                self.surface.clear();
            }
        }
    }

    fn resize(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        self.area = area;
        let size = render::logical_size(area);
        if self.animator.is_active() {
            self.animator.on_resize(size, &mut self.surface);
        } else {
            self.surface.resize(size);
        }
    }

    fn tick(&mut self, now_ms: f64) {
        self.animator.pump(&mut self.host, &mut self.surface, now_ms);
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.animator.pointer(event);
    }
}

/// The terminal application: a background, an optional magical overlay,
/// floating glyphs and a sparkle card in the middle.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Where `w` writes the config. The default location when unset.
    config_path: Option<PathBuf>,
    background: Layer,
    magical: Layer,
    floating: Layer,
    sparkles: Layer,
    /// Whether the pointer is over the sparkle card.
    hovering: bool,
    /// Last status message shown in the help line.
    status: Option<String>,
    started: Instant,
}

impl App {
    pub fn new(config: Config, seed: u64, config_path: Option<PathBuf>) -> Self {
        let layer_seed = |offset: u64| seed.wrapping_add(offset);
        Self {
            running: false,
            background: Layer::new(config.background_effect(), layer_seed(0)),
            magical: Layer::new(
                EffectConfig::Magical(config.magical.to_config()),
                layer_seed(1),
            ),
            floating: Layer::new(
                EffectConfig::Floating(config.floating.to_config()),
                layer_seed(2),
            ),
            sparkles: Layer::new(
                EffectConfig::Sparkles(config.sparkles.to_config()),
                layer_seed(3),
            ),
            config,
            config_path,
            hovering: false,
            status: None,
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.start(Rect::new(0, 0, size.width, size.height));
        let frame_interval =
            Duration::from_secs_f64(1.0 / f64::from(self.config.frame_rate.max(1)));

        while self.running {
            self.tick(self.started.elapsed().as_secs_f64() * 1000.0);
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(frame_interval)?;
        }
        self.stop();
        Ok(())
    }

    /// Lay out every layer over `area` and start the enabled effects.
    fn start(&mut self, area: Rect) {
        self.layout(area);
        self.background.apply(Some(self.config.background_effect()));
        self.magical.apply(self.config.magical_effect());
        self.floating.apply(self.config.floating_effect());
        self.sparkles.apply(self.config.sparkle_effect());
        self.running = true;
        tracing::info!(
            width = area.width,
            height = area.height,
            background = %self.config.background.variant,
            "started"
        );
    }

    fn stop(&mut self) {
        for layer in self.layers_mut() {
            layer.apply(None);
        }
        tracing::info!("stopped");
    }

    fn layers_mut(&mut self) -> [&mut Layer; 4] {
        [
            &mut self.background,
            &mut self.magical,
            &mut self.floating,
            &mut self.sparkles,
        ]
    }

    fn layout(&mut self, area: Rect) {
        self.background.resize(area);
        self.magical.resize(area);
        self.floating.resize(area);
        self.sparkles.resize(card_area(area));
    }

    fn tick(&mut self, now_ms: f64) {
        for layer in self.layers_mut() {
            layer.tick(now_ms);
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area != self.background.area {
            self.layout(area);
        }

        let mut canvas = Canvas::new(area);
        for layer in [&self.background, &self.magical, &self.floating] {
            canvas.composite(&layer.surface, layer.area);
        }
        frame.render_widget(Paragraph::new(canvas.lines()), area);
        for layer in [&self.background, &self.magical, &self.floating] {
            render::draw_glyphs(frame.buffer_mut(), &layer.surface, layer.area);
        }

        self.render_card(frame);
        render::draw_glyphs(frame.buffer_mut(), &self.sparkles.surface, self.sparkles.area);

        if area.height > 0 {
            let help_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            frame.render_widget(self.help_line(), help_area);
        }
    }

    fn render_card(&self, frame: &mut Frame) {
        let card = self.sparkles.area;
        if card.is_empty() {
            return;
        }
        let config = &self.config;
        let magical = if config.magical.enabled {
            config.magical.variant.name()
        } else {
            "off"
        };
        let sparkles = if config.sparkles.enabled {
            config.sparkles.trigger.name()
        } else {
            "off"
        };
        let floating = if config.floating.enabled {
            config.floating.to_config().direction.name()
        } else {
            "off"
        };
        let row = |label: &'static str, value: String| {
            Line::from(vec![
                format!("{label:<12}").dark_gray(),
                value.fg(ACCENT),
            ])
        };
        let lines = vec![
            Line::from(""),
            row(
                "background",
                format!("{} · {}", config.background.variant, config.background.speed),
            ),
            row("sparkles", sparkles.to_string()),
            row("floating", floating.to_string()),
            row("magical", magical.to_string()),
            Line::from(""),
            Line::from("hover or click for sparkles".dark_gray().italic()).centered(),
        ];
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(ACCENT))
            .title(Line::from(" frosting ".bold().fg(ACCENT)).centered());
        let card_widget = Paragraph::new(lines)
            .block(block)
            .style(Style::new().bg(CARD_BG))
            .alignment(Alignment::Left);
        frame.render_widget(card_widget, card);
    }

    fn help_line(&self) -> Line<'static> {
        let mut spans = vec![
            "q".bold().fg(ACCENT),
            " quit  ".dark_gray(),
            "v".bold().fg(ACCENT),
            " variant  ".dark_gray(),
            "s".bold().fg(ACCENT),
            " speed  ".dark_gray(),
            "t".bold().fg(ACCENT),
            " trigger  ".dark_gray(),
            "d".bold().fg(ACCENT),
            " direction  ".dark_gray(),
            "m".bold().fg(ACCENT),
            " magical  ".dark_gray(),
            "w".bold().fg(ACCENT),
            " save".dark_gray(),
        ];
        if let Some(status) = &self.status {
            spans.push(format!("  {status}").italic().fg(ACCENT));
        }
        Line::from(spans).centered()
    }

    /// Reads the crossterm events until the next frame is due.
    fn handle_crossterm_events(&mut self, frame_interval: Duration) -> color_eyre::Result<()> {
        let deadline = Instant::now() + frame_interval;
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(width, height) => self.layout(Rect::new(0, 0, width, height)),
                Event::FocusLost => self.on_pointer_left(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('v')) => self.cycle_variant(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('t')) => self.cycle_trigger(),
            (_, KeyCode::Char('d')) => self.cycle_direction(),
            (_, KeyCode::Char('m')) => self.cycle_magical(),
            (_, KeyCode::Char('w')) => self.save_config(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let inside = render::to_logical(self.sparkles.area, col, row).is_some();
                if inside != self.hovering {
                    self.hovering = inside;
                    self.sparkles.pointer(if inside {
                        PointerEvent::Enter
                    } else {
                        PointerEvent::Leave
                    });
                }
                if let Some(at) = render::to_logical(self.floating.area, col, row) {
                    self.floating.pointer(PointerEvent::Move(at));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(at) = render::to_logical(self.sparkles.area, col, row) {
                    self.sparkles.pointer(PointerEvent::Click(at));
                }
            }
            _ => {}
        }
    }

    fn on_pointer_left(&mut self) {
        if self.hovering {
            self.hovering = false;
            self.sparkles.pointer(PointerEvent::Leave);
        }
        self.floating.pointer(PointerEvent::Leave);
    }

    /// Cycle through background variants.
    fn cycle_variant(&mut self) {
        self.config.background.variant = self.config.background.variant.next();
        self.background.apply(Some(self.config.background_effect()));
        self.status = None;
    }

    /// Cycle the speed class of the background, sparkles and floating elements together.
    fn cycle_speed(&mut self) {
        let speed = self.config.background.speed.next();
        self.config.background.speed = speed;
        self.config.sparkles.speed = Some(speed);
        self.config.floating.speed = Some(speed);
        self.background.apply(Some(self.config.background_effect()));
        self.apply_sparkles();
        self.floating.apply(self.config.floating_effect());
        self.status = None;
    }

    fn cycle_trigger(&mut self) {
        self.config.sparkles.trigger = self.config.sparkles.trigger.next();
        self.apply_sparkles();
        self.status = None;
    }

    /// Restart the sparkle layer from config. A reseeded layer starts
    /// unhovered, so a pointer still over the card is re-announced.
    fn apply_sparkles(&mut self) {
        self.sparkles.apply(self.config.sparkle_effect());
        if self.hovering {
            self.sparkles.pointer(PointerEvent::Enter);
        }
    }

    fn cycle_direction(&mut self) {
        let direction = self.config.floating.to_config().direction.next();
        self.config.floating.direction = Some(direction);
        self.floating.apply(self.config.floating_effect());
        self.status = None;
    }

    /// Off, then each magical variant in turn, then off again.
    fn cycle_magical(&mut self) {
        let magical = &mut self.config.magical;
        let last = MagicalVariant::ALL.last().copied();
        if !magical.enabled {
            magical.enabled = true;
            magical.variant = MagicalVariant::ALL[0];
        } else if Some(magical.variant) == last {
            magical.enabled = false;
        } else {
            magical.variant = magical.variant.next();
        }
        self.magical.apply(self.config.magical_effect());
        self.status = None;
    }

    fn save_config(&mut self) {
        let path = match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Config::default_path(),
        };
        let result = path.and_then(|path| self.config.save(&path).map(|()| path));
        self.status = Some(match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "config saved");
                format!("saved {}", path.display())
            }
            Err(err) => {
                tracing::warn!(%err, "config not saved");
                format!("save failed: {err}")
            }
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Centered rectangle of the sparkle card, shrunk to fit small terminals.
fn card_area(area: Rect) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use frosting_core::{BackgroundVariant, Trigger};
    use ratatui::{Terminal, backend::TestBackend};
    use tempfile::TempDir;

    use super::*;

    fn app() -> App {
        let mut app = App::new(Config::default(), 9, None);
        app.start(Rect::new(0, 0, 80, 24));
        app
    }

    fn press(app: &mut App, c: char) {
        app.on_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_start_activates_enabled_layers() {
        let app = app();
        assert!(app.running);
        assert!(app.background.animator.is_active());
        assert!(app.floating.animator.is_active());
        assert!(app.sparkles.animator.is_active());
        assert!(!app.magical.animator.is_active());
        assert_eq!(app.sparkles.area, Rect::new(21, 7, CARD_WIDTH, CARD_HEIGHT));
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.on_key_event(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_cycle_variant_reconfigures_background() {
        let mut app = app();
        press(&mut app, 'v');
        assert_eq!(app.config.background.variant, BackgroundVariant::Bubbles);
        assert!(app.background.animator.is_active());
        assert_eq!(app.background.animator.config(), &app.config.background_effect());
    }

    #[test]
    fn test_cycle_magical_wraps_through_off() {
        let mut app = app();
        press(&mut app, 'm');
        assert!(app.magical.animator.is_active());
        for _ in 1..MagicalVariant::ALL.len() {
            press(&mut app, 'm');
            assert!(app.magical.animator.is_active());
        }
        press(&mut app, 'm');
        assert!(!app.config.magical.enabled);
        assert!(!app.magical.animator.is_active());
    }

    #[test]
    fn test_hover_card_toggles_sparkles() {
        let mut app = app();
        app.on_mouse_event(mouse(MouseEventKind::Moved, 40, 12));
        assert!(app.hovering);
        for frame in 0..5 {
            app.tick(f64::from(frame) * 16.0);
        }
        assert!(app.sparkles.animator.population() > 0);

        app.on_mouse_event(mouse(MouseEventKind::Moved, 0, 0));
        assert!(!app.hovering);
    }

    #[test]
    fn test_hover_survives_speed_cycle() {
        let mut app = app();
        app.on_mouse_event(mouse(MouseEventKind::Moved, 40, 12));
        press(&mut app, 's');
        for frame in 0..5 {
            app.tick(f64::from(frame) * 16.0);
        }
        assert!(app.hovering);
        assert!(app.sparkles.animator.population() > 0);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[test]
    fn test_click_bursts_with_click_trigger() {
        let mut app = app();
        press(&mut app, 't');
        assert_eq!(app.config.sparkles.trigger, Trigger::Click);
        app.tick(0.0);
        assert_eq!(app.sparkles.animator.population(), 0);
        app.on_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 12));
        assert_eq!(
            app.sparkles.animator.population(),
            frosting_effects::BURST_SIZE
        );
    }

    #[test]
    fn test_save_writes_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut app = App::new(Config::default(), 1, Some(path.clone()));
        press(&mut app, 'w');
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with("saved")));
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_render_draws_card_and_help() {
        let mut app = app();
        app.tick(0.0);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("frosting"));
        assert!(text.contains("quit"));
        assert!(text.contains("▀"));
    }

    #[test]
    fn test_card_fits_small_terminal() {
        assert_eq!(card_area(Rect::new(0, 0, 20, 4)), Rect::new(0, 0, 20, 4));
        assert_eq!(card_area(Rect::new(0, 0, 0, 0)), Rect::default());
    }
}
