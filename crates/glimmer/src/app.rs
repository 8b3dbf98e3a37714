use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use glimmer_config::{PreferenceStore, save_theme};
use glimmer_core::{Theme, ThemeState};
use glimmer_effects::{Backdrop, BackdropOptions, MOON, Palette, SUN, to_color};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Position, Rect},
    style::{Style, Stylize},
    text::Line,
};

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Current theme and its subscribers.
    theme: ThemeState,
    /// Theme changes waiting to be applied between frames.
    theme_events: Receiver<Theme>,
    /// The rain and particle layers.
    backdrop: Backdrop,
    /// Where the chosen theme is remembered.
    store: Box<dyn PreferenceStore>,
    /// Time between frames.
    frame_interval: Duration,
    /// Clickable moon/sun icon in the top-right corner.
    toggle_area: Rect,
}

impl App {
    /// Construct a new instance of [`App`] for a `cols x rows` terminal.
    pub fn new(
        cols: u16,
        rows: u16,
        theme: Theme,
        options: &BackdropOptions,
        frame_interval_ms: u64,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let mut state = ThemeState::new(theme);
        let theme_events = state.subscribe();
        Self {
            running: false,
            theme: state,
            theme_events,
            backdrop: Backdrop::new(cols, rows, theme, options),
            store,
            frame_interval: Duration::from_millis(frame_interval_ms),
            toggle_area: toggle_area(cols, rows),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.backdrop.start();
        let mut last_frame = Instant::now();
        while self.running {
            self.apply_theme_events();
            if last_frame.elapsed() >= self.frame_interval {
                self.backdrop.tick();
                last_frame = Instant::now();
            }
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(self.frame_interval.saturating_sub(last_frame.elapsed()))?;
        }
        self.backdrop.stop();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        self.backdrop.render(frame);

        let theme = self.theme.get();
        let palette = Palette::for_theme(theme);
        let accent = to_color(palette.primary);
        let background = to_color(palette.background);

        let icon = match theme {
            Theme::Dark => MOON,
            Theme::Light => SUN,
        };
        let icon = Line::from(format!(" {icon} "))
            .style(Style::new().fg(accent).bg(background))
            .bold();
        frame.render_widget(icon, self.toggle_area.intersection(frame.area()));

        let area = frame.area();
        if area.height < 2 {
            return;
        }
        let mut help = vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "t".bold().fg(accent),
            " theme  ".dark_gray(),
            "space".bold().fg(accent),
            " pause".dark_gray(),
        ];
        if !self.backdrop.is_running() {
            help.push("  paused".italic().fg(accent));
        }
        let help_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        frame.render_widget(Line::from(help).centered(), help_area);
    }

    /// Waits up to `timeout` for a crossterm event and handles it.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            self.on_event(event::read()?);
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if self
                    .toggle_area
                    .contains(Position::new(mouse.column, mouse.row)) =>
            {
                self.toggle_theme();
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.backdrop
                    .set_pointer_cell(Some((mouse.column, mouse.row)));
            }
            _ => {}
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.backdrop.resize(cols, rows);
        self.toggle_area = toggle_area(cols, rows);
    }

    fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    /// Apply and remember every theme change published since the last frame.
    fn apply_theme_events(&mut self) {
        while let Ok(theme) = self.theme_events.try_recv() {
            tracing::info!(%theme, "theme applied");
            self.backdrop.apply_theme(theme);
            save_theme(self.store.as_mut(), theme);
        }
    }

    fn toggle_pause(&mut self) {
        let running = self.backdrop.toggle_running();
        tracing::debug!(running, "animation toggled");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// The three cells holding the theme icon, flush with the top-right corner.
fn toggle_area(cols: u16, rows: u16) -> Rect {
    let width = cols.min(3);
    Rect::new(cols - width, 0, width, rows.min(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_config::{MemoryStore, THEME_KEY};
    use ratatui::{Terminal, backend::TestBackend};

    fn app(theme: Theme) -> App {
        let options = BackdropOptions {
            seed: Some(7),
            particle_count: 10,
            ..Default::default()
        };
        App::new(40, 12, theme, &options, 33, Box::new(MemoryStore::new()))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = app(Theme::Dark);
            app.running = true;
            app.on_event(event);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_theme_key_applies_and_persists() {
        let mut app = app(Theme::Dark);
        app.on_event(key(KeyCode::Char('t')));
        // Applied between frames, not inside the handler.
        assert_eq!(app.backdrop.theme(), Theme::Dark);

        app.apply_theme_events();
        assert_eq!(app.theme.get(), Theme::Light);
        assert_eq!(app.backdrop.theme(), Theme::Light);
        assert_eq!(app.store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_click_on_icon_toggles_theme() {
        let mut app = app(Theme::Light);
        app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        app.apply_theme_events();
        assert_eq!(app.theme.get(), Theme::Light);

        app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 38, 0));
        app.apply_theme_events();
        assert_eq!(app.theme.get(), Theme::Dark);
        assert_eq!(app.store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_pointer_follows_mouse() {
        let mut app = app(Theme::Dark);
        app.on_event(mouse(MouseEventKind::Moved, 2, 3));
        let pointer = app.backdrop.particles().and_then(|p| p.pointer());
        assert_eq!(pointer, Some((17.5, 49.0)));
    }

    #[test]
    fn test_space_pauses_and_resumes() {
        let mut app = app(Theme::Dark);
        app.backdrop.start();
        app.on_event(key(KeyCode::Char(' ')));
        assert!(!app.backdrop.is_running());
        app.on_event(key(KeyCode::Char(' ')));
        assert!(app.backdrop.is_running());
    }

    #[test]
    fn test_resize_moves_icon() {
        let mut app = app(Theme::Dark);
        app.on_event(Event::Resize(80, 24));
        assert_eq!(app.toggle_area, Rect::new(77, 0, 3, 1));
        assert_eq!(toggle_area(2, 0), Rect::new(0, 0, 2, 0));
    }

    #[test]
    fn test_render_draws_icon_and_help() {
        let app = app(Theme::Dark);
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(38, 0)].symbol(), MOON.to_string());
        let help: String = (0..40u16).map(|x| buffer[(x, 11)].symbol()).collect();
        assert!(help.contains("quit"));
        assert!(help.contains("paused"));
    }
}
