use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{Terminal, prelude::Backend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    POLL_INTERVAL, REFRESH_INTERVAL,
    command::Command,
    poll::Poller,
    ui::{PendingAction, Tab, Ui},
};

/// The main application runner: drives the render loop, translates key
/// and mouse input into UI state changes and orchestrator commands, and
/// coordinates shutdown.
pub(crate) struct Runner {
    pub(crate) version: String,
    pub(crate) poller: Poller,
    pub(crate) commands: mpsc::UnboundedSender<Command>,
    pub(crate) shutdown: CancellationToken,
}

impl Runner {
    /// Drive the event loop until the user quits. Returns `true` when the
    /// user explicitly asked to exit.
    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> anyhow::Result<bool> {
        let mut ui = self.initialize_ui();
        let mut state = EventLoopState::new();

        loop {
            self.update_and_render(&mut ui, &mut state, terminal)?;

            if state.exit_requested {
                break;
            }

            self.handle_events(&mut ui, &mut state)?;
        }

        terminal.draw(|frame| ui.render(frame))?;
        Ok(state.exit_requested)
    }

    fn initialize_ui(&mut self) -> Ui {
        let mut ui = Ui::default();
        ui.set_version(&self.version);
        self.poller.poll(&mut ui);
        ui
    }

    /// Render when new data arrived (dirty flag) or the refresh interval
    /// elapsed since the last frame.
    fn update_and_render<B: Backend>(
        &mut self,
        ui: &mut Ui,
        state: &mut EventLoopState,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        state.dirty |= self.poller.poll(ui);
        let should_render = state.dirty || state.last_render.elapsed() >= REFRESH_INTERVAL;

        if should_render {
            terminal.draw(|frame| ui.render(frame))?;
            state.last_render = Instant::now();
            state.dirty = false;
        }

        Ok(())
    }

    fn handle_events(&mut self, ui: &mut Ui, state: &mut EventLoopState) -> anyhow::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    self.handle_key_event(key, ui, state);
                }
                Event::Resize(_, _) => {
                    self.handle_resize_event(state);
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse_event(mouse, ui, state);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: event::KeyEvent, ui: &mut Ui, state: &mut EventLoopState) {
        let is_ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));

        if is_ctrl_c {
            self.request_exit(state);
            return;
        }

        if ui.exit_prompt_visible() {
            self.handle_exit_prompt_keys(key, ui, state);
            return;
        }

        if ui.confirm_visible() {
            self.handle_confirm_keys(key, ui, state);
            return;
        }

        self.handle_normal_keys(key, ui, state);
    }

    /// Keys while the exit confirmation prompt is up.
    fn handle_exit_prompt_keys(&mut self, key: event::KeyEvent, ui: &mut Ui, state: &mut EventLoopState) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.request_exit(state);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.dirty |= ui.hide_overlay();
            }
            _ => {}
        }
    }

    /// Keys while a destructive-command confirmation is up.
    fn handle_confirm_keys(&mut self, key: event::KeyEvent, ui: &mut Ui, state: &mut EventLoopState) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(action) = ui.take_pending_action() {
                    self.dispatch(action);
                }
                state.dirty = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.dirty |= ui.hide_overlay();
            }
            _ => {}
        }
    }

    fn handle_normal_keys(&mut self, key: event::KeyEvent, ui: &mut Ui, state: &mut EventLoopState) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.dirty |= ui.show_exit_prompt();
            }
            KeyCode::Char('1') => {
                ui.set_active_tab(Tab::Traces);
                state.dirty = true;
            }
            KeyCode::Char('2') => {
                ui.set_active_tab(Tab::Graph);
                state.dirty = true;
            }
            KeyCode::Char('3') => {
                ui.set_active_tab(Tab::Analytics);
                state.dirty = true;
            }
            KeyCode::Char('4') => {
                ui.set_active_tab(Tab::Activity);
                state.dirty = true;
            }
            KeyCode::Tab => {
                ui.focus_next_section();
                state.dirty = true;
            }
            KeyCode::BackTab => {
                ui.focus_previous_section();
                state.dirty = true;
            }
            KeyCode::Up => {
                ui.handle_vertical_navigation(-1);
                state.dirty = true;
            }
            KeyCode::Down => {
                ui.handle_vertical_navigation(1);
                state.dirty = true;
            }
            KeyCode::Enter => {
                if let Some((trace_id, _)) = ui.highlighted_trace() {
                    self.send(Command::SelectTrace(trace_id));
                }
            }
            KeyCode::Char('r') => {
                self.send(Command::Refresh);
            }
            KeyCode::Char('f') => {
                let preset = ui.advance_filter_preset();
                self.send(Command::SetFilter(preset.to_filter()));
                state.dirty = true;
            }
            KeyCode::Char('d') => {
                if let Some((trace_id, name)) = ui.highlighted_trace() {
                    state.dirty |= ui.show_confirm(PendingAction::DeleteTrace { trace_id, name });
                }
            }
            KeyCode::Char('m') => {
                state.dirty |= ui.show_confirm(PendingAction::ResetMetrics);
            }
            KeyCode::Char('X') => {
                state.dirty |= ui.show_confirm(PendingAction::ResetAll);
            }
            _ => {}
        }
    }

    fn handle_resize_event(&self, state: &mut EventLoopState) {
        state.dirty = true;
        let now = Instant::now();
        state.last_render = now.checked_sub(REFRESH_INTERVAL).unwrap_or(now);
    }

    fn handle_mouse_event(&self, mouse: event::MouseEvent, ui: &mut Ui, state: &mut EventLoopState) {
        let is_left_click = matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Up(MouseButton::Left)
        );

        if is_left_click {
            state.dirty |= ui.handle_mouse_click(mouse.column, mouse.row);
        }
    }

    /// Map a confirmed overlay action onto its orchestrator command.
    fn dispatch(&mut self, action: PendingAction) {
        let command = match action {
            PendingAction::DeleteTrace { trace_id, .. } => Command::DeleteTrace(trace_id),
            PendingAction::ResetMetrics => Command::ResetMetrics,
            PendingAction::ResetAll => Command::ResetAll,
        };

        self.send(command);
    }

    fn send(&mut self, command: Command) {
        // The orchestrator going away means we are shutting down anyway.
        let _ = self.commands.send(command);
    }

    fn request_exit(&mut self, state: &mut EventLoopState) {
        self.shutdown.cancel();
        state.exit_requested = true;
    }
}

/// Internal state for the event loop.
struct EventLoopState {
    last_render: Instant,
    exit_requested: bool,
    dirty: bool,
}

impl EventLoopState {
    fn new() -> Self {
        Self {
            last_render: Instant::now(),
            exit_requested: false,
            dirty: true,
        }
    }
}
