use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use forecast_terminal::api::Team;
use forecast_terminal::backend::HttpBackend;
use forecast_terminal::config::{self, Config};
use forecast_terminal::controller::{ForecastController, ForecastSink, PredictOutcome};
use forecast_terminal::projection::{ForecastView, PercentBar};
use forecast_terminal::registry::CatalogSource;
use forecast_terminal::selection::Role;
use forecast_terminal::state::{AppState, LoadState};
use forecast_terminal::telemetry;

#[derive(Debug, Default)]
struct TuiSink {
    alert: Option<String>,
    loading: bool,
}

impl ForecastSink for TuiSink {
    // The gallery is drawn straight from the registry each frame.
    fn teams_ready(&mut self, _teams: &[Team], _source: CatalogSource) {}

    fn loading(&mut self, active: bool) {
        self.loading = active;
    }

    fn forecast_ready(&mut self, _view: &ForecastView) {
        self.alert = None;
    }

    fn prediction_failed(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }
}

struct App {
    controller: ForecastController<TuiSink>,
    should_quit: bool,
}

impl App {
    fn new(controller: ForecastController<TuiSink>) -> Self {
        Self {
            controller,
            should_quit: false,
        }
    }

    fn state(&self) -> &AppState {
        self.controller.state()
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.controller.sink().alert.is_some() {
            // The alert is modal until dismissed.
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                self.controller.sink_mut().alert = None;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.controller.state_mut().select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.controller.state_mut().select_prev(),
            KeyCode::Enter => {
                if let Some(id) = self.state().gallery_team().map(|t| t.id) {
                    self.controller.pick(id);
                }
            }
            KeyCode::Char('h') => self.assign_highlighted(Role::Home),
            KeyCode::Char('a') => self.assign_highlighted(Role::Away),
            KeyCode::Char('H') => self.controller.clear(Role::Home),
            KeyCode::Char('A') => self.controller.clear(Role::Away),
            KeyCode::Char('x') => self.controller.reset_selection(),
            KeyCode::Char('c') => {
                let kind = self.controller.cycle_competition();
                self.controller
                    .state_mut()
                    .push_log(format!("[INFO] Competição: {}", kind.label()));
            }
            KeyCode::Char('p') => self.request_prediction(),
            KeyCode::Char('r') => {
                if !self.controller.load_teams() {
                    self.controller
                        .state_mut()
                        .push_log("[INFO] Team load already running");
                }
            }
            KeyCode::Char('?') => {
                let state = self.controller.state_mut();
                state.help_overlay = !state.help_overlay;
            }
            KeyCode::Esc => self.controller.state_mut().help_overlay = false,
            _ => {}
        }
    }

    fn assign_highlighted(&mut self, role: Role) {
        let Some(id) = self.state().gallery_team().map(|t| t.id) else {
            return;
        };
        self.controller.assign(role, Some(id));
    }

    fn request_prediction(&mut self) {
        // Mirrors a disabled button: nothing happens unless the pair is valid.
        if !self.controller.can_predict() {
            self.controller
                .state_mut()
                .push_log("[INFO] Pick two different teams first");
            return;
        }
        match self.controller.predict() {
            PredictOutcome::Started { seq } => self
                .controller
                .state_mut()
                .push_log(format!("[INFO] Prediction #{seq} sent")),
            PredictOutcome::Busy | PredictOutcome::NotReady | PredictOutcome::Failed => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    telemetry::init_for_tui()?;
    let cfg = Config::from_env();
    let backend = Arc::new(HttpBackend::new(&cfg));
    let mut controller = ForecastController::spawn(cfg, backend, TuiSink::default());
    controller.check_health();
    controller.load_teams();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(controller);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.controller.shutdown();
    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.controller.pump();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = app.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state, app.controller.sink()))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[1]);
    render_left(frame, body[0], state);
    render_forecast(frame, body[1], state);

    let console = Paragraph::new(console_text(state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if let Some(alert) = app.controller.sink().alert.as_deref() {
        render_alert(frame, frame.size(), alert);
    }
}

fn header_text(state: &AppState, sink: &TuiSink) -> String {
    let mut title = format!(
        "PREVISÃO DE PARTIDAS | Competição: {}",
        state.competition.label()
    );
    if let Some(status) = state.backend_status.as_deref() {
        title.push_str(&format!(" | API: {status}"));
    }
    let activity = if sink.loading {
        "Gerando previsão..."
    } else if state.teams_load == LoadState::InFlight {
        "Carregando times..."
    } else {
        ""
    };
    let line1 = format!("  .-.  {title}");
    let line2 = format!(" /___\\ {activity}");
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text() -> String {
    "j/k Move | Enter Pick | h/a Set home/away | H/A Clear | x Reset | c Competition | p Predict | r Reload | ? Help | q Quit".to_string()
}

fn render_left(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);
    render_gallery(frame, sections[0], state);
    render_slots(frame, sections[1], state);
}

fn render_gallery(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.registry.source() {
        Some(CatalogSource::Backend) => "Times",
        Some(CatalogSource::Fallback) => "Times (amostra offline)",
        None => "Times",
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let teams = state.registry.teams();
    if inner.height == 0 {
        return;
    }
    if teams.is_empty() {
        let placeholder = Paragraph::new("Carregando times...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.gallery_selected, teams.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let team = &teams[idx];
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let mut style = Style::default();
        if state.selection.home() == Some(team.id) {
            style = style.fg(Color::Green);
        } else if state.selection.away() == Some(team.id) {
            style = style.fg(Color::Red);
        }
        if idx == state.gallery_selected {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        let frame_row = Paragraph::new(gallery_row(team)).style(style);
        frame.render_widget(frame_row, row_area);
    }
}

fn gallery_row(team: &Team) -> String {
    let games = team
        .matches_played
        .map(|n| format!(" J{n}"))
        .unwrap_or_default();
    format!(
        "{:<18} {:>3}%  Atq {:.2}  Def {:.2}{games}",
        team.name, team.confidence, team.attack, team.defense
    )
}

fn render_slots(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    for role in [Role::Home, Role::Away] {
        match state.team_for(role) {
            Some(team) => {
                lines.push(format!("{}: {}", role.label(), team.name));
                lines.push(format!(
                    "  Ataque: {:.2} | Defesa: {:.2}",
                    team.attack, team.defense
                ));
            }
            None => {
                lines.push(format!("{}: Selecione...", role.label()));
                lines.push(String::new());
            }
        }
    }
    let ready = if state.selection.can_predict() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title("Partida")
        .borders(Borders::ALL)
        .border_style(ready);
    frame.render_widget(Paragraph::new(lines.join("\n")).block(block), area);
}

fn render_forecast(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.forecast.as_ref() else {
        let empty = Paragraph::new("Selecione dois times e pressione p para gerar a previsão")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Previsão").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let block = Block::default()
        .title(format!("{}  [{}]", view.match_label, view.confidence_label))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Min(3),
        ])
        .split(inner);

    frame.render_widget(outcome_chart(view), rows[0]);

    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);
    frame.render_widget(
        Paragraph::new(goals_text(view)).block(Block::default().title("Gols").borders(Borders::TOP)),
        stats[0],
    );
    frame.render_widget(
        Paragraph::new(cards_text(view))
            .block(Block::default().title("Cartões").borders(Borders::TOP)),
        stats[1],
    );
    frame.render_widget(
        Paragraph::new(corners_text(view))
            .block(Block::default().title("Escanteios").borders(Borders::TOP)),
        stats[2],
    );

    frame.render_widget(
        Paragraph::new(scorelines_text(view))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Placares mais prováveis")
                    .borders(Borders::TOP),
            ),
        rows[2],
    );
}

fn outcome_chart(view: &ForecastView) -> BarChart<'static> {
    let bar = |label: &'static str, pct: &PercentBar, color: Color| {
        Bar::default()
            .label(Line::from(label))
            .value(pct.value.max(0.0).round() as u64)
            .text_value(pct.label.clone())
            .style(Style::default().fg(color))
    };
    let bars = [
        bar("Casa", &view.outcome.home, Color::Green),
        bar("Empate", &view.outcome.draw, Color::Yellow),
        bar("Fora", &view.outcome.away, Color::Red),
    ];
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn goals_text(view: &ForecastView) -> String {
    let g = &view.goals;
    let mut text = format!(
        "Casa {}  Fora {}\nTotal {}\nOver 1.5 {}\nOver 2.5 {}\nAmbos marcam {}",
        g.home_avg, g.away_avg, g.total_avg, g.over_1_5, g.over_2_5, g.btts
    );
    if let Some(over) = view.extras.goals_over_3_5.as_deref() {
        text.push_str(&format!("\nOver 3.5 {over}"));
    }
    text
}

fn cards_text(view: &ForecastView) -> String {
    let c = &view.cards;
    let mut text = format!(
        "Casa {}  Fora {}\nOver 4.5 {}",
        c.home_avg, c.away_avg, c.over_4_5
    );
    if let Some(total) = view.extras.cards_total_avg {
        text.push_str(&format!("\nTotal {total}"));
    }
    if let Some(over) = view.extras.cards_over_3_5.as_deref() {
        text.push_str(&format!("\nOver 3.5 {over}"));
    }
    text
}

fn corners_text(view: &ForecastView) -> String {
    let c = &view.corners;
    let mut text = format!(
        "Casa {}  Fora {}\nOver 10.5 {}",
        c.home_avg, c.away_avg, c.over_10_5
    );
    if let Some(total) = view.extras.corners_total_avg {
        text.push_str(&format!("\nTotal {total}"));
    }
    if let Some(over) = view.extras.corners_over_8_5.as_deref() {
        text.push_str(&format!("\nOver 8.5 {over}"));
    }
    text
}

fn scorelines_text(view: &ForecastView) -> String {
    if view.scorelines.is_empty() {
        return "Sem placares".to_string();
    }
    let cells = view
        .scorelines
        .iter()
        .map(|s| format!("{:>5} {:>6}", s.scoreline, s.probability))
        .collect::<Vec<_>>();
    let mut text = cells
        .chunks(4)
        .map(|row| row.join("   "))
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(n) = view.extras.simulations {
        text.push_str(&format!("\n\n{n} simulações"));
    }
    text
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);
    let alert = Paragraph::new(format!("{message}\n\n[Enter/Esc] OK"))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(Block::default().title("Erro").borders(Borders::ALL));
    frame.render_widget(alert, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Previsão de Partidas - Help",
        "",
        "Teams:",
        "  j/k or ↑/↓   Move in gallery",
        "  Enter        Pick (fills home, then away)",
        "  h / a        Set highlighted as home / away",
        "  H / A        Clear home / away",
        "  x            Clear both",
        "  r            Reload teams",
        "",
        "Forecast:",
        "  c            Cycle competition type",
        "  p            Generate prediction",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
