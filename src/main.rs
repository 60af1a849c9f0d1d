use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType,
    Paragraph, Wrap,
};

use cricpredict::config::AppConfig;
use cricpredict::dashboard::{CardTone, DashboardView, StatCard, format_number};
use cricpredict::gemini::GeminiClient;
use cricpredict::inputs::FormField;
use cricpredict::state::{self, AppState, Phase, ProviderCommand, apply_delta};
use cricpredict::worker::spawn_provider;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    ticks: usize,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>, cfg: &AppConfig) -> Self {
        let mut state = AppState::new();
        state.model_label = cfg.model.clone();
        if cfg.api_key.is_none() {
            state.push_log("[WARN] GEMINI_API_KEY is not set; predictions will fail");
        }
        Self {
            state,
            should_quit: false,
            cmd_tx,
            ticks: 0,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.state.help_overlay = false;
            }
            return;
        }

        let typing = self.state.form.focus.is_text();
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.cancel(),
            KeyCode::Tab | KeyCode::Down => self.state.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.focus_prev(),
            KeyCode::Right => self.state.form.cycle_next(),
            KeyCode::Left => self.state.form.cycle_prev(),
            KeyCode::Backspace => self.state.form.pop_char(),
            KeyCode::Char(ch) if typing => self.state.form.push_char(ch),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('j') => self.state.form.focus_next(),
            KeyCode::Char('k') => self.state.form.focus_prev(),
            KeyCode::Char('l') => self.state.form.cycle_next(),
            KeyCode::Char('h') => self.state.form.cycle_prev(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let Some(cmd) = self.state.submit() else {
            return;
        };
        self.send(cmd);
    }

    fn cancel(&mut self) {
        let Some(cmd) = self.state.cancel() else {
            return;
        };
        self.send(cmd);
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Prediction worker is gone");
            self.state.loading = false;
            self.state.inflight = None;
            self.state.error = Some(state::PREDICTION_FAILED_MESSAGE.to_string());
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = AppConfig::from_env();
    let client = match GeminiClient::from_config(&cfg) {
        Ok(client) => client,
        Err(err) => return Err(io::Error::other(format!("{err:#}"))),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _worker = spawn_provider(Arc::new(client), tx, cmd_rx);

    let mut app = App::new(cmd_tx, &cfg);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

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
            app.ticks = app.ticks.wrapping_add(1);
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(40)])
        .split(chunks[1]);

    render_form_column(frame, body[0], app);
    render_results(frame, body[1], app);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let status = match state.phase() {
        Phase::Idle => "AWAITING PARAMETERS",
        Phase::Loading => "RUNNING SIMULATION",
        Phase::Loaded => "REPORT READY",
        Phase::Errored => "ERROR",
    };
    let line1 = format!("  /|   CRICPREDICT AI | {status}");
    let line2 = format!(" /_|   Powered by {}", state.model_label);
    let line3 = "   |".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let year = Local::now().year();
    let keys = if state.form.focus.is_text() {
        "Tab/↑/↓ Move | ←/→ Change | Enter Generate | Esc Cancel | Ctrl-C Quit"
    } else {
        "Tab/j/k Move | ←/→/h/l Change | Enter Generate | Esc Cancel | ? Help | q Quit"
    };
    format!("{keys}   © {year} CricPredict AI. For educational and simulation purposes only.")
}

fn render_form_column(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let error_height = if state.error.is_some() { 4 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(error_height),
        ])
        .split(area);

    let block = Block::default()
        .title("Performance Predictor")
        .borders(Borders::ALL);
    let inner = block.inner(rows[0]);
    frame.render_widget(block, rows[0]);
    render_form_fields(frame, inner, state);

    let (label, style) = if state.loading {
        (
            format!("{} Running Simulation...", SPINNER[app.ticks % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "[ Generate Advanced Report ]".to_string(),
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, rows[1]);

    if let Some(error) = &state.error {
        let banner = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(banner, rows[2]);
    }
}

fn render_form_fields(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in FormField::ALL.iter().copied().enumerate() {
        match idx {
            0 => lines.push(section_line("1. Match Core", Color::Blue)),
            3 => lines.push(section_line("2. Tactical & Environment", Color::Green)),
            7 => lines.push(section_line("3. Player Status", Color::Yellow)),
            _ => {}
        }

        let focused = state.form.focus == field;
        let marker = if focused { "> " } else { "  " };
        let mut value = state.form.value_text(field);
        if field.is_text() {
            if value.is_empty() && !focused {
                value = placeholder(field).to_string();
            } else if focused {
                value.push('_');
            }
        } else {
            value = format!("‹ {value} ›");
        }

        let label_style = Style::default().fg(Color::DarkGray);
        let value_style = if focused {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else if field.is_text() && state.form.value_text(field).is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<15}", field.label()), label_style),
            Span::styled(value, value_style),
        ]));
        if let Some(err) = state.field_error(field) {
            lines.push(Line::from(Span::styled(
                format!("                 {err}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn section_line(title: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        title.to_uppercase(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::BatsmanName => "e.g. Steve Smith",
        FormField::Ground => "Venue...",
        _ => "",
    }
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    if let (Some(result), Some(inputs)) = (&state.result, &state.last_inputs) {
        let view = DashboardView::build(result, &inputs.batsman_name);
        let title = format!("{} vs {}", inputs.batsman_name, inputs.opponent_team);
        render_dashboard(frame, area, &view, &title);
        return;
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let text = if state.loading {
        format!(
            "\n\n{}\n\nAnalyzing player matchups & venue history...",
            SPINNER[app.ticks % SPINNER.len()]
        )
    } else {
        "\n\nAwaiting Parameters\n\nEnter the match details on the left to generate a comprehensive AI-driven performance prediction.".to_string()
    };
    let placeholder = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(placeholder, inner);
}

fn render_dashboard(frame: &mut Frame, area: Rect, view: &DashboardView, title: &str) {
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(50),
            Constraint::Min(8),
        ])
        .split(inner);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(rows[0]);
    for (card, area) in view.cards.iter().zip(cards.iter()) {
        render_stat_card(frame, *area, card);
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);
    render_trajectory(frame, middle[0], view);
    render_milestones(frame, middle[1], view);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_radar(frame, bottom[0], view);
    render_insights(frame, bottom[1], view);
}

fn render_stat_card(frame: &mut Frame, area: Rect, card: &StatCard) {
    let color = tone_color(card.tone);
    let text = vec![
        Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.sub.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(card.label.to_uppercase())
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}

fn tone_color(tone: CardTone) -> Color {
    match tone {
        CardTone::Runs => Color::Blue,
        CardTone::Tempo => Color::Green,
        CardTone::Threat => Color::Red,
        CardTone::Calm => Color::Blue,
        CardTone::Hot => Color::LightRed,
    }
}

fn render_trajectory(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Projected Run Trajectory")
        .borders(Borders::ALL);
    if view.trajectory.is_empty() {
        let empty = Paragraph::new("No phase breakdown")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points: Vec<(f64, f64)> = view.trajectory.iter().map(|p| (p.x, p.runs)).collect();
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let y_max = view.trajectory_ceiling();
    let marker = if points.len() == 1 {
        symbols::Marker::Block
    } else {
        symbols::Marker::Braille
    };
    let datasets = vec![
        Dataset::default()
            .name(view.player_name.clone())
            .marker(marker)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&points),
    ];
    let x_labels: Vec<Span> = view
        .trajectory
        .iter()
        .map(|p| Span::raw(p.phase.clone()))
        .collect();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", y_max / 2.0)),
        Span::raw(format!("{y_max:.0}")),
    ];
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn render_milestones(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Milestone Likelihood")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 3])
        .split(inner);
    let colors = [Color::Blue, Color::Green, Color::Yellow];
    for ((bar, area), color) in view.milestones.iter().zip(rows.iter()).zip(colors) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio((bar.percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{} {}%", bar.label, format_number(bar.percent)));
        frame.render_widget(gauge, *area);
    }
}

fn render_radar(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let bars: Vec<Bar> = view
        .radar
        .iter()
        .map(|axis| {
            Bar::default()
                .label(Line::from(axis.subject))
                .value(axis.value.max(0.0).round() as u64)
                .text_value(format!("{:.0}", axis.value))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Technical Profile")
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100);
    frame.render_widget(chart, area);
}

fn render_insights(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let advice = Paragraph::new(format!("\"{}\"", view.technical_advice))
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Technical Scouting Report")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(advice, rows[0]);

    let lines: Vec<Line> = view
        .insights
        .iter()
        .map(|insight| Line::from(format!("• {insight}")))
        .collect();
    let insights = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Key Strategic Insights")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
    frame.render_widget(insights, rows[1]);
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

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "CricPredict - Help",
        "",
        "Form:",
        "  Tab / ↓ / j      Next field",
        "  Shift-Tab / ↑ / k Previous field",
        "  ← / → / h / l    Change option or batting position",
        "  type             Edit name / venue (when focused)",
        "  Backspace        Delete character",
        "",
        "Prediction:",
        "  Enter            Generate report",
        "  Esc              Cancel running request",
        "",
        "Global:",
        "  ?                Toggle help",
        "  q / Ctrl-C       Quit",
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
