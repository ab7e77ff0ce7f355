//! Ratatui-based terminal UI.
//!
//! Two charts side by side (CPD, PSD; log10 diameter on x) over either a data
//! file or a seeded synthetic MIP run. Range conflicts are clamped to the data
//! and every warning lands in the status line.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{Elaboration, RawInput};
use crate::cli::TuiArgs;
use crate::data::{SyntheticSpec, generate_mip_run};
use crate::distribution::ClampResolver;
use crate::domain::{Curve, DistributionConfig, MipPhysicalParams};
use crate::error::{AppError, PoreError};

mod plotters_chart;

use plotters_chart::PoreChart;

/// Interval step for the ←/→ keys.
const INTERVAL_STEP: usize = 5;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    // Load and elaborate before touching the terminal so errors print normally.
    let mut app = App::new(args)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Where the TUI data comes from.
#[derive(Debug, Clone)]
enum Source {
    File(String),
    Synthetic { seed: u64, params: MipPhysicalParams },
}

struct App {
    session: Elaboration,
    /// Grid as asked for; each recompute clamps a fresh copy to the data.
    requested: DistributionConfig,
    source: Source,
    show_normalized: bool,
    show_frequency: bool,
    status: String,
}

impl App {
    fn new(args: TuiArgs) -> Result<Self, AppError> {
        let params = args.mip.params();
        let (source, input) = match &args.file {
            Some(path) => {
                let columns = crate::io::load_columns(path)?;
                let input = if args.mip_file {
                    RawInput::Mip {
                        pressure_psi: columns.first,
                        volume_cc: columns.second,
                        params,
                    }
                } else {
                    RawInput::Curve(Curve::new(columns.first, columns.second)?)
                };
                (Source::File(path.display().to_string()), input)
            }
            None => (
                Source::Synthetic { seed: args.seed, params },
                synthetic_input(args.seed, params)?,
            ),
        };

        let settings = args.dist.settings(args.mip.mode);
        let mut app = Self {
            requested: settings.distribution,
            session: Elaboration::new(settings, input),
            source,
            show_normalized: false,
            show_frequency: false,
            status: String::new(),
        };
        app.try_recompute()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('n') => {
                self.show_normalized = !self.show_normalized;
                self.recompute();
            }
            KeyCode::Char('f') => {
                self.show_frequency = !self.show_frequency;
                self.recompute();
            }
            KeyCode::Left => self.adjust_intervals(false),
            KeyCode::Right => self.adjust_intervals(true),
            KeyCode::Char('r') => match &mut self.source {
                Source::Synthetic { seed, params } => {
                    *seed = seed.wrapping_add(1);
                    self.session.input = synthetic_input(*seed, *params)?;
                    self.recompute();
                }
                Source::File(_) => {
                    self.status = "Reseeding only applies to synthetic data.".to_string();
                }
            },
            _ => {}
        }
        Ok(false)
    }

    fn adjust_intervals(&mut self, up: bool) {
        let intervals = &mut self.requested.intervals;
        *intervals = if up {
            intervals.saturating_add(INTERVAL_STEP)
        } else {
            intervals.saturating_sub(INTERVAL_STEP).max(2)
        };
        self.recompute();
    }

    /// Rerun the pipeline; on failure the previous result stays on screen.
    fn recompute(&mut self) {
        if let Err(err) = self.try_recompute() {
            self.status = format!("error: {err}");
        }
    }

    fn try_recompute(&mut self) -> Result<(), PoreError> {
        self.session.settings.distribution = self.requested;
        self.session.settings.normalize = self.show_normalized;
        self.session.settings.frequency = self.show_frequency;

        let run = self.session.run(&mut ClampResolver)?;
        self.status = match run.warnings.last() {
            Some(w) => format!("warning: {w}"),
            None => format!("ok: {} CPD points", run.cpd.len()),
        };
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let source = match &self.source {
            Source::File(path) => path.clone(),
            Source::Synthetic { seed, .. } => format!("synthetic MIP run (seed {seed})"),
        };
        let mut lines = vec![Line::from(vec![
            Span::styled("psd", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {source}")),
        ])];

        if let Some(run) = &self.session.output {
            let peak = run
                .psd
                .peak()
                .map(|(d, _)| format!("{d:.4} um"))
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(Span::styled(
                format!(
                    "intervals: {} | d=[{:.4}, {:.4}] um | total e={:.4} | dominant pore {peak} | view: {}",
                    run.config.intervals,
                    run.config.dmin,
                    run.config.dmax,
                    run.cpd.total(),
                    self.view_name(),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn view_name(&self) -> &'static str {
        match (self.show_normalized, self.show_frequency) {
            (false, false) => "raw",
            (true, false) => "normalized",
            (false, true) => "frequency",
            (true, true) => "normalized + frequency",
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let Some(run) = &self.session.output else {
            let msg = Paragraph::new("No distribution.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, area);
            return;
        };

        let (cpd_points, psd, reference, cpd_title) = match (&run.normalized, self.show_normalized) {
            (Some(views), true) => (views.cpd.points(), &views.psd, None, "CPD (e / max e)"),
            _ => (run.cpd.points(), &run.psd, run.reference_void_ratio, "CPD"),
        };
        let (psd, psd_title) = match (&run.frequency, self.show_frequency) {
            (Some(freq), true) => (freq, "PSD (frequency)".to_string()),
            _ => (psd, format!("PSD {}", self.session.settings.log_base.label())),
        };

        draw_chart(frame, chunks[0], cpd_title, &cpd_points, reference, "void ratio");
        draw_chart(frame, chunks[1], &psd_title, &psd.points(), None, "frequency");
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ intervals  n normalized  f frequency  r reseed  q quit";
        let color = if self.status.starts_with("ok") {
            Color::Green
        } else {
            Color::Yellow
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn synthetic_input(seed: u64, params: MipPhysicalParams) -> Result<RawInput, AppError> {
    let run = generate_mip_run(&SyntheticSpec {
        seed,
        params,
        ..SyntheticSpec::default()
    })?;
    Ok(RawInput::Mip {
        pressure_psi: run.pressure_psi,
        volume_cc: run.volume_cc,
        params: run.params,
    })
}

fn draw_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    points: &[(f64, f64)],
    reference: Option<f64>,
    y_label: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);
    frame.render_widget(PoreChart::new(points, reference, y_label), inner);
}
