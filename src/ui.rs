use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use diarias::{export, FormState, Ledger, ReferenceData, EXPORT_FILENAME};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::fs;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Query,
    City,
    Category,
    Days,
}

impl Field {
    pub fn next(&self) -> Self {
        match self {
            Field::Query => Field::City,
            Field::City => Field::Category,
            Field::Category => Field::Days,
            Field::Days => Field::Query,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::Query => Field::Days,
            Field::City => Field::Query,
            Field::Category => Field::City,
            Field::Days => Field::Category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Info,
}

impl StatusKind {
    fn color(&self) -> Color {
        match self {
            StatusKind::Success => Color::Green,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Info => Color::Cyan,
        }
    }
}

pub struct App {
    pub data: ReferenceData,
    pub form: FormState,
    pub ledger: Ledger,
    pub focus: Field,
    pub status: Option<(StatusKind, String)>,
    pub branded: bool,
}

impl App {
    pub fn new(data: ReferenceData, branded: bool) -> Self {
        Self {
            data,
            form: FormState::default(),
            ledger: Ledger::new(),
            focus: Field::Query,
            status: None,
            branded,
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some((kind, text.into()));
    }

    fn save(&mut self) {
        match self.form.try_save(&self.data) {
            Ok(entry) => {
                self.ledger.append(entry);
                self.set_status(StatusKind::Success, "✅ Diária salva com sucesso!");
            }
            Err(warning) => {
                self.set_status(StatusKind::Warning, format!("⚠️ {warning}"));
            }
        }
    }

    fn export(&mut self) {
        if self.ledger.is_empty() {
            self.set_status(StatusKind::Info, "Nenhuma diária salva até o momento.");
            return;
        }

        let result = export::render(self.ledger.snapshot())
            .and_then(|bytes| fs::write(EXPORT_FILENAME, bytes).map_err(Into::into));

        match result {
            Ok(()) => {
                self.set_status(
                    StatusKind::Success,
                    format!("📄 PDF gerado: {EXPORT_FILENAME}"),
                );
            }
            Err(err) => {
                self.set_status(StatusKind::Warning, format!("Falha ao gerar PDF: {err}"));
            }
        }
    }

    fn clear_all(&mut self) {
        if self.ledger.is_empty() {
            self.set_status(StatusKind::Info, "Nenhuma diária salva até o momento.");
            return;
        }

        self.ledger.clear();
        self.set_status(StatusKind::Warning, "🗑️ Todos os registros foram apagados!");
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('e') => app.export(),
                    KeyCode::Char('x') => app.clear_all(),
                    KeyCode::Char('c') => return Ok(()),
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.save(),
                KeyCode::Tab => app.focus = app.focus.next(),
                KeyCode::BackTab => app.focus = app.focus.previous(),
                KeyCode::Down => match app.focus {
                    Field::City => app.form.city_next(&app.data),
                    Field::Category => app.form.category_next(&app.data),
                    Field::Days => app.form.days_decrement(),
                    Field::Query => {}
                },
                KeyCode::Up => match app.focus {
                    Field::City => app.form.city_previous(),
                    Field::Category => app.form.category_previous(),
                    Field::Days => app.form.days_increment(),
                    Field::Query => {}
                },
                KeyCode::Backspace => match app.focus {
                    Field::Query => app.form.pop_query_char(),
                    Field::Days => app.form.pop_day_digit(),
                    _ => {}
                },
                KeyCode::Char(c) => match app.focus {
                    Field::Query => app.form.push_query_char(c),
                    Field::Days => {
                        if let Some(digit) = c.to_digit(10) {
                            app.form.push_day_digit(digit);
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(12), // Form
            Constraint::Min(6),     // Saved entries
            Constraint::Length(3),  // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_ledger(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Calculadora de Diárias",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];

    if app.branded {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            "© IPAM Amazônia",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "))
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(columns[1]);

    // Destination query
    let query = Paragraph::new(app.form.query().to_string())
        .block(field_block("Cidade de destino", app.focus == Field::Query));
    f.render_widget(query, left[0]);

    // City selector, populated from the substring filter
    let candidates = app.form.candidates(&app.data);
    let items: Vec<ListItem> = if candidates.is_empty() {
        vec![ListItem::new(Span::styled(
            "Digite o nome de uma cidade válida para continuar.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        candidates
            .iter()
            .map(|m| ListItem::new(m.name.clone()))
            .collect()
    };

    let city_list = List::new(items)
        .block(field_block("Selecione a cidade", app.focus == Field::City))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    let mut city_state = ListState::default();
    if !candidates.is_empty() {
        city_state.select(Some(app.form.city_index().min(candidates.len() - 1)));
    }
    f.render_stateful_widget(city_list, left[1], &mut city_state);

    // Read-only UF
    let uf = Paragraph::new(app.form.uf(&app.data))
        .style(Style::default().fg(Color::DarkGray))
        .block(field_block("UF (Estado)", false));
    f.render_widget(uf, right[0]);

    // Category selector, with the placeholder as first row
    let options = app.form.category_options(&app.data);
    let mut category_items = vec![ListItem::new(Span::styled(
        "Selecione...",
        Style::default().fg(Color::DarkGray),
    ))];
    category_items.extend(options.iter().map(|o| ListItem::new(o.clone())));

    let category_list = List::new(category_items)
        .block(field_block("Tipo de Diária", app.focus == Field::Category))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    let mut category_state = ListState::default();
    category_state.select(Some(app.form.category_index().map_or(0, |i| i + 1)));
    f.render_stateful_widget(category_list, right[1], &mut category_state);

    // Read-only rate and the day counter, side by side
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[2]);

    let rate = Paragraph::new(format!("R$ {:.2}", app.form.rate(&app.data)))
        .style(Style::default().fg(Color::DarkGray))
        .block(field_block("Valor da Diária", false));
    f.render_widget(rate, bottom[0]);

    let days = Paragraph::new(app.form.days().to_string())
        .block(field_block("Número de dias", app.focus == Field::Days));
    f.render_widget(days, bottom[1]);
}

fn render_ledger(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Cidade", "UF", "Tipo de Diária", "Valor", "Dias", "Total"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.ledger.snapshot().iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.city.clone()),
            Cell::from(entry.uf.clone()),
            Cell::from(entry.category.clone()),
            Cell::from(format!("{:.2}", entry.rate)),
            Cell::from(entry.days.to_string()),
            Cell::from(format!("{:.2}", entry.total)).style(Style::default().fg(Color::Green)),
        ])
        .height(1)
    });

    let title = if app.ledger.is_empty() {
        " Resumo das Diárias Salvas ".to_string()
    } else {
        format!(
            " Resumo das Diárias Salvas ({}) | Total: R$ {:.2} ",
            app.ledger.len(),
            app.ledger.grand_total()
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(4),
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some((kind, text)) = &app.status {
        spans.push(Span::styled(
            format!(" {text} "),
            Style::default().fg(kind.color()),
        ));
        spans.push(Span::raw("| "));
    }

    spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Campo | "));
    spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Selecionar | "));
    spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Salvar | "));
    spans.push(Span::styled("Ctrl+E", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" PDF | "));
    spans.push(Span::styled("Ctrl+X", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Limpar | "));
    spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Sair"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
