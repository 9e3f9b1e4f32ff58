use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{block::Title, Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;
use vibecanvas_core::{parse_hex_color, VibeResult, ViewState};
use crate::app::App;

const ACCENT: Color = Color::Indexed(63); // indigo
const PLACEHOLDER: &str = "e.g. 'Midnight rain in Tokyo' or 'Energetic disco sunrise'";

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, hero, input, error line, body, footer
    let [header_area, hero_area, input_area, error_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_hero(frame, hero_area);
    render_input(app, frame, input_area);
    render_error(app, frame, error_area);

    match app.session.state() {
        ViewState::Idle | ViewState::Error(_) => render_placeholder_tiles(frame, body_area),
        ViewState::Loading => render_loading(app, frame, body_area),
        ViewState::Result(result) => render_result(app, result, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" ✦ VibeCanvas ", Style::default().fg(Color::White).bg(ACCENT).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_hero(frame: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::default(),
        Line::from(vec![
            Span::styled("Visualize your ", Style::default().bold()),
            Span::styled("vibe.", Style::default().fg(ACCENT).bold()),
        ]),
        Line::styled(
            "Describe how you're feeling, a song, or a dream. Gemini will craft a palette and abstract art.",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let session = &app.session;
    let loading = session.is_loading();

    let border_color = if loading { Color::DarkGray } else { ACCENT };
    let action = if loading {
        Span::styled(" Thinking... ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
    } else if session.can_submit() {
        Span::styled(" Generate ⏎ ", Style::default().fg(Color::White).bg(ACCENT).bold())
    } else {
        Span::styled(" Generate ", Style::default().fg(Color::DarkGray))
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Your vibe ")
        .title(Title::from(Line::from(action)).alignment(Alignment::Right));

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = visible_input(session.input(), session.cursor(), inner_width);

    let input = if session.input().is_empty() {
        Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        let fg = if loading { Color::DarkGray } else { Color::Cyan };
        Paragraph::new(visible_text).style(Style::default().fg(fg))
    };

    frame.render_widget(input.block(input_block), area);

    // Show cursor when editable
    if session.can_edit() {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// The slice of `input` that fits in `inner_width` columns with the cursor
/// on screen, plus the cursor's column within it. Wide characters count as
/// two columns.
fn visible_input(input: &str, cursor: usize, inner_width: usize) -> (String, u16) {
    if inner_width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let width = |c: &char| c.width().unwrap_or(0);

    // Scroll until the cursor column fits inside the box
    let mut start = 0;
    let mut cursor_x: usize = chars[..cursor].iter().map(width).sum();
    while cursor_x > inner_width - 1 && start < cursor {
        cursor_x -= width(&chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible = chars[start..]
        .iter()
        .take_while(|c| {
            used += width(*c);
            used <= inner_width
        })
        .collect();
    (visible, cursor_x as u16)
}

fn render_error(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(message) = app.session.error() {
        let error = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(error, area);
    }
}

fn render_placeholder_tiles(frame: &mut Frame, area: Rect) {
    let [_, tiles_area, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .areas(area);

    let tiles = Layout::horizontal([Constraint::Ratio(1, 4); 4]).spacing(2).split(tiles_area);
    for tile in tiles.iter() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(Color::Indexed(236)));
        frame.render_widget(block, *tile);
    }
}

fn render_loading(app: &App, frame: &mut Frame, area: Rect) {
    // Animated ellipsis: cycles through ".", "..", "..."
    let dots = ".".repeat((app.animation_frame as usize) + 1);
    let text = Text::from(vec![
        Line::default(),
        Line::styled("◌", Style::default().fg(ACCENT).bold()),
        Line::default(),
        Line::styled(
            format!("Mixing colors and emotions{}", dots),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "This usually takes about 10 seconds.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn render_result(app: &App, result: &VibeResult, frame: &mut Frame, area: Rect) {
    let [card_area, reset_area] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
        .areas(area);

    let card = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    let inner = card.inner(card_area);
    frame.render_widget(card, card_area);

    let [image_area, info_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .spacing(2)
    .areas(inner);

    match &app.preview {
        Some(preview) => frame.render_widget(preview, image_area),
        None => frame.render_widget(
            Paragraph::new("(image preview unavailable)")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            image_area,
        ),
    }

    let mut lines = vec![
        Line::styled(
            result.title.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            format!("\"{}\"", result.description),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
        Line::default(),
        Line::styled("COLOR PALETTE", Style::default().fg(Color::DarkGray).bold()),
    ];
    lines.extend(result.palette.iter().map(|color| palette_line(color)));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        info_area,
    );

    let reset_hint = Line::from(vec![
        Span::styled("Ctrl+R", Style::default().fg(Color::Gray).bold()),
        Span::styled("  Try a different vibe", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(reset_hint).alignment(Alignment::Center), reset_area);
}

/// One swatch: a colored bar followed by the raw palette entry
fn palette_line(color: &str) -> Line<'static> {
    let swatch = match parse_hex_color(color) {
        Some(rgb) => Span::styled("██████", Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b))),
        // Kept as text; the model may return anything
        None => Span::styled("  ??  ", Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        swatch,
        Span::raw(" "),
        Span::styled(color.to_string(), Style::default().fg(Color::Gray)),
    ])
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.session.state() {
        ViewState::Idle => (" IDLE ", Style::default().bg(Color::Blue).fg(Color::White)),
        ViewState::Loading => (" LOADING ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        ViewState::Error(_) => (" ERROR ", Style::default().bg(Color::Red).fg(Color::White)),
        ViewState::Result(_) => (" RESULT ", Style::default().bg(Color::Green).fg(Color::Black)),
    };

    let hints = match app.session.state() {
        ViewState::Loading => " Ctrl+C quit",
        ViewState::Result(_) => " Enter generate  Ctrl+R/Esc try a different vibe  Ctrl+C quit",
        _ => " Enter generate  Esc quit",
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
