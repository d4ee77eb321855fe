pub mod grid;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField, Popup};
use crate::store::Card;
use crate::theme::Theme;
use grid::screen_chunks;

pub fn draw(f: &mut Frame, app: &App) {
    let [header, status, cards, footer] = screen_chunks(f.area());

    draw_header(f, &app.theme, header);
    draw_info_line(f, app, status);
    draw_cards(f, app, cards);
    draw_footer(f, app, footer);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::AddForm => draw_add_form(f, app),
        Popup::Help => draw_help_popup(f, &app.theme),
        Popup::Confirm => draw_confirm_popup(f, app),
    }
}

fn draw_header(f: &mut Frame, theme: &Theme, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "✨ Website Cards",
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your personal collection of cool websites",
            Style::default().fg(theme.text_dim),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(header, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    // Priority: drag in progress > sticky notice > status message > collection info
    let line = if let Some(drag) = app.drag {
        let name = app
            .store
            .get(drag.gesture.index())
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        Line::from(vec![
            Span::styled("⇄ ", Style::default().fg(theme.dragging)),
            Span::styled(format!("Moving '{}'", name), Style::default().fg(theme.dragging).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" │ position {}", drag.gesture.index() + 1), Style::default().fg(theme.text_dim)),
        ])
    } else if let Some(ref notice) = app.notice {
        Line::from(Span::styled(format!("⚠ {}", notice), Style::default().fg(theme.danger)))
    } else if let Some(ref msg) = app.status_message {
        Line::from(Span::styled(msg.as_str(), Style::default().fg(theme.success)))
    } else {
        let count = app.store.len();
        let noun = if count == 1 { "website" } else { "websites" };
        let mut spans = vec![
            Span::styled(format!("{} {}", count, noun), Style::default().fg(theme.text)),
            Span::styled(" │ ", Style::default().fg(theme.text_dim)),
            Span::styled(app.store.location(), Style::default().fg(theme.text_dim)),
        ];
        if app.store.is_dirty() {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.text_dim)));
            spans.push(Span::styled("unsaved", Style::default().fg(theme.dragging)));
        }
        Line::from(spans)
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    if app.store.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No websites yet! Press 'a' to add one.",
                Style::default().fg(theme.text_dim),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let grid = app.grid();
    let dragged = app.drag.map(|d| d.gesture.index());

    for (index, rect) in grid.slots(app.store.len()) {
        if let Some(card) = app.store.get(index) {
            let selected = index == app.selected;
            draw_card(f, theme, card, rect, selected, dragged == Some(index));
        }
    }
}

fn draw_card(f: &mut Frame, theme: &Theme, card: &Card, area: Rect, selected: bool, dragging: bool) {
    let border_color = if dragging {
        theme.dragging
    } else if selected {
        theme.accent
    } else {
        theme.border
    };
    let title_style = if selected || dragging {
        Style::default().fg(border_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };

    let mut block = Block::default()
        .title(Span::styled(format!(" {} ", card.name), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if selected {
        block = block.style(Style::default().bg(theme.bg_selected));
    }

    // Image host stands in for the picture; globe when there is none
    let image_line = match image_host(card) {
        Some(host) => Line::from(vec![
            Span::styled("🖼 ", Style::default().fg(theme.text_dim)),
            Span::styled(host, Style::default().fg(theme.text_dim)),
        ]),
        None => Line::from(Span::styled("🌐", Style::default().fg(theme.text_dim))),
    };

    let mut lines = vec![image_line];
    if card.has_description() {
        lines.push(Line::from(Span::styled(
            card.description.as_str(),
            Style::default().fg(theme.text),
        )));
    }

    // URL goes on the last inner row
    let inner_height = area.height.saturating_sub(2) as usize;
    while lines.len() + 1 < inner_height {
        lines.push(Line::from(""));
    }
    lines.truncate(inner_height.saturating_sub(1));
    lines.push(Line::from(Span::styled(
        card.url.as_str(),
        Style::default().fg(theme.link).add_modifier(Modifier::UNDERLINED),
    )));

    let content = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn image_host(card: &Card) -> Option<String> {
    if !card.has_image() {
        return None;
    }
    url::Url::parse(&card.image)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: Vec<(&str, &str)> = if app.is_dragging() {
        vec![("←→↑↓", "Move"), ("Enter", "Drop"), ("Esc", "Drop")]
    } else if app.store.is_empty() {
        vec![("a", "Add"), ("?", "Help"), ("q", "Quit")]
    } else {
        vec![
            ("←→↑↓", "Nav"),
            ("Enter", "Open"),
            ("a", "Add"),
            ("d", "Del"),
            ("m", "Move"),
            ("C", "Clear"),
            ("?", "Help"),
            ("q", "Quit"),
        ]
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 6 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_add_form(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 24 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Add New Website ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(popup_area);

    for (i, field) in FormField::ALL.iter().copied().enumerate() {
        let active = app.form.field == field;
        let value = app.form.value(field);
        let border = if active { theme.accent } else { theme.border };

        let content = if value.is_empty() && !active {
            Line::from(Span::styled(field.placeholder(), Style::default().fg(theme.text_dim)))
        } else {
            let cursor = if active { "_" } else { "" };
            Line::from(Span::styled(format!("{}{}", value, cursor), Style::default().fg(theme.text)))
        };

        let input = Paragraph::new(content).block(
            Block::default()
                .title(Span::styled(
                    field.label(),
                    Style::default().fg(if active { theme.accent } else { theme.header }),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(input, inner[i]);
    }

    // Validation errors land in the status message while the form is open
    let hint = match app.status_message {
        Some(ref msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(theme.danger))),
        None => Line::from(vec![
            Span::styled("Tab", Style::default().fg(theme.accent)),
            Span::styled(" next │ ", Style::default().fg(theme.text_dim)),
            Span::styled("F2", Style::default().fg(theme.accent)),
            Span::styled(" add │ ", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" cancel", Style::default().fg(theme.text_dim)),
        ]),
    };
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), inner[5]);
}

fn draw_help_popup(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(theme.header).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, Style::default().fg(theme.accent)),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        section("═══ Navigation ═══"),
        entry("  ←→↑↓ hjkl  ", "Move between cards"),
        entry("  Home/End   ", "First / last card"),
        entry("  Enter  o   ", "Open website in browser"),
        Line::from(""),
        section("═══ Collection ═══"),
        entry("  a          ", "Add a website"),
        entry("  d  Del     ", "Delete selected website"),
        entry("  C          ", "Clear all websites"),
        Line::from(""),
        section("═══ Reordering ═══"),
        entry("  m  Space   ", "Pick up card, arrows to move, Enter to drop"),
        entry("  Mouse drag ", "Drag a card onto another position"),
        Line::from(""),
        section("═══ General ═══"),
        entry("  ?          ", "Toggle this help"),
        entry("  q          ", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = format!("Clear all {} websites?", app.store.len());

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.danger))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(theme.danger).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(theme.danger)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.danger)),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
