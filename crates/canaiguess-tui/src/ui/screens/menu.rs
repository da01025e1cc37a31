use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::ui::render::{centered_rect_fixed, logo_lines};
use crate::ui::styles;
use crate::views::menu::LandingItem;
use crate::views::{LandingView, MenuView};

fn item_line(label: &str, selected: bool) -> ListItem<'static> {
    let (marker, style) = if selected {
        ("▶ ", styles::selected_style())
    } else {
        ("  ", styles::list_item_style())
    };
    ListItem::new(Line::from(Span::styled(format!("   {}{}", marker, label), style)))
}

/// Landing page: logo, tagline and the way in
pub fn render_landing(frame: &mut Frame, view: &LandingView, area: Rect) {
    let area = centered_rect_fixed(46, 14, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Can you tell a human from a machine?",
        styles::highlight_style(),
    )));
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(area.x, area.y, area.width, 5.min(area.height)),
    );

    let items: Vec<ListItem> = LandingItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| item_line(item.label(), i == view.selection))
        .collect();
    let list_area = Rect::new(
        area.x,
        area.y + 6.min(area.height),
        area.width,
        area.height.saturating_sub(6),
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    let mut state = ListState::default();
    state.select(Some(view.selection));
    frame.render_stateful_widget(list, list_area, &mut state);
}

pub fn render_menu(frame: &mut Frame, view: &MenuView, area: Rect) {
    let area = centered_rect_fixed(46, view.items.len() as u16 + 5, area);

    let items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| item_line(item.label(), i == view.selection))
        .collect();

    let title = if view.starting {
        " Starting game... ".to_string()
    } else {
        format!(" {} ", view.greeting)
    };

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    let mut state = ListState::default();
    state.select(Some(view.selection));
    frame.render_stateful_widget(list, area, &mut state);
}
