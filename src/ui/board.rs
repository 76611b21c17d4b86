use ratatui::layout::Rect;

const MAX_CARD_WIDTH: u16 = 9;
const MAX_CARD_HEIGHT: u16 = 5;

/// Lay `count` cards out `columns` wide, centred in `area`
pub fn card_rects(area: Rect, columns: usize, count: usize) -> Vec<Rect> {
    if columns == 0 || count == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(columns);
    let cell_w = (area.width / columns as u16).min(MAX_CARD_WIDTH);
    let cell_h = (area.height / rows as u16).min(MAX_CARD_HEIGHT);
    if cell_w == 0 || cell_h == 0 {
        return Vec::new();
    }

    let left = area.x + (area.width - cell_w * columns as u16) / 2;
    let top = area.y + (area.height - cell_h * rows as u16) / 2;

    (0..count)
        .map(|i| {
            let col = (i % columns) as u16;
            let row = (i / columns) as u16;
            Rect::new(left + col * cell_w, top + row * cell_h, cell_w, cell_h)
        })
        .collect()
}
