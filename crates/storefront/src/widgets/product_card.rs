//! A single product card: thumbnail, title, description, price, category.

use super::text::{display_width, truncate, wrap};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use storefront_catalog::{ImageState, Product, Thumbnail};

/// Terminal rows used by the thumbnail. Each row holds two pixel rows.
pub const IMAGE_ROWS: u16 = 5;
/// Description lines shown before truncating.
pub const DESCRIPTION_LINES: u16 = 2;
/// Total card height including the border.
pub const CARD_HEIGHT: u16 = 2 + IMAGE_ROWS + 1 + DESCRIPTION_LINES + 1;

const UPPER_HALF: &str = "▀";
const LOWER_HALF: &str = "▄";

/// Renders one [`Product`].
///
/// `image` is `None` when thumbnails are disabled; the image area then
/// shows a text frame instead.
pub struct ProductCard<'a> {
    product: &'a Product,
    image: Option<&'a ImageState>,
}

impl<'a> ProductCard<'a> {
    pub fn new(product: &'a Product, image: Option<&'a ImageState>) -> Self {
        Self { product, image }
    }
}

impl Widget for ProductCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let [image_area, title_area, description_area, footer_area] = Layout::vertical([
            Constraint::Length(IMAGE_ROWS),
            Constraint::Length(1),
            Constraint::Length(DESCRIPTION_LINES),
            Constraint::Length(1),
        ])
        .areas(inner);

        match self.image {
            Some(ImageState::Ready(_, thumbnail)) => draw_thumbnail(thumbnail, image_area, buf),
            Some(ImageState::Loading(_)) => image_caption("loading image…", image_area, buf),
            Some(ImageState::Unavailable) => image_caption("no image", image_area, buf),
            None => image_caption(&self.product.category, image_area, buf),
        }

        let width = inner.width as usize;
        Paragraph::new(Span::styled(
            truncate(&self.product.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .render(title_area, buf);

        let description: Vec<Line> =
            wrap(&self.product.description, width, DESCRIPTION_LINES as usize)
                .into_iter()
                .map(|line| Line::styled(line, Style::default().fg(Color::Gray)))
                .collect();
        Paragraph::new(description).render(description_area, buf);

        footer(self.product, width).render(footer_area, buf);
    }
}

/// Price on the left, category badge on the right. The badge is shortened
/// first when the card is narrow; the price is never truncated.
fn footer(product: &Product, width: usize) -> Line<'static> {
    let price = product.display_price();
    let price_width = display_width(&price);
    let room = width.saturating_sub(price_width + 1);
    let badge_text = truncate(&product.category, room.saturating_sub(2));

    let mut spans = vec![Span::styled(
        price,
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if !badge_text.is_empty() {
        let badge = format!(" {badge_text} ");
        let gap = width.saturating_sub(price_width + display_width(&badge));
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(
            badge,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }
    Line::from(spans)
}

fn image_caption(text: &str, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    Paragraph::new(
        Line::styled(
            truncate(text, area.width as usize),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
        .centered(),
    )
    .render(row, buf);
}

/// Draw `thumbnail` into `area` with half-block cells, scaled to fit and
/// centred, keeping its aspect ratio.
fn draw_thumbnail(thumbnail: &Thumbnail, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    let (tw, th) = (thumbnail.width() as f64, thumbnail.height() as f64);
    let (pw, ph) = (area.width as u32, area.height as u32 * 2);
    let scale = f64::min(pw as f64 / tw, ph as f64 / th);
    let dw = ((tw * scale).round() as u32).clamp(1, pw);
    let dh = ((th * scale).round() as u32).clamp(1, ph);
    let left = (pw - dw) / 2;
    let top = (ph - dh) / 2;

    let sample = |x: u32, py: u32| -> Option<Color> {
        if py < top || py >= top + dh {
            return None;
        }
        let sx = (x as u64 * thumbnail.width() as u64 / dw as u64) as u32;
        let sy = ((py - top) as u64 * thumbnail.height() as u64 / dh as u64) as u32;
        let [r, g, b] = thumbnail.pixel(sx, sy);
        Some(Color::Rgb(r, g, b))
    };

    for row in 0..area.height {
        for x in 0..dw {
            let upper = sample(x, row as u32 * 2);
            let lower = sample(x, row as u32 * 2 + 1);
            let Some(cell) = buf.cell_mut((area.x + (left + x) as u16, area.y + row)) else {
                continue;
            };
            match (upper, lower) {
                (Some(fg), Some(bg)) => {
                    cell.set_symbol(UPPER_HALF).set_fg(fg).set_bg(bg);
                }
                (Some(fg), None) => {
                    cell.set_symbol(UPPER_HALF).set_fg(fg);
                }
                (None, Some(fg)) => {
                    cell.set_symbol(LOWER_HALF).set_fg(fg);
                }
                (None, None) => {}
            }
        }
    }
}
