//! Responsive grid of [`ProductCard`]s with per-card image state.

use super::product_card::{ProductCard, CARD_HEIGHT};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;
use std::cell::Cell;
use std::collections::HashMap;
use storefront_catalog::{
    FilteredView, ImageFallback, ImageLoadError, ImageVariant, ProductCollection, ProductId,
    Thumbnail,
};
use storefront_core::{Command, Component};

/// Number of card columns for a terminal `width`.
pub fn columns_for_width(width: u16) -> usize {
    match width {
        0..60 => 1,
        60..100 => 2,
        100..140 => 3,
        _ => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridLayout {
    columns: usize,
    visible_rows: usize,
}

/// The card grid. Scrolls by whole card rows.
pub struct CardGrid {
    view: Option<FilteredView>,
    images: HashMap<ProductId, ImageFallback>,
    thumbnails: bool,
    offset: usize,
    /// Updated during each `view()` call via interior mutability.
    layout: Cell<GridLayout>,
}

impl CardGrid {
    pub fn new(thumbnails: bool) -> Self {
        Self {
            view: None,
            images: HashMap::new(),
            thumbnails,
            offset: 0,
            layout: Cell::new(GridLayout {
                columns: 1,
                visible_rows: 1,
            }),
        }
    }

    /// Show `view`. The scroll offset is kept but clamped.
    pub fn set_view(&mut self, view: FilteredView) {
        self.view = Some(view);
        self.clamp_offset();
    }

    /// The view currently shown.
    pub fn filtered(&self) -> Option<&FilteredView> {
        self.view.as_ref()
    }

    /// Align image state with a freshly fetched collection.
    ///
    /// Cards whose thumbnail URL is unchanged keep their state, so a
    /// refetch does not re-download or re-try a failed image. Returns the
    /// ids whose original thumbnail needs downloading.
    pub fn sync_images(
        &mut self,
        products: &ProductCollection,
        placeholder_url: &str,
    ) -> Vec<ProductId> {
        if !self.thumbnails {
            return Vec::new();
        }
        let mut images = HashMap::with_capacity(products.len());
        let mut downloads = Vec::new();
        for product in products.iter() {
            match self.images.remove(&product.id) {
                Some(existing) if existing.original_url() == product.thumbnail => {
                    images.insert(product.id, existing);
                }
                _ => {
                    images.insert(
                        product.id,
                        ImageFallback::new(product.thumbnail.clone(), placeholder_url),
                    );
                    downloads.push(product.id);
                }
            }
        }
        self.images = images;
        downloads
    }

    /// Record the result of loading `url` and return the follow-up
    /// download, if any. Results for products no longer in the collection,
    /// or for a URL the card has since replaced, are dropped.
    pub fn resolve_image(
        &mut self,
        id: ProductId,
        variant: ImageVariant,
        url: &str,
        result: Result<Thumbnail, ImageLoadError>,
    ) -> Option<ImageVariant> {
        self.images.get_mut(&id)?.resolve(variant, url, result)
    }

    pub fn image(&self, id: ProductId) -> Option<&ImageFallback> {
        self.images.get(&id)
    }

    /// First visible card row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    fn total_rows(&self, columns: usize) -> usize {
        let cards = self.view.as_ref().map_or(0, FilteredView::len);
        cards.div_ceil(columns.max(1))
    }

    fn max_offset(&self, layout: GridLayout) -> usize {
        self.total_rows(layout.columns).saturating_sub(layout.visible_rows)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset(self.layout.get()));
    }
}

impl Component for CardGrid {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        let layout = self.layout.get();
        let page = layout.visible_rows.max(1);
        self.offset = match msg {
            Message::ScrollUp => self.offset.saturating_sub(1),
            Message::ScrollDown => self.offset + 1,
            Message::PageUp => self.offset.saturating_sub(page),
            Message::PageDown => self.offset + page,
            Message::Top => 0,
            Message::Bottom => usize::MAX,
        };
        self.clamp_offset();
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let layout = GridLayout {
            columns: columns_for_width(area.width),
            visible_rows: (area.height / CARD_HEIGHT).max(1) as usize,
        };
        self.layout.set(layout);

        let Some(view) = &self.view else { return };
        let offset = self.offset.min(self.max_offset(layout));

        let heights = vec![Constraint::Length(CARD_HEIGHT); layout.visible_rows];
        let rows = Layout::vertical(heights).split(area);
        for (r, row_area) in rows.iter().enumerate() {
            let cells =
                Layout::horizontal(vec![Constraint::Fill(1); layout.columns]).split(*row_area);
            for (c, cell) in cells.iter().enumerate() {
                let position = (offset + r) * layout.columns + c;
                let Some(product) = view.get(position) else {
                    return;
                };
                let image = if self.thumbnails {
                    self.images.get(&product.id).map(ImageFallback::state)
                } else {
                    None
                };
                frame.render_widget(ProductCard::new(product, image), *cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_catalog::{filter, ImageState, Product};

    const PLACEHOLDER: &str = "https://example.test/placeholder.png";

    fn catalog(n: u64) -> Arc<ProductCollection> {
        Arc::new(
            (1..=n)
                .map(|id| Product {
                    id,
                    title: format!("Product {id}"),
                    description: String::new(),
                    price: id as f64,
                    category: "misc".into(),
                    brand: None,
                    thumbnail: format!("https://example.test/{id}.png"),
                })
                .collect(),
        )
    }

    fn draw(grid: &CardGrid, width: u16, height: u16) {
        let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(width, height))
            .expect("test backend");
        terminal
            .draw(|frame| {
                let area = frame.area();
                grid.view(frame, area);
            })
            .expect("test backend");
    }

    #[test]
    fn column_breakpoints() {
        assert_eq!(columns_for_width(40), 1);
        assert_eq!(columns_for_width(59), 1);
        assert_eq!(columns_for_width(60), 2);
        assert_eq!(columns_for_width(99), 2);
        assert_eq!(columns_for_width(100), 3);
        assert_eq!(columns_for_width(139), 3);
        assert_eq!(columns_for_width(140), 4);
        assert_eq!(columns_for_width(300), 4);
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let products = catalog(10);
        let mut grid = CardGrid::new(false);
        grid.set_view(filter(&products, ""));
        // 80 columns -> 2 per row -> 5 rows; 2 rows visible.
        draw(&grid, 80, CARD_HEIGHT * 2);

        grid.update(Message::PageDown);
        assert_eq!(grid.offset(), 2);
        grid.update(Message::Bottom);
        assert_eq!(grid.offset(), 3);
        grid.update(Message::ScrollDown);
        assert_eq!(grid.offset(), 3);
        grid.update(Message::PageUp);
        assert_eq!(grid.offset(), 1);
        grid.update(Message::Top);
        assert_eq!(grid.offset(), 0);
        grid.update(Message::ScrollUp);
        assert_eq!(grid.offset(), 0);
    }

    #[test]
    fn narrower_view_clamps_offset() {
        let products = catalog(10);
        let mut grid = CardGrid::new(false);
        grid.set_view(filter(&products, ""));
        draw(&grid, 80, CARD_HEIGHT * 2);
        grid.update(Message::Bottom);
        assert_eq!(grid.offset(), 3);

        grid.set_view(filter(&products, "Product 1"));
        assert_eq!(grid.offset(), 0, "two matches fit on one row");
    }

    #[test]
    fn sync_keeps_state_for_unchanged_urls() {
        let mut grid = CardGrid::new(true);
        let first = catalog(3);
        assert_eq!(grid.sync_images(&first, PLACEHOLDER), vec![1, 2, 3]);
        grid.resolve_image(
            1,
            ImageVariant::Original,
            "https://example.test/1.png",
            Err(ImageLoadError::Status(404)),
        );

        let mut next = (*catalog(2)).clone().into_vec();
        next[1].thumbnail = "https://example.test/2-new.png".into();
        let downloads = grid.sync_images(&ProductCollection::new(next), PLACEHOLDER);

        assert_eq!(downloads, vec![2]);
        assert_eq!(
            grid.image(2).expect("replaced").original_url(),
            "https://example.test/2-new.png"
        );
        assert_eq!(
            *grid.image(1).expect("kept").state(),
            ImageState::Loading(ImageVariant::Placeholder)
        );
        assert!(grid.image(3).is_none());
    }

    #[test]
    fn late_result_for_replaced_url_is_dropped() {
        let mut grid = CardGrid::new(true);
        grid.sync_images(&catalog(1), PLACEHOLDER);

        let mut next = (*catalog(1)).clone().into_vec();
        next[0].thumbnail = "https://example.test/1-new.png".into();
        grid.sync_images(&ProductCollection::new(next), PLACEHOLDER);

        assert_eq!(
            grid.resolve_image(
                1,
                ImageVariant::Original,
                "https://example.test/1.png",
                Err(ImageLoadError::Status(404))
            ),
            None
        );
        assert_eq!(
            *grid.image(1).expect("present").state(),
            ImageState::Loading(ImageVariant::Original)
        );
    }

    #[test]
    fn disabled_thumbnails_never_download() {
        let mut grid = CardGrid::new(false);
        assert!(grid.sync_images(&catalog(4), PLACEHOLDER).is_empty());
        assert!(grid.image(1).is_none());
    }

    #[test]
    fn results_for_dropped_products_are_ignored() {
        let mut grid = CardGrid::new(true);
        grid.sync_images(&catalog(1), PLACEHOLDER);
        assert_eq!(
            grid.resolve_image(
                42,
                ImageVariant::Original,
                "https://example.test/42.png",
                Err(ImageLoadError::Status(404))
            ),
            None
        );
    }
}
