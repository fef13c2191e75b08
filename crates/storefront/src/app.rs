//! The catalog page as a [`Model`].
//!
//! One fetch on start, a live search term, and the derived filtered view.
//! Thumbnails load per card after each successful fetch.

use crate::widgets::{card_grid, search_input, spinner};
use crate::widgets::{CardGrid, EmptyState, ErrorBanner, SearchInput, Spinner};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_catalog::{
    FetchError, FetchKind, FetchState, FilterMemo, ImageLoadError, ImageVariant, ProductId,
    ProductPage, ProductQuery, ProductSource, RequestId, Resolution, Thumbnail, ThumbnailSource,
};
use storefront_core::{
    subscribe, terminal_events, Command, Component, Every, Model, Subscription, TerminalEvent,
};

pub const HEADING: &str = "Friendly Neighborhood Department Store";
pub const SUBTITLE: &str = "Everything you need, just around the corner.";
pub const SEARCH_PLACEHOLDER: &str = "Search by product name, category, or brand...";

const FRESHNESS_CHECK: Duration = Duration::from_secs(1);

/// Startup wiring for [`Storefront`].
pub struct Flags {
    pub products: Arc<dyn ProductSource>,
    /// `None` disables thumbnails entirely.
    pub thumbnails: Option<Arc<dyn ThumbnailSource>>,
    pub stale_after: Duration,
    pub placeholder_url: String,
}

#[derive(Debug)]
pub enum Msg {
    Search(search_input::Message),
    Grid(card_grid::Message),
    Spinner(spinner::Message),
    Loaded {
        request: RequestId,
        result: Result<ProductPage, FetchError>,
    },
    ThumbnailLoaded {
        id: ProductId,
        variant: ImageVariant,
        /// The URL that was requested, so late results for a replaced
        /// thumbnail can be told apart.
        url: String,
        result: Result<Thumbnail, ImageLoadError>,
    },
    FreshnessTick(Instant),
    FocusGained,
    Refresh,
    Resize(u16, u16),
    Quit,
}

pub struct Storefront {
    products: Arc<dyn ProductSource>,
    thumbnails: Option<Arc<dyn ThumbnailSource>>,
    placeholder_url: String,
    query: ProductQuery,
    search: SearchInput,
    term: String,
    memo: FilterMemo,
    grid: CardGrid,
    spinner: Spinner,
}

impl Storefront {
    /// The raw search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn state(&self) -> &FetchState {
        self.query.state()
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }

    pub fn grid(&self) -> &CardGrid {
        &self.grid
    }

    pub fn spinner_visible(&self) -> bool {
        matches!(self.query.state(), FetchState::Pending) && self.spinner.is_spinning()
    }

    /// How many times the filter has actually run.
    pub fn filter_computations(&self) -> u64 {
        self.memo.computations()
    }

    fn fetch(&mut self) -> Command<Msg> {
        let (request, kind) = self.query.begin();
        if kind == FetchKind::Foreground {
            self.spinner.start();
        }
        let source = Arc::clone(&self.products);
        Command::perform(
            async move { source.fetch_products().await },
            move |result| Msg::Loaded { request, result },
        )
    }

    fn load_image(&self, id: ProductId, variant: ImageVariant) -> Command<Msg> {
        let Some(source) = self.thumbnails.clone() else {
            return Command::none();
        };
        let Some(image) = self.grid.image(id) else {
            return Command::none();
        };
        let url = image.url(variant).to_string();
        let requested = url.clone();
        Command::perform(
            async move { source.load(&requested).await },
            move |result| Msg::ThumbnailLoaded {
                id,
                variant,
                url,
                result,
            },
        )
    }

    fn set_term(&mut self, term: String) {
        if term == self.term {
            return;
        }
        self.term = term;
        self.grid.scroll_to_top();
        self.refresh_view();
    }

    /// Recompute (or reuse) the filtered view for the current collection
    /// and term.
    fn refresh_view(&mut self) {
        if let Some(products) = self.query.products() {
            let view = self.memo.get(products, &self.term);
            self.grid.set_view(view);
        }
    }

    fn on_loaded(
        &mut self,
        request: RequestId,
        result: Result<ProductPage, FetchError>,
    ) -> Command<Msg> {
        if self.query.resolve(request, result, Instant::now()) == Resolution::Superseded {
            return Command::none();
        }
        self.spinner.stop();

        let Some(products) = self.query.products().map(Arc::clone) else {
            return Command::none();
        };
        self.refresh_view();
        let downloads = self.grid.sync_images(&products, &self.placeholder_url);
        Command::batch(
            downloads
                .into_iter()
                .map(|id| self.load_image(id, ImageVariant::Original))
                .collect::<Vec<_>>(),
        )
    }

    fn refetch_if_stale(&mut self, now: Instant) -> Command<Msg> {
        if self.query.should_refetch(now) {
            tracing::debug!("freshness window elapsed, refetching in background");
            self.fetch()
        } else {
            Command::none()
        }
    }

    fn view_body(&self, frame: &mut Frame, area: Rect) {
        match self.query.state() {
            FetchState::Pending => {
                let [_, row, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(area);
                self.spinner.view(frame, row);
            }
            FetchState::Failed(message) => {
                frame.render_widget(ErrorBanner::new(message), area);
            }
            FetchState::Succeeded(_) => match self.grid.filtered() {
                Some(view) if view.is_empty() => {
                    frame.render_widget(EmptyState::new(&self.term), area);
                }
                _ => self.grid.view(frame, area),
            },
        }
    }

    fn footer(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let key = Style::default().fg(Color::Cyan);

        let status = match self.query.state() {
            FetchState::Pending => "loading products…".to_string(),
            FetchState::Failed(_) => "fetch failed".to_string(),
            FetchState::Succeeded(products) => {
                let shown = self.grid.filtered().map_or(0, |view| view.len());
                let freshness = if self.query.is_fetching() {
                    "refreshing…"
                } else if self.query.is_fresh(Instant::now()) {
                    "up to date"
                } else {
                    "stale"
                };
                format!("showing {shown} of {} products · {freshness}", products.len())
            }
        };

        Line::from(vec![
            Span::raw(format!(" {status}   ")),
            Span::styled("↑↓", key),
            Span::styled(" scroll  ", dim),
            Span::styled("ctrl+r", key),
            Span::styled(" refresh  ", dim),
            Span::styled("esc", key),
            Span::styled(" quit", dim),
        ])
    }
}

/// Map a key press to a message. Everything that is not a global shortcut
/// goes to the search box.
pub fn key_message(key: KeyEvent) -> Option<Msg> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let msg = match key.code {
        KeyCode::Esc => Msg::Quit,
        KeyCode::Char('c') if ctrl => Msg::Quit,
        KeyCode::Char('r') if ctrl => Msg::Refresh,
        KeyCode::Up => Msg::Grid(card_grid::Message::ScrollUp),
        KeyCode::Down => Msg::Grid(card_grid::Message::ScrollDown),
        KeyCode::PageUp => Msg::Grid(card_grid::Message::PageUp),
        KeyCode::PageDown => Msg::Grid(card_grid::Message::PageDown),
        KeyCode::Home if ctrl => Msg::Grid(card_grid::Message::Top),
        KeyCode::End if ctrl => Msg::Grid(card_grid::Message::Bottom),
        _ => Msg::Search(search_input::Message::KeyPress(key)),
    };
    Some(msg)
}

impl Model for Storefront {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        let thumbnails_enabled = flags.thumbnails.is_some();
        let mut app = Storefront {
            products: flags.products,
            thumbnails: flags.thumbnails,
            placeholder_url: flags.placeholder_url,
            query: ProductQuery::new(flags.stale_after),
            search: SearchInput::new(SEARCH_PLACEHOLDER),
            term: String::new(),
            memo: FilterMemo::new(),
            grid: CardGrid::new(thumbnails_enabled),
            spinner: Spinner::new("catalog-spinner").with_title("Loading products…"),
        };
        let cmd = app.fetch();
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Search(search_input::Message::Changed(term)) => {
                self.set_term(term);
                Command::none()
            }
            Msg::Search(msg) => self.search.update(msg).map(Msg::Search),
            Msg::Grid(msg) => self.grid.update(msg).map(Msg::Grid),
            Msg::Spinner(msg) => self.spinner.update(msg).map(Msg::Spinner),
            Msg::Loaded { request, result } => self.on_loaded(request, result),
            Msg::ThumbnailLoaded {
                id,
                variant,
                url,
                result,
            } => match self.grid.resolve_image(id, variant, &url, result) {
                Some(next) => self.load_image(id, next),
                None => Command::none(),
            },
            Msg::FreshnessTick(now) => self.refetch_if_stale(now),
            Msg::FocusGained => self.refetch_if_stale(Instant::now()),
            Msg::Refresh => {
                tracing::info!("manual refresh");
                self.query.invalidate();
                self.fetch()
            }
            // The grid re-measures itself on the next draw.
            Msg::Resize(..) => Command::none(),
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [header, search, body, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let heading = Paragraph::new(vec![
            Line::styled(
                HEADING,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
            .centered(),
            Line::styled(SUBTITLE, Style::default().fg(Color::Gray)).centered(),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(heading, header);

        self.search.view(frame, search);
        self.view_body(frame, body);
        frame.render_widget(Paragraph::new(self.footer()), footer);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|event| match event {
            TerminalEvent::Key(key) => key_message(key),
            TerminalEvent::Paste(text) => Some(Msg::Search(search_input::Message::Paste(text))),
            TerminalEvent::Resize(w, h) => Some(Msg::Resize(w, h)),
            TerminalEvent::FocusGained => Some(Msg::FocusGained),
            _ => None,
        })];

        if matches!(self.query.state(), FetchState::Pending) {
            subs.extend(
                self.spinner
                    .subscriptions()
                    .into_iter()
                    .map(|sub| sub.map(Msg::Spinner)),
            );
        }

        // Only stale *data* is refetched, so the check runs only while some
        // is on screen.
        if self.query.products().is_some() {
            subs.push(
                subscribe(Every::new(FRESHNESS_CHECK, "freshness")).map(Msg::FreshnessTick),
            );
        }
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::KeyEventState;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use storefront_catalog::{ImageState, Product, ProductCollection};
    use storefront_core::testing::TestProgram;
    use storefront_core::SubscriptionId;

    const WINDOW: Duration = Duration::from_secs(300);
    const PLACEHOLDER: &str = "https://img.test/placeholder.png";

    fn product(id: u64, title: &str, category: &str, brand: Option<&str>, price: f64) -> Product {
        Product {
            id,
            title: title.into(),
            description: format!("{title} description"),
            price,
            category: category.into(),
            brand: brand.map(Into::into),
            thumbnail: format!("https://img.test/{id}.png"),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "iPhone 9", "smartphones", Some("Apple"), 549.0),
            product(2, "Nail Polish", "beauty", Some("Glamour"), 9.99),
            product(3, "Apple Juice", "groceries", None, 2.5),
            product(4, "MacBook Pro", "laptops", Some("Apple"), 1749.0),
        ]
    }

    fn page(products: Vec<Product>) -> ProductPage {
        ProductPage {
            total: products.len() as u64,
            skip: 0,
            limit: 101,
            products: ProductCollection::new(products),
        }
    }

    /// Answers each call with the next queued response, in poll order.
    #[derive(Default)]
    struct FakeProducts {
        responses: Mutex<VecDeque<Result<ProductPage, FetchError>>>,
        calls: Mutex<usize>,
    }

    impl FakeProducts {
        fn with(responses: Vec<Result<ProductPage, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProductSource for FakeProducts {
        async fn fetch_products(&self) -> Result<ProductPage, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no response queued".into())))
        }
    }

    /// Serves a 1x1 image for every URL except those containing "broken".
    #[derive(Default)]
    struct FakeImages {
        requests: Mutex<Vec<String>>,
    }

    impl FakeImages {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ThumbnailSource for FakeImages {
        async fn load(&self, url: &str) -> Result<Thumbnail, ImageLoadError> {
            self.requests.lock().unwrap().push(url.to_string());
            if url.contains("broken") {
                Err(ImageLoadError::Status(404))
            } else {
                Ok(Thumbnail::from_pixels(1, 1, vec![[200, 200, 200]]).unwrap())
            }
        }
    }

    fn flags(products: Arc<FakeProducts>) -> Flags {
        Flags {
            products,
            thumbnails: None,
            stale_after: WINDOW,
            placeholder_url: PLACEHOLDER.into(),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(prog: &mut TestProgram<Storefront>, s: &str) {
        for c in s.chars() {
            let msg = key_message(press(KeyCode::Char(c))).unwrap();
            prog.send(msg);
        }
        prog.drain_messages();
    }

    fn shown_ids(prog: &TestProgram<Storefront>) -> Vec<u64> {
        prog.model()
            .grid()
            .filtered()
            .map(|view| view.iter().map(|p| p.id).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn starts_pending_with_spinner() {
        let prog = TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![])));
        assert_eq!(*prog.model().state(), FetchState::Pending);
        assert!(prog.model().spinner_visible());
        assert_eq!(prog.pending_tasks(), 1);

        let screen = prog.render_string(100, 40);
        assert!(screen.contains(HEADING));
        assert!(screen.contains("Loading products…"));
        assert!(screen.contains(SEARCH_PLACEHOLDER));
    }

    #[tokio::test]
    async fn loaded_catalog_renders_cards() {
        let source = FakeProducts::with(vec![Ok(page(catalog()))]);
        let mut prog = TestProgram::<Storefront>::new(flags(source.clone()));
        prog.settle().await;

        assert!(!prog.model().spinner_visible());
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4]);
        let screen = prog.render_string(100, 40);
        assert!(screen.contains("iPhone 9"));
        assert!(screen.contains("$549.00"));
        assert!(screen.contains("showing 4 of 4 products"));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn searching_iphone_shows_one_card() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        prog.settle().await;

        type_str(&mut prog, "iphone");
        assert_eq!(prog.model().term(), "iphone");
        assert_eq!(shown_ids(&prog), vec![1]);

        let screen = prog.render_string(100, 40);
        assert!(screen.contains("$549.00"));
        assert!(!screen.contains("Nail Polish"));
        assert!(screen.contains("showing 1 of 4 products"));
    }

    #[tokio::test]
    async fn search_matches_brand_and_category_case_insensitively() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        prog.settle().await;

        type_str(&mut prog, "APPLE");
        assert_eq!(shown_ids(&prog), vec![1, 3, 4]);

        for _ in 0..5 {
            prog.send(key_message(press(KeyCode::Backspace)).unwrap());
        }
        type_str(&mut prog, "beauty");
        assert_eq!(shown_ids(&prog), vec![2]);
    }

    #[tokio::test]
    async fn no_match_shows_empty_state_with_raw_term() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        prog.settle().await;

        type_str(&mut prog, "zzz-no-match");
        assert!(shown_ids(&prog).is_empty());
        let screen = prog.render_string(100, 40);
        assert!(screen.contains("No products found for \"zzz-no-match\""));
        assert!(!screen.contains('$'));
    }

    #[tokio::test]
    async fn server_error_shows_banner_only() {
        let source = FakeProducts::with(vec![Err(FetchError::Network { status: 500 })]);
        let mut prog = TestProgram::<Storefront>::new(flags(source));
        prog.settle().await;

        assert!(matches!(prog.model().state(), FetchState::Failed(_)));
        assert!(!prog.model().spinner_visible());
        let screen = prog.render_string(100, 40);
        assert!(screen.contains("An error occurred while fetching products"));
        assert!(screen.contains("Network response was not ok (HTTP 500)"));
        assert!(!screen.contains("Loading products"));
        assert!(spinner::frames::DOTS.iter().all(|f| !screen.contains(*f)));
        assert!(!screen.contains('$'));
    }

    #[tokio::test]
    async fn failure_is_not_retried_automatically() {
        let source = FakeProducts::with(vec![
            Err(FetchError::Transport("connection refused".into())),
            Ok(page(catalog())),
        ]);
        let mut prog = TestProgram::<Storefront>::new(flags(source.clone()));
        prog.settle().await;

        prog.send(Msg::FreshnessTick(Instant::now() + WINDOW * 10));
        prog.send(Msg::FocusGained);
        assert_eq!(prog.pending_tasks(), 0);

        prog.send(Msg::Refresh);
        assert!(prog.model().spinner_visible());
        prog.settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn latest_request_wins() {
        let source = FakeProducts::with(vec![
            Ok(page(vec![product(10, "Old Lamp", "lighting", None, 5.0)])),
            Ok(page(vec![product(20, "New Lamp", "lighting", None, 6.0)])),
        ]);
        let mut prog = TestProgram::<Storefront>::new(flags(source));
        prog.send(Msg::Refresh);

        let mut tasks = prog.take_tasks();
        assert_eq!(tasks.len(), 2);
        let newer = tasks.pop().unwrap();
        let older = tasks.pop().unwrap();
        let older_msg = older.await;
        let newer_msg = newer.await;

        prog.send(newer_msg);
        prog.send(older_msg);
        assert_eq!(shown_ids(&prog), vec![20]);
        let screen = prog.render_string(100, 40);
        assert!(screen.contains("New Lamp"));
        assert!(!screen.contains("Old Lamp"));
    }

    #[tokio::test]
    async fn fresh_data_is_not_refetched() {
        let source = FakeProducts::with(vec![Ok(page(catalog()))]);
        let mut prog = TestProgram::<Storefront>::new(flags(source.clone()));
        prog.settle().await;

        prog.send(Msg::FreshnessTick(Instant::now() + Duration::from_secs(10)));
        prog.send(Msg::FocusGained);
        assert_eq!(prog.pending_tasks(), 0);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn stale_data_refetches_in_background() {
        let mut refreshed = catalog();
        refreshed.push(product(5, "Red Lipstick", "beauty", Some("Chic"), 12.0));
        let source = FakeProducts::with(vec![Ok(page(catalog())), Ok(page(refreshed))]);
        let mut prog = TestProgram::<Storefront>::new(flags(source.clone()));
        prog.settle().await;

        prog.send(Msg::FreshnessTick(Instant::now() + WINDOW + Duration::from_secs(1)));
        assert_eq!(prog.pending_tasks(), 1);

        // Old data stays visible while the refetch runs.
        assert!(!prog.model().spinner_visible());
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4]);
        assert!(prog.render_string(100, 40).contains("refreshing…"));

        // A second tick while in flight does not stack another request.
        prog.send(Msg::FreshnessTick(Instant::now() + WINDOW * 2));
        assert_eq!(prog.pending_tasks(), 1);

        prog.settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn focus_gained_refetches_stale_data_in_background() {
        let mut refreshed = catalog();
        refreshed.push(product(5, "Red Lipstick", "beauty", Some("Chic"), 12.0));
        let source = FakeProducts::with(vec![Ok(page(catalog())), Ok(page(refreshed))]);
        let mut prog = TestProgram::<Storefront>::new(Flags {
            stale_after: Duration::ZERO,
            ..flags(source.clone())
        });
        prog.settle().await;

        prog.send(Msg::FocusGained);
        assert_eq!(prog.pending_tasks(), 1);
        assert!(!prog.model().spinner_visible());
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4]);

        prog.send(Msg::FocusGained);
        assert_eq!(prog.pending_tasks(), 1);

        prog.settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(shown_ids(&prog), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn term_follows_changed_messages() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        prog.settle().await;

        prog.send(key_message(press(KeyCode::Char('b'))).unwrap());
        assert_eq!(prog.model().term(), "");
        prog.drain_messages();
        assert_eq!(prog.model().term(), "b");

        prog.send(Msg::Search(search_input::Message::Changed("Apple".into())));
        assert_eq!(prog.model().term(), "Apple");
        assert_eq!(shown_ids(&prog), vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn term_typed_during_refetch_applies_to_new_data() {
        let mut refreshed = catalog();
        refreshed.push(product(5, "Apple Watch", "wearables", Some("Apple"), 399.0));
        let source = FakeProducts::with(vec![Ok(page(catalog())), Ok(page(refreshed))]);
        let mut prog = TestProgram::<Storefront>::new(flags(source));
        prog.settle().await;

        prog.send(Msg::Refresh);
        type_str(&mut prog, "apple");
        assert_eq!(shown_ids(&prog), vec![1, 3, 4]);

        prog.settle().await;
        assert_eq!(shown_ids(&prog), vec![1, 3, 4, 5]);
    }

    #[tokio::test]
    async fn filter_runs_only_when_inputs_change() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        prog.settle().await;
        assert_eq!(prog.model().filter_computations(), 1);

        for _ in 0..3 {
            prog.render_string(100, 40);
        }
        prog.send(Msg::Grid(card_grid::Message::ScrollDown));
        prog.send(Msg::Resize(120, 40));
        assert_eq!(prog.model().filter_computations(), 1);

        type_str(&mut prog, "ap");
        assert_eq!(prog.model().filter_computations(), 3);

        // Cursor movement does not change the term.
        prog.send(key_message(press(KeyCode::Left)).unwrap());
        prog.send(key_message(press(KeyCode::Right)).unwrap());
        assert_eq!(prog.model().filter_computations(), 3);
    }

    #[tokio::test]
    async fn term_change_scrolls_grid_to_top() {
        let many: Vec<Product> = (1..=30)
            .map(|id| product(id, &format!("Gadget {id}"), "misc", None, 1.0))
            .collect();
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(many))])));
        prog.settle().await;
        prog.render_string(100, 40);

        prog.send(Msg::Grid(card_grid::Message::PageDown));
        assert!(prog.model().grid().offset() > 0);

        type_str(&mut prog, "gadget");
        assert_eq!(prog.model().grid().offset(), 0);
    }

    #[tokio::test]
    async fn broken_thumbnail_falls_back_to_placeholder_once() {
        let mut products = catalog();
        products[0].thumbnail = "https://img.test/broken.png".into();
        let images = Arc::new(FakeImages::default());
        let mut prog = TestProgram::<Storefront>::new(Flags {
            thumbnails: Some(images.clone()),
            ..flags(FakeProducts::with(vec![Ok(page(products))]))
        });
        prog.settle().await;

        let requests = images.requests();
        assert_eq!(requests.len(), 5, "{requests:?}");
        assert_eq!(requests.iter().filter(|u| *u == PLACEHOLDER).count(), 1);
        assert_eq!(requests.iter().filter(|u| u.contains("broken")).count(), 1);
        assert!(matches!(
            prog.model().grid().image(1).unwrap().state(),
            ImageState::Ready(ImageVariant::Placeholder, _)
        ));
        assert!(matches!(
            prog.model().grid().image(2).unwrap().state(),
            ImageState::Ready(ImageVariant::Original, _)
        ));
        assert!(matches!(prog.model().state(), FetchState::Succeeded(_)));
    }

    #[tokio::test]
    async fn broken_placeholder_ends_unavailable() {
        let mut products = catalog();
        products.truncate(1);
        products[0].thumbnail = "https://img.test/broken.png".into();
        let images = Arc::new(FakeImages::default());
        let mut prog = TestProgram::<Storefront>::new(Flags {
            thumbnails: Some(images.clone()),
            placeholder_url: "https://img.test/broken-placeholder.png".into(),
            ..flags(FakeProducts::with(vec![Ok(page(products))]))
        });
        prog.settle().await;

        assert_eq!(
            images.requests(),
            vec![
                "https://img.test/broken.png".to_string(),
                "https://img.test/broken-placeholder.png".to_string()
            ]
        );
        assert_eq!(
            *prog.model().grid().image(1).unwrap().state(),
            ImageState::Unavailable
        );
        assert!(prog.render_string(100, 40).contains("no image"));
    }

    #[tokio::test]
    async fn late_failure_for_replaced_thumbnail_is_ignored() {
        let mut first = catalog();
        first.truncate(1);
        first[0].thumbnail = "https://img.test/broken.png".into();
        let mut second = first.clone();
        second[0].thumbnail = "https://img.test/good.png".into();

        let images = Arc::new(FakeImages::default());
        let mut prog = TestProgram::<Storefront>::new(Flags {
            thumbnails: Some(images.clone()),
            ..flags(FakeProducts::with(vec![Ok(page(first)), Ok(page(second))]))
        });

        let loaded = prog.take_tasks().pop().unwrap().await;
        prog.send(loaded);
        let stale_image = prog.take_tasks().pop().unwrap();

        prog.send(Msg::Refresh);
        let reloaded = prog.take_tasks().pop().unwrap().await;
        prog.send(reloaded);
        assert_eq!(prog.pending_tasks(), 1);

        // The 404 for the old URL lands after the card moved to the new one.
        let stale_msg = stale_image.await;
        prog.send(stale_msg);
        prog.settle().await;

        assert_eq!(
            images.requests(),
            vec![
                "https://img.test/broken.png".to_string(),
                "https://img.test/good.png".to_string()
            ]
        );
        assert!(matches!(
            prog.model().grid().image(1).unwrap().state(),
            ImageState::Ready(ImageVariant::Original, _)
        ));
    }

    #[tokio::test]
    async fn refetch_does_not_reload_unchanged_thumbnails() {
        let images = Arc::new(FakeImages::default());
        let source = FakeProducts::with(vec![Ok(page(catalog())), Ok(page(catalog()))]);
        let mut prog = TestProgram::<Storefront>::new(Flags {
            thumbnails: Some(images.clone()),
            ..flags(source)
        });
        prog.settle().await;
        assert_eq!(images.requests().len(), 4);

        prog.send(Msg::Refresh);
        prog.settle().await;
        assert_eq!(images.requests().len(), 4);
    }

    #[test]
    fn global_keys() {
        let ctrl = |c| KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char(c))
        };
        assert!(matches!(key_message(press(KeyCode::Esc)), Some(Msg::Quit)));
        assert!(matches!(key_message(ctrl('c')), Some(Msg::Quit)));
        assert!(matches!(key_message(ctrl('r')), Some(Msg::Refresh)));
        assert!(matches!(
            key_message(press(KeyCode::PageDown)),
            Some(Msg::Grid(card_grid::Message::PageDown))
        ));
        assert!(matches!(
            key_message(press(KeyCode::Char('q'))),
            Some(Msg::Search(_))
        ));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            ..press(KeyCode::Esc)
        };
        assert!(key_message(release).is_none());
    }

    #[tokio::test]
    async fn quit_requests_exit() {
        let mut prog = TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![])));
        prog.send(Msg::Quit);
        assert!(prog.quit_requested());
    }

    #[tokio::test]
    async fn subscriptions_follow_state() {
        let mut prog =
            TestProgram::<Storefront>::new(flags(FakeProducts::with(vec![Ok(page(catalog()))])));
        // Terminal input and the spinner timer.
        assert_eq!(prog.model().subscriptions().len(), 2);

        prog.settle().await;
        // Terminal input and the freshness check.
        let subs = prog.model().subscriptions();
        assert_eq!(subs.len(), 2);
        let freshness = SubscriptionId::with_str::<Every>("freshness");
        assert!(subs.iter().any(|sub| *sub.id() == freshness));
    }
}
