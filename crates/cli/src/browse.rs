// ABOUTME: Interactive browse loop: debounced search from stdin lines, infinite scroll and favorites.
// ABOUTME: Multiplexes input lines with the search debounce deadline via tokio::select!.

use anyhow::Result;
use marquee_listing::{
    FavoritesStore, Feed, MovieSource, PageState, Query, SearchFeed, Storage, Viewport,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::render;

/// Rows shown per screen; `:more` scrolls to the end of the list.
const SCREEN_ROWS: usize = 20;

const HELP: &str = "Type to search. Commands: :more  :fav N  :retry  :popular  :q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Popular,
    Search,
}

enum Input {
    Line(String),
    Eof,
    SearchDue,
}

struct Browser<'a, S, T: Storage> {
    source: &'a S,
    favorites: &'a mut FavoritesStore<T>,
    popular: Feed,
    search: SearchFeed,
    mode: Mode,
    viewport: Viewport,
}

impl<'a, S: MovieSource, T: Storage> Browser<'a, S, T> {
    fn active(&self) -> &PageState {
        match self.mode {
            Mode::Popular => self.popular.state(),
            Mode::Search => self.search.state(),
        }
    }

    fn print_listing(&self) {
        let state = self.active();
        if let Some(error) = &state.error {
            println!("error: {} (type :retry)", error);
            if state.items.is_empty() {
                return;
            }
        }
        println!(
            "{}",
            render::listing(state, |id| self.favorites.is_favorite(id))
        );
    }

    async fn more(&mut self) {
        let before = self.active().items.len();
        self.viewport.set_len(before);
        self.viewport.scroll_to_end();
        let applied = match self.mode {
            Mode::Popular => self.popular.load_more(self.source, &self.viewport).await,
            Mode::Search => {
                self.search
                    .feed_mut()
                    .load_more(self.source, &self.viewport)
                    .await
            }
        };

        let state = self.active();
        if !applied {
            if state.is_exhausted() {
                println!("End of list.");
            } else if state.current_page == 0 {
                println!("Nothing loaded yet.");
            }
            return;
        }
        if let Some(error) = &state.error {
            println!("error: {} (type :more to try again)", error);
            return;
        }
        let favorites = &*self.favorites;
        for line in render::item_lines(&state.items[before..], before + 1, |id| {
            favorites.is_favorite(id)
        }) {
            println!("{}", line);
        }
        println!("{}", render::footer(state));
    }

    fn toggle_favorite(&mut self, arg: &str) {
        let Ok(position) = arg.trim().parse::<usize>() else {
            println!("usage: :fav N");
            return;
        };
        let item = match position
            .checked_sub(1)
            .and_then(|i| self.active().items.get(i))
        {
            Some(item) => item.clone(),
            None => {
                println!("no item #{}", position);
                return;
            }
        };
        self.favorites.toggle(item);
        for notice in self.favorites.drain_notifications() {
            println!("{}", notice);
        }
    }

    async fn retry(&mut self) {
        let retried = match self.mode {
            Mode::Popular => self.popular.retry(self.source).await,
            Mode::Search => self.search.feed_mut().retry(self.source).await,
        };
        if retried {
            self.print_listing();
        } else {
            println!("Nothing to retry.");
        }
    }

    async fn apply_search(&mut self) {
        if self.search.tick(self.source, Instant::now()).await {
            self.mode = Mode::Search;
            if self.search.state().items.is_empty() && self.search.feed().controller().query().is_none() {
                println!("Search cleared.");
            } else {
                self.print_listing();
            }
        }
    }

    async fn next_input<R>(&self, lines: &mut tokio::io::Lines<R>) -> Result<Input>
    where
        R: AsyncBufRead + Unpin,
    {
        let deadline = self.search.debouncer().deadline();
        tokio::select! {
            line = lines.next_line() => Ok(match line? {
                Some(line) => Input::Line(line),
                None => Input::Eof,
            }),
            _ = wait_for(deadline) => Ok(Input::SearchDue),
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

/// Runs the browse loop until `:q` or end of input. Pending search input is
/// settled before returning at end of input.
pub async fn run<S, T, R>(source: &S, favorites: &mut FavoritesStore<T>, input: R) -> Result<()>
where
    S: MovieSource,
    T: Storage,
    R: AsyncBufRead + Unpin,
{
    let mut browser = Browser {
        source,
        favorites,
        popular: Feed::new(),
        search: SearchFeed::new(),
        mode: Mode::Popular,
        viewport: Viewport::new(SCREEN_ROWS),
    };

    println!("{}", HELP);
    browser.popular.load(source, Query::Popular).await;
    browser.print_listing();

    let mut lines = input.lines();
    loop {
        match browser.next_input(&mut lines).await? {
            Input::SearchDue => browser.apply_search().await,
            Input::Eof => {
                if browser.search.settle(source).await {
                    browser.mode = Mode::Search;
                    browser.print_listing();
                }
                break;
            }
            Input::Line(line) => {
                let trimmed = line.trim();
                debug!(input = trimmed, "browse input");
                match trimmed.split_once(' ').unwrap_or((trimmed, "")) {
                    (":q", _) | (":quit", _) => break,
                    (":more", _) => browser.more().await,
                    (":fav", arg) => browser.toggle_favorite(arg),
                    (":retry", _) => browser.retry().await,
                    (":popular", _) => {
                        browser.mode = Mode::Popular;
                        browser.print_listing();
                    }
                    (":help", _) => println!("{}", HELP),
                    _ if trimmed.starts_with(':') => println!("unknown command; {}", HELP),
                    _ => {
                        browser.search.input(line.as_str(), Instant::now());
                        if browser.search.is_searching() {
                            println!("Searching...");
                        }
                    }
                }
            }
        }
    }
    info!("browse session ended");
    Ok(())
}
