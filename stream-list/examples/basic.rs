// Example: a hand-written adapter and container, driven frame by frame.
use futures_util::FutureExt;
use stream_list::{
    Adapter, Container, FetchError, FetchFuture, Page, StreamList, StreamListOptions, ViewportMetrics,
};

/// A text "screen" whose rows are 1 unit tall.
#[derive(Default)]
struct Lines {
    rows: Vec<String>,
    scroll: u64,
}

impl Container for Lines {
    type Element = String;

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_offset: self.scroll,
            viewport_size: 10,
            content_start: 0,
            content_size: self.rows.len() as u64,
        }
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append(&mut self, elements: Vec<String>) {
        self.rows.extend(elements);
    }
}

/// Pages through the words of a sentence, three at a time.
struct Words;

impl Adapter for Words {
    type Context = &'static str;
    type Result = &'static str;
    type Key = &'static str;
    type Container = Lines;

    fn load_items(&mut self, sentence: &&'static str, offset: usize) -> FetchFuture<&'static str> {
        let sentence: &'static str = *sentence;
        let page: Vec<_> = sentence.split_whitespace().skip(offset).take(3).collect();
        Box::pin(core::future::ready(Ok::<_, FetchError>(Page::new(page))))
    }

    fn item_key(&self, word: &&'static str) -> &'static str {
        *word
    }

    fn render_item(&mut self, word: &&'static str, _lines: &Lines) -> String {
        format!("- {word}")
    }
}

fn main() {
    let options = StreamListOptions::new()
        .with_view_chunk_size(2)
        .with_display_threshold(4)
        .with_on_render_chunk(Some(|chunk: &stream_list::RenderChunk| {
            println!("rendered {}..{} ({} waiting)", chunk.start, chunk.end(), chunk.remaining);
        }));
    let mut list = match StreamList::new(Lines::default(), Words, options) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    // Repeated words are dropped: "the" only shows up once.
    let first = list.load("the quick brown fox jumps over the lazy dog");

    for now_ms in (0..).step_by(16).take(64) {
        list.advance(now_ms);
        list.frame();
        let end = list.container().rows.len() as u64;
        list.container_mut().scroll = end.saturating_sub(10);
        list.notify_reflow();
        if list.state().is_exhausted() {
            break;
        }
    }

    if let Some(Ok(page)) = first.now_or_never() {
        println!("first page: {:?}", page.items);
    }
    for row in &list.container().rows {
        println!("{row}");
    }
    println!("state={:?}", list.state());
}
