// Example: a controller streaming an in-memory feed as the viewer scrolls.
use stream_list::StreamListOptions;
use stream_list_adapter::{Controller, SliceSource, SourceQuery, VecContainer};

fn main() {
    let feed: Vec<u32> = (1..=120).collect();
    let source = SliceSource::new(feed, 25, |n: &u32| *n, |n: &u32| format!("post #{n}"));
    let options = StreamListOptions::new().with_view_chunk_size(8);
    let mut c = match Controller::new(VecContainer::default(), source, options) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let _first = c.load(SourceQuery::all());
    c.settle(256);
    println!(
        "idle without scrolling: rendered={} loaded={}",
        c.container().len(),
        c.list().len()
    );

    // The viewer flicks to the bottom a few times.
    while c.list().is_listening() {
        c.scroll_to_end();
        c.run_frames(4, 16);
        println!(
            "t={} rendered={} loaded={} requests={:?}",
            c.now_ms(),
            c.container().len(),
            c.list().len(),
            c.list().adapter().requests()
        );
    }

    // Switching to a filtered view starts a fresh session.
    let _odd = c.load(SourceQuery::filter(|n: &u32| n % 2 == 1));
    c.render_all();
    c.settle(1_024);
    println!(
        "odd posts: {} first={:?} last={:?}",
        c.container().len(),
        c.container().children().first(),
        c.container().children().last()
    );
}
