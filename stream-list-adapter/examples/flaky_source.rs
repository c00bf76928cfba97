// Example: retrying a failing first page on the controller's clock.
use futures_util::FutureExt;
use stream_list::{Logger, StreamListOptions};
use stream_list_adapter::{Controller, SliceSource, SourceQuery, VecContainer};

struct Stdout;

impl Logger for Stdout {
    fn error(&self, message: &str) {
        println!("[error] {message}");
    }

    fn warn(&self, message: &str) {
        println!("[warn] {message}");
    }

    fn info(&self, message: &str) {
        println!("[info] {message}");
    }

    fn debug(&self, message: &str) {
        println!("[debug] {message}");
    }
}

fn main() {
    let rows: Vec<&'static str> = vec!["a", "b", "c"];
    let mut source = SliceSource::new(
        rows,
        10,
        |s: &&'static str| *s,
        |s: &&'static str| s.to_uppercase(),
    );
    source.fail_next(3);

    let options = StreamListOptions::new()
        .with_load_retry_count(2)
        .with_load_retry_delay_ms(250)
        .with_log_level(7)
        .with_logger(Stdout);
    let mut c = match Controller::new(VecContainer::default(), source, options) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let first = c.load(SourceQuery::all());
    for now_ms in [0, 250, 500, 750] {
        c.tick(now_ms);
    }

    match first.now_or_never() {
        Some(Ok(page)) => println!("loaded {} items", page.len()),
        Some(Err(err)) => println!("gave up: {err}"),
        None => println!("still pending"),
    }

    // A later load starts over with a full retry budget.
    let second = c.load(SourceQuery::all());
    c.settle(64);
    if let Some(Ok(page)) = second.now_or_never() {
        println!("second attempt loaded {} items: {:?}", page.len(), c.container().children());
    }
}
