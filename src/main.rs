mod catalog;
mod config;
mod console;
mod entity;
mod menu;
mod normalize;
mod render;

use catalog::ItunesAdapter;
use config::{NameStyle, SearchDefaults};
use console::StdConsole;
use log::info;
use menu::MenuController;

fn main() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Warn);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    let defaults = SearchDefaults::default();
    let adapter = ItunesAdapter::new(defaults);
    let mut console = StdConsole;

    // The censorship preference is resolved once here and threaded through
    // every construction call; it never changes mid-batch.
    let style = NameStyle::default();

    MenuController::new(&mut console, &adapter, style).run();
    info!("exiting");
}
