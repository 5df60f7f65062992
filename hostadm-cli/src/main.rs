mod app;
mod ui;

use anyhow::Result;
use app::App;

fn main() -> Result<()> {
    init_tracing();
    let mut app = App::new();
    app.run()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
