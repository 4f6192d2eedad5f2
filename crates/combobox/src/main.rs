//! Combobox - headless demo host.

mod app;

use app::DemoApp;
use combobox_core::logging::{init_logging, log_dir, LogConfig};

fn main() {
    let log_config = LogConfig::new(log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting combobox demo");

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let mut app = DemoApp::new()?;
        let outcome = app.run().await;
        app.shutdown();
        outcome
    });

    if let Err(e) = result {
        tracing::error!(error = %e, category = e.category(), "Demo failed");
        std::process::exit(1);
    }
}
