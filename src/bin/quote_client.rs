//! Terminal front-end for the quote relay.

use anyhow::Result;
use clap::Parser;
use motivational_quotes::client::controller::DEFAULT_SERVER_URL;
use motivational_quotes::client::{ImageView, QuoteController, Trigger, View};
use motivational_quotes::models::Category;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "quote_client")]
#[command(about = "Fetch a motivational quote from a running relay")]
struct CliArgs {
    /// Relay base URL.
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Quote category; unknown values are treated as "general".
    #[arg(long, default_value = "general")]
    category: String,

    /// Also request a background image.
    #[arg(long)]
    with_image: bool,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Save a shareable card into this directory.
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

fn print_view(view: &View) {
    if let Some(error) = &view.error_text {
        eprintln!("{}", error);
        return;
    }
    if let Some(quote) = &view.quote_text {
        println!("{}", quote);
    }
    match &view.image {
        ImageView::Hidden => {}
        ImageView::Pending { url } | ImageView::Shown { url, .. } => {
            println!("Image: {}", url);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motivational_quotes=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let category = Category::from_input(Some(&args.category));

    let controller = QuoteController::new(args.server)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_images(args.with_image);

    if let Trigger::Completed(_) = controller.generate(category).await {
        print_view(&controller.view(Instant::now()));
    }

    if let Some(dir) = args.export {
        if let Some(path) = controller.export_card(&dir)? {
            println!("Saved card: {}", path.display());
        }
    }

    if controller.state().current_quote().is_none() {
        std::process::exit(1);
    }
    Ok(())
}
