mod download;
mod error;
mod logging;
mod options;
mod session;
#[cfg(test)]
mod testing;
mod youtube;

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::download::DownloadClient;
use crate::session::{ConsoleInput, Session};
use crate::youtube::{metadata::DEFAULT_API_URL, thumbnail::DEFAULT_THUMBNAIL_HOST};

#[derive(Parser, Debug)]
#[command(version, about)]
/// Save the best available YouTube thumbnail for each URL you enter
struct Args {
    #[clap(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    /// YouTube Data API v3 key
    api_key: String,

    #[clap(short, long, default_value = "thumbnails")]
    /// directory the thumbnails are saved to, created if missing
    output_dir: PathBuf,

    #[clap(long, default_value = "log.txt")]
    /// file warnings and errors are appended to
    log_file: PathBuf,

    #[clap(long, default_value = "info")]
    /// log level, overridden by RUST_LOG
    log_level: String,

    #[clap(long, default_value = DEFAULT_API_URL, value_parser = url_parser)]
    /// videos endpoint of the YouTube Data API
    api_url: Url,

    #[clap(long, default_value = DEFAULT_THUMBNAIL_HOST, value_parser = url_parser)]
    /// host serving `vi/<id>/maxresdefault.jpg`
    thumbnail_host: Url,

    #[clap(long)]
    /// do not clear the terminal or print the banner between batches
    no_banner: bool,
}

fn url_parser(url: &str) -> Result<Url, String> {
    if !url.starts_with("http") {
        return Err("URL must start with http or https".to_string());
    }

    Url::parse(url).map_err(|err| err.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Err(err) = logging::init(&args.log_file, &args.log_level) {
        eprintln!("Error opening log file ({}): {}", args.log_file.display(), err);
        return Err(err);
    }

    let options = options::Options {
        api_key: args.api_key,
        api_url: args.api_url,
        thumbnail_host: args.thumbnail_host,
        output_dir: args.output_dir,
        show_banner: !args.no_banner,
    };

    tracing::debug!("Options: {:?}", options);

    let client = DownloadClient::new()?;
    let mut session = Session::new(&client, &options, ConsoleInput::stdin());
    session.run().await;

    Ok(())
}
