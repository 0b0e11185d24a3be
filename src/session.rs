//! The interactive loop.
//!
//! Two working states alternate: `Collecting` reads a comma separated list
//! of URLs and makes sure the output directory exists, `Processing` walks
//! the list in order. Each URL either ends with a saved file or is skipped;
//! nothing that goes wrong with one URL touches the next. The loop only
//! ends when the user declines to continue or input runs out.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::download::file::{download_thumbnail, ensure_output_dir, random_filename, SavedFile};
use crate::download::HttpClient;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::youtube::duration::format_duration;
use crate::youtube::metadata::{fetch_video_details, VideoMetadata};
use crate::youtube::thumbnail::{resolve_thumbnail, FallbackReason, ThumbnailSelection};
use crate::youtube::video_id::VideoId;

const BANNER: &str = r#"
  __   _______ ____     _____ _                     _                 _ _
  \ \ / /_   _|  _ \   |_   _| |__  _   _ _ __ ___ | |__  _ __   __ _(_) |
   \ V /  | | | | | |    | | | '_ \| | | | '_ ` _ \| '_ \| '_ \ / _` | | |
    | |   | | | |_| |    | | | | | | |_| | | | | | | |_) | | | | (_| | | |
    |_|   |_| |____/     |_| |_| |_|\__,_|_| |_| |_|_.__/|_| |_|\__,_|_|_|
"#;

/// Where the session reads its answers from.
pub trait Input {
    /// Show `prompt` and read one line. `None` means there is no more input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct ConsoleInput<R> {
    reader: R,
}

impl ConsoleInput<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            reader: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> Input for ConsoleInput<R> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt.cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

enum State {
    Collecting,
    Processing(Vec<String>),
    Exited,
}

/// Everything produced for one successfully saved thumbnail.
#[derive(Debug)]
pub struct ProcessedVideo {
    pub details: VideoMetadata,
    pub duration: String,
    pub thumbnail: ThumbnailSelection,
    pub saved: SavedFile,
}

pub struct Session<'a, I> {
    http: &'a dyn HttpClient,
    options: &'a Options,
    input: I,
}

impl<'a, I: Input> Session<'a, I> {
    pub fn new(http: &'a dyn HttpClient, options: &'a Options, input: I) -> Self {
        Self { http, options, input }
    }

    pub async fn run(&mut self) {
        let mut state = State::Collecting;

        loop {
            state = match state {
                State::Collecting => self.collect(),
                State::Processing(urls) => {
                    let results = self.process_batch(&urls).await;
                    print_summary(&results);
                    self.ask_to_continue()
                }
                State::Exited => break,
            };
        }

        println!("{}", "Exiting. Thank you for using the YouTube Thumbnail Downloader!".green());
        tracing::info!("User exited the application.");
    }

    fn collect(&mut self) -> State {
        if self.options.show_banner {
            // clear screen, cursor home
            print!("\x1B[2J\x1B[1;1H");
            println!("{}", BANNER.magenta().bold());
        }
        println!("{}", "===== YouTube Thumbnail Downloader =====".cyan().bold());

        let line = match self.read("Enter YouTube video URLs (comma-separated): ") {
            Some(line) => line,
            None => return State::Exited,
        };

        let dir = &self.options.output_dir;
        match ensure_output_dir(dir) {
            Ok(true) => println!("{}", format!("Created directory: {}", dir.display()).cyan()),
            Ok(false) => println!("{}", format!("Directory '{}' already exists.", dir.display()).cyan()),
            Err(err) => println!(
                "{}",
                format!("Could not create directory '{}': {}", dir.display(), err).red()
            ),
        }

        State::Processing(split_urls(&line))
    }

    fn ask_to_continue(&mut self) -> State {
        match self.read("\nDo you want to download more thumbnails? (yes/no): ") {
            Some(answer) if is_affirmative(&answer) => State::Collecting,
            _ => State::Exited,
        }
    }

    fn read(&mut self, prompt: &str) -> Option<String> {
        match self.input.read_line(prompt) {
            Ok(line) => line,
            Err(err) => {
                tracing::error!("Error reading input: {}", err);
                None
            }
        }
    }

    /// Process `urls` strictly in order, one result per URL.
    pub async fn process_batch(&self, urls: &[String]) -> Vec<Result<ProcessedVideo>> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            results.push(self.process_url(url).await);
        }
        results
    }

    pub async fn process_url(&self, url: &str) -> Result<ProcessedVideo> {
        let url = url.trim();

        let video_id = match VideoId::extract(url) {
            Some(video_id) => video_id,
            None => {
                println!("{}", "Invalid YouTube URL format. Please enter a valid URL.".red());
                tracing::warn!("Invalid URL provided: {}", url);
                return Err(Error::InvalidUrl(url.to_string()));
            }
        };

        println!("{}", format!("\nFetching details for video URL: {}", url).cyan());
        let details = match fetch_video_details(self.http, self.options, &video_id).await {
            Ok(details) => details,
            Err(err) => {
                let message = match &err {
                    Error::NotFound(_) => format!("No data found for video ID {}.", video_id),
                    err if err.is_network() => {
                        "Network error occurred. Please check your internet connection.".to_string()
                    }
                    _ => "An unexpected error occurred.".to_string(),
                };
                println!("{}", message.red());
                return Err(err);
            }
        };

        let duration = format_duration(&details.duration);
        println!("{}", "\nVideo Details:".yellow());
        print_field("Title", &details.title);
        print_field("Description", &details.description);
        print_field("Duration", &duration);

        let thumbnail = resolve_thumbnail(self.http, self.options, &video_id, &details.thumbnail_url).await;
        match &thumbnail {
            ThumbnailSelection::MaxResolution(_) => {}
            ThumbnailSelection::Fallback {
                reason: FallbackReason::Unavailable(status),
                ..
            } => println!(
                "{}",
                format!(
                    "Max resolution thumbnail not available (HTTP {}). Using high-quality thumbnail.",
                    status
                )
                .yellow()
            ),
            ThumbnailSelection::Fallback {
                reason: FallbackReason::Unreachable,
                ..
            } => println!("{}", "Network error while fetching thumbnail. Using fallback.".red()),
        }
        print_field("Thumbnail URL", thumbnail.url().as_str());

        let output = self.options.output_dir.join(random_filename());
        let saved = match download_thumbnail(self.http, thumbnail.url(), &output).await {
            Ok(saved) => saved,
            Err(err) => {
                let message = if err.is_network() {
                    "Network error occurred while downloading the thumbnail."
                } else {
                    "An unexpected error occurred while saving the thumbnail."
                };
                println!("{}", message.red());
                return Err(err);
            }
        };
        println!(
            "{}",
            format!("Thumbnail successfully saved to {}.", saved.path.display()).green()
        );

        Ok(ProcessedVideo {
            details,
            duration,
            thumbnail,
            saved,
        })
    }
}

fn print_summary(results: &[Result<ProcessedVideo>]) {
    let saved = results.iter().filter_map(|result| result.as_ref().ok()).collect::<Vec<_>>();

    println!(
        "{}",
        format!("\nSaved {} of {} thumbnails.", saved.len(), results.len()).cyan()
    );
    for video in &saved {
        let quality = match video.thumbnail {
            ThumbnailSelection::MaxResolution(_) => "max resolution",
            ThumbnailSelection::Fallback { .. } => "high quality",
        };
        println!(
            "  {} ({}) -> {} [{}]",
            video.details.title,
            video.duration,
            video.saved.path.display(),
            quality
        );
    }
    tracing::debug!("Batch finished: {} of {} thumbnails saved", saved.len(), results.len());
}

fn print_field(name: &str, value: &str) {
    println!("{} {}", format!("{}:", name).yellow(), value.white());
}

/// Split a comma separated line, dropping blank entries.
pub fn split_urls(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Only an exact `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == "yes"
}
