use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use podpress::{
    DEFAULT_AUDIO_DIR, DEFAULT_FEED_FILENAME, DEFAULT_STORE_FILENAME, FeedConfig, ImportOptions,
    NoopReporter, PageConfig, PageOutcome, ProgressEvent, ProgressReporter, ReqwestClient,
    SharedProgressReporter, StoreError, default_page_filename, generate_feed, generate_page,
    import_podcast, parse_episode_markdown, store,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Publish a podcast from episode markdown to archive pages and an RSS feed
#[derive(Parser, Debug)]
#[command(name = "podpress")]
#[command(about = "Publish a podcast from episode markdown to archive pages and an RSS feed")]
#[command(version)]
struct Args {
    /// Episode metadata store
    #[arg(long, global = true, default_value = DEFAULT_STORE_FILENAME)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seed a new store from an existing feed, downloading its audio
    Import {
        /// RSS feed URL or path to local RSS file
        feed: String,

        /// Directory for downloaded audio files
        #[arg(long, default_value = DEFAULT_AUDIO_DIR)]
        audio_dir: PathBuf,

        /// Maximum number of episodes to download
        #[arg(short, long)]
        limit: Option<usize>,

        /// Replace an existing store
        #[arg(long)]
        force: bool,

        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Add an episode from its markdown document
    Add {
        /// Episode markdown file
        markdown: PathBuf,

        /// Directory the episode's audio file lives in
        #[arg(long, default_value = DEFAULT_AUDIO_DIR)]
        audio_dir: String,
    },

    /// Record the hosting URL of an uploaded audio file
    Attach {
        /// The uploaded audio file
        audio_file: PathBuf,

        /// Hosting URL (defaults to the archive base URL plus the file name)
        #[arg(long)]
        url: Option<String>,
    },

    /// Generate a season's HTML archive page
    Page {
        #[arg(long, default_value = "2")]
        season: u32,

        /// Output file (defaults to season<N>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the RSS feed
    Feed {
        #[arg(short, long, default_value = DEFAULT_FEED_FILENAME)]
        output: PathBuf,

        /// Use the relative artwork URL
        #[arg(long)]
        relative_urls: bool,

        /// Directory local audio paths are relative to
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
    main_bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            bar: Mutex::new(None),
            main_bar,
        }
    }

    fn download_bar(&self) -> ProgressBar {
        let mut current = self.bar.lock().unwrap();

        if let Some(bar) = current.as_ref() {
            return bar.clone();
        }

        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(style);
        *current = Some(bar.clone());
        bar
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().unwrap().take()
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::LoadingFeed { source } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Loading feed: {}", source.cyan()));
            }

            ProgressEvent::FeedParsed {
                podcast_title,
                total_episodes,
            } => {
                self.main_bar.set_message(format!(
                    "{HEADPHONES}{} • {} episodes",
                    podcast_title.bold().green(),
                    total_episodes.to_string().cyan()
                ));
            }

            ProgressEvent::AlreadyPresent {
                episode_title,
                filename,
            } => {
                let _ = self.multi.println(format!(
                    "  {SKIP}{} {}",
                    truncate_title(&episode_title, 40).yellow(),
                    format!("({filename} exists)").dimmed()
                ));
            }

            ProgressEvent::NoAudio { episode_title } => {
                let _ = self.multi.println(format!(
                    "  {SKIP}{} {}",
                    truncate_title(&episode_title, 40).yellow(),
                    "(no audio)".dimmed()
                ));
            }

            ProgressEvent::DownloadStarting {
                episode_title,
                episode_index,
                total_episodes,
                content_length,
            } => {
                let bar = self.download_bar();
                bar.set_length(content_length.unwrap_or(0));
                bar.set_position(0);
                bar.set_message(format!(
                    "[{}/{}] {}",
                    (episode_index + 1).to_string().cyan(),
                    total_episodes.to_string().cyan(),
                    truncate_title(&episode_title, 40)
                ));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
            } => {
                let bar = self.download_bar();
                if let Some(total) = total_bytes {
                    bar.set_length(total);
                }
                bar.set_position(bytes_downloaded);
            }

            ProgressEvent::DownloadCompleted {
                episode_title,
                bytes_downloaded,
            } => {
                if let Some(bar) = self.take_bar() {
                    bar.set_position(bytes_downloaded);
                    bar.finish_and_clear();
                }
                let _ = self.multi.println(format!(
                    "  {SUCCESS}{}",
                    truncate_title(&episode_title, 40).green()
                ));
            }

            ProgressEvent::DownloadFailed {
                episode_title,
                error,
            } => {
                if let Some(bar) = self.take_bar() {
                    bar.finish_and_clear();
                }
                let _ = self.multi.println(format!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&episode_title, 30).red(),
                    error.red()
                ));
            }

            ProgressEvent::StoreWritten { path, episodes } => {
                self.main_bar.finish_and_clear();
                println!(
                    "\n{PARTY}{} {} episodes written to {}",
                    "Import complete:".bold().green(),
                    episodes.to_string().green().bold(),
                    path.cyan()
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        title.to_string()
    } else {
        let cut: String = title.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{}{} {:#}", FAILURE, "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Import {
            feed,
            audio_dir,
            limit,
            force,
            quiet,
        } => import(&args.store, &feed, audio_dir, limit, force, quiet).await,
        Command::Add {
            markdown,
            audio_dir,
        } => add(&args.store, &markdown, &audio_dir),
        Command::Attach { audio_file, url } => attach(&args.store, &audio_file, url),
        Command::Page { season, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(default_page_filename(season)));
            page(&args.store, season, &output)
        }
        Command::Feed {
            output,
            relative_urls,
            base_dir,
        } => {
            let mut config = FeedConfig {
                use_relative_urls: relative_urls,
                ..Default::default()
            };
            if let Some(base_dir) = base_dir {
                config.base_dir = base_dir;
            }
            feed(&args.store, &output, &config)
        }
    }
}

async fn import(
    store_path: &Path,
    feed: &str,
    audio_dir: PathBuf,
    limit: Option<usize>,
    force: bool,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podpress".bold().magenta(),
            "- Feed Import".dimmed()
        );
    }

    let client = ReqwestClient::new().context("Failed to create HTTP client")?;

    let options = ImportOptions {
        audio_dir,
        limit,
        overwrite: force,
    };

    let reporter: SharedProgressReporter = if quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let result = import_podcast(&client, feed, store_path, &options, reporter)
        .await
        .context("Failed to import podcast")?;

    if !quiet {
        println!(
            "  {} downloaded, {} already present, {} without audio, {} failed",
            result.downloaded.to_string().green().bold(),
            result.already_present.to_string().yellow(),
            result.without_audio.to_string().yellow(),
            if result.failed_episodes.is_empty() {
                "0".green()
            } else {
                result.failed_episodes.len().to_string().red().bold()
            }
        );

        if !result.failed_episodes.is_empty() {
            println!("\n{}", "Failed episodes:".red().bold());
            for (title, error) in &result.failed_episodes {
                println!("  {}{} - {}", CROSS, title.yellow(), error.dimmed());
            }
        }

        println!(
            "\n{FOLDER}Audio: {}\n",
            options.audio_dir.display().to_string().cyan()
        );
    }

    Ok(())
}

fn add(store_path: &Path, markdown: &Path, audio_dir: &str) -> Result<()> {
    let text = std::fs::read_to_string(markdown)
        .with_context(|| format!("Failed to read {}", markdown.display()))?;

    let episode = parse_episode_markdown(&text, audio_dir)
        .with_context(|| format!("Invalid episode document {}", markdown.display()))?;

    println!("{HEADPHONES}{}", "Parsed episode".bold());
    println!("  Season:    {}", episode.season.to_string().cyan());
    println!("  Episode:   {}", episode.number.to_string().cyan());
    println!("  Title:     {}", episode.title.bold());
    println!("  Published: {}", episode.published);
    println!("  Duration:  {}", episode.duration);
    println!(
        "  Audio:     {}",
        episode.local_file().unwrap_or_default().dimmed()
    );

    let label = episode.label();
    let title = episode.title.clone();

    let total = store::update(store_path, |document| {
        document.insert(episode)?;
        Ok(document.episodes.len())
    })
    .with_context(|| format!("Failed to update {}", store_path.display()))?;

    println!(
        "\n{SUCCESS}Added {}: {}",
        label.green().bold(),
        title
    );
    println!("  Total episodes: {}", total.to_string().cyan());

    Ok(())
}

fn attach(store_path: &Path, audio_file: &Path, url: Option<String>) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => FeedConfig::default()
            .archive_url_for(audio_file)
            .with_context(|| format!("Cannot derive a URL for {}", audio_file.display()))?,
    };

    let label = store::update(store_path, |document| {
        let episode = document.find_by_audio_file_mut(audio_file).ok_or_else(|| {
            StoreError::EpisodeNotFound {
                file: audio_file.display().to_string(),
            }
        })?;
        episode.archive_url = Some(url.clone());
        Ok(format!("{}: {}", episode.label(), episode.title))
    })
    .with_context(|| format!("Failed to update {}", store_path.display()))?;

    println!("{SUCCESS}{}", label.green());
    println!("  Archive URL: {}", url.cyan());

    Ok(())
}

fn page(store_path: &Path, season: u32, output: &Path) -> Result<()> {
    let outcome = generate_page(store_path, season, output, &PageConfig::default())
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    match outcome {
        PageOutcome::Written { season, episodes } => {
            println!(
                "{SUCCESS}Generated {} with {} episodes",
                output.display().to_string().cyan(),
                episodes.len().to_string().green().bold()
            );
            println!("  Season {season}:");
            for label in episodes {
                println!("    {label}");
            }
        }
        PageOutcome::Skipped { season } => {
            println!(
                "{SKIP}{}",
                format!("No episodes found for season {season}, nothing written").yellow()
            );
        }
    }

    Ok(())
}

fn feed(store_path: &Path, output: &Path, config: &FeedConfig) -> Result<()> {
    let summary = generate_feed(store_path, output, config)
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    println!(
        "{SUCCESS}Generated {} with {} episodes",
        summary.output.display().to_string().cyan(),
        summary.episodes.to_string().green().bold()
    );
    println!(
        "  Artwork: {}",
        if config.use_relative_urls {
            "relative".yellow()
        } else {
            "absolute".green()
        }
    );

    Ok(())
}
