use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use chordsheet_core::{
    parse_song, plain_text, serialize_song, transpose_song, AlignmentEngine, ChordSheetError,
    EditorConfig, Song,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> chordsheet_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let output = match cli.command {
        Commands::Parse { input } => {
            let song = load_song(&input)?;
            let mut json = serde_json::to_string_pretty(&song)
                .map_err(|err| ChordSheetError::msg(err.to_string()))?;
            json.push('\n');
            json
        }
        Commands::Format { input } => serialize_song(&load_song(&input)?),
        Commands::Transpose { input, semitones } => run_transpose(&input, semitones)?,
        Commands::Relyric {
            input,
            section,
            lyrics,
        } => run_relyric(&config, &input, section, &lyrics)?,
        Commands::Plain { input } => {
            let song = load_song(&input)?;
            let blocks: Vec<String> = song
                .sections
                .iter()
                .map(|section| plain_text(&section.lines))
                .collect();
            format!("{}\n", blocks.join("\n\n"))
        }
    };

    print!("{output}");
    Ok(())
}

fn run_transpose(input: &Path, semitones: i32) -> chordsheet_core::Result<String> {
    let song = load_song(input)?;
    tracing::info!(semitones, key = ?song.key, "transposing song");
    Ok(serialize_song(&transpose_song(&song, semitones)))
}

fn run_relyric(
    config: &EditorConfig,
    input: &Path,
    section: usize,
    lyrics: &Path,
) -> chordsheet_core::Result<String> {
    let song = load_song(input)?;
    let section_id = song
        .sections
        .get(section)
        .map(|section| section.id.clone())
        .ok_or_else(|| {
            ChordSheetError::msg(format!(
                "section index {section} out of range, song has {}",
                song.sections.len()
            ))
        })?;

    let text = read_input(lyrics)?;
    let engine = AlignmentEngine::new(config.alignment);
    let next = engine.apply_lyrics(&song, &section_id, text.trim_end_matches('\n'))?;
    tracing::info!(section, language = %next.language, "replaced section lyrics");
    Ok(serialize_song(&next))
}

fn load_song(path: &Path) -> chordsheet_core::Result<Song> {
    let text = read_input(path)?;
    let song = parse_song(&text);
    tracing::debug!(?path, sections = song.sections.len(), "parsed song");
    Ok(song)
}

/// Reads a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> chordsheet_core::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn init_tracing() {
    // Logs go to stderr so stdout can be piped into another file.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "ChordPro lyric and chord toolkit", long_about = None)]
struct Cli {
    /// JSON editor configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a ChordPro file as a JSON song.
    Parse {
        /// ChordPro file, or `-` for stdin.
        input: PathBuf,
    },
    /// Parse and rewrite a ChordPro file in normalised form.
    Format { input: PathBuf },
    /// Shift every chord and the key by a number of semitones.
    Transpose {
        input: PathBuf,
        #[arg(short, long, allow_negative_numbers = true)]
        semitones: i32,
    },
    /// Replace one section's lyrics, keeping chords on the words they belong to.
    Relyric {
        input: PathBuf,
        /// Zero-based section index.
        #[arg(short, long)]
        section: usize,
        /// Plain text file with the new lyrics.
        #[arg(short, long)]
        lyrics: PathBuf,
    },
    /// Print the lyrics without chords.
    Plain { input: PathBuf },
}
