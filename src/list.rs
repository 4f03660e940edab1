use crate::clip::{Clip, list_clips};
use crate::settings::Config;
use crate::transform::{Ffmpeg, VideoTransformer, format_hms};
use crate::ui::print_clip_count;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

struct ClipRow {
    name: String,
    modified: DateTime<Local>,
    length: Option<u64>,
    size: u64,
}

pub async fn handle_list(config: &Config) -> Result<()> {
    let dir = config.curr_path()?;
    let clips = list_clips(&dir).await?;

    if clips.is_empty() {
        println!("{}", "No clips found.".yellow());
        print_clip_count(0, &dir);
        return Ok(());
    }

    let ffmpeg = Ffmpeg::default();
    let mut rows = Vec::with_capacity(clips.len());
    for clip in &clips {
        rows.push(clip_row(&ffmpeg, clip).await?);
    }

    println!("{}", render_table(&rows));
    print_clip_count(clips.len(), &dir);
    Ok(())
}

async fn clip_row<T: VideoTransformer>(transformer: &T, clip: &Clip) -> Result<ClipRow> {
    let metadata = tokio::fs::metadata(&clip.path)
        .await
        .with_context(|| format!("Failed to read metadata of {}", clip.path.display()))?;
    let modified = metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());
    let length = transformer.probe_duration(&clip.path).await.ok();

    Ok(ClipRow {
        name: clip.file_name(),
        modified,
        length,
        size: metadata.len(),
    })
}

fn size_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

fn render_table(rows: &[ClipRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Modified", "Length", "Size (MB)"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name).fg(Color::Cyan),
            Cell::new(row.modified.format("%Y-%m-%d %H:%M:%S")).fg(Color::Magenta),
            Cell::new(row.length.map_or_else(|| "-".to_string(), format_hms))
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
            Cell::new(size_mb(row.size))
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
