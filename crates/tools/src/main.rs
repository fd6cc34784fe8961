use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burrow_core::{Game, HallwayRef, Map, MapId, MapTree, Player, StartingStats};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the dungeon generator
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Difficulty, clamped to 1..=10
    #[arg(short, long, default_value_t = 1)]
    difficulty: i32,
    /// Optional JSON file with starting stats
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Print every map instead of only the active one
    #[arg(long)]
    all: bool,
}

fn load_stats(path: Option<&Path>) -> Result<StartingStats> {
    let Some(path) = path else {
        return Ok(StartingStats::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stats file: {}", path.display()))?;
    let stats: StartingStats = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse stats JSON: {}", path.display()))?;
    Ok(stats)
}

fn describe_map(tree: &MapTree, id: MapId) -> String {
    let Some(map) = tree.map(id) else {
        return String::new();
    };
    let mut out = String::new();
    let indent = "  ".repeat(usize::from(map.depth()));
    let _ = writeln!(
        out,
        "{indent}map depth {} ({}x{}), {} enemies, {} keys",
        map.depth(),
        map.width(),
        map.height(),
        map.enemies().len(),
        map.keys().len()
    );
    for (pos, key) in map.keys() {
        let _ = writeln!(out, "{indent}  key {} at ({}, {})", key.lock_id, pos.x, pos.y);
    }
    for &pos in map.child_hallways() {
        let Some(hallway) = tree.hallway(HallwayRef { map: id, pos }) else { continue };
        let locks: Vec<&str> = hallway.locks().collect();
        let _ = writeln!(
            out,
            "{indent}  door at ({}, {}) locks [{}]",
            pos.x,
            pos.y,
            locks.join(", ")
        );
    }
    out
}

fn render_map(map: &Map, player: &Player) -> String {
    let mut out = String::with_capacity(map.width() * map.height() * 3);
    for pos in map.positions() {
        let glyph = map
            .render_cell(pos, player)
            .map_or(' ', |cell| if cell.visible { cell.glyph } else { ' ' });
        out.push(glyph);
        if pos.x as usize == map.width() - 1 {
            out.push('\n');
        }
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();
    let stats = load_stats(args.stats.as_deref())?;

    let game = Game::new(args.seed, args.difficulty, "inspector", &stats);
    let tree = game.tree();

    println!("Seed: {}", args.seed);
    println!("Difficulty: {}", tree.difficulty());
    println!("Maps: {}", tree.map_count());
    println!("Snapshot Hash: {}", game.snapshot_hash());
    for id in tree.preorder() {
        print!("{}", describe_map(tree, id));
    }

    let shown = if args.all { tree.preorder() } else { vec![tree.active_map_id()] };
    for id in shown {
        if let Some(map) = tree.map(id) {
            println!();
            print!("{}", render_map(map, tree.player()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn stats_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let json = r#"{ "player": { "glyph": "@", "max_health": 12, "strength": 1.5,
            "heal_cooldown": 3, "heal_amount": 0.5 } }"#;
        file.write_all(json.as_bytes()).expect("write stats");

        let stats = load_stats(Some(file.path())).expect("stats load");
        assert_eq!(stats.player.glyph, '@');
        assert_eq!(stats.player.max_health, 12);
        assert_eq!(stats.enemies, StartingStats::default().enemies, "missing table keeps defaults");
    }

    #[test]
    fn malformed_stats_file_reports_its_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        let err = load_stats(Some(file.path())).expect_err("should fail");
        assert!(format!("{err:#}").contains("Failed to parse stats JSON"));
    }

    #[test]
    fn rendered_root_has_one_row_per_grid_row() {
        let game = Game::new(7, 1, "tester", &StartingStats::default());
        let tree = game.tree();
        let text = render_map(tree.active_map(), tree.player());
        assert_eq!(text.lines().count(), tree.active_map().height());
        assert!(text.contains('P'));
    }
}
