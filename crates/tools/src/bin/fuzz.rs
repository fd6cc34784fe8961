use anyhow::{Result, bail};
use burrow_core::{Cell, Direction, Game, HallwayRef, PlayerAction, StartingStats};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
    #[arg(short, long, default_value_t = 5)]
    difficulty: i32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(game: &Game) -> Result<()> {
    let tree = game.tree();
    let player = tree.player();
    if player.health > player.max_health || player.health < 0.0 {
        bail!("Invariant failed: health {} outside 0..={}", player.health, player.max_health);
    }
    if tree.active_map().cell(player.pos).is_none_or(Cell::is_obstacle) {
        bail!("Invariant failed: player inside a wall at {:?}", player.pos);
    }
    for handle in tree.parent_side_hallways() {
        let Some(paired) = tree.hallway(handle).and_then(|h| h.paired) else {
            bail!("Invariant failed: hallway {handle:?} is unpaired");
        };
        let back: Option<HallwayRef> = tree.hallway(paired).and_then(|h| h.paired);
        if back != Some(handle) {
            bail!("Invariant failed: hallway {handle:?} pairing is one-sided");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for max {} turns...", args.seed, args.turns);
    let mut game = Game::new(args.seed, args.difficulty, "fuzzer", &StartingStats::default());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let actions = [
        PlayerAction::Move(Direction::North),
        PlayerAction::Move(Direction::East),
        PlayerAction::Move(Direction::South),
        PlayerAction::Move(Direction::West),
        PlayerAction::Wait,
    ];

    check_invariants(&game)?;
    for _ in 0..args.turns {
        let result = game.advance(choose(&mut rng, &actions));
        check_invariants(&game)?;
        if let Some(outcome) = result.outcome {
            println!("Finished with outcome {:?} after {} turns", outcome, result.turn);
            break;
        }
    }

    println!("Visited {} log events across {} maps.", game.log().len(), game.tree().map_count());
    println!("Fuzzing completed successfully.");
    Ok(())
}
