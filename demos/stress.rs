use argh::FromArgs;
use bitmap_tree::{visitor::TreeStatsCollector, BitmapTree, Word};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{error::Error, time::Instant};

/// Run randomized workloads against a bitmap tree and report throughput
#[derive(FromArgs)]
struct StressArgs {
    /// workload to run, either "first-fit" or "sparse"
    #[argh(positional)]
    workload: String,

    /// word type of the tree, one of u8, u16, u32, u64, u128
    #[argh(option, default = "String::from(\"u64\")")]
    word: String,

    /// log2 of the number of indices touched per cycle
    #[argh(option, default = "20")]
    log2_count: u32,

    /// number of fresh trees the sparse workload fills
    #[argh(option, default = "4")]
    cycles: u32,

    /// log2 of the exclusive bound on sparse indices
    #[argh(option, default = "36")]
    log2_bound: u32,

    /// seed for the random index generator, random if missing
    #[argh(option)]
    seed: Option<u64>,

    /// print tree statistics after each run
    #[argh(switch)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let args: StressArgs = argh::from_env();
    if args.log2_count > 40 || args.log2_bound > 64 {
        return Err("log2 arguments are out of range".into());
    }

    match args.word.as_str() {
        "u8" => run::<u8>(&args),
        "u16" => run::<u16>(&args),
        "u32" => run::<u32>(&args),
        "u64" => run::<u64>(&args),
        "u128" => run::<u128>(&args),
        other => Err(format!("unknown word type '{other}'").into()),
    }
}

fn run<W: Word>(args: &StressArgs) -> Result<(), Box<dyn Error>> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    log::info!("running '{}' with seed {seed:#x}", args.workload);

    let count = 1u64 << args.log2_count;
    let tree = match args.workload.as_str() {
        "first-fit" => first_fit::<W>(&mut rng, count)?,
        "sparse" => sparse::<W>(&mut rng, count, args.cycles, args.log2_bound)?,
        other => return Err(format!("unknown workload '{other}'").into()),
    };

    if args.stats {
        println!("{}", TreeStatsCollector::collect(&tree));
    }

    Ok(())
}

/// Allocate `count` indices first-fit, then free `count` random indices
/// below `count`.
fn first_fit<W: Word>(
    rng: &mut StdRng,
    count: u64,
) -> Result<BitmapTree<W>, Box<dyn Error>> {
    let start = Instant::now();
    let mut tree = BitmapTree::<W>::with_word();

    for expected in 0..count {
        let idx = tree.allocate()?;
        if idx != expected || !tree.is_allocated(idx) {
            return Err(format!("first available allocation returned {idx}, not {expected}").into());
        }
    }

    for _ in 0..count {
        let idx = rng.random_range(0..count);
        tree.deallocate(idx);
        if tree.is_allocated(idx) {
            return Err(format!("index {idx} is still allocated after deallocation").into());
        }
    }

    // allocate, is_allocated, deallocate and is_allocated per index
    let total_ops = count * 4;
    report(total_ops, start);
    Ok(tree)
}

/// Fill `cycles` fresh trees with `count` random indices below
/// `2 ^ log2_bound` each.
fn sparse<W: Word>(
    rng: &mut StdRng,
    count: u64,
    cycles: u32,
    log2_bound: u32,
) -> Result<BitmapTree<W>, Box<dyn Error>> {
    let bound = u64::MAX >> (64 - log2_bound.max(1));
    let start = Instant::now();
    let mut tree = BitmapTree::<W>::with_word();

    for _ in 0..cycles {
        tree = BitmapTree::with_word();
        for _ in 0..count {
            tree.allocate_at(rng.random_range(0..=bound));
        }
    }

    let total_ops = count * u64::from(cycles);
    report(total_ops, start);
    Ok(tree)
}

fn report(total_ops: u64, start: Instant) {
    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64();
    if total_ops == 0 || secs == 0.0 {
        println!("no measurable work");
        return;
    }

    println!("{:.4} million ops per second", total_ops as f64 / secs / 1e6);
    println!("{:.4} nanoseconds per op", elapsed.as_nanos() as f64 / total_ops as f64);
}
