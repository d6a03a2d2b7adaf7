use log::info;
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::{thread, time};

use prbt::SharedMap;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u128>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "sets", default_value = "0")]
    sets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "writers", default_value = "1")]
    writers: usize,

    #[structopt(long = "readers", default_value = "1")]
    readers: usize,

    #[structopt(long = "trace")]
    trace: bool,
}

fn main() {
    let opts = Opt::from_args();

    let level = if opts.trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let seed = opts.seed.unwrap_or_else(random);
    let mut rng = {
        let mut s = [0_u8; 32];
        s[..16].copy_from_slice(&seed.to_le_bytes());
        SmallRng::from_seed(s)
    };
    info!("seed {}", seed);

    let index: SharedMap<u64, u64> = SharedMap::new("perf");

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.set(key, val).ok();
    }
    info!("loaded {} items in {:?}", opts.loads, start.elapsed());

    let mut handles = vec![];
    for j in 0..opts.writers {
        let (mut opts, index) = (opts.clone(), index.clone());
        opts.gets = 0;
        let seed = seed + ((j as u128) * 100);
        let h = thread::spawn(move || do_incremental(j, seed, opts, index));
        handles.push(h);
    }
    for j in opts.writers..(opts.writers + opts.readers) {
        let (mut opts, index) = (opts.clone(), index.clone());
        opts.sets = 0;
        opts.dels = 0;
        let seed = seed + ((j as u128) * 100);
        let h = thread::spawn(move || do_incremental(j, seed, opts, index));
        handles.push(h);
    }

    for handle in handles.into_iter() {
        handle.join().ok();
    }

    match index.validate() {
        Ok(()) => info!("{:?} validated", index),
        Err(err) => info!("{:?} invalid {}", index, err),
    }
}

fn do_incremental(j: usize, seed: u128, opts: Opt, index: SharedMap<u64, u64>) {
    let mut rng = {
        let mut s = [0_u8; 32];
        s[..16].copy_from_slice(&seed.to_le_bytes());
        SmallRng::from_seed(s)
    };

    let start = time::Instant::now();
    let total = opts.sets + opts.dels + opts.gets;
    let mut n = total;
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.sets {
            let val = rng.gen::<u64>();
            index.set(key, val).ok();
        } else if op < (opts.sets + opts.dels) {
            index.remove(&key).ok();
        } else {
            index.get(&key);
        }
        n -= 1;
    }
    info!(
        "incremental-{} for operations {}, took {:?}",
        j,
        total,
        start.elapsed()
    );

    let start = time::Instant::now();
    let snapshot = index.snapshot();
    let n = snapshot.iter().count();
    info!("iter-{} for iterating {}, took {:?}", j, n, start.elapsed());
}
