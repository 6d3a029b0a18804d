//! `shardkv` — demo and load harness for the sharded cache.
//!
//! # Usage
//!
//! ```text
//! shardkv demo                                  # insert a, b, c and list them
//! shardkv -c shardkv.toml demo                  # same, with the configured layout
//! shardkv bench -n 1000000 --shards 8           # concurrent set/get latency
//! shardkv distribution -n 100000 --strategy consistent-ring --vnodes 64
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::distr::{Alphanumeric, SampleString};
use serde_json::{Value, json};
use shardkv_engine::{KeyValueStore, ShardSet, ShardSetConfig, StoreError, Strategy};
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "shardkv",
    version,
    about = "Sharded in-process key-value cache: demo and load harness"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Shard layout overrides shared by every command.
#[derive(clap::Args)]
struct LayoutArgs {
    /// Number of shards.
    #[arg(long)]
    shards: Option<usize>,

    /// Routing strategy: fixed, modulo or consistent-ring.
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Ring positions per shard (consistent-ring only).
    #[arg(long)]
    vnodes: Option<u16>,
}

impl LayoutArgs {
    fn apply(self, cache: &mut ShardSetConfig) {
        if let Some(shards) = self.shards {
            cache.shard_count = shards;
        }
        if let Some(strategy) = self.strategy {
            cache.strategy = strategy;
        }
        if let Some(vnodes) = self.vnodes {
            cache.vnodes_per_shard = vnodes;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a few keys, then print every key with its value.
    Demo {
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Concurrent load: even operations set, odd operations get.
    Bench {
        /// Total number of operations.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Worker threads issuing operations.
        #[arg(short, long)]
        workers: Option<usize>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Insert random keys and report how many land on each shard.
    Distribution {
        /// Number of random keys to insert.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Demo { layout } => {
            layout.apply(&mut config.cache);
            cmd_demo(&config)
        }
        Commands::Bench {
            count,
            workers,
            layout,
        } => {
            layout.apply(&mut config.cache);
            if let Some(count) = count {
                config.bench.operations = count;
            }
            if workers.is_some() {
                config.bench.workers = workers;
            }
            cmd_bench(&config)
        }
        Commands::Distribution { count, layout } => {
            layout.apply(&mut config.cache);
            if let Some(count) = count {
                config.bench.operations = count;
            }
            cmd_distribution(&config)
        }
    }
}

fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_cache(config: &CliConfig) -> Result<ShardSet<Value>> {
    ShardSet::from_config(&config.cache).with_context(|| {
        format!(
            "invalid cache layout: {} shards, strategy {}",
            config.cache.shard_count, config.cache.strategy
        )
    })
}

// -----------------------------------------------------------------------
// shardkv demo
// -----------------------------------------------------------------------

fn cmd_demo(config: &CliConfig) -> Result<()> {
    let cache = build_cache(config)?;

    for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
        cache.set(key, json!(value))?;
    }

    let mut keys = cache.keys();
    keys.sort();
    for key in keys {
        match cache.get(&key) {
            Some(value) => println!("{key} = {value} (shard {})", cache.shard_for(&key)),
            None => println!("{key} vanished"),
        }
    }

    Ok(())
}

// -----------------------------------------------------------------------
// shardkv bench
// -----------------------------------------------------------------------

/// Latency totals for one kind of operation.
#[derive(Debug, Default, Clone, Copy)]
struct OpStats {
    count: u64,
    total: Duration,
}

impl OpStats {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
    }

    fn merge(&mut self, other: OpStats) {
        self.count += other.count;
        self.total += other.total;
    }

    fn average(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total / n,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

fn cmd_bench(config: &CliConfig) -> Result<()> {
    let cache = Arc::new(build_cache(config)?);
    let total = config.bench.operations;
    let workers = config.workers();

    println!("shardkv bench");
    println!("  operations: {total}");
    println!("  workers:    {workers}");
    println!("  shards:     {}", config.cache.shard_count);
    println!("  strategy:   {}", config.cache.strategy);
    println!();

    info!(total, workers, "starting load");
    let start = Instant::now();

    let (sets, gets, rejected) = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    let mut sets = OpStats::default();
                    let mut gets = OpStats::default();
                    let mut rejected = 0u64;

                    for i in (worker..total).step_by(workers) {
                        let key = format!("Key-{i}");
                        if i % 2 == 0 {
                            let value = Value::String(format!("value-{i}"));
                            let began = Instant::now();
                            let result = cache.set(&key, value);
                            sets.record(began.elapsed());
                            if let Err(StoreError::AlreadyExists(_)) = result {
                                rejected += 1;
                            }
                        } else {
                            let began = Instant::now();
                            let _ = cache.get(&key);
                            gets.record(began.elapsed());
                        }
                    }

                    debug!(worker, sets = sets.count, gets = gets.count, "worker done");
                    (sets, gets, rejected)
                })
            })
            .collect();

        let mut sets = OpStats::default();
        let mut gets = OpStats::default();
        let mut rejected = 0u64;
        for handle in handles {
            // A panicking worker is a bug in the cache; surface it.
            let (s, g, r) = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            sets.merge(s);
            gets.merge(g);
            rejected += r;
        }
        (sets, gets, rejected)
    });

    let wall = start.elapsed();
    let ops_per_sec = total as f64 / wall.as_secs_f64().max(f64::EPSILON);

    println!("Summary:");
    println!("  set: {:>9} ops, avg {:?}", sets.count, sets.average());
    println!("  get: {:>9} ops, avg {:?}", gets.count, gets.average());
    println!("  rejected sets: {rejected}");
    println!("  entries:       {}", cache.len());
    println!("  wall time:     {:.3}s ({ops_per_sec:.0} ops/s)", wall.as_secs_f64());

    Ok(())
}

// -----------------------------------------------------------------------
// shardkv distribution
// -----------------------------------------------------------------------

fn cmd_distribution(config: &CliConfig) -> Result<()> {
    let cache = Arc::new(build_cache(config)?);
    let total = config.bench.operations;
    let workers = config.workers();

    let duplicates: u64 = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    let mut rng = rand::rng();
                    let mut duplicates = 0u64;
                    for i in (worker..total).step_by(workers) {
                        let key = Alphanumeric.sample_string(&mut rng, 10);
                        if cache.set(&key, json!(format!("value: {i}"))).is_err() {
                            duplicates += 1;
                        }
                    }
                    duplicates
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .sum()
    });

    let populations = cache.populations();
    println!(
        "shardkv distribution: {total} random keys, {} shards, strategy {}",
        populations.len(),
        config.cache.strategy
    );
    for (shard, count) in populations.iter().enumerate() {
        println!("  shard {shard:>3}: {count}");
    }

    let max = populations.iter().copied().max().unwrap_or(0);
    let min = populations.iter().copied().min().unwrap_or(0);
    if min > 0 {
        println!("  skew (max/min): {:.2}", max as f64 / min as f64);
    } else {
        println!("  skew (max/min): unbounded, at least one shard is empty");
    }
    if duplicates > 0 {
        println!("  duplicate keys skipped: {duplicates}");
    }

    Ok(())
}
