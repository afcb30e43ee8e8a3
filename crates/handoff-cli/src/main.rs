use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use handoff_core::impls::TokioPool;
use handoff_core::{DispatcherBuilder, DispatcherConfig, MainLoop};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PoolKind {
    /// Fixed std threads (`worker_threads` in the config).
    Threads,
    /// tokio blocking pool.
    Tokio,
}

/// Dispatch simulated jobs to worker threads and collect their results on
/// the main thread, one drain per tick.
#[derive(Debug, Parser)]
#[command(name = "handoff", version)]
struct Args {
    /// TOML config file.
    #[arg(long, env = "HANDOFF_CONFIG")]
    config: Option<PathBuf>,

    /// Number of jobs to dispatch.
    #[arg(long, default_value_t = 32)]
    tasks: usize,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = 10_000)]
    ticks_max: u64,

    #[arg(long, value_enum, default_value_t = PoolKind::Threads)]
    pool: PoolKind,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("handoff=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DispatcherConfig::load(path)?,
        None => DispatcherConfig::default(),
    };

    // tokio を使う場合も runtime は main thread の外で動く
    let runtime = match args.pool {
        PoolKind::Tokio => Some(
            tokio::runtime::Builder::new_multi_thread()
                .enable_time()
                .build()?,
        ),
        PoolKind::Threads => None,
    };

    // (A) main thread で Dispatcher を構築
    let mut builder = DispatcherBuilder::new().config(config);
    if let Some(rt) = &runtime {
        builder = builder.pool(TokioPool::new(rt.handle().clone()));
    }
    let dispatcher = builder.build()?;
    let handle = dispatcher.handle();

    // (B) ジョブ投入: 結果は callback で main thread に戻る
    let completed = Arc::new(AtomicUsize::new(0));
    for job in 0..args.tasks {
        let completed = Arc::clone(&completed);
        handle.dispatch_async_with(
            move || {
                let millis = rand::thread_rng().gen_range(5..50);
                std::thread::sleep(Duration::from_millis(millis));
                (job, millis)
            },
            move |(job, millis)| {
                completed.fetch_add(1, Ordering::SeqCst);
                info!(job, millis, "job finished");
            },
        )?;
    }
    handle.dispatch_on_main(|| info!("first tick reached"));

    // (C) 全 callback が届くまで tick を回す
    let ticks = MainLoop::for_dispatcher(&dispatcher)
        .with_max_ticks(args.ticks_max)
        .run_until(&dispatcher, || completed.load(Ordering::SeqCst) == args.tasks)?;
    info!(ticks, "all jobs reported back");

    println!("{}", serde_json::to_string_pretty(&dispatcher.stats())?);
    Ok(())
}
