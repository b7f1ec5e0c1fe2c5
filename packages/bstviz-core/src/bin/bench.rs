use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use bstviz_core::{engine, RngSource, TreeSnapshot, TreeStore, ValueSource};
use tracing::info;

const CI_CONFIG: &[(u64, u64)] = &[(100, 5), (1_000, 1), (10_000, 1)];

const LOCAL_CONFIG: &[(u64, u64)] = &[(10, 1), (100, 1), (1_000, 1), (10_000, 1)];

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    implementation: &'static str,
    workload: String,
    timestamp: String,
    name: String,
    total_ops: u64,
    duration_ms: f64,
    ops_per_sec: f64,
    extra: Extra,
    source_file: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Extra {
    count: u64,
    steps: u64,
    final_height: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avg_duration_ms: Option<f64>,
}

fn is_ci() -> bool {
    env::var("CI").map(|v| v == "true").unwrap_or(false)
}

fn shuffled_keys(count: u64) -> Vec<i64> {
    let mut source = RngSource::seeded(count);
    let mut keys: Vec<i64> = (0..count as i64).collect();
    for i in (1..keys.len()).rev() {
        let j = source.draw_count(0..=i);
        keys.swap(i, j);
    }
    keys
}

struct Run {
    duration_ms: f64,
    steps: u64,
    height: i64,
}

// insert every key, search every key, snapshot once, then delete every key
fn run_benchmark(count: u64) -> Run {
    let keys = shuffled_keys(count);
    let mut tree = TreeStore::new();
    let mut steps = 0u64;

    let start = Instant::now();
    for k in &keys {
        steps += engine::insert(&mut tree, *k).expect("insert").steps.len() as u64;
    }
    for k in &keys {
        steps += engine::search(&tree, *k).expect("search").steps.len() as u64;
    }
    let height = TreeSnapshot::capture(&tree).height;
    for k in &keys {
        steps += engine::delete(&mut tree, *k).expect("delete").steps.len() as u64;
    }
    Run {
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        steps,
        height,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: &[(u64, u64)] = if is_ci() { CI_CONFIG } else { LOCAL_CONFIG };

    let mut out_dir: Option<PathBuf> = None;
    let mut custom_config: Option<Vec<(u64, u64)>> = None;
    for arg in env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--count=") {
            let count = val.parse().unwrap_or(500);
            custom_config = Some(vec![(count, 1)]);
        } else if let Some(val) = arg.strip_prefix("--counts=") {
            let parsed: Vec<(u64, u64)> = val
                .split(',')
                .filter_map(|s| s.trim().parse::<u64>().ok())
                .map(|c| (c, 1))
                .collect();
            if !parsed.is_empty() {
                custom_config = Some(parsed);
            }
        } else if let Some(val) = arg.strip_prefix("--out-dir=") {
            out_dir = Some(PathBuf::from(val));
        }
    }

    let config = custom_config.as_deref().unwrap_or(config);
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("benchmarks/core"));
    fs::create_dir_all(&out_dir).expect("mkdirs");

    for &(count, iterations) in config {
        let runs: Vec<Run> = (0..iterations.max(1)).map(|_| run_benchmark(count)).collect();
        let avg = runs.iter().map(|r| r.duration_ms).sum::<f64>() / runs.len() as f64;
        let (iterations_opt, avg_duration_ms) = if iterations > 1 {
            (Some(iterations), Some(avg))
        } else {
            (None, None)
        };
        let last = &runs[runs.len() - 1];
        info!(count, duration_ms = avg, height = last.height, "workload finished");

        let workload_name = format!("insert-search-delete-{}", count);
        let out_path = out_dir.join(format!("memory-{}.json", workload_name));
        let total_ops = count * 3;

        let output = Output {
            implementation: "core-arena-bst",
            workload: workload_name.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            name: workload_name,
            total_ops,
            duration_ms: avg,
            ops_per_sec: if avg > 0.0 {
                total_ops as f64 / avg * 1000.0
            } else {
                f64::INFINITY
            },
            extra: Extra {
                count,
                steps: last.steps,
                final_height: last.height,
                iterations: iterations_opt,
                avg_duration_ms,
            },
            source_file: Some(out_path.display().to_string()),
        };

        let json = serde_json::to_string_pretty(&output).expect("serialize");
        fs::write(&out_path, &json).expect("write output");
        println!("{}", json);
    }
}
