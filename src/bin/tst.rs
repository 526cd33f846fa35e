// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Command-line driver: ingest a CSV of `year,month,day,hour,lat,lng`
//! records into an [`Index`], report construction timings and node
//! counts, delete the last-ingested record, then run a handful of
//! spatio-temporal range queries.
//!
//! Mirrors the reference implementation's sample driver, generalized
//! from one hardcoded dataset/query set to CLI-configurable inputs.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use csv::ReaderBuilder;

use tst_trie::{Config, Index, TemporalResolution};

#[derive(Parser)]
#[command(about = "Build a temporal-spatial trie from a CSV of records and run sample range queries")]
struct Args {
    /// CSV path, each row `year,month,day,hour,lat,lng`.
    csv_path: PathBuf,

    /// S2 cell level to index at.
    #[arg(long, default_value_t = 20)]
    s2_level: u8,

    /// Calendar resolution to encode time at.
    #[arg(long, default_value = "hour")]
    resolution: String,

    /// Cap on the number of S2 cells a single query covering may contain.
    #[arg(long, default_value_t = tst_trie::DEFAULT_MAX_CELLS)]
    max_cells: usize,
}

struct Record {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    lat: f64,
    lng: f64,
}

fn read_records(path: &PathBuf) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(Record {
            year: row[0].trim().parse()?,
            month: row[1].trim().parse()?,
            day: row[2].trim().parse()?,
            hour: row[3].trim().parse()?,
            lat: row[4].trim().parse()?,
            lng: row[5].trim().parse()?,
        });
    }
    Ok(records)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let records = read_records(&args.csv_path)?;
    log::info!("loaded {} records from {:?}", records.len(), args.csv_path);

    let resolution = TemporalResolution::parse(&args.resolution)?;
    let config = Config::new(args.s2_level, resolution)?;
    let mut index: Index<u32> = Index::new(config);
    index.set_max_cells(args.max_cells);

    let mut cumulative_encoding = std::time::Duration::ZERO;
    let mut cumulative_insertion = std::time::Duration::ZERO;
    let mut last_key = None;

    for (line_no, record) in records.iter().enumerate() {
        let line_no = (line_no + 1) as u32;

        let encode_start = Instant::now();
        let t = index.encode_time(&[record.year, record.month, record.day, record.hour])?;
        let s = index.encode_space(record.lat, record.lng);
        cumulative_encoding += encode_start.elapsed();

        let insert_start = Instant::now();
        index.insert(t, s, line_no);
        cumulative_insertion += insert_start.elapsed();

        last_key = Some((t, s, line_no));
    }

    println!("====== Trie Construction ======");
    println!(">> Data encoding elapsed time: {cumulative_encoding:?}");
    println!(">> Index building elapsed time: {cumulative_insertion:?}");
    println!("    # of internal nodes: {}", index.live_internal_count());
    println!("    # of leaf nodes: {}", index.live_leaf_count());
    println!("    # of total nodes: {}", index.total_node_count());
    println!();

    println!("====== Node Deletion ======");
    if let Some((t, s, payload)) = last_key {
        println!(">> Delete last ingested record");
        println!("    # of records before deletion: {}", index.data_count());
        index.delete(t, s, &payload);
        println!("    # of records after deletion: {}", index.data_count());
    }
    println!();

    println!("====== Query Execution ======");
    let arity = resolution.arity();
    for (i, (lb, ru, t_start_fields, t_end_fields)) in sample_queries().iter().enumerate() {
        let covering = index.rectangle_to_cells(*lb, *ru);
        let t_start = index.encode_time(&t_start_fields[..arity])?;
        let t_end = index.encode_time(&t_end_fields[..arity])?;
        let hits = index.range_search(&covering, t_start, t_end);
        println!("Query {}: {} results found.", i + 1, hits.len());
    }

    Ok(())
}

type QuerySpec = ((f64, f64), (f64, f64), [u32; 4], [u32; 4]);

fn sample_queries() -> Vec<QuerySpec> {
    vec![
        (
            (23.176, 72.630),
            (23.210, 72.635),
            [2016, 4, 21, 0],
            [2016, 4, 21, 1],
        ),
        (
            (23.178, 72.632),
            (23.190, 72.645),
            [2016, 4, 21, 0],
            [2016, 4, 21, 6],
        ),
        (
            (23.174, 72.628),
            (23.205, 72.654),
            [2016, 4, 21, 0],
            [2016, 4, 21, 12],
        ),
    ]
}
