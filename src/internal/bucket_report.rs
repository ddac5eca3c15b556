#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::cast_precision_loss)]

use std::{
    error::Error,
    path::{Path, PathBuf},
    time::Instant,
};

use bid_index::{
    Bid, BidStore, ChainedHashTable, ColumnLayout, KeyStrategy, OrderedTree, RemovalPolicy,
    TableConfig, initialize_logger, read_bids,
};
use clap::Parser;
use log::{info, warn};
use plotters::prelude::*;
use rand::Rng;

const HISTOGRAM_FILE: &str = "chain_lengths.png";
const RANDOM_ID_LIMIT: u32 = 1_000_000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Loads bids into both indexes and reports on them", long_about = None)]
struct Args {
    /// CSV export to load; random ids are generated when omitted
    #[arg(short, long)]
    csv: Option<PathBuf>,

    /// Hash table bucket count (defaults to BID_INDEX_TABLE_SIZE or 179)
    #[arg(short, long)]
    table_size: Option<usize>,

    /// numeric, strict or text
    #[arg(short, long)]
    key_strategy: Option<KeyStrategy>,

    /// unlink or clear-bucket
    #[arg(short, long)]
    removal_policy: Option<RemovalPolicy>,

    /// Bid id to look up in both indexes
    #[arg(short, long, default_value = "98010")]
    search: String,

    /// Bid id to remove from both indexes after the lookup
    #[arg(long)]
    remove: Option<String>,

    /// Number of random bids when no CSV is given
    #[arg(short = 'n', long, default_value_t = 10_000)]
    count: usize,

    /// Print every bid in id order
    #[arg(long)]
    display: bool,

    /// Where to write the chain length histogram
    #[arg(short, long, default_value = HISTOGRAM_FILE)]
    output: PathBuf,
}

impl Args {
    fn table_config(&self) -> Result<TableConfig, bid_index::IndexError> {
        let mut config = TableConfig::from_env()?;
        if let Some(table_size) = self.table_size {
            config = config.with_table_size(table_size);
        }
        if let Some(strategy) = self.key_strategy {
            config = config.with_key_strategy(strategy);
        }
        if let Some(policy) = self.removal_policy {
            config = config.with_removal_policy(policy);
        }
        config.validate()?;
        Ok(config)
    }
}

fn random_bids(count: usize) -> Vec<Bid> {
    let mut rng = rand::rng();
    (0..count)
        .map(|n| {
            let id = rng.random_range(1..RANDOM_ID_LIMIT).to_string();
            let amount = f64::from(rng.random_range(1..50_000_u32)) / 100.0;
            Bid::new(id, format!("Lot {n}"), "General Fund", amount)
        })
        .collect()
}

fn timed_load<S: BidStore>(name: &str, store: &mut S, bids: &[Bid]) -> Result<(), Box<dyn Error>> {
    let started = Instant::now();
    for bid in bids {
        store.insert_bid(bid.clone())?;
    }
    info!("{name}: {} bids inserted in {:?}", store.len(), started.elapsed());
    Ok(())
}

fn report_search<S: BidStore>(name: &str, store: &S, id: &str) {
    let started = Instant::now();
    let found = store.search_bid(id);
    let elapsed = started.elapsed();
    match found {
        Some(bid) => println!("{name}: {bid} (found in {elapsed:?})"),
        None => println!("{name}: bid id {id} not found (searched in {elapsed:?})"),
    }
}

fn plot_chain_lengths(table: &ChainedHashTable, output: &Path) -> Result<(), Box<dyn Error>> {
    let lengths = table.chain_lengths();
    let longest = lengths.iter().copied().max().unwrap_or(0);
    let mut counts = vec![0_usize; longest.saturating_add(1)];
    for &length in &lengths {
        if let Some(count) = counts.get_mut(length) {
            *count = count.saturating_add(1);
        }
    }
    let peak = counts.iter().copied().max().unwrap_or(0);

    let root = BitMapBackend::new(output, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = format!(
        "Chain lengths: {} bids in {} buckets (load factor {:.2})",
        table.len(),
        table.capacity(),
        table.load_factor()
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..longest.saturating_add(1)).into_segmented(),
            0..peak.saturating_add(1),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Chain length")
        .y_desc("Buckets")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RGBColor(50, 90, 220).filled())
            .margin(2)
            .data(lengths.iter().map(|&length| (length, 1))),
    )?;

    root.present()?;
    info!("wrote chain length histogram to {}", output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    let args = Args::parse();
    let config = args.table_config()?;
    info!(
        "table size {}, {} keys, {} on remove",
        config.table_size(),
        config.key_strategy(),
        config.removal_policy()
    );

    let bids = match &args.csv {
        Some(path) => {
            let file = std::io::BufReader::new(std::fs::File::open(path)?);
            let (bids, report) = read_bids(file, &ColumnLayout::default())?;
            if report.skipped > 0 {
                warn!("{} rows of {} could not be read", report.skipped, path.display());
            }
            bids
        }
        None => random_bids(args.count),
    };
    info!("{} bids read", bids.len());

    let mut table = ChainedHashTable::with_config(config)?;
    timed_load("hash table", &mut table, &bids)?;

    let mut tree = OrderedTree::new();
    timed_load("tree", &mut tree, &bids)?;

    let started = Instant::now();
    let balanced = OrderedTree::from_sorted(bids);
    info!("balanced tree: {} bids built in {:?}", balanced.len(), started.elapsed());
    info!("tree height {}, balanced height {}", tree.height(), balanced.height());

    if args.display {
        for bid in &tree {
            println!("{bid}");
        }
    }

    report_search("hash table", &table, &args.search);
    report_search("tree", &tree, &args.search);
    report_search("balanced tree", &balanced, &args.search);

    if let Some(id) = &args.remove {
        let from_table = table.remove(id).is_some();
        let from_tree = tree.remove(id).is_some();
        println!("removed {id}: hash table {from_table}, tree {from_tree}");
        report_search("hash table", &table, id);
        report_search("tree", &tree, id);
    }

    plot_chain_lengths(&table, &args.output)?;

    Ok(())
}
