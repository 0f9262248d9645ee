use std::fs;
use std::path::Path;

use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;

use rwt::perf_and_test_utils::{gen_range_queries, gen_rank_queries, type_of, TimingQueries};
use rwt::{
    BuildUnsigned, FlatWaveletTree, KthUnsigned, RangeCountUnsigned, RankUnsigned, SpaceUsage,
    WaveletTree,
};

const N_RUNS: usize = 10;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Input filename
    #[clap(short, long, value_parser)]
    input_file: String,
    #[clap(short, long, value_parser)]
    #[arg(default_value_t = 1000000)]
    n_queries: usize,
    #[arg(short, long)]
    test_correctness: bool,
    #[arg(short, long)]
    rank: bool,
    #[arg(short, long)]
    kth: bool,
    #[arg(short = 'c', long)]
    range_count: bool,
}

fn load_or_build<T>(path: &Path, text: &[u8], alphabet_low: u16, alphabet_high: u16) -> T
where
    T: BuildUnsigned + Serialize + DeserializeOwned,
{
    if path.exists() {
        println!(
            "Index already exists. Filename: {}. I'm going to read it ...",
            path.display()
        );
        let serialized = fs::read(path).unwrap();
        println!("Serialized size: {:?} bytes", serialized.len());
        bincode::deserialize::<T>(&serialized).unwrap()
    } else {
        let mut t = TimingQueries::new(1, 1); // measure building time
        t.start();
        let ds = T::build(text, alphabet_low, alphabet_high);
        t.stop();
        let (t_min, _, _) = t.get();
        println!("Construction time {:?} millisecs", t_min / 1000000);

        let serialized = bincode::serialize(&ds).unwrap();
        println!("Serialized size: {:?} bytes", serialized.len());
        fs::write(path, serialized).unwrap();
        ds
    }
}

fn test_rank_performance<T: RankUnsigned + SpaceUsage>(
    ds: &T,
    n: usize,
    queries: &[(usize, u8)],
) {
    let mut result = 0;
    let mut t = TimingQueries::new(N_RUNS, queries.len());

    for _ in 0..N_RUNS {
        t.start();
        for &(pos, symbol) in queries.iter() {
            let i = (pos + result) % (n + 1);
            result = ds.rank(symbol, i);
        }
        t.stop()
    }

    let (t_min, t_max, t_avg) = t.get();
    println!(
        "[ds_name: {}, exp: rank_latency, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, space (bytes): {}, space (Mbytes): {:.2}, n_queries: {}, n_runs: {}]",
        type_of(&ds),
        n,
        t_min,
        t_max,
        t_avg,
        ds.space_usage_bytes(),
        ds.space_usage_mbytes(),
        queries.len(),
        N_RUNS
    );

    println!("fake {}", result);
}

fn test_kth_performance<T: KthUnsigned + SpaceUsage>(
    ds: &T,
    n: usize,
    queries: &[(usize, usize)],
) {
    let mut result: usize = 0;
    let mut t = TimingQueries::new(N_RUNS, queries.len());

    for _ in 0..N_RUNS {
        t.start();
        for &(l, r) in queries.iter() {
            let k = result % (r - l);
            result = ds.kth(l, r, k) as usize;
        }
        t.stop()
    }

    let (t_min, t_max, t_avg) = t.get();
    println!(
        "[ds_name: {}, exp: kth_latency, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, space (bytes): {}, space (Mbytes): {:.2}, n_queries: {}, n_runs: {}]",
        type_of(&ds),
        n,
        t_min,
        t_max,
        t_avg,
        ds.space_usage_bytes(),
        ds.space_usage_mbytes(),
        queries.len(),
        N_RUNS
    );

    println!("fake {}", result);
}

fn test_range_count_performance<T: RangeCountUnsigned + SpaceUsage>(
    ds: &T,
    n: usize,
    queries: &[(usize, usize)],
) {
    let mut result = 0;
    let mut t = TimingQueries::new(N_RUNS, queries.len());

    for _ in 0..N_RUNS {
        t.start();
        for &(l, r) in queries.iter() {
            let a = (result % 128) as u8;
            let b = a.saturating_add(64);
            result = ds.range_count(l, r, a, b);
        }
        t.stop()
    }

    let (t_min, t_max, t_avg) = t.get();
    println!(
        "[ds_name: {}, exp: range_count_latency, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, space (bytes): {}, space (Mbytes): {:.2}, n_queries: {}, n_runs: {}]",
        type_of(&ds),
        n,
        t_min,
        t_max,
        t_avg,
        ds.space_usage_bytes(),
        ds.space_usage_mbytes(),
        queries.len(),
        N_RUNS
    );

    println!("fake {}", result);
}

fn test_correctness(linked: &WaveletTree, flat: &FlatWaveletTree, sequence: &[u8]) {
    print!("\nTesting correctness... ");

    let n = sequence.len();
    let mut counts = [0usize; 256];
    for (i, &symbol) in sequence.iter().enumerate() {
        counts[symbol as usize] += 1;
        let rank = linked.rank(symbol, i + 1);
        assert_eq!(rank, counts[symbol as usize]);
        assert_eq!(flat.rank(symbol, i + 1), rank);
    }

    let mut sorted = sequence.to_vec();
    sorted.sort_unstable();
    let step = (n / 1000).max(1);
    for k in (0..n).step_by(step) {
        assert_eq!(linked.kth(0, n, k), sorted[k]);
        assert_eq!(flat.kth(0, n, k), sorted[k]);
    }

    let (alphabet_low, alphabet_high) = linked.alphabet();
    for l in (0..n).step_by(step) {
        let count = linked.range_count(l, n, alphabet_low as u8, alphabet_high as u8);
        assert_eq!(count, n - l);
        assert_eq!(
            flat.range_count(l, n, alphabet_low as u8, alphabet_high as u8),
            count
        );
    }

    println!("Everything is ok!\n");
}

fn main() {
    let args = Args::parse();
    let input_filename = args.input_file;
    let text = std::fs::read(&input_filename).expect("Cannot read the input file.");
    assert!(!text.is_empty(), "The input file is empty.");

    let n = text.len();
    let alphabet_low = *text.iter().min().unwrap() as u16;
    let alphabet_high = *text.iter().max().unwrap() as u16;
    println!("Text length: {:?}", n);
    println!("Alphabet: [{alphabet_low}, {alphabet_high}]");

    let linked_filename = input_filename.clone() + ".wt";
    let linked: WaveletTree = load_or_build(
        Path::new(&linked_filename),
        &text,
        alphabet_low,
        alphabet_high,
    );

    let flat_filename = input_filename + ".flat.wt";
    let flat: FlatWaveletTree = load_or_build(
        Path::new(&flat_filename),
        &text,
        alphabet_low,
        alphabet_high,
    );

    if args.test_correctness {
        test_correctness(&linked, &flat, &text);
    }

    let rank_queries = gen_rank_queries(args.n_queries, &text);
    let range_queries = gen_range_queries(args.n_queries, n);

    if args.rank {
        test_rank_performance(&linked, n, &rank_queries);
        test_rank_performance(&flat, n, &rank_queries);
    }

    if args.kth {
        test_kth_performance(&linked, n, &range_queries);
        test_kth_performance(&flat, n, &range_queries);
    }

    if args.range_count {
        test_range_count_performance(&linked, n, &range_queries);
        test_range_count_performance(&flat, n, &range_queries);
    }
}
