/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsi_progress_logger::{ProgressLog, progress_logger};
use levelrank::prelude::*;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use std::time::SystemTime;

#[derive(Args, Debug)]
/// Shared CLI arguments for reading files containing arcs.
pub struct ArcsArgs {
    #[arg(long, default_value_t = '#')]
    /// Ignore lines that start with this symbol.
    pub line_comment_symbol: char,

    #[arg(long, default_value_t = '\t')]
    /// The column separator.
    pub separator: char,

    #[arg(long, default_value_t = 0)]
    /// The index of the column containing the source node of an arc.
    pub source_column: usize,

    #[arg(long, default_value_t = 1)]
    /// The index of the column containing the target node of an arc.
    pub target_column: usize,

    #[arg(long)]
    /// The number of nodes in the graph; if specified this will be used
    /// instead of the number inferred. This is useful if you want to add
    /// isolated nodes at the end of the graph.
    pub num_nodes: Option<usize>,
}

impl Default for ArcsArgs {
    fn default() -> Self {
        Self {
            line_comment_symbol: '#',
            separator: '\t',
            source_column: 0,
            target_column: 1,
            num_nodes: None,
        }
    }
}

/// Reads a graph from a list of arcs.
pub fn load_arcs(
    global_args: &GlobalArgs,
    path: impl AsRef<Path>,
    args: &ArcsArgs,
) -> Result<VecGraph> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    read_arcs(global_args, BufReader::new(file), args)
        .with_context(|| format!("Could not read arcs from {}", path.display()))
}

/// Reads a graph from a list of arcs.
pub fn read_arcs(global_args: &GlobalArgs, file: impl BufRead, args: &ArcsArgs) -> Result<VecGraph> {
    let mut pl = progress_logger![item_name = "line"];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }
    pl.start("Reading arcs...");

    let biggest_idx = args.source_column.max(args.target_column);
    let mut arcs = Vec::new();
    let mut num_nodes = 0;
    for (line_num, line) in file.lines().enumerate() {
        let line = line.with_context(|| format!("Error reading line {}", line_num + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(args.line_comment_symbol) {
            continue;
        }

        let vals = line.split(args.separator).collect::<Vec<_>>();
        ensure!(
            vals.len() > biggest_idx,
            "Line {}: {:?} does not have enough columns: got {} columns but expected at least {} columns separated by {:?} (you can change the separator using the --separator option)",
            line_num + 1,
            line,
            vals.len(),
            biggest_idx + 1,
            args.separator,
        );
        let parse = |val: &str, what: &str| {
            val.trim().parse::<usize>().with_context(|| {
                format!(
                    "Error parsing {what} column value {:?} at line {}",
                    val,
                    line_num + 1
                )
            })
        };
        let src = parse(vals[args.source_column], "source")?;
        let dst = parse(vals[args.target_column], "target")?;
        num_nodes = num_nodes.max(src.max(dst) + 1);
        arcs.push((src, dst));
        pl.light_update();
    }
    pl.done();

    if let Some(user_num_nodes) = args.num_nodes {
        if user_num_nodes < num_nodes {
            bail!(
                "The number of nodes specified by --num-nodes={} is smaller than the number of nodes found in the arcs: {}",
                user_num_nodes,
                num_nodes
            );
        }
        num_nodes = user_num_nodes;
    }

    let mut graph = VecGraph::empty(num_nodes);
    graph.add_arcs(arcs);
    log::info!("Arcs: {} Nodes: {}", graph.num_arcs(), num_nodes);
    Ok(graph)
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// The tolerance scaling.
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliScaling {
    /// Use the ℓ₁ norm, with a tolerance for each level proportional to its
    /// size.
    #[default]
    LevelProportional,
    /// Use the ℓ∞ norm, with the same tolerance for all levels.
    Global,
}

impl From<CliScaling> for ToleranceScaling {
    fn from(s: CliScaling) -> Self {
        match s {
            CliScaling::LevelProportional => ToleranceScaling::LevelProportional,
            CliScaling::Global => ToleranceScaling::Global,
        }
    }
}

/// How dead ends are handled.
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliDeadEnds {
    /// Handle dead ends as if they had a loop.
    #[default]
    SelfLoop,
    /// Redistribute the rank of dead ends uniformly (whole-graph
    /// computation only).
    Teleport,
}

impl From<CliDeadEnds> for DeadEnds {
    fn from(d: CliDeadEnds) -> Self {
        match d {
            CliDeadEnds::SelfLoop => DeadEnds::SelfLoop,
            CliDeadEnds::Teleport => DeadEnds::Teleport,
        }
    }
}

/// How ranks are updated during an iteration.
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliUpdateOrder {
    /// Jacobi iteration, reading the ranks of the previous iteration.
    #[default]
    Unordered,
    /// Gauss–Seidel iteration, updating ranks in place.
    Ordered,
}

impl From<CliUpdateOrder> for UpdateOrder {
    fn from(o: CliUpdateOrder) -> Self {
        match o {
            CliUpdateOrder::Unordered => UpdateOrder::Unordered,
            CliUpdateOrder::Ordered => UpdateOrder::Ordered,
        }
    }
}

/// Shared CLI arguments for PageRank computations.
#[derive(Args, Debug)]
pub struct PageRankArgs {
    #[arg(short, long, default_value_t = PageRankOptions::DEFAULT_ALPHA)]
    /// The damping factor α (must be in the interval [0 . . 1).
    pub alpha: f64,

    #[arg(short, long, default_value_t = PageRankOptions::DEFAULT_TOLERANCE)]
    /// The error threshold to stop.
    pub tolerance: f64,

    #[arg(long, default_value_t = PageRankOptions::DEFAULT_MAX_ITER)]
    /// Maximum number of iterations of each level.
    pub max_iter: usize,

    #[arg(long, value_enum, default_value_t = CliScaling::LevelProportional)]
    /// How the tolerance of each level is derived.
    pub scaling: CliScaling,

    #[arg(long, value_enum, default_value_t = CliDeadEnds::SelfLoop)]
    /// How dead ends are handled.
    pub dead_ends: CliDeadEnds,

    #[arg(long, value_enum, default_value_t = CliUpdateOrder::Unordered)]
    /// How ranks are updated during an iteration.
    pub order: CliUpdateOrder,

    #[arg(long, default_value_t = 1)]
    /// Repeat the computation to measure its mean running time.
    pub repeat: usize,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

impl PageRankArgs {
    /// Returns the options of the computation.
    pub fn options(&self) -> Result<PageRankOptions> {
        ensure!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&self.alpha),
            "The damping factor must be in [0 . . 1), got {}",
            self.alpha
        );
        ensure!(
            self.tolerance >= 0.0,
            "The tolerance must be nonnegative, got {}",
            self.tolerance
        );
        ensure!(self.repeat > 0, "The number of repetitions must be positive");
        let mut options = PageRankOptions::default();
        options
            .alpha(self.alpha)
            .tolerance(self.tolerance)
            .max_iter(self.max_iter)
            .scaling(self.scaling.into())
            .dead_ends(self.dead_ends.into())
            .update_order(self.order.into())
            .repeat(self.repeat);
        Ok(options)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing and loading vectors of floats.
pub enum FloatVectorFormat {
    /// ASCII format, one float per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Stores float values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// `precision` will be used to truncate the float values to the specified
    /// number of decimal digits. If `None`, the shortest representation that
    /// reads back to the same value will be used.
    pub fn store(&self, path: impl AsRef<Path>, values: &[f64], precision: Option<usize>) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for word in values.iter() {
                    match precision {
                        None => writeln!(file, "{word}"),
                        Some(precision) => writeln!(file, "{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                write!(file, "[")?;
                for word in values.iter().take(values.len().saturating_sub(1)) {
                    match precision {
                        None => write!(file, "{word}, "),
                        Some(precision) => write!(file, "{word:.precision$}, "),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                if let Some(last) = values.last() {
                    match precision {
                        None => write!(file, "{last}"),
                        Some(precision) => write!(file, "{last:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                write!(file, "]")?;
            }
        }
        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;

        Ok(())
    }

    /// Loads float values from the specified `path` using the format defined
    /// by `self`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<f64>> {
        let path = path.as_ref();
        let path_display = path.display();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open {}", path_display))?;
        let reader = BufReader::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Loading ASCII format from {}", path_display);
                reader
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                    .map(|(i, line)| {
                        let line = line.with_context(|| {
                            format!("Error reading line {} of {}", i + 1, path_display)
                        })?;
                        line.trim().parse::<f64>().map_err(|e| {
                            anyhow!("Error parsing line {} of {}: {}", i + 1, path_display, e)
                        })
                    })
                    .collect()
            }
            FloatVectorFormat::Json => {
                log::info!("Loading JSON format from {}", path_display);
                serde_json::from_reader(reader)
                    .with_context(|| format!("Could not parse JSON array in {}", path_display))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// How to store vectors of integers.
pub enum IntVectorFormat {
    /// ASCII format, one integer per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl IntVectorFormat {
    /// Stores a vector of `usize` in the specified `path` using the format
    /// defined by `self`.
    pub fn store(&self, path: impl AsRef<Path>, data: &[usize]) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut buf = BufWriter::new(file);

        match self {
            IntVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for word in data.iter() {
                    writeln!(buf, "{}", word)
                        .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            IntVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                write!(buf, "[")?;
                for word in data.iter().take(data.len().saturating_sub(1)) {
                    write!(buf, "{}, ", word)
                        .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                if let Some(last) = data.last() {
                    write!(buf, "{}", last)
                        .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                write!(buf, "]")?;
            }
        };
        buf.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;

        Ok(())
    }
}

pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

pub fn init_env_logger() -> Result<()> {
    use jiff::SpanRound;
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default unit is milliseconds; you can use
    /// the suffixes s, m, h and d.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[command(subcommand)]
    Rank(rank::SubCommands),
    Sccs(sccs::CliArgs),
    Random(random::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "levelrank", version)]
/// Level-wise parallel PageRank.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes).
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

pub mod random;
pub mod rank;
pub mod sccs;

pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        SubCommands::Rank(args) => {
            rank::main(cli.args, args)?;
        }
        SubCommands::Sccs(args) => {
            sccs::main(cli.args, args)?;
        }
        SubCommands::Random(args) => {
            random::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let weeks = elapsed_seconds / (60 * 60 * 24 * 7);
    elapsed_seconds %= 60 * 60 * 24 * 7;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    match weeks {
        0 => {}
        1 => result.push_str("1 week "),
        _ => result.push_str(&format!("{} weeks ", weeks)),
    }
    match days {
        0 => {}
        1 => result.push_str("1 day "),
        _ => result.push_str(&format!("{} days ", days)),
    }
    match hours {
        0 => {}
        1 => result.push_str("1 hour "),
        _ => result.push_str(&format!("{} hours ", hours)),
    }
    match minutes {
        0 => {}
        1 => result.push_str("1 minute "),
        _ => result.push_str(&format!("{} minutes ", minutes)),
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration("1m 30s")?, Duration::from_secs(90));
        assert_eq!(parse_duration("250")?, Duration::from_millis(250));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3x").is_err());
        Ok(())
    }

    #[test]
    fn test_pretty_print_elapsed() {
        assert_eq!(pretty_print_elapsed(1.5), "1.500 seconds (1.5s)");
        assert_eq!(
            pretty_print_elapsed(3723.0),
            "1 hour 2 minutes 3.000 seconds (3723s)"
        );
    }

    #[test]
    fn test_read_arcs() -> Result<()> {
        let input = "# a comment\n0\t1\n1\t2\n\n2\t0\n";
        let graph = read_arcs(&GlobalArgs::default(), input.as_bytes(), &ArcsArgs::default())?;
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_arcs(), 3);
        assert!(graph.has_arc(2, 0));

        let args = ArcsArgs {
            separator: ' ',
            num_nodes: Some(5),
            ..ArcsArgs::default()
        };
        let graph = read_arcs(&GlobalArgs::default(), "0 1\n".as_bytes(), &args)?;
        assert_eq!(graph.num_nodes(), 5);

        assert!(read_arcs(&GlobalArgs::default(), "0\tx\n".as_bytes(), &ArcsArgs::default()).is_err());
        assert!(read_arcs(&GlobalArgs::default(), "0 1\n".as_bytes(), &ArcsArgs::default()).is_err());
        Ok(())
    }

    mod float_vector_format {
        use super::*;

        #[test]
        fn test_ascii() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("test.txt");
            let values = vec![1.5, 2.75, 0.1];
            FloatVectorFormat::Ascii.store(&path, &values, None)?;
            assert_eq!(FloatVectorFormat::Ascii.load(&path)?, values);
            Ok(())
        }

        #[test]
        fn test_json() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("test.json");
            let values = vec![1.5, 2.75, 0.1];
            FloatVectorFormat::Json.store(&path, &values, None)?;
            assert_eq!(std::fs::read_to_string(&path)?, "[1.5, 2.75, 0.1]");
            assert_eq!(FloatVectorFormat::Json.load(&path)?, values);

            FloatVectorFormat::Json.store(&path, &[], None)?;
            assert!(FloatVectorFormat::Json.load(&path)?.is_empty());
            Ok(())
        }

        #[test]
        fn test_precision() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("test.txt");
            FloatVectorFormat::Ascii.store(&path, &[1.0 / 3.0, 0.5], Some(3))?;
            assert_eq!(std::fs::read_to_string(&path)?, "0.333\n0.500\n");
            Ok(())
        }
    }

    #[test]
    fn test_int_vector_format() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test.json");
        IntVectorFormat::Json.store(&path, &[3, 1, 2])?;
        assert_eq!(std::fs::read_to_string(&path)?, "[3, 1, 2]");
        IntVectorFormat::Ascii.store(&path, &[3, 1, 2])?;
        assert_eq!(std::fs::read_to_string(&path)?, "3\n1\n2\n");
        Ok(())
    }

    #[test]
    fn test_rank_levelwise() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let arcs = dir.path().join("arcs.tsv");
        let ranks = dir.path().join("ranks.json");
        std::fs::write(&arcs, "0\t1\n1\t0\n1\t2\n2\t3\n3\t2\n")?;
        cli_main([
            "levelrank",
            "rank",
            "levelwise",
            arcs.to_str().unwrap(),
            "-o",
            ranks.to_str().unwrap(),
            "--fmt",
            "json",
            "-t",
            "1e-10",
        ])?;
        let ranks: Vec<f64> = serde_json::from_str(&std::fs::read_to_string(&ranks)?)?;
        assert_eq!(ranks.len(), 4);
        assert!((ranks.iter().sum::<f64>() - 1.0).abs() < 1E-6);
        assert!(ranks[2] > ranks[0]);
        Ok(())
    }

    #[test]
    fn test_rank_dynamic() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let old = dir.path().join("old.tsv");
        let new = dir.path().join("new.tsv");
        let updated = dir.path().join("updated.txt");
        let scratch = dir.path().join("scratch.txt");
        std::fs::write(&old, "0\t1\n1\t0\n2\t3\n3\t2\n")?;
        std::fs::write(&new, "0\t1\n1\t0\n1\t2\n2\t3\n3\t2\n")?;
        cli_main([
            "levelrank",
            "rank",
            "dynamic",
            old.to_str().unwrap(),
            new.to_str().unwrap(),
            "-o",
            updated.to_str().unwrap(),
            "-t",
            "1e-12",
        ])?;
        cli_main([
            "levelrank",
            "rank",
            "monolithic",
            new.to_str().unwrap(),
            "-o",
            scratch.to_str().unwrap(),
            "-t",
            "1e-12",
        ])?;
        let updated = FloatVectorFormat::Ascii.load(&updated)?;
        let scratch = FloatVectorFormat::Ascii.load(&scratch)?;
        for (u, s) in updated.iter().zip(&scratch) {
            assert!((u - s).abs() < 1E-6, "{u} != {s}");
        }
        Ok(())
    }

    #[test]
    fn test_teleport_refused() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let arcs = dir.path().join("arcs.tsv");
        std::fs::write(&arcs, "0\t1\n")?;
        let output = dir.path().join("ranks.txt");
        assert!(
            cli_main([
                "levelrank",
                "rank",
                "levelwise",
                arcs.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "--dead-ends",
                "teleport",
            ])
            .is_err()
        );
        Ok(())
    }

    #[test]
    fn test_sccs_and_random() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let arcs = dir.path().join("random.tsv");
        let components = dir.path().join("sccs.txt");
        let levels = dir.path().join("levels.txt");
        cli_main([
            "levelrank",
            "random",
            "50",
            "0.05",
            "--seed",
            "7",
            "-o",
            arcs.to_str().unwrap(),
        ])?;
        cli_main([
            "levelrank",
            "sccs",
            arcs.to_str().unwrap(),
            "--num-nodes",
            "50",
            "-o",
            components.to_str().unwrap(),
            "-l",
            levels.to_str().unwrap(),
        ])?;
        let components = std::fs::read_to_string(&components)?;
        assert_eq!(components.lines().count(), 50);
        assert!(!std::fs::read_to_string(&levels)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_rank_ordered() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let arcs = dir.path().join("arcs.tsv");
        let unordered = dir.path().join("unordered.txt");
        let ordered = dir.path().join("ordered.txt");
        std::fs::write(&arcs, "0\t1\n1\t2\n2\t0\n2\t3\n3\t4\n4\t3\n")?;
        for (path, order) in [(&unordered, "unordered"), (&ordered, "ordered")] {
            cli_main([
                "levelrank",
                "rank",
                "levelwise",
                arcs.to_str().unwrap(),
                "-o",
                path.to_str().unwrap(),
                "-t",
                "1e-12",
                "--order",
                order,
            ])?;
        }
        let unordered = FloatVectorFormat::Ascii.load(&unordered)?;
        let ordered = FloatVectorFormat::Ascii.load(&ordered)?;
        for (u, o) in unordered.iter().zip(&ordered) {
            assert!((u - o).abs() < 1E-9, "{u} != {o}");
        }
        Ok(())
    }
}
