use anyhow::{Context, Result};
use bsa_snpset::{filter, import, output, summary, table_reader, ContingencyG, FilterCriteria, StderrLog};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

#[derive(Parser)]
#[command(name = "bsa-snpset")]
#[command(version)]
#[command(about = "Import and filter a two-bulk variant table for BSA-Seq", long_about = None)]
struct Args {
    /// Input variant table (e.g. GATK VariantsToTable output)
    #[arg(short, long)]
    input: String,

    /// Output CSV file path
    #[arg(short, long)]
    output: String,

    /// Sample name of the high bulk (columns <name>.DP, <name>.AD, <name>.GQ)
    #[arg(long)]
    high_bulk: String,

    /// Sample name of the low bulk
    #[arg(long)]
    low_bulk: String,

    /// Field delimiter of the input table: a single ASCII character, or `\t` / `tab`
    #[arg(long, default_value = "\\t", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Keep only these chromosomes (repeatable)
    #[arg(long = "chrom")]
    chroms: Vec<String>,

    /// Keep sites with x < REF_FRQ < 1 - x
    #[arg(long)]
    ref_allele_freq: Option<f64>,

    /// MAD multiplier for the total-depth outlier filter
    #[arg(long, default_value = "2.5")]
    mad_multiplier: f64,

    /// Disable the MAD total-depth filter
    #[arg(long)]
    no_mad_filter: bool,

    /// Minimum combined depth of both bulks
    #[arg(long)]
    min_total_depth: Option<u64>,

    /// Maximum combined depth of both bulks
    #[arg(long)]
    max_total_depth: Option<u64>,

    /// Maximum absolute depth difference between the bulks
    #[arg(long)]
    max_depth_difference: Option<u32>,

    /// Minimum read depth per bulk
    #[arg(long)]
    min_sample_depth: Option<u32>,

    /// Minimum genotype quality per bulk
    #[arg(long, default_value = "99")]
    min_gq: f64,

    /// Disable the genotype quality filter
    #[arg(long)]
    no_gq_filter: bool,

    /// Number of threads for the G-statistic
    #[arg(long, default_value_t = num_cpus())]
    threads: usize,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            ref_allele_freq: self.ref_allele_freq,
            mad_multiplier: (!self.no_mad_filter).then_some(self.mad_multiplier),
            min_total_depth: self.min_total_depth,
            max_total_depth: self.max_total_depth,
            max_depth_difference: self.max_depth_difference,
            min_sample_depth: self.min_sample_depth,
            min_gq: (!self.no_gq_filter).then_some(self.min_gq),
        }
    }
}

/// Accept a literal character, or the escapes a shell user is likely to type.
fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "\\t" | "tab" | "TAB" => Ok(b'\t'),
        "\\s" | "space" => Ok(b' '),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!(
                    "expected a single ASCII character or \\t, got '{}'",
                    s
                )),
            }
        }
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

macro_rules! progress {
    ($quiet:expr) => {
        if !$quiet {
            eprintln!();
        }
    };
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn make_spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("  {spinner} [{elapsed_precise}] {msg}")?);
    Ok(pb)
}

fn main() -> Result<()> {
    let args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .context("Failed to configure thread pool")?;

    if !Path::new(&args.input).exists() {
        anyhow::bail!("Input file not found: {}", args.input);
    }

    let criteria = args.criteria();
    criteria.validate()?;
    let log = StderrLog::new(args.quiet);

    progress!(args.quiet, "BSA SNP-set import and filter");
    progress!(args.quiet, "=========================================");
    progress!(args.quiet, "Input table: {}", args.input);
    progress!(args.quiet, "Output CSV: {}", args.output);
    progress!(args.quiet, "High bulk: {}", args.high_bulk);
    progress!(args.quiet, "Low bulk: {}", args.low_bulk);
    if !args.chroms.is_empty() {
        progress!(args.quiet, "Chromosomes: {}", args.chroms.join(", "));
    }
    progress!(args.quiet, "Threads: {}", args.threads);
    progress!(args.quiet);

    progress!(args.quiet, "Step 1: Reading variant table...");
    let pb = make_spinner(args.quiet)?;
    pb.set_message("reading");
    let table = table_reader::load_table(Path::new(&args.input), args.delimiter)
        .with_context(|| format!("Failed to read {}", args.input))?;
    pb.finish_and_clear();
    progress!(args.quiet, "  Rows: {}", table.len());

    progress!(args.quiet);
    progress!(args.quiet, "Step 2: Deriving per-site statistics...");
    let chroms = (!args.chroms.is_empty()).then_some(args.chroms.as_slice());
    let records = import(
        &table,
        &args.high_bulk,
        &args.low_bulk,
        chroms,
        &ContingencyG,
        &log,
    )
    .context("Failed to import variant table")?;
    drop(table);

    progress!(args.quiet);
    progress!(args.quiet, "Step 3: Filtering sites...");
    let filtered = filter(&records, &criteria, &log);
    progress!(
        args.quiet,
        "  Retained sites: {} ({:.1}%)",
        filtered.len(),
        100.0 * filtered.len() as f64 / records.len().max(1) as f64
    );
    drop(records);

    progress!(args.quiet);
    progress!(args.quiet, "Step 4: Summary statistics...");
    match summary::GStatSummary::from_records(&filtered) {
        Some(s) => {
            for line in s.report_lines() {
                progress!(args.quiet, "  {}", line);
            }
        }
        None => progress!(args.quiet, "  No sites with a finite G-statistic"),
    }
    for (chrom, n) in summary::chrom_counts(&filtered) {
        progress!(args.quiet, "  {}: {} sites", chrom, n);
    }

    progress!(args.quiet);
    progress!(args.quiet, "Step 5: Writing results to CSV...");
    output::write_records(&filtered, Path::new(&args.output))
        .with_context(|| format!("Failed to write {}", args.output))?;

    progress!(args.quiet);
    progress!(args.quiet, "Done! Results written to: {}", args.output);

    Ok(())
}
