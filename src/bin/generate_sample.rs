use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use genre_explorer::Record;

/// Write a synthetic movies-per-genre summary as CSV and Parquet.
#[derive(Debug, Parser)]
struct Args {
    /// Directory the files are written to.
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// (genre, base gross in $M for 1986, yearly growth)
const GENRES: &[(&str, f64, f64)] = &[
    ("Action", 900.0, 0.060),
    ("Adventure", 1100.0, 0.055),
    ("Animation", 250.0, 0.090),
    ("Comedy", 1200.0, 0.020),
    ("Crime", 300.0, 0.015),
    ("Documentary", 10.0, 0.080),
    ("Drama", 700.0, 0.025),
    ("Horror", 180.0, 0.040),
    ("Musical", 40.0, 0.010),
    ("Romance", 220.0, 0.012),
    ("Thriller", 350.0, 0.030),
    ("Western", 60.0, -0.020),
];

const FIRST_YEAR: i64 = 1986;
const LAST_YEAR: i64 = 2016;

/// Roughly one genre-year in twelve is missing so the pivot has to zero-fill.
fn generate(rng: &mut SimpleRng) -> Vec<Record> {
    let mut records = Vec::new();
    for year in FIRST_YEAR..=LAST_YEAR {
        let t = (year - FIRST_YEAR) as f64;
        for &(genre, base, growth) in GENRES {
            if rng.next_f64() < 1.0 / 12.0 {
                continue;
            }
            let noise = 0.75 + 0.5 * rng.next_f64();
            let gross = (base * (1.0 + growth).powf(t) * noise * 1e6).round();
            records.push(Record::new(genre, year, gross));
        }
    }
    records
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV file")?;
    wtr.write_record(["genre", "year", "gross"])?;
    for r in records {
        wtr.write_record([r.category.clone(), r.year.to_string(), r.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("genre", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("gross", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                records.iter().map(|r| r.category.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(records.iter().map(|r| r.value).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let records = generate(&mut rng);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let csv_path = args.out_dir.join("movies_genres_summary.csv");
    let parquet_path = args.out_dir.join("movies_genres_summary.parquet");

    write_csv(&csv_path, &records)?;
    write_parquet(&parquet_path, &records)?;

    println!(
        "Wrote {} rows ({} genres, {FIRST_YEAR}-{LAST_YEAR}) to {} and {}",
        records.len(),
        GENRES.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
