use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{App, Arg};
use env_logger::Env;
use log::{error, info};
use rayon::prelude::*;
use schematic_reader::{read_schematic_with_opts, BlockEntity, Entity, Mode, ReadOpts, Schematic};
use serde::Serialize;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Serialize)]
struct Summary {
    file: PathBuf,
    width: i32,
    height: i32,
    length: i32,
    version: Option<i32>,
    data_version: Option<i32>,
    offset: [i32; 3],
    palette_size: usize,
    block_entities: usize,
    entities: usize,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Details>,
}

#[derive(Serialize)]
struct Details {
    block_entities: Vec<BlockEntity>,
    entities: Vec<Entity>,
}

#[derive(Clone, Copy)]
struct Extras {
    counts: bool,
    details: bool,
}

/// How many cells use each palette entry.
fn block_counts(schematic: &Schematic) -> BTreeMap<String, usize> {
    let mut per_index = vec![0; schematic.palette().len()];
    for &index in schematic.volume().as_slice() {
        per_index[index as usize] += 1;
    }

    schematic
        .palette()
        .iter()
        .map(|(i, entry)| (entry.to_owned(), per_index[i as usize]))
        .collect()
}

fn summarise(path: &Path, opts: &ReadOpts, extras: Extras) -> Result<Summary> {
    let bytes = std::fs::read(path)?;
    let schematic = read_schematic_with_opts(&bytes, opts)?;
    let (width, height, length) = schematic.dimensions();

    Ok(Summary {
        file: path.to_owned(),
        width,
        height,
        length,
        version: schematic.version(),
        data_version: schematic.data_version(),
        offset: schematic.offset(),
        palette_size: schematic.palette().len(),
        block_entities: schematic.block_entities().count(),
        entities: schematic.entities().len(),
        warnings: schematic.warnings().iter().map(|w| w.to_string()).collect(),
        counts: extras.counts.then(|| block_counts(&schematic)),
        details: extras.details.then(|| Details {
            block_entities: schematic.block_entities().cloned().collect(),
            entities: schematic.entities().to_vec(),
        }),
    })
}

fn print_summary(s: &Summary) {
    println!("{}", s.file.display());
    println!("  size:           {}x{}x{}", s.width, s.height, s.length);
    if let Some(v) = s.version {
        println!("  version:        {}", v);
    }
    if let Some(v) = s.data_version {
        println!("  data version:   {}", v);
    }
    println!("  offset:         {:?}", s.offset);
    println!("  palette:        {} entries", s.palette_size);
    println!("  block entities: {}", s.block_entities);
    println!("  entities:       {}", s.entities);
    for w in &s.warnings {
        println!("  warning:        {}", w);
    }
    if let Some(counts) = &s.counts {
        for (entry, count) in counts {
            println!("  {:>8} {}", count, entry);
        }
    }
    if let Some(details) = &s.details {
        for be in &details.block_entities {
            println!("  block entity:   {} at {:?}", be.id(), be.pos());
        }
        for e in &details.entities {
            println!("  entity:         {} at {:?}", e.id(), e.pos());
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("schem-info")
        .about("Summarise Sponge schematic files")
        .arg(
            Arg::with_name("files")
                .takes_value(true)
                .multiple(true)
                .required(true),
        )
        .arg(
            Arg::with_name("lenient")
                .long("lenient")
                .help("accept unused palette entries and left over block data")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("counts")
                .long("counts")
                .help("count the blocks of each palette entry")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("entities")
                .long("entities")
                .help("list block entities and entities with their data")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .required(false),
        )
        .get_matches();

    let mode = if matches.is_present("lenient") {
        Mode::Lenient
    } else {
        Mode::Strict
    };
    let opts = ReadOpts::new().mode(mode);
    let extras = Extras {
        counts: matches.is_present("counts"),
        details: matches.is_present("entities"),
    };

    let files: Vec<PathBuf> = matches
        .values_of("files")
        .map(|v| v.map(PathBuf::from).collect())
        .unwrap_or_default();

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, summarise(path, &opts, extras)))
        .collect();

    let mut summaries = Vec::new();
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }
    info!("{} read, {} failed", summaries.len(), failed);

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("could not render json: {}", e),
        }
    } else {
        summaries.iter().for_each(print_summary);
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
