use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use clap::{App, Arg};
use env_logger::Env;
use log::{info, warn};
use schemnbt::{DecodeOpts, NegativeListLen};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-dump")
        .about("Print an NBT file as JSON. Reads stdin when no file is given.")
        .arg(Arg::with_name("file").takes_value(true).required(false))
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true)
                .required(false)
                .default_value("512"),
        )
        .arg(
            Arg::with_name("strict-lists")
                .long("strict-lists")
                .help("fail on lists with a negative length")
                .takes_value(false)
                .required(false),
        )
        .get_matches();

    let max_depth: usize = matches.value_of("max-depth").unwrap_or("512").parse()?;
    let negative_list_len = if matches.is_present("strict-lists") {
        NegativeListLen::Reject
    } else {
        NegativeListLen::AsEmpty
    };
    let opts = DecodeOpts::new()
        .max_depth(max_depth)
        .negative_list_len(negative_list_len);

    let input: Box<dyn Read> = match matches.value_of("file") {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let root = schemnbt::decode(input, &opts)?;
    if root.is_lenient() {
        warn!("{} lists had a negative length", root.lenient_lists);
    }
    info!("root {:?} with {} fields", root.name, root.compound.len());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut out, &root)?;
    writeln!(out)?;
    Ok(())
}
