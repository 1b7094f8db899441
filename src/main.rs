use std::fs;
use std::io;
use std::path;
use std::process;

use bytesize::ByteSize;
use clap::ArgEnum;
use env_logger;
use log;

use disk_sort::buffer::mem::MemoryLimitedBufferBuilder;
use disk_sort::{
    ChunkBufferBuilder, DiskSorterBuilder, InMemorySorter, LineSource, ParallelSorter, StableSorter, WordSource,
};

type Records = Box<dyn Iterator<Item = io::Result<String>>>;

fn main() {
    let arg_parser = build_arg_parser();

    let log_level: LogLevel = arg_parser.value_of_t_or_exit("log_level");
    init_logger(log_level);

    let order: Order = arg_parser.value_of_t_or_exit("sort");
    let work_dir: Option<&str> = arg_parser.value_of("work_dir");
    let max_size: usize = arg_parser.value_of_t_or_exit("max_size");
    let chunk_size: Option<&str> = arg_parser.value_of("chunk_size");
    let words = arg_parser.is_present("words");
    let threads: Option<usize> = arg_parser
        .is_present("threads")
        .then(|| arg_parser.value_of_t_or_exit("threads"));

    let input = arg_parser.value_of("input").expect("value is required");
    let input_stream = match fs::File::open(input) {
        Ok(file) => io::BufReader::new(file),
        Err(err) => {
            log::error!("input file opening error: {}", err);
            process::exit(1);
        }
    };
    let records: Records = if words {
        Box::new(
            WordSource::new(input_stream)
                .with_trim_punctuation(true)
                .with_lowercase(true),
        )
    } else {
        Box::new(LineSource::new(input_stream))
    };

    let output = arg_parser.value_of("output").expect("value is required");

    let sorter: Box<dyn InMemorySorter> = match (threads, order) {
        (None, Order::Asc) => Box::new(StableSorter::natural()),
        (None, Order::Desc) => Box::new(StableSorter::reversed()),
        (Some(threads), order) => {
            let sorter = match order {
                Order::Asc => ParallelSorter::natural(Some(threads)),
                Order::Desc => ParallelSorter::reversed(Some(threads)),
            };
            match sorter {
                Ok(sorter) => Box::new(sorter),
                Err(err) => {
                    log::error!("thread pool initialization error: {}", err);
                    process::exit(1);
                }
            }
        }
    };

    let mut sorter_builder = DiskSorterBuilder::new().with_sorter(sorter).with_max_size(max_size);
    if let Some(work_dir) = work_dir {
        sorter_builder = sorter_builder.with_work_dir(path::Path::new(work_dir));
    }

    if let Some(chunk_size) = chunk_size {
        let buffer = MemoryLimitedBufferBuilder::new(
            chunk_size.parse::<ByteSize>().expect("value is pre-validated").as_u64(),
        );
        run(sorter_builder.with_buffer(buffer), records, output);
    } else {
        run(sorter_builder, records, output);
    }
}

fn run<B>(sorter_builder: DiskSorterBuilder<Box<dyn InMemorySorter>, B>, records: Records, output: &str)
where
    B: ChunkBufferBuilder<String>,
{
    let mut sorter = match sorter_builder.build() {
        Ok(sorter) => sorter,
        Err(err) => {
            log::error!("sorter initialization error: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = sorter.sort(records, path::Path::new(output)) {
        log::error!("data sorting error: {}", err);
        if let Err(err) = sorter.clear() {
            log::warn!("temporary files cleanup error: {}", err);
        }
        process::exit(1);
    }
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn possible_values() -> impl Iterator<Item = clap::PossibleValue<'static>> {
        Self::value_variants().iter().filter_map(|v| v.to_possible_value())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogLevel as clap::ArgEnum>::from_str(s, false)
    }
}

#[derive(Copy, Clone, clap::ArgEnum)]
enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn possible_values() -> impl Iterator<Item = clap::PossibleValue<'static>> {
        Order::value_variants().iter().filter_map(|v| v.to_possible_value())
    }
}

impl std::str::FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Order as clap::ArgEnum>::from_str(s, false)
    }
}

fn build_arg_parser() -> clap::ArgMatches {
    clap::App::new("disk-sort")
        .about("on-disk text sorter")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("file to be sorted")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("result file")
                .required(true)
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("sort")
                .short('s')
                .long("sort")
                .help("sorting order")
                .takes_value(true)
                .default_value("asc")
                .possible_values(Order::possible_values()),
        )
        .arg(
            clap::Arg::new("words")
                .short('w')
                .long("words")
                .help("sort lowercased words instead of lines"),
        )
        .arg(
            clap::Arg::new("log_level")
                .short('l')
                .long("loglevel")
                .help("logging level")
                .takes_value(true)
                .default_value("info")
                .possible_values(LogLevel::possible_values()),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("number of threads to use for in-memory chunk sorting")
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("work_dir")
                .short('d')
                .long("work-dir")
                .help("directory to be used to store temporary files, created if missing")
                .takes_value(true),
        )
        .arg(
            clap::Arg::new("max_size")
                .short('n')
                .long("max-size")
                .help("maximum number of records in a chunk")
                .takes_value(true)
                .default_value("100000")
                .validator(|v| match v.parse::<usize>() {
                    Ok(0) => Err("Max size must be positive".to_string()),
                    Ok(_) => Ok(()),
                    Err(err) => Err(format!("Max size format incorrect: {}", err)),
                }),
        )
        .arg(
            clap::Arg::new("chunk_size")
                .short('c')
                .long("chunk-size")
                .help("chunk memory limit, overrides max size")
                .takes_value(true)
                .validator(|v| match v.parse::<ByteSize>() {
                    Ok(_) => Ok(()),
                    Err(err) => Err(format!("Chunk size format incorrect: {}", err)),
                }),
        )
        .get_matches()
}

fn init_logger(log_level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(match log_level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        })
        .format_timestamp_millis()
        .init();
}
