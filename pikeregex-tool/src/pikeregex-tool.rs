#![allow(clippy::uninlined_format_args)]

use log::info;
use pikeregex::{Error, Flags, Match, Regex};
use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "pikeregex-tool")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// The flags of the regular expression: b, p, t.
    #[structopt(long, short, parse(from_str = Flags::from))]
    flags: Option<Flags>,

    /// Dump the compiler output to stdout.
    #[structopt(long)]
    dump_basic: bool,

    /// Dump the linked program to stdout.
    #[structopt(long)]
    dump_program: bool,

    /// Search for matches anywhere instead of matching at the start.
    #[structopt(long, conflicts_with = "utf16be")]
    search: bool,

    /// The input values to match against.
    #[structopt(conflicts_with = "file")]
    inputs: Vec<String>,

    /// Match against the contents of a specified file.
    #[structopt(long, conflicts_with = "inputs")]
    file: Option<PathBuf>,

    /// Read the file as big-endian UTF-16 instead of UTF-8.
    #[structopt(long, requires = "file")]
    utf16be: bool,
}

fn format_match(m: &Match) -> Result<String, Error> {
    let stats = m.stats();
    Ok(format!(
        "Match: {:?}, unread: {:?} (ticks: {}, peak threads: {})",
        m.matched_text().unwrap_or_default(),
        m.unread().remaining_text()?,
        stats.ticks,
        stats.peak_threads
    ))
}

fn report(m: &Match) -> Result<(), Error> {
    if m.matched() {
        println!("{}", format_match(m)?);
    } else {
        println!("No match");
    }
    Ok(())
}

fn search_string(re: &Regex, input: &str) {
    let mut matches = re.find_iter(input);
    if let Some(range) = matches.next() {
        let count = 1 + matches.count();
        println!(
            "Match: {:?} ({}..{}), total: {}",
            &input[range.clone()],
            range.start,
            range.end,
            count
        );
    } else {
        println!("No match");
    }
}

fn exec_re_on_string(re: &Regex, input: &str, search: bool) -> Result<(), Error> {
    if search {
        search_string(re, input);
        Ok(())
    } else {
        report(&re.match_str(input)?)
    }
}

fn exec_re_on_path(re: &Regex, path: &Path, args: &Opt) -> Result<(), Error> {
    if args.utf16be {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(err) => {
                println!("{}: {}", err, path.display());
                return Ok(());
            }
        };
        return report(&re.match_reader(BufReader::new(file))?);
    }
    match fs::read_to_string(path) {
        Ok(contents) => exec_re_on_string(re, contents.as_str(), args.search),
        Err(err) => {
            println!("{}: {}", err, path.display());
            Ok(())
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Opt::from_args();

    let flags = args.flags.unwrap_or_default();
    info!("Compiling {:?} with flags '{}'", args.pattern, flags);
    let re = Regex::with_flags(&args.pattern, flags)?;
    if args.dump_basic {
        println!("Basic program:\n{}", re.basic_program());
    }
    if args.dump_program {
        println!("Program:\n{}", re.program());
    }

    if let Some(ref path) = args.file {
        exec_re_on_path(&re, path, &args)?;
    } else {
        for input in &args.inputs {
            exec_re_on_string(&re, input, args.search)?;
        }
    }
    Ok(())
}
