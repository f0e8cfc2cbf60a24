mod cli;
mod lib;
mod load;

use std::{io, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

use cli::{
    plot::Plotter,
    shell::Shell,
    table::{Overview, Table},
    Error,
};
use lib::session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let matches = cli::app().get_matches();

    let session = match matches.value_of("FILE") {
        Some(filename) => {
            let mut errs = load::error::Record::new();
            let session = load::read_session(filename, &mut errs);
            eprint!("{}", errs);
            session.ok_or_else(|| Error::Load(filename.to_string()))?
        }
        None => Session::default(),
    };
    let date = match matches.value_of("date") {
        Some(text) => cli::parse_date(text)?,
        None => chrono::Local::now().date_naive(),
    };
    let out_dir = cli::out_dir(&matches);

    let alloc = session.allocate();
    println!("{}", Overview::new(&session.society, &alloc));
    println!("{}", Table::from(&alloc).with_title("Monthly maintenance"));

    for id in cli::wanted(&session, &matches)? {
        if let Some(path) = cli::write_bill(&session, id, &out_dir, date)? {
            println!("Bill written to {}", path.display());
        }
    }

    if let Some(file) = matches.value_of("plot") {
        let file = PathBuf::from(file);
        Plotter::from(&alloc)
            .save(&file)
            .map_err(|source| Error::Write { path: file.clone(), source })?;
    }

    if matches.is_present("interactive") {
        let mut shell = Shell::new(session, out_dir, date);
        let stdin = io::stdin();
        shell.run(stdin.lock(), io::stdout())?;
    }
    Ok(())
}
