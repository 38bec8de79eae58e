use clap::{App, AppSettings, Arg, ArgMatches};
use fftw_age::{Direction, Error, Options, Report, Rigour, Transform};
use log::{error, LevelFilter};
use std::io::{self, Write};
use std::process;

fn app() -> App<'static, 'static> {
    App::new("fftw-age")
        .about("Generate multithreaded FFTW wisdom and export it to a file")
        .long_about(
            "Generate multithreaded FFTW wisdom and export it to a file.\n\n\
             Only in-place complex-to-complex transforms planned with FFTW_MEASURE ('m') or \
             FFTW_PATIENT ('p') are supported.  The wisdom file is named \
             fftw_omp_ci<direction>_<dimx>x<dimy>x<dimz>_<planner>.wisdom.",
        )
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name("planner")
                .help("Planner rigour: 'm' (measure) or 'p' (patient)")
                .required(true),
        )
        .arg(
            Arg::with_name("direction")
                .help("Transform direction: 'f' (forward) or 'b' (backward)")
                .required(true),
        )
        .arg(Arg::with_name("dimx").help("First grid dimension").required(true))
        .arg(Arg::with_name("dimy").help("Second grid dimension").required(true))
        .arg(Arg::with_name("dimz").help("Third grid dimension").required(true))
        .arg(
            Arg::with_name("wisdom_dir")
                .help("Directory to write the wisdom file to")
                .required(true),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .takes_value(true)
                .value_name("N")
                .help("Planner threads [default: $OMP_NUM_THREADS, else all cores]"),
        )
        .arg(
            Arg::with_name("if_exists")
                .long("if-exists")
                .takes_value(true)
                .possible_values(&["overwrite", "skip", "fail"])
                .default_value("overwrite")
                .help("What to do if the wisdom file already exists"),
        )
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("Re-import the wisdom file and check that it covers the transform"),
        )
        .arg(
            Arg::with_name("dry_run")
                .long("dry-run")
                .help("Print the wisdom file path and exit without planning"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print a JSON report instead of a message"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase log verbosity"),
        )
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn dimension(matches: &ArgMatches, name: &'static str) -> Result<usize, Error> {
    let value = matches.value_of(name).unwrap_or_default();
    // Out of range integers are left for `Transform::validate` to reject.
    match value.parse::<usize>() {
        Ok(n) => Ok(n),
        Err(_) => match value.parse::<i128>() {
            Ok(n) if n < 0 => Ok(0),
            Ok(_) => Ok(usize::MAX),
            Err(_) => Err(Error::InvalidCode {
                what: name,
                code: value.to_string(),
            }),
        },
    }
}

fn transform(matches: &ArgMatches) -> Result<Transform, Error> {
    let rigour: Rigour = matches.value_of("planner").unwrap_or_default().parse()?;
    let direction: Direction = matches.value_of("direction").unwrap_or_default().parse()?;
    let dims = [
        dimension(matches, "dimx")?,
        dimension(matches, "dimy")?,
        dimension(matches, "dimz")?,
    ];
    Ok(Transform::in_place_c2c(direction, rigour, dims))
}

fn render(report: &Report, json: bool) -> Result<String, Error> {
    if json {
        serde_json::to_string_pretty(report).map_err(|e| Error::Io {
            path: report.path.clone(),
            source: e.into(),
        })
    } else if report.skipped {
        Ok(format!(
            "FFTW wisdom file already exists: {}",
            report.path.display()
        ))
    } else {
        Ok(format!(
            "FFTW wisdom file has been exported: {}",
            report.path.display()
        ))
    }
}

fn run(matches: &ArgMatches, out: &mut dyn Write) -> Result<(), Error> {
    let stdout_error = |source| Error::Io {
        path: "<stdout>".into(),
        source,
    };

    let transform = transform(matches)?;
    transform.validate()?;

    let dir = matches.value_of_os("wisdom_dir").unwrap_or_default();
    if matches.is_present("dry_run") {
        let path = fftw_age::wisdom_path(dir, &transform);
        return writeln!(out, "{}", path.display()).map_err(stdout_error);
    }

    let threads = match matches.value_of("threads") {
        Some(n) => Some(
            n.parse::<usize>()
                .map_err(|_| Error::InvalidThreads(n.to_string()))?,
        ),
        None => None,
    };
    let options = Options {
        threads: fftw_age::resolve_threads(threads)?,
        if_exists: matches.value_of("if_exists").unwrap_or("overwrite").parse()?,
        verify: matches.is_present("verify"),
    };

    let report = fftw_age::generate(&transform, dir, &options)?;
    writeln!(out, "{}", render(&report, matches.is_present("json"))?).map_err(stdout_error)?;
    if report.verified {
        log::info!("verified with {} thread(s)", report.threads);
    }
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of("verbose"));

    let result = run(&matches, &mut io::stdout());
    fftw_age::cleanup();

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
