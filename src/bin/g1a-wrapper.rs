use anyhow::{bail, Context};
use clap::{App, AppSettings, Arg, ArgMatches};
use g1a::layout::LAYOUT;
use g1a::options::{default_output_path, default_program_name};
use g1a::{
    read_icon, G1aFile, HeaderRevision, PackageInfo, ParsedHeader,
    WarningPolicy, ICON_HEIGHT, ICON_WIDTH,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

//===========================================================================//

const PROGRAM: &str = "g1a-wrapper";

fn main() {
    init_logger();
    let matches = app().get_matches();
    if let Err(error) = run(&matches) {
        log::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn init_logger() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .format(|buf, record| {
        let level = record.level().to_string().to_lowercase();
        writeln!(buf, "{}: {}: {}", PROGRAM, level, record.args())
    })
    .init();
}

fn app() -> App<'static, 'static> {
    App::new(PROGRAM)
        .about(
            "Creates a g1a file (add-in application for CASIO fx-9860G \
             calculator series) from the given binary file and options.",
        )
        .setting(AppSettings::DisableVersion)
        .arg(
            Arg::with_name("input")
                .value_name("BIN_FILE")
                .required_unless("info")
                .help("Binary file to wrap (or g1a file to dump with -d)"),
        )
        .arg(
            Arg::with_name("output")
                .takes_value(true)
                .value_name("FILE")
                .short("o")
                .long("output")
                .help("Output file name [default: input with .g1a extension]"),
        )
        .arg(
            Arg::with_name("icon")
                .takes_value(true)
                .value_name("BITMAP")
                .short("i")
                .long("icon")
                .help("Program icon, a 30x19 non-indexed bmp file"),
        )
        .arg(
            Arg::with_name("name")
                .takes_value(true)
                .value_name("NAME")
                .short("n")
                .long("name")
                .help("Name of the add-in, at most 8 characters \
                       [default: truncated output file name]"),
        )
        .arg(
            Arg::with_name("version")
                .takes_value(true)
                .value_name("TEXT")
                .short("v")
                .long("version")
                .help("Program version, format 'MM.mm.pppp' advised \
                       [default: 00.00.0000]"),
        )
        .arg(
            Arg::with_name("internal")
                .takes_value(true)
                .value_name("NAME")
                .short("N")
                .long("internal")
                .help("Internal name, uppercase with a leading '@' advised \
                       [default: @ADDIN]"),
        )
        .arg(
            Arg::with_name("date")
                .takes_value(true)
                .value_name("DATE")
                .short("D")
                .long("date")
                .help("Build date, format 'yyyy.MMdd.hhmm' \
                       [default: current time]"),
        )
        .arg(
            Arg::with_name("revision")
                .takes_value(true)
                .value_name("REVISION")
                .long("revision")
                .possible_values(&["early", "standard", "extended"])
                .default_value("standard")
                .help("Header revision, sets how many leading header bytes \
                       are inverted (0x15, 0x20 or 0x28)"),
        )
        .arg(
            Arg::with_name("dump")
                .short("d")
                .long("dump")
                .help("Validates the input g1a file and displays its header"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .requires("dump")
                .help("Displays the dump as JSON"),
        )
        .arg(
            Arg::with_name("info")
                .long("info")
                .help("Displays header format information"),
        )
        .arg(
            Arg::with_name("warning")
                .takes_value(true)
                .value_name("[no-]WARNING")
                .short("W")
                .multiple(true)
                .number_of_values(1)
                .help("Enables or disables a warning: length, format, \
                       bmp-width, bmp-height, bmp-color"),
        )
}

//===========================================================================//

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    if matches.is_present("info") {
        print_layout();
        return Ok(());
    }
    let mut policy = WarningPolicy::new();
    if let Some(switches) = matches.values_of("warning") {
        for switch in switches {
            if !policy.apply_argument(switch) {
                bail!("unrecognized warning switch '-W{}'", switch);
            }
        }
    }
    let revision = matches
        .value_of("revision")
        .and_then(HeaderRevision::from_name)
        .unwrap_or_default();
    let input = match matches.value_of("input") {
        Some(input) => PathBuf::from(input),
        None => bail!("no input file"),
    };
    if matches.is_present("dump") {
        return dump(&input, revision, matches.is_present("json"));
    }
    wrap(matches, &input, revision, &policy)
}

fn wrap(
    matches: &ArgMatches,
    input: &Path,
    revision: HeaderRevision,
    policy: &WarningPolicy,
) -> anyhow::Result<()> {
    let output = match matches.value_of("output") {
        Some(output) => PathBuf::from(output),
        None => default_output_path(input),
    };
    let program_name = match matches.value_of("name") {
        Some(name) => name.to_string(),
        None => default_program_name(&output),
    };
    let mut info = PackageInfo::new(&program_name);
    if let Some(version) = matches.value_of("version") {
        info.version = version.to_string();
    }
    if let Some(internal) = matches.value_of("internal") {
        info.internal_name = internal.to_string();
    }
    info.build_date = match matches.value_of("date") {
        Some(date) => date.to_string(),
        None => chrono::Local::now().format("%Y.%m%d.%H%M").to_string(),
    };
    for warning in info.check() {
        policy.emit(&output.display(), &warning);
    }
    if let Some(icon_path) = matches.value_of("icon") {
        let decoded = read_icon(icon_path, ICON_WIDTH, ICON_HEIGHT)?;
        for warning in decoded.warnings.iter() {
            policy.emit(&icon_path, warning);
        }
        info.icon = decoded.icon;
    }

    let payload = fs::read(input).with_context(|| {
        format!("cannot open input file '{}' for reading", input.display())
    })?;
    let package = G1aFile::new(info, payload);
    let file = fs::File::create(&output).with_context(|| {
        format!("cannot open output file '{}' for writing", output.display())
    })?;
    let mut writer = std::io::BufWriter::new(file);
    package.write(&mut writer, revision)?;
    writer.flush()?;
    log::info!(
        "wrote '{}' ({} bytes)",
        output.display(),
        package.total_size()
    );
    Ok(())
}

fn dump(path: &Path, revision: HeaderRevision, json: bool) -> anyhow::Result<()> {
    let data = fs::read(path).with_context(|| {
        format!("cannot open input file '{}' for reading", path.display())
    })?;
    let parsed = PackageInfo::decode(&data, data.len() as u64, revision)
        .with_context(|| {
            format!("file '{}' is not a valid g1a file", path.display())
        })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print_dump(path, &parsed);
    }
    Ok(())
}

fn print_dump(path: &Path, parsed: &ParsedHeader) {
    let info = &parsed.info;
    println!("Input file     '{}'", path.display());
    println!("File size       {} bytes", parsed.total_size);
    println!();
    println!("Program name   '{}'", info.program_name);
    println!("Internal name  '{}'", info.internal_name);
    println!("Version        '{}'", info.version);
    println!("Build date     '{}'", info.build_date);
    println!();
    for row in info.icon.rows() {
        println!("  {}", row);
    }
}

fn print_layout() {
    println!("Add-in header format :");
    println!();
    println!("Offset\tSize\tDescription");
    for spec in LAYOUT.iter() {
        println!(
            "{:#05X}\t{}\t{}",
            spec.span.offset, spec.span.len, spec.description
        );
    }
    println!("{:#05X}\t...\tBinary content", g1a::HEADER_LEN);
}

//===========================================================================//


//===========================================================================//
