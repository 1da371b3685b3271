use std::path::PathBuf;

use clap::{crate_version, value_t, App, Arg, ArgMatches};
use pygen_driver::{InstallPolicy, Settings};
use strum::VariantNames;

pub fn app() -> App<'static, 'static> {
    let app = App::new("memflow-pygen")
        .version(crate_version!())
        .about("Generates the memflow_py wrapper code with pybindx")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Settings file (defaults to pygen.toml in the working directory)"),
        )
        .arg(
            Arg::with_name("directory")
                .short("C")
                .long("directory")
                .takes_value(true)
                .help("Working directory (defaults to the current directory)"),
        )
        .arg(path_arg("source_root", "source-root", "Root of the C++ sources"))
        .arg(path_arg("output_root", "output-root", "Where wrappers are written"))
        .arg(path_arg("include_root", "include-root", "Root of the C++ includes"))
        .arg(
            Arg::with_name("mapping")
                .short("m")
                .long("mapping")
                .takes_value(true)
                .help("Mapping file listing the symbols to bind"),
        )
        .arg(path_arg("castxml", "castxml", "castxml binary"))
        .arg(path_arg("clang", "clang", "clang binary"))
        .arg(
            Arg::with_name("cflags")
                .long("cflags")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Flags passed to the compiler front end"),
        )
        .arg(path_arg("python", "python", "Python interpreter used for pip and generation"))
        .arg(
            Arg::with_name("install")
                .long("install")
                .takes_value(true)
                .possible_values(InstallPolicy::VARIANTS)
                .help("How to treat the generator's Python dependencies"),
        )
        .arg(
            Arg::with_name("platform")
                .long("platform")
                .takes_value(true)
                .help("OS name to generate for, e.g. Windows or Linux"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .conflicts_with("quiet")
                .help("Show detailed debugging messages"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Only show warnings and errors"),
        );

    #[cfg(feature = "embedded")]
    let app = app.arg(
        Arg::with_name("embedded")
            .long("embedded")
            .help("Run the generator in an embedded interpreter"),
    );

    app
}

fn path_arg(name: &'static str, long: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).long(long).takes_value(true).help(help)
}

fn path_of(matches: &ArgMatches, name: &str) -> Option<PathBuf> {
    matches.value_of_os(name).map(PathBuf::from)
}

/// Command line values take precedence over the settings file.
pub fn apply_overrides(settings: &mut Settings, matches: &ArgMatches) {
    if let Some(mapping) = path_of(matches, "mapping") {
        settings.mapping_file = mapping;
    }
    for (name, field) in [
        ("source_root", &mut settings.source_root),
        ("output_root", &mut settings.output_root),
        ("include_root", &mut settings.include_root),
        ("castxml", &mut settings.castxml),
        ("clang", &mut settings.clang),
        ("python", &mut settings.python),
    ] {
        if let Some(path) = path_of(matches, name) {
            *field = Some(path);
        }
    }
    if let Some(cflags) = matches.value_of("cflags") {
        settings.cflags = Some(cflags.to_owned());
    }
    if let Some(platform) = matches.value_of("platform") {
        settings.platform = Some(platform.to_owned());
    }
    if matches.is_present("install") {
        settings.install =
            value_t!(matches, "install", InstallPolicy).unwrap_or_else(|e| e.exit());
    }
}
