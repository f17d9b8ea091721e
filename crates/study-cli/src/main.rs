//! `antares-study-version`: create and upgrade studies

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use study_version::{
    available_versions, supported_versions, CreateApp, StudyVersion, TemplateDir, UpgradeApp,
};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("antares-study-version")
        .version(study_version::VERSION)
        .about("Create and upgrade Antares studies")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("versions")
                .about("List supported versions")
                .arg(
                    Arg::new("templates")
                        .long("templates")
                        .value_parser(value_parser!(PathBuf))
                        .help("Template directory to list versions from"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Create a study from a template")
                .arg(
                    Arg::new("study-dir")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory of the new study"),
                )
                .arg(
                    Arg::new("caption")
                        .long("caption")
                        .required(true)
                        .help("Caption of the study"),
                )
                .arg(
                    Arg::new("version")
                        .long("version")
                        .required(true)
                        .value_parser(StudyVersion::parse)
                        .help("Version of the study, e.g. 8.8 or 880"),
                )
                .arg(
                    Arg::new("author")
                        .long("author")
                        .default_value("")
                        .help("Author of the study"),
                )
                .arg(
                    Arg::new("templates")
                        .long("templates")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Template directory"),
                ),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Upgrade a study in place")
                .arg(
                    Arg::new("study-dir")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory of the study"),
                )
                .arg(
                    Arg::new("version")
                        .long("version")
                        .required(true)
                        .value_parser(StudyVersion::parse)
                        .help("Target version, e.g. 9.2"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn versions(args: &ArgMatches) -> Result<()> {
    let upgrade: Vec<String> = supported_versions().iter().map(ToString::to_string).collect();
    let templates = match args.get_one::<PathBuf>("templates") {
        Some(root) => Some(
            available_versions(&TemplateDir::new(root))
                .with_context(|| format!("cannot list templates in {}", root.display()))?,
        ),
        None => None,
    };

    if args.get_flag("json") {
        let report = serde_json::json!({ "upgrade": upgrade, "templates": templates });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Upgrade versions: {}", upgrade.join(", "));
        if let Some(templates) = templates {
            println!("Template versions: {}", templates.join(", "));
        }
    }
    Ok(())
}

fn create(args: &ArgMatches) -> Result<()> {
    let study_dir = required::<PathBuf>(args, "study-dir")?;
    let caption = required::<String>(args, "caption")?;
    let version = *required::<StudyVersion>(args, "version")?;
    let author = required::<String>(args, "author")?;
    let templates = required::<PathBuf>(args, "templates")?;

    let app = CreateApp::new(study_dir, caption, version, author)?;
    app.run(&TemplateDir::new(templates))
        .with_context(|| format!("cannot create study {}", study_dir.display()))?;
    println!("Study '{}' created in {}", app.caption(), study_dir.display());
    Ok(())
}

fn upgrade(args: &ArgMatches) -> Result<()> {
    let study_dir = required::<PathBuf>(args, "study-dir")?;
    let version = *required::<StudyVersion>(args, "version")?;

    let previous = UpgradeApp::new(study_dir, version)
        .run()
        .with_context(|| format!("cannot upgrade study {}", study_dir.display()))?;
    println!("Study {} upgraded from {previous} to {version}", study_dir.display());
    Ok(())
}

fn required<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(id)
        .with_context(|| format!("missing argument {id}"))
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let result = match matches.subcommand() {
        Some(("versions", args)) => versions(args),
        Some(("create", args)) => create(args),
        Some(("upgrade", args)) => upgrade(args),
        _ => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
