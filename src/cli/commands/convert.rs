//! Convert command - replace Chinese display text with translation calls.
//!
//! Settings come from `.i18nrc.json` with command-line flags taking
//! precedence. Without `--apply` nothing is written: changed files are listed
//! and unmatched text is printed instead of logged.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::{
    args::ConvertCommand,
    exit_status::ExitStatus,
    report::{self, ConvertSummary},
};
use crate::{
    config::{Config, load_config},
    core::{
        ConversionContext, ConvertOptions, Converter, DictionaryIndex, ResolutionOptions,
        file_scanner::FileScanner, parsers::dictionary::load_dictionary_or_empty,
        unmatched_log::append_unmatched_log,
    },
};

/// Settings for one run after merging flags over the config file.
#[derive(Debug)]
struct ConvertSettings {
    /// Directory that config-relative paths resolve against.
    root: PathBuf,
    cwd: PathBuf,
    dictionary: PathBuf,
    targets: Vec<String>,
    resolution: ResolutionOptions,
    log_file: PathBuf,
    apply: bool,
    verbose: bool,
    config: Config,
}

impl ConvertSettings {
    fn resolve(cmd: ConvertCommand) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read current directory")?;
        let loaded = load_config(&cwd)?;
        let root = loaded.root.clone().unwrap_or_else(|| cwd.clone());
        let config = loaded.config;
        let args = cmd.args;
        let skip_unmatched = args.skip_unmatched_flag().unwrap_or(config.skip_unmatched);

        let dictionary = match args.dict {
            Some(dict) => cwd.join(dict),
            None => root.join(&config.dictionary),
        };
        let log_file = match args.log_file {
            Some(log_file) => cwd.join(log_file),
            None => root.join(&config.log_file),
        };
        // Absolute targets make the scanner ignore its base directory.
        let targets = if cmd.paths.is_empty() {
            config.includes.clone()
        } else {
            cmd.paths
                .iter()
                .map(|path| cwd.join(path).to_string_lossy().into_owned())
                .collect()
        };
        let match_path = args.match_path.unwrap_or_else(|| config.match_path.clone());
        let resolution = ResolutionOptions::new(skip_unmatched, Some(match_path));

        Ok(Self {
            root,
            cwd,
            dictionary,
            targets,
            resolution,
            log_file,
            apply: args.apply,
            verbose: args.verbose,
            config,
        })
    }

    fn display_path<'p>(&self, path: &'p Path) -> std::borrow::Cow<'p, str> {
        path.strip_prefix(&self.cwd).unwrap_or(path).to_string_lossy()
    }
}

pub fn convert(cmd: ConvertCommand) -> Result<ExitStatus> {
    let settings = ConvertSettings::resolve(cmd)?;
    let config = &settings.config;

    let index = DictionaryIndex::build(&load_dictionary_or_empty(&settings.dictionary));
    tracing::debug!(
        dictionary = %settings.dictionary.display(),
        texts = index.len(),
        "dictionary indexed"
    );

    let scanner = FileScanner::new(
        &settings.root,
        &config.extensions,
        &config.ignores,
        settings.verbose,
    );
    let dictionary_path = settings.dictionary.canonicalize().ok();
    let files: Vec<PathBuf> = scanner
        .scan(&settings.targets)
        .files
        .into_iter()
        .filter(|file| file.canonicalize().ok() != dictionary_path)
        .collect();

    let mut ctx = ConversionContext::new(&index, settings.resolution.clone());
    let mut converter = Converter::new(
        &mut ctx,
        ConvertOptions {
            template_callee: &config.template_callee,
            script_callee: &config.script_callee,
            log_receivers: &config.log_receivers,
        },
    );

    let mut summary = ConvertSummary {
        files_scanned: files.len(),
        apply: settings.apply,
        ..Default::default()
    };

    for file in &files {
        let display = settings.display_path(file);
        let outcome = match converter.convert_file(file) {
            Ok(outcome) => outcome,
            Err(err) => {
                report::print_file_error(&display, &err);
                summary.files_failed += 1;
                continue;
            }
        };

        for failure in &outcome.failures {
            report::print_region_failure(&display, failure);
        }
        if outcome.has_failures() {
            summary.files_failed += 1;
        }
        if !outcome.changed {
            continue;
        }

        if settings.apply
            && let Err(err) = fs::write(file, &outcome.output)
                .with_context(|| format!("Failed to write file: {:?}", file))
        {
            report::print_file_error(&display, &err);
            summary.files_failed += 1;
            continue;
        }
        summary.files_changed += 1;
        report::print_changed_file(&display, settings.apply);
    }

    let unmatched = ctx.drain_unmatched();
    summary.unmatched_count = unmatched.len();
    if settings.apply {
        if append_unmatched_log(&settings.log_file, &unmatched, false)? {
            summary.log_file = Some(settings.display_path(&settings.log_file).into_owned());
        }
    } else {
        report::print_unmatched(&unmatched);
    }

    report::print_summary(&summary);

    if summary.files_failed > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
