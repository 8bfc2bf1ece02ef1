// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line interface.

use crate::assets::{discover_containers, find_by_name, save_dirty};
use crate::console::{self, PlayError};
use crate::csv_tool::{self, CsvError};
use crate::language_update::update_languages;
use crate::settings::{EditorSettings, SettingsError};
use crate::validate;
use clap::{Parser, Subcommand};
use dialogue_editor_graph::{AssetError, LanguageTag};
use dialogue_editor_runtime::DialogueContext;
use std::io;
use std::path::PathBuf;

/// Dialogue Editor - manage dialogue assets, localization sheets and playback
#[derive(Debug, Parser)]
#[command(name = "dialogue_editor")]
#[command(version, about = "Manage dialogue graphs, localization sheets and playback")]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Project root; settings and relative directories resolve against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Settings file (defaults to <root>/dialogue_editor.ron)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override the active language
    #[arg(long)]
    pub language: Option<LanguageTag>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export all dialogue text to the CSV save file
    ExportCsv {
        /// Write here instead of the configured save file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import dialogue text from the CSV load file
    ImportCsv {
        /// Read from here instead of the configured load file
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Complete every language table against the configured languages
    UpdateLanguages,
    /// Check every dialogue for structural problems
    Validate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild every dialogue through the graph and save it back
    Resave,
    /// Play a dialogue in the terminal
    Play {
        /// Dialogue name or file name without `.dialogue.ron`
        name: String,
    },
    /// Write the default settings file
    InitSettings {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Errors ending a command
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings could not be loaded
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A dialogue asset failed to load or save
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// A CSV sheet failed to load or save
    #[error(transparent)]
    Csv(#[from] CsvError),
    /// Playback failed
    #[error(transparent)]
    Play(#[from] PlayError),
    /// The validation report could not be encoded
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    /// No dialogue has the requested name
    #[error("No dialogue named '{0}'")]
    DialogueNotFound(String),
    /// Validation found problems
    #[error("Validation found {0} issues")]
    ValidationFailed(usize),
    /// The settings file exists and `--force` was not given
    #[error("{} already exists; pass --force to replace it", .0.display())]
    SettingsExist(PathBuf),
}

impl Cli {
    fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| EditorSettings::settings_file_path(&self.root))
    }

    /// Load settings with command-line overrides applied
    pub fn load_settings(&self) -> Result<EditorSettings, SettingsError> {
        let mut settings = EditorSettings::load_or_default(&self.settings_path())?;
        if let Some(language) = self.language {
            if !settings.languages.contains(&language) {
                tracing::warn!("Language {language} is not in the configured language list");
            }
            settings.language = language;
        }
        Ok(settings)
    }

    /// Run the selected command
    pub fn run(&self) -> Result<(), AppError> {
        if let Commands::InitSettings { force } = &self.command {
            return self.init_settings(*force);
        }

        let settings = self.load_settings()?;
        let dialogue_dir = settings.dialogue_dir(&self.root);
        let mut assets = discover_containers(&dialogue_dir);

        match &self.command {
            Commands::ExportCsv { output } => {
                let path = output
                    .clone()
                    .unwrap_or_else(|| settings.csv_save_path(&self.root));
                let rows = csv_tool::export_to_file(&assets, &path)?;
                println!("Exported {rows} rows to {}", path.display());
            }
            Commands::ImportCsv { input } => {
                let path = input
                    .clone()
                    .unwrap_or_else(|| settings.csv_load_path(&self.root));
                let report = csv_tool::import_from_file(&path, &mut assets, &settings.languages)?;
                if !report.ignored_columns.is_empty() {
                    tracing::warn!("Ignored columns: {}", report.ignored_columns.join(", "));
                }
                let saved = save_dirty(&mut assets)?;
                println!(
                    "Applied {} rows ({} unmatched); saved {saved} dialogues",
                    report.applied, report.unmatched
                );
            }
            Commands::UpdateLanguages => {
                let changed = update_languages(&mut assets, &settings.languages);
                save_dirty(&mut assets)?;
                println!("Updated {changed} of {} dialogues", assets.len());
            }
            Commands::Validate { json } => {
                let reports = validate::validate(&assets, &settings.languages);
                if *json {
                    println!("{}", validate::format_json(&reports)?);
                } else {
                    print!("{}", validate::format_text(&reports));
                }
                let issues = validate::issue_count(&reports);
                if issues > 0 {
                    return Err(AppError::ValidationFailed(issues));
                }
            }
            Commands::Resave => {
                for asset in &mut assets {
                    let (graph, report) = asset.to_graph(&settings.languages);
                    if !report.is_complete() {
                        tracing::warn!("'{}' did not load cleanly: {report:?}", asset.container.name);
                    }
                    asset.save_graph(&graph)?;
                }
                println!("Resaved {} dialogues", assets.len());
            }
            Commands::Play { name } => {
                let asset = find_by_name(&mut assets, name)
                    .ok_or_else(|| AppError::DialogueNotFound(name.clone()))?;
                let mut ctx = DialogueContext::new(settings.language_context());
                let state = console::play(
                    asset.container.clone(),
                    &mut ctx,
                    io::stdin().lock(),
                    io::stdout().lock(),
                )?;
                tracing::debug!("Playback stopped in state {state:?}");
            }
            Commands::InitSettings { .. } => {}
        }
        Ok(())
    }

    fn init_settings(&self, force: bool) -> Result<(), AppError> {
        let path = self.settings_path();
        if path.exists() && !force {
            return Err(AppError::SettingsExist(path));
        }
        EditorSettings::default().save(&path)?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dialogue_editor_graph::{DialogueAsset, DialogueGraph};

    fn cli(root: &std::path::Path, args: &[&str]) -> Cli {
        let mut argv = vec!["dialogue_editor", "--root", root.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn seed(root: &std::path::Path) {
        let mut graph = DialogueGraph::new("intro", &LanguageTag::ALL);
        let start = graph.create_start_node([0.0, 0.0]);
        let line = graph.create_dialogue_node([100.0, 0.0]);
        let start_out = graph.node(start).unwrap().output(0).unwrap().id;
        let line_in = graph.node(line).unwrap().input(0).unwrap().id;
        graph.connect(start, start_out, line, line_in).unwrap();
        graph.add_choice_port(line, None).unwrap();

        let path = root.join("dialogues").join("intro.dialogue.ron");
        DialogueAsset::new(path, "intro").save_graph(&graph).unwrap();
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_language_flag_parses_tag_names() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = cli(dir.path(), &["--language", "Danish", "validate"]);
        assert_eq!(parsed.language, Some(LanguageTag::Danish));
        assert!(Cli::try_parse_from(["dialogue_editor", "--language", "Klingon", "validate"]).is_err());
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());

        cli(dir.path(), &["export-csv"]).run().unwrap();
        let saved = dir.path().join("csv").join("DialogueCSV_Save.csv");
        let sheet = std::fs::read_to_string(&saved).unwrap();
        assert!(sheet.starts_with("Guid ID,English,German,Danish,Japanese\n"));

        let load = dir.path().join("csv").join("DialogueCSV_Load.csv");
        std::fs::write(&load, sheet.replace("\"Continue\"", "\"Onward\"")).unwrap();
        cli(dir.path(), &["import-csv"]).run().unwrap();

        let asset = DialogueAsset::load(dir.path().join("dialogues").join("intro.dialogue.ron")).unwrap();
        let label = &asset.container.dialogue_nodes[0].ports[0].labels;
        assert_eq!(label.get(LanguageTag::Japanese).unwrap(), "Onward");
    }

    #[test]
    fn test_validate_and_resave() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());

        cli(dir.path(), &["validate", "--json"]).run().unwrap();
        cli(dir.path(), &["resave"]).run().unwrap();
        cli(dir.path(), &["update-languages"]).run().unwrap();

        DialogueAsset::new(dir.path().join("dialogues").join("empty.dialogue.ron"), "empty")
            .save()
            .unwrap();
        let err = cli(dir.path(), &["validate"]).run().unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(1)));
    }

    #[test]
    fn test_init_settings_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        cli(dir.path(), &["init-settings"]).run().unwrap();
        assert!(dir.path().join("dialogue_editor.ron").exists());
        assert!(matches!(
            cli(dir.path(), &["init-settings"]).run(),
            Err(AppError::SettingsExist(_))
        ));
        cli(dir.path(), &["init-settings", "--force"]).run().unwrap();
    }

    #[test]
    fn test_play_unknown_dialogue() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            cli(dir.path(), &["play", "nobody"]).run(),
            Err(AppError::DialogueNotFound(_))
        ));
    }
}
