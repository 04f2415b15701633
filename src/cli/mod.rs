// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line, hands a PipelineConfig to the
// application layer and prints what was produced.
//
//   password-lstm --data export.csv --col -1 --epochs 5 \
//                 --save_ckpt personal.ckpt \
//                 --export_onnx personal_lstm.onnx \
//                 --patterns patterns.json
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;

use crate::application::train_use_case::{RunSummary, TrainUseCase};
use crate::infra::checkpoint::LoadOutcome;
use commands::PipelineArgs;

#[derive(Parser, Debug)]
#[command(
    name = "password-lstm",
    version,
    about = "Learn password patterns from a password-manager export and write browser-extension artifacts.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub args: PipelineArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let use_case = TrainUseCase::new(self.args.into());
        let summary  = use_case.execute()?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &RunSummary) {
    match &summary.load {
        LoadOutcome::Loaded(path) => println!("Started from checkpoint {}", path.display()),
        LoadOutcome::ColdStart { .. } => println!("Started from fresh parameters"),
    }
    if summary.passwords > 0 {
        match summary.final_perplexity() {
            Some(ppl) => println!("Trained on {} passwords, final ppl={:.2}", summary.passwords, ppl),
            None      => println!("Loaded {} passwords, no epochs run", summary.passwords),
        }
    }
    for artifact in &summary.artifacts {
        println!("  {:<10} {}", artifact.kind, artifact.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::PipelineConfig;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> PipelineConfig {
        let argv = std::iter::once("password-lstm").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().args.into()
    }

    #[test]
    fn test_underscore_flags() {
        let cfg = parse(&[
            "--data", "pw.csv",
            "--load_ckpt", "base.ckpt",
            "--save_ckpt", "me.ckpt",
            "--export_onnx", "me.onnx",
            "--patterns", "patterns.json",
        ]);
        assert_eq!(cfg.data, Some(PathBuf::from("pw.csv")));
        assert_eq!(cfg.load_ckpt, Some(PathBuf::from("base.ckpt")));
        assert_eq!(cfg.save_ckpt, Some(PathBuf::from("me.ckpt")));
        assert_eq!(cfg.export_onnx, Some(PathBuf::from("me.onnx")));
        assert_eq!(cfg.patterns, Some(PathBuf::from("patterns.json")));
    }

    #[test]
    fn test_negative_column() {
        assert_eq!(parse(&["--data", "pw.csv", "--col", "-2"]).col, -2);
        assert_eq!(parse(&["--data", "pw.csv", "--col=-1"]).col, -1);
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(&["--data", "pw.txt"]);
        assert_eq!(cfg.col, -1);
        assert_eq!(cfg.epochs, 5);
        assert!(cfg.save_ckpt.is_none());
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn test_no_arguments_shows_help() {
        let err = Cli::try_parse_from(["password-lstm"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_dashed_flag_is_rejected() {
        assert!(Cli::try_parse_from(["password-lstm", "--load-ckpt", "x"]).is_err());
    }
}
