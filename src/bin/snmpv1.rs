//! snmpv1: run SNMPv1 GET and SET operations against one agent.

use clap::Parser;
use snmpv1_manager::cli::Args;
use snmpv1_manager::{Batch, BatchOutcome, Manager, Operation, Outcome};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.init_tracing();

    let manager = match Manager::builder()
        .community(&args.community)
        .timeout(args.timeout)
        .retries(args.retries)
        .build()
    {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let operations = args.operations.clone();
    let batch = Batch::new(args.mode.into(), args.operations);
    let results = manager.run(&args.target, batch).await;

    let mut failed = false;
    let mut report = |operation: &Operation, outcome: &Outcome| {
        failed |= !outcome.is_success();
        println!("{}", operation.kind());
        println!("{}", outcome);
    };

    match &results {
        BatchOutcome::Sequential(outcomes) => {
            for (operation, outcome) in operations.iter().zip(outcomes) {
                report(operation, outcome);
            }
        }
        BatchOutcome::Concurrent(completions) => {
            for completion in completions {
                report(&operations[completion.index], &completion.outcome);
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
