//! warrant coaching reference demo CLI
//!
//! Evaluates the documented access scenarios, or a single ad-hoc query,
//! against the coaching organisation's role policy.
//!
//! Usage:
//!   cargo run -p demo -- scenarios
//!   cargo run -p demo -- scenarios --document --json
//!   cargo run -p demo -- check --principal '{"id":"1","roles":["COACH"],"institution":"I1"}' \
//!       --kind user --subject '{"id":"2","roles":["PARENT"],"coaches":["1"],"institution":"I1"}' \
//!       --action read --field email

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use warrant_contracts::{Action, Record, WarrantError, WarrantResult};
use warrant_core::Ability;
use warrant_policy::TomlPolicy;
use warrant_ref_coaching::scenarios::{self, Outcome};
use warrant_ref_coaching::{define_ability_for, define_ability_from_document, CoachingSubject, User};

// ── CLI definition ────────────────────────────────────────────────────────────

/// warrant: attribute-based access decisions for the coaching organisation.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "warrant coaching reference demo",
    long_about = "Evaluates access decisions against the coaching organisation's role policy,\n\
                  either over the documented scenarios or for a single query."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every documented scenario and report mismatches.
    Scenarios {
        /// Use the TOML policy document instead of the code table.
        #[arg(long)]
        document: bool,
        /// Print outcomes as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Decide a single query.
    Check {
        /// The requesting user, as JSON.
        #[arg(long)]
        principal: String,
        /// Subject type of the target (user, behavior, ...).
        #[arg(long)]
        kind: CoachingSubject,
        /// The target record, as JSON. Omit for a type-level query.
        #[arg(long)]
        subject: Option<String>,
        /// create, read, readAll, update or delete.
        #[arg(long)]
        action: Action,
        /// Narrow the query to one field.
        #[arg(long)]
        field: Option<String>,
        /// Compile this TOML policy file instead of the built-in table.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every rule match.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Scenarios { document, json } => run_scenarios(document, json),
        Command::Check {
            principal,
            kind,
            subject,
            action,
            field,
            policy,
        } => run_check(&principal, kind, subject.as_deref(), action, field.as_deref(), policy),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn run_scenarios(document: bool, json: bool) -> WarrantResult<()> {
    let all = scenarios::all();
    let outcomes = if document {
        scenarios::run(&all, define_ability_from_document)?
    } else {
        scenarios::run(&all, define_ability_for)?
    };

    if json {
        for outcome in &outcomes {
            let line = serde_json::to_string(outcome).map_err(|e| WarrantError::ConfigError {
                reason: format!("failed to encode outcome: {}", e),
            })?;
            println!("{line}");
        }
    } else {
        print_banner(if document { "TOML document" } else { "code table" });
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    info!(total = outcomes.len(), failed, "scenarios evaluated");

    if failed > 0 {
        return Err(WarrantError::ConfigError {
            reason: format!("{failed} of {} scenarios did not hold", outcomes.len()),
        });
    }
    if !json {
        println!();
        println!("All {} scenarios hold.", outcomes.len());
    }
    Ok(())
}

fn print_outcome(o: &Outcome) {
    let mark = if o.passed() { "ok  " } else { "FAIL" };
    let field = o.field.map(|f| format!(".{f}")).unwrap_or_default();
    print!("  [{mark}] {:<7} {}{:<22} {}", o.action.as_str(), o.name, field, o.actual);
    if let Some(reason) = &o.reason {
        print!("  ({reason})");
    }
    println!();
}

// ── Single query ──────────────────────────────────────────────────────────────

fn run_check(
    principal: &str,
    kind: CoachingSubject,
    subject: Option<&str>,
    action: Action,
    field: Option<&str>,
    policy: Option<PathBuf>,
) -> WarrantResult<()> {
    let principal: User = parse_json("principal", principal)?;

    let ability: Ability<CoachingSubject> = match policy {
        Some(path) => TomlPolicy::from_file(&path)?.build_for(&principal)?,
        None => define_ability_for(&principal)?,
    };

    match subject {
        Some(subject) => {
            let record = Record::new(kind, parse_json("subject", subject)?);
            let e = ability.explain(action, &record, field);
            print!("{}", e.effect);
            match (e.rule_index, e.reason) {
                (Some(index), Some(reason)) => println!(" (rule #{index}: {reason})"),
                (Some(index), None) => println!(" (rule #{index})"),
                (None, _) => println!(" (no rule matched)"),
            }
        }
        None => println!("{}", ability.decide_type(action, kind, field)),
    }
    Ok(())
}

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, s: &str) -> WarrantResult<T> {
    serde_json::from_str(s).map_err(|e| WarrantError::ConfigError {
        reason: format!("invalid {what} JSON: {}", e),
    })
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(source: &str) {
    println!();
    println!("warrant: coaching organisation scenarios");
    println!("========================================");
    println!("policy source: {source}");
    println!();
    println!("Decision per query:");
    println!("  [1] keep rules about the subject type and the action");
    println!("  [2] keep rules whose field scope covers the field");
    println!("  [3] keep rules whose condition holds for the record");
    println!("  [4] the last surviving rule decides; none means deny");
    println!();
}
