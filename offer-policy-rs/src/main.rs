// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Offer Policy CLI
//!
//! A command-line interface for inspecting role permissions and redacting records.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use offer_policy::access::{can_view_field, filter_offer_for_role, get_permissions, Role};
use offer_policy::record::{Offer, SeedData};

const HELP: &str = r#"
Offer Policy CLI

USAGE:
    offer-policy [OPTIONS] <COMMAND>

COMMANDS:
    permissions <ROLE>    Print the capability set of a role
    field <NAME>          Check whether a role may see a field
    redact                Redact a JSON record for a role
    seed                  Redact every offer of a seed file for a role
    repl                  Start interactive REPL mode

OPTIONS:
    -r, --role <ROLE>     admin, manager, publisher, advertiser or viewer
    -f, --file <FILE>     Path to a seed YAML file
    -h, --help            Print help information
    -V, --version         Print version information

EXAMPLES:
    # Show what a publisher can do
    offer-policy permissions publisher

    # Redact a record as an advertiser
    offer-policy redact -r advertiser '{"offer_id": "ACA-001", "publisher_payout_min": 5}'

    # Redact a whole seed file as a viewer
    offer-policy seed -r viewer -f seed.yaml
"#;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("{}", HELP);
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            println!("{}", HELP);
            ExitCode::SUCCESS
        }
        "-V" | "--version" | "version" => {
            println!("offer-policy {}", offer_policy::VERSION);
            ExitCode::SUCCESS
        }
        "permissions" => run_permissions(&args[2..]),
        "field" => run_field(&args[2..]),
        "redact" => run_redact(&args[2..]),
        "seed" => run_seed(&args[2..]),
        "repl" => run_repl(&args[2..]),
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("{}", HELP);
            ExitCode::FAILURE
        }
    }
}

fn parse_flag<'a>(args: &'a [String], short: &str, long: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| pair[0] == short || pair[0] == long)
        .map(|pair| pair[1].as_str())
}

fn parse_role_arg(args: &[String]) -> Result<Role, String> {
    let name = parse_flag(args, "-r", "--role").ok_or("Error: --role argument required")?;
    name.parse::<Role>().map_err(|e| e.to_string())
}

/// Positional arguments, skipping flags and their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if matches!(arg.as_str(), "-r" | "--role" | "-f" | "--file") {
            skip = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn print_json(value: &impl serde::Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_permissions(args: &[String]) -> ExitCode {
    let role = match args.first().map(|r| r.parse::<Role>()) {
        Some(Ok(role)) => role,
        Some(Err(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("Error: role required");
            return ExitCode::FAILURE;
        }
    };

    print_json(&get_permissions(role))
}

fn run_field(args: &[String]) -> ExitCode {
    let role = match parse_role_arg(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(field) = positionals(args).first().copied() else {
        eprintln!("Error: field name required");
        return ExitCode::FAILURE;
    };

    if can_view_field(role, field) {
        println!("VISIBLE: {} may see '{}'", role, field);
        ExitCode::SUCCESS
    } else {
        println!("HIDDEN: {} may not see '{}'", role, field);
        ExitCode::FAILURE
    }
}

fn run_redact(args: &[String]) -> ExitCode {
    let role = match parse_role_arg(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Find the JSON argument
    let json_arg = positionals(args)
        .into_iter()
        .find(|a| a.trim_start().starts_with('{'));

    let record: serde_json::Value = match json_arg {
        Some(json) => match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Failed to parse record JSON: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            eprintln!("Error: record JSON required");
            return ExitCode::FAILURE;
        }
    };

    print_json(&filter_offer_for_role(&record, role))
}

fn load_seed(path: &PathBuf) -> Result<SeedData, String> {
    let yaml =
        fs::read_to_string(path).map_err(|e| format!("Failed to read seed file: {}", e))?;

    SeedData::from_yaml(&yaml).map_err(|e| format!("Failed to parse seed file: {}", e))
}

fn run_seed(args: &[String]) -> ExitCode {
    let role = match parse_role_arg(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let path = match parse_flag(args, "-f", "--file") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --file argument required");
            return ExitCode::FAILURE;
        }
    };

    let seed = match load_seed(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let now = chrono::Utc::now();
    let offers: Vec<Offer> = seed
        .offers
        .into_iter()
        .enumerate()
        .map(|(i, offer)| offer.into_offer(format!("seed-{}", i + 1), now))
        .collect();

    match offer_policy::access::filter_offers_for_role(&offers, role) {
        Ok(redacted) => print_json(&redacted),
        Err(e) => {
            eprintln!("Failed to serialize offers: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_repl(args: &[String]) -> ExitCode {
    let role = match parse_role_arg(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Offer Policy REPL");
    println!("Redacting as '{}'", role);
    println!("Enter records as JSON, or 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "quit" || line == "exit" {
            break;
        }

        let record: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Parse error: {}", e);
                continue;
            }
        };

        println!("{}", filter_offer_for_role(&record, role));
    }

    ExitCode::SUCCESS
}
