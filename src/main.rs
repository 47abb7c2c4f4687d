// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use bin2cpp::cli;
use bin2cpp::emit;
use bin2cpp::error::{exit, exit_code, Error};

/// Convert SNASM68K COFF objects and raw binaries into C++ headers.
#[derive(Debug, Parser)]
#[clap(name = env!("CARGO_BIN_NAME"), version)]
#[command(version, about, long_about = None)]
pub struct App {
    #[clap(subcommand)]
    command: Option<CLICommand>,

    #[clap(flatten)]
    names: Names,
}

#[derive(Debug, Subcommand)]
enum CLICommand {
    /// Convert a raw binary into a byte array
    #[command(short_flag = 'b', short_flag_alias = 'B')]
    Binary {
        /// the binary to convert
        #[arg(required = true)]
        input: PathBuf,

        /// the header to write
        #[arg(required = true)]
        output: PathBuf,
    },

    /// Extract the ROM section and symbol addresses from a SNASM68K COFF
    #[command(short_flag = 'c', short_flag_alias = 'C')]
    Coff {
        /// a SNASM68K COFF
        #[arg(required = true)]
        input: PathBuf,

        /// the header to write the ROM section to
        #[arg(required = true)]
        rom_output: PathBuf,

        /// the header to write symbol addresses to
        #[arg(required = true)]
        vars_output: PathBuf,

        /// symbols to look up, ignoring case
        symbols: Vec<String>,
    },

    /// List the header and sections of a SNASM68K COFF
    #[command(short_flag = 'l', short_flag_alias = 'L')]
    List {
        /// a SNASM68K COFF
        #[arg(required = true)]
        input: PathBuf,

        /// also list the symbol table
        #[clap(short, long)]
        symbols: bool,
    },
}

#[derive(Debug, Args)]
struct Names {
    /// identifier of the generated byte array
    #[clap(short, long, global = true, default_value = emit::DEFAULT_BINARY_NAME)]
    name: String,

    /// prefix of the generated symbol constants
    #[clap(short, long, global = true, default_value = emit::DEFAULT_SYMBOL_PREFIX)]
    prefix: String,
}

impl From<Names> for emit::Options {
    fn from(names: Names) -> Self {
        Self {
            binary_name: names.name,
            symbol_prefix: names.prefix,
        }
    }
}

fn run(args: App) -> Result<()> {
    let mut stdout = std::io::stdout();
    let options: emit::Options = args.names.into();
    match args.command {
        Some(CLICommand::Binary { input, output }) => {
            cli::binary(&mut stdout, &input, &output, &options)
        }
        Some(CLICommand::Coff {
            input,
            rom_output,
            vars_output,
            symbols,
        }) => cli::extract(
            &mut stdout,
            &input,
            &rom_output,
            &vars_output,
            &symbols,
            &options,
        ),
        Some(CLICommand::List { input, symbols }) => cli::info(&mut stdout, &input, symbols),
        None => {
            println!("{}", App::command().render_help());
            Err(Error::Usage("no mode given, expected -b, -c, or -l".to_string()).into())
        }
    }
}

/// Help and version requests are printed to stdout and succeed.
fn parse_error_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        exit::USAGE
    } else {
        exit::SUCCESS
    }
}

fn main() -> ExitCode {
    let args = match App::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_exit_code(&e));
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
