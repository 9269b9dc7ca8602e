#![warn(clippy::all, clippy::pedantic)]

use binexpr::{
	common::{diagnostics, span::Spanned},
	eval::{evaluate, Bindings},
	lexer::{Lexer, Token},
	parser::{
		parse_source,
		precedence::{ConfigError, PrecedenceTable},
		ParseOutput, ParserConfig,
	},
	rpn::{check_rpn, format_rpn, to_rpn},
};
use clap::{crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use codespan_reporting::{
	diagnostic::{Diagnostic, Label, Severity},
	files::{self, SimpleFiles},
	term::{
		self,
		termcolor::{ColorChoice, StandardStream},
	},
};
use log::debug;
use std::{fs, io, path::PathBuf, process::ExitCode};
use thiserror::Error;

#[derive(Debug, Error)]
enum Error {
	#[error(transparent)]
	Clap(#[from] clap::Error),
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Files(#[from] files::Error),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("expected NAME=VALUE, found {0:?}")]
	Binding(String),
}

type Result<T> = std::result::Result<T, Error>;

fn inputs(command: Command) -> Command {
	command
		.arg(
			Arg::new("expr")
				.num_args(1..)
				.required_unless_present("file")
				.help("expressions, each parsed on its own"),
		)
		.arg(
			Arg::new("file")
				.short('f')
				.long("file")
				.value_parser(value_parser!(PathBuf))
				.conflicts_with("expr")
				.help("read one expression from a file"),
		)
}

fn cli() -> Command {
	Command::new(crate_name!())
		.version(crate_version!())
		.disable_help_subcommand(true)
		.arg_required_else_help(true)
		.subcommand_required(true)
		.arg(
			Arg::new("chain")
				.long("chain")
				.action(ArgAction::SetTrue)
				.help("allow chained operators, grouped by precedence"),
		)
		.arg(
			Arg::new("prec")
				.long("prec")
				.value_name("OP=LEVEL")
				.action(ArgAction::Append)
				.help("override one precedence level (implies --chain)"),
		)
		.subcommand(inputs(Command::new("tokens").about("print the tokens of each expression")))
		.subcommand(
			inputs(Command::new("parse").about("print each expression as parsed")).arg(
				Arg::new("tree")
					.long("tree")
					.action(ArgAction::SetTrue)
					.help("print the parse tree instead of the expression"),
			),
		)
		.subcommand(inputs(Command::new("rpn").about("print each expression in postfix form")))
		.subcommand(
			inputs(Command::new("eval").about("evaluate each expression")).arg(
				Arg::new("var")
					.long("var")
					.value_name("NAME=VALUE")
					.action(ArgAction::Append)
					.help("bind an identifier"),
			),
		)
}

fn parser_config(matches: &ArgMatches) -> Result<ParserConfig> {
	let overrides: Vec<&String> = matches.get_many::<String>("prec").into_iter().flatten().collect();
	if overrides.is_empty() && !matches.get_flag("chain") {
		return Ok(ParserConfig::default());
	}
	let mut table = PrecedenceTable::default();
	for text in overrides {
		table = table.parse_override(text)?;
	}
	Ok(ParserConfig::chained(table))
}

fn bindings(matches: &ArgMatches) -> Result<Bindings> {
	matches
		.get_many::<String>("var")
		.into_iter()
		.flatten()
		.map(|text| {
			let (name, value) = text
				.split_once('=')
				.ok_or_else(|| Error::Binding(text.clone()))?;
			let value = value
				.trim()
				.parse()
				.map_err(|_| Error::Binding(text.clone()))?;
			Ok((name.trim().to_string(), value))
		})
		.collect()
}

fn sources(matches: &ArgMatches) -> Result<Vec<(String, String)>> {
	if let Some(path) = matches.get_one::<PathBuf>("file") {
		let code = fs::read_to_string(path)?;
		return Ok(vec![(path.display().to_string(), code)]);
	}
	Ok(matches
		.get_many::<String>("expr")
		.into_iter()
		.flatten()
		.enumerate()
		.map(|(i, code)| (format!("<arg {}>", i + 1), code.clone()))
		.collect())
}

fn print_tokens(name: &str, source: &str, file_id: usize) -> Option<Diagnostic<usize>> {
	for token in Lexer::new(source, file_id) {
		match token {
			Ok((Token::EndOfInput, _)) => break,
			Ok((token, span)) => {
				let position = span.position(source);
				println!("{name}:{}:{}: {token:?}", position.line, position.column);
			}
			Err(err) => return Some(diagnostics::lex_error(&err)),
		}
	}
	None
}

fn run_one(
	command: &str,
	sub_matches: &ArgMatches,
	config: &ParserConfig,
	bindings: &Bindings,
	name: &str,
	source: &str,
	file_id: usize,
) -> Option<Diagnostic<usize>> {
	if command == "tokens" {
		return print_tokens(name, source, file_id);
	}

	let ParseOutput { expr, tokens } = match parse_source(source, file_id, config) {
		Ok(output) => output,
		Err(err) => return Some(diagnostics::error(&err)),
	};
	debug!("{name}: {tokens} tokens");
	let Spanned { span, value } = expr;

	match command {
		"parse" if sub_matches.get_flag("tree") => println!("{value:#?}"),
		"parse" => println!("{value}"),
		"rpn" => {
			let items = to_rpn(&value);
			if let Err(err) = check_rpn(&items) {
				return Some(
					Diagnostic::bug()
						.with_message(format!("malformed postfix form: {err}"))
						.with_labels(vec![Label::primary(span.file_id, span.range())]),
				);
			}
			println!("{}", format_rpn(&items));
		}
		"eval" => match evaluate(&value, bindings) {
			Ok(result) => println!("{result}"),
			Err(err) => return Some(diagnostics::eval_error(&err, &span)),
		},
		_ => unreachable!("clap only accepts known subcommands"),
	}
	None
}

fn run() -> Result<ExitCode> {
	let matches = cli().try_get_matches()?;
	let config = parser_config(&matches)?;
	let Some((command, sub_matches)) = matches.subcommand() else {
		unreachable!("a subcommand is required");
	};
	let bindings = if command == "eval" {
		bindings(sub_matches)?
	} else {
		Bindings::new()
	};

	let mut files = SimpleFiles::new();
	let source_ids: Vec<usize> = sources(sub_matches)?
		.into_iter()
		.map(|(name, code)| files.add(name, code))
		.collect();

	let mut all_diagnostics = Vec::new();
	for id in source_ids {
		let file = files.get(id)?;
		if let Some(diagnostic) = run_one(
			command,
			sub_matches,
			&config,
			&bindings,
			file.name(),
			file.source(),
			id,
		) {
			all_diagnostics.push(diagnostic);
		}
	}

	if all_diagnostics.is_empty() {
		return Ok(ExitCode::SUCCESS);
	}

	// Print errors and/or warnings
	let writer = StandardStream::stderr(ColorChoice::Auto);
	let term_config = term::Config::default();
	let amount = all_diagnostics.len();
	let warnings = all_diagnostics
		.iter()
		.filter(|x| x.severity == Severity::Warning)
		.count();
	let have_errors = all_diagnostics.iter().any(|x| x.severity >= Severity::Error);
	for diagnostic in &all_diagnostics {
		term::emit(&mut writer.lock(), &term_config, &files, diagnostic)?;
	}
	eprintln!(
		"{amount} diagnostic{} total ({warnings} warning{}, {} error{})",
		if amount == 1 { "" } else { "s" },
		if warnings == 1 { "" } else { "s" },
		amount - warnings,
		if amount - warnings == 1 { "" } else { "s" },
	);

	Ok(if have_errors {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}

fn main() -> ExitCode {
	env_logger::init();
	match run() {
		Ok(code) => code,
		Err(Error::Clap(err)) => err.exit(),
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::FAILURE
		}
	}
}
