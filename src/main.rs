#![warn(
    clippy::all,
    clippy::pedantic,
    anonymous_parameters,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    missing_debug_implementations,
    single_use_lifetimes,
    trivial_casts,
    unreachable_pub,
    unused_lifetimes
)]

use anyhow::{anyhow, bail};
use clap::{ArgEnum, Parser};
use itertools::Itertools;
use lgg::{
    anti_unify, anti_unify_list_with, sexp::Sexp, Capture, Environment, HigherOrderAntiUnifier,
    HoTerm, LengthPolicy, Term,
};
use log::info;
use serde::Serialize;
use std::{
    convert::{TryFrom, TryInto},
    fmt::Display,
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(Clone, Copy, Debug, ArgEnum)]
enum Mode {
    FirstOrder,
    List,
    HigherOrder,
}

#[derive(Parser)]
#[clap(version, about)]
struct Opts {
    /// The input file, holding the two terms to generalize. If no file is
    /// specified, reads from stdin. In list mode, each term is written
    /// `(list t1 ... tn)`.
    #[clap(parse(from_os_str))]
    file: Option<PathBuf>,

    /// Which anti-unifier to run.
    #[clap(long, arg_enum, default_value = "first-order")]
    mode: Mode,

    /// In list mode, reject lists of different lengths instead of truncating.
    #[clap(long)]
    strict: bool,

    /// In higher-order mode, apply pattern variables to every bound variable
    /// in scope rather than only those they mention.
    #[clap(long)]
    all_bound: bool,

    /// Print the result as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a, G, T> {
    generalization: &'a G,
    environment: &'a Environment<T>,
}

fn sequence(sexp: Sexp<'_>) -> anyhow::Result<Vec<Term>> {
    match sexp {
        Sexp::List("list", items) => Ok(items
            .into_iter()
            .map(Term::try_from)
            .collect::<Result<_, _>>()?),
        other => bail!("expected `(list ...)`, found `{}`", other),
    }
}

fn report<G, T>(
    json: bool,
    shown: &str,
    generalization: &G,
    env: &Environment<T>,
) -> anyhow::Result<()>
where
    G: Serialize,
    T: Serialize + Display,
{
    if json {
        let output = Output {
            generalization,
            environment: env,
        };
        serde_json::to_writer_pretty(io::stdout(), &output)?;
        println!();
    } else {
        println!("lgg: {}", shown);
        println!("env:");
        for (var, (left, right)) in env {
            println!("  {} -> ({}, {})", var, left, right);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let input = opts.file.as_ref().map_or_else(
        || {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        },
        fs::read_to_string,
    )?;

    let [left, right]: [Sexp<'_>; 2] = Sexp::parse_all(&input)?
        .try_into()
        .map_err(|sexps: Vec<_>| anyhow!("expected two terms, found {}", sexps.len()))?;
    info!("anti-unifying {} and {}", left, right);

    match opts.mode {
        Mode::FirstOrder => {
            let left = Term::try_from(left)?;
            let right = Term::try_from(right)?;
            let (g, env) = anti_unify(&left, &right);
            report(opts.json, &g.to_string(), &g, &env)
        }
        Mode::List => {
            let policy = if opts.strict {
                LengthPolicy::Strict
            } else {
                LengthPolicy::Truncate
            };
            let (gs, env) = anti_unify_list_with(&sequence(left)?, &sequence(right)?, policy)?;
            let shown = format!("[{}]", gs.iter().join(", "));
            report(opts.json, &shown, &gs, &env)
        }
        Mode::HigherOrder => {
            let left = HoTerm::try_from(left)?;
            let right = HoTerm::try_from(right)?;
            let capture = if opts.all_bound {
                Capture::All
            } else {
                Capture::Occurring
            };
            let mut anti_unifier = HigherOrderAntiUnifier::new().with_capture(capture);
            anti_unifier.reserve(&left);
            anti_unifier.reserve(&right);
            let g = anti_unifier.anti_unify(&left, &right);
            let env = anti_unifier.finish();
            report(opts.json, &g.to_string(), &g, &env)
        }
    }
}
